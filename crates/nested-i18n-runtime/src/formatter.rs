use std::sync::Arc;

use nested_i18n_core::{Lang, arg_marker, find_reference, normalize_escapes};

use crate::error::{I18nError, I18nResult};
use crate::message::Arg;
use crate::store::EntryStore;

/// Nesting limit for `<$id>` expansion. Deeper chains are treated as cyclic.
pub const MAX_REFERENCE_DEPTH: usize = 64;

/// Upper bound on `<$id>` references expanded during one resolution,
/// counted across every nested template and message argument.
pub const MAX_EXPANSIONS: usize = 4096;

/// Text substituted for a nested reference that could not be resolved leniently.
const UNRESOLVED_REFERENCE: &str = "null";

/// What to do when no candidate language has a template.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum OnMiss {
    Absent,
    Raise,
}

/// State shared by every step of one top-level resolution.
///
/// Hitting either expansion limit is an error in both modes, so a cyclic
/// template unwinds at the first branch that reaches the limit.
#[derive(Debug)]
pub(crate) struct Walk {
    on_miss: OnMiss,
    expanded: usize,
}

impl Walk {
    pub(crate) fn new(on_miss: OnMiss) -> Self {
        Self {
            on_miss,
            expanded: 0,
        }
    }

    fn miss<T>(&self, err: impl FnOnce() -> I18nError) -> I18nResult<Option<T>> {
        match self.on_miss {
            OnMiss::Absent => Ok(None),
            OnMiss::Raise => Err(err()),
        }
    }

    fn enter(&mut self, id: &str, depth: usize) -> I18nResult<()> {
        if depth >= MAX_REFERENCE_DEPTH {
            return Err(I18nError::ReferenceDepthExceeded {
                id: id.to_string(),
                depth,
            });
        }
        self.expanded += 1;
        if self.expanded > MAX_EXPANSIONS {
            return Err(I18nError::ExpansionLimitExceeded {
                id: id.to_string(),
                limit: MAX_EXPANSIONS,
            });
        }
        Ok(())
    }
}

/// Resolves message ids against an [`EntryStore`] using an ordered list of
/// candidate languages.
///
/// The store is shared, so several formatters may read the same entries
/// while each keeps its own fallback language.
#[derive(Debug, Clone)]
pub struct Formatter {
    store: Arc<EntryStore>,
    fallback_lang: Option<Lang>,
}

impl Formatter {
    pub fn new(store: Arc<EntryStore>) -> Self {
        Self {
            store,
            fallback_lang: None,
        }
    }

    pub fn with_fallback(store: Arc<EntryStore>, fallback_lang: Lang) -> Self {
        Self {
            store,
            fallback_lang: Some(fallback_lang),
        }
    }

    pub fn store(&self) -> &Arc<EntryStore> {
        &self.store
    }

    pub fn fallback_lang(&self) -> Option<&Lang> {
        self.fallback_lang.as_ref()
    }

    pub fn set_fallback_lang(&mut self, fallback_lang: Option<Lang>) {
        self.fallback_lang = fallback_lang;
    }

    /// Resolves `id`, returning `None` when no candidate language has it or
    /// when expansion runs past its limits.
    pub fn resolve(&self, id: &str, langs: &[Lang], args: &[Arg]) -> Option<String> {
        self.render(id, langs, args, &mut Walk::new(OnMiss::Absent), 0)
            .ok()
            .flatten()
    }

    /// Resolves `id`, failing with [`I18nError::LocaleNotFound`] when no
    /// candidate language has it or any nested piece is missing.
    pub fn resolve_required(&self, id: &str, langs: &[Lang], args: &[Arg]) -> I18nResult<String> {
        self.render(id, langs, args, &mut Walk::new(OnMiss::Raise), 0)?
            .ok_or_else(|| I18nError::id_not_found(langs, id))
    }

    pub(crate) fn render(
        &self,
        id: &str,
        langs: &[Lang],
        args: &[Arg],
        walk: &mut Walk,
        depth: usize,
    ) -> I18nResult<Option<String>> {
        let Some(raw) = self.lookup(id, langs) else {
            return walk.miss(|| I18nError::id_not_found(langs, id));
        };

        let mut text = normalize_escapes(&raw);
        while let Some(marker) = find_reference(&text) {
            let (start, end) = (marker.start, marker.end);
            let nested_id = marker.id.to_string();
            walk.enter(&nested_id, depth)?;

            let expanded = self.render(&nested_id, langs, &[], walk, depth + 1)?;
            let replacement = expanded.as_deref().unwrap_or(UNRESOLVED_REFERENCE);
            text.replace_range(start..end, replacement);
        }

        for (index, arg) in args.iter().enumerate() {
            let marker = arg_marker(index);
            if !text.contains(&marker) {
                continue;
            }
            let value = match arg {
                Arg::Message(message) => message.render(self, langs, walk, depth + 1)?,
                other => other.to_text(),
            };
            text = text.replace(&marker, value.as_deref().unwrap_or(""));
        }

        Ok(Some(text))
    }

    /// First template for `id` in candidate order; the fallback sentinel is
    /// swapped for the configured fallback, or skipped when none is set.
    fn lookup(&self, id: &str, langs: &[Lang]) -> Option<String> {
        langs.iter().find_map(|lang| {
            let lang = if lang.is_fallback() {
                self.fallback_lang.as_ref()?
            } else {
                lang
            };
            let entry = self.store.get(lang)?;
            entry.get(id).map(str::to_string)
        })
    }
}
