use std::slice;
use std::sync::Arc;

use nested_i18n_core::{FALLBACK, Lang};

use crate::error::{I18nError, I18nResult};
use crate::formatter::Formatter;
use crate::message::{Message, with_fallback};
use crate::store::EntryStore;

/// Tries several independently configured formatters, for example a
/// plugin's own bundle ahead of the host application's.
///
/// Language preference dominates: every formatter is tried for the first
/// language before any formatter is tried for the second.
#[derive(Debug, Clone, Default)]
pub struct FormatterChain {
    formatters: Vec<Formatter>,
}

impl FormatterChain {
    pub fn new(formatters: Vec<Formatter>) -> Self {
        Self { formatters }
    }

    pub fn push(&mut self, formatter: Formatter) {
        self.formatters.push(formatter);
    }

    pub fn formatters(&self) -> &[Formatter] {
        &self.formatters
    }

    pub fn formatters_mut(&mut self) -> &mut [Formatter] {
        &mut self.formatters
    }

    pub fn build(&self, message: &Message, langs: &[Lang]) -> Option<String> {
        langs.iter().find_map(|lang| {
            self.formatters
                .iter()
                .find_map(|formatter| message.build(formatter, slice::from_ref(lang)))
        })
    }

    /// Fails only after every (language, formatter) pair came up empty.
    pub fn build_required(&self, message: &Message, langs: &[Lang]) -> I18nResult<String> {
        self.build(message, langs)
            .ok_or_else(|| I18nError::message_not_found(langs, message))
    }

    pub fn build_by_fallback(&self, message: &Message) -> Option<String> {
        self.build(message, &[FALLBACK])
    }

    pub fn build_required_by_fallback(&self, message: &Message) -> I18nResult<String> {
        self.build_required(message, &[FALLBACK])
    }

    pub fn build_with_fallback(&self, message: &Message, langs: &[Lang]) -> Option<String> {
        self.build(message, &with_fallback(langs))
    }

    pub fn build_required_with_fallback(
        &self,
        message: &Message,
        langs: &[Lang],
    ) -> I18nResult<String> {
        self.build_required(message, &with_fallback(langs))
    }

    /// Reloads each distinct store behind the chain once.
    pub fn reload(&self) -> I18nResult<()> {
        let mut seen: Vec<&Arc<EntryStore>> = Vec::new();
        for formatter in &self.formatters {
            let store = formatter.store();
            if seen.iter().any(|known| Arc::ptr_eq(known, store)) {
                continue;
            }
            store.reload()?;
            seen.push(store);
        }
        Ok(())
    }
}
