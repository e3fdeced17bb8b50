use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, warn};
use nested_i18n_core::{Entry, Lang, invalid_ids};

use crate::error::{I18nError, I18nResult};
use crate::lang_source::parse_lang_templates;
use crate::source::ResourceProvider;

const LOG_TARGET: &str = "nested_i18n::store";

type EntryMap = BTreeMap<String, Arc<Entry>>;

/// Loaded entries keyed by language id, behind one store-wide lock.
///
/// Every operation, reads included, takes the same mutex. Entries are
/// handed out as `Arc<Entry>` and replaced wholesale on reload, so a
/// reader holds either the old or the new template set, never a mix.
pub struct EntryStore {
    providers: Vec<Box<dyn ResourceProvider>>,
    entries: Mutex<EntryMap>,
}

impl EntryStore {
    /// Providers are merged in order; later ones override earlier keys.
    pub fn new(providers: Vec<Box<dyn ResourceProvider>>) -> Self {
        Self {
            providers,
            entries: Mutex::new(BTreeMap::new()),
        }
    }

    /// A store with no providers; entries can only arrive through [`put`](Self::put).
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn load(&self, lang: &Lang) -> I18nResult<()> {
        reject_sentinel(lang)?;
        let mut entries = self.lock();
        if entries.contains_key(lang.id()) {
            return Err(I18nError::LocaleAlreadyExists { lang: lang.clone() });
        }
        self.force_load(&mut entries, lang)
    }

    /// Loads each language in turn, stopping at the first failure.
    pub fn load_all(&self, langs: &[Lang]) -> I18nResult<()> {
        for lang in langs {
            self.load(lang)?;
        }
        Ok(())
    }

    /// Re-reads one language from the providers, replacing any existing entry.
    pub fn reload_lang(&self, lang: &Lang) -> I18nResult<()> {
        reject_sentinel(lang)?;
        let mut entries = self.lock();
        self.force_load(&mut entries, lang)
    }

    /// Re-reads every tracked language. Languages reloaded before a failure
    /// keep their new content.
    pub fn reload(&self) -> I18nResult<()> {
        let mut entries = self.lock();
        let langs: Vec<Lang> = entries.values().map(|entry| entry.lang().clone()).collect();
        for lang in &langs {
            self.force_load(&mut entries, lang)?;
        }
        Ok(())
    }

    pub fn get(&self, lang: &Lang) -> Option<Arc<Entry>> {
        if lang.is_fallback() {
            return None;
        }
        self.lock().get(lang.id()).cloned()
    }

    /// Inserts `entry`, replacing whatever was stored for its language.
    pub fn put(&self, entry: Entry) -> I18nResult<()> {
        reject_sentinel(entry.lang())?;
        let id = entry.lang().id().to_string();
        self.lock().insert(id, Arc::new(entry));
        Ok(())
    }

    pub fn remove(&self, lang: &Lang) -> Option<Arc<Entry>> {
        if lang.is_fallback() {
            return None;
        }
        let removed = self.lock().remove(lang.id());
        if removed.is_some() {
            debug!(target: LOG_TARGET, "removed entry for {lang}");
        }
        removed
    }

    pub fn has(&self, lang: &Lang) -> bool {
        !lang.is_fallback() && self.lock().contains_key(lang.id())
    }

    /// Snapshot of the current entries; changing the returned vector does
    /// not affect the store.
    pub fn entries(&self) -> Vec<Arc<Entry>> {
        self.lock().values().cloned().collect()
    }

    pub fn langs(&self) -> Vec<Lang> {
        self.lock()
            .values()
            .map(|entry| entry.lang().clone())
            .collect()
    }

    /// Every message id known in any language, sorted and deduplicated.
    pub fn message_ids(&self) -> Vec<String> {
        let entries = self.lock();
        let ids: BTreeSet<&str> = entries.values().flat_map(|entry| entry.ids()).collect();
        ids.into_iter().map(str::to_string).collect()
    }

    fn lock(&self) -> MutexGuard<'_, EntryMap> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn force_load(&self, entries: &mut EntryMap, lang: &Lang) -> I18nResult<()> {
        let entry = self.read_entry(lang)?;
        debug!(
            target: LOG_TARGET,
            "loaded {} templates for {lang}",
            entry.len()
        );
        entries.insert(lang.id().to_string(), Arc::new(entry));
        Ok(())
    }

    fn read_entry(&self, lang: &Lang) -> I18nResult<Entry> {
        let mut templates = BTreeMap::new();
        for provider in &self.providers {
            let location = provider.location(lang);
            let bytes = match provider.fetch(lang) {
                Ok(bytes) => bytes,
                Err(err) => {
                    warn!(target: LOG_TARGET, "failed to load localization resource {location}: {err}");
                    continue;
                }
            };
            let contents = match String::from_utf8(bytes) {
                Ok(contents) => contents,
                Err(err) => {
                    warn!(target: LOG_TARGET, "localization resource {location} is not UTF-8: {err}");
                    continue;
                }
            };
            match parse_lang_templates(&contents) {
                Ok(parsed) => templates.extend(parsed),
                Err(err) => warn!(
                    target: LOG_TARGET,
                    "failed to parse localization resource {location}:{}:{} {}",
                    err.line,
                    err.column,
                    err.message
                ),
            }
        }

        let invalid = invalid_ids(templates.keys());
        if !invalid.is_empty() {
            return Err(I18nError::IllegalKey {
                lang: lang.clone(),
                keys: invalid,
            });
        }
        Ok(Entry::with_templates(lang.clone(), templates))
    }
}

impl fmt::Debug for EntryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntryStore")
            .field("providers", &self.providers.len())
            .field("langs", &self.langs())
            .finish()
    }
}

fn reject_sentinel(lang: &Lang) -> I18nResult<()> {
    if lang.is_fallback() {
        return Err(I18nError::ReservedLang);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::EntryStore;
    use crate::error::I18nError;
    use crate::source::{BundledResources, ResourceProvider};
    use nested_i18n_core::{Entry, FALLBACK, Lang};

    fn en() -> Lang {
        Lang::new("en", "English")
    }

    fn store_with(sources: &[(&Lang, &str)]) -> EntryStore {
        let mut bundled = BundledResources::new("org.example", "demo");
        for (lang, contents) in sources {
            bundled.insert_lang(lang, contents.as_bytes());
        }
        EntryStore::new(vec![Box::new(bundled) as Box<dyn ResourceProvider>])
    }

    #[test]
    fn load_twice_fails_until_removed() {
        let store = store_with(&[(&en(), "greeting=Hello")]);
        store.load(&en()).expect("first load");
        let err = store.load(&en()).expect_err("second load should fail");
        assert!(matches!(err, I18nError::LocaleAlreadyExists { lang } if lang == en()));

        assert!(store.remove(&en()).is_some());
        store.load(&en()).expect("load after remove");
        assert!(store.has(&en()));
    }

    #[test]
    fn later_providers_override_earlier_keys() {
        let base = BundledResources::new("org.example", "demo").with_lang(&en(), "a=base\nb=base");
        let overlay = BundledResources::new("org.example", "demo").with_lang(&en(), "b=overlay");
        let providers: Vec<Box<dyn ResourceProvider>> = vec![Box::new(base), Box::new(overlay)];
        let store = EntryStore::new(providers);
        store.load(&en()).expect("load");
        let entry = store.get(&en()).expect("entry");
        assert_eq!(entry.get("a"), Some("base"));
        assert_eq!(entry.get("b"), Some("overlay"));
    }

    #[test]
    fn missing_providers_yield_empty_entry() {
        let store = store_with(&[]);
        store.load(&en()).expect("load");
        let entry = store.get(&en()).expect("entry");
        assert!(entry.is_empty());
    }

    #[test]
    fn unparsable_source_is_skipped() {
        let broken = BundledResources::new("org.example", "demo").with_lang(&en(), "a=\\u12");
        let good = BundledResources::new("org.example", "demo").with_lang(&en(), "b=ok");
        let providers: Vec<Box<dyn ResourceProvider>> = vec![Box::new(broken), Box::new(good)];
        let store = EntryStore::new(providers);
        store.load(&en()).expect("load");
        let entry = store.get(&en()).expect("entry");
        assert!(!entry.contains("a"));
        assert_eq!(entry.get("b"), Some("ok"));
    }

    #[test]
    fn invalid_keys_reject_the_whole_load() {
        let store = store_with(&[(&en(), "good=1\nBad=2\nalso.bad=3")]);
        let err = store.load(&en()).expect_err("invalid keys");
        match err {
            I18nError::IllegalKey { lang, keys } => {
                assert_eq!(lang, en());
                assert_eq!(keys, vec!["Bad".to_string(), "also.bad".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!store.has(&en()));
    }

    #[test]
    fn put_replaces_existing_entry() {
        let store = EntryStore::empty();
        let mut first = Entry::new(en());
        first.insert("a", "1");
        store.put(first).expect("put");
        let mut second = Entry::new(Lang::new("en", "English (US)"));
        second.insert("b", "2");
        store.put(second).expect("put");

        assert_eq!(store.entries().len(), 1);
        let entry = store.get(&en()).expect("entry");
        assert!(!entry.contains("a"));
        assert_eq!(entry.lang().display_name(), "English (US)");
    }

    #[test]
    fn fallback_sentinel_is_never_stored() {
        let store = EntryStore::empty();
        let err = store.put(Entry::new(FALLBACK)).expect_err("sentinel");
        assert!(matches!(err, I18nError::ReservedLang));
        assert!(matches!(store.load(&FALLBACK), Err(I18nError::ReservedLang)));
        assert!(!store.has(&FALLBACK));
    }

    #[test]
    fn entries_snapshot_is_detached() {
        let store = EntryStore::empty();
        store.put(Entry::new(en())).expect("put");
        let mut snapshot = store.entries();
        snapshot.clear();
        assert!(store.has(&en()));
    }

    #[test]
    fn reload_is_idempotent_for_stable_sources() {
        let ja = Lang::new("ja", "Japanese");
        let store = store_with(&[(&en(), "a=1\nb=<$a>"), (&ja, "a=ichi")]);
        store.load_all(&[en(), ja.clone()]).expect("load");
        let before: Vec<Entry> = store.entries().iter().map(|e| (**e).clone()).collect();
        store.reload().expect("reload");
        let after: Vec<Entry> = store.entries().iter().map(|e| (**e).clone()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn reload_lang_does_not_require_absence() {
        let store = store_with(&[(&en(), "a=1")]);
        store.load(&en()).expect("load");
        store.reload_lang(&en()).expect("reload");
        assert_eq!(store.get(&en()).expect("entry").get("a"), Some("1"));
    }

    #[test]
    fn message_ids_are_deduplicated() {
        let ja = Lang::new("ja", "Japanese");
        let store = store_with(&[(&en(), "b=1\na=2"), (&ja, "a=3\nc=4")]);
        store.load_all(&[en(), ja]).expect("load");
        assert_eq!(store.message_ids(), vec!["a", "b", "c"]);
    }
}
