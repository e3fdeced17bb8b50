use alloc::collections::BTreeMap;
use alloc::string::String;

use crate::Lang;

/// Raw templates loaded for one language, keyed by message id.
///
/// The language is fixed at construction; the template map can be swapped
/// wholesale.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    lang: Lang,
    templates: BTreeMap<String, String>,
}

impl Entry {
    pub fn new(lang: Lang) -> Self {
        Self {
            lang,
            templates: BTreeMap::new(),
        }
    }

    pub fn with_templates(lang: Lang, templates: BTreeMap<String, String>) -> Self {
        Self { lang, templates }
    }

    pub fn lang(&self) -> &Lang {
        &self.lang
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.templates.get(id).map(String::as_str)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.templates.contains_key(id)
    }

    pub fn insert(&mut self, id: impl Into<String>, template: impl Into<String>) -> Option<String> {
        self.templates.insert(id.into(), template.into())
    }

    pub fn set_templates(&mut self, templates: BTreeMap<String, String>) {
        self.templates = templates;
    }

    pub fn templates(&self) -> &BTreeMap<String, String> {
        &self.templates
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
