use std::sync::Arc;

use log::debug;
use nested_i18n_core::Lang;

use crate::config::I18nConfig;
use crate::error::I18nResult;
use crate::formatter::Formatter;
use crate::source::{BundledResources, FileResources, ResourceProvider};
use crate::store::EntryStore;

/// A store and formatter wired from an [`I18nConfig`], with every
/// configured language loaded.
#[derive(Debug, Clone)]
pub struct I18nManager {
    formatter: Formatter,
}

impl I18nManager {
    /// Sources are read in order: `bundled`, then `assets_root` on disk,
    /// then the data folder override.
    pub fn create(config: &I18nConfig, bundled: Option<BundledResources>) -> I18nResult<Self> {
        let mut providers: Vec<Box<dyn ResourceProvider>> = Vec::new();
        if let Some(bundled) = bundled {
            providers.push(Box::new(bundled));
        }
        if let Some(root) = &config.assets_root {
            providers.push(Box::new(FileResources::assets(
                root.clone(),
                config.domain.clone(),
                config.app_id.clone(),
            )));
        }
        providers.push(Box::new(FileResources::data_folder(config.data_folder.clone())));

        let store = Arc::new(EntryStore::new(providers));
        Self::from_parts(config, Formatter::new(store))
    }

    /// Loads the configured languages into the formatter's store and sets
    /// its fallback.
    pub fn from_parts(config: &I18nConfig, mut formatter: Formatter) -> I18nResult<Self> {
        let langs = config.langs()?;
        formatter.store().load_all(&langs)?;
        formatter.set_fallback_lang(config.fallback_lang()?);
        debug!(
            target: "nested_i18n::manager",
            "initialized {}/{} with {} languages",
            config.domain,
            config.app_id,
            langs.len()
        );
        Ok(Self { formatter })
    }

    pub fn store(&self) -> &Arc<EntryStore> {
        self.formatter.store()
    }

    pub fn formatter(&self) -> &Formatter {
        &self.formatter
    }

    pub fn formatter_mut(&mut self) -> &mut Formatter {
        &mut self.formatter
    }

    pub fn langs(&self) -> Vec<Lang> {
        self.store().langs()
    }

    pub fn reload(&self) -> I18nResult<()> {
        self.store().reload()
    }
}
