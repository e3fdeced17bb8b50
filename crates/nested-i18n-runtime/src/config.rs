use std::fs;
use std::path::{Path, PathBuf};

use nested_i18n_core::Lang;
use serde::{Deserialize, Serialize};

use crate::error::I18nResult;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LangConfig {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl LangConfig {
    pub fn to_lang(&self) -> I18nResult<Lang> {
        let display_name = self.display_name.clone().unwrap_or_else(|| self.id.clone());
        Ok(Lang::try_new(self.id.clone(), display_name)?)
    }
}

/// Where a manager finds its sources and which languages it loads.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct I18nConfig {
    /// Dotted namespace, e.g. `org.example`, mapped to `assets/org/example`.
    pub domain: String,
    pub app_id: String,
    /// Override root; files live at `<data_folder>/langs/<id>.lang`.
    pub data_folder: PathBuf,
    #[serde(default)]
    pub assets_root: Option<PathBuf>,
    #[serde(default)]
    pub langs: Vec<LangConfig>,
    #[serde(default)]
    pub fallback_lang: Option<LangConfig>,
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            domain: "app".to_string(),
            app_id: "app".to_string(),
            data_folder: PathBuf::from("data"),
            assets_root: None,
            langs: Vec::new(),
            fallback_lang: None,
        }
    }
}

impl I18nConfig {
    pub fn langs(&self) -> I18nResult<Vec<Lang>> {
        self.langs.iter().map(LangConfig::to_lang).collect()
    }

    pub fn fallback_lang(&self) -> I18nResult<Option<Lang>> {
        self.fallback_lang.as_ref().map(LangConfig::to_lang).transpose()
    }
}

/// Reads a TOML config, or JSON when the file ends in `.json`.
pub fn load_config(path: &Path) -> I18nResult<I18nConfig> {
    let contents = fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let config: I18nConfig = if is_json {
        serde_json::from_str(&contents)?
    } else {
        toml::from_str(&contents)?
    };
    Ok(config)
}

pub fn load_config_or_default(path: &Path) -> I18nResult<I18nConfig> {
    if path.exists() {
        load_config(path)
    } else {
        Ok(I18nConfig::default())
    }
}
