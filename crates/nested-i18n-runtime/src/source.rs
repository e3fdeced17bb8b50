use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use nested_i18n_core::Lang;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("io error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("no bundled resource at {0}")]
    Missing(String),
}

/// Supplies the raw `.lang` bytes for a language.
///
/// Failures are reported to the store, which logs them and moves on.
pub trait ResourceProvider: Send + Sync {
    /// Human-readable location used in log output.
    fn location(&self, lang: &Lang) -> String;

    fn fetch(&self, lang: &Lang) -> Result<Vec<u8>, ResourceError>;
}

/// `assets/<domain as path>/<app_id>/langs/<lang>.lang`
pub fn asset_path(domain: &str, app_id: &str, lang: &Lang) -> String {
    format!(
        "assets/{}/{}/langs/{}.lang",
        domain.replace('.', "/"),
        app_id,
        lang.id()
    )
}

/// `langs/<lang>.lang`, relative to a data folder.
pub fn override_path(lang: &Lang) -> String {
    format!("langs/{}.lang", lang.id())
}

/// Resources shipped inside the binary, keyed by asset path.
#[derive(Debug, Clone, Default)]
pub struct BundledResources {
    domain: String,
    app_id: String,
    files: BTreeMap<String, Vec<u8>>,
}

impl BundledResources {
    pub fn new(domain: impl Into<String>, app_id: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            app_id: app_id.into(),
            files: BTreeMap::new(),
        }
    }

    /// Registers a file under its full asset path.
    pub fn insert(&mut self, path: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.files.insert(path.into(), bytes.into());
    }

    /// Registers the source for `lang` at the conventional asset path.
    pub fn insert_lang(&mut self, lang: &Lang, bytes: impl Into<Vec<u8>>) {
        let path = asset_path(&self.domain, &self.app_id, lang);
        self.insert(path, bytes);
    }

    pub fn with_lang(mut self, lang: &Lang, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert_lang(lang, bytes);
        self
    }
}

impl ResourceProvider for BundledResources {
    fn location(&self, lang: &Lang) -> String {
        format!("bundled:{}", asset_path(&self.domain, &self.app_id, lang))
    }

    fn fetch(&self, lang: &Lang) -> Result<Vec<u8>, ResourceError> {
        let path = asset_path(&self.domain, &self.app_id, lang);
        self.files
            .get(&path)
            .cloned()
            .ok_or(ResourceError::Missing(path))
    }
}

#[derive(Debug, Clone)]
enum FileLayout {
    Assets { domain: String, app_id: String },
    DataFolder,
}

/// `.lang` files read from disk under a root directory.
#[derive(Debug, Clone)]
pub struct FileResources {
    root: PathBuf,
    layout: FileLayout,
}

impl FileResources {
    pub fn assets(root: impl Into<PathBuf>, domain: impl Into<String>, app_id: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            layout: FileLayout::Assets {
                domain: domain.into(),
                app_id: app_id.into(),
            },
        }
    }

    pub fn data_folder(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            layout: FileLayout::DataFolder,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, lang: &Lang) -> PathBuf {
        let relative = match &self.layout {
            FileLayout::Assets { domain, app_id } => asset_path(domain, app_id, lang),
            FileLayout::DataFolder => override_path(lang),
        };
        self.root.join(relative)
    }
}

impl ResourceProvider for FileResources {
    fn location(&self, lang: &Lang) -> String {
        self.path_for(lang).display().to_string()
    }

    fn fetch(&self, lang: &Lang) -> Result<Vec<u8>, ResourceError> {
        let path = self.path_for(lang);
        fs::read(&path).map_err(|source| ResourceError::Io {
            path: path.display().to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{BundledResources, FileResources, ResourceError, ResourceProvider, asset_path};
    use nested_i18n_core::Lang;
    use std::fs;

    fn en() -> Lang {
        Lang::new("en", "English")
    }

    #[test]
    fn asset_path_expands_domain() {
        assert_eq!(
            asset_path("org.example", "demo", &en()),
            "assets/org/example/demo/langs/en.lang"
        );
    }

    #[test]
    fn bundled_fetches_by_lang() {
        let bundled = BundledResources::new("org.example", "demo").with_lang(&en(), "a=b");
        assert_eq!(bundled.fetch(&en()).expect("fetch"), b"a=b");
        let err = bundled
            .fetch(&Lang::new("fr", "French"))
            .expect_err("missing");
        assert!(matches!(err, ResourceError::Missing(path) if path.ends_with("fr.lang")));
    }

    #[test]
    fn data_folder_reads_override_file() {
        let dir = tempfile::tempdir().expect("dir");
        fs::create_dir_all(dir.path().join("langs")).expect("langs");
        fs::write(dir.path().join("langs/en.lang"), "greeting=Hi").expect("write");

        let files = FileResources::data_folder(dir.path());
        assert_eq!(files.fetch(&en()).expect("fetch"), b"greeting=Hi");
        assert!(files.fetch(&Lang::new("de", "German")).is_err());
    }

    #[test]
    fn assets_layout_uses_asset_path() {
        let files = FileResources::assets("/srv", "org.example", "demo");
        assert_eq!(
            files.path_for(&en()),
            std::path::Path::new("/srv/assets/org/example/demo/langs/en.lang")
        );
    }
}
