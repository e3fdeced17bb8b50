#![forbid(unsafe_code)]

mod chain;
mod config;
mod error;
mod formatter;
mod lang_source;
mod manager;
mod message;
mod source;
mod store;

pub use crate::chain::FormatterChain;
pub use crate::config::{I18nConfig, LangConfig, load_config, load_config_or_default};
pub use crate::error::{I18nError, I18nResult, MissingTarget};
pub use crate::formatter::{Formatter, MAX_EXPANSIONS, MAX_REFERENCE_DEPTH};
pub use crate::lang_source::{SourceEntry, SourceError, parse_lang_source, parse_lang_templates};
pub use crate::manager::I18nManager;
pub use crate::message::{Arg, Composite, Decoration, Leaf, Message};
pub use crate::source::{
    BundledResources, FileResources, ResourceError, ResourceProvider, asset_path, override_path,
};
pub use crate::store::EntryStore;
pub use nested_i18n_core::{Entry, FALLBACK, Lang, is_valid_id, is_valid_ids};
