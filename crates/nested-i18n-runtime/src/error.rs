use std::fmt;

use nested_i18n_core::{CoreError, Lang};
use thiserror::Error;

use crate::message::Message;

#[derive(Debug, Error)]
pub enum I18nError {
    #[error("language {lang} is already loaded")]
    LocaleAlreadyExists { lang: Lang },
    #[error("invalid message ids for language {lang}: {}", .keys.join(", "))]
    IllegalKey { lang: Lang, keys: Vec<String> },
    #[error("no template found | langs: [{}] | {target}", join_langs(.langs))]
    LocaleNotFound { langs: Vec<Lang>, target: MissingTarget },
    #[error("reference depth {depth} exceeded while expanding {id}")]
    ReferenceDepthExceeded { id: String, depth: usize },
    #[error("expansion limit {limit} exceeded while expanding {id}")]
    ExpansionLimitExceeded { id: String, limit: usize },
    #[error("the fallback sentinel cannot be stored")]
    ReservedLang,
    #[error("core error: {0}")]
    Core(#[from] CoreError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type I18nResult<T> = Result<T, I18nError>;

/// What a strict resolution was asked for when it came up empty.
#[derive(Debug, Clone)]
pub enum MissingTarget {
    Id(String),
    Message(Box<Message>),
}

impl fmt::Display for MissingTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingTarget::Id(id) => write!(f, "id: {id}"),
            MissingTarget::Message(message) => write!(f, "message: {message}"),
        }
    }
}

impl I18nError {
    pub(crate) fn id_not_found(langs: &[Lang], id: &str) -> Self {
        I18nError::LocaleNotFound {
            langs: langs.to_vec(),
            target: MissingTarget::Id(id.to_string()),
        }
    }

    pub(crate) fn message_not_found(langs: &[Lang], message: &Message) -> Self {
        I18nError::LocaleNotFound {
            langs: langs.to_vec(),
            target: MissingTarget::Message(Box::new(message.clone())),
        }
    }
}

fn join_langs(langs: &[Lang]) -> String {
    langs
        .iter()
        .map(Lang::id)
        .collect::<Vec<_>>()
        .join(", ")
}
