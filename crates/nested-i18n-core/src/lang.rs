use alloc::borrow::Cow;
use core::fmt;
use core::hash::{Hash, Hasher};

use crate::{CoreError, CoreResult};

/// A language a message set can be loaded for.
///
/// Two languages are equal when their ids are equal; the display name is
/// informational only. Ids are compared case-sensitively.
#[derive(Clone, Debug)]
pub struct Lang {
    id: Cow<'static, str>,
    display_name: Cow<'static, str>,
    sentinel: bool,
}

/// Routing value meaning "use the formatter's configured fallback language".
///
/// Never stored; formatters substitute their own fallback wherever it appears.
pub const FALLBACK: Lang = Lang {
    id: Cow::Borrowed("default"),
    display_name: Cow::Borrowed("Default"),
    sentinel: true,
};

impl Lang {
    pub fn new(id: impl Into<Cow<'static, str>>, display_name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            sentinel: false,
        }
    }

    pub fn try_new(
        id: impl Into<Cow<'static, str>>,
        display_name: impl Into<Cow<'static, str>>,
    ) -> CoreResult<Self> {
        let lang = Self::new(id, display_name);
        if lang.id.trim().is_empty() {
            return Err(CoreError::InvalidInput("language id is empty"));
        }
        Ok(lang)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn is_fallback(&self) -> bool {
        self.sentinel
    }
}

impl PartialEq for Lang {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Lang {}

impl Hash for Lang {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}
