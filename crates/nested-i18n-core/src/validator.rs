use alloc::string::{String, ToString};
use alloc::vec::Vec;

/// Message ids are `[a-z0-9][a-zA-Z0-9]*`: ASCII alphanumerics, not starting
/// with an uppercase letter.
pub fn is_valid_id(id: &str) -> bool {
    let mut bytes = id.bytes();
    let Some(first) = bytes.next() else {
        return false;
    };
    is_id_start(first) && bytes.all(is_id_continue)
}

pub fn is_valid_ids<I, S>(ids: I) -> bool
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    ids.into_iter().all(|id| is_valid_id(id.as_ref()))
}

/// Returns every id that fails validation, in iteration order.
pub fn invalid_ids<I, S>(ids: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    ids.into_iter()
        .filter(|id| !is_valid_id(id.as_ref()))
        .map(|id| id.as_ref().to_string())
        .collect()
}

pub(crate) fn is_id_start(byte: u8) -> bool {
    byte.is_ascii_lowercase() || byte.is_ascii_digit()
}

pub(crate) fn is_id_continue(byte: u8) -> bool {
    byte.is_ascii_alphanumeric()
}
