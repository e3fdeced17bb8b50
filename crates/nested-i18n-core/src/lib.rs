#![no_std]
#![forbid(unsafe_code)]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod entry;
mod error;
mod lang;
mod template;
mod validator;

pub use entry::Entry;
pub use error::{CoreError, CoreResult};
pub use lang::{FALLBACK, Lang};
pub use template::{ReferenceMarker, arg_marker, find_reference, normalize_escapes};
pub use validator::{invalid_ids, is_valid_id, is_valid_ids};
