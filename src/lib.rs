// Needed for the presence macros
extern crate self as presence;

mod convert;
mod error;
mod optional;
mod payload;
mod ty;

pub use convert::{from_native, to_native, to_object, to_optional};
pub use error::{NullPayloadError, UnsupportedTypeError};
pub use optional::{IfContext, Optional};
pub use payload::{Nullable, Payload};
pub use presence_macros::Payload;
pub use ty::{Describe, Ty, TypeRegistry, TypeShape};
