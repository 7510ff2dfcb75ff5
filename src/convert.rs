//! Bridging [`Optional`] and the native nullable representation
//!
//! The native "value or absence" mechanism in Rust is [`Option`]. The
//! bridge is split in two, one entry point pair per kind of payload:
//! value-like payloads (`Copy`) move through [`from_native`] and
//! [`to_native`], reference-like payloads ([`Nullable`]) through
//! [`to_optional`] and [`to_object`]. Neither pair can fail: absence on
//! the way in becomes the empty `Optional`, absence on the way out becomes
//! the native absence value.

use crate::optional::Optional;
use crate::payload::{Nullable, Payload};

/// Converts a native [`Option`] to an [`Optional`].
///
/// The result is present iff `native` holds a value that is not the
/// absence representation of `T`.
pub fn from_native<T: Payload + Copy>(native: Option<T>) -> Optional<T> {
    match native {
        Some(value) if !value.is_absent() => Optional::present(value),
        _ => Optional::default(),
    }
}

/// Converts an [`Optional`] to a native [`Option`].
pub fn to_native<T: Payload + Copy>(opt: &Optional<T>) -> Option<T> {
    let mut native = None;
    opt.if_present(|value| native = Some(*value));

    native
}

/// Lifts any value into an [`Optional`].
///
/// Unlike [`Optional::of`] this cannot fail: the absence representation
/// maps to the empty `Optional` instead of being rejected.
pub fn to_optional<T: Nullable>(value: T) -> Optional<T> {
    if value.is_null() {
        Optional::default()
    } else {
        Optional::present(value)
    }
}

/// Lowers an [`Optional`] to its payload type.
///
/// The payload if present, [`Nullable::NULL`] otherwise; the inverse of
/// [`to_optional`].
pub fn to_object<T: Nullable>(opt: Optional<T>) -> T {
    match opt.into_native() {
        Some(value) => value,
        None => T::NULL,
    }
}

impl<T: Payload + Copy> From<Option<T>> for Optional<T> {
    fn from(value: Option<T>) -> Self {
        from_native(value)
    }
}

impl<T: Payload + Copy> From<Optional<T>> for Option<T> {
    fn from(value: Optional<T>) -> Self {
        to_native(&value)
    }
}
