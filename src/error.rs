//! The two failure kinds of the crate
//!
//! Both signal caller bugs, never transient conditions. Nothing here is
//! retried or handled internally; every fallible call returns the error to
//! whatever code composes it.

use std::fmt::Display;

use crate::ty::{Ty, TypeShape};

/// A wrapper shape was used where a payload type is required.
///
/// Raised on the introspection path when the payload type of an
/// [`Optional`](crate::Optional) turns out to be an optional itself, so
/// that "the payload type" has no unambiguous answer. Not retryable: the
/// caller's type choice has to change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnsupportedTypeError {
    ty: Ty,
}

impl UnsupportedTypeError {
    pub(crate) fn new(ty: Ty) -> Self {
        Self { ty }
    }

    /// The full Rust name of the offending type.
    pub fn rust_name(&self) -> &'static str {
        self.ty.rust_name
    }
}

impl Display for UnsupportedTypeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.ty.shape {
            TypeShape::Optional(_) => write!(
                f,
                "`{}` cannot be a payload type: an optional cannot hold \
                 another optional",
                self.ty.rust_name
            ),
            TypeShape::NativeOption(_) => write!(
                f,
                "`{}` cannot be a payload type: convert the native option \
                 with `to_optional` instead",
                self.ty.rust_name
            ),
            TypeShape::Value => write!(
                f,
                "`{}` cannot be a payload type",
                self.ty.rust_name
            ),
        }
    }
}

impl std::error::Error for UnsupportedTypeError {}

/// A value that had to be present was the absence representation.
///
/// The origin distinguishes a rejected argument (constructor payload,
/// coalesce fallback) from a rejected result (a coalesce fallback closure
/// that produced the absence representation). Always a caller bug.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NullPayloadError {
    origin: NullOrigin,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum NullOrigin {
    Value,
    Fallback,
    FallbackResult,
}

impl NullPayloadError {
    pub(crate) fn value() -> Self {
        Self {
            origin: NullOrigin::Value,
        }
    }

    pub(crate) fn fallback() -> Self {
        Self {
            origin: NullOrigin::Fallback,
        }
    }

    pub(crate) fn fallback_result() -> Self {
        Self {
            origin: NullOrigin::FallbackResult,
        }
    }

    /// Whether the error was caused by a produced value rather than an
    /// argument.
    pub fn produced_by_fallback(&self) -> bool {
        self.origin == NullOrigin::FallbackResult
    }
}

impl Display for NullPayloadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.origin {
            NullOrigin::Value => {
                write!(f, "payload is the absence representation")
            }
            NullOrigin::Fallback => {
                write!(f, "coalesce fallback is the absence representation")
            }
            NullOrigin::FallbackResult => write!(
                f,
                "coalesce fallback function produced the absence \
                 representation"
            ),
        }
    }
}

impl std::error::Error for NullPayloadError {}
