//! The [`Optional`] container

use std::any::Any;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::{NullPayloadError, UnsupportedTypeError};
use crate::payload::Payload;
use crate::ty::{self, Describe, Ty};

/// An explicit optional value.
///
/// Either holds a payload or is empty; there is no third state and no
/// sentinel. The representation is private so a present value always went
/// through construction validation: [`Optional::of`] rejects a payload
/// that is its type's absence representation, and the [`Payload`] bound
/// keeps wrapper types (an `Optional` or a native [`Option`]) out
/// entirely, so "no value" has exactly one representation.
///
/// The default value is the empty state, for any `T` and without any
/// constructor running. Instances are immutable once built.
#[derive(Clone, Copy)]
#[must_use]
pub struct Optional<T> {
    state: State<T>,
}

#[derive(Clone, Copy)]
enum State<T> {
    Present(T),
    Empty,
}

impl<T> Default for Optional<T> {
    fn default() -> Self {
        Self {
            state: State::Empty,
        }
    }
}

impl<T> Optional<T> {
    /// Constructor bypassing validation, for the conversion entry points
    /// that map absence to empty instead of rejecting it.
    pub(crate) fn present(value: T) -> Self {
        Self {
            state: State::Present(value),
        }
    }

    pub(crate) fn into_native(self) -> Option<T> {
        match self.state {
            State::Present(value) => Some(value),
            State::Empty => None,
        }
    }

    /// true if this `Optional` holds a value.
    pub fn is_present(&self) -> bool {
        matches!(self.state, State::Present(_))
    }

    /// true if this `Optional` is empty.
    pub fn is_empty(&self) -> bool {
        !self.is_present()
    }
}

impl<T: Payload> Optional<T> {
    /// An option without a value.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates an `Optional` holding `value`.
    ///
    /// Use [`Optional::empty`] for empty options and
    /// [`to_optional`](crate::to_optional) to lift a value that may be
    /// the absence representation.
    pub fn of(value: T) -> Result<Self, NullPayloadError> {
        if value.is_absent() {
            return Err(NullPayloadError::value());
        }

        Ok(Self::present(value))
    }

    /// Run `on_value` with the payload if there is one.
    ///
    /// The callback runs synchronously, at most once. The returned
    /// [`IfContext`] captures the presence state at this call, so the
    /// empty branch of the statement can be chained with
    /// [`IfContext::or_else`].
    pub fn if_present<F: FnOnce(&T)>(&self, on_value: F) -> IfContext {
        if let State::Present(value) = &self.state {
            on_value(value);
        }

        IfContext {
            present: self.is_present(),
        }
    }

    /// Run `on_absent` if this `Optional` is empty.
    pub fn if_absent<F: FnOnce()>(&self, on_absent: F) {
        if let State::Empty = self.state {
            on_absent();
        }
    }

    /// The payload if present, `fallback` otherwise.
    ///
    /// `fallback` is validated against the absence representation in both
    /// branches, so a null fallback is an error even when the payload is
    /// present.
    pub fn coalesce(self, fallback: T) -> Result<T, NullPayloadError> {
        if fallback.is_absent() {
            return Err(NullPayloadError::fallback());
        }

        Ok(match self.state {
            State::Present(value) => value,
            State::Empty => fallback,
        })
    }

    /// The payload if present, the result of `fallback_fn` otherwise.
    ///
    /// `fallback_fn` runs only when empty, at most once. Its result is
    /// validated: producing the absence representation is an error.
    pub fn coalesce_with<F>(self, fallback_fn: F) -> Result<T, NullPayloadError>
    where
        F: FnOnce() -> T,
    {
        match self.state {
            State::Present(value) => Ok(value),
            State::Empty => {
                let value = fallback_fn();
                if value.is_absent() {
                    return Err(NullPayloadError::fallback_result());
                }

                Ok(value)
            }
        }
    }

    /// Equality across `Optional`s of any payload type.
    ///
    /// Optionals of differing payload types are never equal, even when the
    /// payloads would compare equal under a numeric conversion. For
    /// same-type comparisons this is `==`.
    pub fn equals<U: Payload>(&self, other: &Optional<U>) -> bool {
        match (other as &dyn Any).downcast_ref::<Self>() {
            Some(other) => self == other,
            None => false,
        }
    }
}

impl<T: Describe> Optional<T> {
    /// The descriptor of the payload type.
    ///
    /// Fails when the payload type is itself an optional shape, because
    /// the payload type of a nested optional is ambiguous. That situation
    /// cannot be built through [`Optional::of`], but zero-value
    /// construction permits it, so it is checked here at run time against
    /// the closed set of wrapper shapes.
    pub fn value_type() -> Result<Ty, UnsupportedTypeError> {
        let ty = ty::resolve::<T>();
        if ty.shape.is_wrapper() {
            return Err(UnsupportedTypeError::new(ty));
        }

        Ok(ty)
    }
}

/// Continuation of an [`Optional::if_present`] statement.
///
/// An immutable value capturing the presence flag at the time
/// [`Optional::if_present`] was called; it does not observe the `Optional`
/// afterwards.
#[derive(Clone, Copy, Debug)]
pub struct IfContext {
    present: bool,
}

impl IfContext {
    /// Run `on_absent` if the branched-on `Optional` was empty.
    ///
    /// The callback runs synchronously, at most once, so exactly one of
    /// the two callbacks of `if_present(..).or_else(..)` runs.
    pub fn or_else<F: FnOnce()>(self, on_absent: F) {
        if !self.present {
            on_absent();
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Optional<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.state {
            State::Present(value) => {
                f.debug_tuple("Present").field(value).finish()
            }
            State::Empty => f.write_str("Empty"),
        }
    }
}

impl<T: PartialEq> PartialEq for Optional<T> {
    fn eq(&self, other: &Self) -> bool {
        match (&self.state, &other.state) {
            (State::Empty, State::Empty) => true,
            (State::Present(a), State::Present(b)) => a == b,
            _ => false,
        }
    }
}

impl<T: Eq> Eq for Optional<T> {}

/// A present `Optional` is equal to its bare payload; an empty one is
/// equal to nothing.
impl<T: PartialEq> PartialEq<T> for Optional<T> {
    fn eq(&self, other: &T) -> bool {
        match &self.state {
            State::Present(value) => value == other,
            State::Empty => false,
        }
    }
}

/// Comparison against the native absence value: an empty `Optional` is
/// equal to `None`, a present one to `Some` of an equal payload.
impl<T: PartialEq> PartialEq<Option<T>> for Optional<T> {
    fn eq(&self, other: &Option<T>) -> bool {
        match (&self.state, other) {
            (State::Empty, None) => true,
            (State::Present(value), Some(other)) => value == other,
            _ => false,
        }
    }
}

impl<T: Hash> Hash for Optional<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match &self.state {
            State::Present(value) => value.hash(state),
            State::Empty => state.write_u8(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::hash::{DefaultHasher, Hash, Hasher};

    use super::*;
    use crate::ty::TypeShape;

    fn hash_of<T: Hash>(value: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn empty_has_no_value() {
        let opt = Optional::<u32>::empty();

        assert!(opt.is_empty());
        assert!(!opt.is_present());
    }

    #[test]
    fn default_has_no_value() {
        let opt = Optional::<u32>::default();

        assert!(opt.is_empty());
    }

    #[test]
    fn default_has_no_value_for_disallowed_payloads() {
        // Zero-value construction bypasses the payload contract, so this
        // is representable, but inert.
        let opt = Optional::<Option<u32>>::default();

        assert!(opt.is_empty());
    }

    #[test]
    fn of_has_correct_state() {
        let opt = Optional::of(3).unwrap();

        assert!(opt.is_present());
        assert!(!opt.is_empty());
    }

    #[test]
    fn of_null_pointer_is_rejected() {
        let null: *const u32 = std::ptr::null();

        let err = Optional::of(null).unwrap_err();

        assert_eq!(err, NullPayloadError::value());
    }

    #[test]
    fn of_valid_pointer_is_accepted() {
        let value = 7u32;
        let ptr: *const u32 = &value;

        assert!(Optional::of(ptr).unwrap().is_present());
    }

    #[test]
    fn value_action_runs_with_the_payload() {
        let opt = Optional::of(3).unwrap();
        let mut seen = -1;

        opt.if_present(|v| seen = *v);

        assert_eq!(seen, 3);
    }

    #[test]
    fn value_action_does_not_run_when_empty() {
        let opt = Optional::<i32>::empty();
        let mut called = false;

        opt.if_present(|_| called = true);

        assert!(!called);
    }

    #[test]
    fn absent_action_runs_when_empty() {
        let opt = Optional::<i32>::empty();
        let mut called = false;

        opt.if_absent(|| called = true);

        assert!(called);
    }

    #[test]
    fn absent_action_does_not_run_when_present() {
        let opt = Optional::of(3).unwrap();
        let mut called = false;

        opt.if_absent(|| called = true);

        assert!(!called);
    }

    #[test]
    fn exactly_the_value_branch_runs_when_present() {
        let opt = Optional::of(3).unwrap();
        let mut value_ran = false;
        let mut absent_ran = false;

        opt.if_present(|_| value_ran = true)
            .or_else(|| absent_ran = true);

        assert!(value_ran);
        assert!(!absent_ran);
    }

    #[test]
    fn exactly_the_absent_branch_runs_when_empty() {
        let opt = Optional::<i32>::empty();
        let mut value_ran = false;
        let mut absent_ran = false;

        opt.if_present(|_| value_ran = true)
            .or_else(|| absent_ran = true);

        assert!(!value_ran);
        assert!(absent_ran);
    }

    #[test]
    fn empty_coalesces_to_the_fallback() {
        let opt = Optional::<i32>::empty();

        assert_eq!(opt.coalesce(3).unwrap(), 3);
    }

    #[test]
    fn present_does_not_coalesce() {
        let opt = Optional::of(3).unwrap();

        assert_eq!(opt.coalesce(-1).unwrap(), 3);
    }

    #[test]
    fn null_fallback_is_rejected_even_when_present() {
        let value = 7u32;
        let ptr: *const u32 = &value;
        let opt = Optional::of(ptr).unwrap();

        let err = opt.coalesce(std::ptr::null()).unwrap_err();

        assert_eq!(err, NullPayloadError::fallback());
    }

    #[test]
    fn null_fallback_is_rejected_when_empty() {
        let opt = Optional::<*const u32>::empty();

        assert!(opt.coalesce(std::ptr::null()).is_err());
    }

    #[test]
    fn empty_coalesces_with_the_fallback_function() {
        let opt = Optional::<i32>::empty();
        let mut calls = 0;

        let result = opt
            .coalesce_with(|| {
                calls += 1;
                3
            })
            .unwrap();

        assert_eq!(result, 3);
        assert_eq!(calls, 1);
    }

    #[test]
    fn present_never_invokes_the_fallback_function() {
        let opt = Optional::of(3).unwrap();
        let mut called = false;

        let result = opt
            .coalesce_with(|| {
                called = true;
                -1
            })
            .unwrap();

        assert_eq!(result, 3);
        assert!(!called);
    }

    #[test]
    fn null_fallback_function_result_is_rejected() {
        let opt = Optional::<*const u32>::empty();

        let err = opt.coalesce_with(std::ptr::null).unwrap_err();

        assert_eq!(err, NullPayloadError::fallback_result());
        assert!(err.produced_by_fallback());
    }

    #[test]
    fn equal_payloads_are_equal() {
        assert_eq!(Optional::of(3).unwrap(), Optional::of(3).unwrap());
        assert!(!(Optional::of(1).unwrap() != Optional::of(1).unwrap()));
    }

    #[test]
    fn different_payloads_are_not_equal() {
        assert_ne!(Optional::of(1).unwrap(), Optional::of(2).unwrap());
    }

    #[test]
    fn empty_options_are_equal() {
        assert_eq!(Optional::<i32>::empty(), Optional::<i32>::empty());
    }

    #[test]
    fn empty_and_present_are_not_equal() {
        assert_ne!(Optional::<i32>::empty(), Optional::of(3).unwrap());
    }

    #[test]
    fn present_equals_its_bare_value() {
        let opt = Optional::of(3).unwrap();

        assert!(opt == 3);
        assert!(opt != 2);
    }

    #[test]
    fn empty_equals_the_absence_value() {
        let opt = Optional::<i32>::empty();

        assert!(opt == None);
        assert!(Optional::of(3).unwrap() != None);
        assert!(Optional::of(3).unwrap() == Some(3));
    }

    #[test]
    fn same_payload_type_compares_by_value() {
        let a = Optional::of(3i32).unwrap();
        let b = Optional::of(3i32).unwrap();

        assert!(a.equals(&b));
        assert!(!a.equals(&Optional::of(2i32).unwrap()));
        assert!(Optional::<i32>::empty().equals(&Optional::<i32>::empty()));
    }

    #[test]
    fn different_payload_types_are_never_equal() {
        let int = Optional::of(7i32).unwrap();
        let long = Optional::of(7i64).unwrap();

        assert!(!int.equals(&long));
        assert!(!long.equals(&int));
    }

    #[test]
    fn hash_is_consistent_with_equality() {
        assert_eq!(
            hash_of(&Optional::of(3).unwrap()),
            hash_of(&Optional::of(3).unwrap())
        );
        assert_eq!(
            hash_of(&Optional::<i32>::empty()),
            hash_of(&Optional::<i32>::empty())
        );
    }

    #[test]
    fn present_hashes_like_its_payload() {
        assert_eq!(hash_of(&Optional::of(3).unwrap()), hash_of(&3));
    }

    #[test]
    fn value_type_describes_the_payload() {
        let ty = Optional::<u32>::value_type().unwrap();

        assert_eq!(ty.shape, TypeShape::Value);
        assert!(ty.rust_name.contains("u32"));
    }

    #[test]
    fn value_type_rejects_native_option_payloads() {
        let err = Optional::<Option<u32>>::value_type().unwrap_err();

        assert!(err.rust_name().contains("Option"));
    }

    #[test]
    fn value_type_rejects_optional_payloads() {
        assert!(Optional::<Optional<u32>>::value_type().is_err());
    }

    #[test]
    fn debug_renders_the_logical_state() {
        assert_eq!(format!("{:?}", Optional::of(3).unwrap()), "Present(3)");
        assert_eq!(format!("{:?}", Optional::<i32>::empty()), "Empty");
    }
}
