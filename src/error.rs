//! Error types for the optics engine.
//!
//! Every fallible operation in this crate returns [`Result`]. There is no
//! recovery and no retrying anywhere: operations are pure, so invoking one
//! again with unchanged inputs reproduces the same failure. Correctness is
//! the caller's responsibility - check kinds before operating, implement
//! the hooks your types need, and prefer `preview` over `view` where zero
//! foci are possible.

use crate::kind::{Kind, KindSet};

/// The unified error type for all optics operations.
///
/// # Examples
///
/// ```
/// use refract::error::OpticError;
/// use refract::kind::Kind;
///
/// let error = OpticError::KindMismatch {
///     operation: "view",
///     required: Kind::Fold,
/// };
/// assert_eq!(
///     format!("{error}"),
///     "view requires an optic of kind Fold"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpticError {
    /// An operation was invoked on an optic lacking the required
    /// capability. Detected before any traversal takes place.
    KindMismatch {
        /// The name of the operation that was attempted.
        operation: &'static str,
        /// The capability the operation requires.
        required: Kind,
    },
    /// Two optics with no shared capability were composed. Raised at
    /// composition time, never deferred to first use.
    InvalidComposition {
        /// Capabilities of the left-hand optic.
        left: KindSet,
        /// Capabilities of the right-hand optic.
        right: KindSet,
    },
    /// `view` found no focus. `preview` and `to_list` never fail this way.
    NoFocus,
    /// `iterate` was supplied fewer replacement values than foci.
    ValuesExhausted,
    /// No hook implementation could be resolved for a host type.
    NotImplemented {
        /// The hook that could not be resolved.
        hook: &'static str,
        /// The host type the resolution was attempted for.
        type_name: &'static str,
    },
    /// A value had a different host type than an operation expected.
    TypeMismatch {
        /// The host type that was expected.
        expected: &'static str,
        /// The host type that was found.
        found: &'static str,
    },
    /// A mapping key was absent.
    KeyMissing(String),
    /// A named field was absent.
    FieldMissing(String),
    /// A sequence index was out of range.
    IndexOutOfRange {
        /// The requested index (negative indices address from the back).
        index: i64,
        /// The length of the sequence.
        len: usize,
    },
    /// A bounded recursive traversal descended past its depth limit.
    RecursionLimit(usize),
    /// A value could not be converted between host representations.
    Conversion(String),
}

impl std::fmt::Display for OpticError {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::KindMismatch {
                operation,
                required,
            } => {
                write!(
                    formatter,
                    "{operation} requires an optic of kind {required}"
                )
            }
            Self::InvalidComposition { left, right } => {
                write!(
                    formatter,
                    "cannot compose optics with no shared capability: {left} and {right}"
                )
            }
            Self::NoFocus => write!(formatter, "no focus to view"),
            Self::ValuesExhausted => {
                write!(formatter, "iterate ran out of replacement values")
            }
            Self::NotImplemented { hook, type_name } => {
                write!(formatter, "no {hook} implementation for {type_name}")
            }
            Self::TypeMismatch { expected, found } => {
                write!(formatter, "expected a {expected}, found a {found}")
            }
            Self::KeyMissing(key) => write!(formatter, "key {key} is absent"),
            Self::FieldMissing(field) => {
                write!(formatter, "field {field} is absent")
            }
            Self::IndexOutOfRange { index, len } => {
                write!(
                    formatter,
                    "index {index} is out of range for length {len}"
                )
            }
            Self::RecursionLimit(limit) => {
                write!(formatter, "recursive traversal exceeded depth {limit}")
            }
            Self::Conversion(message) => write!(formatter, "{message}"),
        }
    }
}

impl std::error::Error for OpticError {}

/// The result type used throughout the crate.
pub type Result<T> = std::result::Result<T, OpticError>;
