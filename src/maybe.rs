//! An optional value that participates in the typeclass protocol.
//!
//! [`Maybe`] is the cargo [`crate::optics::Optic::preview`] folds with and
//! the interface prisms speak: a prism's unpack returns `Just(focus)` or
//! `Nothing`. As a monoid, `Nothing` is the identity and two `Just`s
//! append their payloads, which is what makes `view` over several foci
//! join them.
//!
//! # Examples
//!
//! ```
//! use refract::maybe::Maybe;
//! use refract::val;
//!
//! let focus = Maybe::just(val!(1));
//! assert_eq!(focus.clone().unwrap_or(val!(0)), val!(1));
//! assert_eq!(Maybe::Nothing.unwrap_or(val!(0)), val!(0));
//! assert!(focus.is_just());
//! ```

use crate::error::Result;
use crate::typeclass;
use crate::value::{downcast, Func, HostValue, Value};

/// An optional [`Value`].
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Maybe {
    /// A present value.
    Just(Value),
    /// No value.
    #[default]
    Nothing,
}

impl Maybe {
    /// Wraps a present value.
    #[must_use]
    pub fn just(value: Value) -> Self {
        Self::Just(value)
    }

    /// Whether a value is present.
    #[must_use]
    pub fn is_just(&self) -> bool {
        matches!(self, Self::Just(_))
    }

    /// Whether no value is present.
    #[must_use]
    pub fn is_nothing(&self) -> bool {
        matches!(self, Self::Nothing)
    }

    /// The value, or `default` when nothing is present.
    #[must_use]
    pub fn unwrap_or(self, default: Value) -> Value {
        match self {
            Self::Just(value) => value,
            Self::Nothing => default,
        }
    }

    /// The value as an `Option`.
    #[must_use]
    pub fn into_option(self) -> Option<Value> {
        match self {
            Self::Just(value) => Some(value),
            Self::Nothing => None,
        }
    }

    /// Applies a function to the value, if present.
    pub fn map(self, function: impl FnOnce(Value) -> Result<Value>) -> Result<Self> {
        match self {
            Self::Just(value) => Ok(Self::Just(function(value)?)),
            Self::Nothing => Ok(Self::Nothing),
        }
    }

    /// Monoid append: `Nothing` is the identity; two present values
    /// append their payloads.
    pub fn append(self, other: Self) -> Result<Self> {
        match (self, other) {
            (Self::Nothing, other) => Ok(other),
            (this, Self::Nothing) => Ok(this),
            (Self::Just(left), Self::Just(right)) => {
                Ok(Self::Just(typeclass::mappend(&left, &right)?))
            }
        }
    }
}

impl HostValue for Maybe {
    fn type_name(&self) -> &'static str {
        "maybe"
    }

    fn dyn_eq(&self, other: &dyn HostValue) -> bool {
        downcast::<Self>(other).is_some_and(|other| self == other)
    }

    fn to_iterable(&self) -> Option<Result<Vec<Value>>> {
        Some(Ok(match self {
            Self::Just(value) => vec![value.clone()],
            Self::Nothing => Vec::new(),
        }))
    }

    // Rebuilding keeps at most the first element, mirroring the
    // zero-or-one shape.
    fn from_iterable(&self, values: Vec<Value>) -> Option<Result<Value>> {
        Some(Ok(Value::new(match values.into_iter().next() {
            Some(value) => Self::Just(value),
            None => Self::Nothing,
        })))
    }

    fn monoid_empty(&self) -> Option<Result<Value>> {
        Some(Ok(Value::new(Self::Nothing)))
    }

    fn monoid_append(&self, other: &Value) -> Option<Result<Value>> {
        let other = match other.downcast_ref::<Self>() {
            Some(other) => other.clone(),
            None => {
                return Some(Err(crate::error::OpticError::TypeMismatch {
                    expected: "maybe",
                    found: other.type_name(),
                }));
            }
        };
        Some(self.clone().append(other).map(Value::new))
    }

    fn functor_map(
        &self,
        function: &dyn Fn(Value) -> Result<Value>,
    ) -> Option<Result<Value>> {
        Some(self.clone().map(function).map(Value::new))
    }

    fn applicative_pure(&self, item: Value) -> Option<Result<Value>> {
        Some(Ok(Value::new(Self::Just(item))))
    }

    fn applicative_apply(&self, functions: &Value) -> Option<Result<Value>> {
        let functions = match functions.downcast_ref::<Self>() {
            Some(functions) => functions,
            None => {
                return Some(Err(crate::error::OpticError::TypeMismatch {
                    expected: "maybe",
                    found: functions.type_name(),
                }));
            }
        };
        Some(match (self, functions) {
            (Self::Just(value), Self::Just(function)) => {
                match function.downcast_ref::<Func>() {
                    Some(function) => {
                        function.call(value.clone()).map(|result| {
                            Value::new(Self::Just(result))
                        })
                    }
                    None => Err(crate::error::OpticError::TypeMismatch {
                        expected: "function",
                        found: function.type_name(),
                    }),
                }
            }
            _ => Ok(Value::new(Self::Nothing)),
        })
    }
}

impl From<Maybe> for Value {
    fn from(value: Maybe) -> Self {
        Self::new(value)
    }
}

impl From<Option<Value>> for Maybe {
    fn from(value: Option<Value>) -> Self {
        match value {
            Some(value) => Self::Just(value),
            None => Self::Nothing,
        }
    }
}
