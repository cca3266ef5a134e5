//! The focus-carrying wrappers behind every optic operation.
//!
//! An optic is run by handing it a [`Functorisor`]: a pair of closures
//! producing a [`Wrap`] around each focus. Setter-like operations use the
//! [`Wrap::Identity`] side, which carries replacement values back up
//! through the structure; fold-like operations use [`Wrap::Const`], which
//! ignores rebuilding and accumulates a monoidal cargo instead. Carrying
//! `pure` alongside `call` is what lets an optic with zero foci (an empty
//! traversal, a missed prism) still produce a wrapper of the right side.

use std::rc::Rc;

use smallvec::SmallVec;

use crate::error::{OpticError, Result};
use crate::typeclass;
use crate::value::Value;

/// A value inside one of the two functors the engine runs optics with.
#[derive(Debug, Clone)]
pub(crate) enum Wrap {
    /// The rebuild side: holds a piece of new state.
    Identity(Value),
    /// The fold side: holds accumulated cargo and ignores rebuilding.
    Const(Value),
}

impl Wrap {
    /// Maps over the rebuild side; cargo passes through untouched.
    pub(crate) fn fmap(
        self,
        function: impl FnOnce(Value) -> Result<Value>,
    ) -> Result<Self> {
        match self {
            Self::Identity(value) => Ok(Self::Identity(function(value)?)),
            Self::Const(cargo) => Ok(Self::Const(cargo)),
        }
    }

    /// Unwraps whichever side is carried.
    pub(crate) fn into_value(self) -> Value {
        match self {
            Self::Identity(value) | Self::Const(value) => value,
        }
    }
}

type WrapFn<'a> = Rc<dyn Fn(&Value) -> Result<Wrap> + 'a>;

/// A focus function paired with the `pure` that matches its wrapper side.
#[derive(Clone)]
pub(crate) struct Functorisor<'a> {
    pure: WrapFn<'a>,
    call: WrapFn<'a>,
}

impl<'a> Functorisor<'a> {
    pub(crate) fn new(
        pure: impl Fn(&Value) -> Result<Wrap> + 'a,
        call: impl Fn(&Value) -> Result<Wrap> + 'a,
    ) -> Self {
        Self {
            pure: Rc::new(pure),
            call: Rc::new(call),
        }
    }

    /// The wrapper for a state with no foci.
    pub(crate) fn pure(&self, state: &Value) -> Result<Wrap> {
        (self.pure)(state)
    }

    /// The wrapper for one focus.
    pub(crate) fn call(&self, focus: &Value) -> Result<Wrap> {
        (self.call)(focus)
    }

    /// A functorisor with the same `pure` but a new focus function.
    /// This is how composition threads an outer optic's functorisor
    /// into an inner one.
    pub(crate) fn with_call(
        &self,
        call: impl Fn(&Value) -> Result<Wrap> + 'a,
    ) -> Self {
        Self {
            pure: Rc::clone(&self.pure),
            call: Rc::new(call),
        }
    }
}

/// One wrapper per focus; most states have only a handful of foci, so
/// the buffer lives on the stack.
pub(crate) type Parts = SmallVec<[Wrap; 8]>;

/// The result of threading several foci through their wrappers at once.
pub(crate) enum Collected {
    /// Rebuild side: the replacement values, in focus order.
    Values(Vec<Value>),
    /// Fold side: the monoidal join of every part's cargo.
    Joined(Value),
}

/// Combines the wrappers of a state's foci. On the rebuild side this
/// collects replacement values positionally for a builder; on the fold
/// side it appends the cargo left to right.
pub(crate) fn multiap(parts: Parts) -> Result<Collected> {
    let mut parts = parts.into_iter();
    let first = parts
        .next()
        .ok_or_else(|| internal("multiap over zero parts"))?;
    match first {
        Wrap::Identity(value) => {
            let mut values = vec![value];
            for part in parts {
                match part {
                    Wrap::Identity(value) => values.push(value),
                    Wrap::Const(_) => return Err(internal("mixed functor sides")),
                }
            }
            Ok(Collected::Values(values))
        }
        Wrap::Const(cargo) => {
            let mut joined = cargo;
            for part in parts {
                match part {
                    Wrap::Const(cargo) => {
                        joined = typeclass::mappend(&joined, &cargo)?;
                    }
                    Wrap::Identity(_) => {
                        return Err(internal("mixed functor sides"));
                    }
                }
            }
            Ok(Collected::Joined(joined))
        }
    }
}

fn internal(message: &str) -> OpticError {
    OpticError::Conversion(message.to_string())
}
