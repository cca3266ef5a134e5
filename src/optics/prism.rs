//! Prism constructors: optics over at most one focus.
//!
//! A prism either focuses the whole state or misses it; setter
//! operations pass a missed state through unchanged. Composed after a
//! traversal, a prism restricts which foci the traversal visits rather
//! than filtering them out of the state.

use crate::error::{OpticError, Result};
use crate::maybe::Maybe;
use crate::value::{HostValue, Value};

use super::optic::Optic;

/// A prism focusing the state only when `predicate` holds for it.
///
/// The predicate runs before any manipulation, so a modifying function
/// is free to produce values that violate it:
///
/// ```
/// use refract::optics::{each, filtered};
/// use refract::val;
///
/// let truthy = each().compose(&filtered(|v| Ok(v.truthy()))).unwrap();
/// let state = val!([0, 1, "", "hi"]);
/// assert_eq!(
///     truthy.to_list(&state).unwrap(),
///     vec![val!(1), val!("hi")],
/// );
/// assert_eq!(
///     truthy.set(&state, val!(2)).unwrap(),
///     val!([0, 2, "", 2]),
/// );
/// ```
pub fn filtered(
    predicate: impl Fn(&Value) -> Result<bool> + Send + Sync + 'static,
) -> Optic {
    Optic::prism(
        move |state| {
            Ok(if predicate(state)? {
                Maybe::just(state.clone())
            } else {
                Maybe::Nothing
            })
        },
        Ok,
    )
}

/// A prism focusing the state only when its host type is `T`.
///
/// ```
/// use refract::optics::{each, of_type};
/// use refract::val;
///
/// let ints = each().compose(&of_type::<i64>()).unwrap();
/// let state = val!([1, "two", 3]);
/// assert_eq!(ints.to_list(&state).unwrap(), vec![val!(1), val!(3)]);
/// assert_eq!(ints.set(&state, val!(0)).unwrap(), val!([0, "two", 0]));
/// ```
#[must_use]
pub fn of_type<T: HostValue>() -> Optic {
    filtered(|state| Ok(state.is::<T>()))
}

/// A prism focusing the payload of a [`Maybe::Just`]; `Nothing` passes
/// by untouched.
///
/// ```
/// use refract::maybe::Maybe;
/// use refract::optics::just;
/// use refract::val;
/// use refract::value::Value;
///
/// let state = Value::new(Maybe::just(val!(1)));
/// assert_eq!(just().to_list(&state).unwrap(), vec![val!(1)]);
/// assert_eq!(
///     just().set(&state, val!(2)).unwrap(),
///     Value::new(Maybe::just(val!(2))),
/// );
/// assert_eq!(just().to_list(&Value::new(Maybe::Nothing)).unwrap(), vec![]);
/// ```
#[must_use]
pub fn just() -> Optic {
    Optic::prism(
        |state| {
            state
                .downcast_ref::<Maybe>()
                .cloned()
                .ok_or(OpticError::TypeMismatch {
                    expected: "maybe",
                    found: state.type_name(),
                })
        },
        |focus| Ok(Value::new(Maybe::just(focus))),
    )
}
