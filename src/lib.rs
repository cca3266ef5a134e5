//! # refract
//!
//! A dynamic optics engine: composable lenses, prisms and traversals
//! over extensible host data.
//!
//! ## Overview
//!
//! Optics describe *where* values of interest (foci) live inside a
//! larger immutable state, independently of *what* you want to do with
//! them. One description answers reads, copy-on-write updates and
//! existence checks alike:
//!
//! - **Lenses** focus exactly one value: an element, a field, a map
//!   entry.
//! - **Prisms** focus at most one value and pass missed states through.
//! - **Traversals** focus any number of values at once.
//! - **Isomorphisms** convert losslessly between two representations.
//!
//! Optics compose with [`optics::Optic::compose`]: the foci of the left
//! optic become the states of the right one. Every optic carries a set
//! of capabilities ([`kind::Kind`]); composition intersects them, and
//! each operation checks for the capability it needs up front.
//!
//! States are dynamic [`value::Value`]s. Any type implementing
//! [`value::HostValue`] participates, either through the trait's
//! instance hooks or through the registries in [`hooks`] and
//! [`typeclass`].
//!
//! ## Example
//!
//! ```rust
//! use refract::prelude::*;
//!
//! let state = val!({"scores" => [1, 2, 3]});
//! let scores = index("scores").compose(&each()).unwrap();
//!
//! assert_eq!(
//!     scores.to_list(&state).unwrap(),
//!     vec![val!(1), val!(2), val!(3)],
//! );
//! assert_eq!(
//!     scores
//!         .over(&state, |n| Ok(val!(n.as_int().unwrap() * 10)))
//!         .unwrap(),
//!     val!({"scores" => [10, 20, 30]}),
//! );
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::redundant_closure_for_method_calls)]

/// Prelude module for convenient imports.
///
/// Re-exports the optic constructors, the value model, and the `val!`
/// macro.
///
/// # Usage
///
/// ```rust
/// use refract::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{OpticError, Result};
    pub use crate::kind::{Kind, KindSet};
    pub use crate::maybe::Maybe;
    pub use crate::optics::*;
    pub use crate::val;
    pub use crate::value::{HostValue, Map, Record, Set, Tuple, Unit, Value};
}

pub mod error;
mod functor;
pub mod hooks;
pub mod kind;
pub mod maybe;
pub mod optics;
pub mod typeclass;
pub mod value;
