//! Optics: composable descriptions of where foci live inside a state.
//!
//! [`Optic`] is the single optic type; the functions in this module
//! build the common shapes. What an optic can do is governed by its
//! [`crate::kind::Kind`]s, and composition intersects capabilities, so
//! a lens composed with a prism acts as a traversal and a fold composed
//! with a write-only setter is rejected outright.
//!
//! # Examples
//!
//! Renaming a map entry through a composed chain:
//!
//! ```
//! use refract::optics::{index, item};
//! use refract::val;
//!
//! let severity = index("alerts").compose(&item("warn")).unwrap();
//! let state = val!({"alerts" => {"warn" => 3, "error" => 1}});
//! let renamed = severity.set(&state, val!(("warning", 3))).unwrap();
//! assert_eq!(
//!     renamed,
//!     val!({"alerts" => {"error" => 1, "warning" => 3}}),
//! );
//! ```

mod iso;
mod lens;
mod optic;
mod prism;
mod traversal;

pub use iso::{decode_utf8, normalising};
pub use lens::{contains, field, index, index_or, item, item_by_value, tuple_of};
pub use optic::{BuildFn, FolderFn, GetFn, Optic, PackFn, SetFn, UnpackFn};
pub use prism::{filtered, just, of_type};
pub use traversal::{both, each, items, recur, recur_bounded, values};
