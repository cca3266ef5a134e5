//! The optic type, its operations, and composition.
//!
//! Every optic - lens, prism, traversal, iso, getter, fold, review -
//! is a [`Optic`] value: a shape describing how to reach foci, paired
//! with the set of capabilities ([`crate::kind::KindSet`]) that shape
//! grants. Operations check capabilities eagerly and run the shape
//! against a focus-carrying functor (see [`crate::functor`]), so a
//! single description answers both "read" and "rebuild" questions.
//!
//! # Examples
//!
//! ```
//! use refract::optics::index;
//! use refract::val;
//!
//! let first = index(0);
//! assert_eq!(first.view(&val!([1, 2, 3])).unwrap(), val!(1));
//! assert_eq!(first.set(&val!([1, 2, 3]), val!(9)).unwrap(), val!([9, 2, 3]));
//! ```
//!
//! Composition feeds the foci of the left optic into the right one and
//! intersects their capabilities:
//!
//! ```
//! use refract::optics::index;
//! use refract::val;
//!
//! let inner = index(0).compose(&index(1)).unwrap();
//! let state = val!([[1, 2], [3, 4]]);
//! assert_eq!(inner.view(&state).unwrap(), val!(2));
//! assert_eq!(inner.set(&state, val!(9)).unwrap(), val!([[1, 9], [3, 4]]));
//! ```

use std::cell::RefCell;
use std::fmt;
use std::sync::Arc;

use crate::error::{OpticError, Result};
use crate::functor::{multiap, Collected, Functorisor, Parts, Wrap};
use crate::hooks;
use crate::kind::{Kind, KindSet};
use crate::maybe::Maybe;
use crate::value::{HostValue, Tuple, Value};

/// Reads a focus out of a state.
pub type GetFn = Arc<dyn Fn(&Value) -> Result<Value> + Send + Sync>;
/// Builds a new state from an old state and a replacement focus.
pub type SetFn = Arc<dyn Fn(&Value, Value) -> Result<Value> + Send + Sync>;
/// Wraps a focus up into a state.
pub type PackFn = Arc<dyn Fn(Value) -> Result<Value> + Send + Sync>;
/// Unpacks a state into a focus, possibly failing.
pub type UnpackFn = Arc<dyn Fn(&Value) -> Result<Maybe> + Send + Sync>;
/// Lists every focus in a state, in traversal order.
pub type FolderFn = Arc<dyn Fn(&Value) -> Result<Vec<Value>> + Send + Sync>;
/// Rebuilds a state from replacement foci in folder order.
pub type BuildFn = Arc<dyn Fn(&Value, Vec<Value>) -> Result<Value> + Send + Sync>;

#[derive(Clone)]
enum Shape {
    Trivial,
    Getter { get: GetFn },
    Fold { folder: FolderFn },
    Lens { get: GetFn, set: SetFn },
    Review { pack: PackFn },
    Prism { unpack: UnpackFn, pack: PackFn },
    Iso { forwards: PackFn, backwards: PackFn },
    Traversal { folder: FolderFn, builder: BuildFn },
    Zoom { name: String },
    Forked(Vec<Optic>),
    Composed(Vec<Optic>),
}

/// A composable description of where foci live inside a state.
#[derive(Clone)]
pub struct Optic {
    shape: Shape,
    kinds: KindSet,
}

static_assertions::assert_impl_all!(Optic: Clone, Send, Sync);

// ---------------------------------------------------------------------------
// Constructors
// ---------------------------------------------------------------------------

impl Optic {
    fn from_shape(shape: Shape, kinds: KindSet) -> Self {
        Self { shape, kinds }
    }

    /// The identity optic: focuses the whole state unchanged. It is the
    /// unit of composition and is elided from composed chains.
    #[must_use]
    pub fn identity() -> Self {
        Self::from_shape(Shape::Trivial, Kind::Equality.implied())
    }

    /// A getter from a read function.
    pub fn getter(
        get: impl Fn(&Value) -> Result<Value> + Send + Sync + 'static,
    ) -> Self {
        Self::from_shape(
            Shape::Getter { get: Arc::new(get) },
            Kind::Getter.implied(),
        )
    }

    /// A fold from a folder function listing every focus in a state.
    pub fn fold(
        folder: impl Fn(&Value) -> Result<Vec<Value>> + Send + Sync + 'static,
    ) -> Self {
        Self::from_shape(
            Shape::Fold {
                folder: Arc::new(folder),
            },
            Kind::Fold.implied(),
        )
    }

    /// A lens from a getter and a setter over one mandatory focus.
    pub fn lens(
        get: impl Fn(&Value) -> Result<Value> + Send + Sync + 'static,
        set: impl Fn(&Value, Value) -> Result<Value> + Send + Sync + 'static,
    ) -> Self {
        Self::from_shape(
            Shape::Lens {
                get: Arc::new(get),
                set: Arc::new(set),
            },
            Kind::Lens.implied(),
        )
    }

    /// A review from a pack function that constructs states from foci.
    pub fn review(
        pack: impl Fn(Value) -> Result<Value> + Send + Sync + 'static,
    ) -> Self {
        Self::from_shape(
            Shape::Review {
                pack: Arc::new(pack),
            },
            Kind::Review.implied(),
        )
    }

    /// A prism from an unpack function that may miss and a pack
    /// function that rebuilds.
    pub fn prism(
        unpack: impl Fn(&Value) -> Result<Maybe> + Send + Sync + 'static,
        pack: impl Fn(Value) -> Result<Value> + Send + Sync + 'static,
    ) -> Self {
        Self::from_shape(
            Shape::Prism {
                unpack: Arc::new(unpack),
                pack: Arc::new(pack),
            },
            Kind::Prism.implied(),
        )
    }

    /// An isomorphism from a pair of mutually inverse conversions.
    pub fn iso(
        forwards: impl Fn(Value) -> Result<Value> + Send + Sync + 'static,
        backwards: impl Fn(Value) -> Result<Value> + Send + Sync + 'static,
    ) -> Self {
        Self::from_shape(
            Shape::Iso {
                forwards: Arc::new(forwards),
                backwards: Arc::new(backwards),
            },
            Kind::Isomorphism.implied(),
        )
    }

    /// A traversal from a folder and a builder. The builder receives
    /// exactly as many values as the folder produced for that state.
    pub fn traversal(
        folder: impl Fn(&Value) -> Result<Vec<Value>> + Send + Sync + 'static,
        builder: impl Fn(&Value, Vec<Value>) -> Result<Value> + Send + Sync + 'static,
    ) -> Self {
        Self::from_shape(
            Shape::Traversal {
                folder: Arc::new(folder),
                builder: Arc::new(builder),
            },
            Kind::Traversal.implied(),
        )
    }

    /// A setter that runs several optics over the same state in turn,
    /// left to right. Write-only; every component must itself be able
    /// to set.
    pub fn forked(optics: Vec<Self>) -> Result<Self> {
        for optic in &optics {
            if !optic.is_kind(Kind::Setter) {
                return Err(OpticError::KindMismatch {
                    operation: "forked",
                    required: Kind::Setter,
                });
            }
        }
        Ok(Self::from_shape(Shape::Forked(optics), Kind::Setter.implied()))
    }

    /// A traversal of the named field that follows the field's value
    /// when it is itself an optic: the inner optic is run against the
    /// whole state. A plain value behaves like a field lens.
    #[must_use]
    pub fn zoom_field(name: &str) -> Self {
        Self::from_shape(
            Shape::Zoom {
                name: name.to_string(),
            },
            Kind::Traversal.implied(),
        )
    }
}

// ---------------------------------------------------------------------------
// The dispatcher
// ---------------------------------------------------------------------------

impl Optic {
    fn apply<'a>(&self, f: &Functorisor<'a>, state: &Value) -> Result<Wrap> {
        match &self.shape {
            Shape::Trivial => f.call(state),
            Shape::Getter { get } => {
                let focus = get(state)?;
                let state = state.clone();
                f.call(&focus)?.fmap(move |_| Ok(state))
            }
            Shape::Fold { folder } => {
                let foci = folder(state)?;
                if foci.is_empty() {
                    return f.pure(state);
                }
                let parts: Parts =
                    foci.iter().map(|focus| f.call(focus)).collect::<Result<_>>()?;
                match multiap(parts)? {
                    // A bare fold cannot rebuild; on the rebuild side it
                    // degrades to a tuple of the values, which only kind
                    // misuse can observe.
                    Collected::Values(values) => {
                        Ok(Wrap::Identity(Value::new(Tuple::new(values))))
                    }
                    Collected::Joined(cargo) => Ok(Wrap::Const(cargo)),
                }
            }
            Shape::Lens { get, set } => {
                let focus = get(state)?;
                f.call(&focus)?.fmap(|value| set(state, value))
            }
            Shape::Review { pack } => f.call(state)?.fmap(|value| pack(value)),
            Shape::Prism { unpack, pack } => match unpack(state)? {
                Maybe::Nothing => f.pure(state),
                Maybe::Just(focus) => f.call(&focus)?.fmap(|value| pack(value)),
            },
            Shape::Iso {
                forwards,
                backwards,
            } => f
                .call(&forwards(state.clone())?)?
                .fmap(|value| backwards(value)),
            Shape::Traversal { folder, builder } => {
                let foci = folder(state)?;
                if foci.is_empty() {
                    return f.pure(state);
                }
                let parts: Parts =
                    foci.iter().map(|focus| f.call(focus)).collect::<Result<_>>()?;
                match multiap(parts)? {
                    Collected::Values(values) => {
                        Ok(Wrap::Identity(builder(state, values)?))
                    }
                    Collected::Joined(cargo) => Ok(Wrap::Const(cargo)),
                }
            }
            Shape::Zoom { name } => {
                let attr = hooks::getattr(state, name)?;
                if let Some(optic) = attr.downcast_ref::<Self>() {
                    return optic.apply(f, state);
                }
                let state = state.clone();
                let name = name.clone();
                f.call(&attr)?
                    .fmap(move |value| hooks::setattr(&state, &name, value))
            }
            Shape::Forked(optics) => {
                let mut state = state.clone();
                for optic in optics {
                    state = match optic.apply(f, &state)? {
                        Wrap::Identity(next) => next,
                        Wrap::Const(_) => {
                            return Err(OpticError::KindMismatch {
                                operation: "fork",
                                required: Kind::Setter,
                            });
                        }
                    };
                }
                Ok(Wrap::Identity(state))
            }
            Shape::Composed(parts) => {
                let mut res = f.clone();
                for optic in parts.iter().rev() {
                    let inner = res.clone();
                    let optic = optic.clone();
                    res = res
                        .with_call(move |state| optic.apply(&inner, state));
                }
                res.call(state)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

impl Optic {
    fn require(&self, kind: Kind, operation: &'static str) -> Result<()> {
        if self.kinds.contains_kind(kind) {
            Ok(())
        } else {
            Err(OpticError::KindMismatch {
                operation,
                required: kind,
            })
        }
    }

    /// The focus within `state`. Joins multiple foci as a monoid and
    /// fails with [`OpticError::NoFocus`] when there are none.
    ///
    /// Requires kind `Fold`.
    pub fn view(&self, state: &Value) -> Result<Value> {
        self.require(Kind::Fold, "view")?;
        match self.preview_cargo(state)? {
            Maybe::Just(focus) => Ok(focus),
            Maybe::Nothing => Err(OpticError::NoFocus),
        }
    }

    /// The focus within `state` as a [`Maybe`]: `Nothing` when the
    /// optic focuses nothing there.
    ///
    /// Requires kind `Fold`.
    pub fn preview(&self, state: &Value) -> Result<Maybe> {
        self.require(Kind::Fold, "preview")?;
        self.preview_cargo(state)
    }

    fn preview_cargo(&self, state: &Value) -> Result<Maybe> {
        let f = Functorisor::new(
            |_: &Value| Ok(Wrap::Const(Value::new(Maybe::Nothing))),
            |focus: &Value| Ok(Wrap::Const(Value::new(Maybe::just(focus.clone())))),
        );
        let cargo = self.apply(&f, state)?.into_value();
        cargo
            .downcast_ref::<Maybe>()
            .cloned()
            .ok_or_else(|| OpticError::Conversion("preview cargo was not a maybe".to_string()))
    }

    /// Whether the optic focuses anything within `state`.
    ///
    /// Requires kind `Fold`.
    pub fn has(&self, state: &Value) -> Result<bool> {
        self.require(Kind::Fold, "has")?;
        Ok(self.preview_cargo(state)?.is_just())
    }

    /// Every focus within `state`, in traversal order.
    ///
    /// Requires kind `Fold`.
    pub fn to_list(&self, state: &Value) -> Result<Vec<Value>> {
        self.require(Kind::Fold, "to_list")?;
        let f = Functorisor::new(
            |_: &Value| Ok(Wrap::Const(Value::from(Vec::new()))),
            |focus: &Value| Ok(Wrap::Const(Value::from(vec![focus.clone()]))),
        );
        let cargo = self.apply(&f, state)?.into_value();
        cargo.as_sequence().map(<[Value]>::to_vec).ok_or_else(|| {
            OpticError::Conversion("fold cargo was not a sequence".to_string())
        })
    }

    /// A copy of `state` with `function` applied to every focus.
    ///
    /// Requires kind `Setter`.
    pub fn over(
        &self,
        state: &Value,
        function: impl Fn(&Value) -> Result<Value>,
    ) -> Result<Value> {
        self.require(Kind::Setter, "over")?;
        let f = Functorisor::new(
            |state: &Value| Ok(Wrap::Identity(state.clone())),
            |focus: &Value| Ok(Wrap::Identity(function(focus)?)),
        );
        Ok(self.apply(&f, state)?.into_value())
    }

    /// A copy of `state` with every focus replaced by `value`.
    ///
    /// Requires kind `Setter`.
    pub fn set(&self, state: &Value, value: Value) -> Result<Value> {
        self.require(Kind::Setter, "set")?;
        let f = Functorisor::new(
            |state: &Value| Ok(Wrap::Identity(state.clone())),
            |_: &Value| Ok(Wrap::Identity(value.clone())),
        );
        Ok(self.apply(&f, state)?.into_value())
    }

    /// A copy of `state` with foci replaced positionally from `values`.
    /// Fails with [`OpticError::ValuesExhausted`] when the state has
    /// more foci than values were supplied.
    ///
    /// Requires kind `Setter`.
    pub fn iterate(&self, state: &Value, values: Vec<Value>) -> Result<Value> {
        self.require(Kind::Setter, "iterate")?;
        let queue = RefCell::new(values.into_iter());
        let f = Functorisor::new(
            |state: &Value| Ok(Wrap::Identity(state.clone())),
            |_: &Value| {
                queue
                    .borrow_mut()
                    .next()
                    .map(Wrap::Identity)
                    .ok_or(OpticError::ValuesExhausted)
            },
        );
        Ok(self.apply(&f, state)?.into_value())
    }

    /// Builds a state from a focus by running the optic backwards.
    ///
    /// Requires kind `Review`.
    pub fn construct(&self, focus: &Value) -> Result<Value> {
        self.require(Kind::Review, "construct")?;
        self.re()?.view(focus)
    }

    /// The optic with its two directions swapped.
    ///
    /// Requires kind `Isomorphism`.
    pub fn reverse(&self) -> Result<Self> {
        self.require(Kind::Isomorphism, "reverse")?;
        self.re()
    }

    fn re(&self) -> Result<Self> {
        match &self.shape {
            Shape::Trivial => Ok(self.clone()),
            Shape::Review { pack } | Shape::Prism { pack, .. } => {
                let pack = Arc::clone(pack);
                Ok(Self::getter(move |state| pack(state.clone())))
            }
            Shape::Iso {
                forwards,
                backwards,
            } => Ok(Self::from_shape(
                Shape::Iso {
                    forwards: Arc::clone(backwards),
                    backwards: Arc::clone(forwards),
                },
                Kind::Isomorphism.implied(),
            )),
            Shape::Composed(parts) => {
                let mut reversed = Self::identity();
                for part in parts.iter().rev() {
                    reversed = reversed.compose(&part.re()?)?;
                }
                Ok(reversed)
            }
            _ => Err(OpticError::KindMismatch {
                operation: "re",
                required: Kind::Review,
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Kinds and composition
// ---------------------------------------------------------------------------

impl Optic {
    /// The most specific capability this optic has.
    #[must_use]
    pub fn kind(&self) -> Option<Kind> {
        self.kinds.most_specific()
    }

    /// Every capability this optic has.
    #[must_use]
    pub fn kinds(&self) -> KindSet {
        self.kinds
    }

    /// Whether the optic has capability `kind`.
    #[must_use]
    pub fn is_kind(&self, kind: Kind) -> bool {
        self.kinds.contains_kind(kind)
    }

    /// Composes two optics: the foci of `self` become the states of
    /// `other`. Capabilities intersect; composing optics with no common
    /// capability fails immediately rather than at use time.
    pub fn compose(&self, other: &Self) -> Result<Self> {
        let kinds = self.kinds & other.kinds;
        if kinds.most_specific().is_none() {
            return Err(OpticError::InvalidComposition {
                left: self.kinds,
                right: other.kinds,
            });
        }
        let mut parts = self.flattened();
        parts.extend(other.flattened());
        Ok(match parts.len() {
            0 => Self::identity(),
            // A single-part chain keeps its own kinds; composing with
            // the identity must not widen or narrow them.
            1 => parts.remove(0),
            _ => Self::from_shape(Shape::Composed(parts), kinds),
        })
    }

    // Composed chains stay flat, and the identity vanishes into them.
    fn flattened(&self) -> Vec<Self> {
        match &self.shape {
            Shape::Trivial => Vec::new(),
            Shape::Composed(parts) => parts.clone(),
            _ => vec![self.clone()],
        }
    }
}

impl fmt::Debug for Optic {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.shape {
            Shape::Trivial => formatter.write_str("Identity"),
            Shape::Getter { .. } => formatter.write_str("Getter(..)"),
            Shape::Fold { .. } => formatter.write_str("Fold(..)"),
            Shape::Lens { .. } => formatter.write_str("Lens(..)"),
            Shape::Review { .. } => formatter.write_str("Review(..)"),
            Shape::Prism { .. } => formatter.write_str("Prism(..)"),
            Shape::Iso { .. } => formatter.write_str("Isomorphism(..)"),
            Shape::Traversal { .. } => formatter.write_str("Traversal(..)"),
            Shape::Zoom { name } => write!(formatter, "Zoom({name:?})"),
            Shape::Forked(parts) => {
                formatter.write_str("Forked(")?;
                for (position, part) in parts.iter().enumerate() {
                    if position > 0 {
                        formatter.write_str(", ")?;
                    }
                    part.fmt(formatter)?;
                }
                formatter.write_str(")")
            }
            Shape::Composed(parts) => {
                for (position, part) in parts.iter().enumerate() {
                    if position > 0 {
                        formatter.write_str(" & ")?;
                    }
                    part.fmt(formatter)?;
                }
                Ok(())
            }
        }
    }
}

impl HostValue for Optic {
    fn type_name(&self) -> &'static str {
        "optic"
    }

    // Optics carry closures; two optic values never compare equal.
    fn dyn_eq(&self, _other: &dyn HostValue) -> bool {
        false
    }
}

impl From<Optic> for Value {
    fn from(value: Optic) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optics::{each, index};
    use crate::val;

    #[test]
    fn test_identity_is_the_unit_of_composition() {
        let composed = Optic::identity().compose(&index(0)).unwrap();
        assert_eq!(composed.view(&val!([5])).unwrap(), val!(5));
        assert_eq!(composed.kind(), Some(Kind::Lens));
    }

    #[test]
    fn test_composition_flattens() {
        let left = index(0).compose(&index(1)).unwrap();
        let chained = left.compose(&index(2)).unwrap();
        assert_eq!(format!("{chained:?}"), "Lens(..) & Lens(..) & Lens(..)");
    }

    #[test]
    fn test_incompatible_composition_fails_eagerly() {
        let fold = Optic::fold(|state| {
            Ok(state.as_sequence().map(<[Value]>::to_vec).unwrap_or_default())
        });
        let setter = Optic::forked(vec![index(0)]).unwrap();
        assert!(matches!(
            fold.compose(&setter),
            Err(OpticError::InvalidComposition { .. })
        ));
    }

    #[test]
    fn test_operations_check_kinds() {
        let fold = Optic::fold(|state| {
            Ok(state.as_sequence().map(<[Value]>::to_vec).unwrap_or_default())
        });
        assert!(matches!(
            fold.set(&val!([1]), val!(2)),
            Err(OpticError::KindMismatch {
                operation: "set",
                required: Kind::Setter,
            })
        ));
        let setter = Optic::forked(vec![index(0)]).unwrap();
        assert!(matches!(
            setter.to_list(&val!([1])),
            Err(OpticError::KindMismatch {
                operation: "to_list",
                required: Kind::Fold,
            })
        ));
    }

    #[test]
    fn test_view_joins_multiple_foci() {
        assert_eq!(each().view(&val!([1, 2, 3])).unwrap(), val!(6));
        assert_eq!(
            each().view(&val!(["a", "b"])).unwrap(),
            val!("ab")
        );
    }

    #[test]
    fn test_view_without_focus_fails() {
        assert!(matches!(
            each().view(&val!([])),
            Err(OpticError::NoFocus)
        ));
        assert_eq!(each().preview(&val!([])).unwrap(), Maybe::Nothing);
    }

    #[test]
    fn test_iterate_feeds_foci_in_order() {
        let state = val!([0, 0, 0]);
        let updated = each()
            .iterate(&state, vec![val!(1), val!(2), val!(3)])
            .unwrap();
        assert_eq!(updated, val!([1, 2, 3]));
        assert!(matches!(
            each().iterate(&state, vec![val!(1)]),
            Err(OpticError::ValuesExhausted)
        ));
    }

    #[test]
    fn test_forked_setter_writes_both_branches() {
        let fork = Optic::forked(vec![
            index(0).compose(&index(1)).unwrap(),
            index(2),
        ])
        .unwrap();
        let state = val!([[0, 0], 0, 0]);
        assert_eq!(
            fork.set(&state, val!(1)).unwrap(),
            val!([[0, 1], 0, 1])
        );
    }

    #[test]
    fn test_forked_rejects_components_that_cannot_set() {
        let fold = Optic::fold(|state| {
            Ok(state.as_sequence().map(<[Value]>::to_vec).unwrap_or_default())
        });
        assert!(matches!(
            Optic::forked(vec![index(0), fold]),
            Err(OpticError::KindMismatch {
                operation: "forked",
                required: Kind::Setter,
            })
        ));
        let getter = Optic::getter(|state| Ok(state.clone()));
        assert!(matches!(
            Optic::forked(vec![getter]),
            Err(OpticError::KindMismatch {
                operation: "forked",
                required: Kind::Setter,
            })
        ));
    }

    #[test]
    fn test_zoom_field_follows_stored_optics() {
        let record = crate::value::Record::new(vec![
            ("items", val!([1, 2])),
            ("first", Value::from(Optic::getter(|state| {
                hooks::getattr(state, "items")
                    .and_then(|items| hooks::getitem(&items, &val!(0)))
            }))),
        ]);
        let state = Value::from(record);
        let zoomed = Optic::zoom_field("first");
        assert_eq!(zoomed.view(&state).unwrap(), val!(1));
    }
}
