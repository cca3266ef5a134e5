//! Single-dispatch typeclass operations over [`Value`]s.
//!
//! The engine needs a handful of algebraic operations on host data it
//! does not know the shape of: monoid `mempty`/`mappend` for joining
//! fold results, functor `fmap`, and applicative `pure`/`apply` for the
//! focus-collection algorithm. Each dispatches on the host type of its
//! first argument in two steps: a process-wide registry override wins,
//! then the type's own instance method ([`crate::value::HostValue`]),
//! and a type providing neither is an error.
//!
//! Registering an override for a third-party host type:
//!
//! ```
//! use refract::typeclass;
//! use refract::value::{downcast, HostValue, Value};
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct Max(i64);
//!
//! impl HostValue for Max {
//!     fn type_name(&self) -> &'static str {
//!         "Max"
//!     }
//!
//!     fn dyn_eq(&self, other: &dyn HostValue) -> bool {
//!         downcast::<Self>(other).is_some_and(|other| self == other)
//!     }
//! }
//!
//! typeclass::register_mappend::<Max>(|left, right| {
//!     let right = right.downcast_ref::<Max>().map_or(i64::MIN, |max| max.0);
//!     Ok(Value::new(Max(left.0.max(right))))
//! });
//!
//! let joined = typeclass::mappend(
//!     &Value::new(Max(3)),
//!     &Value::new(Max(7)),
//! ).unwrap();
//! assert_eq!(joined, Value::new(Max(7)));
//! ```

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use parking_lot::RwLock;

use crate::error::{OpticError, Result};
use crate::value::{HostValue, Value};

type MemptyFn = Arc<dyn Fn(&dyn HostValue) -> Result<Value> + Send + Sync>;
type MappendFn = Arc<dyn Fn(&dyn HostValue, &Value) -> Result<Value> + Send + Sync>;
type FmapFn = Arc<
    dyn Fn(&dyn HostValue, &dyn Fn(Value) -> Result<Value>) -> Result<Value>
        + Send
        + Sync,
>;
type PureFn = Arc<dyn Fn(&dyn HostValue, Value) -> Result<Value> + Send + Sync>;
type ApplyFn = Arc<dyn Fn(&dyn HostValue, &Value) -> Result<Value> + Send + Sync>;

#[derive(Default)]
struct Registry {
    mempty: HashMap<TypeId, MemptyFn>,
    mappend: HashMap<TypeId, MappendFn>,
    fmap: HashMap<TypeId, FmapFn>,
    pure: HashMap<TypeId, PureFn>,
    apply: HashMap<TypeId, ApplyFn>,
}

static REGISTRY: LazyLock<RwLock<Registry>> =
    LazyLock::new(|| RwLock::new(Registry::default()));

fn not_implemented(operation: &'static str, value: &Value) -> OpticError {
    OpticError::NotImplemented {
        hook: operation,
        type_name: value.type_name(),
    }
}

/// The monoid identity for `value`'s host type.
pub fn mempty(value: &Value) -> Result<Value> {
    let override_fn = REGISTRY.read().mempty.get(&value.host_type_id()).cloned();
    if let Some(function) = override_fn {
        return function(value.host());
    }
    value
        .host()
        .monoid_empty()
        .ok_or_else(|| not_implemented("mempty", value))?
}

/// Joins two values with the monoid of `left`'s host type.
pub fn mappend(left: &Value, right: &Value) -> Result<Value> {
    let override_fn = REGISTRY.read().mappend.get(&left.host_type_id()).cloned();
    if let Some(function) = override_fn {
        return function(left.host(), right);
    }
    left.host()
        .monoid_append(right)
        .ok_or_else(|| not_implemented("mappend", left))?
}

/// Maps a fallible function over the contents of a functor value.
pub fn fmap(
    value: &Value,
    function: &dyn Fn(Value) -> Result<Value>,
) -> Result<Value> {
    let override_fn = REGISTRY.read().fmap.get(&value.host_type_id()).cloned();
    if let Some(registered) = override_fn {
        return registered(value.host(), function);
    }
    value
        .host()
        .functor_map(function)
        .ok_or_else(|| not_implemented("fmap", value))?
}

/// Lifts `item` into the applicative of `template`'s host type.
pub fn pure(template: &Value, item: Value) -> Result<Value> {
    let override_fn = REGISTRY.read().pure.get(&template.host_type_id()).cloned();
    if let Some(function) = override_fn {
        return function(template.host(), item);
    }
    template
        .host()
        .applicative_pure(item)
        .ok_or_else(|| not_implemented("pure", template))?
}

/// Applies wrapped functions to wrapped values.
pub fn apply(values: &Value, functions: &Value) -> Result<Value> {
    let override_fn = REGISTRY.read().apply.get(&values.host_type_id()).cloned();
    if let Some(function) = override_fn {
        return function(values.host(), functions);
    }
    values
        .host()
        .applicative_apply(functions)
        .ok_or_else(|| not_implemented("apply", values))?
}

fn downcast_for<T: HostValue>(value: &dyn HostValue) -> Result<&T> {
    crate::value::downcast::<T>(value).ok_or(OpticError::TypeMismatch {
        expected: "registered host type",
        found: value.type_name(),
    })
}

/// Registers a `mempty` override for host type `T`.
pub fn register_mempty<T: HostValue>(
    function: impl Fn(&T) -> Result<Value> + Send + Sync + 'static,
) {
    REGISTRY.write().mempty.insert(
        TypeId::of::<T>(),
        Arc::new(move |value| function(downcast_for::<T>(value)?)),
    );
}

/// Registers a `mappend` override for host type `T`.
pub fn register_mappend<T: HostValue>(
    function: impl Fn(&T, &Value) -> Result<Value> + Send + Sync + 'static,
) {
    REGISTRY.write().mappend.insert(
        TypeId::of::<T>(),
        Arc::new(move |value, other| function(downcast_for::<T>(value)?, other)),
    );
}

/// Registers an `fmap` override for host type `T`.
pub fn register_fmap<T: HostValue>(
    function: impl Fn(&T, &dyn Fn(Value) -> Result<Value>) -> Result<Value>
        + Send
        + Sync
        + 'static,
) {
    REGISTRY.write().fmap.insert(
        TypeId::of::<T>(),
        Arc::new(move |value, mapper| function(downcast_for::<T>(value)?, mapper)),
    );
}

/// Registers a `pure` override for host type `T`.
pub fn register_pure<T: HostValue>(
    function: impl Fn(&T, Value) -> Result<Value> + Send + Sync + 'static,
) {
    REGISTRY.write().pure.insert(
        TypeId::of::<T>(),
        Arc::new(move |value, item| function(downcast_for::<T>(value)?, item)),
    );
}

/// Registers an `apply` override for host type `T`.
pub fn register_apply<T: HostValue>(
    function: impl Fn(&T, &Value) -> Result<Value> + Send + Sync + 'static,
) {
    REGISTRY.write().apply.insert(
        TypeId::of::<T>(),
        Arc::new(move |value, functions| {
            function(downcast_for::<T>(value)?, functions)
        }),
    );
}
