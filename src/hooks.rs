//! Structural hooks: how optics read and rebuild host data.
//!
//! Every primitive optic bottoms out in one of these operations -
//! indexed access, named fields, containment, or iteration with
//! rebuilding. Like [`crate::typeclass`], each hook dispatches on the
//! host type of the state: a registry override wins, then the type's
//! instance method, and a type providing neither fails with
//! [`OpticError::NotImplemented`].
//!
//! All hooks are copy-on-write: a "set" hook returns a structurally new
//! state and never mutates the old one.
//!
//! # Examples
//!
//! ```
//! use refract::hooks;
//! use refract::val;
//!
//! let state = val!([1, 2, 3]);
//! assert_eq!(hooks::getitem(&state, &val!(-1)).unwrap(), val!(3));
//!
//! let updated = hooks::setitem(&state, &val!(0), val!(9)).unwrap();
//! assert_eq!(updated, val!([9, 2, 3]));
//! assert_eq!(state, val!([1, 2, 3]));
//! ```

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use parking_lot::RwLock;

use crate::error::{OpticError, Result};
use crate::value::{HostValue, Value};

type GetItemHook = Arc<dyn Fn(&dyn HostValue, &Value) -> Result<Value> + Send + Sync>;
type SetItemHook =
    Arc<dyn Fn(&dyn HostValue, &Value, Value) -> Result<Value> + Send + Sync>;
type GetAttrHook = Arc<dyn Fn(&dyn HostValue, &str) -> Result<Value> + Send + Sync>;
type SetAttrHook =
    Arc<dyn Fn(&dyn HostValue, &str, Value) -> Result<Value> + Send + Sync>;
type FieldNamesHook = Arc<dyn Fn(&dyn HostValue) -> Result<Vec<String>> + Send + Sync>;
type ContainsHook = Arc<dyn Fn(&dyn HostValue, &Value) -> Result<bool> + Send + Sync>;
type ContainsAddHook =
    Arc<dyn Fn(&dyn HostValue, Value) -> Result<Value> + Send + Sync>;
type ContainsRemoveHook =
    Arc<dyn Fn(&dyn HostValue, &Value) -> Result<Value> + Send + Sync>;
type ToIterHook = Arc<dyn Fn(&dyn HostValue) -> Result<Vec<Value>> + Send + Sync>;
type FromIterHook =
    Arc<dyn Fn(&dyn HostValue, Vec<Value>) -> Result<Value> + Send + Sync>;

#[derive(Default)]
struct Registry {
    getitem: HashMap<TypeId, GetItemHook>,
    setitem: HashMap<TypeId, SetItemHook>,
    getattr: HashMap<TypeId, GetAttrHook>,
    setattr: HashMap<TypeId, SetAttrHook>,
    field_names: HashMap<TypeId, FieldNamesHook>,
    contains: HashMap<TypeId, ContainsHook>,
    contains_add: HashMap<TypeId, ContainsAddHook>,
    contains_remove: HashMap<TypeId, ContainsRemoveHook>,
    to_iter: HashMap<TypeId, ToIterHook>,
    from_iter: HashMap<TypeId, FromIterHook>,
}

static REGISTRY: LazyLock<RwLock<Registry>> =
    LazyLock::new(|| RwLock::new(Registry::default()));

fn not_implemented(hook: &'static str, state: &Value) -> OpticError {
    OpticError::NotImplemented {
        hook,
        type_name: state.type_name(),
    }
}

/// Reads the element of `state` at `key`.
pub fn getitem(state: &Value, key: &Value) -> Result<Value> {
    let override_fn = REGISTRY.read().getitem.get(&state.host_type_id()).cloned();
    if let Some(hook) = override_fn {
        return hook(state.host(), key);
    }
    state
        .host()
        .get_index(key)
        .ok_or_else(|| not_implemented("getitem", state))?
}

/// A copy of `state` with the element at `key` replaced.
pub fn setitem(state: &Value, key: &Value, value: Value) -> Result<Value> {
    let override_fn = REGISTRY.read().setitem.get(&state.host_type_id()).cloned();
    if let Some(hook) = override_fn {
        return hook(state.host(), key, value);
    }
    state
        .host()
        .set_index(key, value)
        .ok_or_else(|| not_implemented("setitem", state))?
}

/// Reads the named field of `state`.
pub fn getattr(state: &Value, name: &str) -> Result<Value> {
    let override_fn = REGISTRY.read().getattr.get(&state.host_type_id()).cloned();
    if let Some(hook) = override_fn {
        return hook(state.host(), name);
    }
    state
        .host()
        .get_field(name)
        .ok_or_else(|| not_implemented("getattr", state))?
}

/// A copy of `state` with the named field replaced.
pub fn setattr(state: &Value, name: &str, value: Value) -> Result<Value> {
    let override_fn = REGISTRY.read().setattr.get(&state.host_type_id()).cloned();
    if let Some(hook) = override_fn {
        return hook(state.host(), name, value);
    }
    state
        .host()
        .set_field(name, value)
        .ok_or_else(|| not_implemented("setattr", state))?
}

/// The names of `state`'s fields, in a stable order. Types without
/// named fields report an empty list.
pub fn field_names(state: &Value) -> Result<Vec<String>> {
    let override_fn = REGISTRY
        .read()
        .field_names
        .get(&state.host_type_id())
        .cloned();
    if let Some(hook) = override_fn {
        return hook(state.host());
    }
    Ok(state.host().field_names().unwrap_or_default())
}

/// Whether `item` is contained in `state`.
pub fn contains(state: &Value, item: &Value) -> Result<bool> {
    let override_fn = REGISTRY.read().contains.get(&state.host_type_id()).cloned();
    if let Some(hook) = override_fn {
        return hook(state.host(), item);
    }
    state
        .host()
        .contains(item)
        .ok_or_else(|| not_implemented("contains", state))
}

/// A copy of `state` containing `item`. Unchanged when already present.
pub fn contains_add(state: &Value, item: Value) -> Result<Value> {
    let override_fn = REGISTRY
        .read()
        .contains_add
        .get(&state.host_type_id())
        .cloned();
    if let Some(hook) = override_fn {
        return hook(state.host(), item);
    }
    state
        .host()
        .contains_add(item)
        .ok_or_else(|| not_implemented("contains_add", state))?
}

/// A copy of `state` without `item`.
pub fn contains_remove(state: &Value, item: &Value) -> Result<Value> {
    let override_fn = REGISTRY
        .read()
        .contains_remove
        .get(&state.host_type_id())
        .cloned();
    if let Some(hook) = override_fn {
        return hook(state.host(), item);
    }
    state
        .host()
        .contains_remove(item)
        .ok_or_else(|| not_implemented("contains_remove", state))?
}

/// The elements of `state` in traversal order.
pub fn to_iter(state: &Value) -> Result<Vec<Value>> {
    let override_fn = REGISTRY.read().to_iter.get(&state.host_type_id()).cloned();
    if let Some(hook) = override_fn {
        return hook(state.host());
    }
    state
        .host()
        .to_iterable()
        .ok_or_else(|| not_implemented("to_iter", state))?
}

/// Rebuilds a value shaped like `state` from replacement elements in
/// [`to_iter`] order.
pub fn from_iter(state: &Value, values: Vec<Value>) -> Result<Value> {
    let override_fn = REGISTRY.read().from_iter.get(&state.host_type_id()).cloned();
    if let Some(hook) = override_fn {
        return hook(state.host(), values);
    }
    state
        .host()
        .from_iterable(values)
        .ok_or_else(|| not_implemented("from_iter", state))?
}

// Whether the state can round-trip through to_iter/from_iter. Used by
// the recursive traversal to decide where to descend.
pub(crate) fn supports_iteration(state: &Value) -> bool {
    REGISTRY
        .read()
        .from_iter
        .contains_key(&state.host_type_id())
        || state.host().to_iterable().is_some()
}

fn downcast_for<T: HostValue>(state: &dyn HostValue) -> Result<&T> {
    crate::value::downcast::<T>(state).ok_or(OpticError::TypeMismatch {
        expected: "registered host type",
        found: state.type_name(),
    })
}

/// Registers a `getitem` override for host type `T`.
pub fn register_getitem<T: HostValue>(
    hook: impl Fn(&T, &Value) -> Result<Value> + Send + Sync + 'static,
) {
    REGISTRY.write().getitem.insert(
        TypeId::of::<T>(),
        Arc::new(move |state, key| hook(downcast_for::<T>(state)?, key)),
    );
}

/// Registers a `setitem` override for host type `T`.
pub fn register_setitem<T: HostValue>(
    hook: impl Fn(&T, &Value, Value) -> Result<Value> + Send + Sync + 'static,
) {
    REGISTRY.write().setitem.insert(
        TypeId::of::<T>(),
        Arc::new(move |state, key, value| hook(downcast_for::<T>(state)?, key, value)),
    );
}

/// Registers a `getattr` override for host type `T`.
pub fn register_getattr<T: HostValue>(
    hook: impl Fn(&T, &str) -> Result<Value> + Send + Sync + 'static,
) {
    REGISTRY.write().getattr.insert(
        TypeId::of::<T>(),
        Arc::new(move |state, name| hook(downcast_for::<T>(state)?, name)),
    );
}

/// Registers a `setattr` override for host type `T`.
pub fn register_setattr<T: HostValue>(
    hook: impl Fn(&T, &str, Value) -> Result<Value> + Send + Sync + 'static,
) {
    REGISTRY.write().setattr.insert(
        TypeId::of::<T>(),
        Arc::new(move |state, name, value| {
            hook(downcast_for::<T>(state)?, name, value)
        }),
    );
}

/// Registers a `field_names` override for host type `T`.
pub fn register_field_names<T: HostValue>(
    hook: impl Fn(&T) -> Result<Vec<String>> + Send + Sync + 'static,
) {
    REGISTRY.write().field_names.insert(
        TypeId::of::<T>(),
        Arc::new(move |state| hook(downcast_for::<T>(state)?)),
    );
}

/// Registers a `contains` override for host type `T`.
pub fn register_contains<T: HostValue>(
    hook: impl Fn(&T, &Value) -> Result<bool> + Send + Sync + 'static,
) {
    REGISTRY.write().contains.insert(
        TypeId::of::<T>(),
        Arc::new(move |state, item| hook(downcast_for::<T>(state)?, item)),
    );
}

/// Registers a `contains_add` override for host type `T`.
pub fn register_contains_add<T: HostValue>(
    hook: impl Fn(&T, Value) -> Result<Value> + Send + Sync + 'static,
) {
    REGISTRY.write().contains_add.insert(
        TypeId::of::<T>(),
        Arc::new(move |state, item| hook(downcast_for::<T>(state)?, item)),
    );
}

/// Registers a `contains_remove` override for host type `T`.
pub fn register_contains_remove<T: HostValue>(
    hook: impl Fn(&T, &Value) -> Result<Value> + Send + Sync + 'static,
) {
    REGISTRY.write().contains_remove.insert(
        TypeId::of::<T>(),
        Arc::new(move |state, item| hook(downcast_for::<T>(state)?, item)),
    );
}

/// Registers a `to_iter` override for host type `T`.
pub fn register_to_iter<T: HostValue>(
    hook: impl Fn(&T) -> Result<Vec<Value>> + Send + Sync + 'static,
) {
    REGISTRY.write().to_iter.insert(
        TypeId::of::<T>(),
        Arc::new(move |state| hook(downcast_for::<T>(state)?)),
    );
}

/// Registers a `from_iter` override for host type `T`.
pub fn register_from_iter<T: HostValue>(
    hook: impl Fn(&T, Vec<Value>) -> Result<Value> + Send + Sync + 'static,
) {
    REGISTRY.write().from_iter.insert(
        TypeId::of::<T>(),
        Arc::new(move |state, values| hook(downcast_for::<T>(state)?, values)),
    );
}
