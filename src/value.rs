//! The dynamic value model bridging the engine to host data.
//!
//! States, foci and keys are all [`Value`]s: cheaply clonable handles to
//! immutable host data. A host type participates by implementing
//! [`HostValue`]; the trait's defaulted methods are *instance hooks* - the
//! per-type copy-on-write primitives and typeclass instances the engine
//! resolves when no registry override exists (see [`crate::hooks`] and
//! [`crate::typeclass`]).
//!
//! Built-in host types cover the usual ground: integers, floats, booleans,
//! strings, byte strings, sequences ([`Vec<Value>`]), fixed [`Tuple`]s,
//! insertion-ordered [`Map`]s and [`Set`]s, named-field [`Record`]s,
//! [`Unit`] and value-level functions ([`Func`]).
//!
//! # Examples
//!
//! ```
//! use refract::val;
//! use refract::value::Value;
//!
//! let state = val!([1, 2, 3]);
//! assert_eq!(state, val!([1, 2, 3]));
//! assert_ne!(state, val!([1, 2]));
//! assert_eq!(val!(2).as_int(), Some(2));
//! ```

use std::any::Any;
use std::any::TypeId;
use std::fmt;
use std::sync::Arc;

use crate::error::{OpticError, Result};

/// A host datum the engine can traverse.
///
/// `type_name` and `dyn_eq` are required; everything else is an optional
/// instance hook with a "not provided" default. The engine consults a
/// hook in three steps: registry override for the type, then the instance
/// method, then failure (see [`crate::hooks`]). Returning `None` from an
/// instance hook means "fall through", `Some(Err(..))` is a real error.
///
/// # Examples
///
/// ```
/// use refract::value::{HostValue, Value, downcast};
///
/// #[derive(Debug, PartialEq)]
/// struct Celsius(f64);
///
/// impl HostValue for Celsius {
///     fn type_name(&self) -> &'static str {
///         "Celsius"
///     }
///
///     fn dyn_eq(&self, other: &dyn HostValue) -> bool {
///         downcast::<Self>(other).is_some_and(|other| self == other)
///     }
/// }
///
/// let value = Value::new(Celsius(21.5));
/// assert_eq!(value.downcast_ref::<Celsius>(), Some(&Celsius(21.5)));
/// ```
pub trait HostValue: Any + fmt::Debug + Send + Sync {
    /// A short name for the host type, used in error messages.
    fn type_name(&self) -> &'static str;

    /// Structural equality against another host value. Values of
    /// different host types are never equal.
    fn dyn_eq(&self, other: &dyn HostValue) -> bool;

    /// Whether the value counts as "truthy" for filtering purposes.
    /// Empty collections, zero numbers, empty strings, `false` and
    /// [`Unit`] are falsy; everything else defaults to `true`.
    fn truthy(&self) -> bool {
        true
    }

    /// Instance hook: read the element at `key`.
    fn get_index(&self, _key: &Value) -> Option<Result<Value>> {
        None
    }

    /// Instance hook: a copy of the value with the element at `key`
    /// replaced.
    fn set_index(&self, _key: &Value, _value: Value) -> Option<Result<Value>> {
        None
    }

    /// Instance hook: read the named field.
    fn get_field(&self, _name: &str) -> Option<Result<Value>> {
        None
    }

    /// Instance hook: a copy of the value with the named field replaced.
    fn set_field(&self, _name: &str, _value: Value) -> Option<Result<Value>> {
        None
    }

    /// Instance hook: the names of the value's fields, in a stable order.
    fn field_names(&self) -> Option<Vec<String>> {
        None
    }

    /// Instance hook: whether `item` is contained in the value.
    fn contains(&self, _item: &Value) -> Option<bool> {
        None
    }

    /// Instance hook: a copy of the collection containing `item`.
    fn contains_add(&self, _item: Value) -> Option<Result<Value>> {
        None
    }

    /// Instance hook: a copy of the collection without `item`.
    fn contains_remove(&self, _item: &Value) -> Option<Result<Value>> {
        None
    }

    /// Instance hook: the value's elements in traversal order. Mappings
    /// iterate as key-value pairs so they can be faithfully rebuilt.
    fn to_iterable(&self) -> Option<Result<Vec<Value>>> {
        None
    }

    /// Instance hook: rebuild a same-shape value from replacement
    /// elements in `to_iterable` order.
    fn from_iterable(&self, _values: Vec<Value>) -> Option<Result<Value>> {
        None
    }

    /// Typeclass instance: the monoid identity for this type.
    fn monoid_empty(&self) -> Option<Result<Value>> {
        None
    }

    /// Typeclass instance: monoid append.
    fn monoid_append(&self, _other: &Value) -> Option<Result<Value>> {
        None
    }

    /// Typeclass instance: map a function over the value's contents.
    fn functor_map(
        &self,
        _function: &dyn Fn(Value) -> Result<Value>,
    ) -> Option<Result<Value>> {
        None
    }

    /// Typeclass instance: lift `item` into this applicative.
    fn applicative_pure(&self, _item: Value) -> Option<Result<Value>> {
        None
    }

    /// Typeclass instance: apply wrapped functions to wrapped values.
    fn applicative_apply(&self, _functions: &Value) -> Option<Result<Value>> {
        None
    }
}

/// Downcasts a dynamic host value to a concrete type.
#[must_use]
pub fn downcast<T: HostValue>(value: &dyn HostValue) -> Option<&T> {
    (value as &dyn Any).downcast_ref::<T>()
}

/// An immutable, cheaply clonable handle to host data.
///
/// The engine never mutates a `Value` in place; every set or modify
/// produces a structurally new value derived from the old one.
#[derive(Clone)]
pub struct Value(Arc<dyn HostValue>);

impl Value {
    /// Wraps a host value.
    #[must_use]
    pub fn new<T: HostValue>(value: T) -> Self {
        Self(Arc::new(value))
    }

    /// Wraps a value-level function, for use with the applicative
    /// interface of [`crate::typeclass`].
    #[must_use]
    pub fn function(
        function: impl Fn(Value) -> Result<Value> + Send + Sync + 'static,
    ) -> Self {
        Self::new(Func(Arc::new(function)))
    }

    /// The [`Unit`] value.
    #[must_use]
    pub fn unit() -> Self {
        Self::new(Unit)
    }

    /// The `TypeId` of the wrapped host value.
    #[must_use]
    pub fn host_type_id(&self) -> TypeId {
        (&*self.0 as &dyn Any).type_id()
    }

    /// The host type's name, for error messages.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.0.type_name()
    }

    /// Whether the wrapped value has host type `T`.
    #[must_use]
    pub fn is<T: HostValue>(&self) -> bool {
        self.downcast_ref::<T>().is_some()
    }

    /// Borrows the wrapped value as `T`.
    #[must_use]
    pub fn downcast_ref<T: HostValue>(&self) -> Option<&T> {
        downcast::<T>(&*self.0)
    }

    /// Borrows the wrapped value dynamically.
    #[must_use]
    pub fn host(&self) -> &dyn HostValue {
        &*self.0
    }

    /// Whether the value counts as truthy.
    #[must_use]
    pub fn truthy(&self) -> bool {
        self.0.truthy()
    }

    /// The wrapped integer, if this is an `i64` value.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        self.downcast_ref::<i64>().copied()
    }

    /// The wrapped float, if this is an `f64` value.
    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        self.downcast_ref::<f64>().copied()
    }

    /// The wrapped boolean, if this is a `bool` value.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        self.downcast_ref::<bool>().copied()
    }

    /// The wrapped string slice, if this is a `String` value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        self.downcast_ref::<String>().map(String::as_str)
    }

    /// The wrapped sequence, if this is a `Vec<Value>` value.
    #[must_use]
    pub fn as_sequence(&self) -> Option<&[Value]> {
        self.downcast_ref::<Vec<Value>>().map(Vec::as_slice)
    }

    pub(crate) fn expect_int(&self, expected: &'static str) -> Result<i64> {
        self.as_int().ok_or(OpticError::TypeMismatch {
            expected,
            found: self.type_name(),
        })
    }
}

static_assertions::assert_impl_all!(Value: Clone, Send, Sync);

impl fmt::Debug for Value {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(formatter)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.0.dyn_eq(&*other.0)
    }
}

/// Resolves a possibly negative index against a length. Negative indices
/// address from the back, once.
pub(crate) fn resolve_index(index: i64, len: usize) -> Result<usize> {
    let out_of_range = OpticError::IndexOutOfRange { index, len };
    let resolved = if index < 0 {
        i64::try_from(len)
            .map_err(|_| out_of_range.clone())?
            .checked_add(index)
            .ok_or_else(|| out_of_range.clone())?
    } else {
        index
    };
    let resolved = usize::try_from(resolved).map_err(|_| out_of_range.clone())?;
    if resolved < len {
        Ok(resolved)
    } else {
        Err(out_of_range)
    }
}

/// Implements `type_name` and `dyn_eq` for a `PartialEq` host type.
macro_rules! host_value_base {
    ($type:ty, $name:literal) => {
        fn type_name(&self) -> &'static str {
            $name
        }

        fn dyn_eq(&self, other: &dyn HostValue) -> bool {
            downcast::<$type>(other).is_some_and(|other| self == other)
        }
    };
}

// ---------------------------------------------------------------------------
// Scalars
// ---------------------------------------------------------------------------

impl HostValue for i64 {
    host_value_base!(i64, "i64");

    fn truthy(&self) -> bool {
        *self != 0
    }

    fn monoid_empty(&self) -> Option<Result<Value>> {
        Some(Ok(Value::from(0)))
    }

    fn monoid_append(&self, other: &Value) -> Option<Result<Value>> {
        Some(other.expect_int("i64").and_then(|other| {
            self.checked_add(other)
                .map(Value::from)
                .ok_or_else(|| OpticError::Conversion("i64 append overflowed".to_string()))
        }))
    }
}

impl HostValue for f64 {
    host_value_base!(f64, "f64");

    fn truthy(&self) -> bool {
        *self != 0.0
    }

    fn monoid_empty(&self) -> Option<Result<Value>> {
        Some(Ok(Value::from(0.0)))
    }

    fn monoid_append(&self, other: &Value) -> Option<Result<Value>> {
        Some(match other.as_float() {
            Some(other) => Ok(Value::from(self + other)),
            None => Err(OpticError::TypeMismatch {
                expected: "f64",
                found: other.type_name(),
            }),
        })
    }
}

impl HostValue for bool {
    host_value_base!(bool, "bool");

    fn truthy(&self) -> bool {
        *self
    }
}

/// The no-value host type, analogous to a unit. Falsy; used by
/// [`crate::optics::item`] to request removal and by the containment
/// hooks as a placeholder mapping value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unit;

impl HostValue for Unit {
    host_value_base!(Unit, "Unit");

    fn truthy(&self) -> bool {
        false
    }
}

// ---------------------------------------------------------------------------
// Strings and byte strings
// ---------------------------------------------------------------------------

impl HostValue for String {
    host_value_base!(String, "String");

    fn truthy(&self) -> bool {
        !self.is_empty()
    }

    fn get_index(&self, key: &Value) -> Option<Result<Value>> {
        Some(key.expect_int("i64").and_then(|index| {
            let chars: Vec<char> = self.chars().collect();
            let position = resolve_index(index, chars.len())?;
            Ok(Value::from(chars[position]))
        }))
    }

    fn set_index(&self, key: &Value, value: Value) -> Option<Result<Value>> {
        Some(key.expect_int("i64").and_then(|index| {
            let mut chars: Vec<String> =
                self.chars().map(|character| character.to_string()).collect();
            let position = resolve_index(index, chars.len())?;
            let replacement = value.as_str().ok_or(OpticError::TypeMismatch {
                expected: "String",
                found: value.type_name(),
            })?;
            chars[position] = replacement.to_string();
            Ok(Value::from(chars.concat()))
        }))
    }

    fn contains(&self, item: &Value) -> Option<bool> {
        item.as_str().map(|needle| self.as_str().contains(needle))
    }

    fn to_iterable(&self) -> Option<Result<Vec<Value>>> {
        Some(Ok(self.chars().map(Value::from).collect()))
    }

    fn from_iterable(&self, values: Vec<Value>) -> Option<Result<Value>> {
        let mut rebuilt = String::new();
        for value in values {
            match value.as_str() {
                Some(part) => rebuilt.push_str(part),
                None => {
                    return Some(Err(OpticError::TypeMismatch {
                        expected: "String",
                        found: value.type_name(),
                    }));
                }
            }
        }
        Some(Ok(Value::from(rebuilt)))
    }

    fn monoid_empty(&self) -> Option<Result<Value>> {
        Some(Ok(Value::from("")))
    }

    fn monoid_append(&self, other: &Value) -> Option<Result<Value>> {
        Some(match other.as_str() {
            Some(other) => Ok(Value::from(format!("{self}{other}"))),
            None => Err(OpticError::TypeMismatch {
                expected: "String",
                found: other.type_name(),
            }),
        })
    }
}

impl HostValue for Vec<u8> {
    host_value_base!(Vec<u8>, "bytes");

    fn truthy(&self) -> bool {
        !self.is_empty()
    }

    fn get_index(&self, key: &Value) -> Option<Result<Value>> {
        Some(key.expect_int("i64").and_then(|index| {
            let position = resolve_index(index, self.len())?;
            Ok(Value::from(i64::from(self[position])))
        }))
    }

    fn set_index(&self, key: &Value, value: Value) -> Option<Result<Value>> {
        Some(key.expect_int("i64").and_then(|index| {
            let position = resolve_index(index, self.len())?;
            let byte = byte_from_value(&value)?;
            let mut data = self.clone();
            data[position] = byte;
            Ok(Value::new(data))
        }))
    }

    fn to_iterable(&self) -> Option<Result<Vec<Value>>> {
        Some(Ok(self
            .iter()
            .map(|byte| Value::from(i64::from(*byte)))
            .collect()))
    }

    fn from_iterable(&self, values: Vec<Value>) -> Option<Result<Value>> {
        let rebuilt: Result<Vec<u8>> =
            values.iter().map(byte_from_value).collect();
        Some(rebuilt.map(Value::new))
    }
}

fn byte_from_value(value: &Value) -> Result<u8> {
    let number = value.expect_int("byte")?;
    u8::try_from(number)
        .map_err(|_| OpticError::Conversion(format!("{number} is not a byte")))
}

// ---------------------------------------------------------------------------
// Sequences and tuples
// ---------------------------------------------------------------------------

impl HostValue for Vec<Value> {
    host_value_base!(Vec<Value>, "sequence");

    fn truthy(&self) -> bool {
        !self.is_empty()
    }

    fn get_index(&self, key: &Value) -> Option<Result<Value>> {
        Some(key.expect_int("i64").and_then(|index| {
            let position = resolve_index(index, self.len())?;
            Ok(self[position].clone())
        }))
    }

    fn set_index(&self, key: &Value, value: Value) -> Option<Result<Value>> {
        Some(key.expect_int("i64").and_then(|index| {
            let position = resolve_index(index, self.len())?;
            let mut data = self.clone();
            data[position] = value;
            Ok(Value::from(data))
        }))
    }

    fn contains(&self, item: &Value) -> Option<bool> {
        Some(self.iter().any(|element| element == item))
    }

    fn contains_add(&self, item: Value) -> Option<Result<Value>> {
        let mut data = self.clone();
        data.push(item);
        Some(Ok(Value::from(data)))
    }

    fn contains_remove(&self, item: &Value) -> Option<Result<Value>> {
        let data: Vec<Value> = self
            .iter()
            .filter(|element| *element != item)
            .cloned()
            .collect();
        Some(Ok(Value::from(data)))
    }

    fn to_iterable(&self) -> Option<Result<Vec<Value>>> {
        Some(Ok(self.clone()))
    }

    fn from_iterable(&self, values: Vec<Value>) -> Option<Result<Value>> {
        Some(Ok(Value::from(values)))
    }

    fn monoid_empty(&self) -> Option<Result<Value>> {
        Some(Ok(Value::from(Vec::new())))
    }

    fn monoid_append(&self, other: &Value) -> Option<Result<Value>> {
        Some(match other.as_sequence() {
            Some(other) => {
                let mut data = self.clone();
                data.extend_from_slice(other);
                Ok(Value::from(data))
            }
            None => Err(OpticError::TypeMismatch {
                expected: "sequence",
                found: other.type_name(),
            }),
        })
    }

    fn functor_map(
        &self,
        function: &dyn Fn(Value) -> Result<Value>,
    ) -> Option<Result<Value>> {
        let mapped: Result<Vec<Value>> =
            self.iter().cloned().map(function).collect();
        Some(mapped.map(Value::from))
    }

    fn applicative_pure(&self, item: Value) -> Option<Result<Value>> {
        Some(Ok(Value::from(vec![item])))
    }

    fn applicative_apply(&self, functions: &Value) -> Option<Result<Value>> {
        Some(cross_apply(self, functions).map(Value::from))
    }
}

/// Applies every function in `functions` to every value, value-major.
fn cross_apply(values: &[Value], functions: &Value) -> Result<Vec<Value>> {
    let functions = functions
        .to_iterable_values()
        .ok_or(OpticError::TypeMismatch {
            expected: "sequence of functions",
            found: functions.type_name(),
        })??;
    let mut results = Vec::with_capacity(values.len() * functions.len());
    for value in values {
        for function in &functions {
            let function =
                function
                    .downcast_ref::<Func>()
                    .ok_or(OpticError::TypeMismatch {
                        expected: "function",
                        found: function.type_name(),
                    })?;
            results.push(function.call(value.clone())?);
        }
    }
    Ok(results)
}

impl Value {
    fn to_iterable_values(&self) -> Option<Result<Vec<Value>>> {
        self.0.to_iterable()
    }
}

/// A fixed-size tuple of values. Unlike a sequence, a tuple rebuilt from
/// an iterable stays a tuple.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Tuple(pub Vec<Value>);

impl Tuple {
    /// Creates a tuple from its elements.
    #[must_use]
    pub fn new(elements: Vec<Value>) -> Self {
        Self(elements)
    }

    /// The tuple's elements.
    #[must_use]
    pub fn elements(&self) -> &[Value] {
        &self.0
    }
}

impl HostValue for Tuple {
    host_value_base!(Tuple, "tuple");

    fn truthy(&self) -> bool {
        !self.0.is_empty()
    }

    fn get_index(&self, key: &Value) -> Option<Result<Value>> {
        self.0.get_index(key)
    }

    fn set_index(&self, key: &Value, value: Value) -> Option<Result<Value>> {
        Some(key.expect_int("i64").and_then(|index| {
            let position = resolve_index(index, self.0.len())?;
            let mut data = self.0.clone();
            data[position] = value;
            Ok(Value::new(Self(data)))
        }))
    }

    fn contains(&self, item: &Value) -> Option<bool> {
        Some(self.0.iter().any(|element| element == item))
    }

    fn contains_add(&self, item: Value) -> Option<Result<Value>> {
        let mut data = self.0.clone();
        data.push(item);
        Some(Ok(Value::new(Self(data))))
    }

    fn contains_remove(&self, item: &Value) -> Option<Result<Value>> {
        let data: Vec<Value> = self
            .0
            .iter()
            .filter(|element| *element != item)
            .cloned()
            .collect();
        Some(Ok(Value::new(Self(data))))
    }

    fn to_iterable(&self) -> Option<Result<Vec<Value>>> {
        Some(Ok(self.0.clone()))
    }

    fn from_iterable(&self, values: Vec<Value>) -> Option<Result<Value>> {
        Some(Ok(Value::new(Self(values))))
    }

    fn monoid_empty(&self) -> Option<Result<Value>> {
        Some(Ok(Value::new(Self::default())))
    }

    fn monoid_append(&self, other: &Value) -> Option<Result<Value>> {
        Some(match other.downcast_ref::<Self>() {
            Some(other) => {
                let mut data = self.0.clone();
                data.extend_from_slice(&other.0);
                Ok(Value::new(Self(data)))
            }
            None => Err(OpticError::TypeMismatch {
                expected: "tuple",
                found: other.type_name(),
            }),
        })
    }

    fn functor_map(
        &self,
        function: &dyn Fn(Value) -> Result<Value>,
    ) -> Option<Result<Value>> {
        let mapped: Result<Vec<Value>> =
            self.0.iter().cloned().map(function).collect();
        Some(mapped.map(|elements| Value::new(Self(elements))))
    }

    fn applicative_pure(&self, item: Value) -> Option<Result<Value>> {
        Some(Ok(Value::new(Self(vec![item]))))
    }

    fn applicative_apply(&self, functions: &Value) -> Option<Result<Value>> {
        Some(cross_apply(&self.0, functions).map(|elements| Value::new(Self(elements))))
    }
}

// ---------------------------------------------------------------------------
// Mappings and sets
// ---------------------------------------------------------------------------

/// An insertion-ordered mapping from values to values.
///
/// Lookup is by structural equality, so keys need no hashing or ordering.
/// Replacing a value keeps the key's position; inserting a new key
/// appends it. Iteration yields key-value [`Tuple`]s, which is what makes
/// faithful rebuilding through `from_iterable` possible.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Map {
    entries: Vec<(Value, Value)>,
}

impl Map {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a map from key-value pairs, in order. A repeated key
    /// keeps its first position with the last value.
    #[must_use]
    pub fn from_pairs(pairs: Vec<(Value, Value)>) -> Self {
        let mut map = Self::new();
        for (key, value) in pairs {
            map = map.inserted(key, value);
        }
        map
    }

    /// The entries in insertion order.
    #[must_use]
    pub fn pairs(&self) -> &[(Value, Value)] {
        &self.entries
    }

    /// The number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up a key.
    #[must_use]
    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value)
    }

    /// Whether the key is present.
    #[must_use]
    pub fn contains_key(&self, key: &Value) -> bool {
        self.get(key).is_some()
    }

    /// A copy with `key` mapped to `value`.
    #[must_use]
    pub fn inserted(&self, key: Value, value: Value) -> Self {
        let mut entries = self.entries.clone();
        match entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some(entry) => entry.1 = value,
            None => entries.push((key, value)),
        }
        Self { entries }
    }

    /// A copy without `key`. Unchanged when the key is absent.
    #[must_use]
    pub fn removed(&self, key: &Value) -> Self {
        let entries = self
            .entries
            .iter()
            .filter(|(existing, _)| existing != key)
            .cloned()
            .collect();
        Self { entries }
    }
}

impl HostValue for Map {
    host_value_base!(Map, "map");

    fn truthy(&self) -> bool {
        !self.is_empty()
    }

    fn get_index(&self, key: &Value) -> Option<Result<Value>> {
        Some(
            self.get(key)
                .cloned()
                .ok_or_else(|| OpticError::KeyMissing(format!("{key:?}"))),
        )
    }

    fn set_index(&self, key: &Value, value: Value) -> Option<Result<Value>> {
        Some(Ok(Value::from(self.inserted(key.clone(), value))))
    }

    fn contains(&self, item: &Value) -> Option<bool> {
        Some(self.contains_key(item))
    }

    fn contains_add(&self, item: Value) -> Option<Result<Value>> {
        if self.contains_key(&item) {
            return Some(Ok(Value::from(self.clone())));
        }
        Some(Ok(Value::from(self.inserted(item, Value::unit()))))
    }

    fn contains_remove(&self, item: &Value) -> Option<Result<Value>> {
        if !self.contains_key(item) {
            return Some(Err(OpticError::KeyMissing(format!("{item:?}"))));
        }
        Some(Ok(Value::from(self.removed(item))))
    }

    fn to_iterable(&self) -> Option<Result<Vec<Value>>> {
        Some(Ok(self
            .entries
            .iter()
            .map(|(key, value)| {
                Value::new(Tuple(vec![key.clone(), value.clone()]))
            })
            .collect()))
    }

    fn from_iterable(&self, values: Vec<Value>) -> Option<Result<Value>> {
        let mut rebuilt = Self::new();
        for pair in values {
            match pair_from_value(&pair) {
                Ok((key, value)) => rebuilt = rebuilt.inserted(key, value),
                Err(error) => return Some(Err(error)),
            }
        }
        Some(Ok(Value::from(rebuilt)))
    }

    fn monoid_empty(&self) -> Option<Result<Value>> {
        Some(Ok(Value::from(Self::new())))
    }

    fn monoid_append(&self, other: &Value) -> Option<Result<Value>> {
        Some(match other.downcast_ref::<Self>() {
            Some(other) => {
                let mut merged = self.clone();
                for (key, value) in &other.entries {
                    merged = merged.inserted(key.clone(), value.clone());
                }
                Ok(Value::from(merged))
            }
            None => Err(OpticError::TypeMismatch {
                expected: "map",
                found: other.type_name(),
            }),
        })
    }
}

/// Borrows a state as a [`Map`], or reports what it was instead.
pub(crate) fn expect_map(state: &Value) -> Result<&Map> {
    state.downcast_ref::<Map>().ok_or(OpticError::TypeMismatch {
        expected: "map",
        found: state.type_name(),
    })
}

/// Splits a key-value pair value into its parts.
pub(crate) fn pair_from_value(pair: &Value) -> Result<(Value, Value)> {
    let tuple = pair
        .downcast_ref::<Tuple>()
        .filter(|tuple| tuple.0.len() == 2)
        .ok_or(OpticError::TypeMismatch {
            expected: "key-value pair",
            found: pair.type_name(),
        })?;
    Ok((tuple.0[0].clone(), tuple.0[1].clone()))
}

/// An insertion-ordered collection of distinct values.
///
/// Membership is by structural equality. Iteration order is the
/// insertion order, which is stable within one call - the only guarantee
/// a traversal's positional rebuild needs.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Set {
    items: Vec<Value>,
}

impl Set {
    /// Creates a set from values, dropping duplicates.
    #[must_use]
    pub fn from_values(values: Vec<Value>) -> Self {
        let mut set = Self::default();
        for value in values {
            if !set.contains_value(&value) {
                set.items.push(value);
            }
        }
        set
    }

    /// The members in insertion order.
    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.items
    }

    /// Whether `value` is a member.
    #[must_use]
    pub fn contains_value(&self, value: &Value) -> bool {
        self.items.iter().any(|item| item == value)
    }
}

impl HostValue for Set {
    fn type_name(&self) -> &'static str {
        "set"
    }

    // Set equality ignores insertion order.
    fn dyn_eq(&self, other: &dyn HostValue) -> bool {
        downcast::<Self>(other).is_some_and(|other| {
            self.items.len() == other.items.len()
                && self.items.iter().all(|item| other.contains_value(item))
        })
    }

    fn truthy(&self) -> bool {
        !self.items.is_empty()
    }

    fn contains(&self, item: &Value) -> Option<bool> {
        Some(self.contains_value(item))
    }

    fn contains_add(&self, item: Value) -> Option<Result<Value>> {
        if self.contains_value(&item) {
            return Some(Ok(Value::from(self.clone())));
        }
        let mut items = self.items.clone();
        items.push(item);
        Some(Ok(Value::from(Self { items })))
    }

    fn contains_remove(&self, item: &Value) -> Option<Result<Value>> {
        let items = self
            .items
            .iter()
            .filter(|existing| *existing != item)
            .cloned()
            .collect();
        Some(Ok(Value::from(Self { items })))
    }

    fn to_iterable(&self) -> Option<Result<Vec<Value>>> {
        Some(Ok(self.items.clone()))
    }

    fn from_iterable(&self, values: Vec<Value>) -> Option<Result<Value>> {
        Some(Ok(Value::from(Self::from_values(values))))
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A host value with named fields in declaration order.
///
/// Serves the same role objects with attributes play in dynamic
/// languages: [`crate::optics::field`] and the recursive traversal
/// descend through records via the field hooks.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    /// Creates a record from named fields, in declaration order.
    #[must_use]
    pub fn new(fields: Vec<(&str, Value)>) -> Self {
        Self {
            fields: fields
                .into_iter()
                .map(|(name, value)| (name.to_string(), value))
                .collect(),
        }
    }

    /// Looks up a field by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    /// A copy with the named field replaced. Fails when the field does
    /// not exist; records have a fixed shape.
    pub fn with_field(&self, name: &str, value: Value) -> Result<Self> {
        let mut fields = self.fields.clone();
        let entry = fields
            .iter_mut()
            .find(|(field, _)| field == name)
            .ok_or_else(|| OpticError::FieldMissing(name.to_string()))?;
        entry.1 = value;
        Ok(Self { fields })
    }
}

impl HostValue for Record {
    host_value_base!(Record, "record");

    fn get_field(&self, name: &str) -> Option<Result<Value>> {
        Some(
            self.get(name)
                .cloned()
                .ok_or_else(|| OpticError::FieldMissing(name.to_string())),
        )
    }

    fn set_field(&self, name: &str, value: Value) -> Option<Result<Value>> {
        Some(self.with_field(name, value).map(Value::from))
    }

    fn field_names(&self) -> Option<Vec<String>> {
        Some(self.fields.iter().map(|(name, _)| name.clone()).collect())
    }
}

// ---------------------------------------------------------------------------
// Functions
// ---------------------------------------------------------------------------

/// A value-level function, the carrier for the applicative interface.
/// Two `Func` values compare equal only when they are the same handle.
#[derive(Clone)]
pub struct Func(Arc<dyn Fn(Value) -> Result<Value> + Send + Sync>);

impl Func {
    /// Calls the wrapped function.
    pub fn call(&self, argument: Value) -> Result<Value> {
        (self.0)(argument)
    }
}

impl fmt::Debug for Func {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("Func(..)")
    }
}

impl HostValue for Func {
    fn type_name(&self) -> &'static str {
        "function"
    }

    fn dyn_eq(&self, other: &dyn HostValue) -> bool {
        downcast::<Self>(other)
            .is_some_and(|other| Arc::ptr_eq(&self.0, &other.0))
    }
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::new(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::new(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<char> for Value {
    fn from(value: char) -> Self {
        Self::new(value.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Self::new(value)
    }
}

impl From<Tuple> for Value {
    fn from(value: Tuple) -> Self {
        Self::new(value)
    }
}

impl From<Map> for Value {
    fn from(value: Map) -> Self {
        Self::new(value)
    }
}

impl From<Set> for Value {
    fn from(value: Set) -> Self {
        Self::new(value)
    }
}

impl From<Record> for Value {
    fn from(value: Record) -> Self {
        Self::new(value)
    }
}

/// Builds a [`Value`] from a literal.
///
/// Square brackets build sequences, parentheses build tuples, braces with
/// `=>` build maps; anything else goes through `Value::from`. Literals
/// nest.
///
/// # Examples
///
/// ```
/// use refract::val;
/// use refract::value::{Map, Value};
///
/// let nested = val!([[0, 1], [2, 3]]);
/// let map = val!({1 => 10, 2 => 20});
/// let pair = val!((1, "one"));
/// assert_eq!(map, val!({1 => 10, 2 => 20}));
/// # let _ = (nested, pair);
/// ```
#[macro_export]
macro_rules! val {
    ([]) => {
        $crate::value::Value::from(::std::vec::Vec::<$crate::value::Value>::new())
    };
    ([ $($element:tt),+ $(,)? ]) => {
        $crate::value::Value::from(::std::vec![ $($crate::val!($element)),+ ])
    };
    ({}) => {
        $crate::value::Value::from($crate::value::Map::new())
    };
    ({ $($key:tt => $value:tt),+ $(,)? }) => {
        $crate::value::Value::from($crate::value::Map::from_pairs(::std::vec![
            $(($crate::val!($key), $crate::val!($value))),+
        ]))
    };
    (( $($element:tt),+ $(,)? )) => {
        $crate::value::Value::from($crate::value::Tuple::new(::std::vec![
            $($crate::val!($element)),+
        ]))
    };
    ($other:expr) => {
        $crate::value::Value::from($other)
    };
}
