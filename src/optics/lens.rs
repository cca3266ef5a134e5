//! Lens constructors: optics with exactly one mandatory focus.
//!
//! All of these bottom out in the structural hooks of [`crate::hooks`],
//! so they work with any host type that implements the relevant hook.

use crate::error::{OpticError, Result};
use crate::hooks;
use crate::kind::Kind;
use crate::value::{expect_map, pair_from_value, Map, Tuple, Unit, Value};

use super::optic::Optic;

/// A lens focusing the element at `key`. Sequences and strings accept
/// negative keys, which address from the back.
///
/// ```
/// use refract::optics::index;
/// use refract::val;
///
/// assert_eq!(index(-1).view(&val!([1, 2, 3])).unwrap(), val!(3));
/// assert_eq!(
///     index("name").view(&val!({"name" => "ada"})).unwrap(),
///     val!("ada"),
/// );
/// ```
pub fn index(key: impl Into<Value>) -> Optic {
    let key = key.into();
    let get_key = key.clone();
    Optic::lens(
        move |state| hooks::getitem(state, &get_key),
        move |state, focus| hooks::setitem(state, &key, focus),
    )
}

/// Like [`index`], but a missing key focuses `default` instead of
/// failing. Setting through a missing key inserts it.
///
/// ```
/// use refract::optics::index_or;
/// use refract::val;
///
/// let opt = index_or("count", 0);
/// assert_eq!(opt.view(&val!({})).unwrap(), val!(0));
/// assert_eq!(
///     opt.over(&val!({}), |n| Ok(val!(n.as_int().unwrap() + 10))).unwrap(),
///     val!({"count" => 10}),
/// );
/// ```
pub fn index_or(key: impl Into<Value>, default: impl Into<Value>) -> Optic {
    let key = key.into();
    let get_key = key.clone();
    let default = default.into();
    Optic::lens(
        move |state| match hooks::getitem(state, &get_key) {
            Ok(value) => Ok(value),
            Err(OpticError::KeyMissing(_)) => Ok(default.clone()),
            Err(error) => Err(error),
        },
        move |state, focus| hooks::setitem(state, &key, focus),
    )
}

/// A lens focusing the named field of a record-like value.
///
/// ```
/// use refract::optics::field;
/// use refract::val;
/// use refract::value::{Record, Value};
///
/// let state = Value::from(Record::new(vec![("x", val!(1)), ("y", val!(2))]));
/// assert_eq!(field("y").view(&state).unwrap(), val!(2));
/// ```
pub fn field(name: &str) -> Optic {
    let get_name = name.to_string();
    let set_name = get_name.clone();
    Optic::lens(
        move |state| hooks::getattr(state, &get_name),
        move |state, focus| hooks::setattr(state, &set_name, focus),
    )
}

/// A lens focusing membership of `item` in a collection as a boolean.
/// Setting a truthy focus adds the item, a falsy focus removes it.
///
/// ```
/// use refract::optics::contains;
/// use refract::val;
///
/// let one = contains(1);
/// assert_eq!(one.view(&val!([2, 3])).unwrap(), val!(false));
/// assert_eq!(one.set(&val!([2, 3]), val!(true)).unwrap(), val!([2, 3, 1]));
/// assert_eq!(one.set(&val!([1, 2]), val!(false)).unwrap(), val!([2]));
/// ```
pub fn contains(item: impl Into<Value>) -> Optic {
    let item = item.into();
    let set_item = item.clone();
    Optic::lens(
        move |state| hooks::contains(state, &item).map(Value::from),
        move |state, focus| {
            let present = hooks::contains(state, &set_item)?;
            let wanted = focus.truthy();
            if wanted && !present {
                hooks::contains_add(state, set_item.clone())
            } else if present && !wanted {
                hooks::contains_remove(state, &set_item)
            } else {
                Ok(state.clone())
            }
        },
    )
}

/// A lens focusing one entry of a map as a key-value pair, addressed by
/// key. A missing entry focuses [`Unit`]. Setting a pair with a changed
/// key renames the entry; setting `Unit` removes it.
///
/// ```
/// use refract::optics::item;
/// use refract::val;
/// use refract::value::Value;
///
/// let state = val!({1 => 10, 2 => 20});
/// assert_eq!(item(1).view(&state).unwrap(), val!((1, 10)));
/// assert_eq!(item(3).view(&state).unwrap(), Value::unit());
/// assert_eq!(
///     item(1).set(&state, val!((3, 30))).unwrap(),
///     val!({2 => 20, 3 => 30}),
/// );
/// assert_eq!(
///     item(1).set(&state, Value::unit()).unwrap(),
///     val!({2 => 20}),
/// );
/// ```
pub fn item(key: impl Into<Value>) -> Optic {
    let key = key.into();
    let set_key = key.clone();
    Optic::lens(
        move |state| {
            let map = expect_map(state)?;
            Ok(match map.get(&key) {
                Some(value) => {
                    Value::new(Tuple::new(vec![key.clone(), value.clone()]))
                }
                None => Value::unit(),
            })
        },
        move |state, focus| {
            let map = expect_map(state)?;
            let missing = || OpticError::KeyMissing(format!("{set_key:?}"));
            if focus.is::<Unit>() {
                if !map.contains_key(&set_key) {
                    return Err(missing());
                }
                return Ok(Value::from(map.removed(&set_key)));
            }
            let (new_key, new_value) = pair_from_value(&focus)?;
            let mut data = map.clone();
            if new_key != set_key {
                if !data.contains_key(&set_key) {
                    return Err(missing());
                }
                // A renamed entry leaves its old slot and lands at the
                // end, like delete-then-insert.
                data = data.removed(&set_key);
            }
            Ok(Value::from(data.inserted(new_key, new_value)))
        },
    )
}

/// Like [`item`], but addressed by value: focuses the first entry whose
/// value equals `value`. Assumes at most one entry matches; setting
/// removes every matching entry before inserting the replacement pair.
///
/// ```
/// use refract::optics::item_by_value;
/// use refract::val;
///
/// let state = val!({1 => 10, 2 => 20});
/// assert_eq!(item_by_value(10).view(&state).unwrap(), val!((1, 10)));
/// assert_eq!(
///     item_by_value(10).set(&state, val!((3, 10))).unwrap(),
///     val!({2 => 20, 3 => 10}),
/// );
/// ```
pub fn item_by_value(value: impl Into<Value>) -> Optic {
    let target = value.into();
    let set_target = target.clone();
    Optic::lens(
        move |state| {
            let map = expect_map(state)?;
            let found = map
                .pairs()
                .iter()
                .find(|(_, existing)| *existing == target);
            Ok(match found {
                Some((key, value)) => {
                    Value::new(Tuple::new(vec![key.clone(), value.clone()]))
                }
                None => Value::unit(),
            })
        },
        move |state, focus| {
            let map = expect_map(state)?;
            let mut data = Map::new();
            for (key, value) in map.pairs() {
                if *value != set_target {
                    data = data.inserted(key.clone(), value.clone());
                }
            }
            if focus.is::<Unit>() {
                return Ok(Value::from(data));
            }
            let (new_key, new_value) = pair_from_value(&focus)?;
            Ok(Value::from(data.inserted(new_key, new_value)))
        },
    )
}

/// A lens gathering the foci of several lenses into one tuple. Only
/// optics of kind `Lens` may take part; setting writes the tuple's
/// elements back through each lens in turn.
///
/// ```
/// use refract::optics::{index, tuple_of};
/// use refract::val;
///
/// let ends = tuple_of(vec![index(0), index(2)]).unwrap();
/// assert_eq!(ends.view(&val!([1, 2, 3, 4])).unwrap(), val!((1, 3)));
/// assert_eq!(
///     ends.set(&val!([1, 2, 3, 4]), val!((5, 6))).unwrap(),
///     val!([5, 2, 6, 4]),
/// );
/// ```
pub fn tuple_of(lenses: Vec<Optic>) -> Result<Optic> {
    for lens in &lenses {
        if !lens.is_kind(Kind::Lens) {
            return Err(OpticError::KindMismatch {
                operation: "tuple_of",
                required: Kind::Lens,
            });
        }
    }
    let get_lenses = lenses.clone();
    Ok(Optic::lens(
        move |state| {
            let foci: Result<Vec<Value>> =
                get_lenses.iter().map(|lens| lens.view(state)).collect();
            Ok(Value::new(Tuple::new(foci?)))
        },
        move |state, focus| {
            let focus =
                focus
                    .downcast_ref::<Tuple>()
                    .ok_or(OpticError::TypeMismatch {
                        expected: "tuple",
                        found: focus.type_name(),
                    })?;
            let mut state = state.clone();
            for (lens, value) in lenses.iter().zip(focus.elements()) {
                state = lens.set(&state, value.clone())?;
            }
            Ok(state)
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::val;

    #[test]
    fn test_index_lens_laws_hold_for_sequences() {
        let first = index(0);
        let state = val!([1, 2, 3]);
        // set-get
        let focus = first.view(&state).unwrap();
        assert_eq!(first.set(&state, focus).unwrap(), state);
        // get-set
        let updated = first.set(&state, val!(9)).unwrap();
        assert_eq!(first.view(&updated).unwrap(), val!(9));
    }

    #[test]
    fn test_index_out_of_range() {
        assert!(matches!(
            index(5).view(&val!([1, 2])),
            Err(OpticError::IndexOutOfRange { index: 5, len: 2 })
        ));
    }

    #[test]
    fn test_index_or_only_defaults_missing_keys() {
        let state = val!({"a" => 1});
        assert_eq!(index_or("a", 0).view(&state).unwrap(), val!(1));
        assert_eq!(index_or("b", 0).view(&state).unwrap(), val!(0));
    }

    #[test]
    fn test_item_set_same_key_keeps_position() {
        let state = val!({1 => 10, 2 => 20});
        assert_eq!(
            item(1).set(&state, val!((1, 11))).unwrap(),
            val!({1 => 11, 2 => 20}),
        );
    }

    #[test]
    fn test_item_remove_requires_the_key() {
        let state = val!({1 => 10});
        assert!(matches!(
            item(2).set(&state, Value::unit()),
            Err(OpticError::KeyMissing(_))
        ));
    }

    #[test]
    fn test_item_by_value_removal() {
        let state = val!({1 => 10, 2 => 20});
        assert_eq!(
            item_by_value(10).set(&state, Value::unit()).unwrap(),
            val!({2 => 20}),
        );
    }

    #[test]
    fn test_contains_set_is_idempotent() {
        let state = val!([1, 2, 3]);
        assert_eq!(contains(1).set(&state, val!(true)).unwrap(), state);
        assert_eq!(contains(4).set(&state, val!(false)).unwrap(), state);
    }

    #[test]
    fn test_tuple_of_rejects_non_lenses() {
        let result = tuple_of(vec![index(0), crate::optics::each()]);
        assert!(matches!(
            result,
            Err(OpticError::KindMismatch {
                operation: "tuple_of",
                ..
            })
        ));
    }
}
