//! Traversal constructors: optics over zero or more foci.

use crate::error::{OpticError, Result};
use crate::hooks;
use crate::value::{expect_map, pair_from_value, HostValue, Map, Tuple, Unit, Value};

use super::optic::Optic;

/// A traversal focusing every element the state iterates over.
/// Mappings iterate as key-value pairs, so the state can be rebuilt
/// faithfully afterwards.
///
/// ```
/// use refract::optics::each;
/// use refract::val;
///
/// let doubled = each()
///     .over(&val!([1, 2, 3]), |n| Ok(val!(n.as_int().unwrap() * 2)))
///     .unwrap();
/// assert_eq!(doubled, val!([2, 4, 6]));
/// ```
#[must_use]
pub fn each() -> Optic {
    Optic::traversal(hooks::to_iter, hooks::from_iter)
}

/// A traversal focusing the key-value pairs of a map. Replacing a pair
/// with [`Unit`] removes the entry.
///
/// ```
/// use refract::optics::items;
/// use refract::val;
/// use refract::value::Tuple;
///
/// let state = val!({1 => 10, 2 => 20});
/// assert_eq!(
///     items().to_list(&state).unwrap(),
///     vec![val!((1, 10)), val!((2, 20))],
/// );
/// ```
#[must_use]
pub fn items() -> Optic {
    Optic::traversal(
        |state| {
            Ok(expect_map(state)?
                .pairs()
                .iter()
                .map(|(key, value)| {
                    Value::new(Tuple::new(vec![key.clone(), value.clone()]))
                })
                .collect())
        },
        |state, pairs| {
            expect_map(state)?;
            let mut data = Map::new();
            for pair in pairs {
                if pair.is::<Unit>() {
                    continue;
                }
                let (key, value) = pair_from_value(&pair)?;
                data = data.inserted(key, value);
            }
            Ok(Value::from(data))
        },
    )
}

/// A traversal focusing the values of a map, leaving keys alone.
///
/// ```
/// use refract::optics::values;
/// use refract::val;
///
/// let bumped = values()
///     .over(&val!({1 => 10, 2 => 20}), |n| {
///         Ok(val!(n.as_int().unwrap() + 1))
///     })
///     .unwrap();
/// assert_eq!(bumped, val!({1 => 11, 2 => 21}));
/// ```
#[must_use]
pub fn values() -> Optic {
    Optic::traversal(
        |state| {
            Ok(expect_map(state)?
                .pairs()
                .iter()
                .map(|(_, value)| value.clone())
                .collect())
        },
        |state, replacements| {
            let map = expect_map(state)?;
            let mut data = Map::new();
            for ((key, _), value) in map.pairs().iter().zip(replacements) {
                data = data.inserted(key.clone(), value);
            }
            Ok(Value::from(data))
        },
    )
}

/// A traversal focusing the elements at indices 0 and 1, for pair-like
/// states.
///
/// ```
/// use refract::optics::both;
/// use refract::val;
///
/// assert_eq!(
///     both().set(&val!([1, 2, 3]), val!(9)).unwrap(),
///     val!([9, 9, 3]),
/// );
/// ```
#[must_use]
pub fn both() -> Optic {
    Optic::traversal(
        |state| {
            Ok(vec![
                hooks::getitem(state, &Value::from(0))?,
                hooks::getitem(state, &Value::from(1))?,
            ])
        },
        |state, replacements| {
            let mut replacements = replacements.into_iter();
            let first = replacements.next().ok_or(OpticError::ValuesExhausted)?;
            let second = replacements.next().ok_or(OpticError::ValuesExhausted)?;
            let state = hooks::setitem(state, &Value::from(0), first)?;
            hooks::setitem(&state, &Value::from(1), second)
        },
    )
}

/// A traversal that descends through nested structure focusing every
/// value of host type `T`, however deep. Descent follows the iteration
/// hooks first and named fields second; a state that is itself a `T` is
/// focused whole and not descended into.
///
/// ```
/// use refract::optics::recur;
/// use refract::val;
///
/// let state = val!([[1, 2, "x"], [3, ["y", 4]]]);
/// assert_eq!(
///     recur::<i64>().to_list(&state).unwrap(),
///     vec![val!(1), val!(2), val!(3), val!(4)],
/// );
/// let bumped = recur::<i64>()
///     .over(&state, |n| Ok(val!(n.as_int().unwrap() + 1)))
///     .unwrap();
/// assert_eq!(bumped, val!([[2, 3, "x"], [4, ["y", 5]]]));
/// ```
#[must_use]
pub fn recur<T: HostValue>() -> Optic {
    recur_with_limit::<T>(None)
}

/// Like [`recur`], but fails with [`OpticError::RecursionLimit`] when
/// the structure nests deeper than `limit` levels.
#[must_use]
pub fn recur_bounded<T: HostValue>(limit: usize) -> Optic {
    recur_with_limit::<T>(Some(limit))
}

fn recur_with_limit<T: HostValue>(limit: Option<usize>) -> Optic {
    Optic::traversal(
        move |state| {
            let mut foci = Vec::new();
            collect::<T>(state, 0, limit, &mut foci)?;
            Ok(foci)
        },
        move |state, replacements| {
            let mut replacements = replacements.into_iter();
            rebuild::<T>(state, 0, limit, &mut replacements)
        },
    )
}

fn check_depth(depth: usize, limit: Option<usize>) -> Result<()> {
    match limit {
        Some(limit) if depth > limit => Err(OpticError::RecursionLimit(limit)),
        _ => Ok(()),
    }
}

// Single-character strings iterate to themselves and would recurse
// forever.
fn descendible(state: &Value) -> bool {
    if state.as_str().is_some_and(|text| text.chars().count() == 1) {
        return false;
    }
    hooks::supports_iteration(state)
}

fn collect<T: HostValue>(
    state: &Value,
    depth: usize,
    limit: Option<usize>,
    foci: &mut Vec<Value>,
) -> Result<()> {
    check_depth(depth, limit)?;
    if state.is::<T>() {
        foci.push(state.clone());
        return Ok(());
    }
    if descendible(state) {
        for substate in hooks::to_iter(state)? {
            collect::<T>(&substate, depth + 1, limit, foci)?;
        }
        return Ok(());
    }
    for name in hooks::field_names(state)? {
        let substate = hooks::getattr(state, &name)?;
        collect::<T>(&substate, depth + 1, limit, foci)?;
    }
    Ok(())
}

fn rebuild<T: HostValue>(
    state: &Value,
    depth: usize,
    limit: Option<usize>,
    replacements: &mut std::vec::IntoIter<Value>,
) -> Result<Value> {
    check_depth(depth, limit)?;
    if state.is::<T>() {
        return replacements.next().ok_or(OpticError::ValuesExhausted);
    }
    if descendible(state) {
        let mut rebuilt = Vec::new();
        for substate in hooks::to_iter(state)? {
            let replacement =
                rebuild_if_focused::<T>(&substate, depth + 1, limit, replacements)?;
            rebuilt.push(replacement.unwrap_or(substate));
        }
        return hooks::from_iter(state, rebuilt);
    }
    let mut rebuilt = state.clone();
    for name in hooks::field_names(state)? {
        let substate = hooks::getattr(state, &name)?;
        if let Some(replacement) =
            rebuild_if_focused::<T>(&substate, depth + 1, limit, replacements)?
        {
            rebuilt = hooks::setattr(&rebuilt, &name, replacement)?;
        }
    }
    Ok(rebuilt)
}

// Substates without any focus pass through untouched; descending into
// them anyway would reject host types with no hooks at all.
fn rebuild_if_focused<T: HostValue>(
    substate: &Value,
    depth: usize,
    limit: Option<usize>,
    replacements: &mut std::vec::IntoIter<Value>,
) -> Result<Option<Value>> {
    let mut foci = Vec::new();
    collect::<T>(substate, depth, limit, &mut foci)?;
    if foci.is_empty() {
        Ok(None)
    } else {
        rebuild::<T>(substate, depth, limit, replacements).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::val;
    use crate::value::Record;

    #[test]
    fn test_each_iterates_maps_by_pairs() {
        let state = val!({"one" => 1});
        assert_eq!(each().to_list(&state).unwrap(), vec![val!(("one", 1))]);
    }

    #[test]
    fn test_each_over_strings() {
        let shouted = each()
            .over(&val!("abc"), |character| {
                Ok(Value::from(character.as_str().unwrap().to_uppercase()))
            })
            .unwrap();
        assert_eq!(shouted, val!("ABC"));
    }

    #[test]
    fn test_items_set_unit_drops_the_entry() {
        let state = val!({1 => 10, 2 => 20});
        let updated = items()
            .over(&state, |pair| {
                if *pair == val!((1, 10)) {
                    Ok(Value::unit())
                } else {
                    Ok(pair.clone())
                }
            })
            .unwrap();
        assert_eq!(updated, val!({2 => 20}));
    }

    #[test]
    fn test_values_keeps_keys() {
        let state = val!({1 => 10, 2 => 20});
        assert_eq!(
            values().to_list(&state).unwrap(),
            vec![val!(10), val!(20)],
        );
        assert_eq!(
            values().set(&state, val!(0)).unwrap(),
            val!({1 => 0, 2 => 0}),
        );
    }

    #[test]
    fn test_recur_descends_through_records() {
        let state = val!([
            1,
            {"deep" => [2, 3]},
        ]);
        let nested = Value::from(Record::new(vec![("inner", state)]));
        let outer = Value::from(vec![nested, val!(4)]);
        assert_eq!(
            recur::<i64>().to_list(&outer).unwrap(),
            vec![val!(1), val!(2), val!(3), val!(4)],
        );
    }

    #[test]
    fn test_recur_skips_foreign_leaves() {
        let state = val!([1, "hello", 2.5, 2]);
        assert_eq!(
            recur::<i64>().to_list(&state).unwrap(),
            vec![val!(1), val!(2)],
        );
    }

    #[test]
    fn test_recur_over_rebuilds_in_order() {
        let state = val!([[1], [], [2, [3]]]);
        let updated = recur::<i64>()
            .iterate(&state, vec![val!(10), val!(20), val!(30)])
            .unwrap();
        assert_eq!(updated, val!([[10], [], [20, [30]]]));
    }

    #[test]
    fn test_recur_bounded_reports_deep_nesting() {
        let state = val!([[[1]]]);
        assert!(matches!(
            recur_bounded::<i64>(1).to_list(&state),
            Err(OpticError::RecursionLimit(1))
        ));
        assert_eq!(
            recur_bounded::<i64>(5).to_list(&state).unwrap(),
            vec![val!(1)],
        );
    }

    #[test]
    fn test_recur_treats_characters_as_atoms() {
        // Without the atom guard a single-character string iterates to
        // itself and the descent never bottoms out.
        let state = val!(["ab"]);
        assert_eq!(recur::<i64>().to_list(&state).unwrap(), vec![]);
        assert_eq!(
            recur::<String>().to_list(&state).unwrap(),
            vec![val!("ab")],
        );
    }
}
