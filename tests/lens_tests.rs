//! Unit tests for the lens family of optics.
//!
//! This module covers the lenses built over the host-value hooks:
//!
//! - [`index`] / [`index_or`]: positional and keyed access
//! - [`field`]: named-field access on records
//! - [`item`] / [`item_by_value`]: whole-entry access on maps
//! - [`contains`]: membership as a boolean focus
//! - [`tuple_of`]: several lenses fused into one tuple-shaped focus

use refract::prelude::*;
use rstest::rstest;

// =============================================================================
// index
// =============================================================================

/// index views the element at a position in a sequence
#[test]
fn test_index_views_sequence_element() {
    let state = val!([10, 20, 30]);
    assert_eq!(index(1).view(&state).unwrap(), val!(20));
}

/// index sets the element at a position, leaving the rest unchanged
#[test]
fn test_index_sets_sequence_element() {
    let state = val!([10, 20, 30]);
    let updated = index(1).set(&state, val!(99)).unwrap();
    assert_eq!(updated, val!([10, 99, 30]));
}

/// index modifies the element in place
#[test]
fn test_index_over_modifies_element() {
    let state = val!([1, 2, 3]);
    let updated = index(1)
        .over(&state, |n| Ok(val!(n.as_int().unwrap() + 10)))
        .unwrap();
    assert_eq!(updated, val!([1, 12, 3]));
}

/// A negative index counts from the end, wrapping exactly once
#[rstest]
#[case(-1, 30)]
#[case(-3, 10)]
fn test_index_negative_counts_from_end(#[case] position: i64, #[case] expected: i64) {
    let state = val!([10, 20, 30]);
    assert_eq!(index(position).view(&state).unwrap(), val!(expected));
}

/// An out-of-range index fails with the offending position and length
#[test]
fn test_index_out_of_range_reports_position() {
    let state = val!([10, 20]);
    assert_eq!(
        index(5).view(&state),
        Err(OpticError::IndexOutOfRange { index: 5, len: 2 })
    );
    assert_eq!(
        index(-3).view(&state),
        Err(OpticError::IndexOutOfRange { index: -3, len: 2 })
    );
}

/// index works over map keys as well as sequence positions
#[test]
fn test_index_views_map_value() {
    let state = val!({"name" => "jane", "score" => 7});
    assert_eq!(index("score").view(&state).unwrap(), val!(7));
    let updated = index("score").set(&state, val!(8)).unwrap();
    assert_eq!(updated, val!({"name" => "jane", "score" => 8}));
}

/// A missing map key fails with the key's rendering
#[test]
fn test_index_missing_key_fails() {
    let state = val!({"name" => "jane"});
    assert!(matches!(
        index("score").view(&state),
        Err(OpticError::KeyMissing(_))
    ));
}

/// index views a single character of a string as a one-character string
#[test]
fn test_index_views_string_character() {
    let state = val!("hello");
    assert_eq!(index(1).view(&state).unwrap(), val!("e"));
    assert_eq!(
        index(1).set(&state, val!("a")).unwrap(),
        val!("hallo")
    );
}

// =============================================================================
// index_or
// =============================================================================

/// index_or falls back to the default only when the key is absent
#[test]
fn test_index_or_defaults_on_missing_key() {
    let lens = index_or("score", 0);
    assert_eq!(lens.view(&val!({"name" => "jane"})).unwrap(), val!(0));
    assert_eq!(
        lens.view(&val!({"score" => 7})).unwrap(),
        val!(7)
    );
}

/// Setting through index_or inserts the key when it was absent
#[test]
fn test_index_or_set_inserts_missing_key() {
    let lens = index_or("score", 0);
    let updated = lens.set(&val!({"name" => "jane"}), val!(5)).unwrap();
    assert_eq!(updated, val!({"name" => "jane", "score" => 5}));
}

/// index_or modifies the default when the key is absent
#[test]
fn test_index_or_over_starts_from_default() {
    let lens = index_or("hits", 0);
    let updated = lens
        .over(&val!({}), |count| {
            Ok(val!(count.as_int().unwrap_or(0) + 1))
        })
        .unwrap();
    assert_eq!(updated, val!({"hits" => 1}));
}

/// Out-of-range sequence access is not masked by the default
#[test]
fn test_index_or_does_not_mask_range_errors() {
    let lens = index_or(5, 0);
    assert_eq!(
        lens.view(&val!([1, 2])),
        Err(OpticError::IndexOutOfRange { index: 5, len: 2 })
    );
}

// =============================================================================
// field
// =============================================================================

/// field views and rebuilds a named record field
#[test]
fn test_field_views_and_sets_record() {
    let state = Value::from(Record::new(vec![
        ("name", val!("jane")),
        ("score", val!(7)),
    ]));
    let lens = field("score");
    assert_eq!(lens.view(&state).unwrap(), val!(7));

    let updated = lens.set(&state, val!(9)).unwrap();
    assert_eq!(field("score").view(&updated).unwrap(), val!(9));
    assert_eq!(field("name").view(&updated).unwrap(), val!("jane"));
}

/// A record rejects fields it does not declare
#[test]
fn test_field_unknown_name_fails() {
    let state = Value::from(Record::new(vec![("name", val!("jane"))]));
    assert_eq!(
        field("score").view(&state),
        Err(OpticError::FieldMissing("score".to_string()))
    );
    assert_eq!(
        field("score").set(&state, val!(1)),
        Err(OpticError::FieldMissing("score".to_string()))
    );
}

// =============================================================================
// contains
// =============================================================================

/// contains views membership as a boolean
#[test]
fn test_contains_views_membership() {
    let lens = contains(2);
    assert_eq!(lens.view(&val!([1, 2, 3])).unwrap(), val!(true));
    assert_eq!(lens.view(&val!([1, 3])).unwrap(), val!(false));
}

/// Setting true inserts the item when absent, setting false removes it
#[test]
fn test_contains_set_adds_and_removes() {
    let state = Value::from(Set::from_values(vec![val!(1), val!(2)]));

    let added = contains(3).set(&state, val!(true)).unwrap();
    assert_eq!(contains(3).view(&added).unwrap(), val!(true));

    let removed = contains(1).set(&added, val!(false)).unwrap();
    assert_eq!(contains(1).view(&removed).unwrap(), val!(false));
    assert_eq!(contains(2).view(&removed).unwrap(), val!(true));
}

/// Setting an already-correct membership leaves the state untouched
#[test]
fn test_contains_set_is_idempotent() {
    let state = Value::from(Set::from_values(vec![val!(1)]));

    let unchanged = contains(1).set(&state, val!(true)).unwrap();
    assert_eq!(unchanged, state);
    let also_unchanged = contains(9).set(&state, val!(false)).unwrap();
    assert_eq!(also_unchanged, state);
}

/// contains treats substrings as string membership
#[test]
fn test_contains_substring() {
    assert_eq!(
        contains("ell").view(&val!("hello")).unwrap(),
        val!(true)
    );
}

// =============================================================================
// item
// =============================================================================

/// item focuses a whole key/value entry as a pair
#[test]
fn test_item_views_entry_as_pair() {
    let state = val!({"a" => 1, "b" => 2});
    let pair = item("a").view(&state).unwrap();
    assert_eq!(pair, Value::from(Tuple::new(vec![val!("a"), val!(1)])));
}

/// A missing key focuses the unit value instead of failing
#[test]
fn test_item_missing_key_views_unit() {
    let state = val!({"a" => 1});
    assert_eq!(item("b").view(&state).unwrap(), Value::unit());
}

/// Setting a renamed pair moves the entry to the new key
#[test]
fn test_item_set_renames_key() {
    let state = val!({"a" => 1, "b" => 2});
    let renamed = item("a")
        .set(&state, Value::from(Tuple::new(vec![val!("z"), val!(10)])))
        .unwrap();
    assert_eq!(item("a").view(&renamed).unwrap(), Value::unit());
    let moved = item("z").view(&renamed).unwrap();
    assert_eq!(moved, Value::from(Tuple::new(vec![val!("z"), val!(10)])));
}

/// Setting the same key back keeps the entry's position
#[test]
fn test_item_set_same_key_keeps_position() {
    let state = val!({"a" => 1, "b" => 2});
    let updated = item("a")
        .set(&state, Value::from(Tuple::new(vec![val!("a"), val!(9)])))
        .unwrap();
    assert_eq!(updated, val!({"a" => 9, "b" => 2}));
}

/// Setting unit deletes the entry
#[test]
fn test_item_set_unit_removes_entry() {
    let state = val!({"a" => 1, "b" => 2});
    let pruned = item("a").set(&state, Value::unit()).unwrap();
    assert_eq!(pruned, val!({"b" => 2}));
}

/// Deleting an absent entry fails with the missing key
#[test]
fn test_item_delete_missing_key_fails() {
    let state = val!({"a" => 1});
    assert!(matches!(
        item("b").set(&state, Value::unit()),
        Err(OpticError::KeyMissing(_))
    ));
}

// =============================================================================
// item_by_value
// =============================================================================

/// item_by_value focuses the first entry whose value matches
#[test]
fn test_item_by_value_views_first_match() {
    let state = val!({"a" => 1, "b" => 2, "c" => 1});
    let pair = item_by_value(1).view(&state).unwrap();
    assert_eq!(pair, Value::from(Tuple::new(vec![val!("a"), val!(1)])));
}

/// item_by_value with no match focuses the unit value
#[test]
fn test_item_by_value_no_match_views_unit() {
    let state = val!({"a" => 1});
    assert_eq!(item_by_value(9).view(&state).unwrap(), Value::unit());
}

/// Setting through item_by_value replaces every matching entry
#[test]
fn test_item_by_value_set_replaces_matches() {
    let state = val!({"a" => 1, "b" => 2, "c" => 1});
    let updated = item_by_value(1)
        .set(&state, Value::from(Tuple::new(vec![val!("z"), val!(9)])))
        .unwrap();
    assert_eq!(item_by_value(1).view(&updated).unwrap(), Value::unit());
    assert_eq!(
        item_by_value(9).view(&updated).unwrap(),
        Value::from(Tuple::new(vec![val!("z"), val!(9)]))
    );
    assert_eq!(index("b").view(&updated).unwrap(), val!(2));
}

// =============================================================================
// tuple_of
// =============================================================================

/// tuple_of views several lenses as one tuple
#[test]
fn test_tuple_of_views_all_parts() {
    let lens = tuple_of(vec![index(0), index(2)]).unwrap();
    let focus = lens.view(&val!([1, 2, 3])).unwrap();
    assert_eq!(focus, Value::from(Tuple::new(vec![val!(1), val!(3)])));
}

/// tuple_of distributes a tuple of replacements back over its lenses
#[test]
fn test_tuple_of_sets_all_parts() {
    let lens = tuple_of(vec![index(0), index(2)]).unwrap();
    let updated = lens
        .set(
            &val!([1, 2, 3]),
            Value::from(Tuple::new(vec![val!(10), val!(30)])),
        )
        .unwrap();
    assert_eq!(updated, val!([10, 2, 30]));
}

/// tuple_of rejects parts that are not full lenses
#[test]
fn test_tuple_of_rejects_weaker_optics() {
    assert_eq!(
        tuple_of(vec![index(0), each()]).err(),
        Some(OpticError::KindMismatch {
            operation: "tuple_of",
            required: Kind::Lens,
        })
    );
}

// =============================================================================
// Composition through lenses
// =============================================================================

/// Nested positional access composes left to right
#[test]
fn test_composed_index_reaches_nested_element() {
    let state = val!([[1, 2], [3, 4]]);
    let inner = index(0).compose(&index(1)).unwrap();
    assert_eq!(inner.view(&state).unwrap(), val!(2));
    assert_eq!(
        inner.set(&state, val!(9)).unwrap(),
        val!([[1, 9], [3, 4]])
    );
}

/// Composing two lenses keeps the lens capability
#[test]
fn test_lens_composition_stays_a_lens() {
    let inner = index(0).compose(&index(1)).unwrap();
    assert_eq!(inner.kind(), Some(Kind::Lens));
}
