//! Property-based tests for the typeclass protocol.
//!
//! This module verifies the algebraic laws the fold and rebuild
//! machinery relies on:
//!
//! - **Monoid laws**: associativity, left and right identity
//! - **Functor laws**: identity and composition
//! - **Applicative laws**: homomorphism and value-major ordering
//! - **Hook round-trip**: `from_iter(s, to_iter(s)) == s` for every
//!   built-in host type

use proptest::prelude::*;
use refract::maybe::Maybe;
use refract::prelude::*;
use refract::{hooks, typeclass};

fn sequence_of(elements: &[i64]) -> Value {
    Value::from(elements.iter().map(|n| val!(*n)).collect::<Vec<_>>())
}

// =============================================================================
// Monoid laws
// =============================================================================

proptest! {
    /// Associativity for the integer sum monoid
    #[test]
    fn prop_int_mappend_is_associative(
        a in -1_000_000_i64..1_000_000,
        b in -1_000_000_i64..1_000_000,
        c in -1_000_000_i64..1_000_000,
    ) {
        let left = typeclass::mappend(
            &typeclass::mappend(&val!(a), &val!(b)).unwrap(),
            &val!(c),
        )
        .unwrap();
        let right = typeclass::mappend(
            &val!(a),
            &typeclass::mappend(&val!(b), &val!(c)).unwrap(),
        )
        .unwrap();
        prop_assert_eq!(left, right);
    }

    /// Associativity for the string concatenation monoid
    #[test]
    fn prop_string_mappend_is_associative(a in ".{0,8}", b in ".{0,8}", c in ".{0,8}") {
        let left = typeclass::mappend(
            &typeclass::mappend(&Value::from(a.clone()), &Value::from(b.clone())).unwrap(),
            &Value::from(c.clone()),
        )
        .unwrap();
        let right = typeclass::mappend(
            &Value::from(a),
            &typeclass::mappend(&Value::from(b), &Value::from(c)).unwrap(),
        )
        .unwrap();
        prop_assert_eq!(left, right);
    }

    /// mempty is a left and right identity for sequences
    #[test]
    fn prop_sequence_mempty_is_the_identity(
        elements in prop::collection::vec(any::<i64>(), 0..8),
    ) {
        let state = sequence_of(&elements);
        let empty = typeclass::mempty(&state).unwrap();
        prop_assert_eq!(
            typeclass::mappend(&empty, &state).unwrap(),
            state.clone()
        );
        prop_assert_eq!(typeclass::mappend(&state, &empty).unwrap(), state);
    }

    /// Nothing is a two-sided identity for the maybe monoid
    #[test]
    fn prop_maybe_nothing_is_the_identity(payload in any::<i64>()) {
        let just = Value::new(Maybe::just(val!(payload)));
        let nothing = Value::new(Maybe::Nothing);
        prop_assert_eq!(
            typeclass::mappend(&nothing, &just).unwrap(),
            just.clone()
        );
        prop_assert_eq!(typeclass::mappend(&just, &nothing).unwrap(), just);
    }
}

// =============================================================================
// Functor laws
// =============================================================================

proptest! {
    /// Identity: mapping the identity function changes nothing
    #[test]
    fn prop_fmap_identity_law(elements in prop::collection::vec(any::<i64>(), 0..8)) {
        let state = sequence_of(&elements);
        let mapped = typeclass::fmap(&state, &|value| Ok(value)).unwrap();
        prop_assert_eq!(mapped, state);
    }

    /// Composition: mapping f then g equals mapping g∘f
    #[test]
    fn prop_fmap_composition_law(elements in prop::collection::vec(-1000_i64..1000, 0..8)) {
        let state = sequence_of(&elements);
        let stepwise = typeclass::fmap(
            &typeclass::fmap(&state, &|n| Ok(val!(n.as_int().unwrap() + 1))).unwrap(),
            &|n| Ok(val!(n.as_int().unwrap() * 2)),
        )
        .unwrap();
        let fused = typeclass::fmap(&state, &|n| {
            Ok(val!((n.as_int().unwrap() + 1) * 2))
        })
        .unwrap();
        prop_assert_eq!(stepwise, fused);
    }

    /// Functor laws hold for maybe as well
    #[test]
    fn prop_maybe_fmap_identity_law(payload in any::<i64>()) {
        let just = Value::new(Maybe::just(val!(payload)));
        prop_assert_eq!(
            typeclass::fmap(&just, &|value| Ok(value)).unwrap(),
            just
        );
        let nothing = Value::new(Maybe::Nothing);
        prop_assert_eq!(
            typeclass::fmap(&nothing, &|value| Ok(value)).unwrap(),
            nothing
        );
    }
}

// =============================================================================
// Applicative laws
// =============================================================================

proptest! {
    /// Homomorphism: pure f applied to pure x is pure f(x)
    #[test]
    fn prop_apply_homomorphism_law(n in -1000_i64..1000) {
        let template = Value::from(Vec::<Value>::new());
        let value = typeclass::pure(&template, val!(n)).unwrap();
        let function = typeclass::pure(
            &template,
            Value::function(|value| Ok(val!(value.as_int().unwrap() * 2))),
        )
        .unwrap();
        prop_assert_eq!(
            typeclass::apply(&value, &function).unwrap(),
            typeclass::pure(&template, val!(n * 2)).unwrap()
        );
    }

    /// The sequence applicative is value-major: every function is
    /// applied to the first value before the second is touched
    #[test]
    fn prop_apply_is_value_major(a in -1000_i64..1000, b in -1000_i64..1000) {
        let functions = Value::from(vec![
            Value::function(|value| Ok(val!(value.as_int().unwrap() + 1))),
            Value::function(|value| Ok(val!(value.as_int().unwrap() - 1))),
        ]);
        let applied = typeclass::apply(&val!([a, b]), &functions).unwrap();
        prop_assert_eq!(
            applied,
            val!([(a + 1), (a - 1), (b + 1), (b - 1)])
        );
    }
}

// =============================================================================
// Hook round-trips
// =============================================================================

/// Rebuilding a state from its own elements reproduces it
#[test]
fn test_iteration_round_trips_for_builtins() {
    let states = vec![
        val!([1, 2, 3]),
        val!([]),
        val!("hello"),
        val!((1, "x")),
        val!({"a" => 1, "b" => 2}),
        Value::from(Set::from_values(vec![val!(1), val!(2)])),
        Value::new(Maybe::just(val!(5))),
        Value::new(Maybe::Nothing),
        Value::new(b"bytes".to_vec()),
    ];
    for state in states {
        let elements = hooks::to_iter(&state).unwrap();
        assert_eq!(hooks::from_iter(&state, elements).unwrap(), state);
    }
}

proptest! {
    /// The round-trip holds for arbitrary sequences
    #[test]
    fn prop_sequence_iteration_round_trips(
        elements in prop::collection::vec(any::<i64>(), 0..8),
    ) {
        let state = sequence_of(&elements);
        let listed = hooks::to_iter(&state).unwrap();
        prop_assert_eq!(hooks::from_iter(&state, listed).unwrap(), state);
    }

    /// The round-trip holds for arbitrary strings
    #[test]
    fn prop_string_iteration_round_trips(text in ".{0,12}") {
        let state = Value::from(text);
        let listed = hooks::to_iter(&state).unwrap();
        prop_assert_eq!(hooks::from_iter(&state, listed).unwrap(), state);
    }
}
