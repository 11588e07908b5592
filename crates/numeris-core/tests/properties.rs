//! Property-based tests for validation and predicates.

use numeris_core::{
    digit_sum, is_armstrong, is_perfect, is_prime, validate, Classification, Property,
    ValidationError,
};
use proptest::prelude::*;

proptest! {
    #[test]
    fn prop_digit_sum_is_sign_symmetric(n in (i32::MIN + 1)..=i32::MAX) {
        prop_assert_eq!(digit_sum(n), digit_sum(-n));
    }

    #[test]
    fn prop_nothing_at_or_below_one_is_prime_or_perfect(n in i32::MIN..=1) {
        prop_assert!(!is_prime(n));
        prop_assert!(!is_perfect(n));
    }

    #[test]
    fn prop_prime_has_no_small_divisor(n in 2i32..100_000) {
        let has_divisor = (2..n).any(|d| n % d == 0);
        prop_assert_eq!(is_prime(n), !has_divisor);
    }

    #[test]
    fn prop_armstrong_ignores_sign(n in (i32::MIN + 1)..=i32::MAX) {
        prop_assert_eq!(is_armstrong(n), is_armstrong(-n));
    }

    #[test]
    fn prop_properties_end_with_exactly_one_parity_tag(n in any::<i32>()) {
        let c = Classification::of(n);
        let parity_tags: Vec<_> = c
            .properties
            .iter()
            .filter(|p| matches!(p, Property::Even | Property::Odd))
            .collect();

        prop_assert_eq!(parity_tags.len(), 1);
        let expected = if n % 2 == 0 { Property::Even } else { Property::Odd };
        prop_assert_eq!(c.properties.last().copied(), Some(expected));

        if c.is_armstrong {
            prop_assert_eq!(c.properties.first().copied(), Some(Property::Armstrong));
            prop_assert_eq!(c.properties.len(), 2);
        } else {
            prop_assert_eq!(c.properties.len(), 1);
        }
    }

    #[test]
    fn prop_validate_round_trips_formatted_integers(n in any::<i32>(), pad in 0usize..4) {
        let raw = format!("{}{}{}", " ".repeat(pad), n, "\t".repeat(pad));
        prop_assert_eq!(validate(Some(&raw)), Ok(n));
    }

    #[test]
    fn prop_validate_rejects_alphabetic_input(s in "[a-zA-Z]{1,12}") {
        prop_assert_eq!(validate(Some(&s)), Err(ValidationError::not_integer(s.clone())));
    }

    #[test]
    fn prop_validate_blank_is_missing(s in "[ \t\r\n]{0,8}") {
        prop_assert_eq!(validate(Some(&s)), Err(ValidationError::Missing));
    }
}
