//! Number-theory predicates.
//!
//! Every function here is total over `i32`: no panics, no overflow, no I/O.
//! Intermediate arithmetic is widened (`i64`/`u64`) so `i32::MIN` and
//! ten-digit Armstrong power sums are handled exactly.
//!
//! | Function | Domain note |
//! |----------|-------------|
//! | [`is_prime`] | signed; `false` for `n <= 1` |
//! | [`is_perfect`] | signed; `false` for `n <= 1` |
//! | [`digit_sum`] | absolute value |
//! | [`is_armstrong`] | absolute value |
//! | [`parity`] | signed, `n % 2 == 0` |

use serde::{Deserialize, Serialize};

/// Parity of an integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Parity {
    /// Divisible by two.
    Even,
    /// Not divisible by two.
    Odd,
}

impl Parity {
    /// Returns the lowercase tag for this parity.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Even => "even",
            Self::Odd => "odd",
        }
    }
}

/// Returns `true` if `n` is prime.
///
/// Trial division by every `i` in `2..=floor(sqrt(n))`. The upper bound is
/// inclusive, so perfect squares such as 25 or 49 are rejected.
///
/// ```
/// use numeris_core::is_prime;
///
/// assert!(is_prime(17));
/// assert!(!is_prime(25));
/// assert!(!is_prime(1));
/// assert!(!is_prime(-7));
/// ```
pub fn is_prime(n: i32) -> bool {
    if n <= 1 {
        return false;
    }

    let n = i64::from(n);
    let mut i: i64 = 2;
    while i * i <= n {
        if n % i == 0 {
            return false;
        }
        i += 1;
    }
    true
}

/// Returns `true` if `n` equals the sum of its proper divisors.
///
/// Divisors are collected in pairs `(i, n / i)` for `i` in
/// `2..=floor(sqrt(n))`, starting from the divisor 1. The square root of a
/// perfect square is only counted once.
///
/// ```
/// use numeris_core::is_perfect;
///
/// assert!(is_perfect(6));
/// assert!(is_perfect(8128));
/// assert!(!is_perfect(1));
/// assert!(!is_perfect(-6));
/// ```
pub fn is_perfect(n: i32) -> bool {
    if n <= 1 {
        return false;
    }

    let n = i64::from(n);
    let mut sum: i64 = 1;
    let mut i: i64 = 2;
    while i * i <= n {
        if n % i == 0 {
            sum += i;
            let paired = n / i;
            if paired != i {
                sum += paired;
            }
        }
        i += 1;
    }
    sum == n
}

/// Returns the sum of the decimal digits of `|n|`.
///
/// ```
/// use numeris_core::digit_sum;
///
/// assert_eq!(digit_sum(371), 11);
/// assert_eq!(digit_sum(-371), 11);
/// assert_eq!(digit_sum(0), 0);
/// ```
pub fn digit_sum(n: i32) -> u32 {
    let mut rest = n.unsigned_abs();
    let mut sum = 0;
    while rest > 0 {
        sum += rest % 10;
        rest /= 10;
    }
    sum
}

/// Returns `true` if `|n|` is an Armstrong (narcissistic) number.
///
/// With `d` the number of decimal digits of `|n|` (1 for zero), the number
/// is Armstrong when the sum of each digit raised to `d` equals `|n|`.
/// Negative inputs are judged by their absolute value.
///
/// ```
/// use numeris_core::is_armstrong;
///
/// assert!(is_armstrong(153));
/// assert!(is_armstrong(-153));
/// assert!(is_armstrong(0));
/// assert!(!is_armstrong(154));
/// ```
pub fn is_armstrong(n: i32) -> bool {
    let value = u64::from(n.unsigned_abs());
    let digits = digit_count(value);

    let mut sum: u64 = 0;
    let mut rest = value;
    while rest > 0 {
        sum += (rest % 10).pow(digits);
        rest /= 10;
    }
    sum == value
}

/// Returns the parity of `n`.
///
/// ```
/// use numeris_core::{parity, Parity};
///
/// assert_eq!(parity(-4), Parity::Even);
/// assert_eq!(parity(-3), Parity::Odd);
/// ```
pub fn parity(n: i32) -> Parity {
    if n % 2 == 0 {
        Parity::Even
    } else {
        Parity::Odd
    }
}

// Number of decimal digits; zero has one digit.
fn digit_count(mut value: u64) -> u32 {
    let mut count = 1;
    while value >= 10 {
        value /= 10;
        count += 1;
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_prime_small_values() {
        let primes: Vec<i32> = (-10..50).filter(|&n| is_prime(n)).collect();
        assert_eq!(
            primes,
            vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47]
        );
    }

    #[test]
    fn test_is_prime_perfect_squares() {
        for root in 2..100 {
            assert!(!is_prime(root * root), "{} is a square", root * root);
        }
    }

    #[test]
    fn test_is_prime_extremes() {
        assert!(is_prime(i32::MAX));
        assert!(!is_prime(i32::MIN));
        assert!(!is_prime(0));
        assert!(!is_prime(1));
        assert!(is_prime(2_147_483_629));
        assert!(!is_prime(2_147_395_600)); // 46340^2
    }

    #[test]
    fn test_is_perfect_known_values() {
        let perfect: Vec<i32> = (-10..10_000).filter(|&n| is_perfect(n)).collect();
        assert_eq!(perfect, vec![6, 28, 496, 8128]);
        assert!(is_perfect(33_550_336));
    }

    #[test]
    fn test_is_perfect_squares_count_root_once() {
        // 16: 1 + 2 + 8 + 4 = 15, root 4 counted once
        assert!(!is_perfect(16));
        assert!(!is_perfect(36));
    }

    #[test]
    fn test_is_perfect_extremes() {
        assert!(!is_perfect(i32::MAX));
        assert!(!is_perfect(i32::MIN));
    }

    #[test]
    fn test_digit_sum() {
        assert_eq!(digit_sum(0), 0);
        assert_eq!(digit_sum(7), 7);
        assert_eq!(digit_sum(153), 9);
        assert_eq!(digit_sum(-153), 9);
        assert_eq!(digit_sum(1_000_000), 1);
        assert_eq!(digit_sum(i32::MAX), 46);
        assert_eq!(digit_sum(i32::MIN), 47);
    }

    #[test]
    fn test_is_armstrong_known_values() {
        let armstrong: Vec<i32> = (0..100_000).filter(|&n| is_armstrong(n)).collect();
        assert_eq!(
            armstrong,
            vec![
                0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 153, 370, 371, 407, 1634, 8208, 9474, 54748, 92727,
                93084
            ]
        );
    }

    #[test]
    fn test_is_armstrong_large_and_negative() {
        assert!(is_armstrong(146_511_208));
        assert!(is_armstrong(-9474));
        assert!(!is_armstrong(154));
        assert!(!is_armstrong(i32::MAX));
        assert!(!is_armstrong(i32::MIN));
    }

    #[test]
    fn test_parity() {
        assert_eq!(parity(0), Parity::Even);
        assert_eq!(parity(1), Parity::Odd);
        assert_eq!(parity(-1), Parity::Odd);
        assert_eq!(parity(-2), Parity::Even);
        assert_eq!(parity(i32::MIN), Parity::Even);
        assert_eq!(parity(i32::MAX), Parity::Odd);
        assert_eq!(Parity::Even.as_str(), "even");
        assert_eq!(Parity::Odd.as_str(), "odd");
    }

    #[test]
    fn test_digit_count() {
        assert_eq!(digit_count(0), 1);
        assert_eq!(digit_count(9), 1);
        assert_eq!(digit_count(10), 2);
        assert_eq!(digit_count(2_147_483_648), 10);
    }
}
