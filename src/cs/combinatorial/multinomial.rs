//! Counting distinct multiset permutations.

use num_bigint::BigUint;
use num_integer::binomial;
use num_traits::{One, ToPrimitive};

/// Number of distinct permutations of a multiset with the given group sizes,
/// n!/(m1!·m2!·…·mk!) where n is the sum of the sizes.
///
/// Computed as a running product of binomial coefficients.
///
/// # Example
/// ```
/// use mpermute::cs::combinatorial::multinomial::count_distinct_permutations;
/// use num_bigint::BigUint;
///
/// // (1, 4, 2, 2): groups {4}, {2, 2}, {1}
/// assert_eq!(count_distinct_permutations(&[1, 2, 1]), BigUint::from(12u32));
/// ```
pub fn count_distinct_permutations(group_sizes: &[usize]) -> BigUint {
    let mut total = BigUint::one();
    let mut placed = 0usize;
    for &size in group_sizes {
        placed += size;
        total *= binomial(BigUint::from(placed), BigUint::from(size));
    }
    total
}

/// Same as [`count_distinct_permutations`], or `None` when the count does not
/// fit in a `usize`.
pub fn checked_count(group_sizes: &[usize]) -> Option<usize> {
    count_distinct_permutations(group_sizes).to_usize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factorial(n: usize) -> usize {
        (1..=n).product()
    }

    #[test]
    fn test_empty_multiset() {
        assert_eq!(checked_count(&[]), Some(1));
    }

    #[test]
    fn test_all_distinct() {
        assert_eq!(checked_count(&[1; 6]), Some(factorial(6)));
    }

    #[test]
    fn test_all_equal() {
        assert_eq!(checked_count(&[9]), Some(1));
    }

    #[test]
    fn test_two_groups_of_three() {
        assert_eq!(checked_count(&[3, 3]), Some(20));
    }

    #[test]
    fn test_order_of_groups_irrelevant() {
        assert_eq!(checked_count(&[1, 2, 4]), checked_count(&[4, 1, 2]));
        assert_eq!(checked_count(&[1, 2, 4]), Some(105));
    }

    #[test]
    fn test_overflow() {
        // 40! does not fit in 64 bits.
        assert_eq!(checked_count(&[1; 40]), None);
        let exact = count_distinct_permutations(&[1; 40]);
        let expected = (1..=40u32).fold(BigUint::one(), |acc, k| acc * BigUint::from(k));
        assert_eq!(exact, expected);
    }
}
