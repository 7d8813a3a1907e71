//! Order-key resolution for multiset permutations.
//!
//! Every element is mapped to an order key, either the element itself or the
//! output of a key function. The keys are then checked for a total order and
//! replaced by dense integer ranks, so the permutation engine never touches a
//! caller type again. Elements whose keys compare equal share a rank and are
//! interchangeable in the output.
//!
//! # Example
//! ```
//! use mpermute::cs::combinatorial::KeyedMultiset;
//!
//! let words = ["ralph", "at", "randomly", "an"];
//! let keyed = KeyedMultiset::by_key(&words, |w| w.starts_with('r')).unwrap();
//! // `false` sorts below `true`.
//! assert_eq!(keyed.ranks(), &[1, 0, 1, 0]);
//! assert_eq!(keyed.group_sizes(), &[2, 2]);
//! ```

use std::cmp::Ordering;

use log::debug;
use num_bigint::BigUint;

use super::multinomial::{checked_count, count_distinct_permutations};
use crate::error::{BoxError, Error, Result};

/// Dense order ranks for one input sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyedMultiset {
    /// Rank of each element, in input order. Larger key, larger rank.
    ranks: Vec<usize>,
    /// Sizes of the equal-key groups, largest key first.
    group_sizes: Vec<usize>,
}

impl KeyedMultiset {
    /// Uses each element as its own order key.
    pub fn natural<T: PartialOrd>(elements: &[T]) -> Result<Self> {
        Self::from_keys(elements)
    }

    /// Orders elements by `key`.
    pub fn by_key<T, K, F>(elements: &[T], key: F) -> Result<Self>
    where
        K: PartialOrd,
        F: FnMut(&T) -> K,
    {
        let keys: Vec<K> = elements.iter().map(key).collect();
        Self::from_keys(&keys)
    }

    /// Orders elements by a key function that may fail.
    ///
    /// The first failure is reported as [`Error::InvalidKey`] for that element;
    /// the key function is not called for the elements after it.
    pub fn try_by_key<T, K, E, F>(elements: &[T], mut key: F) -> Result<Self>
    where
        K: PartialOrd,
        E: Into<BoxError>,
        F: FnMut(&T) -> std::result::Result<K, E>,
    {
        let mut keys = Vec::with_capacity(elements.len());
        for (index, element) in elements.iter().enumerate() {
            match key(element) {
                Ok(k) => keys.push(k),
                Err(e) => {
                    debug!("key function failed for element {}", index);
                    return Err(Error::mapping(index, e));
                }
            }
        }
        Self::from_keys(&keys)
    }

    /// Ranks precomputed keys.
    pub fn from_keys<K: PartialOrd>(keys: &[K]) -> Result<Self> {
        // A key that is not ordered against itself (NaN) or against the first
        // key can never take part in a total order.
        for (index, key) in keys.iter().enumerate() {
            if key.partial_cmp(key).is_none() {
                debug!("key {} has no ordering against itself", index);
                return Err(Error::incomparable(index, index));
            }
            if key.partial_cmp(&keys[0]).is_none() {
                debug!("key {} has no ordering against key 0", index);
                return Err(Error::incomparable(index, 0));
            }
        }

        let mut order: Vec<usize> = (0..keys.len()).collect();
        let mut buf = Vec::with_capacity(keys.len());
        if let Err((index, other)) = merge_sort(keys, &mut order, &mut buf) {
            debug!("keys {} and {} have no ordering", index, other);
            return Err(Error::incomparable(index, other));
        }

        // The sorted order must form one chain: each key no larger than the
        // next, and equal to the first key of its run.
        let mut ranks = vec![0; keys.len()];
        let mut group_sizes = Vec::new();
        let mut rank = 0;
        let mut run_start = 0;
        for (pos, &slot) in order.iter().enumerate() {
            if pos == 0 {
                group_sizes.push(0);
            } else {
                let prev = order[pos - 1];
                match keys[prev].partial_cmp(&keys[slot]) {
                    Some(Ordering::Less) => {
                        rank += 1;
                        run_start = pos;
                        group_sizes.push(0);
                    }
                    Some(Ordering::Equal) => {
                        let first = order[run_start];
                        if keys[first].partial_cmp(&keys[slot]) != Some(Ordering::Equal) {
                            debug!("key {} breaks the run starting at key {}", slot, first);
                            return Err(Error::incomparable(slot, first));
                        }
                    }
                    _ => {
                        debug!("keys {} and {} have no ordering", slot, prev);
                        return Err(Error::incomparable(slot.max(prev), slot.min(prev)));
                    }
                }
            }
            ranks[slot] = rank;
            if let Some(size) = group_sizes.last_mut() {
                *size += 1;
            }
        }
        group_sizes.reverse();

        Ok(KeyedMultiset { ranks, group_sizes })
    }

    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }

    /// Order rank of every element, in input order.
    pub fn ranks(&self) -> &[usize] {
        &self.ranks
    }

    /// Sizes of the equal-key groups, largest key first.
    pub fn group_sizes(&self) -> &[usize] {
        &self.group_sizes
    }

    /// Exact number of distinct permutations, n!/(m1!·…·mk!).
    pub fn distinct_permutations(&self) -> BigUint {
        count_distinct_permutations(&self.group_sizes)
    }

    /// Number of distinct permutations, or `None` if it overflows `usize`.
    pub fn checked_distinct_permutations(&self) -> Option<usize> {
        checked_count(&self.group_sizes)
    }
}

/// Stable merge sort of `order` by ascending key. Stops at the first pair of
/// keys with no ordering and returns it as `(larger index, smaller index)`.
fn merge_sort<K: PartialOrd>(
    keys: &[K],
    order: &mut [usize],
    buf: &mut Vec<usize>,
) -> std::result::Result<(), (usize, usize)> {
    let n = order.len();
    if n < 2 {
        return Ok(());
    }
    let mid = n / 2;
    merge_sort(keys, &mut order[..mid], buf)?;
    merge_sort(keys, &mut order[mid..], buf)?;

    buf.clear();
    let (mut l, mut r) = (0, mid);
    while l < mid && r < n {
        let (a, b) = (order[l], order[r]);
        match keys[b].partial_cmp(&keys[a]) {
            Some(Ordering::Less) => {
                buf.push(b);
                r += 1;
            }
            Some(_) => {
                buf.push(a);
                l += 1;
            }
            None => return Err((a.max(b), a.min(b))),
        }
    }
    buf.extend_from_slice(&order[l..mid]);
    buf.extend_from_slice(&order[r..n]);
    order.copy_from_slice(buf);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KeyError;

    /// Bitmask sets ordered by inclusion.
    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Set(u64);

    impl PartialOrd for Set {
        fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
            if self.0 == other.0 {
                Some(Ordering::Equal)
            } else if self.0 & other.0 == self.0 {
                Some(Ordering::Less)
            } else if self.0 & other.0 == other.0 {
                Some(Ordering::Greater)
            } else {
                None
            }
        }
    }

    #[test]
    fn test_subset_order_rejected_without_panic() {
        let keys: Vec<Set> = (0..64).map(Set).collect();
        let err = KeyedMultiset::from_keys(&keys).unwrap_err();
        match err {
            Error::InvalidKey {
                index,
                reason: KeyError::Incomparable { other },
            } => {
                assert_ne!(index, other);
                assert!(keys[index].partial_cmp(&keys[other]).is_none());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_incomparable_pair_after_first_key() {
        // Every key contains Set(0), but {bit 0} and {bit 1} are unrelated.
        let keys = [Set(0), Set(1), Set(2), Set(3)];
        let err = KeyedMultiset::from_keys(&keys).unwrap_err();
        match err {
            Error::InvalidKey {
                index,
                reason: KeyError::Incomparable { other },
            } => {
                assert_eq!(index, 2);
                assert_eq!(other, 1);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_subset_chain_is_accepted() {
        let keys = [Set(0b111), Set(0), Set(0b1), Set(0b11), Set(0b1)];
        let keyed = KeyedMultiset::from_keys(&keys).unwrap();
        assert_eq!(keyed.ranks(), &[3, 0, 1, 2, 1]);
        assert_eq!(keyed.group_sizes(), &[1, 1, 2, 1]);
    }

    #[test]
    fn test_merge_sort_is_stable() {
        let keys = [2, 1, 2, 1, 0];
        let mut order: Vec<usize> = (0..keys.len()).collect();
        merge_sort(&keys, &mut order, &mut Vec::new()).unwrap();
        assert_eq!(order, vec![4, 1, 3, 0, 2]);
    }

    #[test]
    fn test_natural_ranks() {
        let keyed = KeyedMultiset::natural(&[1, 4, 2, 2]).unwrap();
        assert_eq!(keyed.ranks(), &[0, 2, 1, 1]);
        assert_eq!(keyed.group_sizes(), &[1, 2, 1]);
        assert_eq!(keyed.len(), 4);
        assert_eq!(keyed.distinct_permutations(), BigUint::from(12u32));
    }

    #[test]
    fn test_empty() {
        let keyed = KeyedMultiset::natural::<i32>(&[]).unwrap();
        assert!(keyed.is_empty());
        assert!(keyed.group_sizes().is_empty());
        assert_eq!(keyed.checked_distinct_permutations(), Some(1));
    }

    #[test]
    fn test_by_key_second_component() {
        let items = [("x", 1, 5), ("y", 2, 3), ("y", 2, 8)];
        let keyed = KeyedMultiset::by_key(&items, |t| t.1).unwrap();
        assert_eq!(keyed.ranks(), &[0, 1, 1]);
        assert_eq!(keyed.group_sizes(), &[2, 1]);
        assert_eq!(keyed.checked_distinct_permutations(), Some(3));
    }

    #[test]
    fn test_float_keys() {
        let keyed = KeyedMultiset::natural(&[0.5, -1.0, 0.5, 3.25]).unwrap();
        assert_eq!(keyed.ranks(), &[1, 0, 1, 2]);
    }

    #[test]
    fn test_nan_rejected() {
        let err = KeyedMultiset::natural(&[1.0, f64::NAN, 2.0]).unwrap_err();
        match err {
            Error::InvalidKey {
                index,
                reason: KeyError::Incomparable { other },
            } => {
                assert_eq!(index, 1);
                assert_eq!(other, 1);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_single_nan_rejected() {
        assert!(KeyedMultiset::natural(&[f64::NAN]).is_err());
    }

    #[test]
    fn test_try_by_key_failure_stops_early() {
        let mut calls = 0;
        let err = KeyedMultiset::try_by_key(&["1", "2", "x", "4"], |s| {
            calls += 1;
            s.parse::<i32>()
        })
        .unwrap_err();
        assert_eq!(calls, 3);
        assert!(matches!(
            err,
            Error::InvalidKey {
                index: 2,
                reason: KeyError::Mapping(_)
            }
        ));
    }

    #[test]
    fn test_try_by_key_success() {
        let keyed = KeyedMultiset::try_by_key(&["3", "1", "3"], |s| s.parse::<u8>()).unwrap();
        assert_eq!(keyed.ranks(), &[1, 0, 1]);
    }
}
