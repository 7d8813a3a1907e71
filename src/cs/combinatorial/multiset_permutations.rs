//! Distinct permutations of a multiset.
//!
//! [`permutations`] and friends return a lazy iterator that computes one
//! permutation per pull. [`all_permutations`] and friends drive that iterator
//! to the end and collect everything. Elements are compared through an order
//! key (the element itself by default); elements with equal keys are
//! interchangeable, so a multiset with group sizes m1..mk yields exactly
//! n!/(m1!·…·mk!) sequences and never the same key sequence twice.
//!
//! # Example
//! ```
//! use mpermute::cs::combinatorial::{all_permutations, permutations};
//!
//! let perms = all_permutations(&[1, 2, 2]).unwrap();
//! assert_eq!(perms, vec![vec![2, 2, 1], vec![1, 2, 2], vec![2, 1, 2]]);
//!
//! let mut lazy = permutations(&['a', 'b']).unwrap();
//! assert_eq!(lazy.next(), Some(vec![&'b', &'a']));
//! assert_eq!(lazy.next(), Some(vec![&'a', &'b']));
//! assert_eq!(lazy.next(), None);
//! assert_eq!(lazy.next(), None);
//! ```

use std::fmt;
use std::iter::FusedIterator;
use std::ops::Index;
use std::sync::Arc;

use log::{debug, trace};

use super::keyed_multiset::KeyedMultiset;
use super::prefix_shift::{Advance, PrefixShiftEngine, Visit};
use crate::error::{BoxError, Error, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    /// The initial permutation has not been handed out yet.
    Fresh,
    Active,
    Exhausted,
}

/// Engine plus pull bookkeeping shared by the borrowed and owned iterators.
#[derive(Clone, Debug)]
struct Session {
    engine: PrefixShiftEngine,
    state: State,
    produced: usize,
    /// Permutations left to yield, when the total fits in `usize`.
    remaining: Option<usize>,
}

impl Session {
    fn new(keyed: &KeyedMultiset) -> Self {
        let total = keyed.checked_distinct_permutations();
        match total {
            Some(count) => debug!(
                "permutation session: {} elements, {} key groups, {} permutations",
                keyed.len(),
                keyed.group_sizes().len(),
                count
            ),
            None => debug!(
                "permutation session: {} elements, {} key groups, permutation count overflows usize",
                keyed.len(),
                keyed.group_sizes().len()
            ),
        }
        Session {
            engine: PrefixShiftEngine::new(keyed.ranks()),
            state: State::Fresh,
            produced: 0,
            remaining: total,
        }
    }

    /// Moves to the next permutation and walks it, or reports the end.
    fn pull(&mut self) -> Option<Visit<'_>> {
        match self.state {
            State::Fresh => self.state = State::Active,
            State::Active => {
                if self.engine.advance() == Advance::Exhausted {
                    trace!("permutation session exhausted after {}", self.produced);
                    self.state = State::Exhausted;
                    return None;
                }
            }
            State::Exhausted => return None,
        }
        self.produced += 1;
        if let Some(left) = self.remaining.as_mut() {
            *left = left.saturating_sub(1);
        }
        Some(self.engine.visit())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match (self.state, self.remaining) {
            (State::Exhausted, _) => (0, Some(0)),
            (_, Some(left)) => (left, Some(left)),
            (_, None) => (usize::MAX, None),
        }
    }
}

/// Lazy iterator over the distinct permutations of a borrowed slice.
///
/// Each item is a fresh `Vec` of references into the slice. The slice stays
/// borrowed for the life of the iterator, so it cannot change under it.
#[must_use = "iterators are lazy and do nothing unless consumed"]
#[derive(Clone, Debug)]
pub struct MultisetPermutations<'a, T> {
    elements: &'a [T],
    session: Session,
}

impl<'a, T> MultisetPermutations<'a, T> {
    /// Builds an iterator from keys that were already resolved for `elements`.
    pub fn from_keyed(elements: &'a [T], keyed: &KeyedMultiset) -> Self {
        debug_assert_eq!(elements.len(), keyed.len());
        MultisetPermutations {
            elements,
            session: Session::new(keyed),
        }
    }

    /// Number of permutations handed out so far.
    pub fn produced(&self) -> usize {
        self.session.produced
    }

    /// Permutations still to come, or `None` if the count overflows `usize`.
    pub fn remaining(&self) -> Option<usize> {
        match self.session.state {
            State::Exhausted => Some(0),
            _ => self.session.remaining,
        }
    }
}

impl<'a, T> Iterator for MultisetPermutations<'a, T> {
    type Item = Vec<&'a T>;

    fn next(&mut self) -> Option<Vec<&'a T>> {
        let elements = self.elements;
        self.session
            .pull()
            .map(|slots| slots.map(move |slot| &elements[slot]).collect())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.session.size_hint()
    }
}

impl<T> FusedIterator for MultisetPermutations<'_, T> {}

/// Lazy permutations of `elements` in their natural order.
///
/// Fails with [`Error::InvalidKey`] if some elements cannot be ordered
/// against each other, like `f64::NAN`.
pub fn permutations<T: PartialOrd>(elements: &[T]) -> Result<MultisetPermutations<'_, T>> {
    let keyed = KeyedMultiset::natural(elements)?;
    Ok(MultisetPermutations::from_keyed(elements, &keyed))
}

/// Lazy permutations of `elements`, compared by `key`.
///
/// # Example
/// ```
/// use mpermute::cs::combinatorial::permutations_by_key;
///
/// let words = ["ralph", "randomly", "rankled", "at", "an", "estuary"];
/// let perms = permutations_by_key(&words, |w| w.starts_with('r')).unwrap();
/// assert_eq!(perms.count(), 20);
/// ```
pub fn permutations_by_key<T, K, F>(elements: &[T], key: F) -> Result<MultisetPermutations<'_, T>>
where
    K: PartialOrd,
    F: FnMut(&T) -> K,
{
    let keyed = KeyedMultiset::by_key(elements, key)?;
    Ok(MultisetPermutations::from_keyed(elements, &keyed))
}

/// Lazy permutations of `elements`, compared by a key function that may fail.
pub fn try_permutations_by_key<T, K, E, F>(
    elements: &[T],
    key: F,
) -> Result<MultisetPermutations<'_, T>>
where
    K: PartialOrd,
    E: Into<BoxError>,
    F: FnMut(&T) -> std::result::Result<K, E>,
{
    let keyed = KeyedMultiset::try_by_key(elements, key)?;
    Ok(MultisetPermutations::from_keyed(elements, &keyed))
}

fn collect_all<T: Clone>(perms: MultisetPermutations<'_, T>) -> Vec<Vec<T>> {
    let expected = perms.remaining();
    let mut all: Vec<Vec<T>> = Vec::with_capacity(expected.unwrap_or(0));
    for perm in perms {
        all.push(perm.into_iter().cloned().collect());
    }
    debug_assert!(expected.map_or(true, |count| count == all.len()));
    all
}

/// Every distinct permutation of `elements` in their natural order.
///
/// # Example
/// ```
/// use mpermute::cs::combinatorial::all_permutations;
///
/// let perms = all_permutations(&[1, 4, 2, 2]).unwrap();
/// assert_eq!(perms.len(), 12);
/// assert_eq!(perms[0], vec![4, 2, 2, 1]);
/// assert_eq!(perms[11], vec![2, 2, 1, 4]);
/// ```
pub fn all_permutations<T: PartialOrd + Clone>(elements: &[T]) -> Result<Vec<Vec<T>>> {
    permutations(elements).map(collect_all)
}

/// Every distinct permutation of `elements`, compared by `key`.
pub fn all_permutations_by_key<T, K, F>(elements: &[T], key: F) -> Result<Vec<Vec<T>>>
where
    T: Clone,
    K: PartialOrd,
    F: FnMut(&T) -> K,
{
    permutations_by_key(elements, key).map(collect_all)
}

/// Every distinct permutation of `elements`, compared by a key function
/// that may fail.
pub fn try_all_permutations_by_key<T, K, E, F>(elements: &[T], key: F) -> Result<Vec<Vec<T>>>
where
    T: Clone,
    K: PartialOrd,
    E: Into<BoxError>,
    F: FnMut(&T) -> std::result::Result<K, E>,
{
    try_permutations_by_key(elements, key).map(collect_all)
}

/// One permutation backed by storage shared with its session and siblings.
///
/// Holds the shared elements plus the slot order; no element is copied.
#[derive(Clone)]
pub struct SharedPermutation<T> {
    elements: Arc<[T]>,
    order: Box<[usize]>,
}

impl<T> SharedPermutation<T> {
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&T> {
        self.order.get(position).map(|&slot| &self.elements[slot])
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.order.iter().map(move |&slot| &self.elements[slot])
    }

    /// Input positions of the elements, in permutation order.
    pub fn indices(&self) -> &[usize] {
        &self.order
    }

    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }
}

impl<T> Index<usize> for SharedPermutation<T> {
    type Output = T;

    fn index(&self, position: usize) -> &T {
        &self.elements[self.order[position]]
    }
}

impl<T: PartialEq> PartialEq for SharedPermutation<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: PartialEq> PartialEq<[T]> for SharedPermutation<T> {
    fn eq(&self, other: &[T]) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: PartialEq> PartialEq<Vec<T>> for SharedPermutation<T> {
    fn eq(&self, other: &Vec<T>) -> bool {
        *self == other[..]
    }
}

impl<T: fmt::Debug> fmt::Debug for SharedPermutation<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Lazy iterator over the distinct permutations of an owned element set.
///
/// Items share the element storage through an [`Arc`]; it is freed once the
/// iterator and every yielded permutation are dropped.
#[must_use = "iterators are lazy and do nothing unless consumed"]
#[derive(Clone, Debug)]
pub struct OwnedMultisetPermutations<T> {
    elements: Arc<[T]>,
    session: Session,
}

impl<T> OwnedMultisetPermutations<T> {
    /// Natural order of the elements.
    pub fn new(elements: impl Into<Arc<[T]>>) -> Result<Self>
    where
        T: PartialOrd,
    {
        let elements = elements.into();
        let keyed = KeyedMultiset::natural(&elements[..])?;
        Ok(Self::from_keyed(elements, &keyed))
    }

    /// Elements compared by `key`.
    pub fn by_key<K, F>(elements: impl Into<Arc<[T]>>, key: F) -> Result<Self>
    where
        K: PartialOrd,
        F: FnMut(&T) -> K,
    {
        let elements = elements.into();
        let keyed = KeyedMultiset::by_key(&elements[..], key)?;
        Ok(Self::from_keyed(elements, &keyed))
    }

    fn from_keyed(elements: Arc<[T]>, keyed: &KeyedMultiset) -> Self {
        OwnedMultisetPermutations {
            elements,
            session: Session::new(keyed),
        }
    }

    /// The shared element storage, in input order.
    pub fn elements(&self) -> &Arc<[T]> {
        &self.elements
    }

    /// Permutations still to come, or `None` if the count overflows `usize`.
    pub fn remaining(&self) -> Option<usize> {
        match self.session.state {
            State::Exhausted => Some(0),
            _ => self.session.remaining,
        }
    }
}

impl<T> Iterator for OwnedMultisetPermutations<T> {
    type Item = SharedPermutation<T>;

    fn next(&mut self) -> Option<SharedPermutation<T>> {
        let order = self.session.pull()?.collect();
        Some(SharedPermutation {
            elements: Arc::clone(&self.elements),
            order,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.session.size_hint()
    }
}

impl<T> FusedIterator for OwnedMultisetPermutations<T> {}

fn collect_source<T, E, I>(source: I) -> Result<Vec<T>>
where
    E: Into<BoxError>,
    I: IntoIterator<Item = std::result::Result<T, E>>,
{
    let mut elements = Vec::new();
    for (index, item) in source.into_iter().enumerate() {
        match item {
            Ok(element) => elements.push(element),
            Err(e) => {
                debug!("element source failed at position {}", index);
                return Err(Error::argument(index, e));
            }
        }
    }
    Ok(elements)
}

/// Lazy permutations of elements read from a fallible source.
///
/// The source is drained before any key is computed; the first `Err` is
/// reported as [`Error::Argument`].
///
/// # Example
/// ```
/// use mpermute::cs::combinatorial::try_permutations_from_iter;
///
/// let lines = "3\n1\n3";
/// let perms = try_permutations_from_iter(lines.lines().map(|l| l.parse::<u32>())).unwrap();
/// let perms: Vec<Vec<u32>> = perms.map(|p| p.to_vec()).collect();
/// assert_eq!(perms, vec![vec![3, 3, 1], vec![1, 3, 3], vec![3, 1, 3]]);
/// ```
pub fn try_permutations_from_iter<T, E, I>(source: I) -> Result<OwnedMultisetPermutations<T>>
where
    T: PartialOrd,
    E: Into<BoxError>,
    I: IntoIterator<Item = std::result::Result<T, E>>,
{
    OwnedMultisetPermutations::new(collect_source(source)?)
}

/// Every distinct permutation of elements read from a fallible source.
pub fn try_all_permutations_from_iter<T, E, I>(source: I) -> Result<Vec<Vec<T>>>
where
    T: PartialOrd + Clone,
    E: Into<BoxError>,
    I: IntoIterator<Item = std::result::Result<T, E>>,
{
    let elements = collect_source(source)?;
    all_permutations(&elements)
}
