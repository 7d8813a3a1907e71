//! Loopless multiset permutation engine (Williams' prefix-shift algorithm).
//!
//! The current permutation is a singly linked list threaded through a fixed
//! node array. Each step unlinks one node and relinks it as the new head. No
//! other node moves and nothing is allocated, so every step is O(1) with
//! O(1) extra state. The walk starts at the lexicographically largest
//! arrangement of the keys (non-increasing) and stops right after the smallest
//! one (non-decreasing), visiting every distinct arrangement exactly once.
//!
//! The engine only deals in slot indices: slot `i` stands for the `i`-th key
//! passed to [`PrefixShiftEngine::new`].
//!
//! # Example
//! ```
//! use mpermute::cs::combinatorial::prefix_shift::{Advance, PrefixShiftEngine};
//!
//! let keys = [1, 2, 2];
//! let mut engine = PrefixShiftEngine::new(&keys);
//! let mut seen = vec![engine.current()];
//! while engine.advance() == Advance::Produced {
//!     seen.push(engine.current());
//! }
//! let as_keys: Vec<Vec<i32>> = seen
//!     .iter()
//!     .map(|p| p.iter().map(|&slot| keys[slot]).collect())
//!     .collect();
//! assert_eq!(as_keys, vec![vec![2, 2, 1], vec![1, 2, 2], vec![2, 1, 2]]);
//! ```

use std::iter::FusedIterator;

/// Link value marking the end of the list.
const END: usize = usize::MAX;

#[derive(Clone, Copy, Debug)]
struct Node {
    slot: usize,
    /// Dense rank of the slot's key. Larger key, larger rank.
    rank: usize,
    next: usize,
}

/// Outcome of [`PrefixShiftEngine::advance`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Advance {
    /// A new permutation is ready.
    Produced,
    /// The previous permutation was the last one.
    Exhausted,
}

/// Prefix-shift state for one multiset.
#[derive(Clone, Debug)]
pub struct PrefixShiftEngine {
    nodes: Vec<Node>,
    head: usize,
    /// Node just before the trailing node holding the smallest key of the
    /// current shift run.
    after_z: usize,
    exhausted: bool,
}

impl PrefixShiftEngine {
    /// Builds the initial permutation: keys in non-increasing order, equal
    /// keys in descending input position.
    pub fn new<K: Ord>(keys: &[K]) -> Self {
        let n = keys.len();
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| keys[b].cmp(&keys[a]).then(b.cmp(&a)));

        let groups = order
            .windows(2)
            .filter(|w| keys[w[0]] != keys[w[1]])
            .count()
            + 1;
        let mut run = 0;
        let mut nodes = Vec::with_capacity(n);
        for (pos, &slot) in order.iter().enumerate() {
            if pos > 0 && keys[order[pos - 1]] != keys[slot] {
                run += 1;
            }
            nodes.push(Node {
                slot,
                rank: groups - 1 - run,
                next: if pos + 1 < n { pos + 1 } else { END },
            });
        }

        PrefixShiftEngine {
            nodes,
            head: if n == 0 { END } else { 0 },
            after_z: n.saturating_sub(2),
            // One arrangement or none: nothing to shift.
            exhausted: n < 2,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether [`advance`](Self::advance) has reported the end.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Slot indices of the current permutation, first position first.
    pub fn current(&self) -> Vec<usize> {
        self.visit().collect()
    }

    /// Walks the current permutation without allocating.
    pub fn visit(&self) -> Visit<'_> {
        Visit {
            nodes: &self.nodes,
            cursor: self.head,
            remaining: self.nodes.len(),
        }
    }

    /// Performs one prefix shift.
    ///
    /// Once this returns [`Advance::Exhausted`] the state is frozen and every
    /// later call returns `Exhausted` as well.
    pub fn advance(&mut self) -> Advance {
        if self.exhausted {
            return Advance::Exhausted;
        }

        let i = self.after_z;
        let j = self.nodes[i].next;
        let after_j = self.nodes[j].next;
        let head_rank = self.nodes[self.head].rank;

        // The last permutation ends in a lone tail that is not smaller than
        // the head: keys run non-decreasing end to end.
        if after_j == END && self.nodes[j].rank >= head_rank {
            self.exhausted = true;
            return Advance::Exhausted;
        }

        let s = if after_j != END && self.nodes[i].rank >= self.nodes[after_j].rank {
            j
        } else {
            i
        };
        let t = self.nodes[s].next;
        self.nodes[s].next = self.nodes[t].next;
        self.nodes[t].next = self.head;
        if self.nodes[t].rank < head_rank {
            self.after_z = t;
        }
        self.head = t;

        debug_assert!(self.nodes[self.after_z].next != END);
        Advance::Produced
    }
}

/// Iterator over the slot indices of the current permutation.
#[derive(Clone, Debug)]
pub struct Visit<'a> {
    nodes: &'a [Node],
    cursor: usize,
    remaining: usize,
}

impl Iterator for Visit<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        let node = &self.nodes[self.cursor];
        self.cursor = node.next;
        self.remaining -= 1;
        Some(node.slot)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Visit<'_> {}
impl FusedIterator for Visit<'_> {}
