pub mod keyed_multiset;
pub mod multinomial;
pub mod multiset_permutations;
pub mod prefix_shift;

pub use keyed_multiset::KeyedMultiset;
pub use multinomial::count_distinct_permutations;
pub use multiset_permutations::{
    all_permutations, all_permutations_by_key, permutations, permutations_by_key,
    try_all_permutations_by_key, try_all_permutations_from_iter, try_permutations_by_key,
    try_permutations_from_iter, MultisetPermutations, OwnedMultisetPermutations,
    SharedPermutation,
};
pub use prefix_shift::{Advance, PrefixShiftEngine};
