pub mod cs;
pub mod error;

pub use cs::combinatorial;
pub use cs::combinatorial::{
    all_permutations, all_permutations_by_key, permutations, permutations_by_key,
    try_all_permutations_by_key, try_all_permutations_from_iter, try_permutations_by_key,
    try_permutations_from_iter,
};
pub use error::{Error, KeyError, Result};
