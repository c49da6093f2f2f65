//! Contains containers which are used by the graph propagators.
mod keyed_vec;
mod sparse_set;

pub use keyed_vec::*;
pub use sparse_set::*;

