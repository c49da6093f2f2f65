//! Contains structures for tie-breaking; a [`TieBreaker`] keeps the best candidate among the ones
//! it is shown, and decides between candidates with the same value.
//!
//! The following example shows how the [`InOrderTieBreaker`] selects the first arc with the
//! lowest value that it has seen.
//!
//! ```rust
//! # use pumpkin_graph::branching::Direction;
//! # use pumpkin_graph::branching::InOrderTieBreaker;
//! # use pumpkin_graph::branching::TieBreaker;
//! let mut breaker = InOrderTieBreaker::new(Direction::Minimum);
//!
//! breaker.consider((0, 1), 10);
//! breaker.consider((1, 2), 5);
//! breaker.consider((0, 2), 5);
//!
//! assert_eq!(breaker.select(), Some((1, 2)));
//! ```
mod in_order_tie_breaker;
mod tie_breaker;

pub use in_order_tie_breaker::*;
pub use tie_breaker::*;
