//! Decision making for graph variables.
//!
//! The crate does not run a search itself; [`GraphSearch`] proposes the next [`GraphDecision`]
//! for a graph variable, and the caller applies it to the [`State`], propagates, and backtracks
//! with [`State::restore_to`].
//!
//! [`State`]: crate::State
//! [`State::restore_to`]: crate::State::restore_to
mod graph_search;
pub mod tie_breaking;

pub use graph_search::*;
pub use tie_breaking::*;
