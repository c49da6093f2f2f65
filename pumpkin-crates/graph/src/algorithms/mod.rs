//! The graph algorithms the propagators are built on. They are run from scratch on a [`Graph`]
//! (usually the kernel or the envelope of a graph variable) whenever a propagator needs them.
//!
//! [`Graph`]: crate::graph::Graph
mod connectivity;
pub mod dominators;
mod path_extremities;
pub mod spanning_tree;
mod strong_connectivity;

pub use connectivity::ConnectivityFinder;
pub use path_extremities::PathExtremities;
pub use path_extremities::PathMerge;
pub use strong_connectivity::StrongConnectivityFinder;
