//! Minimum spanning trees on reduced-cost matrices, as used by the Lagrangian cost propagators.
mod kruskal;
mod prim;

pub use kruskal::KruskalFilter;
pub use prim::PrimBoundFinder;
use thiserror::Error;

/// The reasons why no spanning tree respecting the mandatory edges exists.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanningTreeError {
    #[error("the nodes to span are not connected")]
    Disconnected,
    #[error("the mandatory edges contain a cycle")]
    MandatoryCycle,
}
