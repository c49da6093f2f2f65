use thiserror::Error;

#[cfg(doc)]
use crate::engine::State;

/// Errors related to creating variables and posting constraints in the [`State`].
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConstraintOperationError {
    /// The kernel of a graph or set variable is not contained in its envelope.
    #[error("the kernel is not contained in the envelope")]
    KernelNotInEnvelope,
    /// Two graphs which describe the same variable do not have the same number of nodes.
    #[error("graphs over {0} and {1} nodes cannot describe the same variable")]
    GraphSizeMismatch(usize, usize),
    /// A directed graph was combined with an undirected one.
    #[error("a directed graph cannot be combined with an undirected graph")]
    OrientationMismatch,
    /// A set value lies outside of the universe `0..n` of the set variable.
    #[error("the value {0} lies outside the universe of the set variable")]
    ValueOutsideUniverse(usize),
}
