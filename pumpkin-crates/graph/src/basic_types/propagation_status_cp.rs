use thiserror::Error;

use crate::engine::EmptyDomain;

/// The result of invoking a propagator. The propagation can either succeed or identify a
/// conflict.
pub type PropagationStatusCP = Result<(), Inconsistency>;

/// The two ways in which a propagator can fail.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inconsistency {
    /// A domain operation would have emptied a domain.
    #[error("a domain became empty")]
    EmptyDomain,
    /// The propagator detected a structural infeasibility.
    #[error(transparent)]
    Conflict(#[from] PropagatorConflict),
}

impl From<EmptyDomain> for Inconsistency {
    fn from(_: EmptyDomain) -> Self {
        Inconsistency::EmptyDomain
    }
}

/// A conflict stated by a propagator. A propagator that identifies a conflict that is _not_ an
/// empty domain, describes that conflict with this type.
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
#[error("{reason}")]
pub struct PropagatorConflict {
    /// A static description of the violated structure.
    pub reason: &'static str,
}

impl PropagatorConflict {
    pub fn new(reason: &'static str) -> Self {
        PropagatorConflict { reason }
    }
}
