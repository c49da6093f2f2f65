use crate::engine::Assignments;
use crate::engine::TrailedValues;
use crate::propagation::HasAssignments;

/// A read-only view of all domains and trailed values.
#[derive(Clone, Copy, Debug)]
pub struct Domains<'a> {
    pub(crate) assignments: &'a Assignments,
    pub(crate) trailed_values: &'a TrailedValues,
}

impl<'a> Domains<'a> {
    pub(crate) fn new(assignments: &'a Assignments, trailed_values: &'a TrailedValues) -> Self {
        Domains {
            assignments,
            trailed_values,
        }
    }
}

impl HasAssignments for Domains<'_> {
    fn assignments(&self) -> &Assignments {
        self.assignments
    }

    fn trailed_values(&self) -> &TrailedValues {
        self.trailed_values
    }
}
