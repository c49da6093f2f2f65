/// The interface for a tie-breaker which considers candidates with values; depending on the
/// [`Direction`] it only keeps candidates with the "best" value for selection.
pub trait TieBreaker<Candidate, Value> {
    /// Consider the next candidate with its value.
    fn consider(&mut self, candidate: Candidate, value: Value);

    /// Get the candidate which was selected. This resets the tie-breaker, so that it never
    /// returns a candidate whose value is out of date.
    fn select(&mut self) -> Option<Candidate>;

    /// Returns whether the tie-breaker is looking for the minimum ([`Direction::Minimum`]) or
    /// maximum ([`Direction::Maximum`]) candidate.
    fn direction(&self) -> Direction;
}

/// Whether the value comparison looks for the maximum or the minimum candidate.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Maximum,
    Minimum,
}
