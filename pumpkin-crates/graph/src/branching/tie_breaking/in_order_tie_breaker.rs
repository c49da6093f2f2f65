use super::Direction;
use super::TieBreaker;

/// A tie-breaker which selects the first candidate it receives with the "best" value according
/// to the provided [`Direction`]; a later candidate only replaces it when its value is strictly
/// better.
#[derive(Debug, Clone)]
pub struct InOrderTieBreaker<Candidate, Value> {
    /// The selected candidate together with its value, [`None`] if nothing was considered yet.
    selected: Option<(Candidate, Value)>,
    direction: Direction,
}

impl<Candidate, Value> InOrderTieBreaker<Candidate, Value> {
    pub fn new(direction: Direction) -> Self {
        Self {
            selected: None,
            direction,
        }
    }
}

impl<Candidate: Copy, Value: PartialOrd> TieBreaker<Candidate, Value>
    for InOrderTieBreaker<Candidate, Value>
{
    fn consider(&mut self, candidate: Candidate, value: Value) {
        let is_better = match &self.selected {
            None => true,
            Some((_, selected_value)) => match self.direction {
                Direction::Maximum => value > *selected_value,
                Direction::Minimum => value < *selected_value,
            },
        };
        if is_better {
            self.selected = Some((candidate, value));
        }
    }

    fn select(&mut self) -> Option<Candidate> {
        self.selected.take().map(|(candidate, _)| candidate)
    }

    fn direction(&self) -> Direction {
        self.direction
    }
}
