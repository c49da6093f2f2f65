/// The options of the Lagrangian cost propagators.
#[derive(Debug, Clone, Copy)]
pub struct LagrangianOptions {
    /// The number of subgradient iterations when the upper bound of the objective differs from
    /// the one seen at the previous full run.
    pub full_iterations: usize,
    /// The number of subgradient iterations on every other call.
    pub sprint_iterations: usize,
    /// The step factor the subgradient optimisation starts with.
    pub initial_step: f64,
    /// The factor by which the step factor shrinks every `decay_period` iterations; between 0
    /// and 1.
    pub step_decay: f64,
    pub decay_period: usize,
    /// How often the relaxation is repeated within one call while it keeps improving the lower
    /// bound of the objective.
    pub max_filtering_rounds: usize,
}

impl Default for LagrangianOptions {
    fn default() -> Self {
        LagrangianOptions {
            full_iterations: 100,
            sprint_iterations: 20,
            initial_step: 2.0,
            step_decay: 0.9,
            decay_period: 5,
            max_filtering_rounds: 4,
        }
    }
}
