//! Propagators which forbid sub-cycles by tracking the paths or components formed by the
//! mandatory arcs (the Caseau-Laburthe family).
mod path_no_circuit;
mod single_cycle;
mod tree_no_cycle;

pub use path_no_circuit::PathNoCircuitArgs;
pub use path_no_circuit::PathNoCircuitPropagator;
pub use single_cycle::CircuitNoSubtourArgs;
pub use single_cycle::CycleNoSubtourArgs;
pub use single_cycle::SingleCyclePropagator;
pub use tree_no_cycle::TreeNoCycleArgs;
pub use tree_no_cycle::TreeNoCyclePropagator;
