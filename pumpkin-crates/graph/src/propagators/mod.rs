//! Contains the graph propagator implementations.
//!
//! See the [`propagation`] module for info on propagators. Every propagator comes with an `Args`
//! struct which is passed to [`State::add_propagator`].
//!
//! [`State::add_propagator`]: crate::State::add_propagator
#[cfg(doc)]
use crate::propagation;

mod acyclic;
mod arborescence;
mod channeling;
mod connectivity;
mod cost;
mod counting;
mod degree;
mod inclusion;
mod no_subtour;
mod transitivity;

pub use acyclic::*;
pub use arborescence::*;
pub use channeling::*;
pub use connectivity::*;
pub use cost::*;
pub use counting::*;
pub use degree::*;
pub use inclusion::*;
pub use no_subtour::*;
pub use transitivity::*;
