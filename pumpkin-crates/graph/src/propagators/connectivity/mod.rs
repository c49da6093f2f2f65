//! Propagators on the (strongly) connected components of a graph variable. They recompute the
//! components of the kernel and the envelope from scratch on every call.
mod connected;
mod n_tree;
mod nb_cc;
mod nb_scc;

pub use connected::ConnectedArgs;
pub use connected::ConnectedPropagator;
pub use n_tree::NTreeArgs;
pub use n_tree::NTreePropagator;
pub use nb_cc::NbConnectedComponentsArgs;
pub use nb_cc::NbConnectedComponentsPropagator;
pub use nb_scc::NbStronglyConnectedComponentsArgs;
pub use nb_scc::NbStronglyConnectedComponentsPropagator;
