//! Graphs, graph domains and the tools propagators use to observe them.
mod delta_monitor;
mod graph_domain;
mod incident_set;
mod static_graph;

pub use delta_monitor::GraphDelta;
pub use delta_monitor::GraphDeltaMonitor;
pub use graph_domain::GraphChange;
pub use graph_domain::GraphDomain;
pub use graph_domain::GraphTrailEntry;
pub use incident_set::IncidentSet;
pub use static_graph::Graph;
