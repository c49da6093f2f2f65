//! Reversible integers which propagators use for incremental state, such as the cursor of a
//! [`GraphDeltaMonitor`](crate::graph::GraphDeltaMonitor).
mod trailed_integer;
mod trailed_values;

pub use trailed_integer::TrailedInteger;
pub use trailed_values::TrailedValues;
