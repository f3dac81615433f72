//! Embassy tasks

mod bus_rx;
mod node;

pub use bus_rx::bus_rx_task;
pub use node::node_task;
