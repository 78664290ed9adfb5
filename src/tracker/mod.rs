pub mod error;
pub mod hierarchy;
pub mod node;
pub mod state;


pub use error::TrackerError;
pub use hierarchy::Hierarchy;
pub use node::{Node, NodeId};
pub use state::TrackerState;
