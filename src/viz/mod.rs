pub mod app;
pub mod layout;

pub use app::{validation_message, TrackerApp, INVALID_URL_MESSAGE};
pub use layout::{layout, LayoutConfig, PlacedNode, TreeLayout};
