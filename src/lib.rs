pub mod config;
pub mod summary;
pub mod tracker;
pub mod viz;
pub mod wiki;
