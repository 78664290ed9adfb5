pub mod config;
pub mod fetch;
pub mod slot;

#[cfg(test)]
mod tests;

pub use config::{SummaryConfig, DEFAULT_USER_AGENT, SUMMARY_REQUEST_TIMEOUT_SEC};
pub use fetch::{placeholder_summary, ArticleSummary, SummaryClient, SummarySource};
pub use slot::SummarySlot;
