use crate::tracker::NodeId;

use super::fetch::ArticleSummary;

/// Side-panel summary value for the selected node.
///
/// Each request gets a ticket. A reply is only kept if it carries the latest
/// ticket and is for the node that ticket was issued for, so answers that
/// arrive after the selection moved on are dropped.
#[derive(Debug, Default)]
pub struct SummarySlot {
    ticket: u64,
    requested_for: Option<NodeId>,
    loading: bool,
    value: Option<ArticleSummary>,
}

impl SummarySlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start waiting for the summary of `node`, discarding whatever was shown
    pub fn begin(&mut self, node: NodeId) -> u64 {
        self.ticket += 1;
        self.requested_for = Some(node);
        self.loading = true;
        self.value = None;
        self.ticket
    }

    /// Offer a finished lookup. Returns whether it was accepted.
    pub fn finish(&mut self, ticket: u64, node: NodeId, summary: ArticleSummary) -> bool {
        if ticket != self.ticket || self.requested_for != Some(node) {
            return false;
        }
        self.loading = false;
        self.value = Some(summary);
        true
    }

    pub fn reset(&mut self) {
        self.ticket += 1;
        self.requested_for = None;
        self.loading = false;
        self.value = None;
    }

    pub fn requested_for(&self) -> Option<NodeId> {
        self.requested_for
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn value(&self) -> Option<&ArticleSummary> {
        self.value.as_ref()
    }
}
