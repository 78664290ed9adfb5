use super::NodeId;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TrackerError {
    /// The URL failed validation or no article title could be extracted
    #[error("invalid Wikipedia URL: {0}")]
    InvalidUrl(String),
    /// A child was requested under a node that is not in the session
    #[error("parent node {0} not found")]
    ParentNotFound(NodeId),
    /// The session's indexes disagree about a node
    #[error("node {0} not found")]
    NodeNotFound(NodeId),
}
