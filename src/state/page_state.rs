/// Page outcome definitions for tracking crawl progress
///
/// Every URL the controller dequeues ends in exactly one of these states.
use std::fmt;

/// Represents the outcome of processing a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PageState {
    // ===== Success =====
    /// Page was fetched, parsed, tokenized and recorded in the index
    Indexed,

    // ===== Skips =====
    /// robots.txt disallows the page - never fetched
    RobotsDenied,

    // ===== Errors =====
    /// Page returned HTTP 404 or 410
    DeadLink,

    /// Page could not be reached (connection refused, DNS failure, timeout)
    Unreachable,

    /// Page Content-Type is not HTML
    ContentMismatch,

    /// Fetch or parse failed for any other reason
    Failed,
}

impl PageState {
    /// Returns true if the page contributed to the index
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Indexed)
    }

    /// Returns true if the page was deliberately not fetched
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::RobotsDenied)
    }

    /// Returns true if this represents an error state
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Self::DeadLink | Self::Unreachable | Self::ContentMismatch | Self::Failed
        )
    }

    /// Short machine-readable name, used in logs and reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Indexed => "indexed",
            Self::RobotsDenied => "robots_denied",
            Self::DeadLink => "dead_link",
            Self::Unreachable => "unreachable",
            Self::ContentMismatch => "content_mismatch",
            Self::Failed => "failed",
        }
    }

    /// Returns all possible page states
    pub fn all_states() -> Vec<Self> {
        vec![
            Self::Indexed,
            Self::RobotsDenied,
            Self::DeadLink,
            Self::Unreachable,
            Self::ContentMismatch,
            Self::Failed,
        ]
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
