use std::fmt;

/// Lifecycle of a crawl controller
///
/// A controller starts `Idle`, becomes `Running` when the seed is pushed on
/// the frontier and ends `Done` once the frontier is exhausted or the crawl
/// is cancelled. A finished controller is not restarted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    Idle,
    Running,
    Done,
}

impl CrawlPhase {
    /// Returns true if the controller may move from `self` to `next`
    pub fn can_transition_to(&self, next: CrawlPhase) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Running) | (Self::Running, Self::Done)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
