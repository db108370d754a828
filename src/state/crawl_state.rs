/// Crawl state definitions for tracking a run's progress
///
/// A run moves `Init → Discovering → Fetching → Aggregating → Done`, with
/// `Failed` reachable from `Discovering`, from a fan-out in which every
/// page fetch failed, and from a cancelled fan-out.
use std::fmt;

/// Represents the current state of one crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlState {
    // ===== Active States =====
    /// Run created, nothing fetched yet
    Init,

    /// Root page is being fetched and its pagination region read
    Discovering,

    /// Page tasks are dispatched to the worker pool
    Fetching,

    /// Every dispatched task has reported; the batch is being closed
    Aggregating,

    // ===== Terminal States =====
    /// Batch finalized and handed back to the caller
    Done,

    /// Run aborted (root unreachable, no pagination, or every page failed)
    Failed,
}

impl CrawlState {
    /// Returns true if no further transition is possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// Returns true if `next` is a legal successor of this state
    pub fn can_transition_to(&self, next: CrawlState) -> bool {
        matches!(
            (self, next),
            (Self::Init, Self::Discovering)
                | (Self::Discovering, Self::Fetching)
                | (Self::Discovering, Self::Failed)
                | (Self::Fetching, Self::Aggregating)
                | (Self::Fetching, Self::Failed)
                | (Self::Aggregating, Self::Done)
        )
    }

    /// Short lowercase name used in log lines
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Discovering => "discovering",
            Self::Fetching => "fetching",
            Self::Aggregating => "aggregating",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

impl Default for CrawlState {
    fn default() -> Self {
        Self::Init
    }
}

impl fmt::Display for CrawlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
