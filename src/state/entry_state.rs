/// Frontier entry state definitions for tracking crawl progress
///
/// Every entry popped from the frontier walks `Queued → InFlight` and then
/// lands in exactly one terminal state.
use crate::HarvestError;
use std::fmt;

/// Represents the current state of a frontier entry in a crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryState {
    // ===== Active States =====
    /// Entry is waiting in the frontier
    Queued,

    /// Entry is being fetched (including retries)
    InFlight,

    // ===== Terminal States =====
    /// Page was fetched and extracted
    Accepted,

    /// Response was not HTML; counted neither as a page nor as an error
    SkippedNonHtml,

    /// Fetch failed permanently (after retries, where they apply)
    Failed,

    /// Redirected onto a page this run already visited; dropped silently
    SkippedDuplicate,
}

impl EntryState {
    /// Returns true if this is a terminal state (no further processing needed)
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Queued | Self::InFlight)
    }

    /// Returns true if `next` is a legal successor of this state
    pub fn can_transition_to(&self, next: EntryState) -> bool {
        if self.is_terminal() {
            return false;
        }
        matches!(
            (self, next),
            (Self::Queued, Self::InFlight)
                | (Self::InFlight, Self::Accepted)
                | (Self::InFlight, Self::SkippedNonHtml)
                | (Self::InFlight, Self::Failed)
                | (Self::InFlight, Self::SkippedDuplicate)
        )
    }

    /// Moves to `next`, rejecting illegal transitions
    pub fn transition(self, next: EntryState) -> Result<EntryState, HarvestError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(HarvestError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::InFlight => "in_flight",
            Self::Accepted => "accepted",
            Self::SkippedNonHtml => "skipped_non_html",
            Self::Failed => "failed",
            Self::SkippedDuplicate => "skipped_duplicate",
        }
    }
}

impl fmt::Display for EntryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
