/// Listing pagination state definitions
///
/// A category's listing is walked by a small state machine:
///
/// ```text
/// LoadingPage -> ExtractingProducts -> CheckingNextPage -> LoadingPage | Done
///      \                 \                    \
///       +-----------------+--------------------+--> Failed
/// ```
use std::fmt;

/// Represents where the paginator is within a category's listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListingState {
    // ===== Active States =====
    /// Reaching a listing page and waiting for its items to appear
    LoadingPage,

    /// Reading product links and extracting each product
    ExtractingProducts,

    /// Looking for an enabled next-page control
    CheckingNextPage,

    // ===== Terminal States =====
    /// The last listing page has been processed
    Done,

    /// A listing page could not be loaded, read or advanced
    Failed,
}

impl ListingState {
    /// Returns true if pagination has stopped
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// Returns true if `next` is a legal successor of this state
    pub fn can_transition_to(&self, next: ListingState) -> bool {
        match self {
            Self::LoadingPage => matches!(next, Self::ExtractingProducts | Self::Failed),
            Self::ExtractingProducts => matches!(next, Self::CheckingNextPage | Self::Failed),
            Self::CheckingNextPage => {
                matches!(next, Self::LoadingPage | Self::Done | Self::Failed)
            }
            Self::Done | Self::Failed => false,
        }
    }

    /// Short lowercase name used in log lines
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LoadingPage => "loading_page",
            Self::ExtractingProducts => "extracting_products",
            Self::CheckingNextPage => "checking_next_page",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }

    /// Returns all listing states
    pub fn all_states() -> Vec<Self> {
        vec![
            Self::LoadingPage,
            Self::ExtractingProducts,
            Self::CheckingNextPage,
            Self::Done,
            Self::Failed,
        ]
    }
}

impl fmt::Display for ListingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
