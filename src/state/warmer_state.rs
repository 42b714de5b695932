use std::fmt;

/// Lifecycle of a [`Coordinator`](crate::crawler::Coordinator)
///
/// ```text
/// Idle ──add──▶ Accumulating ──run──▶ Ready ──▶ Executed
///                    ▲                             │
///                    └────────────add──────────────┘
/// ```
///
/// Running again from `Executed` goes through `Ready` once more and crawls
/// the same accumulated URL set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarmerState {
    /// Nothing has been added yet
    Idle,

    /// Sitemaps or URLs are being added
    Accumulating,

    /// Accumulation is closed, the crawl is about to start
    Ready,

    /// A crawl has completed
    Executed,
}

impl WarmerState {
    /// Returns true if the state machine allows moving to `next`
    pub fn can_transition_to(&self, next: WarmerState) -> bool {
        use WarmerState::*;

        matches!(
            (self, next),
            (Idle, Accumulating)
                | (Idle, Ready)
                | (Accumulating, Accumulating)
                | (Accumulating, Ready)
                | (Ready, Accumulating)
                | (Ready, Executed)
                | (Executed, Accumulating)
                | (Executed, Ready)
        )
    }

    /// Returns true once at least one crawl has run
    pub fn has_executed(&self) -> bool {
        matches!(self, Self::Executed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Accumulating => "accumulating",
            Self::Ready => "ready",
            Self::Executed => "executed",
        }
    }
}

impl fmt::Display for WarmerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_transitions() {
        assert!(WarmerState::Idle.can_transition_to(WarmerState::Accumulating));
        assert!(WarmerState::Accumulating.can_transition_to(WarmerState::Accumulating));
        assert!(WarmerState::Accumulating.can_transition_to(WarmerState::Ready));
        assert!(WarmerState::Ready.can_transition_to(WarmerState::Executed));
    }

    #[test]
    fn test_run_without_input() {
        assert!(WarmerState::Idle.can_transition_to(WarmerState::Ready));
    }

    #[test]
    fn test_rerun_and_add_after_execution() {
        assert!(WarmerState::Executed.can_transition_to(WarmerState::Ready));
        assert!(WarmerState::Executed.can_transition_to(WarmerState::Accumulating));
    }

    #[test]
    fn test_invalid_transitions() {
        assert!(!WarmerState::Idle.can_transition_to(WarmerState::Executed));
        assert!(!WarmerState::Accumulating.can_transition_to(WarmerState::Executed));
        assert!(!WarmerState::Accumulating.can_transition_to(WarmerState::Idle));
        assert!(!WarmerState::Executed.can_transition_to(WarmerState::Idle));
    }

    #[test]
    fn test_has_executed() {
        assert!(WarmerState::Executed.has_executed());
        assert!(!WarmerState::Ready.has_executed());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", WarmerState::Accumulating), "accumulating");
    }
}
