use serde::{Deserialize, Serialize};
use std::fmt;

/// Orchestration run states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    /// Initial state, entered with the job request
    Submitting,
    /// Timed delay between polls
    Waiting,
    /// Poller invocation and branch decision
    CheckingStatus,
    /// Job reported success
    Succeeded,
    /// Job reported failure, a step gave up, or the run timed out
    Failed,
}

impl RunState {
    /// Check if this is a terminal state (no further transitions allowed)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }

    /// Whether the state graph has an edge from `self` to `next`
    pub fn can_transition_to(&self, next: RunState) -> bool {
        match (self, next) {
            (Self::Submitting, Self::Waiting) | (Self::Submitting, Self::Failed) => true,
            (Self::Waiting, Self::CheckingStatus) | (Self::Waiting, Self::Failed) => true,
            (Self::CheckingStatus, Self::Waiting)
            | (Self::CheckingStatus, Self::Succeeded)
            | (Self::CheckingStatus, Self::Failed) => true,
            _ => false,
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Submitting => write!(f, "submitting"),
            Self::Waiting => write!(f, "waiting"),
            Self::CheckingStatus => write!(f, "checking_status"),
            Self::Succeeded => write!(f, "succeeded"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

impl std::str::FromStr for RunState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "submitting" => Ok(Self::Submitting),
            "waiting" => Ok(Self::Waiting),
            "checking_status" => Ok(Self::CheckingStatus),
            "succeeded" => Ok(Self::Succeeded),
            "failed" => Ok(Self::Failed),
            _ => Err(format!("Invalid run state: {s}")),
        }
    }
}

/// Default state for new runs
impl Default for RunState {
    fn default() -> Self {
        Self::Submitting
    }
}
