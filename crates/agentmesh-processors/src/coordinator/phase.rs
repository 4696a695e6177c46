//! Coordinator phases and the transition table

use crate::error::{ProcessorError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One state of the multi-agent coordinator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Agents are being brought up
    Initialization,
    /// The task is being split into subtasks
    Decomposition,
    /// Subtasks are being handed out
    Delegation,
    /// Agents are working
    Execution,
    /// Results are being coordinated
    Coordination,
    /// Results are being merged
    Synthesis,
    /// The merged result is being checked
    Verification,
    /// Terminal success
    Completed,
    /// Terminal failure
    Failed,
}

const TRANSITIONS: &[(Phase, &[Phase])] = &[
    (Phase::Initialization, &[Phase::Decomposition]),
    (Phase::Decomposition, &[Phase::Delegation]),
    (Phase::Delegation, &[Phase::Execution]),
    (Phase::Execution, &[Phase::Coordination]),
    (Phase::Coordination, &[Phase::Synthesis]),
    (Phase::Synthesis, &[Phase::Verification]),
    (Phase::Verification, &[Phase::Completed, Phase::Failed]),
    (Phase::Completed, &[]),
    (Phase::Failed, &[]),
];

impl Phase {
    /// Every phase in table order
    pub const ALL: [Phase; 9] = [
        Phase::Initialization,
        Phase::Decomposition,
        Phase::Delegation,
        Phase::Execution,
        Phase::Coordination,
        Phase::Synthesis,
        Phase::Verification,
        Phase::Completed,
        Phase::Failed,
    ];

    /// The full transition table
    pub fn transitions() -> &'static [(Phase, &'static [Phase])] {
        TRANSITIONS
    }

    /// Phases reachable from this one
    pub fn allowed_next(self) -> &'static [Phase] {
        TRANSITIONS
            .iter()
            .find(|(from, _)| *from == self)
            .map(|(_, to)| *to)
            .unwrap_or(&[])
    }

    /// Whether moving to `next` is allowed
    pub fn can_transition_to(self, next: Phase) -> bool {
        self == next || self.allowed_next().contains(&next)
    }

    /// Next phase on the happy path
    pub fn happy_next(self) -> Option<Phase> {
        self.allowed_next().first().copied()
    }

    /// Whether the phase is terminal
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Completed | Phase::Failed)
    }

    /// Lowercase phase name
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Initialization => "initialization",
            Phase::Decomposition => "decomposition",
            Phase::Delegation => "delegation",
            Phase::Execution => "execution",
            Phase::Coordination => "coordination",
            Phase::Synthesis => "synthesis",
            Phase::Verification => "verification",
            Phase::Completed => "completed",
            Phase::Failed => "failed",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Phase {
    type Err = ProcessorError;

    fn from_str(s: &str) -> Result<Self> {
        Phase::ALL
            .iter()
            .copied()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ProcessorError::unknown_phase(s))
    }
}
