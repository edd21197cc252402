//! # Lifecycle State Machine
//!
//! Two flows share one state type:
//!
//! ```text
//! Issuance:
//!   Preparing ─▶ Hashing ─▶ ProofGenerating ─▶ OffChainVerifying
//!       ▲                                            │
//!       │                                            ▼
//!    Failed ◀── (any non-terminal)         OnChainVerifying ─▶ Packaging ─▶ Complete
//!
//! Verification:
//!   Decoding ─▶ OffChainVerifying ─▶ OnChainVerifying ─▶ Complete
//! ```
//!
//! `Failed` is terminal except that an issuance run may re-enter
//! `Preparing` to retry with the same attributes. Every transition is
//! appended to the run's log and published on the optional progress
//! channel.

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use zkid_core::{StateTransitionError, Timestamp};

/// A lifecycle state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "reason", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LifecycleState {
    /// Attributes accepted, run starting.
    Preparing,
    /// Building the circuit input.
    Hashing,
    /// Groth16 proving in progress.
    ProofGenerating,
    /// Decoding a presented bundle.
    Decoding,
    /// Off-chain pairing check in flight.
    OffChainVerifying,
    /// Ledger verification in flight.
    OnChainVerifying,
    /// Encoding the disclosure bundle.
    Packaging,
    /// Run finished.
    Complete,
    /// Run aborted.
    Failed(String),
}

impl LifecycleState {
    /// Canonical state name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Preparing => "PREPARING",
            Self::Hashing => "HASHING",
            Self::ProofGenerating => "PROOF_GENERATING",
            Self::Decoding => "DECODING",
            Self::OffChainVerifying => "OFF_CHAIN_VERIFYING",
            Self::OnChainVerifying => "ON_CHAIN_VERIFYING",
            Self::Packaging => "PACKAGING",
            Self::Complete => "COMPLETE",
            Self::Failed(_) => "FAILED",
        }
    }

    /// `Complete` or `Failed`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Failed(_))
    }
}

impl std::fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Failed(reason) => write!(f, "FAILED({reason})"),
            other => f.write_str(other.name()),
        }
    }
}

/// Which flow a run follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Flow {
    /// Attributes in, disclosure bundle out.
    Issuance,
    /// Bundle in, verification report out.
    Verification,
}

impl Flow {
    /// The state a run of this flow starts in.
    pub fn initial_state(self) -> LifecycleState {
        match self {
            Self::Issuance => LifecycleState::Preparing,
            Self::Verification => LifecycleState::Decoding,
        }
    }

    /// Whether `from → to` is allowed in this flow.
    pub fn allows(self, from: &LifecycleState, to: &LifecycleState) -> bool {
        use LifecycleState::*;
        if matches!(to, Failed(_)) {
            return !from.is_terminal();
        }
        match self {
            Self::Issuance => matches!(
                (from, to),
                (Preparing, Hashing)
                    | (Hashing, ProofGenerating)
                    | (ProofGenerating, OffChainVerifying)
                    | (OffChainVerifying, OnChainVerifying)
                    | (OnChainVerifying, Packaging)
                    | (Packaging, Complete)
                    | (Failed(_), Preparing)
            ),
            Self::Verification => matches!(
                (from, to),
                (Decoding, OffChainVerifying)
                    | (OffChainVerifying, OnChainVerifying)
                    | (OnChainVerifying, Complete)
            ),
        }
    }
}

/// One entry in a run's transition log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// State before the transition.
    pub from: LifecycleState,
    /// State after the transition.
    pub to: LifecycleState,
    /// When it happened.
    pub timestamp: Timestamp,
}

/// A single run's state, log, and progress publisher.
#[derive(Debug)]
pub struct LifecycleMachine {
    flow: Flow,
    state: LifecycleState,
    log: Vec<TransitionRecord>,
    progress: Option<watch::Sender<LifecycleState>>,
}

impl LifecycleMachine {
    /// Start a run of `flow`.
    pub fn new(flow: Flow, progress: Option<watch::Sender<LifecycleState>>) -> Self {
        let state = flow.initial_state();
        if let Some(tx) = &progress {
            tx.send_replace(state.clone());
        }
        Self {
            flow,
            state,
            log: Vec::new(),
            progress,
        }
    }

    /// Current state.
    pub fn state(&self) -> &LifecycleState {
        &self.state
    }

    /// Transitions so far.
    pub fn transitions(&self) -> &[TransitionRecord] {
        &self.log
    }

    /// Consume the machine, returning its final state and log.
    pub fn finish(self) -> (LifecycleState, Vec<TransitionRecord>) {
        (self.state, self.log)
    }

    /// Move to `next`.
    pub fn advance(&mut self, next: LifecycleState) -> Result<(), StateTransitionError> {
        if !self.flow.allows(&self.state, &next) {
            return Err(if self.state.is_terminal() {
                StateTransitionError::AlreadyTerminal {
                    state: self.state.to_string(),
                }
            } else {
                StateTransitionError::InvalidTransition {
                    from: self.state.to_string(),
                    to: next.to_string(),
                }
            });
        }
        tracing::debug!(from = %self.state, to = %next, "lifecycle transition");
        let from = std::mem::replace(&mut self.state, next.clone());
        self.log.push(TransitionRecord {
            from,
            to: next.clone(),
            timestamp: Timestamp::now(),
        });
        if let Some(tx) = &self.progress {
            tx.send_replace(next);
        }
        Ok(())
    }

    /// Move to `Failed(reason)`.
    pub fn fail(&mut self, reason: impl Into<String>) -> Result<(), StateTransitionError> {
        self.advance(LifecycleState::Failed(reason.into()))
    }
}
