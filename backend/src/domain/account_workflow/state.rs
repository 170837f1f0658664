//! Explicit state machine for one create-account submission.

use serde::Serialize;
use tokio::sync::watch;
use tracing::warn;
use utoipa::ToSchema;

/// Step a submission is in.
///
/// ```text
/// Idle -> Creating -> ResolvingId -> Uploading -> Patching -> Done
///            |            |              |            |
///          Failed   PartialFailure | Done  PartialFailure  PartialFailure
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum WorkflowState {
    Idle,
    Creating,
    ResolvingId,
    Uploading,
    Patching,
    Done,
    PartialFailure,
    Failed,
}

impl WorkflowState {
    /// Advisory progress text for display. Never used for control flow.
    pub fn step_message(self) -> Option<&'static str> {
        match self {
            Self::Idle => None,
            Self::Creating => Some("Creating user account..."),
            Self::ResolvingId => Some("Finding created user..."),
            Self::Uploading => Some("Uploading profile image..."),
            Self::Patching => Some("Updating profile with image..."),
            Self::Done => Some("Account Created Successfully"),
            Self::PartialFailure => Some("Account created, but the profile image was not saved"),
            Self::Failed => Some("Failed to create account"),
        }
    }

    /// Whether no further transitions are allowed.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::PartialFailure | Self::Failed)
    }

    /// Whether `next` is a legal successor of `self`.
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Creating)
                | (Self::Creating, Self::ResolvingId | Self::Failed)
                | (
                    Self::ResolvingId,
                    Self::Uploading | Self::Done | Self::PartialFailure
                )
                | (Self::Uploading, Self::Patching | Self::PartialFailure)
                | (Self::Patching, Self::Done | Self::PartialFailure)
        )
    }
}

/// Publisher side of a submission's progress channel.
#[derive(Debug)]
pub struct WorkflowProgress {
    sender: watch::Sender<WorkflowState>,
}

impl WorkflowProgress {
    /// Create a progress publisher and a receiver observing it.
    ///
    /// # Examples
    /// ```
    /// use account_console::domain::{WorkflowProgress, WorkflowState};
    ///
    /// let (progress, receiver) = WorkflowProgress::channel();
    /// assert_eq!(*receiver.borrow(), WorkflowState::Idle);
    /// assert_eq!(progress.current(), WorkflowState::Idle);
    /// ```
    pub fn channel() -> (Self, watch::Receiver<WorkflowState>) {
        let (sender, receiver) = watch::channel(WorkflowState::Idle);
        (Self { sender }, receiver)
    }

    /// Publisher nobody observes.
    pub fn detached() -> Self {
        let (progress, _receiver) = Self::channel();
        progress
    }

    /// Latest published state.
    pub fn current(&self) -> WorkflowState {
        *self.sender.borrow()
    }

    pub(crate) fn advance(&self, next: WorkflowState) {
        let previous = self.sender.send_replace(next);
        if !previous.can_transition_to(next) {
            warn!(?previous, ?next, "unexpected workflow transition");
        }
    }
}
