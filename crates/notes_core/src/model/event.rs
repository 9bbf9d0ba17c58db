//! Workflow events: business outcomes returned as ordinary data.
//!
//! # Invariants
//! - Events are never mutated; `with_time`/`with_command` return new values.
//! - A rejected command is a `CreateNoteFailed` event, not an error.

use crate::model::entity::Note;
use crate::model::value::{Id, Time};
use crate::record::{record_fields, TaggedRecord};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Why a create-note command was rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// No authenticated user.
    #[default]
    AuthenticationFailure,
    /// User is neither owner nor holder of a create grant.
    UnauthorizedAction,
    /// Target folder does not exist.
    TargetNotFound,
}

impl FailureReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AuthenticationFailure => "authentication_failure",
            Self::UnauthorizedAction => "unauthorized_action",
            Self::TargetNotFound => "target_not_found",
        }
    }
}

impl Display for FailureReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteCreatedEvent {
    pub id: Id,
    pub command: Id,
    pub note: Note,
    pub time: Time,
}

impl TaggedRecord for NoteCreatedEvent {
    const TAG: &'static str = "NoteCreatedEvent";
}

record_fields!(NoteCreatedEvent {
    ID: id => Id,
    COMMAND: command => Id,
    NOTE: note => Note,
    TIME: time => Time,
});

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateNoteFailedEvent {
    pub id: Id,
    pub command: Id,
    pub reason: FailureReason,
    pub time: Time,
}

impl CreateNoteFailedEvent {
    /// New rejection event with a fresh id; `command` and `time` are
    /// filled in later by the workflow.
    pub fn rejected(reason: FailureReason) -> Self {
        Self::factory().make(|event| {
            event.id = Id::generate();
            event.reason = reason;
        })
    }

    pub fn authentication_failure() -> Self {
        Self::rejected(FailureReason::AuthenticationFailure)
    }

    pub fn unauthorized_action() -> Self {
        Self::rejected(FailureReason::UnauthorizedAction)
    }

    pub fn target_not_found() -> Self {
        Self::rejected(FailureReason::TargetNotFound)
    }
}

impl TaggedRecord for CreateNoteFailedEvent {
    const TAG: &'static str = "CreateNoteFailedEvent";
}

record_fields!(CreateNoteFailedEvent {
    ID: id => Id,
    COMMAND: command => Id,
    REASON: reason => FailureReason,
    TIME: time => Time,
});

/// Successful output of the create-note workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "_tag")]
pub enum WorkflowEvent {
    #[serde(rename = "NoteCreatedEvent")]
    NoteCreated(NoteCreatedEvent),
    #[serde(rename = "CreateNoteFailedEvent")]
    CreateNoteFailed(CreateNoteFailedEvent),
}

impl WorkflowEvent {
    pub fn tag(&self) -> &'static str {
        match self {
            Self::NoteCreated(event) => event.tag(),
            Self::CreateNoteFailed(event) => event.tag(),
        }
    }

    pub fn id(&self) -> Id {
        match self {
            Self::NoteCreated(event) => event.id,
            Self::CreateNoteFailed(event) => event.id,
        }
    }

    pub fn command(&self) -> Id {
        match self {
            Self::NoteCreated(event) => event.command,
            Self::CreateNoteFailed(event) => event.command,
        }
    }

    pub fn time(&self) -> Time {
        match self {
            Self::NoteCreated(event) => event.time,
            Self::CreateNoteFailed(event) => event.time,
        }
    }

    /// Returns `None` for `NoteCreated`.
    pub fn failure_reason(&self) -> Option<FailureReason> {
        match self {
            Self::NoteCreated(_) => None,
            Self::CreateNoteFailed(event) => Some(event.reason),
        }
    }

    pub fn with_time(&self, time: Time) -> Self {
        match self {
            Self::NoteCreated(event) => Self::NoteCreated(NoteCreatedEvent::TIME.set(time, event)),
            Self::CreateNoteFailed(event) => {
                Self::CreateNoteFailed(CreateNoteFailedEvent::TIME.set(time, event))
            }
        }
    }

    pub fn with_command(&self, command: Id) -> Self {
        match self {
            Self::NoteCreated(event) => {
                Self::NoteCreated(NoteCreatedEvent::COMMAND.set(command, event))
            }
            Self::CreateNoteFailed(event) => {
                Self::CreateNoteFailed(CreateNoteFailedEvent::COMMAND.set(command, event))
            }
        }
    }
}

impl From<NoteCreatedEvent> for WorkflowEvent {
    fn from(value: NoteCreatedEvent) -> Self {
        Self::NoteCreated(value)
    }
}

impl From<CreateNoteFailedEvent> for WorkflowEvent {
    fn from(value: CreateNoteFailedEvent) -> Self {
        Self::CreateNoteFailed(value)
    }
}
