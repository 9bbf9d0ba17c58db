//! Workflow error taxonomy.
//!
//! # Responsibility
//! - Name every infrastructure fault the create-note workflow can surface.
//!
//! # Invariants
//! - The set is closed and each variant is a zero-payload marker; the fault
//!   detail is logged at the call site and dropped.
//! - Business rejections are events, never errors.

use crate::model::event::WorkflowEvent;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Outcome of one workflow invocation.
pub type WorkflowResult = Result<WorkflowEvent, WorkflowError>;

/// Terminal infrastructure failure of the workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkflowError {
    /// Authentication adapter faulted.
    Authentication,
    /// Folder retrieval adapter faulted.
    RetrieveFolder,
    /// ACL adapter faulted.
    AclPersistence,
    /// Note persistence adapter faulted.
    PersistNote,
    /// Clock faulted.
    Clock,
}

impl WorkflowError {
    /// Stable discriminant used in logs and by callers that branch on tags.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Authentication => "AuthenticationError",
            Self::RetrieveFolder => "RetrieveFolderError",
            Self::AclPersistence => "ACLPersistenceError",
            Self::PersistNote => "PersistNoteError",
            Self::Clock => "ClockError",
        }
    }
}

impl Display for WorkflowError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Authentication => write!(f, "authentication adapter failed"),
            Self::RetrieveFolder => write!(f, "folder retrieval adapter failed"),
            Self::AclPersistence => write!(f, "access control list adapter failed"),
            Self::PersistNote => write!(f, "note persistence adapter failed"),
            Self::Clock => write!(f, "clock failed"),
        }
    }
}

impl Error for WorkflowError {}

/// The only failure the access decision engine can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AclPersistenceError;

impl Display for AclPersistenceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", WorkflowError::AclPersistence)
    }
}

impl Error for AclPersistenceError {}

impl From<AclPersistenceError> for WorkflowError {
    fn from(_: AclPersistenceError) -> Self {
        Self::AclPersistence
    }
}
