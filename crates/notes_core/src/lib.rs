//! Core domain logic for creating notes under folder access control.
//! Adapters are supplied by the caller; this crate owns the decisions.

pub mod access;
pub mod adapter;
pub mod error;
pub mod logging;
pub mod model;
pub mod port;
pub mod record;
pub mod workflow;

pub use access::{AccessQuery, AccessState, REQUIRED_PERMISSION};
pub use error::{AclPersistenceError, WorkflowError, WorkflowResult};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError, LoggingStatus};
pub use model::command::CreateNoteCommand;
pub use model::entity::{AccessControl, AccessControlList, Folder, Note, User};
pub use model::event::{CreateNoteFailedEvent, FailureReason, NoteCreatedEvent, WorkflowEvent};
pub use model::value::{Bool, Id, IdFailure, Permission, Str, Time};
pub use port::{
    AclAdapter, AdapterError, AdapterResult, AuthenticationAdapter, Clock,
    FolderRetrievalAdapter, NotePersistenceAdapter,
};
pub use record::{Factory, Field, TaggedRecord};
pub use workflow::create_note::{configure, CreateNoteWorkflow, Dependencies};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
