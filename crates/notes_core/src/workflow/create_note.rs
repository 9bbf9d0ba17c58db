//! Create-note workflow.
//!
//! # Responsibility
//! - Authenticate the caller and locate the target folder concurrently.
//! - Authorize via ownership, then the folder ACL.
//! - Persist the note, stamp the outcome with the clock and link it back to
//!   the originating command.
//!
//! # Invariants
//! - Business rejections are returned as `CreateNoteFailed` events.
//! - Rejected commands never reach the persistence adapter.
//! - A persisted note is not rolled back when a later stage faults.
//! - An authentication fault wins over a folder retrieval fault.

use crate::access::{execute_access_query, open_folder_access_query_for_user, AccessState};
use crate::error::{WorkflowError, WorkflowResult};
use crate::model::command::CreateNoteCommand;
use crate::model::event::{CreateNoteFailedEvent, WorkflowEvent};
use crate::port::{
    guard, guard_sync, AclAdapter, AuthenticationAdapter, Clock, FolderRetrievalAdapter,
    NotePersistenceAdapter,
};
use log::{info, warn};
use std::sync::Arc;

/// Ports the workflow runs against.
#[derive(Clone)]
pub struct Dependencies {
    pub persist_note_adapter: Arc<dyn NotePersistenceAdapter>,
    pub retrieve_folder_adapter: Arc<dyn FolderRetrievalAdapter>,
    pub acl_adapter: Arc<dyn AclAdapter>,
    pub auth_adapter: Arc<dyn AuthenticationAdapter>,
    pub clock: Arc<dyn Clock>,
}

/// Result of the authorization stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    /// The command, unchanged, cleared for persistence.
    Permitted(CreateNoteCommand),
    Rejected(CreateNoteFailedEvent),
}

/// Decides whether the current user may run `command`.
///
/// # Errors
/// - `Authentication` when the authentication adapter faults.
/// - `RetrieveFolder` when the folder adapter faults.
/// - `AclPersistence` when the ACL adapter faults.
pub async fn check_user_access(
    folders: &dyn FolderRetrievalAdapter,
    auth: &dyn AuthenticationAdapter,
    acl: &dyn AclAdapter,
    command: &CreateNoteCommand,
) -> Result<AccessDecision, WorkflowError> {
    let (user, folder) = futures::join!(
        guard(
            "current_user",
            move || auth.current_user(),
            WorkflowError::Authentication
        ),
        guard(
            "retrieve_folder",
            move || folders.retrieve_folder(command.target_folder),
            WorkflowError::RetrieveFolder
        ),
    );
    let user = user?;
    let folder = folder?;

    let Some(user) = user else {
        return Ok(AccessDecision::Rejected(
            CreateNoteFailedEvent::authentication_failure(),
        ));
    };
    let Some(folder) = folder else {
        return Ok(AccessDecision::Rejected(
            CreateNoteFailedEvent::target_not_found(),
        ));
    };

    let query = open_folder_access_query_for_user(user, folder);
    Ok(match execute_access_query(acl, query).await? {
        AccessState::Authorized(_) => AccessDecision::Permitted(command.clone()),
        AccessState::Unauthorized(_) => {
            AccessDecision::Rejected(CreateNoteFailedEvent::unauthorized_action())
        }
    })
}

/// Returns a copy of `event` stamped with the clock's current time.
///
/// # Errors
/// - `Clock` when the clock faults or panics.
pub fn set_event_time_using_clock(
    clock: &dyn Clock,
    event: &WorkflowEvent,
) -> Result<WorkflowEvent, WorkflowError> {
    let now = guard_sync("clock_now", || clock.now(), WorkflowError::Clock)?;
    Ok(event.with_time(now))
}

/// Returns a copy of `event` linked to `command`.
pub fn set_event_command(command: &CreateNoteCommand, event: &WorkflowEvent) -> WorkflowEvent {
    event.with_command(command.id)
}

/// Builds the create-note operation over `dependencies`.
pub fn configure(dependencies: Dependencies) -> CreateNoteWorkflow {
    CreateNoteWorkflow { dependencies }
}

/// Configured create-note operation. Cheap to clone and safe to share.
#[derive(Clone)]
pub struct CreateNoteWorkflow {
    dependencies: Dependencies,
}

impl CreateNoteWorkflow {
    /// Runs one create-note command through every stage.
    pub async fn execute(&self, command: CreateNoteCommand) -> WorkflowResult {
        let outcome = self.run(&command).await;
        log_outcome(&command, &outcome);
        outcome
    }

    async fn run(&self, command: &CreateNoteCommand) -> WorkflowResult {
        let deps = &self.dependencies;
        let notes = deps.persist_note_adapter.as_ref();
        let decision = check_user_access(
            deps.retrieve_folder_adapter.as_ref(),
            deps.auth_adapter.as_ref(),
            deps.acl_adapter.as_ref(),
            command,
        )
        .await?;

        let event = match decision {
            AccessDecision::Permitted(command) => WorkflowEvent::from(
                guard(
                    "persist_note",
                    || notes.persist_note(&command),
                    WorkflowError::PersistNote,
                )
                .await?,
            ),
            AccessDecision::Rejected(rejection) => WorkflowEvent::from(rejection),
        };

        let stamped = set_event_time_using_clock(deps.clock.as_ref(), &event)?;
        Ok(set_event_command(command, &stamped))
    }
}

fn log_outcome(command: &CreateNoteCommand, outcome: &WorkflowResult) {
    match outcome {
        Ok(WorkflowEvent::NoteCreated(event)) => info!(
            "event=create_note module=workflow status=ok command={} folder={} note={}",
            command.id, command.target_folder, event.note.id
        ),
        Ok(WorkflowEvent::CreateNoteFailed(event)) => info!(
            "event=create_note module=workflow status=rejected command={} folder={} reason={}",
            command.id, command.target_folder, event.reason
        ),
        Err(err) => warn!(
            "event=create_note module=workflow status=error command={} folder={} error={}",
            command.id,
            command.target_folder,
            err.tag()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::{set_event_command, set_event_time_using_clock};
    use crate::error::WorkflowError;
    use crate::model::command::CreateNoteCommand;
    use crate::model::event::{CreateNoteFailedEvent, WorkflowEvent};
    use crate::model::value::{Id, Time};
    use crate::port::{AdapterError, AdapterResult, Clock};
    use crate::record::TaggedRecord;

    struct Fixed(Time);

    impl Clock for Fixed {
        fn now(&self) -> AdapterResult<Time> {
            Ok(self.0)
        }
    }

    struct Broken;

    impl Clock for Broken {
        fn now(&self) -> AdapterResult<Time> {
            Err(AdapterError::msg("clock unavailable"))
        }
    }

    #[test]
    fn stamps_time_without_touching_input() {
        let time = Time::create(1_700_000_000_000).expect("valid instant");
        let event = WorkflowEvent::from(CreateNoteFailedEvent::unauthorized_action());

        let stamped = set_event_time_using_clock(&Fixed(time), &event).expect("clock works");

        assert_eq!(stamped.time(), time);
        assert_eq!(event.time(), Time::default());
    }

    #[test]
    fn clock_fault_becomes_clock_error() {
        let event = WorkflowEvent::from(CreateNoteFailedEvent::unauthorized_action());
        assert_eq!(
            set_event_time_using_clock(&Broken, &event),
            Err(WorkflowError::Clock)
        );
    }

    #[test]
    fn links_event_to_command_id() {
        let command = CreateNoteCommand::factory().make(|c| c.id = Id::generate());
        let event = WorkflowEvent::from(CreateNoteFailedEvent::target_not_found());
        assert_eq!(set_event_command(&command, &event).command(), command.id);
    }
}
