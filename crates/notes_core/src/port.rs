//! Adapter ports consumed by the create-note workflow.
//!
//! # Responsibility
//! - Define the capabilities the core needs from the outside world.
//! - Convert every adapter fault (returned error or panic) into a typed
//!   error exactly once, at the call site.
//!
//! # Invariants
//! - Ports are `Send + Sync`; the core owns no adapter state.
//! - A faulting call is never retried here.

use crate::logging::sanitize_message;
use crate::model::command::CreateNoteCommand;
use crate::model::entity::{AccessControlList, Folder};
use crate::model::event::NoteCreatedEvent;
use crate::model::value::{Id, Time};
use async_trait::async_trait;
use futures::FutureExt;
use log::warn;
use std::any::Any;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::future::Future;
use std::panic::AssertUnwindSafe;

const MAX_FAULT_MESSAGE_CHARS: usize = 160;

pub type AdapterResult<T> = Result<T, AdapterError>;

/// Opaque fault raised by an adapter.
#[derive(Debug)]
pub struct AdapterError {
    source: Box<dyn Error + Send + Sync>,
}

impl AdapterError {
    pub fn new(source: impl Into<Box<dyn Error + Send + Sync>>) -> Self {
        Self {
            source: source.into(),
        }
    }

    pub fn msg(message: impl Into<String>) -> Self {
        Self::new(message.into())
    }
}

impl Display for AdapterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.source)
    }
}

impl Error for AdapterError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(self.source.as_ref())
    }
}

/// Resolves the user behind the current request.
#[async_trait]
pub trait AuthenticationAdapter: Send + Sync {
    /// `None` when the caller is not authenticated.
    async fn current_user(&self) -> AdapterResult<Option<Id>>;
}

#[async_trait]
pub trait FolderRetrievalAdapter: Send + Sync {
    async fn retrieve_folder(&self, folder_id: Id) -> AdapterResult<Option<Folder>>;
}

/// Looks up the access control list attached to a resource.
#[async_trait]
pub trait AclAdapter: Send + Sync {
    async fn retrieve_acl(&self, resource_id: Id) -> AdapterResult<Option<AccessControlList>>;
}

/// Performs the actual note write.
///
/// Either succeeds with the created-note event or faults; there is no
/// sentinel failure value.
#[async_trait]
pub trait NotePersistenceAdapter: Send + Sync {
    async fn persist_note(&self, command: &CreateNoteCommand) -> AdapterResult<NoteCreatedEvent>;
}

/// Source of the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> AdapterResult<Time>;
}

/// Starts and awaits one adapter call, classifying any fault as `on_fault`.
///
/// `call` runs inside the unwind guard too, so an adapter that panics while
/// building its future is caught like one that panics while polled.
pub(crate) async fn guard<T, E, C, F>(stage: &'static str, call: C, on_fault: E) -> Result<T, E>
where
    C: FnOnce() -> F,
    F: Future<Output = AdapterResult<T>>,
{
    let pending = match std::panic::catch_unwind(AssertUnwindSafe(call)) {
        Ok(pending) => pending,
        Err(payload) => return Err(classify_panic(stage, payload.as_ref(), on_fault)),
    };
    match AssertUnwindSafe(pending).catch_unwind().await {
        Ok(result) => classify(stage, result, on_fault),
        Err(payload) => Err(classify_panic(stage, payload.as_ref(), on_fault)),
    }
}

/// Synchronous counterpart of [`guard`].
pub(crate) fn guard_sync<T, E>(
    stage: &'static str,
    call: impl FnOnce() -> AdapterResult<T>,
    on_fault: E,
) -> Result<T, E> {
    match std::panic::catch_unwind(AssertUnwindSafe(call)) {
        Ok(result) => classify(stage, result, on_fault),
        Err(payload) => Err(classify_panic(stage, payload.as_ref(), on_fault)),
    }
}

fn classify<T, E>(stage: &'static str, result: AdapterResult<T>, on_fault: E) -> Result<T, E> {
    result.map_err(|fault| {
        warn!(
            "event=adapter_fault module=port status=error stage={} fault={}",
            stage,
            sanitize_message(&fault.to_string(), MAX_FAULT_MESSAGE_CHARS)
        );
        on_fault
    })
}

fn classify_panic<E>(stage: &'static str, payload: &(dyn Any + Send), on_fault: E) -> E {
    let message = payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string());
    warn!(
        "event=adapter_panic module=port status=error stage={} payload={}",
        stage,
        sanitize_message(&message, MAX_FAULT_MESSAGE_CHARS)
    );
    on_fault
}

#[cfg(test)]
mod tests {
    use super::{guard, guard_sync, AdapterError, AdapterResult};
    use std::error::Error;

    #[derive(Debug, PartialEq)]
    struct Classified;

    #[test]
    fn adapter_error_keeps_message_and_source() {
        let err = AdapterError::msg("disk on fire");
        assert_eq!(err.to_string(), "disk on fire");
        assert!(err.source().is_some());
    }

    #[tokio::test]
    async fn guard_passes_values_through() {
        let value = guard("test", || async { AdapterResult::Ok(7) }, Classified).await;
        assert_eq!(value, Ok(7));
    }

    #[tokio::test]
    async fn guard_classifies_returned_faults() {
        let value = guard(
            "test",
            || async { AdapterResult::<u8>::Err(AdapterError::msg("boom")) },
            Classified,
        )
        .await;
        assert_eq!(value, Err(Classified));
    }

    #[tokio::test]
    async fn guard_classifies_panics() {
        let value = guard(
            "test",
            || async {
                if true {
                    panic!("adapter exploded");
                }
                AdapterResult::Ok(1_u8)
            },
            Classified,
        )
        .await;
        assert_eq!(value, Err(Classified));
    }

    #[tokio::test]
    async fn guard_classifies_panics_while_building_the_future() {
        let value = guard(
            "test",
            || -> std::future::Ready<AdapterResult<u8>> { panic!("no future for you") },
            Classified,
        )
        .await;
        assert_eq!(value, Err(Classified));
    }

    #[test]
    fn guard_sync_classifies_panics_and_faults() {
        let panicked: Result<u8, _> = guard_sync("test", || panic!("tick"), Classified);
        assert_eq!(panicked, Err(Classified));

        let faulted: Result<u8, _> =
            guard_sync("test", || Err(AdapterError::msg("late")), Classified);
        assert_eq!(faulted, Err(Classified));
    }
}
