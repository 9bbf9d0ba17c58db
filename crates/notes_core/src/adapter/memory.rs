//! In-memory adapters and clocks.
//!
//! # Responsibility
//! - Back every workflow port with process-local state for demos and tests.
//!
//! # Invariants
//! - Stores hand out clones; callers never alias stored records.
//! - A poisoned lock surfaces as an `AdapterError` on reads and writes
//!   made through a port.

use crate::model::command::CreateNoteCommand;
use crate::model::entity::{AccessControlList, Folder, Note};
use crate::model::event::NoteCreatedEvent;
use crate::model::value::{Id, Time};
use crate::port::{
    AclAdapter, AdapterError, AdapterResult, AuthenticationAdapter, Clock,
    FolderRetrievalAdapter, NotePersistenceAdapter,
};
use crate::record::TaggedRecord;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

fn poisoned<T>(_: PoisonError<T>) -> AdapterError {
    AdapterError::msg("in-memory store lock poisoned")
}

/// Always reports the same caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticAuthenticator {
    user: Option<Id>,
}

impl StaticAuthenticator {
    pub fn authenticated(user: Id) -> Self {
        Self { user: Some(user) }
    }

    pub fn anonymous() -> Self {
        Self { user: None }
    }
}

#[async_trait]
impl AuthenticationAdapter for StaticAuthenticator {
    async fn current_user(&self) -> AdapterResult<Option<Id>> {
        Ok(self.user)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryFolderStore {
    folders: RwLock<HashMap<Id, Folder>>,
}

impl InMemoryFolderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces `folder` under its id.
    pub fn insert(&self, folder: Folder) {
        self.folders
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(folder.id, folder);
    }

    fn find(&self, folder_id: Id) -> AdapterResult<Option<Folder>> {
        Ok(self.folders.read().map_err(poisoned)?.get(&folder_id).cloned())
    }
}

#[async_trait]
impl FolderRetrievalAdapter for InMemoryFolderStore {
    async fn retrieve_folder(&self, folder_id: Id) -> AdapterResult<Option<Folder>> {
        self.find(folder_id)
    }
}

/// ACLs keyed by the id of the resource they protect.
#[derive(Debug, Default)]
pub struct InMemoryAclStore {
    acls: RwLock<HashMap<Id, AccessControlList>>,
}

impl InMemoryAclStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, resource_id: Id, acl: AccessControlList) {
        self.acls
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(resource_id, acl);
    }
}

#[async_trait]
impl AclAdapter for InMemoryAclStore {
    async fn retrieve_acl(&self, resource_id: Id) -> AdapterResult<Option<AccessControlList>> {
        Ok(self.acls.read().map_err(poisoned)?.get(&resource_id).cloned())
    }
}

/// Persists notes into memory, reading parent folders from a folder store.
pub struct InMemoryNoteStore {
    folders: Arc<InMemoryFolderStore>,
    clock: Arc<dyn Clock>,
    notes: RwLock<Vec<Note>>,
}

impl InMemoryNoteStore {
    pub fn new(folders: Arc<InMemoryFolderStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            folders,
            clock,
            notes: RwLock::new(Vec::new()),
        }
    }

    /// Snapshot of every stored note in insertion order.
    pub fn notes(&self) -> Vec<Note> {
        self.notes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl NotePersistenceAdapter for InMemoryNoteStore {
    async fn persist_note(&self, command: &CreateNoteCommand) -> AdapterResult<NoteCreatedEvent> {
        let parent = self.folders.find(command.target_folder)?.ok_or_else(|| {
            AdapterError::msg(format!("target folder {} vanished", command.target_folder))
        })?;
        let created_at = self.clock.now()?;

        let note = Note::factory().make(|note| {
            note.id = Id::generate();
            note.name = command.name.clone();
            note.content = command.content.clone();
            note.is_important = command.is_important;
            note.creation_time = created_at;
            note.owner = command.creator;
            note.creator = command.creator;
            note.access_control_list = AccessControlList::new(Id::generate(), Vec::new());
            note.parent = parent;
        });

        self.notes.write().map_err(poisoned)?.push(note.clone());

        Ok(NoteCreatedEvent::factory().make(|event| {
            event.id = Id::generate();
            event.command = command.id;
            event.note = note;
            event.time = created_at;
        }))
    }
}

/// Clock frozen at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub Time);

impl Clock for FixedClock {
    fn now(&self) -> AdapterResult<Time> {
        Ok(self.0)
    }
}

/// Wall clock in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> AdapterResult<Time> {
        Ok(Time::of(Utc::now()))
    }
}
