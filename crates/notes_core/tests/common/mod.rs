#![allow(dead_code)]

use async_trait::async_trait;
use notes_core::adapter::memory::{
    FixedClock, InMemoryAclStore, InMemoryFolderStore, InMemoryNoteStore, StaticAuthenticator,
};
use notes_core::{
    AccessControl, AccessControlList, AclAdapter, AdapterError, AdapterResult,
    AuthenticationAdapter, Clock, CreateNoteCommand, Dependencies, Folder,
    FolderRetrievalAdapter, Id, NoteCreatedEvent, NotePersistenceAdapter, Permission, Str,
    TaggedRecord, Time,
};
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub const CLOCK_MILLIS: i64 = 1_700_000_000_000;

pub fn clock_time() -> Time {
    Time::create(CLOCK_MILLIS).expect("fixture instant is valid")
}

pub fn folder_owned_by(owner: Id) -> Folder {
    Folder::factory().make(|f| {
        f.id = Id::generate();
        f.name = Str::of("projects");
        f.owner = owner;
        f.creator = owner;
    })
}

pub fn command_for(folder: &Folder, creator: Id) -> CreateNoteCommand {
    CreateNoteCommand::factory().make(|c| {
        c.id = Id::generate();
        c.name = Str::of("plan");
        c.content = Str::of("ship it");
        c.target_folder = folder.id;
        c.creator = creator;
    })
}

pub fn acl_granting(user: Id, permissions: &[Permission]) -> AccessControlList {
    AccessControlList::new(
        Id::generate(),
        permissions
            .iter()
            .map(|permission| AccessControl::new(user, *permission))
            .collect(),
    )
}

/// Fails every call.
pub struct Faulty;

#[async_trait]
impl AuthenticationAdapter for Faulty {
    async fn current_user(&self) -> AdapterResult<Option<Id>> {
        Err(AdapterError::msg("session store offline"))
    }
}

#[async_trait]
impl FolderRetrievalAdapter for Faulty {
    async fn retrieve_folder(&self, _folder_id: Id) -> AdapterResult<Option<Folder>> {
        Err(AdapterError::msg("folder table locked"))
    }
}

#[async_trait]
impl AclAdapter for Faulty {
    async fn retrieve_acl(&self, _resource_id: Id) -> AdapterResult<Option<AccessControlList>> {
        Err(AdapterError::msg("acl table locked"))
    }
}

#[async_trait]
impl NotePersistenceAdapter for Faulty {
    async fn persist_note(&self, _command: &CreateNoteCommand) -> AdapterResult<NoteCreatedEvent> {
        Err(AdapterError::msg("disk full"))
    }
}

impl Clock for Faulty {
    fn now(&self) -> AdapterResult<Time> {
        Err(AdapterError::msg("clock skew detected"))
    }
}

/// Panics on every call.
pub struct Panicking;

#[async_trait]
impl AuthenticationAdapter for Panicking {
    async fn current_user(&self) -> AdapterResult<Option<Id>> {
        panic!("auth adapter bug")
    }
}

#[async_trait]
impl AclAdapter for Panicking {
    async fn retrieve_acl(&self, _resource_id: Id) -> AdapterResult<Option<AccessControlList>> {
        panic!("acl adapter bug")
    }
}

type AdapterFuture<'a, T> = Pin<Box<dyn Future<Output = AdapterResult<T>> + Send + 'a>>;

/// Panics while building the future, before anything is polled.
pub struct EagerPanicking;

impl AuthenticationAdapter for EagerPanicking {
    fn current_user<'life0, 'async_trait>(&'life0 self) -> AdapterFuture<'async_trait, Option<Id>>
    where
        'life0: 'async_trait,
        Self: 'async_trait,
    {
        panic!("auth adapter failed before returning a future")
    }
}

impl AclAdapter for EagerPanicking {
    fn retrieve_acl<'life0, 'async_trait>(
        &'life0 self,
        _resource_id: Id,
    ) -> AdapterFuture<'async_trait, Option<AccessControlList>>
    where
        'life0: 'async_trait,
        Self: 'async_trait,
    {
        panic!("acl adapter failed before returning a future")
    }
}

/// ACL adapter that counts lookups before delegating.
pub struct CountingAcl {
    inner: InMemoryAclStore,
    calls: AtomicUsize,
}

impl CountingAcl {
    pub fn new(inner: InMemoryAclStore) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AclAdapter for CountingAcl {
    async fn retrieve_acl(&self, resource_id: Id) -> AdapterResult<Option<AccessControlList>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.retrieve_acl(resource_id).await
    }
}

/// Note adapter that counts writes before delegating.
pub struct CountingNotes {
    inner: InMemoryNoteStore,
    calls: AtomicUsize,
}

impl CountingNotes {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn stored(&self) -> usize {
        self.inner.notes().len()
    }
}

#[async_trait]
impl NotePersistenceAdapter for CountingNotes {
    async fn persist_note(&self, command: &CreateNoteCommand) -> AdapterResult<NoteCreatedEvent> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.persist_note(command).await
    }
}

/// Healthy in-memory world plus handles for inspection.
pub struct World {
    pub folders: Arc<InMemoryFolderStore>,
    pub acl: Arc<CountingAcl>,
    pub notes: Arc<CountingNotes>,
    pub clock: Arc<dyn Clock>,
}

impl World {
    pub fn new() -> Self {
        let clock: Arc<dyn Clock> = Arc::new(FixedClock(clock_time()));
        let folders = Arc::new(InMemoryFolderStore::new());
        let notes = Arc::new(CountingNotes {
            inner: InMemoryNoteStore::new(folders.clone(), clock.clone()),
            calls: AtomicUsize::new(0),
        });
        Self {
            folders,
            acl: Arc::new(CountingAcl::new(InMemoryAclStore::new())),
            notes,
            clock,
        }
    }

    pub fn with_acl(acls: InMemoryAclStore) -> Self {
        Self {
            acl: Arc::new(CountingAcl::new(acls)),
            ..Self::new()
        }
    }

    pub fn dependencies_for(&self, caller: Option<Id>) -> Dependencies {
        let auth = match caller {
            Some(user) => StaticAuthenticator::authenticated(user),
            None => StaticAuthenticator::anonymous(),
        };
        Dependencies {
            persist_note_adapter: self.notes.clone(),
            retrieve_folder_adapter: self.folders.clone(),
            acl_adapter: self.acl.clone(),
            auth_adapter: Arc::new(auth),
            clock: self.clock.clone(),
        }
    }
}
