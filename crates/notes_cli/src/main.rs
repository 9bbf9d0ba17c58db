//! CLI smoke entry point.
//!
//! # Responsibility
//! - Wire the in-memory adapters into the create-note workflow.
//! - Run one owner-authored note and one stranger's attempt, printing the
//!   outcome tags.

use log::error;
use notes_core::adapter::memory::{
    InMemoryAclStore, InMemoryFolderStore, InMemoryNoteStore, StaticAuthenticator, SystemClock,
};
use notes_core::{
    configure, default_log_level, init_logging, Bool, Clock, CreateNoteCommand, Dependencies,
    Folder, Id, Str, TaggedRecord, WorkflowResult,
};
use std::process::ExitCode;
use std::sync::Arc;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    if let Some(log_dir) = std::env::args().nth(1) {
        if let Err(err) = init_logging(default_log_level(), &log_dir) {
            eprintln!("notes_cli logging disabled: {err}");
        }
    }

    println!("notes_core version={}", notes_core::core_version());

    let owner = Id::generate();
    let folder = Folder::factory().make(|f| {
        f.id = Id::generate();
        f.name = Str::of("inbox");
        f.owner = owner;
        f.creator = owner;
    });

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let folders = Arc::new(InMemoryFolderStore::new());
    folders.insert(folder.clone());
    let notes = Arc::new(InMemoryNoteStore::new(folders.clone(), clock.clone()));
    let acls = Arc::new(InMemoryAclStore::new());

    let command = CreateNoteCommand::factory().make(|c| {
        c.id = Id::generate();
        c.name = Str::of("first note");
        c.content = Str::of("hello");
        c.is_important = Bool::of(true);
        c.target_folder = folder.id;
        c.creator = owner;
    });

    let mut exit = ExitCode::SUCCESS;
    for (label, caller) in [("owner", owner), ("stranger", Id::generate())] {
        let workflow = configure(Dependencies {
            persist_note_adapter: notes.clone(),
            retrieve_folder_adapter: folders.clone(),
            acl_adapter: acls.clone(),
            auth_adapter: Arc::new(StaticAuthenticator::authenticated(caller)),
            clock: clock.clone(),
        });
        if !report(label, workflow.execute(command.clone()).await) {
            exit = ExitCode::FAILURE;
        }
    }

    println!("notes_core stored_notes={}", notes.notes().len());
    exit
}

fn report(label: &str, outcome: WorkflowResult) -> bool {
    match outcome {
        Ok(event) => {
            let reason = event
                .failure_reason()
                .map(|reason| reason.to_string())
                .unwrap_or_else(|| "none".to_string());
            println!("create_note caller={label} outcome={} reason={reason}", event.tag());
            true
        }
        Err(err) => {
            error!("event=cli_run module=cli status=error caller={label} error={}", err.tag());
            eprintln!("create_note caller={label} error={}", err.tag());
            false
        }
    }
}
