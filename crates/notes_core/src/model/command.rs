//! Commands accepted by the workflows.

use crate::model::value::{Bool, Id, Str};
use crate::record::{record_fields, TaggedRecord};
use serde::{Deserialize, Serialize};

/// Intent to create one note inside `target_folder`.
///
/// Carries no authorization state; the workflow decides access itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNoteCommand {
    pub id: Id,
    pub name: Str,
    pub content: Str,
    pub is_important: Bool,
    pub target_folder: Id,
    pub creator: Id,
}

impl TaggedRecord for CreateNoteCommand {
    const TAG: &'static str = "CreateNoteCommand";
}

record_fields!(CreateNoteCommand {
    ID: id => Id,
    NAME: name => Str,
    CONTENT: content => Str,
    IS_IMPORTANT: is_important => Bool,
    TARGET_FOLDER: target_folder => Id,
    CREATOR: creator => Id,
});
