//! Entities read from persistence by the workflow.
//!
//! # Invariants
//! - A folder has exactly one `owner`; the owner need not appear in the
//!   folder's own access control list.
//! - ACL order is kept but carries no meaning; duplicate grants are legal.

use crate::model::value::{Bool, Id, Permission, Str, Time};
use crate::record::{record_fields, TaggedRecord};
use serde::{Deserialize, Serialize};

/// One grant: `user` may exercise `permission` on the owning resource.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccessControl {
    pub user: Id,
    pub permission: Permission,
}

impl AccessControl {
    pub fn new(user: Id, permission: Permission) -> Self {
        Self { user, permission }
    }
}

impl TaggedRecord for AccessControl {
    const TAG: &'static str = "AccessControl";
}

record_fields!(AccessControl {
    USER: user => Id,
    PERMISSION: permission => Permission,
});

/// Grants scoped to a single resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessControlList {
    pub id: Id,
    pub list: Vec<AccessControl>,
}

impl AccessControlList {
    pub fn new(id: Id, list: Vec<AccessControl>) -> Self {
        Self { id, list }
    }

    /// Returns a copy with `grant` appended.
    pub fn with_grant(&self, grant: AccessControl) -> Self {
        Self::LIST.update(self, |list| {
            let mut next = list.clone();
            next.push(grant);
            next
        })
    }
}

impl TaggedRecord for AccessControlList {
    const TAG: &'static str = "AccessControlListEntity";
}

record_fields!(AccessControlList {
    ID: id => Id,
    LIST: list => Vec<AccessControl>,
});

/// Container for notes. Folders may nest under a parent folder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub id: Id,
    pub name: Str,
    pub creation_time: Time,
    pub owner: Id,
    pub creator: Id,
    pub parent: Option<Box<Folder>>,
    pub access_control_list: AccessControlList,
}

impl TaggedRecord for Folder {
    const TAG: &'static str = "FolderEntity";
}

record_fields!(Folder {
    ID: id => Id,
    NAME: name => Str,
    CREATION_TIME: creation_time => Time,
    OWNER: owner => Id,
    CREATOR: creator => Id,
    PARENT: parent => Option<Box<Folder>>,
    ACCESS_CONTROL_LIST: access_control_list => AccessControlList,
});

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: Id,
    pub name: Str,
    pub content: Str,
    pub is_important: Bool,
    pub creation_time: Time,
    pub owner: Id,
    pub creator: Id,
    pub parent: Folder,
    pub access_control_list: AccessControlList,
}

impl TaggedRecord for Note {
    const TAG: &'static str = "NoteEntity";
}

record_fields!(Note {
    ID: id => Id,
    NAME: name => Str,
    CONTENT: content => Str,
    IS_IMPORTANT: is_important => Bool,
    CREATION_TIME: creation_time => Time,
    OWNER: owner => Id,
    CREATOR: creator => Id,
    PARENT: parent => Folder,
    ACCESS_CONTROL_LIST: access_control_list => AccessControlList,
});

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Id,
    pub name: Str,
}

impl TaggedRecord for User {
    const TAG: &'static str = "UserEntity";
}

record_fields!(User {
    ID: id => Id,
    NAME: name => Str,
});
