//! Access decision engine for folder-scoped commands.
//!
//! # Responsibility
//! - Decide whether a user may create content in a folder.
//! - Check ownership first and fall back to the folder's ACL.
//!
//! # Invariants
//! - Ownership always authorizes, whatever the ACL says.
//! - Owners never trigger an ACL lookup.
//! - Grant checks are existential: duplicates change nothing.
//! - A missing ACL means unauthorized, not an error.

use crate::error::AclPersistenceError;
use crate::model::entity::{AccessControl, Folder};
use crate::model::value::{Id, Permission};
use crate::port::{guard, AclAdapter};
use crate::record::{record_fields, TaggedRecord};
use log::debug;

/// Permission an ACL must grant before a non-owner may create a note.
pub const REQUIRED_PERMISSION: Permission = Permission::Create;

/// A pending question: may `user` act on `resource`?
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessQuery {
    pub user: Id,
    pub resource: Folder,
}

impl TaggedRecord for AccessQuery {
    const TAG: &'static str = "AccessQuery";
}

record_fields!(AccessQuery {
    USER: user => Id,
    RESOURCE: resource => Folder,
});

/// Decided access query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessState {
    Authorized(AccessQuery),
    Unauthorized(AccessQuery),
}

impl AccessState {
    pub fn is_authorized(&self) -> bool {
        matches!(self, Self::Authorized(_))
    }

    pub fn query(&self) -> &AccessQuery {
        match self {
            Self::Authorized(query) | Self::Unauthorized(query) => query,
        }
    }
}

/// Opens an access query by `user` on `folder`.
pub fn open_folder_access_query_for_user(user: Id, folder: Folder) -> AccessQuery {
    AccessQuery::factory().make(|query| {
        query.user = user;
        query.resource = folder;
    })
}

/// Authorizes the query when the queried user owns the resource.
pub fn check_access_via_owner(query: AccessQuery) -> AccessState {
    if query.resource.owner == query.user {
        AccessState::Authorized(query)
    } else {
        AccessState::Unauthorized(query)
    }
}

/// Keeps only the grants that belong to the queried user.
pub fn filter_queried_users_acls(query: &AccessQuery, grants: &[AccessControl]) -> Vec<AccessControl> {
    grants
        .iter()
        .filter(|grant| grant.user == query.user)
        .copied()
        .collect()
}

/// True when at least one grant carries `permission`.
pub fn has_permission(permission: Permission, grants: &[AccessControl]) -> bool {
    grants.iter().any(|grant| grant.permission == permission)
}

/// Decides the query from the ACL stored for the queried resource.
///
/// # Errors
/// - `AclPersistenceError` when the adapter faults or panics.
pub async fn check_access_via_acl(
    acl_adapter: &dyn AclAdapter,
    query: AccessQuery,
) -> Result<AccessState, AclPersistenceError> {
    let resource_id = query.resource.id;
    let maybe_acl = guard(
        "retrieve_acl",
        move || acl_adapter.retrieve_acl(resource_id),
        AclPersistenceError,
    )
    .await?;

    let Some(acl) = maybe_acl else {
        debug!(
            "event=acl_check module=access status=ok resource={} decision=unauthorized acl=missing",
            resource_id
        );
        return Ok(AccessState::Unauthorized(query));
    };

    let users_grants = filter_queried_users_acls(&query, &acl.list);
    let granted = has_permission(REQUIRED_PERMISSION, &users_grants);
    debug!(
        "event=acl_check module=access status=ok resource={} grants={} decision={}",
        resource_id,
        users_grants.len(),
        if granted { "authorized" } else { "unauthorized" }
    );

    Ok(if granted {
        AccessState::Authorized(query)
    } else {
        AccessState::Unauthorized(query)
    })
}

/// Runs the owner check, then the ACL check only when ownership fails.
pub async fn execute_access_query(
    acl_adapter: &dyn AclAdapter,
    query: AccessQuery,
) -> Result<AccessState, AclPersistenceError> {
    match check_access_via_owner(query) {
        AccessState::Authorized(query) => Ok(AccessState::Authorized(query)),
        AccessState::Unauthorized(query) => check_access_via_acl(acl_adapter, query).await,
    }
}
