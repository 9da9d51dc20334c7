//! Identity, role and permission values built per request.

use serde::{Deserialize, Serialize};

use crate::decision::{Action, PermissionKey};

/// The resolved caller.
///
/// Built from a store row for the lifetime of one request and never persisted.
/// Inserted into request extensions by the role middleware once the request
/// has been authorized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Opaque identifier, as found in the store.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Contact address.
    pub email: String,
    /// The role assigned to this identity.
    pub role: Role,
}

impl Identity {
    /// Whether the loaded permission set grants `action` on `resource`.
    ///
    /// Always `false` before permissions are loaded.
    pub fn can(&self, action: Action, resource: &str) -> bool {
        let key = PermissionKey::new(action.as_str(), resource);
        self.role.permissions.iter().any(|p| p.key() == key)
    }
}

/// A named grouping of permissions.
///
/// The permission list starts empty and is filled in one step once loading
/// completed, so it is never observed partially populated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Role identifier.
    pub id: String,
    /// Role name.
    pub name: String,
    permissions: Vec<Permission>,
}

impl Role {
    /// Create a role with no permissions loaded.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            permissions: Vec::new(),
        }
    }

    /// Permissions in retrieval order. Empty until loaded.
    pub fn permissions(&self) -> &[Permission] {
        &self.permissions
    }

    pub(crate) fn populate(&mut self, permissions: Vec<Permission>) {
        self.permissions = permissions;
    }
}

/// A capability grant: `action` on `resource`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Permission {
    /// Permission identifier.
    pub id: String,
    /// One of `read`, `create`, `update`, `delete`.
    pub action: String,
    /// Store-defined resource category, e.g. `enrollments`.
    pub resource: String,
}

impl Permission {
    /// Create a permission value.
    pub fn new(
        id: impl Into<String>,
        action: impl Into<String>,
        resource: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            action: action.into(),
            resource: resource.into(),
        }
    }

    /// The `action-resource` key this permission is indexed under.
    pub fn key(&self) -> PermissionKey {
        PermissionKey::new(&self.action, &self.resource)
    }
}
