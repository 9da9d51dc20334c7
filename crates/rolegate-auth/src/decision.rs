//! Method/path to permission mapping and the allow/deny decision.
//!
//! The decision is a pure function of the HTTP method, the request path and
//! the loaded permissions. The required key is `<action>-<resource>`, where
//! the action comes from the method and the resource is the segment after
//! the version prefix (`/v1/<resource>/...`).

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use http::Method;

use crate::model::Permission;

/// The closed set of actions a permission can grant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    /// `GET`
    Read,
    /// `POST`
    Create,
    /// `PUT` and `PATCH`
    Update,
    /// `DELETE`
    Delete,
}

impl Action {
    /// Map an HTTP method to the action it requires.
    ///
    /// Any other method has no action and can never be authorized.
    pub fn from_method(method: &Method) -> Option<Self> {
        match method.as_str() {
            "GET" => Some(Self::Read),
            "POST" => Some(Self::Create),
            "PUT" | "PATCH" => Some(Self::Update),
            "DELETE" => Some(Self::Delete),
            _ => None,
        }
    }

    /// The action name as stored in the permissions table.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "read" => Ok(Self::Read),
            "create" => Ok(Self::Create),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            other => Err(format!("unknown action '{other}'")),
        }
    }
}

/// Composite `action-resource` lookup key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PermissionKey(String);

impl PermissionKey {
    /// Build the key for `action` on `resource`.
    pub fn new(action: &str, resource: &str) -> Self {
        Self(format!("{action}-{resource}"))
    }

    /// The key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PermissionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of an authorization decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    /// The required key is in the permission set.
    Allow,
    /// It is not, or no key could be derived.
    Deny,
}

impl Decision {
    /// Returns `true` for [`Decision::Allow`].
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// Permissions indexed by [`PermissionKey`].
///
/// Two permissions sharing action and resource collapse into one entry. The
/// one retrieved last wins.
#[derive(Clone, Debug, Default)]
pub struct PermissionSet {
    entries: HashMap<PermissionKey, Permission>,
}

impl PermissionSet {
    /// Index `permissions` by key, in order.
    pub fn from_permissions(permissions: &[Permission]) -> Self {
        let mut entries = HashMap::with_capacity(permissions.len());
        for permission in permissions {
            if let Some(previous) = entries.insert(permission.key(), permission.clone()) {
                log::debug!(
                    "Permission '{}' replaces '{}' under key {}",
                    permission.id,
                    previous.id,
                    permission.key()
                );
            }
        }
        Self { entries }
    }

    /// Whether the set holds `key`.
    pub fn contains(&self, key: &PermissionKey) -> bool {
        self.entries.contains_key(key)
    }

    /// The permission stored under `key`, if any.
    pub fn get(&self, key: &PermissionKey) -> Option<&Permission> {
        self.entries.get(key)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no permission is granted.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Decide `method` on `path` against this set.
    pub fn decide(&self, method: &Method, path: &str) -> Decision {
        match required_key(method, path) {
            Some(key) if self.contains(&key) => Decision::Allow,
            _ => Decision::Deny,
        }
    }
}

/// The resource named by a `/v<version>/<resource>/...` path.
///
/// `None` when the path has no third `/`-delimited token or it is empty.
pub fn resource_from_path(path: &str) -> Option<&str> {
    path.split('/').nth(2).filter(|segment| !segment.is_empty())
}

/// The key a request needs, or `None` when the method has no action or the
/// path names no resource.
pub fn required_key(method: &Method, path: &str) -> Option<PermissionKey> {
    let action = Action::from_method(method)?;
    let resource = resource_from_path(path)?;
    Some(PermissionKey::new(action.as_str(), resource))
}

/// Decide whether `method` on `path` is permitted by `permissions`.
pub fn decide(method: &Method, path: &str, permissions: &[Permission]) -> Decision {
    PermissionSet::from_permissions(permissions).decide(method, path)
}
