//! Identity resolution.

use crate::error::AuthzError;
use crate::model::Identity;
use crate::store::PermissionStore;

/// Resolve `caller_id` to an [`Identity`] with its role, permissions not yet loaded.
///
/// Issues exactly one lookup. A missing row is [`AuthzError::UnknownIdentity`];
/// a failing store is [`AuthzError::LookupFailed`].
pub async fn resolve_identity(
    store: &dyn PermissionStore,
    caller_id: &str,
) -> Result<Identity, AuthzError> {
    match store.find_identity(caller_id).await {
        Ok(Some(row)) => Ok(row.into()),
        Ok(None) => Err(AuthzError::UnknownIdentity),
        Err(e) => Err(AuthzError::LookupFailed(e)),
    }
}
