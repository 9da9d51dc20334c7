//! Paged permission loading.

use futures::TryStreamExt;

use crate::error::AuthzError;
use crate::model::Permission;
use crate::store::PermissionStore;

/// Load every permission granted to `identity_id`'s role.
///
/// Rows are pulled `page_size` at a time and collected in retrieval order.
/// A failing page aborts the load and drops whatever was already collected.
pub async fn load_permissions(
    store: &dyn PermissionStore,
    identity_id: &str,
    page_size: usize,
) -> Result<Vec<Permission>, AuthzError> {
    let mut pages = store.permission_pages(identity_id, page_size.max(1));
    let mut permissions = Vec::new();
    while let Some(page) = pages.try_next().await.map_err(AuthzError::LoadFailed)? {
        permissions.extend(page);
    }
    Ok(permissions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn store_with(grants: usize) -> MemoryStore {
        let mut store = MemoryStore::new().with_identity(
            "u1",
            "Alice",
            "alice@example.com",
            "r1",
            "registrar",
        );
        for i in 0..grants {
            store = store.with_grant(
                "r1",
                Permission::new(format!("p{i}"), "read", format!("res{i}")),
            );
        }
        store
    }

    #[tokio::test]
    async fn test_load_across_pages_keeps_order() {
        let store = store_with(250);
        let permissions = load_permissions(&store, "u1", 100).await.unwrap();
        assert_eq!(permissions.len(), 250);
        assert_eq!(permissions[0].id, "p0");
        assert_eq!(permissions[249].id, "p249");
    }

    #[tokio::test]
    async fn test_load_empty_grant() {
        let store = store_with(0);
        assert!(load_permissions(&store, "u1", 100).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_zero_page_size_still_loads() {
        let store = store_with(3);
        assert_eq!(load_permissions(&store, "u1", 0).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_mid_stream_failure_discards_partial_results() {
        let store = store_with(250).failing_after_pages(2);
        let err = load_permissions(&store, "u1", 100).await.unwrap_err();
        assert!(matches!(err, AuthzError::LoadFailed(_)));
    }
}
