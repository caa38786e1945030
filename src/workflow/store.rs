//! In-memory approval group member table.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Local;
use tokio::sync::RwLock;

use super::vo::ApproveGroupUser;

// == Approve Group User Store ==
/// Primary data source for approval group members. Clones share rows.
#[derive(Debug, Clone, Default)]
pub struct ApproveGroupUserStore {
    rows: Arc<RwLock<HashMap<i64, ApproveGroupUser>>>,
}

impl ApproveGroupUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn select_by_id(&self, id: i64) -> Option<ApproveGroupUser> {
        self.rows.read().await.get(&id).cloned()
    }

    /// Inserts or replaces the row at `id`.
    ///
    /// New rows get a create time and version 1; replaced rows keep their
    /// creation fields and bump the version.
    pub async fn upsert(&self, id: i64, mut row: ApproveGroupUser, operator: Option<i64>) -> ApproveGroupUser {
        let now = Local::now().naive_local();
        let mut rows = self.rows.write().await;

        row.id = Some(id);
        match rows.get(&id) {
            Some(existing) => {
                row.create_by = existing.create_by;
                row.create_time = existing.create_time;
                row.update_by = operator;
                row.update_time = Some(now);
                row.version_num = Some(existing.version_num.unwrap_or(0).saturating_add(1));
            }
            None => {
                row.create_by = operator;
                row.create_time = Some(now);
                row.update_by = operator;
                row.update_time = Some(now);
                row.version_num = Some(1);
            }
        }

        rows.insert(id, row.clone());
        row
    }

    /// Returns true when a row was removed.
    pub async fn delete_by_id(&self, id: i64) -> bool {
        self.rows.write().await.remove(&id).is_some()
    }

    pub async fn count(&self) -> usize {
        self.rows.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(num: &str) -> ApproveGroupUser {
        ApproveGroupUser {
            group_id: Some(3),
            approver_num: Some(num.to_string()),
            ..ApproveGroupUser::default()
        }
    }

    #[tokio::test]
    async fn test_insert_sets_creation_fields() {
        let store = ApproveGroupUserStore::new();
        let row = store.upsert(1, member("E1"), Some(99)).await;

        assert_eq!(row.id, Some(1));
        assert_eq!(row.create_by, Some(99));
        assert!(row.create_time.is_some());
        assert_eq!(row.version_num, Some(1));
        assert_eq!(store.select_by_id(1).await, Some(row));
    }

    #[tokio::test]
    async fn test_update_bumps_version_and_keeps_creation() {
        let store = ApproveGroupUserStore::new();
        let first = store.upsert(1, member("E1"), Some(99)).await;
        let second = store.upsert(1, member("E2"), Some(100)).await;

        assert_eq!(second.version_num, Some(2));
        assert_eq!(second.create_by, Some(99));
        assert_eq!(second.create_time, first.create_time);
        assert_eq!(second.update_by, Some(100));
        assert_eq!(second.approver_num.as_deref(), Some("E2"));
        assert_eq!(store.count().await, 1);
    }

    #[tokio::test]
    async fn test_version_saturates_at_max() {
        let store = ApproveGroupUserStore::new();
        store.upsert(1, member("E1"), None).await;
        if let Some(row) = store.rows.write().await.get_mut(&1) {
            row.version_num = Some(i32::MAX);
        }

        let row = store.upsert(1, member("E2"), None).await;
        assert_eq!(row.version_num, Some(i32::MAX));
    }

    #[tokio::test]
    async fn test_delete_by_id() {
        let store = ApproveGroupUserStore::new();
        store.upsert(1, member("E1"), None).await;

        assert!(store.delete_by_id(1).await);
        assert!(!store.delete_by_id(1).await);
        assert!(store.select_by_id(1).await.is_none());
    }
}
