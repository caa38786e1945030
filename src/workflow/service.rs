//! Cached access to approval group members.

use std::sync::Arc;

use tracing::info;

use super::store::ApproveGroupUserStore;
use super::vo::ApproveGroupUser;
use crate::cache::{
    cached, evicting, param, type_name_of, Cache, CacheManager, KeyGenerator, SimpleKeyGenerator,
};
use crate::error::Result;

/// Cache holding approval group members.
pub const APPROVE_GROUP_USER_CACHE: &str = "approveGroupUser";

const FIND_BY_ID: &str = "find_by_id";

// == Approve Group User Service ==
#[derive(Clone)]
pub struct ApproveGroupUserService {
    store: ApproveGroupUserStore,
    cache: Cache,
    keys: Arc<dyn KeyGenerator>,
}

impl ApproveGroupUserService {
    pub fn new(store: ApproveGroupUserStore, manager: &CacheManager) -> Self {
        Self::with_key_generator(store, manager, Arc::new(SimpleKeyGenerator))
    }

    pub fn with_key_generator(
        store: ApproveGroupUserStore,
        manager: &CacheManager,
        keys: Arc<dyn KeyGenerator>,
    ) -> Self {
        Self {
            store,
            cache: manager.cache(APPROVE_GROUP_USER_CACHE),
            keys,
        }
    }

    fn target() -> &'static str {
        type_name_of::<Self>()
    }

    /// Looks a member up, reading through the cache.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<ApproveGroupUser>> {
        cached(
            &self.cache,
            self.keys.as_ref(),
            Self::target(),
            FIND_BY_ID,
            &[param(&id)],
            || async { Ok(self.store.select_by_id(id).await) },
        )
        .await
    }

    /// Writes a member and drops its cached copy.
    pub async fn save(
        &self,
        id: i64,
        row: ApproveGroupUser,
        operator: Option<i64>,
    ) -> Result<ApproveGroupUser> {
        evicting(
            &self.cache,
            self.keys.as_ref(),
            Self::target(),
            FIND_BY_ID,
            &[param(&id)],
            || async {
                let saved = self.store.upsert(id, row, operator).await;
                info!(id, version = ?saved.version_num, "approve group user saved");
                Ok(saved)
            },
        )
        .await
    }

    /// Deletes a member and drops its cached copy. Returns false if absent.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        evicting(
            &self.cache,
            self.keys.as_ref(),
            Self::target(),
            FIND_BY_ID,
            &[param(&id)],
            || async { Ok(self.store.delete_by_id(id).await) },
        )
        .await
    }
}

impl std::fmt::Debug for ApproveGroupUserService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApproveGroupUserService")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}
