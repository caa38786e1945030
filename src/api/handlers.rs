//! API Handlers
//!
//! HTTP request handlers for each endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::cache::{CacheBackend, CacheManager, TypeRegistry, TypedJsonCodec};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{ApproveGroupUserRequest, DeleteResponse, StatsResponse};
use crate::workflow::{ApproveGroupUser, ApproveGroupUserService, ApproveGroupUserStore};

/// Application state shared across all handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    pub cache_manager: CacheManager,
    pub approve_group_users: ApproveGroupUserService,
}

impl AppState {
    /// Creates a new AppState over an existing manager and store.
    pub fn new(cache_manager: CacheManager, store: ApproveGroupUserStore) -> Self {
        let approve_group_users = ApproveGroupUserService::new(store, &cache_manager);
        Self {
            cache_manager,
            approve_group_users,
        }
    }

    /// Creates a new AppState from configuration and a connected backend.
    ///
    /// Registers every cacheable workflow type under the configured trusted packages.
    pub fn from_config(config: &Config, backend: Arc<dyn CacheBackend>) -> Result<Self> {
        let registry = TypeRegistry::new(config.trusted()).with::<ApproveGroupUser>()?;
        let manager = CacheManager::new(
            backend,
            TypedJsonCodec::new(registry),
            config.cache_config(),
        );
        Ok(Self::new(manager, ApproveGroupUserStore::new()))
    }
}

/// Handler for GET /quick/test/info
///
/// Liveness probe; always answers `true`.
pub async fn info_handler() -> Json<bool> {
    Json(true)
}

/// Handler for GET /cache/stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let manager = &state.cache_manager;
    Json(StatsResponse::new(
        manager.backend_name(),
        manager.cache_names(),
        &manager.stats(),
    ))
}

/// Handler for GET /workflow/approve-group-users/:id
pub async fn get_approve_group_user_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApproveGroupUser>> {
    state
        .approve_group_users
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| CacheError::NotFound(format!("approve group user {}", id)))
}

/// Handler for PUT /workflow/approve-group-users/:id
pub async fn put_approve_group_user_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<ApproveGroupUserRequest>,
) -> Result<Json<ApproveGroupUser>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let operator = req.operator_id;
    let saved = state
        .approve_group_users
        .save(id, req.into_row(), operator)
        .await?;

    Ok(Json(saved))
}

/// Handler for DELETE /workflow/approve-group-users/:id
pub async fn delete_approve_group_user_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<DeleteResponse>> {
    if state.approve_group_users.delete(id).await? {
        Ok(Json(DeleteResponse::new(id)))
    } else {
        Err(CacheError::NotFound(format!("approve group user {}", id)))
    }
}
