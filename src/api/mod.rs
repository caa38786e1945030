//! API Module
//!
//! HTTP handlers and routing.
//!
//! # Endpoints
//! - `GET /quick/test/info` - Liveness probe answering `true`
//! - `GET /cache/stats` - Cache statistics
//! - `GET /workflow/approve-group-users/:id` - Cached member lookup
//! - `PUT /workflow/approve-group-users/:id` - Upsert member, evict cached copy
//! - `DELETE /workflow/approve-group-users/:id` - Delete member, evict cached copy

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
