//! Workflow Module
//!
//! Approval group members: value object, primary store and cached service.

mod service;
mod store;
mod vo;

pub use service::{ApproveGroupUserService, APPROVE_GROUP_USER_CACHE};
pub use store::ApproveGroupUserStore;
pub use vo::ApproveGroupUser;
