//! Approval group member value object.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::cache::CacheValue;

// == Approve Group User ==
/// A member of an approval group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproveGroupUser {
    pub id: Option<i64>,
    /// Owning approval group
    pub group_id: Option<i64>,
    /// Approver employee number
    pub approver_num: Option<String>,
    pub tenant_id: Option<i64>,
    pub create_by: Option<i64>,
    pub create_time: Option<NaiveDateTime>,
    pub update_by: Option<i64>,
    pub update_time: Option<NaiveDateTime>,
    /// Optimistic lock version, starts at 1
    pub version_num: Option<i32>,
}

impl CacheValue for ApproveGroupUser {
    const TYPE_TAG: &'static str = "erp_cache::workflow::ApproveGroupUser";
}
