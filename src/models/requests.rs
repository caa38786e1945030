//! Request DTOs for the HTTP API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

use crate::workflow::ApproveGroupUser;

/// Request body for PUT /workflow/approve-group-users/:id
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproveGroupUserRequest {
    /// Owning approval group
    pub group_id: i64,
    /// Approver employee number
    pub approver_num: String,
    #[serde(default)]
    pub tenant_id: Option<i64>,
    /// User performing the change
    #[serde(default)]
    pub operator_id: Option<i64>,
}

impl ApproveGroupUserRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.approver_num.trim().is_empty() {
            return Some("approverNum cannot be empty".to_string());
        }
        if self.approver_num.len() > 64 {
            return Some("approverNum exceeds maximum length of 64 characters".to_string());
        }
        None
    }

    /// Row to store; bookkeeping fields are filled in by the store.
    pub fn into_row(self) -> ApproveGroupUser {
        ApproveGroupUser {
            group_id: Some(self.group_id),
            approver_num: Some(self.approver_num),
            tenant_id: self.tenant_id,
            ..ApproveGroupUser::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_deserialize() {
        let json = r#"{"groupId": 3, "approverNum": "E0042"}"#;
        let req: ApproveGroupUserRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.group_id, 3);
        assert_eq!(req.approver_num, "E0042");
        assert!(req.tenant_id.is_none());
        assert!(req.operator_id.is_none());
    }

    #[test]
    fn test_validate_empty_approver() {
        let req = ApproveGroupUserRequest {
            group_id: 3,
            approver_num: "  ".to_string(),
            tenant_id: None,
            operator_id: None,
        };
        assert!(req.validate().is_some());
    }

    #[test]
    fn test_into_row_keeps_fields() {
        let req = ApproveGroupUserRequest {
            group_id: 3,
            approver_num: "E1".to_string(),
            tenant_id: Some(8),
            operator_id: Some(1),
        };
        assert!(req.validate().is_none());

        let row = req.into_row();
        assert_eq!(row.group_id, Some(3));
        assert_eq!(row.tenant_id, Some(8));
        assert!(row.id.is_none());
        assert!(row.version_num.is_none());
    }
}
