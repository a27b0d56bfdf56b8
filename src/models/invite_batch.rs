use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use crate::utils::time::time_now;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub enum InviteBatchStatus {
    Running,
    Complete,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct InviteFailure {
    pub email: String,
    pub reason: String,
}

/// Bookkeeping for one bulk invite run. The send task bumps the counters;
/// clients poll the batch endpoint until `status` is `Complete`.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct InviteBatch {
    pub id: RecordId,
    pub question_id: RecordId,
    pub created_by: RecordId,
    pub total: i64,
    pub sent: i64,
    pub failed: i64,
    pub status: InviteBatchStatus,
    pub failures: Vec<InviteFailure>,
    pub created_at: String,
    pub updated_at: Option<String>,
}

#[derive(Serialize, Debug, Clone)]
pub struct CreateInviteBatch {
    pub question_id: RecordId,
    pub created_by: RecordId,
    pub total: i64,
    pub sent: i64,
    pub failed: i64,
    pub status: InviteBatchStatus,
    pub failures: Vec<InviteFailure>,
    pub created_at: String,
}

impl CreateInviteBatch {
    pub fn init(question_id: RecordId, created_by: RecordId, total: i64) -> Self {
        Self {
            question_id,
            created_by,
            total,
            sent: 0,
            failed: 0,
            status: InviteBatchStatus::Running,
            failures: Vec::new(),
            created_at: time_now(),
        }
    }
}
