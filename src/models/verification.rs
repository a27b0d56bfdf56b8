use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use crate::utils::time::{time_now, time_now_plus_hours};

const TOKEN_LIFETIME_HOURS: i64 = 24;

#[derive(Deserialize, Debug, Clone)]
pub struct EmailVerification {
    pub id: RecordId,
    pub user_id: RecordId,
    pub token_hash: String,
    pub created_at: String,
    pub expires_at: String,
}

#[derive(Serialize, Debug, Clone)]
pub struct CreateEmailVerification {
    pub user_id: RecordId,
    pub token_hash: String,
    pub created_at: String,
    pub expires_at: String,
}

impl CreateEmailVerification {
    pub fn init(user_id: RecordId, token_hash: String) -> Self {
        Self {
            user_id,
            token_hash,
            created_at: time_now(),
            expires_at: time_now_plus_hours(TOKEN_LIFETIME_HOURS),
        }
    }
}
