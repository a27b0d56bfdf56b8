use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Invite lifecycle of an access grant: the email batch job moves
/// `Pending` to `Sent`, signup linkage moves anything to `Accepted`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub enum InviteStatus {
    Pending,
    Sent,
    Accepted,
}

impl InviteStatus {
    pub fn after_send(self) -> Self {
        match self {
            InviteStatus::Pending => InviteStatus::Sent,
            other => other,
        }
    }

    pub fn after_signup(self) -> Self {
        InviteStatus::Accepted
    }
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct QuestionAccess {
    pub id: RecordId,
    pub question_id: RecordId,
    pub company_user_id: RecordId,
    pub granted_by: RecordId,
    pub invite_status: InviteStatus,
    pub created_at: String,
    pub updated_at: Option<String>,
}

#[derive(Serialize, Debug, Clone)]
pub struct CreateQuestionAccess {
    pub question_id: RecordId,
    pub company_user_id: RecordId,
    pub granted_by: RecordId,
    pub invite_status: InviteStatus,
    pub created_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_advances_pending_only() {
        assert_eq!(InviteStatus::Pending.after_send(), InviteStatus::Sent);
        assert_eq!(InviteStatus::Sent.after_send(), InviteStatus::Sent);
        assert_eq!(InviteStatus::Accepted.after_send(), InviteStatus::Accepted);
    }

    #[test]
    fn test_signup_accepts_from_any_state() {
        assert_eq!(InviteStatus::Pending.after_signup(), InviteStatus::Accepted);
        assert_eq!(InviteStatus::Sent.after_signup(), InviteStatus::Accepted);
        assert_eq!(
            InviteStatus::Accepted.after_signup(),
            InviteStatus::Accepted
        );
    }
}
