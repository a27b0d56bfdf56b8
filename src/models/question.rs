use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Question {
    pub id: RecordId,
    pub created_by: RecordId,
    pub title: String, // ! & (len = 255)
    pub body: String,

    // ? visibility
    pub allowed_emails: Vec<String>,
    pub is_active: bool,
    pub is_public: bool,

    pub created_at: String,
    pub updated_at: Option<String>,
    pub deleted_at: Option<String>,
}

#[derive(Serialize, Debug, Clone)]
pub struct CreateQuestion {
    pub created_by: RecordId,
    pub title: String,
    pub body: String,
    pub allowed_emails: Vec<String>,
    pub is_active: bool,
    pub is_public: bool,
    pub created_at: String,
    pub deleted_at: Option<String>,
}
