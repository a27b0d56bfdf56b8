use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Roster entry for a person in an organization. `user_id` stays empty until
/// an account with the same email registers.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CompanyUser {
    pub id: RecordId,
    pub organization_id: RecordId,
    pub email: String, // ! unique per organization
    pub name: String,
    pub user_id: Option<RecordId>,
    pub created_at: String,
    pub updated_at: Option<String>,
}

#[derive(Serialize, Debug, Clone)]
pub struct CreateCompanyUser {
    pub organization_id: RecordId,
    pub email: String,
    pub name: String,
    pub user_id: Option<RecordId>,
    pub created_at: String,
}
