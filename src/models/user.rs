use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum AuthProvider {
    Classic, // Email and Password
    Google,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum UserRole {
    Admin,
    Participant,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct User {
    pub id: RecordId,
    pub name: String,
    pub email: String, // ! unique & (len = 255)
    pub role: UserRole,
    pub auth_provider: AuthProvider,
    pub email_verified: bool,
    pub organization_id: Option<RecordId>,
    pub created_at: String,
    pub updated_at: Option<String>,
}

#[derive(Serialize, Debug, Clone)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub auth_provider: AuthProvider,
    pub email_verified: bool,
    pub organization_id: Option<RecordId>,
    pub created_at: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct UserWithPassword {
    pub id: RecordId,
    pub user_id: RecordId,
    pub password_hash: String, // ! & (len = 255)
}

#[derive(Serialize, Debug, Clone)]
pub struct CreateUserPassword {
    pub user_id: RecordId,
    pub password_hash: String,
}
