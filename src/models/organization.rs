use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Organization {
    pub id: RecordId,
    pub name: String, // ! & (len = 255)
    pub slug: String, // ! unique & (len = 100)
    pub created_by: RecordId,

    // ? join policy
    pub join_domains: Vec<String>, // email domains that may join directly
    pub whitelist: Vec<String>,    // explicit allowed emails
    pub link_join_enabled: bool,
    pub access_link_hash: Option<String>, // hash of the shareable join token

    pub created_at: String,
    pub updated_at: Option<String>,
}

#[derive(Serialize, Debug, Clone)]
pub struct CreateOrganization {
    pub name: String,
    pub slug: String,
    pub created_by: RecordId,
    pub join_domains: Vec<String>,
    pub whitelist: Vec<String>,
    pub link_join_enabled: bool,
    pub access_link_hash: Option<String>,
    pub created_at: String,
}
