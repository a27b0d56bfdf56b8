use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Solution {
    pub id: RecordId,
    pub question_id: RecordId,
    pub created_by: RecordId,
    pub title: String, // ! & (len = 255)
    pub body: String,
    pub created_at: String,
}

#[derive(Serialize, Debug, Clone)]
pub struct CreateSolution {
    pub question_id: RecordId,
    pub created_by: RecordId,
    pub title: String,
    pub body: String,
    pub created_at: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Pro {
    pub id: RecordId,
    pub solution_id: RecordId,
    pub created_by: RecordId,
    pub body: String,
    pub created_at: String,
}

#[derive(Serialize, Debug, Clone)]
pub struct CreatePro {
    pub solution_id: RecordId,
    pub created_by: RecordId,
    pub body: String,
    pub created_at: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Con {
    pub id: RecordId,
    pub solution_id: RecordId,
    pub created_by: RecordId,
    pub body: String,
    pub created_at: String,
}

#[derive(Serialize, Debug, Clone)]
pub struct CreateCon {
    pub solution_id: RecordId,
    pub created_by: RecordId,
    pub body: String,
    pub created_at: String,
}
