use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use surrealdb::RecordId;

use crate::{
    consts::app_const::{COMPANY_USER_TABLE, QUESTION_ACCESS_TABLE, QUESTION_TABLE},
    errors::{Error, Result},
    middleware::UserId,
    models::{
        company_user::CompanyUser,
        question::Question,
        question_access::{CreateQuestionAccess, InviteStatus, QuestionAccess},
    },
    routes::{MessageResponse, admin_route::company_users::owned_organization},
    state::AppState,
    utils::{get_record_id::get_record_id_from_string, time::time_now},
};

pub async fn owned_question(
    state: &AppState,
    question_id: RecordId,
    user_id: &RecordId,
) -> Result<Question> {
    let question: Question = state
        .sdb
        .select(question_id)
        .await?
        .ok_or(Error::NotFound)?;
    if question.deleted_at.is_some() {
        return Err(Error::NotFound);
    }
    if &question.created_by != user_id {
        return Err(Error::AccessDenied("question owner only".to_string()));
    }
    Ok(question)
}

#[derive(serde::Deserialize, Debug, Clone)]
pub struct CreateQuestionAccessRequest {
    pub question_id: String,
    pub company_user_id: String,
}

pub async fn create_question_access(
    State(state): State<AppState>,
    Extension(UserId(user_id)): Extension<UserId>,
    Json(input): Json<CreateQuestionAccessRequest>,
) -> Result<(StatusCode, Json<QuestionAccess>)> {
    let user_id = get_record_id_from_string(&user_id)?;
    let question_id = RecordId::from_table_key(QUESTION_TABLE, input.question_id.as_str());
    let company_user_id =
        RecordId::from_table_key(COMPANY_USER_TABLE, input.company_user_id.as_str());

    let question = owned_question(&state, question_id, &user_id).await?;

    let company_user: CompanyUser = state
        .sdb
        .select(company_user_id.clone())
        .await?
        .ok_or(Error::NotFound)?;
    // the roster row must belong to an organization the caller owns
    owned_organization(&state, company_user.organization_id.clone(), &user_id).await?;

    let duplicate: Vec<QuestionAccess> = state
        .sdb
        .query("SELECT * FROM type::table($table) WHERE question_id = $question_id AND company_user_id = $company_user_id;")
        .bind(("table", QUESTION_ACCESS_TABLE))
        .bind(("question_id", question.id.clone()))
        .bind(("company_user_id", company_user_id.clone()))
        .await?
        .take(0)?;
    if !duplicate.is_empty() {
        return Err(Error::DuplicateGrant);
    }

    // a roster row already linked to an account has nobody left to invite
    let invite_status = if company_user.user_id.is_some() {
        InviteStatus::Accepted
    } else {
        InviteStatus::Pending
    };

    let grant_data = CreateQuestionAccess {
        question_id: question.id,
        company_user_id,
        granted_by: user_id,
        invite_status,
        created_at: time_now(),
    };
    let grant: QuestionAccess = state
        .sdb
        .create(QUESTION_ACCESS_TABLE)
        .content(grant_data)
        .await?
        .ok_or(Error::InternalServerError)?;

    Ok((StatusCode::CREATED, Json(grant)))
}

#[derive(serde::Deserialize, Debug, Clone)]
pub struct ReadQuestionAccessQuery {
    pub question_id: String,
}

pub async fn read_question_access(
    State(state): State<AppState>,
    Extension(UserId(user_id)): Extension<UserId>,
    Query(query): Query<ReadQuestionAccessQuery>,
) -> Result<(StatusCode, Json<Vec<QuestionAccess>>)> {
    let user_id = get_record_id_from_string(&user_id)?;
    let question_id = RecordId::from_table_key(QUESTION_TABLE, query.question_id.as_str());
    let question = owned_question(&state, question_id, &user_id).await?;

    let grants: Vec<QuestionAccess> = state
        .sdb
        .query("SELECT * FROM type::table($table) WHERE question_id = $question_id;")
        .bind(("table", QUESTION_ACCESS_TABLE))
        .bind(("question_id", question.id))
        .await?
        .take(0)?;

    Ok((StatusCode::OK, Json(grants)))
}

pub async fn delete_question_access(
    State(state): State<AppState>,
    Extension(UserId(user_id)): Extension<UserId>,
    Path(access_id): Path<String>,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    let user_id = get_record_id_from_string(&user_id)?;
    let access_id = RecordId::from_table_key(QUESTION_ACCESS_TABLE, access_id);

    let grant: QuestionAccess = state
        .sdb
        .select(access_id.clone())
        .await?
        .ok_or(Error::NotFound)?;
    owned_question(&state, grant.question_id.clone(), &user_id).await?;

    let _: Option<QuestionAccess> = state.sdb.delete(access_id).await?;

    Ok((
        StatusCode::OK,
        Json(MessageResponse::new("Access grant revoked")),
    ))
}
