use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Serialize;
use surrealdb::RecordId;
use tracing::{error, info, warn};

use crate::{
    consts::app_const::{INVITE_BATCH_TABLE, QUESTION_ACCESS_TABLE, QUESTION_TABLE},
    errors::{Error, Result},
    middleware::UserId,
    models::{
        company_user::CompanyUser,
        invite_batch::{CreateInviteBatch, InviteBatch, InviteBatchStatus, InviteFailure},
        question::Question,
        question_access::{InviteStatus, QuestionAccess},
    },
    routes::admin_route::question_access::owned_question,
    state::AppState,
    utils::{get_record_id::get_record_id_from_string, time::time_now},
};

#[derive(Debug, Clone, serde::Serialize)]
pub struct InviteBatchStartedResponse {
    pub batch_id: String,
    pub total: i64,
}

pub async fn start_invite_batch(
    State(state): State<AppState>,
    Extension(UserId(user_id)): Extension<UserId>,
    Path(question_id): Path<String>,
) -> Result<(StatusCode, Json<InviteBatchStartedResponse>)> {
    let user_id = get_record_id_from_string(&user_id)?;
    let question_id = RecordId::from_table_key(QUESTION_TABLE, question_id);
    let question = owned_question(&state, question_id, &user_id).await?;

    let running: Vec<InviteBatch> = state
        .sdb
        .query("SELECT * FROM type::table($table) WHERE question_id = $question_id AND status = $status;")
        .bind(("table", INVITE_BATCH_TABLE))
        .bind(("question_id", question.id.clone()))
        .bind(("status", InviteBatchStatus::Running))
        .await?
        .take(0)?;
    if !running.is_empty() {
        return Err(Error::BatchAlreadyRunning);
    }

    let pending: Vec<QuestionAccess> = state
        .sdb
        .query("SELECT * FROM type::table($table) WHERE question_id = $question_id AND invite_status = $status;")
        .bind(("table", QUESTION_ACCESS_TABLE))
        .bind(("question_id", question.id.clone()))
        .bind(("status", InviteStatus::Pending))
        .await?
        .take(0)?;

    let mut jobs = Vec::with_capacity(pending.len());
    for grant in pending {
        let company_user: Option<CompanyUser> =
            state.sdb.select(grant.company_user_id.clone()).await?;
        match company_user {
            Some(company_user) => jobs.push((grant, company_user.email)),
            None => warn!("grant {} has no roster row, skipping", grant.id),
        }
    }

    if jobs.is_empty() {
        return Err(Error::Custom("no pending invites to send".to_string()));
    }

    let batch: InviteBatch = state
        .sdb
        .create(INVITE_BATCH_TABLE)
        .content(CreateInviteBatch::init(
            question.id.clone(),
            user_id,
            jobs.len() as i64,
        ))
        .await?
        .ok_or(Error::InternalServerError)?;

    let response = InviteBatchStartedResponse {
        batch_id: batch.id.key().to_string(),
        total: batch.total,
    };

    // fire and forget; clients poll the batch endpoint for progress
    tokio::spawn(run_invite_batch(state, batch.id, question, jobs));

    Ok((StatusCode::ACCEPTED, Json(response)))
}

#[derive(Serialize)]
struct GrantStatusPatch {
    invite_status: InviteStatus,
    updated_at: String,
}

#[derive(Serialize)]
struct BatchStatusPatch {
    status: InviteBatchStatus,
    updated_at: String,
}

async fn run_invite_batch(
    state: AppState,
    batch_id: RecordId,
    question: Question,
    jobs: Vec<(QuestionAccess, String)>,
) {
    let subject = format!("You are invited to contribute: {}", question.title);
    let body = format!(
        "<p>You have been invited to contribute solutions to <b>{}</b>.</p>\
         <p><a href=\"{}\">Sign up with this email address</a> to get access.</p>",
        question.title, state.config.base_url
    );

    for (grant, email) in jobs {
        match state.mailer.send(&email, &subject, &body).await {
            Ok(()) => {
                if let Err(e) = record_sent(&state, &batch_id, &grant).await {
                    error!("invite batch bookkeeping failed: {e}");
                }
            }
            Err(e) => {
                warn!("invite email to {email} failed: {e}");
                if let Err(e) = record_failure(&state, &batch_id, email, e.to_string()).await {
                    error!("invite batch bookkeeping failed: {e}");
                }
            }
        }
    }

    let done: Result<Option<InviteBatch>> = state
        .sdb
        .update(batch_id.clone())
        .merge(BatchStatusPatch {
            status: InviteBatchStatus::Complete,
            updated_at: time_now(),
        })
        .await
        .map_err(Into::into);
    match done {
        Ok(_) => info!("invite batch {} complete", batch_id),
        Err(e) => error!("failed to close invite batch {}: {e}", batch_id),
    }
}

async fn record_sent(state: &AppState, batch_id: &RecordId, grant: &QuestionAccess) -> Result<()> {
    let _: Option<QuestionAccess> = state
        .sdb
        .update(grant.id.clone())
        .merge(GrantStatusPatch {
            invite_status: grant.invite_status.clone().after_send(),
            updated_at: time_now(),
        })
        .await?;

    state
        .sdb
        .query("UPDATE $batch SET sent += 1;")
        .bind(("batch", batch_id.clone()))
        .await?;

    Ok(())
}

async fn record_failure(
    state: &AppState,
    batch_id: &RecordId,
    email: String,
    reason: String,
) -> Result<()> {
    state
        .sdb
        .query("UPDATE $batch SET failed += 1, failures += $failure;")
        .bind(("batch", batch_id.clone()))
        .bind(("failure", InviteFailure { email, reason }))
        .await?;

    Ok(())
}

pub async fn read_invite_batch(
    State(state): State<AppState>,
    Extension(UserId(user_id)): Extension<UserId>,
    Path(batch_id): Path<String>,
) -> Result<(StatusCode, Json<InviteBatch>)> {
    let user_id = get_record_id_from_string(&user_id)?;
    let batch_id = RecordId::from_table_key(INVITE_BATCH_TABLE, batch_id);

    let batch: InviteBatch = state
        .sdb
        .select(batch_id)
        .await?
        .ok_or(Error::NotFound)?;
    if batch.created_by != user_id {
        return Err(Error::AccessDenied("batch owner only".to_string()));
    }

    Ok((StatusCode::OK, Json(batch)))
}
