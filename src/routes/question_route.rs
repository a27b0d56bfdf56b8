use std::collections::HashSet;

use axum::{
    Extension, Json, Router, middleware,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use serde::Serialize;
use surrealdb::{RecordId, Surreal, engine::remote::ws::Client};
use validator::Validate;

use crate::{
    consts::app_const::{
        CON_TABLE, PRO_TABLE, QUESTION_ACCESS_TABLE, QUESTION_TABLE, SOLUTION_TABLE, VOTE_TABLE,
    },
    errors::{Error, Result},
    middleware::{UserId, auth_jwt_middleware},
    models::{
        question::{CreateQuestion, Question},
        question_access::QuestionAccess,
        solution::{Con, CreateCon, CreatePro, CreateSolution, Pro, Solution},
        user::{User, UserRole},
        vote::{CreateVote, Vote, VoteTarget, validate_vote_value},
    },
    routes::MessageResponse,
    state::AppState,
    utils::{
        access::{QuestionContext, create_question_context},
        get_record_id::get_record_id_from_string,
        time::time_now,
        validated_form::ValidatedJson,
    },
};

pub fn question_router(config: AppState) -> Router<AppState> {
    Router::new()
        .route("/questions", post(create_question).get(read_questions))
        .route(
            "/questions/{question_id}",
            get(read_question)
                .patch(update_question)
                .delete(delete_question),
        )
        .route(
            "/questions/{question_id}/solutions",
            post(create_solution).get(read_solutions),
        )
        .route("/solutions/{solution_id}/pros", post(create_pro))
        .route("/solutions/{solution_id}/cons", post(create_con))
        .route("/votes", post(cast_vote).delete(retract_vote))
        .layer(middleware::from_fn_with_state(
            config.clone(),
            auth_jwt_middleware,
        ))
        .with_state(config)
}

fn check_view(context: &QuestionContext) -> Result<()> {
    if !context.can_view() {
        return Err(Error::AccessDenied(
            "you cannot view this question".to_string(),
        ));
    }
    Ok(())
}

fn check_contribute(context: &QuestionContext) -> Result<()> {
    check_view(context)?;
    if !context.can_contribute() {
        return Err(Error::QuestionInactive);
    }
    Ok(())
}

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, Validate)]
pub struct CreateQuestionRequest {
    #[validate(length(min = 2, max = 255))]
    pub title: String,
    pub body: String,
    pub allowed_emails: Option<Vec<String>>,
    pub is_public: Option<bool>,
    pub is_active: Option<bool>,
}

pub async fn create_question(
    State(state): State<AppState>,
    Extension(UserId(user_id)): Extension<UserId>,
    ValidatedJson(input): ValidatedJson<CreateQuestionRequest>,
) -> Result<(StatusCode, Json<Question>)> {
    let user_id = get_record_id_from_string(&user_id)?;
    let user: User = state
        .sdb
        .select(user_id.clone())
        .await?
        .ok_or(Error::InvalidToken)?;

    // * Only administrators author questions.
    if user.role != UserRole::Admin {
        return Err(Error::AccessDenied("admin role required".to_string()));
    }

    let question_data = CreateQuestion {
        created_by: user_id,
        title: input.title,
        body: input.body,
        allowed_emails: input
            .allowed_emails
            .unwrap_or_default()
            .into_iter()
            .map(|e| e.to_lowercase())
            .collect(),
        is_active: input.is_active.unwrap_or(true),
        is_public: input.is_public.unwrap_or(false),
        created_at: time_now(),
        deleted_at: None,
    };
    let question: Question = state
        .sdb
        .create(QUESTION_TABLE)
        .content(question_data)
        .await?
        .ok_or(Error::InternalServerError)?;

    Ok((StatusCode::CREATED, Json(question)))
}

pub async fn read_questions(
    State(state): State<AppState>,
    Extension(UserId(user_id)): Extension<UserId>,
) -> Result<(StatusCode, Json<Vec<Question>>)> {
    let user_id = get_record_id_from_string(&user_id)?;
    let user: User = state
        .sdb
        .select(user_id.clone())
        .await?
        .ok_or(Error::InvalidToken)?;

    let mut seen = HashSet::new();
    let mut out = Vec::new();
    let mut push_all = |questions: Vec<Question>, out: &mut Vec<Question>| {
        for question in questions {
            if question.deleted_at.is_none() && seen.insert(question.id.to_string()) {
                out.push(question);
            }
        }
    };

    let owned: Vec<Question> = state
        .sdb
        .query("SELECT * FROM type::table($table) WHERE created_by = $user_id AND deleted_at == None;")
        .bind(("table", QUESTION_TABLE))
        .bind(("user_id", user_id.clone()))
        .await?
        .take(0)?;
    push_all(owned, &mut out);

    let public: Vec<Question> = state
        .sdb
        .query("SELECT * FROM type::table($table) WHERE is_public = true AND is_active = true AND deleted_at == None;")
        .bind(("table", QUESTION_TABLE))
        .await?
        .take(0)?;
    push_all(public, &mut out);

    let allowed: Vec<Question> = state
        .sdb
        .query("SELECT * FROM type::table($table) WHERE allowed_emails CONTAINS $email AND deleted_at == None;")
        .bind(("table", QUESTION_TABLE))
        .bind(("email", user.email.to_lowercase()))
        .await?
        .take(0)?;
    push_all(allowed, &mut out);

    let grants: Vec<QuestionAccess> = state
        .sdb
        .query("SELECT * FROM type::table($table) WHERE company_user_id.email = $email OR company_user_id.user_id = $user_id;")
        .bind(("table", QUESTION_ACCESS_TABLE))
        .bind(("email", user.email.clone()))
        .bind(("user_id", user_id))
        .await?
        .take(0)?;
    for grant in grants {
        if let Some(question) = state
            .sdb
            .select::<Option<Question>>(grant.question_id)
            .await?
        {
            push_all(vec![question], &mut out);
        }
    }

    Ok((StatusCode::OK, Json(out)))
}

pub async fn read_question(
    State(state): State<AppState>,
    Extension(UserId(user_id)): Extension<UserId>,
    Path(question_id): Path<String>,
) -> Result<(StatusCode, Json<Question>)> {
    let user_id = get_record_id_from_string(&user_id)?;
    let question_id = RecordId::from_table_key(QUESTION_TABLE, question_id);

    let context = create_question_context(&state.sdb, user_id, question_id).await?;
    check_view(&context)?;

    Ok((StatusCode::OK, Json(context.question)))
}

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone)]
pub struct UpdateQuestionRequest {
    pub title: Option<String>, // ! & (len = 255)
    pub body: Option<String>,
    pub allowed_emails: Option<Vec<String>>,
    pub is_public: Option<bool>,
    pub is_active: Option<bool>,
}

#[derive(Serialize)]
struct QuestionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    allowed_emails: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    is_public: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    is_active: Option<bool>,
    updated_at: String,
}

pub async fn update_question(
    State(state): State<AppState>,
    Extension(UserId(user_id)): Extension<UserId>,
    Path(question_id): Path<String>,
    Json(input): Json<UpdateQuestionRequest>,
) -> Result<(StatusCode, Json<Question>)> {
    let user_id = get_record_id_from_string(&user_id)?;
    let question_id = RecordId::from_table_key(QUESTION_TABLE, question_id);

    let context = create_question_context(&state.sdb, user_id, question_id.clone()).await?;
    if !context.is_owner() {
        return Err(Error::AccessDenied("question owner only".to_string()));
    }

    let updated: Question = state
        .sdb
        .update(question_id)
        .merge(QuestionPatch {
            title: input.title,
            body: input.body,
            allowed_emails: input
                .allowed_emails
                .map(|emails| emails.into_iter().map(|e| e.to_lowercase()).collect()),
            is_public: input.is_public,
            is_active: input.is_active,
            updated_at: time_now(),
        })
        .await?
        .ok_or(Error::InternalServerError)?;

    Ok((StatusCode::OK, Json(updated)))
}

#[derive(Serialize)]
struct SoftDeletePatch {
    deleted_at: String,
}

pub async fn delete_question(
    State(state): State<AppState>,
    Extension(UserId(user_id)): Extension<UserId>,
    Path(question_id): Path<String>,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    let user_id = get_record_id_from_string(&user_id)?;
    let question_id = RecordId::from_table_key(QUESTION_TABLE, question_id);

    let context = create_question_context(&state.sdb, user_id, question_id.clone()).await?;
    if !context.is_owner() {
        return Err(Error::AccessDenied("question owner only".to_string()));
    }

    let _: Option<Question> = state
        .sdb
        .update(question_id)
        .merge(SoftDeletePatch {
            deleted_at: time_now(),
        })
        .await?;

    Ok((
        StatusCode::OK,
        Json(MessageResponse::new("Question deleted")),
    ))
}

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, Validate)]
pub struct CreateSolutionRequest {
    #[validate(length(min = 2, max = 255))]
    pub title: String,
    pub body: String,
}

pub async fn create_solution(
    State(state): State<AppState>,
    Extension(UserId(user_id)): Extension<UserId>,
    Path(question_id): Path<String>,
    ValidatedJson(input): ValidatedJson<CreateSolutionRequest>,
) -> Result<(StatusCode, Json<Solution>)> {
    let user_id = get_record_id_from_string(&user_id)?;
    let question_id = RecordId::from_table_key(QUESTION_TABLE, question_id);

    let context = create_question_context(&state.sdb, user_id.clone(), question_id.clone()).await?;
    check_contribute(&context)?;

    let solution_data = CreateSolution {
        question_id,
        created_by: user_id,
        title: input.title,
        body: input.body,
        created_at: time_now(),
    };
    let solution: Solution = state
        .sdb
        .create(SOLUTION_TABLE)
        .content(solution_data)
        .await?
        .ok_or(Error::InternalServerError)?;

    Ok((StatusCode::CREATED, Json(solution)))
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct ProView {
    pub pro: Pro,
    pub score: i64,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct ConView {
    pub con: Con,
    pub score: i64,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct SolutionView {
    pub solution: Solution,
    pub score: i64,
    pub pros: Vec<ProView>,
    pub cons: Vec<ConView>,
}

pub async fn read_solutions(
    State(state): State<AppState>,
    Extension(UserId(user_id)): Extension<UserId>,
    Path(question_id): Path<String>,
) -> Result<(StatusCode, Json<Vec<SolutionView>>)> {
    let user_id = get_record_id_from_string(&user_id)?;
    let question_id = RecordId::from_table_key(QUESTION_TABLE, question_id);

    let context = create_question_context(&state.sdb, user_id, question_id.clone()).await?;
    check_view(&context)?;

    let solutions: Vec<Solution> = state
        .sdb
        .query("SELECT * FROM type::table($table) WHERE question_id = $question_id;")
        .bind(("table", SOLUTION_TABLE))
        .bind(("question_id", question_id))
        .await?
        .take(0)?;

    let mut views = Vec::with_capacity(solutions.len());
    for solution in solutions {
        let pros: Vec<Pro> = state
            .sdb
            .query("SELECT * FROM type::table($table) WHERE solution_id = $solution_id;")
            .bind(("table", PRO_TABLE))
            .bind(("solution_id", solution.id.clone()))
            .await?
            .take(0)?;
        let cons: Vec<Con> = state
            .sdb
            .query("SELECT * FROM type::table($table) WHERE solution_id = $solution_id;")
            .bind(("table", CON_TABLE))
            .bind(("solution_id", solution.id.clone()))
            .await?
            .take(0)?;

        let mut pro_views = Vec::with_capacity(pros.len());
        for pro in pros {
            let score = vote_score(&state.sdb, &VoteTarget::Pro(pro.id.clone())).await?;
            pro_views.push(ProView { pro, score });
        }
        let mut con_views = Vec::with_capacity(cons.len());
        for con in cons {
            let score = vote_score(&state.sdb, &VoteTarget::Con(con.id.clone())).await?;
            con_views.push(ConView { con, score });
        }

        let score = vote_score(&state.sdb, &VoteTarget::Solution(solution.id.clone())).await?;
        views.push(SolutionView {
            solution,
            score,
            pros: pro_views,
            cons: con_views,
        });
    }

    Ok((StatusCode::OK, Json(views)))
}

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, Validate)]
pub struct CreateArgumentRequest {
    #[validate(length(min = 2, max = 2000))]
    pub body: String,
}

pub async fn create_pro(
    State(state): State<AppState>,
    Extension(UserId(user_id)): Extension<UserId>,
    Path(solution_id): Path<String>,
    ValidatedJson(input): ValidatedJson<CreateArgumentRequest>,
) -> Result<(StatusCode, Json<Pro>)> {
    let user_id = get_record_id_from_string(&user_id)?;
    let solution_id = RecordId::from_table_key(SOLUTION_TABLE, solution_id);

    let solution: Solution = state
        .sdb
        .select(solution_id.clone())
        .await?
        .ok_or(Error::NotFound)?;
    let context =
        create_question_context(&state.sdb, user_id.clone(), solution.question_id).await?;
    check_contribute(&context)?;

    let pro_data = CreatePro {
        solution_id,
        created_by: user_id,
        body: input.body,
        created_at: time_now(),
    };
    let pro: Pro = state
        .sdb
        .create(PRO_TABLE)
        .content(pro_data)
        .await?
        .ok_or(Error::InternalServerError)?;

    Ok((StatusCode::CREATED, Json(pro)))
}

pub async fn create_con(
    State(state): State<AppState>,
    Extension(UserId(user_id)): Extension<UserId>,
    Path(solution_id): Path<String>,
    ValidatedJson(input): ValidatedJson<CreateArgumentRequest>,
) -> Result<(StatusCode, Json<Con>)> {
    let user_id = get_record_id_from_string(&user_id)?;
    let solution_id = RecordId::from_table_key(SOLUTION_TABLE, solution_id);

    let solution: Solution = state
        .sdb
        .select(solution_id.clone())
        .await?
        .ok_or(Error::NotFound)?;
    let context =
        create_question_context(&state.sdb, user_id.clone(), solution.question_id).await?;
    check_contribute(&context)?;

    let con_data = CreateCon {
        solution_id,
        created_by: user_id,
        body: input.body,
        created_at: time_now(),
    };
    let con: Con = state
        .sdb
        .create(CON_TABLE)
        .content(con_data)
        .await?
        .ok_or(Error::InternalServerError)?;

    Ok((StatusCode::CREATED, Json(con)))
}

#[derive(serde::Deserialize, Debug, Clone)]
pub struct VoteTargetRequest {
    pub solution_id: Option<String>,
    pub pro_id: Option<String>,
    pub con_id: Option<String>,
}

impl VoteTargetRequest {
    fn target(&self) -> Result<VoteTarget> {
        VoteTarget::from_parts(
            self.solution_id
                .as_ref()
                .map(|id| RecordId::from_table_key(SOLUTION_TABLE, id.as_str())),
            self.pro_id
                .as_ref()
                .map(|id| RecordId::from_table_key(PRO_TABLE, id.as_str())),
            self.con_id
                .as_ref()
                .map(|id| RecordId::from_table_key(CON_TABLE, id.as_str())),
        )
    }
}

#[derive(serde::Deserialize, Debug, Clone)]
pub struct CastVoteRequest {
    #[serde(flatten)]
    pub target: VoteTargetRequest,
    pub value: i64,
}

fn vote_query(target: &VoteTarget, with_user: bool) -> &'static str {
    match (target, with_user) {
        (VoteTarget::Solution(_), true) => {
            "SELECT * FROM type::table($table) WHERE user_id = $user_id AND solution_id = $target;"
        }
        (VoteTarget::Pro(_), true) => {
            "SELECT * FROM type::table($table) WHERE user_id = $user_id AND pro_id = $target;"
        }
        (VoteTarget::Con(_), true) => {
            "SELECT * FROM type::table($table) WHERE user_id = $user_id AND con_id = $target;"
        }
        (VoteTarget::Solution(_), false) => {
            "SELECT * FROM type::table($table) WHERE solution_id = $target;"
        }
        (VoteTarget::Pro(_), false) => "SELECT * FROM type::table($table) WHERE pro_id = $target;",
        (VoteTarget::Con(_), false) => "SELECT * FROM type::table($table) WHERE con_id = $target;",
    }
}

async fn vote_score(sdb: &Surreal<Client>, target: &VoteTarget) -> Result<i64> {
    let votes: Vec<Vote> = sdb
        .query(vote_query(target, false))
        .bind(("table", VOTE_TABLE))
        .bind(("target", target.record().clone()))
        .await?
        .take(0)?;
    Ok(votes.iter().map(|v| v.value).sum())
}

async fn find_vote(
    sdb: &Surreal<Client>,
    user_id: &RecordId,
    target: &VoteTarget,
) -> Result<Option<Vote>> {
    let votes: Vec<Vote> = sdb
        .query(vote_query(target, true))
        .bind(("table", VOTE_TABLE))
        .bind(("user_id", user_id.clone()))
        .bind(("target", target.record().clone()))
        .await?
        .take(0)?;
    Ok(votes.into_iter().next())
}

async fn resolve_question_id(sdb: &Surreal<Client>, target: &VoteTarget) -> Result<RecordId> {
    match target {
        VoteTarget::Solution(id) => {
            let solution: Solution = sdb.select(id.clone()).await?.ok_or(Error::NotFound)?;
            Ok(solution.question_id)
        }
        VoteTarget::Pro(id) => {
            let pro: Pro = sdb.select(id.clone()).await?.ok_or(Error::NotFound)?;
            let solution: Solution = sdb
                .select(pro.solution_id)
                .await?
                .ok_or(Error::NotFound)?;
            Ok(solution.question_id)
        }
        VoteTarget::Con(id) => {
            let con: Con = sdb.select(id.clone()).await?.ok_or(Error::NotFound)?;
            let solution: Solution = sdb
                .select(con.solution_id)
                .await?
                .ok_or(Error::NotFound)?;
            Ok(solution.question_id)
        }
    }
}

#[derive(Serialize)]
struct VoteValuePatch {
    value: i64,
    updated_at: String,
}

pub async fn cast_vote(
    State(state): State<AppState>,
    Extension(UserId(user_id)): Extension<UserId>,
    Json(input): Json<CastVoteRequest>,
) -> Result<(StatusCode, Json<Vote>)> {
    let user_id = get_record_id_from_string(&user_id)?;
    let target = input.target.target()?;
    let value = validate_vote_value(input.value)?;

    let question_id = resolve_question_id(&state.sdb, &target).await?;
    let context = create_question_context(&state.sdb, user_id.clone(), question_id).await?;
    check_contribute(&context)?;

    // idempotent per (user, target)
    match find_vote(&state.sdb, &user_id, &target).await? {
        Some(vote) if vote.value == value => Ok((StatusCode::OK, Json(vote))),
        Some(vote) => {
            let updated: Vote = state
                .sdb
                .update(vote.id.clone())
                .merge(VoteValuePatch {
                    value,
                    updated_at: time_now(),
                })
                .await?
                .ok_or(Error::InternalServerError)?;
            Ok((StatusCode::OK, Json(updated)))
        }
        None => {
            let vote_data = CreateVote {
                user_id,
                solution_id: match &target {
                    VoteTarget::Solution(id) => Some(id.clone()),
                    _ => None,
                },
                pro_id: match &target {
                    VoteTarget::Pro(id) => Some(id.clone()),
                    _ => None,
                },
                con_id: match &target {
                    VoteTarget::Con(id) => Some(id.clone()),
                    _ => None,
                },
                value,
                created_at: time_now(),
            };
            let vote: Vote = state
                .sdb
                .create(VOTE_TABLE)
                .content(vote_data)
                .await?
                .ok_or(Error::InternalServerError)?;
            Ok((StatusCode::CREATED, Json(vote)))
        }
    }
}

pub async fn retract_vote(
    State(state): State<AppState>,
    Extension(UserId(user_id)): Extension<UserId>,
    Json(input): Json<VoteTargetRequest>,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    let user_id = get_record_id_from_string(&user_id)?;
    let target = input.target()?;

    let vote = find_vote(&state.sdb, &user_id, &target)
        .await?
        .ok_or(Error::NotFound)?;
    let _: Option<Vote> = state.sdb.delete(vote.id.clone()).await?;

    Ok((StatusCode::OK, Json(MessageResponse::new("Vote removed"))))
}
