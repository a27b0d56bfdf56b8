use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Serialize;
use surrealdb::RecordId;
use validator::Validate;

use crate::{
    consts::app_const::{
        COMPANY_USER_TABLE, ORGANIZATION_TABLE, QUESTION_ACCESS_TABLE, USER_TABLE,
    },
    errors::{Error, Result},
    middleware::UserId,
    models::{
        company_user::{CompanyUser, CreateCompanyUser},
        organization::Organization,
        user::User,
    },
    routes::MessageResponse,
    state::AppState,
    utils::{get_record_id::get_record_id_from_string, time::time_now, validated_form::ValidatedJson},
};

/// Roster operations are restricted to the admin who owns the organization.
pub async fn owned_organization(
    state: &AppState,
    org_id: RecordId,
    user_id: &RecordId,
) -> Result<Organization> {
    let org: Organization = state.sdb.select(org_id).await?.ok_or(Error::NotFound)?;
    if &org.created_by != user_id {
        return Err(Error::AccessDenied("organization owner only".to_string()));
    }
    Ok(org)
}

async fn registered_account(state: &AppState, email: &str) -> Result<Option<RecordId>> {
    let users: Vec<User> = state
        .sdb
        .query("SELECT * FROM type::table($table) WHERE email = $email;")
        .bind(("table", USER_TABLE))
        .bind(("email", email.to_string()))
        .await?
        .take(0)?;
    Ok(users.into_iter().next().map(|u| u.id))
}

async fn roster_entry_exists(state: &AppState, org_id: &RecordId, email: &str) -> Result<bool> {
    let existing: Vec<CompanyUser> = state
        .sdb
        .query("SELECT * FROM type::table($table) WHERE organization_id = $organization_id AND email = $email;")
        .bind(("table", COMPANY_USER_TABLE))
        .bind(("organization_id", org_id.clone()))
        .bind(("email", email.to_string()))
        .await?
        .take(0)?;
    Ok(!existing.is_empty())
}

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, Validate)]
pub struct CreateCompanyUserRequest {
    pub organization_id: String,
    #[validate(email, length(max = 255))]
    pub email: String,
    #[validate(length(min = 2, max = 100))]
    pub name: String,
}

pub async fn create_company_user(
    State(state): State<AppState>,
    Extension(UserId(user_id)): Extension<UserId>,
    ValidatedJson(input): ValidatedJson<CreateCompanyUserRequest>,
) -> Result<(StatusCode, Json<CompanyUser>)> {
    let user_id = get_record_id_from_string(&user_id)?;
    let org_id = RecordId::from_table_key(ORGANIZATION_TABLE, input.organization_id.as_str());
    let org = owned_organization(&state, org_id, &user_id).await?;

    let email = input.email.to_lowercase();
    if roster_entry_exists(&state, &org.id, &email).await? {
        return Err(Error::DuplicateCompanyUser(email));
    }

    // link immediately when an account with this email already exists
    let linked_user = registered_account(&state, &email).await?;

    let company_user_data = CreateCompanyUser {
        organization_id: org.id,
        email,
        name: input.name,
        user_id: linked_user,
        created_at: time_now(),
    };
    let company_user: CompanyUser = state
        .sdb
        .create(COMPANY_USER_TABLE)
        .content(company_user_data)
        .await?
        .ok_or(Error::InternalServerError)?;

    Ok((StatusCode::CREATED, Json(company_user)))
}

#[derive(serde::Deserialize, Debug, Clone)]
pub struct ReadCompanyUsersQuery {
    pub org_id: String,
}

pub async fn read_company_users(
    State(state): State<AppState>,
    Extension(UserId(user_id)): Extension<UserId>,
    Query(query): Query<ReadCompanyUsersQuery>,
) -> Result<(StatusCode, Json<Vec<CompanyUser>>)> {
    let user_id = get_record_id_from_string(&user_id)?;
    let org_id = RecordId::from_table_key(ORGANIZATION_TABLE, query.org_id.as_str());
    let org = owned_organization(&state, org_id, &user_id).await?;

    let roster: Vec<CompanyUser> = state
        .sdb
        .query("SELECT * FROM type::table($table) WHERE organization_id = $organization_id;")
        .bind(("table", COMPANY_USER_TABLE))
        .bind(("organization_id", org.id))
        .await?
        .take(0)?;

    Ok((StatusCode::OK, Json(roster)))
}

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone)]
pub struct UpdateCompanyUserRequest {
    pub email: Option<String>,
    pub name: Option<String>,
}

#[derive(Serialize)]
struct CompanyUserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    user_id: Option<RecordId>,
    updated_at: String,
}

pub async fn update_company_user(
    State(state): State<AppState>,
    Extension(UserId(user_id)): Extension<UserId>,
    Path(company_user_id): Path<String>,
    Json(input): Json<UpdateCompanyUserRequest>,
) -> Result<(StatusCode, Json<CompanyUser>)> {
    let user_id = get_record_id_from_string(&user_id)?;
    let company_user_id = RecordId::from_table_key(COMPANY_USER_TABLE, company_user_id);

    let company_user: CompanyUser = state
        .sdb
        .select(company_user_id.clone())
        .await?
        .ok_or(Error::NotFound)?;
    let org = owned_organization(&state, company_user.organization_id.clone(), &user_id).await?;

    let (email, linked_user) = match input.email {
        Some(email) => {
            let email = email.to_lowercase();
            if email != company_user.email {
                if roster_entry_exists(&state, &org.id, &email).await? {
                    return Err(Error::DuplicateCompanyUser(email));
                }
                // the account link follows the email
                let linked = registered_account(&state, &email).await?;
                (Some(email), linked)
            } else {
                (None, company_user.user_id.clone())
            }
        }
        None => (None, company_user.user_id.clone()),
    };

    let updated: CompanyUser = state
        .sdb
        .update(company_user_id)
        .merge(CompanyUserPatch {
            email,
            name: input.name,
            user_id: linked_user,
            updated_at: time_now(),
        })
        .await?
        .ok_or(Error::InternalServerError)?;

    Ok((StatusCode::OK, Json(updated)))
}

pub async fn delete_company_user(
    State(state): State<AppState>,
    Extension(UserId(user_id)): Extension<UserId>,
    Path(company_user_id): Path<String>,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    let user_id = get_record_id_from_string(&user_id)?;
    let company_user_id = RecordId::from_table_key(COMPANY_USER_TABLE, company_user_id);

    let company_user: CompanyUser = state
        .sdb
        .select(company_user_id.clone())
        .await?
        .ok_or(Error::NotFound)?;
    owned_organization(&state, company_user.organization_id.clone(), &user_id).await?;

    // grants held through the roster row die with it
    state
        .sdb
        .query("DELETE FROM type::table($table) WHERE company_user_id = $company_user_id;")
        .bind(("table", QUESTION_ACCESS_TABLE))
        .bind(("company_user_id", company_user_id.clone()))
        .await?;
    let _: Option<CompanyUser> = state.sdb.delete(company_user_id).await?;

    Ok((
        StatusCode::OK,
        Json(MessageResponse::new("Company user removed")),
    ))
}

#[derive(serde::Deserialize, Debug, Clone)]
pub struct BulkCompanyUserEntry {
    pub email: String,
    pub name: String,
}

#[derive(serde::Deserialize, Debug, Clone)]
pub struct BulkImportRequest {
    pub organization_id: String,
    pub users: Vec<BulkCompanyUserEntry>,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct BulkImportRow {
    pub email: String,
    pub status: &'static str,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct BulkImportResponse {
    pub created: usize,
    pub skipped: usize,
    pub results: Vec<BulkImportRow>,
}

pub async fn bulk_company_user_import(
    State(state): State<AppState>,
    Extension(UserId(user_id)): Extension<UserId>,
    Json(input): Json<BulkImportRequest>,
) -> Result<(StatusCode, Json<BulkImportResponse>)> {
    let user_id = get_record_id_from_string(&user_id)?;
    let org_id = RecordId::from_table_key(ORGANIZATION_TABLE, input.organization_id.as_str());
    let org = owned_organization(&state, org_id, &user_id).await?;

    let mut created = 0;
    let mut skipped = 0;
    let mut results = Vec::with_capacity(input.users.len());

    for entry in input.users {
        let email = entry.email.to_lowercase();
        if !email.contains('@') {
            skipped += 1;
            results.push(BulkImportRow {
                email,
                status: "invalid",
            });
            continue;
        }
        if roster_entry_exists(&state, &org.id, &email).await? {
            // existing entries are reported, not treated as errors
            skipped += 1;
            results.push(BulkImportRow {
                email,
                status: "skipped",
            });
            continue;
        }

        let linked_user = registered_account(&state, &email).await?;
        let company_user_data = CreateCompanyUser {
            organization_id: org.id.clone(),
            email: email.clone(),
            name: entry.name,
            user_id: linked_user,
            created_at: time_now(),
        };
        let _: Option<CompanyUser> = state
            .sdb
            .create(COMPANY_USER_TABLE)
            .content(company_user_data)
            .await?;

        created += 1;
        results.push(BulkImportRow {
            email,
            status: "created",
        });
    }

    Ok((
        StatusCode::OK,
        Json(BulkImportResponse {
            created,
            skipped,
            results,
        }),
    ))
}
