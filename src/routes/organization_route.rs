use std::collections::HashSet;

use axum::{
    Extension, Json, Router, middleware,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch, post},
};
use serde::Serialize;
use surrealdb::RecordId;
use tracing::info;
use validator::Validate;

use crate::{
    consts::app_const::ORGANIZATION_TABLE,
    errors::{Error, Result},
    middleware::{UserId, auth_jwt_middleware},
    models::{
        organization::{CreateOrganization, Organization},
        user::{User, UserRole},
    },
    state::AppState,
    utils::{
        access::{evaluate_join, run_signup_linkage},
        get_record_id::get_record_id_from_string,
        slug::to_slug,
        time::time_now,
        token::{generate_token, hash_token},
        validated_form::ValidatedJson,
    },
};

pub fn organization_router(config: AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(create_organization).get(read_organizations))
        .route("/join", post(join_organization))
        .route("/{org_id}", get(read_organization))
        .route("/{org_id}", patch(update_organization))
        .route("/{org_id}/access-link", post(rotate_access_link))
        .layer(middleware::from_fn_with_state(
            config.clone(),
            auth_jwt_middleware,
        ))
        .with_state(config)
}

fn lowercased(vals: Vec<String>) -> Vec<String> {
    vals.into_iter().map(|v| v.to_lowercase()).collect()
}

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, Validate)]
pub struct CreateOrganizationRequest {
    #[validate(length(min = 2, max = 255))]
    pub name: String,
    pub join_domains: Option<Vec<String>>,
    pub whitelist: Option<Vec<String>>,
    pub link_join_enabled: Option<bool>,
}

#[derive(Serialize)]
struct PromoteToAdminPatch {
    role: UserRole,
    organization_id: RecordId,
    updated_at: String,
}

pub async fn create_organization(
    State(state): State<AppState>,
    Extension(UserId(user_id)): Extension<UserId>,
    ValidatedJson(input): ValidatedJson<CreateOrganizationRequest>,
) -> Result<(StatusCode, Json<Organization>)> {
    let user_id = get_record_id_from_string(&user_id)?;

    let slug = to_slug(&input.name);
    let check_org: Vec<Organization> = state
        .sdb
        .query("SELECT * FROM type::table($table) WHERE slug = $slug;")
        .bind(("table", ORGANIZATION_TABLE))
        .bind(("slug", slug.clone()))
        .await?
        .take(0)?;
    if !check_org.is_empty() {
        return Err(Error::OrganizationNameTaken(input.name.clone()));
    }

    let org_data = CreateOrganization {
        name: input.name,
        slug,
        created_by: user_id.clone(),
        join_domains: lowercased(input.join_domains.unwrap_or_default()),
        whitelist: lowercased(input.whitelist.unwrap_or_default()),
        link_join_enabled: input.link_join_enabled.unwrap_or(false),
        access_link_hash: None,
        created_at: time_now(),
    };
    let org: Organization = state
        .sdb
        .create(ORGANIZATION_TABLE)
        .content(org_data)
        .await?
        .ok_or(Error::InternalServerError)?;

    // * The creator administers the organization and belongs to it.
    let _: Option<User> = state
        .sdb
        .update(user_id)
        .merge(PromoteToAdminPatch {
            role: UserRole::Admin,
            organization_id: org.id.clone(),
            updated_at: time_now(),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(org)))
}

pub async fn read_organizations(
    State(state): State<AppState>,
    Extension(UserId(user_id)): Extension<UserId>,
) -> Result<(StatusCode, Json<Vec<Organization>>)> {
    let user_id = get_record_id_from_string(&user_id)?;
    let user: User = state
        .sdb
        .select(user_id.clone())
        .await?
        .ok_or(Error::InvalidToken)?;

    let mut seen = HashSet::new();
    let mut out = Vec::new();

    let owned: Vec<Organization> = state
        .sdb
        .query("SELECT * FROM type::table($table) WHERE created_by = $user_id;")
        .bind(("table", ORGANIZATION_TABLE))
        .bind(("user_id", user_id))
        .await?
        .take(0)?;
    for org in owned {
        if seen.insert(org.id.to_string()) {
            out.push(org);
        }
    }

    if let Some(org_id) = user.organization_id {
        if let Some(org) = state.sdb.select::<Option<Organization>>(org_id).await? {
            if seen.insert(org.id.to_string()) {
                out.push(org);
            }
        }
    }

    Ok((StatusCode::OK, Json(out)))
}

pub async fn read_organization(
    State(state): State<AppState>,
    Extension(UserId(user_id)): Extension<UserId>,
    Path(org_id): Path<String>,
) -> Result<(StatusCode, Json<Organization>)> {
    let user_id = get_record_id_from_string(&user_id)?;
    let org_id = RecordId::from_table_key(ORGANIZATION_TABLE, org_id);

    let org: Organization = state.sdb.select(org_id).await?.ok_or(Error::NotFound)?;
    let user: User = state
        .sdb
        .select(user_id.clone())
        .await?
        .ok_or(Error::InvalidToken)?;

    let is_owner = org.created_by == user_id;
    let is_member = user.organization_id.as_ref() == Some(&org.id);
    if !is_owner && !is_member {
        return Err(Error::AccessDenied("organization members only".to_string()));
    }

    Ok((StatusCode::OK, Json(org)))
}

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone)]
pub struct UpdateOrganizationRequest {
    pub name: Option<String>, // ! & (len = 255)
    pub join_domains: Option<Vec<String>>,
    pub whitelist: Option<Vec<String>>,
    pub link_join_enabled: Option<bool>,
}

#[derive(Serialize)]
struct OrganizationPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    join_domains: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    whitelist: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    link_join_enabled: Option<bool>,
    updated_at: String,
}

pub async fn update_organization(
    State(state): State<AppState>,
    Extension(UserId(user_id)): Extension<UserId>,
    Path(org_id): Path<String>,
    Json(input): Json<UpdateOrganizationRequest>,
) -> Result<(StatusCode, Json<Organization>)> {
    let user_id = get_record_id_from_string(&user_id)?;
    let org_id = RecordId::from_table_key(ORGANIZATION_TABLE, org_id);

    let org: Organization = state
        .sdb
        .select(org_id.clone())
        .await?
        .ok_or(Error::NotFound)?;
    if org.created_by != user_id {
        return Err(Error::AccessDenied("organization owner only".to_string()));
    }

    let slug = match &input.name {
        Some(name) => {
            let slug = to_slug(name);
            if slug != org.slug {
                let clash: Vec<Organization> = state
                    .sdb
                    .query("SELECT * FROM type::table($table) WHERE slug = $slug;")
                    .bind(("table", ORGANIZATION_TABLE))
                    .bind(("slug", slug.clone()))
                    .await?
                    .take(0)?;
                if !clash.is_empty() {
                    return Err(Error::OrganizationNameTaken(name.clone()));
                }
            }
            Some(slug)
        }
        None => None,
    };

    let updated: Organization = state
        .sdb
        .update(org_id)
        .merge(OrganizationPatch {
            name: input.name,
            slug,
            join_domains: input.join_domains.map(lowercased),
            whitelist: input.whitelist.map(lowercased),
            link_join_enabled: input.link_join_enabled,
            updated_at: time_now(),
        })
        .await?
        .ok_or(Error::InternalServerError)?;

    Ok((StatusCode::OK, Json(updated)))
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct AccessLinkResponse {
    /// Plaintext join token; only the hash is stored, so this is the one
    /// time it is visible.
    pub access_link: String,
}

#[derive(Serialize)]
struct AccessLinkPatch {
    access_link_hash: String,
    link_join_enabled: bool,
    updated_at: String,
}

pub async fn rotate_access_link(
    State(state): State<AppState>,
    Extension(UserId(user_id)): Extension<UserId>,
    Path(org_id): Path<String>,
) -> Result<(StatusCode, Json<AccessLinkResponse>)> {
    let user_id = get_record_id_from_string(&user_id)?;
    let org_id = RecordId::from_table_key(ORGANIZATION_TABLE, org_id);

    let org: Organization = state
        .sdb
        .select(org_id.clone())
        .await?
        .ok_or(Error::NotFound)?;
    if org.created_by != user_id {
        return Err(Error::AccessDenied("organization owner only".to_string()));
    }

    let (token, token_hash) = generate_token();
    let _: Option<Organization> = state
        .sdb
        .update(org_id)
        .merge(AccessLinkPatch {
            access_link_hash: token_hash,
            link_join_enabled: true,
            updated_at: time_now(),
        })
        .await?;

    Ok((StatusCode::OK, Json(AccessLinkResponse { access_link: token })))
}

#[derive(serde::Deserialize, Debug, Clone)]
pub struct JoinOrganizationRequest {
    pub organization_id: Option<String>,
    pub token: Option<String>,
}

#[derive(Serialize)]
struct JoinPatch {
    organization_id: RecordId,
    updated_at: String,
}

pub async fn join_organization(
    State(state): State<AppState>,
    Extension(UserId(user_id)): Extension<UserId>,
    Json(input): Json<JoinOrganizationRequest>,
) -> Result<(StatusCode, Json<Organization>)> {
    let user_id = get_record_id_from_string(&user_id)?;
    let user: User = state
        .sdb
        .select(user_id.clone())
        .await?
        .ok_or(Error::InvalidToken)?;

    let org: Organization = match (&input.organization_id, &input.token) {
        (_, Some(token)) => state
            .sdb
            .query("SELECT * FROM type::table($table) WHERE access_link_hash = $hash AND link_join_enabled = true;")
            .bind(("table", ORGANIZATION_TABLE))
            .bind(("hash", hash_token(token)))
            .await?
            .take::<Vec<Organization>>(0)?
            .into_iter()
            .next()
            .ok_or(Error::JoinRefused)?,
        (Some(org_id), None) => {
            let org_id =
                RecordId::from_table_key(ORGANIZATION_TABLE, org_id.as_str());
            state.sdb.select(org_id).await?.ok_or(Error::NotFound)?
        }
        (None, None) => {
            return Err(Error::Custom(
                "organization_id or token is required".to_string(),
            ));
        }
    };

    let admission =
        evaluate_join(&org, &user.email, input.token.as_deref()).ok_or(Error::JoinRefused)?;

    let _: Option<User> = state
        .sdb
        .update(user_id.clone())
        .merge(JoinPatch {
            organization_id: org.id.clone(),
            updated_at: time_now(),
        })
        .await?;

    // roster rows for this email may predate the account
    run_signup_linkage(&state.sdb, &user).await?;

    info!(
        "user {} joined organization {} via {:?}",
        user_id, org.id, admission
    );

    Ok((StatusCode::OK, Json(org)))
}
