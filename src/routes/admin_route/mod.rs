use axum::{
    Router, middleware,
    routing::{delete, get, patch, post},
};

use crate::{
    middleware::auth_jwt_middleware,
    routes::admin_route::{
        company_users::{
            bulk_company_user_import, create_company_user, delete_company_user,
            read_company_users, update_company_user,
        },
        invites::{read_invite_batch, start_invite_batch},
        question_access::{create_question_access, delete_question_access, read_question_access},
    },
    state::AppState,
};

pub mod company_users;
pub mod invites;
pub mod question_access;

pub fn admin_router(config: AppState) -> Router<AppState> {
    Router::new()
        // ! roster
        .route(
            "/company-users",
            post(create_company_user).get(read_company_users),
        )
        .route("/company-users/bulk", post(bulk_company_user_import))
        .route(
            "/company-users/{company_user_id}",
            patch(update_company_user).delete(delete_company_user),
        )
        // ! question access grants
        .route(
            "/question-access",
            post(create_question_access).get(read_question_access),
        )
        .route(
            "/question-access/{access_id}",
            delete(delete_question_access),
        )
        // ! invite batches
        .route("/questions/{question_id}/invites", post(start_invite_batch))
        .route("/invite-batches/{batch_id}", get(read_invite_batch))
        .layer(middleware::from_fn_with_state(
            config.clone(),
            auth_jwt_middleware,
        ))
        .with_state(config)
}
