use axum::{
    Extension, Json,
    extract::{Query, State},
    http::StatusCode,
};
use serde::Serialize;

use crate::{
    consts::app_const::EMAIL_VERIFICATION_TABLE,
    errors::{Error, Result},
    middleware::UserId,
    models::{
        user::User,
        verification::{CreateEmailVerification, EmailVerification},
    },
    routes::MessageResponse,
    state::AppState,
    utils::{
        get_record_id::get_record_id_from_string,
        time::{is_expired, time_now},
        token::{generate_token, hash_token},
    },
};

#[derive(Debug, Clone, serde::Deserialize)]
pub struct VerifyEmailQuery {
    pub token: String,
}

#[derive(Serialize)]
struct EmailVerifiedPatch {
    email_verified: bool,
    updated_at: String,
}

pub async fn verify_email(
    State(state): State<AppState>,
    Query(query): Query<VerifyEmailQuery>,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    let token_hash = hash_token(&query.token);

    let verification: EmailVerification = state
        .sdb
        .query("SELECT * FROM type::table($table) WHERE token_hash = $token_hash;")
        .bind(("table", EMAIL_VERIFICATION_TABLE))
        .bind(("token_hash", token_hash))
        .await?
        .take::<Vec<EmailVerification>>(0)?
        .into_iter()
        .next()
        .ok_or(Error::VerificationTokenInvalid)?;

    if is_expired(&verification.expires_at) {
        let _: Option<EmailVerification> = state.sdb.delete(verification.id.clone()).await?;
        return Err(Error::VerificationTokenInvalid);
    }

    let _: Option<User> = state
        .sdb
        .update(verification.user_id.clone())
        .merge(EmailVerifiedPatch {
            email_verified: true,
            updated_at: time_now(),
        })
        .await?;

    // single use
    let _: Option<EmailVerification> = state.sdb.delete(verification.id.clone()).await?;

    Ok((
        StatusCode::OK,
        Json(MessageResponse::new("Email verified successfully")),
    ))
}

pub async fn resend_email_verification(
    State(state): State<AppState>,
    Extension(UserId(user_id)): Extension<UserId>,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    let user_id = get_record_id_from_string(&user_id)?;
    let user: User = state
        .sdb
        .select(user_id.clone())
        .await?
        .ok_or(Error::InvalidToken)?;

    if user.email_verified {
        return Err(Error::Custom("email is already verified".to_string()));
    }

    // invalidate any outstanding tokens before issuing a new one
    state
        .sdb
        .query("DELETE FROM type::table($table) WHERE user_id = $user_id;")
        .bind(("table", EMAIL_VERIFICATION_TABLE))
        .bind(("user_id", user_id.clone()))
        .await?;

    let (token, token_hash) = generate_token();
    let _: Option<EmailVerification> = state
        .sdb
        .create(EMAIL_VERIFICATION_TABLE)
        .content(CreateEmailVerification::init(user_id, token_hash))
        .await?;

    let verify_url = format!(
        "{}/api/auth/email/verify?token={}",
        state.config.base_url, token
    );
    state
        .mailer
        .send(
            &user.email,
            "Verify your Vayam account",
            &format!(
                "<p><a href=\"{}\">Verify your email</a> to finish signing up.</p>",
                verify_url
            ),
        )
        .await?;

    Ok((
        StatusCode::OK,
        Json(MessageResponse::new("New verification email sent")),
    ))
}
