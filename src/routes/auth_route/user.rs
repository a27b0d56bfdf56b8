use axum::{Json, extract::State, http::StatusCode};
use tracing::warn;
use validator::Validate;

use crate::{
    consts::app_const::{AUTH_PASSWORD_TABLE, EMAIL_VERIFICATION_TABLE, USER_TABLE},
    errors::{Error, Result},
    models::{
        user::{AuthProvider, CreateUser, CreateUserPassword, User, UserRole, UserWithPassword},
        verification::{CreateEmailVerification, EmailVerification},
    },
    state::AppState,
    utils::{
        access::run_signup_linkage,
        jwt::{Claims, encode_jwt},
        pwd::{hash, validate},
        time::time_now,
        token::generate_token,
        validated_form::ValidatedJson,
        validator::validate_password,
    },
};

const GOOGLE_TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";

#[derive(Debug, Clone, serde::Deserialize, Validate)]
pub struct SignUpRequest {
    #[validate(length(min = 2, max = 100))]
    pub name: String,
    #[validate(email, length(max = 255))]
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct SignUpResponse {
    msg: String,
}

pub async fn sign_up(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<SignUpRequest>,
) -> Result<(StatusCode, Json<SignUpResponse>)> {
    validate_password(&input.password).map_err(|_| Error::WeakPassword)?;

    let check_user: Vec<User> = state
        .sdb
        .query("SELECT * FROM type::table($table) WHERE email = $email;")
        .bind(("table", USER_TABLE))
        .bind(("email", input.email.clone()))
        .await?
        .take(0)?;

    if !check_user.is_empty() {
        return Err(Error::EmailExist(input.email.clone()));
    }

    let password_hash = hash(input.password.as_bytes())?;

    let user_data = CreateUser {
        name: input.name,
        email: input.email.clone(),
        role: UserRole::Participant,
        auth_provider: AuthProvider::Classic,
        email_verified: false,
        organization_id: None,
        created_at: time_now(),
    };
    let user: User = state
        .sdb
        .create(USER_TABLE)
        .content(user_data)
        .await?
        .ok_or(Error::InternalServerError)?;

    let auth_password = CreateUserPassword {
        user_id: user.id.clone(),
        password_hash,
    };
    let _: Option<UserWithPassword> = state
        .sdb
        .create(AUTH_PASSWORD_TABLE)
        .content(auth_password)
        .await?;

    let (token, token_hash) = generate_token();
    let _: Option<EmailVerification> = state
        .sdb
        .create(EMAIL_VERIFICATION_TABLE)
        .content(CreateEmailVerification::init(user.id.clone(), token_hash))
        .await?;

    let verify_url = format!(
        "{}/api/auth/email/verify?token={}",
        state.config.base_url, token
    );
    if let Err(e) = state
        .mailer
        .send(
            &user.email,
            "Verify your Vayam account",
            &format!(
                "<p>Welcome to Vayam. <a href=\"{}\">Verify your email</a> to finish signing up.</p>",
                verify_url
            ),
        )
        .await
    {
        warn!("verification email to {} failed: {e}", user.email);
    }

    run_signup_linkage(&state.sdb, &user).await?;

    Ok((
        StatusCode::CREATED,
        Json(SignUpResponse {
            msg: format!("user with email: {} created", input.email),
        }),
    ))
}

#[derive(Debug, Clone, serde::Deserialize, Validate)]
pub struct SignInRequest {
    #[validate(email)]
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct TokenResponse {
    pub token: String,
}

pub async fn sign_in(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<SignInRequest>,
) -> Result<Json<TokenResponse>> {
    let user: User = state
        .sdb
        .query("SELECT * FROM type::table($table) WHERE email = $email;")
        .bind(("table", USER_TABLE))
        .bind(("email", input.email.clone()))
        .await?
        .take::<Vec<User>>(0)?
        .into_iter()
        .next()
        .ok_or(Error::InvalidLoginDetails)?;

    // Google-only accounts have no password row
    let auth_password: UserWithPassword = state
        .sdb
        .query("SELECT * FROM type::table($table) WHERE user_id = $user_id;")
        .bind(("table", AUTH_PASSWORD_TABLE))
        .bind(("user_id", user.id.clone()))
        .await?
        .take::<Vec<UserWithPassword>>(0)?
        .into_iter()
        .next()
        .ok_or(Error::InvalidLoginDetails)?;

    if !validate(input.password.as_bytes(), &auth_password.password_hash)? {
        return Err(Error::InvalidLoginDetails);
    }

    let token = encode_jwt(&Claims::new(&user.id), state.config.jwt_secret.as_bytes())?;

    Ok(Json(TokenResponse { token }))
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct GoogleSignInRequest {
    pub id_token: String,
}

#[derive(Debug, Clone, serde::Deserialize)]
struct GoogleTokenInfo {
    aud: String,
    email: String,
    email_verified: String,
    name: Option<String>,
}

pub async fn google_sign_in(
    State(state): State<AppState>,
    Json(input): Json<GoogleSignInRequest>,
) -> Result<Json<TokenResponse>> {
    let client_id = state
        .config
        .google_client_id
        .as_ref()
        .ok_or(Error::Custom("google sign-in is not configured".to_string()))?;

    let info: GoogleTokenInfo = state
        .http
        .get(GOOGLE_TOKENINFO_URL)
        .query(&[("id_token", input.id_token.as_str())])
        .send()
        .await?
        .error_for_status()
        .map_err(|_| Error::GoogleTokenRejected)?
        .json()
        .await?;

    if info.aud != *client_id || info.email_verified != "true" {
        return Err(Error::GoogleTokenRejected);
    }

    let existing: Option<User> = state
        .sdb
        .query("SELECT * FROM type::table($table) WHERE email = $email;")
        .bind(("table", USER_TABLE))
        .bind(("email", info.email.clone()))
        .await?
        .take::<Vec<User>>(0)?
        .into_iter()
        .next();

    let user = match existing {
        Some(user) => user,
        None => {
            let user_data = CreateUser {
                name: info.name.unwrap_or_else(|| info.email.clone()),
                email: info.email.clone(),
                role: UserRole::Participant,
                auth_provider: AuthProvider::Google,
                email_verified: true,
                organization_id: None,
                created_at: time_now(),
            };
            let user: User = state
                .sdb
                .create(USER_TABLE)
                .content(user_data)
                .await?
                .ok_or(Error::InternalServerError)?;

            run_signup_linkage(&state.sdb, &user).await?;
            user
        }
    };

    let token = encode_jwt(&Claims::new(&user.id), state.config.jwt_secret.as_bytes())?;

    Ok(Json(TokenResponse { token }))
}
