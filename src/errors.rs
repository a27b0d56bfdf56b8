use argon2::password_hash::Error as ArError;
use axum::{Json, http::StatusCode, response::IntoResponse};
use jsonwebtoken::errors::Error as JWError;
use serde_json::json;
use surrealdb::Error as SError;

use thiserror::Error;
use tracing::error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Argon 2 Error: {0}")]
    Argon2Error(#[from] ArError),

    #[error("Json web token Error: {0}")]
    JwTError(#[from] JWError),

    #[error("SurrealDb Error: {0}")]
    SurrealError(#[from] SError),

    #[error("Io Error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Http client Error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Validator Error: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Json Rejection Error: {0}")]
    AxumJsonRejection(#[from] axum::extract::rejection::JsonRejection),

    #[error("Invalid login detail")]
    InvalidLoginDetails,

    #[error("User with email `{0}` already exists!")]
    EmailExist(String),

    #[error("Password does not meet the minimum requirements")]
    WeakPassword,

    #[error("Invalid or expired verification token")]
    VerificationTokenInvalid,

    #[error("Google token rejected")]
    GoogleTokenRejected,

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Question is not active")]
    QuestionInactive,

    #[error("No join policy admits this account")]
    JoinRefused,

    #[error("Organization `{0}` already exists")]
    OrganizationNameTaken(String),

    #[error("Company user with email `{0}` is already on the roster")]
    DuplicateCompanyUser(String),

    #[error("Access grant already exists")]
    DuplicateGrant,

    #[error("An invite batch is already running for this question")]
    BatchAlreadyRunning,

    #[error("A vote must reference exactly one of solution, pro or con")]
    InvalidVoteTarget,

    #[error("Vote value must be +1 or -1")]
    InvalidVoteValue,

    #[error("{0}")]
    Custom(String),

    #[error("Not Found")]
    NotFound,

    #[error("Internal Server Error")]
    InternalServerError,

    // ! Auth
    #[error("Missing authorization token")]
    MissingToken,
    #[error("Invalid authorization token")]
    InvalidToken,
    #[error("Invalid authorization scheme")]
    InvalidScheme,
    #[error("Token expired")]
    TokenExpired,
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            Error::Argon2Error(error) => {
                error!("Argon 2 Error:{:#?}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Error".to_string(),
                )
            }
            Error::JwTError(error) => {
                error!("JWT Error:{:#?}", error);
                (
                    StatusCode::UNAUTHORIZED,
                    "Invalid authorization token".to_string(),
                )
            }
            Error::SurrealError(error) => {
                error!("Surreal Error:{:#?}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Error".to_string(),
                )
            }
            Error::IoError(error) => {
                error!("Io Error:{:#?}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Error".to_string(),
                )
            }
            Error::HttpError(error) => {
                error!("Http client Error:{:#?}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Error".to_string(),
                )
            }
            Error::ValidationError(error) => {
                let message = format!("Input validation error: [{}]", error).replace('\n', ", ");
                (StatusCode::BAD_REQUEST, message)
            }
            Error::AxumJsonRejection(error) => (StatusCode::BAD_REQUEST, error.to_string()),
            Error::InvalidLoginDetails => {
                (StatusCode::UNAUTHORIZED, "Invalid Login Details".to_string())
            }
            Error::EmailExist(email) => (
                StatusCode::CONFLICT,
                format!("User with email {} already exists!", email),
            ),
            Error::WeakPassword => (
                StatusCode::BAD_REQUEST,
                "Password must be at least 8 characters with upper, lower, number and symbol"
                    .to_string(),
            ),
            Error::VerificationTokenInvalid => (
                StatusCode::BAD_REQUEST,
                "Invalid or expired verification token".to_string(),
            ),
            Error::GoogleTokenRejected => {
                (StatusCode::UNAUTHORIZED, "Google token rejected".to_string())
            }
            Error::AccessDenied(action) => {
                (StatusCode::FORBIDDEN, format!("Access denied: {}", action))
            }
            Error::QuestionInactive => {
                (StatusCode::FORBIDDEN, "Question is not active".to_string())
            }
            Error::JoinRefused => (
                StatusCode::FORBIDDEN,
                "No join policy admits this account".to_string(),
            ),
            Error::OrganizationNameTaken(name) => (
                StatusCode::CONFLICT,
                format!("Organization {} already exists", name),
            ),
            Error::DuplicateCompanyUser(email) => (
                StatusCode::CONFLICT,
                format!("Company user with email {} is already on the roster", email),
            ),
            Error::DuplicateGrant => (
                StatusCode::CONFLICT,
                "Access grant already exists".to_string(),
            ),
            Error::BatchAlreadyRunning => (
                StatusCode::CONFLICT,
                "An invite batch is already running for this question".to_string(),
            ),
            Error::InvalidVoteTarget => (
                StatusCode::BAD_REQUEST,
                "A vote must reference exactly one of solution, pro or con".to_string(),
            ),
            Error::InvalidVoteValue => (
                StatusCode::BAD_REQUEST,
                "Vote value must be +1 or -1".to_string(),
            ),
            Error::Custom(message) => (StatusCode::BAD_REQUEST, message),
            Error::NotFound => (StatusCode::NOT_FOUND, "Not Found".to_string()),
            Error::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Error".to_string(),
            ),
            Error::MissingToken => (
                StatusCode::UNAUTHORIZED,
                "Missing authorization token".to_string(),
            ),
            Error::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "Invalid authorization token".to_string(),
            ),
            Error::InvalidScheme => (
                StatusCode::UNAUTHORIZED,
                "Invalid authorization scheme".to_string(),
            ),
            Error::TokenExpired => (StatusCode::UNAUTHORIZED, "Token expired".to_string()),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
