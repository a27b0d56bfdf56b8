use std::{env, fmt::Display, str::FromStr};

use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub db_addr: String,
    pub db_user: String,
    pub db_pass: String,
    pub db_ns: String,
    pub db_name: String,
    pub jwt_secret: String,
    pub sendgrid_api_key: String,
    pub sendgrid_from: String,
    pub base_url: String,
    pub google_client_id: Option<String>,
}

impl Config {
    pub fn load() -> Self {
        Self {
            port: try_load("VAYAM_PORT", "3587"),
            db_addr: try_load("SURREAL_ADDR", "localhost:8000"),
            db_user: try_load("SURREAL_USER", "root"),
            db_pass: require("SURREAL_PASS"),
            db_ns: try_load("SURREAL_NS", "vayam"),
            db_name: try_load("SURREAL_DB", "vayam"),
            jwt_secret: require("JWT_SECRET"),
            sendgrid_api_key: require("SENDGRID_API_KEY"),
            sendgrid_from: try_load("SENDGRID_FROM", "no-reply@vayam.app"),
            base_url: try_load("APP_BASE_URL", "http://localhost:3587"),
            google_client_id: env::var("GOOGLE_CLIENT_ID").ok(),
        }
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        warn!("Environment variable {key} not found, using default");
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
        })
        .expect("Environment misconfigured!")
}

fn require(key: &str) -> String {
    env::var(key)
        .map_err(|_| {
            warn!("Required environment variable {key} not set");
        })
        .expect("Environment misconfigured!")
}
