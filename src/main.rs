use axum::Router;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

use crate::{errors::Result, routes::api_router, state::AppState};

pub mod config;
pub mod consts;
pub mod errors;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;
pub mod utils;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing::subscriber::set_global_default(FmtSubscriber::default()).unwrap();
    let state = AppState::init().await?;

    let port = state.config.port;

    info!("Starting server");

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    info!("Serving vayam at http://{}", listener.local_addr()?);
    axum::serve(listener, app(state)).await?;

    Ok(())
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .nest("/api", api_router(state.clone()))
        .with_state(state)
}
