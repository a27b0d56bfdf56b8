use std::{sync::Arc, time::Duration};
use tower_governor::{
    GovernorLayer, governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor,
};

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::{
    middleware::auth_jwt_middleware,
    routes::auth_route::{
        modify_user::{resend_email_verification, verify_email},
        user::{google_sign_in, sign_in, sign_up},
    },
    state::AppState,
};

pub mod modify_user;
pub mod user;

pub fn auth_router(config: AppState) -> Router<AppState> {
    // ? rate limiter for resend email verification
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(3600)
            .burst_size(3)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .unwrap(),
    );
    let governor_limiter = governor_conf.limiter().clone();
    let interval = Duration::from_secs(60);
    // a separate background task to clean up
    std::thread::spawn(move || {
        loop {
            std::thread::sleep(interval);
            tracing::debug!("rate limiting storage size: {}", governor_limiter.len());
            governor_limiter.retain_recent();
        }
    });

    let unprotected = Router::new()
        .route("/signup", post(sign_up))
        .route("/signin", post(sign_in))
        .route("/google", post(google_sign_in))
        .route("/email/verify", get(verify_email));

    let protected = Router::new()
        .route(
            "/email/resend-verification",
            post(resend_email_verification).layer(GovernorLayer {
                config: governor_conf,
            }),
        )
        .layer(middleware::from_fn_with_state(
            config.clone(),
            auth_jwt_middleware,
        ));

    Router::new()
        .merge(unprotected)
        .merge(protected)
        .with_state(config)
}
