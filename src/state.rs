use std::sync::Arc;

use surrealdb::{
    Surreal,
    engine::remote::ws::{Client, Ws},
    opt::auth::Root,
};

use crate::{config::Config, errors::Result, utils::mailer::Mailer};

#[derive(Debug, Clone)]
pub struct AppState {
    pub sdb: Surreal<Client>,
    pub config: Arc<Config>,
    pub mailer: Mailer,
    pub http: reqwest::Client,
}

impl AppState {
    pub async fn init() -> Result<Self> {
        let config = Arc::new(Config::load());

        let sdb = Surreal::new::<Ws>(config.db_addr.as_str()).await?;
        sdb.signin(Root {
            username: &config.db_user,
            password: &config.db_pass,
        })
        .await?;
        sdb.use_ns(config.db_ns.as_str())
            .use_db(config.db_name.as_str())
            .await?;

        let mailer = Mailer::new(
            config.sendgrid_api_key.clone(),
            config.sendgrid_from.clone(),
        );

        Ok(Self {
            sdb,
            config,
            mailer,
            http: reqwest::Client::new(),
        })
    }
}
