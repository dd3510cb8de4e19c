//! Explicit wiring of stores, services and routes.
//!
//! `main.rs` builds an `AppServices` once at startup and hands a clone to every
//! actix worker through `AppServices::configure`. Integration tests do the same
//! with the in-memory stores.

use std::sync::Arc;

use actix_web::web;

use crate::auth::{AuthService, TokenService};
use crate::config::Config;
use crate::error::AppError;
use crate::routes;
use crate::services::TaskService;
use crate::store::{
    postgres, MemoryTaskStore, MemoryUserStore, PgTaskStore, PgUserStore, TaskStore, UserStore,
};

#[derive(Clone)]
pub struct AppServices {
    pub auth: web::Data<AuthService>,
    pub tasks: web::Data<TaskService>,
    pub tokens: web::Data<TokenService>,
}

impl AppServices {
    pub fn new(users: Arc<dyn UserStore>, tasks: Arc<dyn TaskStore>, config: &Config) -> Self {
        let tokens = TokenService::new(config.jwt_secret.as_bytes(), config.token_ttl());
        let auth = AuthService::new(users, tokens.clone(), config.bcrypt_cost);

        Self {
            auth: web::Data::new(auth),
            tasks: web::Data::new(TaskService::new(tasks)),
            tokens: web::Data::new(tokens),
        }
    }

    pub fn in_memory(config: &Config) -> Self {
        Self::new(
            Arc::new(MemoryUserStore::new()),
            Arc::new(MemoryTaskStore::new()),
            config,
        )
    }

    /// Connects to Postgres when `DATABASE_URL` is configured, otherwise falls
    /// back to the in-memory stores.
    pub async fn from_config(config: &Config) -> Result<Self, AppError> {
        match &config.database_url {
            Some(url) => {
                let pool = postgres::connect(url, config.database_max_connections).await?;
                postgres::run_migrations(&pool).await?;
                log::info!("Using Postgres storage");
                Ok(Self::new(
                    Arc::new(PgUserStore::new(pool.clone())),
                    Arc::new(PgTaskStore::new(pool)),
                    config,
                ))
            }
            None => {
                log::warn!("DATABASE_URL not set; using in-memory storage, data will not persist");
                Ok(Self::in_memory(config))
            }
        }
    }

    /// Registers shared services, the health check and the `/api` routes.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.auth.clone())
            .app_data(self.tasks.clone())
            .app_data(self.tokens.clone())
            .service(routes::health::health)
            .service(web::scope("/api").configure(routes::config));
    }
}
