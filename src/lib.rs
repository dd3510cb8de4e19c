#![doc = "The `taskapi` library crate."]
#![doc = ""]
#![doc = "Domain models, credential and task storage, the auth and task services, routing"]
#![doc = "and error handling for the task API. The binary (`main.rs`) loads configuration,"]
#![doc = "builds an `app::AppServices` and serves it with actix-web."]

pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;

pub use crate::app::AppServices;
pub use crate::error::AppError;
