//! Persistence seams for users and tasks.
//!
//! Services depend on the `UserStore` and `TaskStore` traits only. Two
//! implementations exist: `postgres` (sqlx over a `PgPool`) for deployments and
//! `memory` for development runs without `DATABASE_URL` and for tests.
//!
//! Every method is a single storage operation. Nothing here spans more than one
//! statement, so there are no transactions and no locking above the store.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Task, TaskStatus, User};

pub use memory::{MemoryTaskStore, MemoryUserStore};
pub use postgres::{PgTaskStore, PgUserStore};

/// Credential storage.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn exists_by_username(&self, username: &str) -> Result<bool, AppError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;

    /// Persists a new user. Fails with `AppError::DuplicateUsername` when the
    /// store's own uniqueness constraint rejects the row.
    async fn insert(&self, user: User) -> Result<User, AppError>;
}

/// Task storage. Listing order is insertion order.
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn insert(&self, task: Task) -> Result<Task, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Task>, AppError>;

    async fn find_all(&self) -> Result<Vec<Task>, AppError>;

    async fn find_all_by_status(&self, status: TaskStatus) -> Result<Vec<Task>, AppError>;

    /// Overwrites an existing task. Fails with `NotFound` if the row is gone.
    async fn save(&self, task: Task) -> Result<Task, AppError>;

    /// Removes a task. Fails with `NotFound` if nothing was deleted.
    async fn delete(&self, id: Uuid) -> Result<(), AppError>;
}
