use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use uuid::Uuid;

use super::{TaskStore, UserStore};
use crate::error::AppError;
use crate::models::{Task, TaskStatus, User};

// A poisoned lock means a writer panicked mid-operation; surface it as a server error.
fn read<T>(lock: &RwLock<T>) -> Result<RwLockReadGuard<'_, T>, AppError> {
    lock.read()
        .map_err(|_| AppError::Internal("store lock poisoned".into()))
}

fn write<T>(lock: &RwLock<T>) -> Result<RwLockWriteGuard<'_, T>, AppError> {
    lock.write()
        .map_err(|_| AppError::Internal("store lock poisoned".into()))
}

/// Users keyed by username.
#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<String, User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn exists_by_username(&self, username: &str) -> Result<bool, AppError> {
        Ok(read(&self.users)?.contains_key(username))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        Ok(read(&self.users)?.get(username).cloned())
    }

    async fn insert(&self, user: User) -> Result<User, AppError> {
        let mut users = write(&self.users)?;
        if users.contains_key(&user.username) {
            return Err(AppError::DuplicateUsername(user.username));
        }
        users.insert(user.username.clone(), user.clone());
        Ok(user)
    }
}

/// Tasks kept in insertion order.
#[derive(Default)]
pub struct MemoryTaskStore {
    tasks: RwLock<Vec<Task>>,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn insert(&self, task: Task) -> Result<Task, AppError> {
        write(&self.tasks)?.push(task.clone());
        Ok(task)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Task>, AppError> {
        Ok(read(&self.tasks)?.iter().find(|t| t.id == id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Task>, AppError> {
        Ok(read(&self.tasks)?.clone())
    }

    async fn find_all_by_status(&self, status: TaskStatus) -> Result<Vec<Task>, AppError> {
        Ok(read(&self.tasks)?
            .iter()
            .filter(|t| t.status == status)
            .cloned()
            .collect())
    }

    async fn save(&self, task: Task) -> Result<Task, AppError> {
        let mut tasks = write(&self.tasks)?;
        match tasks.iter_mut().find(|t| t.id == task.id) {
            Some(slot) => {
                *slot = task.clone();
                Ok(task)
            }
            None => Err(AppError::task_not_found(task.id)),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let mut tasks = write(&self.tasks)?;
        let before = tasks.len();
        tasks.retain(|t| t.id != id);
        if tasks.len() == before {
            return Err(AppError::task_not_found(id));
        }
        Ok(())
    }
}
