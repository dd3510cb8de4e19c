use std::sync::Arc;

use uuid::Uuid;

use crate::error::AppError;
use crate::models::{NewTask, Task, TaskChanges, TaskStatus};
use crate::store::TaskStore;

/// CRUD over tasks.
///
/// Callers are expected to have validated titles and status labels already;
/// the only input this service parses itself is the list filter.
#[derive(Clone)]
pub struct TaskService {
    store: Arc<dyn TaskStore>,
}

impl TaskService {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }

    pub async fn create_task(&self, input: NewTask) -> Result<Task, AppError> {
        let task = self.store.insert(Task::new(input)).await?;
        log::info!("Created task {} ({})", task.id, task.status);
        Ok(task)
    }

    /// Lists tasks in insertion order, optionally only those with the given status.
    ///
    /// The filter is matched case-insensitively; a label that names no status
    /// fails with `AppError::InvalidStatusFilter`.
    pub async fn list_tasks(&self, status_filter: Option<&str>) -> Result<Vec<Task>, AppError> {
        match status_filter {
            None => self.store.find_all().await,
            Some(raw) => {
                let status: TaskStatus = raw
                    .parse()
                    .map_err(|_| AppError::InvalidStatusFilter(raw.to_string()))?;
                log::debug!("Listing tasks with status {}", status);
                self.store.find_all_by_status(status).await
            }
        }
    }

    pub async fn get_task(&self, id: Uuid) -> Result<Task, AppError> {
        log::debug!("Fetching task {}", id);
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::task_not_found(id))
    }

    /// Applies a partial update.
    ///
    /// - `title` is replaced only by a present, non-blank value.
    /// - `description` is always replaced, so `None` clears it.
    /// - `status` is replaced when present.
    pub async fn update_task(&self, id: Uuid, changes: TaskChanges) -> Result<Task, AppError> {
        let mut task = self.get_task(id).await?;
        apply_changes(&mut task, changes);
        let task = self.store.save(task).await?;
        log::info!("Updated task {}", task.id);
        Ok(task)
    }

    pub async fn delete_task(&self, id: Uuid) -> Result<(), AppError> {
        let task = self.get_task(id).await?;
        self.store.delete(task.id).await?;
        log::info!("Deleted task {}", id);
        Ok(())
    }
}

fn apply_changes(task: &mut Task, changes: TaskChanges) {
    if let Some(title) = changes.title.filter(|t| !t.trim().is_empty()) {
        task.title = title;
    }
    task.description = changes.description;
    if let Some(status) = changes.status {
        task.status = status;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryTaskStore;
    use pretty_assertions::assert_eq;

    fn service() -> TaskService {
        TaskService::new(Arc::new(MemoryTaskStore::new()))
    }

    fn new_task(title: &str) -> NewTask {
        NewTask {
            title: title.to_string(),
            ..Default::default()
        }
    }

    #[actix_rt::test]
    async fn test_create_defaults_status_to_pending() {
        let tasks = service();
        let task = tasks.create_task(new_task("Buy milk")).await.unwrap();

        assert_eq!(task.title, "Buy milk");
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(tasks.get_task(task.id).await.unwrap(), task);
    }

    #[actix_rt::test]
    async fn test_create_keeps_explicit_status() {
        let tasks = service();
        let task = tasks
            .create_task(NewTask {
                title: "Ship it".into(),
                description: Some("today".into()),
                status: Some(TaskStatus::InProgress),
            })
            .await
            .unwrap();

        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.description.as_deref(), Some("today"));
    }

    #[actix_rt::test]
    async fn test_list_filters_case_insensitively() {
        let tasks = service();
        let milk = tasks.create_task(new_task("Buy milk")).await.unwrap();
        let done = tasks
            .create_task(NewTask {
                title: "Done already".into(),
                description: None,
                status: Some(TaskStatus::Completed),
            })
            .await
            .unwrap();

        for filter in ["pending", "PENDING", "Pending"] {
            let listed = tasks.list_tasks(Some(filter)).await.unwrap();
            assert_eq!(listed, vec![milk.clone()]);
        }

        let all = tasks.list_tasks(None).await.unwrap();
        assert_eq!(all, vec![milk, done]);
    }

    #[actix_rt::test]
    async fn test_list_rejects_unknown_filter() {
        let tasks = service();
        match tasks.list_tasks(Some("bogus")).await {
            Err(AppError::InvalidStatusFilter(value)) => assert_eq!(value, "bogus"),
            other => panic!("expected InvalidStatusFilter, got {:?}", other),
        }
    }

    #[actix_rt::test]
    async fn test_update_blank_title_is_ignored_but_description_is_set() {
        let tasks = service();
        let task = tasks
            .create_task(NewTask {
                title: "Original".into(),
                description: Some("old".into()),
                status: None,
            })
            .await
            .unwrap();

        let updated = tasks
            .update_task(
                task.id,
                TaskChanges {
                    title: Some(String::new()),
                    description: Some("x".into()),
                    status: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "Original");
        assert_eq!(updated.description.as_deref(), Some("x"));
        assert_eq!(updated.status, TaskStatus::Pending);
    }

    #[actix_rt::test]
    async fn test_update_absent_description_clears_it() {
        let tasks = service();
        let task = tasks
            .create_task(NewTask {
                title: "Keep".into(),
                description: Some("to be cleared".into()),
                status: None,
            })
            .await
            .unwrap();

        let updated = tasks
            .update_task(
                task.id,
                TaskChanges {
                    title: Some("   ".into()),
                    description: None,
                    status: Some(TaskStatus::Completed),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "Keep");
        assert_eq!(updated.description, None);
        assert_eq!(updated.status, TaskStatus::Completed);
        assert_eq!(tasks.get_task(task.id).await.unwrap(), updated);
    }

    #[actix_rt::test]
    async fn test_status_transitions_are_unrestricted() {
        let tasks = service();
        let task = tasks.create_task(new_task("Loop")).await.unwrap();

        for status in [TaskStatus::Completed, TaskStatus::Pending, TaskStatus::InProgress] {
            let updated = tasks
                .update_task(
                    task.id,
                    TaskChanges {
                        status: Some(status),
                        ..Default::default()
                    },
                )
                .await
                .unwrap();
            assert_eq!(updated.status, status);
        }
    }

    #[actix_rt::test]
    async fn test_missing_task_is_not_found() {
        let tasks = service();
        let id = Uuid::new_v4();

        assert!(matches!(tasks.get_task(id).await, Err(AppError::NotFound { .. })));
        assert!(matches!(
            tasks.update_task(id, TaskChanges::default()).await,
            Err(AppError::NotFound { .. })
        ));
        assert!(matches!(tasks.delete_task(id).await, Err(AppError::NotFound { .. })));
    }

    #[actix_rt::test]
    async fn test_delete_then_get_is_not_found() {
        let tasks = service();
        let task = tasks.create_task(new_task("Temporary")).await.unwrap();

        tasks.delete_task(task.id).await.unwrap();

        match tasks.get_task(task.id).await {
            Err(AppError::NotFound { entity, id }) => {
                assert_eq!(entity, "Task");
                assert_eq!(id, task.id.to_string());
            }
            other => panic!("expected NotFound, got {:?}", other),
        }
    }
}
