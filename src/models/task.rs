use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::error::AppError;

/// Represents the status of a task.
/// Corresponds to the `task_status` SQL enum.
///
/// Labels are upper case on output and matched case-insensitively on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "String")]
pub enum TaskStatus {
    /// Task is yet to be started.
    #[default]
    Pending,
    /// Task is currently being worked on.
    InProgress,
    /// Task is completed.
    Completed,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [
        TaskStatus::Pending,
        TaskStatus::InProgress,
        TaskStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "PENDING",
            TaskStatus::InProgress => "IN_PROGRESS",
            TaskStatus::Completed => "COMPLETED",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no `TaskStatus`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown task status '{0}', expected one of PENDING, IN_PROGRESS, COMPLETED")]
pub struct ParseTaskStatusError(pub String);

impl FromStr for TaskStatus {
    type Err = ParseTaskStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseTaskStatusError(s.to_string()))
    }
}

impl TryFrom<String> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Represents a task entity as stored and returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Task {
    /// Unique identifier for the task (UUID v4).
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
}

/// Everything needed to create a task. `status` falls back to `TaskStatus::Pending`.
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
}

/// A partial update. See `TaskService::update_task` for how each field is applied.
#[derive(Debug, Clone, Default)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
}

impl Task {
    /// Creates a new `Task` with a fresh id.
    pub fn new(input: NewTask) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: input.title,
            description: input.description,
            status: input.status.unwrap_or_default(),
        }
    }
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some("must not be blank".into());
        return Err(error);
    }
    Ok(())
}

fn parse_status(status: Option<&str>) -> Result<Option<TaskStatus>, AppError> {
    status
        .map(|s| {
            s.parse::<TaskStatus>()
                .map_err(|e| AppError::validation("status", e.to_string()))
        })
        .transpose()
}

/// Request body for `POST /api/tasks`.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// Must not be blank and at most 200 characters.
    #[serde(default)]
    #[validate(length(max = 200), custom = "validate_not_blank")]
    pub title: String,

    /// Maximum length of 1000 characters if provided.
    #[validate(length(max = 1000))]
    pub description: Option<String>,

    /// Status label, case-insensitive. Defaults to PENDING.
    pub status: Option<String>,
}

impl CreateTaskRequest {
    /// Validates the request and converts it into a `NewTask`.
    pub fn into_new_task(self) -> Result<NewTask, AppError> {
        self.validate()?;
        let status = parse_status(self.status.as_deref())?;
        Ok(NewTask {
            title: self.title,
            description: self.description,
            status,
        })
    }
}

/// Request body for `PUT /api/tasks/{id}`. Every field is optional.
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    #[validate(length(max = 200))]
    pub title: Option<String>,

    #[validate(length(max = 1000))]
    pub description: Option<String>,

    pub status: Option<String>,
}

impl UpdateTaskRequest {
    /// Validates the request and converts it into `TaskChanges`.
    pub fn into_changes(self) -> Result<TaskChanges, AppError> {
        self.validate()?;
        let status = parse_status(self.status.as_deref())?;
        Ok(TaskChanges {
            title: self.title,
            description: self.description,
            status,
        })
    }
}

/// Query parameters for `GET /api/tasks`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct TaskQuery {
    /// Status label to filter by, matched case-insensitively.
    pub status: Option<String>,
}
