use crate::{
    error::AppError,
    models::{CreateTaskRequest, TaskQuery, UpdateTaskRequest},
    services::TaskService,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use uuid::Uuid;

/// Retrieves all tasks, optionally filtered by status.
///
/// These routes are open: no token is required.
///
/// ## Query Parameters:
/// - `status` (optional): `pending`, `in_progress` or `completed`, any case.
///
/// ## Responses:
/// - `200 OK`: JSON array of `Task` objects in creation order.
/// - `400 Bad Request`: If `status` names no task status.
#[get("")]
pub async fn get_tasks(
    tasks: web::Data<TaskService>,
    query_params: web::Query<TaskQuery>,
) -> Result<impl Responder, AppError> {
    let list = tasks.list_tasks(query_params.status.as_deref()).await?;
    Ok(HttpResponse::Ok().json(list))
}

/// Creates a new task.
///
/// ## Request Body:
/// - `title`: required, not blank, at most 200 characters.
/// - `description` (optional): at most 1000 characters.
/// - `status` (optional): status label, defaults to `PENDING`.
///
/// ## Responses:
/// - `201 Created`: the stored `Task`.
/// - `400 Bad Request`: validation failure or malformed JSON.
#[post("")]
pub async fn create_task(
    tasks: web::Data<TaskService>,
    task_data: web::Json<CreateTaskRequest>,
) -> Result<impl Responder, AppError> {
    let new_task = task_data.into_inner().into_new_task()?;
    let task = tasks.create_task(new_task).await?;
    Ok(HttpResponse::Created().json(task))
}

#[get("/{id}")]
pub async fn get_task(
    tasks: web::Data<TaskService>,
    task_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let task = tasks.get_task(task_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Partially updates a task.
///
/// A blank or missing `title` leaves the title alone. `description` is always
/// replaced, so leaving it out clears it. `status` is replaced when given.
///
/// ## Responses:
/// - `200 OK`: the updated `Task`.
/// - `400 Bad Request`: validation failure.
/// - `404 Not Found`: no task with that id.
#[put("/{id}")]
pub async fn update_task(
    tasks: web::Data<TaskService>,
    task_id: web::Path<Uuid>,
    task_data: web::Json<UpdateTaskRequest>,
) -> Result<impl Responder, AppError> {
    let changes = task_data.into_inner().into_changes()?;
    let task = tasks.update_task(task_id.into_inner(), changes).await?;
    Ok(HttpResponse::Ok().json(task))
}

#[delete("/{id}")]
pub async fn delete_task(
    tasks: web::Data<TaskService>,
    task_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    tasks.delete_task(task_id.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
