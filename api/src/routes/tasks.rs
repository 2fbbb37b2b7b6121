use crate::{
    deps::Db,
    models::{CreateTaskRequest, ListTasksQuery, Task, UpdateTaskRequest},
};
use actix_web::{HttpResponse, Responder, delete, get, post, put, web};
use taskboard_db::engine::Paginated;
use validator::Validate;

const TASKS: &str = "tasks";

/// List tasks, newest first unless `order=asc`
#[utoipa::path(
    tag = TASKS,
    params(
        ("page" = Option<i64>, Query, description = "Page number (default: 1)"),
        ("size" = Option<i64>, Query, description = "Page size (default: 20, max: 100)"),
        ("completed" = Option<bool>, Query, description = "Only tasks with this completion state"),
        ("order" = Option<taskboard_db::engine::OrderDirection>, Query, description = "Creation order (default: desc)"),
    ),
    responses(
        (status = 200, description = "Tasks retrieved successfully", body = Paginated<Task>),
        (status = 400, description = "Invalid query parameters", body = crate::ErrorResponse),
    )
)]
#[get("/tasks")]
pub async fn list_tasks(
    query: web::Query<ListTasksQuery>,
    db: Db,
) -> crate::Result<impl Responder> {
    let page = query.page();
    page.validate()?;

    let tasks = Task::list(db.conn(), page, query.filter()).await?;
    Ok(web::Json(tasks))
}

/// Create a task
#[utoipa::path(
    tag = TASKS,
    request_body = CreateTaskRequest,
    responses(
        (status = 201, description = "Task created successfully", body = Task),
        (status = 400, description = "Invalid task", body = crate::ErrorResponse),
    )
)]
#[post("/tasks")]
pub async fn create_task(
    body: web::Json<CreateTaskRequest>,
    db: Db,
) -> crate::Result<impl Responder> {
    body.validate()?;

    let task = Task::create(db.conn(), body.into_inner().into()).await?;
    Ok(HttpResponse::Created().json(task))
}

/// Get a task by id
#[utoipa::path(
    tag = TASKS,
    params(
        ("id" = i64, Path, description = "Task id"),
    ),
    responses(
        (status = 200, description = "Task found", body = Task),
        (status = 404, description = "Task not found", body = crate::ErrorResponse),
    )
)]
#[get("/tasks/{id}")]
pub async fn get_task(
    path: web::Path<i64>,
    db: Db,
) -> crate::Result<impl Responder> {
    let task = Task::get(db.conn(), path.into_inner()).await?;
    Ok(web::Json(task))
}

/// Update a task; omitted fields keep their value
#[utoipa::path(
    tag = TASKS,
    params(
        ("id" = i64, Path, description = "Task id"),
    ),
    request_body = UpdateTaskRequest,
    responses(
        (status = 200, description = "Task updated successfully", body = Task),
        (status = 400, description = "Invalid update", body = crate::ErrorResponse),
        (status = 404, description = "Task not found", body = crate::ErrorResponse),
    )
)]
#[put("/tasks/{id}")]
pub async fn update_task(
    path: web::Path<i64>,
    body: web::Json<UpdateTaskRequest>,
    db: Db,
) -> crate::Result<impl Responder> {
    body.validate()?;
    body.check_description()?;

    let task = Task::update(db.conn(), path.into_inner(), body.into_inner().into()).await?;
    Ok(web::Json(task))
}

/// Delete a task
#[utoipa::path(
    tag = TASKS,
    params(
        ("id" = i64, Path, description = "Task id"),
    ),
    responses(
        (status = 204, description = "Task deleted successfully"),
        (status = 404, description = "Task not found", body = crate::ErrorResponse),
    )
)]
#[delete("/tasks/{id}")]
pub async fn delete_task(
    path: web::Path<i64>,
    db: Db,
) -> crate::Result<impl Responder> {
    Task::delete(db.conn(), path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
