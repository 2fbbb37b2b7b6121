use serde::{Deserialize, Deserializer, Serialize};
use taskboard_db::engine::{
    MAX_DESCRIPTION_LENGTH, NewTask, OrderDirection, Page, TaskChanges, TaskFilter,
};
use utoipa::ToSchema;

pub use taskboard_db::entities::Task;

/// Request body for creating a task
#[derive(Serialize, Deserialize, ToSchema, validator::Validate)]
pub struct CreateTaskRequest {
    /// Short summary of the task
    #[validate(length(min = 1, max = 200, message = "title must be 1 to 200 characters"))]
    #[schema(example = "Write release notes")]
    pub title: String,

    /// Optional longer description
    #[validate(length(max = 2000, message = "description must be at most 2000 characters"))]
    pub description: Option<String>,

    /// Whether the task starts out completed (default: false)
    #[serde(default)]
    pub completed: bool,
}

impl From<CreateTaskRequest> for NewTask {
    fn from(req: CreateTaskRequest) -> Self {
        NewTask {
            title: req.title,
            description: req.description,
            completed: req.completed,
        }
    }
}

/// Request body for updating a task. Omitted fields are left unchanged; a
/// `null` description clears it.
#[derive(Serialize, Deserialize, ToSchema, validator::Validate, Default)]
pub struct UpdateTaskRequest {
    #[validate(length(min = 1, max = 200, message = "title must be 1 to 200 characters"))]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,

    pub completed: Option<bool>,
}

/// Distinguishes an explicit `null` from an absent field.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>, {
    Option::<T>::deserialize(deserializer).map(Some)
}

impl UpdateTaskRequest {
    pub fn check_description(&self) -> crate::Result<()> {
        if let Some(Some(description)) = &self.description
            && description.chars().count() > MAX_DESCRIPTION_LENGTH
        {
            return Err(crate::Error::InvalidRequest(format!(
                "description must be at most {MAX_DESCRIPTION_LENGTH} characters"
            )));
        }
        Ok(())
    }
}

impl From<UpdateTaskRequest> for TaskChanges {
    fn from(req: UpdateTaskRequest) -> Self {
        TaskChanges {
            title: req.title,
            description: req.description,
            completed: req.completed,
        }
    }
}

#[derive(Deserialize, Debug, Default)]
pub struct ListTasksQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub completed: Option<bool>,
    pub order: Option<OrderDirection>,
}

impl ListTasksQuery {
    pub fn page(&self) -> Page {
        let default = Page::default();
        Page {
            number: self.page.unwrap_or(default.number),
            size: self.size.unwrap_or(default.size),
        }
    }

    pub fn filter(&self) -> TaskFilter {
        TaskFilter {
            completed: self.completed,
            direction: self.order.unwrap_or_default(),
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct HealthResponse {
    #[schema(example = "ok")]
    pub status: String,
    /// Whether a database session could be opened and the database answered
    pub database: bool,
}
