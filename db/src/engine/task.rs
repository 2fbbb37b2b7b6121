use crate::{
    Error, Result,
    engine::{OrderDirection, Page, Paginated},
    entities::*,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, Order, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use validator::Validate;

pub const MAX_TITLE_LENGTH: usize = 200;
pub const MAX_DESCRIPTION_LENGTH: usize = 2000;

#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
}

impl NewTask {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            completed: false,
        }
    }
}

/// Partial update. `None` leaves the column untouched; for `description`,
/// `Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub completed: Option<bool>,
}

impl TaskChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.completed.is_none()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TaskFilter {
    pub completed: Option<bool>,
    pub direction: OrderDirection,
}

fn normalize_title(title: &str) -> Result<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(Error::Validation("Task title must not be blank".into()));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(Error::Validation(format!(
            "Task title must be at most {MAX_TITLE_LENGTH} characters"
        )));
    }
    Ok(title.to_string())
}

fn check_description(description: &Option<String>) -> Result<()> {
    match description {
        Some(text) if text.chars().count() > MAX_DESCRIPTION_LENGTH => {
            Err(Error::Validation(format!(
                "Task description must be at most {MAX_DESCRIPTION_LENGTH} characters"
            )))
        },
        _ => Ok(()),
    }
}

impl Task {
    pub async fn by_id<C: ConnectionTrait>(
        db: &C,
        task_id: i64,
    ) -> Result<Option<Self>> {
        TaskEntity::find_by_id(task_id)
            .one(db)
            .await
            .map_err(Into::into)
    }

    pub async fn get<C: ConnectionTrait>(
        db: &C,
        task_id: i64,
    ) -> Result<Self> {
        Self::by_id(db, task_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Task with id {task_id} not found")))
    }

    pub async fn list<C: ConnectionTrait>(
        db: &C,
        page: Page,
        filter: TaskFilter,
    ) -> Result<Paginated<Self>> {
        page.validate()
            .map_err(|e| Error::Validation(format!("Invalid page: {e}")))?;

        if page.offset().is_none() {
            return Err(Error::Validation(format!(
                "Invalid page: page {} of size {} is out of range",
                page.number, page.size
            )));
        }

        let order = match filter.direction {
            OrderDirection::Asc => Order::Asc,
            OrderDirection::Desc => Order::Desc,
        };

        let mut query = TaskEntity::find()
            .order_by(TaskColumn::CreatedAt, order.clone())
            .order_by(TaskColumn::Id, order);

        if let Some(completed) = filter.completed {
            query = query.filter(TaskColumn::Completed.eq(completed));
        }

        let paginator = query.paginate(db, page.size as u64);

        let (items, total_items) = tokio::try_join!(
            paginator.fetch_page(page.number.saturating_sub(1) as u64),
            paginator.num_items()
        )?;

        Ok(Paginated::new(items, page, total_items))
    }

    pub async fn create<C: ConnectionTrait>(
        db: &C,
        task: NewTask,
    ) -> Result<Self> {
        let title = normalize_title(&task.title)?;
        check_description(&task.description)?;

        let now = Utc::now();
        let active_model = TaskActiveModel {
            id: NotSet,
            title: Set(title),
            description: Set(task.description),
            completed: Set(task.completed),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let task = active_model.insert(db).await?;
        tracing::debug!(task_id = task.id, "created task");
        Ok(task)
    }

    pub async fn update<C: ConnectionTrait>(
        db: &C,
        task_id: i64,
        changes: TaskChanges,
    ) -> Result<Self> {
        let task = Self::get(db, task_id).await?;

        if changes.is_empty() {
            return Ok(task);
        }

        let mut active_model: TaskActiveModel = task.into();
        if let Some(title) = changes.title {
            active_model.title = Set(normalize_title(&title)?);
        }
        if let Some(description) = changes.description {
            check_description(&description)?;
            active_model.description = Set(description);
        }
        if let Some(completed) = changes.completed {
            active_model.completed = Set(completed);
        }
        active_model.updated_at = Set(Utc::now());

        active_model
            .update(db)
            .await
            .map_err(Into::into)
    }

    pub async fn delete<C: ConnectionTrait>(
        db: &C,
        task_id: i64,
    ) -> Result<()> {
        let result = TaskEntity::delete_by_id(task_id)
            .exec(db)
            .await?;

        if result.rows_affected == 0 {
            return Err(Error::NotFound(format!(
                "Task with id {task_id} not found"
            )));
        }

        tracing::debug!(task_id, "deleted task");
        Ok(())
    }

    pub async fn count<C: ConnectionTrait>(db: &C) -> Result<u64> {
        Ok(TaskEntity::find().count(db).await?)
    }

    pub async fn delete_all<C: ConnectionTrait>(db: &C) -> Result<u64> {
        let result = TaskEntity::delete_many()
            .exec(db)
            .await?;
        Ok(result.rows_affected)
    }
}
