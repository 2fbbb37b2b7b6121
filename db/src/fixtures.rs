//! Test fixtures for task store tests
//!
//! Fluent builders that fill in unique defaults from an atomic counter.
//!
//! This module is only available when the `test` feature is enabled.

use crate::{
    Result,
    engine::NewTask,
    entities::*,
};
use sea_orm::ConnectionTrait;
use std::sync::atomic::{AtomicI64, Ordering};

static TASK_COUNTER: AtomicI64 = AtomicI64::new(1);

fn next_task_n() -> i64 {
    TASK_COUNTER.fetch_add(1, Ordering::SeqCst)
}

pub struct TaskFixture {
    title: Option<String>,
    description: Option<String>,
    completed: bool,
}

pub fn task() -> TaskFixture {
    TaskFixture {
        title: None,
        description: None,
        completed: false,
    }
}

impl TaskFixture {
    pub fn title(
        mut self,
        title: &str,
    ) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn description(
        mut self,
        description: &str,
    ) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn completed(mut self) -> Self {
        self.completed = true;
        self
    }

    pub fn build(self) -> NewTask {
        let n = next_task_n();
        NewTask {
            title: self
                .title
                .unwrap_or_else(|| format!("test task {n}")),
            description: self.description,
            completed: self.completed,
        }
    }

    pub async fn insert<C: ConnectionTrait>(
        self,
        db: &C,
    ) -> Result<Task> {
        Task::create(db, self.build()).await
    }
}

/// Inserts `count` tasks with default titles.
pub async fn tasks<C: ConnectionTrait>(
    db: &C,
    count: usize,
) -> Result<Vec<Task>> {
    let mut inserted = Vec::with_capacity(count);
    for _ in 0..count {
        inserted.push(task().insert(db).await?);
    }
    Ok(inserted)
}
