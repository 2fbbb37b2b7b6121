#![allow(unused)]

// public apis

pub use super::task::Entity as TaskEntity;

pub use super::task::Model as Task;

pub use super::task::ActiveModel as TaskActiveModel;

// private apis
pub(crate) use super::task::Column as TaskColumn;
