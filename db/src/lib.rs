pub mod engine;
pub mod entities;
pub mod schema;

#[cfg(feature = "test")]
pub mod fixtures;
#[cfg(feature = "test")]
pub mod tst;

pub use schema::connect_sqlite;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    SeaOrm(#[from] sea_orm::DbErr),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

pub type DateTime = chrono::DateTime<chrono::Utc>;
