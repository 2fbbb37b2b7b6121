use actix_web::ResponseError;
use std::collections::HashMap;
use utoipa::ToSchema;

pub mod app;
pub mod config;
pub mod deps;
pub mod models;
pub mod routes;

pub use deps::{
    ConnectionProvider, Db, DbSession, Dependencies, Dependency, OverrideGuard, SessionProvider,
};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("database error: {0:?}")]
    Database(#[from] taskboard_db::Error),

    #[error("database connection error: {0:?}")]
    SeaOrm(#[from] sea_orm::DbErr),

    #[error("missing `web::Data<{data}>`")]
    MissingData { data: String },

    #[error("unknown json error: {0:?}")]
    Json(#[from] serde_json::Error),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("io error: {0:?}")]
    IoError(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("dependency `{dependency:?}` is not available: {reason}")]
    Unavailable {
        dependency: Dependency,
        reason: String,
    },

    #[error("an override for `{dependency:?}` is already installed")]
    OverrideActive { dependency: Dependency },

    #[error("validation errors found")]
    ValidationErrors(#[from] validator::ValidationErrors),
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(serde::Serialize, serde::Deserialize, ToSchema, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PublicErrorType {
    InternalServerError,

    NotFound,

    ServiceUnavailable,

    Validation,
}

#[derive(serde::Serialize, serde::Deserialize, ToSchema, Debug)]
pub struct ErrorResponse {
    pub error: PublicErrorType,
    pub error_description: Option<String>,
    pub validation: Option<HashMap<String, Vec<String>>>,
}

impl ErrorResponse {
    fn internal() -> Self {
        Self {
            error: PublicErrorType::InternalServerError,
            error_description: None,
            validation: None,
        }
    }
}

impl Error {
    pub(crate) fn missing_data(data: impl Into<String>) -> Self {
        Error::MissingData { data: data.into() }
    }

    pub(crate) fn unavailable(
        dependency: Dependency,
        reason: impl Into<String>,
    ) -> Self {
        Error::Unavailable {
            dependency,
            reason: reason.into(),
        }
    }

    fn to_error_response(&self) -> ErrorResponse {
        tracing::error!("Handling error: {:?}", self);
        match self {
            Error::ValidationErrors(err) => {
                let mut validation = HashMap::new();

                for (field, errors) in err.field_errors().iter() {
                    let messages: Vec<String> = errors
                        .iter()
                        .map(|e| {
                            if let Some(message) = &e.message {
                                message.to_string()
                            } else {
                                format!("validation error on {}", field)
                            }
                        })
                        .collect();
                    validation.insert(field.to_string(), messages);
                }

                ErrorResponse {
                    error: PublicErrorType::Validation,
                    error_description: Some("Validation errors found".to_string()),
                    validation: Some(validation),
                }
            },
            Error::Json(err) => {
                ErrorResponse {
                    error: PublicErrorType::Validation,
                    error_description: Some(format!("Invalid JSON: {err}")),
                    validation: None,
                }
            },
            Error::InvalidRequest(msg) => {
                ErrorResponse {
                    error: PublicErrorType::Validation,
                    error_description: Some(msg.clone()),
                    validation: None,
                }
            },
            Error::Database(taskboard_db::Error::Validation(msg)) => {
                ErrorResponse {
                    error: PublicErrorType::Validation,
                    error_description: Some(msg.clone()),
                    validation: None,
                }
            },
            Error::Database(taskboard_db::Error::NotFound(msg)) => {
                ErrorResponse {
                    error: PublicErrorType::NotFound,
                    error_description: Some(msg.clone()),
                    validation: None,
                }
            },
            Error::Unavailable { reason, .. } => {
                ErrorResponse {
                    error: PublicErrorType::ServiceUnavailable,
                    error_description: Some(reason.clone()),
                    validation: None,
                }
            },
            _ => ErrorResponse::internal(),
        }
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> actix_web::http::StatusCode {
        match self {
            Error::Json(_) | Error::InvalidRequest(_) | Error::ValidationErrors(_) => {
                actix_web::http::StatusCode::BAD_REQUEST
            },
            Error::Database(taskboard_db::Error::Validation(..)) => {
                actix_web::http::StatusCode::BAD_REQUEST
            },
            Error::Database(taskboard_db::Error::NotFound(..)) => {
                actix_web::http::StatusCode::NOT_FOUND
            },
            Error::Unavailable { .. } => actix_web::http::StatusCode::SERVICE_UNAVAILABLE,
            Error::Database(_) | Error::SeaOrm(_) => {
                actix_web::http::StatusCode::INTERNAL_SERVER_ERROR
            },
            Error::IoError(_)
            | Error::Config(_)
            | Error::MissingData { .. }
            | Error::OverrideActive { .. } => actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> actix_web::HttpResponse<actix_web::body::BoxBody> {
        let response = self.to_error_response();
        actix_web::HttpResponse::build(self.status_code()).json(response)
    }
}
