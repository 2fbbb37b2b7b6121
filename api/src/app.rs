use crate::deps::{ConnectionProvider, Dependencies};
use actix_web::{App, HttpServer, error::JsonPayloadError, web};
use std::sync::Arc;
use utoipa::{Modify, OpenApi, PartialSchema};
use utoipa_actix_web::AppExt;
use utoipa_redoc::{Redoc, Servable};

use crate::routes::*;

#[derive(OpenApi)]
#[openapi(
    tags(
        (name = "taskboard", description = "Taskboard API")
    ),
    modifiers(&SharedErrorsAddon),
)]
pub struct ApiDoc;

struct SharedErrorsAddon;

impl Modify for SharedErrorsAddon {
    fn modify(
        &self,
        openapi: &mut utoipa::openapi::OpenApi,
    ) {
        let components = openapi
            .components
            .get_or_insert_with(Default::default);
        components
            .schemas
            .insert("ErrorResponse".into(), crate::ErrorResponse::schema());
    }
}

/// Maps extractor failures (bad JSON bodies, bad query strings, bad path
/// segments) onto the API's error shape.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        match err {
            JsonPayloadError::Deserialize(err) => crate::Error::Json(err),
            err => crate::Error::InvalidRequest(format!("invalid json body: {err}")),
        }
        .into()
    })
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        crate::Error::InvalidRequest(format!("invalid query string: {err}")).into()
    })
}

pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req| {
        crate::Error::InvalidRequest(format!("invalid path: {err}")).into()
    })
}

#[macro_export]
macro_rules! bind_app {
    (
        $deps: ident,
    ) => {
        move || {
            App::new()
                .into_utoipa_app()
                .openapi(ApiDoc::openapi())
                .app_data($deps.clone())
                .app_data($crate::app::json_config())
                .app_data($crate::app::query_config())
                .app_data($crate::app::path_config())
                // Health
                .service(health::health)
                // Task routes
                .service(tasks::list_tasks)
                .service(tasks::create_task)
                .service(tasks::get_task)
                .service(tasks::update_task)
                .service(tasks::delete_task)
                // Docs
                .openapi_service(|api| Redoc::with_url("/redoc", api))
                .into_app()
        }
    };
}

pub async fn start_server(config: crate::config::Config) -> crate::Result<()> {
    let conn = config.database.connect().await?;

    if config.database.migrate {
        taskboard_db::schema::create_all(&conn).await?;
    }

    let deps = web::Data::from(Arc::new(Dependencies::new(Arc::new(
        ConnectionProvider::new(conn.clone()),
    ))));
    let addr = config.addr;

    tracing::info!("starting server on http://{addr}");

    let server = HttpServer::new(bind_app!(deps,))
        .bind(&addr)?
        .run();

    let server_exit = server.await;

    if let Err(e) = conn.close().await {
        tracing::warn!("failed to close database connection: {e}");
    }

    Ok(server_exit?)
}
