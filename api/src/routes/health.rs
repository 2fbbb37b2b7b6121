use crate::{deps::Dependencies, models::HealthResponse};
use actix_web::{Responder, get, web};

const HEALTH: &str = "health";

/// Liveness plus a database round trip through the configured session provider
#[utoipa::path(
    tag = HEALTH,
    responses(
        (status = 200, description = "Service is up", body = HealthResponse),
    )
)]
#[get("/health")]
pub async fn health(deps: web::Data<Dependencies>) -> crate::Result<impl Responder> {
    let database = match deps.session().await {
        Ok(session) => {
            match session.conn().ping().await {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!("database ping failed: {e}");
                    false
                },
            }
        },
        Err(e) => {
            tracing::warn!("database session unavailable: {e}");
            false
        },
    };

    Ok(web::Json(HealthResponse {
        status: "ok".into(),
        database,
    }))
}
