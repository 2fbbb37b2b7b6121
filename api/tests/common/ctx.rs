//! Test context - one reset store routed into the app for a single test

use actix_web::{App, dev::ServiceResponse, test, web};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use taskboard_api::{
    ConnectionProvider, Dependencies, Dependency, OverrideGuard,
    app::ApiDoc,
    bind_app,
    routes::{health, tasks},
};
use taskboard_db::tst::TestStore;
use tokio::sync::MutexGuard;
use utoipa::OpenApi;
use utoipa_actix_web::AppExt;
use utoipa_redoc::{Redoc, Servable};

use super::{RequestBuilder, SERIAL, session_app, session_store};

/// Test context providing an empty store and an app whose database sessions
/// come from it.
///
/// Holding a `TestCtx` holds the process-wide serial lock. Dropping it
/// removes the override first, then releases the lock, so the next test
/// never sees this test's override.
pub struct TestCtx {
    pub store: &'static TestStore,
    pub app: Arc<Dependencies>,
    pub provider: Arc<ConnectionProvider>,
    _override: OverrideGuard,
    _serial: MutexGuard<'static, ()>,
}

impl TestCtx {
    /// Create a context over the shared application object
    pub async fn new() -> Self {
        Self::with_app(session_app()).await
    }

    /// Create a context over a caller-owned application object
    pub async fn with_app(app: Arc<Dependencies>) -> Self {
        taskboard_testing::logging();

        let serial = SERIAL.lock().await;
        let store = session_store().await;

        store
            .reset()
            .await
            .expect("failed to reset test store");

        let provider = Arc::new(ConnectionProvider::new(store.conn().clone()));
        let guard = app
            .install_override(Dependency::Database, provider.clone())
            .expect("failed to install database override");

        Self {
            store,
            app,
            provider,
            _override: guard,
            _serial: serial,
        }
    }

    /// Get database connection
    pub fn conn(&self) -> &DatabaseConnection {
        self.store.conn()
    }

    /// Build the actix-web test service over this context's app
    pub async fn service(
        &self
    ) -> impl actix_web::dev::Service<
        actix_http::Request,
        Response = ServiceResponse,
        Error = actix_web::Error,
    > {
        service(&self.app).await
    }
}

/// Build the actix-web test service over `app` using the bind_app! macro
pub async fn service(
    app: &Arc<Dependencies>
) -> impl actix_web::dev::Service<
    actix_http::Request,
    Response = ServiceResponse,
    Error = actix_web::Error,
> {
    let deps = web::Data::from(app.clone());
    test::init_service(bind_app!(deps,)()).await
}

// Convenience methods for making requests
impl TestCtx {
    /// Start a GET request builder
    pub fn get<'a>(
        &'a self,
        path: &str,
    ) -> RequestBuilder<'a> {
        RequestBuilder::get(&self.app, path)
    }

    /// Start a POST request builder
    pub fn post<'a>(
        &'a self,
        path: &str,
    ) -> RequestBuilder<'a> {
        RequestBuilder::post(&self.app, path)
    }

    /// Start a DELETE request builder
    pub fn delete<'a>(
        &'a self,
        path: &str,
    ) -> RequestBuilder<'a> {
        RequestBuilder::delete(&self.app, path)
    }

    /// Start a PUT request builder
    pub fn put<'a>(
        &'a self,
        path: &str,
    ) -> RequestBuilder<'a> {
        RequestBuilder::put(&self.app, path)
    }
}
