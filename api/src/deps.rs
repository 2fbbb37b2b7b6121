//! Request-scoped dependencies.
//!
//! Handlers never reach for a connection directly. They extract [`Db`], which
//! asks the application's [`Dependencies`] for a [`DbSession`]. A provider can
//! be swapped for a single scope with [`Dependencies::install_override`]; the
//! returned [`OverrideGuard`] removes it again when dropped, including while
//! unwinding from a panic.

use actix_web::{FromRequest, web};
use dashmap::{DashMap, mapref::entry::Entry};
use sea_orm::DatabaseConnection;
use std::{
    future::Future,
    pin::Pin,
    sync::{
        Arc,
        atomic::{AtomicU64, AtomicUsize, Ordering},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Dependency {
    /// Database sessions handed to request handlers.
    Database,
}

pub type SessionFuture<'a> =
    Pin<Box<dyn Future<Output = crate::Result<DbSession>> + Send + 'a>>;

/// Something that can open a database session.
pub trait SessionProvider: Send + Sync {
    fn open(&self) -> SessionFuture<'_>;
}

static SESSION_IDS: AtomicU64 = AtomicU64::new(1);
static OVERRIDE_IDS: AtomicU64 = AtomicU64::new(1);

/// One unit of work against the database.
///
/// The session is released when dropped, so a handler that returns early or
/// fails still gives it back.
pub struct DbSession {
    id: u64,
    conn: DatabaseConnection,
    live: Arc<AtomicUsize>,
}

impl DbSession {
    fn open(
        conn: DatabaseConnection,
        live: Arc<AtomicUsize>,
    ) -> Self {
        let id = SESSION_IDS.fetch_add(1, Ordering::Relaxed);
        live.fetch_add(1, Ordering::SeqCst);
        tracing::trace!(session = id, "opened database session");
        Self { id, conn, live }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn conn(&self) -> &DatabaseConnection {
        &self.conn
    }
}

impl std::ops::Deref for DbSession {
    type Target = DatabaseConnection;

    fn deref(&self) -> &Self::Target {
        &self.conn
    }
}

impl Drop for DbSession {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
        tracing::trace!(session = self.id, "closed database session");
    }
}

impl std::fmt::Debug for DbSession {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("DbSession")
            .field("id", &self.id)
            .finish()
    }
}

/// Hands out sessions over a shared connection pool and counts how many are
/// currently open.
pub struct ConnectionProvider {
    conn: DatabaseConnection,
    live: Arc<AtomicUsize>,
}

impl ConnectionProvider {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self {
            conn,
            live: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn conn(&self) -> &DatabaseConnection {
        &self.conn
    }

    pub fn live_sessions(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }
}

impl SessionProvider for ConnectionProvider {
    fn open(&self) -> SessionFuture<'_> {
        Box::pin(async move { Ok(DbSession::open(self.conn.clone(), self.live.clone())) })
    }
}

/// Default provider of an application built without a database.
pub struct UnconfiguredProvider;

impl SessionProvider for UnconfiguredProvider {
    fn open(&self) -> SessionFuture<'_> {
        Box::pin(async {
            Err(crate::Error::unavailable(
                Dependency::Database,
                "no database is configured",
            ))
        })
    }
}

struct Installed {
    id: u64,
    provider: Arc<dyn SessionProvider>,
}

/// The application's dependency table: a default provider per dependency plus
/// any active overrides.
pub struct Dependencies {
    database: Arc<dyn SessionProvider>,
    overrides: DashMap<Dependency, Installed>,
}

impl Dependencies {
    pub fn new(database: Arc<dyn SessionProvider>) -> Self {
        Self {
            database,
            overrides: DashMap::new(),
        }
    }

    pub fn unconfigured() -> Self {
        Self::new(Arc::new(UnconfiguredProvider))
    }

    /// The provider currently serving `dependency`: the override if one is
    /// installed, the default otherwise.
    pub fn provider(
        &self,
        dependency: Dependency,
    ) -> Arc<dyn SessionProvider> {
        if let Some(installed) = self.overrides.get(&dependency) {
            return installed.provider.clone();
        }

        match dependency {
            Dependency::Database => self.database.clone(),
        }
    }

    pub async fn session(&self) -> crate::Result<DbSession> {
        // the map ref must not be held across the await
        let provider = self.provider(Dependency::Database);
        provider.open().await
    }

    /// Routes `dependency` to `provider` until the returned guard is dropped.
    ///
    /// Overrides do not nest: installing a second one for the same dependency
    /// fails with [`crate::Error::OverrideActive`].
    pub fn install_override(
        self: &Arc<Self>,
        dependency: Dependency,
        provider: Arc<dyn SessionProvider>,
    ) -> crate::Result<OverrideGuard> {
        match self.overrides.entry(dependency) {
            Entry::Occupied(_) => Err(crate::Error::OverrideActive { dependency }),
            Entry::Vacant(entry) => {
                let id = OVERRIDE_IDS.fetch_add(1, Ordering::Relaxed);
                entry.insert(Installed { id, provider });
                tracing::debug!(?dependency, "installed dependency override");

                Ok(OverrideGuard {
                    deps: self.clone(),
                    dependency,
                    id,
                })
            },
        }
    }

    pub fn has_override(
        &self,
        dependency: Dependency,
    ) -> bool {
        self.overrides.contains_key(&dependency)
    }

    pub fn clear_overrides(&self) {
        self.overrides.clear();
        tracing::debug!("cleared dependency overrides");
    }
}

/// Removes its override on drop. A guard only ever removes the override it
/// installed, so a stale guard cannot evict a newer one.
#[must_use = "dropping the guard removes the override immediately"]
pub struct OverrideGuard {
    deps: Arc<Dependencies>,
    dependency: Dependency,
    id: u64,
}

impl OverrideGuard {
    pub fn dependency(&self) -> Dependency {
        self.dependency
    }
}

impl Drop for OverrideGuard {
    fn drop(&mut self) {
        let removed = self
            .deps
            .overrides
            .remove_if(&self.dependency, |_, installed| installed.id == self.id);

        if removed.is_some() {
            tracing::debug!(dependency = ?self.dependency, "removed dependency override");
        }
    }
}

/// Extracts a database session for the duration of a request.
pub struct Db(pub DbSession);

impl std::ops::Deref for Db {
    type Target = DbSession;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequest for Db {
    type Error = crate::Error;
    type Future = Pin<Box<dyn Future<Output = std::result::Result<Self, Self::Error>>>>;

    fn from_request(
        req: &actix_web::HttpRequest,
        _: &mut actix_web::dev::Payload,
    ) -> Self::Future {
        let deps = req
            .app_data::<web::Data<Dependencies>>()
            .cloned();

        Box::pin(async move {
            let deps = deps.ok_or_else(|| crate::Error::missing_data("Dependencies"))?;
            Ok(Self(deps.session().await?))
        })
    }
}
