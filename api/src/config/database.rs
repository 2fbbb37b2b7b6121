use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use validator::Validate;

fn default_pool_size() -> u32 {
    10
}

fn default_migrate() -> bool {
    true
}

#[derive(Deserialize, Debug, Validate)]
pub struct DatabaseConfig {
    #[serde(alias = "URL")]
    pub url: SecretString,

    #[validate(range(min = 1, message = "pool_size must be at least 1"))]
    #[serde(alias = "POOL_SIZE", default = "default_pool_size")]
    pub pool_size: u32,

    /// Create missing tables on startup
    #[serde(alias = "MIGRATE", default = "default_migrate")]
    pub migrate: bool,
}

impl DatabaseConfig {
    pub async fn connect(&self) -> crate::Result<sea_orm::DatabaseConnection> {
        let db = taskboard_db::connect_sqlite(self.url.expose_secret(), self.pool_size).await?;
        Ok(db)
    }
}
