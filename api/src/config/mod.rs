mod database;

pub use database::DatabaseConfig;

use serde::Deserialize;
use std::path::PathBuf;
use validator::Validate;

const FILE_NAME: &str = "taskboard";
const ENV_PREFIX: &str = "TASKBOARD";

fn default_addr() -> String {
    "127.0.0.1:8000".into()
}

#[derive(Deserialize, Debug, Validate)]
pub struct Config {
    #[serde(default = "default_addr", alias = "ADDR")]
    pub addr: String,

    #[validate(nested)]
    #[serde(alias = "DATABASE")]
    pub database: DatabaseConfig,
}

impl Config {
    /// Reads `taskboard.toml` (if present) from `dir`, or the working directory,
    /// then layers `TASKBOARD__*` environment variables on top.
    pub fn load<S: AsRef<str>>(dir: Option<S>) -> crate::Result<Self> {
        let file_name = PathBuf::from(
            dir.map(|s| String::from(s.as_ref()))
                .unwrap_or("./".into()),
        )
        .join(FILE_NAME)
        .display()
        .to_string();

        let this: Self = ::config::ConfigBuilder::<::config::builder::DefaultState>::default()
            .add_source(::config::File::with_name(&file_name).required(false))
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        this.validate()?;

        tracing::debug!(addr = %this.addr, "loaded configuration from {file_name}");

        Ok(this)
    }
}
