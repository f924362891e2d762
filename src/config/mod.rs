// Configuration loading and management.

use anyhow::{Context, Result};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const PROD: &str = "prod";
#[allow(dead_code)]
pub const DEV: &str = "dev";
#[allow(dead_code)]
pub const DEBUG: &str = "debug";
#[allow(dead_code)]
pub const TEST: &str = "test";

/// Environment variable overriding the configured database path.
pub const DB_PATH_ENV: &str = "FRESHTALLY_DB_PATH";

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Tally {
    #[serde(rename = "tally")]
    pub tally: TallyBox,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TallyBox {
    pub env: String,
    pub logs: Option<Logs>,
    pub api: Option<Api>,
    pub counting: Counting,
    pub db: Option<Db>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Logs {
    pub level: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Api {
    pub name: Option<String>,
    pub port: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Counting {
    /// Named zone every "today" computation runs in.
    #[serde(default = "default_timezone")]
    pub timezone: Tz,
    #[serde(rename = "poll_interval", with = "humantime_serde", default)]
    pub poll_interval: Option<Duration>,
    #[serde(rename = "persist_on_update")]
    pub persist_on_update: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Db {
    pub path: Option<String>,
}

fn default_timezone() -> Tz {
    chrono_tz::Asia::Makassar
}

// Config trait
pub trait ConfigTrait {
    fn logs(&self) -> Option<&Logs>;
    fn is_prod(&self) -> bool;
    #[allow(dead_code)]
    fn is_test(&self) -> bool;
    fn api(&self) -> Option<&Api>;
    fn timezone(&self) -> Tz;
    fn poll_interval(&self) -> Duration;
    fn persist_on_update(&self) -> bool;
    fn db_path(&self) -> Option<&str>;
}

// Config type alias for convenience
pub type Config = Tally;

impl ConfigTrait for Config {
    fn logs(&self) -> Option<&Logs> {
        self.tally.logs.as_ref()
    }

    fn is_prod(&self) -> bool {
        self.tally.env == PROD
    }

    fn is_test(&self) -> bool {
        self.tally.env == TEST
    }

    fn api(&self) -> Option<&Api> {
        self.tally.api.as_ref()
    }

    fn timezone(&self) -> Tz {
        self.tally.counting.timezone
    }

    fn poll_interval(&self) -> Duration {
        self.tally
            .counting
            .poll_interval
            .unwrap_or(DEFAULT_POLL_INTERVAL)
    }

    fn persist_on_update(&self) -> bool {
        self.tally.counting.persist_on_update.unwrap_or(true)
    }

    fn db_path(&self) -> Option<&str> {
        self.tally.db.as_ref().and_then(|db| db.path.as_deref())
    }
}

impl Config {
    /// Loads configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let abs_path = path
            .canonicalize()
            .with_context(|| format!("failed to resolve absolute config filepath: {:?}", path))?;

        let data = std::fs::read_to_string(&abs_path)
            .with_context(|| format!("read config yaml file {:?}", abs_path))?;

        let mut cfg: Tally = serde_yaml::from_str(&data)
            .with_context(|| format!("unmarshal yaml from {:?}", abs_path))?;

        // Connection parameters come from the environment when set; config
        // files never carry deploy-specific paths into version control.
        if let Ok(db_path) = std::env::var(DB_PATH_ENV) {
            if !db_path.is_empty() {
                cfg.tally.db = Some(Db { path: Some(db_path) });
            }
        }

        Ok(cfg)
    }
}

pub mod test_config;
pub use test_config::new_test_config;
