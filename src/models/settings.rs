use std::env;
use std::path::PathBuf;

use serde::Serialize;

const ENV_DATA_DIR: &str = "HABIT_COMPANION_DATA_DIR";
const ENV_LOG_DIR: &str = "HABIT_COMPANION_LOG_DIR";
const ENV_LOG_DIRECTIVES: &str = "HABIT_COMPANION_LOG";

pub const DEFAULT_DATABASE_FILE: &str = "habit-companion.sqlite";
pub const DEFAULT_LOG_DIRECTIVES: &str = "info,app::habits=debug,app::db=info";

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CoreConfig {
    pub data_dir: PathBuf,
    pub database_file: String,
    /// Defaults to `<data_dir>/logs`.
    pub log_dir: Option<PathBuf>,
    pub log_directives: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            database_file: DEFAULT_DATABASE_FILE.to_string(),
            log_dir: None,
            log_directives: DEFAULT_LOG_DIRECTIVES.to_string(),
        }
    }
}

impl CoreConfig {
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    /// Defaults overridden by `HABIT_COMPANION_*` environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(dir) = non_empty_var(ENV_DATA_DIR) {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(dir) = non_empty_var(ENV_LOG_DIR) {
            config.log_dir = Some(PathBuf::from(dir));
        }
        if let Some(directives) = non_empty_var(ENV_LOG_DIRECTIVES) {
            config.log_directives = directives;
        }
        config
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(&self.database_file)
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_dir
            .clone()
            .unwrap_or_else(|| self.data_dir.join("logs"))
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
