pub mod assessment;
pub mod habits;

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::{error, warn};

use crate::db::kv_store::{KeyValueStore, SqliteKeyValueStore};
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::settings::CoreConfig;
use crate::services::assessment_service::AssessmentService;
use crate::services::habit_service::HabitService;
use crate::services::mood_catalog::MoodCatalog;
use crate::services::session_service::SessionProvider;

/// Everything the presentation layer talks to. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    catalog: Arc<MoodCatalog>,
    assessment_service: Arc<AssessmentService>,
    habit_service: Arc<HabitService>,
    session: Arc<dyn SessionProvider>,
}

impl AppState {
    /// SQLite-backed state under `config.data_dir`. The habit list key follows
    /// whatever identity `session` reports at call time.
    pub fn new(config: &CoreConfig, session: Arc<dyn SessionProvider>) -> AppResult<Self> {
        let pool = DbPool::new(config.database_path())?;
        let store: Arc<dyn KeyValueStore> = Arc::new(SqliteKeyValueStore::new(pool));
        Ok(Self::with_store(store, session))
    }

    pub fn with_store(store: Arc<dyn KeyValueStore>, session: Arc<dyn SessionProvider>) -> Self {
        let catalog = Arc::new(MoodCatalog::builtin());
        let assessment_service = Arc::new(AssessmentService::new(Arc::clone(&catalog)));
        let habit_service = Arc::new(HabitService::new(store, Arc::clone(&session)));

        Self {
            catalog,
            assessment_service,
            habit_service,
            session,
        }
    }

    pub fn catalog(&self) -> Arc<MoodCatalog> {
        Arc::clone(&self.catalog)
    }

    pub fn assessment(&self) -> Arc<AssessmentService> {
        Arc::clone(&self.assessment_service)
    }

    pub fn habits(&self) -> Arc<HabitService> {
        Arc::clone(&self.habit_service)
    }

    pub fn session(&self) -> Arc<dyn SessionProvider> {
        Arc::clone(&self.session)
    }
}

pub type CommandResult<T> = Result<T, CommandError>;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<JsonValue>,
}

impl CommandError {
    pub fn new(
        code: impl Into<String>,
        message: impl Into<String>,
        details: Option<JsonValue>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details,
        }
    }
}

impl From<AppError> for CommandError {
    fn from(error: AppError) -> Self {
        match error {
            AppError::UnknownMood(mood) => CommandError::new(
                "UNKNOWN_MOOD",
                format!("Unknown mood: {mood}"),
                Some(serde_json::json!({ "mood": mood })),
            ),
            AppError::NotFound { resource } => {
                CommandError::new("NOT_FOUND", format!("The {resource} could not be found"), None)
            }
            AppError::Persistence { message, .. } => {
                error!(target: "app::command", %message, "persistence error in command");
                CommandError::new("PERSISTENCE_ERROR", "Failed to save or load habits", None)
            }
            AppError::Validation {
                message, details, ..
            } => CommandError::new("VALIDATION_ERROR", message, details),
            AppError::Database { message } => {
                error!(target: "app::command", %message, "database error in command");
                CommandError::new("UNKNOWN", message, None)
            }
            AppError::Serialization(error) => {
                error!(target: "app::command", error = %error, "serialization error in command");
                CommandError::new("UNKNOWN", "Serialization failed", None)
            }
            AppError::Io(error) => {
                error!(target: "app::command", error = %error, "io error in command");
                CommandError::new("UNKNOWN", "File system access failed", None)
            }
            AppError::Other(message) => {
                warn!(target: "app::command", %message, "unexpected error in command");
                CommandError::new("UNKNOWN", message, None)
            }
        }
    }
}
