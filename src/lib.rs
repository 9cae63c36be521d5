//! Core of a personal habit companion: a mood assessment scoring engine and a
//! per-user habit store with the dashboard aggregation built on top of it.

pub mod commands;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

use std::sync::Arc;

use crate::commands::AppState;
use crate::error::AppResult;
use crate::models::settings::CoreConfig;
use crate::services::session_service::SessionProvider;

/// Sets up logging and opens the on-disk store described by `config`. The
/// shell keeps its own handle on `session` to sign users in and out.
pub fn bootstrap(config: &CoreConfig, session: Arc<dyn SessionProvider>) -> AppResult<AppState> {
    crate::utils::logger::init_logging(config)?;
    std::fs::create_dir_all(&config.data_dir)?;

    let state = AppState::new(config, session)?;
    tracing::info!(
        target: "app::bootstrap",
        db_path = %config.database_path().display(),
        "habit companion ready"
    );
    Ok(state)
}
