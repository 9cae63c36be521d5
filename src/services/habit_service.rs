use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::db::kv_store::KeyValueStore;
use crate::error::{AppError, AppResult};
use crate::models::habit::{HabitDraft, HabitRecord};
use crate::services::session_service::SessionProvider;

/// Storage key shared by every session without an identity.
pub const ANONYMOUS_GOALS_KEY: &str = "user_goals";
const USER_GOALS_KEY_PREFIX: &str = "user_goals_";

/// Per-user habit list over a key-value store.
///
/// Every operation reads, modifies and writes the whole list under the user's
/// key. There is no locking across the read and the write: callers are
/// expected to issue operations one at a time, and concurrent writers lose
/// updates (last write wins).
pub struct HabitService {
    store: Arc<dyn KeyValueStore>,
    session: Arc<dyn SessionProvider>,
}

impl HabitService {
    pub fn new(store: Arc<dyn KeyValueStore>, session: Arc<dyn SessionProvider>) -> Self {
        Self { store, session }
    }

    /// `user_goals_<id>` for a signed-in user, `user_goals` otherwise.
    /// Anonymous sessions therefore share one bucket.
    pub async fn goals_key(&self) -> String {
        match self.session.current_user_id().await {
            Some(user_id) => format!("{USER_GOALS_KEY_PREFIX}{user_id}"),
            None => ANONYMOUS_GOALS_KEY.to_string(),
        }
    }

    pub async fn add_goal(&self, draft: HabitDraft) -> AppResult<HabitRecord> {
        let key = self.goals_key().await;
        let mut goals = self.load(&key).await?.unwrap_or_default();

        let mut record = draft.into_record(Utc::now());
        record.completed = false;
        goals.push(record.clone());

        self.save(&key, &goals).await?;
        info!(
            target: "app::habits",
            %key,
            id = %record.id,
            category = %record.category,
            "habit added"
        );
        Ok(record)
    }

    /// Missing list reads as empty.
    pub async fn get_user_goals(&self) -> AppResult<Vec<HabitRecord>> {
        let key = self.goals_key().await;
        let goals = self.load(&key).await?.unwrap_or_default();
        debug!(target: "app::habits", %key, count = goals.len(), "habits loaded");
        Ok(goals)
    }

    /// Replaces the stored record with the same id. Fields omitted from `goal`
    /// take their defaults; nothing is merged from the stored copy except
    /// `createdAt`, which never changes after creation.
    pub async fn update_goal(&self, goal: HabitDraft) -> AppResult<HabitRecord> {
        let key = self.goals_key().await;
        let mut goals = self
            .load(&key)
            .await?
            .ok_or_else(|| AppError::not_found("habit list"))?;

        let id = goal.id.clone().unwrap_or_default();
        let index = goals
            .iter()
            .position(|existing| existing.id == id)
            .ok_or_else(|| AppError::not_found(format!("habit {id}")))?;

        let mut record = goal.into_record(Utc::now());
        record.id = id;
        record.created_at = goals[index].created_at;
        goals[index] = record.clone();

        self.save(&key, &goals).await?;
        info!(target: "app::habits", %key, id = %record.id, "habit updated");
        Ok(record)
    }

    /// Fails when the user has no list at all; an unknown id inside an
    /// existing list is ignored.
    pub async fn delete_goal(&self, id: &str) -> AppResult<()> {
        let key = self.goals_key().await;
        let goals = self
            .load(&key)
            .await?
            .ok_or_else(|| AppError::not_found("habit list"))?;

        let before = goals.len();
        let remaining: Vec<HabitRecord> = goals.into_iter().filter(|goal| goal.id != id).collect();

        self.save(&key, &remaining).await?;
        info!(
            target: "app::habits",
            %key,
            %id,
            removed = before - remaining.len(),
            "habit deleted"
        );
        Ok(())
    }

    /// Drops the whole list for the current user.
    pub async fn clear_goals(&self) -> AppResult<()> {
        let key = self.goals_key().await;
        self.store
            .remove(&key)
            .await
            .map_err(|err| AppError::persistence("failed to clear habits", err))?;
        info!(target: "app::habits", %key, "habit list cleared");
        Ok(())
    }

    async fn load(&self, key: &str) -> AppResult<Option<Vec<HabitRecord>>> {
        let raw = self
            .store
            .get(key)
            .await
            .map_err(|err| AppError::persistence("failed to load habits", err))?;

        let Some(json) = raw else {
            return Ok(None);
        };
        let mut goals: Vec<HabitRecord> = serde_json::from_str(&json)
            .map_err(|err| AppError::persistence("stored habits are unreadable", err))?;

        let repaired = goals
            .iter_mut()
            .map(HabitRecord::ensure_id)
            .filter(|assigned| *assigned)
            .count();
        if repaired > 0 {
            warn!(target: "app::habits", %key, repaired, "assigned ids to stored habits without one");
            // Best effort: ids stay stable once this write lands.
            if let Err(err) = self.save(key, &goals).await {
                warn!(target: "app::habits", %key, error = %err, "could not store repaired habit ids");
            }
        }

        Ok(Some(goals))
    }

    async fn save(&self, key: &str, goals: &[HabitRecord]) -> AppResult<()> {
        let json = serde_json::to_string(goals)
            .map_err(|err| AppError::persistence("failed to encode habits", err))?;
        self.store
            .set(key, &json)
            .await
            .map_err(|err| AppError::persistence("failed to save habits", err))
    }
}
