use chrono::{DateTime, TimeZone, Utc};

use crate::commands::{AppState, CommandResult};
use crate::error::{AppError, AppResult};
use crate::models::habit::{HabitDraft, HabitPatch, HabitRecord, HabitSource};
use crate::models::mood::AssessmentResult;
use crate::services::habit_aggregator::{self, HabitSections};

pub async fn habits_list(state: &AppState) -> CommandResult<Vec<HabitRecord>> {
    Ok(state.habits().get_user_goals().await?)
}

/// Mood habits due today, then configured habits, then custom habits.
pub async fn habits_dashboard<Tz: TimeZone>(
    state: &AppState,
    today: DateTime<Tz>,
) -> CommandResult<Vec<HabitRecord>> {
    let goals = state.habits().get_user_goals().await?;
    Ok(habit_aggregator::build_display_list(&goals, &today))
}

pub async fn habits_dashboard_sections<Tz: TimeZone>(
    state: &AppState,
    today: DateTime<Tz>,
) -> CommandResult<HabitSections> {
    let goals = state.habits().get_user_goals().await?;
    Ok(habit_aggregator::build_sections(&goals, &today))
}

pub async fn habits_create(state: &AppState, draft: HabitDraft) -> CommandResult<HabitRecord> {
    Ok(state.habits().add_goal(draft).await?)
}

/// Full replace; see [`habits_patch`] for a field-level change.
pub async fn habits_update(state: &AppState, draft: HabitDraft) -> CommandResult<HabitRecord> {
    Ok(state.habits().update_goal(draft).await?)
}

pub async fn habits_patch(
    state: &AppState,
    id: &str,
    patch: HabitPatch,
) -> CommandResult<HabitRecord> {
    Ok(patch_goal(state, id, patch).await?)
}

pub async fn habits_set_completed(
    state: &AppState,
    id: &str,
    completed: bool,
) -> CommandResult<HabitRecord> {
    let patch = HabitPatch {
        completed: Some(completed),
        ..HabitPatch::default()
    };
    Ok(patch_goal(state, id, patch).await?)
}

/// Rewrites a habit's text from the dashboard. Mood habits keep their title
/// and only change the description; every other habit changes both.
pub async fn habits_modify_text(
    state: &AppState,
    id: &str,
    text: &str,
) -> CommandResult<HabitRecord> {
    let text = text.trim();
    if text.is_empty() {
        return Err(AppError::validation("Please enter a valid habit description.").into());
    }

    let existing = find_goal(state, id).await?;
    let patch = if existing.category.is_mood() {
        HabitPatch {
            description: Some(text.to_string()),
            ..HabitPatch::default()
        }
    } else {
        HabitPatch {
            title: Some(text.to_string()),
            description: Some(text.to_string()),
            ..HabitPatch::default()
        }
    };

    Ok(state.habits().update_goal(patch.apply(existing)).await?)
}

pub async fn habits_delete(state: &AppState, id: &str) -> CommandResult<()> {
    Ok(state.habits().delete_goal(id).await?)
}

pub async fn habits_clear(state: &AppState) -> CommandResult<()> {
    Ok(state.habits().clear_goals().await?)
}

/// Stores the recommended habit of an assessment as a mood habit due on
/// `today`, so it leaves the dashboard once the day is over.
pub async fn habits_save_recommendation(
    state: &AppState,
    result: &AssessmentResult,
    today: DateTime<Utc>,
) -> CommandResult<HabitRecord> {
    let habit = &result.recommended_habit;
    let draft = HabitDraft::new(habit.title.clone(), HabitSource::MoodAssessment)
        .with_description(habit.description.clone())
        .with_target_date(today);
    Ok(state.habits().add_goal(draft).await?)
}

/// Read, merge, full replace.
async fn patch_goal(state: &AppState, id: &str, patch: HabitPatch) -> AppResult<HabitRecord> {
    let existing = find_goal(state, id).await?;
    state.habits().update_goal(patch.apply(existing)).await
}

async fn find_goal(state: &AppState, id: &str) -> AppResult<HabitRecord> {
    state
        .habits()
        .get_user_goals()
        .await?
        .into_iter()
        .find(|goal| goal.id == id)
        .ok_or_else(|| AppError::not_found(format!("habit {id}")))
}
