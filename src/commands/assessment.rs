use serde_json::json;

use crate::commands::{AppState, CommandResult};
use crate::error::AppError;
use crate::models::mood::{ActionButtons, AssessmentResult, MoodSummary, Question};
use crate::services::mood_catalog::QUESTIONS_PER_MOOD;

pub fn assessment_moods(state: &AppState) -> Vec<MoodSummary> {
    state.catalog().summaries()
}

pub fn assessment_questions(state: &AppState, mood: &str) -> CommandResult<Vec<Question>> {
    let catalog = state.catalog();
    let definition = catalog.get_mood_by_name(mood)?;
    Ok(catalog.get_questions(definition.key)?)
}

/// Scores a completed questionnaire. Exactly three answers are required; the
/// labels themselves are scored leniently.
pub fn assessment_submit(
    state: &AppState,
    mood: &str,
    answers: Vec<String>,
) -> CommandResult<AssessmentResult> {
    let count = answers.len();
    let answers = <[String; QUESTIONS_PER_MOOD]>::try_from(answers).map_err(|_| {
        AppError::validation_with_details(
            "exactly three answers are required",
            json!({ "expected": QUESTIONS_PER_MOOD, "received": count }),
        )
    })?;

    Ok(state.assessment().score_by_name(mood, &answers)?)
}

pub fn assessment_action_buttons(state: &AppState, mood: &str, mood_index: u32) -> ActionButtons {
    state.assessment().action_buttons(mood, mood_index)
}
