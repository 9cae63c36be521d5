use std::sync::Arc;

use tracing::debug;

use crate::error::AppResult;
use crate::models::mood::{
    ActionButtons, AssessmentResult, HabitCategory, MoodKey, OptionLabel, ScoreBand,
};
use crate::services::mood_catalog::{MoodCatalog, QUESTIONS_PER_MOOD};

/// Highest possible total: every answer `A`.
pub const MAX_TOTAL_SCORE: u32 = 2 * QUESTIONS_PER_MOOD as u32;

const ACTION_BUTTONS: &[(MoodKey, ScoreBand, &str, &str)] = &[
    (MoodKey::Loving, ScoreBand::Low, "Send 1 RDM to someone that you miss", "Reach out with kindness"),
    (MoodKey::Loving, ScoreBand::Moderate, "Thank someone who showed up", "Celebrate unspoken care"),
    (MoodKey::Loving, ScoreBand::High, "Gift a gratitude token", "Support a NGO"),
    (MoodKey::Cheerful, ScoreBand::Low, "Share one small win", "Express gratitude to your uplifter"),
    (MoodKey::Cheerful, ScoreBand::Moderate, "Appreciate your teammate", "Gift a RDM Token"),
    (MoodKey::Cheerful, ScoreBand::High, "Donate your happiness", "Send celebration token"),
    (MoodKey::Content, ScoreBand::Low, "Share a gratitude token", "Reward yourself"),
    (MoodKey::Content, ScoreBand::Moderate, "Give your day's joy to someone", "Celebrate your day with a donation"),
    (MoodKey::Content, ScoreBand::High, "Support an education cause", "Donate to uplift others"),
    (MoodKey::Neutral, ScoreBand::Low, "Appreciate small acts", "Celebrate unnoticed help"),
    (MoodKey::Neutral, ScoreBand::Moderate, "Gift yourself", "Uplift a like-minded friend"),
    (MoodKey::Neutral, ScoreBand::High, "Support community", "Uplift others with RDM"),
    (MoodKey::Sad, ScoreBand::Low, "Text someone you trust", "Uplift a heart in need"),
    (MoodKey::Sad, ScoreBand::Moderate, "Thank your quiet supporters", "Send kindness forward"),
    (MoodKey::Sad, ScoreBand::High, "Donate for mental wellness", "Gift RDM token"),
];

/// Mood assessment scoring engine. Pure: no I/O, no shared mutable state.
pub struct AssessmentService {
    catalog: Arc<MoodCatalog>,
}

impl AssessmentService {
    pub fn new(catalog: Arc<MoodCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> Arc<MoodCatalog> {
        Arc::clone(&self.catalog)
    }

    /// Scores three triage answers. Labels are matched case-insensitively;
    /// anything other than A/B/C scores 0 instead of failing.
    pub fn score<S: AsRef<str>>(
        &self,
        mood: MoodKey,
        answers: &[S; QUESTIONS_PER_MOOD],
    ) -> AppResult<AssessmentResult> {
        let definition = self.catalog.get_mood(mood)?;

        let normalized: Vec<String> = answers
            .iter()
            .map(|answer| answer.as_ref().trim().to_uppercase())
            .collect();
        let scores: Vec<u32> = normalized
            .iter()
            .map(|answer| OptionLabel::parse(answer).map_or(0, |label| label.score()))
            .collect();
        let total_score: u32 = scores.iter().sum();
        let mood_index = mood_index(total_score);
        let habit_category = HabitCategory::from_mood_index(mood_index);
        let recommended_habit = definition.habits.get(habit_category).clone();

        debug!(
            target: "app::assessment",
            mood = %mood,
            ?scores,
            total_score,
            mood_index,
            category = %habit_category,
            "mood assessment scored"
        );

        Ok(AssessmentResult {
            mood,
            answers: normalized,
            scores,
            total_score,
            mood_index,
            habit_category,
            message: habit_category.message().to_string(),
            recommended_habit,
        })
    }

    pub fn score_by_name<S: AsRef<str>>(
        &self,
        mood: &str,
        answers: &[S; QUESTIONS_PER_MOOD],
    ) -> AppResult<AssessmentResult> {
        self.score(MoodKey::try_from(mood)?, answers)
    }

    /// Suggested follow-up actions for a mood and index. Unknown moods get the
    /// generic pair.
    pub fn action_buttons(&self, mood: &str, mood_index: u32) -> ActionButtons {
        match MoodKey::parse(mood) {
            Some(key) => action_buttons_for(key, mood_index),
            None => {
                debug!(target: "app::assessment", %mood, "no action buttons for mood, using fallback");
                ActionButtons::fallback()
            }
        }
    }
}

/// `round(total / 6 * 100)`; `f64::round` rounds halves away from zero, which is
/// half-up for these non-negative inputs.
pub fn mood_index(total_score: u32) -> u32 {
    let total = total_score.min(MAX_TOTAL_SCORE) as f64;
    (total / MAX_TOTAL_SCORE as f64 * 100.0).round() as u32
}

pub fn action_buttons_for(mood: MoodKey, mood_index: u32) -> ActionButtons {
    let band = ScoreBand::from_mood_index(mood_index);
    ACTION_BUTTONS
        .iter()
        .find(|(key, entry_band, _, _)| *key == mood && *entry_band == band)
        .map(|(_, _, left, right)| ActionButtons::new(*left, *right))
        .unwrap_or_else(ActionButtons::fallback)
}
