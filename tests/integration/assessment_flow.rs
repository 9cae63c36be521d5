//! End-to-end assessment flow through the command layer: pick a mood, read the
//! questions, submit answers, save the recommendation and find it on the
//! dashboard.

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use habit_companion_lib::commands::assessment::{
    assessment_action_buttons, assessment_moods, assessment_questions, assessment_submit,
};
use habit_companion_lib::commands::habits::{habits_dashboard, habits_list, habits_save_recommendation};
use habit_companion_lib::commands::AppState;
use habit_companion_lib::db::kv_store::MemoryKeyValueStore;
use habit_companion_lib::models::habit::HabitSource;
use habit_companion_lib::models::mood::{HabitCategory, MoodKey};
use habit_companion_lib::services::session_service::StaticSessionProvider;

fn setup() -> AppState {
    AppState::with_store(
        Arc::new(MemoryKeyValueStore::new()),
        Arc::new(StaticSessionProvider::signed_in("maya")),
    )
}

fn answers(labels: [&str; 3]) -> Vec<String> {
    labels.iter().map(|label| label.to_string()).collect()
}

#[test]
fn test_all_five_moods_are_offered() {
    let state = setup();
    let moods: Vec<MoodKey> = assessment_moods(&state).into_iter().map(|m| m.key).collect();
    assert_eq!(moods.len(), 5);
    for key in MoodKey::ALL {
        assert!(moods.contains(&key), "missing mood {key}");
    }
}

#[test]
fn test_every_mood_has_three_questions_with_three_options() {
    let state = setup();
    for key in MoodKey::ALL {
        let questions = assessment_questions(&state, key.as_str()).expect("questions");
        assert_eq!(questions.len(), 3, "mood {key}");
        for question in questions {
            assert!(!question.prompt.is_empty());
            assert!(!question.options.a.is_empty());
            assert!(!question.options.b.is_empty());
            assert!(!question.options.c.is_empty());
        }
    }
}

#[test]
fn test_unknown_mood_is_reported_with_code() {
    let state = setup();
    let err = assessment_questions(&state, "angry").unwrap_err();
    assert_eq!(err.code, "UNKNOWN_MOOD");

    let err = assessment_submit(&state, "Sad", answers(["A", "A", "A"])).unwrap_err();
    assert_eq!(err.code, "UNKNOWN_MOOD", "mood keys are case-sensitive");
}

#[test]
fn test_submit_low_score_recommends_grounding_habit() {
    let state = setup();
    let result = assessment_submit(&state, "sad", answers(["C", "C", "B"])).unwrap();

    assert_eq!(result.scores, vec![0, 0, 1]);
    assert_eq!(result.total_score, 1);
    assert_eq!(result.mood_index, 17);
    assert_eq!(result.habit_category, HabitCategory::Grounding);
    assert_eq!(
        result.message,
        "Ground yourself gently \u{2014} your system needs immediate calm."
    );

    let expected = state
        .catalog()
        .habit_template(MoodKey::Sad, HabitCategory::Grounding)
        .unwrap()
        .clone();
    assert_eq!(result.recommended_habit, expected);
}

#[test]
fn test_submit_boundary_scores() {
    let state = setup();

    let mid = assessment_submit(&state, "neutral", answers(["A", "B", "C"])).unwrap();
    assert_eq!(mid.mood_index, 50);
    assert_eq!(mid.habit_category, HabitCategory::Reflective);

    let high = assessment_submit(&state, "loving", answers(["A", "A", "B"])).unwrap();
    assert_eq!(high.mood_index, 83);
    assert_eq!(high.habit_category, HabitCategory::Growth);

    let low = assessment_submit(&state, "content", answers(["B", "B", "C"])).unwrap();
    assert_eq!(low.mood_index, 33);
    assert_eq!(low.habit_category, HabitCategory::Grounding);
}

#[test]
fn test_submit_tolerates_lowercase_and_unknown_labels() {
    let state = setup();
    let result = assessment_submit(&state, "cheerful", answers([" a ", "x", "b"])).unwrap();
    assert_eq!(result.answers, vec!["A", "X", "B"]);
    assert_eq!(result.scores, vec![2, 0, 1]);
    assert_eq!(result.total_score, 3);
}

#[test]
fn test_submit_requires_exactly_three_answers() {
    let state = setup();

    let err = assessment_submit(&state, "sad", answers(["A", "A", "A"])[..2].to_vec()).unwrap_err();
    assert_eq!(err.code, "VALIDATION_ERROR");
    let details = err.details.expect("details");
    assert_eq!(details["expected"], 3);
    assert_eq!(details["received"], 2);

    let too_many = vec!["A".to_string(); 4];
    let err = assessment_submit(&state, "sad", too_many).unwrap_err();
    assert_eq!(err.code, "VALIDATION_ERROR");
}

#[test]
fn test_action_buttons_follow_same_bands_as_categories() {
    let state = setup();

    let low = assessment_action_buttons(&state, "sad", 17);
    assert_eq!(low.left, "Text someone you trust");
    assert_eq!(low.right, "Uplift a heart in need");

    let boundary = assessment_action_buttons(&state, "sad", 40);
    assert_eq!(boundary, low, "40 is still the low band");

    let moderate = assessment_action_buttons(&state, "cheerful", 41);
    assert_eq!(moderate.left, "Appreciate your teammate");

    let high = assessment_action_buttons(&state, "loving", 71);
    assert_eq!(high.left, "Gift a gratitude token");
    assert_eq!(high.right, "Support a NGO");

    let fallback = assessment_action_buttons(&state, "angry", 50);
    assert_eq!(fallback.left, "Thank a friend");
    assert_eq!(fallback.right, "Appreciate colleague");
}

#[tokio::test]
async fn test_saved_recommendation_shows_on_dashboard_for_the_day() {
    let state = setup();
    let today = Utc.with_ymd_and_hms(2024, 6, 1, 9, 30, 0).unwrap();

    let result = assessment_submit(&state, "sad", answers(["C", "C", "B"])).unwrap();
    let saved = habits_save_recommendation(&state, &result, today).await.unwrap();

    assert_eq!(saved.category, HabitSource::MoodAssessment);
    assert_eq!(saved.title, result.recommended_habit.title);
    assert_eq!(saved.description, result.recommended_habit.description);
    assert_eq!(saved.target_date, Some(today));
    assert!(!saved.completed);

    let stored = habits_list(&state).await.unwrap();
    assert_eq!(stored, vec![saved.clone()]);

    let dashboard = habits_dashboard(&state, today + Duration::hours(10)).await.unwrap();
    assert_eq!(dashboard, vec![saved]);

    let tomorrow = habits_dashboard(&state, today + Duration::days(1)).await.unwrap();
    assert!(tomorrow.is_empty(), "mood habits reset the next day");
    assert_eq!(habits_list(&state).await.unwrap().len(), 1, "the record itself stays stored");
}
