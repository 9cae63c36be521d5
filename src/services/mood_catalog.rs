use std::collections::BTreeMap;

use serde_json::json;
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::models::mood::{
    AnswerOptions, HabitCategory, HabitTemplate, MoodDefinition, MoodHabits, MoodKey, MoodSummary,
    Question,
};

pub const QUESTIONS_PER_MOOD: usize = 3;

/// Read-only mood reference data. Built once at startup and shared behind an
/// `Arc`; nothing mutates it afterwards.
#[derive(Debug, Clone)]
pub struct MoodCatalog {
    moods: BTreeMap<MoodKey, MoodDefinition>,
}

impl MoodCatalog {
    /// Validates and indexes the given definitions. Every mood must be present
    /// exactly once with three questions and a template per category.
    pub fn new(definitions: Vec<MoodDefinition>) -> AppResult<Self> {
        let mut moods = BTreeMap::new();

        for definition in definitions {
            validate_definition(&definition)?;
            let key = definition.key;
            if moods.insert(key, definition).is_some() {
                return Err(AppError::validation_with_details(
                    "duplicate mood definition",
                    json!({ "mood": key.as_str() }),
                ));
            }
        }

        if let Some(missing) = MoodKey::ALL.iter().find(|key| !moods.contains_key(*key)) {
            return Err(AppError::validation_with_details(
                "mood catalog is incomplete",
                json!({ "missing": missing.as_str() }),
            ));
        }

        debug!(target: "app::catalog", moods = moods.len(), "mood catalog ready");
        Ok(Self { moods })
    }

    /// The shipped catalog.
    pub fn builtin() -> Self {
        Self {
            moods: builtin_definitions()
                .into_iter()
                .map(|definition| (definition.key, definition))
                .collect(),
        }
    }

    pub fn get_mood(&self, key: MoodKey) -> AppResult<&MoodDefinition> {
        self.moods
            .get(&key)
            .ok_or_else(|| AppError::unknown_mood(key.as_str()))
    }

    pub fn get_mood_by_name(&self, key: &str) -> AppResult<&MoodDefinition> {
        let key = MoodKey::try_from(key)?;
        self.get_mood(key)
    }

    /// Owned copy of the questionnaire; callers may mutate it freely.
    pub fn get_questions(&self, key: MoodKey) -> AppResult<Vec<Question>> {
        Ok(self.get_mood(key)?.questions.clone())
    }

    pub fn habit_template(&self, key: MoodKey, category: HabitCategory) -> AppResult<&HabitTemplate> {
        Ok(self.get_mood(key)?.habits.get(category))
    }

    /// Mood picker entries in fixed order.
    pub fn summaries(&self) -> Vec<MoodSummary> {
        MoodKey::ALL
            .iter()
            .filter_map(|key| self.moods.get(key))
            .map(MoodSummary::from)
            .collect()
    }
}

impl Default for MoodCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn validate_definition(definition: &MoodDefinition) -> AppResult<()> {
    if definition.questions.len() != QUESTIONS_PER_MOOD {
        return Err(AppError::validation_with_details(
            "every mood needs exactly three questions",
            json!({
                "mood": definition.key.as_str(),
                "questions": definition.questions.len(),
            }),
        ));
    }

    for category in HabitCategory::ALL {
        let template = definition.habits.get(category);
        if template.category != category {
            return Err(AppError::validation_with_details(
                "habit template filed under the wrong category",
                json!({
                    "mood": definition.key.as_str(),
                    "slot": category.as_str(),
                    "category": template.category.as_str(),
                }),
            ));
        }
    }

    Ok(())
}

fn question(prompt: &str, a: &str, b: &str, c: &str) -> Question {
    Question {
        prompt: prompt.to_string(),
        options: AnswerOptions {
            a: a.to_string(),
            b: b.to_string(),
            c: c.to_string(),
        },
    }
}

fn template(category: HabitCategory, title: &str, description: &str) -> HabitTemplate {
    HabitTemplate {
        title: title.to_string(),
        description: description.to_string(),
        category,
        message: category.message().to_string(),
    }
}

fn habits(
    grounding: (&str, &str),
    reflective: (&str, &str),
    growth: (&str, &str),
) -> MoodHabits {
    MoodHabits {
        grounding: template(HabitCategory::Grounding, grounding.0, grounding.1),
        reflective: template(HabitCategory::Reflective, reflective.0, reflective.1),
        growth: template(HabitCategory::Growth, growth.0, growth.1),
    }
}

fn mood(
    key: MoodKey,
    emoji: &str,
    display_name: &str,
    description: &str,
    questions: Vec<Question>,
    habits: MoodHabits,
) -> MoodDefinition {
    MoodDefinition {
        key,
        emoji: emoji.to_string(),
        display_name: display_name.to_string(),
        description: description.to_string(),
        questions,
        habits,
    }
}

fn builtin_definitions() -> Vec<MoodDefinition> {
    vec![
        mood(
            MoodKey::Sad,
            "\u{1F622}",
            "SAD",
            "I feel low, unseen, or emotionally heavy.",
            vec![
                question(
                    "When you notice this sadness, what do you usually do first?",
                    "I pause and try to understand what triggered it.",
                    "I distract myself or keep busy.",
                    "I withdraw or shut down without realizing.",
                ),
                question(
                    "Right now, what does your body feel like doing?",
                    "Take a deep breath and maybe a small step forward.",
                    "Sit quietly and wait for it to pass.",
                    "Curl up, stay still, or sleep it off.",
                ),
                question(
                    "Which thought feels most true right now?",
                    "\"This will pass \u{2014} I've handled worse.\"",
                    "\"I just need a break.\"",
                    "\"Nothing really helps anymore.\"",
                ),
            ],
            habits(
                (
                    "2-minute Reality Anchor",
                    "Sit, name 5 things you can see, 4 things you can touch, 3 sounds, breathe slowly 3 times.",
                ),
                (
                    "10-minute \"Feel and Write\"",
                    "Write one sentence: \"Right now I feel ___ because ___.\"",
                ),
                (
                    "Connection Act",
                    "Message someone you trust, \"Just wanted to say hi \u{2014} hope you're doing okay.\"",
                ),
            ),
        ),
        mood(
            MoodKey::Neutral,
            "\u{1F610}",
            "NEUTRAL",
            "I'm okay but not really *in* life right now.",
            vec![
                question(
                    "Do you notice what's missing from your day today?",
                    "Yes \u{2014} I can sense I'm under-stimulated.",
                    "Not really sure \u{2014} I'm floating through it.",
                    "I don't notice anything missing, but I feel numb.",
                ),
                question(
                    "When you're in this state, what do you usually do?",
                    "Try a light activity or talk to someone.",
                    "Keep scrolling or doing small tasks.",
                    "Withdraw into silence or avoid everything.",
                ),
                question(
                    "Which line fits your headspace right now?",
                    "\"I just need a spark.\"",
                    "\"Maybe tomorrow will feel different.\"",
                    "\"I feel disconnected from everything.\"",
                ),
            ],
            habits(
                (
                    "Micro-Activation",
                    "3 deep breaths, then stand and move for 90 seconds (stretch, walk, jump).",
                ),
                (
                    "Mini Dopamine Spark",
                    "Do a 5-min task that gives visible progress \u{2014} clean one shelf, reply to one message.",
                ),
                (
                    "Curiosity Habit",
                    "Watch/read something new for 10 min and jot 1 insight.",
                ),
            ),
        ),
        mood(
            MoodKey::Content,
            "\u{1F642}",
            "CONTENT",
            "I feel calm, balanced, or steady.",
            vec![
                question(
                    "What helps you sustain this balance?",
                    "I know what grounds me and use it.",
                    "I enjoy the calm but don't think about maintaining it.",
                    "I fear it'll fade soon.",
                ),
                question(
                    "How are you using your calmness today?",
                    "Channeling it into something meaningful.",
                    "Taking it easy and staying low-key.",
                    "Not doing much \u{2014} just drifting.",
                ),
                question(
                    "What's in your mind right now?",
                    "Gratitude or quiet focus.",
                    "\"I hope this feeling stays.\"",
                    "\"I don't feel much, just existing.\"",
                ),
            ],
            habits(
                (
                    "Reflection Checkpoint",
                    "3 sentences in journal: \"What made today peaceful?\"",
                ),
                (
                    "Balance Reinforcement",
                    "Plan tomorrow's first 10 minutes intentionally (music, tea, or breathwork).",
                ),
                (
                    "Build Momentum",
                    "Do one creative or value-aligned action today.",
                ),
            ),
        ),
        mood(
            MoodKey::Cheerful,
            "\u{1F604}",
            "CHEERFUL",
            "I'm upbeat and playful.",
            vec![
                question(
                    "What's fueling your joy today?",
                    "Gratitude or connection.",
                    "Random good vibe.",
                    "Not sure \u{2014} it just happened.",
                ),
                question(
                    "When you're happy, do you share it?",
                    "Yes \u{2014} I love spreading it.",
                    "Sometimes \u{2014} if I have time.",
                    "Not really \u{2014} I keep it private.",
                ),
                question(
                    "What runs through your mind right now?",
                    "\"I want to make someone's day.\"",
                    "\"This feels good, I'll enjoy it.\"",
                    "\"Hope this doesn't fade soon.\"",
                ),
            ],
            habits(
                (
                    "Energy Anchor",
                    "Breathe, smile, notice 3 things you appreciate right now.",
                ),
                (
                    "Joy Reinforcement",
                    "Text 1 thank-you message or compliment someone.",
                ),
                (
                    "Momentum Builder",
                    "Start a 15-min creative or impact action right now.",
                ),
            ),
        ),
        mood(
            MoodKey::Loving,
            "\u{1F970}",
            "LOVING",
            "I feel connected, kind, or grateful.",
            vec![
                question(
                    "What's bringing this warmth today?",
                    "Someone or something meaningful.",
                    "Just a general good vibe.",
                    "Not sure, it's random.",
                ),
                question(
                    "How do you handle this emotional warmth?",
                    "I share it or express it.",
                    "I hold it quietly.",
                    "I distract myself before it fades.",
                ),
                question(
                    "What feels true in your mind now?",
                    "\"I want to nurture this.\"",
                    "\"I want to remember this.\"",
                    "\"It probably won't last.\"",
                ),
            ],
            habits(
                (
                    "Warmth Reflection",
                    "Write one thing you love about yourself.",
                ),
                (
                    "Gratitude Ripple",
                    "Send one thank-you text or share an appreciation post.",
                ),
                (
                    "Kindness Act",
                    "Do a small, quiet kindness today (no expectation).",
                ),
            ),
        ),
    ]
}
