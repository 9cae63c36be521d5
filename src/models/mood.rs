use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AppError;

/// Highest mood index that still recommends a grounding habit.
pub const GROUNDING_MAX_INDEX: u32 = 40;
/// Highest mood index that still recommends a reflective habit.
pub const REFLECTIVE_MAX_INDEX: u32 = 70;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum MoodKey {
    Sad,
    Neutral,
    Content,
    Cheerful,
    Loving,
}

impl MoodKey {
    pub const ALL: [MoodKey; 5] = [
        MoodKey::Sad,
        MoodKey::Neutral,
        MoodKey::Content,
        MoodKey::Cheerful,
        MoodKey::Loving,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MoodKey::Sad => "sad",
            MoodKey::Neutral => "neutral",
            MoodKey::Content => "content",
            MoodKey::Cheerful => "cheerful",
            MoodKey::Loving => "loving",
        }
    }

    /// Exact lowercase match. Quiet on a miss; use `TryFrom` where an unknown
    /// key is an error worth logging.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.as_str() == value)
    }
}

impl fmt::Display for MoodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for MoodKey {
    type Error = AppError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value).ok_or_else(|| AppError::unknown_mood(value))
    }
}

impl FromStr for MoodKey {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}

/// Answer label of a triage question.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum OptionLabel {
    A,
    B,
    C,
}

impl OptionLabel {
    pub const ALL: [OptionLabel; 3] = [OptionLabel::A, OptionLabel::B, OptionLabel::C];

    pub fn as_str(&self) -> &'static str {
        match self {
            OptionLabel::A => "A",
            OptionLabel::B => "B",
            OptionLabel::C => "C",
        }
    }

    /// Case-insensitive parse; surrounding whitespace is ignored.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_uppercase().as_str() {
            "A" => Some(OptionLabel::A),
            "B" => Some(OptionLabel::B),
            "C" => Some(OptionLabel::C),
            _ => None,
        }
    }

    pub fn score(&self) -> u32 {
        match self {
            OptionLabel::A => 2,
            OptionLabel::B => 1,
            OptionLabel::C => 0,
        }
    }
}

impl fmt::Display for OptionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mood index band. Category selection and action buttons both key off this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScoreBand {
    Low,
    Moderate,
    High,
}

impl ScoreBand {
    pub fn from_mood_index(mood_index: u32) -> Self {
        if mood_index <= GROUNDING_MAX_INDEX {
            ScoreBand::Low
        } else if mood_index <= REFLECTIVE_MAX_INDEX {
            ScoreBand::Moderate
        } else {
            ScoreBand::High
        }
    }

    /// Lower bound of the band, as used by the action button table.
    pub fn marker(&self) -> u32 {
        match self {
            ScoreBand::Low => 0,
            ScoreBand::Moderate => GROUNDING_MAX_INDEX + 1,
            ScoreBand::High => REFLECTIVE_MAX_INDEX + 1,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum HabitCategory {
    Grounding,
    Reflective,
    Growth,
}

impl HabitCategory {
    pub const ALL: [HabitCategory; 3] = [
        HabitCategory::Grounding,
        HabitCategory::Reflective,
        HabitCategory::Growth,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HabitCategory::Grounding => "grounding",
            HabitCategory::Reflective => "reflective",
            HabitCategory::Growth => "growth",
        }
    }

    pub fn from_mood_index(mood_index: u32) -> Self {
        ScoreBand::from_mood_index(mood_index).into()
    }

    /// Canonical rationale shown with a recommendation of this category.
    pub fn message(&self) -> &'static str {
        match self {
            HabitCategory::Grounding => {
                "Ground yourself gently \u{2014} your system needs immediate calm."
            }
            HabitCategory::Reflective => {
                "You're in a reflective zone \u{2014} take 10 minutes to process and rebalance."
            }
            HabitCategory::Growth => {
                "You're emotionally stable \u{2014} build momentum or spread your positive energy."
            }
        }
    }
}

impl From<ScoreBand> for HabitCategory {
    fn from(band: ScoreBand) -> Self {
        match band {
            ScoreBand::Low => HabitCategory::Grounding,
            ScoreBand::Moderate => HabitCategory::Reflective,
            ScoreBand::High => HabitCategory::Growth,
        }
    }
}

impl fmt::Display for HabitCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnswerOptions {
    #[serde(rename = "A")]
    pub a: String,
    #[serde(rename = "B")]
    pub b: String,
    #[serde(rename = "C")]
    pub c: String,
}

impl AnswerOptions {
    pub fn get(&self, label: OptionLabel) -> &str {
        match label {
            OptionLabel::A => &self.a,
            OptionLabel::B => &self.b,
            OptionLabel::C => &self.c,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub prompt: String,
    pub options: AnswerOptions,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HabitTemplate {
    pub title: String,
    pub description: String,
    pub category: HabitCategory,
    pub message: String,
}

/// One template per habit category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MoodHabits {
    pub grounding: HabitTemplate,
    pub reflective: HabitTemplate,
    pub growth: HabitTemplate,
}

impl MoodHabits {
    pub fn get(&self, category: HabitCategory) -> &HabitTemplate {
        match category {
            HabitCategory::Grounding => &self.grounding,
            HabitCategory::Reflective => &self.reflective,
            HabitCategory::Growth => &self.growth,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MoodDefinition {
    pub key: MoodKey,
    pub emoji: String,
    pub display_name: String,
    pub description: String,
    pub questions: Vec<Question>,
    pub habits: MoodHabits,
}

/// Entry of the mood picker.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MoodSummary {
    pub key: MoodKey,
    pub emoji: String,
    pub display_name: String,
    pub description: String,
}

impl From<&MoodDefinition> for MoodSummary {
    fn from(definition: &MoodDefinition) -> Self {
        Self {
            key: definition.key,
            emoji: definition.emoji.clone(),
            display_name: definition.display_name.clone(),
            description: definition.description.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentResult {
    pub mood: MoodKey,
    /// Answers as given, trimmed and uppercased. Unrecognized labels are kept.
    pub answers: Vec<String>,
    pub scores: Vec<u32>,
    pub total_score: u32,
    pub mood_index: u32,
    pub habit_category: HabitCategory,
    pub message: String,
    pub recommended_habit: HabitTemplate,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActionButtons {
    pub left: String,
    pub right: String,
}

impl ActionButtons {
    pub fn new(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
        }
    }

    pub fn fallback() -> Self {
        Self::new("Thank a friend", "Appreciate colleague")
    }
}
