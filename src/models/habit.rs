use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use uuid::Uuid;

pub const MOOD_ASSESSMENT_CATEGORY: &str = "Mood Assessment";
pub const CUSTOM_HABITS_CATEGORY: &str = "Custom Habits";
pub const CUSTOM_CATEGORY: &str = "Custom";
pub const DEFAULT_CATEGORY: &str = "general";
pub const DEFAULT_FREQUENCY: &str = "daily";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CustomLabel {
    CustomHabits,
    Custom,
}

/// Where a habit record came from. Stored on disk as the plain `category` string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum HabitSource {
    MoodAssessment,
    Configured(String),
    Custom(CustomLabel),
    /// Legacy records with an empty or missing category.
    #[default]
    Uncategorized,
}

impl HabitSource {
    pub fn configured(name: impl Into<String>) -> Self {
        Self::from(name.into())
    }

    pub fn as_str(&self) -> &str {
        match self {
            HabitSource::MoodAssessment => MOOD_ASSESSMENT_CATEGORY,
            HabitSource::Configured(name) => name,
            HabitSource::Custom(CustomLabel::CustomHabits) => CUSTOM_HABITS_CATEGORY,
            HabitSource::Custom(CustomLabel::Custom) => CUSTOM_CATEGORY,
            HabitSource::Uncategorized => "",
        }
    }

    pub fn is_mood(&self) -> bool {
        matches!(self, HabitSource::MoodAssessment)
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, HabitSource::Custom(_))
    }

    /// Belongs to the configured group: any category other than the mood tag
    /// and `"Custom Habits"`. A bare `"Custom"` therefore counts as both
    /// configured and custom.
    pub fn is_configured(&self) -> bool {
        matches!(
            self,
            HabitSource::Configured(_) | HabitSource::Custom(CustomLabel::Custom)
        )
    }
}

impl From<String> for HabitSource {
    fn from(value: String) -> Self {
        match value.as_str() {
            MOOD_ASSESSMENT_CATEGORY => HabitSource::MoodAssessment,
            CUSTOM_HABITS_CATEGORY => HabitSource::Custom(CustomLabel::CustomHabits),
            CUSTOM_CATEGORY => HabitSource::Custom(CustomLabel::Custom),
            "" => HabitSource::Uncategorized,
            _ => HabitSource::Configured(value),
        }
    }
}

impl From<&str> for HabitSource {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl fmt::Display for HabitSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for HabitSource {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for HabitSource {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.map(HabitSource::from).unwrap_or_default())
    }
}

/// Persisted habit. Field names and date format are the storage format.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HabitRecord {
    /// Empty only for legacy records read back before an id was assigned.
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: HabitSource,
    #[serde(default, with = "iso_datetime::lenient::option")]
    pub target_date: Option<DateTime<Utc>>,
    #[serde(default = "default_frequency")]
    pub frequency: String,
    #[serde(default)]
    pub reflection: String,
    #[serde(default)]
    pub pledge_amount: f64,
    /// Missing or unreadable timestamps read as the Unix epoch.
    #[serde(default, with = "iso_datetime::lenient")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub completed: bool,
}

impl HabitRecord {
    /// Gives a record stored without an id a fresh one. Returns whether it did.
    pub fn ensure_id(&mut self) -> bool {
        if !self.id.is_empty() {
            return false;
        }
        self.id = Uuid::new_v4().to_string();
        true
    }
}

fn default_frequency() -> String {
    DEFAULT_FREQUENCY.to_string()
}

/// Caller-supplied habit fields. Anything left out takes its default when the
/// draft is stored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct HabitDraft {
    pub id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<HabitSource>,
    #[serde(with = "iso_datetime::option")]
    pub target_date: Option<DateTime<Utc>>,
    pub frequency: Option<String>,
    pub reflection: Option<String>,
    pub pledge_amount: Option<f64>,
    #[serde(with = "iso_datetime::option")]
    pub created_at: Option<DateTime<Utc>>,
    pub completed: Option<bool>,
}

impl HabitDraft {
    pub fn new(title: impl Into<String>, category: impl Into<HabitSource>) -> Self {
        Self {
            title: Some(title.into()),
            category: Some(category.into()),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_target_date(mut self, target_date: DateTime<Utc>) -> Self {
        self.target_date = Some(target_date);
        self
    }

    /// Builds the stored form. Empty strings count as missing for `id`,
    /// `category` and `frequency`, which then fall back to their defaults.
    pub fn into_record(self, now: DateTime<Utc>) -> HabitRecord {
        let id = self
            .id
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let category = match self.category {
            None | Some(HabitSource::Uncategorized) => HabitSource::from(DEFAULT_CATEGORY),
            Some(source) => source,
        };
        let frequency = self
            .frequency
            .filter(|value| !value.is_empty())
            .unwrap_or_else(default_frequency);
        let pledge_amount = self
            .pledge_amount
            .filter(|amount| amount.is_finite())
            .unwrap_or(0.0);

        HabitRecord {
            id,
            title: self.title.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            category,
            target_date: self.target_date.map(|date| date.trunc_subsecs(3)),
            frequency,
            reflection: self.reflection.unwrap_or_default(),
            pledge_amount,
            created_at: self.created_at.unwrap_or(now).trunc_subsecs(3),
            completed: self.completed.unwrap_or(false),
        }
    }
}

impl From<HabitRecord> for HabitDraft {
    fn from(record: HabitRecord) -> Self {
        Self {
            id: Some(record.id),
            title: Some(record.title),
            description: Some(record.description),
            category: Some(record.category),
            target_date: record.target_date,
            frequency: Some(record.frequency),
            reflection: Some(record.reflection),
            pledge_amount: Some(record.pledge_amount),
            created_at: Some(record.created_at),
            completed: Some(record.completed),
        }
    }
}

/// Field-level changes merged onto an existing record before a full replace.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct HabitPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<HabitSource>,
    /// `Some(None)` clears the target date.
    #[serde(deserialize_with = "iso_datetime::double_option")]
    pub target_date: Option<Option<DateTime<Utc>>>,
    pub frequency: Option<String>,
    pub reflection: Option<String>,
    pub pledge_amount: Option<f64>,
    pub completed: Option<bool>,
}

impl HabitPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply(self, record: HabitRecord) -> HabitDraft {
        let mut draft = HabitDraft::from(record);
        if let Some(title) = self.title {
            draft.title = Some(title);
        }
        if let Some(description) = self.description {
            draft.description = Some(description);
        }
        if let Some(category) = self.category {
            draft.category = Some(category);
        }
        if let Some(target_date) = self.target_date {
            draft.target_date = target_date;
        }
        if let Some(frequency) = self.frequency {
            draft.frequency = Some(frequency);
        }
        if let Some(reflection) = self.reflection {
            draft.reflection = Some(reflection);
        }
        if let Some(pledge_amount) = self.pledge_amount {
            draft.pledge_amount = Some(pledge_amount);
        }
        if let Some(completed) = self.completed {
            draft.completed = Some(completed);
        }
        draft
    }
}

/// ISO-8601 with millisecond precision and a `Z` suffix, e.g.
/// `2025-03-01T08:30:00.000Z`.
mod iso_datetime {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(de::Error::custom)
    }

    pub fn parse(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
        DateTime::parse_from_rfc3339(raw).map(|value| value.with_timezone(&Utc))
    }

    pub fn double_option<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Option<DateTime<Utc>>>, D::Error> {
        option::deserialize(deserializer).map(Some)
    }

    /// Reading side for stored records: a bad date must not make the whole
    /// list unreadable.
    pub mod lenient {
        use super::*;

        pub use super::serialize;

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<DateTime<Utc>, D::Error> {
            Ok(option::deserialize(deserializer)?.unwrap_or_default())
        }

        pub mod option {
            use super::super::*;

            pub use super::super::option::serialize;

            pub fn deserialize<'de, D: Deserializer<'de>>(
                deserializer: D,
            ) -> Result<Option<DateTime<Utc>>, D::Error> {
                let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
                Ok(match raw {
                    Some(serde_json::Value::String(raw)) if !raw.is_empty() => match parse(&raw) {
                        Ok(value) => Some(value),
                        Err(err) => {
                            tracing::warn!(target: "app::habits", %raw, error = %err, "ignoring unreadable stored date");
                            None
                        }
                    },
                    _ => None,
                })
            }
        }
    }

    pub mod option {
        use super::*;

        pub fn serialize<S: Serializer>(
            value: &Option<DateTime<Utc>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(value) => super::serialize(value, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            match Option::<String>::deserialize(deserializer)? {
                Some(raw) if !raw.is_empty() => parse(&raw).map(Some).map_err(de::Error::custom),
                _ => Ok(None),
            }
        }
    }
}
