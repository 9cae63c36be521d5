use chrono::{DateTime, TimeZone};
use serde::Serialize;

use crate::models::habit::HabitRecord;

/// Dashboard groups, each in store order.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HabitSections {
    pub mood: Vec<HabitRecord>,
    pub configured: Vec<HabitRecord>,
    pub custom: Vec<HabitRecord>,
}

impl HabitSections {
    pub fn len(&self) -> usize {
        self.mood.len() + self.configured.len() + self.custom.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Mood habits, then configured, then custom.
    pub fn into_display_list(self) -> Vec<HabitRecord> {
        let mut list = self.mood;
        list.extend(self.configured);
        list.extend(self.custom);
        list
    }
}

/// A mood habit shows on `today` when it has no target date (older records) or
/// its target falls on the same calendar day in `today`'s time zone. Mood
/// habits from other days drop off, which gives them a daily reset.
pub fn is_mood_habit_visible<Tz: TimeZone>(record: &HabitRecord, today: &DateTime<Tz>) -> bool {
    match record.target_date {
        None => true,
        Some(target) => target.with_timezone(&today.timezone()).date_naive() == today.date_naive(),
    }
}

/// Splits all stored habits into dashboard groups. Records without a category
/// are not shown. A `"Custom"` record lands in both the configured and the
/// custom group.
pub fn build_sections<Tz: TimeZone>(goals: &[HabitRecord], today: &DateTime<Tz>) -> HabitSections {
    let mut sections = HabitSections::default();

    for goal in goals {
        let source = &goal.category;
        if source.is_mood() && is_mood_habit_visible(goal, today) {
            sections.mood.push(goal.clone());
        }
        if source.is_configured() {
            sections.configured.push(goal.clone());
        }
        if source.is_custom() {
            sections.custom.push(goal.clone());
        }
    }

    sections
}

pub fn build_display_list<Tz: TimeZone>(goals: &[HabitRecord], today: &DateTime<Tz>) -> Vec<HabitRecord> {
    build_sections(goals, today).into_display_list()
}
