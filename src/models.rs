use crate::errors::ValidationError;
use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

pub const DEFAULT_CATEGORY_COLOR: &str = "#6b7280";

const CATEGORY_COLORS: &[(&str, &str)] = &[
    ("fitness", "#ef4444"),
    ("health", "#10b981"),
    ("productivity", "#3b82f6"),
    ("mindfulness", "#f59e0b"),
    ("learning", "#8b5cf6"),
    ("finance", "#06b6d4"),
    ("social", "#ec4899"),
    ("other", DEFAULT_CATEGORY_COLOR),
];

/// Denormalized copy of a category; habits never point at a master list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Category {
    pub name: String,
    pub color: String,
}

impl Default for Category {
    fn default() -> Self {
        Self::from_key("other")
    }
}

impl Category {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
        }
    }

    /// Expands a form key such as `learning` into `Learning` with its fixed
    /// color. Unknown keys keep their capitalized name and fall back to gray.
    pub fn from_key(key: &str) -> Self {
        let key = key.trim();
        let color = CATEGORY_COLORS
            .iter()
            .find(|(known, _)| known.eq_ignore_ascii_case(key))
            .map(|(_, color)| *color)
            .unwrap_or(DEFAULT_CATEGORY_COLOR);
        Self::new(capitalize(key), color)
    }
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Frequency {
    #[default]
    #[serde(alias = "daily")]
    Daily,
    #[serde(alias = "weekly")]
    Weekly,
    #[serde(alias = "monthly")]
    Monthly,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: String,
    pub title: String,
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub frequency: Frequency,
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default)]
    pub streak: u32,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub reminder_time: Option<String>,
}

impl Habit {
    /// Builds a fresh habit from a form draft: streak 0, not completed.
    pub fn from_draft(id: String, draft: NewHabit) -> Result<Self, ValidationError> {
        let duration = match (draft.duration, draft.duration_unit) {
            (Some(amount), Some(unit)) => Some(format!("{} {}", amount.trim(), unit.trim())),
            (amount, _) => amount,
        };

        let habit = Self {
            id,
            title: draft.title.trim().to_string(),
            description: draft.description,
            category: Category::from_key(&draft.category),
            frequency: draft.frequency,
            start_time: draft.start_time,
            duration,
            streak: 0,
            completed: false,
            is_public: draft.is_public,
            reminder_time: draft.reminder_time,
        };
        habit.validate()?;
        Ok(habit)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        if self.category.name.trim().is_empty() {
            return Err(ValidationError::EmptyCategory);
        }
        check_time("startTime", self.start_time.as_deref())?;
        check_time("reminderTime", self.reminder_time.as_deref())?;
        Ok(())
    }
}

fn check_time(field: &'static str, value: Option<&str>) -> Result<(), ValidationError> {
    let Some(value) = value else {
        return Ok(());
    };
    // Fixed width keeps lexicographic order equal to chronological order.
    if value.len() == 5 && NaiveTime::parse_from_str(value, "%H:%M").is_ok() {
        Ok(())
    } else {
        Err(ValidationError::InvalidTime {
            field,
            value: value.to_string(),
        })
    }
}

/// Payload of the new-habit form. `category` is a form key, not a name.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewHabit {
    pub title: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub frequency: Frequency,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub start_time: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub duration: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub duration_unit: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub reminder_time: Option<String>,
    #[serde(default)]
    pub is_public: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FriendStatus {
    Online,
    #[default]
    Offline,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Friend {
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default)]
    pub last_active: String,
    #[serde(default)]
    pub status: FriendStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub sender_id: String,
    pub receiver_id: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HabitFilter {
    #[default]
    All,
    Active,
    Completed,
}

#[derive(Debug, Default, Deserialize)]
pub struct HabitListQuery {
    #[serde(default)]
    pub filter: HabitFilter,
}

#[derive(Debug, Deserialize)]
pub struct AddFriendRequest {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub avatar: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub text: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct DiscoverQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRate {
    pub name: String,
    pub color: String,
    pub total: usize,
    pub completed: usize,
    pub rate: f64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitSeries {
    pub habit_id: String,
    pub label: String,
    pub border_color: String,
    pub background_color: String,
    pub data: Vec<u8>,
}

/// Chart data generated from streak values. Never persisted and never read
/// back as history.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklySeries {
    pub synthetic: bool,
    pub labels: Vec<String>,
    pub dates: Vec<String>,
    pub datasets: Vec<HabitSeries>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledHabit {
    #[serde(flatten)]
    pub habit: Habit,
    pub display_time: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub current_streak: u32,
    pub completed_today: usize,
    pub active_habits: usize,
    pub categories: Vec<CategoryRate>,
    pub schedule: Vec<ScheduledHabit>,
    pub weekly: WeeklySeries,
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|value| !value.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(title: &str, category: &str) -> NewHabit {
        NewHabit {
            title: title.to_string(),
            category: category.to_string(),
            ..NewHabit::default()
        }
    }

    #[test]
    fn category_key_expands_to_name_and_color() {
        assert_eq!(Category::from_key("learning"), Category::new("Learning", "#8b5cf6"));
        assert_eq!(Category::from_key("gardening"), Category::new("Gardening", DEFAULT_CATEGORY_COLOR));
    }

    #[test]
    fn draft_builds_fresh_habit() {
        let mut input = draft("  Read ", "learning");
        input.duration = Some("30".into());
        input.duration_unit = Some("minutes".into());
        let habit = Habit::from_draft("42".into(), input).unwrap();
        assert_eq!(habit.title, "Read");
        assert_eq!(habit.streak, 0);
        assert!(!habit.completed);
        assert_eq!(habit.frequency, Frequency::Daily);
        assert_eq!(habit.duration.as_deref(), Some("30 minutes"));
    }

    #[test]
    fn draft_rejects_blank_title_and_category() {
        assert_eq!(
            Habit::from_draft("1".into(), draft("   ", "health")).unwrap_err(),
            ValidationError::EmptyTitle
        );
        assert_eq!(
            Habit::from_draft("1".into(), draft("Walk", "")).unwrap_err(),
            ValidationError::EmptyCategory
        );
    }

    #[test]
    fn draft_rejects_malformed_times() {
        let mut input = draft("Walk", "health");
        input.start_time = Some("7:30".into());
        assert!(matches!(
            Habit::from_draft("1".into(), input),
            Err(ValidationError::InvalidTime { field: "startTime", .. })
        ));

        let mut input = draft("Walk", "health");
        input.reminder_time = Some("25:00".into());
        assert!(matches!(
            Habit::from_draft("1".into(), input),
            Err(ValidationError::InvalidTime { field: "reminderTime", .. })
        ));
    }

    #[test]
    fn stored_habit_tolerates_missing_and_empty_fields() {
        let habit: Habit = serde_json::from_str(
            r#"{"id":"7","title":"Stretch","startTime":"","frequency":"WEEKLY"}"#,
        )
        .unwrap();
        assert_eq!(habit.start_time, None);
        assert_eq!(habit.frequency, Frequency::Weekly);
        assert_eq!(habit.category, Category::default());
        assert_eq!(habit.streak, 0);
        assert!(!habit.is_public);
    }

    #[test]
    fn habit_serializes_camel_case() {
        let habit = Habit::from_draft("9".into(), draft("Read", "learning")).unwrap();
        let value = serde_json::to_value(&habit).unwrap();
        assert_eq!(value["isPublic"], false);
        assert_eq!(value["frequency"], "DAILY");
        assert!(value.get("startTime").is_none());
    }
}
