//! Mock social surfaces: user discovery, the activity feed and achievements.
//! None of this is persisted; only the friend list built from discovery is.

use crate::models::Friend;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveredUser {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub mutual_friends: u32,
    pub is_following: bool,
}

fn suggested(id: &str, name: &str, mutual_friends: u32) -> DiscoveredUser {
    DiscoveredUser {
        id: id.to_string(),
        name: name.to_string(),
        avatar: None,
        mutual_friends,
        is_following: false,
    }
}

pub fn suggested_users() -> Vec<DiscoveredUser> {
    vec![
        suggested("user5", "John Smith", 3),
        suggested("user6", "Emma Wilson", 2),
        suggested("user7", "David Kim", 1),
        suggested("user8", "Lisa Brown", 4),
        suggested("user9", "Thomas Wilson", 2),
    ]
}

/// Case-insensitive substring search over `suggested`. When nobody matches the
/// query exactly, a placeholder user carrying the query as name is listed
/// first so it can still be added.
pub fn search_users(query: &str, suggested: &[DiscoveredUser], now_millis: i64) -> Vec<DiscoveredUser> {
    let query = query.trim();
    if query.is_empty() {
        return Vec::new();
    }
    let needle = query.to_lowercase();

    let mut results = Vec::new();
    if !suggested.iter().any(|user| user.name.to_lowercase() == needle) {
        results.push(DiscoveredUser {
            id: format!("search-{now_millis}"),
            name: query.to_string(),
            avatar: None,
            mutual_friends: 0,
            is_following: false,
        });
    }
    results.extend(
        suggested
            .iter()
            .filter(|user| user.name.to_lowercase().contains(&needle))
            .cloned(),
    );
    results
}

pub fn mark_following(users: &mut [DiscoveredUser], friends: &[Friend]) {
    for user in users {
        user.is_following = friends.iter().any(|friend| friend.id == user.id);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedUser {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedHabit {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedAchievement {
    pub title: String,
    pub description: String,
    pub badge: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeedEvent {
    Streak {
        habit: FeedHabit,
        #[serde(rename = "streakCount")]
        streak_count: u32,
    },
    Achievement {
        achievement: FeedAchievement,
    },
    NewHabit {
        habit: FeedHabit,
    },
    Comment {
        #[serde(rename = "targetUser")]
        target_user: FeedUser,
        habit: FeedHabit,
        comment: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedItem {
    pub id: String,
    pub user: FeedUser,
    #[serde(flatten)]
    pub event: FeedEvent,
    pub timestamp: DateTime<Utc>,
    pub time_ago: String,
}

fn feed_user(id: &str, name: &str, avatar: Option<&str>) -> FeedUser {
    FeedUser {
        id: id.to_string(),
        name: name.to_string(),
        avatar: avatar.map(str::to_string),
    }
}

fn feed_habit(id: &str, title: &str, category: Option<&str>) -> FeedHabit {
    FeedHabit {
        id: id.to_string(),
        title: title.to_string(),
        category: category.map(str::to_string),
    }
}

pub fn build_feed(now: DateTime<Utc>) -> Vec<FeedItem> {
    let alex = feed_user("user1", "Alex Johnson", Some("/avatars/alex.jpg"));
    let sarah = feed_user("user2", "Sarah Williams", Some("/avatars/sarah.jpg"));
    let mike = feed_user("user3", "Mike Chen", Some("/avatars/mike.jpg"));
    let jessica = feed_user("user4", "Jessica Lee", Some("/avatars/jessica.jpg"));

    let entries = vec![
        (
            "1",
            alex.clone(),
            FeedEvent::Streak {
                habit: feed_habit("habit1", "Morning Run", Some("Fitness")),
                streak_count: 30,
            },
            Duration::hours(2),
        ),
        (
            "2",
            sarah.clone(),
            FeedEvent::Achievement {
                achievement: FeedAchievement {
                    title: "Consistency Master".into(),
                    description: "Completed all habits for 7 days straight".into(),
                    badge: "🏆".into(),
                },
            },
            Duration::hours(5),
        ),
        (
            "3",
            mike,
            FeedEvent::NewHabit {
                habit: feed_habit("habit3", "Read 30 minutes", Some("Learning")),
            },
            Duration::hours(8),
        ),
        (
            "4",
            sarah,
            FeedEvent::Comment {
                target_user: feed_user(&alex.id, &alex.name, None),
                habit: feed_habit("habit1", "Morning Run", None),
                comment: "You're doing great! Keep it up!".into(),
            },
            Duration::hours(12),
        ),
        (
            "5",
            jessica,
            FeedEvent::Streak {
                habit: feed_habit("habit4", "Meditation", Some("Mindfulness")),
                streak_count: 15,
            },
            Duration::hours(24),
        ),
    ];

    entries
        .into_iter()
        .map(|(id, user, event, ago)| {
            let timestamp = now - ago;
            FeedItem {
                id: id.to_string(),
                user,
                event,
                timestamp,
                time_ago: format_time_ago(now, timestamp),
            }
        })
        .collect()
}

/// Relative label using the largest unit that fits more than once, so exactly
/// one day reads as "24 hours ago".
pub fn format_time_ago(now: DateTime<Utc>, then: DateTime<Utc>) -> String {
    const UNITS: &[(f64, &str)] = &[
        (31_536_000.0, "years"),
        (2_592_000.0, "months"),
        (86_400.0, "days"),
        (3_600.0, "hours"),
        (60.0, "minutes"),
    ];

    let seconds = (now - then).num_seconds() as f64;
    for (size, unit) in UNITS {
        let interval = seconds / size;
        if interval > 1.0 {
            return format!("{} {unit} ago", interval.floor() as i64);
        }
    }
    format!("{} seconds ago", seconds.floor() as i64)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Achievement {
    pub id: String,
    pub title: String,
    pub description: String,
    pub badge: String,
    pub date: Option<String>,
    pub progress: u8,
}

impl Achievement {
    pub fn is_complete(&self) -> bool {
        self.progress >= 100
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AchievementFilter {
    #[default]
    All,
    Completed,
    InProgress,
}

#[derive(Debug, Default, Deserialize)]
pub struct AchievementQuery {
    #[serde(default)]
    pub filter: AchievementFilter,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementsResponse {
    pub total: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub achievements: Vec<Achievement>,
}

fn achievement(id: &str, title: &str, description: &str, badge: &str, date: Option<&str>, progress: u8) -> Achievement {
    Achievement {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        badge: badge.to_string(),
        date: date.map(str::to_string),
        progress,
    }
}

pub fn all_achievements() -> Vec<Achievement> {
    vec![
        achievement("1", "First Timer", "Complete your first habit", "🔰", Some("2023-12-01"), 100),
        achievement(
            "2",
            "Consistency Master",
            "Complete all habits for 7 days straight",
            "🏆",
            Some("2023-12-15"),
            100,
        ),
        achievement("3", "Fitness Enthusiast", "Complete 20 fitness habits", "💪", Some("2024-01-10"), 100),
        achievement("4", "Mindfulness Guru", "Complete 30 mindfulness habits", "🧘", None, 67),
        achievement("5", "Early Bird", "Complete morning habits for 14 days straight", "🐦", None, 85),
        achievement("6", "Social Butterfly", "Connect with 5 friends", "🦋", None, 40),
        achievement("7", "Habit Master", "Create and actively maintain 10 habits", "👑", None, 50),
        achievement("8", "Iron Will", "Reach a 30-day streak with any habit", "⚔️", None, 23),
    ]
}

pub fn build_achievements(filter: AchievementFilter) -> AchievementsResponse {
    let all = all_achievements();
    let completed = all.iter().filter(|item| item.is_complete()).count();
    let total = all.len();

    let achievements = all
        .into_iter()
        .filter(|item| match filter {
            AchievementFilter::All => true,
            AchievementFilter::Completed => item.is_complete(),
            AchievementFilter::InProgress => !item.is_complete(),
        })
        .collect();

    AchievementsResponse {
        total,
        completed,
        in_progress: total - completed,
        achievements,
    }
}
