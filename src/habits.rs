use crate::errors::{HabitError, StoreError};
use crate::models::{Category, Frequency, Habit, NewHabit};
use crate::repository::Collection;
use crate::storage::SlotStore;
use chrono::Utc;
use tracing::{debug, info};

/// The user's habits, loaded once and written back in full after every
/// mutation. Unknown ids make mutations a silent no-op.
#[derive(Debug)]
pub struct HabitRepository {
    habits: Collection<Habit>,
}

impl HabitRepository {
    pub async fn load(store: SlotStore) -> Self {
        Self {
            habits: Collection::load(store).await,
        }
    }

    pub fn habits(&self) -> &[Habit] {
        self.habits.items()
    }

    pub fn get(&self, id: &str) -> Option<&Habit> {
        self.habits.get(id)
    }

    pub async fn create_habit(&mut self, draft: NewHabit) -> Result<Habit, HabitError> {
        let id = self.next_id(Utc::now().timestamp_millis());
        let habit = Habit::from_draft(id, draft)?;
        self.habits.apply(|habits| habits.push(habit.clone())).await?;
        info!("created habit {} ({})", habit.id, habit.title);
        Ok(habit)
    }

    pub async fn toggle_completion(&mut self, id: &str) -> Result<(), StoreError> {
        let toggled = self
            .habits
            .apply(|habits| match habits.iter_mut().find(|habit| habit.id == id) {
                Some(habit) => {
                    habit.completed = !habit.completed;
                    true
                }
                None => false,
            })
            .await?;
        if !toggled {
            debug!("toggle ignored for unknown habit {id}");
        }
        Ok(())
    }

    /// Replaces the stored record with `edited`. The id in the path wins over
    /// whatever id the edited copy carries. Unknown ids are ignored before the
    /// edit is validated.
    pub async fn update_habit(&mut self, id: &str, mut edited: Habit) -> Result<(), HabitError> {
        if !self.habits.contains(id) {
            debug!("update ignored for unknown habit {id}");
            self.habits.persist().await?;
            return Ok(());
        }

        edited.id = id.to_string();
        edited.validate()?;
        self.habits
            .apply(|habits| {
                if let Some(habit) = habits.iter_mut().find(|habit| habit.id == edited.id) {
                    *habit = edited;
                }
            })
            .await?;
        Ok(())
    }

    pub async fn delete_habit(&mut self, id: &str) -> Result<(), StoreError> {
        let removed = self
            .habits
            .apply(|habits| {
                let before = habits.len();
                habits.retain(|habit| habit.id != id);
                habits.len() != before
            })
            .await?;
        if removed {
            info!("deleted habit {id}");
        }
        Ok(())
    }

    /// Writes the sample habits when the slot holds nothing. Returns whether
    /// anything was seeded.
    pub async fn seed_samples(&mut self) -> Result<bool, StoreError> {
        if !self.habits.is_empty() {
            return Ok(false);
        }
        self.habits.apply(|habits| *habits = sample_habits()).await?;
        info!("seeded {} sample habits", self.habits.len());
        Ok(true)
    }

    fn next_id(&self, now_millis: i64) -> String {
        let mut candidate = now_millis;
        while self.habits.contains(&candidate.to_string()) {
            candidate += 1;
        }
        candidate.to_string()
    }
}

#[allow(clippy::too_many_arguments)]
fn sample_habit(
    id: &str,
    title: &str,
    description: &str,
    category: Category,
    start_time: &str,
    duration: &str,
    streak: u32,
    is_public: bool,
) -> Habit {
    Habit {
        id: id.to_string(),
        title: title.to_string(),
        description: Some(description.to_string()),
        category,
        frequency: Frequency::Daily,
        start_time: Some(start_time.to_string()),
        duration: Some(duration.to_string()),
        streak,
        completed: false,
        is_public,
        reminder_time: None,
    }
}

pub fn sample_habits() -> Vec<Habit> {
    vec![
        sample_habit(
            "1",
            "Morning Meditation",
            "Meditate for 10 minutes each morning to start the day mindfully",
            Category::new("Wellness", "#0ea5e9"),
            "07:00",
            "10 minutes",
            7,
            true,
        ),
        sample_habit(
            "2",
            "Drink 8 glasses of water",
            "Stay hydrated throughout the day",
            Category::new("Health", "#10b981"),
            "08:00",
            "5 minutes",
            5,
            false,
        ),
        sample_habit(
            "3",
            "Read for 30 minutes",
            "Read a book to expand knowledge and relax",
            Category::new("Personal Growth", "#8b5cf6"),
            "19:30",
            "30 minutes",
            12,
            true,
        ),
        sample_habit(
            "4",
            "Exercise",
            "Do 30 minutes of physical activity",
            Category::new("Fitness", "#ef4444"),
            "17:00",
            "30 minutes",
            3,
            true,
        ),
        sample_habit(
            "5",
            "Journal",
            "Write about your day and reflections",
            Category::new("Mindfulness", "#f59e0b"),
            "21:00",
            "15 minutes",
            9,
            false,
        ),
    ]
}
