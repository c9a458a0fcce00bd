//! Sample chart data for the dashboard.
//!
//! No completion history is stored anywhere, so the weekly series is drawn at
//! random from each habit's streak on every request. Output is always tagged
//! `synthetic: true`; a real history store should replace this module rather
//! than feed into it.

use crate::models::{Habit, HabitSeries, WeeklySeries};
use chrono::{Duration, NaiveDate};
use rand::Rng;

pub const DAYS_IN_SERIES: i64 = 7;

const FALLBACK_COLORS: &[(&str, &str)] = &[
    ("rgb(59, 130, 246)", "rgba(59, 130, 246, 0.2)"),
    ("rgb(16, 185, 129)", "rgba(16, 185, 129, 0.2)"),
    ("rgb(249, 115, 22)", "rgba(249, 115, 22, 0.2)"),
    ("rgb(139, 92, 246)", "rgba(139, 92, 246, 0.2)"),
    ("rgb(239, 68, 68)", "rgba(239, 68, 68, 0.2)"),
];

/// Chance that a habit shows as completed on any given day.
pub fn completion_probability(streak: u32) -> f64 {
    (0.5 + f64::from(streak) / 20.0).min(0.9)
}

pub fn weekly_series<R: Rng + ?Sized>(today: NaiveDate, habits: &[Habit], rng: &mut R) -> WeeklySeries {
    let days: Vec<NaiveDate> = (0..DAYS_IN_SERIES)
        .rev()
        .map(|offset| today - Duration::days(offset))
        .collect();

    let datasets = habits
        .iter()
        .enumerate()
        .map(|(index, habit)| {
            let probability = completion_probability(habit.streak);
            let data = days
                .iter()
                .map(|_| u8::from(rng.gen_bool(probability)))
                .collect();
            let (border_color, background_color) = series_colors(habit, index);
            HabitSeries {
                habit_id: habit.id.clone(),
                label: habit.title.clone(),
                border_color,
                background_color,
                data,
            }
        })
        .collect();

    WeeklySeries {
        synthetic: true,
        labels: days.iter().map(|day| day.format("%a").to_string()).collect(),
        dates: days.iter().map(|day| day.to_string()).collect(),
        datasets,
    }
}

fn series_colors(habit: &Habit, index: usize) -> (String, String) {
    let color = habit.category.color.trim();
    if color.is_empty() {
        let (border, background) = FALLBACK_COLORS[index % FALLBACK_COLORS.len()];
        (border.to_string(), background.to_string())
    } else {
        // 0x33 alpha on a hex color is roughly 20% opacity.
        (color.to_string(), format!("{color}33"))
    }
}
