use crate::models::{CategoryRate, DashboardResponse, Habit, HabitFilter, ScheduledHabit};
use crate::synthetic::weekly_series;
use chrono::{Local, NaiveDate};
use rand::Rng;

pub fn current_streak(habits: &[Habit]) -> u32 {
    habits.iter().map(|habit| habit.streak).max().unwrap_or(0)
}

/// Habits whose flag is set right now. The flag is never reset at midnight,
/// so "today" means "since it was last toggled".
pub fn completed_today(habits: &[Habit]) -> usize {
    habits.iter().filter(|habit| habit.completed).count()
}

/// Completion rate per category name, in order of first appearance. The
/// color is taken from the first habit seen in each category.
pub fn category_completion(habits: &[Habit]) -> Vec<CategoryRate> {
    let mut rates: Vec<CategoryRate> = Vec::new();
    for habit in habits {
        let index = match rates.iter().position(|rate| rate.name == habit.category.name) {
            Some(index) => index,
            None => {
                rates.push(CategoryRate {
                    name: habit.category.name.clone(),
                    color: habit.category.color.clone(),
                    total: 0,
                    completed: 0,
                    rate: 0.0,
                });
                rates.len() - 1
            }
        };
        let rate = &mut rates[index];
        rate.total += 1;
        if habit.completed {
            rate.completed += 1;
        }
    }

    for rate in &mut rates {
        rate.rate = 100.0 * rate.completed as f64 / rate.total as f64;
    }
    rates
}

/// Ascending by `HH:MM`; habits without a start time go last in input order.
pub fn sort_by_start_time(habits: &[Habit]) -> Vec<Habit> {
    let mut sorted = habits.to_vec();
    sorted.sort_by(|a, b| match (&a.start_time, &b.start_time) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
    sorted
}

pub fn filter_habits(habits: &[Habit], filter: HabitFilter) -> Vec<Habit> {
    habits
        .iter()
        .filter(|habit| match filter {
            HabitFilter::All => true,
            HabitFilter::Active => !habit.completed,
            HabitFilter::Completed => habit.completed,
        })
        .cloned()
        .collect()
}

/// `"19:30"` becomes `"7:30 PM"`. Anything that does not start with an hour
/// is returned unchanged.
pub fn format_time_12h(time: &str) -> String {
    let Some((hours, minutes)) = time.split_once(':') else {
        return time.to_string();
    };
    let Ok(hour) = hours.trim().parse::<u32>() else {
        return time.to_string();
    };
    let suffix = if hour >= 12 { "PM" } else { "AM" };
    let display_hour = match hour % 12 {
        0 => 12,
        other => other,
    };
    format!("{display_hour}:{minutes} {suffix}")
}

pub fn build_dashboard(habits: &[Habit]) -> DashboardResponse {
    build_dashboard_at(Local::now().date_naive(), habits, &mut rand::thread_rng())
}

pub fn build_dashboard_at<R: Rng + ?Sized>(
    today: NaiveDate,
    habits: &[Habit],
    rng: &mut R,
) -> DashboardResponse {
    let schedule = sort_by_start_time(habits)
        .into_iter()
        .map(|habit| ScheduledHabit {
            display_time: habit.start_time.as_deref().map(format_time_12h),
            habit,
        })
        .collect();

    DashboardResponse {
        current_streak: current_streak(habits),
        completed_today: completed_today(habits),
        active_habits: habits.len(),
        categories: category_completion(habits),
        schedule,
        weekly: weekly_series(today, habits, rng),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::habits::sample_habits;
    use crate::models::Category;
    use rand::rngs::mock::StepRng;

    fn habit(id: &str, category: &str, completed: bool) -> Habit {
        let mut habit = sample_habits().remove(0);
        habit.id = id.to_string();
        habit.category = Category::new(category, "#000000");
        habit.completed = completed;
        habit
    }

    fn timed(id: &str, start_time: Option<&str>) -> Habit {
        let mut habit = habit(id, "Health", false);
        habit.start_time = start_time.map(str::to_string);
        habit
    }

    #[test]
    fn streak_is_max_or_zero() {
        assert_eq!(current_streak(&[]), 0);
        assert_eq!(current_streak(&sample_habits()), 12);
    }

    #[test]
    fn completed_today_counts_flags() {
        let habits = vec![habit("1", "A", true), habit("2", "A", false), habit("3", "B", true)];
        assert_eq!(completed_today(&habits), 2);
        assert_eq!(completed_today(&[]), 0);
    }

    #[test]
    fn category_rates_are_exact_ratios() {
        let habits = vec![
            habit("1", "Health", true),
            habit("2", "Fitness", false),
            habit("3", "Health", false),
            habit("4", "Health", true),
            habit("5", "Fitness", true),
        ];
        let rates = category_completion(&habits);

        assert_eq!(rates.len(), 2);
        assert_eq!(rates[0].name, "Health");
        assert_eq!((rates[0].total, rates[0].completed), (3, 2));
        assert_eq!(rates[0].rate, 100.0 * 2.0 / 3.0);
        assert_eq!(rates[1].name, "Fitness");
        assert_eq!(rates[1].rate, 50.0);
    }

    #[test]
    fn empty_snapshot_has_no_categories() {
        assert!(category_completion(&[]).is_empty());
    }

    #[test]
    fn sort_puts_untimed_habits_last() {
        let habits = vec![
            timed("a", Some("09:00")),
            timed("b", None),
            timed("c", Some("07:30")),
            timed("d", None),
        ];
        let order: Vec<_> = sort_by_start_time(&habits)
            .into_iter()
            .map(|habit| habit.id)
            .collect();
        assert_eq!(order, vec!["c", "a", "b", "d"]);
    }

    #[test]
    fn filter_splits_active_and_completed() {
        let habits = vec![habit("1", "A", true), habit("2", "A", false)];
        assert_eq!(filter_habits(&habits, HabitFilter::All).len(), 2);
        assert_eq!(filter_habits(&habits, HabitFilter::Active)[0].id, "2");
        assert_eq!(filter_habits(&habits, HabitFilter::Completed)[0].id, "1");
    }

    #[test]
    fn times_render_in_twelve_hour_clock() {
        assert_eq!(format_time_12h("19:30"), "7:30 PM");
        assert_eq!(format_time_12h("07:05"), "7:05 AM");
        assert_eq!(format_time_12h("00:15"), "12:15 AM");
        assert_eq!(format_time_12h("12:00"), "12:00 PM");
        assert_eq!(format_time_12h("soon"), "soon");
    }

    #[test]
    fn dashboard_combines_views() {
        let today = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        let mut habits = sample_habits();
        habits[2].completed = true;
        let dashboard = build_dashboard_at(today, &habits, &mut StepRng::new(0, 0));

        assert_eq!(dashboard.current_streak, 12);
        assert_eq!(dashboard.completed_today, 1);
        assert_eq!(dashboard.active_habits, 5);
        assert_eq!(dashboard.categories.len(), 5);
        assert_eq!(dashboard.schedule[0].habit.title, "Morning Meditation");
        assert_eq!(dashboard.schedule[0].display_time.as_deref(), Some("7:00 AM"));
        assert!(dashboard.weekly.synthetic);
    }
}
