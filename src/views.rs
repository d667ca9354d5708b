//! Derived views over the task collection.
//!
//! Calendar-day views take an explicit time zone so "today" and "due on" are
//! evaluated in the user's local calendar, not UTC.

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use serde::Serialize;

use crate::domain::{Folder, Task, TaskStatus};
use crate::error::{Result, TaskletError};

/// Calendar date of `ts` in `tz`.
pub fn local_date<Tz: TimeZone>(ts: &DateTime<Utc>, tz: &Tz) -> NaiveDate {
    ts.with_timezone(tz).date_naive()
}

/// Name of the folder `folder_id` refers to, if it exists.
pub fn folder_name<'a>(folders: &'a [Folder], folder_id: Option<&str>) -> Option<&'a str> {
    let id = folder_id?;
    folders.iter().find(|f| f.id == id).map(|f| f.name.as_str())
}

/// Tasks due on `date`, in collection order.
pub fn tasks_due_on<'a, Tz: TimeZone>(tasks: &'a [Task], date: NaiveDate, tz: &Tz) -> Vec<&'a Task> {
    tasks
        .iter()
        .filter(|t| local_date(&t.due_date, tz) == date)
        .collect()
}

/// Tasks due on `date`, pending first, then by due time.
pub fn tasks_for_day<'a, Tz: TimeZone>(tasks: &'a [Task], date: NaiveDate, tz: &Tz) -> Vec<&'a Task> {
    let mut day = tasks_due_on(tasks, date, tz);
    day.sort_by_key(|t| (t.status.is_completed(), t.due_date));
    day
}

/// Pending tasks due today.
pub fn today_tasks<'a, Tz: TimeZone>(tasks: &'a [Task], now: DateTime<Utc>, tz: &Tz) -> Vec<&'a Task> {
    let today = local_date(&now, tz);
    tasks
        .iter()
        .filter(|t| t.is_pending() && local_date(&t.due_date, tz) == today)
        .collect()
}

/// Pending tasks due after `now`, soonest first.
pub fn upcoming_tasks(tasks: &[Task], now: DateTime<Utc>) -> Vec<&Task> {
    let mut upcoming: Vec<&Task> = tasks
        .iter()
        .filter(|t| t.is_pending() && t.due_date > now)
        .collect();
    upcoming.sort_by_key(|t| t.due_date);
    upcoming
}

pub fn tasks_in_folder<'a>(tasks: &'a [Task], folder_id: &str) -> Vec<&'a Task> {
    tasks.iter().filter(|t| t.in_folder(folder_id)).collect()
}

/// Pending tasks in a folder.
pub fn pending_count(tasks: &[Task], folder_id: &str) -> usize {
    tasks
        .iter()
        .filter(|t| t.is_pending() && t.in_folder(folder_id))
        .count()
}

/// A folder's tasks split by status.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct FolderDetail<'a> {
    /// Soonest due first
    pub pending: Vec<&'a Task>,
    /// Latest due first
    pub completed: Vec<&'a Task>,
}

pub fn folder_detail<'a>(tasks: &'a [Task], folder_id: &str) -> FolderDetail<'a> {
    let (mut pending, mut completed): (Vec<&Task>, Vec<&Task>) = tasks_in_folder(tasks, folder_id)
        .into_iter()
        .partition(|t| t.status == TaskStatus::Pending);
    pending.sort_by_key(|t| t.due_date);
    completed.sort_by(|a, b| b.due_date.cmp(&a.due_date));
    FolderDetail { pending, completed }
}

/// Completion figures over a set of tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    /// Rounded percentage, 0 when there are no tasks
    pub completion_rate: u32,
}

impl Progress {
    pub fn from_tasks<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        let (total, completed) = tasks.into_iter().fold((0, 0), |(total, completed), t| {
            (total + 1, completed + usize::from(t.status.is_completed()))
        });
        let completion_rate = if total > 0 {
            (completed as f64 * 100.0 / total as f64).round() as u32
        } else {
            0
        };
        Self {
            total,
            completed,
            pending: total - completed,
            completion_rate,
        }
    }
}

/// Progress of tasks due between `first` and `last`, both days inclusive.
pub fn progress_between<Tz: TimeZone>(tasks: &[Task], first: NaiveDate, last: NaiveDate, tz: &Tz) -> Progress {
    Progress::from_tasks(tasks.iter().filter(|t| {
        let due = local_date(&t.due_date, tz);
        due >= first && due <= last
    }))
}

/// Progress of tasks due in the given calendar month.
pub fn monthly_progress<Tz: TimeZone>(tasks: &[Task], year: i32, month: u32, tz: &Tz) -> Result<Progress> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| TaskletError::InvalidInput(format!("invalid month: {}-{:02}", year, month)))?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(|| TaskletError::InvalidInput(format!("month out of range: {}-{:02}", year, month)))?;
    let last = next - Duration::days(1);
    Ok(progress_between(tasks, first, last, tz))
}

/// Progress of tasks due in the Sunday-to-Saturday week containing `now`.
pub fn weekly_progress<Tz: TimeZone>(tasks: &[Task], now: DateTime<Utc>, tz: &Tz) -> Progress {
    let today = local_date(&now, tz);
    let start = today - Duration::days(i64::from(today.weekday().num_days_from_sunday()));
    let end = start + Duration::days(6);
    progress_between(tasks, start, end, tz)
}

/// Collection totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub tasks: usize,
    pub folders: usize,
    pub completed: usize,
}

pub fn stats(tasks: &[Task], folders: &[Folder]) -> Stats {
    Stats {
        tasks: tasks.len(),
        folders: folders.len(),
        completed: tasks.iter().filter(|t| t.status.is_completed()).count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NewTask, Priority};
    use chrono::FixedOffset;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn task(title: &str, due: DateTime<Utc>, status: TaskStatus, folder: Option<&str>) -> Task {
        let mut fields = NewTask::new(title, due).status(status).priority(Priority::Low);
        if let Some(folder) = folder {
            fields = fields.folder(folder);
        }
        Task::create(fields)
    }

    fn titles(tasks: &[&Task]) -> Vec<String> {
        tasks.iter().map(|t| t.title.clone()).collect()
    }

    #[test]
    fn test_today_tasks_only_pending_due_today() {
        let now = at(2025, 1, 10, 12);
        let tasks = vec![
            task("morning", at(2025, 1, 10, 8), TaskStatus::Pending, None),
            task("done", at(2025, 1, 10, 9), TaskStatus::Completed, None),
            task("tomorrow", at(2025, 1, 11, 9), TaskStatus::Pending, None),
        ];
        assert_eq!(titles(&today_tasks(&tasks, now, &Utc)), vec!["morning"]);
    }

    #[test]
    fn test_today_respects_time_zone() {
        // 23:30 UTC on the 10th is already the 11th at UTC+2
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        let now = at(2025, 1, 11, 8);
        let tasks = vec![task(
            "late",
            Utc.with_ymd_and_hms(2025, 1, 10, 23, 30, 0).unwrap(),
            TaskStatus::Pending,
            None,
        )];
        assert_eq!(today_tasks(&tasks, now, &plus_two).len(), 1);
        assert!(today_tasks(&tasks, now, &Utc).is_empty());
    }

    #[test]
    fn test_upcoming_sorted_and_strictly_after_now() {
        let now = at(2025, 1, 10, 12);
        let tasks = vec![
            task("later", at(2025, 1, 20, 9), TaskStatus::Pending, None),
            task("past", at(2025, 1, 9, 9), TaskStatus::Pending, None),
            task("soon", at(2025, 1, 11, 9), TaskStatus::Pending, None),
            task("done", at(2025, 1, 12, 9), TaskStatus::Completed, None),
        ];
        assert_eq!(titles(&upcoming_tasks(&tasks, now)), vec!["soon", "later"]);
    }

    #[test]
    fn test_tasks_for_day_pending_first() {
        let day = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        let tasks = vec![
            task("done early", at(2025, 1, 10, 7), TaskStatus::Completed, None),
            task("pending late", at(2025, 1, 10, 18), TaskStatus::Pending, None),
            task("pending early", at(2025, 1, 10, 8), TaskStatus::Pending, None),
            task("other day", at(2025, 1, 11, 8), TaskStatus::Pending, None),
        ];
        assert_eq!(
            titles(&tasks_for_day(&tasks, day, &Utc)),
            vec!["pending early", "pending late", "done early"]
        );
        assert_eq!(tasks_due_on(&tasks, day, &Utc).len(), 3);
    }

    #[test]
    fn test_folder_detail_ordering() {
        let tasks = vec![
            task("p2", at(2025, 1, 12, 9), TaskStatus::Pending, Some("f")),
            task("c1", at(2025, 1, 1, 9), TaskStatus::Completed, Some("f")),
            task("p1", at(2025, 1, 11, 9), TaskStatus::Pending, Some("f")),
            task("c2", at(2025, 1, 5, 9), TaskStatus::Completed, Some("f")),
            task("elsewhere", at(2025, 1, 11, 9), TaskStatus::Pending, Some("g")),
        ];
        let detail = folder_detail(&tasks, "f");
        assert_eq!(titles(&detail.pending), vec!["p1", "p2"]);
        assert_eq!(titles(&detail.completed), vec!["c2", "c1"]);
        assert_eq!(pending_count(&tasks, "f"), 2);
        assert_eq!(tasks_in_folder(&tasks, "g").len(), 1);
    }

    #[test]
    fn test_progress_rounding() {
        let tasks = vec![
            task("a", at(2025, 1, 1, 9), TaskStatus::Completed, None),
            task("b", at(2025, 1, 2, 9), TaskStatus::Completed, None),
            task("c", at(2025, 1, 3, 9), TaskStatus::Pending, None),
        ];
        let progress = Progress::from_tasks(&tasks);
        assert_eq!(progress.total, 3);
        assert_eq!(progress.completed, 2);
        assert_eq!(progress.pending, 1);
        assert_eq!(progress.completion_rate, 67);
    }

    #[test]
    fn test_progress_empty() {
        assert_eq!(Progress::from_tasks(&Vec::<Task>::new()), Progress::default());
    }

    #[test]
    fn test_monthly_progress_includes_last_day() {
        let tasks = vec![
            task("first", at(2025, 1, 1, 0), TaskStatus::Completed, None),
            task("last", at(2025, 1, 31, 23), TaskStatus::Pending, None),
            task("feb", at(2025, 2, 1, 0), TaskStatus::Pending, None),
            task("dec", at(2024, 12, 31, 23), TaskStatus::Pending, None),
        ];
        let progress = monthly_progress(&tasks, 2025, 1, &Utc).unwrap();
        assert_eq!(progress.total, 2);
        assert_eq!(progress.completion_rate, 50);

        let december = monthly_progress(&tasks, 2024, 12, &Utc).unwrap();
        assert_eq!(december.total, 1);
    }

    #[test]
    fn test_monthly_progress_rejects_bad_month() {
        assert!(monthly_progress(&[], 2025, 13, &Utc).is_err());
        assert!(monthly_progress(&[], 2025, 0, &Utc).is_err());
    }

    #[test]
    fn test_weekly_progress_sunday_to_saturday() {
        // 2025-01-08 is a Wednesday; its week runs 2025-01-05 (Sun) to 2025-01-11 (Sat)
        let now = at(2025, 1, 8, 12);
        let tasks = vec![
            task("sun", at(2025, 1, 5, 0), TaskStatus::Completed, None),
            task("sat", at(2025, 1, 11, 23), TaskStatus::Pending, None),
            task("prev sat", at(2025, 1, 4, 23), TaskStatus::Completed, None),
            task("next sun", at(2025, 1, 12, 0), TaskStatus::Pending, None),
        ];
        let progress = weekly_progress(&tasks, now, &Utc);
        assert_eq!(progress.total, 2);
        assert_eq!(progress.completed, 1);
    }

    #[test]
    fn test_stats_and_folder_name() {
        let folders = vec![Folder::new("Work"), Folder::completed()];
        let tasks = vec![
            task("a", at(2025, 1, 1, 9), TaskStatus::Completed, Some(folders[1].id.as_str())),
            task("b", at(2025, 1, 2, 9), TaskStatus::Pending, Some(folders[0].id.as_str())),
        ];
        assert_eq!(
            stats(&tasks, &folders),
            Stats {
                tasks: 2,
                folders: 2,
                completed: 1
            }
        );
        assert_eq!(folder_name(&folders, tasks[1].folder_id.as_deref()), Some("Work"));
        assert_eq!(folder_name(&folders, Some("gone")), None);
        assert_eq!(folder_name(&folders, None), None);
    }
}
