//! Parsing of user-typed dates and record references.
//!
//! This is the input boundary: values are validated here before they reach
//! the store.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use tasklet::domain::{Folder, Task, timestamp};
use tasklet::{Result, TaskletError};

fn local_to_utc(naive: NaiveDateTime) -> Result<DateTime<Utc>> {
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| TaskletError::InvalidInput(format!("{} does not exist in the local time zone", naive)))
}

/// Parse a calendar date (`YYYY-MM-DD`).
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| TaskletError::InvalidInput(format!("expected YYYY-MM-DD, got {:?}", input)))
}

/// Parse a point in time.
///
/// Accepts `YYYY-MM-DD` (local midnight), `YYYY-MM-DDTHH:MM` or
/// `YYYY-MM-DD HH:MM` (local time), or a full RFC 3339 timestamp.
pub fn parse_when(input: &str) -> Result<DateTime<Utc>> {
    let input = input.trim();

    if let Ok(ts) = timestamp::parse_iso(input) {
        return Ok(ts);
    }
    for format in ["%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return local_to_utc(naive);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return local_to_utc(date.and_time(NaiveTime::MIN));
    }

    Err(TaskletError::InvalidInput(format!(
        "unrecognized date {:?} (use YYYY-MM-DD, YYYY-MM-DDTHH:MM or RFC 3339)",
        input
    )))
}

/// Parse `YYYY-MM` into (year, month).
pub fn parse_month(input: &str) -> Result<(i32, u32)> {
    let invalid = || TaskletError::InvalidInput(format!("expected YYYY-MM, got {:?}", input));
    let (year, month) = input.trim().split_once('-').ok_or_else(invalid)?;
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&month) {
        return Err(invalid());
    }
    Ok((year, month))
}

/// Find a task by exact id or unique id prefix.
pub fn resolve_task<'a>(tasks: &'a [Task], key: &str) -> Result<&'a Task> {
    if let Some(task) = tasks.iter().find(|t| t.id == key) {
        return Ok(task);
    }
    let matches: Vec<&Task> = tasks.iter().filter(|t| t.id.starts_with(key)).collect();
    match matches.as_slice() {
        [task] if !key.is_empty() => Ok(*task),
        [] | [_] => Err(TaskletError::NotFound(format!("task {}", key))),
        _ => Err(TaskletError::InvalidInput(format!(
            "task id prefix {:?} matches {} tasks",
            key,
            matches.len()
        ))),
    }
}

/// Find a folder by exact id, then by case-insensitive name.
pub fn resolve_folder<'a>(folders: &'a [Folder], key: &str) -> Result<&'a Folder> {
    if let Some(folder) = folders.iter().find(|f| f.id == key) {
        return Ok(folder);
    }
    let matches: Vec<&Folder> = folders
        .iter()
        .filter(|f| f.name.eq_ignore_ascii_case(key.trim()))
        .collect();
    match matches.as_slice() {
        [folder] => Ok(*folder),
        [] => Err(TaskletError::NotFound(format!("folder {}", key))),
        _ => Err(TaskletError::InvalidInput(format!("folder name {:?} is ambiguous; use its id", key))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;
    use tasklet::domain::NewTask;

    #[test]
    fn test_parse_when_rfc3339() {
        let ts = parse_when("2025-01-10T09:30:00Z").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2025, 1, 10, 9, 30, 0).unwrap());
    }

    #[test]
    fn test_parse_when_local_forms() {
        let midnight = parse_when("2025-01-10").unwrap().with_timezone(&Local);
        assert_eq!(midnight.date_naive(), NaiveDate::from_ymd_opt(2025, 1, 10).unwrap());
        assert_eq!(midnight.hour(), 0);

        let evening = parse_when("2025-01-10T18:45").unwrap().with_timezone(&Local);
        assert_eq!((evening.hour(), evening.minute()), (18, 45));
        assert_eq!(parse_when("2025-01-10 18:45").unwrap(), evening.with_timezone(&Utc));
    }

    #[test]
    fn test_parse_when_rejects_garbage() {
        assert!(parse_when("tomorrow").is_err());
        assert!(parse_when("2025-13-01").is_err());
    }

    #[test]
    fn test_parse_date_and_month() {
        assert_eq!(parse_date("2025-02-28").unwrap(), NaiveDate::from_ymd_opt(2025, 2, 28).unwrap());
        assert!(parse_date("28/02/2025").is_err());
        assert_eq!(parse_month("2025-03").unwrap(), (2025, 3));
        assert!(parse_month("2025-13").is_err());
        assert!(parse_month("2025").is_err());
    }

    #[test]
    fn test_resolve_task_by_prefix() {
        let due = Utc.with_ymd_and_hms(2025, 1, 10, 0, 0, 0).unwrap();
        let mut a = Task::create(NewTask::new("a", due));
        a.id = "abc123".to_string();
        let mut b = Task::create(NewTask::new("b", due));
        b.id = "abd456".to_string();
        let tasks = vec![a, b];

        assert_eq!(resolve_task(&tasks, "abc123").unwrap().title, "a");
        assert_eq!(resolve_task(&tasks, "abd").unwrap().title, "b");
        assert!(matches!(resolve_task(&tasks, "ab"), Err(TaskletError::InvalidInput(_))));
        assert!(matches!(resolve_task(&tasks, "zzz"), Err(TaskletError::NotFound(_))));
    }

    #[test]
    fn test_resolve_folder_by_name() {
        let folders = vec![Folder::new("Work/Project"), Folder::completed()];
        assert!(resolve_folder(&folders, "work/project").unwrap().name == "Work/Project");
        assert!(resolve_folder(&folders, "completed-tasks-folder").unwrap().is_reserved());
        assert!(resolve_folder(&folders, "Nope").is_err());
    }
}
