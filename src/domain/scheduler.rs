//! Due dates for tasks, derived from priority

use chrono::{DateTime, Duration, NaiveTime, TimeZone};

use crate::schemas::Priority;

/// 23:59:59.999, the time of day every due date is normalized to
pub fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_milli_opt(23, 59, 59, 999).expect("23:59:59.999 is a valid time of day")
}

/// Due date for a task of the given priority created or re-prioritized at
/// `now`.
///
/// Low is due in 14 days, Mid in 5, High in 2, at the end of that day in
/// `now`'s timezone. Every call re-anchors to `now`, so editing the
/// priority on a later day moves the due date even when the priority is
/// unchanged.
pub fn compute_due_date<Tz: TimeZone>(priority: Priority, now: &DateTime<Tz>) -> DateTime<Tz> {
    let tz = now.timezone();
    let day = (now.clone() + Duration::days(priority.due_in_days())).date_naive();
    let local = day.and_time(end_of_day());

    // A DST gap at 23:59 would leave no valid local time; fall back to the
    // same wall-clock reading interpreted as UTC.
    tz.from_local_datetime(&local)
        .latest()
        .unwrap_or_else(|| tz.from_utc_datetime(&local))
}
