use crate::domain::model::ArrivalTime;
use crate::utils::error::{NotifierError, Result};
use chrono::{DateTime, Datelike, Days, Duration, NaiveTime, TimeZone, Utc};

/// Resolves a symbolic "arrive by weekday + time" constraint into the next
/// concrete timestamp from `now`.
///
/// If the target weekday is still ahead in the current week (or is today),
/// this week's instance is used; otherwise next week's. A same-day time
/// that has already passed rolls forward a week so the result is never
/// before `now`. Pure function of its arguments — callers seed `now`.
pub fn resolve_arrival(constraint: &ArrivalTime, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
    let time = NaiveTime::from_hms_opt(constraint.hour, constraint.minute, 0).ok_or_else(|| {
        NotifierError::ConfigError {
            message: format!(
                "Invalid arrival time {:02}:{:02}",
                constraint.hour, constraint.minute
            ),
        }
    })?;

    let today = now.weekday().number_from_monday();
    let target = constraint.weekday.iso_number();
    let days_ahead = if today <= target {
        target - today
    } else {
        7 - (today - target)
    };

    let date = now
        .date_naive()
        .checked_add_days(Days::new(u64::from(days_ahead)))
        .ok_or_else(|| NotifierError::ConfigError {
            message: "Arrival date out of range".to_string(),
        })?;

    let mut arrival = Utc.from_utc_datetime(&date.and_time(time));
    if arrival < now {
        arrival += Duration::days(7);
    }
    Ok(arrival)
}
