//! Cadence calculator - next due instant for a schedule
//!
//! Pure calendar arithmetic: given a schedule descriptor and a reference
//! instant, compute the next instant the schedule is due. No state, no I/O.
//! All instants are evaluated on the `Utc` base clock; calendar-correct
//! timezone handling is out of scope.
//!
//! Frequency policies:
//! - hourly: start of the hour after the reference
//! - daily: the configured time-of-day, advancing one day when it has
//!   already passed; midnight of the next day when no time is configured
//! - weekly: the configured weekday is required; when the target weekday is
//!   the reference's own weekday the occurrence is a full week out, even if
//!   the time-of-day has not elapsed yet
//! - monthly: the configured day in the reference month, advancing one
//!   month when it has already passed; days beyond the month's length roll
//!   into the following month (`day_of_month = 31` in a 30-day month lands
//!   on the 1st)

use cadenza_domain::constants::{MAX_DAY_OF_MONTH, MAX_DAY_OF_WEEK, MIN_DAY_OF_MONTH};
use cadenza_domain::{CadenzaError, ReportFrequency, ReportSchedule, Result};
use chrono::{
    DateTime, Datelike, Days, Months, NaiveDate, NaiveTime, TimeDelta, TimeZone, Timelike, Utc,
};

/// Compute the next due instant for `schedule`, strictly after `reference`.
///
/// # Errors
///
/// Returns `CadenzaError::Config` when the descriptor is unusable for its
/// frequency: malformed `time`, weekly without `day_of_week`, or day fields
/// out of range.
pub fn next_run(schedule: &ReportSchedule, reference: DateTime<Utc>) -> Result<DateTime<Utc>> {
    match schedule.frequency {
        ReportFrequency::Hourly => next_hourly(reference),
        ReportFrequency::Daily => next_daily(schedule, reference),
        ReportFrequency::Weekly => next_weekly(schedule, reference),
        ReportFrequency::Monthly => next_monthly(schedule, reference),
    }
}

/// Start of the hour after `reference` (minute/second/subsecond zeroed).
fn next_hourly(reference: DateTime<Utc>) -> Result<DateTime<Utc>> {
    let truncated = reference
        .with_minute(0)
        .and_then(|dt| dt.with_second(0))
        .and_then(|dt| dt.with_nanosecond(0))
        .ok_or_else(|| CadenzaError::Internal("failed to truncate to hour".into()))?;

    truncated
        .checked_add_signed(TimeDelta::hours(1))
        .ok_or_else(|| CadenzaError::Internal("hour arithmetic overflow".into()))
}

fn next_daily(schedule: &ReportSchedule, reference: DateTime<Utc>) -> Result<DateTime<Utc>> {
    let today = reference.date_naive();

    match schedule.time.as_deref() {
        Some(raw) => {
            let time = parse_time_of_day(raw)?;
            let candidate = at(today, time);
            if candidate > reference {
                Ok(candidate)
            } else {
                Ok(at(add_days(today, 1)?, time))
            }
        }
        None => Ok(at(add_days(today, 1)?, NaiveTime::MIN)),
    }
}

fn next_weekly(schedule: &ReportSchedule, reference: DateTime<Utc>) -> Result<DateTime<Utc>> {
    let target = schedule.day_of_week.ok_or_else(|| {
        CadenzaError::Config("weekly schedule requires day_of_week".to_string())
    })?;
    if target > MAX_DAY_OF_WEEK {
        return Err(CadenzaError::Config(format!("day_of_week out of range: {target}")));
    }

    let time = time_or_midnight(schedule)?;
    let current = reference.weekday().num_days_from_sunday();

    // Non-positive deltas always advance a full week: the next occurrence
    // is never the reference's own day, even when the time-of-day has not
    // passed yet.
    let mut days_until = i64::from(target) - i64::from(current);
    if days_until <= 0 {
        days_until += 7;
    }
    let days_until = u64::try_from(days_until)
        .map_err(|_| CadenzaError::Internal("negative weekday delta".into()))?;

    Ok(at(add_days(reference.date_naive(), days_until)?, time))
}

fn next_monthly(schedule: &ReportSchedule, reference: DateTime<Utc>) -> Result<DateTime<Utc>> {
    let today = reference.date_naive();

    match schedule.day_of_month {
        Some(day) => {
            if !(MIN_DAY_OF_MONTH..=MAX_DAY_OF_MONTH).contains(&day) {
                return Err(CadenzaError::Config(format!("day_of_month out of range: {day}")));
            }

            let time = time_or_midnight(schedule)?;
            let candidate = at(set_day_with_rollover(today, day)?, time);
            if candidate > reference {
                Ok(candidate)
            } else {
                let next_month = first_of_next_month(today)?;
                Ok(at(set_day_with_rollover(next_month, day)?, time))
            }
        }
        None => Ok(at(first_of_next_month(today)?, NaiveTime::MIN)),
    }
}

/// Parse a 24h "HH:MM" time-of-day.
fn parse_time_of_day(raw: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .map_err(|err| CadenzaError::Config(format!("invalid time-of-day {raw:?}: {err}")))
}

fn time_or_midnight(schedule: &ReportSchedule) -> Result<NaiveTime> {
    schedule.time.as_deref().map_or(Ok(NaiveTime::MIN), parse_time_of_day)
}

fn at(date: NaiveDate, time: NaiveTime) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(time))
}

fn add_days(date: NaiveDate, days: u64) -> Result<NaiveDate> {
    date.checked_add_days(Days::new(days))
        .ok_or_else(|| CadenzaError::Internal("date arithmetic overflow".into()))
}

/// Set the day-of-month, rolling surplus days into the following month.
///
/// `day = 31` on a 30-day month yields the 1st of the next month; this
/// mirrors mutable-date `setDate` semantics and is pinned by tests.
fn set_day_with_rollover(date: NaiveDate, day: u8) -> Result<NaiveDate> {
    let first = date
        .with_day(1)
        .ok_or_else(|| CadenzaError::Internal("failed to normalize to first of month".into()))?;
    add_days(first, u64::from(day) - 1)
}

fn first_of_next_month(date: NaiveDate) -> Result<NaiveDate> {
    date.with_day(1)
        .and_then(|first| first.checked_add_months(Months::new(1)))
        .ok_or_else(|| CadenzaError::Internal("month arithmetic overflow".into()))
}
