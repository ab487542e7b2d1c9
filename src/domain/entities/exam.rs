use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};

use crate::application::errors::ScheduleError;

/// A yearly recurring date worth a reminder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamEvent {
    month: u32,
    day: u32,
    label: String,
}

impl ExamEvent {
    /// Fails for dates that never exist (Feb 30, Apr 31, ...). Feb 29 is allowed.
    pub fn new(month: u32, day: u32, label: impl Into<String>) -> Result<Self, ScheduleError> {
        // 2000 is a leap year, so every date that exists in some year exists here.
        if NaiveDate::from_ymd_opt(2000, month, day).is_none() {
            return Err(ScheduleError::InvalidDate { month, day });
        }
        Ok(Self {
            month,
            day,
            label: label.into(),
        })
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Start of the next day this event falls on, never earlier than `now`.
    ///
    /// Once the day has begun the occurrence moves to next year. Feb 29 moves
    /// to the next leap year.
    pub fn occurrence(&self, now: NaiveDateTime) -> NaiveDateTime {
        let mut year = now.year();
        if (now.month(), now.day()) > (self.month, self.day) {
            year += 1;
        }
        loop {
            if let Some(date) = NaiveDate::from_ymd_opt(year, self.month, self.day) {
                let at = date.and_time(NaiveTime::MIN);
                if at >= now {
                    return at;
                }
            }
            year += 1;
        }
    }
}
