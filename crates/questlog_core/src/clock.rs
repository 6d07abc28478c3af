//! Calendar day source used by streak computation.

use chrono::{Local, NaiveDate};
use std::fmt::{Display, Formatter};

const DAY_FORMAT: &str = "%Y-%m-%d";

/// Local calendar day identifier, compared only for equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CalendarDay(String);

impl CalendarDay {
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.format(DAY_FORMAT).to_string())
    }

    /// Wraps a stored marker. Blank values mean "no marker".
    pub fn from_stored(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for CalendarDay {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Supplies "today" to the progression engine.
pub trait Clock {
    fn today(&self) -> CalendarDay;
}

/// Wall clock in the local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> CalendarDay {
        CalendarDay::from_date(Local::now().date_naive())
    }
}

/// Clock pinned to one day; move it with [`FixedClock::set`].
#[derive(Debug, Clone)]
pub struct FixedClock {
    day: std::cell::RefCell<CalendarDay>,
}

impl FixedClock {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            day: std::cell::RefCell::new(CalendarDay::from_date(date)),
        }
    }

    pub fn set(&self, date: NaiveDate) {
        *self.day.borrow_mut() = CalendarDay::from_date(date);
    }
}

impl Clock for FixedClock {
    fn today(&self) -> CalendarDay {
        self.day.borrow().clone()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn today(&self) -> CalendarDay {
        (**self).today()
    }
}

#[cfg(test)]
mod tests {
    use super::{CalendarDay, Clock, FixedClock};
    use chrono::NaiveDate;

    #[test]
    fn formats_as_iso_day() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
        assert_eq!(CalendarDay::from_date(date).as_str(), "2026-03-07");
    }

    #[test]
    fn blank_stored_marker_is_none() {
        assert!(CalendarDay::from_stored("  ").is_none());
        assert_eq!(
            CalendarDay::from_stored("Tue Oct 14 2026").unwrap().as_str(),
            "Tue Oct 14 2026"
        );
    }

    #[test]
    fn fixed_clock_moves_when_set() {
        let clock = FixedClock::new(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
        assert_eq!(clock.today().as_str(), "2026-01-01");
        clock.set(NaiveDate::from_ymd_opt(2026, 1, 2).unwrap());
        assert_eq!(clock.today().as_str(), "2026-01-02");
    }
}
