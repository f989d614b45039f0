use chrono::{Datelike, NaiveDate};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Inclusive range of days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    /// `None` if `to` lies before `from`.
    #[must_use]
    pub fn new(from: NaiveDate, to: NaiveDate) -> Option<Self> {
        (from <= to).then_some(Self { from, to })
    }

    #[must_use]
    pub fn single(date: NaiveDate) -> Self {
        Self { from: date, to: date }
    }

    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }

    #[must_use]
    pub fn intersect(&self, other: &DateRange) -> Option<DateRange> {
        Self::new(self.from.max(other.from), self.to.min(other.to))
    }

    #[must_use]
    pub fn days(&self) -> Days {
        Days {
            next: Some(self.from),
            last: self.to,
        }
    }
}

/// Iterator over every day of a [`DateRange`].
#[derive(Debug, Clone)]
pub struct Days {
    next: Option<NaiveDate>,
    last: NaiveDate,
}

impl Iterator for Days {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.filter(|day| *day <= self.last)?;
        self.next = current.succ_opt();
        Some(current)
    }
}

/// The September to May club year, named after the year it starts in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Season {
    pub start_year: i32,
}

impl Season {
    const FIRST_MONTH: u32 = 9;
    const LAST_MONTH: u32 = 5;

    /// The season a date belongs to. The summer break counts towards the
    /// upcoming season.
    #[must_use]
    pub fn containing(date: NaiveDate) -> Self {
        let start_year = if date.month() > Self::LAST_MONTH {
            date.year()
        } else {
            date.year() - 1
        };
        Self { start_year }
    }

    /// 1 September through 31 May.
    #[must_use]
    pub fn range(&self) -> DateRange {
        let from = NaiveDate::from_ymd_opt(self.start_year, Self::FIRST_MONTH, 1)
            .unwrap_or(NaiveDate::MIN);
        let to = NaiveDate::from_ymd_opt(self.start_year + 1, Self::LAST_MONTH, 31)
            .unwrap_or(NaiveDate::MAX);
        DateRange { from, to }
    }
}
