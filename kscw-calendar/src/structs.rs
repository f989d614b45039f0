use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::records::{ClubEvent, Game, HallClosure, HallEvent, Training};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum EntryType {
    Game,
    Training,
    Event,
    Closure,
    Hall,
}

impl EntryType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Game => "game",
            Self::Training => "training",
            Self::Event => "event",
            Self::Closure => "closure",
            Self::Hall => "hall",
        }
    }
}

/// Back-reference from an entry to the record it was built from.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "collection", content = "record"))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EntrySource {
    Game(Game),
    Training(Training),
    Event(ClubEvent),
    Closure(HallClosure),
    HallEvent(HallEvent),
}

/// A single calendar-displayable occurrence.
///
/// Entries are derived from upstream records on every request and never
/// stored. A multi-day closure becomes one entry per covered day.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct CalendarEntry {
    pub id: String,
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub entry_type: EntryType,
    pub title: String,
    pub date: NaiveDate,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub start_time: Option<NaiveTime>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub end_time: Option<NaiveTime>,
    pub all_day: bool,
    pub location: String,
    pub team_names: Vec<String>,
    pub description: String,
    pub source: EntrySource,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub game_type: Option<String>,
}

impl CalendarEntry {
    /// Date, then all-day before timed, then start time. A missing start
    /// time orders before any present one.
    #[must_use]
    pub fn sort_key(&self) -> (NaiveDate, bool, Option<NaiveTime>) {
        (self.date, !self.all_day, self.start_time)
    }
}

/// The record collections the calendar can draw from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SourceKind {
    Games,
    Trainings,
    Events,
    Closures,
    HallEvents,
}

impl SourceKind {
    pub const ALL: [SourceKind; 5] = [
        Self::Games,
        Self::Trainings,
        Self::Events,
        Self::Closures,
        Self::HallEvents,
    ];

    /// PocketBase collection name.
    #[must_use]
    pub fn collection(self) -> &'static str {
        match self {
            Self::Games => "games",
            Self::Trainings => "trainings",
            Self::Events => "events",
            Self::Closures => "hall_closures",
            Self::HallEvents => "hall_events",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.collection())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSource(pub String);

impl fmt::Display for UnknownSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown calendar source `{}`", self.0)
    }
}

impl std::error::Error for UnknownSource {}

impl FromStr for SourceKind {
    type Err = UnknownSource;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "game" | "games" => Ok(Self::Games),
            "training" | "trainings" => Ok(Self::Trainings),
            "event" | "events" => Ok(Self::Events),
            "closure" | "closures" | "hall_closures" => Ok(Self::Closures),
            "hall" | "hall_events" => Ok(Self::HallEvents),
            other => Err(UnknownSource(other.to_string())),
        }
    }
}

/// A source that could not be loaded for a view.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SourceError {
    pub source: SourceKind,
    pub message: String,
}

/// Everything a calendar page or feed needs for one visible range.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct CalendarView {
    pub entries: Vec<CalendarEntry>,
    pub closed_dates: BTreeSet<NaiveDate>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Vec::is_empty"))]
    pub errors: Vec<SourceError>,
}

impl CalendarView {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn is_closed(&self, date: NaiveDate) -> bool {
        self.closed_dates.contains(&date)
    }
}
