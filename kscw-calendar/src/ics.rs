use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use ics::{
    components::Property,
    escape_text,
    parameters::{TzIDParam, Value},
    properties::{Categories, Description, DtEnd, DtStart, Location, RRule, Summary, TzName},
    Daylight, ICalendar, Standard, TimeZone,
};

use crate::CalendarEntry;

pub const TIMEZONE: &str = "Europe/Zurich";
pub const UID_DOMAIN: &str = "kscw.ch";
pub const PRODUCT_ID: &str = "-//KSCW//Calendar//DE";
/// Length of a timed entry that has no end time.
pub const DEFAULT_DURATION_HOURS: i64 = 2;

const DATE_FORMAT: &str = "%Y%m%d";
const DATE_TIME_FORMAT: &str = "%Y%m%dT%H%M%S";

/// When an entry starts and ends, as written to DTSTART/DTEND.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventTimes {
    /// DTEND is the exclusive day after the last day.
    AllDay { start: NaiveDate, end: NaiveDate },
    /// Local wall-clock times in [`TIMEZONE`].
    Timed {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
}

impl CalendarEntry {
    /// Entries flagged all-day, and entries without a start time, become
    /// all-day events. Timed entries without an end last
    /// [`DEFAULT_DURATION_HOURS`]; an end not after the start belongs to the
    /// following day.
    #[must_use]
    pub fn event_times(&self) -> EventTimes {
        let start_time = self.start_time.filter(|_| !self.all_day);

        let Some(start_time) = start_time else {
            return EventTimes::AllDay {
                start: self.date,
                end: self.date.succ_opt().unwrap_or(self.date),
            };
        };

        let start = self.date.and_time(start_time);
        let end = match self.end_time {
            Some(end_time) => {
                let end = self.date.and_time(end_time);
                if end > start {
                    end
                } else {
                    end + Duration::days(1)
                }
            }
            None => start + Duration::hours(DEFAULT_DURATION_HOURS),
        };

        EventTimes::Timed { start, end }
    }

    #[must_use]
    pub fn uid(&self) -> String {
        format!("{}@{UID_DOMAIN}", self.id)
    }

    #[must_use]
    pub fn to_ics(&self, dtstamp: &str) -> ics::Event<'_> {
        let mut ics_event = ics::Event::new(self.uid(), dtstamp.to_string());

        match self.event_times() {
            EventTimes::AllDay { start, end } => {
                let mut dtstart = DtStart::new(start.format(DATE_FORMAT).to_string());
                dtstart.add(Value::DATE);
                let mut dtend = DtEnd::new(end.format(DATE_FORMAT).to_string());
                dtend.add(Value::DATE);

                ics_event.push(dtstart);
                ics_event.push(dtend);
            }
            EventTimes::Timed { start, end } => {
                let mut dtstart = DtStart::new(start.format(DATE_TIME_FORMAT).to_string());
                dtstart.add(TzIDParam::new(TIMEZONE));
                let mut dtend = DtEnd::new(end.format(DATE_TIME_FORMAT).to_string());
                dtend.add(TzIDParam::new(TIMEZONE));

                ics_event.push(dtstart);
                ics_event.push(dtend);
            }
        }

        ics_event.push(Summary::new(escape_text(self.title.as_str())));

        if !self.location.is_empty() {
            ics_event.push(Location::new(escape_text(self.location.as_str())));
        }

        if !self.description.is_empty() {
            ics_event.push(Description::new(escape_text(self.description.as_str())));
        }

        ics_event.push(Categories::new(self.entry_type.as_str().to_uppercase()));

        ics_event
    }
}

/// The Europe/Zurich definition every timed event refers to.
#[must_use]
pub fn zurich_timezone() -> TimeZone<'static> {
    let mut cet_standard = Standard::new("19701025T030000", "+0200", "+0100");
    cet_standard.push(TzName::new("CET"));
    cet_standard.push(RRule::new("FREQ=YEARLY;BYMONTH=10;BYDAY=-1SU"));

    let mut cest_daylight = Daylight::new("19700329T020000", "+0100", "+0200");
    cest_daylight.push(TzName::new("CEST"));
    cest_daylight.push(RRule::new("FREQ=YEARLY;BYMONTH=3;BYDAY=-1SU"));

    let mut timezone = TimeZone::daylight(TIMEZONE, cest_daylight);
    timezone.add_standard(cet_standard);
    timezone
}

/// Builds a calendar with one VEVENT per entry. `generated_at` becomes the
/// DTSTAMP of every event.
#[must_use]
pub fn to_ics<'a>(
    name: &'a str,
    entries: &'a [CalendarEntry],
    generated_at: DateTime<Utc>,
) -> ICalendar<'a> {
    let dtstamp = generated_at.format("%Y%m%dT%H%M%SZ").to_string();

    let mut icalendar = ICalendar::new("2.0", PRODUCT_ID);
    icalendar.push(Property::new("CALSCALE", "GREGORIAN"));
    icalendar.push(Property::new("X-WR-CALNAME", escape_text(name)));
    icalendar.push(Property::new("X-WR-TIMEZONE", TIMEZONE));
    icalendar.add_timezone(zurich_timezone());

    for entry in entries {
        icalendar.add_event(entry.to_ics(&dtstamp));
    }

    icalendar
}

/// `name` with an `.ics` extension, added only when missing.
#[must_use]
pub fn ics_filename(name: &str) -> String {
    if name.to_ascii_lowercase().ends_with(".ics") {
        name.to_string()
    } else {
        format!("{name}.ics")
    }
}

/// Writes the entries as an `.ics` file and returns the path written.
pub fn export_file<P: AsRef<Path>>(
    path: P,
    name: &str,
    entries: &[CalendarEntry],
    generated_at: DateTime<Utc>,
) -> io::Result<PathBuf> {
    let path = path.as_ref();
    let file_name = path
        .file_name()
        .and_then(|file_name| file_name.to_str())
        .map(ics_filename)
        .ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "export path has no file name")
        })?;

    let path = path.with_file_name(file_name);
    fs::write(&path, to_ics(name, entries, generated_at).to_string())?;
    Ok(path)
}
