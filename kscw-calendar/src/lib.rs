//! Calendar aggregation for the KSCW club app.
//!
//! Games, trainings, club events, hall closures and hall events are
//! normalized into [`CalendarEntry`] values, merged into one sorted stream
//! and optionally serialized as iCalendar text.

mod aggregate;
mod closure;
mod labels;
mod normalize;
mod parser;
mod season;
mod structs;

pub mod records;

#[cfg(feature = "ics")]
pub mod ics;

pub use aggregate::aggregate;
pub use closure::closed_dates;
pub use labels::{Language, UnknownLanguage};
pub use parser::{date_key, parse_date, parse_time};
pub use records::Records;
pub use season::{DateRange, Days, Season};
pub use structs::{
    CalendarEntry, CalendarView, EntrySource, EntryType, SourceError, SourceKind, UnknownSource,
};
