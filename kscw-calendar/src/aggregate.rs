use crate::closure::closed_dates;
use crate::labels::Language;
use crate::records::Records;
use crate::season::DateRange;
use crate::structs::{CalendarEntry, CalendarView};

/// Merges per-source entry lists into one list ordered by date, all-day
/// entries first, then start time.
///
/// Sources that are disabled are simply not passed in; nothing is
/// filtered here.
pub fn aggregate<I>(sources: I) -> Vec<CalendarEntry>
where
    I: IntoIterator<Item = Vec<CalendarEntry>>,
{
    let mut entries: Vec<_> = sources.into_iter().flatten().collect();
    entries.sort_by_key(CalendarEntry::sort_key);
    entries
}

impl CalendarView {
    /// Runs the whole pipeline over already fetched records. Closure days
    /// outside `visible` are dropped from both the entries and the closed
    /// dates.
    #[must_use]
    pub fn build(records: &Records, visible: Option<&DateRange>, language: Language) -> Self {
        let sources = records.to_entries(language).into_iter().map(|entries| {
            entries
                .into_iter()
                .filter(|entry| visible.map_or(true, |range| range.contains(entry.date)))
                .collect::<Vec<_>>()
        });

        Self {
            entries: aggregate(sources),
            closed_dates: closed_dates(&records.closures, visible),
            errors: Vec::new(),
        }
    }
}
