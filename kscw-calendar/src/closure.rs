use std::collections::BTreeSet;

use chrono::NaiveDate;
use log::warn;

use crate::labels::Language;
use crate::parser::{date_key, parse_date};
use crate::records::HallClosure;
use crate::season::DateRange;
use crate::structs::{CalendarEntry, EntrySource, EntryType};

impl HallClosure {
    /// The inclusive span of the closure. A missing end date means a
    /// single day; an end before the start means no days at all.
    #[must_use]
    pub fn span(&self) -> Option<DateRange> {
        let Some(start) = parse_date(&self.start_date) else {
            warn!(
                "Ignoring hall closure {} with unparsable start date {:?}",
                self.id, self.start_date
            );
            return None;
        };

        let Some(end) = parse_date(&self.end_date) else {
            return Some(DateRange::single(start));
        };

        let span = DateRange::new(start, end);
        if span.is_none() {
            warn!(
                "Ignoring hall closure {} ending {end} before it starts {start}",
                self.id
            );
        }
        span
    }

    /// One all-day entry per closed day.
    #[must_use]
    pub fn to_entries(&self, language: Language) -> Vec<CalendarEntry> {
        let Some(span) = self.span() else {
            return Vec::new();
        };

        let hall = self.expand.hall_name();
        let title = language.closure_title(hall);

        span.days()
            .map(|date| CalendarEntry {
                id: format!("{}-{}", self.id, date_key(date)),
                entry_type: EntryType::Closure,
                title: title.clone(),
                date,
                start_time: None,
                end_time: None,
                all_day: true,
                location: hall.to_string(),
                team_names: Vec::new(),
                description: self.reason.clone(),
                source: EntrySource::Closure(self.clone()),
                game_type: None,
            })
            .collect()
    }
}

/// Every day covered by any of the closures, limited to `visible` when
/// given.
///
/// Built straight from the closure records so that grid shading does not
/// depend on how entries are rendered.
pub fn closed_dates<'a, I>(closures: I, visible: Option<&DateRange>) -> BTreeSet<NaiveDate>
where
    I: IntoIterator<Item = &'a HallClosure>,
{
    closures
        .into_iter()
        .filter_map(HallClosure::span)
        .filter_map(|span| match visible {
            Some(visible) => span.intersect(visible),
            None => Some(span),
        })
        .flat_map(|span| span.days())
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::records::{Hall, HallExpand};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn closure(id: &str, start: &str, end: &str) -> HallClosure {
        HallClosure {
            id: id.to_string(),
            start_date: start.to_string(),
            end_date: end.to_string(),
            reason: "Renovation".to_string(),
            expand: HallExpand {
                hall: Some(Hall {
                    id: "hall1".into(),
                    name: "Küngenmatt".into(),
                    address: String::new(),
                }),
            },
            ..HallClosure::default()
        }
    }

    #[test]
    fn expands_one_entry_per_day() {
        let entries = closure("c1", "2025-03-01 00:00:00.000Z", "2025-03-03 00:00:00.000Z")
            .to_entries(Language::En);

        let dates: Vec<_> = entries.iter().map(|entry| entry.date).collect();
        assert_eq!(dates, vec![day(2025, 3, 1), day(2025, 3, 2), day(2025, 3, 3)]);
        assert!(entries.iter().all(|entry| entry.all_day));
        assert!(entries.iter().all(|entry| entry.entry_type == EntryType::Closure));

        let ids: Vec<_> = entries.iter().map(|entry| entry.id.as_str()).collect();
        assert_eq!(ids, vec!["c1-2025-03-01", "c1-2025-03-02", "c1-2025-03-03"]);
        assert_eq!(entries[0].title, "Hall closed: Küngenmatt");
        assert_eq!(entries[0].description, "Renovation");
    }

    #[test]
    fn single_day_closure() {
        assert_eq!(closure("c2", "2025-03-01", "2025-03-01").to_entries(Language::De).len(), 1);
        assert_eq!(closure("c3", "2025-03-01", "").to_entries(Language::De).len(), 1);
        assert_eq!(
            closure("c3", "2025-03-01", "").span(),
            Some(DateRange::single(day(2025, 3, 1)))
        );
    }

    #[test]
    fn inverted_closure_expands_to_nothing() {
        let inverted = closure("c4", "2025-03-03", "2025-03-01");
        assert!(inverted.to_entries(Language::De).is_empty());
        assert!(closed_dates([&inverted], None).is_empty());
    }

    #[test]
    fn overlapping_closures_share_days() {
        let closures = [
            closure("a", "2025-03-01", "2025-03-02"),
            closure("b", "2025-03-02", "2025-03-03"),
        ];

        let closed = closed_dates(&closures, None);
        assert_eq!(
            closed.into_iter().collect::<Vec<_>>(),
            vec![day(2025, 3, 1), day(2025, 3, 2), day(2025, 3, 3)]
        );
    }

    #[test]
    fn closed_dates_are_clipped_to_the_visible_range() {
        let closures = [closure("a", "2025-02-25", "2025-03-02")];
        let march = DateRange::new(day(2025, 3, 1), day(2025, 3, 31)).unwrap();

        let closed = closed_dates(&closures, Some(&march));
        assert_eq!(
            closed.into_iter().collect::<Vec<_>>(),
            vec![day(2025, 3, 1), day(2025, 3, 2)]
        );
    }
}
