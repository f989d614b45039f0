use std::future::Future;

use kscw_calendar::{CalendarView, Records, SourceError, SourceKind};
use log::{debug, error};

use crate::error::FetchError;
use crate::query::ViewQuery;
use crate::source::RecordSource;

/// Fetches every enabled source concurrently and builds the view once all
/// of them have answered.
///
/// A failing source is logged and reported in [`CalendarView::errors`];
/// the remaining sources are still shown.
pub async fn load_view(source: &dyn RecordSource, query: &ViewQuery) -> CalendarView {
    let record_query = query.record_query();

    let (games, trainings, events, closures, hall_events) = tokio::join!(
        fetch_if(query.includes(SourceKind::Games), source.games(&record_query)),
        fetch_if(query.includes(SourceKind::Trainings), source.trainings(&record_query)),
        fetch_if(query.includes(SourceKind::Events), source.events(&record_query)),
        fetch_if(query.includes(SourceKind::Closures), source.closures(&record_query)),
        fetch_if(query.includes(SourceKind::HallEvents), source.hall_events(&record_query)),
    );

    let mut errors = Vec::new();
    let records = Records {
        games: settle(SourceKind::Games, games, &mut errors),
        trainings: settle(SourceKind::Trainings, trainings, &mut errors),
        events: settle(SourceKind::Events, events, &mut errors),
        closures: settle(SourceKind::Closures, closures, &mut errors),
        hall_events: settle(SourceKind::HallEvents, hall_events, &mut errors),
    };

    debug!(
        "Fetched {} games, {} trainings, {} events, {} closures, {} hall events",
        records.games.len(),
        records.trainings.len(),
        records.events.len(),
        records.closures.len(),
        records.hall_events.len()
    );

    let mut view = CalendarView::build(&records, Some(&query.range), query.language);
    view.errors = errors;
    view
}

/// Disabled sources are never polled, so no request is made for them.
async fn fetch_if<T, F>(enabled: bool, fetch: F) -> Result<Vec<T>, FetchError>
where
    F: Future<Output = Result<Vec<T>, FetchError>>,
{
    if enabled {
        fetch.await
    } else {
        Ok(Vec::new())
    }
}

fn settle<T>(
    source: SourceKind,
    result: Result<Vec<T>, FetchError>,
    errors: &mut Vec<SourceError>,
) -> Vec<T> {
    result.unwrap_or_else(|err| {
        error!("Failed to load {source}: {err}");
        errors.push(SourceError {
            source,
            message: err.to_string(),
        });
        Vec::new()
    })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use kscw_calendar::records::{Game, HallClosure, Training};
    use kscw_calendar::{EntryType, Language};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::source::fake::FakeSource;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn records() -> Records {
        Records {
            games: vec![Game {
                id: "g1".into(),
                date: "2025-03-08".into(),
                time: "16:00".into(),
                ..Game::default()
            }],
            trainings: vec![Training {
                id: "t1".into(),
                date: "2025-03-04".into(),
                start_time: "19:30".into(),
                ..Training::default()
            }],
            closures: vec![HallClosure {
                id: "c1".into(),
                start_date: "2025-03-28".into(),
                end_date: "2025-04-02".into(),
                ..HallClosure::default()
            }],
            ..Records::default()
        }
    }

    fn march(sources: &[SourceKind]) -> ViewQuery {
        ViewQuery::new(
            Some(day(2025, 3, 1)),
            Some(day(2025, 3, 31)),
            vec!["h1".to_string()],
            sources.iter().copied(),
            Language::De,
            day(2025, 3, 1),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn merges_all_sources() {
        let source = FakeSource::new(records());
        let view = load_view(&source, &march(&[])).await;

        let types: Vec<_> = view.entries.iter().map(|entry| entry.entry_type).collect();
        assert_eq!(
            types,
            vec![
                EntryType::Training,
                EntryType::Game,
                EntryType::Closure,
                EntryType::Closure,
                EntryType::Closure,
                EntryType::Closure,
            ]
        );
        assert_eq!(view.closed_dates.len(), 4);
        assert!(view.is_complete());
        assert_eq!(source.calls(), 5);

        let last = source.last_query.lock().unwrap().clone().unwrap();
        assert_eq!(last.teams, vec!["h1".to_string()]);
    }

    #[tokio::test]
    async fn skips_disabled_sources() {
        let source = FakeSource::new(records());
        let view = load_view(&source, &march(&[SourceKind::Games])).await;

        assert_eq!(view.entries.len(), 1);
        assert_eq!(view.entries[0].id, "g1");
        assert!(view.closed_dates.is_empty());
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn failed_source_keeps_the_others() {
        let source = FakeSource::new(records()).failing(SourceKind::Trainings);
        let view = load_view(&source, &march(&[])).await;

        assert!(!view.is_complete());
        assert_eq!(view.errors.len(), 1);
        assert_eq!(view.errors[0].source, SourceKind::Trainings);
        assert!(view.errors[0].message.contains("503"));
        assert!(view
            .entries
            .iter()
            .all(|entry| entry.entry_type != EntryType::Training));
        assert!(view.entries.iter().any(|entry| entry.id == "g1"));
    }
}
