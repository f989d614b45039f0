use async_trait::async_trait;
use kscw_calendar::records::{ClubEvent, Game, HallClosure, HallEvent, Training};

use crate::error::FetchError;
use crate::query::RecordQuery;

/// Read-only access to the record collections the calendar is built from.
#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn games(&self, query: &RecordQuery) -> Result<Vec<Game>, FetchError>;

    async fn trainings(&self, query: &RecordQuery) -> Result<Vec<Training>, FetchError>;

    async fn events(&self, query: &RecordQuery) -> Result<Vec<ClubEvent>, FetchError>;

    /// Closures overlapping the range, regardless of team.
    async fn closures(&self, query: &RecordQuery) -> Result<Vec<HallClosure>, FetchError>;

    async fn hall_events(&self, query: &RecordQuery) -> Result<Vec<HallEvent>, FetchError>;
}

#[cfg(test)]
pub mod fake {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use kscw_calendar::{Records, SourceKind};
    use reqwest::StatusCode;

    use super::*;

    /// In-memory source returning fixed records, optionally failing some
    /// collections.
    #[derive(Default)]
    pub struct FakeSource {
        pub records: Records,
        pub failing: Vec<SourceKind>,
        pub calls: AtomicUsize,
        pub last_query: Mutex<Option<RecordQuery>>,
    }

    impl FakeSource {
        pub fn new(records: Records) -> Self {
            Self {
                records,
                ..Self::default()
            }
        }

        pub fn failing(mut self, source: SourceKind) -> Self {
            self.failing.push(source);
            self
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn answer<T: Clone>(
            &self,
            source: SourceKind,
            query: &RecordQuery,
            records: &[T],
        ) -> Result<Vec<T>, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Ok(mut last) = self.last_query.lock() {
                *last = Some(query.clone());
            }

            if self.failing.contains(&source) {
                return Err(FetchError::Status {
                    collection: source.collection(),
                    status: StatusCode::SERVICE_UNAVAILABLE,
                });
            }

            Ok(records.to_vec())
        }
    }

    #[async_trait]
    impl RecordSource for FakeSource {
        async fn games(&self, query: &RecordQuery) -> Result<Vec<Game>, FetchError> {
            self.answer(SourceKind::Games, query, &self.records.games)
        }

        async fn trainings(&self, query: &RecordQuery) -> Result<Vec<Training>, FetchError> {
            self.answer(SourceKind::Trainings, query, &self.records.trainings)
        }

        async fn events(&self, query: &RecordQuery) -> Result<Vec<ClubEvent>, FetchError> {
            self.answer(SourceKind::Events, query, &self.records.events)
        }

        async fn closures(&self, query: &RecordQuery) -> Result<Vec<HallClosure>, FetchError> {
            self.answer(SourceKind::Closures, query, &self.records.closures)
        }

        async fn hall_events(&self, query: &RecordQuery) -> Result<Vec<HallEvent>, FetchError> {
            self.answer(SourceKind::HallEvents, query, &self.records.hall_events)
        }
    }
}
