use std::time::Duration;

use async_trait::async_trait;
use kscw_calendar::records::{ClubEvent, Game, HallClosure, HallEvent, Training};
use kscw_calendar::{DateRange, SourceKind};
use log::debug;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::FetchError;
use crate::query::RecordQuery;
use crate::source::RecordSource;

const PER_PAGE: u32 = 500;
const TIMEOUT: Duration = Duration::from_secs(15);

/// Record source backed by the PocketBase REST API.
pub struct PocketBase {
    client: Client,
    base_url: String,
}

#[derive(Deserialize)]
struct ListPage<T> {
    page: u32,
    #[serde(rename = "totalPages")]
    total_pages: u32,
    items: Vec<T>,
}

impl PocketBase {
    pub fn new<S: Into<String>>(base_url: S) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(TIMEOUT)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn list<T: DeserializeOwned>(
        &self,
        source: SourceKind,
        filter: &str,
        expand: &str,
        sort: &str,
    ) -> Result<Vec<T>, FetchError> {
        let collection = source.collection();
        let url = format!("{}/api/collections/{collection}/records", self.base_url);
        let per_page = PER_PAGE.to_string();

        let mut items = Vec::new();
        let mut page = 1u32;

        loop {
            let page_param = page.to_string();
            debug!("Fetching {collection} page {page} with filter {filter}");

            let response = self
                .client
                .get(&url)
                .query(&[
                    ("filter", filter),
                    ("expand", expand),
                    ("sort", sort),
                    ("page", page_param.as_str()),
                    ("perPage", per_page.as_str()),
                ])
                .send()
                .await
                .map_err(|source| FetchError::Request { collection, source })?;

            let status = response.status();
            if !status.is_success() {
                return Err(FetchError::Status { collection, status });
            }

            let body: ListPage<T> = response
                .json()
                .await
                .map_err(|source| FetchError::Decode { collection, source })?;

            items.extend(body.items);

            if body.page >= body.total_pages {
                return Ok(items);
            }
            page += 1;
        }
    }
}

#[async_trait]
impl RecordSource for PocketBase {
    async fn games(&self, query: &RecordQuery) -> Result<Vec<Game>, FetchError> {
        let filter = and([
            Some(within("date", &query.range)),
            any_of("kscw_team", "=", &query.teams),
        ]);
        self.list(SourceKind::Games, &filter, "kscw_team,hall", "date,time")
            .await
    }

    async fn trainings(&self, query: &RecordQuery) -> Result<Vec<Training>, FetchError> {
        let filter = and([
            Some(within("date", &query.range)),
            any_of("team", "=", &query.teams),
        ]);
        self.list(SourceKind::Trainings, &filter, "team,hall", "date,start_time")
            .await
    }

    async fn events(&self, query: &RecordQuery) -> Result<Vec<ClubEvent>, FetchError> {
        let filter = and([
            Some(within("start_date", &query.range)),
            any_of("teams", "~", &query.teams),
        ]);
        self.list(SourceKind::Events, &filter, "teams", "start_date")
            .await
    }

    async fn closures(&self, query: &RecordQuery) -> Result<Vec<HallClosure>, FetchError> {
        let filter = overlapping("start_date", "end_date", &query.range);
        self.list(SourceKind::Closures, &filter, "hall", "start_date")
            .await
    }

    async fn hall_events(&self, query: &RecordQuery) -> Result<Vec<HallEvent>, FetchError> {
        let filter = within("date", &query.range);
        self.list(SourceKind::HallEvents, &filter, "hall", "date,start_time")
            .await
    }
}

/// A PocketBase string literal.
fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

fn start_of(range: &DateRange) -> String {
    quote(&format!("{} 00:00:00", range.from.format("%Y-%m-%d")))
}

fn end_of(range: &DateRange) -> String {
    quote(&format!("{} 23:59:59", range.to.format("%Y-%m-%d")))
}

fn within(field: &str, range: &DateRange) -> String {
    format!("{field} >= {} && {field} <= {}", start_of(range), end_of(range))
}

/// Records whose `[start, end]` span touches the range. An empty end
/// means a single day.
fn overlapping(start: &str, end: &str, range: &DateRange) -> String {
    format!(
        "{start} <= {} && ({end} >= {} || ({end} = \"\" && {start} >= {}))",
        end_of(range),
        start_of(range),
        start_of(range)
    )
}

fn any_of(field: &str, operator: &str, values: &[String]) -> Option<String> {
    if values.is_empty() {
        return None;
    }

    let alternatives = values
        .iter()
        .map(|value| format!("{field} {operator} {}", quote(value)))
        .collect::<Vec<_>>()
        .join(" || ");

    Some(format!("({alternatives})"))
}

fn and<I: IntoIterator<Item = Option<String>>>(clauses: I) -> String {
    clauses.into_iter().flatten().collect::<Vec<_>>().join(" && ")
}
