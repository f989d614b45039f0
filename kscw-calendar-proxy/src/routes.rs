use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use kscw_calendar::{ics, CalendarView, Language};
use log::{debug, info, warn};

use crate::cache::ViewCache;
use crate::loader::load_view;
use crate::query::{CalendarParams, ViewQuery};
use crate::source::RecordSource;

pub const CALENDAR_PATH: &str = "/calendar";
pub const ICS_PATH: &str = "/calendar.ics";

const DEFAULT_FILENAME: &str = "kscw";

#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn RecordSource>,
    pub cache: Arc<ViewCache>,
    pub default_language: Language,
}

impl AppState {
    /// The view for `query`, from the cache when a fresh one exists.
    pub async fn view(&self, query: &ViewQuery) -> Arc<CalendarView> {
        if let Some(view) = self.cache.get(query) {
            debug!("Serving cached calendar for {:?}", query.range);
            return view;
        }

        let requested_at = Instant::now();
        let view = load_view(self.source.as_ref(), query).await;
        info!(
            "Built calendar {}..{} with {} entries and {} closed days",
            query.range.from,
            query.range.to,
            view.entries.len(),
            view.closed_dates.len()
        );

        self.cache.insert(query.clone(), requested_at, view)
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(CALENDAR_PATH, get(handle_calendar))
        .route(ICS_PATH, get(handle_ics))
        .fallback(|| async { Redirect::permanent(env!("CARGO_PKG_REPOSITORY")) })
        .with_state(state)
}

async fn handle_calendar(
    State(state): State<AppState>,
    Query(params): Query<CalendarParams>,
) -> Response {
    let query = match ViewQuery::from_params(&params, state.default_language, today()) {
        Ok(query) => query,
        Err(err) => return (StatusCode::BAD_REQUEST, err.to_string()).into_response(),
    };

    let view = state.view(&query).await;

    if params.json {
        return Json(view.as_ref()).into_response();
    }

    ics_response(&view, &query, params.name.as_deref())
}

async fn handle_ics(
    State(state): State<AppState>,
    Query(params): Query<CalendarParams>,
) -> Response {
    let query = match ViewQuery::from_params(&params, state.default_language, today()) {
        Ok(query) => query,
        Err(err) => return (StatusCode::BAD_REQUEST, err.to_string()).into_response(),
    };

    let view = state.view(&query).await;
    ics_response(&view, &query, params.name.as_deref())
}

/// Subscribing clients treat missing events as deleted, so a partial view
/// is refused instead of served.
fn ics_response(view: &CalendarView, query: &ViewQuery, name: Option<&str>) -> Response {
    if !view.is_complete() {
        let failed = view
            .errors
            .iter()
            .map(|err| err.source.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        warn!("Refusing to serve partial calendar, failed sources: {failed}");
        return (
            StatusCode::BAD_GATEWAY,
            format!("Failed to load calendar sources: {failed}"),
        )
            .into_response();
    }

    let calendar_name = name.unwrap_or(query.language.calendar_name());
    let filename = ics::ics_filename(&sanitize_filename(name.unwrap_or(DEFAULT_FILENAME)));
    let body = ics::to_ics(calendar_name, &view.entries, Utc::now()).to_string();

    (
        [
            (header::CONTENT_TYPE, "text/calendar; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"{filename}\""),
            ),
        ],
        body,
    )
        .into_response()
}

fn sanitize_filename(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.trim_matches(|c| c == '_' || c == '.').is_empty() {
        DEFAULT_FILENAME.to_string()
    } else {
        sanitized
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use kscw_calendar::records::{Game, HallClosure};
    use kscw_calendar::{Records, SourceKind};
    use pretty_assertions::assert_eq;
    use tower::ServiceExt;

    use super::*;
    use crate::cache::Config;
    use crate::source::fake::FakeSource;

    fn records() -> Records {
        Records {
            games: vec![Game {
                id: "g1".into(),
                home_team: "KSCW".into(),
                away_team: "Volley Näfels".into(),
                date: "2025-03-08".into(),
                time: "16:00".into(),
                ..Game::default()
            }],
            closures: vec![HallClosure {
                id: "c1".into(),
                start_date: "2025-03-10".into(),
                end_date: "2025-03-11".into(),
                ..HallClosure::default()
            }],
            ..Records::default()
        }
    }

    fn app(source: Arc<FakeSource>, enable_cache: bool) -> Router {
        router(AppState {
            source,
            cache: ViewCache::new(Config {
                enabled: enable_cache,
                ttl: Duration::from_secs(3600),
            }),
            default_language: Language::De,
        })
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, Option<String>, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, content_type, String::from_utf8(body.to_vec()).unwrap())
    }

    const MARCH: &str = "from=2025-03-01&to=2025-03-31";

    #[tokio::test]
    async fn serves_icalendar() {
        let source = Arc::new(FakeSource::new(records()));
        let (status, content_type, body) =
            get(app(source, false), &format!("{ICS_PATH}?{MARCH}")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type.as_deref(), Some("text/calendar; charset=utf-8"));
        assert!(body.contains("X-WR-CALNAME:KSCW Kalender\r\n"));
        assert!(body.contains("UID:g1@kscw.ch\r\n"));
        assert!(body.contains("UID:c1-2025-03-11@kscw.ch\r\n"));
        assert_eq!(body.matches("BEGIN:VEVENT").count(), 3);
    }

    #[tokio::test]
    async fn serves_json_view() {
        let source = Arc::new(FakeSource::new(records()));
        let (status, content_type, body) = get(
            app(source, false),
            &format!("{CALENDAR_PATH}?{MARCH}&json=true&lang=en&sources=closures"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type.as_deref(), Some("application/json"));

        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["entries"].as_array().unwrap().len(), 2);
        assert_eq!(json["entries"][0]["title"], "Hall closed");
        assert_eq!(json["closedDates"][1], "2025-03-11");
    }

    #[tokio::test]
    async fn partial_views_are_not_served_as_icalendar() {
        let source = Arc::new(FakeSource::new(records()).failing(SourceKind::Closures));

        let (status, _, body) =
            get(app(Arc::clone(&source), false), &format!("{ICS_PATH}?{MARCH}")).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body.contains("hall_closures"));

        let (status, _, body) = get(
            app(source, false),
            &format!("{CALENDAR_PATH}?{MARCH}&json=true"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["errors"][0]["source"], "closures");
        assert_eq!(json["entries"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn rejects_unknown_sources() {
        let source = Arc::new(FakeSource::new(records()));
        let (status, _, body) =
            get(app(source, false), &format!("{ICS_PATH}?sources=scorers")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("scorers"));
    }

    #[tokio::test]
    async fn cached_views_skip_the_backend() {
        let source = Arc::new(FakeSource::new(records()));
        let app = app(Arc::clone(&source), true);
        let uri = format!("{ICS_PATH}?{MARCH}&sources=games");

        let (first, _, _) = get(app.clone(), &uri).await;
        let (second, _, _) = get(app, &uri).await;

        assert_eq!(first, StatusCode::OK);
        assert_eq!(second, StatusCode::OK);
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn unknown_paths_redirect() {
        let source = Arc::new(FakeSource::new(Records::default()));
        let (status, _, _) = get(app(source, false), "/").await;
        assert_eq!(status, StatusCode::PERMANENT_REDIRECT);
    }

    #[test]
    fn filenames_are_sanitized() {
        assert_eq!(sanitize_filename("Saison 2025/26"), "Saison_2025_26");
        assert_eq!(sanitize_filename("\"../"), "kscw");
        assert_eq!(sanitize_filename("h1-games"), "h1-games");
    }
}
