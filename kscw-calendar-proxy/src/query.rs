use std::collections::BTreeSet;

use chrono::NaiveDate;
use kscw_calendar::{DateRange, Language, Season, SourceKind};
use serde::Deserialize;

use crate::error::QueryError;

/// Longest range a single request may ask for.
pub const MAX_RANGE_DAYS: i64 = 400;

/// What the record fetchers are scoped to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordQuery {
    pub range: DateRange,
    /// Team record ids, sorted and without duplicates. Empty means every
    /// team.
    pub teams: Vec<String>,
}

/// A normalized calendar request. Two requests asking for the same thing
/// compare equal, which makes this the cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ViewQuery {
    pub range: DateRange,
    pub teams: Vec<String>,
    pub sources: BTreeSet<SourceKind>,
    pub language: Language,
}

/// Raw query string of the calendar routes.
#[derive(Debug, Default, Deserialize)]
pub struct CalendarParams {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    /// Comma separated team ids.
    pub teams: Option<String>,
    /// Comma separated source names.
    pub sources: Option<String>,
    pub lang: Option<String>,
    pub name: Option<String>,
    #[serde(default)]
    pub json: bool,
}

impl ViewQuery {
    /// Without any bound the range is the season containing `today`. A lone
    /// `from` runs to the end of its season and a lone `to` starts at the
    /// last season start on or before it. An empty source list means every
    /// source.
    pub fn new<T, S>(
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        teams: T,
        sources: S,
        language: Language,
        today: NaiveDate,
    ) -> Result<Self, QueryError>
    where
        T: IntoIterator<Item = String>,
        S: IntoIterator<Item = SourceKind>,
    {
        let (from, to) = match (from, to) {
            (Some(from), Some(to)) => (from, to),
            (Some(from), None) => (from, Season::containing(from).range().to),
            (None, Some(to)) => (season_start_before(to), to),
            (None, None) => {
                let season = Season::containing(today).range();
                (season.from, season.to)
            }
        };

        let range = DateRange::new(from, to).ok_or(QueryError::InvertedRange { from, to })?;
        if (to - from).num_days() > MAX_RANGE_DAYS {
            return Err(QueryError::RangeTooLong {
                from,
                to,
                max_days: MAX_RANGE_DAYS,
            });
        }

        let mut teams: Vec<String> = teams
            .into_iter()
            .map(|team| team.trim().to_string())
            .filter(|team| !team.is_empty())
            .collect();
        teams.sort();
        teams.dedup();

        let mut sources: BTreeSet<SourceKind> = sources.into_iter().collect();
        if sources.is_empty() {
            sources.extend(SourceKind::ALL);
        }

        Ok(Self {
            range,
            teams,
            sources,
            language,
        })
    }

    pub fn from_params(
        params: &CalendarParams,
        default_language: Language,
        today: NaiveDate,
    ) -> Result<Self, QueryError> {
        let language = match &params.lang {
            Some(lang) => lang.parse::<Language>()?,
            None => default_language,
        };

        let sources = split_list(params.sources.as_deref())
            .map(str::parse::<SourceKind>)
            .collect::<Result<Vec<_>, _>>()?;

        let teams = split_list(params.teams.as_deref()).map(str::to_string);

        Self::new(params.from, params.to, teams, sources, language, today)
    }

    #[must_use]
    pub fn includes(&self, source: SourceKind) -> bool {
        self.sources.contains(&source)
    }

    #[must_use]
    pub fn record_query(&self) -> RecordQuery {
        RecordQuery {
            range: self.range,
            teams: self.teams.clone(),
        }
    }
}

/// Summer days belong to the upcoming season, whose start lies after them.
fn season_start_before(date: NaiveDate) -> NaiveDate {
    let season = Season::containing(date);
    let start = season.range().from;
    if start <= date {
        start
    } else {
        Season {
            start_year: season.start_year - 1,
        }
        .range()
        .from
    }
}

fn split_list(list: Option<&str>) -> impl Iterator<Item = &str> {
    list.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
}
