use std::io;

use chrono::NaiveDate;
use kscw_calendar::{UnknownLanguage, UnknownSource};
use reqwest::StatusCode;
use thiserror::Error;

/// A collection could not be read from PocketBase.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Request for `{collection}` failed: {source}")]
    Request {
        collection: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("`{collection}` responded with status {status}")]
    Status {
        collection: &'static str,
        status: StatusCode,
    },

    #[error("`{collection}` returned an unreadable body: {source}")]
    Decode {
        collection: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

/// A calendar request that cannot be turned into a view.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error(transparent)]
    UnknownSource(#[from] UnknownSource),

    #[error(transparent)]
    UnknownLanguage(#[from] UnknownLanguage),

    #[error("Range ends {to} before it starts {from}")]
    InvertedRange { from: NaiveDate, to: NaiveDate },

    #[error("Range {from}..{to} is longer than {max_days} days")]
    RangeTooLong {
        from: NaiveDate,
        to: NaiveDate,
        max_days: i64,
    },
}

#[derive(Debug, Error)]
pub enum PreferencesError {
    #[error("No configuration directory available on this platform")]
    NoConfigDir,

    #[error("Failed to access preferences: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to parse preferences: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to write preferences: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Getopts(#[from] getopts::Fail),

    #[error("Provided value for option '{option}' is invalid: {reason}")]
    Invalid { option: &'static str, reason: String },
}
