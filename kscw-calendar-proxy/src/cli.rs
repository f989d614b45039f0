use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process;
use std::str::FromStr;
use std::time::Duration;

use chrono::NaiveDate;
use getopts::{Matches, Options};
use kscw_calendar::{Language, SourceKind};

use crate::error::CliError;

pub const ADDRESS_VAR: &str = "KSCW_CALENDAR_ADDR";
pub const POCKETBASE_URL_VAR: &str = "KSCW_POCKETBASE_URL";

const DEFAULT_POCKETBASE_URL: &str = "http://127.0.0.1:8090";

#[derive(Debug)]
pub struct Args {
    pub address: SocketAddr,
    pub pocketbase_url: String,
    pub enable_cache: bool,
    pub cache_ttl: Duration,
    pub language: Option<Language>,
    pub set_language: Option<Language>,
    pub preferences: Option<PathBuf>,
    pub export: Option<PathBuf>,
    pub name: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub teams: Vec<String>,
    pub sources: Vec<SourceKind>,
}

#[derive(Debug)]
pub enum Command {
    Help(String),
    Run(Args),
}

fn opts() -> Options {
    let mut opts = Options::new();
    opts.optflag(
        "h",
        "help",
        concat!("Print the help output of ", env!("CARGO_PKG_NAME")),
    );
    opts.optopt(
        "a",
        "address",
        "Socket address (IP and port) to listen on [Default: 127.0.0.1:8080]",
        "SOCKET_ADDRESS",
    );
    opts.optopt(
        "u",
        "pocketbase-url",
        "Base URL of the PocketBase backend [Default: http://127.0.0.1:8090]",
        "URL",
    );
    opts.optflag(
        "c",
        "enable-cache",
        "Enable caching of built calendars [Default: false]",
    );
    opts.optopt(
        "t",
        "cache-ttl",
        "Time-to-live for cached calendars [Default: 600]",
        "SECONDS",
    );
    opts.optopt(
        "l",
        "lang",
        "Language for generated titles, overriding the saved preference",
        "de|en",
    );
    opts.optopt(
        "",
        "set-lang",
        "Save the preferred language and use it from now on",
        "de|en",
    );
    opts.optopt(
        "",
        "preferences",
        "Preferences file [Default: <config dir>/kscw-calendar-proxy/preferences.toml]",
        "FILE",
    );
    opts.optopt(
        "e",
        "export",
        "Write an .ics file instead of serving HTTP",
        "FILE",
    );
    opts.optopt("n", "name", "Calendar name used for exports", "NAME");
    opts.optopt("", "from", "First day to export [Default: season start]", "YYYY-MM-DD");
    opts.optopt("", "to", "Last day to export [Default: season end]", "YYYY-MM-DD");
    opts.optmulti("", "team", "Only export entries of this team id", "TEAM_ID");
    opts.optopt(
        "s",
        "sources",
        "Comma separated sources to export [Default: all]",
        "games,trainings,events,closures,hall_events",
    );
    opts
}

/// Parses the process arguments, exiting on `--help` or invalid input.
pub fn parse(args: Vec<String>) -> Args {
    match try_parse(args, |var| env::var(var).ok()) {
        Ok(Command::Run(args)) => args,
        Ok(Command::Help(usage)) => {
            println!("{usage}");
            process::exit(0);
        }
        Err(err) => {
            eprintln!("{err}");
            process::exit(1);
        }
    }
}

/// `env` looks up environment variables used as fallbacks for options.
pub fn try_parse<E>(args: Vec<String>, env: E) -> Result<Command, CliError>
where
    E: Fn(&str) -> Option<String>,
{
    let opts = opts();
    let matches = opts.parse(args)?;

    if matches.opt_present("help") {
        return Ok(Command::Help(
            opts.usage(&opts.short_usage(env!("CARGO_PKG_NAME"))),
        ));
    }

    let address = match matches.opt_str("address").or_else(|| env(ADDRESS_VAR)) {
        Some(address) => parse_value("address", &address)?,
        None => SocketAddr::from(([127, 0, 0, 1], 8080)),
    };

    let pocketbase_url = matches
        .opt_str("pocketbase-url")
        .or_else(|| env(POCKETBASE_URL_VAR))
        .unwrap_or_else(|| DEFAULT_POCKETBASE_URL.to_string());

    let cache_ttl = opt_value(&matches, "cache-ttl")?
        .map_or(Duration::from_secs(600), Duration::from_secs);

    let sources = match matches.opt_str("sources") {
        Some(list) => list
            .split(',')
            .map(str::trim)
            .filter(|source| !source.is_empty())
            .map(|source| parse_value("sources", source))
            .collect::<Result<Vec<_>, _>>()?,
        None => Vec::new(),
    };

    Ok(Command::Run(Args {
        address,
        pocketbase_url,
        enable_cache: matches.opt_present("enable-cache"),
        cache_ttl,
        language: opt_value(&matches, "lang")?,
        set_language: opt_value(&matches, "set-lang")?,
        preferences: matches.opt_str("preferences").map(PathBuf::from),
        export: matches.opt_str("export").map(PathBuf::from),
        name: matches.opt_str("name"),
        from: opt_value(&matches, "from")?,
        to: opt_value(&matches, "to")?,
        teams: matches.opt_strs("team"),
        sources,
    }))
}

fn opt_value<T>(matches: &Matches, option: &'static str) -> Result<Option<T>, CliError>
where
    T: FromStr,
    T::Err: ToString,
{
    matches
        .opt_str(option)
        .map(|value| parse_value(option, &value))
        .transpose()
}

fn parse_value<T>(option: &'static str, value: &str) -> Result<T, CliError>
where
    T: FromStr,
    T::Err: ToString,
{
    value.parse().map_err(|err: T::Err| CliError::Invalid {
        option,
        reason: err.to_string(),
    })
}
