use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use chrono::Utc;
use kscw_calendar::{ics, Language};
use log::{error, info, warn};
use tokio::net::TcpListener;

use crate::cache::{Config, ViewCache};
use crate::cli::Args;
use crate::loader::load_view;
use crate::pocketbase::PocketBase;
use crate::prefs::Preferences;
use crate::query::ViewQuery;
use crate::routes::{router, AppState};
use crate::source::RecordSource;

mod cache;
mod cli;
mod error;
mod loader;
mod pocketbase;
mod prefs;
mod query;
mod routes;
mod source;

const LOG_VAR: &str = "KSCW_LOG";

#[tokio::main]
async fn main() -> ExitCode {
    setup_logging();

    let args = cli::parse(env::args().skip(1).collect());
    let language = resolve_language(&args);

    let source = match PocketBase::new(args.pocketbase_url.as_str()) {
        Ok(source) => Arc::new(source),
        Err(err) => {
            error!("{err}");
            return ExitCode::FAILURE;
        }
    };

    match args.export.clone() {
        Some(path) => export(&args, source.as_ref(), language, path).await,
        None => serve(&args, source, language).await,
    }
}

fn setup_logging() {
    env_logger::Builder::from_env(env_logger::Env::new().filter_or(LOG_VAR, "info")).init();
}

/// `--lang` wins over the saved preference; `--set-lang` updates the
/// preference first.
fn resolve_language(args: &Args) -> Language {
    let path = match args.preferences.clone().map_or_else(Preferences::default_path, Ok) {
        Ok(path) => path,
        Err(err) => {
            warn!("{err}, using default preferences");
            return args.set_language.or(args.language).unwrap_or_default();
        }
    };

    let mut preferences = Preferences::load(&path).unwrap_or_else(|err| {
        warn!("Ignoring preferences at {}: {err}", path.display());
        Preferences::default()
    });

    if let Some(language) = args.set_language {
        preferences.language = language;
        match preferences.save(&path) {
            Ok(()) => info!("Saved preferred language `{language}` to {}", path.display()),
            Err(err) => warn!("Failed to save preferences to {}: {err}", path.display()),
        }
    }

    args.language.unwrap_or(preferences.language)
}

async fn export(
    args: &Args,
    source: &dyn RecordSource,
    language: Language,
    path: PathBuf,
) -> ExitCode {
    let query = match ViewQuery::new(
        args.from,
        args.to,
        args.teams.iter().cloned(),
        args.sources.iter().copied(),
        language,
        Utc::now().date_naive(),
    ) {
        Ok(query) => query,
        Err(err) => {
            error!("{err}");
            return ExitCode::FAILURE;
        }
    };

    let view = load_view(source, &query).await;
    if !view.is_complete() {
        for err in &view.errors {
            error!("Failed to load {}: {}", err.source, err.message);
        }
        return ExitCode::FAILURE;
    }

    let name = args.name.as_deref().unwrap_or(language.calendar_name());
    match ics::export_file(&path, name, &view.entries, Utc::now()) {
        Ok(written) => {
            info!("Wrote {} entries to {}", view.entries.len(), written.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("Failed to write {}: {err}", path.display());
            ExitCode::FAILURE
        }
    }
}

async fn serve(args: &Args, source: Arc<PocketBase>, language: Language) -> ExitCode {
    let state = AppState {
        source,
        cache: ViewCache::new(Config {
            enabled: args.enable_cache,
            ttl: args.cache_ttl,
        }),
        default_language: language,
    };

    let listener = match TcpListener::bind(args.address).await {
        Ok(listener) => listener,
        Err(err) => {
            error!("Failed to bind {}: {err}", args.address);
            return ExitCode::FAILURE;
        }
    };

    info!(
        "Listening at http://{} (PocketBase at {})",
        args.address, args.pocketbase_url
    );

    if let Err(err) = axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {err}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutting down"),
        Err(err) => {
            error!("Failed to listen for shutdown signal: {err}");
            std::future::pending::<()>().await;
        }
    }
}
