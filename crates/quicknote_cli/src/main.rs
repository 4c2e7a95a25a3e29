//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `quicknote_core` wiring end to end: config, logging, SQLite store,
//!   sorted query.
//! - Keep output deterministic for quick local sanity checks.
//!
//! Usage: `quicknote_cli [config.json]`

use futures::StreamExt;
use log::error;
use quicknote_core::{core_version, init_logging, CoreConfig, GetNotes, SqliteNoteRepository};
use std::process::ExitCode;
use std::sync::Arc;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!("event=cli_exit module=cli status=error error={message}");
            eprintln!("quicknote_cli: {message}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), String> {
    let config = match std::env::args().nth(1) {
        Some(path) => {
            let source = std::fs::read_to_string(&path)
                .map_err(|err| format!("cannot read config `{path}`: {err}"))?;
            CoreConfig::from_json(&source).map_err(|err| err.to_string())?
        }
        None => CoreConfig::default(),
    };

    if let Some(log_dir) = &config.log_dir {
        init_logging(&config.log_level, log_dir)?;
    }

    let repo = match config.database_file() {
        Some(path) => SqliteNoteRepository::open(path),
        None => SqliteNoteRepository::open_in_memory(),
    }
    .map_err(|err| err.to_string())?;

    let notes = GetNotes::new(Arc::new(repo))
        .invoke(config.default_order)
        .next()
        .await
        .unwrap_or_default();

    println!("quicknote_core version={}", core_version());
    println!("order={} notes={}", config.default_order, notes.len());
    for note in &notes {
        let id = note.id.map_or_else(|| "-".to_string(), |id| id.to_string());
        println!("{id}\t{}\t{:#010x}\t{}", note.timestamp, note.color, note.title);
    }
    Ok(())
}
