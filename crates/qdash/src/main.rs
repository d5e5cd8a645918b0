#![forbid(unsafe_code)]

//! `qdash` binary entry point.

use std::io;
use std::process;
use std::sync::Arc;

use qdash::cli::Opts;
use qdash::{FileStore, LogConfig, SharedStore, commands};

fn main() {
    if let Err(e) = LogConfig::from_env().install() {
        eprintln!("qdash: logging disabled: {e}");
    }

    let opts = match Opts::parse() {
        Ok(opts) => opts,
        Err(e) => {
            eprintln!("qdash: {e}");
            eprintln!("Run with --help for usage information.");
            process::exit(e.exit_code());
        }
    };

    let file = match &opts.state_file {
        Some(path) => FileStore::new(path),
        None => FileStore::default_for_app("qdash"),
    };
    tracing::debug!(path = %file.path().display(), "using preference file");
    let store: SharedStore = Arc::new(file);

    let stdout = io::stdout();
    if let Err(e) = commands::run(&opts.command, store, &mut stdout.lock()) {
        eprintln!("qdash: {e}");
        process::exit(e.exit_code());
    }
}
