#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs the Maze Runner game in a terminal.

mod app;
mod config;
mod input;
mod logging;
mod session;
mod terminal;

use anyhow::{Context, Result};
use clap::Parser;
use maze_runner_persistence::SaveStore;

use crate::{
    app::App,
    config::{Args, Settings},
    terminal::TerminalBackend,
};

/// Entry point for the Maze Runner command-line interface.
fn main() -> Result<()> {
    let settings = Settings::load(Args::parse())?;
    let _log_guard = logging::init(&settings.data_dir, settings.log_level.as_deref())?;
    let store = SaveStore::open(&settings.data_dir, settings.max_saves).with_context(|| {
        format!(
            "failed to open save directory {}",
            settings.data_dir.display()
        )
    })?;

    let terminal = TerminalBackend::enter().context("failed to prepare the terminal")?;
    let result = App::new(settings, store, terminal).run();
    if let Err(error) = &result {
        tracing::error!(%error, "game ended with an error");
    }
    result
}
