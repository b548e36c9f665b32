//! Command-line arguments and the optional TOML configuration file.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{ensure, Context, Result};
use clap::Parser;
use maze_runner_core::{GameDimensions, DEFAULT_BAG_CAPACITY, MAX_BAG_CAPACITY};
use maze_runner_persistence::DEFAULT_MAX_SAVES;
use serde::Deserialize;

/// File looked up in the data directory when `--config` is not given.
pub(crate) const CONFIG_FILE_NAME: &str = "maze-runner.toml";
/// Board side used when neither flags nor the file name one.
pub(crate) const DEFAULT_BOARD_SIDE: u32 = 38;

/// Terminal maze game with collectable items and save files.
#[derive(Debug, Parser)]
#[command(name = "maze-runner", version)]
pub(crate) struct Args {
    /// Board width in cells, border included. Must be even, at least 8 and at most 1026.
    #[arg(long)]
    pub(crate) width: Option<u32>,
    /// Board height in cells, border included. Must be even, at least 8 and at most 1026.
    #[arg(long)]
    pub(crate) height: Option<u32>,
    /// Seed for maze generation; random when omitted.
    #[arg(long)]
    pub(crate) seed: Option<u64>,
    /// Directory holding saves, the log file and the default config file.
    #[arg(long, default_value = "data")]
    pub(crate) data_dir: PathBuf,
    /// Configuration file to read instead of `<data-dir>/maze-runner.toml`.
    #[arg(long)]
    pub(crate) config: Option<PathBuf>,
    /// Grow the maze by two cells every time one is solved.
    #[arg(long)]
    pub(crate) grow: bool,
    /// Log filter such as `debug` or `maze_runner_world=trace`; overrides `RUST_LOG`.
    #[arg(long)]
    pub(crate) log_level: Option<String>,
}

/// Settings read from the TOML file. Every key is optional.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct FileConfig {
    width: Option<u32>,
    height: Option<u32>,
    bag_capacity: Option<usize>,
    grow_on_solve: Option<bool>,
    max_saves: Option<usize>,
}

impl FileConfig {
    fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse configuration toml contents")
    }

    /// Reads the file; a missing file yields defaults unless it was asked for explicitly.
    fn read(path: &Path, required: bool) -> Result<Self> {
        if !required && !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read configuration at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("invalid configuration at {}", path.display()))
    }
}

/// Fully resolved settings: flags win over the file, the file over defaults.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Settings {
    pub(crate) board: GameDimensions,
    pub(crate) bag_capacity: usize,
    pub(crate) grow_on_solve: bool,
    pub(crate) max_saves: usize,
    pub(crate) seed: Option<u64>,
    pub(crate) data_dir: PathBuf,
    pub(crate) log_level: Option<String>,
}

impl Settings {
    /// Reads the configuration file named by the arguments and merges it.
    pub(crate) fn load(args: Args) -> Result<Self> {
        let (path, required) = match &args.config {
            Some(path) => (path.clone(), true),
            None => (args.data_dir.join(CONFIG_FILE_NAME), false),
        };
        let file = FileConfig::read(&path, required)?;
        Self::resolve(args, file)
    }

    fn resolve(args: Args, file: FileConfig) -> Result<Self> {
        let width = args.width.or(file.width).unwrap_or(DEFAULT_BOARD_SIDE);
        let height = args.height.or(file.height).unwrap_or(DEFAULT_BOARD_SIDE);
        let board = GameDimensions::new(width, height).context("invalid board size")?;

        let bag_capacity = file.bag_capacity.unwrap_or(DEFAULT_BAG_CAPACITY);
        ensure!(
            (1..=MAX_BAG_CAPACITY).contains(&bag_capacity),
            "bag_capacity must be between 1 and {MAX_BAG_CAPACITY}, got {bag_capacity}"
        );
        let max_saves = file.max_saves.unwrap_or(DEFAULT_MAX_SAVES);
        ensure!(max_saves > 0, "max_saves must be positive");

        Ok(Self {
            board,
            bag_capacity,
            grow_on_solve: args.grow || file.grow_on_solve.unwrap_or(false),
            max_saves,
            seed: args.seed,
            data_dir: args.data_dir,
            log_level: args.log_level,
        })
    }
}
