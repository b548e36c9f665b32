#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! JSON save files for Maze Runner games.
//!
//! A [`GameSnapshot`] captures everything needed to resume a game. The
//! [`SaveStore`] keeps snapshots as individual `.json` files in one directory.

mod snapshot;
mod store;

use maze_runner_core::{Coordinate, DimensionError};
use maze_runner_world::RestoreError;
use thiserror::Error;

pub use snapshot::{GameSnapshot, MazeSnapshot, PlacedItem, PlayerSnapshot, SNAPSHOT_VERSION};
pub use store::{SaveStore, DEFAULT_MAX_SAVES, SAVE_EXTENSION};

/// Errors surfaced while reading or writing saves.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Filesystem access failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The save is not valid JSON or does not match the snapshot layout.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The save was written by an incompatible version.
    #[error("unsupported snapshot version {found}, expected {expected}")]
    UnsupportedVersion {
        /// Version recorded in the save.
        found: u32,
        /// Version this build understands.
        expected: u32,
    },

    /// The recorded maze dimensions are not usable.
    #[error("invalid dimensions: {0}")]
    Dimensions(#[from] DimensionError),

    /// A maze row does not match the recorded width or holds an unknown glyph.
    #[error("maze row {row} is malformed")]
    MalformedRow {
        /// Zero-based row index.
        row: usize,
    },

    /// Two items were recorded on the same cell.
    #[error("more than one item recorded at {0}")]
    DuplicateItem(Coordinate),

    /// The decoded state is inconsistent.
    #[error("corrupted data: {0}")]
    Corrupted(#[from] RestoreError),

    /// The store already holds the maximum number of saves.
    #[error("save limit of {limit} reached")]
    SaveLimitReached {
        /// Maximum number of saves kept by the store.
        limit: usize,
    },

    /// A save name contains path separators or is empty.
    #[error("invalid save name: {0:?}")]
    InvalidName(String),
}

/// Convenience result alias for persistence operations.
pub type Result<T> = std::result::Result<T, PersistenceError>;
