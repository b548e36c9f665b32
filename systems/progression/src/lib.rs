#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure level progression system that requests a new maze once the exit is reached.

use maze_runner_core::{Command, Coordinate, Event};
use tracing::debug;

/// Configuration parameters required to construct the progression system.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Config {
    grow_on_solve: bool,
}

impl Config {
    /// Creates a configuration; `grow_on_solve` widens every solved maze by two cells.
    #[must_use]
    pub const fn new(grow_on_solve: bool) -> Self {
        Self { grow_on_solve }
    }
}

/// Emits [`Command::NextLevel`] when a move lands on the exit.
#[derive(Debug, Default)]
pub struct Progression {
    grow_on_solve: bool,
}

impl Progression {
    /// Creates a new progression system using the supplied configuration.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self {
            grow_on_solve: config.grow_on_solve,
        }
    }

    /// Consumes the events of one command and the current exit to emit level commands.
    ///
    /// The exit is checked once per move. A `LevelStarted` later in the batch means
    /// the level already changed, so an earlier arrival is discarded.
    pub fn handle(&mut self, events: &[Event], exit: Coordinate, out: &mut Vec<Command>) {
        let mut reached = false;
        for event in events {
            match event {
                Event::PlayerMoved { to, .. } if *to == exit => reached = true,
                Event::LevelStarted { .. } => reached = false,
                _ => {}
            }
        }

        if reached {
            debug!(%exit, grow = self.grow_on_solve, "exit reached");
            out.push(Command::NextLevel {
                skip: false,
                grow_size: self.grow_on_solve,
            });
        }
    }
}
