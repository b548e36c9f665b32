//! Start menu, save selection and the play loop.

use anyhow::{Context, Result};
use maze_runner_core::GAME_TITLE;
use maze_runner_persistence::{PersistenceError, SaveStore};
use maze_runner_rendering::{Presentation, RenderingBackend};
use maze_runner_world::query;
use std::ops::ControlFlow;
use tracing::{info, warn};

use crate::{config::Settings, input::Answer, session::Session, terminal::TerminalBackend};

const NEW_GAME: &str = "New Game";
const LOAD_GAME: &str = "Load Game";
const QUIT: &str = "Quit";
const BACK: &str = "Back";

/// Terminal front end tying settings, saves and sessions together.
pub(crate) struct App {
    settings: Settings,
    store: SaveStore,
    terminal: TerminalBackend,
}

impl App {
    pub(crate) fn new(settings: Settings, store: SaveStore, terminal: TerminalBackend) -> Self {
        Self {
            settings,
            store,
            terminal,
        }
    }

    /// Shows the start menu until the player quits.
    pub(crate) fn run(&mut self) -> Result<()> {
        let options = [NEW_GAME, LOAD_GAME, QUIT].map(str::to_owned);
        loop {
            match options[self.terminal.menu(GAME_TITLE, &options)?].as_str() {
                NEW_GAME => {
                    let session = Session::new_game(&self.settings);
                    self.play(session)?;
                }
                LOAD_GAME => {
                    if let Some(session) = self.choose_save()? {
                        self.play(session)?;
                    }
                }
                _ => break,
            }
        }

        self.terminal
            .notice("Closing the Program", "Thanks for playing! Have a good day!")?;
        Ok(())
    }

    fn choose_save(&mut self) -> Result<Option<Session>> {
        let saves = self.store.list().context("failed to list saves")?;
        let title = format!("You have {}/{} files", saves.len(), self.store.max_saves());
        let mut options = saves.clone();
        options.push(BACK.to_owned());

        let choice = self.terminal.menu(&title, &options)?;
        let Some(name) = saves.get(choice) else {
            return Ok(None);
        };

        match Session::resume(&self.store, name, &self.settings) {
            Ok(session) => Ok(Some(session)),
            Err(error) => {
                warn!(%name, %error, "failed to load save");
                let message = match error {
                    PersistenceError::Io(_) => "IOException".to_owned(),
                    _ => format!("{name} is corrupted"),
                };
                self.terminal.notice("Failed to Load", &message)?;
                Ok(None)
            }
        }
    }

    fn play(&mut self, mut session: Session) -> Result<()> {
        loop {
            let presentation = Presentation::new(GAME_TITLE, session.scene());
            self.terminal.run(presentation, |input, scene| {
                let Some(action) = input.action else {
                    return ControlFlow::Continue(());
                };
                let flow = session.handle(action);
                *scene = session.scene();
                flow
            })?;
            info!(solved = query::solved(session.game()), "quit requested");

            match self
                .terminal
                .prompt(QUIT, "Do you want to save the game?")?
            {
                Answer::Cancel => continue,
                Answer::No => return Ok(()),
                Answer::Yes => match session.save(&self.store) {
                    Ok(name) => {
                        info!(%name, "game saved before quitting");
                        return Ok(());
                    }
                    Err(PersistenceError::SaveLimitReached { limit }) => {
                        self.terminal.notice(
                            "File Not Saved",
                            &format!("You can only save up to {limit} games"),
                        )?;
                    }
                    Err(error) => {
                        warn!(%error, "failed to save game");
                        self.terminal.notice("Warning", "File not saved")?;
                    }
                },
            }
        }
    }
}
