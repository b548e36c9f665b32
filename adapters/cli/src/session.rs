//! One running game: world state, the progression system and save bookkeeping.

use std::ops::ControlFlow;

use maze_runner_core::{Command, Event};
use maze_runner_persistence::{GameSnapshot, PersistenceError, SaveStore};
use maze_runner_rendering::{PlayerAction, Scene};
use maze_runner_system_progression::{Config as ProgressionConfig, Progression};
use maze_runner_world::{apply, query, Game};
use tracing::{debug, info};

use crate::config::Settings;

/// A game in progress together with the systems that drive it.
#[derive(Debug)]
pub(crate) struct Session {
    game: Game,
    progression: Progression,
    /// Save the game was loaded from; saving overwrites it.
    save_name: Option<String>,
    events: Vec<Event>,
    commands: Vec<Command>,
}

impl Session {
    /// Starts a fresh game on a newly generated maze.
    pub(crate) fn new_game(settings: &Settings) -> Self {
        let seed = settings.seed.unwrap_or_else(rand::random);
        info!(seed, board = ?settings.board, "starting new game");
        Self::with_game(
            Game::new(settings.board, settings.bag_capacity, seed),
            settings,
            None,
        )
    }

    /// Resumes the named save.
    pub(crate) fn resume(
        store: &SaveStore,
        name: &str,
        settings: &Settings,
    ) -> Result<Self, PersistenceError> {
        let seed = settings.seed.unwrap_or_else(rand::random);
        let game = store.load(name)?.into_game(seed)?;
        info!(%name, seed, "resumed saved game");
        Ok(Self::with_game(game, settings, Some(name.to_owned())))
    }

    fn with_game(game: Game, settings: &Settings, save_name: Option<String>) -> Self {
        Self {
            game,
            progression: Progression::new(ProgressionConfig::new(settings.grow_on_solve)),
            save_name,
            events: Vec::new(),
            commands: Vec::new(),
        }
    }

    /// The game being played.
    pub(crate) fn game(&self) -> &Game {
        &self.game
    }

    /// Scene describing the current state.
    pub(crate) fn scene(&self) -> Scene {
        Scene::from_game(&self.game)
    }

    /// Applies a player action. Breaks when the player asks to quit.
    pub(crate) fn handle(&mut self, action: PlayerAction) -> ControlFlow<()> {
        let command = match action {
            PlayerAction::Quit => return ControlFlow::Break(()),
            PlayerAction::Move(direction) => Command::MovePlayer { direction },
            PlayerAction::UseItem(slot) => Command::UseItem { slot },
        };

        self.events.clear();
        apply(&mut self.game, command, &mut self.events);
        self.progression
            .handle(&self.events, query::exit(&self.game), &mut self.commands);
        for command in self.commands.drain(..) {
            apply(&mut self.game, command, &mut self.events);
        }

        for event in &self.events {
            debug!(?event, "world event");
        }
        ControlFlow::Continue(())
    }

    /// Writes the game to the store and returns the save name.
    ///
    /// A loaded game overwrites its own save; a new game gets a fresh
    /// timestamped save, subject to the store's limit.
    pub(crate) fn save(&mut self, store: &SaveStore) -> Result<String, PersistenceError> {
        let snapshot = GameSnapshot::capture(&self.game);
        let name = match &self.save_name {
            Some(name) => {
                store.save_as(name, &snapshot)?;
                name.clone()
            }
            None => store.save_new(&snapshot)?,
        };
        self.save_name = Some(name.clone());
        Ok(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::settings_from;
    use maze_runner_core::Direction;

    fn session() -> Session {
        Session::new_game(&settings_from(&["--width", "12", "--height", "12", "--seed", "3"]))
    }

    #[test]
    fn seeded_sessions_are_reproducible() {
        let first = session();
        let second = session();
        assert_eq!(first.scene(), second.scene());
    }

    #[test]
    fn quit_breaks_without_touching_the_game() {
        let mut session = session();
        let before = session.scene();

        assert_eq!(session.handle(PlayerAction::Quit), ControlFlow::Break(()));
        assert_eq!(session.scene(), before);
    }

    #[test]
    fn walking_onto_the_exit_starts_the_next_maze() {
        let mut session = session();
        let mut solved = false;

        for _ in 0..2_000 {
            let game = session.game();
            let here = query::position(game);
            let exit = query::exit(game);
            let maze = query::maze(game);
            let Some(direction) = Direction::ALL.into_iter().find(|direction| {
                let next = here.stepped(*direction, 1);
                maze.distance(next, exit)
                    .zip(maze.distance(here, exit))
                    .is_some_and(|(next, now)| next < now)
            }) else {
                break;
            };
            let _ = session.handle(PlayerAction::Move(direction));
            if query::solved(session.game()) == 1 {
                solved = true;
                break;
            }
        }

        assert!(solved, "following the shortest path must solve the maze");
        assert_eq!(query::position(session.game()), query::start(session.game()));
        assert!(query::inventory(session.game()).coins() >= 9);
    }

    #[test]
    fn saving_twice_reuses_the_first_name() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = SaveStore::open(dir.path(), 1).expect("store");
        let mut session = session();

        let first = session.save(&store).expect("first save");
        let second = session.save(&store).expect("overwrite stays within the limit");

        assert_eq!(first, second);
        assert_eq!(store.list().expect("list"), vec![first]);
    }

    #[test]
    fn resumed_session_matches_the_saved_one() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = SaveStore::open(dir.path(), 8).expect("store");
        let mut original = session();
        let _ = original.handle(PlayerAction::Move(Direction::Right));
        let name = original.save(&store).expect("saved");

        let settings = settings_from(&["--seed", "3"]);
        let resumed = Session::resume(&store, &name, &settings).expect("resumed");

        assert_eq!(resumed.scene(), original.scene());
    }
}
