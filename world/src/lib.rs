#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative game state management for Maze Runner.

mod items;
mod maze;
mod player;

use std::collections::BTreeMap;

use maze_runner_core::{
    Command, Coordinate, Direction, Event, GameDimensions, Item, MazeDimensions,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;
use tracing::{debug, info, trace};

pub use maze::{Maze, Tile};
pub use player::{Inventory, Player};

/// Coins paid per maze cell when a level is solved.
pub const REWARD_PER_CELL: f64 = 0.09375;
/// Items placed per carved road when a level starts.
pub const ITEM_DENSITY: f64 = 0.05;

const NEW_MAZE_MESSAGE: &str = "New Maze !!!";
const BAG_FULL_MESSAGE: &str = "Your bag is full...";

/// Reasons persisted state is refused when rebuilding a game.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RestoreError {
    /// The tile grid does not match the declared dimensions.
    #[error("maze grid holds {actual} tiles but {expected} were expected")]
    GridSize {
        /// Tiles implied by the dimensions.
        expected: usize,
        /// Tiles actually provided.
        actual: usize,
    },
    /// The start cell is a wall or lies outside the upper-left quadrant.
    #[error("start {0} is not a road in the upper-left quadrant")]
    InvalidStart(Coordinate),
    /// The exit cell is a wall or lies outside the lower-right quadrant.
    #[error("exit {0} is not a road in the lower-right quadrant")]
    InvalidExit(Coordinate),
    /// A listed carved road is not a road in the grid.
    #[error("listed road {0} is not a road")]
    NotARoad(Coordinate),
    /// No road path joins the start and the exit.
    #[error("exit {0} cannot be reached from the start")]
    ExitUnreachable(Coordinate),
    /// The bag capacity is zero or larger than the number keys can address.
    #[error("bag capacity {capacity} is outside 1..={maximum}")]
    BagCapacity {
        /// Recorded capacity.
        capacity: usize,
        /// Largest supported capacity.
        maximum: usize,
    },
    /// The bag holds more items than its capacity.
    #[error("bag holds {items} items but only {capacity} fit")]
    BagOverflow {
        /// Capacity of the bag.
        capacity: usize,
        /// Items provided.
        items: usize,
    },
    /// An auto-apply item was found in the bag.
    #[error("{0:?} applies on pickup and cannot be stored")]
    AutoApplyInBag(Item),
    /// The player does not stand on a road.
    #[error("player position {0} is not a road")]
    PlayerOffRoad(Coordinate),
    /// An item lies on a wall or outside the maze.
    #[error("item at {0} is not on a road")]
    ItemOffRoad(Coordinate),
}

/// Persisted pieces a [`Game`] can be rebuilt from.
#[derive(Clone, Debug)]
pub struct GameParts {
    /// Maze of the level in progress.
    pub maze: Maze,
    /// The player, including the bag and solved tally.
    pub player: Player,
    /// Items still lying in the maze.
    pub items: BTreeMap<Coordinate, Item>,
    /// Last status message.
    pub message: String,
}

/// Represents the authoritative Maze Runner game state.
#[derive(Debug)]
pub struct Game {
    dimensions: MazeDimensions,
    maze: Maze,
    player: Player,
    items: BTreeMap<Coordinate, Item>,
    reward: u32,
    message: String,
    rng: ChaCha8Rng,
}

impl Game {
    /// Creates a game on a freshly generated maze.
    ///
    /// One border cell on every side of `board` is reserved, so the maze is
    /// two cells narrower and shorter than the board.
    #[must_use]
    pub fn new(board: GameDimensions, bag_capacity: usize, seed: u64) -> Self {
        let dimensions = board.maze();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let maze = Maze::generate(dimensions, &mut rng);
        let mut game = Self {
            dimensions,
            maze,
            player: Player::new(bag_capacity),
            items: BTreeMap::new(),
            reward: reward_for(dimensions),
            message: String::new(),
            rng,
        };
        game.start_level();
        game
    }

    /// Rebuilds a game from persisted parts after checking their consistency.
    ///
    /// The random source is reseeded with `seed`; it only affects mazes
    /// generated after the restore.
    pub fn restore(parts: GameParts, seed: u64) -> Result<Self, RestoreError> {
        let GameParts {
            maze,
            player,
            items,
            message,
        } = parts;

        if !maze.is_road(player.position()) {
            return Err(RestoreError::PlayerOffRoad(player.position()));
        }
        if let Some(cell) = items.keys().copied().find(|cell| !maze.is_road(*cell)) {
            return Err(RestoreError::ItemOffRoad(cell));
        }

        let dimensions = maze.dimensions();
        Ok(Self {
            dimensions,
            reward: reward_for(dimensions),
            maze,
            player,
            items,
            message,
            rng: ChaCha8Rng::seed_from_u64(seed),
        })
    }

    fn start_level(&mut self) {
        self.populate_items();
        self.player.place_at(self.maze.start());
        self.message = NEW_MAZE_MESSAGE.to_owned();
    }

    fn populate_items(&mut self) {
        self.items.clear();
        let exit = self.maze.exit();
        let eligible = self.maze.roads().iter().filter(|cell| **cell != exit).count();
        let target = item_count(self.maze.road_count()).min(eligible);

        while self.items.len() < target {
            let index = self.rng.gen_range(0..self.maze.road_count());
            let Some(cell) = self.maze.road(index) else {
                continue;
            };
            if cell == exit || self.items.contains_key(&cell) {
                continue;
            }
            let item = items::random_item(&mut self.rng);
            let _ = self.items.insert(cell, item);
        }

        debug!(items = self.items.len(), roads = self.maze.road_count(), "placed items");
    }

    pub(crate) fn next_level(&mut self, skip: bool, grow_size: bool, out_events: &mut Vec<Event>) {
        if grow_size {
            self.dimensions = self.dimensions.grown();
        }
        self.maze = Maze::generate(self.dimensions, &mut self.rng);
        self.reward = reward_for(self.dimensions);
        self.start_level();

        if skip {
            debug!(dimensions = %self.dimensions, "maze skipped");
            out_events.push(Event::LevelSkipped);
        } else {
            let solved = self.player.record_solve();
            self.player.inventory_mut().add_coins(self.reward);
            self.message = format!(
                "You have earned {} coins for solving the maze",
                self.reward
            );
            info!(solved, reward = self.reward, "maze solved");
            out_events.push(Event::LevelCompleted {
                solved,
                reward: self.reward,
            });
        }

        out_events.push(Event::LevelStarted {
            dimensions: self.dimensions,
            start: self.maze.start(),
            exit: self.maze.exit(),
            items: self.items.len(),
        });
    }

    fn move_player(&mut self, direction: Direction, out_events: &mut Vec<Event>) {
        let from = self.player.position();
        let candidate = from.stepped(direction, 1);

        if !self.maze.is_road(candidate) {
            trace!(%from, %direction, "move blocked");
            self.player.face(direction);
            out_events.push(Event::PlayerTurned { direction });
            return;
        }

        if !self.player.turn_or_advance(direction) {
            out_events.push(Event::PlayerTurned { direction });
            return;
        }

        trace!(%from, to = %candidate, "player moved");
        out_events.push(Event::PlayerMoved {
            from,
            to: candidate,
        });
        self.collect_item_at(candidate, out_events);
    }

    fn collect_item_at(&mut self, cell: Coordinate, out_events: &mut Vec<Event>) {
        let Some(item) = self.items.get(&cell).copied() else {
            return;
        };

        if item.auto_apply() {
            items::apply_item(self, item, out_events);
            let _ = self.items.remove(&cell);
            out_events.push(Event::ItemConsumed { cell, item });
            return;
        }

        match self.player.inventory_mut().add(item) {
            Ok(slot) => {
                let _ = self.items.remove(&cell);
                self.message = item.report().unwrap_or_default();
                out_events.push(Event::ItemCollected { cell, item, slot });
            }
            Err(item) => {
                self.message = BAG_FULL_MESSAGE.to_owned();
                out_events.push(Event::BagFull { cell, item });
            }
        }
    }

    fn use_item(&mut self, slot: usize, out_events: &mut Vec<Event>) {
        let Some(item) = self.player.inventory_mut().take(slot) else {
            trace!(slot, "no item in slot");
            return;
        };
        out_events.push(Event::ItemUsed { slot, item });
        items::apply_item(self, item, out_events);
    }
}

/// Applies the provided command to the game, mutating state deterministically.
pub fn apply(game: &mut Game, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::MovePlayer { direction } => game.move_player(direction, out_events),
        Command::UseItem { slot } => game.use_item(slot, out_events),
        Command::NextLevel { skip, grow_size } => game.next_level(skip, grow_size, out_events),
    }
}

fn reward_for(dimensions: MazeDimensions) -> u32 {
    (f64::from(dimensions.area()) * REWARD_PER_CELL).round() as u32
}

fn item_count(roads: usize) -> usize {
    (roads as f64 * ITEM_DENSITY).round() as usize
}

/// Query functions that provide read-only access to the game state.
pub mod query {
    use maze_runner_core::{Coordinate, Direction, Item, MazeDimensions};

    use super::{Game, Inventory, Maze, Player};

    /// Provides read-only access to the current maze.
    #[must_use]
    pub fn maze(game: &Game) -> &Maze {
        &game.maze
    }

    /// Dimensions used to generate the current and upcoming mazes.
    #[must_use]
    pub fn dimensions(game: &Game) -> MazeDimensions {
        game.dimensions
    }

    /// Provides read-only access to the player.
    #[must_use]
    pub fn player(game: &Game) -> &Player {
        &game.player
    }

    /// Cell the player stands on.
    #[must_use]
    pub fn position(game: &Game) -> Coordinate {
        game.player.position()
    }

    /// Direction the player faces.
    #[must_use]
    pub fn direction(game: &Game) -> Direction {
        game.player.direction()
    }

    /// The player's bag.
    #[must_use]
    pub fn inventory(game: &Game) -> &Inventory {
        game.player.inventory()
    }

    /// Number of mazes solved so far.
    #[must_use]
    pub fn solved(game: &Game) -> u32 {
        game.player.solved()
    }

    /// Start cell of the current maze.
    #[must_use]
    pub fn start(game: &Game) -> Coordinate {
        game.maze.start()
    }

    /// Exit cell of the current maze.
    #[must_use]
    pub fn exit(game: &Game) -> Coordinate {
        game.maze.exit()
    }

    /// Reports whether the player stands on the exit.
    #[must_use]
    pub fn is_ended(game: &Game) -> bool {
        game.player.position() == game.maze.exit()
    }

    /// Coins paid for solving the current maze.
    #[must_use]
    pub fn reward(game: &Game) -> u32 {
        game.reward
    }

    /// Last user-facing status message.
    #[must_use]
    pub fn message(game: &Game) -> &str {
        &game.message
    }

    /// Items lying in the maze, ordered by coordinate.
    pub fn items(game: &Game) -> impl Iterator<Item = (Coordinate, Item)> + '_ {
        game.items.iter().map(|(cell, item)| (*cell, *item))
    }

    /// Item lying on the cell, if any.
    #[must_use]
    pub fn item_at(game: &Game, cell: Coordinate) -> Option<Item> {
        game.items.get(&cell).copied()
    }

    /// Number of items lying in the maze.
    #[must_use]
    pub fn item_count(game: &Game) -> usize {
        game.items.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(side: u32) -> GameDimensions {
        GameDimensions::new(side, side).expect("valid board")
    }

    #[test]
    fn new_game_reserves_border_and_computes_reward() {
        let game = Game::new(board(20), 9, 1);
        assert_eq!(query::maze(&game).width(), 18);
        assert_eq!(query::maze(&game).height(), 18);
        assert_eq!(query::reward(&game), 30);
        assert_eq!(query::message(&game), "New Maze !!!");
        assert_eq!(query::solved(&game), 0);
        assert_eq!(query::position(&game), query::start(&game));
    }

    #[test]
    fn item_count_follows_road_count() {
        for seed in 0..20 {
            let game = Game::new(board(20), 9, seed);
            let roads = query::maze(&game).road_count();
            assert_eq!(query::item_count(&game), item_count(roads), "seed {seed}");
            assert_eq!(query::item_at(&game, query::exit(&game)), None);
            assert_eq!(query::item_at(&game, query::start(&game)), None);
            for (cell, _) in query::items(&game) {
                assert!(query::maze(&game).is_road(cell));
            }
        }
    }

    #[test]
    fn rounding_matches_half_up() {
        assert_eq!(item_count(10), 1);
        assert_eq!(item_count(9), 0);
        assert_eq!(item_count(150), 8);
        assert_eq!(reward_for(MazeDimensions::new(18, 18).expect("valid")), 30);
        assert_eq!(reward_for(MazeDimensions::new(36, 36).expect("valid")), 122);
    }

    #[test]
    fn growing_levels_widen_the_maze() {
        let mut game = Game::new(board(10), 9, 3);
        let mut events = Vec::new();
        apply(
            &mut game,
            Command::NextLevel {
                skip: false,
                grow_size: true,
            },
            &mut events,
        );

        assert_eq!(query::maze(&game).width(), 10);
        assert_eq!(query::maze(&game).height(), 10);
        assert_eq!(query::reward(&game), 9);
        assert_eq!(query::inventory(&game).coins(), 9);
    }

    #[test]
    fn level_events_report_completion_before_the_new_maze() {
        let mut game = Game::new(board(12), 9, 4);
        let mut events = Vec::new();
        apply(
            &mut game,
            Command::NextLevel {
                skip: false,
                grow_size: false,
            },
            &mut events,
        );

        assert_eq!(events.len(), 2);
        assert_eq!(
            events[0],
            Event::LevelCompleted {
                solved: 1,
                reward: query::reward(&game)
            }
        );
        assert!(matches!(events[1], Event::LevelStarted { .. }));
    }

    #[test]
    fn blocked_moves_only_turn() {
        let (mut game, blocked) = (0..64)
            .find_map(|seed| {
                let game = Game::new(board(12), 9, seed);
                let start = query::position(&game);
                Direction::ALL
                    .into_iter()
                    .find(|direction| !query::maze(&game).is_road(start.stepped(*direction, 1)))
                    .map(|direction| (game, direction))
            })
            .expect("some start cell has a blocked side");
        let start = query::position(&game);

        let mut events = Vec::new();
        for _ in 0..3 {
            apply(&mut game, Command::MovePlayer { direction: blocked }, &mut events);
        }

        assert_eq!(query::position(&game), start);
        assert_eq!(query::direction(&game), blocked);
        assert!(events
            .iter()
            .all(|event| *event == Event::PlayerTurned { direction: blocked }));
    }

    #[test]
    fn using_an_empty_slot_is_ignored() {
        let mut game = Game::new(board(12), 9, 2);
        let before = query::message(&game).to_owned();
        let mut events = Vec::new();
        apply(&mut game, Command::UseItem { slot: 4 }, &mut events);

        assert!(events.is_empty());
        assert_eq!(query::message(&game), before);
    }
}
