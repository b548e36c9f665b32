#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Maze Runner engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams and respond
//! exclusively with new command batches.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Title shown by adapters when the experience boots.
pub const GAME_TITLE: &str = "A Friendly Maze Game";

/// Default number of non-auto-apply items a player can carry.
pub const DEFAULT_BAG_CAPACITY: usize = 9;

/// Largest bag a player can carry; slots are addressed by the keys 1 to 9.
pub const MAX_BAG_CAPACITY: usize = 9;

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Requests that the player step (or turn) toward the provided direction.
    MovePlayer {
        /// Direction the player wants to travel in.
        direction: Direction,
    },
    /// Requests that the item stored in the given inventory slot be applied.
    UseItem {
        /// Zero-based inventory slot.
        slot: usize,
    },
    /// Requests that the world replace the current maze with a fresh level.
    NextLevel {
        /// Skipped levels grant neither reward nor a solved tally.
        skip: bool,
        /// Grows both maze dimensions by two before generating.
        grow_size: bool,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// The player changed facing without leaving its cell.
    PlayerTurned {
        /// Direction the player faces after the command.
        direction: Direction,
    },
    /// The player advanced a single cell.
    PlayerMoved {
        /// Cell the player occupied before moving.
        from: Coordinate,
        /// Cell the player occupies after moving.
        to: Coordinate,
    },
    /// An auto-apply item fired on pickup and left the maze.
    ItemConsumed {
        /// Cell the item was lying on.
        cell: Coordinate,
        /// The consumed item.
        item: Item,
    },
    /// An item moved from the maze into the player's bag.
    ItemCollected {
        /// Cell the item was lying on.
        cell: Coordinate,
        /// The collected item.
        item: Item,
        /// Inventory slot the item now occupies.
        slot: usize,
    },
    /// The bag had no room, so the item stayed on the ground.
    BagFull {
        /// Cell the item is still lying on.
        cell: Coordinate,
        /// The item that could not be stored.
        item: Item,
    },
    /// An item was taken out of the bag and applied.
    ItemUsed {
        /// Slot the item occupied before it was used.
        slot: usize,
        /// The applied item.
        item: Item,
    },
    /// A breaker flipped wall cells into roads.
    WallsDestroyed {
        /// Cells that turned into roads, nearest first.
        cells: Vec<Coordinate>,
    },
    /// A new maze was generated and populated.
    LevelStarted {
        /// Interior dimensions of the new maze.
        dimensions: MazeDimensions,
        /// Start cell the player was placed on.
        start: Coordinate,
        /// Exit cell of the new maze.
        exit: Coordinate,
        /// Number of items placed on the level.
        items: usize,
    },
    /// The previous level counted as solved and its reward was paid out.
    LevelCompleted {
        /// Solved tally after the completion.
        solved: u32,
        /// Coins credited for the completion.
        reward: u32,
    },
    /// The previous level was abandoned through a skip item.
    LevelSkipped,
}

/// Cardinal directions available to the player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing row indices.
    #[default]
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
}

impl Direction {
    /// All directions in a stable order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit offset applied to a coordinate when stepping in this direction.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }

    /// Upper-case label used in status panels.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Up => "UP",
            Self::Down => "DOWN",
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Location of a single maze cell.
///
/// Coordinates are plain values: there is no bounds checking here, callers
/// that index a maze check ranges themselves. Because the type is `Copy`, a
/// coordinate stored as a map key can never be changed behind the map's back.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Coordinate {
    x: i32,
    y: i32,
}

impl Coordinate {
    /// Creates a new coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Column of the coordinate.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Row of the coordinate.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Moves the coordinate in place by `distance` cells.
    pub fn step(&mut self, direction: Direction, distance: i32) {
        let (dx, dy) = direction.delta();
        self.x += dx * distance;
        self.y += dy * distance;
    }

    /// Returns a copy moved by `distance` cells.
    #[must_use]
    pub fn stepped(self, direction: Direction, distance: i32) -> Self {
        let mut next = self;
        next.step(direction, distance);
        next
    }

    /// The four orthogonal neighbours in [`Direction::ALL`] order.
    #[must_use]
    pub fn neighbors(self) -> [Coordinate; 4] {
        Direction::ALL.map(|direction| self.stepped(direction, 1))
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Reasons a maze or board size is refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum DimensionError {
    /// One of the sides is odd.
    #[error("dimensions {width}x{height} must both be even")]
    Odd {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
    /// One of the sides is below the supported minimum.
    #[error("dimensions {width}x{height} must both be at least {minimum}")]
    TooSmall {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
        /// Smallest accepted side length.
        minimum: u32,
    },
    /// One of the sides exceeds the supported maximum.
    #[error("dimensions {width}x{height} must both be at most {maximum}")]
    TooLarge {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
        /// Largest accepted side length.
        maximum: u32,
    },
}

fn validate(width: u32, height: u32, minimum: u32, maximum: u32) -> Result<(), DimensionError> {
    if width < minimum || height < minimum {
        return Err(DimensionError::TooSmall {
            width,
            height,
            minimum,
        });
    }
    if width > maximum || height > maximum {
        return Err(DimensionError::TooLarge {
            width,
            height,
            maximum,
        });
    }
    if width % 2 != 0 || height % 2 != 0 {
        return Err(DimensionError::Odd { width, height });
    }
    Ok(())
}

/// Interior size of a generated maze, excluding the decorative border.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawDimensions", into = "RawDimensions")]
pub struct MazeDimensions {
    width: u32,
    height: u32,
}

impl MazeDimensions {
    /// Smallest accepted side length of a maze interior.
    pub const MIN_SIDE: u32 = 6;
    /// Largest accepted side length of a maze interior.
    pub const MAX_SIDE: u32 = 1024;

    /// Validates and wraps maze dimensions.
    pub fn new(width: u32, height: u32) -> Result<Self, DimensionError> {
        validate(width, height, Self::MIN_SIDE, Self::MAX_SIDE)?;
        Ok(Self { width, height })
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Total number of cells.
    #[must_use]
    pub const fn area(&self) -> u32 {
        self.width * self.height
    }

    /// Returns dimensions two cells larger along both axes.
    ///
    /// Sides already at [`Self::MAX_SIDE`] stay where they are.
    #[must_use]
    pub const fn grown(self) -> Self {
        Self {
            width: grow_side(self.width),
            height: grow_side(self.height),
        }
    }
}

const fn grow_side(side: u32) -> u32 {
    if side + 2 > MazeDimensions::MAX_SIDE {
        side
    } else {
        side + 2
    }
}

impl fmt::Display for MazeDimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Outer size of the playing board, including one border cell on each side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GameDimensions {
    width: u32,
    height: u32,
}

impl GameDimensions {
    /// Smallest accepted side length of a bordered board.
    pub const MIN_SIDE: u32 = MazeDimensions::MIN_SIDE + 2;
    /// Largest accepted side length of a bordered board.
    pub const MAX_SIDE: u32 = MazeDimensions::MAX_SIDE + 2;

    /// Validates and wraps board dimensions.
    pub fn new(width: u32, height: u32) -> Result<Self, DimensionError> {
        validate(width, height, Self::MIN_SIDE, Self::MAX_SIDE)?;
        Ok(Self { width, height })
    }

    /// Board width including the border.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Board height including the border.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Interior maze dimensions once the border is reserved.
    #[must_use]
    pub const fn maze(&self) -> MazeDimensions {
        MazeDimensions {
            width: self.width - 2,
            height: self.height - 2,
        }
    }
}

impl From<MazeDimensions> for GameDimensions {
    fn from(maze: MazeDimensions) -> Self {
        Self {
            width: maze.width + 2,
            height: maze.height + 2,
        }
    }
}

#[derive(Serialize, Deserialize)]
struct RawDimensions {
    width: u32,
    height: u32,
}

impl TryFrom<RawDimensions> for MazeDimensions {
    type Error = DimensionError;

    fn try_from(raw: RawDimensions) -> Result<Self, Self::Error> {
        Self::new(raw.width, raw.height)
    }
}

impl From<MazeDimensions> for RawDimensions {
    fn from(dimensions: MazeDimensions) -> Self {
        Self {
            width: dimensions.width,
            height: dimensions.height,
        }
    }
}

/// Tags identifying the item variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemKind {
    /// Coins credited straight to the purse.
    Coin,
    /// Wall breaker with a range.
    Breaker,
    /// Skips the current maze.
    Skip,
    /// Reveals the exit position.
    Hint,
}

impl ItemKind {
    /// All kinds in a stable order, used for uniform sampling.
    pub const ALL: [ItemKind; 4] = [
        ItemKind::Coin,
        ItemKind::Breaker,
        ItemKind::Skip,
        ItemKind::Hint,
    ];
}

/// Collectible placed on the maze or carried in the bag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Item {
    /// Coins worth `value`, applied on pickup.
    Coin {
        /// Number of coins credited.
        value: u32,
    },
    /// Breaks up to `range` walls ahead of the player.
    Breaker {
        /// Number of cells scanned ahead of the player.
        range: u32,
    },
    /// Abandons the current maze without reward.
    Skip,
    /// Reports the exit position.
    Hint,
}

impl Item {
    /// Tag of the variant.
    #[must_use]
    pub const fn kind(&self) -> ItemKind {
        match self {
            Self::Coin { .. } => ItemKind::Coin,
            Self::Breaker { .. } => ItemKind::Breaker,
            Self::Skip => ItemKind::Skip,
            Self::Hint => ItemKind::Hint,
        }
    }

    /// Whether the effect fires immediately on pickup instead of entering the bag.
    #[must_use]
    pub const fn auto_apply(&self) -> bool {
        matches!(self, Self::Coin { .. })
    }

    /// Name shown in the inventory listing; `None` for auto-apply items.
    #[must_use]
    pub fn display_name(&self) -> Option<String> {
        match self {
            Self::Coin { .. } => None,
            Self::Breaker { range } => Some(format!("wall breaker range {range}")),
            Self::Skip => Some("Skip this maze".to_owned()),
            Self::Hint => Some("Hint".to_owned()),
        }
    }

    /// Message reported when the item enters the bag; `None` for auto-apply items.
    #[must_use]
    pub fn report(&self) -> Option<String> {
        match self {
            Self::Coin { .. } => None,
            Self::Breaker { range } => Some(format!("You got a range {range} wall breaker")),
            Self::Skip => Some("You got a Skip".to_owned()),
            Self::Hint => Some("You got a Hint".to_owned()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        Coordinate, DimensionError, Direction, GameDimensions, Item, ItemKind, MazeDimensions,
    };
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn stepping_follows_screen_axes() {
        let origin = Coordinate::new(5, 5);
        assert_eq!(origin.stepped(Direction::Up, 1), Coordinate::new(5, 4));
        assert_eq!(origin.stepped(Direction::Down, 2), Coordinate::new(5, 7));
        assert_eq!(origin.stepped(Direction::Left, 3), Coordinate::new(2, 5));
        assert_eq!(origin.stepped(Direction::Right, 1), Coordinate::new(6, 5));
    }

    #[test]
    fn step_mutates_in_place_and_allows_negative_cells() {
        let mut cell = Coordinate::new(0, 0);
        cell.step(Direction::Left, 1);
        assert_eq!(cell, Coordinate::new(-1, 0));
    }

    #[test]
    fn neighbors_are_orthogonal() {
        let neighbors = Coordinate::new(1, 1).neighbors();
        assert_eq!(
            neighbors,
            [
                Coordinate::new(1, 0),
                Coordinate::new(1, 2),
                Coordinate::new(0, 1),
                Coordinate::new(2, 1),
            ]
        );
    }

    #[test]
    fn coordinate_displays_as_pair() {
        assert_eq!(Coordinate::new(12, 3).to_string(), "(12, 3)");
    }

    #[test]
    fn player_faces_down_by_default() {
        assert_eq!(Direction::default(), Direction::Down);
        assert_eq!(Direction::Down.to_string(), "DOWN");
    }

    #[test]
    fn maze_dimensions_reject_odd_and_small_sides() {
        assert_eq!(
            MazeDimensions::new(7, 8),
            Err(DimensionError::Odd {
                width: 7,
                height: 8
            })
        );
        assert!(matches!(
            MazeDimensions::new(4, 8),
            Err(DimensionError::TooSmall { minimum: 6, .. })
        ));
        assert!(MazeDimensions::new(6, 6).is_ok());
    }

    #[test]
    fn oversized_sides_are_rejected() {
        assert_eq!(
            MazeDimensions::new(65_536, 65_536),
            Err(DimensionError::TooLarge {
                width: 65_536,
                height: 65_536,
                maximum: 1024
            })
        );
        assert!(GameDimensions::new(1026, 1026).is_ok());
        assert!(matches!(
            GameDimensions::new(8, 1028),
            Err(DimensionError::TooLarge { maximum: 1026, .. })
        ));
        let widest = MazeDimensions::new(1024, 1024).expect("valid");
        assert_eq!(widest.area(), 1_048_576);
    }

    #[test]
    fn growth_stops_at_the_largest_side() {
        let grown = MazeDimensions::new(1024, 1022).expect("valid").grown();
        assert_eq!((grown.width(), grown.height()), (1024, 1024));
    }

    #[test]
    fn game_dimensions_reserve_a_border() {
        let board = GameDimensions::new(20, 20).expect("valid board");
        assert_eq!(board.maze(), MazeDimensions::new(18, 18).expect("valid maze"));
        assert!(GameDimensions::new(6, 6).is_err());
        assert_eq!(GameDimensions::from(board.maze()), board);
    }

    #[test]
    fn grown_dimensions_add_two_cells() {
        let grown = MazeDimensions::new(6, 8).expect("valid").grown();
        assert_eq!((grown.width(), grown.height()), (8, 10));
    }

    #[test]
    fn only_coins_auto_apply() {
        assert!(Item::Coin { value: 4 }.auto_apply());
        assert!(!Item::Breaker { range: 2 }.auto_apply());
        assert!(!Item::Skip.auto_apply());
        assert!(!Item::Hint.auto_apply());
    }

    #[test]
    fn auto_apply_items_have_no_labels() {
        let coin = Item::Coin { value: 20 };
        assert_eq!(coin.display_name(), None);
        assert_eq!(coin.report(), None);
    }

    #[test]
    fn breaker_labels_include_range() {
        let breaker = Item::Breaker { range: 3 };
        assert_eq!(breaker.display_name().as_deref(), Some("wall breaker range 3"));
        assert_eq!(
            breaker.report().as_deref(),
            Some("You got a range 3 wall breaker")
        );
        assert_eq!(breaker.kind(), ItemKind::Breaker);
    }

    #[test]
    fn skip_and_hint_labels() {
        assert_eq!(Item::Skip.display_name().as_deref(), Some("Skip this maze"));
        assert_eq!(Item::Skip.report().as_deref(), Some("You got a Skip"));
        assert_eq!(Item::Hint.display_name().as_deref(), Some("Hint"));
        assert_eq!(Item::Hint.report().as_deref(), Some("You got a Hint"));
    }

    #[test]
    fn coordinate_round_trips_through_bincode() {
        assert_round_trip(&Coordinate::new(-3, 17));
    }

    #[test]
    fn direction_round_trips_through_bincode() {
        assert_round_trip(&Direction::Left);
    }

    #[test]
    fn item_kind_round_trips_through_bincode() {
        assert_round_trip(&ItemKind::Hint);
    }

    #[test]
    fn maze_dimensions_round_trip_through_bincode() {
        assert_round_trip(&MazeDimensions::new(18, 10).expect("valid"));
    }

    #[test]
    fn invalid_dimensions_are_rejected_when_deserialising() {
        let bytes = bincode::serialize(&(7_u32, 8_u32)).expect("serialize");
        let restored: Result<MazeDimensions, _> = bincode::deserialize(&bytes);
        assert!(restored.is_err());
    }
}
