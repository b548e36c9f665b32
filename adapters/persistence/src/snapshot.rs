use std::collections::BTreeMap;

use maze_runner_core::{Coordinate, Direction, Item, MazeDimensions};
use maze_runner_world::{query, Game, GameParts, Inventory, Maze, Player, Tile};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{PersistenceError, Result};

/// Layout version written into every snapshot.
pub const SNAPSHOT_VERSION: u32 = 1;

const WALL_GLYPH: char = '#';
const ROAD_GLYPH: char = '.';

/// Serializable capture of a game in progress.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    /// Snapshot layout version.
    pub version: u32,
    /// Dimensions of the current maze; upcoming levels reuse them.
    pub dimensions: MazeDimensions,
    /// Maximum number of items the bag holds.
    pub bag_capacity: usize,
    /// The current maze.
    pub maze: MazeSnapshot,
    /// The player and their bag.
    pub player: PlayerSnapshot,
    /// Items still lying in the maze.
    pub items: Vec<PlacedItem>,
    /// Last status message.
    pub message: String,
}

/// Maze grid stored as text rows of `#` walls and `.` roads.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MazeSnapshot {
    /// Start cell.
    pub start: Coordinate,
    /// Exit cell.
    pub exit: Coordinate,
    /// Carved roads in carve order, start excluded.
    pub roads: Vec<Coordinate>,
    /// One string per row, top to bottom.
    pub rows: Vec<String>,
}

/// Player state including the bag contents.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSnapshot {
    /// Cell the player stands on.
    pub position: Coordinate,
    /// Direction the player faces.
    pub direction: Direction,
    /// Mazes solved so far.
    pub solved: u32,
    /// Coins collected so far.
    pub coins: u32,
    /// Stored items in slot order.
    pub items: Vec<Item>,
}

/// An item lying on a maze cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedItem {
    /// Cell holding the item.
    pub position: Coordinate,
    /// The item itself.
    pub item: Item,
}

impl GameSnapshot {
    /// Captures the current state of the game.
    #[must_use]
    pub fn capture(game: &Game) -> Self {
        let maze = query::maze(game);
        let player = query::player(game);
        let inventory = player.inventory();

        Self {
            version: SNAPSHOT_VERSION,
            dimensions: maze.dimensions(),
            bag_capacity: inventory.capacity(),
            maze: MazeSnapshot {
                start: maze.start(),
                exit: maze.exit(),
                roads: maze.roads().to_vec(),
                rows: encode_rows(maze),
            },
            player: PlayerSnapshot {
                position: player.position(),
                direction: player.direction(),
                solved: player.solved(),
                coins: inventory.coins(),
                items: inventory.items().to_vec(),
            },
            items: query::items(game)
                .map(|(position, item)| PlacedItem { position, item })
                .collect(),
            message: query::message(game).to_owned(),
        }
    }

    /// Rebuilds a game after validating the snapshot.
    ///
    /// `seed` drives the random source for mazes generated after the restore.
    pub fn into_game(self, seed: u64) -> Result<Game> {
        if self.version != SNAPSHOT_VERSION {
            return Err(PersistenceError::UnsupportedVersion {
                found: self.version,
                expected: SNAPSHOT_VERSION,
            });
        }

        let tiles = decode_rows(self.dimensions, &self.maze.rows)?;
        let maze = Maze::from_parts(
            self.dimensions,
            tiles,
            self.maze.start,
            self.maze.exit,
            self.maze.roads,
        )?;

        let inventory =
            Inventory::restore(self.bag_capacity, self.player.coins, self.player.items)?;
        let player = Player::restore(
            self.player.position,
            self.player.direction,
            self.player.solved,
            inventory,
        );

        let mut items = BTreeMap::new();
        for placed in self.items {
            if items.insert(placed.position, placed.item).is_some() {
                return Err(PersistenceError::DuplicateItem(placed.position));
            }
        }

        Game::restore(
            GameParts {
                maze,
                player,
                items,
                message: self.message,
            },
            seed,
        )
        .map_err(|error| {
            warn!(%error, "rejected snapshot");
            error.into()
        })
    }

    /// Serializes the snapshot as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses a snapshot from JSON without validating the game state.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

fn encode_rows(maze: &Maze) -> Vec<String> {
    let width = maze.width() as usize;
    maze.tiles()
        .chunks(width.max(1))
        .map(|row| {
            row.iter()
                .map(|tile| match tile {
                    Tile::Wall => WALL_GLYPH,
                    Tile::Road => ROAD_GLYPH,
                })
                .collect()
        })
        .collect()
}

fn decode_rows(dimensions: MazeDimensions, rows: &[String]) -> Result<Vec<Tile>> {
    let width = dimensions.width() as usize;
    let mut tiles = Vec::with_capacity(width * rows.len());
    for (index, row) in rows.iter().enumerate() {
        if row.chars().count() != width {
            return Err(PersistenceError::MalformedRow { row: index });
        }
        for glyph in row.chars() {
            tiles.push(match glyph {
                WALL_GLYPH => Tile::Wall,
                ROAD_GLYPH => Tile::Road,
                _ => return Err(PersistenceError::MalformedRow { row: index }),
            });
        }
    }
    Ok(tiles)
}
