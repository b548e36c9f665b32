//! Item generation and effect dispatch.

use std::ops::RangeInclusive;

use maze_runner_core::{Event, Item, ItemKind};
use rand::Rng;
use tracing::debug;

use crate::Game;

/// Coin values rolled for freshly placed coins.
pub(crate) const COIN_VALUES: RangeInclusive<u32> = 1..=20;
/// Breaker ranges rolled for freshly placed breakers.
pub(crate) const BREAKER_RANGES: RangeInclusive<u32> = 1..=10;

const SKIPPED_MESSAGE: &str = "Maze skipped!";

/// Rolls a uniformly chosen item kind with a random payload.
pub(crate) fn random_item<R: Rng + ?Sized>(rng: &mut R) -> Item {
    match ItemKind::ALL[rng.gen_range(0..ItemKind::ALL.len())] {
        ItemKind::Coin => Item::Coin {
            value: rng.gen_range(COIN_VALUES),
        },
        ItemKind::Breaker => Item::Breaker {
            range: rng.gen_range(BREAKER_RANGES),
        },
        ItemKind::Skip => Item::Skip,
        ItemKind::Hint => Item::Hint,
    }
}

/// Applies the item's effect to the game. Every effect rewrites the message.
pub(crate) fn apply_item(game: &mut Game, item: Item, out_events: &mut Vec<Event>) {
    match item {
        Item::Coin { value } => {
            game.player.inventory_mut().add_coins(value);
            game.message = format!("You got {value} coins");
        }
        Item::Breaker { range } => {
            let direction = game.player.direction();
            let mut cell = game.player.position();
            let mut destroyed = Vec::new();
            for _ in 0..range {
                cell.step(direction, 1);
                if game.maze.break_wall(cell) {
                    destroyed.push(cell);
                }
            }

            debug!(range, %direction, destroyed = destroyed.len(), "breaker fired");
            game.message = format!("{} walls are destroyed", destroyed.len());
            if !destroyed.is_empty() {
                out_events.push(Event::WallsDestroyed { cells: destroyed });
            }
        }
        Item::Skip => {
            game.next_level(true, false, out_events);
            game.message = SKIPPED_MESSAGE.to_owned();
        }
        Item::Hint => {
            game.message = format!("Exit Position: {}", game.maze.exit());
        }
    }
}
