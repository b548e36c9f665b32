//! Player state and the bag it carries between levels.

use maze_runner_core::{Coordinate, Direction, Item, DEFAULT_BAG_CAPACITY, MAX_BAG_CAPACITY};

use crate::RestoreError;

/// Ordered bag of stored items plus an unbounded coin purse.
///
/// Only items that do not auto-apply are stored; slot order is pickup order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Inventory {
    items: Vec<Item>,
    capacity: usize,
    coins: u32,
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new(DEFAULT_BAG_CAPACITY)
    }
}

impl Inventory {
    /// Creates an empty bag holding at most `capacity` items.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            capacity,
            coins: 0,
        }
    }

    /// Rebuilds a bag from persisted contents.
    pub fn restore(capacity: usize, coins: u32, items: Vec<Item>) -> Result<Self, RestoreError> {
        if !(1..=MAX_BAG_CAPACITY).contains(&capacity) {
            return Err(RestoreError::BagCapacity {
                capacity,
                maximum: MAX_BAG_CAPACITY,
            });
        }
        if items.len() > capacity {
            return Err(RestoreError::BagOverflow {
                capacity,
                items: items.len(),
            });
        }
        if let Some(item) = items.iter().copied().find(Item::auto_apply) {
            return Err(RestoreError::AutoApplyInBag(item));
        }
        Ok(Self {
            items,
            capacity,
            coins,
        })
    }

    /// Stores the item in the next free slot.
    ///
    /// Returns the slot on success and hands the item back when the bag is full.
    pub fn add(&mut self, item: Item) -> Result<usize, Item> {
        if self.is_full() {
            return Err(item);
        }
        self.items.push(item);
        Ok(self.items.len() - 1)
    }

    /// Removes and returns the item stored in the slot, shifting later slots down.
    pub fn take(&mut self, slot: usize) -> Option<Item> {
        (slot < self.items.len()).then(|| self.items.remove(slot))
    }

    /// Stored items in slot order.
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Number of stored items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Reports whether no item is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Reports whether another item would be refused.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    /// Maximum number of stored items.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Coins collected so far.
    #[must_use]
    pub const fn coins(&self) -> u32 {
        self.coins
    }

    /// Credits coins to the purse.
    pub fn add_coins(&mut self, amount: u32) {
        self.coins = self.coins.saturating_add(amount);
    }
}

/// The maze explorer. Created once per session and kept across levels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    position: Coordinate,
    direction: Direction,
    inventory: Inventory,
    solved: u32,
}

impl Player {
    /// Creates a player at the origin, facing down, with an empty bag.
    #[must_use]
    pub fn new(bag_capacity: usize) -> Self {
        Self {
            position: Coordinate::default(),
            direction: Direction::default(),
            inventory: Inventory::new(bag_capacity),
            solved: 0,
        }
    }

    /// Rebuilds a player from persisted state.
    #[must_use]
    pub fn restore(
        position: Coordinate,
        direction: Direction,
        solved: u32,
        inventory: Inventory,
    ) -> Self {
        Self {
            position,
            direction,
            inventory,
            solved,
        }
    }

    /// Cell the player stands on.
    #[must_use]
    pub const fn position(&self) -> Coordinate {
        self.position
    }

    /// Direction the player faces.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// The player's bag.
    #[must_use]
    pub const fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Number of mazes solved, skips excluded.
    #[must_use]
    pub const fn solved(&self) -> u32 {
        self.solved
    }

    pub(crate) fn inventory_mut(&mut self) -> &mut Inventory {
        &mut self.inventory
    }

    pub(crate) fn place_at(&mut self, position: Coordinate) {
        self.position = position;
    }

    pub(crate) fn face(&mut self, direction: Direction) {
        self.direction = direction;
    }

    /// Turns toward `direction`, or advances one cell when already facing it.
    ///
    /// Returns `true` when the position changed.
    pub(crate) fn turn_or_advance(&mut self, direction: Direction) -> bool {
        if self.direction != direction {
            self.direction = direction;
            return false;
        }
        self.position.step(direction, 1);
        true
    }

    pub(crate) fn record_solve(&mut self) -> u32 {
        self.solved = self.solved.saturating_add(1);
        self.solved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bag_refuses_items_beyond_capacity() {
        let mut inventory = Inventory::new(2);
        assert_eq!(inventory.add(Item::Hint), Ok(0));
        assert_eq!(inventory.add(Item::Skip), Ok(1));
        assert_eq!(inventory.add(Item::Breaker { range: 4 }), Err(Item::Breaker { range: 4 }));
        assert_eq!(inventory.len(), 2);
        assert!(inventory.is_full());
    }

    #[test]
    fn take_shifts_later_slots() {
        let mut inventory = Inventory::default();
        for item in [Item::Hint, Item::Skip, Item::Breaker { range: 1 }] {
            let _ = inventory.add(item).expect("room in bag");
        }

        assert_eq!(inventory.take(1), Some(Item::Skip));
        assert_eq!(inventory.items(), &[Item::Hint, Item::Breaker { range: 1 }]);
        assert_eq!(inventory.take(5), None);
        assert_eq!(inventory.len(), 2);
    }

    #[test]
    fn default_bag_holds_nine_items() {
        let mut inventory = Inventory::default();
        for _ in 0..12 {
            let _ = inventory.add(Item::Hint);
        }
        assert_eq!(inventory.len(), DEFAULT_BAG_CAPACITY);
    }

    #[test]
    fn coins_accumulate_without_limit_on_slots() {
        let mut inventory = Inventory::new(0);
        inventory.add_coins(20);
        inventory.add_coins(30);
        assert_eq!(inventory.coins(), 50);
        assert!(inventory.is_empty());
    }

    #[test]
    fn restore_rejects_overfull_bag_and_coins() {
        assert_eq!(
            Inventory::restore(1, 0, vec![Item::Hint, Item::Skip]),
            Err(RestoreError::BagOverflow {
                capacity: 1,
                items: 2
            })
        );
        assert_eq!(
            Inventory::restore(3, 0, vec![Item::Coin { value: 2 }]),
            Err(RestoreError::AutoApplyInBag(Item::Coin { value: 2 }))
        );
    }

    #[test]
    fn restore_rejects_capacity_beyond_the_number_keys() {
        assert_eq!(
            Inventory::restore(20, 0, Vec::new()),
            Err(RestoreError::BagCapacity {
                capacity: 20,
                maximum: 9
            })
        );
        assert!(matches!(
            Inventory::restore(0, 0, Vec::new()),
            Err(RestoreError::BagCapacity { capacity: 0, .. })
        ));
        assert!(Inventory::restore(9, 0, Vec::new()).is_ok());
    }

    #[test]
    fn new_player_faces_down_at_origin() {
        let player = Player::new(9);
        assert_eq!(player.direction(), Direction::Down);
        assert_eq!(player.position(), Coordinate::new(0, 0));
        assert_eq!(player.solved(), 0);
    }

    #[test]
    fn turning_and_advancing_never_happen_together() {
        let mut player = Player::new(9);
        player.place_at(Coordinate::new(3, 3));

        assert!(!player.turn_or_advance(Direction::Right));
        assert_eq!(player.position(), Coordinate::new(3, 3));
        assert_eq!(player.direction(), Direction::Right);

        assert!(player.turn_or_advance(Direction::Right));
        assert_eq!(player.position(), Coordinate::new(4, 3));
    }
}
