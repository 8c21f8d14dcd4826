use std::collections::BTreeMap;

use crate::{Item, Position, Tile, map::Grid};

/// One maze with its item placement, start cell and exit door.
///
/// The model keeps an untouched copy of every level and clones it when the
/// player enters, so items picked up on one visit do not leak into the next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Level {
    maze: Grid<Tile>,
    items: BTreeMap<Position, Item>,
    start: Position,
    door: Position,
    door_unlocked: bool,
}

impl Level {
    /// Builds a level. The door starts unlocked if there are no coins to collect.
    pub(crate) fn new(
        maze: Grid<Tile>,
        items: BTreeMap<Position, Item>,
        start: Position,
        door: Position,
    ) -> Self {
        let mut level = Level {
            maze,
            items,
            start,
            door,
            door_unlocked: false,
        };
        level.door_unlocked = level.coins_remaining() == 0;
        level
    }

    pub fn maze(&self) -> &Grid<Tile> {
        &self.maze
    }

    /// Returns `(rows, cols)`.
    pub fn dimensions(&self) -> (usize, usize) {
        self.maze.dimensions()
    }

    pub fn items(&self) -> &BTreeMap<Position, Item> {
        &self.items
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn door(&self) -> Position {
        self.door
    }

    pub fn is_door_unlocked(&self) -> bool {
        self.door_unlocked
    }

    pub fn tile_at(&self, position: Position) -> Option<Tile> {
        self.maze.get(position).copied()
    }

    pub fn item_at(&self, position: Position) -> Option<Item> {
        self.items.get(&position).copied()
    }

    /// Whether the player may stand on `position`. Out-of-bounds cells are never enterable.
    pub fn is_enterable(&self, position: Position) -> bool {
        self.tile_at(position)
            .is_some_and(|tile| !tile.is_blocking(self.door_unlocked))
    }

    /// Removes and returns the item at `position`, if any.
    pub fn take_item(&mut self, position: Position) -> Option<Item> {
        self.items.remove(&position)
    }

    pub fn coins_remaining(&self) -> usize {
        self.items
            .values()
            .filter(|item| matches!(item, Item::Coin))
            .count()
    }

    /// Unlocks the door once every coin has been collected.
    ///
    /// Returns `true` only on the call that actually unlocks it.
    pub fn try_unlock_door(&mut self) -> bool {
        if self.door_unlocked || self.coins_remaining() > 0 {
            return false;
        }
        self.door_unlocked = true;
        true
    }

    pub fn is_exit(&self, position: Position) -> bool {
        self.door_unlocked && position == self.door
    }

    /// Replaces the item placement, keeping door state consistent with the coins left.
    pub(crate) fn with_items(mut self, items: BTreeMap<Position, Item>) -> Self {
        self.items = items;
        self.door_unlocked = self.coins_remaining() == 0;
        self
    }
}

#[cfg(test)]
mod tests {
    use crate::loader::parse_levels;

    use super::*;

    fn level(text: &str) -> Level {
        parse_levels(text).unwrap().remove(0)
    }

    #[test]
    fn door_locked_until_last_coin_taken() {
        let mut level = level("Maze 1 - 3 5\n#####\n#PCCD\n#####\n");
        let door = level.door();
        assert!(!level.is_door_unlocked());
        assert!(!level.is_enterable(door));

        assert_eq!(level.take_item(Position::new(1, 2)), Some(Item::Coin));
        assert!(!level.try_unlock_door());
        assert_eq!(level.take_item(Position::new(1, 3)), Some(Item::Coin));
        assert!(level.try_unlock_door());
        assert!(!level.try_unlock_door());
        assert!(level.is_enterable(door));
        assert!(level.is_exit(door));
    }

    #[test]
    fn level_without_coins_starts_unlocked() {
        let level = level("Maze 1 - 3 4\n####\n#PAD\n####\n");
        assert!(level.is_door_unlocked());
        assert_eq!(level.item_at(Position::new(1, 2)), Some(Item::Apple));
    }

    #[test]
    fn walls_and_outside_are_not_enterable() {
        let level = level("Maze 1 - 3 4\n####\n#P D\n####\n");
        assert!(!level.is_enterable(Position::new(0, 0)));
        assert!(!level.is_enterable(Position::new(9, 9)));
        assert!(level.is_enterable(Position::new(1, 2)));
    }
}
