use serde::{Deserialize, Serialize};

use crate::rules::Rules;

/// The static type of a maze cell. Tiles never change after a level is loaded;
/// whether a door can be passed is tracked by the level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Tile {
    #[default]
    Empty,
    Wall,
    Lava,
    Door,
}

impl Tile {
    /// Parses a maze symbol. Returns `None` for anything that is not a tile.
    pub fn from_symbol(symbol: char) -> Option<Tile> {
        match symbol {
            ' ' => Some(Tile::Empty),
            '#' => Some(Tile::Wall),
            'L' => Some(Tile::Lava),
            'D' => Some(Tile::Door),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Tile::Empty => ' ',
            Tile::Wall => '#',
            Tile::Lava => 'L',
            Tile::Door => 'D',
        }
    }

    /// Damage dealt to the player when stepping onto this tile.
    pub fn damage(self, rules: &Rules) -> u32 {
        match self {
            Tile::Lava => rules.lava_damage,
            _ => 0,
        }
    }

    /// Whether the tile blocks movement, given the level's door state.
    pub fn is_blocking(self, door_unlocked: bool) -> bool {
        match self {
            Tile::Wall => true,
            Tile::Door => !door_unlocked,
            Tile::Empty | Tile::Lava => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn door_blocks_only_while_locked() {
        assert!(Tile::Door.is_blocking(false));
        assert!(!Tile::Door.is_blocking(true));
        assert!(Tile::Wall.is_blocking(true));
        assert!(!Tile::Lava.is_blocking(false));
    }

    #[test]
    fn only_lava_hurts() {
        let rules = Rules::default();
        assert_eq!(Tile::Lava.damage(&rules), rules.lava_damage);
        assert_eq!(Tile::Empty.damage(&rules), 0);
        assert_eq!(Tile::Door.damage(&rules), 0);
    }

    #[test]
    fn symbols_round_trip() {
        for tile in [Tile::Empty, Tile::Wall, Tile::Lava, Tile::Door] {
            assert_eq!(Tile::from_symbol(tile.symbol()), Some(tile));
        }
        assert_eq!(Tile::from_symbol('C'), None);
    }
}
