use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{player::Player, rules::Rules};

/// Represents items that can lie in a maze or be held by the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Item {
    Coin,
    Potion,
    Apple,
    Honey,
    Water,
    Candy,
}

impl Item {
    /// Items that go into the inventory and can be used later.
    pub const CONSUMABLES: [Item; 5] = [
        Item::Potion,
        Item::Apple,
        Item::Honey,
        Item::Water,
        Item::Candy,
    ];

    pub fn from_symbol(symbol: char) -> Option<Item> {
        match symbol {
            'C' => Some(Item::Coin),
            'M' => Some(Item::Potion),
            'A' => Some(Item::Apple),
            'H' => Some(Item::Honey),
            'W' => Some(Item::Water),
            '$' => Some(Item::Candy),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Item::Coin => 'C',
            Item::Potion => 'M',
            Item::Apple => 'A',
            Item::Honey => 'H',
            Item::Water => 'W',
            Item::Candy => '$',
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Item::Coin => "Coin",
            Item::Potion => "Potion",
            Item::Apple => "Apple",
            Item::Honey => "Honey",
            Item::Water => "Water",
            Item::Candy => "Candy",
        }
    }

    /// Coins are spent on pickup; everything else is carried until used.
    pub fn is_consumable(self) -> bool {
        !matches!(self, Item::Coin)
    }

    /// Applies this item's effect to `player`.
    pub fn apply(self, player: &mut Player, rules: &Rules) {
        match self {
            Item::Coin => player.add_coins(1),
            Item::Potion => player.heal(rules.potion_amount),
            Item::Apple => player.feed(rules.apple_amount),
            Item::Honey => player.feed(rules.honey_amount),
            Item::Water => player.quench(rules.water_amount),
            Item::Candy => {
                player.set_hunger(0);
                player.damage(rules.candy_damage);
            }
        }
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Position;

    fn player() -> Player {
        Player::new(Position::new(1, 1), &Rules::default())
    }

    #[test]
    fn candy_zeroes_hunger_and_costs_two_health() {
        let rules = Rules::default();
        let mut p = player();
        p.starve(7);
        Item::Candy.apply(&mut p, &rules);
        assert_eq!(p.stats(), (98, 0, 0));
    }

    #[test]
    fn candy_health_cost_clamps_at_zero() {
        let rules = Rules::default();
        let mut p = player();
        p.damage(99);
        Item::Candy.apply(&mut p, &rules);
        assert_eq!(p.health(), 0);
        assert_eq!(p.hunger(), 0);
    }

    #[test]
    fn potion_heals_up_to_max() {
        let rules = Rules::default();
        let mut p = player();
        p.damage(10);
        Item::Potion.apply(&mut p, &rules);
        assert_eq!(p.health(), rules.max_health);
    }

    #[test]
    fn food_and_water_reduce_need() {
        let rules = Rules::default();
        let mut p = player();
        p.starve(6);
        p.dehydrate(6);
        Item::Apple.apply(&mut p, &rules);
        assert_eq!(p.hunger(), 5);
        Item::Honey.apply(&mut p, &rules);
        assert_eq!(p.hunger(), 0);
        Item::Water.apply(&mut p, &rules);
        assert_eq!(p.thirst(), 1);
    }

    #[test]
    fn coin_adds_one_to_purse() {
        let rules = Rules::default();
        let mut p = player();
        Item::Coin.apply(&mut p, &rules);
        assert_eq!(p.coins(), 1);
        assert!(p.inventory().is_empty());
    }

    #[test]
    fn symbols_are_unique() {
        for item in Item::CONSUMABLES.iter().copied().chain([Item::Coin]) {
            assert_eq!(Item::from_symbol(item.symbol()), Some(item));
        }
    }
}
