use serde::{Deserialize, Serialize};

use crate::{Item, Position, inventory::Inventory, rules::Rules};

/// The player's position, survival stats, purse and inventory.
///
/// Health, hunger and thirst are always kept within `[0, max]`; the maxima
/// are fixed when the player is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    position: Position,
    health: u32,
    hunger: u32,
    thirst: u32,
    coins: u32,
    inventory: Inventory,
    max_health: u32,
    max_hunger: u32,
    max_thirst: u32,
}

impl Player {
    /// Creates a player at full health with no hunger or thirst.
    pub fn new(position: Position, rules: &Rules) -> Self {
        Player {
            position,
            health: rules.max_health,
            hunger: 0,
            thirst: 0,
            coins: 0,
            inventory: Inventory::new(),
            max_health: rules.max_health,
            max_hunger: rules.max_hunger,
            max_thirst: rules.max_thirst,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub(crate) fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    pub fn health(&self) -> u32 {
        self.health
    }

    pub fn hunger(&self) -> u32 {
        self.hunger
    }

    pub fn thirst(&self) -> u32 {
        self.thirst
    }

    /// Returns `(health, hunger, thirst)`.
    pub fn stats(&self) -> (u32, u32, u32) {
        (self.health, self.hunger, self.thirst)
    }

    pub fn coins(&self) -> u32 {
        self.coins
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn inventory_mut(&mut self) -> &mut Inventory {
        &mut self.inventory
    }

    pub fn heal(&mut self, amount: u32) {
        self.health = self.health.saturating_add(amount).min(self.max_health);
    }

    pub fn damage(&mut self, amount: u32) {
        self.health = self.health.saturating_sub(amount);
    }

    /// Reduces hunger.
    pub fn feed(&mut self, amount: u32) {
        self.hunger = self.hunger.saturating_sub(amount);
    }

    /// Increases hunger.
    pub fn starve(&mut self, amount: u32) {
        self.hunger = self.hunger.saturating_add(amount).min(self.max_hunger);
    }

    pub fn set_hunger(&mut self, hunger: u32) {
        self.hunger = hunger.min(self.max_hunger);
    }

    /// Reduces thirst.
    pub fn quench(&mut self, amount: u32) {
        self.thirst = self.thirst.saturating_sub(amount);
    }

    /// Increases thirst.
    pub fn dehydrate(&mut self, amount: u32) {
        self.thirst = self.thirst.saturating_add(amount).min(self.max_thirst);
    }

    pub fn add_coins(&mut self, amount: u32) {
        self.coins = self.coins.saturating_add(amount);
    }

    /// Spends `amount` coins. Returns `false` and leaves the purse untouched
    /// if the player cannot afford it.
    pub fn spend_coins(&mut self, amount: u32) -> bool {
        match self.coins.checked_sub(amount) {
            Some(left) => {
                self.coins = left;
                true
            }
            None => false,
        }
    }

    /// Takes an item found in the maze: coins go to the purse, everything
    /// else into the inventory.
    pub fn pick_up(&mut self, item: Item, rules: &Rules) {
        if item.is_consumable() {
            self.inventory.add(item);
        } else {
            item.apply(self, rules);
        }
    }

    pub fn is_dead(&self) -> bool {
        self.health == 0
    }

    /// Dead, or hunger or thirst at their maximum.
    pub fn is_exhausted(&self) -> bool {
        self.is_dead() || self.hunger >= self.max_hunger || self.thirst >= self.max_thirst
    }

    pub(crate) fn restore_stats(&mut self, health: u32, hunger: u32, thirst: u32, coins: u32) {
        self.health = health.min(self.max_health);
        self.hunger = hunger.min(self.max_hunger);
        self.thirst = thirst.min(self.max_thirst);
        self.coins = coins;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> Player {
        Player::new(Position::new(0, 0), &Rules::default())
    }

    #[test]
    fn stats_stay_within_bounds() {
        let mut p = player();
        p.heal(50);
        assert_eq!(p.health(), 100);
        p.damage(500);
        assert_eq!(p.health(), 0);
        assert!(p.is_dead());

        p.starve(25);
        assert_eq!(p.hunger(), 10);
        p.feed(30);
        assert_eq!(p.hunger(), 0);

        p.dehydrate(11);
        assert_eq!(p.thirst(), 10);
        p.quench(3);
        assert_eq!(p.thirst(), 7);
    }

    #[test]
    fn exhaustion_from_hunger_or_thirst() {
        let mut p = player();
        assert!(!p.is_exhausted());
        p.starve(10);
        assert!(p.is_exhausted());

        let mut p = player();
        p.dehydrate(10);
        assert!(p.is_exhausted());
    }

    #[test]
    fn spending_more_than_held_is_refused() {
        let mut p = player();
        p.add_coins(2);
        assert!(!p.spend_coins(3));
        assert_eq!(p.coins(), 2);
        assert!(p.spend_coins(2));
        assert_eq!(p.coins(), 0);
    }

    #[test]
    fn pick_up_routes_coins_to_purse() {
        let rules = Rules::default();
        let mut p = player();
        p.pick_up(Item::Coin, &rules);
        p.pick_up(Item::Honey, &rules);
        assert_eq!(p.coins(), 1);
        assert_eq!(p.inventory().count(Item::Honey), 1);
        assert!(!p.inventory().contains(Item::Coin));
    }
}
