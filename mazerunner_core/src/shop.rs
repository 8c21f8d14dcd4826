use std::collections::BTreeMap;

use crate::{Item, model::Model};

/// Represents reasons a purchase can be refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShopError {
    #[error("{0} is not for sale.")]
    NotForSale(Item),
    #[error("Not enough coins: {item} costs {price}, you have {held}.")]
    InsufficientCoins { item: Item, price: u32, held: u32 },
    #[error("The game is over.")]
    GameOver,
}

/// A price list of consumables that can be bought with coins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shop {
    prices: BTreeMap<Item, u32>,
}

impl Default for Shop {
    fn default() -> Self {
        Shop::new([
            (Item::Honey, 2),
            (Item::Apple, 1),
            (Item::Water, 1),
            (Item::Potion, 2),
            (Item::Candy, 3),
        ])
    }
}

impl Shop {
    /// Builds a shop from `(item, price)` pairs. Coins are never stocked.
    pub fn new(prices: impl IntoIterator<Item = (Item, u32)>) -> Self {
        Shop {
            prices: prices
                .into_iter()
                .filter(|(item, _)| item.is_consumable())
                .collect(),
        }
    }

    pub fn price(&self, item: Item) -> Option<u32> {
        self.prices.get(&item).copied()
    }

    /// Iterates `(item, price)` pairs in a stable order.
    pub fn catalog(&self) -> impl Iterator<Item = (Item, u32)> + '_ {
        self.prices.iter().map(|(item, price)| (*item, *price))
    }

    /// Spends the player's coins on `item` and puts it in their inventory.
    ///
    /// On error nothing changes.
    pub fn buy(&self, model: &mut Model, item: Item) -> Result<(), ShopError> {
        if model.is_over() {
            return Err(ShopError::GameOver);
        }
        let price = self.price(item).ok_or(ShopError::NotForSale(item))?;
        let player = model.player_mut();
        if !player.spend_coins(price) {
            return Err(ShopError::InsufficientCoins {
                item,
                price,
                held: player.coins(),
            });
        }
        player.inventory_mut().add(item);
        log::debug!("Bought {item} for {price} coin(s)");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Rules;

    fn model_with_coins(coins: u32) -> Model {
        let mut model = Model::from_game_str("Maze 1 - 1 2\nPD\n", Rules::default()).unwrap();
        model.player_mut().add_coins(coins);
        model
    }

    #[test]
    fn buying_spends_coins() {
        let shop = Shop::default();
        let mut model = model_with_coins(3);
        shop.buy(&mut model, Item::Honey).unwrap();
        assert_eq!(model.player().coins(), 1);
        assert_eq!(model.inventory().count(Item::Honey), 1);
    }

    #[test]
    fn insufficient_coins_changes_nothing() {
        let shop = Shop::default();
        let mut model = model_with_coins(2);
        assert_eq!(
            shop.buy(&mut model, Item::Candy),
            Err(ShopError::InsufficientCoins {
                item: Item::Candy,
                price: 3,
                held: 2
            })
        );
        assert_eq!(model.player().coins(), 2);
        assert!(model.inventory().is_empty());
    }

    #[test]
    fn coins_are_not_for_sale() {
        let shop = Shop::new([(Item::Coin, 1), (Item::Apple, 1)]);
        assert_eq!(shop.price(Item::Coin), None);
        let mut model = model_with_coins(5);
        assert_eq!(
            shop.buy(&mut model, Item::Coin),
            Err(ShopError::NotForSale(Item::Coin))
        );
    }

    #[test]
    fn default_catalog_prices() {
        let shop = Shop::default();
        let catalog: Vec<_> = shop.catalog().collect();
        assert_eq!(catalog.len(), 5);
        assert_eq!(shop.price(Item::Apple), Some(1));
        assert_eq!(shop.price(Item::Candy), Some(3));
    }
}
