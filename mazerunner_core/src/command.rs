//! Explicit command dispatch.
//!
//! Front ends translate their input into [`Command`]s and hand them to
//! [`Model::dispatch`]; the returned [`Outcome`] says what happened so the
//! front end can redraw and report.

use crate::{
    Direction, Item,
    model::{Model, ModelError, MoveOutcome},
    shop::{Shop, ShopError},
};

/// Represents actions a front end can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    UseItem(Item),
    Buy(Item),
    Restart,
}

/// Represents the result of dispatching a [`Command`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Moved(MoveOutcome),
    Used(Item),
    Bought(Item),
    Restarted,
    UseFailed(ModelError),
    BuyFailed(ShopError),
}

impl Outcome {
    /// A one-line, player-facing description, or `None` for routine moves.
    pub fn message(&self) -> Option<String> {
        match self {
            Outcome::Moved(MoveOutcome::Moved { pickup: Some(item) }) => {
                Some(format!("Picked up {item}."))
            }
            Outcome::Moved(MoveOutcome::LevelUp { level }) => {
                Some(format!("Welcome to level {}.", level + 1))
            }
            Outcome::Moved(MoveOutcome::Won) => Some("You won! Press 'r' to play again.".into()),
            Outcome::Moved(MoveOutcome::Lost) | Outcome::Moved(MoveOutcome::GameOver) => {
                Some("Game over. Press 'r' to restart.".into())
            }
            Outcome::Moved(_) => None,
            Outcome::Used(item) => Some(format!("Used {item}.")),
            Outcome::Bought(item) => Some(format!("Bought {item}.")),
            Outcome::Restarted => Some("Game restarted.".into()),
            Outcome::UseFailed(err) => Some(err.to_string()),
            Outcome::BuyFailed(err) => Some(err.to_string()),
        }
    }
}

impl Model {
    /// Applies `command` to the model, buying from `shop` where needed.
    pub fn dispatch(&mut self, shop: &Shop, command: Command) -> Outcome {
        log::trace!("Dispatching {command:?}");
        match command {
            Command::Move(direction) => Outcome::Moved(self.move_player(direction.delta())),
            Command::UseItem(item) => match self.use_item(item) {
                Ok(()) => Outcome::Used(item),
                Err(err) => Outcome::UseFailed(err),
            },
            Command::Buy(item) => match shop.buy(self, item) {
                Ok(()) => Outcome::Bought(item),
                Err(err) => Outcome::BuyFailed(err),
            },
            Command::Restart => {
                self.restart();
                Outcome::Restarted
            }
        }
    }
}
