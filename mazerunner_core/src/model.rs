use crate::{
    Item, Position,
    inventory::Inventory,
    level::Level,
    loader::{LoadError, parse_levels},
    player::Player,
    rules::Rules,
};

/// Represents errors from model operations other than movement.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    #[error("The game is over.")]
    GameOver,
    #[error("No {0} in the inventory.")]
    ItemNotHeld(Item),
}

/// Represents the outcome of a single move attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The target was a wall, a locked door or outside the maze. Nothing changed.
    Blocked,
    /// The game had already ended. Nothing changed.
    GameOver,
    /// The player moved, picking up `pickup` if there was one.
    Moved { pickup: Option<Item> },
    /// The player walked through the door into the next level.
    LevelUp { level: usize },
    Won,
    Lost,
}

/// The game state machine.
///
/// Owns a pristine copy of every level; the live `level` is a clone of the
/// current one and is the only copy that gets mutated.
#[derive(Debug, Clone)]
pub struct Model {
    rules: Rules,
    levels: Vec<Level>,
    level_num: usize,
    level: Level,
    player: Player,
    /// Successful moves this game. Saturates at `u32::MAX`.
    num_moves: u32,
    leveled_up: bool,
    won: bool,
}

impl Model {
    /// Creates a model at the start of the first level.
    ///
    /// Returns `LoadError::NoLevels` if `levels` is empty.
    pub fn new(levels: Vec<Level>, rules: Rules) -> Result<Self, LoadError> {
        let level = levels.first().cloned().ok_or(LoadError::NoLevels)?;
        let player = Player::new(level.start(), &rules);
        Ok(Model {
            rules,
            levels,
            level_num: 0,
            level,
            player,
            num_moves: 0,
            leveled_up: false,
            won: false,
        })
    }

    /// Parses a game file's contents and creates a model from it.
    pub fn from_game_str(text: &str, rules: Rules) -> Result<Self, LoadError> {
        Model::new(parse_levels(text)?, rules)
    }

    /// Rebuilds a model from saved state. The caller is responsible for
    /// validating the pieces against `levels`.
    pub(crate) fn from_parts(
        levels: Vec<Level>,
        rules: Rules,
        level_num: usize,
        level: Level,
        player: Player,
        num_moves: u32,
        won: bool,
    ) -> Self {
        Model {
            rules,
            levels,
            level_num,
            level,
            player,
            num_moves,
            leveled_up: false,
            won,
        }
    }

    /// Starts the game over from the first level with a fresh player.
    pub fn restart(&mut self) {
        self.level_num = 0;
        self.level = self.levels[0].clone();
        self.player = Player::new(self.level.start(), &self.rules);
        self.num_moves = 0;
        self.leveled_up = false;
        self.won = false;
        log::info!("Game restarted");
    }

    /// The live current level.
    pub fn level(&self) -> &Level {
        &self.level
    }

    /// Zero-based index of the current level.
    pub fn level_num(&self) -> usize {
        self.level_num
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub(crate) fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn inventory(&self) -> &Inventory {
        self.player.inventory()
    }

    /// Returns `(health, hunger, thirst)`.
    pub fn get_player_stats(&self) -> (u32, u32, u32) {
        self.player.stats()
    }

    pub fn num_moves(&self) -> u32 {
        self.num_moves
    }

    pub fn has_won(&self) -> bool {
        self.won
    }

    pub fn has_lost(&self) -> bool {
        self.player.is_exhausted()
    }

    pub fn is_over(&self) -> bool {
        self.has_won() || self.has_lost()
    }

    /// Whether the most recent move took the player into a new level.
    pub fn did_level_up(&self) -> bool {
        self.leveled_up
    }

    /// Attempts to move the player by a `(row, col)` delta.
    pub fn move_player(&mut self, delta: (isize, isize)) -> MoveOutcome {
        self.leveled_up = false;
        if self.is_over() {
            return MoveOutcome::GameOver;
        }

        let target = match self.player.position().offset(delta) {
            Some(target) if self.level.is_enterable(target) => target,
            _ => return MoveOutcome::Blocked,
        };

        self.player.set_position(target);
        self.num_moves = self.num_moves.saturating_add(1);
        self.apply_move_costs(target);

        let pickup = self.level.take_item(target);
        if let Some(item) = pickup {
            log::debug!("Picked up {item} at {target:?}");
            self.player.pick_up(item, &self.rules);
        }
        if self.level.try_unlock_door() {
            log::info!("Door unlocked on level {}", self.level_num + 1);
        }

        if self.has_lost() {
            log::info!("Game lost after {} moves", self.num_moves);
            return MoveOutcome::Lost;
        }

        if self.level.is_exit(target) {
            return self.advance_level();
        }

        MoveOutcome::Moved { pickup }
    }

    /// Uses one carried item on the player.
    pub fn use_item(&mut self, item: Item) -> Result<(), ModelError> {
        if self.is_over() {
            return Err(ModelError::GameOver);
        }
        let item = self
            .player
            .inventory_mut()
            .remove(item)
            .ok_or(ModelError::ItemNotHeld(item))?;
        item.apply(&mut self.player, &self.rules);
        log::debug!("Used {item}; stats now {:?}", self.player.stats());
        Ok(())
    }

    fn apply_move_costs(&mut self, target: Position) {
        self.player.damage(self.rules.move_cost);
        if self.rules.decay_interval > 0 && self.num_moves % self.rules.decay_interval == 0 {
            self.player.starve(1);
            self.player.dehydrate(1);
        }
        if let Some(tile) = self.level.tile_at(target) {
            self.player.damage(tile.damage(&self.rules));
        }
    }

    fn advance_level(&mut self) -> MoveOutcome {
        if self.level_num + 1 >= self.levels.len() {
            self.won = true;
            log::info!("Game won after {} moves", self.num_moves);
            return MoveOutcome::Won;
        }

        self.level_num += 1;
        self.level = self.levels[self.level_num].clone();
        self.player.set_position(self.level.start());
        self.leveled_up = true;
        log::info!("Advanced to level {}", self.level_num + 1);
        MoveOutcome::LevelUp {
            level: self.level_num,
        }
    }
}
