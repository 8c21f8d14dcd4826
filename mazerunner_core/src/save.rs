//! Game save/load.
//!
//! Saves are versioned JSON records with explicit fields. Restoring a save
//! validates every field against the level it refers to, so a hand-edited or
//! truncated file is rejected instead of producing an impossible game state.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    Item, Position, Tile, inventory::Inventory, level::Level, model::Model, player::Player,
    rules::Rules,
};

/// Save file version for compatibility checking
pub const SAVE_VERSION: u32 = 1;

/// Save error types
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Save version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
    #[error("Invalid save data: {0}")]
    InvalidSaveData(String),
}

/// Complete save data structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveData {
    pub version: u32,
    /// Game file the levels were loaded from.
    pub game_file: PathBuf,
    pub level_num: usize,
    pub level_items: Vec<ItemOnGround>,
    pub door_unlocked: bool,
    pub player: PlayerSaveData,
    pub num_moves: u32,
    pub won: bool,
    /// Cosmetic play time, kept by the front end.
    pub elapsed_secs: u64,
}

/// Player-specific save data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSaveData {
    pub position: Position,
    pub health: u32,
    pub hunger: u32,
    pub thirst: u32,
    pub coins: u32,
    pub inventory: Inventory,
}

/// Item still lying in the current level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemOnGround {
    pub position: Position,
    pub item: Item,
}

impl SaveData {
    /// Captures the state of `model`.
    pub fn capture(model: &Model, game_file: &Path, elapsed_secs: u64) -> SaveData {
        let player = model.player();
        let level = model.level();
        SaveData {
            version: SAVE_VERSION,
            game_file: game_file.to_path_buf(),
            level_num: model.level_num(),
            level_items: level
                .items()
                .iter()
                .map(|(position, item)| ItemOnGround {
                    position: *position,
                    item: *item,
                })
                .collect(),
            door_unlocked: level.is_door_unlocked(),
            player: PlayerSaveData {
                position: player.position(),
                health: player.health(),
                hunger: player.hunger(),
                thirst: player.thirst(),
                coins: player.coins(),
                inventory: player.inventory().clone(),
            },
            num_moves: model.num_moves(),
            won: model.has_won(),
            elapsed_secs,
        }
    }

    /// Writes the save as pretty-printed JSON.
    pub fn save_to_path(&self, path: &Path) -> Result<(), SaveError> {
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        log::info!("Game saved to {}", path.display());
        Ok(())
    }

    /// Reads a save and checks its version. The contents are not validated
    /// against any level until [`SaveData::restore`].
    pub fn load_from_path(path: &Path) -> Result<SaveData, SaveError> {
        let data = fs::read_to_string(path)?;
        let save: SaveData = serde_json::from_str(&data)?;
        save.check_version()?;
        log::info!("Game loaded from {}", path.display());
        Ok(save)
    }

    fn check_version(&self) -> Result<(), SaveError> {
        if self.version != SAVE_VERSION {
            return Err(SaveError::VersionMismatch {
                expected: SAVE_VERSION,
                found: self.version,
            });
        }
        Ok(())
    }

    /// Rebuilds a model from this save, using `levels` parsed from
    /// [`SaveData::game_file`].
    pub fn restore(&self, levels: Vec<Level>, rules: Rules) -> Result<Model, SaveError> {
        self.check_version()?;

        let template = levels.get(self.level_num).ok_or_else(|| {
            invalid(format!(
                "level {} does not exist (game has {} level(s))",
                self.level_num + 1,
                levels.len()
            ))
        })?;
        let items = self.validated_items(template)?;
        let level = template.clone().with_items(items);
        if level.is_door_unlocked() != self.door_unlocked {
            return Err(invalid(format!(
                "door is {} but {} coin(s) remain",
                if self.door_unlocked { "unlocked" } else { "locked" },
                level.coins_remaining()
            )));
        }

        let player = self.validated_player(&level, &rules)?;

        if self.won && (self.level_num + 1 != levels.len() || player.position() != level.door()) {
            return Err(invalid("game is marked won away from the final exit".into()));
        }

        Ok(Model::from_parts(
            levels,
            rules,
            self.level_num,
            level,
            player,
            self.num_moves,
            self.won,
        ))
    }

    fn validated_items(&self, level: &Level) -> Result<BTreeMap<Position, Item>, SaveError> {
        let mut items = BTreeMap::new();
        for ItemOnGround { position, item } in &self.level_items {
            match level.tile_at(*position) {
                None => return Err(invalid(format!("{item} at {position:?} is outside the maze"))),
                Some(Tile::Wall | Tile::Door) => {
                    return Err(invalid(format!("{item} at {position:?} is inside a wall or door")));
                }
                Some(_) => {}
            }
            if *position == self.player.position {
                return Err(invalid(format!("{item} at {position:?} is under the player")));
            }
            if items.insert(*position, *item).is_some() {
                return Err(invalid(format!("two items at {position:?}")));
            }
        }
        Ok(items)
    }

    fn validated_player(&self, level: &Level, rules: &Rules) -> Result<Player, SaveError> {
        let saved = &self.player;
        if !level.is_enterable(saved.position) {
            return Err(invalid(format!(
                "player position {:?} is not walkable",
                saved.position
            )));
        }
        for (name, value, max) in [
            ("health", saved.health, rules.max_health),
            ("hunger", saved.hunger, rules.max_hunger),
            ("thirst", saved.thirst, rules.max_thirst),
        ] {
            if value > max {
                return Err(invalid(format!("{name} {value} exceeds maximum {max}")));
            }
        }
        if saved.inventory.contains(Item::Coin) {
            return Err(invalid("coins must not be stored in the inventory".into()));
        }

        let mut player = Player::new(saved.position, rules);
        player.restore_stats(saved.health, saved.hunger, saved.thirst, saved.coins);
        *player.inventory_mut() = saved.inventory.clone();
        Ok(player)
    }
}

fn invalid(reason: String) -> SaveError {
    SaveError::InvalidSaveData(reason)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Direction, loader::parse_levels, model::MoveOutcome};

    const GAME: &str = "\
Maze 1 - 3 6
######
#PCAD#
######

Maze 2 - 3 5
#####
#P D#
#####
";

    fn levels() -> Vec<Level> {
        parse_levels(GAME).unwrap()
    }

    fn mid_game() -> Model {
        let mut model = Model::new(levels(), Rules::default()).unwrap();
        model.move_player(Direction::Right.delta());
        model
    }

    #[test]
    fn restore_reproduces_the_model() {
        let model = mid_game();
        let save = SaveData::capture(&model, Path::new("game.txt"), 42);
        assert_eq!(save.level_items.len(), 1);
        assert!(save.door_unlocked);

        let restored = save.restore(levels(), Rules::default()).unwrap();
        assert_eq!(restored.player(), model.player());
        assert_eq!(restored.level(), model.level());
        assert_eq!(restored.num_moves(), model.num_moves());
        assert_eq!(restored.level_num(), 0);
    }

    #[test]
    fn file_round_trip() {
        let path = std::env::temp_dir()
            .join(format!("mazerunner-save-{}", std::process::id()))
            .join("save.json");
        let save = SaveData::capture(&mid_game(), Path::new("game.txt"), 7);
        save.save_to_path(&path).unwrap();
        let loaded = SaveData::load_from_path(&path).unwrap();
        assert_eq!(loaded, save);
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn garbage_is_a_parse_error() {
        let path = std::env::temp_dir().join(format!("mazerunner-bad-{}.json", std::process::id()));
        fs::write(&path, "Level_items: {(1, 2): Coin((1, 2))}").unwrap();
        assert!(matches!(
            SaveData::load_from_path(&path),
            Err(SaveError::Parse(_))
        ));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn inconsistent_saves_are_rejected() {
        let good = SaveData::capture(&mid_game(), Path::new("game.txt"), 0);
        let rejects = |mutate: fn(&mut SaveData)| {
            let mut save = good.clone();
            mutate(&mut save);
            matches!(
                save.restore(levels(), Rules::default()),
                Err(SaveError::InvalidSaveData(_))
            )
        };

        assert!(rejects(|s| s.level_num = 5));
        assert!(rejects(|s| s.player.position = Position::new(0, 0)));
        assert!(rejects(|s| s.player.position = Position::new(40, 1)));
        assert!(rejects(|s| s.player.health = 1000));
        assert!(rejects(|s| s.player.inventory.add(Item::Coin)));
        assert!(rejects(|s| s.door_unlocked = false));
        assert!(rejects(|s| s.won = true));
        assert!(rejects(|s| {
            s.level_items.push(ItemOnGround {
                position: Position::new(1, 3),
                item: Item::Water,
            })
        }));
        assert!(rejects(|s| {
            s.level_items.push(ItemOnGround {
                position: Position::new(1, 4),
                item: Item::Coin,
            })
        }));
    }

    #[test]
    fn move_counter_saturates_after_restore() {
        let mut save = SaveData::capture(&mid_game(), Path::new("game.txt"), 0);
        save.num_moves = u32::MAX;
        let mut model = save.restore(levels(), Rules::default()).unwrap();

        assert_eq!(
            model.move_player(Direction::Right.delta()),
            MoveOutcome::Moved {
                pickup: Some(Item::Apple)
            }
        );
        assert_eq!(model.num_moves(), u32::MAX);
        assert_eq!(model.player().position(), Position::new(1, 3));
    }

    #[test]
    fn version_mismatch() {
        let mut save = SaveData::capture(&mid_game(), Path::new("game.txt"), 0);
        save.version = SAVE_VERSION + 1;
        assert!(matches!(
            save.restore(levels(), Rules::default()),
            Err(SaveError::VersionMismatch { found, .. }) if found == SAVE_VERSION + 1
        ));
    }
}
