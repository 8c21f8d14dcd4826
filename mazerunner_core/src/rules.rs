use serde::{Deserialize, Serialize};

/// Tunable game constants.
///
/// Every field has a default, so a rules file only needs to list the values
/// it overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    pub max_health: u32,
    pub max_hunger: u32,
    pub max_thirst: u32,
    /// Health lost on every successful move.
    pub move_cost: u32,
    /// Hunger and thirst each grow by one every this many moves.
    pub decay_interval: u32,
    pub lava_damage: u32,
    pub potion_amount: u32,
    pub apple_amount: u32,
    pub honey_amount: u32,
    pub water_amount: u32,
    pub candy_damage: u32,
}

impl Default for Rules {
    fn default() -> Self {
        Rules {
            max_health: 100,
            max_hunger: 10,
            max_thirst: 10,
            move_cost: 1,
            decay_interval: 5,
            lava_damage: 5,
            potion_amount: 20,
            apple_amount: 1,
            honey_amount: 5,
            water_amount: 5,
            candy_damage: 2,
        }
    }
}

impl Rules {
    /// Parses rules from JSON, filling unspecified fields with defaults.
    pub fn from_json(text: &str) -> Result<Rules, serde_json::Error> {
        serde_json::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_rules_keep_defaults() {
        let rules = Rules::from_json(r#"{ "lava_damage": 50 }"#).unwrap();
        assert_eq!(rules.lava_damage, 50);
        assert_eq!(rules.max_health, Rules::default().max_health);
    }
}
