use serde::{Deserialize, Serialize};

use crate::{
    agents::agent::AgentConfig,
    game::entities::{Chips, Seat},
};

pub const DEFAULT_PLAYER_COUNT: usize = 6;
pub const DEFAULT_SMALL_BLIND: Chips = 10;
pub const DEFAULT_BIG_BLIND: Chips = 20;
pub const DEFAULT_HERO_STACK: Chips = 1000;
pub const DEFAULT_HERO_SEAT: Seat = 1;

/// Settings for a simulated session. Every player starts each hand
/// with a full `hero_stack`; stacks do not carry across hands.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SimulationConfig {
    pub player_count: usize,
    pub small_blind: Chips,
    pub big_blind: Chips,
    pub hero_stack: Chips,
    pub hero_seat: Option<Seat>,
    pub hero_name: String,
    /// Explicitly configured opponents; remaining seats are filled with
    /// randomly styled agents.
    pub agent_configs: Vec<AgentConfig>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            player_count: DEFAULT_PLAYER_COUNT,
            small_blind: DEFAULT_SMALL_BLIND,
            big_blind: DEFAULT_BIG_BLIND,
            hero_stack: DEFAULT_HERO_STACK,
            hero_seat: None,
            hero_name: "Hero".to_string(),
            agent_configs: Vec::new(),
        }
    }
}

impl SimulationConfig {
    pub fn hero_seat_or_default(&self) -> Seat {
        self.hero_seat.unwrap_or(DEFAULT_HERO_SEAT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SimulationConfig::default();
        assert_eq!(config.player_count, 6);
        assert_eq!(config.small_blind, 10);
        assert_eq!(config.big_blind, 20);
        assert_eq!(config.hero_stack, 1000);
        assert_eq!(config.hero_seat_or_default(), 1);
        assert_eq!(config.hero_name, "Hero");
    }

    #[test]
    fn test_explicit_hero_seat_wins() {
        let config = SimulationConfig {
            hero_seat: Some(5),
            ..SimulationConfig::default()
        };
        assert_eq!(config.hero_seat_or_default(), 5);
    }
}
