//! Builds tables of agents for a simulation.
//!
//! The factory is plain owned state: it holds the style table and its
//! own rng, so two factories never share name pools or random streams.

use std::collections::{BTreeMap, HashSet};

use log::debug;
use rand::{Rng, SeedableRng, rngs::SmallRng};

use crate::{
    game::entities::{Chips, Seat},
    sim::config::SimulationConfig,
};

use super::{
    agent::{Agent, AgentConfig, RuleBasedAgent, SkillLevel},
    styles::{PlayStyle, StyleTable},
};

// Table-persona names handed out per style, no repeats until a pool
// runs dry.
fn name_pool(style: PlayStyle) -> &'static [&'static str] {
    match style {
        PlayStyle::LooseAggressive => &["Loosey Goosey", "Wild Bill", "Action Dan", "Mad Marty"],
        PlayStyle::LoosePassive => &["Calling Station", "Fishy Phil", "Just Caller", "Easy Mark"],
        PlayStyle::TightAggressive => &["TAG Tony", "Solid Sam", "Nitro Nick", "Professor"],
        PlayStyle::TightPassive => &["Rock Roger", "Nit Nancy", "Weak Willie", "Safe Sally"],
    }
}

// Cumulative weights for random style assignment.
const STYLE_WEIGHTS: [(PlayStyle, f64); 4] = [
    (PlayStyle::LooseAggressive, 0.30),
    (PlayStyle::LoosePassive, 0.20),
    (PlayStyle::TightAggressive, 0.35),
    (PlayStyle::TightPassive, 0.15),
];

pub struct AgentFactory {
    table: StyleTable,
    rng: SmallRng,
    used_names: BTreeMap<PlayStyle, HashSet<&'static str>>,
}

impl AgentFactory {
    #[must_use]
    pub fn new(table: StyleTable) -> Self {
        Self::with_rng(table, SmallRng::from_os_rng())
    }

    #[must_use]
    pub fn with_rng(table: StyleTable, rng: SmallRng) -> Self {
        Self {
            table,
            rng,
            used_names: BTreeMap::new(),
        }
    }

    /// Picks a style at the configured population weights.
    fn random_style(&mut self) -> PlayStyle {
        let roll: f64 = self.rng.random_range(0.0..1.0);
        let mut cumulative = 0.0;
        for (style, weight) in STYLE_WEIGHTS {
            cumulative += weight;
            if roll < cumulative {
                return style;
            }
        }
        PlayStyle::TightPassive
    }

    /// Hands out an unused name for the style, recycling the pool once
    /// every name has been used.
    fn next_name(&mut self, style: PlayStyle) -> String {
        let pool = name_pool(style);
        let used = self.used_names.entry(style).or_default();
        let mut available: Vec<&'static str> =
            pool.iter().copied().filter(|n| !used.contains(n)).collect();
        if available.is_empty() {
            used.clear();
            available = pool.to_vec();
        }
        let name = available[self.rng.random_range(0..available.len())];
        self.used_names.entry(style).or_default().insert(name);
        name.to_string()
    }

    /// Creates one agent with a fresh rng split off the factory's.
    pub fn create_agent(&mut self, config: AgentConfig) -> Box<dyn Agent> {
        let rng = SmallRng::from_rng(&mut self.rng);
        Box::new(RuleBasedAgent::with_rng(config, &self.table, rng))
    }

    /// Creates a random-styled agent for `seat`.
    pub fn create_random_agent(&mut self, seat: Seat, stack: Chips) -> Box<dyn Agent> {
        let style = self.random_style();
        let name = self.next_name(style);
        self.create_agent(AgentConfig {
            name,
            style,
            level: SkillLevel::Advanced,
            seat,
            stack,
            vpip_pct: 0.0,
            pfr_pct: 0.0,
            af: 0.0,
        })
    }

    /// Builds the full opposition for a simulation: explicitly
    /// configured agents first, then random fills on free seats until
    /// `player_count - 1` opponents exist. The hero's seat is never
    /// assigned an agent.
    pub fn create_agents(&mut self, config: &SimulationConfig) -> BTreeMap<Seat, Box<dyn Agent>> {
        self.used_names.clear();
        let hero_seat = config.hero_seat_or_default();
        let mut agents: BTreeMap<Seat, Box<dyn Agent>> = BTreeMap::new();

        for agent_config in &config.agent_configs {
            let seat = agent_config.seat;
            if seat == hero_seat || agents.contains_key(&seat) {
                debug!("skipping configured agent {} on occupied seat {seat}", agent_config.name);
                continue;
            }
            agents.insert(seat, self.create_agent(agent_config.clone()));
        }

        let needed = (config.player_count.max(2) - 1).saturating_sub(agents.len());
        let mut filled = 0;
        for seat in 1..=9 {
            if filled == needed {
                break;
            }
            if seat == hero_seat || agents.contains_key(&seat) {
                continue;
            }
            agents.insert(seat, self.create_random_agent(seat, config.hero_stack));
            filled += 1;
        }
        agents
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn factory(seed: u64) -> AgentFactory {
        AgentFactory::with_rng(StyleTable::default(), SmallRng::seed_from_u64(seed))
    }

    #[test]
    fn test_create_agents_fills_table_around_hero() {
        let mut factory = factory(1);
        let config = SimulationConfig::default();
        let agents = factory.create_agents(&config);
        assert_eq!(agents.len(), config.player_count - 1);
        assert!(!agents.contains_key(&config.hero_seat_or_default()));
    }

    #[test]
    fn test_configured_agents_keep_their_seats() {
        let mut factory = factory(2);
        let mut config = SimulationConfig::default();
        config.agent_configs.push(AgentConfig {
            name: "Custom Carl".to_string(),
            style: PlayStyle::LoosePassive,
            level: SkillLevel::Expert,
            seat: 4,
            stack: 500,
            vpip_pct: 0.0,
            pfr_pct: 0.0,
            af: 0.0,
        });
        let agents = factory.create_agents(&config);
        assert_eq!(agents[&4].name(), "Custom Carl");
        assert_eq!(agents[&4].level(), SkillLevel::Expert);
    }

    #[test]
    fn test_configured_agent_on_hero_seat_skipped() {
        let mut factory = factory(3);
        let mut config = SimulationConfig::default();
        let hero_seat = config.hero_seat_or_default();
        config.agent_configs.push(AgentConfig {
            name: "Seat Stealer".to_string(),
            style: PlayStyle::TightAggressive,
            level: SkillLevel::Advanced,
            seat: hero_seat,
            stack: 500,
            vpip_pct: 0.0,
            pfr_pct: 0.0,
            af: 0.0,
        });
        let agents = factory.create_agents(&config);
        assert!(!agents.contains_key(&hero_seat));
        assert_eq!(agents.len(), config.player_count - 1);
    }

    #[test]
    fn test_names_unique_within_table() {
        let mut factory = factory(4);
        let mut config = SimulationConfig::default();
        config.player_count = 9;
        let agents = factory.create_agents(&config);
        let names: HashSet<&str> = agents.values().map(|a| a.name()).collect();
        assert_eq!(names.len(), agents.len());
    }

    #[test]
    fn test_name_pool_recycles_when_exhausted() {
        let mut factory = factory(5);
        for _ in 0..10 {
            let agent = factory.create_random_agent(1, 1000);
            assert!(!agent.name().is_empty());
        }
    }

    #[test]
    fn test_style_weights_roughly_respected() {
        let mut factory = factory(6);
        let mut by_style: HashMap<PlayStyle, u32> = HashMap::new();
        for _ in 0..1000 {
            *by_style.entry(factory.random_style()).or_insert(0) += 1;
        }
        let tag = by_style[&PlayStyle::TightAggressive];
        let tp = by_style[&PlayStyle::TightPassive];
        assert!(tag > tp, "TAG ({tag}) should outnumber TP ({tp})");
        assert!((250..=450).contains(&tag));
        assert!((80..=250).contains(&tp));
    }
}
