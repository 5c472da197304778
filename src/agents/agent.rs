//! The agent seam: a trait for anything that can act in a hand, the
//! rule-based implementation backed by a `DecisionEngine`, and the
//! running per-agent statistics.

use std::fmt;

use rand::{SeedableRng, rngs::SmallRng};
use serde::{Deserialize, Serialize};

use crate::game::entities::{ActionKind, Chips, Seat};

use super::{
    decision::{Decision, DecisionContext, DecisionEngine},
    styles::{PlayStyle, StyleTable},
};

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillLevel {
    Beginner,
    Advanced,
    Expert,
}

impl fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Beginner => "beginner",
            Self::Advanced => "advanced",
            Self::Expert => "expert",
        };
        write!(f, "{repr}")
    }
}

/// Identity and tendencies of a seated agent. Doubles as the input for
/// explicitly configured agents and as the snapshot stored on
/// `PlayerState`.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct AgentConfig {
    pub name: String,
    pub style: PlayStyle,
    pub level: SkillLevel,
    pub seat: Seat,
    pub stack: Chips,
    pub vpip_pct: f64,
    pub pfr_pct: f64,
    pub af: f64,
}

/// Cumulative counters across a session.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct AgentStats {
    pub hands_played: u32,
    pub hands_won: u32,
    pub total_profit: i64,
    pub vpip_count: u32,
    pub pfr_count: u32,
    pub aggressive_actions: u32,
    pub passive_actions: u32,
}

impl AgentStats {
    pub fn vpip_pct(&self) -> f64 {
        if self.hands_played == 0 {
            return 0.0;
        }
        f64::from(self.vpip_count) / f64::from(self.hands_played)
    }

    pub fn pfr_pct(&self) -> f64 {
        if self.hands_played == 0 {
            return 0.0;
        }
        f64::from(self.pfr_count) / f64::from(self.hands_played)
    }

    /// Observed aggression factor. With no passive actions yet, reads
    /// as the raw aggressive count, or neutral 1.0 before any action.
    pub fn aggression_factor(&self) -> f64 {
        if self.passive_actions == 0 {
            if self.aggressive_actions > 0 {
                return f64::from(self.aggressive_actions);
            }
            return 1.0;
        }
        f64::from(self.aggressive_actions) / f64::from(self.passive_actions)
    }
}

/// Anything that can sit at the table and act.
pub trait Agent {
    fn name(&self) -> &str;
    fn style(&self) -> PlayStyle;
    fn level(&self) -> SkillLevel;
    /// Identity snapshot suitable for embedding in hand state.
    fn config(&self) -> AgentConfig;
    fn make_decision(&mut self, ctx: &DecisionContext) -> Decision;
    fn record_action(&mut self, kind: ActionKind, voluntary: bool);
    fn record_hand_result(&mut self, profit: i64, won: bool);
    fn stats(&self) -> &AgentStats;
}

/// The built-in style-driven agent.
pub struct RuleBasedAgent {
    config: AgentConfig,
    engine: DecisionEngine,
    stats: AgentStats,
}

impl RuleBasedAgent {
    #[must_use]
    pub fn new(config: AgentConfig, table: &StyleTable) -> Self {
        Self::with_rng(config, table, SmallRng::from_os_rng())
    }

    #[must_use]
    pub fn with_rng(mut config: AgentConfig, table: &StyleTable, rng: SmallRng) -> Self {
        let engine = DecisionEngine::with_rng(config.style, table, rng);
        config.vpip_pct = engine.vpip();
        config.pfr_pct = engine.pfr();
        config.af = engine.aggression();
        Self {
            config,
            engine,
            stats: AgentStats::default(),
        }
    }
}

impl Agent for RuleBasedAgent {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn style(&self) -> PlayStyle {
        self.config.style
    }

    fn level(&self) -> SkillLevel {
        self.config.level
    }

    fn config(&self) -> AgentConfig {
        self.config.clone()
    }

    fn make_decision(&mut self, ctx: &DecisionContext) -> Decision {
        self.engine.make_decision(ctx)
    }

    fn record_action(&mut self, kind: ActionKind, voluntary: bool) {
        if !voluntary {
            return;
        }
        match kind {
            ActionKind::Fold => {}
            ActionKind::Check | ActionKind::Call => self.stats.passive_actions += 1,
            ActionKind::Bet | ActionKind::Raise | ActionKind::AllIn => {
                self.stats.aggressive_actions += 1;
                self.stats.pfr_count += 1;
                self.stats.vpip_count += 1;
            }
            ActionKind::PostBlind => self.stats.vpip_count += 1,
        }
    }

    fn record_hand_result(&mut self, profit: i64, won: bool) {
        self.stats.hands_played += 1;
        self.stats.total_profit += profit;
        if won {
            self.stats.hands_won += 1;
        }
    }

    fn stats(&self) -> &AgentStats {
        &self.stats
    }
}
