//! Style-driven opponents: play style profiles, the decision engine,
//! the agent trait, and the factory that seats a table of them.

pub mod agent;
pub mod decision;
pub mod factory;
pub mod styles;

pub use agent::{Agent, AgentConfig, AgentStats, RuleBasedAgent, SkillLevel};
pub use decision::{Decision, DecisionContext, DecisionEngine, HandStrength};
pub use factory::AgentFactory;
pub use styles::{PlayStyle, StyleProfile, StyleTable};
