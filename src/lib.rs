//! A multi-seat Texas Hold'em hand simulation engine.
//!
//! One human-controlled hero plays against style-driven rule-based
//! agents. The engine deals complete hands (blinds, four betting
//! streets, showdown) and emits an immutable [`sim::HandRecord`] for
//! each finished hand.
//!
//! ```
//! use holdem_sim::{
//!     agents::{AgentFactory, StyleTable},
//!     game::ActionKind,
//!     sim::{SimulationConfig, SimulationEngine},
//! };
//!
//! let mut factory = AgentFactory::new(StyleTable::default());
//! let mut engine = SimulationEngine::new(SimulationConfig::default(), &mut factory);
//! engine.start_new_hand()?;
//! while !engine.is_complete() {
//!     if engine.is_hero_turn() {
//!         engine.player_action(ActionKind::Fold, 0)?;
//!     } else {
//!         engine.agent_action()?;
//!     }
//! }
//! let record = engine.to_hand_record().expect("hand finished");
//! println!("{}", record.summary());
//! # Ok::<(), holdem_sim::sim::EngineError>(())
//! ```

pub mod agents;
pub mod game;
pub mod sim;

pub use agents::{Agent, AgentFactory, PlayStyle, StyleTable};
pub use game::{ActionKind, Card, Chips, GameState, Seat};
pub use sim::{HandRecord, SimulationConfig, SimulationEngine};
