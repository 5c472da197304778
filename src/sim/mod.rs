//! Simulation layer: session configuration, the hand engine, and the
//! immutable per-hand records it produces.

pub mod config;
pub mod engine;
pub mod record;

pub use config::SimulationConfig;
pub use engine::{EngineError, SimulationEngine, StreetState};
pub use record::HandRecord;
