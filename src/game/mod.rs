//! Table-level game logic: entities, deck, pot accounting, hand
//! evaluation, and action validation.

pub mod deck;
pub mod entities;
pub mod evaluator;
pub mod pot;
pub mod validator;

pub use deck::{Deck, DeckError};
pub use entities::{
    ActionKind, Card, Chips, GamePhase, GameState, ParseCardError, PlayerAction, PlayerState,
    Position, Seat, Street, Suit, Value, assign_positions,
};
pub use evaluator::{HandCategory, HandValue, compare, evaluate, winners};
pub use pot::PotManager;
pub use validator::{ActionError, available_actions, validate};
