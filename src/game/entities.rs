//! Core table entities: cards, streets, actions, positions, and the
//! per-hand player/game state snapshots.

use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt, str::FromStr};

use crate::agents::agent::AgentConfig;

/// Type alias for card values (2..=14, ace high).
pub type Value = u8;

/// Type alias for whole chips. All bets and player stacks are whole chips;
/// there is no point arguing over fractions of a chip.
pub type Chips = u32;

/// Type alias for seat numbers at the table.
pub type Seat = usize;

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Suit {
    Clubs,
    Spades,
    Diamonds,
    Hearts,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Clubs, Suit::Spades, Suit::Diamonds, Suit::Hearts];

    /// Single-letter short form used in hand notation ("Ah", "Ts").
    pub fn short(self) -> char {
        match self {
            Self::Clubs => 'c',
            Self::Spades => 's',
            Self::Diamonds => 'd',
            Self::Hearts => 'h',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'c' => Some(Self::Clubs),
            's' => Some(Self::Spades),
            'd' => Some(Self::Diamonds),
            'h' => Some(Self::Hearts),
            _ => None,
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Clubs => "♣",
            Self::Spades => "♠",
            Self::Diamonds => "♦",
            Self::Hearts => "♥",
        };
        write!(f, "{repr}")
    }
}

/// A card is a tuple of a value (2u8 ... ace=14u8) and a suit.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Card(pub Value, pub Suit);

impl Card {
    pub fn value_char(value: Value) -> char {
        match value {
            14 => 'A',
            13 => 'K',
            12 => 'Q',
            11 => 'J',
            10 => 'T',
            v => (b'0' + v) as char,
        }
    }

    fn value_from_char(c: char) -> Option<Value> {
        match c.to_ascii_uppercase() {
            'A' => Some(14),
            'K' => Some(13),
            'Q' => Some(12),
            'J' => Some(11),
            'T' => Some(10),
            c @ '2'..='9' => Some(c as u8 - b'0'),
            _ => None,
        }
    }

    /// Short notation like "Ah" or "Ts".
    pub fn to_short(self) -> String {
        format!("{}{}", Self::value_char(self.0), self.1.short())
    }
}

impl FromStr for Card {
    type Err = ParseCardError;

    /// Parses short notation like "Ah", "Ts", or "10c".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (value, suit) = match s.len() {
            2 => {
                let mut chars = s.chars();
                (
                    chars.next().and_then(Self::value_from_char),
                    chars.next().and_then(Suit::from_char),
                )
            }
            3 if s.starts_with("10") => (Some(10), s.chars().nth(2).and_then(Suit::from_char)),
            _ => (None, None),
        };
        match (value, suit) {
            (Some(value), Some(suit)) => Ok(Card(value, suit)),
            _ => Err(ParseCardError(s.to_string())),
        }
    }
}

#[derive(Debug, Eq, PartialEq, thiserror::Error)]
#[error("cannot parse card: {0}")]
pub struct ParseCardError(String);

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", Self::value_char(self.0), self.1)
    }
}

/// A betting round.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Street {
    Preflop,
    Flop,
    Turn,
    River,
}

impl fmt::Display for Street {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Preflop => "preflop",
            Self::Flop => "flop",
            Self::Turn => "turn",
            Self::River => "river",
        };
        write!(f, "{repr}")
    }
}

/// Phase of the hand lifecycle, including the "no hand running" and
/// "hand settled" bookends around the four streets.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum GamePhase {
    Waiting,
    Preflop,
    Flop,
    Turn,
    River,
    Complete,
}

/// The kind of action a player can take.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum ActionKind {
    Fold,
    Check,
    Call,
    Bet,
    Raise,
    PostBlind,
    AllIn,
}

impl ActionKind {
    pub fn is_aggressive(self) -> bool {
        matches!(self, Self::Bet | Self::Raise | Self::AllIn)
    }

    /// Blinds are forced; folds put no money in. Everything else is a
    /// voluntary commitment to the pot.
    pub fn is_voluntary(self) -> bool {
        !matches!(self, Self::PostBlind | Self::Fold)
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Fold => "fold",
            Self::Check => "check",
            Self::Call => "call",
            Self::Bet => "bet",
            Self::Raise => "raise",
            Self::PostBlind => "post_blind",
            Self::AllIn => "all_in",
        };
        write!(f, "{repr}")
    }
}

/// A single player action in a hand, as it lands in the hand record.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct PlayerAction {
    pub player_name: String,
    pub seat: Seat,
    pub kind: ActionKind,
    pub amount: Chips,
    pub street: Street,
    pub is_all_in: bool,
}

impl fmt::Display for PlayerAction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            ActionKind::Fold | ActionKind::Check => {
                write!(f, "{} {}s", self.player_name, self.kind)
            }
            ActionKind::PostBlind => {
                write!(f, "{} posts blind ${}", self.player_name, self.amount)
            }
            ActionKind::AllIn => {
                write!(f, "{} goes all-in for ${}", self.player_name, self.amount)
            }
            _ => {
                let suffix = if self.is_all_in { " (all-in)" } else { "" };
                write!(f, "{} {}s ${}{}", self.player_name, self.kind, self.amount, suffix)
            }
        }
    }
}

/// Play positions relative to the dealer button.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Position {
    Utg,
    Utg1,
    Mp,
    Mp1,
    Hj,
    Co,
    Btn,
    Sb,
    Bb,
}

impl Position {
    pub fn is_early(self) -> bool {
        matches!(self, Self::Utg | Self::Utg1)
    }

    pub fn is_middle(self) -> bool {
        matches!(self, Self::Mp | Self::Mp1 | Self::Hj)
    }

    pub fn is_late(self) -> bool {
        matches!(self, Self::Co | Self::Btn)
    }

    pub fn is_blind(self) -> bool {
        matches!(self, Self::Sb | Self::Bb)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Utg => "UTG",
            Self::Utg1 => "UTG+1",
            Self::Mp => "MP",
            Self::Mp1 => "MP+1",
            Self::Hj => "HJ",
            Self::Co => "CO",
            Self::Btn => "BTN",
            Self::Sb => "SB",
            Self::Bb => "BB",
        };
        write!(f, "{repr}")
    }
}

// Position templates clockwise from the button, indexed by player count
// (3..=9). Heads-up is special: the button posts the small blind.
const POSITION_ORDERS: [&[Position]; 7] = [
    &[Position::Btn, Position::Sb, Position::Bb],
    &[Position::Btn, Position::Sb, Position::Bb, Position::Utg],
    &[Position::Btn, Position::Sb, Position::Bb, Position::Utg, Position::Co],
    &[Position::Btn, Position::Sb, Position::Bb, Position::Utg, Position::Mp, Position::Co],
    &[
        Position::Btn,
        Position::Sb,
        Position::Bb,
        Position::Utg,
        Position::Mp,
        Position::Hj,
        Position::Co,
    ],
    &[
        Position::Btn,
        Position::Sb,
        Position::Bb,
        Position::Utg,
        Position::Utg1,
        Position::Mp,
        Position::Hj,
        Position::Co,
    ],
    &[
        Position::Btn,
        Position::Sb,
        Position::Bb,
        Position::Utg,
        Position::Utg1,
        Position::Mp,
        Position::Mp1,
        Position::Hj,
        Position::Co,
    ],
];

/// Assign positions clockwise from the dealer button.
///
/// Returns an empty map for fewer than two seats. For heads-up the
/// dealer is the small blind.
pub fn assign_positions(seats: &[Seat], dealer_seat: Seat) -> BTreeMap<Seat, Position> {
    let n = seats.len();
    if n < 2 {
        return BTreeMap::new();
    }

    let mut sorted_seats = seats.to_vec();
    sorted_seats.sort_unstable();
    let dealer_idx = sorted_seats.iter().position(|&s| s == dealer_seat).unwrap_or(0);

    let ordered: Vec<Seat> = (0..n).map(|i| sorted_seats[(dealer_idx + i) % n]).collect();

    if n == 2 {
        return BTreeMap::from([(ordered[0], Position::Sb), (ordered[1], Position::Bb)]);
    }

    let template = POSITION_ORDERS[(n - 3).min(POSITION_ORDERS.len() - 1)];
    ordered.into_iter().zip(template.iter().copied()).collect()
}

/// Per-seat state during a single hand. Created fresh every hand and
/// discarded once the hand record is snapshotted.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PlayerState {
    pub seat: Seat,
    pub name: String,
    pub stack: Chips,
    pub position: Option<Position>,
    pub cards: Vec<Card>,
    pub is_hero: bool,
    pub is_folded: bool,
    pub is_all_in: bool,
    /// Contribution on the current street only; zeroed at every street start.
    pub current_bet: Chips,
    /// Contribution over the whole hand; monotonic within a hand.
    pub total_invested: Chips,
    pub agent: Option<AgentConfig>,
}

impl PlayerState {
    #[must_use]
    pub fn new(seat: Seat, name: impl Into<String>, stack: Chips) -> Self {
        Self {
            seat,
            name: name.into(),
            stack,
            position: None,
            cards: Vec::with_capacity(2),
            is_hero: false,
            is_folded: false,
            is_all_in: false,
            current_bet: 0,
            total_invested: 0,
            agent: None,
        }
    }
}

/// Complete table state for the hand in progress.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct GameState {
    pub phase: GamePhase,
    pub pot: Chips,
    pub current_bet: Chips,
    pub min_raise: Chips,
    pub community_cards: Vec<Card>,
    pub players: BTreeMap<Seat, PlayerState>,
    pub dealer_seat: Seat,
    pub current_seat: Option<Seat>,
    pub action_history: Vec<String>,
    pub hand_number: u32,
    pub small_blind: Chips,
    pub big_blind: Chips,
}

impl GameState {
    /// Players who have not folded.
    pub fn active_players(&self) -> impl Iterator<Item = &PlayerState> {
        self.players.values().filter(|p| !p.is_folded)
    }

    pub fn hero(&self) -> Option<&PlayerState> {
        self.players.values().find(|p| p.is_hero)
    }
}
