//! Immutable per-hand records, the engine's output for anything that
//! wants to persist or analyze finished hands.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::game::entities::{Card, Chips, PlayerAction, Position, Seat, Street};

/// A complete snapshot of one finished hand.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct HandRecord {
    pub hand_id: u32,
    pub timestamp: DateTime<Utc>,
    pub session_id: String,
    pub player_count: usize,
    pub dealer_seat: Seat,
    pub small_blind: Chips,
    pub big_blind: Chips,
    pub players: BTreeMap<Seat, String>,
    pub positions: BTreeMap<Seat, Position>,
    /// Stacks after the hand settled.
    pub stacks: BTreeMap<Seat, Chips>,
    pub hero_seat: Seat,
    pub hero_name: String,
    pub hero_cards: Vec<Card>,
    pub flop: Vec<Card>,
    pub turn: Option<Card>,
    pub river: Option<Card>,
    pub actions: Vec<PlayerAction>,
    pub pot_total: Chips,
    pub winners: BTreeMap<Seat, Chips>,
    /// Uncalled bets handed back during the hand, per seat.
    pub uncalled_bets: BTreeMap<Seat, Chips>,
}

impl HandRecord {
    /// Community cards in deal order.
    pub fn board(&self) -> Vec<Card> {
        let mut board = self.flop.clone();
        board.extend(self.turn);
        board.extend(self.river);
        board
    }

    /// Streets that were actually dealt.
    pub fn streets_seen(&self) -> Vec<Street> {
        let mut streets = vec![Street::Preflop];
        if !self.flop.is_empty() {
            streets.push(Street::Flop);
        }
        if self.turn.is_some() {
            streets.push(Street::Turn);
        }
        if self.river.is_some() {
            streets.push(Street::River);
        }
        streets
    }

    pub fn actions_on_street(&self, street: Street) -> Vec<&PlayerAction> {
        self.actions.iter().filter(|a| a.street == street).collect()
    }

    pub fn hero_actions(&self) -> Vec<&PlayerAction> {
        self.actions.iter().filter(|a| a.seat == self.hero_seat).collect()
    }

    pub fn hero_won(&self) -> bool {
        self.winners.contains_key(&self.hero_seat)
    }

    /// One-line human summary.
    pub fn summary(&self) -> String {
        let winners = self
            .winners
            .iter()
            .map(|(seat, amount)| {
                let name = self.players.get(seat).map_or("?", String::as_str);
                format!("{name} (${amount})")
            })
            .collect::<Vec<_>>()
            .join(", ");
        format!("Hand #{}: pot ${}, won by {}", self.hand_id, self.pot_total, winners)
    }
}
