//! Chip accounting for a single hand.
//!
//! Tracks per-street bets, lifetime investment per seat, and the main
//! pot total. Side pots are not split here; when everyone but a single
//! over-bettor is called or folded, the uncalled portion is returned to
//! that bettor instead.

use std::collections::HashMap;

use log::debug;

use super::entities::{Chips, Seat};

#[derive(Clone, Debug, Default)]
pub struct PotManager {
    current_bets: HashMap<Seat, Chips>,
    total_invested: HashMap<Seat, Chips>,
    main_pot: Chips,
}

impl PotManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `amount` fresh chips from `seat` into the pot.
    pub fn add_bet(&mut self, seat: Seat, amount: Chips) {
        *self.current_bets.entry(seat).or_insert(0) += amount;
        *self.total_invested.entry(seat).or_insert(0) += amount;
        self.main_pot += amount;
    }

    /// Clears street-scoped bets while the pot and lifetime totals carry
    /// over to the next street.
    pub fn reset_street(&mut self) {
        self.current_bets.clear();
    }

    pub fn reset_hand(&mut self) {
        self.current_bets.clear();
        self.total_invested.clear();
        self.main_pot = 0;
    }

    pub fn total_pot(&self) -> Chips {
        self.main_pot
    }

    pub fn current_bet(&self, seat: Seat) -> Chips {
        self.current_bets.get(&seat).copied().unwrap_or(0)
    }

    pub fn invested(&self, seat: Seat) -> Chips {
        self.total_invested.get(&seat).copied().unwrap_or(0)
    }

    /// Returns the uncalled portion of the street's final bet, if any.
    ///
    /// Only applies when `last_aggressor` is the unique maximum bettor
    /// among `active_seats` this street; the excess over the
    /// second-highest bet comes back out of the pot. Everything else is
    /// a no-op and the returned map is empty.
    pub fn return_uncalled_bets(
        &mut self,
        last_aggressor: Seat,
        active_seats: &[Seat],
    ) -> HashMap<Seat, Chips> {
        let mut returns = HashMap::new();
        if active_seats.len() < 2 {
            return returns;
        }

        let bets: Vec<(Seat, Chips)> = active_seats
            .iter()
            .map(|&seat| (seat, self.current_bet(seat)))
            .collect();
        let max_bet = bets.iter().map(|&(_, b)| b).max().unwrap_or(0);
        let aggressor_bet = self.current_bet(last_aggressor);
        let at_max = bets.iter().filter(|&&(_, b)| b == max_bet).count();
        if aggressor_bet != max_bet || at_max != 1 {
            return returns;
        }

        let second_highest = bets
            .iter()
            .map(|&(_, b)| b)
            .filter(|&b| b < max_bet)
            .max()
            .unwrap_or(0);
        let uncalled = max_bet - second_highest;
        if uncalled > 0 {
            self.main_pot -= uncalled;
            if let Some(bet) = self.current_bets.get_mut(&last_aggressor) {
                *bet -= uncalled;
            }
            if let Some(invested) = self.total_invested.get_mut(&last_aggressor) {
                *invested -= uncalled;
            }
            debug!("returning ${uncalled} uncalled to seat {last_aggressor}");
            returns.insert(last_aggressor, uncalled);
        }
        returns
    }
}
