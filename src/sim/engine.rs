//! The hand simulation engine.
//!
//! Drives complete hands: blinds, dealing, betting rounds, uncalled-bet
//! returns, showdown, and the immutable record of each finished hand.
//! The hero's actions come from the caller via `player_action`; every
//! other seat acts through its agent via `agent_action`.

use std::collections::{BTreeMap, HashSet};

use chrono::Utc;
use log::{debug, warn};
use rand::{Rng, SeedableRng, rngs::SmallRng};
use thiserror::Error;

use crate::{
    agents::{agent::Agent, decision::DecisionContext, factory::AgentFactory},
    game::{
        deck::{Deck, DeckError},
        entities::{
            ActionKind, Card, Chips, GamePhase, GameState, PlayerAction, PlayerState, Position,
            Seat, Street, assign_positions,
        },
        evaluator,
        pot::PotManager,
        validator::{self, ActionError},
    },
};

use super::{config::SimulationConfig, record::HandRecord};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no active hand")]
    NoActiveHand,
    #[error("no player to act")]
    NoCurrentPlayer,
    #[error("it is the hero's turn to act")]
    HeroTurn,
    #[error("no agent seated at seat {0}")]
    NoAgentAtSeat(Seat),
    #[error(transparent)]
    Action(#[from] ActionError),
    #[error(transparent)]
    Deck(#[from] DeckError),
}

/// Betting state for the street in progress. Reset at every street
/// boundary.
#[derive(Clone, Debug)]
pub struct StreetState {
    pub street: Street,
    pub current_bet: Chips,
    pub min_raise: Chips,
    pub last_aggressor: Option<Seat>,
    pub action_count: usize,
    pub acted_seats: HashSet<Seat>,
}

pub struct SimulationEngine {
    config: SimulationConfig,
    /// Occupied seats, sorted; fixed for the session.
    seats: Vec<Seat>,
    hero_seat: Seat,
    deck: Deck,
    pot: PotManager,
    agents: BTreeMap<Seat, Box<dyn Agent>>,
    rng: SmallRng,
    hand_number: u32,
    dealer_seat: Seat,
    session_id: String,
    game_state: Option<GameState>,
    street: Option<StreetState>,
    hand_actions: Vec<PlayerAction>,
    uncalled_returns: BTreeMap<Seat, Chips>,
    completed_hands: Vec<HandRecord>,
}

impl SimulationEngine {
    #[must_use]
    pub fn new(config: SimulationConfig, factory: &mut AgentFactory) -> Self {
        Self::with_rng(config, factory, SmallRng::from_os_rng())
    }

    #[must_use]
    pub fn with_rng(
        config: SimulationConfig,
        factory: &mut AgentFactory,
        mut rng: SmallRng,
    ) -> Self {
        let agents = factory.create_agents(&config);
        let hero_seat = config.hero_seat_or_default();
        let mut seats: Vec<Seat> = agents.keys().copied().collect();
        seats.push(hero_seat);
        seats.sort_unstable();
        let dealer_seat = seats[rng.random_range(0..seats.len())];
        let session_id = format!("sim_{}", Utc::now().format("%Y%m%d_%H%M%S"));
        Self {
            config,
            seats,
            hero_seat,
            deck: Deck::new(),
            pot: PotManager::new(),
            agents,
            rng,
            hand_number: 0,
            dealer_seat,
            session_id,
            game_state: None,
            street: None,
            hand_actions: Vec::new(),
            uncalled_returns: BTreeMap::new(),
            completed_hands: Vec::new(),
        }
    }

    /// Deals a fresh hand: rotates the button, posts blinds, deals hole
    /// cards, and leaves the action on the first preflop seat.
    pub fn start_new_hand(&mut self) -> Result<&GameState, EngineError> {
        self.hand_number += 1;
        self.hand_actions.clear();
        self.uncalled_returns.clear();
        self.deck.reset();
        self.deck.shuffle(&mut self.rng);
        self.pot.reset_hand();
        self.dealer_seat = next_ring_seat(&self.seats, self.dealer_seat);

        let positions = assign_positions(&self.seats, self.dealer_seat);
        let mut players: BTreeMap<Seat, PlayerState> = BTreeMap::new();
        for &seat in &self.seats {
            let mut player = if seat == self.hero_seat {
                let mut p =
                    PlayerState::new(seat, self.config.hero_name.clone(), self.config.hero_stack);
                p.is_hero = true;
                p
            } else {
                let agent = self.agents.get(&seat).ok_or(EngineError::NoAgentAtSeat(seat))?;
                let mut identity = agent.config();
                identity.seat = seat;
                identity.stack = self.config.hero_stack;
                let mut p =
                    PlayerState::new(seat, identity.name.clone(), self.config.hero_stack);
                p.agent = Some(identity);
                p
            };
            player.position = positions.get(&seat).copied();
            players.insert(seat, player);
        }

        // Two cards each, one at a time, starting left of the button.
        let deal_order: Vec<Seat> = ring_from(&self.seats, self.dealer_seat);
        for _ in 0..2 {
            for &seat in &deal_order {
                let card = self.deck.deal_one()?;
                if let Some(player) = players.get_mut(&seat) {
                    player.cards.push(card);
                }
            }
        }

        let mut history = vec![format!("--- Hand #{} starting ---", self.hand_number)];
        let sb_seat = seat_with_position(&positions, Position::Sb);
        let bb_seat = seat_with_position(&positions, Position::Bb);
        for (seat, amount, label) in [
            (sb_seat, self.config.small_blind, "small blind"),
            (bb_seat, self.config.big_blind, "big blind"),
        ] {
            let Some(seat) = seat else { continue };
            let Some(player) = players.get_mut(&seat) else { continue };
            let posted = amount.min(player.stack);
            player.stack -= posted;
            player.current_bet = posted;
            player.total_invested += posted;
            if player.stack == 0 {
                player.is_all_in = true;
            }
            self.pot.add_bet(seat, posted);
            history.push(format!("{} posts {label} ${posted}", player.name));
            self.hand_actions.push(PlayerAction {
                player_name: player.name.clone(),
                seat,
                kind: ActionKind::PostBlind,
                amount: posted,
                street: Street::Preflop,
                is_all_in: player.is_all_in,
            });
        }

        // The posted blinds set the price but do not count as acted;
        // both blinds still get their option.
        self.street = Some(StreetState {
            street: Street::Preflop,
            current_bet: self.config.big_blind,
            min_raise: self.config.big_blind,
            last_aggressor: None,
            action_count: 0,
            acted_seats: HashSet::new(),
        });
        let current_seat =
            bb_seat.and_then(|bb| first_actor_after(&players, &self.seats, bb));
        debug!(
            "hand #{} started, dealer seat {}, first to act {current_seat:?}",
            self.hand_number, self.dealer_seat
        );

        self.game_state = Some(GameState {
            phase: GamePhase::Preflop,
            pot: self.pot.total_pot(),
            current_bet: self.config.big_blind,
            min_raise: self.config.big_blind,
            community_cards: Vec::new(),
            players,
            dealer_seat: self.dealer_seat,
            current_seat,
            action_history: history,
            hand_number: self.hand_number,
            small_blind: self.config.small_blind,
            big_blind: self.config.big_blind,
        });
        if current_seat.is_none() {
            // Blinds put everyone all-in; run the board out.
            self.complete_street()?;
        }
        self.game_state.as_ref().ok_or(EngineError::NoActiveHand)
    }

    /// Applies an action for the seat currently due to act.
    pub fn player_action(
        &mut self,
        kind: ActionKind,
        amount: Chips,
    ) -> Result<&GameState, EngineError> {
        let seat = self.current_actor()?;
        self.apply_action(seat, kind, amount)?;
        self.game_state.as_ref().ok_or(EngineError::NoActiveHand)
    }

    /// Lets the current seat's agent decide and act.
    pub fn agent_action(&mut self) -> Result<&GameState, EngineError> {
        let seat = self.current_actor()?;
        if seat == self.hero_seat {
            return Err(EngineError::HeroTurn);
        }
        let (available, ctx) = {
            let state = self.game_state.as_ref().ok_or(EngineError::NoActiveHand)?;
            let street = self.street.as_ref().ok_or(EngineError::NoActiveHand)?;
            let player = state.players.get(&seat).ok_or(EngineError::NoCurrentPlayer)?;
            let available =
                validator::available_actions(player, street.current_bet, street.min_raise);
            let call_amount = street.current_bet.saturating_sub(player.current_bet);
            let ctx = DecisionContext {
                hole_cards: player.cards.clone(),
                community_cards: state.community_cards.clone(),
                pot: self.pot.total_pot(),
                call_amount,
                min_raise: street.min_raise,
                max_raise: player.stack + player.current_bet,
                player_bet: player.current_bet,
                is_preflop: street.street == Street::Preflop,
                can_check: call_amount == 0,
            };
            (available, ctx)
        };
        if available.is_empty() {
            self.apply_action(seat, ActionKind::Fold, 0)?;
            return self.game_state.as_ref().ok_or(EngineError::NoActiveHand);
        }
        let agent = self.agents.get_mut(&seat).ok_or(EngineError::NoAgentAtSeat(seat))?;
        let decision = agent.make_decision(&ctx);
        let (kind, amount) = if available.contains(&decision.kind) {
            (decision.kind, decision.amount)
        } else {
            let fallback = [ActionKind::Check, ActionKind::Call, ActionKind::Fold]
                .into_iter()
                .find(|k| available.contains(k))
                .unwrap_or(available[0]);
            warn!(
                "{} wanted to {} but it is unavailable, taking {fallback}",
                agent.name(),
                decision.kind
            );
            (fallback, 0)
        };
        debug!("{}: {kind} ({})", agent.name(), decision.reasoning);
        self.apply_action(seat, kind, amount)?;
        self.game_state.as_ref().ok_or(EngineError::NoActiveHand)
    }

    pub fn state(&self) -> Option<&GameState> {
        self.game_state.as_ref()
    }

    pub fn is_complete(&self) -> bool {
        self.game_state
            .as_ref()
            .is_none_or(|state| state.phase == GamePhase::Complete)
    }

    pub fn is_hero_turn(&self) -> bool {
        !self.is_complete()
            && self.game_state.as_ref().and_then(|s| s.current_seat) == Some(self.hero_seat)
    }

    /// Legal actions for the seat currently due to act.
    pub fn available_actions(&self) -> Vec<ActionKind> {
        let Some(state) = self.game_state.as_ref() else {
            return Vec::new();
        };
        let Some(street) = self.street.as_ref() else {
            return Vec::new();
        };
        let Some(seat) = state.current_seat else {
            return Vec::new();
        };
        state
            .players
            .get(&seat)
            .map(|player| {
                validator::available_actions(player, street.current_bet, street.min_raise)
            })
            .unwrap_or_default()
    }

    /// The most recently completed hand, if any.
    pub fn to_hand_record(&self) -> Option<&HandRecord> {
        self.completed_hands.last()
    }

    pub fn completed_hands(&self) -> &[HandRecord] {
        &self.completed_hands
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn hero_seat(&self) -> Seat {
        self.hero_seat
    }

    pub fn hand_number(&self) -> u32 {
        self.hand_number
    }

    fn current_actor(&self) -> Result<Seat, EngineError> {
        let state = self.game_state.as_ref().ok_or(EngineError::NoActiveHand)?;
        if state.phase == GamePhase::Complete || self.street.is_none() {
            return Err(EngineError::NoActiveHand);
        }
        state.current_seat.ok_or(EngineError::NoCurrentPlayer)
    }

    fn apply_action(
        &mut self,
        seat: Seat,
        kind: ActionKind,
        amount: Chips,
    ) -> Result<(), EngineError> {
        {
            let street = self.street.as_mut().ok_or(EngineError::NoActiveHand)?;
            let state = self.game_state.as_mut().ok_or(EngineError::NoActiveHand)?;
            let player = state.players.get_mut(&seat).ok_or(EngineError::NoCurrentPlayer)?;
            let total = validator::validate(
                kind,
                amount,
                player,
                street.current_bet,
                street.min_raise,
                self.config.big_blind,
            )?;
            let line = match kind {
                ActionKind::Fold => {
                    player.is_folded = true;
                    format!("{} folds", player.name)
                }
                ActionKind::Check => format!("{} checks", player.name),
                _ => {
                    // A resolved total can never owe negative chips; a
                    // total at or below the committed street bet moves
                    // nothing.
                    let increment = total.saturating_sub(player.current_bet);
                    player.stack -= increment;
                    player.current_bet = player.current_bet.max(total);
                    player.total_invested += increment;
                    self.pot.add_bet(seat, increment);
                    if player.stack == 0 {
                        player.is_all_in = true;
                    }
                    if kind.is_aggressive() && total > street.current_bet {
                        street.min_raise = street.min_raise.max(total - street.current_bet);
                        street.current_bet = total;
                        street.last_aggressor = Some(seat);
                    }
                    match kind {
                        ActionKind::Call => format!("{} calls ${increment}", player.name),
                        ActionKind::Bet => format!("{} bets ${total}", player.name),
                        ActionKind::Raise => format!("{} raises to ${total}", player.name),
                        _ => format!("{} goes all-in for ${total}", player.name),
                    }
                }
            };
            state.action_history.push(line);
            self.hand_actions.push(PlayerAction {
                player_name: player.name.clone(),
                seat,
                kind,
                amount: if matches!(kind, ActionKind::Fold | ActionKind::Check) {
                    0
                } else {
                    total
                },
                street: street.street,
                is_all_in: player.is_all_in,
            });
            street.action_count += 1;
            street.acted_seats.insert(seat);
        }

        if seat != self.hero_seat
            && let Some(agent) = self.agents.get_mut(&seat)
        {
            agent.record_action(kind, kind.is_voluntary());
        }

        let complete = {
            let street = self.street.as_ref().ok_or(EngineError::NoActiveHand)?;
            let state = self.game_state.as_ref().ok_or(EngineError::NoActiveHand)?;
            street_is_complete(street, &state.players)
        };
        if complete {
            self.complete_street()?;
        } else {
            let next = {
                let street = self.street.as_ref().ok_or(EngineError::NoActiveHand)?;
                let state = self.game_state.as_ref().ok_or(EngineError::NoActiveHand)?;
                next_to_act(street, &state.players, &self.seats, seat)
            };
            if let Some(state) = self.game_state.as_mut() {
                state.current_seat = next;
            }
        }
        self.sync_state();
        Ok(())
    }

    /// Settles the finished street and either deals the next one or
    /// settles the hand. Loops when nobody is left with chips to act,
    /// running the remaining board out.
    fn complete_street(&mut self) -> Result<(), EngineError> {
        loop {
            let aggressor = self.street.as_ref().and_then(|s| s.last_aggressor);
            if let Some(aggressor) = aggressor {
                let active: Vec<Seat> = {
                    let state = self.game_state.as_ref().ok_or(EngineError::NoActiveHand)?;
                    state
                        .players
                        .values()
                        .filter(|p| !p.is_folded)
                        .map(|p| p.seat)
                        .collect()
                };
                let returns = self.pot.return_uncalled_bets(aggressor, &active);
                if !returns.is_empty() {
                    let state = self.game_state.as_mut().ok_or(EngineError::NoActiveHand)?;
                    for (&ret_seat, &ret_amount) in &returns {
                        if let Some(player) = state.players.get_mut(&ret_seat) {
                            player.stack += ret_amount;
                            player.current_bet = player.current_bet.saturating_sub(ret_amount);
                            player.total_invested =
                                player.total_invested.saturating_sub(ret_amount);
                            state.action_history.push(format!(
                                "{} gets ${ret_amount} uncalled bet returned",
                                player.name
                            ));
                        }
                        *self.uncalled_returns.entry(ret_seat).or_insert(0) += ret_amount;
                    }
                }
            }
            self.pot.reset_street();
            {
                let state = self.game_state.as_mut().ok_or(EngineError::NoActiveHand)?;
                for player in state.players.values_mut() {
                    player.current_bet = 0;
                }
            }

            let (active_count, current_street) = {
                let state = self.game_state.as_ref().ok_or(EngineError::NoActiveHand)?;
                let street = self.street.as_ref().ok_or(EngineError::NoActiveHand)?;
                (
                    state.players.values().filter(|p| !p.is_folded).count(),
                    street.street,
                )
            };
            if active_count <= 1 || current_street == Street::River {
                self.complete_hand();
                return Ok(());
            }

            let (next_street, phase, cards) = match current_street {
                Street::Preflop => (Street::Flop, GamePhase::Flop, self.deck.deal(3)?),
                Street::Flop => (Street::Turn, GamePhase::Turn, self.deck.deal(1)?),
                _ => (Street::River, GamePhase::River, self.deck.deal(1)?),
            };
            {
                let state = self.game_state.as_mut().ok_or(EngineError::NoActiveHand)?;
                state.community_cards.extend_from_slice(&cards);
                state.phase = phase;
                let label = match next_street {
                    Street::Turn => "Turn",
                    Street::River => "River",
                    _ => "Flop",
                };
                let shown = cards
                    .iter()
                    .map(|c| c.to_short())
                    .collect::<Vec<_>>()
                    .join(" ");
                state.action_history.push(format!("{label}: {shown}"));
            }
            self.street = Some(StreetState {
                street: next_street,
                current_bet: 0,
                min_raise: self.config.big_blind,
                last_aggressor: None,
                action_count: 0,
                acted_seats: HashSet::new(),
            });

            let first = {
                let state = self.game_state.as_ref().ok_or(EngineError::NoActiveHand)?;
                first_actor_after(&state.players, &self.seats, self.dealer_seat)
            };
            if let Some(first) = first {
                if let Some(state) = self.game_state.as_mut() {
                    state.current_seat = Some(first);
                }
                self.sync_state();
                return Ok(());
            }
            // Everyone left is all-in; deal the next street too.
        }
    }

    fn complete_hand(&mut self) {
        let pot_total = self.pot.total_pot();
        let mut winners: BTreeMap<Seat, Chips> = BTreeMap::new();
        let mut results: Vec<(Seat, i64, bool)> = Vec::new();

        if let Some(state) = self.game_state.as_mut() {
            state.phase = GamePhase::Complete;
            state.current_seat = None;
            state.pot = pot_total;
            state.current_bet = 0;
            state.min_raise = 0;

            let active: Vec<Seat> = state
                .players
                .values()
                .filter(|p| !p.is_folded)
                .map(|p| p.seat)
                .collect();
            if active.len() == 1 {
                let seat = active[0];
                if let Some(player) = state.players.get_mut(&seat) {
                    player.stack += pot_total;
                    state
                        .action_history
                        .push(format!("{} wins ${pot_total} (everyone folded)", player.name));
                }
                winners.insert(seat, pot_total);
            } else {
                let holes: BTreeMap<Seat, Vec<Card>> = state
                    .players
                    .values()
                    .filter(|p| !p.is_folded && p.cards.len() >= 2)
                    .map(|p| (p.seat, p.cards.clone()))
                    .collect();
                let winning_seats = evaluator::winners(&state.community_cards, &holes);
                // Winners in ascending seat order, so the odd chips
                // always land the same way and the pot splits exactly.
                let share_count = winning_seats.len().max(1) as Chips;
                let share = pot_total / share_count;
                let remainder = pot_total % share_count;
                for (i, &seat) in winning_seats.iter().enumerate() {
                    let amount = share + Chips::from((i as Chips) < remainder);
                    if let Some(player) = state.players.get_mut(&seat) {
                        player.stack += amount;
                    }
                    winners.insert(seat, amount);
                }
                for (&seat, &amount) in &winners {
                    if let Some(player) = state.players.get(&seat) {
                        state
                            .action_history
                            .push(format!("{} wins ${amount} at showdown", player.name));
                    }
                }
            }

            for player in state.players.values() {
                match winners.get(&player.seat) {
                    Some(&won) => results.push((player.seat, i64::from(won), true)),
                    None => results.push((player.seat, -i64::from(player.total_invested), false)),
                }
            }
            state
                .action_history
                .push(format!("--- Hand #{} complete ---", state.hand_number));
        }

        for (seat, profit, won) in results {
            if seat != self.hero_seat
                && let Some(agent) = self.agents.get_mut(&seat)
            {
                agent.record_hand_result(profit, won);
            }
        }

        if let Some(state) = self.game_state.as_ref() {
            let community = &state.community_cards;
            let record = HandRecord {
                hand_id: self.hand_number,
                timestamp: Utc::now(),
                session_id: self.session_id.clone(),
                player_count: state.players.len(),
                dealer_seat: state.dealer_seat,
                small_blind: state.small_blind,
                big_blind: state.big_blind,
                players: state
                    .players
                    .values()
                    .map(|p| (p.seat, p.name.clone()))
                    .collect(),
                positions: state
                    .players
                    .values()
                    .filter_map(|p| p.position.map(|pos| (p.seat, pos)))
                    .collect(),
                stacks: state.players.values().map(|p| (p.seat, p.stack)).collect(),
                hero_seat: self.hero_seat,
                hero_name: self.config.hero_name.clone(),
                hero_cards: state
                    .players
                    .get(&self.hero_seat)
                    .map(|p| p.cards.clone())
                    .unwrap_or_default(),
                flop: community.get(0..3).map(<[Card]>::to_vec).unwrap_or_default(),
                turn: community.get(3).copied(),
                river: community.get(4).copied(),
                actions: self.hand_actions.clone(),
                pot_total,
                winners,
                uncalled_bets: self.uncalled_returns.clone(),
            };
            debug!("{}", record.summary());
            self.completed_hands.push(record);
        }
        self.street = None;
    }

    fn sync_state(&mut self) {
        let pot_total = self.pot.total_pot();
        if let Some(state) = self.game_state.as_mut() {
            state.pot = pot_total;
            match self.street.as_ref() {
                Some(street) => {
                    state.current_bet = street.current_bet;
                    state.min_raise = street.min_raise;
                }
                None => {
                    state.current_bet = 0;
                    state.min_raise = 0;
                }
            }
            if state.phase == GamePhase::Complete {
                state.current_seat = None;
            }
        }
    }
}

/// The next occupied seat clockwise from `from`.
fn next_ring_seat(seats: &[Seat], from: Seat) -> Seat {
    let idx = seats.iter().position(|&s| s == from).unwrap_or(0);
    seats[(idx + 1) % seats.len()]
}

/// All seats in ring order starting left of `from`, ending on `from`.
fn ring_from(seats: &[Seat], from: Seat) -> Vec<Seat> {
    let idx = seats.iter().position(|&s| s == from).unwrap_or(0);
    (1..=seats.len()).map(|i| seats[(idx + i) % seats.len()]).collect()
}

fn seat_with_position(
    positions: &BTreeMap<Seat, Position>,
    position: Position,
) -> Option<Seat> {
    positions
        .iter()
        .find(|&(_, &p)| p == position)
        .map(|(&seat, _)| seat)
}

fn first_actor_after(
    players: &BTreeMap<Seat, PlayerState>,
    seats: &[Seat],
    after: Seat,
) -> Option<Seat> {
    ring_from(seats, after)
        .into_iter()
        .find(|seat| players.get(seat).is_some_and(|p| !p.is_folded && !p.is_all_in))
}

fn next_to_act(
    street: &StreetState,
    players: &BTreeMap<Seat, PlayerState>,
    seats: &[Seat],
    after: Seat,
) -> Option<Seat> {
    for seat in ring_from(seats, after) {
        let Some(player) = players.get(&seat) else { continue };
        if player.is_folded || player.is_all_in {
            continue;
        }
        if player.current_bet < street.current_bet || !street.acted_seats.contains(&seat) {
            return Some(seat);
        }
    }
    // Betting is not settled but no one behind owes chips; give the
    // first live seat its turn.
    players
        .values()
        .find(|p| !p.is_folded && !p.is_all_in)
        .map(|p| p.seat)
}

/// A street is finished when at most one player remains, or everyone
/// still able to act has matched the bet and had their turn since the
/// last raise.
fn street_is_complete(street: &StreetState, players: &BTreeMap<Seat, PlayerState>) -> bool {
    let active: Vec<&PlayerState> = players.values().filter(|p| !p.is_folded).collect();
    if active.len() <= 1 {
        return true;
    }
    let can_act: Vec<&&PlayerState> = active.iter().filter(|p| !p.is_all_in).collect();
    let matched = can_act.iter().all(|p| p.current_bet == street.current_bet);
    let all_acted = can_act.iter().all(|p| street.acted_seats.contains(&p.seat));
    if street.last_aggressor.is_some() {
        matched && (all_acted || street.action_count >= active.len())
    } else {
        matched && all_acted
    }
}
