//! Rule-based decision making.
//!
//! An engine samples its tendencies (vpip, pfr, 3-bet, c-bet, fold to
//! c-bet) once when created, so an agent keeps a consistent personality
//! across hands. Aggression is resampled on every decision, which makes
//! individual decisions swing within the style's range.

use log::debug;
use rand::{Rng, SeedableRng, rngs::SmallRng};

use crate::game::entities::{ActionKind, Card, Chips};

use super::styles::{PlayStyle, Range, StyleTable};

/// Coarse strength bands over the 0..=100 score scale.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum HandStrength {
    Trash,
    Weak,
    Medium,
    Good,
    Strong,
    Monster,
}

impl HandStrength {
    pub fn from_score(score: u8) -> Self {
        match score {
            85.. => Self::Monster,
            70.. => Self::Strong,
            55.. => Self::Good,
            35.. => Self::Medium,
            20.. => Self::Weak,
            _ => Self::Trash,
        }
    }
}

/// What the engine sees when asked for a decision. All chip amounts are
/// total street-bet figures except `call_amount` and `pot`.
#[derive(Clone, Debug)]
pub struct DecisionContext {
    pub hole_cards: Vec<Card>,
    pub community_cards: Vec<Card>,
    pub pot: Chips,
    /// Extra chips needed to match the current bet.
    pub call_amount: Chips,
    pub min_raise: Chips,
    /// Largest total street bet the player can reach (stack + current bet).
    pub max_raise: Chips,
    /// The player's current street bet.
    pub player_bet: Chips,
    pub is_preflop: bool,
    pub can_check: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Decision {
    pub kind: ActionKind,
    /// Total street bet to reach; ignored for fold/check/call.
    pub amount: Chips,
    pub reasoning: &'static str,
}

impl Decision {
    fn simple(kind: ActionKind, reasoning: &'static str) -> Self {
        Self {
            kind,
            amount: 0,
            reasoning,
        }
    }
}

// Preflop hand scores keyed by canonical notation: high card first,
// "s" appended when suited, pairs doubled. Unlisted hands score 20.
const PREFLOP_SCORES: &[(&str, u8)] = &[
    ("AA", 100),
    ("KK", 95),
    ("QQ", 90),
    ("AK", 88),
    ("JJ", 85),
    ("AKs", 85),
    ("AQ", 80),
    ("TT", 78),
    ("AQs", 77),
    ("AJs", 72),
    ("AJ", 70),
    ("KQs", 70),
    ("KQ", 68),
    ("99", 67),
    ("KJs", 65),
    ("ATs", 63),
    ("KJ", 62),
    ("88", 61),
    ("AT", 60),
    ("QTs", 56),
    ("77", 55),
    ("QJ", 54),
    ("KT", 53),
    ("A9s", 52),
    ("JTs", 52),
    ("JT", 50),
    ("66", 48),
    ("A8s", 47),
    ("55", 46),
    ("44", 42),
    ("T9s", 41),
    ("33", 40),
    ("98s", 39),
    ("22", 38),
    ("K9s", 36),
    ("A5s", 35),
    ("Q9s", 34),
    ("87s", 33),
    ("A2s", 32),
    ("76s", 31),
    ("65s", 29),
    ("54s", 27),
];

const UNLISTED_SCORE: u8 = 20;

/// Rule-based poker decision engine parameterized by a play style.
#[derive(Clone, Debug)]
pub struct DecisionEngine {
    style: PlayStyle,
    rng: SmallRng,
    vpip: f64,
    pfr: f64,
    three_bet: f64,
    cbet: f64,
    fold_to_cbet: f64,
    af_range: Range,
}

impl DecisionEngine {
    #[must_use]
    pub fn new(style: PlayStyle, table: &StyleTable) -> Self {
        Self::with_rng(style, table, SmallRng::from_os_rng())
    }

    #[must_use]
    pub fn with_rng(style: PlayStyle, table: &StyleTable, mut rng: SmallRng) -> Self {
        let profile = table.profile(style);
        let vpip = profile.vpip.sample(&mut rng);
        let pfr = profile.pfr.sample(&mut rng);
        let three_bet = profile.three_bet.sample(&mut rng);
        let cbet = profile.cbet.sample(&mut rng);
        let fold_to_cbet = profile.fold_to_cbet.sample(&mut rng);
        Self {
            style,
            rng,
            vpip,
            pfr,
            three_bet,
            cbet,
            fold_to_cbet,
            af_range: profile.af,
        }
    }

    pub fn style(&self) -> PlayStyle {
        self.style
    }

    /// The sampled voluntary-play tendency for this agent.
    pub fn vpip(&self) -> f64 {
        self.vpip
    }

    pub fn pfr(&self) -> f64 {
        self.pfr
    }

    pub fn three_bet(&self) -> f64 {
        self.three_bet
    }

    pub fn cbet(&self) -> f64 {
        self.cbet
    }

    pub fn fold_to_cbet(&self) -> f64 {
        self.fold_to_cbet
    }

    /// Midpoint of the style's aggression range, for reporting.
    pub fn aggression(&self) -> f64 {
        (self.af_range.0 + self.af_range.1) / 2.0
    }

    /// Scores two hole cards on the 0..=100 scale. Loose styles bump
    /// marginal hands up, tight styles bump them down.
    pub fn evaluate_preflop_hand(&self, hole_cards: &[Card]) -> u8 {
        if hole_cards.len() != 2 {
            return 0;
        }
        let (a, b) = (hole_cards[0], hole_cards[1]);
        let (high, low) = if a.0 >= b.0 { (a, b) } else { (b, a) };
        let mut key = format!("{}{}", Card::value_char(high.0), Card::value_char(low.0));
        if high.0 != low.0 && high.1 == low.1 {
            key.push('s');
        }
        let base = PREFLOP_SCORES
            .iter()
            .find(|&&(k, _)| k == key)
            .map_or(UNLISTED_SCORE, |&(_, score)| score);
        if self.vpip > 0.40 {
            base.saturating_add(10).min(100)
        } else if self.vpip < 0.25 {
            base.saturating_sub(10)
        } else {
            base
        }
    }

    /// Crude made-hand score from rank multiplicities across hole and
    /// board cards. Good enough to separate monsters from air.
    pub fn evaluate_postflop_hand(&self, hole_cards: &[Card], community_cards: &[Card]) -> u8 {
        let cards: Vec<Card> = hole_cards.iter().chain(community_cards).copied().collect();
        if cards.is_empty() {
            return 0;
        }
        let mut counts = [0u8; 15];
        for card in &cards {
            counts[card.0 as usize] += 1;
        }
        let pairs = counts.iter().filter(|&&c| c == 2).count();
        let trips = counts.iter().filter(|&&c| c == 3).count();
        let quads = counts.iter().any(|&c| c == 4);
        let all_one_suit = cards.iter().all(|c| c.1 == cards[0].1);

        if quads {
            90
        } else if trips >= 1 && (pairs >= 1 || trips >= 2) {
            80
        } else if all_one_suit && cards.len() >= 5 {
            75
        } else if trips >= 1 {
            65
        } else if pairs >= 2 {
            55
        } else if pairs == 1 {
            40
        } else {
            let high = cards.iter().map(|c| c.0).max().unwrap_or(0);
            high.saturating_sub(5).max(10)
        }
    }

    pub fn make_decision(&mut self, ctx: &DecisionContext) -> Decision {
        let score = if ctx.is_preflop {
            self.evaluate_preflop_hand(&ctx.hole_cards)
        } else {
            self.evaluate_postflop_hand(&ctx.hole_cards, &ctx.community_cards)
        };
        let (mut fold_below, mut call_below, mut raise_at) = if ctx.is_preflop {
            (25.0, 45.0, 65.0)
        } else {
            (20.0, 40.0, 60.0)
        };

        let af = self.af_range.sample(&mut self.rng);
        if af > 2.5 {
            fold_below += 5.0;
            call_below -= 5.0;
            raise_at -= 10.0;
        } else if af < 1.5 {
            fold_below -= 5.0;
            call_below += 5.0;
            raise_at += 10.0;
        }

        let adjusted = f64::from(score) + self.rng.random_range(-15.0..=15.0);
        debug!(
            "{} decision: score {score}, adjusted {adjusted:.1}, af {af:.2}",
            self.style
        );

        if adjusted < fold_below {
            if ctx.can_check && ctx.call_amount == 0 {
                return Decision::simple(ActionKind::Check, "weak hand, checking for free");
            }
            let bluff_freq = if af > 2.5 { 0.05 } else { 0.02 };
            if ctx.max_raise >= ctx.min_raise && self.rng.random_bool(bluff_freq) {
                let headroom = ctx
                    .max_raise
                    .saturating_sub(ctx.player_bet)
                    .saturating_sub(ctx.call_amount);
                let increment = self.raise_size(ctx.min_raise, headroom);
                return Decision {
                    kind: ActionKind::Raise,
                    amount: ctx.player_bet + ctx.call_amount + increment,
                    reasoning: "turning a weak hand into a bluff",
                };
            }
            return Decision::simple(ActionKind::Fold, "weak hand, not worth the price");
        }

        if adjusted < raise_at {
            if ctx.call_amount == 0 {
                return Decision::simple(ActionKind::Check, "medium hand, keeping the pot small");
            }
            let pot_odds = pot_odds(ctx.pot, ctx.call_amount);
            if f64::from(score) > call_below || pot_odds < 0.3 {
                return Decision {
                    kind: ActionKind::Call,
                    amount: ctx.player_bet + ctx.call_amount,
                    reasoning: "decent hand at a fair price",
                };
            }
            return Decision::simple(ActionKind::Fold, "medium hand, price too steep");
        }

        if ctx.call_amount == 0 {
            let amount = self.bet_size(ctx.pot, ctx.min_raise, ctx.max_raise);
            return Decision {
                kind: ActionKind::Bet,
                amount,
                reasoning: "strong hand, betting for value",
            };
        }
        if ctx.max_raise >= ctx.min_raise + ctx.call_amount + ctx.player_bet {
            let headroom = ctx
                .max_raise
                .saturating_sub(ctx.player_bet)
                .saturating_sub(ctx.call_amount);
            let increment = self.raise_size(ctx.min_raise, headroom);
            return Decision {
                kind: ActionKind::Raise,
                amount: ctx.player_bet + ctx.call_amount + increment,
                reasoning: "strong hand, raising for value",
            };
        }
        if ctx.call_amount > 0 {
            return Decision {
                kind: ActionKind::Call,
                amount: ctx.player_bet + ctx.call_amount,
                reasoning: "strong hand but no room to raise",
            };
        }
        Decision::simple(ActionKind::Check, "strong hand, nothing to call")
    }

    /// Picks a pot-fraction bet, clamped and rounded to 10-chip units.
    fn bet_size(&mut self, pot: Chips, min_bet: Chips, max_bet: Chips) -> Chips {
        let af = self.af_range.sample(&mut self.rng);
        let fraction = if af > 2.5 {
            self.rng.random_range(0.5..=0.8)
        } else {
            self.rng.random_range(0.4..=0.7)
        };
        let target = f64::from(pot) * fraction;
        let clamped = target.clamp(f64::from(min_bet), f64::from(max_bet.max(min_bet)));
        round_to_ten(clamped)
    }

    /// Picks a raise increment as a multiple of the minimum raise.
    fn raise_size(&mut self, min_raise: Chips, max_amount: Chips) -> Chips {
        let af = self.af_range.sample(&mut self.rng);
        let multiplier = if af > 2.5 {
            self.rng.random_range(2.5..=3.5)
        } else {
            self.rng.random_range(2.0..=3.0)
        };
        let target = f64::from(min_raise) * multiplier;
        let clamped = target.clamp(f64::from(min_raise), f64::from(max_amount.max(min_raise)));
        round_to_ten(clamped)
    }
}

fn pot_odds(pot: Chips, call_amount: Chips) -> f64 {
    if call_amount == 0 {
        return 1.0;
    }
    f64::from(call_amount) / f64::from(pot + call_amount)
}

fn round_to_ten(value: f64) -> Chips {
    let rounded = (value / 10.0).round() * 10.0;
    rounded.max(0.0) as Chips
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::entities::Suit;
    use std::str::FromStr;

    fn cards(s: &str) -> Vec<Card> {
        s.split_whitespace()
            .map(|c| Card::from_str(c).unwrap())
            .collect()
    }

    fn engine(style: PlayStyle, seed: u64) -> DecisionEngine {
        DecisionEngine::with_rng(style, &StyleTable::default(), SmallRng::seed_from_u64(seed))
    }

    fn facing_bet(hole: &str) -> DecisionContext {
        DecisionContext {
            hole_cards: cards(hole),
            community_cards: Vec::new(),
            pot: 30,
            call_amount: 20,
            min_raise: 20,
            max_raise: 1000,
            player_bet: 0,
            is_preflop: true,
            can_check: false,
        }
    }

    #[test]
    fn test_pocket_aces_score_monster() {
        let engine = engine(PlayStyle::TightAggressive, 1);
        let score = engine.evaluate_preflop_hand(&[
            Card(14, Suit::Hearts),
            Card(14, Suit::Diamonds),
        ]);
        assert!(score >= 85);
        assert_eq!(HandStrength::from_score(score), HandStrength::Monster);
    }

    #[test]
    fn test_suited_key_construction() {
        let engine = engine(PlayStyle::TightAggressive, 2);
        let suited = engine.evaluate_preflop_hand(&cards("Ah Kh"));
        let offsuit = engine.evaluate_preflop_hand(&cards("Ah Kd"));
        // Both listed hands, and the shared vpip nudge cancels out.
        assert_ne!(suited, offsuit);
    }

    #[test]
    fn test_loose_style_bumps_marginal_hands() {
        let table = StyleTable::default();
        let loose =
            DecisionEngine::with_rng(PlayStyle::LooseAggressive, &table, SmallRng::seed_from_u64(5));
        let tight =
            DecisionEngine::with_rng(PlayStyle::TightPassive, &table, SmallRng::seed_from_u64(5));
        let hole = cards("7c 2d");
        assert!(loose.evaluate_preflop_hand(&hole) > tight.evaluate_preflop_hand(&hole));
    }

    #[test]
    fn test_postflop_scores_order_made_hands() {
        let engine = engine(PlayStyle::TightAggressive, 3);
        let quads = engine.evaluate_postflop_hand(&cards("9h 9c"), &cards("9d 9s Kh"));
        let trips = engine.evaluate_postflop_hand(&cards("9h 9c"), &cards("9d 4s Kh"));
        let pair = engine.evaluate_postflop_hand(&cards("9h 9c"), &cards("2d 4s Kh"));
        let air = engine.evaluate_postflop_hand(&cards("9h 8c"), &cards("2d 4s Kh"));
        assert_eq!(quads, 90);
        assert_eq!(trips, 65);
        assert_eq!(pair, 40);
        assert!(air < 40);
    }

    #[test]
    fn test_monsters_mostly_raise_facing_a_bet() {
        let mut raises = 0;
        for seed in 0..100 {
            let mut engine = engine(PlayStyle::TightAggressive, seed);
            let decision = engine.make_decision(&facing_bet("Ah Ad"));
            if decision.kind == ActionKind::Raise {
                raises += 1;
            }
        }
        assert!(raises > 80, "expected aces to raise most of the time, got {raises}/100");
    }

    #[test]
    fn test_trash_mostly_folds_facing_a_bet() {
        let mut folds = 0;
        for seed in 0..100 {
            let mut engine = engine(PlayStyle::TightPassive, seed);
            let decision = engine.make_decision(&facing_bet("7c 2d"));
            if decision.kind == ActionKind::Fold {
                folds += 1;
            }
        }
        assert!(folds > 70, "expected trash to fold most of the time, got {folds}/100");
    }

    #[test]
    fn test_raise_amounts_stay_legal_and_rounded() {
        for seed in 0..200 {
            let mut engine = engine(PlayStyle::LooseAggressive, seed);
            let ctx = facing_bet("Ah Ad");
            let decision = engine.make_decision(&ctx);
            if decision.kind == ActionKind::Raise {
                assert_eq!(decision.amount % 10, 0);
                assert!(decision.amount <= ctx.max_raise);
                assert!(decision.amount >= ctx.call_amount + ctx.min_raise);
            }
        }
    }

    #[test]
    fn test_weak_hand_checks_when_free() {
        for seed in 0..50 {
            let mut engine = engine(PlayStyle::TightPassive, seed);
            let ctx = DecisionContext {
                hole_cards: cards("7c 2d"),
                community_cards: cards("Kh 9s 4c"),
                pot: 60,
                call_amount: 0,
                min_raise: 20,
                max_raise: 1000,
                player_bet: 0,
                is_preflop: false,
                can_check: true,
            };
            let decision = engine.make_decision(&ctx);
            assert_ne!(decision.kind, ActionKind::Fold, "no reason to fold a free card");
        }
    }

    #[test]
    fn test_deterministic_with_same_seed() {
        let mut a = engine(PlayStyle::LooseAggressive, 9);
        let mut b = engine(PlayStyle::LooseAggressive, 9);
        let ctx = facing_bet("Qh Qd");
        assert_eq!(a.make_decision(&ctx), b.make_decision(&ctx));
    }
}
