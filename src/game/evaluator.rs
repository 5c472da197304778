//! Poker hand evaluation.
//!
//! Evaluates 2 to 7 cards into a comparable `HandValue`. Seven-card
//! hands (two hole cards plus the board) are scored as the best of all
//! 5-card subsets. Fewer than five cards get a degraded partial rank so
//! early-street strength reads are still comparable.

use std::{cmp::Ordering, collections::BTreeMap};

use serde::{Deserialize, Serialize};

use super::entities::{Card, Seat, Suit, Value};

#[derive(
    Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
pub enum HandCategory {
    HighCard,
    Pair,
    TwoPair,
    ThreeOfAKind,
    Straight,
    Flush,
    FullHouse,
    FourOfAKind,
    StraightFlush,
    RoyalFlush,
}

/// A fully ordered hand strength: category first, then the tie-break
/// keys compared lexicographically.
#[derive(Clone, Debug, Deserialize, Eq, Ord, PartialEq, PartialOrd, Serialize)]
pub struct HandValue {
    pub category: HandCategory,
    pub keys: Vec<Value>,
}

/// Evaluates any number of cards into a `HandValue`.
///
/// Never errors: fewer than 2 cards collapses to the weakest possible
/// high card, and 2 to 4 cards get a partial evaluation.
pub fn evaluate(cards: &[Card]) -> HandValue {
    match cards.len() {
        0 | 1 => HandValue {
            category: HandCategory::HighCard,
            keys: vec![0],
        },
        2..=4 => evaluate_partial(cards),
        5 => evaluate_five(cards),
        n => {
            // Best of every 5-card subset.
            let mut best: Option<HandValue> = None;
            for mask in 0u32..(1 << n) {
                if mask.count_ones() != 5 {
                    continue;
                }
                let subset: Vec<Card> = (0..n)
                    .filter(|i| mask & (1 << i) != 0)
                    .map(|i| cards[i])
                    .collect();
                let value = evaluate_five(&subset);
                if best.as_ref().is_none_or(|b| value > *b) {
                    best = Some(value);
                }
            }
            best.unwrap_or(HandValue {
                category: HandCategory::HighCard,
                keys: vec![0],
            })
        }
    }
}

/// Compares two hand values: category first, then the tie-break keys.
pub fn compare(a: &HandValue, b: &HandValue) -> Ordering {
    a.cmp(b)
}

/// Determines the winning seats from hole cards plus the shared board.
/// Every seat tied for the best hand is returned, in seat order.
pub fn winners(board: &[Card], holes: &BTreeMap<Seat, Vec<Card>>) -> Vec<Seat> {
    let mut best: Option<HandValue> = None;
    let mut winning = Vec::new();
    for (&seat, hole) in holes {
        let mut cards = hole.clone();
        cards.extend_from_slice(board);
        let value = evaluate(&cards);
        match &best {
            Some(b) if value < *b => {}
            Some(b) if value == *b => winning.push(seat),
            _ => {
                best = Some(value);
                winning = vec![seat];
            }
        }
    }
    winning
}

/// Ranks present in the hand, ordered by count descending then rank
/// descending, deduplicated.
fn grouped_ranks(cards: &[Card]) -> Vec<(Value, usize)> {
    let mut counts: BTreeMap<Value, usize> = BTreeMap::new();
    for card in cards {
        *counts.entry(card.0).or_insert(0) += 1;
    }
    let mut groups: Vec<(Value, usize)> = counts.into_iter().collect();
    groups.sort_by(|a, b| b.1.cmp(&a.1).then(b.0.cmp(&a.0)));
    groups
}

fn evaluate_partial(cards: &[Card]) -> HandValue {
    let groups = grouped_ranks(cards);
    let pairs: Vec<Value> = groups.iter().filter(|&&(_, c)| c == 2).map(|&(r, _)| r).collect();
    if let Some(&(rank, 4)) = groups.first() {
        return HandValue {
            category: HandCategory::FourOfAKind,
            keys: vec![rank],
        };
    }
    if let Some(&(rank, 3)) = groups.first() {
        return HandValue {
            category: HandCategory::ThreeOfAKind,
            keys: vec![rank],
        };
    }
    if pairs.len() >= 2 {
        return HandValue {
            category: HandCategory::TwoPair,
            keys: vec![pairs[0], pairs[1]],
        };
    }
    if pairs.len() == 1 {
        return HandValue {
            category: HandCategory::Pair,
            keys: vec![pairs[0]],
        };
    }
    let mut ranks: Vec<Value> = cards.iter().map(|c| c.0).collect();
    ranks.sort_unstable_by(|a, b| b.cmp(a));
    HandValue {
        category: HandCategory::HighCard,
        keys: ranks,
    }
}

/// Detects a straight in exactly 5 distinct-or-not ranks, returning the
/// high card. The wheel (A-2-3-4-5) counts as a 5-high straight.
fn straight_high(ranks_desc: &[Value]) -> Option<Value> {
    let mut unique: Vec<Value> = ranks_desc.to_vec();
    unique.dedup();
    if unique.len() != 5 {
        return None;
    }
    if unique[0] - unique[4] == 4 {
        return Some(unique[0]);
    }
    if unique == [14, 5, 4, 3, 2] {
        return Some(5);
    }
    None
}

fn evaluate_five(cards: &[Card]) -> HandValue {
    debug_assert_eq!(cards.len(), 5);
    let mut ranks: Vec<Value> = cards.iter().map(|c| c.0).collect();
    ranks.sort_unstable_by(|a, b| b.cmp(a));
    let groups = grouped_ranks(cards);
    let first_suit: Suit = cards[0].1;
    let is_flush = cards.iter().all(|c| c.1 == first_suit);
    let straight = straight_high(&ranks);

    if is_flush && straight == Some(14) {
        return HandValue {
            category: HandCategory::RoyalFlush,
            keys: vec![14],
        };
    }
    if is_flush && let Some(high) = straight {
        return HandValue {
            category: HandCategory::StraightFlush,
            keys: vec![high],
        };
    }
    if groups[0].1 == 4 {
        return HandValue {
            category: HandCategory::FourOfAKind,
            keys: vec![groups[0].0, groups[1].0],
        };
    }
    if groups[0].1 == 3 && groups[1].1 == 2 {
        return HandValue {
            category: HandCategory::FullHouse,
            keys: vec![groups[0].0, groups[1].0],
        };
    }
    if is_flush {
        return HandValue {
            category: HandCategory::Flush,
            keys: ranks,
        };
    }
    if let Some(high) = straight {
        return HandValue {
            category: HandCategory::Straight,
            keys: vec![high],
        };
    }
    if groups[0].1 == 3 {
        return HandValue {
            category: HandCategory::ThreeOfAKind,
            keys: vec![groups[0].0, groups[1].0, groups[2].0],
        };
    }
    if groups[0].1 == 2 && groups[1].1 == 2 {
        return HandValue {
            category: HandCategory::TwoPair,
            keys: vec![groups[0].0, groups[1].0, groups[2].0],
        };
    }
    if groups[0].1 == 2 {
        return HandValue {
            category: HandCategory::Pair,
            keys: vec![groups[0].0, groups[1].0, groups[2].0, groups[3].0],
        };
    }
    HandValue {
        category: HandCategory::HighCard,
        keys: ranks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn cards(s: &str) -> Vec<Card> {
        s.split_whitespace()
            .map(|c| Card::from_str(c).unwrap())
            .collect()
    }

    #[test]
    fn test_royal_flush() {
        let value = evaluate(&cards("Ah Kh Qh Jh Th"));
        assert_eq!(value.category, HandCategory::RoyalFlush);
    }

    #[test]
    fn test_straight_flush_high_key() {
        let value = evaluate(&cards("9s 8s 7s 6s 5s"));
        assert_eq!(value.category, HandCategory::StraightFlush);
        assert_eq!(value.keys, vec![9]);
    }

    #[test]
    fn test_wheel_is_five_high_straight() {
        let value = evaluate(&cards("Ah 2c 3d 4s 5h"));
        assert_eq!(value.category, HandCategory::Straight);
        assert_eq!(value.keys, vec![5]);

        let six_high = evaluate(&cards("6h 2c 3d 4s 5h"));
        assert!(six_high > value);
    }

    #[test]
    fn test_four_of_a_kind_kicker() {
        let value = evaluate(&cards("9h 9c 9d 9s Kh"));
        assert_eq!(value.category, HandCategory::FourOfAKind);
        assert_eq!(value.keys, vec![9, 13]);
    }

    #[test]
    fn test_full_house_keys() {
        let value = evaluate(&cards("3h 3c 3d Kh Ks"));
        assert_eq!(value.category, HandCategory::FullHouse);
        assert_eq!(value.keys, vec![3, 13]);
    }

    #[test]
    fn test_two_pair_ordering() {
        let high = evaluate(&cards("Ah Ac 9d 9s 2h"));
        let low = evaluate(&cards("Kh Kc Qd Qs Ah"));
        assert_eq!(high.category, HandCategory::TwoPair);
        assert_eq!(high.keys, vec![14, 9, 2]);
        assert!(high > low);
    }

    #[test]
    fn test_pair_kickers_break_ties() {
        let a = evaluate(&cards("Ah Ac Kd 9s 2h"));
        let b = evaluate(&cards("As Ad Kh 8s 2c"));
        assert!(a > b);
    }

    #[test]
    fn test_seven_card_uses_best_five() {
        let value = evaluate(&cards("Ah Kh Qh Jh Th 2c 2d"));
        assert_eq!(value.category, HandCategory::RoyalFlush);
    }

    #[test]
    fn test_flush_beats_straight() {
        let flush = evaluate(&cards("Ah 9h 7h 5h 2h"));
        let straight = evaluate(&cards("Ah Kc Qd Js Th"));
        assert!(flush > straight);
    }

    #[test]
    fn test_partial_two_cards() {
        let pair = evaluate(&cards("Ah Ad"));
        assert_eq!(pair.category, HandCategory::Pair);
        assert_eq!(pair.keys, vec![14]);

        let high = evaluate(&cards("Ah Kd"));
        assert_eq!(high.category, HandCategory::HighCard);
        assert_eq!(high.keys, vec![14, 13]);
    }

    #[test]
    fn test_partial_four_cards() {
        let trips = evaluate(&cards("7h 7d 7c 2s"));
        assert_eq!(trips.category, HandCategory::ThreeOfAKind);
        assert_eq!(trips.keys, vec![7]);

        let two_pair = evaluate(&cards("7h 7d 2c 2s"));
        assert_eq!(two_pair.category, HandCategory::TwoPair);
        assert_eq!(two_pair.keys, vec![7, 2]);
    }

    #[test]
    fn test_degenerate_inputs_never_panic() {
        assert_eq!(evaluate(&[]).keys, vec![0]);
        assert_eq!(evaluate(&cards("Ah")).keys, vec![0]);
    }

    #[test]
    fn test_compare_orders_by_category_then_keys() {
        let flush = evaluate(&cards("Ah 9h 7h 5h 2h"));
        let straight = evaluate(&cards("9c 8d 7s 6h 5c"));
        assert_eq!(compare(&flush, &straight), std::cmp::Ordering::Greater);
        assert_eq!(compare(&straight, &flush), std::cmp::Ordering::Less);
        assert_eq!(compare(&flush, &flush.clone()), std::cmp::Ordering::Equal);
    }

    #[test]
    fn test_winners_split_on_board_playing() {
        let board = cards("Ah Kh Qh Jh Th");
        let holes = BTreeMap::from([(1, cards("2c 3d")), (2, cards("4s 5c"))]);
        assert_eq!(winners(&board, &holes), vec![1, 2]);
    }

    #[test]
    fn test_winners_single_best_hand() {
        let board = cards("Ah Kd 7c 4s 2h");
        let holes = BTreeMap::from([(1, cards("As Ac")), (2, cards("Kh Ks")), (3, cards("7d 7h"))]);
        assert_eq!(winners(&board, &holes), vec![1]);
    }
}
