//! Action legality.
//!
//! All bet amounts in and out of this module are TOTAL street bets, not
//! increments. Short stacks never make a call or raise illegal; the
//! amount silently downgrades to an all-in total instead.

use thiserror::Error;

use super::entities::{ActionKind, Chips, PlayerState};

#[derive(Debug, Error, Eq, PartialEq)]
pub enum ActionError {
    #[error("cannot check facing a bet of ${to_call}")]
    CheckFacingBet { to_call: Chips },
    #[error("nothing to call")]
    NothingToCall,
    #[error("cannot bet into an existing bet, raise instead")]
    BetFacingBet,
    #[error("no chips left to bet")]
    NoChips,
    #[error("nothing to raise, bet instead")]
    NothingToRaise,
}

/// Actions the player may legally take right now.
pub fn available_actions(
    player: &PlayerState,
    current_bet: Chips,
    min_raise: Chips,
) -> Vec<ActionKind> {
    if player.is_folded || player.is_all_in {
        return Vec::new();
    }
    let to_call = current_bet.saturating_sub(player.current_bet);
    let mut actions = Vec::new();
    if to_call > 0 {
        actions.push(ActionKind::Fold);
    }
    if to_call == 0 {
        actions.push(ActionKind::Check);
    } else if player.stack >= to_call {
        actions.push(ActionKind::Call);
    }
    if to_call == 0 && player.stack > 0 {
        actions.push(ActionKind::Bet);
    }
    if to_call > 0 && player.stack >= to_call + min_raise {
        actions.push(ActionKind::Raise);
    }
    if to_call > 0 && player.stack > 0 {
        actions.push(ActionKind::AllIn);
    }
    actions
}

/// Validates an action, resolving `amount` into the total street bet
/// the player ends up at.
pub fn validate(
    kind: ActionKind,
    amount: Chips,
    player: &PlayerState,
    current_bet: Chips,
    min_raise: Chips,
    big_blind: Chips,
) -> Result<Chips, ActionError> {
    let to_call = current_bet.saturating_sub(player.current_bet);
    match kind {
        ActionKind::Fold => Ok(0),
        ActionKind::Check => {
            if to_call != 0 {
                return Err(ActionError::CheckFacingBet { to_call });
            }
            Ok(0)
        }
        ActionKind::Call => {
            if to_call == 0 {
                return Err(ActionError::NothingToCall);
            }
            if player.stack < to_call {
                Ok(player.current_bet + player.stack)
            } else {
                Ok(player.current_bet + to_call)
            }
        }
        ActionKind::Bet => {
            if to_call != 0 {
                return Err(ActionError::BetFacingBet);
            }
            if player.stack == 0 {
                return Err(ActionError::NoChips);
            }
            // The clamp includes chips already committed this street, so
            // a big blind betting its option can never resolve below the
            // blind it has posted.
            Ok(amount.max(big_blind).min(player.stack + player.current_bet))
        }
        ActionKind::Raise => {
            if to_call == 0 {
                return Err(ActionError::NothingToRaise);
            }
            if player.stack < to_call || player.stack < to_call + min_raise {
                return Ok(player.current_bet + player.stack);
            }
            let min_total = to_call + min_raise;
            Ok(amount.max(min_total).min(player.stack + player.current_bet))
        }
        ActionKind::PostBlind | ActionKind::AllIn => Ok(player.current_bet + player.stack),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(stack: Chips, current_bet: Chips) -> PlayerState {
        let mut p = PlayerState::new(1, "tester", stack);
        p.current_bet = current_bet;
        p
    }

    #[test]
    fn test_no_actions_when_folded_or_all_in() {
        let mut p = player(100, 0);
        p.is_folded = true;
        assert!(available_actions(&p, 20, 20).is_empty());

        let mut p = player(0, 100);
        p.is_all_in = true;
        assert!(available_actions(&p, 100, 20).is_empty());
    }

    #[test]
    fn test_available_actions_facing_bet() {
        let p = player(200, 0);
        let actions = available_actions(&p, 20, 20);
        assert_eq!(
            actions,
            vec![ActionKind::Fold, ActionKind::Call, ActionKind::Raise, ActionKind::AllIn]
        );
    }

    #[test]
    fn test_available_actions_unopened() {
        let p = player(200, 0);
        let actions = available_actions(&p, 0, 20);
        assert_eq!(actions, vec![ActionKind::Check, ActionKind::Bet]);
    }

    #[test]
    fn test_short_stack_loses_raise_keeps_all_in() {
        let p = player(25, 0);
        let actions = available_actions(&p, 20, 20);
        assert_eq!(actions, vec![ActionKind::Fold, ActionKind::Call, ActionKind::AllIn]);
    }

    #[test]
    fn test_check_facing_bet_rejected() {
        let p = player(100, 0);
        assert_eq!(
            validate(ActionKind::Check, 0, &p, 20, 20, 20),
            Err(ActionError::CheckFacingBet { to_call: 20 })
        );
    }

    #[test]
    fn test_call_resolves_to_matching_total() {
        let p = player(100, 10);
        assert_eq!(validate(ActionKind::Call, 0, &p, 60, 20, 20), Ok(60));
    }

    #[test]
    fn test_short_call_downgrades_to_all_in_total() {
        let p = player(30, 10);
        assert_eq!(validate(ActionKind::Call, 0, &p, 100, 20, 20), Ok(40));
    }

    #[test]
    fn test_call_with_nothing_owed_rejected() {
        let p = player(100, 20);
        assert_eq!(validate(ActionKind::Call, 0, &p, 20, 20, 20), Err(ActionError::NothingToCall));
    }

    #[test]
    fn test_bet_clamped_to_big_blind_minimum() {
        let p = player(500, 0);
        assert_eq!(validate(ActionKind::Bet, 5, &p, 0, 20, 20), Ok(20));
    }

    #[test]
    fn test_bet_clamped_to_stack() {
        let p = player(80, 0);
        assert_eq!(validate(ActionKind::Bet, 500, &p, 0, 20, 20), Ok(80));
    }

    #[test]
    fn test_bet_total_never_below_committed_chips() {
        // A short-stacked big blind betting its option in a limped pot:
        // 20 posted, 10 behind. The resolved total must cover the blind.
        let p = player(10, 20);
        assert_eq!(validate(ActionKind::Bet, 100, &p, 20, 20, 20), Ok(30));
        assert_eq!(validate(ActionKind::Bet, 5, &p, 20, 20, 20), Ok(20));
    }

    #[test]
    fn test_oversized_raise_clamps_to_stack() {
        let p = player(50, 0);
        assert_eq!(validate(ActionKind::Raise, 999_999, &p, 20, 20, 20), Ok(50));
    }

    #[test]
    fn test_undersized_raise_bumped_to_minimum() {
        let p = player(500, 0);
        assert_eq!(validate(ActionKind::Raise, 25, &p, 20, 20, 20), Ok(40));
    }

    #[test]
    fn test_short_raise_downgrades_to_all_in_total() {
        let p = player(30, 0);
        assert_eq!(validate(ActionKind::Raise, 60, &p, 20, 20, 20), Ok(30));
    }

    #[test]
    fn test_all_in_total_includes_street_bet() {
        let p = player(70, 30);
        assert_eq!(validate(ActionKind::AllIn, 0, &p, 100, 20, 20), Ok(100));
    }
}
