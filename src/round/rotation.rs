//! Turn rotation.
//!
//! Seats rotate in ascending order and wrap. Players without dice keep their
//! seat but are skipped.

use crate::core::{PlayerId, Seating};
use crate::error::RulesError;

use super::state::Round;

/// The next seat after `current` whose player still holds dice.
///
/// Walks at most one full lap of the table, so a table with nobody holding
/// dice fails instead of spinning.
pub fn next_player(seating: &Seating, current: PlayerId) -> Result<PlayerId, RulesError> {
    seating.player(current)?;
    let player_count = seating.player_count();

    let mut seat = current.index();
    for _ in 0..player_count {
        seat = (seat + 1) % player_count;
        let candidate = seating.player(PlayerId(seat as u8))?;
        if candidate.has_dice() {
            return Ok(candidate.seat());
        }
    }

    Err(RulesError::NoEligiblePlayer)
}

/// Whose turn it is: the starting player before any call, otherwise the next
/// eligible seat after whoever made the most recent call.
pub fn bidder(round: &Round, seating: &Seating) -> Result<PlayerId, RulesError> {
    match round.prev_call() {
        Some(call) => next_player(seating, call.player()),
        None => Ok(round.starting_player()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::round::RoundKey;
    use proptest::prelude::*;

    #[test]
    fn test_wraps_around() {
        let seating = Seating::with_dice_counts(&[5, 5, 5]).unwrap();
        assert_eq!(next_player(&seating, PlayerId(0)), Ok(PlayerId(1)));
        assert_eq!(next_player(&seating, PlayerId(2)), Ok(PlayerId(0)));
    }

    #[test]
    fn test_skips_players_without_dice() {
        let seating = Seating::with_dice_counts(&[2, 0, 0, 1]).unwrap();
        assert_eq!(next_player(&seating, PlayerId(0)), Ok(PlayerId(3)));
        assert_eq!(next_player(&seating, PlayerId(3)), Ok(PlayerId(0)));
        // an eliminated player can still be the reference point
        assert_eq!(next_player(&seating, PlayerId(1)), Ok(PlayerId(3)));
    }

    #[test]
    fn test_last_player_standing_gets_own_turn() {
        let seating = Seating::with_dice_counts(&[0, 4, 0]).unwrap();
        assert_eq!(next_player(&seating, PlayerId(1)), Ok(PlayerId(1)));
    }

    #[test]
    fn test_nobody_with_dice_fails() {
        let seating = Seating::with_dice_counts(&[0, 0, 0]).unwrap();
        assert_eq!(
            next_player(&seating, PlayerId(0)),
            Err(RulesError::NoEligiblePlayer)
        );
    }

    #[test]
    fn test_unknown_seat() {
        let seating = Seating::with_dice_counts(&[1, 1]).unwrap();
        assert!(matches!(
            next_player(&seating, PlayerId(4)),
            Err(RulesError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_bidder_before_any_call() {
        let seating = Seating::with_dice_counts(&[1, 1, 1]).unwrap();
        let round = Round::new(RoundKey::new(1, 1), PlayerId(2));
        assert_eq!(bidder(&round, &seating), Ok(PlayerId(2)));
        assert_eq!(bidder(&round, &seating), Ok(PlayerId(2)));
    }

    proptest! {
        #[test]
        fn prop_never_returns_player_without_dice(
            dice in proptest::collection::vec(0u8..3, 2..9),
            start in 0usize..9,
        ) {
            prop_assume!(dice.iter().any(|&d| d > 0));
            let seating = Seating::with_dice_counts(&dice).unwrap();
            let current = PlayerId((start % dice.len()) as u8);

            let next = next_player(&seating, current).unwrap();
            prop_assert!(seating.player(next).unwrap().has_dice());

            // every seat strictly between current and next is out of dice
            let n = dice.len();
            let mut seat = (current.index() + 1) % n;
            while seat != next.index() {
                prop_assert_eq!(dice[seat], 0);
                seat = (seat + 1) % n;
            }
        }
    }
}
