//! Round state: rolls, calls, the standing bid and resolution.
//!
//! ## Lifecycle
//!
//! `NotStarted -> InProgress -> Finished`, one way only.
//!
//! ## Plan / apply
//!
//! Every transition is split in two. `plan_*` validates against the current
//! state and builds the records the transition would create, without touching
//! anything. `apply_*` installs a planned transition and cannot fail. Callers
//! persist the plan in between, so a refused transition leaves the round and
//! the seating exactly as they were.

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::bid::{Bid, Call};
use crate::core::{DiceSource, PlayerId, PlayerMap, Seating};
use crate::dice::{DiceRoll, FaceValue};
use crate::error::RulesError;

/// Identifies a round: the game it belongs to and its number within the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoundKey {
    pub game: u64,
    pub number: u32,
}

impl RoundKey {
    #[must_use]
    pub const fn new(game: u64, number: u32) -> Self {
        Self { game, number }
    }
}

impl std::fmt::Display for RoundKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "game {} round {}", self.game, self.number)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundPhase {
    NotStarted,
    InProgress,
    Finished,
}

/// Whether ones count as wild. Starts wild; once cleared it stays cleared.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnesWild(bool);

impl OnesWild {
    #[must_use]
    pub const fn new() -> Self {
        Self(true)
    }

    #[must_use]
    pub const fn is_wild(self) -> bool {
        self.0
    }

    /// Observe a bid. Returns true if this bid is the one that cleared wildness.
    pub fn observe(&mut self, bid: &Bid) -> bool {
        let clears = self.0 && bid.face().is_one();
        if clears {
            self.0 = false;
        }
        clears
    }
}

impl Default for OnesWild {
    fn default() -> Self {
        Self::new()
    }
}

/// How a challenged round resolved.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundOutcome {
    pub round: RoundKey,
    /// Player who loses a die.
    pub loser: PlayerId,
    /// Player who called BS.
    pub challenger: PlayerId,
    /// The bid under challenge, if any was standing.
    pub challenged_bid: Option<Bid>,
    /// True count of the challenged face. Only computed for a legal bid.
    pub final_count: Option<u32>,
    /// Per-seat counts of the challenged face, attached to the challenge call.
    pub totals: Option<PlayerMap<u32>>,
}

/// Client-facing shape of a round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundView {
    pub number: u32,
    pub ones_wild: bool,
}

/// One round of Liar's Dice.
///
/// Calls are kept in an `im::Vector` so a snapshot of the round is an O(1)
/// clone, handed to readers without holding the round's lock.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    key: RoundKey,
    starting_player: PlayerId,
    phase: RoundPhase,
    ones_wild: OnesWild,
    loser: Option<PlayerId>,
    rolls: Vector<DiceRoll>,
    calls: Vector<Call>,
    /// Index into `calls` of the last bid, recomputed on every append.
    current_bid: Option<usize>,
}

impl Round {
    #[must_use]
    pub fn new(key: RoundKey, starting_player: PlayerId) -> Self {
        Self {
            key,
            starting_player,
            phase: RoundPhase::NotStarted,
            ones_wild: OnesWild::new(),
            loser: None,
            rolls: Vector::new(),
            calls: Vector::new(),
            current_bid: None,
        }
    }

    #[must_use]
    pub fn key(&self) -> RoundKey {
        self.key
    }

    #[must_use]
    pub fn number(&self) -> u32 {
        self.key.number
    }

    #[must_use]
    pub fn starting_player(&self) -> PlayerId {
        self.starting_player
    }

    #[must_use]
    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    #[must_use]
    pub fn ones_wild(&self) -> bool {
        self.ones_wild.is_wild()
    }

    /// Player who lost a die, once the round is finished.
    #[must_use]
    pub fn loser(&self) -> Option<PlayerId> {
        self.loser
    }

    /// Rolls in seat order, one per seat.
    pub fn rolls(&self) -> impl Iterator<Item = &DiceRoll> {
        self.rolls.iter()
    }

    pub fn roll_for(&self, player: PlayerId) -> Option<&DiceRoll> {
        self.rolls.iter().find(|roll| roll.player() == player)
    }

    /// Calls in sequence order.
    pub fn calls(&self) -> impl Iterator<Item = &Call> {
        self.calls.iter()
    }

    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.len()
    }

    /// The most recent call.
    #[must_use]
    pub fn prev_call(&self) -> Option<&Call> {
        self.calls.back()
    }

    /// The call that placed the standing bid.
    #[must_use]
    pub fn current_bid_call(&self) -> Option<&Call> {
        self.current_bid.and_then(|index| self.calls.get(index))
    }

    /// The standing bid.
    #[must_use]
    pub fn current_bid(&self) -> Option<&Bid> {
        self.current_bid_call().and_then(Call::as_bid)
    }

    /// The challenge that ended the round, once called.
    #[must_use]
    pub fn challenge_call(&self) -> Option<&Call> {
        self.prev_call().filter(|call| call.is_challenge())
    }

    /// Sum across every roll of dice showing `face`, ones included while wild.
    pub fn total(&self, face: u8) -> Result<u32, RulesError> {
        Ok(self.count_face(FaceValue::new(face)?))
    }

    pub(crate) fn count_face(&self, face: FaceValue) -> u32 {
        let wild = self.ones_wild();
        self.rolls.iter().map(|roll| roll.count(face, wild)).sum()
    }

    /// Per-seat count of `face` with the round's current wildness.
    #[must_use]
    pub fn totals_by_seat(&self, face: FaceValue, seating: &Seating) -> PlayerMap<u32> {
        let wild = self.ones_wild();
        seating.per_seat(|player| {
            self.roll_for(player.seat())
                .map_or(0, |roll| roll.count(face, wild))
        })
    }

    #[must_use]
    pub fn view(&self) -> RoundView {
        RoundView {
            number: self.key.number,
            ones_wild: self.ones_wild(),
        }
    }

    fn next_sequence(&self) -> u32 {
        self.prev_call().map_or(0, |call| call.sequence() + 1)
    }

    fn ensure_accepting_calls(&self, operation: &'static str) -> Result<(), RulesError> {
        if self.phase != RoundPhase::InProgress {
            return Err(RulesError::usage(operation, "round is not in progress"));
        }
        if self.challenge_call().is_some() {
            return Err(RulesError::usage(operation, "round has already been challenged"));
        }
        Ok(())
    }

    // === Start ===

    /// Roll for every seat, in seat order, as many dice as the player holds.
    pub(crate) fn plan_start(
        &self,
        seating: &Seating,
        dice: &mut impl DiceSource,
    ) -> Result<Vec<DiceRoll>, RulesError> {
        if self.phase != RoundPhase::NotStarted {
            return Err(RulesError::Start { phase: self.phase });
        }
        seating.player(self.starting_player)?;

        Ok(seating
            .iter()
            .map(|player| {
                let faces = dice.roll_dice(usize::from(player.dice_count()));
                DiceRoll::new(player.seat(), faces)
            })
            .collect())
    }

    pub(crate) fn apply_start(&mut self, rolls: Vec<DiceRoll>, seating: &mut Seating) {
        for roll in rolls {
            if let Ok(player) = seating.player_mut(roll.player()) {
                player.set_roll(roll.clone());
            }
            self.rolls.push_back(roll);
        }
        self.phase = RoundPhase::InProgress;
    }

    // === Calls ===

    /// Record-to-be for a bid. Legality is advisory: an illegal bid is still planned.
    pub(crate) fn plan_bid(
        &self,
        player: PlayerId,
        bid: Bid,
        seating: &Seating,
    ) -> Result<Call, RulesError> {
        self.ensure_accepting_calls("bid")?;
        seating.player(player)?;

        let legal = bid.beats(self.current_bid());
        Ok(Call::bid(self.next_sequence(), player, bid, legal))
    }

    /// Record-to-be for a challenge. Challenging with no standing bid is illegal.
    pub(crate) fn plan_challenge(
        &self,
        player: PlayerId,
        seating: &Seating,
    ) -> Result<Call, RulesError> {
        self.ensure_accepting_calls("call bs")?;
        seating.player(player)?;

        let legal = self.current_bid().is_some();
        Ok(Call::challenge(self.next_sequence(), player, legal))
    }

    /// Append a planned call. Returns true if it cleared ones-wild.
    pub(crate) fn apply_call(&mut self, call: Call) -> bool {
        let cleared = call
            .as_bid()
            .is_some_and(|bid| self.ones_wild.observe(bid));
        if call.as_bid().is_some() {
            self.current_bid = Some(self.calls.len());
        }
        self.calls.push_back(call);
        cleared
    }

    // === Finish ===

    /// Resolve the challenge.
    ///
    /// - Legal standing bid: count the face. Bid met means the challenger loses,
    ///   otherwise the bidder loses.
    /// - Illegal standing bid: the bidder loses without a count.
    /// - No standing bid: the challenger loses without a count.
    pub(crate) fn plan_finish(&self, seating: &Seating) -> Result<RoundOutcome, RulesError> {
        if self.phase != RoundPhase::InProgress {
            return Err(RulesError::usage("finish round", "round is not in progress"));
        }
        let challenge = self
            .challenge_call()
            .ok_or_else(|| RulesError::usage("finish round", "no challenge has been called"))?;

        let (loser, final_count) = match self.current_bid_call() {
            Some(bid_call) => {
                let bid = bid_call.as_bid().copied();
                match bid {
                    Some(bid) if bid_call.is_legal() => {
                        let count = self.count_face(bid.face());
                        let loser = if count >= bid.quantity() {
                            challenge.player()
                        } else {
                            bid_call.player()
                        };
                        (loser, Some(count))
                    }
                    _ => (bid_call.player(), None),
                }
            }
            None => (challenge.player(), None),
        };
        seating.player(loser)?;

        let challenged_bid = self.current_bid().copied();
        Ok(RoundOutcome {
            round: self.key,
            loser,
            challenger: challenge.player(),
            challenged_bid,
            final_count,
            totals: challenged_bid
                .map(|bid| self.totals_by_seat(bid.face(), seating)),
        })
    }

    pub(crate) fn apply_finish(&mut self, outcome: &RoundOutcome, seating: &mut Seating) {
        if let Some(totals) = &outcome.totals {
            let last = self.calls.len().saturating_sub(1);
            if let Some(challenge) = self.calls.get_mut(last) {
                challenge.set_totals(totals.clone());
            }
        }
        self.loser = Some(outcome.loser);
        self.phase = RoundPhase::Finished;

        if let Ok(player) = seating.player_mut(outcome.loser) {
            if !player.lose_die() {
                tracing::warn!(round = %self.key, seat = outcome.loser.0, "loser had no dice left");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LoadedDice;

    fn started(dice_counts: &[u8], faces: &[u8]) -> (Round, Seating) {
        let mut seating = Seating::with_dice_counts(dice_counts).unwrap();
        let mut round = Round::new(RoundKey::new(1, 1), PlayerId(0));
        let mut dice = LoadedDice::new(faces).unwrap();
        let rolls = round.plan_start(&seating, &mut dice).unwrap();
        round.apply_start(rolls, &mut seating);
        (round, seating)
    }

    fn bid(round: &mut Round, seating: &Seating, seat: u8, quantity: u32, face: u8) -> bool {
        let call = round
            .plan_bid(PlayerId(seat), Bid::new(quantity, face).unwrap(), seating)
            .unwrap();
        let legal = call.is_legal();
        round.apply_call(call);
        legal
    }

    fn challenge(round: &mut Round, seating: &Seating, seat: u8) {
        let call = round.plan_challenge(PlayerId(seat), seating).unwrap();
        round.apply_call(call);
    }

    #[test]
    fn test_new_round() {
        let round = Round::new(RoundKey::new(9, 3), PlayerId(1));
        assert_eq!(round.phase(), RoundPhase::NotStarted);
        assert!(round.ones_wild());
        assert_eq!(round.number(), 3);
        assert!(round.prev_call().is_none());
        assert!(round.current_bid().is_none());
        assert_eq!(round.total(3), Ok(0));
    }

    #[test]
    fn test_ones_wild_is_monotonic() {
        let mut wild = OnesWild::new();
        assert!(!wild.observe(&Bid::new(2, 4).unwrap()));
        assert!(wild.is_wild());
        assert!(wild.observe(&Bid::new(3, 1).unwrap()));
        assert!(!wild.is_wild());
        assert!(!wild.observe(&Bid::new(4, 1).unwrap()));
        assert!(!wild.observe(&Bid::new(5, 2).unwrap()));
        assert!(!wild.is_wild());
    }

    #[test]
    fn test_start_rolls_every_seat() {
        let (round, seating) = started(&[3, 0, 2], &[4]);
        let lens: Vec<_> = round.rolls().map(DiceRoll::len).collect();
        assert_eq!(lens, vec![3, 0, 2]);
        assert_eq!(round.phase(), RoundPhase::InProgress);
        assert_eq!(seating.player(PlayerId(2)).unwrap().roll().map(DiceRoll::len), Some(2));
    }

    #[test]
    fn test_start_twice_fails() {
        let (round, seating) = started(&[2, 2], &[4]);
        let err = round.plan_start(&seating, &mut LoadedDice::new(&[1]).unwrap());
        assert_eq!(err, Err(RulesError::Start { phase: RoundPhase::InProgress }));
    }

    #[test]
    fn test_bid_before_start_fails() {
        let seating = Seating::with_dice_counts(&[2, 2]).unwrap();
        let round = Round::new(RoundKey::new(1, 1), PlayerId(0));
        let err = round
            .plan_bid(PlayerId(0), Bid::new(1, 2).unwrap(), &seating)
            .unwrap_err();
        assert!(err.is_usage());
        assert!(round.plan_challenge(PlayerId(0), &seating).is_err());
    }

    #[test]
    fn test_unknown_seat_is_invalid() {
        let (round, seating) = started(&[2, 2], &[4]);
        let err = round
            .plan_bid(PlayerId(5), Bid::new(1, 2).unwrap(), &seating)
            .unwrap_err();
        assert!(matches!(err, RulesError::InvalidArgument(_)));
    }

    #[test]
    fn test_sequence_and_current_bid() {
        let (mut round, seating) = started(&[2, 2], &[4]);
        assert!(bid(&mut round, &seating, 0, 2, 3));
        assert!(!bid(&mut round, &seating, 1, 1, 6));
        assert_eq!(round.current_bid(), Some(&Bid::new(1, 6).unwrap()));
        challenge(&mut round, &seating, 0);

        let seqs: Vec<_> = round.calls().map(Call::sequence).collect();
        assert_eq!(seqs, vec![0, 1, 2]);
        assert_eq!(round.current_bid_call().map(Call::sequence), Some(1));
        assert!(round.challenge_call().is_some());
    }

    #[test]
    fn test_no_calls_after_challenge() {
        let (mut round, seating) = started(&[2, 2], &[4]);
        bid(&mut round, &seating, 0, 2, 3);
        challenge(&mut round, &seating, 1);
        assert!(round
            .plan_bid(PlayerId(0), Bid::new(5, 5).unwrap(), &seating)
            .unwrap_err()
            .is_usage());
        assert!(round.plan_challenge(PlayerId(0), &seating).is_err());
    }

    #[test]
    fn test_wild_ones_in_total() {
        let (mut round, seating) = started(&[3, 3], &[1, 4, 4]);
        assert_eq!(round.total(4), Ok(6));
        assert_eq!(round.total(1), Ok(2));
        bid(&mut round, &seating, 0, 2, 1);
        assert!(!round.ones_wild());
        assert_eq!(round.total(4), Ok(4));
        assert!(round.total(0).is_err());
        assert!(round.total(7).is_err());
    }

    #[test]
    fn test_totals_by_seat_follows_seating() {
        let (mut round, seating) = started(&[2, 0, 3], &[1, 6]);
        let six = FaceValue::new(6).unwrap();

        let totals = round.totals_by_seat(six, &seating);
        assert_eq!(totals.player_count(), 3);
        assert_eq!(totals[PlayerId(0)], 2);
        assert_eq!(totals[PlayerId(1)], 0);
        assert_eq!(totals[PlayerId(2)], 3);

        bid(&mut round, &seating, 0, 1, 1);
        let totals = round.totals_by_seat(six, &seating);
        assert_eq!(totals[PlayerId(0)], 1);
        assert_eq!(totals[PlayerId(2)], 1);
    }

    #[test]
    fn test_finish_requires_challenge() {
        let (mut round, seating) = started(&[2, 2], &[4]);
        bid(&mut round, &seating, 0, 2, 3);
        let err = round.plan_finish(&seating).unwrap_err();
        assert!(err.is_usage());
    }

    #[test]
    fn test_finish_correct_bid_challenger_loses() {
        let (mut round, mut seating) = started(&[2, 2], &[5]);
        bid(&mut round, &seating, 0, 4, 5);
        challenge(&mut round, &seating, 1);

        let outcome = round.plan_finish(&seating).unwrap();
        assert_eq!(outcome.loser, PlayerId(1));
        assert_eq!(outcome.final_count, Some(4));
        round.apply_finish(&outcome, &mut seating);

        assert_eq!(round.phase(), RoundPhase::Finished);
        assert_eq!(round.loser(), Some(PlayerId(1)));
        assert_eq!(seating.player(PlayerId(1)).unwrap().dice_count(), 1);
        let totals = round.challenge_call().unwrap().totals().unwrap();
        assert_eq!(totals[PlayerId(0)], 2);
        assert!(round.plan_finish(&seating).unwrap_err().is_usage());
    }

    #[test]
    fn test_finish_without_bid_challenger_loses() {
        let (mut round, mut seating) = started(&[2, 2], &[5]);
        challenge(&mut round, &seating, 0);
        assert!(!round.prev_call().unwrap().is_legal());

        let outcome = round.plan_finish(&seating).unwrap();
        assert_eq!(outcome.loser, PlayerId(0));
        assert_eq!(outcome.final_count, None);
        assert_eq!(outcome.totals, None);
        round.apply_finish(&outcome, &mut seating);
        assert_eq!(seating.player(PlayerId(0)).unwrap().dice_count(), 1);
    }

    #[test]
    fn test_round_view() {
        let (mut round, seating) = started(&[1, 1], &[2]);
        bid(&mut round, &seating, 0, 1, 1);
        let json = serde_json::to_value(round.view()).unwrap();
        assert_eq!(json, serde_json::json!({ "number": 1, "onesWild": false }));
    }
}
