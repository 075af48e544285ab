//! Round operations for a hosting service.
//!
//! [`RoundSession`] drives one round against the game's seating and the two
//! collaborators: a [`RoundStore`] that makes each transition durable and an
//! [`EventSink`] that hears about it afterwards. Every operation follows the
//! same order:
//!
//! 1. plan the transition against current state (may fail, changes nothing)
//! 2. commit it to the store (may fail, changes nothing)
//! 3. apply it in memory
//! 4. emit its events
//!
//! [`SharedRound`] puts a session behind a per-round mutex so exactly one
//! transition runs at a time. Different rounds never contend.
//!
//! Turn order is not enforced here. Callers that want strict turns compare
//! the acting seat with [`RoundSession::bidder`] first.

use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::bid::{Bid, Call};
use crate::core::{DiceSource, PlayerId, Seating};
use crate::error::RulesError;
use crate::events::{EventSink, RoundEvent};
use crate::round::{self, Round, RoundOutcome};
use crate::store::{RoundStore, Transition};

/// One round plus everything needed to move it forward.
pub struct RoundSession {
    round: Round,
    seating: Seating,
    store: Arc<dyn RoundStore>,
    events: Arc<dyn EventSink>,
}

impl RoundSession {
    /// Bind a round to the seating of its game.
    ///
    /// The seating is held by the session for the life of the round and
    /// handed back by [`RoundSession::into_parts`].
    pub fn new(
        round: Round,
        seating: Seating,
        store: Arc<dyn RoundStore>,
        events: Arc<dyn EventSink>,
    ) -> Result<Self, RulesError> {
        seating.player(round.starting_player())?;
        Ok(Self {
            round,
            seating,
            store,
            events,
        })
    }

    #[must_use]
    pub fn round(&self) -> &Round {
        &self.round
    }

    #[must_use]
    pub fn seating(&self) -> &Seating {
        &self.seating
    }

    /// Release the round and the (possibly updated) seating.
    #[must_use]
    pub fn into_parts(self) -> (Round, Seating) {
        (self.round, self.seating)
    }

    fn commit(&self, transition: &Transition) -> Result<(), RulesError> {
        self.store.commit(transition).map_err(|err| {
            warn!(round = %self.round.key(), error = %err, "store refused transition");
            RulesError::from(err)
        })
    }

    /// Roll every seat's dice and open the round for calls.
    pub fn start(&mut self, dice: &mut impl DiceSource) -> Result<(), RulesError> {
        let key = self.round.key();
        let rolls = self.round.plan_start(&self.seating, dice)?;
        self.commit(&Transition::Started {
            round: key,
            rolls: rolls.clone(),
        })?;

        self.round.apply_start(rolls.clone(), &mut self.seating);
        info!(round = %key, seats = rolls.len(), "round started");

        for roll in rolls {
            debug!(round = %key, seat = roll.player().0, dice = roll.len(), "dice rolled");
            self.events.emit(RoundEvent::RollCreated { round: key, roll });
        }
        Ok(())
    }

    /// Record a bid. Returns whether it strictly beat the standing bid.
    ///
    /// An illegal bid is still recorded, flagged `legal = false`.
    pub fn bid(&mut self, player: PlayerId, bid: Bid) -> Result<bool, RulesError> {
        let call = self.round.plan_bid(player, bid, &self.seating)?;
        let legal = call.is_legal();
        self.record(call)?;

        if !legal {
            warn!(round = %self.round.key(), seat = player.0, %bid, "illegal bid recorded");
        }
        Ok(legal)
    }

    /// Call BS on the standing bid. Resolve it with [`RoundSession::finish`].
    pub fn challenge(&mut self, player: PlayerId) -> Result<(), RulesError> {
        let call = self.round.plan_challenge(player, &self.seating)?;
        self.record(call)
    }

    fn record(&mut self, call: Call) -> Result<(), RulesError> {
        let key = self.round.key();
        self.commit(&Transition::CallRecorded {
            round: key,
            call: call.clone(),
        })?;

        if self.round.apply_call(call.clone()) {
            info!(round = %key, seat = call.player().0, "ones are no longer wild");
        }
        debug!(
            round = %key,
            seat = call.player().0,
            sequence = call.sequence(),
            challenge = call.is_challenge(),
            legal = call.is_legal(),
            "call recorded"
        );
        self.events.emit(RoundEvent::CallRecorded { round: key, call });
        Ok(())
    }

    /// Resolve the challenge: work out who loses a die and take it.
    pub fn finish(&mut self) -> Result<RoundOutcome, RulesError> {
        let outcome = self.round.plan_finish(&self.seating)?;
        self.commit(&Transition::Finished {
            outcome: outcome.clone(),
        })?;

        self.round.apply_finish(&outcome, &mut self.seating);
        info!(
            round = %outcome.round,
            loser = outcome.loser.0,
            final_count = ?outcome.final_count,
            "round ended"
        );
        self.events.emit(RoundEvent::RoundEnded(outcome.clone()));
        Ok(outcome)
    }

    /// Dice across the table showing `face`, ones included while wild.
    pub fn total(&self, face: u8) -> Result<u32, RulesError> {
        self.round.total(face)
    }

    #[must_use]
    pub fn current_bid(&self) -> Option<Bid> {
        self.round.current_bid().copied()
    }

    #[must_use]
    pub fn prev_call(&self) -> Option<&Call> {
        self.round.prev_call()
    }

    /// Whose turn it is.
    pub fn bidder(&self) -> Result<PlayerId, RulesError> {
        round::bidder(&self.round, &self.seating)
    }
}

impl std::fmt::Debug for RoundSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoundSession")
            .field("round", &self.round)
            .field("seating", &self.seating)
            .finish_non_exhaustive()
    }
}

/// A session shared between tasks. Each operation holds the round's lock for
/// its full duration, released on every exit path.
#[derive(Clone, Debug)]
pub struct SharedRound {
    inner: Arc<Mutex<RoundSession>>,
}

impl SharedRound {
    #[must_use]
    pub fn new(session: RoundSession) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    pub fn start(&self, dice: &mut impl DiceSource) -> Result<(), RulesError> {
        self.inner.lock().start(dice)
    }

    pub fn bid(&self, player: PlayerId, bid: Bid) -> Result<bool, RulesError> {
        self.inner.lock().bid(player, bid)
    }

    pub fn challenge(&self, player: PlayerId) -> Result<(), RulesError> {
        self.inner.lock().challenge(player)
    }

    pub fn finish(&self) -> Result<RoundOutcome, RulesError> {
        self.inner.lock().finish()
    }

    pub fn total(&self, face: u8) -> Result<u32, RulesError> {
        self.inner.lock().total(face)
    }

    #[must_use]
    pub fn current_bid(&self) -> Option<Bid> {
        self.inner.lock().current_bid()
    }

    #[must_use]
    pub fn prev_call(&self) -> Option<Call> {
        self.inner.lock().prev_call().cloned()
    }

    pub fn bidder(&self) -> Result<PlayerId, RulesError> {
        self.inner.lock().bidder()
    }

    /// Point-in-time copy of the round. O(1): calls and rolls are shared.
    #[must_use]
    pub fn snapshot(&self) -> Round {
        self.inner.lock().round().clone()
    }

    #[must_use]
    pub fn seating(&self) -> Seating {
        self.inner.lock().seating().clone()
    }

    /// Run several reads or transitions under one acquisition of the lock.
    pub fn with_session<R>(&self, f: impl FnOnce(&mut RoundSession) -> R) -> R {
        f(&mut self.inner.lock())
    }
}
