//! Bids and calls.
//!
//! A [`Bid`] claims "at least `quantity` dice show `face`" across every roll
//! at the table. Bids are totally ordered: higher quantity wins, and the face
//! breaks ties. A new bid is legal only if it strictly exceeds the standing one.
//!
//! A [`Call`] is one turn's action: a bid, or a challenge of the standing bid.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::{PlayerId, PlayerMap};
use crate::dice::FaceValue;
use crate::error::RulesError;

/// A claim about the combined dice pool.
///
/// Field order matters: the derived ordering compares quantity first, then face.
///
/// ```
/// use liars_dice::bid::Bid;
///
/// let low = Bid::new(3, 6).unwrap();
/// let high = Bid::new(4, 2).unwrap();
/// assert!(high > low);
/// assert!(Bid::new(4, 3).unwrap() > high);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "BidRepr", into = "BidRepr")]
pub struct Bid {
    quantity: u32,
    face: FaceValue,
}

/// Unvalidated wire shape of a bid.
#[derive(Clone, Copy, Serialize, Deserialize)]
struct BidRepr {
    quantity: u32,
    face: FaceValue,
}

impl TryFrom<BidRepr> for Bid {
    type Error = RulesError;

    fn try_from(repr: BidRepr) -> Result<Self, Self::Error> {
        Self::with_face(repr.quantity, repr.face)
    }
}

impl From<Bid> for BidRepr {
    fn from(bid: Bid) -> Self {
        Self {
            quantity: bid.quantity,
            face: bid.face,
        }
    }
}

impl Bid {
    /// Validate and build a bid. Quantity must be positive, face in 1..=6.
    pub fn new(quantity: u32, face: u8) -> Result<Self, RulesError> {
        Self::with_face(quantity, FaceValue::new(face)?)
    }

    pub fn with_face(quantity: u32, face: FaceValue) -> Result<Self, RulesError> {
        if quantity == 0 {
            return Err(RulesError::InvalidArgument(
                "bid quantity must be positive".to_string(),
            ));
        }
        Ok(Self { quantity, face })
    }

    #[must_use]
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    #[must_use]
    pub fn face(&self) -> FaceValue {
        self.face
    }

    /// Whether this bid may follow `standing`. Any bid may open a round.
    #[must_use]
    pub fn beats(&self, standing: Option<&Bid>) -> bool {
        standing.map_or(true, |standing| self > standing)
    }
}

impl std::fmt::Display for Bid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} x {}", self.quantity, self.face)
    }
}

/// What a call did.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallKind {
    /// Raise the standing bid.
    Bid(Bid),
    /// Call "BS" on the standing bid. Always the last call of a round.
    Challenge,
}

/// One recorded turn action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Call {
    sequence: u32,
    player: PlayerId,
    kind: CallKind,
    legal: bool,
    totals: Option<PlayerMap<u32>>,
}

impl Call {
    pub(crate) fn bid(sequence: u32, player: PlayerId, bid: Bid, legal: bool) -> Self {
        Self {
            sequence,
            player,
            kind: CallKind::Bid(bid),
            legal,
            totals: None,
        }
    }

    pub(crate) fn challenge(sequence: u32, player: PlayerId, legal: bool) -> Self {
        Self {
            sequence,
            player,
            kind: CallKind::Challenge,
            legal,
            totals: None,
        }
    }

    /// 0-based position within the round.
    #[must_use]
    pub fn sequence(&self) -> u32 {
        self.sequence
    }

    #[must_use]
    pub fn player(&self) -> PlayerId {
        self.player
    }

    #[must_use]
    pub fn kind(&self) -> CallKind {
        self.kind
    }

    #[must_use]
    pub fn is_challenge(&self) -> bool {
        matches!(self.kind, CallKind::Challenge)
    }

    /// The embedded bid, `None` for a challenge.
    #[must_use]
    pub fn as_bid(&self) -> Option<&Bid> {
        match &self.kind {
            CallKind::Bid(bid) => Some(bid),
            CallKind::Challenge => None,
        }
    }

    /// Whether the call was a valid move when made. Advisory only.
    #[must_use]
    pub fn is_legal(&self) -> bool {
        self.legal
    }

    /// Per-seat counts of the challenged face, set on the finishing challenge.
    #[must_use]
    pub fn totals(&self) -> Option<&PlayerMap<u32>> {
        self.totals.as_ref()
    }

    pub(crate) fn set_totals(&mut self, totals: PlayerMap<u32>) {
        self.totals = Some(totals);
    }

    /// Client-facing projection.
    #[must_use]
    pub fn view(&self) -> CallView {
        let bid = self.as_bid();
        CallView {
            is_bs: self.is_challenge(),
            seat: self.player.0,
            sequence_number: self.sequence,
            legal: self.legal,
            number: bid.map(Bid::quantity),
            face_value: bid.map(|b| b.face().get()),
            totals: self.totals.as_ref().map(|totals| {
                totals.iter().map(|(seat, &count)| (seat.0, count)).collect()
            }),
        }
    }
}

/// Client-facing shape of a call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallView {
    #[serde(rename = "isBS")]
    pub is_bs: bool,
    pub seat: u8,
    pub sequence_number: u32,
    pub legal: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub face_value: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub totals: Option<BTreeMap<u8, u32>>,
}
