//! Die faces and rolled dice.
//!
//! ## Ones are wild
//!
//! While a round's ones are wild, a die showing 1 also counts toward any other
//! face. A count of face 1 itself is never boosted: the ones are counted once.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::PlayerId;
use crate::error::RulesError;

/// A die face, always in 1..=6.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct FaceValue(u8);

impl FaceValue {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 6;

    /// The wild face.
    pub const ONE: FaceValue = FaceValue(1);

    /// Validate a raw face value.
    pub fn new(value: u8) -> Result<Self, RulesError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(RulesError::InvalidArgument(format!(
                "invalid face value ({value})"
            )))
        }
    }

    /// Wrap a face drawn from a generator already bounded to 1..=6.
    pub(crate) fn from_roll(value: u8) -> Self {
        debug_assert!((Self::MIN..=Self::MAX).contains(&value));
        Self(value)
    }

    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn is_one(self) -> bool {
        self.0 == 1
    }

    /// All six faces in ascending order.
    pub fn all() -> impl Iterator<Item = FaceValue> {
        (Self::MIN..=Self::MAX).map(FaceValue)
    }
}

impl TryFrom<u8> for FaceValue {
    type Error = RulesError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FaceValue> for u8 {
    fn from(face: FaceValue) -> Self {
        face.0
    }
}

impl std::fmt::Display for FaceValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One player's hidden dice for one round. Immutable once rolled.
///
/// Most players hold five dice or fewer, so faces live inline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceRoll {
    player: PlayerId,
    dice: SmallVec<[FaceValue; 6]>,
}

impl DiceRoll {
    #[must_use]
    pub fn new(player: PlayerId, dice: impl IntoIterator<Item = FaceValue>) -> Self {
        Self {
            player,
            dice: dice.into_iter().collect(),
        }
    }

    /// Seat the roll belongs to.
    #[must_use]
    pub fn player(&self) -> PlayerId {
        self.player
    }

    #[must_use]
    pub fn dice(&self) -> &[FaceValue] {
        &self.dice
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.dice.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dice.is_empty()
    }

    /// Dice showing `face`, plus dice showing 1 when `ones_wild` and `face` is not 1.
    ///
    /// ```
    /// use liars_dice::core::PlayerId;
    /// use liars_dice::dice::{DiceRoll, FaceValue};
    ///
    /// let faces = [1, 1, 3, 4, 3].map(|f| FaceValue::new(f).unwrap());
    /// let roll = DiceRoll::new(PlayerId(0), faces);
    /// let three = FaceValue::new(3).unwrap();
    ///
    /// assert_eq!(roll.count(three, true), 4);
    /// assert_eq!(roll.count(three, false), 2);
    /// assert_eq!(roll.count(FaceValue::ONE, true), 2);
    /// ```
    #[must_use]
    pub fn count(&self, face: FaceValue, ones_wild: bool) -> u32 {
        let boost_ones = ones_wild && !face.is_one();
        self.dice
            .iter()
            .filter(|&&die| die == face || (boost_ones && die.is_one()))
            .count() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn faces(values: &[u8]) -> Vec<FaceValue> {
        values.iter().map(|&v| FaceValue::new(v).unwrap()).collect()
    }

    #[test]
    fn test_face_value_bounds() {
        assert!(FaceValue::new(0).is_err());
        assert!(FaceValue::new(7).is_err());
        assert_eq!(FaceValue::new(6).unwrap().get(), 6);
        assert_eq!(FaceValue::all().count(), 6);
    }

    #[test]
    fn test_face_value_serde_validates() {
        let face: FaceValue = serde_json::from_str("4").unwrap();
        assert_eq!(face.get(), 4);
        assert!(serde_json::from_str::<FaceValue>("9").is_err());
        assert_eq!(serde_json::to_string(&face).unwrap(), "4");
    }

    #[test]
    fn test_count_without_wilds() {
        let roll = DiceRoll::new(PlayerId(0), faces(&[2, 2, 1, 5, 6]));
        assert_eq!(roll.count(FaceValue::new(2).unwrap(), false), 2);
        assert_eq!(roll.count(FaceValue::new(3).unwrap(), false), 0);
        assert_eq!(roll.count(FaceValue::ONE, false), 1);
    }

    #[test]
    fn test_count_with_wilds() {
        let roll = DiceRoll::new(PlayerId(1), faces(&[1, 1, 5, 5, 6]));
        assert_eq!(roll.count(FaceValue::new(5).unwrap(), true), 4);
        assert_eq!(roll.count(FaceValue::new(6).unwrap(), true), 3);
        assert_eq!(roll.count(FaceValue::new(3).unwrap(), true), 2);
    }

    #[test]
    fn test_ones_never_double_counted() {
        let roll = DiceRoll::new(PlayerId(0), faces(&[1, 1, 1]));
        assert_eq!(roll.count(FaceValue::ONE, true), 3);
        assert_eq!(roll.count(FaceValue::ONE, false), 3);
    }

    #[test]
    fn test_empty_roll() {
        let roll = DiceRoll::new(PlayerId(2), std::iter::empty());
        assert!(roll.is_empty());
        assert_eq!(roll.count(FaceValue::new(4).unwrap(), true), 0);
    }
}
