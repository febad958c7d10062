//! Dice expressions of the form `[N]dM` and the rollers that resolve them.
//!
//! Any `rand::Rng` can be used as a [`Roller`]; seeding it (for example with
//! `ChaCha8Rng::seed_from_u64`) makes every roll reproducible. For tests and
//! replays a [`ScriptedRoller`] hands out predetermined faces instead.

use crate::core::constants::{D20_SIDES, D6_SIDES, MAX_DICE_COUNT, MAX_DIE_SIDES};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Why a dice expression was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiceError {
    #[error("dice expression '{0}' is missing the 'd' separator")]
    MissingSeparator(String),

    #[error("dice expression '{expr}' has an invalid dice count")]
    InvalidCount { expr: String },

    #[error("dice expression '{expr}' has an invalid number of sides")]
    InvalidSides { expr: String },
}

/// Source of individual die faces.
pub trait Roller {
    /// Rolls one die, returning a face in `1..=sides`.
    fn roll_die(&mut self, sides: u32) -> u32;
}

impl<R: Rng + ?Sized> Roller for R {
    fn roll_die(&mut self, sides: u32) -> u32 {
        self.gen_range(1..=sides.max(1))
    }
}

/// Replays a fixed sequence of faces.
///
/// Faces outside `1..=sides` are clamped into range. Once the script runs
/// out every roll returns the highest face.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRoller {
    faces: VecDeque<u32>,
}

impl ScriptedRoller {
    pub fn new(faces: impl IntoIterator<Item = u32>) -> Self {
        Self {
            faces: faces.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.faces.len()
    }
}

impl Roller for ScriptedRoller {
    fn roll_die(&mut self, sides: u32) -> u32 {
        let sides = sides.max(1);
        match self.faces.pop_front() {
            Some(face) => face.clamp(1, sides),
            None => sides,
        }
    }
}

/// A parsed `[N]dM` expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DiceExpr {
    count: u32,
    sides: u32,
}

/// Outcome of rolling a [`DiceExpr`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiceRoll {
    pub rolls: Vec<u32>,
    pub total: u32,
}

impl DiceExpr {
    pub const D20: DiceExpr = DiceExpr {
        count: 1,
        sides: D20_SIDES,
    };

    pub const D6: DiceExpr = DiceExpr {
        count: 1,
        sides: D6_SIDES,
    };

    /// Builds an expression directly, applying the same bounds as parsing.
    pub fn new(count: u32, sides: u32) -> Result<Self, DiceError> {
        let expr = format!("{}d{}", count, sides);
        if count == 0 || count > MAX_DICE_COUNT {
            return Err(DiceError::InvalidCount { expr });
        }
        if sides == 0 || sides > MAX_DIE_SIDES {
            return Err(DiceError::InvalidSides { expr });
        }
        Ok(Self { count, sides })
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn sides(&self) -> u32 {
        self.sides
    }

    /// Smallest possible total.
    pub fn min_total(&self) -> u32 {
        self.count
    }

    /// Largest possible total.
    pub fn max_total(&self) -> u32 {
        self.count * self.sides
    }

    /// Rolls `count` independent dice and sums them.
    pub fn roll(&self, roller: &mut impl Roller) -> DiceRoll {
        let rolls: Vec<u32> = (0..self.count)
            .map(|_| roller.roll_die(self.sides))
            .collect();
        let total = rolls.iter().sum();
        DiceRoll { rolls, total }
    }
}

/// Rolls a single d20 and returns the face as a signed value ready for modifiers.
pub fn roll_d20(roller: &mut impl Roller) -> i32 {
    roller.roll_die(D20_SIDES) as i32
}

/// Parses a non-empty run of ASCII digits.
fn parse_digits(part: &str) -> Option<u32> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

impl FromStr for DiceExpr {
    type Err = DiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let (count_part, sides_part) = text
            .split_once(|c: char| c == 'd' || c == 'D')
            .ok_or_else(|| DiceError::MissingSeparator(s.to_string()))?;

        let count = if count_part.is_empty() {
            1
        } else {
            parse_digits(count_part).ok_or_else(|| DiceError::InvalidCount {
                expr: s.to_string(),
            })?
        };
        let sides = parse_digits(sides_part).ok_or_else(|| DiceError::InvalidSides {
            expr: s.to_string(),
        })?;

        // Report bounds violations against the caller's text, not the canonical form
        DiceExpr::new(count, sides).map_err(|err| match err {
            DiceError::InvalidCount { .. } => DiceError::InvalidCount {
                expr: s.to_string(),
            },
            _ => DiceError::InvalidSides {
                expr: s.to_string(),
            },
        })
    }
}

impl TryFrom<String> for DiceExpr {
    type Error = DiceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DiceExpr> for String {
    fn from(expr: DiceExpr) -> Self {
        expr.to_string()
    }
}

impl fmt::Display for DiceExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.count, self.sides)
    }
}
