//! Bounded confidence scores.

use super::PlanningDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A confidence percentage in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Confidence(u8);

impl Confidence {
    /// Highest possible confidence.
    pub const MAX: Self = Self(100);

    /// Creates a confidence score.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningDomainError::ConfidenceOutOfRange`] outside `0..=100`.
    pub fn new(value: i64) -> Result<Self, PlanningDomainError> {
        u8::try_from(value)
            .ok()
            .filter(|score| *score <= 100)
            .map(Self)
            .ok_or(PlanningDomainError::ConfidenceOutOfRange(value))
    }

    /// Returns the score as a percentage.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Confidence {
    type Error = PlanningDomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Confidence> for i64 {
    fn from(confidence: Confidence) -> Self {
        Self::from(confidence.0)
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}%", self.0)
    }
}
