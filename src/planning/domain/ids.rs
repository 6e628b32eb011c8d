//! Store-assigned identifiers for planning records.

use super::PlanningDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "i64", into = "i64")]
        pub struct $name(i64);

        impl $name {
            /// Wraps a store-assigned identifier.
            ///
            /// # Errors
            ///
            /// Returns [`PlanningDomainError::NonPositiveId`] for zero or
            /// negative values.
            pub const fn new(value: i64) -> Result<Self, PlanningDomainError> {
                if value > 0 {
                    Ok(Self(value))
                } else {
                    Err(PlanningDomainError::NonPositiveId(value))
                }
            }

            /// Returns the raw identifier.
            #[must_use]
            pub const fn into_inner(self) -> i64 {
                self.0
            }
        }

        impl TryFrom<i64> for $name {
            type Error = PlanningDomainError;

            fn try_from(value: i64) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(formatter, "{}", self.0)
            }
        }
    };
}

record_id!(
    /// Identifier of a plan.
    PlanId
);
record_id!(
    /// Identifier of an uncertainty.
    UncertaintyId
);
record_id!(
    /// Identifier of a todo.
    TodoId
);
