//! Draft selection validator
//!
//! Turns the user's free-form choice into a draft number.

use crate::model::Draft;
use std::num::IntErrorKind;
use thiserror::Error;

/// The draft numbers a generation batch always contains
pub const DRAFT_NUMBERS: [u8; 3] = [1, 2, 3];

/// Why a selection was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The token is not an integer
    #[error("'{token}' is not a number; enter 1, 2, or 3")]
    NotANumber {
        /// What the user typed, trimmed
        token: String,
    },

    /// The token is an integer but names no available draft
    #[error("draft {token} does not exist; enter 1, 2, or 3")]
    OutOfRange {
        /// What the user typed, trimmed
        token: String,
    },
}

impl ValidationError {
    /// Short machine-readable kind
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotANumber { .. } => "not_a_number",
            Self::OutOfRange { .. } => "out_of_range",
        }
    }
}

/// Validate a selection token against the drafts on offer
///
/// Surrounding whitespace is ignored. Anything that is not an integer
/// (including `"2.0"`) is [`ValidationError::NotANumber`]; an integer outside
/// {1, 2, 3}, or one that matches no draft in `drafts`, is
/// [`ValidationError::OutOfRange`].
pub fn validate_selection(token: &str, drafts: &[Draft]) -> Result<u8, ValidationError> {
    let trimmed = token.trim();

    let value: i64 = match trimmed.parse() {
        Ok(value) => value,
        Err(e) => {
            return Err(match e.kind() {
                IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
                    ValidationError::OutOfRange {
                        token: trimmed.to_string(),
                    }
                }
                _ => ValidationError::NotANumber {
                    token: trimmed.to_string(),
                },
            })
        }
    };

    let out_of_range = || ValidationError::OutOfRange {
        token: trimmed.to_string(),
    };

    let number = u8::try_from(value).map_err(|_| out_of_range())?;
    if !DRAFT_NUMBERS.contains(&number) || !drafts.iter().any(|d| d.number == number) {
        return Err(out_of_range());
    }

    Ok(number)
}
