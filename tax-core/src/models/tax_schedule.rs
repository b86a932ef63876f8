//! Validated, ordered tax schedules.
//!
//! A [`TaxSchedule`] can only be built from brackets that form a single
//! contiguous progression:
//!
//! | Rule | Violation |
//! |------|-----------|
//! | at least one bracket | [`ScheduleError::Empty`] |
//! | first `min` is not negative | [`ScheduleError::NegativeMinimum`] |
//! | every `rate` lies in `[0, 1]` | [`ScheduleError::RateOutOfRange`] |
//! | every bounded bracket has `max > min` | [`ScheduleError::InvertedBounds`] |
//! | each `min` equals the previous `max` | [`ScheduleError::NotContiguous`] |
//! | only the last bracket is unbounded | [`ScheduleError::UnboundedBeforeEnd`] |
//! | the last bracket is unbounded | [`ScheduleError::BoundedTopBracket`] |

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use crate::models::TaxBracket;

/// Reasons a bracket list is rejected as a schedule.
///
/// Indices are zero-based positions in the list as supplied.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("schedule has no brackets")]
    Empty,

    #[error("bracket {index} starts below zero ({min})")]
    NegativeMinimum { index: usize, min: Decimal },

    #[error("bracket {index} has rate {rate} outside [0, 1]")]
    RateOutOfRange { index: usize, rate: Decimal },

    #[error("bracket {index} has max {max} not above its min {min}")]
    InvertedBounds {
        index: usize,
        min: Decimal,
        max: Decimal,
    },

    #[error("bracket {index} starts at {found} but the previous bracket ends at {expected}")]
    NotContiguous {
        index: usize,
        expected: Decimal,
        found: Decimal,
    },

    #[error("bracket {index} is unbounded but is not the last bracket")]
    UnboundedBeforeEnd { index: usize },

    #[error("top bracket {index} has an upper bound")]
    BoundedTopBracket { index: usize },
}

/// Checks every schedule invariant, reporting the first violation found
/// while walking the brackets in order.
pub fn validate_brackets(brackets: &[TaxBracket]) -> Result<(), ScheduleError> {
    let Some(first) = brackets.first() else {
        return Err(ScheduleError::Empty);
    };

    if first.min < Decimal::ZERO {
        return Err(ScheduleError::NegativeMinimum {
            index: 0,
            min: first.min,
        });
    }

    let last_index = brackets.len() - 1;
    let mut previous_max: Option<Decimal> = None;

    for (index, bracket) in brackets.iter().enumerate() {
        if bracket.rate < Decimal::ZERO || bracket.rate > Decimal::ONE {
            return Err(ScheduleError::RateOutOfRange {
                index,
                rate: bracket.rate,
            });
        }

        if let Some(expected) = previous_max {
            if bracket.min != expected {
                return Err(ScheduleError::NotContiguous {
                    index,
                    expected,
                    found: bracket.min,
                });
            }
        }

        match bracket.max {
            Some(max) if max <= bracket.min => {
                return Err(ScheduleError::InvertedBounds {
                    index,
                    min: bracket.min,
                    max,
                });
            }
            Some(_) if index == last_index => {
                return Err(ScheduleError::BoundedTopBracket { index });
            }
            None if index != last_index => {
                return Err(ScheduleError::UnboundedBeforeEnd { index });
            }
            _ => {}
        }

        previous_max = bracket.max;
    }

    Ok(())
}

/// An ordered bracket list that satisfies every schedule invariant.
///
/// The brackets cannot be mutated after construction, so a schedule that
/// was valid once stays valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TaxSchedule {
    brackets: Vec<TaxBracket>,
}

impl TaxSchedule {
    pub fn new(brackets: Vec<TaxBracket>) -> Result<Self, ScheduleError> {
        validate_brackets(&brackets)?;
        Ok(Self { brackets })
    }

    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }

    /// Rate of the unbounded bracket, which every schedule ends with.
    pub fn top_rate(&self) -> Decimal {
        self.brackets[self.brackets.len() - 1].rate
    }

    pub fn into_brackets(self) -> Vec<TaxBracket> {
        self.brackets
    }
}

impl TryFrom<Vec<TaxBracket>> for TaxSchedule {
    type Error = ScheduleError;

    fn try_from(brackets: Vec<TaxBracket>) -> Result<Self, Self::Error> {
        Self::new(brackets)
    }
}
