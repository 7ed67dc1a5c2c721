//! Types for linear operators.

use derive_more::{Display, Into};
use num_traits::bounds::LowerBounded;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of rows and columns
/// of a square operator.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, PartialOrd, Ord, Hash, Into)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(into = "usize"))]
#[cfg_attr(feature = "serde", serde(try_from = "usize"))]
pub struct Dimension(usize);

impl LowerBounded for Dimension {
    fn min_value() -> Self {
        Self(1)
    }
}

/// Error returned when 'Dimension' is given a value below lower bound.
#[derive(Clone, Copy, Debug, thiserror::Error, PartialEq, Eq)]
#[error("{0} is below lower bound ({})", Dimension::min_value())]
pub struct InvalidDimensionError(usize);

impl Dimension {
    /// Return a new 'Dimension' if given a valid value.
    pub fn new(value: usize) -> Result<Self, InvalidDimensionError> {
        if Self(value) < Self::min_value() {
            Err(InvalidDimensionError(value))
        } else {
            Ok(Self(value))
        }
    }

    /// Unwrap 'Dimension' into inner value.
    pub fn into_inner(self) -> usize {
        self.0
    }

    /// Return `Ok` if `len` matches this dimension.
    pub fn check(self, len: usize) -> Result<(), DimensionMismatchError> {
        if len == self.0 {
            Ok(())
        } else {
            Err(DimensionMismatchError {
                expected: self.0,
                found: len,
            })
        }
    }
}

impl TryFrom<usize> for Dimension {
    type Error = InvalidDimensionError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Error returned when a vector does not fit an operator.
#[derive(Clone, Copy, Debug, thiserror::Error, PartialEq, Eq, Hash)]
#[error("expected vector of length {expected}, found length {found}")]
pub struct DimensionMismatchError {
    /// Length required by the operator.
    pub expected: usize,
    /// Length of the given vector.
    pub found: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimension_should_reject_zero() {
        assert_eq!(Dimension::new(0), Err(InvalidDimensionError(0)));
    }

    #[test]
    fn dimension_should_accept_one() {
        assert_eq!(Dimension::new(1).map(Dimension::into_inner), Ok(1));
    }

    #[test]
    fn check_should_report_expected_and_found_lengths() {
        assert_eq!(
            Dimension::new(3).unwrap().check(2),
            Err(DimensionMismatchError {
                expected: 3,
                found: 2
            })
        );
    }
}
