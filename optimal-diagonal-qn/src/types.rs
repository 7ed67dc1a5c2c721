//! Errors and serialized state for diagonal quasi-Newton updates.

use derive_more::Display;
use optimal_linear_operator::{Dimension, DimensionMismatchError};

#[cfg(feature = "serde")]
use ndarray::Array1;
#[cfg(feature = "serde")]
use serde::Deserialize;

/// Error returned when an update cannot be applied.
///
/// The operator is left exactly as it was
/// before the failed update.
#[derive(Clone, Copy, Debug, thiserror::Error, PartialEq, Eq, Hash)]
pub enum UpdateError {
    /// A vector did not match the dimension of the operator.
    #[error(transparent)]
    DimensionMismatch(#[from] DimensionMismatchError),
    /// A required denominator was zero,
    /// or so close to zero
    /// its quotient was not finite,
    /// so the step carries no usable curvature information.
    #[error("degenerate step: {0} is zero")]
    DegenerateStep(Denominator),
}

/// Quantity an update divides by.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash)]
pub enum Denominator {
    /// `\sum_i s_i^4`,
    /// the trace of the squared step-matrix.
    #[display(fmt = "sum of fourth powers of the step")]
    SumOfFourthPowers,
    /// `\vec{s}^T \vec{s}`.
    #[display(fmt = "squared norm of the step")]
    StepNorm,
    /// `\vec{s}^T \vec{u}`.
    #[display(fmt = "product of the step and auxiliary vector")]
    StepDotAuxiliary,
    /// `\hat{y}^T \vec{s}`.
    #[display(fmt = "product of the modified gradient difference and step")]
    ModifiedSecantDotStep,
}

impl Denominator {
    /// Log a rejected update
    /// and return the corresponding error.
    pub(crate) fn reject(self, rule: &str, dimension: Dimension) -> UpdateError {
        log::debug!("rejected {rule} update of dimension {dimension}: {self} is zero");
        UpdateError::DegenerateStep(self)
    }
}

/// Serialized state of an approximation storing a diagonal.
#[cfg(feature = "serde")]
#[derive(Deserialize)]
pub(crate) struct DiagonalState<A> {
    diagonal: Array1<A>,
    dimension: Dimension,
}

#[cfg(feature = "serde")]
impl<A> DiagonalState<A> {
    /// Return the diagonal and its dimension,
    /// failing if they disagree.
    pub(crate) fn into_parts(self) -> Result<(Array1<A>, Dimension), DimensionMismatchError> {
        self.dimension.check(self.diagonal.len())?;
        Ok((self.diagonal, self.dimension))
    }
}
