//! Spectral,
//! or Barzilai-Borwein,
//! approximation of second-derivatives
//! by a multiple of the identity.
//!
//! The next approximate second-derivatives are
//! `B_{k+1} = \sigma I`,
//! where
//! `\sigma = (\vec{s}^T \vec{y}) / (\vec{s}^T \vec{s})`,
//! `\vec{s}` is the step,
//! and `\vec{y}` is the change in derivatives.
//! The previous approximation does not affect the next.

use ndarray::{Array1, ArrayView1, ArrayViewMut1, AsArray, LinalgScalar};
use num_traits::{Float, FromPrimitive};
use optimal_linear_operator::{
    scalar_apply, DiagonalOperator, Dimension, DimensionMismatchError, InvalidDimensionError,
    LinearOperator,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{CurvaturePair, Denominator, UpdateError};

/// Approximate second-derivatives
/// as one value repeated along the diagonal.
#[derive(Clone, Copy, Debug, PartialEq, derive_getters::Getters)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SpectralUpdate<A> {
    /// Value of every diagonal element.
    scalar: A,
    #[getter(skip)]
    dimension: Dimension,
}

impl<A> SpectralUpdate<A> {
    /// Return `scalar` times the identity
    /// of size `dimension`.
    pub fn new(scalar: A, dimension: Dimension) -> Self {
        Self { scalar, dimension }
    }

    /// Return an approximation
    /// from the arithmetic mean of `diagonal`,
    /// such as an estimate of second-derivatives.
    pub fn from_diagonal<'a>(diagonal: impl AsArray<'a, A>) -> Result<Self, InvalidDimensionError>
    where
        A: 'a + LinalgScalar + FromPrimitive,
    {
        let diagonal: ArrayView1<A> = diagonal.into();
        let dimension = Dimension::new(diagonal.len())?;
        // `mean` is only `None` for empty arrays,
        // and those have no valid dimension.
        Ok(Self::new(diagonal.mean().unwrap_or_else(A::zero), dimension))
    }
}

impl<A> SpectralUpdate<A>
where
    A: Float + LinalgScalar,
{
    /// Replace this approximation
    /// with one from step `s`
    /// and change in derivatives `y`.
    ///
    /// Fails without changing the approximation
    /// if every element of `s` is zero.
    pub fn update<'a>(
        &mut self,
        s: impl AsArray<'a, A>,
        y: impl AsArray<'a, A>,
    ) -> Result<(), UpdateError>
    where
        A: 'a,
    {
        let s: ArrayView1<A> = s.into();
        let y: ArrayView1<A> = y.into();
        self.dimension.check(s.len())?;
        self.dimension.check(y.len())?;

        if s.iter().all(|x| x.is_zero()) {
            return Err(Denominator::StepNorm.reject("spectral", self.dimension));
        }
        let scalar = s.dot(&y) / s.dot(&s);
        if !scalar.is_finite() {
            return Err(Denominator::StepNorm.reject("spectral", self.dimension));
        }
        self.scalar = scalar;

        log::trace!("applied spectral update of dimension {}", self.dimension);
        Ok(())
    }

    /// Update this approximation from `pair`.
    ///
    /// See [`Self::update`].
    pub fn update_from(&mut self, pair: &CurvaturePair<A>) -> Result<(), UpdateError> {
        self.update(pair.step(), pair.gradient_diff())
    }
}

impl<A> LinearOperator for SpectralUpdate<A>
where
    A: LinalgScalar,
{
    type Elem = A;

    fn nrows(&self) -> usize {
        self.dimension.into_inner()
    }

    fn ncols(&self) -> usize {
        self.dimension.into_inner()
    }

    fn is_symmetric(&self) -> bool {
        true
    }

    fn apply_into(
        &self,
        v: ArrayView1<A>,
        alpha: A,
        beta: A,
        out: ArrayViewMut1<A>,
    ) -> Result<(), DimensionMismatchError> {
        self.check_apply_lens(v.len(), out.len())?;
        scalar_apply(self.scalar, v, alpha, beta, out);
        Ok(())
    }
}

impl<A> DiagonalOperator for SpectralUpdate<A>
where
    A: LinalgScalar,
{
    fn dimension(&self) -> Dimension {
        self.dimension
    }

    fn to_diagonal(&self) -> Array1<A> {
        Array1::from_elem(self.dimension.into_inner(), self.scalar)
    }
}
