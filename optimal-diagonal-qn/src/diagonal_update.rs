//! Andrei's trace-constrained diagonal quasi-Newton update.
//!
//! The next approximate second-derivatives,
//! the approximate Hessian,
//! `B_{k+1}`,
//! are defined as
//! `B_{k+1} = B_k + q A_k - I`,
//! where
//! `A_k = diag(s_1^2, ..., s_n^2)`;
//! `q = (\vec{s}^T \vec{y} + \vec{s}^T \vec{s} - \vec{s}^T B_k \vec{s}) / tr(A_k^2)`;
//! `\vec{s} = \vec{x}_{k+1} - \vec{x}_k`;
//! `\vec{y} = \vec{dx}_{k+1} - \vec{dx}_k`;
//! `\vec{x}` is a point;
//! and `\vec{dx}` is the derivatives of a point.
//!
//! The result satisfies the weak secant equation,
//! `\vec{s}^T B_{k+1} \vec{s} = \vec{s}^T \vec{y}`.

use ndarray::{Array1, ArrayView1, ArrayViewMut1, AsArray, LinalgScalar, Zip};
use num_traits::Float;
use optimal_linear_operator::{
    diag_apply, DiagonalOperator, Dimension, DimensionMismatchError, InvalidDimensionError,
    LinearOperator,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "serde")]
use crate::types::DiagonalState;

use crate::{all_finite, CurvaturePair, Denominator, UpdateError};

/// Diagonal approximate second-derivatives
/// updated by Andrei's rule.
#[derive(Clone, Debug, derive_getters::Getters)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct DiagonalUpdate<A> {
    /// Diagonal of the approximation.
    diagonal: Array1<A>,
    #[getter(skip)]
    dimension: Dimension,
    #[getter(skip)]
    #[cfg_attr(feature = "serde", serde(skip))]
    scratch: Array1<A>,
}

impl<A> DiagonalUpdate<A>
where
    A: LinalgScalar,
{
    /// Return an approximation starting from `initial_diagonal`,
    /// typically the true second-derivatives at a starting point
    /// or a multiple of the identity.
    pub fn new(initial_diagonal: Array1<A>) -> Result<Self, InvalidDimensionError> {
        let dimension = Dimension::new(initial_diagonal.len())?;
        Ok(Self {
            diagonal: initial_diagonal,
            dimension,
            scratch: Array1::zeros(dimension.into_inner()),
        })
    }

    fn resize_scratch(&mut self) {
        if self.scratch.len() != self.dimension.into_inner() {
            self.scratch = Array1::zeros(self.dimension.into_inner());
        }
    }
}

impl<A> DiagonalUpdate<A>
where
    A: Float + LinalgScalar,
{
    /// Update this approximation
    /// from step `s`
    /// and change in derivatives `y`.
    ///
    /// Fails without changing the approximation
    /// if `s` is zero.
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

        let tr_a2 = s.fold(A::zero(), |acc, &x| acc + x.powi(4));
        if tr_a2.is_zero() {
            return Err(Denominator::SumOfFourthPowers.reject("diagonal", self.dimension));
        }

        self.resize_scratch();
        diag_apply(
            self.diagonal.view(),
            s,
            A::one(),
            A::zero(),
            self.scratch.view_mut(),
        );
        let s_t_b_s = s.dot(&self.scratch);
        let q = (s.dot(&y) + s.dot(&s) - s_t_b_s) / tr_a2;

        Zip::from(&mut self.scratch)
            .and(&self.diagonal)
            .and(&s)
            .for_each(|new, &d, &x| *new = d + q * x * x - A::one());
        if !all_finite(&self.scratch) {
            return Err(Denominator::SumOfFourthPowers.reject("diagonal", self.dimension));
        }
        std::mem::swap(&mut self.diagonal, &mut self.scratch);

        log::trace!("applied diagonal update of dimension {}", self.dimension);
        Ok(())
    }

    /// Update this approximation from `pair`.
    ///
    /// See [`Self::update`].
    pub fn update_from(&mut self, pair: &CurvaturePair<A>) -> Result<(), UpdateError> {
        self.update(pair.step(), pair.gradient_diff())
    }
}

#[cfg(feature = "serde")]
impl<'de, A> Deserialize<'de> for DiagonalUpdate<A>
where
    A: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let (diagonal, dimension) = DiagonalState::deserialize(deserializer)?
            .into_parts()
            .map_err(serde::de::Error::custom)?;
        Ok(Self {
            diagonal,
            dimension,
            scratch: Array1::from_vec(Vec::new()),
        })
    }
}

impl<A> LinearOperator for DiagonalUpdate<A>
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
        diag_apply(self.diagonal.view(), v, alpha, beta, out);
        Ok(())
    }
}

impl<A> DiagonalOperator for DiagonalUpdate<A>
where
    A: LinalgScalar,
{
    fn dimension(&self) -> Dimension {
        self.dimension
    }

    fn to_diagonal(&self) -> Array1<A> {
        self.diagonal.clone()
    }
}
