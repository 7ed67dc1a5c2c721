#![warn(missing_debug_implementations)]
#![warn(missing_docs)]

//! Matrix-free approximations of second-derivatives
//! for optimization.
//!
//! Optimal Hessian provides diagonal quasi-Newton approximations
//! of the Hessian of an objective-function,
//! usable anywhere a [`LinearOperator`] is expected.
//! Approximations are updated in place
//! from evaluations at consecutive points.
//!
//! # Examples
//!
//! Approximate second-derivatives of the "sphere" problem,
//! and use them to scale the derivatives of a point:
//!
//! ```
//! use ndarray::{array, Array1};
//! use optimal_hessian::{prelude::*, DiagonalHessianConfig, Evaluation, Strategy};
//!
//! fn evaluate(point: Array1<f64>) -> Evaluation<f64> {
//!     let value = point.iter().map(|x| x.powi(2)).sum();
//!     let gradient = point.mapv(|x| 2.0 * x);
//!     Evaluation::new(point, value, gradient)
//! }
//!
//! let mut hessian = DiagonalHessianConfig::new(Strategy::Spectral)
//!     .start(Array1::ones(2))
//!     .unwrap();
//! let prev = evaluate(array![1.0, 2.0]);
//! let next = evaluate(array![0.5, 1.0]);
//! hessian.update(&prev, &next).unwrap();
//! println!("{:?}", hessian.apply(next.gradient.view()).unwrap());
//! ```
//!
//! For more control over updates,
//! see individual packages.

pub mod prelude;

use ndarray::{Array1, ArrayView1, ArrayViewMut1, LinalgScalar};
use num_traits::{Float, FromPrimitive};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub use optimal_diagonal_qn as diagonal_qn;
pub use optimal_diagonal_qn::{
    CurvaturePair, Denominator, DiagonalUpdate, Evaluation, ModifiedSr1Update, SecantVariant,
    SpectralUpdate, UpdateError,
};
pub use optimal_linear_operator as linear_operator;
pub use optimal_linear_operator::{
    diag_apply, scalar_apply, DiagonalOperator, Dimension, DimensionMismatchError,
    InvalidDimensionError, LinearOperator,
};

/// Rule used to update a [`DiagonalHessian`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Strategy {
    /// See [`DiagonalUpdate`].
    #[default]
    Diagonal,
    /// See [`SpectralUpdate`].
    Spectral,
    /// See [`ModifiedSr1Update`].
    ModifiedSr1(SecantVariant),
}

/// Diagonal approximate second-derivatives
/// updated by a rule chosen at runtime.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(bound(
        serialize = "A: Serialize",
        deserialize = "A: Deserialize<'de>"
    ))
)]
pub enum DiagonalHessian<A> {
    /// Andrei's trace-constrained diagonal update.
    Diagonal(DiagonalUpdate<A>),
    /// Barzilai-Borwein multiple of the identity.
    Spectral(SpectralUpdate<A>),
    /// Modified symmetric-rank-one diagonal update
    /// with its choice of auxiliary vector.
    ModifiedSr1(ModifiedSr1Update<A>, SecantVariant),
}

/// Diagonal Hessian configuration parameters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DiagonalHessianConfig {
    /// Rule used to update the approximation.
    pub strategy: Strategy,
}

impl DiagonalHessianConfig {
    /// Convenience function to return a configuration
    /// using `strategy`.
    pub fn new(strategy: Strategy) -> Self {
        Self { strategy }
    }

    /// Return an approximation
    /// starting from `initial_diagonal`.
    ///
    /// A spectral approximation starts from
    /// the mean of `initial_diagonal`.
    pub fn start<A>(
        self,
        initial_diagonal: Array1<A>,
    ) -> Result<DiagonalHessian<A>, InvalidDimensionError>
    where
        A: LinalgScalar + FromPrimitive,
    {
        let hessian = match self.strategy {
            Strategy::Diagonal => DiagonalHessian::Diagonal(DiagonalUpdate::new(initial_diagonal)?),
            Strategy::Spectral => {
                DiagonalHessian::Spectral(SpectralUpdate::from_diagonal(&initial_diagonal)?)
            }
            Strategy::ModifiedSr1(variant) => {
                DiagonalHessian::ModifiedSr1(ModifiedSr1Update::new(initial_diagonal)?, variant)
            }
        };
        log::debug!(
            "started {:?} approximation of dimension {}",
            self.strategy,
            hessian.dimension()
        );
        Ok(hessian)
    }
}

impl<A> DiagonalHessian<A> {
    /// Return the rule updating this approximation.
    pub fn strategy(&self) -> Strategy {
        match self {
            DiagonalHessian::Diagonal(_) => Strategy::Diagonal,
            DiagonalHessian::Spectral(_) => Strategy::Spectral,
            DiagonalHessian::ModifiedSr1(_, variant) => Strategy::ModifiedSr1(*variant),
        }
    }
}

impl<A> DiagonalHessian<A>
where
    A: Float + LinalgScalar,
{
    /// Update this approximation
    /// from moving from `prev` to `next`.
    ///
    /// Fails without changing the approximation
    /// if lengths do not match
    /// or the step is degenerate for the chosen rule.
    pub fn update(&mut self, prev: &Evaluation<A>, next: &Evaluation<A>) -> Result<(), UpdateError> {
        self.update_from(&CurvaturePair::between(prev, next)?)
    }

    /// Update this approximation from `pair`.
    pub fn update_from(&mut self, pair: &CurvaturePair<A>) -> Result<(), UpdateError> {
        match self {
            DiagonalHessian::Diagonal(x) => x.update_from(pair),
            DiagonalHessian::Spectral(x) => x.update_from(pair),
            DiagonalHessian::ModifiedSr1(x, variant) => x.update_from(pair, *variant),
        }
    }
}

impl<A> LinearOperator for DiagonalHessian<A>
where
    A: LinalgScalar,
{
    type Elem = A;

    fn nrows(&self) -> usize {
        self.dimension().into_inner()
    }

    fn ncols(&self) -> usize {
        self.dimension().into_inner()
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
        match self {
            DiagonalHessian::Diagonal(x) => x.apply_into(v, alpha, beta, out),
            DiagonalHessian::Spectral(x) => x.apply_into(v, alpha, beta, out),
            DiagonalHessian::ModifiedSr1(x, _) => x.apply_into(v, alpha, beta, out),
        }
    }
}

impl<A> DiagonalOperator for DiagonalHessian<A>
where
    A: LinalgScalar,
{
    fn dimension(&self) -> Dimension {
        match self {
            DiagonalHessian::Diagonal(x) => x.dimension(),
            DiagonalHessian::Spectral(x) => x.dimension(),
            DiagonalHessian::ModifiedSr1(x, _) => x.dimension(),
        }
    }

    fn to_diagonal(&self) -> Array1<A> {
        match self {
            DiagonalHessian::Diagonal(x) => x.to_diagonal(),
            DiagonalHessian::Spectral(x) => x.to_diagonal(),
            DiagonalHessian::ModifiedSr1(x, _) => x.to_diagonal(),
        }
    }
}
