//! Curvature information gathered between two points.
//!
//! Update rules consume differences between consecutive evaluations
//! of an objective-function.
//! Given evaluations at `\vec{x}_k` and `\vec{x}_{k+1}`,
//!
//! - `\vec{s} = \vec{x}_{k+1} - \vec{x}_k`, the step;
//! - `\vec{y} = \vec{dx}_{k+1} - \vec{dx}_k`, the change in derivatives;
//! - `\vec{t} = \vec{dx}_k + \vec{dx}_{k+1}`, the sum of derivatives;
//! - `z = f(\vec{x}_k) - f(\vec{x}_{k+1})`, the decrease in value;
//!
//! where `\vec{dx}` is the derivatives of a point.

use ndarray::{Array1, ArrayView1, LinalgScalar};
use optimal_linear_operator::DimensionMismatchError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An objective-function evaluated at a point,
/// with derivatives.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Evaluation<A> {
    /// Point evaluated.
    pub point: Array1<A>,
    /// Value of the objective-function at `point`.
    pub value: A,
    /// Derivatives of the objective-function at `point`.
    pub gradient: Array1<A>,
}

impl<A> Evaluation<A> {
    /// Return a new evaluation.
    pub fn new(point: Array1<A>, value: A, gradient: Array1<A>) -> Self {
        Self {
            point,
            value,
            gradient,
        }
    }
}

/// Differences between two evaluations,
/// as consumed by update rules.
#[derive(Clone, Debug, PartialEq, derive_getters::Getters)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CurvaturePair<A> {
    /// `\vec{s}`.
    step: Array1<A>,
    /// `\vec{y}`.
    gradient_diff: Array1<A>,
    /// `\vec{t}`.
    gradient_sum: Array1<A>,
    /// `z`.
    value_decrease: A,
    /// `\vec{dx}_k`.
    prev_gradient: Array1<A>,
}

impl<A> CurvaturePair<A>
where
    A: LinalgScalar,
{
    /// Return curvature information
    /// from moving from `prev` to `next`.
    ///
    /// Fails if points and derivatives
    /// do not all have the same length.
    pub fn between(prev: &Evaluation<A>, next: &Evaluation<A>) -> Result<Self, DimensionMismatchError> {
        let len = prev.point.len();
        for found in [prev.gradient.len(), next.point.len(), next.gradient.len()] {
            if found != len {
                return Err(DimensionMismatchError {
                    expected: len,
                    found,
                });
            }
        }
        Ok(Self {
            step: &next.point - &prev.point,
            gradient_diff: &next.gradient - &prev.gradient,
            gradient_sum: &prev.gradient + &next.gradient,
            value_decrease: prev.value - next.value,
            prev_gradient: prev.gradient.clone(),
        })
    }
}

/// Choice of auxiliary vector,
/// `\vec{u}`,
/// for the modified symmetric-rank-one update.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SecantVariant {
    /// `\vec{u} = \vec{s}`.
    #[default]
    Step,
    /// `\vec{u} = \vec{y}`.
    GradientDifference,
    /// `\vec{u} = \vec{dx}_k`.
    PreviousGradient,
}

impl SecantVariant {
    /// Return the auxiliary vector this variant selects from `pair`.
    pub fn auxiliary<'a, A>(self, pair: &'a CurvaturePair<A>) -> ArrayView1<'a, A> {
        match self {
            SecantVariant::Step => pair.step.view(),
            SecantVariant::GradientDifference => pair.gradient_diff.view(),
            SecantVariant::PreviousGradient => pair.prev_gradient.view(),
        }
    }
}
