//! Diagonal modified symmetric-rank-one (SR1) update.
//!
//! The change in derivatives is first corrected
//! with function-values,
//! `\hat{y} = \vec{y} + (|\psi| / (\vec{s}^T \vec{u})) \vec{u} - B_k \vec{s}`,
//! where
//! `\psi = 2 z + \vec{t}^T \vec{s}`;
//! `\vec{s} = \vec{x}_{k+1} - \vec{x}_k`;
//! `\vec{y} = \vec{dx}_{k+1} - \vec{dx}_k`;
//! `\vec{t} = \vec{dx}_k + \vec{dx}_{k+1}`;
//! `z = f(\vec{x}_k) - f(\vec{x}_{k+1})`;
//! and `\vec{u}` is an auxiliary vector,
//! see [`SecantVariant`].
//!
//! The next approximate second-derivatives are then
//! `B_{k+1} = B_k + \sigma I`,
//! where
//! `\sigma = (\hat{y}^T \hat{y}) / (\hat{y}^T \vec{s})`.
//! Every diagonal element shifts by the same `\sigma`.

use ndarray::{Array1, ArrayView1, ArrayViewMut1, AsArray, LinalgScalar};
use num_traits::Float;
use optimal_linear_operator::{
    diag_apply, DiagonalOperator, Dimension, DimensionMismatchError, InvalidDimensionError,
    LinearOperator,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "serde")]
use crate::types::DiagonalState;

use crate::{all_finite, CurvaturePair, Denominator, SecantVariant, UpdateError};

/// Diagonal approximate second-derivatives
/// updated by the modified SR1 rule.
#[derive(Clone, Debug, derive_getters::Getters)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ModifiedSr1Update<A> {
    /// Diagonal of the approximation.
    diagonal: Array1<A>,
    #[getter(skip)]
    dimension: Dimension,
    #[getter(skip)]
    #[cfg_attr(feature = "serde", serde(skip))]
    scratch: Array1<A>,
}

impl<A> ModifiedSr1Update<A>
where
    A: LinalgScalar,
{
    /// Return an approximation starting from `initial_diagonal`.
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

impl<A> ModifiedSr1Update<A>
where
    A: Float + LinalgScalar,
{
    /// Update this approximation.
    ///
    /// # Arguments
    ///
    /// - `s`: step
    /// - `y`: change in derivatives
    /// - `t`: sum of derivatives before and after the step
    /// - `z`: decrease in value from the step
    /// - `u`: auxiliary vector
    ///
    /// Fails without changing the approximation
    /// if `\vec{s}^T \vec{u}` or `\hat{y}^T \vec{s}` is zero.
    pub fn update<'a>(
        &mut self,
        s: impl AsArray<'a, A>,
        y: impl AsArray<'a, A>,
        t: impl AsArray<'a, A>,
        z: A,
        u: impl AsArray<'a, A>,
    ) -> Result<(), UpdateError>
    where
        A: 'a,
    {
        let s: ArrayView1<A> = s.into();
        let y: ArrayView1<A> = y.into();
        let t: ArrayView1<A> = t.into();
        let u: ArrayView1<A> = u.into();
        for len in [s.len(), y.len(), t.len(), u.len()] {
            self.dimension.check(len)?;
        }

        let psi = z + z + t.dot(&s);
        let s_t_u = s.dot(&u);
        if s_t_u.is_zero() {
            return Err(Denominator::StepDotAuxiliary.reject("modified SR1", self.dimension));
        }
        let coeff = psi.abs() / s_t_u;
        if !coeff.is_finite() {
            return Err(Denominator::StepDotAuxiliary.reject("modified SR1", self.dimension));
        }

        // `scratch` holds `\hat{y}`.
        self.resize_scratch();
        self.scratch.assign(&y);
        self.scratch.scaled_add(coeff, &u);
        diag_apply(
            self.diagonal.view(),
            s,
            -A::one(),
            A::one(),
            self.scratch.view_mut(),
        );

        let y_hat_t_s = self.scratch.dot(&s);
        if y_hat_t_s.is_zero() {
            return Err(Denominator::ModifiedSecantDotStep.reject("modified SR1", self.dimension));
        }
        let sigma = self.scratch.dot(&self.scratch) / y_hat_t_s;
        if !sigma.is_finite() {
            return Err(Denominator::ModifiedSecantDotStep.reject("modified SR1", self.dimension));
        }

        self.scratch.assign(&self.diagonal);
        self.scratch.mapv_inplace(|d| d + sigma);
        if !all_finite(&self.scratch) {
            return Err(Denominator::ModifiedSecantDotStep.reject("modified SR1", self.dimension));
        }
        std::mem::swap(&mut self.diagonal, &mut self.scratch);

        log::trace!("applied modified SR1 update of dimension {}", self.dimension);
        Ok(())
    }

    /// Update this approximation from `pair`,
    /// taking the auxiliary vector selected by `variant`.
    ///
    /// See [`Self::update`].
    pub fn update_from(
        &mut self,
        pair: &CurvaturePair<A>,
        variant: SecantVariant,
    ) -> Result<(), UpdateError> {
        self.update(
            pair.step(),
            pair.gradient_diff(),
            pair.gradient_sum(),
            *pair.value_decrease(),
            variant.auxiliary(pair),
        )
    }
}

#[cfg(feature = "serde")]
impl<'de, A> Deserialize<'de> for ModifiedSr1Update<A>
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

impl<A> LinearOperator for ModifiedSr1Update<A>
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

impl<A> DiagonalOperator for ModifiedSr1Update<A>
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

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use ndarray::array;
    use proptest::prelude::*;
    use test_strategy::proptest;

    use crate::Evaluation;

    use super::*;

    // `f(x) = x_1^2 + 1.5 x_2^2 + 2 x_3^2`.
    const TRUE_DIAGONAL: [f64; 3] = [2.0, 3.0, 4.0];

    fn quadratic(point: Array1<f64>) -> Evaluation<f64> {
        let d = Array1::from(TRUE_DIAGONAL.to_vec());
        let gradient = &d * &point;
        let value = 0.5 * point.dot(&gradient);
        Evaluation::new(point, value, gradient)
    }

    fn quadratic_pair() -> CurvaturePair<f64> {
        CurvaturePair::between(
            &quadratic(array![1.0, 1.0, 1.0]),
            &quadratic(array![2.0, 2.0, 2.0]),
        )
        .unwrap()
    }

    #[test]
    fn update_should_move_towards_true_second_derivatives_of_a_quadratic() {
        let true_diagonal = Array1::from(TRUE_DIAGONAL.to_vec());
        for variant in [
            SecantVariant::Step,
            SecantVariant::GradientDifference,
            SecantVariant::PreviousGradient,
        ] {
            let mut b = ModifiedSr1Update::new(array![1.0, 1.0, 1.0]).unwrap();
            let before = max_abs_diff(b.diagonal(), &true_diagonal);
            b.update_from(&quadratic_pair(), variant).unwrap();

            assert_abs_diff_eq!(
                b.diagonal().as_slice().unwrap(),
                [10.0 / 3.0; 3].as_slice(),
                epsilon = 1e-12
            );
            assert!(max_abs_diff(b.diagonal(), &true_diagonal) < before);
        }
    }

    #[test]
    fn update_should_shift_every_element_by_the_same_amount() {
        // `\psi = 2 (0.5) + 3.5 = 4.5`,
        // `\hat{y} = [4.6, 1.8]`,
        // `\sigma = 24.4 / 5.5`.
        let s = array![1.0, 0.5];
        let mut b = ModifiedSr1Update::new(array![1.0, 2.0]).unwrap();
        b.update(&s, &array![2.0, 1.0], &array![3.0, 1.0], 0.5, &s)
            .unwrap();
        let sigma = 24.4 / 5.5;
        assert_abs_diff_eq!(
            b.diagonal().as_slice().unwrap(),
            [1.0 + sigma, 2.0 + sigma].as_slice(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn update_should_use_magnitude_of_psi() {
        // `\psi = 2 (-5) + 3.5 = -6.5`,
        // `\hat{y} = [6.2, 2.6]`,
        // `\sigma = 45.2 / 7.5`.
        let s = array![1.0, 0.5];
        let mut b = ModifiedSr1Update::new(array![1.0, 2.0]).unwrap();
        b.update(&s, &array![2.0, 1.0], &array![3.0, 1.0], -5.0, &s)
            .unwrap();
        let sigma = 45.2 / 7.5;
        assert_abs_diff_eq!(
            b.diagonal().as_slice().unwrap(),
            [1.0 + sigma, 2.0 + sigma].as_slice(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn update_should_fail_if_step_is_orthogonal_to_auxiliary_vector() {
        let mut b = ModifiedSr1Update::new(array![1.0, 2.0]).unwrap();
        assert_eq!(
            b.update(
                &array![1.0, -1.0],
                &array![1.0, 1.0],
                &array![1.0, 1.0],
                1.0,
                &array![1.0, 1.0],
            ),
            Err(UpdateError::DegenerateStep(Denominator::StepDotAuxiliary))
        );
        assert_eq!(b.diagonal(), &array![1.0, 2.0]);
    }

    #[test]
    fn update_should_fail_if_modified_secant_is_orthogonal_to_step() {
        // With exact second-derivatives of a quadratic,
        // `\psi = 0`
        // and `\hat{y} = \vec{y} - B_k \vec{s} = 0`.
        let initial = Array1::from(TRUE_DIAGONAL.to_vec());
        let mut b = ModifiedSr1Update::new(initial.clone()).unwrap();
        assert_eq!(
            b.update_from(&quadratic_pair(), SecantVariant::Step),
            Err(UpdateError::DegenerateStep(
                Denominator::ModifiedSecantDotStep
            ))
        );
        assert_eq!(b.diagonal(), &initial);
    }

    #[test]
    fn update_should_reject_mismatched_lengths() {
        let mut b = ModifiedSr1Update::new(array![1.0, 2.0]).unwrap();
        assert_eq!(
            b.update(
                &array![1.0, 1.0],
                &array![1.0, 1.0],
                &array![1.0, 1.0],
                1.0,
                &array![1.0],
            ),
            Err(UpdateError::DimensionMismatch(DimensionMismatchError {
                expected: 2,
                found: 1
            }))
        );
        assert_eq!(b.diagonal(), &array![1.0, 2.0]);
    }

    #[test]
    fn apply_should_reject_mismatched_lengths() {
        let b = ModifiedSr1Update::new(array![1.0, 2.0]).unwrap();
        assert_eq!(
            b.apply(array![1.0].view()),
            Err(DimensionMismatchError {
                expected: 2,
                found: 1
            })
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialize_should_reject_diagonal_not_matching_dimension() {
        assert!(serde_json::from_str::<ModifiedSr1Update<f64>>(
            r#"{"diagonal":{"v":1,"dim":[3],"data":[1.0,2.0,3.0]},"dimension":4}"#
        )
        .is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn update_should_match_after_deserializing() {
        let mut b = ModifiedSr1Update::new(array![1.0, 1.0, 1.0]).unwrap();
        let mut restored: ModifiedSr1Update<f64> =
            serde_json::from_str(&serde_json::to_string(&b).unwrap()).unwrap();
        b.update_from(&quadratic_pair(), SecantVariant::Step).unwrap();
        restored
            .update_from(&quadratic_pair(), SecantVariant::Step)
            .unwrap();
        assert_eq!(restored.diagonal(), b.diagonal());
    }

    #[proptest]
    fn apply_should_not_change_the_operator(
        #[strategy(proptest::collection::vec(-10.0..10.0, 4))] initial: Vec<f64>,
        #[strategy(proptest::collection::vec(-10.0..10.0, 4))] v: Vec<f64>,
    ) {
        let b = ModifiedSr1Update::new(Array1::from(initial)).unwrap();
        let v = Array1::from(v);
        prop_assert_eq!(b.apply(v.view()).unwrap(), b.apply(v.view()).unwrap());
    }

    #[proptest]
    fn dense_diagonal_should_reproduce_stored_diagonal(
        #[strategy(proptest::collection::vec(-1e6..1e6, 1..8))] initial: Vec<f64>,
    ) {
        let b = ModifiedSr1Update::new(Array1::from(initial)).unwrap();
        prop_assert_eq!(&b.to_dense().diag().to_owned(), b.diagonal());
    }

    fn max_abs_diff(xs: &Array1<f64>, ys: &Array1<f64>) -> f64 {
        (xs - ys).fold(0.0, |acc, x| f64::max(acc, x.abs()))
    }
}
