//! Element-wise products backing diagonal operators.
//!
//! These functions do not validate lengths
//! beyond debug assertions.
//! Operators are expected to check lengths
//! before calling them.

use ndarray::{ArrayView1, ArrayViewMut1, LinalgScalar, Zip};

/// Compute `out = alpha (\vec{d} \odot \vec{v}) + beta out`,
/// where `\vec{d}` is `diagonal`
/// and `\odot` is the element-wise product.
///
/// When `beta` is zero,
/// `out` is only written,
/// never read,
/// so it may contain any values,
/// including NaN.
pub fn diag_apply<A>(
    diagonal: ArrayView1<A>,
    v: ArrayView1<A>,
    alpha: A,
    beta: A,
    mut out: ArrayViewMut1<A>,
) where
    A: LinalgScalar,
{
    debug_assert_eq!(diagonal.len(), v.len());
    debug_assert_eq!(diagonal.len(), out.len());
    if beta.is_zero() {
        Zip::from(&mut out)
            .and(&diagonal)
            .and(&v)
            .for_each(|o, &d, &x| *o = alpha * (d * x));
    } else {
        Zip::from(&mut out)
            .and(&diagonal)
            .and(&v)
            .for_each(|o, &d, &x| *o = alpha * (d * x) + beta * *o);
    }
}

/// Compute `out = alpha (d \vec{v}) + beta out`,
/// a diagonal product
/// where every diagonal element is `d`.
///
/// See [`diag_apply`] for the handling of `beta = 0`.
pub fn scalar_apply<A>(d: A, v: ArrayView1<A>, alpha: A, beta: A, mut out: ArrayViewMut1<A>)
where
    A: LinalgScalar,
{
    debug_assert_eq!(v.len(), out.len());
    let coeff = alpha * d;
    if beta.is_zero() {
        Zip::from(&mut out).and(&v).for_each(|o, &x| *o = coeff * x);
    } else {
        Zip::from(&mut out)
            .and(&v)
            .for_each(|o, &x| *o = coeff * x + beta * *o);
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use ndarray::{array, Array1};
    use proptest::prelude::*;
    use test_strategy::proptest;

    use super::*;

    #[test]
    fn diag_apply_should_scale_each_element() {
        let mut out = Array1::zeros(3);
        diag_apply(
            array![1.0, 2.0, 3.0].view(),
            array![4.0, 5.0, 6.0].view(),
            2.0,
            0.0,
            out.view_mut(),
        );
        assert_eq!(out, array![8.0, 20.0, 36.0]);
    }

    #[test]
    fn diag_apply_should_accumulate_when_beta_is_nonzero() {
        let mut out = array![1.0, 1.0, 1.0];
        diag_apply(
            array![1.0, 2.0, 3.0].view(),
            array![1.0, 1.0, 1.0].view(),
            1.0,
            -2.0,
            out.view_mut(),
        );
        assert_eq!(out, array![-1.0, 0.0, 1.0]);
    }

    #[test]
    fn diag_apply_should_ignore_garbage_in_out_when_beta_is_zero() {
        let mut out = Array1::from_elem(2, f64::NAN);
        diag_apply(
            array![1.0, 2.0].view(),
            array![3.0, 4.0].view(),
            1.0,
            0.0,
            out.view_mut(),
        );
        assert_eq!(out, array![3.0, 8.0]);
    }

    #[test]
    fn scalar_apply_should_ignore_garbage_in_out_when_beta_is_zero() {
        let mut out = Array1::from_elem(2, f64::NAN);
        scalar_apply(3.0, array![1.0, -2.0].view(), 0.5, 0.0, out.view_mut());
        assert_eq!(out, array![1.5, -3.0]);
    }

    #[proptest]
    fn scalar_apply_should_match_diag_apply_with_repeated_diagonal(
        #[strategy(-100.0..100.0)] d: f64,
        #[strategy(proptest::collection::vec(-100.0..100.0, 1..10))] v: Vec<f64>,
        #[strategy(-10.0..10.0)] alpha: f64,
        #[strategy(-10.0..10.0)] beta: f64,
    ) {
        let v = Array1::from(v);
        let diagonal = Array1::from_elem(v.len(), d);
        let mut expected = Array1::ones(v.len());
        let mut actual = Array1::ones(v.len());
        diag_apply(diagonal.view(), v.view(), alpha, beta, expected.view_mut());
        scalar_apply(d, v.view(), alpha, beta, actual.view_mut());
        assert_abs_diff_eq!(
            actual.as_slice().unwrap(),
            expected.as_slice().unwrap(),
            epsilon = 1e-9
        );
    }
}
