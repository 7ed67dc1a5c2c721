#![warn(missing_debug_implementations)]
#![warn(missing_docs)]

//! Diagonal quasi-Newton approximations of second-derivatives.
//!
//! Each approximation stores only the diagonal
//! of an implicit `n` by `n` operator,
//! requiring `n` memory
//! and `n` time to multiply a vector.
//! Approximations are updated in place
//! from curvature information between two points:
//!
//! - [`DiagonalUpdate`], Andrei's trace-constrained diagonal update;
//! - [`SpectralUpdate`], a Barzilai-Borwein multiple of the identity;
//! - [`ModifiedSr1Update`], a modified symmetric-rank-one diagonal update.
//!
//! Approximations are not guaranteed to be positive-definite.
//!
//! # Examples
//!
//! ```
//! use ndarray::array;
//! use optimal_diagonal_qn::{CurvaturePair, DiagonalUpdate, Evaluation};
//! use optimal_linear_operator::LinearOperator;
//!
//! let prev = Evaluation::new(array![1.0, 1.0], 2.5, array![2.0, 3.0]);
//! let next = Evaluation::new(array![0.5, 0.5], 0.625, array![1.0, 1.5]);
//!
//! let mut b = DiagonalUpdate::new(array![1.0, 1.0]).unwrap();
//! b.update_from(&CurvaturePair::between(&prev, &next).unwrap())
//!     .unwrap();
//! println!("{:?}", b.apply(next.gradient.view()).unwrap());
//! ```

mod curvature;
mod diagonal_update;
mod modified_sr1_update;
mod spectral_update;
mod types;

use ndarray::Array1;
use num_traits::Float;

pub use self::{
    curvature::*, diagonal_update::*, modified_sr1_update::*, spectral_update::*, types::*,
};

fn all_finite<A>(xs: &Array1<A>) -> bool
where
    A: Float,
{
    xs.iter().all(|x| x.is_finite())
}
