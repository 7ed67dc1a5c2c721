#![warn(missing_debug_implementations)]
#![warn(missing_docs)]

//! Matrix-free linear operators.
//!
//! A linear operator is anything that can multiply a vector
//! without necessarily storing a dense matrix.
//! Optimizers use them as curvature surrogates,
//! treating every implementation the same way
//! through [`LinearOperator`].
//!
//! # Examples
//!
//! ```
//! use ndarray::{array, Array1, ArrayView1, ArrayViewMut1};
//! use optimal_linear_operator::{diag_apply, DimensionMismatchError, LinearOperator};
//!
//! struct Scaling(Array1<f64>);
//!
//! impl LinearOperator for Scaling {
//!     type Elem = f64;
//!
//!     fn nrows(&self) -> usize {
//!         self.0.len()
//!     }
//!
//!     fn ncols(&self) -> usize {
//!         self.0.len()
//!     }
//!
//!     fn is_symmetric(&self) -> bool {
//!         true
//!     }
//!
//!     fn apply_into(
//!         &self,
//!         v: ArrayView1<f64>,
//!         alpha: f64,
//!         beta: f64,
//!         out: ArrayViewMut1<f64>,
//!     ) -> Result<(), DimensionMismatchError> {
//!         self.check_apply_lens(v.len(), out.len())?;
//!         diag_apply(self.0.view(), v, alpha, beta, out);
//!         Ok(())
//!     }
//! }
//!
//! let op = Scaling(array![1.0, 2.0]);
//! assert_eq!(op.apply(array![3.0, 4.0].view()).unwrap(), array![3.0, 8.0]);
//! ```

mod apply;
mod types;

use ndarray::{Array1, Array2, ArrayView1, ArrayViewMut1};
use num_traits::{One, Zero};

pub use self::{apply::*, types::*};

/// A linear map from vectors of length `ncols`
/// to vectors of length `nrows`.
pub trait LinearOperator {
    /// Elements of vectors the operator acts on.
    type Elem;

    /// Number of rows.
    fn nrows(&self) -> usize;

    /// Number of columns.
    fn ncols(&self) -> usize;

    /// Return whether the operator is symmetric.
    fn is_symmetric(&self) -> bool;

    /// Compute `out = alpha A \vec{v} + beta out`.
    ///
    /// When `beta` is zero,
    /// `out` is not read.
    ///
    /// Fails if `v` has length other than `ncols`
    /// or `out` has length other than `nrows`.
    fn apply_into(
        &self,
        v: ArrayView1<Self::Elem>,
        alpha: Self::Elem,
        beta: Self::Elem,
        out: ArrayViewMut1<Self::Elem>,
    ) -> Result<(), DimensionMismatchError>;

    /// Return `(nrows, ncols)`.
    fn shape(&self) -> (usize, usize) {
        (self.nrows(), self.ncols())
    }

    /// Return `A \vec{v}` as a new vector.
    fn apply(&self, v: ArrayView1<Self::Elem>) -> Result<Array1<Self::Elem>, DimensionMismatchError>
    where
        Self::Elem: Clone + Zero + One,
    {
        let mut out = Array1::zeros(self.nrows());
        self.apply_into(v, Self::Elem::one(), Self::Elem::zero(), out.view_mut())?;
        Ok(out)
    }

    /// Return the dense matrix this operator represents.
    ///
    /// This requires `nrows * ncols` memory
    /// and is mostly useful for inspection and testing.
    fn to_dense(&self) -> Array2<Self::Elem>
    where
        Self::Elem: Clone + Zero + One,
    {
        let mut dense = Array2::zeros(self.shape());
        let mut unit = Array1::zeros(self.ncols());
        for (j, column) in dense.columns_mut().into_iter().enumerate() {
            unit[j] = Self::Elem::one();
            // Both lengths come from `shape`,
            // so this cannot fail
            // for a consistent operator.
            if let Err(e) =
                self.apply_into(unit.view(), Self::Elem::one(), Self::Elem::zero(), column)
            {
                panic!("operator disagrees with its own shape: {e}");
            }
            unit[j] = Self::Elem::zero();
        }
        dense
    }

    /// Return `Ok` if `v_len` and `out_len` fit this operator.
    fn check_apply_lens(&self, v_len: usize, out_len: usize) -> Result<(), DimensionMismatchError> {
        if v_len != self.ncols() {
            Err(DimensionMismatchError {
                expected: self.ncols(),
                found: v_len,
            })
        } else if out_len != self.nrows() {
            Err(DimensionMismatchError {
                expected: self.nrows(),
                found: out_len,
            })
        } else {
            Ok(())
        }
    }
}

/// A square operator represented only by its diagonal.
pub trait DiagonalOperator: LinearOperator {
    /// Return the dimension of this operator.
    fn dimension(&self) -> Dimension;

    /// Return the diagonal of this operator.
    fn to_diagonal(&self) -> Array1<Self::Elem>;

    /// Return the dense diagonal matrix this operator represents.
    fn to_dense_diag(&self) -> Array2<Self::Elem>
    where
        Self::Elem: Clone + Zero,
    {
        Array2::from_diag(&self.to_diagonal())
    }
}
