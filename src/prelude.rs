//! Useful traits, types, and functions unlikely to conflict with existing definitions.

pub use crate::{DiagonalHessian, DiagonalHessianConfig, Strategy};
pub use optimal_diagonal_qn::{CurvaturePair, Evaluation, SecantVariant, UpdateError};
pub use optimal_linear_operator::{DiagonalOperator, LinearOperator};
