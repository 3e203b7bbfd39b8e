/* ************************************************************************ **
** This file is part of densemat, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Dense row-major matrices of `f64`, with BLAS/LAPACK-backed operations.
//!
//! This crate only gathers the workspace members:
//!
//! * [`matrix`]: the [`Matrix`] type, with borrowed or owned storage;
//! * [`linalg`]: products, symmetric eigendecomposition, and inverses;
//! * [`io`]: binary and text files of matrix collections.

pub extern crate densemat_matrix as matrix;
pub extern crate densemat_linalg as linalg;
pub extern crate densemat_io as io;

pub use crate::matrix::{
    Matrix, OwnedMatrix, CopyType, Uplo, DEFAULT_THRESHOLD,
    MatrixError, MatrixResult, DimensionError, IndexRangeError, OperationError,
};
pub use crate::linalg::Op;
