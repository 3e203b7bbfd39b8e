/* ************************************************************************ **
** This file is part of densemat, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! BLAS/LAPACK-backed operations on row-major [`Matrix`] values.
//!
//! The kernels are reached through the Fortran interface (`blas` and
//! `lapack` crates), which is column-major; `kernel` hides the layout
//! translation, and the public functions validate shapes and aliasing
//! before anything reaches a kernel.

#[macro_use]
extern crate log;
extern crate rand;
extern crate blas;
extern crate lapack;
extern crate lapack_src;
extern crate densemat_matrix;
#[cfg(test)]
extern crate ndarray;
#[cfg_attr(test, macro_use)]
extern crate densemat_assert_close;

macro_rules! throw {
    ($e:expr) => {
        return Err(::std::convert::Into::into($e))
    }
}

mod kernel;
mod product;
mod factor;

pub use crate::product::{Op, multiply, multiply_a_b_at, multiply_at_b_a, scale, scale_to};
pub use crate::factor::{
    diagonalize_symmetric, diagonalize_symmetric_into,
    invert_general, invert_spd, invert_symmetric, invert_symmetric_rook,
    set_random_orthogonal, set_random_orthogonal_with,
};

pub use ::densemat_matrix::{Matrix, MatrixError, MatrixResult, Uplo};
