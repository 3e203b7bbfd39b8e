/* ************************************************************************ **
** This file is part of densemat, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Dense, row-major matrices of `f64`.
//!
//! A [`Matrix`] either owns its buffer or borrows one from the caller for a
//! lifetime `'a`. The linear algebra kernels that operate on matrices live in
//! `densemat-linalg`; this crate only knows how to build, inspect, and
//! rearrange them.

#[macro_use]
extern crate failure;
#[macro_use]
extern crate log;
#[macro_use]
extern crate lazy_static;
extern crate rand;
extern crate ndarray;
extern crate blas;
extern crate blas_src;
#[cfg_attr(test, macro_use)]
extern crate densemat_assert_close;

macro_rules! throw {
    ($e:expr) => {
        return Err(::std::convert::Into::into($e))
    }
}

mod errors;
mod storage;
mod matrix;
mod comma_init;
mod show;
mod conv;
pub mod random;

pub use crate::errors::{
    MatrixResult, MatrixError, DimensionError, DimensionDetails,
    IndexRangeError, OperationError,
};
pub use crate::matrix::{Matrix, OwnedMatrix, CopyType, Uplo, DEFAULT_THRESHOLD};
pub use crate::comma_init::CommaInitializer;
pub use crate::show::{ShowFull, ShowLower, c_style_exp, DEFAULT_ELEMENTS_PER_LINE};
