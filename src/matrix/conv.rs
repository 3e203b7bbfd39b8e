/* ************************************************************************ **
** This file is part of densemat, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Interop with `ndarray` and the `assert_close!` machinery.

use crate::matrix::{Matrix, OwnedMatrix};
use ::densemat_assert_close::{CheckClose, CheckCloseError, Tolerances};
use ::ndarray::{Array2, ArrayView2};

impl<'a> Matrix<'a> {
    /// Copy into a standard-layout `ndarray`.
    pub fn to_array(&self) -> Array2<f64> {
        self.view().to_owned()
    }

    /// Zero-copy `ndarray` view of the elements.
    pub fn view(&self) -> ArrayView2<'_, f64> {
        // a buffer of exactly rows * cols elements always fits the shape
        ArrayView2::from_shape(self.shape(), self.data())
            .unwrap_or_else(|_| unreachable!("matrix data does not fit its own shape"))
    }
}

impl<'a> From<&'a Array2<f64>> for OwnedMatrix {
    fn from(array: &'a Array2<f64>) -> Self {
        let (rows, cols) = array.dim();
        // iteration is in logical order regardless of memory layout
        let data = array.iter().cloned().collect();
        match Matrix::from_vec(rows, cols, data) {
            Ok(m) => m,
            Err(_) => unreachable!("array iteration yields rows * cols elements"),
        }
    }
}

impl From<Array2<f64>> for OwnedMatrix {
    fn from(array: Array2<f64>) -> Self { OwnedMatrix::from(&array) }
}

impl<'a, 'b> CheckClose<Matrix<'b>> for Matrix<'a> {
    fn check_close(&self, other: &Matrix<'b>, tol: Tolerances) -> Result<(), CheckCloseError> {
        if self.shape() != other.shape() {
            return Err(CheckCloseError::Shape {
                left: vec![self.rows(), self.cols()],
                right: vec![other.rows(), other.cols()],
            });
        }
        let cols = self.cols();
        for (k, (a, b)) in self.data().iter().zip(other.data()).enumerate() {
            a.check_close(b, tol).map_err(|e| e.at(k % cols).at(k / cols))?;
        }
        Ok(())
    }
}
