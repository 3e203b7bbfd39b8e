/* ************************************************************************ **
** This file is part of densemat, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use crate::errors::{MatrixResult, DimensionError};
use crate::matrix::Matrix;

/// Writes a matrix element by element in row-major order.
///
/// Created by [`Matrix::comma_init`]. Pushing past the last element is an
/// error; [`CommaInitializer::finish`] additionally checks that every element
/// was written.
#[derive(Debug)]
pub struct CommaInitializer<'m, 'a> {
    matrix: &'m mut Matrix<'a>,
    // number of elements written so far
    filled: usize,
}

impl<'m, 'a> CommaInitializer<'m, 'a> {
    pub(crate) fn new(matrix: &'m mut Matrix<'a>, first: f64) -> MatrixResult<Self> {
        if matrix.is_empty() {
            throw!(DimensionError::new("cannot comma-initialize an empty matrix"));
        }
        matrix.data_mut()[0] = first;
        Ok(CommaInitializer { matrix, filled: 1 })
    }

    pub fn push(&mut self, value: f64) -> MatrixResult<&mut Self> {
        let size = self.matrix.size();
        if self.filled >= size {
            throw!(DimensionError::lengths("too many values in comma initialization", size, self.filled + 1));
        }
        self.matrix.data_mut()[self.filled] = value;
        self.filled += 1;
        Ok(self)
    }

    pub fn filled(&self) -> usize { self.filled }

    /// Verify that every element was written.
    pub fn finish(self) -> MatrixResult<()> {
        let size = self.matrix.size();
        if self.filled != size {
            throw!(DimensionError::lengths("too few values in comma initialization", size, self.filled));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_in_row_major_order() {
        let mut a = Matrix::new(2, 3);
        {
            let mut init = a.comma_init(1.0).unwrap();
            init.push(2.0).unwrap().push(3.0).unwrap();
            init.push(4.0).unwrap().push(5.0).unwrap().push(6.0).unwrap();
            init.finish().unwrap();
        }
        assert_eq!(a[(1, 0)], 4.0);
        assert_eq!(a.data(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn too_many_values() {
        let mut a = Matrix::new(1, 2);
        let mut init = a.comma_init(1.0).unwrap();
        init.push(2.0).unwrap();
        assert!(init.push(3.0).unwrap_err().is_dimension_error());
        assert_eq!(init.filled(), 2);
        init.finish().unwrap();
    }

    #[test]
    fn too_few_values() {
        let mut a = Matrix::new(2, 2);
        let mut init = a.comma_init(1.0).unwrap();
        init.push(2.0).unwrap();
        assert!(init.finish().unwrap_err().is_dimension_error());
        assert_eq!(a.data(), &[1.0, 2.0, 0.0, 0.0]);
    }

    #[test]
    fn empty_matrix() {
        assert!(Matrix::default().comma_init(1.0).unwrap_err().is_dimension_error());
    }
}
