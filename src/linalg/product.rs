/* ************************************************************************ **
** This file is part of densemat, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Products and scaling.

use crate::kernel;
use ::densemat_matrix::{Matrix, MatrixResult, MatrixError, DimensionError, OperationError};
use ::std::str::FromStr;

/// Operation applied to an operand of [`multiply`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Op {
    /// `op(X) = X`
    NoTrans,
    /// `op(X) = X^T`
    Trans,
}

impl Op {
    /// Parse the conventional labels `"N"` and `"T"`.
    pub fn from_label(label: &str) -> MatrixResult<Op> {
        match label {
            "N" => Ok(Op::NoTrans),
            "T" => Ok(Op::Trans),
            _ => throw!(OperationError::new(
                "Op::from_label",
                format!("unknown operation on matrix: label={}", label),
            )),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Op::NoTrans => "N",
            Op::Trans => "T",
        }
    }

    /// Shape of `op(X)` for an `X` of the given shape.
    pub fn apply_to_shape(self, (rows, cols): (usize, usize)) -> (usize, usize) {
        match self {
            Op::NoTrans => (rows, cols),
            Op::Trans => (cols, rows),
        }
    }
}

impl FromStr for Op {
    type Err = MatrixError;

    fn from_str(s: &str) -> MatrixResult<Op> { Op::from_label(s) }
}

/// `C = alpha op(A) op(B) + beta C`.
///
/// `C` must not share memory with `A` or `B`, and must already have the
/// shape of the product. When `beta` is zero, the prior contents of `C` are
/// ignored.
pub fn multiply(
    alpha: f64,
    a: &Matrix,
    op_a: Op,
    b: &Matrix,
    op_b: Op,
    beta: f64,
    c: &mut Matrix,
) -> MatrixResult<()> {
    check_output_not_aliased("multiply", c, &[a, b])?;

    let (a_rows, a_cols) = op_a.apply_to_shape(a.shape());
    let (b_rows, b_cols) = op_b.apply_to_shape(b.shape());
    if a_cols != b_rows {
        throw!(DimensionError::shapes(
            format!("cannot multiply op(A) and op(B) with op(A)={} and op(B)={}", op_a.label(), op_b.label()),
            a.shape(), b.shape(),
        ));
    }
    if (a_rows, b_cols) != c.shape() {
        throw!(DimensionError::shapes(
            format!("the product of op(A)={} and op(B)={} does not fit into C", op_a.label(), op_b.label()),
            (a_rows, b_cols), c.shape(),
        ));
    }

    kernel::gemm("multiply", alpha, a, op_a, b, op_b, beta, c)
}

/// `C = A B A^T`, for `A` of shape `m x n` and `B` of shape `n x n`.
pub fn multiply_a_b_at(a: &Matrix, b: &Matrix, c: &mut Matrix) -> MatrixResult<()> {
    check_output_not_aliased("multiply_a_b_at", c, &[a, b])?;

    let mut ab = Matrix::new(a.rows(), b.cols());
    multiply(1.0, a, Op::NoTrans, b, Op::NoTrans, 0.0, &mut ab)?;
    multiply(1.0, &ab, Op::NoTrans, a, Op::Trans, 0.0, c)
}

/// `C = A^T B A`, for `A` of shape `m x n` and `B` of shape `m x m`.
pub fn multiply_at_b_a(a: &Matrix, b: &Matrix, c: &mut Matrix) -> MatrixResult<()> {
    check_output_not_aliased("multiply_at_b_a", c, &[a, b])?;

    let mut at_b = Matrix::new(a.cols(), b.cols());
    multiply(1.0, a, Op::Trans, b, Op::NoTrans, 0.0, &mut at_b)?;
    multiply(1.0, &at_b, Op::NoTrans, a, Op::NoTrans, 0.0, c)
}

/// `A *= alpha`, in place.
pub fn scale(alpha: f64, a: &mut Matrix) {
    a.scale(alpha);
}

/// `B = alpha A`.
///
/// `alpha == 0` writes exact zeros (even where `A` holds NaN or infinity)
/// and `alpha == 1` is a plain copy.
pub fn scale_to(alpha: f64, a: &Matrix, b: &mut Matrix) -> MatrixResult<()> {
    if !a.is_same_dimension_to(b) {
        throw!(DimensionError::shapes("cannot scale a matrix into one of a different shape", a.shape(), b.shape()));
    }
    if a.as_ptr() == b.as_ptr() {
        // same buffer (only possible through raw-pointer views)
        b.scale(alpha);
        return Ok(());
    }
    check_output_not_aliased("scale_to", b, &[a])?;

    if alpha == 1.0 {
        b.data_mut().copy_from_slice(a.data());
    } else if alpha == 0.0 {
        b.fill_all(0.0);
    } else {
        for (dest, &src) in b.data_mut().iter_mut().zip(a.data()) {
            *dest = alpha * src;
        }
    }
    Ok(())
}

fn check_output_not_aliased(operation: &'static str, output: &Matrix, inputs: &[&Matrix]) -> MatrixResult<()> {
    if inputs.iter().any(|input| output.overlaps(input)) {
        throw!(OperationError::new(operation, "the output matrix shares memory with an input matrix"));
    }
    Ok(())
}
