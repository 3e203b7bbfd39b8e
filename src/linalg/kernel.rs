/* ************************************************************************ **
** This file is part of densemat, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! One adapter per BLAS/LAPACK routine family.
//!
//! The kernels are Fortran routines and see every buffer as column-major,
//! while a `Matrix` is row-major. A row-major `r x c` buffer is exactly the
//! column-major buffer of its `c x r` transpose, so each adapter rewrites its
//! request in terms of transposes:
//!
//! * products are computed as `C^T = op(B)^T op(A)^T`, which swaps the
//!   operand order and the roles of the dimensions;
//! * for symmetric routines, the upper triangle of the row-major matrix is
//!   the lower triangle of the column-major one, so triangle labels flip.
//!
//! Every adapter expects its caller to have validated shapes already.
//! Workspace sizes are always obtained with an `lwork = -1` query.

use crate::Op;
use ::densemat_matrix::{Matrix, MatrixResult, OperationError, Uplo};
use ::std::convert::TryFrom;

/// Label for the column-major kernel that addresses the same elements
/// as `uplo` does in the row-major matrix.
pub(crate) fn kernel_uplo(uplo: Uplo) -> u8 {
    match uplo {
        Uplo::Upper => b'L',
        Uplo::Lower => b'U',
    }
}

fn kernel_trans(op: Op) -> u8 {
    match op {
        Op::NoTrans => b'N',
        Op::Trans => b'T',
    }
}

fn blas_int(operation: &'static str, x: usize) -> MatrixResult<i32> {
    match i32::try_from(x) {
        Ok(x) => Ok(x),
        Err(_) => throw!(OperationError::new(
            operation, format!("dimension {} is too large for a 32-bit kernel interface", x),
        )),
    }
}

// leading dimensions must be at least 1 even for empty operands
fn leading_dim(operation: &'static str, x: usize) -> MatrixResult<i32>
{ blas_int(operation, usize::max(1, x)) }

fn workspace_len(query: f64) -> usize { usize::max(1, query as usize) }

fn check_info(
    operation: &'static str,
    routine: &str,
    info: i32,
    on_failure: impl FnOnce(i32) -> String,
) -> MatrixResult<()> {
    match info {
        0 => Ok(()),
        info if info < 0 => throw!(OperationError::new(
            operation, format!("the {}-th argument to {} had an illegal value", -info, routine),
        )),
        info => throw!(OperationError::new(operation, on_failure(info))),
    }
}

fn singular_at(routine: &'static str, what: &'static str) -> impl FnOnce(i32) -> String {
    move |info| format!(
        "{} reports {}({}, {}) is exactly zero; the matrix is singular and its inverse could not be computed",
        routine, what, info, info,
    )
}

fn query_failed(routine: &'static str) -> impl FnOnce(i32) -> String {
    move |info| format!("workspace query of {} returned info = {}", routine, info)
}

//--------------------------------------------------------

/// `C = alpha op(A) op(B) + beta C` through `dgemm`.
///
/// Shapes must already agree with `op_a` and `op_b`.
pub(crate) fn gemm(
    operation: &'static str,
    alpha: f64,
    a: &Matrix,
    op_a: Op,
    b: &Matrix,
    op_b: Op,
    beta: f64,
    c: &mut Matrix,
) -> MatrixResult<()> {
    if c.is_empty() {
        return Ok(());
    }

    // Row-major C (M x K or N x K) is, to the kernel, the column-major
    // matrix C^T = op(B)^T op(A)^T. Both operands are likewise seen
    // transposed, so B goes first, with the flag it came with, and the
    // leading dimension of every operand is its row-major column count.
    //
    //   case  A      B      C      kernel call (m, n, k; ldb, lda, ldc)
    //   NN    M x N  N x K  M x K  N N (K, M, N; K, N, K)
    //   NT    M x N  K x N  M x K  T N (K, M, N; N, N, K)
    //   TN    M x N  M x K  N x K  N T (K, N, M; K, N, K)
    //   TT    M x N  K x M  N x K  T T (K, N, M; M, N, K)
    let (big_m, big_n) = a.shape();
    let (kernel_m, kernel_n, kernel_k, ld_b) = match (op_a, op_b) {
        (Op::NoTrans, Op::NoTrans) => {
            let big_k = b.cols();
            (big_k, big_m, big_n, big_k)
        },
        (Op::NoTrans, Op::Trans) => {
            let big_k = b.rows();
            (big_k, big_m, big_n, big_n)
        },
        (Op::Trans, Op::NoTrans) => {
            let big_k = b.cols();
            (big_k, big_n, big_m, big_k)
        },
        (Op::Trans, Op::Trans) => {
            let big_k = b.rows();
            (big_k, big_n, big_m, big_m)
        },
    };
    let (ld_a, ld_c) = (big_n, kernel_m);

    if kernel_k == 0 {
        trace!("{}: empty inner dimension, only scaling C by beta={}", operation, beta);
        if beta == 0.0 {
            c.fill_all(0.0);
        } else {
            c.scale(beta);
        }
        return Ok(());
    }

    let transb = kernel_trans(op_b);
    let transa = kernel_trans(op_a);

    let m = blas_int(operation, kernel_m)?;
    let n = blas_int(operation, kernel_n)?;
    let k = blas_int(operation, kernel_k)?;
    let ld_b = leading_dim(operation, ld_b)?;
    let ld_a = leading_dim(operation, ld_a)?;
    let ld_c = leading_dim(operation, ld_c)?;

    unsafe {
        ::blas::dgemm(
            transb, transa, m, n, k,
            alpha, b.data(), ld_b,
            a.data(), ld_a,
            beta, c.data_mut(), ld_c,
        );
    }
    Ok(())
}

/// All eigenvalues (ascending) and eigenvectors of a symmetric matrix
/// through `dsyev`.
///
/// Only the `uplo` triangle of `a` is read. On success, eigenvector `i` is
/// stored contiguously in row `i` of `a`.
pub(crate) fn syev(
    operation: &'static str,
    uplo: Uplo,
    a: &mut Matrix,
    eigenvalues: &mut [f64],
) -> MatrixResult<()> {
    let n = blas_int(operation, a.rows())?;
    let lda = leading_dim(operation, a.rows())?;
    let uplo = kernel_uplo(uplo);
    let mut info = 0;

    let mut query = [0.0];
    unsafe { ::lapack::dsyev(b'V', uplo, n, a.data_mut(), lda, eigenvalues, &mut query, -1, &mut info) };
    check_info(operation, "dsyev", info, query_failed("dsyev"))?;

    let lwork = workspace_len(query[0]);
    trace!("{}: dsyev workspace of {} for n = {}", operation, lwork, n);
    let mut work = vec![0.0; lwork];
    unsafe { ::lapack::dsyev(b'V', uplo, n, a.data_mut(), lda, eigenvalues, &mut work, blas_int(operation, lwork)?, &mut info) };
    check_info(operation, "dsyev", info, |info| format!(
        "dsyev failed to converge; {} off-diagonal elements of an intermediate tridiagonal form did not converge to zero",
        info,
    ))
}

/// Inverse of a general matrix through `dgetrf` and `dgetri`.
pub(crate) fn getrf_getri(operation: &'static str, a: &mut Matrix) -> MatrixResult<()> {
    let n = blas_int(operation, a.rows())?;
    let lda = leading_dim(operation, a.rows())?;
    let mut ipiv = vec![0; a.rows()];
    let mut info = 0;

    unsafe { ::lapack::dgetrf(n, n, a.data_mut(), lda, &mut ipiv, &mut info) };
    check_info(operation, "dgetrf", info, singular_at("dgetrf", "U"))?;

    let mut query = [0.0];
    unsafe { ::lapack::dgetri(n, a.data_mut(), lda, &ipiv, &mut query, -1, &mut info) };
    check_info(operation, "dgetri", info, query_failed("dgetri"))?;

    let lwork = workspace_len(query[0]);
    trace!("{}: dgetri workspace of {} for n = {}", operation, lwork, n);
    let mut work = vec![0.0; lwork];
    unsafe { ::lapack::dgetri(n, a.data_mut(), lda, &ipiv, &mut work, blas_int(operation, lwork)?, &mut info) };
    check_info(operation, "dgetri", info, singular_at("dgetri", "U"))
}

/// Inverse of a symmetric positive definite matrix through `dpotrf` and
/// `dpotri`. Only the `uplo` triangle of the result is written.
pub(crate) fn potrf_potri(operation: &'static str, uplo: Uplo, a: &mut Matrix) -> MatrixResult<()> {
    let n = blas_int(operation, a.rows())?;
    let lda = leading_dim(operation, a.rows())?;
    let uplo = kernel_uplo(uplo);
    let mut info = 0;

    unsafe { ::lapack::dpotrf(uplo, n, a.data_mut(), lda, &mut info) };
    check_info(operation, "dpotrf", info, |info| format!(
        "dpotrf: the leading minor of order {} is not positive definite, and the factorization could not be completed",
        info,
    ))?;

    unsafe { ::lapack::dpotri(uplo, n, a.data_mut(), lda, &mut info) };
    check_info(operation, "dpotri", info, |info| format!(
        "dpotri: the ({}, {}) element of the Cholesky factor is zero, and the inverse could not be computed",
        info, info,
    ))
}

/// Which Bunch-Kaufman pivoting strategy to use.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Pivoting { Partial, Rook }

/// Inverse of a symmetric indefinite matrix through `dsytrf` and `dsytri`.
/// Only the `uplo` triangle of the result is written.
pub(crate) fn sytrf_sytri(operation: &'static str, uplo: Uplo, a: &mut Matrix) -> MatrixResult<()>
{ bunch_kaufman_inverse(operation, uplo, a, Pivoting::Partial) }

/// Inverse of a symmetric indefinite matrix through `dsytrf_rook` and
/// `dsytri_rook`. Only the `uplo` triangle of the result is written.
pub(crate) fn sytrf_sytri_rook(operation: &'static str, uplo: Uplo, a: &mut Matrix) -> MatrixResult<()>
{ bunch_kaufman_inverse(operation, uplo, a, Pivoting::Rook) }

fn bunch_kaufman_inverse(operation: &'static str, uplo: Uplo, a: &mut Matrix, pivoting: Pivoting) -> MatrixResult<()> {
    let (trf_name, tri_name) = match pivoting {
        Pivoting::Partial => ("dsytrf", "dsytri"),
        Pivoting::Rook => ("dsytrf_rook", "dsytri_rook"),
    };
    let trf = |uplo, n, a: &mut [f64], lda, ipiv: &mut [i32], work: &mut [f64], lwork, info: &mut i32| unsafe {
        match pivoting {
            Pivoting::Partial => ::lapack::dsytrf(uplo, n, a, lda, ipiv, work, lwork, info),
            Pivoting::Rook => ::lapack::dsytrf_rook(uplo, n, a, lda, ipiv, work, lwork, info),
        }
    };

    let n = blas_int(operation, a.rows())?;
    let lda = leading_dim(operation, a.rows())?;
    let uplo = kernel_uplo(uplo);
    let mut ipiv = vec![0; a.rows()];
    let mut info = 0;

    let mut query = [0.0];
    trf(uplo, n, a.data_mut(), lda, &mut ipiv, &mut query, -1, &mut info);
    check_info(operation, trf_name, info, query_failed(trf_name))?;

    // the inverse step needs n doubles of scratch, whatever the query said
    let lwork = usize::max(workspace_len(query[0]), a.rows());
    trace!("{}: {} workspace of {} for n = {}", operation, trf_name, lwork, n);
    let mut work = vec![0.0; lwork];
    trf(uplo, n, a.data_mut(), lda, &mut ipiv, &mut work, blas_int(operation, lwork)?, &mut info);
    check_info(operation, trf_name, info, singular_at(trf_name, "D"))?;

    unsafe {
        match pivoting {
            Pivoting::Partial => ::lapack::dsytri(uplo, n, a.data_mut(), lda, &ipiv, &mut work, &mut info),
            Pivoting::Rook => ::lapack::dsytri_rook(uplo, n, a.data_mut(), lda, &ipiv, &mut work, &mut info),
        }
    }
    check_info(operation, tri_name, info, singular_at(tri_name, "D"))
}

/// Replace a square matrix by the orthogonal factor of its column-pivoted
/// QR factorization, through `dgeqp3` and `dorgqr`.
///
/// The kernel factors the transpose of the row-major matrix; the transpose
/// of an orthogonal matrix is orthogonal, so the result is still usable as
/// a random orthogonal matrix.
pub(crate) fn geqp3_orgqr(operation: &'static str, a: &mut Matrix) -> MatrixResult<()> {
    let n = blas_int(operation, a.rows())?;
    let lda = leading_dim(operation, a.rows())?;
    let mut jpvt = vec![0; a.rows()];
    let mut tau = vec![0.0; a.rows()];
    let mut info = 0;

    let mut query = [0.0];
    unsafe { ::lapack::dgeqp3(n, n, a.data_mut(), lda, &mut jpvt, &mut tau, &mut query, -1, &mut info) };
    check_info(operation, "dgeqp3", info, query_failed("dgeqp3"))?;

    let lwork = workspace_len(query[0]);
    trace!("{}: dgeqp3 workspace of {} for n = {}", operation, lwork, n);
    let mut work = vec![0.0; lwork];
    unsafe { ::lapack::dgeqp3(n, n, a.data_mut(), lda, &mut jpvt, &mut tau, &mut work, blas_int(operation, lwork)?, &mut info) };
    check_info(operation, "dgeqp3", info, |info| format!("dgeqp3 returned info = {}", info))?;

    unsafe { ::lapack::dorgqr(n, n, n, a.data_mut(), lda, &tau, &mut query, -1, &mut info) };
    check_info(operation, "dorgqr", info, query_failed("dorgqr"))?;

    let lwork = workspace_len(query[0]);
    trace!("{}: dorgqr workspace of {} for n = {}", operation, lwork, n);
    let mut work = vec![0.0; lwork];
    unsafe { ::lapack::dorgqr(n, n, n, a.data_mut(), lda, &tau, &mut work, blas_int(operation, lwork)?, &mut info) };
    check_info(operation, "dorgqr", info, |info| format!("dorgqr returned info = {}", info))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triangle_labels_flip() {
        assert_eq!(kernel_uplo(Uplo::Upper), b'L');
        assert_eq!(kernel_uplo(Uplo::Lower), b'U');
    }

    #[test]
    fn kernel_sees_the_transpose() {
        // a potrf on a matrix whose *row-major* upper triangle holds the
        // data must not look at the row-major lower triangle at all
        let mut a = Matrix::from_slice(2, 2, &[
            4.0, 2.0,
            ::std::f64::NAN, 5.0,
        ]).unwrap();
        potrf_potri("test", Uplo::Upper, &mut a).unwrap();
        // inverse of [[4, 2], [2, 5]] is [[5, -2], [-2, 4]] / 16
        assert_close!(a[(0, 0)], 5.0 / 16.0);
        assert_close!(a[(0, 1)], -2.0 / 16.0);
        assert_close!(a[(1, 1)], 4.0 / 16.0);
    }

    #[test]
    fn gemm_with_empty_inner_dimension_scales_c() {
        let a = Matrix::new(2, 0);
        let b = Matrix::new(0, 3);
        let mut c = Matrix::new(2, 3);
        c.fill_all(2.0);
        gemm("test", 1.0, &a, Op::NoTrans, &b, Op::NoTrans, 0.5, &mut c).unwrap();
        assert!(c.data().iter().all(|&x| x == 1.0));

        c.fill_all(::std::f64::NAN);
        gemm("test", 1.0, &a, Op::NoTrans, &b, Op::NoTrans, 0.0, &mut c).unwrap();
        assert!(c.is_zeros());
    }

    #[test]
    fn singular_matrix_is_an_operation_error() {
        let mut a = Matrix::from_slice(2, 2, &[1.0, 2.0, 2.0, 4.0]).unwrap();
        let e = getrf_getri("invert_general", &mut a).unwrap_err();
        assert!(e.is_operation_error());
        assert!(e.to_string().contains("singular"));
    }

    #[test]
    fn indefinite_input_fails_cholesky() {
        let mut a = Matrix::from_slice(2, 2, &[1.0, 0.0, 0.0, -1.0]).unwrap();
        assert!(potrf_potri("invert_spd", Uplo::Lower, &mut a).unwrap_err().is_operation_error());
    }
}
