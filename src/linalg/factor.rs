/* ************************************************************************ **
** This file is part of densemat, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Eigendecomposition, inversion, and random orthogonal matrices.
//!
//! Every routine here works in place on its matrix argument. An empty
//! matrix is always accepted and left alone. The routines for symmetric
//! matrices read only the `uplo` triangle of their input; which of them
//! applies is the caller's call, nothing here inspects the structure of a
//! matrix.

use crate::kernel;
use ::densemat_matrix::{Matrix, MatrixResult, DimensionError, Uplo};
use ::rand::Rng;

fn check_square(operation: &'static str, a: &Matrix) -> MatrixResult<()> {
    if !a.is_square() {
        throw!(DimensionError::new(format!("{}: matrix is not square ({}x{})", operation, a.rows(), a.cols())));
    }
    Ok(())
}

/// Eigenvalues and eigenvectors of a symmetric matrix.
///
/// On success, the eigenvalues are written in ascending order to the first
/// `n` elements of `eigenvalues`, and row `i` of `a` holds the normalized
/// eigenvector for eigenvalue `i`. In other words, the original matrix
/// equals `Q^T D Q` for the resulting `Q = a`.
pub fn diagonalize_symmetric(uplo: Uplo, a: &mut Matrix, eigenvalues: &mut [f64]) -> MatrixResult<()> {
    const OPERATION: &str = "diagonalize_symmetric";
    if a.is_empty() {
        return Ok(());
    }
    check_square(OPERATION, a)?;
    if eigenvalues.len() < a.rows() {
        throw!(DimensionError::lengths(
            "eigenvalue buffer is smaller than the matrix dimension",
            a.rows(), eigenvalues.len(),
        ));
    }

    kernel::syev(OPERATION, uplo, a, eigenvalues)?;
    Ok(())
}

/// [`diagonalize_symmetric`], returning the eigenvalues.
pub fn diagonalize_symmetric_into(uplo: Uplo, a: &mut Matrix) -> MatrixResult<Vec<f64>> {
    let mut eigenvalues = vec![0.0; a.rows()];
    diagonalize_symmetric(uplo, a, &mut eigenvalues)?;
    Ok(eigenvalues)
}

/// Invert a general square matrix through its LU factorization.
pub fn invert_general(a: &mut Matrix) -> MatrixResult<()> {
    const OPERATION: &str = "invert_general";
    if a.is_empty() {
        return Ok(());
    }
    check_square(OPERATION, a)?;

    kernel::getrf_getri(OPERATION, a)?;
    Ok(())
}

/// Invert a symmetric positive definite matrix through its Cholesky
/// factorization.
///
/// Positive definiteness is not checked up front; a matrix that turns out
/// not to be positive definite produces an error from the factorization.
pub fn invert_spd(uplo: Uplo, a: &mut Matrix) -> MatrixResult<()> {
    const OPERATION: &str = "invert_spd";
    if a.is_empty() {
        return Ok(());
    }
    check_square(OPERATION, a)?;

    kernel::potrf_potri(OPERATION, uplo, a)?;
    a.to_symmetric(uplo)?;
    Ok(())
}

/// Invert a symmetric, possibly indefinite matrix through its Bunch-Kaufman
/// factorization.
pub fn invert_symmetric(uplo: Uplo, a: &mut Matrix) -> MatrixResult<()> {
    const OPERATION: &str = "invert_symmetric";
    if a.is_empty() {
        return Ok(());
    }
    check_square(OPERATION, a)?;

    kernel::sytrf_sytri(OPERATION, uplo, a)?;
    a.to_symmetric(uplo)?;
    Ok(())
}

/// [`invert_symmetric`], using the rook pivoting variant of the
/// factorization.
pub fn invert_symmetric_rook(uplo: Uplo, a: &mut Matrix) -> MatrixResult<()> {
    const OPERATION: &str = "invert_symmetric_rook";
    if a.is_empty() {
        return Ok(());
    }
    check_square(OPERATION, a)?;

    kernel::sytrf_sytri_rook(OPERATION, uplo, a)?;
    a.to_symmetric(uplo)?;
    Ok(())
}

/// Overwrite a square matrix with a random orthogonal matrix.
///
/// The matrix is filled with uniform values in `[0, 1)` (from the fixed-seed
/// stream if `use_fixed_seed` is set, from a fresh generator otherwise) and
/// then replaced by the orthogonal factor of its column-pivoted QR
/// factorization.
pub fn set_random_orthogonal(q: &mut Matrix, use_fixed_seed: bool) -> MatrixResult<()> {
    if q.is_empty() {
        return Ok(());
    }
    check_square("set_random_orthogonal", q)?;
    match use_fixed_seed {
        true => q.randomize_seed_fixed(0.0, 1.0),
        false => q.randomize(0.0, 1.0),
    };
    orthogonalize("set_random_orthogonal", q)
}

/// [`set_random_orthogonal`], drawing the initial values from `rng`.
pub fn set_random_orthogonal_with<R: Rng + ?Sized>(q: &mut Matrix, rng: &mut R) -> MatrixResult<()> {
    if q.is_empty() {
        return Ok(());
    }
    check_square("set_random_orthogonal_with", q)?;
    q.randomize_with(rng, 0.0, 1.0);
    orthogonalize("set_random_orthogonal_with", q)
}

fn orthogonalize(operation: &'static str, q: &mut Matrix) -> MatrixResult<()> {
    kernel::geqp3_orgqr(operation, q)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{multiply, multiply_at_b_a, Op};
    use ::densemat_matrix::OwnedMatrix;
    use ::rand::SeedableRng;
    use ::rand::rngs::StdRng;

    fn identity(n: usize) -> OwnedMatrix {
        let mut eye = Matrix::new(n, n);
        eye.set_identity().unwrap();
        eye
    }

    fn product(a: &Matrix, op_a: Op, b: &Matrix, op_b: Op) -> OwnedMatrix {
        let rows = op_a.apply_to_shape(a.shape()).0;
        let cols = op_b.apply_to_shape(b.shape()).1;
        let mut c = Matrix::new(rows, cols);
        multiply(1.0, a, op_a, b, op_b, 0.0, &mut c).unwrap();
        c
    }

    // well conditioned, so that inverses can be compared tightly
    fn random_general(n: usize) -> OwnedMatrix {
        let mut a = Matrix::new(n, n);
        a.randomize(-1.0, 1.0);
        for i in 0..n {
            a[(i, i)] += n as f64;
        }
        a
    }

    fn random_spd(n: usize) -> OwnedMatrix {
        let m = random_general(n);
        let mut a = product(&m, Op::NoTrans, &m, Op::Trans);
        for i in 0..n {
            a[(i, i)] += 1.0;
        }
        a.to_symmetric(Uplo::Lower).unwrap();
        a
    }

    fn random_symmetric_indefinite(n: usize) -> OwnedMatrix {
        let mut a = Matrix::new(n, n);
        a.randomize(-1.0, 1.0);
        for i in 0..n {
            let sign = if i % 2 == 0 { 1.0 } else { -1.0 };
            a[(i, i)] = sign * n as f64;
        }
        a.to_symmetric(Uplo::Upper).unwrap();
        a
    }

    fn fill_other_triangle(a: &mut Matrix, uplo: Uplo, value: f64) {
        for i in 0..a.rows() {
            for j in 0..i {
                match uplo {
                    Uplo::Upper => a[(i, j)] = value,
                    Uplo::Lower => a[(j, i)] = value,
                }
            }
        }
    }

    #[test]
    fn general_inverse_round_trip() {
        for &n in &[1, 2, 3, 10, 50] {
            let a = random_general(n);
            let mut inv = a.clone();
            invert_general(&mut inv).unwrap();
            assert_close!(product(&a, Op::NoTrans, &inv, Op::NoTrans), identity(n));
            assert_close!(product(&inv, Op::NoTrans, &a, Op::NoTrans), identity(n));
        }
    }

    #[test]
    fn symmetric_inverses_agree_with_general() {
        let n = 20;
        let inputs = vec![
            ("spd", random_spd(n)),
            ("indefinite", random_symmetric_indefinite(n)),
        ];
        for (kind, a) in inputs {
            let mut expected = a.clone();
            invert_general(&mut expected).unwrap();

            for &uplo in &[Uplo::Upper, Uplo::Lower] {
                let mut strategies: Vec<(&str, fn(Uplo, &mut Matrix) -> MatrixResult<()>)> = vec![
                    ("invert_symmetric", invert_symmetric),
                    ("invert_symmetric_rook", invert_symmetric_rook),
                ];
                if kind == "spd" {
                    strategies.push(("invert_spd", invert_spd));
                }

                for (name, invert) in strategies {
                    let mut inv = a.clone();
                    fill_other_triangle(&mut inv, uplo, 999.0);
                    invert(uplo, &mut inv).unwrap();
                    assert!(inv.is_symmetric(), "{} {:?} {}", kind, uplo, name);
                    assert_close!(abs=1e-10, inv, expected.clone(), "{} {:?} {}", kind, uplo, name);
                }
            }
        }
    }

    #[test]
    fn inversion_preconditions() {
        let mut empty = Matrix::default();
        invert_general(&mut empty).unwrap();
        invert_spd(Uplo::Upper, &mut empty).unwrap();
        invert_symmetric(Uplo::Lower, &mut empty).unwrap();
        invert_symmetric_rook(Uplo::Upper, &mut empty).unwrap();

        let mut rect = Matrix::new(2, 3);
        assert!(invert_general(&mut rect).unwrap_err().is_dimension_error());
        assert!(invert_spd(Uplo::Upper, &mut rect).unwrap_err().is_dimension_error());
        assert!(invert_symmetric(Uplo::Upper, &mut rect).unwrap_err().is_dimension_error());
        assert!(invert_symmetric_rook(Uplo::Lower, &mut rect).unwrap_err().is_dimension_error());

        let mut singular = Matrix::new(3, 3);
        assert!(invert_general(&mut singular).unwrap_err().is_operation_error());
        assert!(invert_symmetric(Uplo::Upper, &mut singular).unwrap_err().is_operation_error());
        assert!(invert_symmetric_rook(Uplo::Upper, &mut singular).unwrap_err().is_operation_error());
        assert!(invert_spd(Uplo::Lower, &mut singular).unwrap_err().is_operation_error());
    }

    #[test]
    fn eigendecomposition_recovers_known_spectrum() {
        let n = 10;
        let mut q = Matrix::new(n, n);
        set_random_orthogonal_with(&mut q, &mut StdRng::seed_from_u64(7)).unwrap();

        let mut d = Matrix::new(n, n);
        let spectrum: Vec<f64> = (0..n).map(|i| i as f64 - 4.5).collect();
        for i in 0..n {
            d[(i, i)] = spectrum[i];
        }

        let mut a = Matrix::new(n, n);
        multiply_at_b_a(&q, &d, &mut a).unwrap();
        a.to_symmetric(Uplo::Upper).unwrap();

        for &uplo in &[Uplo::Upper, Uplo::Lower] {
            let mut q_calc = a.clone();
            fill_other_triangle(&mut q_calc, uplo, 999.0);
            let mut eigenvalues = vec![0.0; n + 2];
            diagonalize_symmetric(uplo, &mut q_calc, &mut eigenvalues).unwrap();

            assert_close!(abs=1e-10, &eigenvalues[..n], &spectrum[..]);
            assert_close!(product(&q_calc, Op::NoTrans, &q_calc, Op::Trans), identity(n));

            let mut recovered = Matrix::new(n, n);
            multiply_at_b_a(&q_calc, &d, &mut recovered).unwrap();
            assert_close!(recovered, a.clone());
        }
    }

    #[test]
    fn eigendecomposition_preconditions() {
        let mut empty = Matrix::default();
        diagonalize_symmetric(Uplo::Upper, &mut empty, &mut []).unwrap();
        assert!(diagonalize_symmetric_into(Uplo::Lower, &mut empty).unwrap().is_empty());

        let mut rect = Matrix::new(3, 2);
        let e = diagonalize_symmetric(Uplo::Upper, &mut rect, &mut [0.0; 3]).unwrap_err();
        assert!(e.is_dimension_error());

        let mut a = identity(3);
        let e = diagonalize_symmetric(Uplo::Upper, &mut a, &mut [0.0; 2]).unwrap_err();
        assert!(e.is_dimension_error());

        let eigenvalues = diagonalize_symmetric_into(Uplo::Lower, &mut a).unwrap();
        assert_close!(eigenvalues, vec![1.0; 3]);
    }

    #[test]
    fn random_orthogonal() {
        for &n in &[1, 2, 5, 30] {
            for &fixed in &[true, false] {
                let mut q = Matrix::new(n, n);
                set_random_orthogonal(&mut q, fixed).unwrap();
                assert_close!(product(&q, Op::NoTrans, &q, Op::Trans), identity(n));
                assert_close!(product(&q, Op::Trans, &q, Op::NoTrans), identity(n));
            }
        }

        let mut empty = Matrix::default();
        set_random_orthogonal(&mut empty, true).unwrap();
        assert!(set_random_orthogonal(&mut Matrix::new(2, 3), true).unwrap_err().is_dimension_error());

        // empty wins over non-square, as for the inverses
        set_random_orthogonal(&mut Matrix::new(0, 3), true).unwrap();
        set_random_orthogonal_with(&mut Matrix::new(3, 0), &mut StdRng::seed_from_u64(1)).unwrap();
    }

    #[test]
    fn random_orthogonal_with_generator_is_repeatable() {
        let mut q1 = Matrix::new(6, 6);
        let mut q2 = Matrix::new(6, 6);
        set_random_orthogonal_with(&mut q1, &mut StdRng::seed_from_u64(3)).unwrap();
        set_random_orthogonal_with(&mut q2, &mut StdRng::seed_from_u64(3)).unwrap();
        assert_eq!(q1, q2);
    }
}
