/* ************************************************************************ **
** This file is part of densemat, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

#[macro_use] extern crate densemat_assert_close;
extern crate densemat;
extern crate rand;

use ::densemat::{Matrix, OwnedMatrix, Op, Uplo, CopyType};
use ::densemat::linalg::{
    multiply, multiply_a_b_at, multiply_at_b_a, diagonalize_symmetric, diagonalize_symmetric_into,
    invert_general, invert_spd, invert_symmetric, invert_symmetric_rook,
    set_random_orthogonal_with,
};
use ::rand::{SeedableRng, rngs::StdRng};

fn identity(n: usize) -> OwnedMatrix {
    let mut m = Matrix::new(n, n);
    m.set_identity().unwrap();
    m
}

/// `Q diag(values) Q^T` for a random orthogonal `Q`.
fn with_spectrum(values: &[f64], rng: &mut StdRng) -> OwnedMatrix {
    let n = values.len();
    let mut q = Matrix::new(n, n);
    set_random_orthogonal_with(&mut q, rng).unwrap();
    let mut d = Matrix::new(n, n);
    for (i, &x) in values.iter().enumerate() {
        d[(i, i)] = x;
    }
    let mut out = Matrix::new(n, n);
    multiply_a_b_at(&q, &d, &mut out).unwrap();
    out
}

#[test]
fn spectrum_survives_the_round_trip() {
    let mut rng = StdRng::seed_from_u64(42);
    let spectrum = [0.5, 1.0, 2.0, 3.5, 10.0, 11.0];
    let a = with_spectrum(&spectrum, &mut rng);
    assert!(a.is_symmetric_within(1e-12));

    for &uplo in &[Uplo::Upper, Uplo::Lower] {
        let mut vectors = a.clone();
        let values = diagonalize_symmetric_into(uplo, &mut vectors).unwrap();
        assert_close!(abs=1e-10, values, spectrum.to_vec());

        // rows are the eigenvectors
        let mut d = Matrix::new(6, 6);
        multiply_a_b_at(&vectors, &a, &mut d).unwrap();
        assert!(d.is_diagonal_within(1e-10));
        for i in 0..6 {
            assert_close!(abs=1e-10, d[(i, i)], spectrum[i]);
        }
    }
}

#[test]
fn every_inverse_agrees() {
    let mut rng = StdRng::seed_from_u64(7);
    let a = with_spectrum(&[1.0, 2.0, 4.0, 8.0, 16.0], &mut rng);

    let mut expected = a.clone();
    invert_general(&mut expected).unwrap();
    let mut product = Matrix::new(5, 5);
    multiply(1.0, &a, Op::NoTrans, &expected, Op::NoTrans, 0.0, &mut product).unwrap();
    assert_close!(abs=1e-10, product, identity(5));

    let inverters: [fn(Uplo, &mut Matrix) -> ::densemat::MatrixResult<()>; 3] = [
        invert_spd, invert_symmetric, invert_symmetric_rook,
    ];
    for inverter in &inverters {
        for &uplo in &[Uplo::Upper, Uplo::Lower] {
            let mut inv = a.clone();
            inverter(uplo, &mut inv).unwrap();
            assert_close!(abs=1e-10, inv, expected.clone());
        }
    }
}

#[test]
fn sandwiches_and_transposes() {
    let mut a = Matrix::new(4, 3);
    a.randomize_seed_fixed(-1.0, 1.0);
    let mut b = Matrix::new(4, 4);
    b.randomize_seed_fixed(-1.0, 1.0);

    // A^T B A, both ways
    let mut direct = Matrix::new(3, 3);
    multiply_at_b_a(&a, &b, &mut direct).unwrap();

    let mut at = a.clone();
    at.transpose();
    let mut by_hand = Matrix::new(3, 3);
    multiply_a_b_at(&at, &b, &mut by_hand).unwrap();
    assert_close!(abs=1e-12, direct, by_hand);

    let mut tmp = Matrix::new(4, 3);
    multiply(1.0, &b, Op::NoTrans, &a, Op::NoTrans, 0.0, &mut tmp).unwrap();
    let mut again = Matrix::new(3, 3);
    multiply(1.0, &a, Op::Trans, &tmp, Op::NoTrans, 0.0, &mut again).unwrap();
    assert_close!(abs=1e-12, direct, again);
}

#[test]
fn operations_on_borrowed_storage() {
    let mut rng = StdRng::seed_from_u64(3);
    let a = with_spectrum(&[1.0, 3.0, 9.0], &mut rng);

    let mut buffer = a.data().to_vec();
    {
        let mut view = Matrix::from_buffer(3, 3, &mut buffer, CopyType::Shallow).unwrap();
        assert!(view.is_borrowed());
        invert_spd(Uplo::Lower, &mut view).unwrap();
        assert!(view.is_borrowed());
    }

    let inverse = Matrix::from_slice(3, 3, &buffer).unwrap();
    let mut product = Matrix::new(3, 3);
    multiply(1.0, &inverse, Op::NoTrans, &a, Op::NoTrans, 0.0, &mut product).unwrap();
    assert!(product.is_identity_within(1e-10));
}

#[test]
fn failures_leave_typed_errors() {
    let mut singular = Matrix::from_slice(2, 2, &[1.0, 2.0, 2.0, 4.0]).unwrap();
    assert!(invert_general(&mut singular).unwrap_err().is_operation_error());

    let mut rect = Matrix::new(2, 3);
    assert!(invert_general(&mut rect).unwrap_err().is_dimension_error());

    let mut values = [0.0; 1];
    let mut a = identity(2);
    assert!(diagonalize_symmetric(Uplo::Upper, &mut a, &mut values).unwrap_err().is_dimension_error());

    let mut c = Matrix::new(2, 2);
    let err = multiply(1.0, &identity(3), Op::NoTrans, &identity(3), Op::NoTrans, 0.0, &mut c);
    assert!(err.unwrap_err().is_dimension_error());
}
