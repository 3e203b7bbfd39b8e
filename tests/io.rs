/* ************************************************************************ **
** This file is part of densemat, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

extern crate densemat;
extern crate tempdir;

use ::densemat::{Matrix, OwnedMatrix, Uplo};
use ::densemat::io::{
    IoErrorKind,
    write_matrices_to_binary, read_matrices_into_binary, read_matrices_from_binary,
    write_matrices_to_text, read_matrices_from_text,
};
use ::densemat::linalg::diagonalize_symmetric;
use ::tempdir::TempDir;

fn symmetric(n: usize) -> OwnedMatrix {
    let mut m = Matrix::new(n, n);
    m.randomize_seed_fixed(-1.0, 1.0);
    m.to_symmetric(Uplo::Upper).unwrap();
    m
}

#[test]
fn results_survive_both_formats() {
    let dir = TempDir::new("densemat").unwrap();

    let mut vectors = symmetric(5);
    let mut values = Matrix::new(1, 5);
    diagonalize_symmetric(Uplo::Upper, &mut vectors, values.data_mut()).unwrap();

    let bin = dir.path().join("eigen.bin");
    write_matrices_to_binary(&bin, &[&values, &vectors]).unwrap();
    let txt = dir.path().join("eigen.txt");
    write_matrices_to_text(&txt, &[&values, &vectors], 4).unwrap();

    let from_bin = read_matrices_from_binary(&bin).unwrap();
    let from_txt = read_matrices_from_text(&txt).unwrap();
    assert_eq!(from_bin, vec![values.clone(), vectors.clone()]);
    assert_eq!(from_txt, from_bin);

    // reading into existing buffers, including a borrowed one
    let mut storage = vec![0.0; 25];
    {
        let mut dest = [Matrix::new(1, 5), Matrix::from_slice_mut(5, 5, &mut storage).unwrap()];
        read_matrices_into_binary(&bin, &mut dest).unwrap();
        assert_eq!(dest[0], values);
    }
    assert_eq!(&storage[..], vectors.data());
}

#[test]
fn wrong_expectations() {
    let dir = TempDir::new("densemat").unwrap();
    let bin = dir.path().join("one.bin");
    write_matrices_to_binary(&bin, &[&symmetric(3)]).unwrap();

    let mut wrong_shape = [Matrix::new(9, 1)];
    let e = read_matrices_into_binary(&bin, &mut wrong_shape).unwrap_err();
    assert_eq!(e.kind(), IoErrorKind::DimensionMismatch);

    let mut too_many = [Matrix::new(3, 3), Matrix::new(3, 3)];
    let e = read_matrices_into_binary(&bin, &mut too_many).unwrap_err();
    assert_eq!(e.kind(), IoErrorKind::Malformed);

    // a binary file is not text
    let e = read_matrices_from_text(&bin).unwrap_err();
    assert!(e.kind() == IoErrorKind::Malformed, "{}", e);
}
