/* ************************************************************************ **
** This file is part of densemat, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Reading and writing collections of matrices.
//!
//! Two formats are supported: a headerless [binary](binary) record stream and
//! a comma-separated [text](text) form. Both have functions taking a path as
//! well as functions over any `Read`/`Write`.

#[macro_use]
extern crate log;
extern crate failure;
extern crate densemat_matrix;
#[cfg(test)]
extern crate tempdir;

macro_rules! throw {
    ($e:expr) => {
        return Err(::std::convert::Into::into($e))
    }
}

mod errors;
pub mod binary;
pub mod text;

pub use crate::errors::{IoResult, IoErrorKind, MatrixIoError};
pub use crate::binary::{
    write_matrices_to_binary, read_matrices_into_binary, read_matrices_from_binary,
    write_binary, read_binary_into, read_binary,
};
pub use crate::text::{write_matrices_to_text, read_matrices_from_text, write_text, read_text};

use ::std::fs::File;
use ::std::io::{BufReader, BufWriter};
use ::std::path::Path;

/// Wrapper around `File::open` that records the path and makes a `BufReader`.
pub(crate) fn open_input(path: &Path) -> IoResult<BufReader<File>> {
    trace!("opening '{}' for reading", path.display());
    File::open(path)
        .map(BufReader::new)
        .map_err(|e| MatrixIoError::from_io("could not open file", e).with_path(path))
}

/// Wrapper around `File::create` that records the path and makes a `BufWriter`.
pub(crate) fn create_output(path: &Path) -> IoResult<BufWriter<File>> {
    trace!("creating '{}'", path.display());
    File::create(path)
        .map(BufWriter::new)
        .map_err(|e| MatrixIoError::from_io("could not create file", e).with_path(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::densemat_matrix::Matrix;
    use ::tempdir::TempDir;

    #[test]
    fn files_round_trip() {
        let dir = TempDir::new("densemat-io").unwrap();
        let mut a = Matrix::new(4, 3);
        a.randomize(-1.0, 1.0);
        let b = Matrix::from_slice(1, 2, &[5.0, 6.0]).unwrap();

        let bin = dir.path().join("mats.bin");
        write_matrices_to_binary(&bin, &[&a, &b]).unwrap();
        assert_eq!(read_matrices_from_binary(&bin).unwrap(), vec![a.clone(), b.clone()]);

        let mut dest = [Matrix::new(4, 3)];
        read_matrices_into_binary(&bin, &mut dest).unwrap();
        assert_eq!(dest[0], a);

        let txt = dir.path().join("mats.txt");
        write_matrices_to_text(&txt, &[&a, &b], 2).unwrap();
        assert_eq!(read_matrices_from_text(&txt).unwrap(), vec![a, b]);
    }

    #[test]
    fn missing_file() {
        let dir = TempDir::new("densemat-io").unwrap();
        let path = dir.path().join("nope.bin");

        let e = read_matrices_from_binary(&path).unwrap_err();
        assert_eq!(e.kind(), IoErrorKind::NotFound);
        assert_eq!(e.path(), Some(path.as_path()));

        let e = read_matrices_from_text(&path).unwrap_err();
        assert_eq!(e.kind(), IoErrorKind::NotFound);

        let e = write_matrices_to_text(dir.path().join("no/such/dir.txt"), &[], 5).unwrap_err();
        assert_eq!(e.kind(), IoErrorKind::NotFound);
    }

    #[test]
    fn malformed_file_names_the_path() {
        let dir = TempDir::new("densemat-io").unwrap();
        let path = dir.path().join("bad.txt");
        ::std::fs::write(&path, "Dimension,1,1\nhello\n").unwrap();

        let e = read_matrices_from_text(&path).unwrap_err();
        assert_eq!(e.kind(), IoErrorKind::Malformed);
        assert_eq!(e.path(), Some(path.as_path()));
        assert!(e.to_string().contains("bad.txt"));
    }
}
