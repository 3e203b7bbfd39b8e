/* ************************************************************************ **
** This file is part of densemat, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Raw binary format.
//!
//! A file is a plain sequence of records with no header, each being the row
//! count and column count as native-endian 64-bit integers, followed by the
//! elements in row-major order as native-endian doubles.

use crate::{IoResult, MatrixIoError, IoErrorKind, open_input, create_output};
use ::densemat_matrix::{Matrix, OwnedMatrix};
use ::std::convert::TryFrom;
use ::std::io::{self, prelude::*};
use ::std::path::Path;

const WORD: usize = 8;
/// Elements reserved up front for a record of unverified size.
const MAX_PREALLOC: usize = 1 << 16;

//--------------------------------------------------------------------------------------
// public API

/// Write each matrix as one record, in order.
pub fn write_matrices_to_binary(path: impl AsRef<Path>, matrices: &[&Matrix]) -> IoResult<()> {
    let path = path.as_ref();
    let mut file = create_output(path)?;
    write_binary(&mut file, matrices)
        .and_then(|()| file.flush().map_err(|e| MatrixIoError::from_io("could not flush output", e)))
        .map_err(|e| e.with_path(path))?;
    debug!("wrote {} matrices to '{}'", matrices.len(), path.display());
    Ok(())
}

/// Read one record into each of the given matrices, in order.
///
/// Every record must have exactly the shape of the matrix it is read into.
/// Records after the last matrix are ignored.
pub fn read_matrices_into_binary(path: impl AsRef<Path>, matrices: &mut [Matrix]) -> IoResult<()> {
    let path = path.as_ref();
    let mut file = open_input(path)?;
    read_binary_into(&mut file, matrices).map_err(|e| e.with_path(path))?;
    debug!("read {} matrices from '{}'", matrices.len(), path.display());
    Ok(())
}

/// Read every record of a file.
pub fn read_matrices_from_binary(path: impl AsRef<Path>) -> IoResult<Vec<OwnedMatrix>> {
    let path = path.as_ref();
    let mut file = open_input(path)?;
    let matrices = read_binary(&mut file).map_err(|e| e.with_path(path))?;
    debug!("read {} matrices from '{}'", matrices.len(), path.display());
    Ok(matrices)
}

/// [`write_matrices_to_binary`] for any writer.
pub fn write_binary(mut w: impl Write, matrices: &[&Matrix]) -> IoResult<()> {
    for matrix in matrices {
        write_record(&mut w, matrix)
            .map_err(|e| MatrixIoError::from_io("could not write matrix record", e))?;
    }
    Ok(())
}

/// [`read_matrices_into_binary`] for any reader.
pub fn read_binary_into(mut r: impl Read, matrices: &mut [Matrix]) -> IoResult<()> {
    let count = matrices.len();
    for (index, matrix) in matrices.iter_mut().enumerate() {
        let shape = match read_header(&mut r)? {
            Some(shape) => shape,
            None => throw!(MatrixIoError::malformed(format!(
                "data ends before matrix {} of {}", index + 1, count,
            ))),
        };
        if shape != matrix.shape() {
            throw!(MatrixIoError::new(IoErrorKind::DimensionMismatch, format!(
                "matrix {} is stored as {}x{}, but a {}x{} matrix was expected",
                index, shape.0, shape.1, matrix.rows(), matrix.cols(),
            )));
        }
        read_elements(&mut r, matrix.data_mut())?;
    }
    Ok(())
}

/// [`read_matrices_from_binary`] for any reader.
///
/// The data must end exactly at the end of a record.
pub fn read_binary(mut r: impl Read) -> IoResult<Vec<OwnedMatrix>> {
    let mut out = vec![];
    while let Some((rows, cols)) = read_header(&mut r)? {
        out.push(read_matrix(&mut r, rows, cols)?);
    }
    Ok(out)
}

//--------------------------------------------------------------------------------------
// implementation

fn write_record(w: &mut impl Write, matrix: &Matrix) -> io::Result<()> {
    w.write_all(&(matrix.rows() as u64).to_ne_bytes())?;
    w.write_all(&(matrix.cols() as u64).to_ne_bytes())?;
    for &x in matrix.data() {
        w.write_all(&x.to_ne_bytes())?;
    }
    Ok(())
}

/// `None` on a clean end of data.
fn read_header(r: &mut impl Read) -> IoResult<Option<(usize, usize)>> {
    let mut buf = [0u8; 2 * WORD];
    let mut filled = 0;
    while filled < buf.len() {
        match r.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => throw!(MatrixIoError::from_io("could not read matrix header", e)),
        }
    }
    match filled {
        0 => Ok(None),
        n if n < buf.len() => throw!(MatrixIoError::malformed(format!(
            "truncated matrix header ({} of {} bytes)", n, buf.len(),
        ))),
        _ => {
            let mut word = [0u8; WORD];
            word.copy_from_slice(&buf[..WORD]);
            let rows = u64::from_ne_bytes(word);
            word.copy_from_slice(&buf[WORD..]);
            let cols = u64::from_ne_bytes(word);
            Ok(Some((header_dim(rows)?, header_dim(cols)?)))
        },
    }
}

fn header_dim(x: u64) -> IoResult<usize> {
    usize::try_from(x).map_err(|_| MatrixIoError::malformed(format!("matrix dimension {} is too large", x)))
}

/// Read a record body whose shape came from the data itself.
///
/// The header is not trusted for allocation; the buffer only grows as
/// elements actually arrive.
fn read_matrix(r: &mut impl Read, rows: usize, cols: usize) -> IoResult<OwnedMatrix> {
    let len = match rows.checked_mul(cols) {
        Some(len) => len,
        None => throw!(MatrixIoError::malformed(format!("matrix of shape {}x{} is too large", rows, cols))),
    };
    let mut data = Vec::with_capacity(usize::min(len, MAX_PREALLOC));
    while data.len() < len {
        data.push(read_element(r)?);
    }
    Matrix::from_vec(rows, cols, data)
        .map_err(|e| MatrixIoError::malformed(format!("bad matrix record: {}", e)))
}

fn read_elements(r: &mut impl Read, dest: &mut [f64]) -> IoResult<()> {
    for x in dest {
        *x = read_element(r)?;
    }
    Ok(())
}

fn read_element(r: &mut impl Read) -> IoResult<f64> {
    let mut word = [0u8; WORD];
    r.read_exact(&mut word).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => MatrixIoError::malformed("truncated matrix record"),
        _ => MatrixIoError::from_io("could not read matrix elements", e),
    })?;
    Ok(f64::from_ne_bytes(word))
}
