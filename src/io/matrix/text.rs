/* ************************************************************************ **
** This file is part of densemat, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Comma-separated text format.
//!
//! ```text
//! Dimension,2,3
//! 1.0000000000000000e+00,2.0000000000000000e+00
//! 3.0000000000000000e+00,4.0000000000000000e+00
//! 5.0000000000000000e+00,6.0000000000000000e+00
//!
//! ```
//!
//! Each matrix is a `Dimension,<rows>,<cols>` line followed by its elements
//! in row-major order, wrapped at a fixed number of values per line, and
//! terminated by a blank line.  Values carry 17 significant digits, so
//! reading back a written file reproduces it exactly.

use crate::{IoResult, MatrixIoError, open_input, create_output};
use ::densemat_matrix::{Matrix, OwnedMatrix, c_style_exp};
use ::std::io::{self, prelude::*};
use ::std::path::Path;

const HEADER: &str = "Dimension";
const PRECISION: usize = 16;

//--------------------------------------------------------------------------------------
// public API

/// Write the matrices in order, with `elements_per_line` values per line.
///
/// # Panics
///
/// Panics if `elements_per_line` is zero.
pub fn write_matrices_to_text(
    path: impl AsRef<Path>,
    matrices: &[&Matrix],
    elements_per_line: usize,
) -> IoResult<()> {
    let path = path.as_ref();
    let mut file = create_output(path)?;
    write_text(&mut file, matrices, elements_per_line)
        .and_then(|()| file.flush().map_err(|e| MatrixIoError::from_io("could not flush output", e)))
        .map_err(|e| e.with_path(path))?;
    debug!("wrote {} matrices to '{}'", matrices.len(), path.display());
    Ok(())
}

/// Read every matrix of a text file.
pub fn read_matrices_from_text(path: impl AsRef<Path>) -> IoResult<Vec<OwnedMatrix>> {
    let path = path.as_ref();
    let file = open_input(path)?;
    let matrices = read_text(file).map_err(|e| e.with_path(path))?;
    debug!("read {} matrices from '{}'", matrices.len(), path.display());
    Ok(matrices)
}

/// [`write_matrices_to_text`] for any writer.
pub fn write_text(mut w: impl Write, matrices: &[&Matrix], elements_per_line: usize) -> IoResult<()> {
    assert!(elements_per_line > 0, "elements_per_line must be positive");
    for matrix in matrices {
        write_record(&mut w, matrix, elements_per_line)
            .map_err(|e| MatrixIoError::from_io("could not write matrix", e))?;
    }
    Ok(())
}

/// [`read_matrices_from_text`] for any buffered reader.
///
/// Blank lines are ignored, and values may be wrapped at any width.
/// Every matrix must be complete before the next header or the end of the data.
pub fn read_text(r: impl BufRead) -> IoResult<Vec<OwnedMatrix>> {
    let mut out = vec![];
    let mut current: Option<Pending> = None;

    for (index, line) in r.lines().enumerate() {
        let line_number = index + 1;
        let line = line.map_err(|e| MatrixIoError::from_io(format!("could not read line {}", line_number), e))?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if line.starts_with(HEADER) {
            if let Some(pending) = &current {
                throw!(incomplete(pending, line_number));
            }
            let pending = parse_header(line, line_number)?;
            match pending.size {
                0 => out.push(pending.finish()?),
                _ => current = Some(pending),
            }
            continue;
        }

        let complete = match &mut current {
            None => throw!(MatrixIoError::malformed(format!(
                "line {}: values outside of any matrix (missing '{}' line?)", line_number, HEADER,
            ))),
            Some(pending) => {
                for token in line.split(',').map(str::trim).filter(|t| !t.is_empty()) {
                    if pending.data.len() == pending.size {
                        throw!(MatrixIoError::malformed(format!(
                            "line {}: too many values for a {}x{} matrix",
                            line_number, pending.rows, pending.cols,
                        )));
                    }
                    pending.data.push(parse_value(token, line_number)?);
                }
                pending.data.len() == pending.size
            },
        };
        if complete {
            if let Some(pending) = current.take() {
                out.push(pending.finish()?);
            }
        }
    }

    if let Some(pending) = &current {
        throw!(MatrixIoError::malformed(format!(
            "data ends after {} of the {} values of a {}x{} matrix",
            pending.data.len(), pending.size, pending.rows, pending.cols,
        )));
    }
    Ok(out)
}

//--------------------------------------------------------------------------------------
// implementation

fn write_record(w: &mut impl Write, matrix: &Matrix, per_line: usize) -> io::Result<()> {
    writeln!(w, "{},{},{}", HEADER, matrix.rows(), matrix.cols())?;
    for chunk in matrix.data().chunks(per_line) {
        let values: Vec<String> = chunk.iter().map(|&x| c_style_exp(x, PRECISION)).collect();
        writeln!(w, "{}", values.join(","))?;
    }
    writeln!(w)
}

/// A matrix whose header has been read.
///
/// Values are collected as they are parsed; the header alone never decides
/// how much memory is reserved.
struct Pending {
    rows: usize,
    cols: usize,
    size: usize,
    data: Vec<f64>,
}

impl Pending {
    fn finish(self) -> IoResult<OwnedMatrix> {
        let Pending { rows, cols, data, .. } = self;
        Matrix::from_vec(rows, cols, data)
            .map_err(|e| MatrixIoError::malformed(format!("bad matrix: {}", e)))
    }
}

fn parse_header(line: &str, line_number: usize) -> IoResult<Pending> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    let bad = || MatrixIoError::malformed(format!(
        "line {}: expected '{},<rows>,<cols>', got '{}'", line_number, HEADER, line,
    ));
    match &fields[..] {
        &[HEADER, rows, cols] => {
            let rows: usize = rows.parse().map_err(|_| bad())?;
            let cols: usize = cols.parse().map_err(|_| bad())?;
            let size = match rows.checked_mul(cols) {
                Some(size) => size,
                None => throw!(MatrixIoError::malformed(format!(
                    "line {}: matrix of shape {}x{} is too large", line_number, rows, cols,
                ))),
            };
            Ok(Pending { rows, cols, size, data: vec![] })
        },
        _ => throw!(bad()),
    }
}

fn parse_value(token: &str, line_number: usize) -> IoResult<f64> {
    // the spellings printed for non-finite values
    match token {
        "nan" | "-nan" => return Ok(::std::f64::NAN),
        "inf" => return Ok(::std::f64::INFINITY),
        "-inf" => return Ok(::std::f64::NEG_INFINITY),
        _ => {},
    }
    token.parse().map_err(|_| MatrixIoError::malformed(format!(
        "line {}: '{}' is not a number", line_number, token,
    )))
}

fn incomplete(pending: &Pending, line_number: usize) -> MatrixIoError {
    MatrixIoError::malformed(format!(
        "line {}: new matrix begins after only {} of the {} values of a {}x{} matrix",
        line_number, pending.data.len(), pending.size, pending.rows, pending.cols,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::IoErrorKind;

    fn encode(matrices: &[&Matrix], per_line: usize) -> String {
        let mut buf = vec![];
        write_text(&mut buf, matrices, per_line).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn malformed(text: &str) -> MatrixIoError {
        let e = read_text(text.as_bytes()).unwrap_err();
        assert_eq!(e.kind(), IoErrorKind::Malformed, "{}", e);
        e
    }

    #[test]
    fn layout() {
        let a = Matrix::from_slice(2, 2, &[1.0, -2.5, 0.0, 3.0]).unwrap();
        let empty = Matrix::new(3, 0);
        assert_eq!(encode(&[&a, &empty], 3), "\
Dimension,2,2
1.0000000000000000e+00,-2.5000000000000000e+00,0.0000000000000000e+00
3.0000000000000000e+00

Dimension,3,0

");
    }

    #[test]
    fn read_back_exactly() {
        let mut a = Matrix::new(3, 7);
        a.randomize(-1e5, 1e5);
        let mut b = Matrix::new(1, 1);
        b.fill_all(1.0 / 3.0);
        let c = Matrix::from_slice(1, 3, &[::std::f64::INFINITY, -0.0, 1e-300]).unwrap();
        let empty = Matrix::new(0, 0);

        for &per_line in &[1, 2, 5, 100] {
            let text = encode(&[&a, &b, &empty, &c], per_line);
            let read = read_text(text.as_bytes()).unwrap();
            assert_eq!(read, vec![a.clone(), b.clone(), empty.clone(), c.clone()]);
        }
    }

    #[test]
    fn nan_is_readable() {
        let a = Matrix::from_slice(1, 2, &[::std::f64::NAN, 2.0]).unwrap();
        let read = read_text(encode(&[&a], 5).as_bytes()).unwrap();
        assert!(read[0][(0, 0)].is_nan());
        assert_eq!(read[0][(0, 1)], 2.0);
    }

    #[test]
    fn lenient_whitespace_and_wrapping() {
        let text = "\n\nDimension, 2, 2\n 1.5 ,2\n\n3,\n4\nDimension,1,1\n-7e0";
        let read = read_text(text.as_bytes()).unwrap();
        assert_eq!(read.len(), 2);
        assert_eq!(read[0].data(), &[1.5, 2.0, 3.0, 4.0]);
        assert_eq!(read[1].data(), &[-7.0]);

        assert!(read_text("".as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn malformed_inputs() {
        malformed("1.0,2.0\n");
        malformed("Dimension,2\n1,2\n");
        malformed("Dimension,a,b\n");
        malformed("Dimensions,1,1\n1\n");
        malformed("Dimension,1,2\n1,two\n");
        malformed("Dimension,1,2\n1,2,3\n");
        malformed("Dimension,1,1\n1\n2\n");
        malformed("Dimension,2,2\n1,2,3\nDimension,1,1\n1\n");
        let e = malformed("Dimension,2,2\n1,2,3\n");
        assert!(e.detail().contains("3 of the 4"), "{}", e);
    }

    #[test]
    fn huge_header_without_data() {
        let e = malformed("Dimension,2147483648,2147483648\n1.0\n");
        assert!(e.detail().contains("1 of the 4611686018427387904"), "{}", e);
        malformed("Dimension,18446744073709551615,2\n1.0\n");

        // a huge empty matrix costs nothing
        let read = read_text("Dimension,18446744073709551615,0\n".as_bytes()).unwrap();
        assert_eq!((read[0].rows(), read[0].cols()), (::std::usize::MAX, 0));
    }

    #[test]
    #[should_panic(expected = "elements_per_line")]
    fn zero_per_line() {
        let _ = encode(&[&Matrix::new(1, 1)], 0);
    }
}
