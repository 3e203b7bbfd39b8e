/* ************************************************************************ **
** This file is part of densemat, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Human-readable dumps of a matrix.

use crate::matrix::Matrix;
use ::std::fmt;

pub const DEFAULT_ELEMENTS_PER_LINE: usize = 5;

/// Format like C's `%.{precision}e`: always a sign and at least two digits
/// in the exponent.
///
/// ```
/// # use densemat_matrix::c_style_exp;
/// assert_eq!(c_style_exp(1234.0, 3), "1.234e+03");
/// assert_eq!(c_style_exp(-0.00012, 1), "-1.2e-04");
/// assert_eq!(c_style_exp(::std::f64::NEG_INFINITY, 8), "-inf");
/// ```
pub fn c_style_exp(value: f64, precision: usize) -> String {
    if value.is_nan() {
        return "nan".to_string();
    } else if value.is_infinite() {
        return if value < 0.0 { "-inf" } else { "inf" }.to_string();
    }

    let s = format!("{:.*e}", precision, value);
    // rust always emits an exponent for {:e}
    let e_pos = s.find('e').unwrap_or(s.len());
    let (mantissa, exp) = s.split_at(e_pos);
    let exp: i32 = exp[1..].parse().unwrap_or(0);
    let sign = if exp < 0 { '-' } else { '+' };
    format!("{}e{}{:02}", mantissa, sign, exp.abs())
}

/// `Display` adapter printing every element. See [`Matrix::show_full`].
#[derive(Debug, Copy, Clone)]
pub struct ShowFull<'m, 'a> {
    matrix: &'m Matrix<'a>,
    per_line: usize,
}

/// `Display` adapter printing the lower triangle. See [`Matrix::show_lower`].
#[derive(Debug, Copy, Clone)]
pub struct ShowLower<'m, 'a> {
    matrix: &'m Matrix<'a>,
    per_line: usize,
}

impl<'a> Matrix<'a> {
    /// Every row, with at most `per_line` elements on a line.
    ///
    /// Each row is introduced by its one-based index.
    pub fn show_full(&self, per_line: usize) -> ShowFull<'_, 'a> {
        assert!(per_line > 0, "cannot show zero elements per line");
        ShowFull { matrix: self, per_line }
    }

    /// Like [`Matrix::show_full`], but only elements on or below the diagonal.
    pub fn show_lower(&self, per_line: usize) -> ShowLower<'_, 'a> {
        assert!(per_line > 0, "cannot show zero elements per line");
        ShowLower { matrix: self, per_line }
    }
}

fn write_row(f: &mut fmt::Formatter, index: usize, row: &[f64], per_line: usize) -> fmt::Result {
    writeln!(f, " {:5}:", index + 1)?;
    for (j, &x) in row.iter().enumerate() {
        write!(f, " {:>15},", c_style_exp(x, 8))?;
        if (j + 1) % per_line == 0 && j + 1 != row.len() {
            writeln!(f)?;
        }
    }
    writeln!(f)
}

impl<'m, 'a> fmt::Display for ShowFull<'m, 'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let (rows, cols) = self.matrix.shape();
        writeln!(f, "dimension: {} x {}, showing in full.", rows, cols)?;
        for (i, row) in self.matrix.row_slices().enumerate() {
            write_row(f, i, row, self.per_line)?;
        }
        Ok(())
    }
}

impl<'m, 'a> fmt::Display for ShowLower<'m, 'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let (rows, cols) = self.matrix.shape();
        writeln!(f, "dimension: {} x {}, showing the lower triangular parts.", rows, cols)?;
        for (i, row) in self.matrix.row_slices().enumerate() {
            let end = usize::min(i + 1, row.len());
            write_row(f, i, &row[..end], self.per_line)?;
        }
        writeln!(f)
    }
}

impl<'a> fmt::Display for Matrix<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result
    { fmt::Display::fmt(&self.show_full(DEFAULT_ELEMENTS_PER_LINE), f) }
}
