/* ************************************************************************ **
** This file is part of densemat, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use ::failure::Backtrace;
use ::std::fmt;

pub type MatrixResult<T> = Result<T, MatrixError>;

/// Every failure that matrix construction, access, or a linear algebra
/// operation can report.
///
/// The individual error types are also usable on their own; this enum only
/// exists so that `?` works across them.
#[derive(Debug, Fail)]
pub enum MatrixError {
    #[fail(display = "{}", _0)]
    Dimension(#[cause] DimensionError),
    #[fail(display = "{}", _0)]
    IndexRange(#[cause] IndexRangeError),
    #[fail(display = "{}", _0)]
    Operation(#[cause] OperationError),
}

impl MatrixError {
    pub fn is_dimension_error(&self) -> bool
    { match self { MatrixError::Dimension(_) => true, _ => false } }

    pub fn is_index_range_error(&self) -> bool
    { match self { MatrixError::IndexRange(_) => true, _ => false } }

    pub fn is_operation_error(&self) -> bool
    { match self { MatrixError::Operation(_) => true, _ => false } }
}

impl From<DimensionError> for MatrixError {
    fn from(e: DimensionError) -> Self { MatrixError::Dimension(e) }
}

impl From<IndexRangeError> for MatrixError {
    fn from(e: IndexRangeError) -> Self { MatrixError::IndexRange(e) }
}

impl From<OperationError> for MatrixError {
    fn from(e: OperationError) -> Self { MatrixError::Operation(e) }
}

//--------------------------------------------------------

/// Shapes or sizes that do not agree.
#[derive(Debug, Fail)]
#[fail(display = "dimension error: {}{}", description, details)]
pub struct DimensionError {
    backtrace: Backtrace,
    description: String,
    pub details: DimensionDetails,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DimensionDetails {
    None,
    /// The two matrices involved, as `(rows, cols)`.
    Shapes((usize, usize), (usize, usize)),
    /// A length that was expected and the one that was provided.
    Lengths { expected: usize, actual: usize },
}

impl fmt::Display for DimensionDetails {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            DimensionDetails::None => Ok(()),
            DimensionDetails::Shapes(a, b) => write!(f,
                "\n  matrix 1 dimension: [{}, {}]\n  matrix 2 dimension: [{}, {}]",
                a.0, a.1, b.0, b.1,
            ),
            DimensionDetails::Lengths { expected, actual } => write!(f,
                "\n  dimension is {}, while the expected one should be {}",
                actual, expected,
            ),
        }
    }
}

impl DimensionError {
    pub fn new(description: impl Into<String>) -> Self
    { DimensionError::with_details(description, DimensionDetails::None) }

    pub fn shapes(description: impl Into<String>, a: (usize, usize), b: (usize, usize)) -> Self
    { DimensionError::with_details(description, DimensionDetails::Shapes(a, b)) }

    pub fn lengths(description: impl Into<String>, expected: usize, actual: usize) -> Self
    { DimensionError::with_details(description, DimensionDetails::Lengths { expected, actual }) }

    fn with_details(description: impl Into<String>, details: DimensionDetails) -> Self
    { DimensionError {
        backtrace: Backtrace::new(),
        description: description.into(),
        details,
    }}

    pub fn description(&self) -> &str { &self.description }
}

//--------------------------------------------------------

#[derive(Debug, Fail)]
#[fail(display = "matrix index range error: ({}, {}) is out of range for a {}x{} matrix", row, col, nrows, ncols)]
pub struct IndexRangeError {
    backtrace: Backtrace,
    pub row: usize,
    pub col: usize,
    pub nrows: usize,
    pub ncols: usize,
}

impl IndexRangeError {
    pub fn new((row, col): (usize, usize), (nrows, ncols): (usize, usize)) -> Self
    { IndexRangeError { backtrace: Backtrace::new(), row, col, nrows, ncols } }
}

//--------------------------------------------------------

/// A named numerical operation could not be carried out.
#[derive(Debug, Fail)]
#[fail(display = "matrix operation error in {}: {}", operation, detail)]
pub struct OperationError {
    backtrace: Backtrace,
    pub operation: &'static str,
    pub detail: String,
}

impl OperationError {
    pub fn new(operation: &'static str, detail: impl Into<String>) -> Self
    { OperationError { backtrace: Backtrace::new(), operation, detail: detail.into() } }
}
