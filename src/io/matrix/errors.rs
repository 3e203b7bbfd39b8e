/* ************************************************************************ **
** This file is part of densemat, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use ::failure::{Backtrace, Fail};
use ::std::fmt;
use ::std::io;
use ::std::path::{Path, PathBuf};

pub type IoResult<T> = Result<T, MatrixIoError>;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum IoErrorKind {
    NotFound,
    PermissionDenied,
    /// The data does not follow the format (including truncated records).
    Malformed,
    /// A stored matrix does not have the shape it was expected to have.
    DimensionMismatch,
    Other,
}

impl fmt::Display for IoErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            IoErrorKind::NotFound => "not found",
            IoErrorKind::PermissionDenied => "permission denied",
            IoErrorKind::Malformed => "malformed data",
            IoErrorKind::DimensionMismatch => "dimension mismatch",
            IoErrorKind::Other => "other",
        })
    }
}

/// Failure to read or write a collection of matrices.
#[derive(Debug)]
pub struct MatrixIoError {
    backtrace: Backtrace,
    kind: IoErrorKind,
    path: Option<PathBuf>,
    detail: String,
    io: Option<io::Error>,
}

impl MatrixIoError {
    pub fn new(kind: IoErrorKind, detail: impl Into<String>) -> Self
    { MatrixIoError { backtrace: Backtrace::new(), kind, path: None, detail: detail.into(), io: None } }

    pub fn malformed(detail: impl Into<String>) -> Self
    { MatrixIoError::new(IoErrorKind::Malformed, detail) }

    /// Wrap an I/O error, deriving the kind from it.
    ///
    /// Hitting the end of the data in the middle of something counts as
    /// malformed data.
    pub fn from_io(detail: impl Into<String>, e: io::Error) -> Self {
        let kind = match e.kind() {
            io::ErrorKind::NotFound => IoErrorKind::NotFound,
            io::ErrorKind::PermissionDenied => IoErrorKind::PermissionDenied,
            io::ErrorKind::UnexpectedEof |
            io::ErrorKind::InvalidData => IoErrorKind::Malformed,
            _ => IoErrorKind::Other,
        };
        MatrixIoError { io: Some(e), ..MatrixIoError::new(kind, detail) }
    }

    /// Attach the file that was being accessed, if not already known.
    pub fn with_path(mut self, path: impl AsRef<Path>) -> Self {
        if self.path.is_none() {
            self.path = Some(path.as_ref().to_owned());
        }
        self
    }

    pub fn kind(&self) -> IoErrorKind { self.kind }
    pub fn path(&self) -> Option<&Path> { self.path.as_ref().map(|p| p.as_path()) }
    pub fn detail(&self) -> &str { &self.detail }
}

impl fmt::Display for MatrixIoError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "matrix I/O error ({})", self.kind)?;
        if let Some(path) = &self.path {
            write!(f, " in '{}'", path.display())?;
        }
        write!(f, ": {}", self.detail)
    }
}

impl Fail for MatrixIoError {
    fn cause(&self) -> Option<&dyn Fail> { self.io.as_ref().map(|e| e as &dyn Fail) }
    fn backtrace(&self) -> Option<&Backtrace> { Some(&self.backtrace) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_io_errors() {
        let e = MatrixIoError::from_io("open", io::Error::new(io::ErrorKind::NotFound, "nope"));
        assert_eq!(e.kind(), IoErrorKind::NotFound);
        assert!(e.cause().is_some());

        let e = MatrixIoError::from_io("read", io::Error::new(io::ErrorKind::UnexpectedEof, "eof"));
        assert_eq!(e.kind(), IoErrorKind::Malformed);

        let e = MatrixIoError::from_io("write", io::Error::new(io::ErrorKind::PermissionDenied, "ro"))
            .with_path("a.bin")
            .with_path("b.bin");
        assert_eq!(e.kind(), IoErrorKind::PermissionDenied);
        assert_eq!(e.path(), Some(Path::new("a.bin")));
        assert_eq!(e.to_string(), "matrix I/O error (permission denied) in 'a.bin': write");
    }
}
