/* ************************************************************************ **
** This file is part of densemat, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use crate::errors::{MatrixResult, DimensionError, IndexRangeError, OperationError};
use crate::storage::{Storage, Borrowed};
use crate::comma_init::CommaInitializer;
use crate::random;

use ::rand::Rng;
use ::rand::distributions::{Distribution, Uniform};
use ::std::fmt;
use ::std::ops::{Index, IndexMut};
use ::std::ptr::NonNull;
use ::std::str::FromStr;

/// Absolute threshold used by the structural predicates when none is given.
pub const DEFAULT_THRESHOLD: f64 = 1e-10;

/// Dense, row-major matrix of doubles.
///
/// The buffer is either owned by the matrix, or borrowed from the caller
/// for `'a` (a "shallow" matrix). Either way, element `(i, j)` lives at
/// linear index `i * cols + j`.
///
/// Cloning always produces an owned deep copy, even for a borrowed matrix.
pub struct Matrix<'a> {
    storage: Storage<'a>,
    // invariant: rows * cols <= storage.capacity()
    rows: usize,
    cols: usize,
}

/// A matrix whose buffer is not borrowed from anything.
pub type OwnedMatrix = Matrix<'static>;

/// How to treat a caller-provided buffer during construction.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum CopyType {
    /// Copy every element into a buffer owned by the matrix.
    Deep,
    /// Use the caller's buffer directly; nothing is copied or allocated.
    Shallow,
}

/// Selects a triangle of a square matrix, including the diagonal.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Uplo {
    Upper,
    Lower,
}

impl Uplo {
    /// Parse the conventional one-letter labels `"U"` and `"L"`.
    pub fn from_label(label: &str) -> MatrixResult<Uplo> {
        match label {
            "U" => Ok(Uplo::Upper),
            "L" => Ok(Uplo::Lower),
            _ => Err(OperationError::new(
                "Uplo::from_label",
                format!("unknown label to access a symmetric matrix data: label={}", label),
            ).into()),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Uplo::Upper => "U",
            Uplo::Lower => "L",
        }
    }

    /// The other triangle.
    pub fn flip(self) -> Uplo {
        match self {
            Uplo::Upper => Uplo::Lower,
            Uplo::Lower => Uplo::Upper,
        }
    }
}

impl FromStr for Uplo {
    type Err = crate::errors::MatrixError;

    fn from_str(s: &str) -> MatrixResult<Uplo> { Uplo::from_label(s) }
}

//--------------------------------------------------------
// construction

impl<'a> Default for Matrix<'a> {
    /// The `0 x 0` matrix.
    fn default() -> Self
    { Matrix { storage: Storage::Owned(vec![]), rows: 0, cols: 0 } }
}

impl<'a> Matrix<'a> {
    /// Zero-filled matrix with its own buffer.
    pub fn new(rows: usize, cols: usize) -> Self
    { Matrix { storage: Storage::Owned(vec![0.0; rows * cols]), rows, cols } }

    /// Take ownership of row-major data.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> MatrixResult<Self> {
        check_buffer_len(rows, cols, data.len())?;
        Ok(Matrix { storage: Storage::Owned(data), rows, cols })
    }

    /// Deep copy of row-major data.
    pub fn from_slice(rows: usize, cols: usize, data: &[f64]) -> MatrixResult<Self> {
        check_buffer_len(rows, cols, data.len())?;
        Ok(Matrix { storage: Storage::Owned(data.to_vec()), rows, cols })
    }

    /// Build a matrix over a caller-provided buffer.
    ///
    /// With `CopyType::Shallow` the matrix becomes a view that reads and
    /// writes `data` directly, and never frees it. The length of `data`
    /// must be exactly `rows * cols` in both modes.
    pub fn from_buffer(rows: usize, cols: usize, data: &'a mut [f64], copy_type: CopyType) -> MatrixResult<Self> {
        check_buffer_len(rows, cols, data.len())?;
        let storage = match copy_type {
            CopyType::Deep => Storage::Owned(data.to_vec()),
            CopyType::Shallow => Storage::borrowed(data),
        };
        Ok(Matrix { storage, rows, cols })
    }

    /// Shorthand for a shallow `from_buffer`.
    pub fn from_slice_mut(rows: usize, cols: usize, data: &'a mut [f64]) -> MatrixResult<Self>
    { Matrix::from_buffer(rows, cols, data, CopyType::Shallow) }

    /// Build a matrix from a raw pointer to `rows * cols` doubles.
    ///
    /// Unlike the slice-based constructors, nothing about the length of the
    /// buffer can be checked here.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for reads of `rows * cols` doubles. For
    /// `CopyType::Shallow` it must furthermore be valid for writes for all
    /// of `'a`, and the memory must not be accessed through any other path
    /// while the matrix is alive (except through other matrices that are
    /// only ever passed to operations that reject aliased outputs).
    pub unsafe fn from_raw_parts(rows: usize, cols: usize, ptr: *mut f64, copy_type: CopyType) -> Self {
        let len = rows * cols;
        let ptr = match (len, NonNull::new(ptr)) {
            (0, _) => return Matrix { storage: Storage::Owned(vec![]), rows, cols },
            (_, Some(ptr)) => ptr,
            (_, None) => panic!("null pointer given for a {}x{} matrix", rows, cols),
        };
        let storage = match copy_type {
            CopyType::Deep => Storage::Owned(::std::slice::from_raw_parts(ptr.as_ptr(), len).to_vec()),
            CopyType::Shallow => Storage::Borrowed(Borrowed::from_raw(ptr, len)),
        };
        Matrix { storage, rows, cols }
    }

    /// Deep copy into an owned matrix.
    pub fn to_owned_matrix(&self) -> OwnedMatrix
    { Matrix { storage: Storage::Owned(self.data().to_vec()), rows: self.rows, cols: self.cols } }

    /// Detach from any borrowed buffer, copying only if necessary.
    pub fn into_owned(self) -> OwnedMatrix {
        let (rows, cols) = self.shape();
        match self.storage {
            Storage::Owned(mut vec) => {
                vec.truncate(rows * cols);
                Matrix { storage: Storage::Owned(vec), rows, cols }
            },
            borrowed @ Storage::Borrowed(_) => Matrix { storage: borrowed, rows, cols }.to_owned_matrix(),
        }
    }

    /// Overwrite every element with the values of a row-major slice.
    ///
    /// The shape is unchanged; the slice must hold exactly `size()` values.
    pub fn assign_from_slice(&mut self, values: &[f64]) -> MatrixResult<()> {
        if values.len() != self.size() {
            throw!(DimensionError::lengths(
                "fail to initialize matrix from a list of values: unmatched size",
                self.size(), values.len(),
            ));
        }
        self.data_mut().copy_from_slice(values);
        Ok(())
    }

    /// Start a comma initialization, writing `first` into the first element.
    ///
    /// ```
    /// # use densemat_matrix::Matrix;
    /// # fn main() -> Result<(), densemat_matrix::MatrixError> {
    /// let mut a = Matrix::new(2, 2);
    /// a.comma_init(1.0)?.push(2.0)?.push(3.0)?.push(4.0)?;
    /// assert_eq!(a.data(), &[1.0, 2.0, 3.0, 4.0]);
    /// # Ok(()) }
    /// ```
    pub fn comma_init(&mut self, first: f64) -> MatrixResult<CommaInitializer<'_, 'a>>
    { CommaInitializer::new(self, first) }
}

impl<'a> Clone for Matrix<'a> {
    fn clone(&self) -> Self
    { Matrix { storage: Storage::Owned(self.data().to_vec()), rows: self.rows, cols: self.cols } }

    /// Copy assignment. The destination always ends up owning its buffer.
    fn clone_from(&mut self, source: &Self) {
        let mut vec = match ::std::mem::replace(&mut self.storage, Storage::Owned(vec![])) {
            Storage::Owned(vec) => vec,
            Storage::Borrowed(_) => vec![],
        };
        vec.clear();
        vec.extend_from_slice(source.data());
        self.storage = Storage::Owned(vec);
        self.rows = source.rows;
        self.cols = source.cols;
    }
}

fn check_buffer_len(rows: usize, cols: usize, len: usize) -> Result<(), DimensionError> {
    if rows * cols != len {
        throw!(DimensionError::lengths("fail to create a matrix from a buffer", rows * cols, len));
    }
    Ok(())
}

//--------------------------------------------------------
// queries

impl<'a> Matrix<'a> {
    pub fn rows(&self) -> usize { self.rows }
    pub fn cols(&self) -> usize { self.cols }
    pub fn shape(&self) -> (usize, usize) { (self.rows, self.cols) }

    /// Total number of elements.
    pub fn size(&self) -> usize { self.rows * self.cols }
    pub fn is_empty(&self) -> bool { self.size() == 0 }
    pub fn is_square(&self) -> bool { self.rows == self.cols }

    /// Whether the buffer belongs to someone else. Always false when empty.
    pub fn is_borrowed(&self) -> bool
    { self.size() != 0 && self.storage.is_borrowed() }

    /// Row-major elements.
    pub fn data(&self) -> &[f64] { self.storage.slice(self.size()) }
    pub fn data_mut(&mut self) -> &mut [f64] {
        let len = self.size();
        self.storage.slice_mut(len)
    }

    /// Address of the first element; null for an empty matrix.
    pub fn as_ptr(&self) -> *const f64 {
        match self.size() {
            0 => ::std::ptr::null(),
            _ => self.storage.as_ptr(),
        }
    }

    /// Whether the buffers of two matrices share any element.
    pub fn overlaps(&self, other: &Matrix) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        let a = self.as_ptr() as usize;
        let b = other.as_ptr() as usize;
        let a_end = a + self.size() * ::std::mem::size_of::<f64>();
        let b_end = b + other.size() * ::std::mem::size_of::<f64>();
        a < b_end && b < a_end
    }

    /// Row-major slices of each row.
    pub fn row_slices(&self) -> impl Iterator<Item=&[f64]> + '_ {
        let cols = self.cols;
        (0..self.rows).map(move |i| &self.data()[i * cols..(i + 1) * cols])
    }

    /// Bounds-checked element access.
    pub fn at(&self, i: usize, j: usize) -> MatrixResult<&f64> {
        self.check_index(i, j)?;
        Ok(&self[(i, j)])
    }

    /// Bounds-checked element access.
    pub fn at_mut(&mut self, i: usize, j: usize) -> MatrixResult<&mut f64> {
        self.check_index(i, j)?;
        Ok(&mut self[(i, j)])
    }

    fn check_index(&self, i: usize, j: usize) -> Result<(), IndexRangeError> {
        if i >= self.rows || j >= self.cols {
            throw!(IndexRangeError::new((i, j), self.shape()));
        }
        Ok(())
    }

    /// Sum of the diagonal.
    pub fn trace(&self) -> MatrixResult<f64> {
        if !self.is_square() {
            throw!(DimensionError::new("cannot get trace of a matrix that is not square"));
        }
        Ok((0..self.rows).map(|i| self[(i, i)]).sum())
    }
}

/// Unchecked in the sense of [`Matrix::at`]: the row and column are not
/// individually validated, only the resulting linear index.
impl<'a> Index<(usize, usize)> for Matrix<'a> {
    type Output = f64;

    #[inline(always)] // inlining should often remove bounds checks
    fn index(&self, (i, j): (usize, usize)) -> &f64
    { &self.data()[i * self.cols + j] }
}

impl<'a> IndexMut<(usize, usize)> for Matrix<'a> {
    #[inline(always)]
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut f64 {
        let cols = self.cols;
        &mut self.data_mut()[i * cols + j]
    }
}

/// Exact elementwise equality. See [`Matrix::is_equal_to`] for the
/// thresholded version.
impl<'a, 'b> PartialEq<Matrix<'b>> for Matrix<'a> {
    fn eq(&self, other: &Matrix<'b>) -> bool
    { self.shape() == other.shape() && self.data() == other.data() }
}

impl<'a> fmt::Debug for Matrix<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Matrix")
            .field("rows", &self.rows)
            .field("cols", &self.cols)
            .field("borrowed", &self.is_borrowed())
            .field("data", &self.data())
            .finish()
    }
}

//--------------------------------------------------------
// structural predicates
//
// All thresholds are absolute, and a negative threshold means the same as
// its magnitude. Non-square matrices are never symmetric, diagonal, or
// identity.

impl<'a> Matrix<'a> {
    pub fn is_symmetric(&self) -> bool { self.is_symmetric_within(DEFAULT_THRESHOLD) }
    pub fn is_diagonal(&self) -> bool { self.is_diagonal_within(DEFAULT_THRESHOLD) }
    pub fn is_identity(&self) -> bool { self.is_identity_within(DEFAULT_THRESHOLD) }
    pub fn is_zeros(&self) -> bool { self.is_zeros_within(DEFAULT_THRESHOLD) }
    pub fn is_equal_to(&self, other: &Matrix) -> bool { self.is_equal_to_within(other, DEFAULT_THRESHOLD) }

    pub fn is_symmetric_within(&self, threshold: f64) -> bool {
        let threshold = threshold.abs();
        self.is_square() && self.strict_lower_indices().all(|(i, j)| {
            (self[(i, j)] - self[(j, i)]).abs() <= threshold
        })
    }

    /// True when every off-diagonal element is within `threshold` of zero.
    pub fn is_diagonal_within(&self, threshold: f64) -> bool {
        let threshold = threshold.abs();
        self.is_square() && self.strict_lower_indices().all(|(i, j)| {
            self[(i, j)].abs() <= threshold && self[(j, i)].abs() <= threshold
        })
    }

    pub fn is_identity_within(&self, threshold: f64) -> bool {
        let threshold = threshold.abs();
        self.is_square()
            && (0..self.rows).all(|i| (self[(i, i)] - 1.0).abs() <= threshold)
            && self.is_diagonal_within(threshold)
    }

    pub fn is_zeros_within(&self, threshold: f64) -> bool {
        let threshold = threshold.abs();
        self.data().iter().all(|x| x.abs() <= threshold)
    }

    /// Same shape, and every pair of elements within `threshold`.
    pub fn is_equal_to_within(&self, other: &Matrix, threshold: f64) -> bool {
        let threshold = threshold.abs();
        self.is_same_dimension_to(other)
            && self.data().iter().zip(other.data()).all(|(a, b)| (a - b).abs() <= threshold)
    }

    pub fn is_same_dimension_to(&self, other: &Matrix) -> bool
    { self.shape() == other.shape() }

    fn strict_lower_indices(&self) -> impl Iterator<Item=(usize, usize)> {
        let n = self.rows;
        (0..n).flat_map(|i| (0..i).map(move |j| (i, j)))
    }
}

//--------------------------------------------------------
// in-place mutation

impl<'a> Matrix<'a> {
    /// `A *= alpha`, through BLAS `dscal`.
    pub fn scale(&mut self, alpha: f64) -> &mut Self {
        // dscal takes a 32-bit length
        for chunk in self.data_mut().chunks_mut(::std::i32::MAX as usize) {
            unsafe { ::blas::dscal(chunk.len() as i32, alpha, chunk, 1) };
        }
        self
    }

    pub fn fill_all(&mut self, value: f64) -> &mut Self {
        for x in self.data_mut() {
            *x = value;
        }
        self
    }

    pub fn set_identity(&mut self) -> MatrixResult<&mut Self> {
        if !self.is_square() {
            throw!(DimensionError::new("cannot make a non-square matrix to be identity"));
        }
        self.fill_all(0.0);
        for i in 0..self.rows {
            self[(i, i)] = 1.0;
        }
        Ok(self)
    }

    /// Copy one triangle onto the other, discarding the other's contents.
    pub fn to_symmetric(&mut self, uplo: Uplo) -> MatrixResult<&mut Self> {
        if !self.is_square() {
            throw!(DimensionError::new("cannot symmetrize a matrix that is not square"));
        }
        let n = self.rows;
        let data = self.data_mut();
        for i in 0..n {
            for j in 0..i {
                match uplo {
                    Uplo::Upper => data[i * n + j] = data[j * n + i],
                    Uplo::Lower => data[j * n + i] = data[i * n + j],
                }
            }
        }
        Ok(self)
    }

    /// In-place transpose. A non-square matrix swaps its shape and has its
    /// buffer reordered, so that row-major indexing stays meaningful.
    pub fn transpose(&mut self) -> &mut Self {
        let (rows, cols) = self.shape();
        if self.is_square() {
            let data = self.data_mut();
            for i in 0..rows {
                for j in 0..i {
                    data.swap(i * cols + j, j * cols + i);
                }
            }
        } else {
            let mut transposed = Vec::with_capacity(self.size());
            for j in 0..cols {
                for i in 0..rows {
                    transposed.push(self[(i, j)]);
                }
            }
            self.data_mut().copy_from_slice(&transposed);
            self.rows = cols;
            self.cols = rows;
        }
        self
    }

    /// Fill with values uniformly distributed in `[a, b)`, drawn from a
    /// freshly seeded generator, so each call gives a different matrix.
    pub fn randomize(&mut self, a: f64, b: f64) -> &mut Self
    { self.randomize_with(&mut random::entropy_rng(), a, b) }

    /// Fill with values uniformly distributed in `[a, b)`, drawn from the
    /// process-wide generator with a fixed seed.
    ///
    /// The sequence is repeatable within one process as long as no other
    /// code draws from the same stream in between.
    pub fn randomize_seed_fixed(&mut self, a: f64, b: f64) -> &mut Self {
        random::with_fixed_seed_rng(|rng| { self.randomize_with(rng, a, b); });
        self
    }

    /// Fill with values uniformly distributed in `[a, b)`, drawn from `rng`.
    pub fn randomize_with<R: Rng + ?Sized>(&mut self, rng: &mut R, a: f64, b: f64) -> &mut Self {
        assert!(a <= b, "empty range for randomize: [{}, {})", a, b);
        if a == b {
            return self.fill_all(a);
        }
        let dist = Uniform::new(a, b);
        for x in self.data_mut() {
            *x = dist.sample(rng);
        }
        self
    }

    /// Change the shape, keeping the data in linear (row-major) order.
    ///
    /// Elements past the old size are zero. A borrowed buffer is kept
    /// (and only viewed differently) as long as it is large enough; growing
    /// beyond it moves the data into an owned buffer.
    pub fn resize(&mut self, rows: usize, cols: usize) -> &mut Self {
        let old_len = self.size();
        let new_len = rows * cols;

        if !self.storage.is_borrowed() {
            if let Storage::Owned(vec) = &mut self.storage {
                vec.truncate(old_len);
                vec.resize(new_len, 0.0);
            }
        } else if new_len <= self.storage.capacity() {
            if new_len > old_len {
                for x in &mut self.storage.slice_mut(new_len)[old_len..] {
                    *x = 0.0;
                }
            }
        } else {
            trace!("resize to {}x{} outgrows a borrowed buffer; copying into owned storage", rows, cols);
            let mut vec = Vec::with_capacity(new_len);
            vec.extend_from_slice(self.storage.slice(old_len));
            vec.resize(new_len, 0.0);
            self.storage = Storage::Owned(vec);
        }
        self.rows = rows;
        self.cols = cols;
        self
    }
}
