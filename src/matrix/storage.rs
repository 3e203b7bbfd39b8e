/* ************************************************************************ **
** This file is part of densemat, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use ::std::marker::PhantomData;
use ::std::ptr::NonNull;

/// The buffer behind a matrix: either owned, or borrowed from the caller.
pub(crate) enum Storage<'a> {
    Owned(Vec<f64>),
    Borrowed(Borrowed<'a>),
}

/// A non-owning handle to `cap` contiguous doubles.
///
/// This is morally a `&'a mut [f64]`. It is kept as a raw pointer so that
/// the address can be inspected (for output aliasing checks) without
/// materializing a reference, and so that views created through
/// `Matrix::from_raw_parts` are never freed.
pub(crate) struct Borrowed<'a> {
    ptr: NonNull<f64>,
    cap: usize,
    _marker: PhantomData<&'a mut [f64]>,
}

// Same thread-safety as the `&'a mut [f64]` this stands in for.
unsafe impl<'a> Send for Borrowed<'a> {}
unsafe impl<'a> Sync for Borrowed<'a> {}

impl<'a> Borrowed<'a> {
    pub(crate) fn from_slice(slice: &'a mut [f64]) -> Self {
        let cap = slice.len();
        // a slice pointer is never null, even when the slice is empty
        Borrowed { ptr: NonNull::from(slice).cast(), cap, _marker: PhantomData }
    }

    /// # Safety
    ///
    /// `ptr` must be valid for reads and writes of `cap` doubles for `'a`,
    /// and nothing else may access that memory during `'a`.
    pub(crate) unsafe fn from_raw(ptr: NonNull<f64>, cap: usize) -> Self
    { Borrowed { ptr, cap, _marker: PhantomData } }
}

impl<'a> Storage<'a> {
    pub(crate) fn borrowed(slice: &'a mut [f64]) -> Self
    { Storage::Borrowed(Borrowed::from_slice(slice)) }

    pub(crate) fn is_borrowed(&self) -> bool {
        match self {
            Storage::Owned(_) => false,
            Storage::Borrowed(_) => true,
        }
    }

    /// Number of doubles the buffer can hold without reallocating.
    pub(crate) fn capacity(&self) -> usize {
        match self {
            Storage::Owned(vec) => vec.len(),
            Storage::Borrowed(b) => b.cap,
        }
    }

    pub(crate) fn as_ptr(&self) -> *const f64 {
        match self {
            Storage::Owned(vec) => vec.as_ptr(),
            Storage::Borrowed(b) => b.ptr.as_ptr(),
        }
    }

    /// The first `len` elements.
    pub(crate) fn slice(&self, len: usize) -> &[f64] {
        match self {
            Storage::Owned(vec) => &vec[..len],
            Storage::Borrowed(b) => {
                assert!(len <= b.cap);
                unsafe { ::std::slice::from_raw_parts(b.ptr.as_ptr(), len) }
            },
        }
    }

    /// The first `len` elements.
    pub(crate) fn slice_mut(&mut self, len: usize) -> &mut [f64] {
        match self {
            Storage::Owned(vec) => &mut vec[..len],
            Storage::Borrowed(b) => {
                assert!(len <= b.cap);
                unsafe { ::std::slice::from_raw_parts_mut(b.ptr.as_ptr(), len) }
            },
        }
    }
}
