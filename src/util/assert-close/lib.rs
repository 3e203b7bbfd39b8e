/* ************************************************************************ **
** This file is part of densemat, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Approximate comparison of floating point data in tests.
//!
//! The default tolerance is purely absolute and equals the default threshold
//! used by the structural predicates of `densemat-matrix` (`1e-10`), so that
//! `assert_close!(a, b)` agrees with `a.is_equal_to(&b)` out of the box.

#[macro_use]
extern crate failure;

use std::fmt;

pub const DEFAULT_ABS_TOL: f64 = 1e-10;

/// Assert that two values are elementwise close.
///
/// ```
/// # #[macro_use] extern crate densemat_assert_close;
/// # fn main() {
/// assert_close!(1.0, 1.0 + 1e-12);
/// assert_close!(abs=1e-8, vec![1.0, 2.0], vec![1.0, 2.0 + 1e-9]);
/// assert_close!(rel=1e-3, abs=0.0, 1000.0, 1000.5, "custom {}", "message");
/// # }
/// ```
#[macro_export]
macro_rules! assert_close {
    ($($t:tt)*) => {
        assert_close_impl!{@parsing [$($t)*] [[@abs $crate::DEFAULT_ABS_TOL] [@rel 0.0]]}
    };
}

#[macro_export]
macro_rules! debug_assert_close {
    ($($t:tt)*) => {{
        #[cfg(debug_assertions)] {
            assert_close!{$($t)*}
        }
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! assert_close_impl {
    (@parsing [abs=$tol:expr, $($rest:tt)*] [$($assignment:tt)*]) => {
        assert_close_impl!(@parsing [$($rest)*] [$($assignment)* [@abs $tol]]);
    };
    (@parsing [rel=$tol:expr, $($rest:tt)*] [$($assignment:tt)*]) => {
        assert_close_impl!(@parsing [$($rest)*] [$($assignment)* [@rel $tol]]);
    };
    (@parsing [$a:expr, $b:expr $(,)*] $assignments:tt) => {
        assert_close_impl!(@expand $assignments [@comp $a, $b] [@fmt "values are not close"])
    };
    (@parsing [$a:expr, $b:expr, $($fmt:tt)+] $assignments:tt) => {
        assert_close_impl!(@expand $assignments [@comp $a, $b] [@fmt $($fmt)+])
    };
    (@expand [$($assignment:tt)*] [@comp $a:expr, $b:expr] [@fmt $($fmt:tt)+]) => {
        #[allow(unused_mut)]
        #[allow(unused_assignments)]
        {
            let a = $a;
            let b = $b;

            let mut abs;
            let mut rel;
            $(
                assert_close_impl!{@stmt::assign [abs, rel] $assignment}
            )*

            if let Err(e) = $crate::CheckClose::check_close(&a, &b, $crate::Tolerances { abs, rel }) {
                panic!("{}\n{}", format!($($fmt)+), e);
            }
        }
    };
    (@stmt::assign [$abs:ident, $rel:ident] [@abs $tol:expr]) => { $abs = $tol; };
    (@stmt::assign [$abs:ident, $rel:ident] [@rel $tol:expr]) => { $rel = $tol; };
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Tolerances {
    pub abs: f64,
    pub rel: f64,
}

impl Default for Tolerances {
    fn default() -> Self { Tolerances { abs: DEFAULT_ABS_TOL, rel: 0.0 } }
}

impl Tolerances {
    /// `|a - b| <= abs`, or `|a - b| <= rel * max(|a|, |b|)`.
    ///
    /// NaN is never close to anything.
    pub fn accepts(&self, a: f64, b: f64) -> bool {
        assert!(self.abs >= 0.0, "negative absolute tolerance");
        assert!(self.rel >= 0.0, "negative relative tolerance");

        if a == b {
            return true; // includes infinities of equal sign
        }
        let diff = (a - b).abs();
        diff <= self.abs || diff <= self.rel * a.abs().max(b.abs())
    }
}

/// Where and how two values failed to be close.
#[derive(Debug, Fail)]
pub enum CheckCloseError {
    #[fail(display = "values differ at {}: left = {:e}, right = {:e} ({:?})", location, left, right, tol)]
    Value {
        location: Location,
        left: f64,
        right: f64,
        tol: Tolerances,
    },
    #[fail(display = "shapes differ: left = {:?}, right = {:?}", left, right)]
    Shape {
        left: Vec<usize>,
        right: Vec<usize>,
    },
}

/// Position of a mismatch inside a (possibly nested) container.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Location(pub Vec<usize>);

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "scalar");
        }
        write!(f, "index [")?;
        for (k, i) in self.0.iter().enumerate() {
            if k > 0 { write!(f, ", ")?; }
            write!(f, "{}", i)?;
        }
        write!(f, "]")
    }
}

impl CheckCloseError {
    /// Prepend an outer index to the location of a value mismatch.
    pub fn at(self, index: usize) -> Self {
        match self {
            CheckCloseError::Value { mut location, left, right, tol } => {
                location.0.insert(0, index);
                CheckCloseError::Value { location, left, right, tol }
            },
            e => e,
        }
    }
}

pub trait CheckClose<Rhs: ?Sized = Self> {
    /// Test that all values of self and other are close.
    fn check_close(&self, other: &Rhs, tol: Tolerances) -> Result<(), CheckCloseError>;
}

impl CheckClose for f64 {
    fn check_close(&self, other: &f64, tol: Tolerances) -> Result<(), CheckCloseError> {
        match tol.accepts(*self, *other) {
            true => Ok(()),
            false => Err(CheckCloseError::Value {
                location: Location::default(),
                left: *self,
                right: *other,
                tol,
            }),
        }
    }
}

impl<'a, T: ?Sized + CheckClose> CheckClose for &'a T {
    fn check_close(&self, other: &Self, tol: Tolerances) -> Result<(), CheckCloseError>
    { CheckClose::check_close(*self, *other, tol) }
}

impl<T: CheckClose> CheckClose for [T] {
    fn check_close(&self, other: &[T], tol: Tolerances) -> Result<(), CheckCloseError> {
        if self.len() != other.len() {
            return Err(CheckCloseError::Shape {
                left: vec![self.len()],
                right: vec![other.len()],
            });
        }
        for (i, (a, b)) in self.iter().zip(other).enumerate() {
            a.check_close(b, tol).map_err(|e| e.at(i))?;
        }
        Ok(())
    }
}

impl<T: CheckClose> CheckClose for Vec<T> {
    fn check_close(&self, other: &Vec<T>, tol: Tolerances) -> Result<(), CheckCloseError>
    { self[..].check_close(&other[..], tol) }
}

impl<T: CheckClose> CheckClose<[T]> for Vec<T> {
    fn check_close(&self, other: &[T], tol: Tolerances) -> Result<(), CheckCloseError>
    { self[..].check_close(other, tol) }
}

impl<T: CheckClose> CheckClose<Vec<T>> for [T] {
    fn check_close(&self, other: &Vec<T>, tol: Tolerances) -> Result<(), CheckCloseError>
    { self.check_close(&other[..], tol) }
}

#[cfg(test)]
#[deny(unused)]
mod tests {
    use super::*;

    #[test]
    fn macro_output_can_compile() {
        assert_close!(1.0, 1.0);
        assert_close!(abs=1e-8, 1.0, 1.0);
        assert_close!(rel=1e-8, abs=1e-8, 1.0, 1.0);
        assert_close!(1.0, 1.0,);
        assert_close!(abs=1e-8, 1.0, 1.0, "{} {}", "with", "message");
    }

    #[test]
    fn default_is_absolute() {
        assert!(Tolerances::default().accepts(1.0, 1.0 + 1e-11));
        assert!(!Tolerances::default().accepts(1e12, 1e12 + 1.0));
        assert!(!Tolerances::default().accepts(::std::f64::NAN, ::std::f64::NAN));
    }

    #[test]
    fn mismatch_location_is_reported() {
        let a = vec![vec![0.0, 1.0], vec![2.0, 3.0]];
        let b = vec![vec![0.0, 1.0], vec![2.0, 3.5]];
        match a.check_close(&b, Tolerances::default()) {
            Err(CheckCloseError::Value { location, .. }) => assert_eq!(location, Location(vec![1, 1])),
            r => panic!("unexpected: {:?}", r),
        }
    }

    #[test]
    fn length_mismatch_is_a_shape_error() {
        match vec![1.0].check_close(&vec![1.0, 2.0], Tolerances::default()) {
            Err(CheckCloseError::Shape { left, right }) => {
                assert_eq!((left, right), (vec![1], vec![2]));
            },
            r => panic!("unexpected: {:?}", r),
        }
    }

    #[test]
    #[should_panic]
    fn not_close() {
        assert_close!(abs=0.0, rel=0.0, 1.0, 1.1);
    }

    #[test]
    #[cfg_attr(debug_assertions, should_panic)]
    fn debug_not_close() {
        debug_assert_close!(abs=0.0, rel=0.0, 1.0, 1.1);
    }
}
