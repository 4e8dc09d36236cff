use std::cmp::Ordering;

use uom::si::{f64::Ratio, ratio::ratio};

use crate::constraint::{Constrained, Constraint, ConstraintError};

/// Types with well-defined zero and one bounds.
///
/// We provide implementations for `f64` and `uom::si::f64::Ratio`.
pub trait UnitBounds: PartialOrd + Sized {
    fn zero() -> Self;
    fn one() -> Self;
}

impl UnitBounds for f64 {
    fn zero() -> Self {
        0.0
    }

    fn one() -> Self {
        1.0
    }
}

impl UnitBounds for Ratio {
    fn zero() -> Self {
        Ratio::new::<ratio>(0.0)
    }

    fn one() -> Self {
        Ratio::new::<ratio>(1.0)
    }
}

/// Marker type enforcing that a value lies in the closed unit interval: `0 ≤ x ≤ 1`.
///
/// Degradable organic carbon, oxidation factors, moisture contents and every
/// other emission fraction are expressed with this constraint.
///
/// # Examples
///
/// ```
/// use vermi_core::constraint::{Constrained, UnitInterval};
///
/// let a = Constrained::<_, UnitInterval>::new(0.15).unwrap();
/// assert_eq!(a.into_inner(), 0.15);
///
/// let one = UnitInterval::one::<f64>();
/// assert_eq!(one.into_inner(), 1.0);
///
/// assert!(UnitInterval::new(-0.1).is_err());
/// assert!(UnitInterval::new(1.5).is_err());
/// assert!(UnitInterval::new(f64::NAN).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct UnitInterval;

impl UnitInterval {
    /// Constructs `Constrained<T, UnitInterval>` if `0 ≤ value ≤ 1`.
    ///
    /// # Errors
    ///
    /// - [`ConstraintError::BelowMinimum`] if less than zero.
    /// - [`ConstraintError::AboveMaximum`] if greater than one.
    /// - [`ConstraintError::NotANumber`] if comparison is undefined (e.g., NaN).
    pub fn new<T: UnitBounds>(value: T) -> Result<Constrained<T, UnitInterval>, ConstraintError> {
        Constrained::<T, UnitInterval>::new(value)
    }

    /// Returns the lower bound (zero) as a constrained value.
    #[must_use]
    pub fn zero<T: UnitBounds>() -> Constrained<T, UnitInterval> {
        Constrained::new_unchecked(T::zero())
    }

    /// Returns the upper bound (one) as a constrained value.
    #[must_use]
    pub fn one<T: UnitBounds>() -> Constrained<T, UnitInterval> {
        Constrained::new_unchecked(T::one())
    }
}

impl<T: UnitBounds> Constraint<T> for UnitInterval {
    fn check(value: &T) -> Result<(), ConstraintError> {
        match (value.partial_cmp(&T::zero()), value.partial_cmp(&T::one())) {
            (None, _) | (_, None) => Err(ConstraintError::NotANumber),
            (Some(Ordering::Less), _) => Err(ConstraintError::BelowMinimum),
            (_, Some(Ordering::Greater)) => Err(ConstraintError::AboveMaximum),
            _ => Ok(()),
        }
    }
}

impl Constrained<f64, UnitInterval> {
    /// Constructs a fraction in a const context.
    ///
    /// Intended for compile-time constants, where an out-of-range value fails
    /// the build.
    ///
    /// # Panics
    ///
    /// Panics if `value` is outside `[0, 1]` or NaN.
    #[must_use]
    pub const fn from_const(value: f64) -> Self {
        assert!(value >= 0.0 && value <= 1.0, "fraction must lie in [0, 1]");
        Constrained {
            value,
            _marker: std::marker::PhantomData,
        }
    }

    /// Returns `1 - x`, which is also within `[0, 1]`.
    #[must_use]
    pub fn complement(self) -> Self {
        Constrained::new_unchecked(1.0 - self.into_inner())
    }
}
