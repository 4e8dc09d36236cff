use std::cmp::Ordering;

use num_traits::Zero;

use crate::constraint::{Constrained, Constraint, ConstraintError};

/// Marker type enforcing that a value is greater than zero.
///
/// # Examples
///
/// ```
/// use vermi_core::constraint::{ConstraintError, StrictlyPositive};
///
/// assert!(StrictlyPositive::new(0.5).is_ok());
/// assert_eq!(StrictlyPositive::new(0.0), Err(ConstraintError::Zero));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct StrictlyPositive;

impl StrictlyPositive {
    /// Constructs `Constrained<T, StrictlyPositive>` if `value > 0`.
    ///
    /// # Errors
    ///
    /// - [`ConstraintError::Negative`] if the value is less than zero.
    /// - [`ConstraintError::Zero`] if the value equals zero.
    /// - [`ConstraintError::NotANumber`] if comparison is undefined (e.g., NaN).
    pub fn new<T: PartialOrd + Zero>(
        value: T,
    ) -> Result<Constrained<T, StrictlyPositive>, ConstraintError> {
        Constrained::<T, StrictlyPositive>::new(value)
    }
}

impl Constrained<f64, StrictlyPositive> {
    /// Constructs a strictly positive `f64` in a const context.
    ///
    /// # Panics
    ///
    /// Panics if `value` is not greater than zero.
    #[must_use]
    pub const fn from_const(value: f64) -> Self {
        assert!(value > 0.0, "value must be strictly positive");
        Constrained {
            value,
            _marker: std::marker::PhantomData,
        }
    }
}

impl<T: PartialOrd + Zero> Constraint<T> for StrictlyPositive {
    fn check(value: &T) -> Result<(), ConstraintError> {
        match value.partial_cmp(&T::zero()) {
            None => Err(ConstraintError::NotANumber),
            Some(Ordering::Less) => Err(ConstraintError::Negative),
            Some(Ordering::Equal) => Err(ConstraintError::Zero),
            Some(Ordering::Greater) => Ok(()),
        }
    }
}
