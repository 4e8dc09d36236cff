use std::{cmp::Ordering, ops::Add};

use num_traits::Zero;

use crate::constraint::{Constrained, Constraint, ConstraintError};

/// Marker type enforcing that a value is zero or greater.
///
/// Works with any `T: PartialOrd + Zero`, including primitive floats and
/// unit-safe `uom` quantities such as `Mass` and `Volume`.
///
/// # Examples
///
/// ```
/// use vermi_core::constraint::NonNegative;
/// use uom::si::{f64::Mass, mass::kilogram};
///
/// let m = NonNegative::new(Mass::new::<kilogram>(50.0)).unwrap();
/// assert_eq!(m.into_inner().get::<kilogram>(), 50.0);
///
/// assert!(NonNegative::new(-1.0).is_err());
/// assert!(NonNegative::new(f64::NAN).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct NonNegative;

impl NonNegative {
    /// Constructs `Constrained<T, NonNegative>` if `value >= 0`.
    ///
    /// # Errors
    ///
    /// - [`ConstraintError::Negative`] if the value is less than zero.
    /// - [`ConstraintError::NotANumber`] if comparison is undefined (e.g., NaN).
    pub fn new<T: PartialOrd + Zero>(value: T) -> Result<Constrained<T, NonNegative>, ConstraintError> {
        Constrained::<T, NonNegative>::new(value)
    }

    /// Returns the additive identity as a constrained value.
    #[must_use]
    pub fn zero<T: PartialOrd + Zero>() -> Constrained<T, NonNegative> {
        Constrained::new_unchecked(T::zero())
    }
}

impl<T: PartialOrd + Zero> Constraint<T> for NonNegative {
    fn check(value: &T) -> Result<(), ConstraintError> {
        match value.partial_cmp(&T::zero()) {
            None => Err(ConstraintError::NotANumber),
            Some(Ordering::Less) => Err(ConstraintError::Negative),
            Some(Ordering::Equal | Ordering::Greater) => Ok(()),
        }
    }
}

/// Adds two non-negative values.
///
/// The sum of two non-negative values is non-negative, so no check is needed.
impl<T> Add for Constrained<T, NonNegative>
where
    T: Add<Output = T> + PartialOrd + Zero,
{
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        let result = self.into_inner() + rhs.into_inner();
        debug_assert!(
            result >= T::zero(),
            "Addition produced a negative value, violating NonNegative invariant"
        );
        Constrained::new_unchecked(result)
    }
}

impl<T> Zero for Constrained<T, NonNegative>
where
    T: Add<Output = T> + PartialOrd + Zero,
{
    fn zero() -> Self {
        NonNegative::zero()
    }

    fn is_zero(&self) -> bool {
        self.as_ref().is_zero()
    }
}
