//! The distance functions a forest can be built with.

use core::fmt::{Debug, Display, Formatter};

/// The element type of indexed vectors and of the distances computed over them.
///
/// We provide a blanket implementation for all types that satisfy the trait
/// bounds; in practice these are `f32` and `f64`, the two element types the
/// index supports.
#[must_use]
pub trait CoordinateValue:
    PartialOrd + Copy + Display + Debug + Default + num_traits::Float + num_traits::FromPrimitive + num_traits::NumAssignOps
{
}

/// Blanket implementation of `CoordinateValue` for all types that satisfy the trait bounds.
impl<U> CoordinateValue for U where
    U: PartialOrd + Copy + Display + Debug + Default + num_traits::Float + num_traits::FromPrimitive + num_traits::NumAssignOps
{
}

/// The distance function bound to a forest when it is created.
///
/// Both norms decompose coordinate-wise, which is what makes the per-axis
/// lower bounds used during search admissible. Distances are reported in the
/// norm's own monotone space: `L2Squared` never takes square roots.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Distance {
    /// Sum of absolute coordinate differences (the Manhattan distance).
    L1,
    /// Sum of squared coordinate differences (the squared Euclidean distance).
    #[default]
    L2Squared,
}

impl Distance {
    /// Computes the distance between two vectors.
    pub fn between<U: CoordinateValue>(self, x: &[U], y: &[U]) -> U {
        match self {
            Self::L1 => manhattan(x, y),
            Self::L2Squared => euclidean_sq(x, y),
        }
    }

    /// Computes the contribution of a single coordinate to the distance.
    ///
    /// This is the one-dimensional restriction of the norm, used for split
    /// thresholds and region bounds during search.
    pub fn axis<U: CoordinateValue>(self, a: U, b: U) -> U {
        let gap = abs_diff(a, b);
        match self {
            Self::L1 => gap,
            Self::L2Squared => gap * gap,
        }
    }
}

impl Display for Distance {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::L1 => write!(f, "L1"),
            Self::L2Squared => write!(f, "L2Squared"),
        }
    }
}

/// Manhattan distance between two vectors.
///
/// Also known as the L1-norm, the Manhattan distance is defined as the sum of
/// the absolute differences between corresponding elements.
fn manhattan<U: CoordinateValue>(x: &[U], y: &[U]) -> U {
    x.iter().zip(y.iter()).map(|(&a, &b)| abs_diff(a, b)).fold(U::zero(), |acc, v| acc + v)
}

/// Squared Euclidean distance between two vectors.
///
/// Also known as the squared L2-norm, the squared Euclidean distance is
/// defined as the sum of the squared differences between corresponding
/// elements.
fn euclidean_sq<U: CoordinateValue>(x: &[U], y: &[U]) -> U {
    x.iter()
        .zip(y.iter())
        .map(|(&a, &b)| abs_diff(a, b))
        .map(|d| d * d)
        .fold(U::zero(), |acc, v| acc + v)
}

/// The absolute difference between two coordinates.
fn abs_diff<U: CoordinateValue>(a: U, b: U) -> U {
    if a >= b { a - b } else { b - a }
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;

    use super::Distance;

    #[test]
    fn full_and_axis_agree() {
        let a = [1.0_f64, 2.0, 3.0];
        let b = [4.0_f64, 0.0, 3.5];

        let l1 = Distance::L1.between(&a, &b);
        let l1_axes = (0..3).map(|d| Distance::L1.axis(a[d], b[d])).sum::<f64>();
        assert!(approx_eq!(f64, l1, l1_axes, ulps = 2));
        assert!(approx_eq!(f64, l1, 5.5, ulps = 2));

        let l2 = Distance::L2Squared.between(&a, &b);
        let l2_axes = (0..3).map(|d| Distance::L2Squared.axis(a[d], b[d])).sum::<f64>();
        assert!(approx_eq!(f64, l2, l2_axes, ulps = 2));
        assert!(approx_eq!(f64, l2, 13.25, ulps = 2));
    }
}
