use serde::{Deserialize, Serialize};

use super::grid::{Point, SampleGrid, Vector2, VectorField};
use super::{EPSILON, FieldError};

/// Rotational sense of a current seen from above (or from the `+z` side).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CurrentSense {
    CounterClockwise,
    Clockwise,
    None,
}

impl CurrentSense {
    #[must_use]
    pub fn of(current: f64) -> Self {
        if current > 0.0 {
            Self::CounterClockwise
        } else if current < 0.0 {
            Self::Clockwise
        } else {
            Self::None
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::CounterClockwise => "counter-clockwise",
            Self::Clockwise => "clockwise",
            Self::None => "no current",
        }
    }
}

/// Field of a long straight wire at `wire`, carrying `current` out of the plane
/// when positive. Circles counter-clockwise for positive current.
#[must_use]
pub fn straight_wire_field_at(p: Point, wire: Point, current: f64) -> Vector2 {
    let d = p - wire;
    let r = d.x.hypot(d.y) + EPSILON;
    // |B| = I / r, tangential direction (-dy, dx) / r.
    Vector2::new(-d.y, d.x) * (current / (r * r))
}

/// Sample the straight-wire field for a wire through the origin.
#[must_use]
pub fn straight_wire_field(grid: &SampleGrid, current: f64) -> VectorField {
    grid.sample(|p| straight_wire_field_at(p, Point::default(), current))
}

/// Out-of-plane field at the center of a circular loop, `B = I / R`.
///
/// Positive means out of the loop plane toward the viewer.
///
/// # Errors
///
/// Returns `FieldError::NonPositiveRadius` unless `radius > 0`.
pub fn circular_loop_center_field(current: f64, radius: f64) -> Result<f64, FieldError> {
    if radius.is_nan() || radius <= 0.0 {
        return Err(FieldError::NonPositiveRadius);
    }
    Ok(current / radius)
}

/// Uniform interior field of an ideal solenoid, `B = n I`.
#[must_use]
pub fn solenoid_internal_field(current: f64, turns_per_length: f64) -> f64 {
    current * turns_per_length
}

/// An ideal solenoid centered on the origin with its axis along `x`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Solenoid {
    length: f64,
    radius: f64,
    turns_per_length: f64,
    current: f64,
}

impl Solenoid {
    /// # Errors
    ///
    /// Returns `FieldError::NonPositiveDimension` unless length and radius are > 0.
    pub fn new(
        length: f64,
        radius: f64,
        turns_per_length: f64,
        current: f64,
    ) -> Result<Self, FieldError> {
        if !(length > 0.0 && radius > 0.0) {
            return Err(FieldError::NonPositiveDimension);
        }
        Ok(Self {
            length,
            radius,
            turns_per_length,
            current,
        })
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        self.length
    }

    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x.abs() <= self.length / 2.0 && p.y.abs() <= self.radius
    }

    /// Axial field at `p` (x along the axis, y radial): uniform inside, zero outside.
    #[must_use]
    pub fn field_at(&self, p: Point) -> f64 {
        if self.contains(p) {
            solenoid_internal_field(self.current, self.turns_per_length)
        } else {
            0.0
        }
    }

    /// Axial cross-section for plotting.
    #[must_use]
    pub fn cross_section(&self, grid: &SampleGrid) -> VectorField {
        grid.sample(|p| Vector2::new(self.field_at(p), 0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reversing_current_reverses_the_wire_field() {
        let grid = SampleGrid::square(3.0, 21).unwrap();
        for current in [0.3, 2.0, 5.0] {
            let forward = straight_wire_field(&grid, current);
            let reverse = straight_wire_field(&grid, -current);
            assert!(reverse.approx_eq(&forward.negated(), 1e-12));
        }
    }

    #[test]
    fn wire_field_falls_off_as_inverse_distance() {
        let near = straight_wire_field_at(Point::new(1.0, 0.0), Point::default(), 2.0);
        let far = straight_wire_field_at(Point::new(2.0, 0.0), Point::default(), 2.0);
        assert!((near.magnitude() / far.magnitude() - 2.0).abs() < 1e-6);
        // Counter-clockwise at +x means pointing +y.
        assert!(near.y > 0.0 && near.x.abs() < 1e-12);
    }

    #[test]
    fn wire_field_at_the_wire_is_finite() {
        let grid = SampleGrid::from_axes(vec![0.0, 1e-12], vec![0.0]).unwrap();
        let field = straight_wire_field(&grid, 5.0);
        assert!(field.vectors().all(|v| v.x.is_finite() && v.y.is_finite()));
    }

    #[test]
    fn loop_center_is_monotone_in_current_and_radius() {
        let mut last = f64::NEG_INFINITY;
        for current in [-5.0, -1.0, 0.0, 0.5, 2.0, 5.0] {
            let b = circular_loop_center_field(current, 1.5).unwrap();
            assert!(b > last);
            last = b;
        }
        let mut last = f64::INFINITY;
        for radius in [0.5, 1.0, 1.5, 3.0] {
            let b = circular_loop_center_field(2.0, radius).unwrap();
            assert!(b < last);
            last = b;
        }
    }

    #[test]
    fn loop_rejects_non_positive_radius() {
        assert_eq!(
            circular_loop_center_field(1.0, 0.0),
            Err(FieldError::NonPositiveRadius)
        );
        assert_eq!(
            circular_loop_center_field(1.0, -2.0),
            Err(FieldError::NonPositiveRadius)
        );
        assert_eq!(
            circular_loop_center_field(1.0, f64::NAN),
            Err(FieldError::NonPositiveRadius)
        );
    }

    #[test]
    fn loop_sign_follows_current() {
        assert!(circular_loop_center_field(-2.0, 1.0).unwrap() < 0.0);
        assert_eq!(CurrentSense::of(-2.0), CurrentSense::Clockwise);
        assert_eq!(CurrentSense::of(0.0), CurrentSense::None);
    }

    #[test]
    fn solenoid_is_uniform_inside_and_zero_outside() {
        let solenoid = Solenoid::new(6.0, 1.0, 15.0, 2.0).unwrap();
        let inside = solenoid_internal_field(2.0, 15.0);
        assert_eq!(solenoid.field_at(Point::new(0.0, 0.0)), inside);
        assert_eq!(solenoid.field_at(Point::new(2.9, -0.9)), inside);
        assert_eq!(solenoid.field_at(Point::new(3.5, 0.0)), 0.0);
        assert_eq!(solenoid.field_at(Point::new(0.0, 1.5)), 0.0);
    }

    #[test]
    fn solenoid_rejects_degenerate_shape() {
        assert_eq!(
            Solenoid::new(0.0, 1.0, 10.0, 1.0),
            Err(FieldError::NonPositiveDimension)
        );
    }
}
