//! Closed-form magnetic field samples for plotting.
//!
//! Everything here is pure: identical inputs give identical outputs and no
//! function keeps state between calls. Units are relative (all proportionality
//! constants are 1), which is what the lesson plots need.

use thiserror::Error;

mod current;
mod grid;
mod magnet;

pub use current::{
    CurrentSense, Solenoid, circular_loop_center_field, solenoid_internal_field,
    straight_wire_field, straight_wire_field_at,
};
pub use grid::{Point, SampleGrid, ScalarField, Vector2, VectorField};
pub use magnet::{
    BarMagnet, MagnetArrangement, PAIR_POLE_OFFSET, bar_magnet_field, magnet_field,
    two_magnet_field, two_magnet_pair,
};

/// Added to every source distance before it is used as a denominator.
pub const EPSILON: f64 = 1e-9;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum FieldError {
    #[error("loop radius must be > 0")]
    NonPositiveRadius,

    #[error("solenoid dimensions must be > 0")]
    NonPositiveDimension,

    #[error("sample grid must have at least one point per axis")]
    EmptyGrid,

    #[error("sample range must be finite and ordered")]
    InvalidRange,

    #[error("fields were sampled on grids of different shape")]
    ShapeMismatch,
}
