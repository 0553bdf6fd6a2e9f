use std::ops::{Add, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

use super::FieldError;

/// A point in the 2D plotting plane.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn offset(self, by: Vector2) -> Self {
        Self::new(self.x + by.x, self.y + by.y)
    }
}

impl Sub for Point {
    type Output = Vector2;

    fn sub(self, rhs: Self) -> Vector2 {
        Vector2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// A 2D field vector (or displacement).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector2 {
    pub x: f64,
    pub y: f64,
}

impl Vector2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn magnitude(self) -> f64 {
        self.x.hypot(self.y)
    }
}

impl Add for Vector2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vector2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Vector2 {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl Mul<f64> for Vector2 {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

/// Rectangular sample lattice (a meshgrid of two axes).
///
/// Samples are visited row-major: `y` is the outer index, `x` the inner one.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleGrid {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl SampleGrid {
    /// Evenly spaced axes over `[x_min, x_max]` × `[y_min, y_max]`.
    ///
    /// A one-point axis sits at its minimum.
    ///
    /// # Errors
    ///
    /// Returns `FieldError::EmptyGrid` if either count is zero and
    /// `FieldError::InvalidRange` if a bound is not finite or reversed.
    pub fn linspace(
        (x_min, x_max): (f64, f64),
        nx: usize,
        (y_min, y_max): (f64, f64),
        ny: usize,
    ) -> Result<Self, FieldError> {
        Ok(Self {
            xs: axis(x_min, x_max, nx)?,
            ys: axis(y_min, y_max, ny)?,
        })
    }

    /// Square grid centered on the origin with `n` samples per side.
    ///
    /// # Errors
    ///
    /// Same as [`SampleGrid::linspace`].
    pub fn square(half_extent: f64, n: usize) -> Result<Self, FieldError> {
        Self::linspace((-half_extent, half_extent), n, (-half_extent, half_extent), n)
    }

    /// Build a grid from explicit axis coordinates.
    ///
    /// # Errors
    ///
    /// Returns `FieldError::EmptyGrid` if either axis is empty and
    /// `FieldError::InvalidRange` if any coordinate is not finite.
    pub fn from_axes(xs: Vec<f64>, ys: Vec<f64>) -> Result<Self, FieldError> {
        if xs.is_empty() || ys.is_empty() {
            return Err(FieldError::EmptyGrid);
        }
        if xs.iter().chain(ys.iter()).any(|v| !v.is_finite()) {
            return Err(FieldError::InvalidRange);
        }
        Ok(Self { xs, ys })
    }

    #[must_use]
    pub fn nx(&self) -> usize {
        self.xs.len()
    }

    #[must_use]
    pub fn ny(&self) -> usize {
        self.ys.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.xs.len() * self.ys.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    #[must_use]
    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        self.ys
            .iter()
            .flat_map(move |&y| self.xs.iter().map(move |&x| Point::new(x, y)))
    }

    /// Evaluate a vector-valued function at every sample.
    #[must_use]
    pub fn sample(&self, f: impl Fn(Point) -> Vector2) -> VectorField {
        let mut bx = Vec::with_capacity(self.len());
        let mut by = Vec::with_capacity(self.len());
        for p in self.points() {
            let v = f(p);
            bx.push(v.x);
            by.push(v.y);
        }
        VectorField {
            nx: self.nx(),
            ny: self.ny(),
            bx,
            by,
        }
    }

    /// Evaluate a scalar function at every sample.
    #[must_use]
    pub fn sample_scalar(&self, f: impl Fn(Point) -> f64) -> ScalarField {
        ScalarField {
            nx: self.nx(),
            ny: self.ny(),
            values: self.points().map(f).collect(),
        }
    }
}

fn axis(min: f64, max: f64, n: usize) -> Result<Vec<f64>, FieldError> {
    if n == 0 {
        return Err(FieldError::EmptyGrid);
    }
    if !min.is_finite() || !max.is_finite() || max < min {
        return Err(FieldError::InvalidRange);
    }
    if n == 1 {
        return Ok(vec![min]);
    }
    #[allow(clippy::cast_precision_loss)]
    let step = (max - min) / (n - 1) as f64;
    #[allow(clippy::cast_precision_loss)]
    Ok((0..n).map(|i| min + step * i as f64).collect())
}

/// Sampled `(Bx, By)` components on a [`SampleGrid`], row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorField {
    nx: usize,
    ny: usize,
    bx: Vec<f64>,
    by: Vec<f64>,
}

impl VectorField {
    #[must_use]
    pub fn nx(&self) -> usize {
        self.nx
    }

    #[must_use]
    pub fn ny(&self) -> usize {
        self.ny
    }

    #[must_use]
    pub fn bx(&self) -> &[f64] {
        &self.bx
    }

    #[must_use]
    pub fn by(&self) -> &[f64] {
        &self.by
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bx.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bx.is_empty()
    }

    /// Vector at column `ix`, row `iy`.
    #[must_use]
    pub fn get(&self, ix: usize, iy: usize) -> Option<Vector2> {
        if ix >= self.nx || iy >= self.ny {
            return None;
        }
        let i = iy * self.nx + ix;
        Some(Vector2::new(self.bx[i], self.by[i]))
    }

    pub fn vectors(&self) -> impl Iterator<Item = Vector2> + '_ {
        self.bx
            .iter()
            .zip(self.by.iter())
            .map(|(&x, &y)| Vector2::new(x, y))
    }

    #[must_use]
    pub fn magnitudes(&self) -> Vec<f64> {
        self.vectors().map(Vector2::magnitude).collect()
    }

    #[must_use]
    pub fn max_magnitude(&self) -> f64 {
        self.vectors().map(Vector2::magnitude).fold(0.0, f64::max)
    }

    #[must_use]
    pub fn scaled(&self, k: f64) -> Self {
        Self {
            nx: self.nx,
            ny: self.ny,
            bx: self.bx.iter().map(|v| v * k).collect(),
            by: self.by.iter().map(|v| v * k).collect(),
        }
    }

    #[must_use]
    pub fn negated(&self) -> Self {
        self.scaled(-1.0)
    }

    /// Elementwise sum of two fields sampled on same-shaped grids.
    ///
    /// # Errors
    ///
    /// Returns `FieldError::ShapeMismatch` if the shapes differ.
    pub fn superpose(&self, other: &Self) -> Result<Self, FieldError> {
        if self.nx != other.nx || self.ny != other.ny {
            return Err(FieldError::ShapeMismatch);
        }
        Ok(Self {
            nx: self.nx,
            ny: self.ny,
            bx: self.bx.iter().zip(&other.bx).map(|(a, b)| a + b).collect(),
            by: self.by.iter().zip(&other.by).map(|(a, b)| a + b).collect(),
        })
    }

    /// True when every component differs by at most `tol` relative to the larger magnitude.
    #[must_use]
    pub fn approx_eq(&self, other: &Self, tol: f64) -> bool {
        if self.nx != other.nx || self.ny != other.ny {
            return false;
        }
        let close = |a: f64, b: f64| (a - b).abs() <= tol * a.abs().max(b.abs()).max(1.0);
        self.bx.iter().zip(&other.bx).all(|(&a, &b)| close(a, b))
            && self.by.iter().zip(&other.by).all(|(&a, &b)| close(a, b))
    }
}

/// Sampled scalar values on a [`SampleGrid`], row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarField {
    nx: usize,
    ny: usize,
    values: Vec<f64>,
}

impl ScalarField {
    #[must_use]
    pub fn nx(&self) -> usize {
        self.nx
    }

    #[must_use]
    pub fn ny(&self) -> usize {
        self.ny
    }

    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    #[must_use]
    pub fn get(&self, ix: usize, iy: usize) -> Option<f64> {
        if ix >= self.nx || iy >= self.ny {
            return None;
        }
        Some(self.values[iy * self.nx + ix])
    }
}
