use serde::{Deserialize, Serialize};

use super::grid::{Point, SampleGrid, Vector2, VectorField};
use super::EPSILON;

/// Distance from each magnet center to its poles in the two-magnet layout.
pub const PAIR_POLE_OFFSET: f64 = 0.4;

/// How two facing magnets are arranged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MagnetArrangement {
    /// Facing poles unlike (S next to N); the far poles are unlike too.
    Attract,
    /// Facing poles alike (S next to S); the far poles are alike too.
    Repel,
}

impl MagnetArrangement {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Attract => "S-N (attract)",
            Self::Repel => "S-S (repel)",
        }
    }
}

/// A bar magnet modelled as two opposite point poles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarMagnet {
    center: Point,
    north_offset: Vector2,
    strength: f64,
}

impl BarMagnet {
    /// A magnet centered at `center` with its north pole at `center + north_offset`
    /// and its south pole mirrored through the center.
    #[must_use]
    pub fn new(center: Point, north_offset: Vector2, strength: f64) -> Self {
        Self {
            center,
            north_offset,
            strength,
        }
    }

    /// Magnet at the origin, north pole up, poles `pole_separation` apart.
    #[must_use]
    pub fn vertical(pole_separation: f64, strength: f64) -> Self {
        Self::new(
            Point::default(),
            Vector2::new(0.0, pole_separation / 2.0),
            strength,
        )
    }

    #[must_use]
    pub fn north(&self) -> Point {
        self.center.offset(self.north_offset)
    }

    #[must_use]
    pub fn south(&self) -> Point {
        self.center.offset(-self.north_offset)
    }

    #[must_use]
    pub fn center(&self) -> Point {
        self.center
    }

    #[must_use]
    pub fn strength(&self) -> f64 {
        self.strength
    }

    /// Field at `p`: outward from the north pole, inward to the south pole.
    #[must_use]
    pub fn field_at(&self, p: Point) -> Vector2 {
        (pole_term(p, self.north()) - pole_term(p, self.south())) * self.strength
    }
}

// Inverse-square radial term r̂ / r² = r⃗ / r³ with the guarded radius.
fn pole_term(p: Point, pole: Point) -> Vector2 {
    let d = p - pole;
    let r = d.x.hypot(d.y) + EPSILON;
    let r3 = r * r * r;
    Vector2::new(d.x / r3, d.y / r3)
}

/// Sample a single magnet's field on `grid`.
#[must_use]
pub fn magnet_field(grid: &SampleGrid, magnet: &BarMagnet) -> VectorField {
    grid.sample(|p| magnet.field_at(p))
}

/// Field of a vertical bar magnet at the origin (north pole at `+y`).
#[must_use]
pub fn bar_magnet_field(grid: &SampleGrid, pole_separation: f64, strength: f64) -> VectorField {
    magnet_field(grid, &BarMagnet::vertical(pole_separation, strength))
}

/// The two horizontal magnets of the interaction layout, left magnet first.
///
/// Magnet centers sit at `∓separation / 2` on the x axis. The left magnet
/// always has its north pole on the far (left) side; the right magnet's
/// orientation follows `arrangement`.
#[must_use]
pub fn two_magnet_pair(
    separation: f64,
    strength: f64,
    arrangement: MagnetArrangement,
) -> [BarMagnet; 2] {
    let half = separation / 2.0;
    let left = BarMagnet::new(
        Point::new(-half, 0.0),
        Vector2::new(-PAIR_POLE_OFFSET, 0.0),
        strength,
    );
    let right_north = match arrangement {
        MagnetArrangement::Attract => Vector2::new(-PAIR_POLE_OFFSET, 0.0),
        MagnetArrangement::Repel => Vector2::new(PAIR_POLE_OFFSET, 0.0),
    };
    let right = BarMagnet::new(Point::new(half, 0.0), right_north, strength);
    [left, right]
}

/// Combined field of the two-magnet layout.
#[must_use]
pub fn two_magnet_field(
    grid: &SampleGrid,
    separation: f64,
    strength: f64,
    arrangement: MagnetArrangement,
) -> VectorField {
    let [left, right] = two_magnet_pair(separation, strength, arrangement);
    grid.sample(|p| left.field_at(p) + right.field_at(p))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> SampleGrid {
        SampleGrid::square(3.0, 25).unwrap()
    }

    #[test]
    fn doubling_strength_doubles_the_field() {
        for strength in [0.5, 1.0, 2.7, 5.0] {
            let once = bar_magnet_field(&grid(), 1.2, strength);
            let twice = bar_magnet_field(&grid(), 1.2, 2.0 * strength);
            assert!(twice.approx_eq(&once.scaled(2.0), 1e-12));
        }
    }

    #[test]
    fn field_points_away_from_north_above_the_magnet() {
        let magnet = BarMagnet::vertical(1.2, 1.0);
        let above = magnet.field_at(Point::new(0.0, 2.0));
        let below = magnet.field_at(Point::new(0.0, -2.0));
        assert!(above.y > 0.0);
        // Below the south pole the field still runs north-ward, into S.
        assert!(below.y > 0.0);
        // Beside the magnet the field runs from N back to S.
        assert!(magnet.field_at(Point::new(2.0, 0.0)).y < 0.0);
    }

    #[test]
    fn pole_coincident_sample_stays_finite() {
        let grid = SampleGrid::from_axes(vec![0.0], vec![0.6]).unwrap();
        let field = bar_magnet_field(&grid, 1.2, 1.0);
        assert!(field.bx()[0].is_finite());
        assert!(field.by()[0].is_finite());
    }

    #[test]
    fn two_magnets_superpose_exactly() {
        let grid = SampleGrid::linspace((-4.0, 4.0), 37, (-3.0, 3.0), 29).unwrap();
        for arrangement in [MagnetArrangement::Attract, MagnetArrangement::Repel] {
            let combined = two_magnet_field(&grid, 2.5, 10.0, arrangement);
            let [left, right] = two_magnet_pair(2.5, 10.0, arrangement);
            let sum = magnet_field(&grid, &left)
                .superpose(&magnet_field(&grid, &right))
                .unwrap();
            assert!(combined.approx_eq(&sum, 1e-12));
        }
    }

    #[test]
    fn pair_layout_matches_arrangement() {
        let [left, right] = two_magnet_pair(2.0, 1.0, MagnetArrangement::Attract);
        assert!((left.north().x - -1.4).abs() < 1e-12);
        assert!((left.south().x - -0.6).abs() < 1e-12);
        assert!((right.north().x - 0.6).abs() < 1e-12);
        assert!((right.south().x - 1.4).abs() < 1e-12);

        let [_, right] = two_magnet_pair(2.0, 1.0, MagnetArrangement::Repel);
        assert!((right.north().x - 1.4).abs() < 1e-12);
        assert!((right.south().x - 0.6).abs() < 1e-12);
    }

    #[test]
    fn repel_field_vanishes_between_facing_south_poles() {
        let grid = SampleGrid::from_axes(vec![0.0], vec![0.0]).unwrap();
        let field = two_magnet_field(&grid, 2.5, 10.0, MagnetArrangement::Repel);
        assert!(field.bx()[0].abs() < 1e-9);
        let attract = two_magnet_field(&grid, 2.5, 10.0, MagnetArrangement::Attract);
        assert!(attract.bx()[0].abs() > 1.0);
    }
}
