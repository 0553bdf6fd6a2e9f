//! Screen-space geometry for the field plots.
//!
//! Arrows are drawn at equal length (direction only) and shaded by the log of
//! their magnitude, so strong fields near poles and wires do not swamp the plot.

use maglab_core::field::{BarMagnet, Point, SampleGrid, VectorField};

const ARROW_FILL: f64 = 0.8;
const HEAD_RATIO: f64 = 0.35;

/// Maps plot coordinates into an SVG viewport with `y` pointing up.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlotFrame {
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
    pub width: f64,
    pub height: f64,
}

impl PlotFrame {
    /// Frame covering the sample grid's extent at `scale` pixels per unit.
    #[must_use]
    pub fn around(grid: &SampleGrid, scale: f64) -> Self {
        let x_range = span(grid.xs());
        let y_range = span(grid.ys());
        Self {
            x_range: (x_range.0 - 0.5, x_range.1 + 0.5),
            y_range: (y_range.0 - 0.5, y_range.1 + 0.5),
            width: (x_range.1 - x_range.0 + 1.0) * scale,
            height: (y_range.1 - y_range.0 + 1.0) * scale,
        }
    }

    #[must_use]
    pub fn to_px(&self, p: Point) -> (f64, f64) {
        let (x0, x1) = self.x_range;
        let (y0, y1) = self.y_range;
        let px = (p.x - x0) / (x1 - x0) * self.width;
        let py = (y1 - p.y) / (y1 - y0) * self.height;
        (px, py)
    }

    #[must_use]
    pub fn view_box(&self) -> String {
        format!("0 0 {:.0} {:.0}", self.width, self.height)
    }
}

fn span(axis: &[f64]) -> (f64, f64) {
    let min = axis.iter().copied().fold(f64::INFINITY, f64::min);
    let max = axis.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if min.is_finite() && max.is_finite() {
        (min, max)
    } else {
        (0.0, 0.0)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ArrowVm {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    /// 0 for the weakest sample, 1 for the strongest.
    pub shade: f64,
}

impl ArrowVm {
    /// CSS color for the arrow, from pale blue to deep red.
    #[must_use]
    pub fn color(&self) -> String {
        let hue = 220.0 - 220.0 * self.shade.clamp(0.0, 1.0);
        format!("hsl({hue:.0}, 70%, 45%)")
    }

    /// Triangle at the arrow tip as an SVG `points` list.
    #[must_use]
    pub fn head_points(&self) -> String {
        let (dx, dy) = (self.x2 - self.x1, self.y2 - self.y1);
        let len = dx.hypot(dy);
        if len <= f64::EPSILON {
            return String::new();
        }
        let size = (len * HEAD_RATIO).max(2.0);
        let (ux, uy) = (dx / len, dy / len);
        let (bx, by) = (self.x2 - ux * size, self.y2 - uy * size);
        let (nx, ny) = (-uy * size / 2.0, ux * size / 2.0);
        format!(
            "{:.1},{:.1} {:.1},{:.1} {:.1},{:.1}",
            self.x2,
            self.y2,
            bx + nx,
            by + ny,
            bx - nx,
            by - ny
        )
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PoleMarkVm {
    pub cx: f64,
    pub cy: f64,
    pub north: bool,
}

impl PoleMarkVm {
    #[must_use]
    pub fn label(&self) -> &'static str {
        if self.north { "N" } else { "S" }
    }

    #[must_use]
    pub fn class(&self) -> &'static str {
        if self.north { "pole pole-n" } else { "pole pole-s" }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct QuiverVm {
    pub view_box: String,
    pub arrows: Vec<ArrowVm>,
    pub poles: Vec<PoleMarkVm>,
}

/// Equal-length arrows for every non-zero sample of `field`.
#[must_use]
pub fn quiver(grid: &SampleGrid, field: &VectorField, frame: PlotFrame) -> QuiverVm {
    let length = arrow_length(grid, &frame);
    let max_log = field.max_magnitude().ln_1p();

    let arrows = grid
        .points()
        .zip(field.vectors())
        .filter_map(|(p, v)| {
            let m = v.magnitude();
            if m <= f64::EPSILON || !m.is_finite() {
                return None;
            }
            let (x, y) = frame.to_px(p);
            let dx = v.x / m * length / 2.0;
            let dy = -v.y / m * length / 2.0;
            let shade = if max_log > 0.0 { m.ln_1p() / max_log } else { 0.0 };
            Some(ArrowVm {
                x1: x - dx,
                y1: y - dy,
                x2: x + dx,
                y2: y + dy,
                shade,
            })
        })
        .collect();

    QuiverVm {
        view_box: frame.view_box(),
        arrows,
        poles: Vec::new(),
    }
}

/// Same as [`quiver`] with the magnets' poles marked.
#[must_use]
pub fn magnet_quiver(
    grid: &SampleGrid,
    field: &VectorField,
    magnets: &[BarMagnet],
    frame: PlotFrame,
) -> QuiverVm {
    let mut vm = quiver(grid, field, frame);
    for magnet in magnets {
        for (pole, north) in [(magnet.north(), true), (magnet.south(), false)] {
            let (cx, cy) = frame.to_px(pole);
            vm.poles.push(PoleMarkVm { cx, cy, north });
        }
    }
    vm
}

fn arrow_length(grid: &SampleGrid, frame: &PlotFrame) -> f64 {
    let cell = |axis: &[f64], range: (f64, f64), px: f64| {
        if axis.len() < 2 || range.1 <= range.0 {
            return px;
        }
        #[allow(clippy::cast_precision_loss)]
        let step = (axis[axis.len() - 1] - axis[0]) / (axis.len() - 1) as f64;
        step / (range.1 - range.0) * px
    };
    let cx = cell(grid.xs(), frame.x_range, frame.width);
    let cy = cell(grid.ys(), frame.y_range, frame.height);
    cx.min(cy) * ARROW_FILL
}

/// A polyline in pixel space with its axis labels.
#[derive(Clone, Debug, PartialEq)]
pub struct CurveVm {
    pub view_box: String,
    pub points: String,
    pub marker: Option<(f64, f64)>,
}

/// Plot `f` over `[from, to]` with the chosen `at` value marked.
#[must_use]
pub fn curve(
    from: f64,
    to: f64,
    samples: usize,
    at: f64,
    f: impl Fn(f64) -> Option<f64>,
    width: f64,
    height: f64,
) -> CurveVm {
    let samples = samples.max(2);
    #[allow(clippy::cast_precision_loss)]
    let xs: Vec<f64> = (0..samples)
        .map(|i| from + (to - from) * i as f64 / (samples - 1) as f64)
        .collect();
    let values: Vec<(f64, f64)> = xs.iter().filter_map(|&x| f(x).map(|y| (x, y))).collect();
    let y_max = values
        .iter()
        .map(|(_, y)| y.abs())
        .fold(0.0_f64, f64::max)
        .max(f64::EPSILON);

    let to_px = |x: f64, y: f64| {
        let px = (x - from) / (to - from) * width;
        let py = height / 2.0 - y / y_max * (height / 2.0 - 4.0);
        (px, py)
    };
    let points = values
        .iter()
        .map(|&(x, y)| {
            let (px, py) = to_px(x, y);
            format!("{px:.1},{py:.1}")
        })
        .collect::<Vec<_>>()
        .join(" ");
    let marker = f(at).map(|y| to_px(at, y));

    CurveVm {
        view_box: format!("0 0 {width:.0} {height:.0}"),
        points,
        marker,
    }
}
