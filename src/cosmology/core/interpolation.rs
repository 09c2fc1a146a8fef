//! Bilinear interpolation over the (omch2, h0) grid.
//!
//! Queries are converted to fractional axis coordinates, and the four rows
//! surrounding the query point are blended with the standard bilinear
//! weights `(1−x)(1−y), x(1−y), (1−x)y, xy`. Two behaviors are deliberate:
//!
//! - **Degenerate axis**: an axis with a single point pins its coordinate to
//!   index 0 with zero fractional part, collapsing the blend to 1-D linear
//!   interpolation along the other axis.
//! - **Out-of-grid queries**: under [`ClampMode::Extrapolate`] (the default)
//!   the cell is pinned to the outermost pair of grid rows and the
//!   fractional part runs outside [0, 1], extrapolating linearly from the
//!   edge cell. Out-of-grid queries are not errors; callers own the
//!   accuracy tradeoff. [`ClampMode::Clamp`] instead clamps the coordinate
//!   onto the grid, holding queries at the edge value.
use ndarray::{Array1, Array3, ArrayView1, s};

/// Policy for queries outside the grid range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClampMode {
    /// Extrapolate linearly from the outermost cell (default).
    Extrapolate,
    /// Clamp the fractional coordinate onto the grid edge.
    Clamp,
}

impl Default for ClampMode {
    fn default() -> Self {
        ClampMode::Extrapolate
    }
}

/// A query position on one grid axis: the bracketing row pair and the
/// fractional blend weight of the upper row.
///
/// `frac` lies in [0, 1] for on-grid queries; under
/// [`ClampMode::Extrapolate`] it runs outside that range for out-of-grid
/// queries while `lo`/`hi` stay pinned to the outermost cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisCoord {
    pub lo: usize,
    pub hi: usize,
    pub frac: f64,
}

/// Locate `value` on `axis` as a fractional grid coordinate.
///
/// The fractional index is `(len−1)·(value − axis[0])/(axis[len−1] −
/// axis[0])`. A single-point axis is degenerate: the coordinate pins to
/// index 0 regardless of `value`.
pub fn axis_coord(value: f64, axis: ArrayView1<f64>, mode: ClampMode) -> AxisCoord {
    let len = axis.len();
    if len < 2 {
        return AxisCoord { lo: 0, hi: 0, frac: 0.0 };
    }
    let min = axis[0];
    let max = axis[len - 1];
    let mut t = (len - 1) as f64 * (value - min) / (max - min);
    if mode == ClampMode::Clamp {
        t = t.clamp(0.0, (len - 1) as f64);
    }
    // Pin the cell to the outermost row pair; frac then carries any
    // out-of-grid overshoot.
    let lo = (t.floor().max(0.0) as usize).min(len - 2);
    AxisCoord { lo, hi: lo + 1, frac: t - lo as f64 }
}

/// Blend the four rows surrounding a query point.
///
/// `tensor` has shape `(om_len, h0_len, row_len)`; the result is the
/// bilinear combination of rows `(om.lo, h0.lo)`, `(om.hi, h0.lo)`,
/// `(om.lo, h0.hi)`, `(om.hi, h0.hi)` with weights `(1−x)(1−y), x(1−y),
/// (1−x)y, xy`.
pub fn blend_rows(tensor: &Array3<f64>, om: AxisCoord, h0: AxisCoord) -> Array1<f64> {
    let x = om.frac;
    let y = h0.frac;
    let r11 = tensor.slice(s![om.lo, h0.lo, ..]);
    let r21 = tensor.slice(s![om.hi, h0.lo, ..]);
    let r12 = tensor.slice(s![om.lo, h0.hi, ..]);
    let r22 = tensor.slice(s![om.hi, h0.hi, ..]);
    &r11 * ((1.0 - x) * (1.0 - y))
        + &r21 * (x * (1.0 - y))
        + &r12 * ((1.0 - x) * y)
        + &r22 * (x * y)
}
