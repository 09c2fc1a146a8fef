//! Grid data carriers: the full cached tensor and single-query slices.
//!
//! [`PkGrid`] owns the 3-D tensor produced by generation (or read back from
//! disk) together with the axes it is indexed by, and answers interpolated
//! row queries. [`PkSlice`] is the user-facing cut of one such row: the
//! sound horizon plus the linear and non-linear power spectra at the target
//! redshift. The row segment holding the early-time non-linear spectrum is
//! carried in the tensor for completeness but not exposed on the slice.
use crate::cosmology::core::grid::{GridShape, h0_axis, k_axis, omch2_axis};
use crate::cosmology::core::interpolation::{ClampMode, axis_coord, blend_rows};
use crate::cosmology::core::params::CosmoParams;
use crate::cosmology::errors::{CosmoError, CosmoResult};
use ndarray::{Array1, Array3, ArrayView1, s};

/// A fully materialized power-spectrum grid: axes plus the cell tensor.
///
/// The tensor has shape `(om_resolution, h0_resolution, 1 + 3·k_num)`; see
/// [`GridShape`] for the row layout. Construction validates the tensor
/// against the shape implied by the parameters and rejects non-finite
/// entries, so a `PkGrid` in hand is always safe to interpolate over.
#[derive(Debug, Clone)]
pub struct PkGrid {
    shape: GridShape,
    omch2: Array1<f64>,
    h0s: Array1<f64>,
    ks: Array1<f64>,
    tensor: Array3<f64>,
}

impl PkGrid {
    /// Wrap a generated or deserialized tensor, validating it against the
    /// shape implied by `params`.
    ///
    /// Errors
    /// ------
    /// - `CosmoError::GridShapeMismatch`
    ///   If the tensor dimensions do not match
    ///   `(om_resolution, h0_resolution, 1 + 3·k_num)`.
    /// - `CosmoError::NonFiniteDataset`
    ///   If any entry is NaN or infinite, reported with its flat index.
    pub fn new(params: &CosmoParams, tensor: Array3<f64>) -> CosmoResult<PkGrid> {
        let shape = GridShape::from_params(params);
        if tensor.dim() != shape.tensor_shape() {
            return Err(CosmoError::GridShapeMismatch {
                expected: shape.tensor_shape(),
                found: tensor.dim(),
            });
        }
        if let Some((index, &value)) = tensor.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(CosmoError::NonFiniteDataset { name: "grid tensor", index, value });
        }
        Ok(PkGrid {
            shape,
            omch2: omch2_axis(params.om_resolution),
            h0s: h0_axis(params.h0_resolution, params.h0),
            ks: k_axis(),
            tensor,
        })
    }

    /// The grid shape this tensor was validated against.
    pub fn shape(&self) -> GridShape {
        self.shape
    }

    /// The omch2 axis values.
    pub fn omch2(&self) -> ArrayView1<'_, f64> {
        self.omch2.view()
    }

    /// The h0 axis values (a single point on a degenerate axis).
    pub fn h0s(&self) -> ArrayView1<'_, f64> {
        self.h0s.view()
    }

    /// The shared wavenumber axis, h/Mpc.
    pub fn ks(&self) -> ArrayView1<'_, f64> {
        self.ks.view()
    }

    /// The raw cell tensor.
    pub fn tensor(&self) -> &Array3<f64> {
        &self.tensor
    }

    /// Bilinearly interpolate one row at the query point `(omch2, h0)`.
    ///
    /// Queries outside the axis ranges follow `mode`: extrapolation from
    /// the edge cells by default, or clamping onto the grid.
    pub fn interpolate_row(&self, omch2: f64, h0: f64, mode: ClampMode) -> Array1<f64> {
        let om_coord = axis_coord(omch2, self.omch2.view(), mode);
        let h0_coord = axis_coord(h0, self.h0s.view(), mode);
        blend_rows(&self.tensor, om_coord, h0_coord)
    }
}

/// One interpolated grid row, cut into its physical pieces.
///
/// `pk_linear` and `pk_nonlinear` are sampled on the shared wavenumber
/// axis at the grid's target redshift; `sound_horizon` is r_drag in Mpc.
#[derive(Debug, Clone, PartialEq)]
pub struct PkSlice {
    /// Comoving sound horizon at the drag epoch, Mpc.
    pub sound_horizon: f64,
    /// Linear matter power spectrum at the target redshift, (Mpc/h)³.
    pub pk_linear: Array1<f64>,
    /// Non-linear matter power spectrum at the target redshift, (Mpc/h)³.
    pub pk_nonlinear: Array1<f64>,
}

impl PkSlice {
    /// Split a grid row into `(sound_horizon, pk_linear, pk_nonlinear)`.
    ///
    /// The early-time non-linear segment in the middle of the row is
    /// skipped. Fails with `RowLengthMismatch` if the row does not hold
    /// `1 + 3·k_num` entries.
    pub fn from_row(row: ArrayView1<'_, f64>, k_num: usize) -> CosmoResult<PkSlice> {
        let expected = 1 + 3 * k_num;
        if row.len() != expected {
            return Err(CosmoError::RowLengthMismatch { expected, found: row.len() });
        }
        Ok(PkSlice {
            sound_horizon: row[0],
            pk_linear: row.slice(s![1..1 + k_num]).to_owned(),
            pk_nonlinear: row.slice(s![1 + 2 * k_num..]).to_owned(),
        })
    }
}
