//! Grid geometry: axis ranges, axis construction, and the tensor shape.
//!
//! The grid's primary axis is omch2 = (Ωm − Ωb)·h0², not Ωm itself; queries
//! convert before interpolating. The k axis is shared by every cell and is
//! log-spaced in natural base.
use crate::cosmology::core::params::CosmoParams;
use ndarray::Array1;

/// Lower edge of the omch2 axis.
pub const OMCH2_MIN: f64 = 0.05;
/// Upper edge of the omch2 axis.
pub const OMCH2_MAX: f64 = 0.3;
/// Lower edge of the h0 axis (only used when the axis has > 1 point).
pub const H0_MIN: f64 = 0.6;
/// Upper edge of the h0 axis (only used when the axis has > 1 point).
pub const H0_MAX: f64 = 0.8;
/// Lower edge of the wavenumber axis, h/Mpc.
pub const K_MIN: f64 = 1e-4;
/// Upper edge of the wavenumber axis, h/Mpc.
pub const K_MAX: f64 = 5.0;
/// Number of wavenumber samples per cell.
pub const K_NUM: usize = 2000;

/// Shape of the grid tensor: `(om_resolution, h0_resolution, 1 + 3·k_num)`.
///
/// Row layout per cell: index 0 holds r_drag; `[1, 1+k_num)` the linear
/// P(k) at the target redshift; `[1+k_num, 1+3·k_num)` the non-linear P(k)
/// at z≈0 followed by the non-linear P(k) at the target redshift.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridShape {
    pub om_resolution: usize,
    pub h0_resolution: usize,
    pub k_num: usize,
}

impl GridShape {
    /// Shape implied by a parameter set, with the standard k sampling.
    pub fn from_params(params: &CosmoParams) -> Self {
        GridShape {
            om_resolution: params.om_resolution,
            h0_resolution: params.h0_resolution,
            k_num: K_NUM,
        }
    }

    /// Length of one cell row: `1 + 3·k_num`.
    pub fn row_len(&self) -> usize {
        1 + 3 * self.k_num
    }

    /// Tensor dimensions `(om_resolution, h0_resolution, row_len)`.
    pub fn tensor_shape(&self) -> (usize, usize, usize) {
        (self.om_resolution, self.h0_resolution, self.row_len())
    }
}

/// The omch2 axis: `resolution` points linearly spaced on
/// [[`OMCH2_MIN`], [`OMCH2_MAX`]].
pub fn omch2_axis(resolution: usize) -> Array1<f64> {
    Array1::linspace(OMCH2_MIN, OMCH2_MAX, resolution)
}

/// The h0 axis: `resolution` points linearly spaced on
/// [[`H0_MIN`], [`H0_MAX`]] when `resolution > 1`, else the single
/// reference `h0`.
pub fn h0_axis(resolution: usize, h0: f64) -> Array1<f64> {
    if resolution > 1 {
        Array1::linspace(H0_MIN, H0_MAX, resolution)
    } else {
        Array1::from_elem(1, h0)
    }
}

/// The shared wavenumber axis: [`K_NUM`] points log-spaced (natural base)
/// on [[`K_MIN`], [`K_MAX`]] h/Mpc.
pub fn k_axis() -> Array1<f64> {
    Array1::logspace(std::f64::consts::E, K_MIN.ln(), K_MAX.ln(), K_NUM)
}
