//! solver — the Boltzmann-solver seam behind grid generation.
//!
//! Purpose
//! -------
//! Define the two-pass contract a power-spectrum solver must satisfy for
//! grid generation, and provide the built-in analytic implementation
//! ([`EisensteinHuSolver`]) so generation works without an external
//! Boltzmann code.
//!
//! Key behaviors
//! -------------
//! - [`BoltzmannSolver`] mirrors how Boltzmann codes are driven per grid
//!   cell: a linear pass that also yields the drag-epoch sound horizon,
//!   then a separate non-linear pass over the same redshifts.
//! - Implementations are `Send + Sync`: generation may fan cells out
//!   across a thread pool, and the generator is shared between readers.
//!
//! Conventions
//! -----------
//! - Spectra rows follow the order of the `redshifts` argument; the
//!   solver never reorders them.
//! - Wavenumbers are h/Mpc; each cell is identified by its physical CDM
//!   density `omch2` and Hubble constant `h0`, with the remaining
//!   cosmology taken from the shared [`CosmoParams`].
//! - Failures are reported as `CosmoError::SolverFailure` carrying the
//!   offending cell; generation halts on the first failing cell.
use crate::cosmology::core::params::CosmoParams;
use crate::cosmology::errors::CosmoResult;
use ndarray::{Array2, ArrayView1};

pub mod eisenstein_hu;

pub use self::eisenstein_hu::EisensteinHuSolver;

/// Output of a solver's linear pass over one grid cell.
#[derive(Debug, Clone)]
pub struct LinearPass {
    /// Comoving sound horizon at the drag epoch, Mpc.
    pub sound_horizon: f64,
    /// Linear P(k), one row per requested redshift, (Mpc/h)³.
    pub pk: Array2<f64>,
}

/// A power-spectrum solver driven once per grid cell.
///
/// The generator calls [`linear_pass`] and [`nonlinear_pass`] with the
/// same cell and redshift list and assembles the grid row from both
/// results.
///
/// [`linear_pass`]: BoltzmannSolver::linear_pass
/// [`nonlinear_pass`]: BoltzmannSolver::nonlinear_pass
pub trait BoltzmannSolver: Send + Sync {
    /// Linear matter power spectra at `redshifts`, plus the sound horizon
    /// at the drag epoch for this cell's cosmology.
    fn linear_pass(
        &self, params: &CosmoParams, omch2: f64, h0: f64, redshifts: &[f64],
        ks: ArrayView1<f64>,
    ) -> CosmoResult<LinearPass>;

    /// Non-linear matter power spectra at `redshifts`, one row each.
    fn nonlinear_pass(
        &self, params: &CosmoParams, omch2: f64, h0: f64, redshifts: &[f64],
        ks: ArrayView1<f64>,
    ) -> CosmoResult<Array2<f64>>;
}
