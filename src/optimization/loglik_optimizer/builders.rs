//! loglik_optimizer::builders — L-BFGS construction from fit options.
//!
//! Purpose
//! -------
//! Turn an [`MLEOptions`] into a ready-to-run L-BFGS solver. These
//! builders own all the Argmin generic wiring, so upper layers pick a
//! line search by enum value and never name a solver type parameter.
//!
//! Key behaviors
//! -------------
//! - Build L-BFGS with the Hager–Zhang or the Moré–Thuente line search
//!   from the crate's pre-wired aliases.
//! - Push the optional gradient-norm and cost-change tolerances from
//!   [`MLEOptions`] into the solver through one shared helper.
//! - Leave the starting point and iteration cap alone; those belong to
//!   the runner, and these builders stay side-effect free.
//!
//! Invariants & assumptions
//! ------------------------
//! - Solvers are always instantiated over the crate's `(Theta, Grad,
//!   Cost)` triple from [`loglik_optimizer::types`].
//! - The L-BFGS history depth comes from `opts.lbfgs_mem`, falling back
//!   to [`DEFAULT_LBFGS_MEM`] when unset.
//! - A tolerance Argmin refuses in `with_tolerance_grad` or
//!   `with_tolerance_cost` comes back as an [`OptError`] through the
//!   crate's `From<Error>` conversion, never as a raw Argmin error.
//!
//! Conventions
//! -----------
//! - [`HagerZhangLS`] and [`MoreThuenteLS`] are the only line searches
//!   offered; [`LbfgsHagerZhang`] and [`LbfgsMoreThuente`] pair each
//!   with L-BFGS.
//! - `theta0` and `max_iters` are runtime concerns applied by the
//!   runner, not here.
//! - Everything returns [`OptResult`]; Argmin errors stop at this
//!   module's boundary.
//!
//! Downstream usage
//! ----------------
//! - The `maximize` entry point dispatches on the `LineSearcher` value
//!   in [`MLEOptions`] and calls the matching builder.
//! - The produced solver goes straight into `run_lbfgs` together with
//!   the adapted likelihood problem and a starting point.
//! - [`configure_lbfgs`] is generic over the line-search type so any
//!   future line search reuses the same tolerance wiring.
//!
//! Testing notes
//! -------------
//! - Unit tests check both builders with explicit and defaulted history
//!   depths, and the tolerance helper with present and absent
//!   tolerances.
//! - Full solves through these builders run in the optimizer
//!   integration tests under both line searches.
use argmin::solver::quasinewton::LBFGS;

use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        traits::MLEOptions,
        types::{
            Cost, DEFAULT_LBFGS_MEM, Grad, HagerZhangLS, LbfgsHagerZhang, LbfgsMoreThuente,
            MoreThuenteLS, Theta,
        },
    },
};

/// build_optimizer_hager_zhang — L-BFGS with the Hager–Zhang line search.
///
/// Purpose
/// -------
/// Construct an [`LbfgsHagerZhang`] over the crate's numeric types,
/// with the history depth and any tolerances taken from `opts`. The
/// starting point and iteration cap are left for the runner.
///
/// Parameters
/// ----------
/// - `opts`: `&MLEOptions`
///   Fit options. The builder reads:
///   - `opts.lbfgs_mem`: history depth `m`, defaulting to
///     [`DEFAULT_LBFGS_MEM`] when `None`.
///   - `opts.tols.tol_grad` / `opts.tols.tol_cost`: optional stopping
///     thresholds applied through Argmin's `with_tolerance_grad` and
///     `with_tolerance_cost`.
///
/// Returns
/// -------
/// `OptResult<LbfgsHagerZhang>`
///   - `Ok(solver)` ready for the runner.
///   - `Err(e)` when Argmin refuses a tolerance value.
///
/// Errors
/// ------
/// - `OptError` (through `From<argmin::core::Error>`)
///   When `with_tolerance_grad` or `with_tolerance_cost` rejects its
///   argument.
///
/// Panics
/// ------
/// - Never panics.
///
/// Safety
/// ------
/// - No `unsafe` code is used.
///
/// Notes
/// -----
/// - `theta0` and `max_iters` are configured by `run_lbfgs`, not here.
/// - The line-search instance is a fresh [`HagerZhangLS`] with Argmin
///   defaults.
///
/// Examples
/// --------
/// ```ignore
/// let solver = build_optimizer_hager_zhang(&opts)?;
/// let outcome = run_lbfgs(theta0, &opts, problem, solver)?;
/// ```
pub fn build_optimizer_hager_zhang(opts: &MLEOptions) -> OptResult<LbfgsHagerZhang> {
    let hager_zhang = HagerZhangLS::new();
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    let lbfgs = LbfgsHagerZhang::new(hager_zhang, mem);
    configure_lbfgs(lbfgs, opts)
}

/// build_optimizer_more_thuente — L-BFGS with the Moré–Thuente line search.
///
/// Purpose
/// -------
/// Construct an [`LbfgsMoreThuente`] over the crate's numeric types,
/// mirroring [`build_optimizer_hager_zhang`] with the alternative
/// line-search strategy.
///
/// Parameters
/// ----------
/// - `opts`: `&MLEOptions`
///   Fit options. The builder reads:
///   - `opts.lbfgs_mem`: history depth `m`, defaulting to
///     [`DEFAULT_LBFGS_MEM`] when `None`.
///   - `opts.tols.tol_grad` / `opts.tols.tol_cost`: optional stopping
///     thresholds applied through Argmin's `with_tolerance_grad` and
///     `with_tolerance_cost`.
///
/// Returns
/// -------
/// `OptResult<LbfgsMoreThuente>`
///   - `Ok(solver)` ready for the runner.
///   - `Err(e)` when Argmin refuses a tolerance value.
///
/// Errors
/// ------
/// - `OptError` (through `From<argmin::core::Error>`)
///   When a tolerance is rejected as non-finite, non-positive, or
///   otherwise invalid inside Argmin.
///
/// Panics
/// ------
/// - Never panics.
///
/// Safety
/// ------
/// - No `unsafe` code is used.
///
/// Notes
/// -----
/// - Only the solver is configured here; running it is the runner's
///   job.
/// - The line-search instance is a fresh [`MoreThuenteLS`].
///
/// Examples
/// --------
/// ```ignore
/// let solver = build_optimizer_more_thuente(&opts)?;
/// let outcome = run_lbfgs(theta0, &opts, problem, solver)?;
/// ```
pub fn build_optimizer_more_thuente(opts: &MLEOptions) -> OptResult<LbfgsMoreThuente> {
    let more_thuente = MoreThuenteLS::new();
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    let lbfgs = LbfgsMoreThuente::new(more_thuente, mem);
    configure_lbfgs(lbfgs, opts)
}

/// configure_lbfgs — push optional tolerances into an L-BFGS instance.
///
/// Purpose
/// -------
/// Shared wiring used by both builders. Applies whichever of the two
/// stopping tolerances are present in `opts`, independent of the
/// line-search type, so the builders stay thin.
///
/// Parameters
/// ----------
/// - `solver`: `LBFGS<L, Theta, Grad, Cost>`
///   Freshly constructed solver with some line search `L`, typically
///   from `LbfgsHagerZhang::new` or `LbfgsMoreThuente::new`.
/// - `opts`: `&MLEOptions`
///   Source of the optional thresholds:
///   - `opts.tols.tol_grad`: gradient-norm stopping threshold.
///   - `opts.tols.tol_cost`: cost-change stopping threshold.
///
/// Returns
/// -------
/// `OptResult<LBFGS<L, Theta, Grad, Cost>>`
///   - `Ok(solver)` with present tolerances applied.
///   - `Err(e)` when either `with_tolerance_*` call fails.
///
/// Errors
/// ------
/// - `OptError` (through `From<argmin::core::Error>`)
///   When Argmin rejects a tolerance value.
///
/// Panics
/// ------
/// - Never panics.
///
/// Safety
/// ------
/// - No `unsafe` code is used.
///
/// Notes
/// -----
/// - An absent tolerance skips its `with_tolerance_*` call entirely, so
///   Argmin's defaults stay in force.
/// - History depth, starting point, and iteration cap are untouched
///   here.
/// - The only generic is the line-search type `L`, which keeps the
///   helper reusable without extra bounds.
///
/// Examples
/// --------
/// ```ignore
/// use argmin::solver::quasinewton::LBFGS;
/// use crate::optimization::loglik_optimizer::types::HagerZhangLS;
///
/// let raw = LBFGS::<HagerZhangLS, Theta, Grad, Cost>::new(
///     HagerZhangLS::new(),
///     DEFAULT_LBFGS_MEM,
/// );
/// let solver = configure_lbfgs(raw, &opts)?;
/// ```
pub fn configure_lbfgs<L>(
    mut solver: LBFGS<L, Theta, Grad, Cost>, opts: &MLEOptions,
) -> OptResult<LBFGS<L, Theta, Grad, Cost>> {
    if let Some(g) = opts.tols.tol_grad {
        solver = solver.with_tolerance_grad(g)?;
    }
    if let Some(c) = opts.tols.tol_cost {
        solver = solver.with_tolerance_cost(c)?;
    }
    Ok(solver)
}
