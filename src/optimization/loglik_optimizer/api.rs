//! Single entry point for running a likelihood fit.
//!
//! `maximize` checks the starting point, wraps the model and dataset in
//! an `ArgMinAdapter` (which presents the minimization problem
//! `c(θ) = -ℓ(θ)` to `argmin`), builds L-BFGS with the configured line
//! search, and hands everything to `run_lbfgs`.
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        OptimOutcome, Theta,
        adapter::ArgMinAdapter,
        builders::{build_optimizer_hager_zhang, build_optimizer_more_thuente},
        run::run_lbfgs,
        traits::{LineSearcher, LogLikelihood, MLEOptions},
    },
};

/// Maximize `ℓ(θ)` with L-BFGS under the configured line search.
///
/// # Behavior
/// - Runs the model's own `check(theta0, data)` before anything else.
/// - Adapts `(f, data)` into the minimization problem `c(θ) = -ℓ(θ)`.
/// - Builds the solver for `opts.line_searcher`, either Hager–Zhang or
///   Moré–Thuente.
/// - Delegates to `run_lbfgs`, which seeds the executor with `theta0`,
///   applies the iteration cap, attaches observers when asked, and
///   normalizes the result.
///
/// # Parameters
/// - `f`: the model, any [`LogLikelihood`] implementor.
/// - `theta0`: starting free-parameter vector.
/// - `data`: dataset threaded through to `value`/`grad`.
/// - `opts`: stopping rules, line-search choice, verbosity, history
///   depth.
///
/// # Errors
/// - Whatever `f.check` reports about the starting point.
/// - Builder failures from `build_optimizer_*`.
/// - Runtime failures out of `run_lbfgs`, line-search breakdowns
///   included.
///
/// # Returns
/// An [`OptimOutcome`] with `theta_hat`, the value `ℓ(θ̂)`, termination
/// status, iteration and evaluation counts, and the final gradient norm
/// when available.
///
/// # Example
/// ```no_run
/// use ndarray::array;
/// use rust_cosmology::optimization::errors::OptResult;
/// use rust_cosmology::optimization::loglik_optimizer::{
///     maximize, LineSearcher, LogLikelihood, MLEOptions, Tolerances,
/// };
///
/// struct Parabola;
/// impl LogLikelihood for Parabola {
///     type Data = ();
///     fn value(&self, theta: &ndarray::Array1<f64>, _: &()) -> OptResult<f64> {
///         // Concave toy likelihood peaking at the origin.
///         Ok(-theta.dot(theta))
///     }
///     fn check(&self, _: &ndarray::Array1<f64>, _: &()) -> OptResult<()> {
///         Ok(())
///     }
/// }
///
/// let f = Parabola;
/// let theta0 = array![0.1, -0.2, 0.3];
/// let opts = MLEOptions::new(
///     Tolerances::new(Some(1e-6), None, Some(200))?,
///     LineSearcher::HagerZhang,
///     false,
///     None,
/// )?;
///
/// let out = maximize(&f, theta0, &(), &opts)?;
/// println!("theta_hat = {:?}", out.theta_hat);
/// # Ok::<(), rust_cosmology::optimization::errors::OptError>(())
/// ```
pub fn maximize<F: LogLikelihood>(
    f: &F, theta0: Theta, data: &F::Data, opts: &MLEOptions,
) -> OptResult<OptimOutcome> {
    f.check(&theta0, data)?;
    let problem = ArgMinAdapter::new(f, data);
    match opts.line_searcher {
        LineSearcher::MoreThuente => {
            let solver = build_optimizer_more_thuente(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
        LineSearcher::HagerZhang => {
            let solver = build_optimizer_hager_zhang(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
    }
}
