//! Shared runner that executes an `argmin` solver and repackages the
//! result as an [`OptimOutcome`].
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        Grad, LogLikelihood, MLEOptions, OptimOutcome, Theta, adapter::ArgMinAdapter,
    },
};
#[cfg(feature = "obs_slog")]
use argmin::core::{CostFunction, Gradient};
use argmin::core::{Executor, State};
#[cfg(feature = "obs_slog")]
use argmin_math::ArgminL2Norm;

/// Execute a configured solver on an adapted likelihood problem.
///
/// Both line-search variants funnel through this one runner. It
/// assembles:
/// - the model and dataset via [`ArgMinAdapter`],
/// - the prebuilt `Solver` from the builders module,
/// - the starting point `theta0`,
/// - an optional terminal observer (behind the `obs_slog` feature),
/// - the optional iteration cap from the tolerances,
///   then runs the solve and translates the final state into an
///   [`OptimOutcome`].
///
/// # Type Parameters
/// - `F`: the likelihood model, any [`LogLikelihood`] implementor.
/// - `S`: an `argmin` solver over `ArgMinAdapter<'a, F>` whose
///   `IterState` uses `Theta` for parameters, `Grad` for gradients, and
///   `f64` as the float.
///
/// # Arguments
/// - `theta0`: starting free-parameter vector, consumed into the solver
///   state through `state.param(theta0)`.
/// - `opts`: fit options; the runner reads `verbose` and
///   `tols.max_iter`.
/// - `problem`: the adapter pairing the model with its dataset.
/// - `solver`: a configured solver, typically from
///   [`build_optimizer_hager_zhang`](crate::optimization::loglik_optimizer::builders::build_optimizer_hager_zhang)
///   or
///   [`build_optimizer_more_thuente`](crate::optimization::loglik_optimizer::builders::build_optimizer_more_thuente).
///
/// # Feature flags
/// With the `obs_slog` feature on and `opts.verbose == true`, a
/// non-blocking terminal slog observer is attached in
/// `ObserverMode::Always`, and a single pre-run line reports ℓ(θ₀) plus
/// the starting gradient norm when one can be computed.
///
/// # Returns
/// An [`OptimOutcome`] with the best parameters, the likelihood ℓ(θ̂) at
/// that point (sign restored from the internal cost), the termination
/// status, iteration and evaluation counts, and the norm of the last
/// gradient the solver held.
///
/// # Errors
/// - Any `argmin` runtime failure (solver, line search, observer) maps
///   into `OptError` through the crate's `From<argmin::core::Error>`.
/// - Validation failures while assembling the [`OptimOutcome`]
///   propagate unchanged.
///
/// # Examples
/// ```ignore
/// let problem = ArgMinAdapter::new(&model, &data);
/// let solver  = build_optimizer_more_thuente(&opts)?;
/// let out     = run_lbfgs(theta0.clone(), &opts, problem, solver)?;
/// println!("done in {} iters, status: {}", out.iterations, out.status);
/// ```
pub fn run_lbfgs<'a, F, S>(
    theta0: Theta, opts: &MLEOptions, problem: ArgMinAdapter<'a, F>, solver: S,
) -> OptResult<OptimOutcome>
where
    F: LogLikelihood,
    S: argmin::core::Solver<
            ArgMinAdapter<'a, F>,
            argmin::core::IterState<Theta, Grad, (), (), (), f64>,
        > + Send
        + 'static,
{
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        log_initial_state(&theta0, &problem)?;
    }
    let mut optimizer = Executor::new(problem, solver);
    optimizer = optimizer.configure(|state| state.param(theta0));
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        let observer = argmin_observer_slog::SlogLogger::term_noblock();
        optimizer = optimizer.add_observer(observer, argmin::core::observers::ObserverMode::Always);
    }
    if let Some(max_iter) = opts.tols.max_iter {
        optimizer = optimizer.configure(|state| state.max_iters(max_iter as u64));
    }

    let mut result = optimizer.run()?.state().clone();
    let iterations = result.get_iter();
    let function_counts = result.get_func_counts().clone();
    let termination = result.get_termination_status().clone();
    let grad = result.take_gradient();
    OptimOutcome::new(
        result.take_best_param(),
        -result.get_best_cost(),
        termination,
        iterations,
        function_counts,
        grad,
    )
}

// ---- Helper Methods ----

#[cfg(feature = "obs_slog")]
fn log_initial_state<F>(theta0: &Theta, problem: &ArgMinAdapter<'_, F>) -> OptResult<()>
where
    F: LogLikelihood,
{
    let ll0 = -problem.cost(theta0)?;
    let g0n = problem.gradient(theta0).ok().map(|g| g.l2_norm());

    eprintln!(
        "init: ell(theta0) = {:.6}{}",
        ll0,
        g0n.map(|n| format!(", ||grad|| = {:.6}", n)).unwrap_or_default()
    );
    Ok(())
}
