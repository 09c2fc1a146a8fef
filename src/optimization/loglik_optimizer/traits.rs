//! Core vocabulary of the likelihood optimizer.
//!
//! - [`LogLikelihood`]: the trait a fittable model implements.
//! - [`MLEOptions`] and [`Tolerances`]: per-fit configuration.
//! - [`LineSearcher`]: which line search L-BFGS runs with.
//! - [`OptimOutcome`]: the normalized result `maximize` hands back.
//!
//! Sign convention: callers think in terms of maximizing `ℓ(θ)`; the
//! machinery minimizes `c(θ) = -ℓ(θ)`. An analytic gradient, when a model
//! offers one, is the gradient of the log-likelihood `∇ℓ(θ)`; the adapter
//! owns the sign flip.
use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::{
        Cost, FnEvalMap, Grad, Theta,
        validation::{validate_theta_hat, validate_value, verify_tol_cost, verify_tol_grad},
    },
};
use argmin::core::TerminationStatus;
use argmin_math::ArgminL2Norm;
use std::str::FromStr;

/// Interface a model exposes to the optimizer.
///
/// The model evaluates `ℓ(θ)`; minimization of `c(θ) = -ℓ(θ)` happens
/// behind the adapter. An analytic gradient, when implemented, is
/// `∇ℓ(θ)` and the adapter negates it. The crate's canonical implementor
/// is the BAO correlation-function model, whose `Data` is a measured
/// correlation dataset with its inverse covariance.
///
/// - `type Data`: dataset type threaded into `value`/`grad`/`check`.
///
/// Required:
/// - `value(&Theta, &Data) -> OptResult<Cost>`: evaluate `ℓ(θ)`.
///   Model failures come back as descriptive `OptError`s.
/// - `check(&Theta, &Data) -> OptResult<()>`: pre-flight validation of
///   the starting point against the dataset, run once before the solve.
///
/// Optional:
/// - `grad(&Theta, &Data) -> OptResult<Grad>`: analytic `∇ℓ(θ)`. The
///   default declines, which routes the solver to finite differences.
pub trait LogLikelihood {
    type Data: 'static;

    // Required methods
    fn value(&self, theta: &Theta, data: &Self::Data) -> OptResult<Cost>;
    fn check(&self, theta: &Theta, data: &Self::Data) -> OptResult<()>;

    // Optional methods
    fn grad(&self, _theta: &Theta, _data: &Self::Data) -> OptResult<Grad> {
        Err(OptError::GradientNotImplemented)
    }
}

/// Line-search strategy run inside L-BFGS.
///
/// Variants:
/// - `MoreThuente`: Moré–Thuente line search.
/// - `HagerZhang`: Hager–Zhang line search.
///
/// Parsing:
/// `FromStr` accepts either name case-insensitively; anything else is an
/// `OptError::InvalidLineSearch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineSearcher {
    MoreThuente,
    HagerZhang,
}

impl FromStr for LineSearcher {
    type Err = OptError;

    /// Parse a line-search name, ignoring case.
    ///
    /// Accepts:
    /// - `"MoreThuente"`
    /// - `"HagerZhang"`
    /// - any casing of either (e.g. `"morethuente"`, `"HAGERZHANG"`).
    ///
    /// Anything else returns `OptError::InvalidLineSearch` naming the
    /// accepted spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "morethuente" => Ok(LineSearcher::MoreThuente),
            "hagerzhang" => Ok(LineSearcher::HagerZhang),
            _ => Err(OptError::InvalidLineSearch {
                name: s.to_string(),
                reason: "Valid options are case insensitive 'MoreThuente' or 'HagerZhang'.",
            }),
        }
    }
}

/// Per-fit optimizer configuration.
///
/// Fields:
/// - `tols: Tolerances` — stopping thresholds and the iteration cap.
/// - `line_searcher: LineSearcher` — line search run inside L-BFGS.
/// - `verbose: bool` — attaches the slog observer (behind the
///   `obs_slog` feature) and prints a pre-run state line.
/// - `lbfgs_mem: Option<usize>` — L-BFGS history depth; `None` falls
///   back to the crate default.
///
/// Constructor:
/// - `new(tols, line_searcher, verbose, lbfgs_mem) -> OptResult<Self>`.
///   Numeric thresholds were already validated in `Tolerances::new`;
///   this constructor only refuses a zero history depth.
///
/// Default:
/// - `tols`: `tol_grad = 1e-6`, `tol_cost = None`, `max_iter = 300`
/// - `line_searcher`: `MoreThuente`
/// - `verbose`: `false`
/// - `lbfgs_mem`: `None` (resolves to 7)
#[derive(Debug, Clone, PartialEq)]
pub struct MLEOptions {
    pub tols: Tolerances,
    pub line_searcher: LineSearcher,
    pub verbose: bool,
    pub lbfgs_mem: Option<usize>,
}

impl MLEOptions {
    /// Assemble fit options.
    ///
    /// The tolerances were validated when constructed; the only check
    /// left here is rejecting `lbfgs_mem == 0`.
    pub fn new(
        tols: Tolerances, line_searcher: LineSearcher, verbose: bool, lbfgs_mem: Option<usize>,
    ) -> OptResult<Self> {
        if let Some(m) = lbfgs_mem {
            if m == 0 {
                return Err(OptError::InvalidLBFGSMem {
                    mem: m,
                    reason: "L-BFGS memory must be greater than zero.",
                });
            }
        }
        Ok(Self { tols, line_searcher, verbose, lbfgs_mem })
    }
}

impl Default for MLEOptions {
    fn default() -> Self {
        Self {
            tols: Tolerances::new(Some(1e-6), None, Some(300)).unwrap(),
            line_searcher: LineSearcher::MoreThuente,
            verbose: false,
            lbfgs_mem: None,
        }
    }
}

/// Stopping thresholds and iteration cap for a fit.
///
/// - `tol_grad`: stop when the gradient norm drops below this.
/// - `tol_cost`: stop when the cost change drops below this.
/// - `max_iter`: hard iteration cap.
///
/// Each field may be `None`, but at least one of the three has to be
/// set (see [`Tolerances::new`]); otherwise the solve would have no
/// stopping rule at all.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    pub tol_grad: Option<f64>,
    pub tol_cost: Option<f64>,
    pub max_iter: Option<usize>,
}

impl Tolerances {
    /// Construct validated stopping rules.
    ///
    /// # Rules
    /// - At least one of `tol_grad`, `tol_cost`, `max_iter` is `Some`.
    /// - Present thresholds are finite and strictly positive.
    /// - A present `max_iter` is nonzero.
    ///
    /// # Errors
    /// - [`OptError::NoTolerancesProvided`] when all three are `None`.
    /// - [`OptError::InvalidTolGrad`] / [`OptError::InvalidTolCost`] for
    ///   non-finite or non-positive thresholds.
    /// - `OptError::InvalidMaxIter` when `max_iter == 0`.
    pub fn new(
        tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
    ) -> OptResult<Self> {
        if tol_grad.is_none() && tol_cost.is_none() && max_iter.is_none() {
            return Err(OptError::NoTolerancesProvided);
        }
        verify_tol_cost(tol_cost)?;
        verify_tol_grad(tol_grad)?;
        if let Some(max_iter) = max_iter {
            if max_iter == 0 {
                return Err(OptError::InvalidMaxIter {
                    max_iter,
                    reason: "Maximum iterations must be greater than zero.",
                });
            }
        }
        Ok(Self { tol_grad, tol_cost, max_iter })
    }
}

/// Normalized fit result handed back by `maximize`.
///
/// - `theta_hat`: best free-parameter vector found.
/// - `value`: log-likelihood `ℓ(θ̂)` at that point, not the cost.
/// - `converged`: `true` if the solver reported a terminating status
///   other than `NotTerminated`.
/// - `status`: readable rendering of the termination status.
/// - `iterations`: iterations the solver ran.
/// - `fn_evals`: evaluation counters as argmin reports them, keyed by
///   names such as cost_count and gradient_count.
/// - `grad_norm`: norm of the last gradient the solver held, when one
///   exists.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimOutcome {
    pub theta_hat: Theta,
    pub value: f64,
    pub converged: bool,
    pub status: String,
    pub iterations: usize,
    pub fn_evals: FnEvalMap,
    pub grad_norm: Option<f64>,
}

impl OptimOutcome {
    /// Assemble a validated [`OptimOutcome`] from final solver state.
    ///
    /// Steps:
    /// - unwrap and check `theta_hat` via `validate_theta_hat`;
    /// - check `value` for finiteness via `validate_value`;
    /// - fold `TerminationStatus` into the `(converged, status)` pair;
    /// - take the norm of the final gradient when one was kept.
    ///
    /// # Errors
    /// - Propagates the `theta_hat` and `value` validation failures.
    pub fn new(
        theta_hat_opt: Option<Theta>, value: f64, converged: TerminationStatus, iterations: u64,
        fn_evals: FnEvalMap, grad: Option<Grad>,
    ) -> OptResult<Self> {
        let theta_hat = validate_theta_hat(theta_hat_opt)?;
        validate_value(value)?;
        let status: String;
        let converged = match converged {
            TerminationStatus::NotTerminated => {
                status = "Not terminated".to_string();
                false
            }
            _ => {
                status = format!("{converged:?}");
                true
            }
        };
        let iterations = iterations as usize;
        let grad_norm = grad.map(|g| g.l2_norm());
        Ok(Self { theta_hat, value, converged, status, iterations, fn_evals, grad_norm })
    }
}
