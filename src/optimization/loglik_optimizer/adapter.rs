//! Bridge between a `LogLikelihood` model and the `argmin` solver traits.
//!
//! Argmin minimizes, while callers hand us a log-likelihood `ℓ(θ)` to
//! maximize, so the adapter presents the cost `c(θ) = -ℓ(θ)`. A model
//! that supplies an analytic gradient gets it negated to match; a model
//! that does not gets a finite-difference gradient of the cost itself,
//! where no sign flip is necessary.
use std::cell::RefCell;

use crate::optimization::{
    errors::OptError,
    loglik_optimizer::{
        finite_diff::run_fd_diff,
        traits::LogLikelihood,
        types::{Cost, Grad, Theta},
        validation::validate_grad,
    },
};
use argmin::core::{CostFunction, Error, Gradient};
use finitediff::FiniteDiff;

/// Wraps a `LogLikelihood` and its dataset as an Argmin problem.
///
/// - `CostFunction::cost` evaluates `-ℓ(θ)`.
/// - `Gradient::gradient` evaluates either `-∇ℓ(θ)` from the model's
///   analytic gradient, or a finite-difference gradient of the cost when
///   the model declares none.
#[derive(Debug, Clone)]
pub struct ArgMinAdapter<'a, F: LogLikelihood> {
    pub f: &'a F,
    pub data: &'a F::Data,
}

impl<'a, F: LogLikelihood> CostFunction for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Output = Cost;

    /// Evaluate `c(θ) = -ℓ(θ)`.
    ///
    /// The model's `value(θ, data)` is called once and its output checked
    /// for finiteness before negation; a NaN or infinite likelihood is
    /// reported as `NonFiniteCost` rather than handed to the solver.
    ///
    /// # Errors
    /// Propagates any `OptError` from the model's `value` via `?`.
    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, Error> {
        let output = self.f.value(theta, self.data)?;
        if !output.is_finite() {
            return Err((OptError::NonFiniteCost { value: output }).into());
        }
        Ok(-output)
    }
}

impl<'a, F: LogLikelihood> Gradient for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Gradient = Grad;

    /// Evaluate the cost gradient at `θ`.
    ///
    /// Behavior:
    /// - A model-provided gradient is validated and returned negated,
    ///   since the solver sees `-ℓ`.
    /// - A model reporting `GradientNotImplemented` gets a numeric
    ///   gradient of the cost:
    ///   - central differences on the first attempt;
    ///   - a forward-difference retry when any cost evaluation inside the
    ///     sweep failed (tracked through `closure_err`);
    ///   - a forward-difference retry when the central result fails
    ///     validation, with the retry validated as well.
    ///
    /// Implementation notes:
    /// - The differencing closure has to return `f64`, so `?` is not
    ///   available inside it. The first failure is parked in
    ///   `closure_err` and the closure yields NaN; after the sweep the
    ///   parked error either aborts the attempt or triggers the forward
    ///   retry.
    ///
    /// # Errors
    /// - Propagates model errors other than `GradientNotImplemented`.
    /// - Propagates cost-evaluation errors captured during differencing.
    /// - Returns validation errors for a wrong-length or non-finite
    ///   gradient.
    fn gradient(&self, theta: &Self::Param) -> Result<Self::Gradient, Error> {
        let dim = theta.len();
        match self.f.grad(theta, self.data) {
            Ok(g) => {
                validate_grad(&g, dim)?;
                Ok(-g)
            }
            Err(e) => {
                let closure_err: RefCell<Option<Error>> = RefCell::new(None);
                match e {
                    OptError::GradientNotImplemented => {
                        let cost_func = |theta: &Theta| -> f64 {
                            match self.cost(theta) {
                                Ok(val) => val,
                                Err(e) => {
                                    let mut slot = closure_err.borrow_mut();
                                    if slot.is_none() {
                                        *slot = Some(e);
                                    }
                                    f64::NAN
                                }
                            }
                        };
                        let mut fd_grad = theta.central_diff(&cost_func);
                        if closure_err.borrow().is_some() {
                            fd_grad = run_fd_diff(theta, &cost_func, &closure_err)?;
                            return Ok(fd_grad);
                        }
                        match validate_grad(&fd_grad, dim) {
                            Ok(()) => Ok(fd_grad),
                            Err(_) => {
                                fd_grad = run_fd_diff(theta, &cost_func, &closure_err)?;
                                Ok(fd_grad)
                            }
                        }
                    }
                    _ => Err(e.into()),
                }
            }
        }
    }
}

impl<'a, F: LogLikelihood> ArgMinAdapter<'a, F> {
    /// Pair a model with the dataset it will be fit against.
    pub fn new(f: &'a F, data: &'a F::Data) -> Self {
        Self { f, data }
    }
}
