//! Error vocabulary of the optimization layer.
//!
//! [`OptError`] covers everything a fit can report: bad configuration,
//! derivative failures, solver-side faults unwrapped from Argmin, and the
//! cosmology-layer failures that surface while the likelihood is being
//! evaluated. The [`From`] conversions at the bottom keep foreign error
//! types from leaking past this module.
use argmin::core::{ArgminError, Error};

use crate::cosmology::errors::CosmoError;

/// Crate-wide result alias for optimizer operations.
pub type OptResult<T> = Result<T, OptError>;

#[derive(Debug, Clone, PartialEq)]
pub enum OptError {
    // ---- Gradient ----
    /// Sentinel from the default `grad`; routes the adapter to finite
    /// differences.
    GradientNotImplemented,

    /// Gradient length differs from the free-parameter count.
    GradientDimMismatch {
        expected: usize,
        found: usize,
    },

    /// A gradient entry came back NaN or infinite.
    InvalidGradient {
        index: usize,
        value: f64,
        reason: &'static str,
    },

    // ---- MLEOptions ----
    /// Gradient-norm threshold was non-finite or not positive.
    InvalidTolGrad {
        tol: f64,
        reason: &'static str,
    },
    /// Cost-change threshold was non-finite or not positive.
    InvalidTolCost {
        tol: f64,
        reason: &'static str,
    },
    /// Iteration cap was zero.
    InvalidMaxIter {
        max_iter: usize,
        reason: &'static str,
    },
    /// All three stopping rules were absent.
    NoTolerancesProvided,

    /// Line-search name did not parse.
    InvalidLineSearch {
        name: String,
        reason: &'static str,
    },

    /// L-BFGS history depth was zero.
    InvalidLBFGSMem {
        mem: usize,
        reason: &'static str,
    },

    // ---- Cost function ----
    /// The likelihood evaluated to NaN or infinity.
    NonFiniteCost {
        value: f64,
    },

    // ---- Optimizer outcome ----
    /// The solver's best point held a NaN or infinite entry.
    InvalidThetaHat {
        index: usize,
        value: f64,
        reason: &'static str,
    },

    /// The solver finished without any best point.
    MissingThetaHat,

    // ---- Argmin ---
    /// Wrapper for argmin::InvalidParameter
    InvalidParameter {
        text: String,
    },
    /// Wrapper for argmin::NotImplemented
    NotImplemented {
        text: String,
    },
    /// Wrapper for argmin::NotInitialized
    NotInitialized {
        text: String,
    },
    /// Wrapper for argmin::ConditionViolated
    ConditionViolated {
        text: String,
    },
    /// Wrapper for argmin::CheckPointNotFound
    CheckPointNotFound {
        text: String,
    },
    /// Wrapper for argmin::PotentialBug
    PotentialBug {
        text: String,
    },
    /// Wrapper for argmin::ImpossibleError
    ImpossibleError {
        text: String,
    },
    /// Wrapper for other argmin::Error types
    BackendError {
        text: String,
    },

    // ---- Finite Diffs ----
    /// Hessian shape differs from the free-parameter count.
    HessianDimMismatch {
        expected: usize,
        found: (usize, usize),
    },

    /// A Hessian entry came back NaN or infinite.
    InvalidHessian {
        row: usize,
        col: usize,
        value: f64,
    },

    // ---- Cosmology Errors ----
    /// Power spectrum grid missing on disk with generation disallowed.
    DataUnavailable {
        path: String,
    },

    /// Boltzmann solver failed while evaluating the likelihood.
    SolverFailure {
        omch2: f64,
        h0: f64,
        detail: String,
    },

    /// Power-to-correlation transform failed inside the likelihood.
    TransformFailed {
        detail: String,
    },

    /// Theta length mismatch for the model's parameter map.
    ThetaLengthMismatch {
        expected: usize,
        actual: usize,
    },

    /// Any other cosmology-layer failure surfaced through the likelihood.
    ModelFailure {
        text: String,
    },

    // ---- Fallback ----
    UnknownError,
}

impl std::error::Error for OptError {}

impl std::fmt::Display for OptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Gradient ----
            OptError::GradientNotImplemented => {
                write!(f, "Gradient optimization not implemented")
            }
            OptError::GradientDimMismatch { expected, found } => {
                write!(f, "Gradient dimension mismatch: expected {expected}, found {found}")
            }
            OptError::InvalidGradient { index, value, reason } => {
                write!(f, "Invalid gradient at index {index}: {value}: {reason}")
            }

            // ---- MLEOptions ----
            OptError::InvalidTolGrad { tol, reason } => {
                write!(f, "Invalid gradient tolerance {tol}: {reason}")
            }
            OptError::InvalidTolCost { tol, reason } => {
                write!(f, "Invalid cost function change tolerance {tol}: {reason}")
            }
            OptError::InvalidMaxIter { max_iter, reason } => {
                write!(f, "Invalid maximum iterations {max_iter}: {reason}")
            }
            OptError::NoTolerancesProvided => {
                write!(f, "No tolerances provided")
            }
            OptError::InvalidLineSearch { name, reason } => {
                write!(f, "Invalid line searcher '{name}': {reason}")
            }
            OptError::InvalidLBFGSMem { mem, reason } => {
                write!(f, "Invalid L-BFGS memory {mem}: {reason}")
            }

            // ---- Cost function ----
            OptError::NonFiniteCost { value } => {
                write!(f, "Non-finite cost value: {value}")
            }

            // ---- Optimizer outcome ----
            OptError::InvalidThetaHat { index, value, reason } => {
                write!(f, "Invalid estimated parameter at index {index}: {value}: {reason}")
            }
            OptError::MissingThetaHat => {
                write!(f, "Missing estimated parameters (theta hat)")
            }

            // ---- Argmin ----
            OptError::InvalidParameter { text } => {
                write!(f, "Invalid parameter: {text}")
            }
            OptError::NotImplemented { text } => {
                write!(f, "Not implemented: {text}")
            }
            OptError::NotInitialized { text } => {
                write!(f, "Not initialized: {text}")
            }
            OptError::ConditionViolated { text } => {
                write!(f, "Condition violated: {text}")
            }
            OptError::CheckPointNotFound { text } => {
                write!(f, "Checkpoint not found: {text}")
            }
            OptError::PotentialBug { text } => {
                write!(f, "Potential bug: {text}")
            }
            OptError::ImpossibleError { text } => {
                write!(f, "Impossible error: {text}")
            }
            OptError::BackendError { text } => {
                write!(f, "Backend error: {text}")
            }

            // ---- Finite Diffs ----
            OptError::HessianDimMismatch { expected, found } => {
                write!(
                    f,
                    "Hessian dimension mismatch: expected ({expected}, {expected}), found {found:?}"
                )
            }
            OptError::InvalidHessian { row, col, value } => {
                write!(f, "Invalid Hessian at ({row}, {col}): {value}, must be finite")
            }

            // ---- Cosmology Errors ----
            OptError::DataUnavailable { path } => {
                write!(
                    f,
                    "Power spectrum cache not found at '{path}' and generation is disallowed"
                )
            }
            OptError::SolverFailure { omch2, h0, detail } => {
                write!(f, "Boltzmann solver failed at cell (omch2 = {omch2}, h0 = {h0}): {detail}")
            }
            OptError::TransformFailed { detail } => {
                write!(f, "Power-to-correlation transform failed: {detail}")
            }
            OptError::ThetaLengthMismatch { expected, actual } => {
                write!(f, "Theta length mismatch: expected {expected}, actual {actual}")
            }
            OptError::ModelFailure { text } => {
                write!(f, "Model failure during likelihood evaluation: {text}")
            }

            // ---- Fallback ----
            OptError::UnknownError => {
                write!(f, "Unknown error")
            }
        }
    }
}

impl From<Error> for OptError {
    fn from(original_err: Error) -> Self {
        match original_err.downcast() {
            Ok(opt_err) => match opt_err {
                ArgminError::InvalidParameter { text } => OptError::InvalidParameter { text },
                ArgminError::NotImplemented { text } => OptError::NotImplemented { text },
                ArgminError::NotInitialized { text } => OptError::NotInitialized { text },
                ArgminError::ConditionViolated { text } => OptError::ConditionViolated { text },
                ArgminError::CheckpointNotFound { text } => OptError::CheckPointNotFound { text },
                ArgminError::PotentialBug { text } => OptError::PotentialBug { text },
                ArgminError::ImpossibleError { text } => OptError::ImpossibleError { text },
                _ => OptError::UnknownError,
            },
            Err(err) => OptError::BackendError { text: err.to_string() },
        }
    }
}

impl From<CosmoError> for OptError {
    fn from(err: CosmoError) -> Self {
        match err {
            CosmoError::DataUnavailable { path } => OptError::DataUnavailable { path },
            CosmoError::SolverFailure { omch2, h0, detail } => {
                OptError::SolverFailure { omch2, h0, detail }
            }
            CosmoError::TransformFailed { detail } => OptError::TransformFailed { detail },
            CosmoError::ThetaLengthMismatch { expected, actual } => {
                OptError::ThetaLengthMismatch { expected, actual }
            }
            other => OptError::ModelFailure { text: other.to_string() },
        }
    }
}
