//! Power-spectrum smoothing: the wiggle-free envelope under the BAO signal.
//!
//! Purpose
//! -------
//! Split a linear matter power spectrum into a smooth envelope and the
//! oscillatory remainder. Two interchangeable methods are provided:
//!
//! - [`SmoothingMethod::EisensteinHu1998`]: the zero-baryon analytic
//!   transfer function of Eisenstein & Hu (1998), rescaled to the input
//!   spectrum's amplitude by least squares.
//! - [`SmoothingMethod::Hinton2017`]: a weighted polynomial fit in
//!   (ln k, ln P) that down-weights the BAO peak region so the polynomial
//!   tracks the envelope rather than the wiggles.
//!
//! Key behaviors
//! -------------
//! - Method selection by name fails fast at configuration time with
//!   [`TransformError::UnknownSmoothingMethod`]; `smooth` itself never
//!   sees an unknown method.
//! - The analytic pieces ([`eh98_sound_horizon`], [`NoWiggleTransfer`])
//!   are exported for reuse by solver code that needs the same
//!   zero-baryon shape.
//!
//! Conventions
//! -----------
//! - Wavenumbers are h/Mpc; the sound horizon is in Mpc; `om`/`ob` are
//!   total matter / baryon density fractions, converted internally to
//!   physical densities with the supplied `h0`.
use crate::transform::errors::{TransformError, TransformResult};
use crate::transform::validation::validate_spectrum_pair;
use nalgebra::{DMatrix, DVector};
use ndarray::{Array1, ArrayView1};

/// CMB temperature used by the zero-baryon transfer function, K.
pub const T_CMB_K: f64 = 2.7255;

/// Default polynomial degree for the Hinton 2017 fit.
pub const HINTON_DEGREE: usize = 13;
/// Default width (in ln k) of the BAO down-weighting window.
pub const HINTON_SIGMA: f64 = 1.0;
/// Default depth of the BAO down-weighting window.
pub const HINTON_WEIGHT: f64 = 0.5;

/// Zero-baryon sound horizon at the drag epoch, Mpc (Eisenstein & Hu
/// 1998, Eq. 26).
///
/// Inputs are density fractions and the dimensionless Hubble constant;
/// callers are responsible for passing validated, positive values.
pub fn eh98_sound_horizon(om: f64, h0: f64, ob: f64) -> f64 {
    let omh2 = om * h0 * h0;
    let obh2 = ob * h0 * h0;
    44.5 * (9.83 / omh2).ln() / (1.0 + 10.0 * obh2.powf(0.75)).sqrt()
}

/// The Eisenstein & Hu (1998) zero-baryon transfer function.
///
/// Precomputes the shape parameters at construction; [`eval`] is then a
/// cheap per-wavenumber formula. Wavenumbers are h/Mpc.
///
/// [`eval`]: NoWiggleTransfer::eval
#[derive(Debug, Clone, Copy)]
pub struct NoWiggleTransfer {
    alpha_gamma: f64,
    om_h0: f64,
    sound_horizon_h: f64,
    theta2: f64,
}

impl NoWiggleTransfer {
    /// Build the transfer function for total matter fraction `om`, Hubble
    /// constant `h0`, and baryon fraction `ob`.
    pub fn new(om: f64, h0: f64, ob: f64) -> NoWiggleTransfer {
        let omh2 = om * h0 * h0;
        let baryon_fraction = ob / om;
        let alpha_gamma = 1.0 - 0.328 * (431.0 * omh2).ln() * baryon_fraction
            + 0.38 * (22.3 * omh2).ln() * baryon_fraction * baryon_fraction;
        NoWiggleTransfer {
            alpha_gamma,
            om_h0: om * h0,
            sound_horizon_h: eh98_sound_horizon(om, h0, ob) * h0,
            theta2: (T_CMB_K / 2.7) * (T_CMB_K / 2.7),
        }
    }

    /// Transfer amplitude at wavenumber `k` (h/Mpc); tends to 1 as k → 0.
    pub fn eval(&self, k: f64) -> f64 {
        let shape_suppression = (0.43 * k * self.sound_horizon_h).powi(4);
        let gamma_eff = self.om_h0
            * (self.alpha_gamma + (1.0 - self.alpha_gamma) / (1.0 + shape_suppression));
        let q = k * self.theta2 / gamma_eff;
        let l0 = (2.0 * std::f64::consts::E + 1.8 * q).ln();
        let c0 = 14.2 + 731.0 / (1.0 + 62.5 * q);
        l0 / (l0 + c0 * q * q)
    }
}

/// A configured power-spectrum smoothing method.
///
/// Construct via [`SmoothingMethod::eisenstein_hu_1998`],
/// [`SmoothingMethod::hinton_2017`], or by name with
/// [`SmoothingMethod::from_name`]; the default is the Hinton 2017 fit
/// with its standard knobs.
#[derive(Debug, Clone, PartialEq)]
pub enum SmoothingMethod {
    /// Analytic zero-baryon envelope, amplitude-matched to the input.
    EisensteinHu1998,
    /// Weighted polynomial fit in (ln k, ln P).
    Hinton2017 { degree: usize, sigma: f64, weight: f64 },
}

impl Default for SmoothingMethod {
    fn default() -> Self {
        SmoothingMethod::Hinton2017 {
            degree: HINTON_DEGREE,
            sigma: HINTON_SIGMA,
            weight: HINTON_WEIGHT,
        }
    }
}

impl SmoothingMethod {
    /// The analytic Eisenstein & Hu (1998) method.
    pub fn eisenstein_hu_1998() -> SmoothingMethod {
        SmoothingMethod::EisensteinHu1998
    }

    /// A validated Hinton 2017 method.
    ///
    /// Errors
    /// ------
    /// - `TransformError::InvalidDegree` if `degree` is 0.
    /// - `TransformError::InvalidWeight` if `sigma` is not finite and
    ///   positive, or `weight` lies outside [0, 1].
    pub fn hinton_2017(degree: usize, sigma: f64, weight: f64) -> TransformResult<SmoothingMethod> {
        if degree == 0 {
            return Err(TransformError::InvalidDegree {
                value: degree,
                reason: "A constant fit cannot track the envelope slope.",
            });
        }
        if !sigma.is_finite() || sigma <= 0.0 {
            return Err(TransformError::InvalidWeight {
                name: "sigma",
                value: sigma,
                reason: "The window width must be finite and > 0.",
            });
        }
        if !weight.is_finite() || !(0.0..=1.0).contains(&weight) {
            return Err(TransformError::InvalidWeight {
                name: "weight",
                value: weight,
                reason: "The window depth must lie in [0, 1].",
            });
        }
        Ok(SmoothingMethod::Hinton2017 { degree, sigma, weight })
    }

    /// Look up a method by name (case-insensitive): `"eh1998"` or
    /// `"hinton2017"` with its default knobs.
    ///
    /// Errors
    /// ------
    /// - `TransformError::UnknownSmoothingMethod` for any other name, so
    ///   misconfiguration surfaces before any spectrum is computed.
    pub fn from_name(name: &str) -> TransformResult<SmoothingMethod> {
        match name.to_lowercase().as_str() {
            "eh1998" => Ok(SmoothingMethod::EisensteinHu1998),
            "hinton2017" => Ok(SmoothingMethod::default()),
            _ => Err(TransformError::UnknownSmoothingMethod { name: name.to_string() }),
        }
    }

    /// Smooth `pk` tabulated on `ks`, returning the wiggle-free envelope.
    ///
    /// `om`, `h0`, `ob`, and `ns` describe the cosmology the spectrum was
    /// computed for; only the analytic method uses them.
    ///
    /// Errors
    /// ------
    /// - Input validation errors for mismatched lengths, empty or
    ///   non-finite arrays, or a non-ascending/non-positive `ks`.
    /// - `TransformError::NonPositiveInput` for non-positive `pk` entries
    ///   under the Hinton method (its fit runs in log space).
    /// - `TransformError::InsufficientPoints` when fewer points than
    ///   polynomial coefficients are supplied.
    /// - `TransformError::SmoothingFitFailed` if the least-squares solve
    ///   does not converge.
    pub fn smooth(
        &self, ks: ArrayView1<f64>, pk: ArrayView1<f64>, om: f64, h0: f64, ob: f64, ns: f64,
    ) -> TransformResult<Array1<f64>> {
        validate_spectrum_pair(ks, pk)?;
        match self {
            SmoothingMethod::EisensteinHu1998 => Ok(smooth_eh1998(ks, pk, om, h0, ob, ns)),
            SmoothingMethod::Hinton2017 { degree, sigma, weight } => {
                smooth_hinton2017(ks, pk, *degree, *sigma, *weight)
            }
        }
    }
}

/// Analytic envelope: the zero-baryon spectrum `k^ns · T0(k)²`, rescaled
/// to the input amplitude by least squares.
fn smooth_eh1998(
    ks: ArrayView1<f64>, pk: ArrayView1<f64>, om: f64, h0: f64, ob: f64, ns: f64,
) -> Array1<f64> {
    let transfer = NoWiggleTransfer::new(om, h0, ob);
    let pk_shape = ks.mapv(|k| {
        let t0 = transfer.eval(k);
        k.powf(ns) * t0 * t0
    });
    let amplitude = (&pk_shape * &pk).sum() / (&pk_shape * &pk_shape).sum();
    pk_shape * amplitude
}

/// Polynomial envelope: a degree-`degree` weighted least-squares fit in
/// (ln k, ln P), with weights dipping to `1 − weight` in a Gaussian window
/// of width `sigma` around the spectrum's peak.
fn smooth_hinton2017(
    ks: ArrayView1<f64>, pk: ArrayView1<f64>, degree: usize, sigma: f64, weight: f64,
) -> TransformResult<Array1<f64>> {
    let n = ks.len();
    if n < degree + 1 {
        return Err(TransformError::InsufficientPoints { needed: degree + 1, actual: n });
    }
    for (index, &value) in pk.iter().enumerate() {
        if value <= 0.0 {
            return Err(TransformError::NonPositiveInput { name: "pk", index, value });
        }
    }

    let log_ks = ks.mapv(f64::ln);
    let log_pk = pk.mapv(f64::ln);

    // First maximum of pk marks the BAO peak region to down-weight.
    let mut peak_index = 0;
    for (index, &value) in pk.iter().enumerate() {
        if value > pk[peak_index] {
            peak_index = index;
        }
    }
    let log_k_peak = log_ks[peak_index];
    let weights = log_ks.mapv(|log_k| {
        let arg = (log_k - log_k_peak) / sigma;
        1.0 - weight * (-0.5 * arg * arg).exp()
    });

    // Fit on [-1, 1] to keep the Vandermonde system well conditioned; the
    // polynomial space is unchanged by the affine rescaling.
    let center = 0.5 * (log_ks[n - 1] + log_ks[0]);
    let half_span = 0.5 * (log_ks[n - 1] - log_ks[0]);
    let scaled = log_ks.mapv(|log_k| (log_k - center) / half_span);

    let design =
        DMatrix::from_fn(n, degree + 1, |i, j| weights[i] * scaled[i].powi(j as i32));
    let rhs = DVector::from_fn(n, |i, _| weights[i] * log_pk[i]);
    let svd = design.svd(true, true);
    let coeffs = svd
        .solve(&rhs, 1e-12)
        .map_err(|detail| TransformError::SmoothingFitFailed { detail: detail.to_string() })?;

    let fitted = scaled.mapv(|x| {
        let mut acc = 0.0;
        for j in (0..=degree).rev() {
            acc = acc * x + coeffs[j];
        }
        acc
    });
    Ok(fitted.mapv(f64::exp))
}
