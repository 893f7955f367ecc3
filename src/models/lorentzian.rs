//! Field-dependent Lorentzian tissue model.
//!
//! ```text
//! ω       = γ · B0
//! L_i(B0) = (n0 + n1 / (1 + (ω·τ_i)^β_i) + n2 / (1 + (2ω·τ_i)^β_i)) · c_i · τ_i
//! R(B0)   = A + Σ_i L_i(B0)
//! T(B0)   = 1 / R(B0)
//! ```

use crate::domain::{LorentzianParams, LorentzianTerm, RelaxationTimes};

/// Proton gyromagnetic ratio (Hz/T).
pub const GAMMA: f64 = 42.6e6;

fn lorentzian(term: &LorentzianTerm, numerators: &[f64; 3], field: f64) -> f64 {
    let w = GAMMA * field;
    let shape = numerators[0]
        + numerators[1] / (1.0 + (w * term.tau).powf(term.beta))
        + numerators[2] / (1.0 + (2.0 * w * term.tau).powf(term.beta));
    shape * term.c * term.tau
}

/// Relaxation rate (1/s) at `field` tesla.
pub fn rate(params: &LorentzianParams, field: f64) -> f64 {
    params
        .active_terms()
        .iter()
        .fold(params.big_a, |acc, term| acc + lorentzian(term, &params.numerators, field))
}

/// Relaxation time (s) at `field` tesla.
pub fn predict(params: &LorentzianParams, field: f64) -> f64 {
    1.0 / rate(params, field)
}

/// Tissue (T1, T2) at `field` tesla.
pub fn predict_tissue(t1: &LorentzianParams, t2: &LorentzianParams, field: f64) -> RelaxationTimes {
    RelaxationTimes {
        t1: predict(t1, field),
        t2: predict(t2, field),
    }
}
