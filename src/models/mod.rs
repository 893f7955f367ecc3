//! Relaxation models.
//!
//! Models are implemented as small, pure functions so that the solvers can stay
//! generic over parameter sets.

pub mod lorentzian;
pub mod mixing;

pub use mixing::{
    MixingEquation, evaluate, evaluate_labelled, evaluate_pair, quadratic_coefficients,
    quadratic_coefficients_labelled, rate, rate_gradient,
};
