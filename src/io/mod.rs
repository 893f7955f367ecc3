//! Input/output helpers.
//!
//! - model parameter CSV loading + validation (`params`)
//! - batch target lists (`targets`)
//! - result exports (CSV/JSON) (`export`)

pub mod export;
pub mod params;
pub mod targets;

pub use export::*;
pub use params::*;
pub use targets::*;
