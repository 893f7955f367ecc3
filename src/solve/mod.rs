//! Concentration solving.
//!
//! Responsibilities:
//!
//! - solve the joint T1/T2 system (`joint`)
//! - search single-axis fallbacks when no joint solution exists (`fallback`)
//! - orchestrate, validate, and produce reportable values (`resolve`)

pub mod fallback;
pub mod joint;
pub mod resolve;

pub use fallback::*;
pub use joint::*;
pub use resolve::*;
