//! Reporting utilities: formatted terminal output for resolutions and tissue predictions.

pub mod format;

pub use format::*;
