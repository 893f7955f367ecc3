//! `phantom-mix` library crate.
//!
//! The binary (`phantom`) is a thin wrapper around this library so that:
//!
//! - the solvers are testable without spawning processes
//! - model loading, resolution, and exports can be reused from other tools

pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod models;
pub mod report;
pub mod solve;
