//! Domain types used throughout the crate.
//!
//! This module defines:
//!
//! - model parameter structs (`MixingModelParams`, `LorentzianParams`)
//! - selectors (`RelaxationKind`, `ConcentrationAxis`)
//! - resolution inputs/outputs (`TargetRelaxation`, `CandidateSolution`, `Resolution`)

pub mod types;

pub use types::*;
