//! Numerical building blocks: positive quadratic roots and a 2×2 Gauss–Newton solver.

pub mod newton;
pub mod quadratic;

pub use newton::*;
pub use quadratic::*;
