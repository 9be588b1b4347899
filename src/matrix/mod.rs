//! Matrix storage and the reference implementation.
//!
//! These provide the owned buffer type used by the harness and a slow,
//! obviously-correct product that tests compare the kernel against.

pub mod dense;
pub mod reference;
pub mod transpose;

pub use dense::{Matrix, max_abs_diff};
