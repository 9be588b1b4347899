//! Per-coordinate compute kernels.
//!
//! A kernel computes exactly one element of C and touches no other output
//! element, which is what lets the launcher run tasks in any order and on
//! any number of threads without locks.
//!
//! Available kernels:
//! - `naive`: straight dot product over k with transpose-aware indexing

pub mod naive;
