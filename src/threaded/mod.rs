//! Multi-threaded kernel launch.
//!
//! Wraps the per-coordinate kernel with parallel execution across output
//! rows. Thread count adapts to problem size: small problems run on the
//! calling thread to avoid pool overhead.

pub mod launch_mt;

pub use launch_mt::{LaunchOptions, SINGLE_THREAD_THRESHOLD, launch_parallel};
