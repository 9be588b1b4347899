//! Correctness harness for the naive kernel.
//!
//! Runs the kernel on a fixed 2×2 problem under all four transpose
//! combinations and compares each result against a hand-computed matrix.
//! Every case always runs; the verdict is decided only after all four have
//! been measured.

use std::fmt;

use tracing::{info, warn};

use crate::error::Result;
use crate::launch::{DEFAULT_BLOCK, Grid};
use crate::matrix::Matrix;
use crate::params::GemmParams;
use crate::threaded::{LaunchOptions, launch_parallel};

/// A case passes when its max absolute difference is strictly below this.
pub const TOLERANCE: f32 = 1e-4;

/// Operand A, stored as-is for every case.
pub const FIXTURE_A: [[f32; 2]; 2] = [[1.0, 2.0], [3.0, 4.0]];
/// Operand B, stored as-is for every case.
pub const FIXTURE_B: [[f32; 2]; 2] = [[5.0, 6.0], [7.0, 8.0]];

/// One row of the verification table.
#[derive(Debug, Clone, Copy)]
pub struct Case {
    pub name: &'static str,
    pub transpose_a: bool,
    pub transpose_b: bool,
    pub expected: [[f32; 2]; 2],
}

/// op(A)·op(B) for the fixtures, worked out by hand.
pub const CASES: [Case; 4] = [
    Case {
        name: "A*B",
        transpose_a: false,
        transpose_b: false,
        expected: [[19.0, 22.0], [43.0, 50.0]],
    },
    Case {
        name: "A^T*B",
        transpose_a: true,
        transpose_b: false,
        expected: [[26.0, 30.0], [38.0, 44.0]],
    },
    Case {
        name: "A*B^T",
        transpose_a: false,
        transpose_b: true,
        expected: [[17.0, 23.0], [39.0, 53.0]],
    },
    Case {
        name: "A^T*B^T",
        transpose_a: true,
        transpose_b: true,
        expected: [[23.0, 31.0], [34.0, 46.0]],
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    Fail,
}

impl Verdict {
    pub fn is_pass(self) -> bool {
        self == Verdict::Pass
    }
}

/// Outcome of one case.
#[derive(Debug, Clone)]
pub struct CaseResult {
    pub name: &'static str,
    pub transpose_a: bool,
    pub transpose_b: bool,
    pub output: Matrix,
    pub expected: Matrix,
    pub max_diff: f32,
}

impl CaseResult {
    /// NaN never passes.
    pub fn passed(&self) -> bool {
        self.max_diff < TOLERANCE
    }
}

/// All four case results plus the aggregate verdict.
#[derive(Debug, Clone)]
pub struct VerificationReport {
    pub cases: Vec<CaseResult>,
    pub verdict: Verdict,
}

impl VerificationReport {
    /// Largest max-diff over all cases (NaN if any case produced NaN).
    pub fn worst_diff(&self) -> f32 {
        self.cases.iter().fold(0.0f32, |acc, r| {
            if acc.is_nan() || r.max_diff.is_nan() {
                f32::NAN
            } else {
                acc.max(r.max_diff)
            }
        })
    }
}

/// Run the four fixture cases with the default launch options.
///
/// ```
/// let report = naive_gemm::verify::run().unwrap();
/// assert!(report.verdict.is_pass());
/// assert_eq!(report.cases.len(), 4);
/// ```
pub fn run() -> Result<VerificationReport> {
    run_with(&LaunchOptions::default())
}

/// Run the four fixture cases with explicit launch options.
///
/// Structural errors (which the fixtures never trigger) abort the run;
/// numeric divergence only flips the verdict.
pub fn run_with(options: &LaunchOptions) -> Result<VerificationReport> {
    run_cases(&CASES, options)
}

/// Run an arbitrary table of cases against the fixtures.
pub fn run_cases(table: &[Case], options: &LaunchOptions) -> Result<VerificationReport> {
    let a = Matrix::from_rows(&FIXTURE_A)?;
    let b = Matrix::from_rows(&FIXTURE_B)?;

    let mut cases = Vec::with_capacity(table.len());
    for case in table {
        let result = run_case(case, &a, &b, options)?;
        if result.passed() {
            info!(case = case.name, max_diff = result.max_diff, "case within tolerance");
        } else {
            warn!(case = case.name, max_diff = result.max_diff, "case exceeds tolerance");
        }
        cases.push(result);
    }

    let verdict = if cases.iter().all(CaseResult::passed) {
        Verdict::Pass
    } else {
        Verdict::Fail
    };
    info!(?verdict, "verification finished");
    Ok(VerificationReport { cases, verdict })
}

fn run_case(case: &Case, a: &Matrix, b: &Matrix, options: &LaunchOptions) -> Result<CaseResult> {
    let params = GemmParams::new(2, 2, 2).with_transpose(case.transpose_a, case.transpose_b);
    let grid = Grid::covering(params.m, params.n, DEFAULT_BLOCK);

    let mut output = Matrix::zeros(params.m, params.n);
    launch_parallel(&grid, &params, a.as_slice(), b.as_slice(), output.as_mut_slice(), options)?;

    let expected = Matrix::from_rows(&case.expected)?;
    let max_diff = output.max_abs_diff(&expected).unwrap_or(f32::NAN);

    Ok(CaseResult {
        name: case.name,
        transpose_a: case.transpose_a,
        transpose_b: case.transpose_b,
        output,
        expected,
        max_diff,
    })
}

impl fmt::Display for VerificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in &self.cases {
            writeln!(
                f,
                "{} (transposeA={}, transposeB={})",
                r.name, r.transpose_a, r.transpose_b
            )?;
            writeln!(f, "Kernel output:")?;
            write!(f, "{}", r.output)?;
            writeln!(f, "Expected:")?;
            write!(f, "{}", r.expected)?;
            writeln!(f, "Max diff: {:.6}", r.max_diff)?;
            writeln!(f)?;
        }
        match self.verdict {
            Verdict::Pass => writeln!(
                f,
                "PASS: all {} cases within {TOLERANCE:e}",
                self.cases.len()
            ),
            Verdict::Fail => writeln!(
                f,
                "FAIL: worst max diff {:.6} is not below {TOLERANCE:e}",
                self.worst_diff()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixtures_pass() {
        let report = run().unwrap();
        assert_eq!(report.verdict, Verdict::Pass);
        assert!(report.worst_diff() < TOLERANCE);
    }

    #[test]
    fn report_lists_every_case_then_verdict() {
        let text = run().unwrap().to_string();
        for case in &CASES {
            assert!(text.contains(case.name), "missing {}", case.name);
        }
        assert_eq!(text.matches("Max diff:").count(), 4);
        assert!(text.trim_end().lines().last().unwrap().starts_with("PASS"));
    }

    #[test]
    fn one_bad_expectation_fails_but_all_cases_run() {
        let mut table = CASES;
        table[1].expected[0][0] += 1.0;
        let report = run_cases(&table, &LaunchOptions::default()).unwrap();
        assert_eq!(report.verdict, Verdict::Fail);
        assert_eq!(report.cases.len(), 4);
        assert!((report.cases[1].max_diff - 1.0).abs() < TOLERANCE);
        assert!(report.cases[3].passed());
        assert!(report.to_string().contains("FAIL"));
    }

    #[test]
    fn nan_diff_fails_case() {
        let r = CaseResult {
            name: "x",
            transpose_a: false,
            transpose_b: false,
            output: Matrix::zeros(1, 1),
            expected: Matrix::zeros(1, 1),
            max_diff: f32::NAN,
        };
        assert!(!r.passed());
    }
}
