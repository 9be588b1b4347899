//! Sibling kernels that live outside this crate.
//!
//! The tiled GEMM variants and the attention kernels are separate
//! executables. This module only knows their command lines and how to read
//! their exit status: 0 is success, anything else is a failure reported with
//! the code.

use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::str::FromStr;

use tracing::{error, info};

use crate::error::{GemmError, Result};

/// Arguments of the benchmark-style GEMM executable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BenchArgs {
    pub m: usize,
    pub n: usize,
    pub k: usize,
    /// Implementation index; 0 is the naive kernel.
    pub algo: u32,
    pub warmup: usize,
    pub iters: usize,
    pub alpha: f32,
    pub beta: f32,
}

impl Default for BenchArgs {
    fn default() -> Self {
        Self {
            m: 4096,
            n: 4096,
            k: 4096,
            algo: 0,
            warmup: 10,
            iters: 20,
            alpha: 1.0,
            beta: 0.0,
        }
    }
}

impl BenchArgs {
    /// Flags in the order the executable documents them.
    ///
    /// ```
    /// use naive_gemm::external::BenchArgs;
    ///
    /// let args = BenchArgs { m: 512, n: 512, k: 512, algo: 6, warmup: 10, iters: 10, ..Default::default() };
    /// assert_eq!(
    ///     args.to_args().join(" "),
    ///     "--m=512 --n=512 --k=512 --algo=6 --warmup=10 --iters=10 --alpha=1 --beta=0"
    /// );
    /// ```
    pub fn to_args(&self) -> Vec<String> {
        vec![
            format!("--m={}", self.m),
            format!("--n={}", self.n),
            format!("--k={}", self.k),
            format!("--algo={}", self.algo),
            format!("--warmup={}", self.warmup),
            format!("--iters={}", self.iters),
            format!("--alpha={}", self.alpha),
            format!("--beta={}", self.beta),
        ]
    }
}

/// Element type accepted by the attention executable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dtype {
    F16,
    Bf16,
    F32,
}

impl fmt::Display for Dtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Dtype::F16 => "f16",
            Dtype::Bf16 => "bf16",
            Dtype::F32 => "f32",
        })
    }
}

impl FromStr for Dtype {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "f16" | "fp16" | "half" => Ok(Dtype::F16),
            "bf16" => Ok(Dtype::Bf16),
            "f32" | "fp32" | "float" => Ok(Dtype::F32),
            other => Err(format!("unknown dtype '{other}', expected f16, bf16 or f32")),
        }
    }
}

/// Arguments of the attention-style executable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttentionArgs {
    /// Sequence length.
    pub n: usize,
    /// Head dimension.
    pub d: usize,
    /// Query tile rows.
    pub br: usize,
    /// Key/value tile columns.
    pub bc: usize,
    pub dtype: Dtype,
    pub causal: bool,
}

impl AttentionArgs {
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec![
            format!("--N={}", self.n),
            format!("--D={}", self.d),
            format!("--Br={}", self.br),
            format!("--Bc={}", self.bc),
            format!("--dtype={}", self.dtype),
        ];
        if self.causal {
            args.push("--causal".to_string());
        }
        args
    }
}

/// One external invocation: a program plus its arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct ExternalJob {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl ExternalJob {
    pub fn new<P: AsRef<Path>, I, S>(program: P, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.as_ref().to_path_buf(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    pub fn bench<P: AsRef<Path>>(program: P, args: &BenchArgs) -> Self {
        Self::new(program, args.to_args())
    }

    pub fn attention<P: AsRef<Path>>(program: P, args: &AttentionArgs) -> Self {
        Self::new(program, args.to_args())
    }

    /// Run to completion with inherited stdio and check the exit status.
    pub fn run(&self) -> Result<()> {
        run_command(&self.program, &self.args)
    }
}

/// Run `program` with `args`, blocking until it exits.
///
/// # Errors
///
/// [`GemmError::Spawn`] if the process cannot be started,
/// [`GemmError::ExternalFailure`] if it exits non-zero or is killed.
pub fn run_command<P, I, S>(program: P, args: I) -> Result<()>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let program = program.as_ref();
    let name = program.display().to_string();

    info!(program = %name, "running external kernel");
    let status = Command::new(program)
        .args(args)
        .status()
        .map_err(|source| GemmError::Spawn {
            program: name.clone(),
            source,
        })?;

    if status.success() {
        return Ok(());
    }
    let code = status.code();
    error!(program = %name, ?code, "external kernel failed");
    Err(GemmError::ExternalFailure {
        program: name,
        code,
    })
}

/// Run every job in order and return each one's own outcome.
///
/// A failing job does not stop the ones after it.
pub fn run_all(jobs: &[ExternalJob]) -> Vec<Result<()>> {
    jobs.iter().map(ExternalJob::run).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attention_flags_use_reference_spelling() {
        let args = AttentionArgs {
            n: 1024,
            d: 64,
            br: 32,
            bc: 32,
            dtype: Dtype::F16,
            causal: true,
        };
        assert_eq!(
            args.to_args(),
            ["--N=1024", "--D=64", "--Br=32", "--Bc=32", "--dtype=f16", "--causal"]
        );
    }

    #[test]
    fn non_causal_attention_omits_flag() {
        let args = AttentionArgs {
            n: 8,
            d: 8,
            br: 4,
            bc: 4,
            dtype: Dtype::Bf16,
            causal: false,
        };
        assert!(!args.to_args().iter().any(|a| a == "--causal"));
    }

    #[test]
    fn fractional_scalars_render_plainly() {
        let args = BenchArgs {
            alpha: 0.5,
            beta: 1.25,
            ..BenchArgs::default()
        };
        let rendered = args.to_args();
        assert_eq!(rendered[6], "--alpha=0.5");
        assert_eq!(rendered[7], "--beta=1.25");
    }

    #[test]
    fn dtype_parses_aliases() {
        assert_eq!("FP16".parse::<Dtype>(), Ok(Dtype::F16));
        assert_eq!("bf16".parse::<Dtype>(), Ok(Dtype::Bf16));
        assert!("int8".parse::<Dtype>().is_err());
    }

    #[cfg(unix)]
    #[test]
    fn non_zero_exit_carries_the_code() {
        let err = run_command("sh", ["-c", "exit 3"]).unwrap_err();
        assert!(matches!(err, GemmError::ExternalFailure { code: Some(3), .. }));
        assert!(err.to_string().contains("code 3"));
    }

    #[cfg(unix)]
    #[test]
    fn run_all_keeps_going_after_a_failure() {
        let jobs = [
            ExternalJob::new("sh", ["-c", "exit 1"]),
            ExternalJob::new("sh", ["-c", "exit 0"]),
            ExternalJob::new("/nonexistent/flashattn", Vec::<String>::new()),
        ];
        let results = run_all(&jobs);
        assert_eq!(results.len(), 3);
        assert!(matches!(results[0], Err(GemmError::ExternalFailure { code: Some(1), .. })));
        assert!(results[1].is_ok());
        assert!(matches!(results[2], Err(GemmError::Spawn { .. })));
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let err = run_command("/nonexistent/sgemm_bench", ["--algo=1"]).unwrap_err();
        assert!(matches!(err, GemmError::Spawn { .. }));
    }
}
