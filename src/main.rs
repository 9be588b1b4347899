//! Command-line front end: correctness check, benchmark and sibling-kernel
//! passthrough.
//!
//! # Usage
//!
//! ```bash
//! # Four-case 2x2 correctness check (exit 0 on PASS, 1 on FAIL)
//! naive-gemm verify
//!
//! # Time the in-process naive kernel
//! naive-gemm bench --m=512 --n=512 --k=512 --algo=0 --warmup=10 --iters=10 --alpha=1 --beta=0
//!
//! # Hand other algorithms to an external benchmark executable
//! naive-gemm bench --algo=6 --exec ./build/sgemm_bench --m=4096 --n=4096 --k=4096
//!
//! # Attention kernels are always external
//! naive-gemm attention --exec ./build/flashattn --N=1024 --D=64 --Br=32 --Bc=32 --dtype=f16 --causal
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use naive_gemm::external::{AttentionArgs, BenchArgs, Dtype, ExternalJob};
use naive_gemm::{GemmParams, LaunchOptions, gemm_with, verify};

#[derive(Parser, Debug)]
#[command(name = "naive-gemm")]
#[command(about = "Per-coordinate GEMM kernel: verification and benchmarking")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the 2x2 correctness check over all four transpose combinations
    Verify {
        /// Worker threads (default: rayon's global pool)
        #[arg(long)]
        threads: Option<usize>,
    },

    /// Benchmark a GEMM implementation
    Bench {
        #[arg(long, default_value_t = 4096)]
        m: usize,
        #[arg(long, default_value_t = 4096)]
        n: usize,
        #[arg(long, default_value_t = 4096)]
        k: usize,
        /// Implementation index; 0 runs in-process, others need --exec
        #[arg(long, default_value_t = 0)]
        algo: u32,
        #[arg(long, default_value_t = 10)]
        warmup: usize,
        #[arg(long, default_value_t = 20)]
        iters: usize,
        #[arg(long, default_value_t = 1.0)]
        alpha: f32,
        #[arg(long, default_value_t = 0.0)]
        beta: f32,
        /// Worker threads for algo 0 (default: rayon's global pool)
        #[arg(long)]
        threads: Option<usize>,
        /// External benchmark executable to forward the flags to
        #[arg(long)]
        exec: Option<PathBuf>,
    },

    /// Run an external attention kernel
    Attention {
        /// Attention executable
        #[arg(long)]
        exec: PathBuf,
        #[arg(long = "N")]
        n: usize,
        #[arg(long = "D")]
        d: usize,
        #[arg(long = "Br")]
        br: usize,
        #[arg(long = "Bc")]
        bc: usize,
        #[arg(long, default_value = "f16")]
        dtype: Dtype,
        #[arg(long)]
        causal: bool,
    },
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Verify { threads: None }) {
        Command::Verify { threads } => run_verify(threads),
        Command::Bench {
            m,
            n,
            k,
            algo,
            warmup,
            iters,
            alpha,
            beta,
            threads,
            exec,
        } => {
            let args = BenchArgs {
                m,
                n,
                k,
                algo,
                warmup,
                iters,
                alpha,
                beta,
            };
            match (algo, exec) {
                (_, Some(exec)) => {
                    ExternalJob::bench(&exec, &args)
                        .run()
                        .with_context(|| format!("algo {algo} via {}", exec.display()))?;
                    Ok(ExitCode::SUCCESS)
                }
                (0, None) => run_bench(&args, threads),
                (_, None) => bail!("algo {algo} is not built into this binary; pass --exec <path>"),
            }
        }
        Command::Attention {
            exec,
            n,
            d,
            br,
            bc,
            dtype,
            causal,
        } => {
            let args = AttentionArgs {
                n,
                d,
                br,
                bc,
                dtype,
                causal,
            };
            ExternalJob::attention(&exec, &args)
                .run()
                .with_context(|| format!("attention via {}", exec.display()))?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn launch_options(threads: Option<usize>) -> LaunchOptions {
    match threads {
        Some(t) => LaunchOptions::with_threads(t),
        None => LaunchOptions::default(),
    }
}

fn run_verify(threads: Option<usize>) -> Result<ExitCode> {
    let report = verify::run_with(&launch_options(threads))?;
    print!("{report}");
    Ok(if report.verdict.is_pass() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn elements(operand: &str, rows: usize, cols: usize) -> Result<usize> {
    rows.checked_mul(cols)
        .with_context(|| format!("{operand}: {rows}x{cols} elements overflow usize"))
}

/// Time the in-process kernel: `warmup` untimed runs, then `iters` timed ones.
fn run_bench(args: &BenchArgs, threads: Option<usize>) -> Result<ExitCode> {
    let params = GemmParams::new(args.m, args.n, args.k).with_scalars(args.alpha, args.beta);
    let options = launch_options(threads);

    let a: Vec<f32> = (0..elements("A", args.m, args.k)?)
        .map(|i| (i % 100) as f32 / 100.0)
        .collect();
    let b: Vec<f32> = (0..elements("B", args.k, args.n)?)
        .map(|i| (i % 100) as f32 / 100.0)
        .collect();
    let mut c = vec![0.0f32; elements("C", args.m, args.n)?];

    println!("=== Naive GEMM (algo 0) ===");
    println!("M={} N={} K={} alpha={} beta={}", args.m, args.n, args.k, args.alpha, args.beta);

    for _ in 0..args.warmup {
        gemm_with(&params, &a, &b, &mut c, &options)?;
    }

    let iters = args.iters.max(1);
    let mut total = 0.0;
    for _ in 0..iters {
        let start = Instant::now();
        gemm_with(&params, &a, &b, &mut c, &options)?;
        total += start.elapsed().as_secs_f64();
    }

    let avg = total / iters as f64;
    let gflops = params.flops() / avg / 1e9;
    println!("Avg time: {:.3} ms  ({} iters)", avg * 1000.0, iters);
    println!("Perf:     {:.2} GFLOPS", gflops);
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_count_overflow_is_an_error() {
        assert_eq!(elements("C", 512, 256).unwrap(), 512 * 256);
        let err = elements("A", usize::MAX, 2).unwrap_err();
        assert!(err.to_string().contains("overflow"));
    }
}
