use std::path::Path;
use std::process::{exit, Command, ExitStatus};

use clap::{Parser, Subcommand, ValueEnum};

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "xtask",
    about = "Task runner for the day/night sampler workspace",
    long_about = "A unified CLI for running the sampler, the distribution demo,\n\
                  benchmarks, and CI checks in the day/night sampler workspace."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the sampler on a dataset directory
    Run {
        /// Directory holding the images to classify
        #[arg(long, env = "DAYNIGHT_SOURCE", default_value = "dataset")]
        source: String,
        /// Seed for reproducible sampling
        #[arg(long)]
        seed: Option<u64>,
        /// Extra flags passed through to the sampler
        #[arg(last = true)]
        extra: Vec<String>,
    },
    /// Print a distribution report for a synthetic dataset
    Demo,
    /// Run Criterion benchmarks
    Bench,
    /// Compare benchmarks: stash changes, create baseline, restore, compare
    BenchCompare,
    /// Run CI checks (fmt, clippy, tests, examples, benchmarks)
    Ci {
        /// Job to run
        #[arg(value_enum, default_value_t = CiJob::Check)]
        job: CiJob,
    },
}

#[derive(Clone, ValueEnum)]
enum CiJob {
    /// Formatting, clippy, and tests
    Check,
    /// Build and run the demo example
    Examples,
    /// Run benchmarks
    Bench,
    /// Run check + examples + bench
    All,
}

const BENCH_PACKAGE: &str = "daynight_core";
const BENCH_NAME: &str = "distribution";

// ── helpers ────────────────────────────────────────────────────────

fn step(label: &str) {
    eprintln!("\n=== {label} ===");
}

fn cargo(args: &[&str]) -> ExitStatus {
    eprintln!("+ cargo {}", args.join(" "));
    Command::new("cargo")
        .args(args)
        .status()
        .expect("failed to execute cargo")
}

fn git(args: &[&str]) -> ExitStatus {
    eprintln!("+ git {}", args.join(" "));
    Command::new("git")
        .args(args)
        .status()
        .expect("failed to execute git")
}

fn run_cargo(args: &[&str]) {
    let status = cargo(args);
    if !status.success() {
        exit(status.code().unwrap_or(1));
    }
}

fn run_git(args: &[&str]) {
    let status = git(args);
    if !status.success() {
        exit(status.code().unwrap_or(1));
    }
}

fn run_bench(extra: &[&str]) {
    let mut args = vec!["bench", "--package", BENCH_PACKAGE, "--bench", BENCH_NAME];
    if !extra.is_empty() {
        args.push("--");
        args.extend_from_slice(extra);
    }
    run_cargo(&args);
}

fn run_demo() {
    run_cargo(&[
        "run",
        "-p",
        "daynight_core",
        "--example",
        "distribution_demo",
        "--release",
    ]);
}

// ── CI jobs ────────────────────────────────────────────────────────

fn ci_check() {
    step("Check formatting");
    run_cargo(&["fmt", "--all", "--", "--check"]);

    step("Clippy");
    run_cargo(&[
        "clippy",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ]);

    step("Test daynight_core");
    run_cargo(&["test", "-p", "daynight_core"]);

    step("Test daynight_cli");
    run_cargo(&["test", "-p", "daynight_cli"]);
}

fn ci_examples() {
    step("Run distribution_demo");
    run_demo();
}

fn ci_bench() {
    step("Run benchmarks");
    run_bench(&[]);
}

// ── main ───────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            source,
            seed,
            extra,
        } => {
            let seed = seed.map(|value| value.to_string());
            let mut args = vec![
                "run",
                "-p",
                "daynight_cli",
                "--release",
                "--",
                "--source",
                source.as_str(),
            ];
            if let Some(seed) = &seed {
                args.extend(["--seed", seed.as_str()]);
            }
            args.extend(extra.iter().map(String::as_str));
            run_cargo(&args);
        }
        Commands::Demo => run_demo(),
        Commands::Bench => run_bench(&[]),
        Commands::BenchCompare => {
            let baseline_dir = Path::new("target/criterion");
            if baseline_dir.exists() {
                step("Removing existing benchmark data");
                std::fs::remove_dir_all(baseline_dir).expect("failed to remove target/criterion");
            }

            step("Stashing current changes");
            run_git(&[
                "stash",
                "push",
                "-m",
                "Temporary stash for benchmark comparison",
            ]);

            step("Running benchmark to create baseline");
            run_bench(&["--save-baseline", "main"]);

            step("Reapplying changes");
            run_git(&["stash", "pop"]);

            step("Running benchmark comparing against baseline");
            run_bench(&["--baseline", "main"]);

            eprintln!("\nDone! Check the output above to see performance comparison.");
        }
        Commands::Ci { job } => {
            match job {
                CiJob::Check => ci_check(),
                CiJob::Examples => ci_examples(),
                CiJob::Bench => ci_bench(),
                CiJob::All => {
                    ci_check();
                    ci_examples();
                    ci_bench();
                }
            }
            eprintln!("\nCI job passed.");
        }
    }
}
