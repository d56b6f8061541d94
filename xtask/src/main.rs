use std::fs;
use std::path::{Path, PathBuf};
use std::process::{exit, Command, ExitStatus};

use clap::{Parser, Subcommand, ValueEnum};
use function_deploy_core::artifact::{artifact_fingerprint, package_handler_source};

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "xtask",
    about = "Task runner for the function deploy workspace",
    long_about = "A unified CLI for packaging handler sources and running\n\
                  CI checks in the function deploy workspace."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Zip a single handler source file into a deployable archive
    Package {
        /// Handler source file, e.g. src/handlers/lambda1.py
        #[arg(long)]
        source: PathBuf,
        /// Output archive path
        #[arg(long, default_value = "dist/function.zip")]
        output: PathBuf,
    },
    /// Run CI checks (fmt, clippy, tests)
    Ci {
        /// Job to run
        #[arg(value_enum, default_value_t = CiJob::Check)]
        job: CiJob,
    },
}

#[derive(Clone, ValueEnum)]
enum CiJob {
    /// Formatting and clippy
    Lint,
    /// Workspace tests
    Test,
    /// Lint + test
    Check,
}

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

fn run_cargo(args: &[&str]) {
    let status = cargo(args);
    if !status.success() {
        exit(status.code().unwrap_or(1));
    }
}

fn package(source: &Path, output: &Path) {
    step("Package handler source");

    let archive = match package_handler_source(source) {
        Ok(bytes) => bytes,
        Err(error) => {
            eprintln!("{error}");
            exit(1);
        }
    };

    if let Some(parent) = output.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(parent).expect("failed to create package output directory");
    }
    fs::write(output, &archive).expect("failed to write package archive");

    eprintln!(
        "\nPackaged artifact:\n- {} ({} bytes, sha256 {})",
        output.display(),
        archive.len(),
        artifact_fingerprint(&archive)
    );
}

// ── CI jobs ────────────────────────────────────────────────────────

fn ci_lint() {
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
}

fn ci_test() {
    step("Test function_deploy_core");
    run_cargo(&["test", "-p", "function_deploy_core"]);

    step("Test function_deploy_lambda");
    run_cargo(&["test", "-p", "function_deploy_lambda"]);
}

// ── main ───────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Package { source, output } => package(&source, &output),
        Commands::Ci { job } => {
            match job {
                CiJob::Lint => ci_lint(),
                CiJob::Test => ci_test(),
                CiJob::Check => {
                    ci_lint();
                    ci_test();
                }
            }
            eprintln!("\nCI job passed.");
        }
    }
}
