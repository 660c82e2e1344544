//! `multiplied`: plan, execute, verify, and export multiplier reductions.
//!
//! **Usage:**
//! ```text
//! multiplied [-v]... [--config <file>] plan --bits <N> [--pattern <P>]...
//! multiplied [-v]... [--config <file>] exec --bits <N> <A> <B>
//! multiplied [-v]... [--config <file>] verify --bits <N> [--a MIN..MAX] [--out MIN..MAX]
//! multiplied [-v]... [--config <file>] export --bits <N> --out <file>
//! ```
//!
//! `verify` exits non-zero if any operand pair loses its product.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use multiplied::Bitwidth;
use multiplied_clients::{build_plan, logging, truth_scope, verify, Bounds, Settings};

/// Wallace and Dadda tree reduction models.
#[derive(Parser)]
#[command(
    name = "multiplied",
    about = "Plan, execute, and verify partial-product reductions"
)]
struct Args {
    /// Increase log verbosity (-v debug, -vv trace). `MULTIPLIED_LOG` overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// TOML settings file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build a plan and print every stage.
    Plan {
        /// Operand bitwidth (4 or 8).
        #[arg(long)]
        bits: usize,
        /// Pattern for the next stage; repeat for several stages.
        #[arg(long = "pattern")]
        patterns: Vec<String>,
    },
    /// Multiply two operands and print the stage trace.
    Exec {
        /// Operand bitwidth (4 or 8).
        #[arg(long)]
        bits: usize,
        /// Multiplicand.
        a: u32,
        /// Multiplier.
        b: u32,
    },
    /// Check every operand pair of a truth scope against native multiplication.
    Verify {
        /// Operand bitwidth (4 or 8).
        #[arg(long)]
        bits: usize,
        /// Operand range (default: 1 to the largest operand).
        #[arg(long)]
        a: Option<Bounds>,
        /// Product range (default: 1 to the largest product).
        #[arg(long)]
        out: Option<Bounds>,
    },
    /// Write the plan as JSON.
    Export {
        /// Operand bitwidth (4 or 8).
        #[arg(long)]
        bits: usize,
        /// Destination file.
        #[arg(long)]
        out: PathBuf,
    },
}

fn load_settings(path: Option<&Path>) -> Result<Settings> {
    let Some(path) = path else {
        return Ok(Settings::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read settings {}", path.display()))?;
    Settings::from_toml_str(&text).with_context(|| format!("invalid settings {}", path.display()))
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose)?;
    let mut settings = load_settings(args.config.as_deref())?;

    match args.command {
        Command::Plan { bits, patterns } => {
            settings.patterns.extend(patterns);
            let algorithm = build_plan(&settings, bits).context("failed to build plan")?;
            println!("{algorithm}");
        }
        Command::Exec { bits, a, b } => {
            let mut algorithm = build_plan(&settings, bits).context("failed to build plan")?;
            let trace = algorithm
                .exec(a, b)
                .with_context(|| format!("failed to execute {a} * {b}"))?;
            for (stage, matrix) in &trace {
                println!("stage {stage}\n{matrix}\n");
            }
            if let Some(last) = trace.values().last() {
                println!("{a} * {b} = {}", last.row_value(0));
            }
        }
        Command::Verify { bits, a, out } => {
            let width = Bitwidth::new(bits)?;
            let max = width.max_operand();
            let domain = match a {
                Some(bounds) => bounds.operands()?,
                None => (1, max),
            };
            let range = out.map_or((1, u64::from(max) * u64::from(max)), |b| (b.min, b.max));
            let scope = truth_scope(domain, range).context("invalid truth scope")?;

            let mut algorithm = build_plan(&settings, bits).context("failed to build plan")?;
            let report = verify(&mut algorithm, scope);

            println!("Multiplied Verification Report ({width})");
            println!("==============================");
            println!();
            for result in report.failures() {
                println!("[FAIL] {}", result.message);
                for detail in &result.details {
                    println!("       {detail}");
                }
            }
            println!(
                "Summary: {} passed, {} failed",
                report.pass_count(),
                report.failure_count()
            );

            if !report.all_passed() {
                eprintln!(
                    "Verification FAILED: {} pair(s) lost the product.",
                    report.failure_count()
                );
                process::exit(1);
            }
            println!("Verification PASSED.");
        }
        Command::Export { bits, out } => {
            let algorithm = build_plan(&settings, bits).context("failed to build plan")?;
            fs::write(&out, multiplied::export::to_json_string(&algorithm))
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("wrote {} stage(s) to {}", algorithm.len(), out.display());
        }
    }
    Ok(())
}
