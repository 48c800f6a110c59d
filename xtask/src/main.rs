use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::Command;

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace automation for augury")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all checks: fmt, clippy, tests, scenarios
    Check,
    /// Run cargo fmt --check on all crates
    Fmt,
    /// Run clippy on all crates
    Clippy,
    /// Run all tests
    Test,
    /// Run every scenario under scenarios/ through augury-cli
    Scenarios {
        #[arg(long, default_value = "scenarios")]
        dir: PathBuf,
    },
    /// Build rustdoc for the workspace
    Doc,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => {
            run_fmt()?;
            run_clippy()?;
            run_tests()?;
            run_scenarios(Path::new("scenarios"))?;
        }
        Commands::Fmt => run_fmt()?,
        Commands::Clippy => run_clippy()?,
        Commands::Test => run_tests()?,
        Commands::Scenarios { dir } => run_scenarios(&dir)?,
        Commands::Doc => run_doc()?,
    }

    Ok(())
}

fn cargo(args: &[&str], what: &str) -> Result<()> {
    println!("==> Running cargo {}", args.join(" "));
    let status = Command::new("cargo").args(args).status()?;
    if !status.success() {
        anyhow::bail!("{what} failed");
    }
    Ok(())
}

fn run_fmt() -> Result<()> {
    cargo(&["fmt", "--all", "--", "--check"], "cargo fmt check")
}

fn run_clippy() -> Result<()> {
    cargo(
        &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
        "cargo clippy",
    )
}

fn run_tests() -> Result<()> {
    cargo(&["test", "--workspace"], "cargo test")
}

fn run_doc() -> Result<()> {
    cargo(&["doc", "--workspace", "--no-deps"], "cargo doc")
}

fn run_scenarios(dir: &Path) -> Result<()> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("reading {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "yaml"))
        .collect();
    files.sort();
    if files.is_empty() {
        anyhow::bail!("no scenarios found in {}", dir.display());
    }

    let mut failed = Vec::new();
    for file in &files {
        let path = file.to_string_lossy();
        let ok = cargo(
            &["run", "--quiet", "-p", "augury-cli", "--", "run", &path],
            "scenario",
        )
        .is_ok();
        if !ok {
            failed.push(path.into_owned());
        }
    }
    if !failed.is_empty() {
        anyhow::bail!("{} scenario(s) failed: {}", failed.len(), failed.join(", "));
    }
    println!("==> {} scenario(s) passed", files.len());
    Ok(())
}
