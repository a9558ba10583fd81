use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::Command;

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace automation for walkroom")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all checks: fmt, clippy, tests, doc
    Check,
    /// Run cargo fmt --check on all crates
    Fmt,
    /// Run clippy on all crates
    Clippy,
    /// Run all tests
    Test,
    /// Build rustdoc for the workspace
    Doc,
    /// Build the entire workspace
    Build,
    /// Launch the desktop app
    Run {
        /// Texture directory passed to the app
        #[arg(long, default_value = "./assets")]
        assets: String,
    },
    /// Replay a short scripted walk and print where it ends
    Walk,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => {
            run_fmt()?;
            run_clippy()?;
            run_tests()?;
            run_doc()?;
        }
        Commands::Fmt => run_fmt()?,
        Commands::Clippy => run_clippy()?,
        Commands::Test => run_tests()?,
        Commands::Doc => run_doc()?,
        Commands::Build => cargo("cargo build", &["build", "--workspace"])?,
        Commands::Run { assets } => cargo(
            "walkroom-desktop",
            &["run", "-p", "walkroom-desktop", "--", "--assets", &assets],
        )?,
        Commands::Walk => cargo(
            "walkroom-cli walk",
            &[
                "run", "-p", "walkroom-cli", "--", "walk", "--keys", "w*60,d*30,*30",
            ],
        )?,
    }

    Ok(())
}

fn run_fmt() -> Result<()> {
    cargo("cargo fmt --check", &["fmt", "--all", "--", "--check"])
}

fn run_clippy() -> Result<()> {
    cargo(
        "cargo clippy",
        &[
            "clippy",
            "--workspace",
            "--all-targets",
            "--",
            "-D",
            "warnings",
        ],
    )
}

fn run_tests() -> Result<()> {
    cargo("cargo test", &["test", "--workspace"])
}

fn run_doc() -> Result<()> {
    cargo("cargo doc", &["doc", "--workspace", "--no-deps"])
}

fn cargo(step: &str, args: &[&str]) -> Result<()> {
    println!("==> Running {step}");
    let status = Command::new("cargo").args(args).status()?;
    if !status.success() {
        anyhow::bail!("{step} failed");
    }
    Ok(())
}
