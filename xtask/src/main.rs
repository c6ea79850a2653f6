//! Build pipeline orchestrator (spec section 4.6): the single entry point
//! spec section 6's command table describes as `<build-tool>`.
//!
//! A `cargo xtask` binary plays the role the original engine's build tool
//! plays natively -- Cargo itself has no first-class notion of "run a
//! code generator, then a second code generator, then copy an artifact
//! into a typed package", so this crate is the orchestration layer that
//! chains the `cargo` invocations spec section 4.6 lists as steps 3-5
//! (steps 1-2 already happen inside `zigdag-specialize/build.rs`, which
//! Cargo runs automatically as part of any of the `cargo build` calls
//! below).

mod pipeline;
mod target;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use crate::target::Target;

#[derive(Parser)]
#[command(name = "xtask", about = "ZigDag build pipeline orchestrator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the library and benchmark executable, or the typed Python
    /// package (spec section 6: `build`, `build python-package[-<os>-<arch>]`).
    Build(BuildArgs),
    /// Run unit and FFI tests across the workspace.
    Test,
    /// Run the benchmark executable.
    Run,
    /// Compile every target (library, tests, benchmark) without running.
    Check,
}

#[derive(Args)]
struct BuildArgs {
    /// Omit for the library + benchmark build. Pass `python-package` for
    /// the host-target typed package, or `python-package-<os>-<arch>`
    /// (e.g. `python-package-linux-x86_64`) to cross-compile it.
    what: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Build(args) => run_build(args),
        Commands::Test => pipeline::run_tests(),
        Commands::Run => pipeline::run_benchmark(),
        Commands::Check => pipeline::run_check(),
    }
}

fn run_build(args: BuildArgs) -> Result<()> {
    match args.what.as_deref() {
        None => pipeline::build_library(&Target::host()),
        Some("python-package") => pipeline::build_python_package(&Target::host()).map(|_| ()),
        Some(other) => match other.strip_prefix("python-package-") {
            Some(os_arch) => {
                let target = Target::parse(os_arch)?;
                pipeline::build_python_package(&target).map(|_| ())
            }
            None => anyhow::bail!(
                "unknown build target '{other}'; expected 'python-package' or \
                 'python-package-<os>-<arch>'"
            ),
        },
    }
}
