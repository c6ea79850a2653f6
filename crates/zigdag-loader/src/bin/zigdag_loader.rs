//! Standalone CLI wrapper around `zigdag_loader::compile`.
//!
//! Used directly by `xtask`'s "check" step (to surface loader errors
//! without a full library build) and available for ad-hoc inspection of a
//! model file; the normal build path calls `zigdag_loader::compile` in
//! process from `zigdag-specialize/build.rs` rather than spawning this
//! binary.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

/// Compile a ZigDag JSON model into generated Rust source text.
#[derive(Parser)]
#[command(name = "zigdag-loader", about = "ZigDag JSON model loader/codegen")]
struct Cli {
    /// Path to the JSON model.
    model: PathBuf,

    /// Where to write the generated source. Prints to stdout if omitted.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let json = fs::read_to_string(&cli.model)
        .with_context(|| format!("reading model file {}", cli.model.display()))?;

    let (source, warnings) =
        zigdag_loader::compile(&json).with_context(|| "compiling JSON model")?;

    for warning in &warnings {
        eprintln!("warning: {warning:?}");
    }

    match cli.output {
        Some(path) => {
            fs::write(&path, source)
                .with_context(|| format!("writing generated source to {}", path.display()))?;
        }
        None => println!("{source}"),
    }

    Ok(())
}
