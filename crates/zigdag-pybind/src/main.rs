//! CLI wrapper: reads a JSON model and writes the typed Python package
//! beside it. `xtask build python-package` invokes this binary; it can
//! also be run by hand for local inspection.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use zigdag_pybind::PybindError;

#[derive(Parser)]
#[command(name = "zigdag-pybind", about = "Emit a typed Python binding package from a ZigDag JSON model")]
struct Args {
    /// Path to the JSON model file.
    model: PathBuf,

    /// Directory the package tree is written under.
    #[arg(long, default_value = "target/python-package")]
    out_dir: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let json = fs::read_to_string(&args.model).map_err(|source| PybindError::ReadModel {
        path: args.model.clone(),
        source,
    })?;

    let root = zigdag_pybind::emit_package(&json, &args.out_dir)
        .with_context(|| format!("emitting python package under {}", args.out_dir.display()))?;

    println!("wrote python package to {}", root.display());
    Ok(())
}
