//! The multi-stage build pipeline orchestration (spec section 4.6).
//!
//! Stage 1 (compiling the loader and running it against the JSON model) and
//! stage 2 (compiling the specialized executor against the generated
//! module) happen automatically inside `cargo build -p zigdag-ffi`, driven
//! by `zigdag-specialize/build.rs` -- `xtask` does not reimplement them, it
//! only shells out to `cargo` and then performs the steps that have no
//! natural home inside a single crate's `build.rs`: running the binding
//! emitter and copying the shared library into its package (stages 4-5).

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{bail, Context, Result};

use crate::target::Target;

fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("xtask must live at <workspace_root>/xtask")
        .to_path_buf()
}

fn model_path() -> PathBuf {
    env::var("ZIGDAG_MODEL")
        .map(PathBuf::from)
        .unwrap_or_else(|_| workspace_root().join("model.json"))
}

fn run(mut cmd: Command, label: &str) -> Result<()> {
    tracing::info!(?cmd, "{label}");
    let status = cmd.status().with_context(|| format!("spawning: {label}"))?;
    if !status.success() {
        bail!("{label} failed: {status}");
    }
    Ok(())
}

/// Stage 3: compile the FFI cdylib (and, transitively via stage 1-2's
/// `build.rs`, the loader and specialized executor) for `target`.
pub fn build_library(target: &Target) -> Result<()> {
    tracing::info!(target = ?target.triple, "building zigdag-ffi");
    let mut cmd = Command::new("cargo");
    cmd.current_dir(workspace_root());
    cmd.args(["build", "--release", "-p", "zigdag-ffi", "-p", "zigdag-bench"]);
    if let Some(triple) = &target.triple {
        cmd.args(["--target", triple]);
    }
    run(cmd, "cargo build (zigdag-ffi, zigdag-bench)")
}

/// Returns the path `cargo build --release [--target ...]` writes the
/// shared library to, for the given target.
fn built_library_path(target: &Target) -> PathBuf {
    let root = workspace_root();
    match &target.triple {
        Some(triple) => root.join("target").join(triple).join("release").join(&target.lib_name),
        None => root.join("target").join("release").join(&target.lib_name),
    }
}

/// Stages 4-5: run the binding emitter against the JSON model, then copy
/// the already-built shared library into the emitted package's `zigdag/`
/// data directory (spec section 4.6).
pub fn build_python_package(target: &Target) -> Result<PathBuf> {
    build_library(target)?;

    let root = workspace_root();
    let out_dir = root.join("target").join("python-package");
    let model = model_path();

    tracing::info!(model = %model.display(), out_dir = %out_dir.display(), "emitting python package");
    let mut cmd = Command::new("cargo");
    cmd.current_dir(&root);
    cmd.args([
        "run",
        "--release",
        "-p",
        "zigdag-pybind",
        "--",
        model.to_str().expect("model path must be valid UTF-8"),
        "--out-dir",
        out_dir.to_str().expect("out dir must be valid UTF-8"),
    ]);
    run(cmd, "cargo run -p zigdag-pybind")?;

    let package_name = package_name_from_model(&model)?;
    let package_root = out_dir.join(&package_name);
    let lib_src = built_library_path(target);
    let lib_dest_dir = package_root.join("zigdag");
    fs::create_dir_all(&lib_dest_dir)
        .with_context(|| format!("creating {}", lib_dest_dir.display()))?;
    let lib_dest = lib_dest_dir.join(&target.lib_name);
    fs::copy(&lib_src, &lib_dest).with_context(|| {
        format!(
            "copying built library {} to {}",
            lib_src.display(),
            lib_dest.display()
        )
    })?;

    tracing::info!(package = %package_root.display(), "python package ready");
    Ok(package_root)
}

fn package_name_from_model(model_path: &Path) -> Result<String> {
    let json = fs::read_to_string(model_path)
        .with_context(|| format!("reading model file {}", model_path.display()))?;
    let model: zigdag_core::ModelSchema =
        serde_json::from_str(&json).with_context(|| "parsing model JSON for package name")?;
    Ok(zigdag_core::sanitize_name(&model.name))
}

/// `xtask test`: run unit and FFI tests across the workspace (spec section
/// 6: "run unit and FFI tests").
pub fn run_tests() -> Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.current_dir(workspace_root());
    cmd.args(["test", "--workspace"]);
    run(cmd, "cargo test --workspace")
}

/// `xtask run`: run the benchmark executable (spec section 6).
pub fn run_benchmark() -> Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.current_dir(workspace_root());
    cmd.args(["run", "--release", "-p", "zigdag-bench"]);
    run(cmd, "cargo run -p zigdag-bench")
}

/// `xtask check`: compile every target (library, tests, benchmark) without
/// running, so the language server gets diagnostics for the
/// `build.rs`-generated module (spec section 4.6's "Editor support step").
pub fn run_check() -> Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.current_dir(workspace_root());
    cmd.args(["check", "--workspace", "--all-targets"]);
    run(cmd, "cargo check --workspace --all-targets")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn package_name_from_model_sanitizes() {
        let dir = std::env::temp_dir().join(format!("xtask-test-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let model_file = dir.join("model.json");
        fs::write(
            &model_file,
            r#"{"name": "Open-Pricing", "version": "0.1.0", "nodes": []}"#,
        )
        .unwrap();
        assert_eq!(package_name_from_model(&model_file).unwrap(), "open_pricing");
        fs::remove_dir_all(&dir).unwrap();
    }
}
