//! Runs the graph loader during this crate's own build and writes the
//! generated executor source module.
//!
//! This is the Rust realization of spec.md section 4.6 step 1 ("Compile
//! the graph loader as a build-host executable; run it with the JSON
//! model"): `build.rs` is itself compiled for and executed on the build
//! host by Cargo, and `zigdag-loader` is a build-dependency called
//! in-process here rather than spawned as a subprocess (the same pattern
//! `thru-grpc-client/build.rs` uses for its protobuf codegen step).

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::exit;

fn model_path() -> PathBuf {
    if let Ok(path) = env::var("ZIGDAG_MODEL") {
        return PathBuf::from(path);
    }
    // Walk up from this crate to the workspace root's default model file.
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());
    manifest_dir
        .parent() // crates/
        .and_then(Path::parent) // workspace root
        .expect("zigdag-specialize must live at <workspace_root>/crates/zigdag-specialize")
        .join("model.json")
}

fn main() {
    let model_path = model_path();
    println!("cargo:rerun-if-env-changed=ZIGDAG_MODEL");
    println!("cargo:rerun-if-changed={}", model_path.display());
    println!("cargo:rerun-if-changed=build.rs");

    let json = match fs::read_to_string(&model_path) {
        Ok(j) => j,
        Err(err) => {
            eprintln!(
                "zigdag-specialize: failed to read model file {}: {err}",
                model_path.display()
            );
            exit(1);
        }
    };

    let (source, warnings) = match zigdag_loader::compile(&json) {
        Ok(result) => result,
        Err(err) => {
            eprintln!("zigdag-specialize: model compilation failed: {err}");
            exit(1);
        }
    };

    for warning in &warnings {
        println!("cargo:warning={warning:?}");
    }

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let dest = out_dir.join("generated_nodes.rs");
    fs::write(&dest, source).expect("failed to write generated executor source");
}
