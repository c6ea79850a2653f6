//! Host-language binding emitter (spec.md section 4.5): reads the same
//! JSON model `zigdag-loader` parses and emits a typed Python package
//! wrapping the compiled shared library.
//!
//! Like `zigdag-loader`, this crate is a build-host tool: `xtask` runs its
//! binary (or calls [`emit_package`] directly) after the FFI library has
//! been built, then copies the shared library into the emitted package's
//! `zigdag/` data directory (spec.md section 4.6 step 5).

pub mod engine;
pub mod error;
pub mod inputs;
pub mod manifest;
pub mod package;
pub mod types;

use std::path::{Path, PathBuf};

pub use error::PybindError;
pub use package::PackagePlan;

/// Parses `model_json`, validates it, and writes the typed package under
/// `out_dir`. Returns the package's root directory.
pub fn emit_package(model_json: &str, out_dir: &Path) -> Result<PathBuf, PybindError> {
    let model = zigdag_loader::parse::parse_model(model_json)?;
    let graph = zigdag_loader::parse::build_graph(&model)?;
    let (plan, _warnings) = zigdag_check::validate(&graph)?;
    let package_plan = PackagePlan::build(&model, &graph, &plan);
    package::emit(&package_plan, out_dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO_1: &str = r#"{
        "name": "OpenPricing-Demo",
        "version": "0.1.0",
        "nodes": [
            {"id": "nome", "operation": "dynamic_input_str"},
            {"id": "discount", "operation": "dynamic_input_num"},
            {"id": "k", "operation": "conditional_value_input", "inputs": ["nome"],
             "conditional_values": {"tiago": 200, "ben": 400, "test": 100, "zefaria": 400}},
            {"id": "hundred", "operation": "constant_input_num", "constant_value": 100},
            {"id": "thirty_k", "operation": "constant_input_num", "constant_value": 30000},
            {"id": "prod", "operation": "multiply", "inputs": ["k", "hundred"]},
            {"id": "sum", "operation": "add", "inputs": ["prod", "thirty_k"]},
            {"id": "quot", "operation": "divide", "inputs": ["sum", "discount"]},
            {"id": "out", "operation": "funnel", "inputs": ["quot"]}
        ]
    }"#;

    #[test]
    fn emits_full_package_tree() {
        let dir = std::env::temp_dir().join(format!("zigdag-pybind-test-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        let root = emit_package(SCENARIO_1, &dir).unwrap();

        assert_eq!(root, dir.join("openpricing_demo"));
        assert!(root.join("pyproject.toml").exists());
        assert!(root.join("zigdag").is_dir());
        let pkg = root.join("openpricing_demo");
        assert!(pkg.join("__init__.py").exists());
        assert!(pkg.join("engine.py").exists());
        assert!(pkg.join("engine.pyi").exists());
        assert!(pkg.join("_types.py").exists());
        assert!(pkg.join("py.typed").exists());

        let types_src = std::fs::read_to_string(pkg.join("_types.py")).unwrap();
        assert!(types_src.contains("discount: float"));
        assert!(types_src.contains("nome: str"));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn rejects_invalid_model() {
        let dir = std::env::temp_dir().join(format!("zigdag-pybind-test-bad-{}", std::process::id()));
        let err = emit_package("not json", &dir);
        assert!(err.is_err());
    }
}
