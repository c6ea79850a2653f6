//! Parses the JSON model into the Node IR and emits the Rust source text
//! that becomes the specialized executor's generated module.
//!
//! This crate plays the role spec.md section 9's design notes assign to
//! "the code-generator binary": it is the only place that runs the
//! validator (`zigdag-check`) before the specialized executor's type ever
//! exists. `zigdag-specialize/build.rs` calls [`compile`] directly as a
//! build-dependency -- the Rust-idiomatic realization of "compile the
//! graph loader as a build-host executable; run it" (spec.md section 4.6),
//! since `build.rs` itself is exactly that: a program Cargo compiles for
//! and runs on the build host before the rest of the crate is compiled.

pub mod emit;
pub mod error;
pub mod parse;

pub use error::LoaderError;
pub use zigdag_check::CheckWarning;

/// Parses `json`, builds and validates the graph, and returns the
/// generated source text plus any non-fatal warnings.
///
/// This is the single entry point `build.rs` and the `zigdag-loader` CLI
/// both call.
pub fn compile(json: &str) -> Result<(String, Vec<CheckWarning>), LoaderError> {
    let model = parse::parse_model(json)?;
    let graph = parse::build_graph(&model)?;
    let (plan, warnings) = zigdag_check::validate(&graph)?;
    let source = emit::generate_source(&graph, &plan);
    Ok((source, warnings))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO_1: &str = r#"{
        "name": "pricing-demo",
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
    fn compiles_scenario_1_without_error() {
        let (source, warnings) = compile(SCENARIO_1).unwrap();
        assert!(warnings.is_empty());
        assert!(source.contains("pub fn evaluate"));
        assert!(source.contains("NODE_COUNT: usize = 9"));
    }

    #[test]
    fn rejects_model_with_cycle() {
        let json = r#"{
            "name": "cyclic",
            "version": "0.1.0",
            "nodes": [
                {"id": "x", "operation": "add", "inputs": ["y", "y"]},
                {"id": "y", "operation": "add", "inputs": ["x", "x"]},
                {"id": "f", "operation": "funnel", "inputs": ["x"]}
            ]
        }"#;
        let err = compile(json).unwrap_err();
        assert!(matches!(
            err,
            LoaderError::Structural(zigdag_check::CheckError::Cycle { .. })
        ));
    }
}
