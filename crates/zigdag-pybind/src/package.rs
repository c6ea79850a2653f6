//! Lays out the generated package on disk (spec.md section 6's directory
//! tree) and writes each emitted file.
//!
//! Layout, rooted at `<out_dir>/<package_name>/`:
//!
//! ```text
//! <package_name>/pyproject.toml
//! <package_name>/<package_name>/__init__.py
//! <package_name>/<package_name>/engine.py
//! <package_name>/<package_name>/engine.pyi
//! <package_name>/<package_name>/_types.py
//! <package_name>/<package_name>/py.typed
//! <package_name>/zigdag/                   (xtask copies libzigdag.<suffix> here)
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use zigdag_core::{sanitize_name, Graph, ModelSchema};

use crate::engine;
use crate::error::PybindError;
use crate::inputs::{self, PyInput};
use crate::manifest;
use crate::types;

/// Everything needed to emit the package, gathered once up front.
pub struct PackagePlan {
    pub package_name: String,
    pub version: String,
    pub inputs: Vec<PyInput>,
}

impl PackagePlan {
    pub fn build(model: &ModelSchema, graph: &Graph, plan: &zigdag_check::Plan) -> Self {
        PackagePlan {
            package_name: sanitize_name(&model.name),
            version: model.version.clone(),
            inputs: inputs::collect(graph, plan),
        }
    }
}

/// Writes the full package tree under `out_dir`. Returns the package's root
/// directory (`<out_dir>/<package_name>`).
pub fn emit(plan: &PackagePlan, out_dir: &Path) -> Result<PathBuf, PybindError> {
    let root = out_dir.join(&plan.package_name);
    let pkg_dir = root.join(&plan.package_name);
    let lib_dir = root.join("zigdag");

    create_dir(&pkg_dir)?;
    create_dir(&lib_dir)?;

    write_file(&root.join("pyproject.toml"), &manifest::render(&plan.package_name, &plan.version))?;
    write_file(&pkg_dir.join("__init__.py"), &render_init(&plan.package_name))?;
    write_file(&pkg_dir.join("_types.py"), &types::render(&plan.inputs))?;
    write_file(&pkg_dir.join("engine.py"), &engine::render_module(&plan.package_name))?;
    write_file(&pkg_dir.join("engine.pyi"), &engine::render_stub())?;
    write_file(&pkg_dir.join("py.typed"), "")?;

    Ok(root)
}

fn render_init(package_name: &str) -> String {
    format!(
        "\"\"\"Typed bindings for the {package_name} compute graph.\"\"\"\n\
         from .engine import Engine, ZigDagError\n\
         from ._types import (\n\
         \u{20}   CalculateBatchInputs,\n\
         \u{20}   CalculateInputs,\n\
         \u{20}   INPUT_IDS,\n\
         \u{20}   NUMERIC_INPUT_IDS,\n\
         \u{20}   STRING_INPUT_IDS,\n\
         )\n\n\
         __all__ = [\n\
         \u{20}   \"Engine\",\n\
         \u{20}   \"ZigDagError\",\n\
         \u{20}   \"CalculateInputs\",\n\
         \u{20}   \"CalculateBatchInputs\",\n\
         \u{20}   \"INPUT_IDS\",\n\
         \u{20}   \"NUMERIC_INPUT_IDS\",\n\
         \u{20}   \"STRING_INPUT_IDS\",\n\
         ]\n",
    )
}

fn create_dir(dir: &Path) -> Result<(), PybindError> {
    fs::create_dir_all(dir).map_err(|source| PybindError::WritePackage {
        path: dir.to_path_buf(),
        source,
    })
}

fn write_file(path: &Path, contents: &str) -> Result<(), PybindError> {
    fs::write(path, contents).map_err(|source| PybindError::WritePackage {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_exports_engine_and_types() {
        let src = render_init("openpricing_demo");
        assert!(src.contains("from .engine import Engine, ZigDagError"));
        assert!(src.contains("NUMERIC_INPUT_IDS"));
    }
}
