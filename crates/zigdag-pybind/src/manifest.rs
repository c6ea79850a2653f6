//! Emits the package manifest (spec.md section 4.5's sixth bullet): a
//! `pyproject.toml` declaring the package name and version, matching the
//! name/version the JSON model itself carries (spec.md section 6).

pub fn render(package_name: &str, version: &str) -> String {
    format!(
        r#"[project]
name = "{package_name}"
version = "{version}"
description = "Generated typed bindings for the {package_name} compute graph"
requires-python = ">=3.9"

[tool.setuptools]
packages = ["{package_name}"]

[tool.setuptools.package-data]
"{package_name}" = ["py.typed"]
"zigdag" = ["libzigdag.*"]
"#,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embeds_name_and_version() {
        let src = render("openpricing_demo", "0.1.0");
        assert!(src.contains(r#"name = "openpricing_demo""#));
        assert!(src.contains(r#"version = "0.1.0""#));
    }
}
