//! `<os>-<arch>` to Rust target-triple mapping for
//! `build python-package-<os>-<arch>` (spec section 4.6's cross-compilation
//! command), plus the shared-library suffix each triple resolves to (spec
//! section 6: `libzigdag.so` on ELF targets, `libzigdag.dylib` on Mach-O).

use anyhow::{bail, Result};

/// A resolved cross-compilation target: the `cargo build --target` triple
/// and the shared-library filename it produces.
pub struct Target {
    pub triple: Option<String>,
    pub lib_name: String,
}

impl Target {
    /// The build host's own target: no `--target` flag, native lib suffix.
    pub fn host() -> Self {
        Target {
            triple: None,
            lib_name: host_lib_name(),
        }
    }

    /// Resolves an `<os>-<arch>` pair (as it appears after
    /// `python-package-` in spec section 6's command table) into a Rust
    /// target triple and the library name that triple produces.
    pub fn parse(os_arch: &str) -> Result<Self> {
        let (triple, lib_name) = match os_arch {
            "linux-x86_64" => ("x86_64-unknown-linux-gnu", "libzigdag.so"),
            "linux-aarch64" => ("aarch64-unknown-linux-gnu", "libzigdag.so"),
            "macos-x86_64" => ("x86_64-apple-darwin", "libzigdag.dylib"),
            "macos-aarch64" => ("aarch64-apple-darwin", "libzigdag.dylib"),
            "windows-x86_64" => ("x86_64-pc-windows-msvc", "zigdag.dll"),
            other => bail!(
                "unknown cross-compilation target '{other}'; expected one of \
                 linux-x86_64, linux-aarch64, macos-x86_64, macos-aarch64, windows-x86_64"
            ),
        };
        Ok(Target {
            triple: Some(triple.to_string()),
            lib_name: lib_name.to_string(),
        })
    }
}

#[cfg(target_os = "macos")]
fn host_lib_name() -> String {
    "libzigdag.dylib".to_string()
}

#[cfg(target_os = "windows")]
fn host_lib_name() -> String {
    "zigdag.dll".to_string()
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn host_lib_name() -> String {
    "libzigdag.so".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_targets() {
        let t = Target::parse("macos-aarch64").unwrap();
        assert_eq!(t.triple.as_deref(), Some("aarch64-apple-darwin"));
        assert_eq!(t.lib_name, "libzigdag.dylib");
    }

    #[test]
    fn rejects_unknown_target() {
        assert!(Target::parse("amiga-m68k").is_err());
    }
}
