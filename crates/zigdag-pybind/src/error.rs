//! Errors raised while turning a JSON model into a typed Python package.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PybindError {
    #[error("failed to read model file {path}: {source}")]
    ReadModel {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Loader(#[from] zigdag_loader::LoaderError),

    #[error(transparent)]
    Check(#[from] zigdag_check::CheckError),

    #[error("failed to write package file {path}: {source}")]
    WritePackage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
