//! Build-time, syntactic errors (spec.md section 7): malformed JSON,
//! unknown operation tags, and fixed-arity mismatches. Graph-structural
//! errors (cycles, duplicate ids, funnel uniqueness...) are
//! `zigdag_check::CheckError`, surfaced through [`LoaderError::Structural`].

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("malformed JSON at byte offset {offset}: {message}")]
    ParseError { offset: usize, message: String },

    #[error("node '{node_id}': unknown operation '{value}'")]
    UnknownOperation { node_id: String, value: String },

    #[error("node '{node_id}': {kind} expects {expected} operand(s), got {actual}")]
    ArityMismatch {
        node_id: String,
        kind: &'static str,
        expected: &'static str,
        actual: usize,
    },

    #[error(transparent)]
    Structural(#[from] zigdag_check::CheckError),
}
