use thiserror::Error;

/// A single diagnostic produced by one of the three translation stages.
///
/// Diagnostics are values: every stage collects them into a `Vec` and
/// returns them to its caller rather than printing from inside a parser or
/// pass. Only `main.rs` ever writes a diagnostic to stdout.
#[derive(Error, Debug, PartialEq, Clone)]
pub enum AssemblyError {
    #[error("line {line}: {reason}")]
    SyntaxError { line: usize, reason: String },

    #[error("line {line}: {reason}")]
    SemanticError { line: usize, reason: String },

    #[error("{reason}")]
    SemanticErrorNoLine { reason: String },

    #[error("{0}")]
    Io(String),
}
