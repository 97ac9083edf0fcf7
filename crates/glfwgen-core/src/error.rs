//! Error types for glfwgen

use thiserror::Error;

/// glfwgen error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid macro name: {0:?}")]
    InvalidName(String),

    #[error("unknown platform: {0}")]
    UnknownPlatform(String),

    #[error("directive syntax error at line {line}: {message}")]
    DirectiveSyntax { line: usize, message: String },

    #[error("include depth exceeded ({0}) while resolving {1:?}")]
    IncludeDepthExceeded(usize, String),

    #[error("template header not found: {0}")]
    TemplateNotFound(String),

    #[error("macro {name} redefined with conflicting replacement at line {line}")]
    MacroRedefinition { name: String, line: usize },
}

impl Error {
    /// Shorthand for a [`Error::DirectiveSyntax`] at a given source line
    pub fn directive(line: usize, message: impl Into<String>) -> Self {
        Error::DirectiveSyntax {
            line,
            message: message.into(),
        }
    }
}

/// Result type alias for glfwgen
pub type Result<T> = std::result::Result<T, Error>;
