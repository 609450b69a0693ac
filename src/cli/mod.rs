//! CLI support for stencil-lang
//!
//! Provides programmatic access to stencil CLI functionality for embedding
//! in other tools.

mod render;

pub use render::{execute_check, execute_render, execute_tokens, RenderOptions};

use std::io;

/// Errors that can occur during CLI operations
#[derive(Debug)]
pub enum CliError {
    /// Lexer error
    Lex(crate::LexError),
    /// Parser error
    Parse(crate::ParseError),
    /// Rendering error
    Render(crate::RenderError),
    /// JSON parsing error
    Json(serde_json::Error),
    /// IO error
    Io(io::Error),
    /// No data provided
    NoInput,
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Lex(e) => write!(f, "Syntax error: {}", e),
            CliError::Parse(e) => write!(f, "Parse error: {}", e),
            CliError::Render(e) => write!(f, "Render error: {}", e),
            CliError::Json(e) => write!(f, "Invalid JSON: {}", e),
            CliError::Io(e) => write!(f, "IO error: {}", e),
            CliError::NoInput => write!(f, "No data provided. Use --data or pipe JSON to stdin."),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Lex(e) => Some(e),
            CliError::Parse(e) => Some(e),
            CliError::Render(e) => Some(e),
            CliError::Json(e) => Some(e),
            CliError::Io(e) => Some(e),
            CliError::NoInput => None,
        }
    }
}

impl From<crate::LexError> for CliError {
    fn from(e: crate::LexError) -> Self {
        CliError::Lex(e)
    }
}

impl From<crate::ParseError> for CliError {
    fn from(e: crate::ParseError) -> Self {
        CliError::Parse(e)
    }
}

impl From<crate::RenderError> for CliError {
    fn from(e: crate::RenderError) -> Self {
        CliError::Render(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Json(e)
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e)
    }
}
