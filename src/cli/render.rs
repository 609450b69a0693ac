//! Render stencil templates against JSON data

use super::CliError;
use crate::{ast::Token, lexer, Parser, Renderer, Value};

/// Options for the render command
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// The template text
    pub template: String,
    /// JSON data string
    pub data: Option<String>,
}

/// Execute a render operation
pub fn execute_render(options: &RenderOptions) -> Result<String, CliError> {
    let tokens = lexer::tokenize(&options.template)?;
    let mut parser = Parser::new(tokens);
    let template = parser.parse()?;

    let json_str = options.data.as_ref().ok_or(CliError::NoInput)?;
    let json_value: serde_json::Value = serde_json::from_str(json_str)?;
    let data = Value::from_json(json_value);

    let mut renderer = Renderer::new();
    let output = renderer.render(&template, &data)?;
    Ok(output)
}

/// Check a template for syntax errors without rendering it
pub fn execute_check(template: &str) -> Result<(), CliError> {
    let tokens = lexer::tokenize(template)?;
    let mut parser = Parser::new(tokens);
    parser.parse()?;
    Ok(())
}

/// Produce the token stream of a template (lexer inspection aid)
pub fn execute_tokens(template: &str) -> Result<Vec<Token>, CliError> {
    Ok(lexer::tokenize(template)?)
}
