pub mod ast;
pub mod lexer;
pub mod parser;
pub mod render;
pub mod value;

#[cfg(feature = "cli")]
pub mod cli;

pub use ast::{ActionBody, Expr, Node, Template, Token};
pub use lexer::{LexError, Lexer, State};
pub use parser::{ParseError, Parser};
pub use render::{RenderError, Renderer};
pub use value::Value;
