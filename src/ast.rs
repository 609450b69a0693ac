//! # Stencil Template Language - Abstract Syntax Tree
//!
//! This module defines the token and tree types for the Stencil template
//! language, a small directive syntax for embedding expressions in plain
//! text documents.
//!
//! ## Architecture Overview
//!
//! The AST module is organized into focused submodules:
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[expressions]** - Expression nodes (literals, references, calls, pipelines)
//! - **[template]** - Document structure (text runs and directive actions)
//!
//! ## Quick Start
//!
//! ```text
//! Hello {{ .name | upper }}!
//! ```
//!
//! This template greets whoever the data's `name` field says, uppercased.
//!
//! ## Core Concepts
//!
//! ### Directives
//!
//! A document is literal text with `{{ ... }}` directives embedded in it.
//! Each directive either emits a value or binds a variable:
//!
//! ```text
//! {{ $greeting := "Hello" }}{{ $greeting }}, {{ .name }}!
//! ```
//!
//! ### Trim Markers
//!
//! `{{- ` and ` -}}` additionally trim the whitespace touching the
//! directive, so templates can be indented for readability without the
//! indentation leaking into the output:
//!
//! ```text
//! before   {{- "x" -}}   after      renders as      beforexafter
//! ```
//!
//! ### Pipelines
//!
//! Stages are separated by `|`; each stage receives the previous result
//! as its final argument:
//!
//! ```text
//! {{ .title | trim | upper }}
//! ```
//!
//! ### References
//!
//! - `.name` - property of the data context (`.a.b` chains; bare `.` is
//!   the context itself)
//! - `$name` - a variable bound earlier with `:=`
//! - `name` - a built-in function
pub mod tokens;
pub mod expressions;
pub mod template;

pub use tokens::Token;
pub use expressions::Expr;
pub use template::{ActionBody, Node, Template};
