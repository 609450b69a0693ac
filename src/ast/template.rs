use crate::ast::Expr;

/// Complete parsed template.
///
/// Represents the full document as an ordered sequence of nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    /// Document nodes in source order
    pub nodes: Vec<Node>,
}

/// One segment of a template: literal text or a directive.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Literal document text, emitted as-is (modulo trim requests from
    /// neighboring actions)
    Text(String),

    /// A `{{ ... }}` directive
    ///
    /// # Example
    /// ```text
    /// {{- .name | upper }}
    /// ```
    Action {
        body: ActionBody,
        /// Opened with `{{- `: trim trailing whitespace of the preceding text
        trim_left: bool,
        /// Closed with ` -}}`: trim leading whitespace of the following text
        trim_right: bool,
    },
}

/// What a directive does when rendered.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionBody {
    /// Evaluate and write the result
    ///
    /// # Example
    /// ```text
    /// {{ .price }}
    /// ```
    Emit(Expr),

    /// Bind a variable; writes nothing
    ///
    /// # Examples
    /// ```text
    /// {{ $name := .user }}
    /// {{ $name = "other" }}
    /// ```
    Assign {
        name: String,
        /// True for `=` (rebind, the variable must exist); false for `:=`
        existing: bool,
        value: Expr,
    },
}
