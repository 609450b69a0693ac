/// Abstract Syntax Tree node representing a parsed directive expression.
///
/// The AST is the internal representation of a directive body after
/// parsing. It captures the structure and meaning of the expression for
/// rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    // Literals
    /// Literal integer
    ///
    /// # Example
    /// ```text
    /// {{ 42 }}
    /// ```
    Integer(i64),

    /// Literal floating point number
    ///
    /// # Example
    /// ```text
    /// {{ -12.5 }}
    /// ```
    Float(f64),

    /// String literal, escape sequences decoded
    ///
    /// # Example
    /// ```text
    /// {{ "hello" }}
    /// ```
    String(String),

    // References
    /// The data context itself (a bare `.`)
    Context,

    /// Named variable reference (`$name`)
    ///
    /// # Example
    /// ```text
    /// {{ $user }}
    /// ```
    Variable(String),

    /// Property access on an object
    ///
    /// Chains nest leftward: `.a.b` parses to
    /// `Access { object: Access { object: Context, name: "a" }, name: "b" }`.
    ///
    /// # Examples
    /// ```text
    /// {{ .name }}
    /// {{ $user.name }}
    /// ```
    Access {
        object: Box<Expr>,
        name: String,
    },

    // Operations
    /// Call of a named function with zero or more arguments
    ///
    /// # Examples
    /// ```text
    /// {{ upper .name }}
    /// {{ contains "lo" .greeting }}
    /// ```
    Call {
        name: String,
        args: Vec<Expr>,
    },

    /// Pipeline of two or more stages
    ///
    /// Each stage after the first receives the previous result as its
    /// final argument.
    ///
    /// # Example
    /// ```text
    /// {{ .name | trim | upper }}
    /// ```
    Pipeline(Vec<Expr>),
}
