/// A single lexical token produced by the lexer.
///
/// Tokens are immutable tagged values. The lexer emits them in document
/// order; concatenating them back (modulo the whitespace the trim markers
/// and directive interiors deliberately drop) reproduces the input.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Document structure
    /// Literal document text outside any directive.
    ///
    /// Never empty: runs of zero characters are elided entirely.
    Text(String),

    /// Start of a directive region (`{{`).
    OpenAction,

    /// Start of a directive region with a trim marker (`{{- `).
    ///
    /// Requests that trailing whitespace of the preceding [`Token::Text`]
    /// be trimmed by the renderer.
    TrimOpenAction,

    /// End of a directive region (`}}`).
    CloseAction,

    /// End of a directive region with a trim marker (` -}}`).
    ///
    /// Requests that leading whitespace of the following [`Token::Text`]
    /// be trimmed by the renderer.
    TrimCloseAction,

    // Literals
    /// Integer literal, kept as the digit string that was written.
    ///
    /// A leading minus sign is included when present. Parsing to a machine
    /// integer happens in the parser, not here.
    ///
    /// # Examples
    /// ```text
    /// 42
    /// -17
    /// ```
    Integer(String),

    /// Float literal, kept as written: digits, one dot, more digits.
    ///
    /// # Examples
    /// ```text
    /// 3.15
    /// -12.5
    /// ```
    Float(String),

    /// String literal's inner content, excluding the surrounding quotes.
    ///
    /// Backslash escapes are preserved verbatim; decoding them is the
    /// parser's job.
    ///
    /// # Examples
    /// ```text
    /// "hello"   -> String("hello")
    /// "a\"b"    -> String("a\\\"b")
    /// ```
    String(String),

    // Identifiers
    /// Variable reference, written `$name`.
    ///
    /// The payload is the name without the `$` sigil.
    ///
    /// # Examples
    /// ```text
    /// $user
    /// $x
    /// ```
    Variable(String),

    /// One segment of a property access, written `.name`.
    ///
    /// Chains like `.a.b.c` produce one token per segment. A bare `.`
    /// produces an empty payload and refers to the current context value.
    ///
    /// # Examples
    /// ```text
    /// .Values
    /// .enabled
    /// ```
    PropertyAccess(String),

    /// Bare identifier used as a callable name.
    ///
    /// # Examples
    /// ```text
    /// upper
    /// printf
    /// ```
    Function(String),

    // Structure inside a directive
    /// Pipeline separator.
    ///
    /// # Examples
    /// ```text
    /// {{ .name | upper }}
    /// ```
    Pipe,

    /// Opening parenthesis for a sub-expression.
    GroupOpen,

    /// Closing parenthesis.
    GroupClose,

    /// Assignment operator.
    ///
    /// `existing` is false for `:=` (create a new binding) and true for
    /// `=` (rebind a name that must already exist).
    ///
    /// # Examples
    /// ```text
    /// {{ $x := 5 }}
    /// {{ $x = 6 }}
    /// ```
    Assignment {
        existing: bool,
    },
}
