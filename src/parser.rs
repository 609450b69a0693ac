use crate::ast::{ActionBody, Expr, Node, Template, Token};
use std::fmt;
use std::mem;

/// Errors that can occur while building a template tree from tokens.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    /// A token the grammar does not admit at this point
    UnexpectedToken { found: Token, expected: &'static str },

    /// The token stream ended mid-construct
    UnexpectedEnd { expected: &'static str },

    /// A numeric literal that does not fit the target type
    InvalidNumber(String),

    /// An unknown backslash escape inside a string literal
    InvalidEscape(char),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::UnexpectedToken { found, expected } => {
                write!(f, "Unexpected token {:?}: expected {}", found, expected)
            }
            ParseError::UnexpectedEnd { expected } => {
                write!(f, "Unexpected end of template: expected {}", expected)
            }
            ParseError::InvalidNumber(raw) => {
                write!(f, "Invalid numeric literal '{}'", raw)
            }
            ParseError::InvalidEscape(ch) => {
                write!(f, "Invalid escape sequence '\\{}' in string literal", ch)
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// Recursive-descent parser over the lexer's token stream.
///
/// Grammar, inside a directive:
///
/// ```text
/// body       := assignment | pipeline
/// assignment := Variable Assignment pipeline
/// pipeline   := stage ( '|' stage )*
/// stage      := call | operand
/// call       := Function operand*
/// operand    := literal | variable chain | property chain | '(' pipeline ')'
/// ```
pub struct Parser {
    tokens: std::vec::IntoIter<Token>,
    current: Option<Token>,
    lookahead: Option<Token>,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        let mut tokens = tokens.into_iter();
        let current = tokens.next();
        let lookahead = tokens.next();
        Parser {
            tokens,
            current,
            lookahead,
        }
    }

    /// Take the current token and pull the cursor forward.
    fn advance(&mut self) -> Option<Token> {
        let next = mem::replace(&mut self.lookahead, self.tokens.next());
        mem::replace(&mut self.current, next)
    }

    fn current(&self) -> Option<&Token> {
        self.current.as_ref()
    }

    fn lookahead(&self) -> Option<&Token> {
        self.lookahead.as_ref()
    }

    /// Consume the current token into an error report.
    fn unexpected(&mut self, expected: &'static str) -> ParseError {
        match self.advance() {
            Some(found) => ParseError::UnexpectedToken { found, expected },
            None => ParseError::UnexpectedEnd { expected },
        }
    }

    /// Whether the current token can begin an operand.
    fn at_operand(&self) -> bool {
        matches!(
            self.current(),
            Some(Token::Integer(_))
                | Some(Token::Float(_))
                | Some(Token::String(_))
                | Some(Token::Variable(_))
                | Some(Token::PropertyAccess(_))
                | Some(Token::GroupOpen)
        )
    }

    /// Parse a complete template
    pub fn parse(&mut self) -> Result<Template, ParseError> {
        let mut nodes = Vec::new();

        while let Some(token) = self.advance() {
            match token {
                Token::Text(text) => nodes.push(Node::Text(text)),
                Token::OpenAction => nodes.push(self.parse_action(false)?),
                Token::TrimOpenAction => nodes.push(self.parse_action(true)?),
                found => {
                    return Err(ParseError::UnexpectedToken {
                        found,
                        expected: "document text or '{{'",
                    })
                }
            }
        }

        Ok(Template { nodes })
    }

    /// Parse one directive, the open token already consumed.
    fn parse_action(&mut self, trim_left: bool) -> Result<Node, ParseError> {
        let body = self.parse_body()?;

        match self.advance() {
            Some(Token::CloseAction) => Ok(Node::Action {
                body,
                trim_left,
                trim_right: false,
            }),
            Some(Token::TrimCloseAction) => Ok(Node::Action {
                body,
                trim_left,
                trim_right: true,
            }),
            Some(found) => Err(ParseError::UnexpectedToken {
                found,
                expected: "'}}'",
            }),
            None => Err(ParseError::UnexpectedEnd { expected: "'}}'" }),
        }
    }

    fn parse_body(&mut self) -> Result<ActionBody, ParseError> {
        // An assignment is a leading variable followed by `:=` or `=`;
        // anywhere else, a variable is an ordinary operand.
        if matches!(self.current(), Some(Token::Variable(_)))
            && matches!(self.lookahead(), Some(Token::Assignment { .. }))
        {
            let name = match self.advance() {
                Some(Token::Variable(name)) => name,
                _ => unreachable!(),
            };
            let existing = match self.advance() {
                Some(Token::Assignment { existing }) => existing,
                _ => unreachable!(),
            };
            let value = self.parse_pipeline()?;

            Ok(ActionBody::Assign {
                name,
                existing,
                value,
            })
        } else {
            Ok(ActionBody::Emit(self.parse_pipeline()?))
        }
    }

    fn parse_pipeline(&mut self) -> Result<Expr, ParseError> {
        let first = self.parse_stage(true)?;

        if !matches!(self.current(), Some(Token::Pipe)) {
            return Ok(first);
        }

        let mut stages = vec![first];
        while matches!(self.current(), Some(Token::Pipe)) {
            self.advance();
            stages.push(self.parse_stage(false)?);
        }

        Ok(Expr::Pipeline(stages))
    }

    fn parse_stage(&mut self, first: bool) -> Result<Expr, ParseError> {
        if matches!(self.current(), Some(Token::Function(_))) {
            let name = match self.advance() {
                Some(Token::Function(name)) => name,
                _ => unreachable!(),
            };
            return self.parse_call(name);
        }

        if !first {
            // Piped stages receive the previous value as an argument,
            // so they must be function calls.
            return Err(self.unexpected("a function name after '|'"));
        }

        let operand = self.parse_operand()?;
        if self.at_operand() {
            // Only calls take arguments.
            return Err(self.unexpected("'|' or '}}'"));
        }
        Ok(operand)
    }

    fn parse_call(&mut self, name: String) -> Result<Expr, ParseError> {
        let mut args = Vec::new();
        while self.at_operand() {
            args.push(self.parse_operand()?);
        }
        Ok(Expr::Call { name, args })
    }

    /// Parse operands (atoms): literal values, `$var`, `.property`, `(`
    fn parse_operand(&mut self) -> Result<Expr, ParseError> {
        match self.advance() {
            // Literals
            Some(Token::Integer(raw)) => raw
                .parse::<i64>()
                .map(Expr::Integer)
                .map_err(|_| ParseError::InvalidNumber(raw)),
            Some(Token::Float(raw)) => raw
                .parse::<f64>()
                .map(Expr::Float)
                .map_err(|_| ParseError::InvalidNumber(raw)),
            Some(Token::String(raw)) => Ok(Expr::String(decode_string(&raw)?)),

            // References
            Some(Token::Variable(name)) => self.parse_chain(Expr::Variable(name)),
            Some(Token::PropertyAccess(name)) if name.is_empty() => {
                if matches!(self.current(), Some(Token::PropertyAccess(_))) {
                    // `..x` - an empty segment cannot start a chain
                    return Err(ParseError::UnexpectedToken {
                        found: Token::PropertyAccess(name),
                        expected: "a property name after '.'",
                    });
                }
                Ok(Expr::Context)
            }
            Some(Token::PropertyAccess(name)) => self.parse_chain(Expr::Access {
                object: Box::new(Expr::Context),
                name,
            }),

            // Groups
            Some(Token::GroupOpen) => {
                let inner = self.parse_pipeline()?;
                match self.advance() {
                    Some(Token::GroupClose) => self.parse_chain(inner),
                    Some(found) => Err(ParseError::UnexpectedToken {
                        found,
                        expected: "')'",
                    }),
                    None => Err(ParseError::UnexpectedEnd { expected: "')'" }),
                }
            }

            Some(found) => Err(ParseError::UnexpectedToken {
                found,
                expected: "a value",
            }),
            None => Err(ParseError::UnexpectedEnd { expected: "a value" }),
        }
    }

    /// Attach trailing `.name` accesses to an expression.
    fn parse_chain(&mut self, mut expr: Expr) -> Result<Expr, ParseError> {
        while matches!(self.current(), Some(Token::PropertyAccess(_))) {
            match self.advance() {
                Some(Token::PropertyAccess(name)) => {
                    if name.is_empty() {
                        return Err(ParseError::UnexpectedToken {
                            found: Token::PropertyAccess(name),
                            expected: "a property name after '.'",
                        });
                    }
                    expr = Expr::Access {
                        object: Box::new(expr),
                        name,
                    };
                }
                _ => unreachable!(),
            }
        }
        Ok(expr)
    }
}

/// Resolve backslash escapes in a string literal's raw payload.
fn decode_string(raw: &str) -> Result<String, ParseError> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => return Err(ParseError::InvalidEscape(other)),
            // A trailing backslash cannot survive the lexer's quote
            // lookbehind; report the backslash itself.
            None => return Err(ParseError::InvalidEscape('\\')),
        }
    }

    Ok(out)
}
