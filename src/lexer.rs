//! Tokenizer for template text with embedded `{{ ... }}` directives.
//!
//! The lexer is a single-pass finite state machine: one mutable state tag,
//! one accumulation buffer, one character of lookahead/lookbehind for the
//! multi-character delimiters (`{{`, `}}`, `{{- `, ` -}}`). It classifies
//! characters and never interprets them — escape sequences, numeric
//! parsing, and expression structure are all downstream concerns.

use std::fmt;
use std::mem;

use crate::ast::Token;

/// The mode the state machine is in.
///
/// Public because [`LexError`] names the state that rejected the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Outside any directive. Initial and only accepting state.
    Text,
    /// Inside a directive, between tokens; dispatches to the states below.
    Unknown,
    /// Accumulating an integer literal.
    Integer,
    /// Saw the decimal point; a digit must follow.
    FloatCandidate,
    /// Accumulating the fractional digits of a float literal.
    Float,
    /// Saw `-`; a digit must follow.
    Dash,
    /// Inside a quoted string literal.
    Str,
    /// Saw `$`; an alphabetic character must follow.
    VariableCandidate,
    /// Accumulating a variable name.
    Variable,
    /// Accumulating a property name after `.`.
    PropertyAccess,
    /// Accumulating a bare identifier used as a function name.
    Function,
    /// Saw `:`; only `=` may follow.
    AssignmentCandidate,
    /// After an assignment operator, skipping spaces before the value.
    ValueStart,
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            State::Text => "document text",
            State::Unknown => "directive expression",
            State::Integer => "integer literal",
            State::FloatCandidate => "float literal (after the decimal point)",
            State::Float => "float literal",
            State::Dash => "negative number literal",
            State::Str => "string literal",
            State::VariableCandidate => "variable name (after '$')",
            State::Variable => "variable name",
            State::PropertyAccess => "property name",
            State::Function => "function name",
            State::AssignmentCandidate => "assignment operator",
            State::ValueStart => "assignment value",
        };
        write!(f, "{}", name)
    }
}

/// Errors produced while tokenizing.
///
/// All are fatal: the lexer reports the first malformed construct and
/// stops. Offsets count characters from the start of the input.
#[derive(Debug, Clone, PartialEq)]
pub enum LexError {
    /// The active state's grammar does not admit the character.
    UnexpectedCharacter { ch: char, state: State, offset: usize },

    /// Input ended inside a directive, string, or partial token.
    ///
    /// The offset is where the input ended.
    UnterminatedConstruct { state: State, offset: usize },

    /// `:` without a following `=`, or no valid value after an
    /// assignment operator.
    MalformedAssignment { ch: char, state: State, offset: usize },
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexError::UnexpectedCharacter { ch, state, offset } => {
                write!(f, "Unexpected character '{}' in {} at offset {}", ch, state, offset)
            }
            LexError::UnterminatedConstruct { state, offset } => {
                write!(f, "Unexpected end of input: unterminated {} at offset {}", state, offset)
            }
            LexError::MalformedAssignment { ch, state, offset } => {
                if *state == State::AssignmentCandidate {
                    write!(
                        f,
                        "Malformed assignment at offset {}: expected '=' after ':' (did you mean ':='?), found '{}'",
                        offset, ch
                    )
                } else {
                    write!(
                        f,
                        "Malformed assignment at offset {}: '{}' cannot start an assignment value",
                        offset, ch
                    )
                }
            }
        }
    }
}

impl std::error::Error for LexError {}

/// Characters that end identifier/literal accumulation without being part
/// of it. The terminator is re-presented to [`State::Unknown`].
fn is_terminator(ch: char) -> bool {
    matches!(ch, ' ' | '.' | '}' | ')' | '|')
}

/// Characters allowed in a property name (`.some_key`, `.some-key`).
fn is_property_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '-'
}

/// How a step moves the cursor.
#[derive(Debug, Clone, Copy)]
enum Cursor {
    /// Consume `n` characters.
    Advance(usize),
    /// Re-present the current character to the next state (pushback).
    Hold,
}

/// The outcome of examining one character: the next state, at most one
/// completed token, and a cursor action.
struct Step {
    next: State,
    token: Option<Token>,
    cursor: Cursor,
}

impl Step {
    fn advance(next: State) -> Self {
        Step { next, token: None, cursor: Cursor::Advance(1) }
    }

    fn advance_by(next: State, n: usize) -> Self {
        Step { next, token: None, cursor: Cursor::Advance(n) }
    }

    fn hold(next: State) -> Self {
        Step { next, token: None, cursor: Cursor::Hold }
    }

    fn emit(mut self, token: Token) -> Self {
        self.token = Some(token);
        self
    }
}

/// Single-shot tokenizer. All state is local to one [`Lexer::tokenize`]
/// call; independent inputs can be tokenized concurrently.
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    state: State,
    buffer: String,
    tokens: Vec<Token>,
}

/// Tokenize a template in one left-to-right pass.
///
/// Convenience for `Lexer::new(input).tokenize()`.
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(input).tokenize()
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
            state: State::Text,
            buffer: String::new(),
            tokens: Vec::new(),
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    /// Run the state machine over the whole input.
    pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        while let Some(ch) = self.current_char() {
            let step = match self.state {
                State::Text => self.lex_text(ch),
                State::Unknown => self.lex_unknown(ch),
                State::Integer => self.lex_integer(ch),
                State::FloatCandidate => self.lex_float_candidate(ch),
                State::Float => self.lex_float(ch),
                State::Dash => self.lex_dash(ch),
                State::Str => self.lex_str(ch),
                State::VariableCandidate => self.lex_variable_candidate(ch),
                State::Variable => self.lex_variable(ch),
                State::PropertyAccess => self.lex_property_access(ch),
                State::Function => self.lex_function(ch),
                State::AssignmentCandidate => self.lex_assignment_candidate(ch),
                State::ValueStart => self.lex_value_start(ch),
            }?;

            self.state = step.next;
            if let Some(token) = step.token {
                self.tokens.push(token);
            }
            match step.cursor {
                Cursor::Advance(n) => self.position += n,
                Cursor::Hold => {}
            }
        }

        self.finish()
    }

    /// End-of-input handling. Only [`State::Text`] accepts.
    fn finish(mut self) -> Result<Vec<Token>, LexError> {
        match self.state {
            State::Text => {
                self.flush_text();
                Ok(self.tokens)
            }
            state => Err(LexError::UnterminatedConstruct { state, offset: self.position }),
        }
    }

    /// Emit accumulated document text, if any. Empty runs are elided.
    fn flush_text(&mut self) {
        if !self.buffer.is_empty() {
            let text = mem::take(&mut self.buffer);
            self.tokens.push(Token::Text(text));
        }
    }

    fn take_buffer(&mut self) -> String {
        mem::take(&mut self.buffer)
    }

    fn unexpected(&self, ch: char) -> LexError {
        LexError::UnexpectedCharacter { ch, state: self.state, offset: self.position }
    }

    /// The four-character trim-close window ` -}}`, checked from a space.
    fn at_trim_close(&self) -> bool {
        self.peek_char(1) == Some('-')
            && self.peek_char(2) == Some('}')
            && self.peek_char(3) == Some('}')
    }

    fn lex_text(&mut self, ch: char) -> Result<Step, LexError> {
        if ch == '{' && self.peek_char(1) == Some('{') {
            self.flush_text();
            // `{{- ` (dash then space) is the trim variant and consumes
            // all four characters; otherwise only the two braces.
            if self.peek_char(2) == Some('-') && self.peek_char(3) == Some(' ') {
                Ok(Step::advance_by(State::Unknown, 4).emit(Token::TrimOpenAction))
            } else {
                Ok(Step::advance_by(State::Unknown, 2).emit(Token::OpenAction))
            }
        } else {
            self.buffer.push(ch);
            Ok(Step::advance(State::Text))
        }
    }

    fn lex_unknown(&mut self, ch: char) -> Result<Step, LexError> {
        match ch {
            // The trim-close check must run before the space is discarded
            // and before any other reading of '-'.
            ' ' if self.at_trim_close() => {
                Ok(Step::advance_by(State::Text, 4).emit(Token::TrimCloseAction))
            }
            ' ' => Ok(Step::advance(State::Unknown)),
            '}' => {
                if self.peek_char(1) == Some('}') {
                    Ok(Step::advance_by(State::Text, 2).emit(Token::CloseAction))
                } else {
                    Err(self.unexpected(ch))
                }
            }
            '(' => Ok(Step::advance(State::Unknown).emit(Token::GroupOpen)),
            ')' => Ok(Step::advance(State::Unknown).emit(Token::GroupClose)),
            '|' => Ok(Step::advance(State::Unknown).emit(Token::Pipe)),
            '"' => Ok(Step::advance(State::Str)),
            '$' => Ok(Step::advance(State::VariableCandidate)),
            '.' => Ok(Step::advance(State::PropertyAccess)),
            ':' => Ok(Step::advance(State::AssignmentCandidate)),
            '=' => {
                Ok(Step::advance(State::ValueStart).emit(Token::Assignment { existing: true }))
            }
            '-' => {
                self.buffer.push('-');
                Ok(Step::advance(State::Dash))
            }
            c if c.is_ascii_digit() => Ok(Step::hold(State::Integer)),
            c if c.is_ascii_alphabetic() => Ok(Step::hold(State::Function)),
            _ => Err(self.unexpected(ch)),
        }
    }

    fn lex_integer(&mut self, ch: char) -> Result<Step, LexError> {
        if ch.is_ascii_digit() {
            self.buffer.push(ch);
            Ok(Step::advance(State::Integer))
        } else if ch == '.' {
            // Dot before the terminator check: it moves the literal toward
            // a float rather than ending it.
            self.buffer.push(ch);
            Ok(Step::advance(State::FloatCandidate))
        } else if is_terminator(ch) {
            let literal = self.take_buffer();
            Ok(Step::hold(State::Unknown).emit(Token::Integer(literal)))
        } else {
            Err(self.unexpected(ch))
        }
    }

    fn lex_float_candidate(&mut self, ch: char) -> Result<Step, LexError> {
        if ch.is_ascii_digit() {
            Ok(Step::hold(State::Float))
        } else {
            Err(self.unexpected(ch))
        }
    }

    fn lex_float(&mut self, ch: char) -> Result<Step, LexError> {
        if ch.is_ascii_digit() {
            self.buffer.push(ch);
            Ok(Step::advance(State::Float))
        } else if is_terminator(ch) {
            let literal = self.take_buffer();
            Ok(Step::hold(State::Unknown).emit(Token::Float(literal)))
        } else {
            Err(self.unexpected(ch))
        }
    }

    fn lex_dash(&mut self, ch: char) -> Result<Step, LexError> {
        // The '-' is already buffered; only a digit may follow.
        if ch.is_ascii_digit() {
            Ok(Step::hold(State::Integer))
        } else {
            Err(self.unexpected(ch))
        }
    }

    fn lex_str(&mut self, ch: char) -> Result<Step, LexError> {
        // A quote closes the literal unless the previous character was a
        // backslash. Escapes stay in the payload verbatim.
        if ch == '"' && !self.buffer.ends_with('\\') {
            let content = self.take_buffer();
            Ok(Step::advance(State::Unknown).emit(Token::String(content)))
        } else {
            self.buffer.push(ch);
            Ok(Step::advance(State::Str))
        }
    }

    fn lex_variable_candidate(&mut self, ch: char) -> Result<Step, LexError> {
        if ch.is_ascii_alphabetic() {
            Ok(Step::hold(State::Variable))
        } else {
            Err(self.unexpected(ch))
        }
    }

    fn lex_variable(&mut self, ch: char) -> Result<Step, LexError> {
        if ch.is_ascii_alphanumeric() {
            self.buffer.push(ch);
            Ok(Step::advance(State::Variable))
        } else if is_terminator(ch) {
            let name = self.take_buffer();
            Ok(Step::hold(State::Unknown).emit(Token::Variable(name)))
        } else {
            Err(self.unexpected(ch))
        }
    }

    fn lex_property_access(&mut self, ch: char) -> Result<Step, LexError> {
        if is_property_char(ch) {
            self.buffer.push(ch);
            Ok(Step::advance(State::PropertyAccess))
        } else if is_terminator(ch) {
            // May be empty: a bare '.' is the current-context reference.
            let name = self.take_buffer();
            Ok(Step::hold(State::Unknown).emit(Token::PropertyAccess(name)))
        } else {
            Err(self.unexpected(ch))
        }
    }

    fn lex_function(&mut self, ch: char) -> Result<Step, LexError> {
        if ch.is_ascii_alphanumeric() {
            self.buffer.push(ch);
            Ok(Step::advance(State::Function))
        } else if is_terminator(ch) {
            let name = self.take_buffer();
            Ok(Step::hold(State::Unknown).emit(Token::Function(name)))
        } else {
            Err(self.unexpected(ch))
        }
    }

    fn lex_assignment_candidate(&mut self, ch: char) -> Result<Step, LexError> {
        if ch == '=' {
            Ok(Step::advance(State::ValueStart).emit(Token::Assignment { existing: false }))
        } else {
            Err(LexError::MalformedAssignment {
                ch,
                state: State::AssignmentCandidate,
                offset: self.position,
            })
        }
    }

    fn lex_value_start(&mut self, ch: char) -> Result<Step, LexError> {
        if ch == ' ' {
            Ok(Step::advance(State::ValueStart))
        } else if self.is_value_start(ch) {
            Ok(Step::hold(State::Unknown))
        } else {
            Err(LexError::MalformedAssignment {
                ch,
                state: State::ValueStart,
                offset: self.position,
            })
        }
    }

    /// Characters that may begin the value of an assignment: a literal,
    /// a property access, a group, or a negative number.
    fn is_value_start(&self, ch: char) -> bool {
        ch.is_ascii_digit()
            || ch.is_ascii_alphabetic()
            || ch == '.'
            || ch == '('
            || ch == '"'
            || (ch == '-' && self.peek_char(1).is_some_and(|c| c.is_ascii_digit()))
    }
}

#[test]
fn test_plain_text() {
    let tokens = tokenize("no directives here").unwrap();
    assert_eq!(tokens, vec![Token::Text("no directives here".to_string())]);
}

#[test]
fn test_simple_directive() {
    let tokens = tokenize("{{ $user }}").unwrap();
    assert_eq!(
        tokens,
        vec![
            Token::OpenAction,
            Token::Variable("user".to_string()),
            Token::CloseAction,
        ]
    );
}

#[test]
fn test_trim_markers() {
    let tokens = tokenize("a {{- 1 -}} b").unwrap();
    assert_eq!(
        tokens,
        vec![
            Token::Text("a ".to_string()),
            Token::TrimOpenAction,
            Token::Integer("1".to_string()),
            Token::TrimCloseAction,
            Token::Text(" b".to_string()),
        ]
    );
}
