use std::collections::HashMap;

use crate::{
    ast::{ActionBody, Expr, Node, Template},
    value::Value,
};

/// Errors that can occur while rendering a template.
#[derive(Debug, Clone)]
pub enum RenderError {
    /// Type mismatch or invalid operation for the given type
    TypeError(String),

    /// Access of a missing field, or a field access on a non-object
    AccessError(String),

    /// Reference to an unbound variable ($name not assigned)
    UndefinedVariable(String),

    /// Call of a function that does not exist
    UnknownFunction(String),
}

impl std::fmt::Display for RenderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderError::TypeError(msg) => write!(f, "Type error: {}", msg),
            RenderError::AccessError(msg) => write!(f, "Access error: {}", msg),
            RenderError::UndefinedVariable(name) => {
                write!(f, "Undefined variable: ${} is not defined", name)
            }
            RenderError::UnknownFunction(name) => write!(f, "Unknown function: {}", name),
        }
    }
}

impl std::error::Error for RenderError {}

/// Returns a human-readable type name for a Value
fn type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Boolean(_) => "boolean",
        Value::Integer(_) => "integer",
        Value::Float(_) => "float",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn one_arg(name: &str, mut args: Vec<Value>) -> Result<Value, RenderError> {
    if args.len() != 1 {
        return Err(RenderError::TypeError(format!(
            "{} takes exactly one argument, got {}",
            name,
            args.len()
        )));
    }
    Ok(args.remove(0))
}

fn two_args(name: &str, mut args: Vec<Value>) -> Result<(Value, Value), RenderError> {
    if args.len() != 2 {
        return Err(RenderError::TypeError(format!(
            "{} takes exactly two arguments, got {}",
            name,
            args.len()
        )));
    }
    let second = args.remove(1);
    let first = args.remove(0);
    Ok((first, second))
}

/// The template renderer.
///
/// Walks a parsed template, evaluating each directive against the data
/// context and writing the output, maintaining the variable bindings that
/// assignment directives create.
#[derive(Default)]
pub struct Renderer {
    /// Variables bound during rendering ($name := ...)
    variables: HashMap<String, Value>,
}

impl Renderer {
    /// Creates a new renderer with no variable bindings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders a parsed template against a data value.
    ///
    /// Text nodes are written as-is, except where a neighboring action
    /// carries a trim marker: `{{-` trims the end of the preceding text,
    /// `-}}` trims the start of the following text. Emit actions write
    /// their value's text form; assignments write nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::collections::HashMap;
    /// use stencil_lang::{lexer, Parser, Renderer, Value};
    ///
    /// let tokens = lexer::tokenize("Hello {{ .name | upper }}!").unwrap();
    /// let mut parser = Parser::new(tokens);
    /// let template = parser.parse().unwrap();
    ///
    /// let mut data = HashMap::new();
    /// data.insert("name".to_string(), Value::String("world".to_string()));
    ///
    /// let mut renderer = Renderer::new();
    /// let output = renderer.render(&template, &Value::Object(data)).unwrap();
    /// assert_eq!(output, "Hello WORLD!");
    /// ```
    pub fn render(&mut self, template: &Template, data: &Value) -> Result<String, RenderError> {
        let nodes = &template.nodes;
        let mut output = String::new();

        for (i, node) in nodes.iter().enumerate() {
            match node {
                Node::Text(text) => {
                    let mut piece = text.as_str();
                    if i > 0 {
                        if let Node::Action { trim_right: true, .. } = &nodes[i - 1] {
                            piece = piece.trim_start();
                        }
                    }
                    if let Some(Node::Action { trim_left: true, .. }) = nodes.get(i + 1) {
                        piece = piece.trim_end();
                    }
                    output.push_str(piece);
                }
                Node::Action { body, .. } => match body {
                    ActionBody::Emit(expr) => {
                        let value = self.eval_expr(expr, data)?;
                        output.push_str(&value.as_string());
                    }
                    ActionBody::Assign {
                        name,
                        existing,
                        value,
                    } => {
                        let value = self.eval_expr(value, data)?;
                        if *existing && !self.variables.contains_key(name) {
                            return Err(RenderError::UndefinedVariable(name.clone()));
                        }
                        self.variables.insert(name.clone(), value);
                    }
                },
            }
        }

        Ok(output)
    }

    /// Evaluates a single expression against a data value.
    ///
    /// Convenience for evaluating a directive body outside a full
    /// template, e.g. from tests or embedding tools.
    pub fn eval(&self, expr: &Expr, data: &Value) -> Result<Value, RenderError> {
        self.eval_expr(expr, data)
    }

    fn eval_expr(&self, expr: &Expr, ctx: &Value) -> Result<Value, RenderError> {
        match expr {
            Expr::Integer(n) => Ok(Value::Integer(*n)),
            Expr::Float(n) => Ok(Value::Float(*n)),
            Expr::String(s) => Ok(Value::String(s.clone())),
            Expr::Context => Ok(ctx.clone()),
            Expr::Variable(name) => self
                .variables
                .get(name)
                .cloned()
                .ok_or_else(|| RenderError::UndefinedVariable(name.clone())),
            Expr::Access { object, name } => {
                let object = self.eval_expr(object, ctx)?;
                match object {
                    Value::Object(mut obj) => obj.remove(name).ok_or_else(|| {
                        RenderError::AccessError(format!("no field '{}' in object", name))
                    }),
                    other => Err(RenderError::AccessError(format!(
                        "cannot access field '{}' on {}",
                        name,
                        type_name(&other)
                    ))),
                }
            }
            Expr::Call { name, args } => self.eval_call(name, args, None, ctx),
            Expr::Pipeline(stages) => self.eval_pipeline(stages, ctx),
        }
    }

    /// Evaluates a pipeline, feeding each stage's result into the next
    /// call as its final argument.
    fn eval_pipeline(&self, stages: &[Expr], ctx: &Value) -> Result<Value, RenderError> {
        let (first, rest) = match stages.split_first() {
            Some(split) => split,
            None => return Err(RenderError::TypeError("empty pipeline".to_string())),
        };

        let mut current = self.eval_expr(first, ctx)?;
        for stage in rest {
            current = match stage {
                Expr::Call { name, args } => self.eval_call(name, args, Some(current), ctx)?,
                _ => {
                    return Err(RenderError::TypeError(
                        "pipeline stages after '|' must be function calls".to_string(),
                    ))
                }
            };
        }

        Ok(current)
    }

    fn eval_call(
        &self,
        name: &str,
        args: &[Expr],
        piped: Option<Value>,
        ctx: &Value,
    ) -> Result<Value, RenderError> {
        let mut values = Vec::with_capacity(args.len() + 1);
        for arg in args {
            values.push(self.eval_expr(arg, ctx)?);
        }
        if let Some(value) = piped {
            values.push(value);
        }
        self.call_builtin(name, values)
    }

    /// Dispatch function calls to their implementations.
    ///
    /// Functions that take a subject plus extra arguments expect the
    /// subject last, so piped values land in the right place.
    fn call_builtin(&self, name: &str, args: Vec<Value>) -> Result<Value, RenderError> {
        match name {
            // String functions
            "upper" => self.builtin_upper(args),
            "lower" => self.builtin_lower(args),
            "trim" => self.builtin_trim(args),
            "contains" => self.builtin_contains(args),
            "startswith" => self.builtin_startswith(args),
            "endswith" => self.builtin_endswith(args),
            "matches" => self.builtin_matches(args),
            // Array functions
            "length" => self.builtin_length(args),
            "first" => self.builtin_first(args),
            "last" => self.builtin_last(args),
            "reverse" => self.builtin_reverse(args),
            // Type function (works on any value)
            "type" => self.builtin_type(args),
            _ => Err(RenderError::UnknownFunction(name.to_string())),
        }
    }

    // ========================================
    // String Functions
    // ========================================

    /// upper(string) - uppercase a string
    fn builtin_upper(&self, args: Vec<Value>) -> Result<Value, RenderError> {
        match one_arg("upper", args)? {
            Value::String(s) => Ok(Value::String(s.to_uppercase())),
            other => Err(RenderError::TypeError(format!(
                "upper requires string, got {}",
                type_name(&other)
            ))),
        }
    }

    /// lower(string) - lowercase a string
    fn builtin_lower(&self, args: Vec<Value>) -> Result<Value, RenderError> {
        match one_arg("lower", args)? {
            Value::String(s) => Ok(Value::String(s.to_lowercase())),
            other => Err(RenderError::TypeError(format!(
                "lower requires string, got {}",
                type_name(&other)
            ))),
        }
    }

    /// trim(string) - strip leading and trailing whitespace
    fn builtin_trim(&self, args: Vec<Value>) -> Result<Value, RenderError> {
        match one_arg("trim", args)? {
            Value::String(s) => Ok(Value::String(s.trim().to_string())),
            other => Err(RenderError::TypeError(format!(
                "trim requires string, got {}",
                type_name(&other)
            ))),
        }
    }

    /// contains(substring, string) - true if the string contains the substring
    fn builtin_contains(&self, args: Vec<Value>) -> Result<Value, RenderError> {
        match two_args("contains", args)? {
            (Value::String(sub), Value::String(s)) => Ok(Value::Boolean(s.contains(&sub))),
            (needle, subject) => Err(RenderError::TypeError(format!(
                "contains requires two strings, got {} and {}",
                type_name(&needle),
                type_name(&subject)
            ))),
        }
    }

    /// startswith(prefix, string) - true if the string starts with the prefix
    fn builtin_startswith(&self, args: Vec<Value>) -> Result<Value, RenderError> {
        match two_args("startswith", args)? {
            (Value::String(prefix), Value::String(s)) => {
                Ok(Value::Boolean(s.starts_with(&prefix)))
            }
            (needle, subject) => Err(RenderError::TypeError(format!(
                "startswith requires two strings, got {} and {}",
                type_name(&needle),
                type_name(&subject)
            ))),
        }
    }

    /// endswith(suffix, string) - true if the string ends with the suffix
    fn builtin_endswith(&self, args: Vec<Value>) -> Result<Value, RenderError> {
        match two_args("endswith", args)? {
            (Value::String(suffix), Value::String(s)) => Ok(Value::Boolean(s.ends_with(&suffix))),
            (needle, subject) => Err(RenderError::TypeError(format!(
                "endswith requires two strings, got {} and {}",
                type_name(&needle),
                type_name(&subject)
            ))),
        }
    }

    /// matches(pattern, string) - true if the string matches the regex pattern
    fn builtin_matches(&self, args: Vec<Value>) -> Result<Value, RenderError> {
        let (pattern, subject) = two_args("matches", args)?;
        let pattern_str = match &pattern {
            Value::String(s) => s.as_str(),
            _ => {
                return Err(RenderError::TypeError(format!(
                    "matches pattern must be string, got {}",
                    type_name(&pattern)
                )))
            }
        };
        let re = regex::Regex::new(pattern_str)
            .map_err(|e| RenderError::TypeError(format!("invalid regex: {e}")))?;
        match subject {
            Value::String(s) => Ok(Value::Boolean(re.is_match(&s))),
            _ => Ok(Value::Boolean(false)),
        }
    }

    // ========================================
    // Array Functions
    // ========================================

    /// length(value) - length of an array or string
    fn builtin_length(&self, args: Vec<Value>) -> Result<Value, RenderError> {
        match one_arg("length", args)? {
            Value::Array(arr) => Ok(Value::Integer(arr.len() as i64)),
            Value::String(s) => Ok(Value::Integer(s.chars().count() as i64)),
            other => Err(RenderError::TypeError(format!(
                "length requires array or string, got {}",
                type_name(&other)
            ))),
        }
    }

    /// first(array) - first element, or null when empty
    fn builtin_first(&self, args: Vec<Value>) -> Result<Value, RenderError> {
        match one_arg("first", args)? {
            Value::Array(mut arr) => {
                if arr.is_empty() {
                    Ok(Value::Null)
                } else {
                    Ok(arr.remove(0))
                }
            }
            other => Err(RenderError::TypeError(format!(
                "first requires array, got {}",
                type_name(&other)
            ))),
        }
    }

    /// last(array) - last element, or null when empty
    fn builtin_last(&self, args: Vec<Value>) -> Result<Value, RenderError> {
        match one_arg("last", args)? {
            Value::Array(mut arr) => Ok(arr.pop().unwrap_or(Value::Null)),
            other => Err(RenderError::TypeError(format!(
                "last requires array, got {}",
                type_name(&other)
            ))),
        }
    }

    /// reverse(array) - elements in reverse order
    fn builtin_reverse(&self, args: Vec<Value>) -> Result<Value, RenderError> {
        match one_arg("reverse", args)? {
            Value::Array(mut arr) => {
                arr.reverse();
                Ok(Value::Array(arr))
            }
            other => Err(RenderError::TypeError(format!(
                "reverse requires array, got {}",
                type_name(&other)
            ))),
        }
    }

    // ========================================
    // Type Function
    // ========================================

    /// type(value) - the type name as a string
    fn builtin_type(&self, args: Vec<Value>) -> Result<Value, RenderError> {
        let name = match one_arg("type", args)? {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Integer(_) => "number",
            Value::Float(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        };
        Ok(Value::String(name.to_string()))
    }
}
