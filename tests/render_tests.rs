// tests/render_tests.rs

use std::collections::HashMap;

use stencil_lang::lexer::tokenize;
use stencil_lang::parser::Parser;
use stencil_lang::render::{RenderError, Renderer};
use stencil_lang::value::Value;

fn render(template: &str, data: Value) -> Result<String, RenderError> {
    let tokens = tokenize(template).expect("lexing failed");
    let template = Parser::new(tokens).parse().expect("parsing failed");
    Renderer::new().render(&template, &data)
}

fn json_object(pairs: Vec<(&str, Value)>) -> Value {
    let mut map = HashMap::new();
    for (k, v) in pairs {
        map.insert(k.to_string(), v);
    }
    Value::Object(map)
}

fn json_array(values: Vec<Value>) -> Value {
    Value::Array(values)
}

// ============================================================================
// Text and Substitution
// ============================================================================

#[test]
fn test_plain_text_passes_through() {
    let result = render("no directives here", Value::Null).unwrap();
    assert_eq!(result, "no directives here");
}

#[test]
fn test_empty_template() {
    let result = render("", Value::Null).unwrap();
    assert_eq!(result, "");
}

#[test]
fn test_simple_substitution() {
    let doc = json_object(vec![("name", Value::String("World".into()))]);

    let result = render("Hello {{ .name }}!", doc).unwrap();
    assert_eq!(result, "Hello World!");
}

#[test]
fn test_nested_field_access() {
    let doc = json_object(vec![(
        "user",
        json_object(vec![("name", Value::String("Alice".into()))]),
    )]);

    let result = render("{{ .user.name }}", doc).unwrap();
    assert_eq!(result, "Alice");
}

#[test]
fn test_bare_context() {
    let result = render("{{ . }}", Value::String("just me".into())).unwrap();
    assert_eq!(result, "just me");

    let result = render("{{ . }}", Value::Integer(7)).unwrap();
    assert_eq!(result, "7");
}

#[test]
fn test_literal_output() {
    let test_cases = vec![
        ("{{ 42 }}", "42"),
        ("{{ -7 }}", "-7"),
        ("{{ 2.5 }}", "2.5"),
        (r#"{{ "hi" }}"#, "hi"),
    ];

    for (input, expected) in test_cases {
        let result = render(input, Value::Null).unwrap();
        assert_eq!(result, expected, "Failed for input: {}", input);
    }
}

#[test]
fn test_string_escapes_in_output() {
    // Escapes are decoded at parse time; the output carries the real
    // characters, not the backslash forms.
    let result = render(r#"{{ "a\"b" }}"#, Value::Null).unwrap();
    assert_eq!(result, "a\"b");

    let result = render(r#"{{ "line1\nline2" }}"#, Value::Null).unwrap();
    assert_eq!(result, "line1\nline2");
}

#[test]
fn test_null_renders_as_null() {
    let doc = json_object(vec![("x", Value::Null)]);

    let result = render("{{ .x }}", doc).unwrap();
    assert_eq!(result, "null");
}

#[test]
fn test_boolean_output() {
    let doc = json_object(vec![("flag", Value::Boolean(true))]);

    let result = render("{{ .flag }}", doc).unwrap();
    assert_eq!(result, "true");
}

#[test]
fn test_array_renders_as_json() {
    let doc = json_object(vec![(
        "items",
        json_array(vec![Value::Integer(1), Value::Integer(2)]),
    )]);

    let result = render("{{ .items }}", doc).unwrap();
    assert_eq!(result, "[1,2]");
}

#[test]
fn test_object_renders_as_json_with_sorted_keys() {
    let doc = json_object(vec![(
        "point",
        json_object(vec![("b", Value::Integer(2)), ("a", Value::Integer(1))]),
    )]);

    let result = render("{{ .point }}", doc).unwrap();
    assert_eq!(result, r#"{"a":1,"b":2}"#);
}

// ============================================================================
// Trim Markers
// ============================================================================

#[test]
fn test_trim_left_strips_preceding_text() {
    let result = render("a {{- 1 }} b", Value::Null).unwrap();
    assert_eq!(result, "a1 b");
}

#[test]
fn test_trim_right_strips_following_text() {
    let result = render("a {{ 1 -}} b", Value::Null).unwrap();
    assert_eq!(result, "a 1b");
}

#[test]
fn test_trim_both_sides() {
    let result = render("a {{- 1 -}} b", Value::Null).unwrap();
    assert_eq!(result, "a1b");
}

#[test]
fn test_trim_removes_newlines() {
    let doc = json_object(vec![("v", Value::String("!".into()))]);

    let result = render("x\n  {{- .v }}", doc).unwrap();
    assert_eq!(result, "x!");
}

#[test]
fn test_untrimmed_whitespace_survives() {
    let result = render("a {{ 1 }} b", Value::Null).unwrap();
    assert_eq!(result, "a 1 b");
}

#[test]
fn test_trim_between_adjacent_actions() {
    // Both neighbors trim the shared text node; only whitespace goes.
    let result = render("{{ 1 -}} mid {{- 2 }}", Value::Null).unwrap();
    assert_eq!(result, "1mid2");

    let result = render("{{ 1 -}}   {{- 2 }}", Value::Null).unwrap();
    assert_eq!(result, "12");
}

// ============================================================================
// Variables
// ============================================================================

#[test]
fn test_binding_and_reference() {
    let result = render("{{ $x := 5 }}{{ $x }}", Value::Null).unwrap();
    assert_eq!(result, "5");
}

#[test]
fn test_assignment_writes_nothing() {
    let result = render("a{{ $x := 5 }}b", Value::Null).unwrap();
    assert_eq!(result, "ab");
}

#[test]
fn test_rebinding_replaces_value() {
    let result = render("{{ $x := 1 }}{{ $x = 2 }}{{ $x }}", Value::Null).unwrap();
    assert_eq!(result, "2");
}

#[test]
fn test_rebinding_unbound_variable_fails() {
    let err = render("{{ $x = 1 }}", Value::Null).unwrap_err();
    assert!(matches!(err, RenderError::UndefinedVariable(ref name) if name == "x"));
    assert!(err.to_string().contains("$x is not defined"));
}

#[test]
fn test_unbound_reference_fails() {
    let err = render("{{ $nope }}", Value::Null).unwrap_err();
    assert!(matches!(err, RenderError::UndefinedVariable(_)));
}

#[test]
fn test_binding_from_context() {
    let doc = json_object(vec![("name", Value::String("World".into()))]);

    let result = render("{{ $n := .name }}Hello {{ $n }}!", doc).unwrap();
    assert_eq!(result, "Hello World!");
}

#[test]
fn test_binding_from_pipeline() {
    let doc = json_object(vec![("name", Value::String("world".into()))]);

    let result = render("{{ $x := .name | upper }}{{ $x }}", doc).unwrap();
    assert_eq!(result, "WORLD");
}

#[test]
fn test_variable_field_access() {
    let doc = json_object(vec![(
        "user",
        json_object(vec![("name", Value::String("Alice".into()))]),
    )]);

    let result = render("{{ $u := .user }}{{ $u.name }}", doc).unwrap();
    assert_eq!(result, "Alice");
}

// ============================================================================
// Pipelines
// ============================================================================

#[test]
fn test_pipe_to_function() {
    let doc = json_object(vec![("name", Value::String("world".into()))]);

    let result = render("{{ .name | upper }}", doc).unwrap();
    assert_eq!(result, "WORLD");
}

#[test]
fn test_chained_pipeline() {
    let result = render(r#"{{ "  pad  " | trim | upper }}"#, Value::Null).unwrap();
    assert_eq!(result, "PAD");
}

#[test]
fn test_piped_value_is_final_argument() {
    let doc = json_object(vec![("greeting", Value::String("hello".into()))]);

    // `.greeting | contains "lo"` and `contains "lo" .greeting` agree:
    // the piped value fills the trailing subject slot.
    let piped = render(r#"{{ .greeting | contains "lo" }}"#, doc.clone()).unwrap();
    let direct = render(r#"{{ contains "lo" .greeting }}"#, doc).unwrap();
    assert_eq!(piped, "true");
    assert_eq!(piped, direct);
}

#[test]
fn test_group_as_pipeline_stage() {
    let doc = json_object(vec![("a", Value::String("MiXeD".into()))]);

    let result = render("{{ (lower .a) | upper }}", doc).unwrap();
    assert_eq!(result, "MIXED");
}

#[test]
fn test_group_as_argument() {
    let doc = json_object(vec![("a", Value::String("MiXeD".into()))]);

    let result = render("{{ upper (lower .a) }}", doc).unwrap();
    assert_eq!(result, "MIXED");
}

// ============================================================================
// Builtin Functions
// ============================================================================

#[test]
fn test_string_functions() {
    let doc = json_object(vec![("greeting", Value::String("hello".into()))]);

    let test_cases = vec![
        ("{{ .greeting | upper }}", "HELLO"),
        ("{{ upper .greeting }}", "HELLO"),
        (r#"{{ "LOUD" | lower }}"#, "loud"),
        (r#"{{ "  x  " | trim }}"#, "x"),
        (r#"{{ .greeting | startswith "he" }}"#, "true"),
        (r#"{{ .greeting | endswith "lo" }}"#, "true"),
        (r#"{{ .greeting | contains "zz" }}"#, "false"),
    ];

    for (input, expected) in test_cases {
        let result = render(input, doc.clone()).unwrap();
        assert_eq!(result, expected, "Failed for input: {}", input);
    }
}

#[test]
fn test_matches_function() {
    let doc = json_object(vec![("greeting", Value::String("hello".into()))]);

    let result = render(r#"{{ .greeting | matches "^h" }}"#, doc.clone()).unwrap();
    assert_eq!(result, "true");

    let result = render(r#"{{ .greeting | matches "^z" }}"#, doc).unwrap();
    assert_eq!(result, "false");
}

#[test]
fn test_matches_invalid_pattern() {
    let doc = json_object(vec![("greeting", Value::String("hello".into()))]);

    let err = render(r#"{{ .greeting | matches "(" }}"#, doc).unwrap_err();
    assert!(matches!(err, RenderError::TypeError(_)));
    assert!(err.to_string().contains("invalid regex"));
}

#[test]
fn test_length_function() {
    let doc = json_object(vec![
        ("name", Value::String("hello".into())),
        (
            "items",
            json_array(vec![
                Value::Integer(1),
                Value::Integer(2),
                Value::Integer(3),
            ]),
        ),
    ]);

    let result = render("{{ .name | length }}", doc.clone()).unwrap();
    assert_eq!(result, "5");

    let result = render("{{ .items | length }}", doc).unwrap();
    assert_eq!(result, "3");
}

#[test]
fn test_array_functions() {
    let doc = json_object(vec![(
        "items",
        json_array(vec![
            Value::Integer(1),
            Value::Integer(2),
            Value::Integer(3),
        ]),
    )]);

    let test_cases = vec![
        ("{{ .items | first }}", "1"),
        ("{{ .items | last }}", "3"),
        ("{{ .items | reverse }}", "[3,2,1]"),
    ];

    for (input, expected) in test_cases {
        let result = render(input, doc.clone()).unwrap();
        assert_eq!(result, expected, "Failed for input: {}", input);
    }
}

#[test]
fn test_first_of_empty_array_is_null() {
    let doc = json_object(vec![("items", json_array(vec![]))]);

    let result = render("{{ .items | first }}", doc).unwrap();
    assert_eq!(result, "null");
}

#[test]
fn test_type_function() {
    let doc = json_object(vec![
        ("i", Value::Integer(1)),
        ("f", Value::Float(1.5)),
        ("s", Value::String("x".into())),
        ("a", json_array(vec![])),
        ("n", Value::Null),
    ]);

    let test_cases = vec![
        ("{{ .i | type }}", "number"),
        ("{{ .f | type }}", "number"),
        ("{{ .s | type }}", "string"),
        ("{{ .a | type }}", "array"),
        ("{{ .n | type }}", "null"),
    ];

    for (input, expected) in test_cases {
        let result = render(input, doc.clone()).unwrap();
        assert_eq!(result, expected, "Failed for input: {}", input);
    }
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_unknown_function() {
    let err = render(r#"{{ "x" | nope }}"#, Value::Null).unwrap_err();
    assert!(matches!(err, RenderError::UnknownFunction(ref name) if name == "nope"));
    assert!(err.to_string().contains("Unknown function"));
}

#[test]
fn test_missing_field() {
    let doc = json_object(vec![("name", Value::String("x".into()))]);

    let err = render("{{ .missing }}", doc).unwrap_err();
    assert!(matches!(err, RenderError::AccessError(_)));
    assert!(err.to_string().contains("no field 'missing'"));
}

#[test]
fn test_field_access_on_non_object() {
    let doc = json_object(vec![("name", Value::String("hi".into()))]);

    let err = render("{{ .name.x }}", doc).unwrap_err();
    assert!(matches!(err, RenderError::AccessError(_)));
    assert!(err.to_string().contains("cannot access field 'x' on string"));
}

#[test]
fn test_type_mismatch() {
    let doc = json_object(vec![("n", Value::Integer(5))]);

    let err = render("{{ .n | upper }}", doc).unwrap_err();
    assert!(matches!(err, RenderError::TypeError(_)));
    assert!(err.to_string().contains("upper requires string, got integer"));
}

#[test]
fn test_wrong_arity() {
    let err = render(r#"{{ upper "a" "b" }}"#, Value::Null).unwrap_err();
    assert!(matches!(err, RenderError::TypeError(_)));
    assert!(err.to_string().contains("exactly one argument"));
}

#[test]
fn test_error_stops_rendering() {
    let doc = json_object(vec![("name", Value::String("x".into()))]);

    let result = render("before {{ .missing }} after", doc);
    assert!(result.is_err());
}
