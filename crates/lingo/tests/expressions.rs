//! Integration tests for embedded expressions, as seen through templates.

use lingo::{
    CallStack, Dictionary, EvalError, ParseError, Value, Vars, evaluate_str, render_key, vars,
};

fn render(template: &str, vars: &Vars) -> String {
    let dictionary: Dictionary = [("KEY", template)].into_iter().collect();
    render_key(&dictionary, "KEY", vars, &mut CallStack::new())
}

// =============================================================================
// Rendering
// =============================================================================

#[test]
fn renders_values_as_text() {
    let v = vars! {
        "yes" => true,
        "ratio" => 0.5,
        "count" => 3,
        "tags" => vec!["a", "b"],
        "user" => vars! { "name" => "Ada" },
        "nothing" => Value::Null,
    };
    assert_eq!(
        render("{{yes}}|{{ratio}}|{{count}}|{{tags}}|{{user}}|{{nothing}}", &v),
        "true|0.5|3|a,b|[object]|"
    );
}

#[test]
fn division_keeps_fraction() {
    assert_eq!(render("{{ 7 / 2 }}", &Vars::new()), "3.5");
}

#[test]
fn string_escapes() {
    assert_eq!(render(r#"{{ 'it\'s' + "\t" }}"#, &Vars::new()), "it's\t");
}

#[test]
fn ternary_is_right_associative() {
    let template = r#"{{ n > 10 ? "many" : n > 1 ? "some" : "one" }}"#;
    assert_eq!(render(template, &vars! { "n" => 11 }), "many");
    assert_eq!(render(template, &vars! { "n" => 5 }), "some");
    assert_eq!(render(template, &vars! { "n" => 1 }), "one");
}

#[test]
fn precedence() {
    assert_eq!(render("{{ 1 + 2 * 3 }}", &Vars::new()), "7");
    assert_eq!(render("{{ (1 + 2) * 3 }}", &Vars::new()), "9");
    assert_eq!(render("{{ 1 < 2 && 2 < 3 }}", &Vars::new()), "true");
    assert_eq!(render("{{ !0 }}", &Vars::new()), "true");
}

#[test]
fn deeply_nested_expression_renders_empty() {
    let deep = format!("[{{{{{}1{}}}}}]", "(".repeat(500), ")".repeat(500));
    assert_eq!(render(&deep, &Vars::new()), "[]");

    let json = serde_json::json!({ "DEEP": format!("{{{{{}}}}}", "!".repeat(100_000)) });
    let dictionary = Dictionary::from_json_value(json).unwrap();
    assert_eq!(
        render_key(&dictionary, "DEEP", &Vars::new(), &mut CallStack::new()),
        ""
    );
}

#[test]
fn object_index_by_string() {
    let v = vars! { "labels" => vars! { "ok" => "Fine" }, "key" => "ok" };
    assert_eq!(render("{{ labels[key] }}", &v), "Fine");
}

#[test]
fn unterminated_marker_is_literal() {
    assert_eq!(render("a {{ b", &vars! { "b" => 1 }), "a {{ b");
    assert_eq!(render("a [[ b", &Vars::new()), "a [[ b");
}

#[test]
fn ambient_names_are_not_resolvable() {
    assert_eq!(render("[{{ window }}{{ Math.max(1, 2) }}]", &Vars::new()), "[]");
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn syntax_error_reports_position() {
    let error = evaluate_str("1 +", &Vars::new()).unwrap_err();
    assert!(matches!(
        error,
        EvalError::Syntax(ParseError::UnexpectedEof { .. } | ParseError::Syntax { .. })
    ));
}

#[test]
fn arithmetic_on_strings_is_a_type_mismatch() {
    let error = evaluate_str(r#""a" * 2"#, &Vars::new()).unwrap_err();
    assert_eq!(error.to_string(), "cannot apply '*' to string and number");
}

#[test]
fn method_on_null_fails() {
    let error = evaluate_str("user.name.trim()", &vars! { "user" => Vars::new() }).unwrap_err();
    assert!(matches!(error, EvalError::NullAccess { .. }));
}
