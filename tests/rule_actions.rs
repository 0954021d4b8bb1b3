//! Rule Action Tests
//!
//! Rule files end to end through the native runtime, one section per action:
//! - EVALUATE reports the result as a process diagnostic
//! - ACCEPT / REJECT / WARNING report on the rule's field
//! - SET_REQUIRED / SET_DISPLAY / SET produce field effects
//! - Rule files that do not load abort with one process diagnostic

use resoval::diagnostics::Severity;
use resoval::host::{
    InMemoryHost, NativeRuntime, ValidationOutcome, ValidationRequest, ValidationRuntime,
};
use resoval::validator::{run_rules, RuleAction, RulesValidator, DEFAULT_TODAY};
use serde_json::{json, Value};

// =============================================================================
// Helper Functions
// =============================================================================

fn rule(field: &str, action: RuleAction, message: &str, expression: &str) -> Value {
    json!({
        "FieldName": field,
        "RuleAction": action,
        "RuleMessage": message,
        "RuleExpression": expression,
    })
}

fn rule_file(rules: Vec<Value>) -> Vec<u8> {
    json!({ "value": rules }).to_string().into_bytes()
}

fn validate(rules: Vec<Value>, current: Value) -> ValidationOutcome {
    let validator = RulesValidator::from_json(&rule_file(rules)).unwrap();
    NativeRuntime::new(validator)
        .execute(&ValidationRequest::new(&current, None))
        .unwrap()
}

fn price_rule(action: RuleAction) -> Value {
    rule("ListPrice", action, "List price must be greater than $0", "ListPrice > 0")
}

// =============================================================================
// EVALUATE
// =============================================================================

/// The result is reported as a process diagnostic after the message.
#[test]
fn test_evaluate_reports_result() {
    let outcome = validate(
        vec![rule("ListPrice", RuleAction::Evaluate, "Price check", "ListPrice > 0")],
        json!({"ListPrice": 10}),
    );

    assert!(outcome.is_completed());
    assert_eq!(outcome.diagnostics.len(), 1);
    assert_eq!(outcome.diagnostics[0].severity, Severity::Info);
    assert_eq!(outcome.diagnostics[0].message, "Price check: true");
    assert!(outcome.diagnostics[0].field.is_none());
}

/// `TODAY()` answers with the fixed date and leaves a note.
#[test]
fn test_evaluate_today_leaves_note() {
    let outcome = validate(
        vec![rule("ListingContractDate", RuleAction::Evaluate, "Today", "TODAY()")],
        json!({}),
    );

    let messages: Vec<_> = outcome.diagnostics.iter().map(|d| d.message.as_str()).collect();
    assert_eq!(
        messages,
        vec![
            format!("TODAY() called. Using {}", DEFAULT_TODAY),
            format!("Today: \"{}\"", DEFAULT_TODAY),
        ]
    );
}

// =============================================================================
// ACCEPT / REJECT / WARNING
// =============================================================================

/// ACCEPT is silent when the expression holds.
#[test]
fn test_accept_holds() {
    let outcome = validate(vec![price_rule(RuleAction::Accept)], json!({"ListPrice": 1}));
    assert_eq!(outcome.error_count(), 0);
}

/// ACCEPT errors on the field when the expression does not hold.
#[test]
fn test_accept_fails() {
    let outcome = validate(vec![price_rule(RuleAction::Accept)], json!({"ListPrice": 0}));

    let errors: Vec<_> = outcome.errors().collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].field.as_deref(), Some("ListPrice"));
    assert_eq!(errors[0].message, "List price must be greater than $0");
}

/// REJECT errors only when the expression holds.
#[test]
fn test_reject() {
    let rules = || {
        vec![rule(
            "ListPrice",
            RuleAction::Reject,
            "List price is too high",
            "ListPrice > 1000000",
        )]
    };

    assert_eq!(validate(rules(), json!({"ListPrice": 5})).error_count(), 0);

    let outcome = validate(rules(), json!({"ListPrice": 2000000}));
    assert_eq!(outcome.error_count(), 1);
    assert_eq!(outcome.diagnostics[0].message, "List price is too high");
}

/// WARNING warns, never errors.
#[test]
fn test_warning() {
    let outcome = validate(
        vec![rule("ListPrice", RuleAction::Warning, "Check the price", "ListPrice < 1000")],
        json!({"ListPrice": 10}),
    );

    assert_eq!(outcome.error_count(), 0);
    let warnings: Vec<_> = outcome.warnings().collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].field.as_deref(), Some("ListPrice"));
    assert_eq!(warnings[0].message, "Check the price");
}

// =============================================================================
// SET_REQUIRED / SET_DISPLAY / SET
// =============================================================================

/// SET_REQUIRED and SET_DISPLAY carry whether the expression held.
#[test]
fn test_flags_follow_expression() {
    let rules = || {
        vec![
            rule("ClosePrice", RuleAction::SetRequired, "", "MlsStatus = \"Closed\""),
            rule("ClosePrice", RuleAction::SetDisplay, "", "MlsStatus = \"Closed\""),
        ]
    };

    let closed = validate(rules(), json!({"MlsStatus": "Closed"}));
    let effect = closed.effect("ClosePrice").unwrap();
    assert_eq!(effect.required, Some(true));
    assert_eq!(effect.display, Some(true));

    let active = validate(rules(), json!({"MlsStatus": "Active"}));
    let effect = active.effect("ClosePrice").unwrap();
    assert_eq!(effect.required, Some(false));
    assert_eq!(effect.display, Some(false));
}

/// SET overrides the field with the expression's value.
#[test]
fn test_set_value() {
    let outcome = validate(
        vec![rule("ClosePrice", RuleAction::Set, "", "ListPrice")],
        json!({"ListPrice": 250000}),
    );

    assert!(outcome.is_completed());
    assert_eq!(outcome.effect("ClosePrice").unwrap().value, Some(json!(250000)));
}

/// Rules run in order; later flags overwrite earlier ones on the same field.
#[test]
fn test_rules_run_in_order() {
    let outcome = validate(
        vec![
            rule("ClosePrice", RuleAction::SetRequired, "", "true"),
            rule("ClosePrice", RuleAction::SetRequired, "", "false"),
            price_rule(RuleAction::Accept),
        ],
        json!({"ListPrice": 0}),
    );

    assert_eq!(outcome.effect("ClosePrice").unwrap().required, Some(false));
    assert_eq!(outcome.error_count(), 1);
}

// =============================================================================
// Rule Files That Do Not Load
// =============================================================================

/// A bad expression rejects the whole rule set before anything runs.
#[test]
fn test_bad_expression_rejects_rule_set() {
    let fatal = RulesValidator::from_json(&rule_file(vec![
        price_rule(RuleAction::Accept),
        rule("ClosePrice", RuleAction::Accept, "", "ClosePrice > ("),
    ]))
    .err()
    .unwrap();

    assert_eq!(fatal.code(), "RESO_RULES_INVALID");
    assert!(fatal.message().contains("ClosePrice"));
}

/// A rule file that is not JSON is announced before the request aborts.
#[test]
fn test_unloadable_rule_file_announced() {
    let request = ValidationRequest::new(&json!({"ListPrice": 1}), None);
    let mut host = InMemoryHost::new(&request);

    let fatal = run_rules(b"{not json", &mut host).unwrap_err();
    assert_eq!(fatal.code(), "RESO_RULES_INVALID");

    let diagnostics = host.state().diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].severity, Severity::Info);
    assert!(diagnostics[0].message.starts_with("Failed to load rules data"));
}
