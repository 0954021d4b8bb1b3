//! Data-driven rule sets.
//!
//! A rule names a field, an action, a message and a RETS validation
//! expression. Rules run in order against the current listing; a value
//! produced by a `SET` rule is visible to later rules under the field name.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use rets_expression::function::{Function, FunctionContext, FunctionError};
use rets_expression::{Engine, EvaluateContext, Expression};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::bridge::HostAdapter;

use super::entry::{Guest, Validator};
use super::errors::{Fatal, FatalKind, ValidationResult};

/// Date `TODAY()` answers with unless a clock is supplied
pub const DEFAULT_TODAY: &str = "2023-04-21";
/// Timestamp `NOW()` answers with unless a clock is supplied
pub const DEFAULT_NOW: &str = "2023-04-21T00:00:00.000Z";

/// A rule file: `{"value": [rule, ...]}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rules {
    pub value: Vec<Rule>,
}

impl Rules {
    pub fn from_json(bytes: &[u8]) -> ValidationResult<Self> {
        serde_json::from_slice(bytes).map_err(|e| {
            Fatal::new(
                FatalKind::Rules,
                format!("Failed to load rules data: {}", e),
            )
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    #[serde(rename = "FieldName")]
    pub field_name: String,
    #[serde(rename = "RuleAction")]
    pub rule_action: RuleAction,
    #[serde(rename = "RuleMessage")]
    pub rule_message: String,
    #[serde(rename = "RuleExpression")]
    pub rule_expression: String,
}

/// What a rule does with its expression's result.
///
/// Only a JSON `true` counts as true; any other value or an evaluation
/// error counts as not true.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleAction {
    /// Report the result (or the error) as a process diagnostic
    Evaluate,
    /// Error on the field unless true
    Accept,
    /// Error on the field when true
    Reject,
    /// Warn on the field when true
    Warning,
    /// Override the field's value; errors leave it alone
    Set,
    /// Display when true, hide otherwise
    SetDisplay,
    /// Required when true, optional otherwise
    SetRequired,
}

struct CompiledRule {
    rule: Rule,
    expression: Expression,
}

/// Runs a rule set. Every expression is parsed up front; one bad
/// expression rejects the whole set.
pub struct RulesValidator {
    rules: Vec<CompiledRule>,
    today: String,
    now: String,
}

impl RulesValidator {
    pub fn new(rules: Rules) -> ValidationResult<Self> {
        let rules = rules
            .value
            .into_iter()
            .map(|rule| {
                let expression = rule.rule_expression.parse::<Expression>().map_err(|e| {
                    Fatal::new(
                        FatalKind::Rules,
                        format!("Failed to parse expression for {}: {}", rule.field_name, e),
                    )
                })?;
                Ok(CompiledRule { rule, expression })
            })
            .collect::<ValidationResult<Vec<_>>>()?;

        Ok(Self {
            rules,
            today: DEFAULT_TODAY.to_string(),
            now: DEFAULT_NOW.to_string(),
        })
    }

    pub fn from_json(bytes: &[u8]) -> ValidationResult<Self> {
        Self::new(Rules::from_json(bytes)?)
    }

    /// Answers for `TODAY()` and `NOW()`
    pub fn with_clock(mut self, today: impl Into<String>, now: impl Into<String>) -> Self {
        self.today = today.into();
        self.now = now.into();
        self
    }
}

impl Validator for RulesValidator {
    fn validate<H: HostAdapter>(&self, guest: &mut Guest<H>) -> ValidationResult<()> {
        let current = guest.records().current()?;
        let previous = guest.records().previous()?;
        let data = current.value();
        let previous_data = if previous.is_null() {
            None
        } else {
            Some(previous.value())
        };

        let notes = Arc::new(Mutex::new(Vec::new()));
        let mut engine = Engine::default();
        engine.set_function("NOW", Box::new(FixedClock::new("NOW", &self.now, &notes)));
        engine.set_function("TODAY", Box::new(FixedClock::new("TODAY", &self.today, &notes)));

        let mut locals = BTreeMap::default();

        for CompiledRule { rule, expression } in &self.rules {
            let context = EvaluateContext::new(&engine, data);
            context.set_previous(previous_data);

            let result = expression.apply_with_locals(context, &locals);
            for note in take_notes(&notes) {
                guest.diagnostics().diagnostic(&note)?;
            }

            let holds = matches!(&result, Ok(value) if value.as_bool() == Some(true));
            let field = rule.field_name.as_str();
            let message = rule.rule_message.as_str();

            match rule.rule_action {
                RuleAction::Evaluate => {
                    let report = match &result {
                        Ok(value) => format!("{}: {}", message, value),
                        Err(err) => format!("{}: {:?}", message, err),
                    };
                    guest.diagnostics().diagnostic(&report)?;
                }
                RuleAction::Accept => {
                    if !holds {
                        guest.diagnostics().error(field, message)?;
                    }
                }
                RuleAction::Reject => {
                    if holds {
                        guest.diagnostics().error(field, message)?;
                    }
                }
                RuleAction::Warning => {
                    if holds {
                        guest.diagnostics().warn(field, message)?;
                    }
                }
                RuleAction::SetRequired => guest.effects().set_required(field, holds)?,
                RuleAction::SetDisplay => guest.effects().set_display(field, holds)?,
                RuleAction::Set => {
                    if let Ok(value) = result {
                        guest.effects().set(field, &*value)?;
                        locals.insert(&rule.field_name, value);
                    }
                }
            }
        }

        Ok(())
    }
}

/// `TODAY()` / `NOW()` with a fixed answer. Each call leaves a note that is
/// reported as a process diagnostic.
struct FixedClock {
    name: &'static str,
    value: String,
    notes: Arc<Mutex<Vec<String>>>,
}

impl FixedClock {
    fn new(name: &'static str, value: &str, notes: &Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            name,
            value: value.to_string(),
            notes: Arc::clone(notes),
        }
    }
}

impl Function<()> for FixedClock {
    fn evaluate<'json>(
        &self,
        _context: FunctionContext<'_, ()>,
        _input: Vec<Cow<'json, Value>>,
    ) -> Result<Cow<'json, Value>, FunctionError> {
        if let Ok(mut notes) = self.notes.lock() {
            notes.push(format!("{}() called. Using {}", self.name, self.value));
        }
        Ok(Cow::Owned(Value::String(self.value.clone())))
    }
}

fn take_notes(notes: &Mutex<Vec<String>>) -> Vec<String> {
    notes
        .lock()
        .map(|mut pending| std::mem::take(&mut *pending))
        .unwrap_or_default()
}
