use crate::schema::{FieldSpec, Rule, RuleKind, Schema};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// The part of an address after the `@`: dot-separated labels ending in an
/// alphabetic TLD of at least two letters. The local part is checked by hand
/// in `is_email` since it needs a couple of rules `regex` can't express
/// (no lookaround.)
static EMAIL: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_'+\-.]*[A-Za-z0-9_+\-]@([A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$")
        .ok()
});

/// The message shown for a malformed email address
pub const INVALID_EMAIL: &str = "Invalid email address";

/// The message shown when a confirmation field doesn't match
pub const PASSWORDS_DO_NOT_MATCH: &str = "Passwords do not match";

/// Check that a string looks like an email address.
pub fn is_email(value: &str) -> bool {
    let Some((local, _)) = value.split_once('@') else {
        return false;
    };

    if local.starts_with('.') || local.contains("..") {
        return false;
    }

    EMAIL.as_ref().is_some_and(|re| re.is_match(value))
}

/// Why a single field failed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Which rule failed
    pub rule: RuleKind,

    /// What to show the user
    pub message: String,
}

/// Every field currently failing validation, keyed by field name. A field is
/// only present while it's failing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, FieldError>);

impl FieldErrors {
    /// No errors at all
    pub fn new() -> Self {
        Self::default()
    }

    /// Is everything valid?
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// How many fields are failing
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The error for a field, if it's failing
    pub fn get(&self, name: &str) -> Option<&FieldError> {
        self.0.get(name)
    }

    /// The user-facing message for a field, if it's failing
    pub fn message(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(|err| err.message.as_str())
    }

    /// Names of the failing fields
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Whether any field failed a particular kind of rule
    pub fn any(&self, kind: RuleKind) -> bool {
        self.0.values().any(|err| err.rule == kind)
    }

    /// Record or clear the outcome of checking one field.
    pub(crate) fn set(&mut self, name: &str, outcome: Option<FieldError>) {
        match outcome {
            Some(err) => {
                self.0.insert(name.to_owned(), err);
            }
            None => {
                self.0.remove(name);
            }
        }
    }
}

/// Check every field in the schema against the given values (in schema
/// order; missing values count as empty.)
pub fn validate(schema: &Schema, values: &[String]) -> FieldErrors {
    let mut errors = FieldErrors::new();

    for field in schema.fields() {
        errors.set(&field.name, check_field(schema, field, values));
    }

    errors
}

/// Check one field, returning the first rule it fails.
pub(crate) fn check_field(
    schema: &Schema,
    field: &FieldSpec,
    values: &[String],
) -> Option<FieldError> {
    let value = value_of(schema, values, &field.name);

    field.rules.iter().find_map(|rule| {
        check_rule(schema, field, rule, value, values).map(|message| FieldError {
            rule: rule.kind(),
            message,
        })
    })
}

/// Check a single rule, returning the message if it fails.
fn check_rule(
    schema: &Schema,
    field: &FieldSpec,
    rule: &Rule,
    value: &str,
    values: &[String],
) -> Option<String> {
    match rule {
        Rule::Required => value
            .is_empty()
            .then(|| format!("{} is required", field.label)),

        Rule::Length { min, max } => {
            let len = value.chars().count();

            if len < *min {
                Some(field.unit.describe(&field.label, "at least", *min))
            } else if len > *max {
                Some(field.unit.describe(&field.label, "at most", *max))
            } else {
                None
            }
        }

        Rule::Email => (!is_email(value)).then(|| INVALID_EMAIL.to_owned()),

        Rule::Pattern(re, message) => (!re.is_match(value)).then(|| message.clone()),

        Rule::Matches(other) => {
            (value != value_of(schema, values, other)).then(|| PASSWORDS_DO_NOT_MATCH.to_owned())
        }
    }
}

/// Get the current value of a named field.
fn value_of<'v>(schema: &Schema, values: &'v [String], name: &str) -> &'v str {
    schema
        .position(name)
        .and_then(|idx| values.get(idx))
        .map_or("", String::as_str)
}
