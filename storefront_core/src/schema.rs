use core::fmt::{self, Debug, Formatter};
use regex::Regex;
use std::collections::HashSet;

/// What kind of input a field collects. Shells use this to decide how to
/// display the value (for example, masking passwords.)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Plain text
    Text,

    /// An email address
    Email,

    /// A secret. Never displayed or logged.
    Password,
}

/// How lengths are described to the user. Phone numbers are counted in
/// digits, everything else in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    /// "must be at least 6 characters long"
    Characters,

    /// "must be at least 10 digits"
    Digits,
}

impl Unit {
    /// Describe a bound on a field for an error message.
    pub(crate) fn describe(self, label: &str, bound: &str, amount: usize) -> String {
        match self {
            Self::Characters => format!("{label} must be {bound} {amount} characters long"),
            Self::Digits => format!("{label} must be {bound} {amount} digits"),
        }
    }
}

/// A single validation rule on a field.
#[derive(Clone)]
pub enum Rule {
    /// The value must not be empty.
    Required,

    /// The value's length (in characters) must fall within `min..=max`.
    Length {
        /// Inclusive lower bound
        min: usize,

        /// Inclusive upper bound
        max: usize,
    },

    /// The value must be an email address.
    Email,

    /// The value must match a regular expression.
    Pattern(Regex, String),

    /// The value must equal the value of another field in the same schema.
    Matches(String),
}

impl Debug for Rule {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required => write!(f, "Required"),
            Self::Length { min, max } => write!(f, "Length({min}..={max})"),
            Self::Email => write!(f, "Email"),
            Self::Pattern(re, _) => write!(f, "Pattern({})", re.as_str()),
            Self::Matches(other) => write!(f, "Matches({other})"),
        }
    }
}

/// A rule's identity, without any of its parameters. Lets callers react to
/// a particular kind of failure (e.g. a password mismatch.)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    /// See `Rule::Required`
    Required,

    /// See `Rule::Length`
    Length,

    /// See `Rule::Email`
    Email,

    /// See `Rule::Pattern`
    Pattern,

    /// See `Rule::Matches`
    Matches,
}

impl Rule {
    /// Which kind of rule this is
    pub fn kind(&self) -> RuleKind {
        match self {
            Self::Required => RuleKind::Required,
            Self::Length { .. } => RuleKind::Length,
            Self::Email => RuleKind::Email,
            Self::Pattern(..) => RuleKind::Pattern,
            Self::Matches(_) => RuleKind::Matches,
        }
    }
}

/// A single named field in a form.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    /// The name of the field. This is also the key it's sent under.
    pub name: String,

    /// Human-readable name for labels and messages
    pub label: String,

    /// What sort of input this is
    pub kind: FieldKind,

    /// How to talk about this field's length
    pub unit: Unit,

    /// Whether the value goes in the request body. Confirmation fields are
    /// only checked locally.
    pub sent: bool,

    /// Checked in order; the first failure is reported.
    pub rules: Vec<Rule>,
}

impl FieldSpec {
    /// Start describing a field. By default fields are sent and have no rules.
    pub fn new(name: &str, label: &str, kind: FieldKind) -> Self {
        let mut rules = Vec::new();
        if kind == FieldKind::Email {
            rules.push(Rule::Email);
        }

        Self {
            name: name.to_owned(),
            label: label.to_owned(),
            kind,
            unit: Unit::Characters,
            sent: true,
            rules,
        }
    }

    /// Require a non-empty value.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.rules.push(Rule::Required);
        self
    }

    /// Bound the length of the value, inclusive on both ends.
    #[must_use]
    pub fn length(mut self, min: usize, max: usize) -> Self {
        self.rules.push(Rule::Length { min, max });
        self
    }

    /// Require the value to match a pattern, with the message to show if it
    /// doesn't.
    #[must_use]
    pub fn pattern(mut self, regex: Regex, message: &str) -> Self {
        self.rules.push(Rule::Pattern(regex, message.to_owned()));
        self
    }

    /// Require the value to equal another field's value.
    #[must_use]
    pub fn matches(mut self, other: &str) -> Self {
        self.rules.push(Rule::Matches(other.to_owned()));
        self
    }

    /// Describe lengths in digits rather than characters.
    #[must_use]
    pub fn in_digits(mut self) -> Self {
        self.unit = Unit::Digits;
        self
    }

    /// Keep this field out of the request body.
    #[must_use]
    pub fn local_only(mut self) -> Self {
        self.sent = false;
        self
    }
}

/// An ordered set of uniquely-named fields.
#[derive(Debug, Clone)]
pub struct Schema {
    /// The fields, in display order
    fields: Vec<FieldSpec>,
}

impl Schema {
    /// Build a schema from a list of fields.
    ///
    /// ## Errors
    ///
    /// - `SchemaError::DuplicateField` if two fields share a name
    /// - `SchemaError::UnknownMatch` if a `Matches` rule points at a field
    ///   that isn't in the schema
    pub fn new(fields: Vec<FieldSpec>) -> Result<Self, SchemaError> {
        let mut seen = HashSet::with_capacity(fields.len());
        for field in &fields {
            if !seen.insert(field.name.as_str()) {
                return Err(SchemaError::DuplicateField(field.name.clone()));
            }
        }

        for field in &fields {
            for rule in &field.rules {
                if let Rule::Matches(other) = rule {
                    if !seen.contains(other.as_str()) {
                        return Err(SchemaError::UnknownMatch {
                            field: field.name.clone(),
                            other: other.clone(),
                        });
                    }
                }
            }
        }

        Ok(Self { fields })
    }

    /// All the fields, in order
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Look up a field by name
    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Where a field sits in the schema
    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|field| field.name == name)
    }

    /// How many fields there are
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether there are no fields at all
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Problems constructing a schema
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SchemaError {
    /// Two fields used the same name.
    #[error("field `{0}` is defined more than once")]
    DuplicateField(String),

    /// A field is required to match a field that doesn't exist.
    #[error("field `{field}` must match `{other}`, which is not in the schema")]
    UnknownMatch {
        /// The field with the `Matches` rule
        field: String,

        /// The missing field it refers to
        other: String,
    },
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn email_fields_get_an_email_rule() {
        let field = FieldSpec::new("email", "Email", FieldKind::Email);

        assert_eq!(
            field.rules.iter().map(Rule::kind).collect::<Vec<_>>(),
            vec![RuleKind::Email]
        );
    }

    #[test]
    fn rejects_duplicate_names() {
        let err = Schema::new(vec![
            FieldSpec::new("email", "Email", FieldKind::Email),
            FieldSpec::new("email", "Email again", FieldKind::Text),
        ])
        .unwrap_err();

        assert_eq!(err, SchemaError::DuplicateField("email".to_string()));
    }

    #[test]
    fn rejects_matching_missing_field() {
        let err = Schema::new(vec![FieldSpec::new(
            "confirmPassword",
            "Confirm password",
            FieldKind::Password,
        )
        .matches("password")])
        .unwrap_err();

        assert_eq!(
            err,
            SchemaError::UnknownMatch {
                field: "confirmPassword".to_string(),
                other: "password".to_string(),
            }
        );
    }

    #[test]
    fn matches_may_point_forward() {
        let schema = Schema::new(vec![
            FieldSpec::new("confirmPassword", "Confirm password", FieldKind::Password)
                .matches("password"),
            FieldSpec::new("password", "Password", FieldKind::Password),
        ])
        .unwrap();

        assert_eq!(schema.position("password"), Some(1));
    }

    #[test]
    fn digits_read_differently() {
        assert_eq!(
            Unit::Digits.describe("Phone number", "at least", 10),
            "Phone number must be at least 10 digits"
        );
        assert_eq!(
            Unit::Characters.describe("Name", "at most", 100),
            "Name must be at most 100 characters long"
        );
    }
}
