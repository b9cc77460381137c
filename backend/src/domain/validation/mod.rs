//! Declarative field constraints.
//!
//! A [`Rule`] is a pure predicate over a field value (and, for
//! [`Rule::MatchesField`], one sibling value) that yields at most one
//! [`ErrorKind`]. [`validate`] runs every rule and returns the union.
//!
//! Format, length and pattern rules ignore empty values so optional fields
//! accept a blank input; emptiness is reported only by [`Rule::Required`] and
//! [`Rule::RequiredTrue`].

pub mod patterns;

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::Error;

pub use self::patterns::Pattern;

/// Field-level validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// A required value is absent, empty or `false`.
    MissingValue,
    /// The value does not match the expected format.
    InvalidFormat,
    /// The value has fewer characters than required.
    TooShort,
    /// The value differs from the sibling field it must repeat.
    Mismatch,
}

/// Ordered set of violations for one field.
pub type ErrorSet = BTreeSet<ErrorKind>;

/// Value held by a form field or payload entry.
///
/// Serialised untagged: `null`, a boolean or a string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// No value was supplied.
    #[default]
    Missing,
    /// Checkbox-style value.
    Flag(bool),
    /// Free text.
    Text(String),
}

impl FieldValue {
    /// Text content, if this is a text value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text.as_str()),
            Self::Missing | Self::Flag(_) => None,
        }
    }

    /// Boolean content, if this is a flag.
    #[must_use]
    pub const fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Flag(flag) => Some(*flag),
            Self::Missing | Self::Text(_) => None,
        }
    }

    /// Missing or the empty string.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Missing => true,
            Self::Text(text) => text.is_empty(),
            Self::Flag(_) => false,
        }
    }

    fn same_as(&self, other: &Self) -> bool {
        (self.is_empty() && other.is_empty()) || self == other
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl<T> From<Option<T>> for FieldValue
where
    T: Into<Self>,
{
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Missing, Into::into)
    }
}

/// Read access to the other fields of the same form or payload.
pub trait SiblingValues {
    /// Current value of the field called `name`, if the form has one.
    fn sibling(&self, name: &str) -> Option<&FieldValue>;
}

/// Sibling source for fields validated in isolation.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSiblings;

impl SiblingValues for NoSiblings {
    fn sibling(&self, _name: &str) -> Option<&FieldValue> {
        None
    }
}

impl<S: std::hash::BuildHasher> SiblingValues for std::collections::HashMap<String, FieldValue, S> {
    fn sibling(&self, name: &str) -> Option<&FieldValue> {
        self.get(name)
    }
}

impl SiblingValues for BTreeMap<String, FieldValue> {
    fn sibling(&self, name: &str) -> Option<&FieldValue> {
        self.get(name)
    }
}

/// A single field constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// Value must be present, non-empty and not `false`.
    Required,
    /// Value must look like `local@domain`.
    Email,
    /// Value must have at least this many characters.
    MinLength(usize),
    /// Value must satisfy the pattern.
    Pattern(&'static Pattern),
    /// Value must equal the named sibling field.
    MatchesField(String),
    /// Value must be the flag `true`.
    RequiredTrue,
}

impl Rule {
    /// Shorthand for [`Rule::MatchesField`].
    #[must_use]
    pub fn matches_field(name: impl Into<String>) -> Self {
        Self::MatchesField(name.into())
    }

    /// Evaluate the rule against `value`.
    pub fn check(&self, value: &FieldValue, siblings: &dyn SiblingValues) -> Option<ErrorKind> {
        let violated = match self {
            Self::Required => match value {
                FieldValue::Flag(flag) => !flag,
                FieldValue::Missing | FieldValue::Text(_) => value.is_empty(),
            },
            Self::RequiredTrue => value.as_flag() != Some(true),
            Self::Email => non_empty_text(value).is_some_and(|text| !patterns::email().is_match(text)),
            Self::MinLength(min) => {
                non_empty_text(value).is_some_and(|text| text.chars().count() < *min)
            }
            Self::Pattern(pattern) => non_empty_text(value).is_some_and(|text| !pattern.is_match(text)),
            Self::MatchesField(other) => {
                let other = siblings.sibling(other).unwrap_or(&FieldValue::Missing);
                !value.same_as(other)
            }
        };
        violated.then(|| self.kind())
    }

    /// Sibling field this rule reads, if any.
    #[must_use]
    pub fn depends_on(&self) -> Option<&str> {
        match self {
            Self::MatchesField(other) => Some(other.as_str()),
            _ => None,
        }
    }

    const fn kind(&self) -> ErrorKind {
        match self {
            Self::Required | Self::RequiredTrue => ErrorKind::MissingValue,
            Self::Email | Self::Pattern(_) => ErrorKind::InvalidFormat,
            Self::MinLength(_) => ErrorKind::TooShort,
            Self::MatchesField(_) => ErrorKind::Mismatch,
        }
    }
}

fn non_empty_text(value: &FieldValue) -> Option<&str> {
    value.as_text().filter(|text| !text.is_empty())
}

/// Run every rule against `value` and return the union of violations.
///
/// # Examples
/// ```
/// use ci_tender::domain::validation::{ErrorKind, FieldValue, NoSiblings, Rule, validate};
///
/// let errors = validate(&FieldValue::from("ab"), &[Rule::Required, Rule::MinLength(6)], &NoSiblings);
/// assert_eq!(errors.into_iter().collect::<Vec<_>>(), vec![ErrorKind::TooShort]);
/// ```
pub fn validate(value: &FieldValue, rules: &[Rule], siblings: &dyn SiblingValues) -> ErrorSet {
    rules
        .iter()
        .filter_map(|rule| rule.check(value, siblings))
        .collect()
}

/// Violations keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldViolations(BTreeMap<String, ErrorSet>);

impl FieldViolations {
    /// Record `errors` for `field`; empty sets are ignored.
    pub fn insert(&mut self, field: impl Into<String>, errors: ErrorSet) {
        if !errors.is_empty() {
            self.0.insert(field.into(), errors);
        }
    }

    /// Whether no field has a violation.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Violations recorded for `field`.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&ErrorSet> {
        self.0.get(field)
    }

    /// Names of the offending fields in order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Convert into a facade error carrying `{"fields": {name: [kind, ..]}}`.
    #[must_use]
    pub fn into_error(self) -> Error {
        let count = self.0.len();
        Error::validation_failed(format!("{count} field(s) failed validation"))
            .with_details(json!({ "fields": self }))
    }
}

impl FromIterator<(String, ErrorSet)> for FieldViolations {
    fn from_iter<I: IntoIterator<Item = (String, ErrorSet)>>(iter: I) -> Self {
        let mut violations = Self::default();
        for (field, errors) in iter {
            violations.insert(field, errors);
        }
        violations
    }
}

impl From<FieldViolations> for Error {
    fn from(value: FieldViolations) -> Self {
        value.into_error()
    }
}
