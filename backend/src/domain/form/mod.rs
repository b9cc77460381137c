//! Form state controller.
//!
//! A [`FormSchema`] declares the fields of a screen with their initial values
//! and rules. [`FormState`] tracks the live values together with the dirty
//! and touched flags, keeps every field's error set in sync with its value,
//! and gates submission on validity.
//!
//! The same schema checks facade payloads server-side through
//! [`FormSchema::check`], so a payload rejected by the form is rejected by the
//! service with the same error kinds.

pub mod schemas;
mod submission;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::validation::{
    ErrorSet, FieldValue, FieldViolations, Rule, SiblingValues, validate,
};

pub use self::submission::{SubmitError, SubmitHandler, SubmitRejected};

/// Declaration of one field: name, initial value and rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    name: String,
    initial: FieldValue,
    rules: Vec<Rule>,
}

impl FieldSpec {
    /// Field name as used in payloads.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Value the field starts with and returns to on reset.
    #[must_use]
    pub const fn initial(&self) -> &FieldValue {
        &self.initial
    }

    /// Constraints evaluated on every change.
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }
}

/// Ordered set of field declarations.
///
/// # Examples
/// ```
/// use ci_tender::domain::form::{FormSchema, FormValues};
/// use ci_tender::domain::validation::Rule;
///
/// let schema = FormSchema::new().field("title", "", [Rule::Required]);
/// let values = FormValues::from_iter([("title", "Route de Bouaké")]);
/// assert!(schema.check(&values).is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormSchema {
    fields: Vec<FieldSpec>,
}

impl FormSchema {
    /// Empty schema.
    #[must_use]
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Append a field declaration.
    #[must_use]
    pub fn field(
        mut self,
        name: impl Into<String>,
        initial: impl Into<FieldValue>,
        rules: impl IntoIterator<Item = Rule>,
    ) -> Self {
        self.fields.push(FieldSpec {
            name: name.into(),
            initial: initial.into(),
            rules: rules.into_iter().collect(),
        });
        self
    }

    /// Declared fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Declaration of the field called `name`.
    #[must_use]
    pub fn spec(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|spec| spec.name == name)
    }

    /// Copy of the schema without the named fields.
    #[must_use]
    pub fn without(&self, names: &[&str]) -> Self {
        Self {
            fields: self
                .fields
                .iter()
                .filter(|spec| !names.contains(&spec.name.as_str()))
                .cloned()
                .collect(),
        }
    }

    /// Validate a complete set of values; absent fields count as missing and
    /// undeclared entries are ignored.
    ///
    /// # Errors
    /// Returns the violations of every failing field.
    pub fn check(&self, values: &FormValues) -> Result<(), FieldViolations> {
        let violations: FieldViolations = self
            .fields
            .iter()
            .map(|spec| {
                let value = values.get(&spec.name).unwrap_or(&FieldValue::Missing);
                (spec.name.clone(), validate(value, &spec.rules, values))
            })
            .collect();
        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }

    /// Initial values of every declared field.
    #[must_use]
    pub fn initial_values(&self) -> FormValues {
        self.fields
            .iter()
            .map(|spec| (spec.name.clone(), spec.initial.clone()))
            .collect()
    }
}

/// Snapshot of field values keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormValues(BTreeMap<String, FieldValue>);

impl FormValues {
    /// Value of `name`, if present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.0.get(name)
    }

    /// Non-empty text of `name`.
    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name)
            .and_then(FieldValue::as_text)
            .filter(|text| !text.is_empty())
    }

    /// Flag value of `name`.
    #[must_use]
    pub fn flag(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(FieldValue::as_flag)
    }

    /// Set `name` to `value`, returning the previous value.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> Option<FieldValue> {
        self.0.insert(name.into(), value.into())
    }

    /// Copy every provided entry of `other` over these values; missing
    /// entries leave the current value in place.
    pub fn overlay(&mut self, other: Self) {
        for (name, value) in other.0 {
            if value != FieldValue::Missing {
                self.0.insert(name, value);
            }
        }
    }

    /// Entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl<K, V> FromIterator<(K, V)> for FormValues
where
    K: Into<String>,
    V: Into<FieldValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        )
    }
}

impl SiblingValues for FormValues {
    fn sibling(&self, name: &str) -> Option<&FieldValue> {
        self.get(name)
    }
}

/// Errors raised by [`FormState`] mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    /// The form has no field with this name.
    #[error("form has no field named `{name}`")]
    UnknownField {
        /// Requested field name.
        name: String,
    },
}

impl FormError {
    fn unknown_field(name: &str) -> Self {
        Self::UnknownField {
            name: name.to_owned(),
        }
    }
}

/// Live state of one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    spec: FieldSpec,
    value: FieldValue,
    touched: bool,
    dirty: bool,
    errors: ErrorSet,
}

impl FormField {
    /// Field name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.spec.name()
    }

    /// Current value.
    #[must_use]
    pub const fn value(&self) -> &FieldValue {
        &self.value
    }

    /// Whether the field has lost focus at least once.
    #[must_use]
    pub const fn is_touched(&self) -> bool {
        self.touched
    }

    /// Whether the value was changed by user input.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Violations of the current value.
    #[must_use]
    pub const fn errors(&self) -> &ErrorSet {
        &self.errors
    }

    /// Whether errors should be shown: invalid and dirty or touched.
    #[must_use]
    pub fn is_invalid_visible(&self) -> bool {
        !self.errors.is_empty() && (self.dirty || self.touched)
    }
}

struct Fields<'a>(&'a [FormField]);

impl SiblingValues for Fields<'_> {
    fn sibling(&self, name: &str) -> Option<&FieldValue> {
        self.0
            .iter()
            .find(|field| field.name() == name)
            .map(|field| &field.value)
    }
}

/// Controller for one form instance.
///
/// ## Invariants
/// - Every field's `errors` equals the union of its rules' output for the
///   current values, after every transition.
/// - Submission happens only when every error set is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    fields: Vec<FormField>,
    submitting: bool,
}

impl FormState {
    /// Pristine form with the schema's initial values.
    #[must_use]
    pub fn new(schema: &FormSchema) -> Self {
        let fields = schema
            .fields()
            .iter()
            .map(|spec| FormField {
                spec: spec.clone(),
                value: spec.initial.clone(),
                touched: false,
                dirty: false,
                errors: ErrorSet::new(),
            })
            .collect();
        let mut state = Self {
            fields,
            submitting: false,
        };
        state.revalidate_all();
        state
    }

    /// Record user input for `name`; marks the field dirty.
    ///
    /// # Errors
    /// Returns [`FormError::UnknownField`] when the form has no such field.
    pub fn set_value(
        &mut self,
        name: &str,
        value: impl Into<FieldValue>,
    ) -> Result<(), FormError> {
        let field = self.field_mut(name)?;
        field.value = value.into();
        field.dirty = true;
        self.revalidate_from(name);
        Ok(())
    }

    /// Record that `name` lost focus.
    ///
    /// # Errors
    /// Returns [`FormError::UnknownField`] when the form has no such field.
    pub fn blur(&mut self, name: &str) -> Result<(), FormError> {
        self.field_mut(name)?.touched = true;
        Ok(())
    }

    /// Set several values programmatically without marking them dirty.
    ///
    /// # Errors
    /// Returns [`FormError::UnknownField`] for the first unknown name; earlier
    /// entries stay applied.
    pub fn patch_values<I, K, V>(&mut self, values: I) -> Result<(), FormError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<FieldValue>,
    {
        let mut outcome = Ok(());
        for (name, value) in values {
            match self.field_mut(name.as_ref()) {
                Ok(field) => field.value = value.into(),
                Err(error) => {
                    outcome = Err(error);
                    break;
                }
            }
        }
        self.revalidate_all();
        outcome
    }

    /// Restore initial values and clear the interaction flags.
    pub fn reset(&mut self) {
        for field in &mut self.fields {
            field.value = field.spec.initial.clone();
            field.touched = false;
            field.dirty = false;
        }
        self.revalidate_all();
    }

    /// Mark every field touched so their errors become visible.
    pub fn mark_all_touched(&mut self) {
        for field in &mut self.fields {
            field.touched = true;
        }
    }

    /// Whether every field is free of violations.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.fields.iter().all(|field| field.errors.is_empty())
    }

    /// Whether a submission is in flight.
    #[must_use]
    pub const fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Field state for `name`.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|field| field.name() == name)
    }

    /// Every field in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    /// Current violations of `name`, shown or not.
    #[must_use]
    pub fn errors(&self, name: &str) -> Option<&ErrorSet> {
        self.field(name).map(FormField::errors)
    }

    /// Violations of `name` once the user has interacted with it.
    #[must_use]
    pub fn visible_errors(&self, name: &str) -> Option<&ErrorSet> {
        self.field(name)
            .filter(|field| field.is_invalid_visible())
            .map(FormField::errors)
    }

    /// Whether `name` is invalid and dirty or touched.
    #[must_use]
    pub fn is_field_invalid(&self, name: &str) -> bool {
        self.field(name).is_some_and(FormField::is_invalid_visible)
    }

    /// Snapshot of the current values.
    #[must_use]
    pub fn values(&self) -> FormValues {
        self.fields
            .iter()
            .map(|field| (field.name().to_owned(), field.value.clone()))
            .collect()
    }

    /// Violations of every invalid field.
    #[must_use]
    pub fn violations(&self) -> FieldViolations {
        self.fields
            .iter()
            .map(|field| (field.name().to_owned(), field.errors.clone()))
            .collect()
    }

    fn field_mut(&mut self, name: &str) -> Result<&mut FormField, FormError> {
        self.fields
            .iter_mut()
            .find(|field| field.name() == name)
            .ok_or_else(|| FormError::unknown_field(name))
    }

    /// Re-run the rules of `name` and of every field whose rules read it.
    fn revalidate_from(&mut self, name: &str) {
        let affected: Vec<usize> = self
            .fields
            .iter()
            .enumerate()
            .filter(|(_, field)| {
                field.name() == name
                    || field
                        .spec
                        .rules
                        .iter()
                        .any(|rule| rule.depends_on() == Some(name))
            })
            .map(|(index, _)| index)
            .collect();
        self.revalidate(&affected);
    }

    fn revalidate_all(&mut self) {
        let all: Vec<usize> = (0..self.fields.len()).collect();
        self.revalidate(&all);
    }

    fn revalidate(&mut self, indices: &[usize]) {
        let updates: Vec<(usize, ErrorSet)> = {
            let siblings = Fields(&self.fields);
            indices
                .iter()
                .filter_map(|&index| {
                    self.fields
                        .get(index)
                        .map(|field| (index, validate(&field.value, &field.spec.rules, &siblings)))
                })
                .collect()
        };
        for (index, errors) in updates {
            if let Some(field) = self.fields.get_mut(index) {
                field.errors = errors;
            }
        }
    }
}
