//! Shared record abstractions for the facade.
//!
//! Every record type owns an identifier, timestamps and a payload schema.
//! The record service builds records from validated inputs and applies
//! partial updates through this trait.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::filter::Filterable;
use crate::domain::form::{FormSchema, FormValues};
use crate::domain::validation::FieldViolations;

/// Declare a string-valued enum with serde names and `as_str`.
macro_rules! labelled_enum {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $label:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            /// Wire label of the variant.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl From<$name> for $crate::domain::validation::FieldValue {
            fn from(value: $name) -> Self {
                Self::from(value.as_str())
            }
        }
    };
}

pub(crate) use labelled_enum;

/// Opaque record identifier, serialised as a UUID string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(Uuid);

impl RecordId {
    /// Fresh random identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub const fn new(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Record families served by the facade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    /// Calls for tenders.
    Tender,
    /// Supplier directory entries.
    Supplier,
    /// Platform accounts.
    User,
    /// Advertisement placements.
    Advertisement,
}

impl RecordKind {
    /// URL collection segment, e.g. `tenders`.
    #[must_use]
    pub const fn collection(self) -> &'static str {
        match self {
            Self::Tender => "tenders",
            Self::Supplier => "suppliers",
            Self::User => "users",
            Self::Advertisement => "advertisements",
        }
    }

    /// Singular label used in messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Tender => "tender",
            Self::Supplier => "supplier",
            Self::User => "user",
            Self::Advertisement => "advertisement",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A record type stored behind the facade.
pub trait Record: Filterable + Clone + fmt::Debug + Serialize + Send + Sync + 'static {
    /// Create/update payload; `None` fields are not provided.
    type Input: fmt::Debug + Send + Sync + 'static;

    /// Record family.
    const KIND: RecordKind;

    /// Identifier assigned on creation.
    fn id(&self) -> RecordId;

    /// Payload schema checked on create and update.
    fn schema() -> &'static FormSchema;

    /// Current values of the schema's fields.
    fn field_values(&self) -> FormValues;

    /// Values provided by `input`; absent fields map to missing.
    fn input_values(input: &Self::Input) -> FormValues;

    /// Build a record from a checked input.
    fn build(id: RecordId, input: Self::Input, now: DateTime<Utc>) -> Self;

    /// Overwrite the fields `input` provides.
    fn apply(&mut self, input: Self::Input);

    /// Record a modification instant.
    fn touch(&mut self, now: DateTime<Utc>);

    /// Check a create payload against the schema, defaults included.
    ///
    /// # Errors
    /// Returns the violations of every failing field.
    fn check_draft(input: &Self::Input) -> Result<(), FieldViolations> {
        let mut values = Self::schema().initial_values();
        values.overlay(Self::input_values(input));
        Self::schema().check(&values)
    }

    /// Check the record's current state against the schema.
    ///
    /// # Errors
    /// Returns the violations of every failing field.
    fn check(&self) -> Result<(), FieldViolations> {
        Self::schema().check(&self.field_values())
    }
}

/// `AO-<year>-<6 hex digits>` reference derived from the identifier.
#[must_use]
pub fn tender_reference(id: RecordId, year: i32) -> String {
    let suffix: String = id
        .as_uuid()
        .simple()
        .to_string()
        .chars()
        .take(6)
        .collect::<String>()
        .to_uppercase();
    format!("AO-{year}-{suffix}")
}
