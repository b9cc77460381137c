//! Platform accounts.
//!
//! Credentials are not part of the record; the account adapter keeps them
//! next to the user store.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::filter::Filterable;
use crate::domain::form::{FormSchema, FormValues, schemas};
use crate::domain::record::{Record, RecordId, RecordKind, labelled_enum};
use crate::domain::tender::replace;
use crate::domain::validation::FieldValue;

labelled_enum! {
    /// Access level.
    pub enum UserRole {
        /// Back-office access.
        Admin => "admin",
        /// Buyer or visitor account.
        #[default]
        User => "user",
        /// Supplier account.
        Supplier => "supplier",
    }
}

labelled_enum! {
    /// Account standing.
    pub enum UserStatus {
        /// May sign in.
        #[default]
        Active => "active",
        /// Disabled by its owner or an administrator.
        Inactive => "inactive",
        /// Blocked by an administrator.
        Suspended => "suspended",
    }
}

/// A platform account.
///
/// # Examples
/// ```
/// use ci_tender::domain::{Record, RecordId, User, UserInput, UserRole};
///
/// let input = UserInput {
///     email: Some("awa@example.ci".to_owned()),
///     first_name: Some("Awa".to_owned()),
///     last_name: Some("Koné".to_owned()),
///     ..UserInput::default()
/// };
/// let user = User::build(RecordId::random(), input, chrono::Utc::now());
/// assert_eq!(user.role, UserRole::User);
/// assert_eq!(user.full_name(), "Awa Koné");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Record identifier.
    pub id: RecordId,
    /// Sign-in address, unique across accounts.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Employer or organisation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    /// Avatar URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Access level.
    pub role: UserRole,
    /// Account state; only active accounts sign in.
    pub status: UserStatus,
    /// Contact phone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    /// Most recent successful sign-in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
    /// Last modification instant.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// `first last`, as shown in the header.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Whether the account has back-office access.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Whether the account may sign in.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }
}

/// Create/update payload for [`User`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserInput {
    /// Sign-in address, unique across accounts.
    pub email: Option<String>,
    /// Given name.
    pub first_name: Option<String>,
    /// Family name.
    pub last_name: Option<String>,
    /// Employer or organisation.
    pub company: Option<String>,
    /// Avatar URL.
    pub avatar: Option<String>,
    /// Access level.
    pub role: Option<UserRole>,
    /// Account state; only active accounts sign in.
    pub status: Option<UserStatus>,
    /// Contact phone.
    pub phone_number: Option<String>,
    /// Most recent successful sign-in.
    pub last_login: Option<DateTime<Utc>>,
}

impl Record for User {
    type Input = UserInput;

    const KIND: RecordKind = RecordKind::User;

    fn id(&self) -> RecordId {
        self.id
    }

    fn schema() -> &'static FormSchema {
        schemas::user_record()
    }

    fn field_values(&self) -> FormValues {
        FormValues::from_iter([
            ("firstName", FieldValue::from(self.first_name.as_str())),
            ("lastName", self.last_name.as_str().into()),
            ("email", self.email.as_str().into()),
            ("role", self.role.into()),
            ("status", self.status.into()),
        ])
    }

    fn input_values(input: &UserInput) -> FormValues {
        FormValues::from_iter([
            ("firstName", FieldValue::from(input.first_name.clone())),
            ("lastName", input.last_name.clone().into()),
            ("email", input.email.clone().into()),
            ("role", input.role.into()),
            ("status", input.status.into()),
        ])
    }

    fn build(id: RecordId, input: UserInput, now: DateTime<Utc>) -> Self {
        Self {
            id,
            email: input.email.unwrap_or_default(),
            first_name: input.first_name.unwrap_or_default(),
            last_name: input.last_name.unwrap_or_default(),
            company: input.company,
            avatar: input.avatar,
            role: input.role.unwrap_or_default(),
            status: input.status.unwrap_or_default(),
            phone_number: input.phone_number,
            last_login: input.last_login,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, input: UserInput) {
        let UserInput {
            email,
            first_name,
            last_name,
            company,
            avatar,
            role,
            status,
            phone_number,
            last_login,
        } = input;
        replace(&mut self.email, email);
        replace(&mut self.first_name, first_name);
        replace(&mut self.last_name, last_name);
        replace(&mut self.role, role);
        replace(&mut self.status, status);
        for (slot, provided) in [
            (&mut self.company, company),
            (&mut self.avatar, avatar),
            (&mut self.phone_number, phone_number),
        ] {
            if provided.is_some() {
                *slot = provided;
            }
        }
        if last_login.is_some() {
            self.last_login = last_login;
        }
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

impl Filterable for User {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![
            self.first_name.as_str(),
            self.last_name.as_str(),
            self.email.as_str(),
        ];
        fields.extend(self.company.as_deref());
        fields
    }

    fn category(&self) -> Option<&str> {
        Some(self.role.as_str())
    }

    fn status(&self) -> Option<&str> {
        Some(self.status.as_str())
    }

    fn relevant_date(&self) -> Option<NaiveDate> {
        Some(self.created_at.date_naive())
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        Some(self.created_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::filter::{FilterCriteria, filter};
    use rstest::{fixture, rstest};

    #[fixture]
    fn user() -> User {
        User::build(
            RecordId::random(),
            UserInput {
                email: Some("jean.kouassi@example.ci".to_owned()),
                first_name: Some("Jean".to_owned()),
                last_name: Some("Kouassi".to_owned()),
                company: Some("BTP Ivoire".to_owned()),
                ..UserInput::default()
            },
            Utc::now(),
        )
    }

    #[rstest]
    fn defaults_to_active_user_role(user: User) {
        assert_eq!(user.role, UserRole::User);
        assert!(user.is_active());
        assert!(!user.is_admin());
        assert!(user.check().is_ok());
    }

    #[rstest]
    fn keyword_searches_company(user: User) {
        let criteria = FilterCriteria {
            keyword: Some("ivoire".to_owned()),
            ..FilterCriteria::default()
        };
        assert_eq!(filter([&user], &criteria).len(), 1);
    }

    #[rstest]
    fn apply_keeps_unspecified_optionals(mut user: User) {
        user.apply(UserInput {
            status: Some(UserStatus::Suspended),
            ..UserInput::default()
        });
        assert_eq!(user.status, UserStatus::Suspended);
        assert_eq!(user.company.as_deref(), Some("BTP Ivoire"));
    }

    #[rstest]
    fn short_names_are_rejected() {
        let input = UserInput {
            email: Some("a@b.ci".to_owned()),
            first_name: Some("A".to_owned()),
            last_name: Some("Bé".to_owned()),
            ..UserInput::default()
        };
        let violations = User::check_draft(&input).expect_err("first name too short");
        assert_eq!(violations.fields().collect::<Vec<_>>(), vec!["firstName"]);
    }

    #[rstest]
    fn serialises_camel_case_without_absent_optionals(user: User) {
        let value = serde_json::to_value(&user).expect("serialise user");
        assert_eq!(value["firstName"], "Jean");
        assert_eq!(value["role"], "user");
        assert!(value.get("lastLogin").is_none());
    }
}
