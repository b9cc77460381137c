//! Field tables of the application's screens and record payloads.
//!
//! Record schemas (`tender`, `supplier`, `user_record`, `advertisement`)
//! double as the server-side payload checks of the record facade.

use std::sync::OnceLock;

use super::FormSchema;
use crate::domain::validation::{FieldValue, Rule, patterns};

const NO_RULES: [Rule; 0] = [];

/// Email/password sign-in with a "remember me" checkbox.
pub fn login() -> &'static FormSchema {
    static SCHEMA: OnceLock<FormSchema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        FormSchema::new()
            .field("email", "", [Rule::Required, Rule::Email])
            .field("password", "", [Rule::Required, Rule::MinLength(6)])
            .field("rememberMe", false, NO_RULES)
    })
}

/// Account creation screen.
pub fn registration() -> &'static FormSchema {
    static SCHEMA: OnceLock<FormSchema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        FormSchema::new()
            .field("firstName", "", [Rule::Required])
            .field("lastName", "", [Rule::Required])
            .field("email", "", [Rule::Required, Rule::Email])
            .field("phoneNumber", "", [Rule::Pattern(patterns::ivorian_phone())])
            .field("company", "", NO_RULES)
            .field(
                "password",
                "",
                [
                    Rule::Required,
                    Rule::MinLength(8),
                    Rule::Pattern(patterns::password_strength()),
                ],
            )
            .field(
                "confirmPassword",
                "",
                [Rule::Required, Rule::matches_field("password")],
            )
            .field("acceptTerms", false, [Rule::RequiredTrue])
    })
}

/// Registration payload accepted by the account service: the screen without
/// its client-only confirmation fields.
pub fn registration_request() -> &'static FormSchema {
    static SCHEMA: OnceLock<FormSchema> = OnceLock::new();
    SCHEMA.get_or_init(|| registration().without(&["confirmPassword", "acceptTerms"]))
}

/// Profile details of the signed-in user.
pub fn profile() -> &'static FormSchema {
    static SCHEMA: OnceLock<FormSchema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        FormSchema::new()
            .field("firstName", "", [Rule::Required])
            .field("lastName", "", [Rule::Required])
            .field("email", "", [Rule::Required, Rule::Email])
            .field("phoneNumber", "", NO_RULES)
            .field("company", "", NO_RULES)
    })
}

/// Password change with confirmation.
pub fn password_change() -> &'static FormSchema {
    static SCHEMA: OnceLock<FormSchema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        FormSchema::new()
            .field("currentPassword", "", [Rule::Required])
            .field("newPassword", "", [Rule::Required, Rule::MinLength(6)])
            .field(
                "confirmPassword",
                "",
                [Rule::Required, Rule::matches_field("newPassword")],
            )
    })
}

/// Tender create/edit form and payload.
pub fn tender() -> &'static FormSchema {
    static SCHEMA: OnceLock<FormSchema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        FormSchema::new()
            .field("title", "", [Rule::Required, Rule::MinLength(10)])
            .field("description", "", [Rule::Required, Rule::MinLength(50)])
            .field("type", "", [Rule::Required])
            .field("status", "draft", [Rule::Required])
            .field("sector", "", [Rule::Required])
            .field("location", "", [Rule::Required])
            .field("estimatedAmount", FieldValue::Missing, NO_RULES)
            .field("currency", "FCFA", NO_RULES)
            .field("publishDate", "", NO_RULES)
            .field("deadline", "", [Rule::Required])
            .field("contactEmail", "", [Rule::Required, Rule::Email])
            .field("contactPhone", "", NO_RULES)
            .field("organizationName", "", [Rule::Required])
    })
}

/// Supplier payload.
pub fn supplier() -> &'static FormSchema {
    static SCHEMA: OnceLock<FormSchema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        FormSchema::new()
            .field("companyName", "", [Rule::Required, Rule::MinLength(2)])
            .field("description", "", [Rule::Required])
            .field("sector", "", [Rule::Required])
            .field("contactPerson", "", [Rule::Required])
            .field("email", "", [Rule::Required, Rule::Email])
            .field("phone", "", [Rule::Required])
            .field("city", "", [Rule::Required])
            .field("website", "", [Rule::Pattern(patterns::http_url())])
    })
}

/// Admin user creation screen.
pub fn user_form() -> &'static FormSchema {
    static SCHEMA: OnceLock<FormSchema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        FormSchema::new()
            .field("firstName", "", [Rule::Required, Rule::MinLength(2)])
            .field("lastName", "", [Rule::Required, Rule::MinLength(2)])
            .field("email", "", [Rule::Required, Rule::Email])
            .field("phone", "", NO_RULES)
            .field("company", "", NO_RULES)
            .field("role", "", [Rule::Required])
            .field("password", "", [Rule::Required, Rule::MinLength(6)])
            .field(
                "confirmPassword",
                "",
                [Rule::Required, Rule::matches_field("password")],
            )
            .field("isActive", true, NO_RULES)
    })
}

/// User record payload.
pub fn user_record() -> &'static FormSchema {
    static SCHEMA: OnceLock<FormSchema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        FormSchema::new()
            .field("firstName", "", [Rule::Required, Rule::MinLength(2)])
            .field("lastName", "", [Rule::Required, Rule::MinLength(2)])
            .field("email", "", [Rule::Required, Rule::Email])
            .field("role", "user", [Rule::Required])
            .field("status", "active", [Rule::Required])
    })
}

/// Advertisement create/edit form and payload.
pub fn advertisement() -> &'static FormSchema {
    static SCHEMA: OnceLock<FormSchema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        FormSchema::new()
            .field("title", "", [Rule::Required, Rule::MinLength(5)])
            .field("description", "", NO_RULES)
            .field("type", "banner", [Rule::Required])
            .field("position", "top", [Rule::Required])
            .field(
                "linkUrl",
                "",
                [Rule::Required, Rule::Pattern(patterns::http_url())],
            )
            .field("imageUrl", "", NO_RULES)
            .field("startDate", "", [Rule::Required])
            .field("endDate", "", [Rule::Required])
            .field("isActive", true, NO_RULES)
            .field("targetAudience", "", NO_RULES)
    })
}
