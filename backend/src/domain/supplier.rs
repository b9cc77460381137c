//! Supplier directory entries.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::filter::Filterable;
use crate::domain::form::{FormSchema, FormValues, schemas};
use crate::domain::record::{Record, RecordId, RecordKind, labelled_enum};
use crate::domain::tender::replace;
use crate::domain::validation::FieldValue;

/// Highest rating a supplier can hold.
pub const MAX_RATING: f32 = 5.0;

labelled_enum! {
    /// Outcome of the platform's document check.
    pub enum VerificationStatus {
        /// Documents checked.
        Verified => "verified",
        /// Awaiting review.
        #[default]
        Pending => "pending",
        /// Documents refused.
        Rejected => "rejected",
    }
}

/// Past engagement shown on the supplier profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierProject {
    /// Project name.
    pub title: String,
    /// What was delivered.
    pub description: String,
    /// Year of delivery.
    pub year: i32,
    /// Client organisation.
    pub client: String,
    /// Contract value.
    pub value: u64,
}

/// Client review of a supplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierReview {
    /// Display name of the reviewer.
    pub reviewer_name: String,
    /// Score, `0.0..=5.0`.
    pub rating: f32,
    /// Free-text review.
    pub comment: String,
    /// Day the review was left.
    pub date: NaiveDate,
}

/// A company listed in the supplier directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    /// Record identifier.
    pub id: RecordId,
    /// Trading name.
    pub company_name: String,
    /// Company presentation.
    pub description: String,
    /// One-line pitch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
    /// Main sector, used as the category filter.
    pub sector: String,
    /// Secondary sectors.
    #[serde(default)]
    pub sub_sectors: Vec<String>,
    /// Named contact.
    pub contact_person: String,
    /// Contact address.
    pub email: String,
    /// Contact phone.
    pub phone: String,
    /// Street address.
    pub address: String,
    /// City, used as the location filter.
    pub city: String,
    /// Company website.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    /// Logo URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    /// Gallery image URLs.
    #[serde(default)]
    pub images: Vec<String>,
    /// Services offered.
    #[serde(default)]
    pub services: Vec<String>,
    /// Held certifications.
    #[serde(default)]
    pub certifications: Vec<String>,
    /// Years in business.
    pub years_of_experience: u32,
    /// Whether the back office verified the company.
    pub is_verified: bool,
    /// Whether the supplier is promoted on the home page.
    pub is_featured: bool,
    /// Average review score, `0.0..=5.0`.
    pub rating: f32,
    /// Number of reviews received.
    pub reviews_count: u32,
    /// Reference projects.
    #[serde(default)]
    pub projects: Vec<SupplierProject>,
    /// Client reviews.
    #[serde(default)]
    pub reviews: Vec<SupplierReview>,
    /// Verification workflow state.
    pub verification_status: VerificationStatus,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
    /// Last modification instant.
    pub updated_at: DateTime<Utc>,
}

/// Create/update payload for [`Supplier`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SupplierInput {
    /// Trading name.
    pub company_name: Option<String>,
    /// Company presentation.
    pub description: Option<String>,
    /// One-line pitch.
    pub tagline: Option<String>,
    /// Main sector, used as the category filter.
    pub sector: Option<String>,
    /// Secondary sectors.
    pub sub_sectors: Option<Vec<String>>,
    /// Named contact.
    pub contact_person: Option<String>,
    /// Contact address.
    pub email: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Street address.
    pub address: Option<String>,
    /// City, used as the location filter.
    pub city: Option<String>,
    /// Company website.
    pub website: Option<String>,
    /// Logo URL.
    pub logo: Option<String>,
    /// Gallery image URLs.
    pub images: Option<Vec<String>>,
    /// Services offered.
    pub services: Option<Vec<String>>,
    /// Held certifications.
    pub certifications: Option<Vec<String>>,
    /// Years in business.
    pub years_of_experience: Option<u32>,
    /// Whether the back office verified the company.
    pub is_verified: Option<bool>,
    /// Whether the supplier is promoted on the home page.
    pub is_featured: Option<bool>,
    /// Average review score, clamped to `0.0..=5.0`.
    pub rating: Option<f32>,
    /// Number of reviews received.
    pub reviews_count: Option<u32>,
    /// Reference projects.
    pub projects: Option<Vec<SupplierProject>>,
    /// Client reviews.
    pub reviews: Option<Vec<SupplierReview>>,
    /// Verification workflow state.
    pub verification_status: Option<VerificationStatus>,
}

fn clamp_rating(rating: f32) -> f32 {
    if rating.is_nan() {
        0.0
    } else {
        rating.clamp(0.0, MAX_RATING)
    }
}

impl Record for Supplier {
    type Input = SupplierInput;

    const KIND: RecordKind = RecordKind::Supplier;

    fn id(&self) -> RecordId {
        self.id
    }

    fn schema() -> &'static FormSchema {
        schemas::supplier()
    }

    fn field_values(&self) -> FormValues {
        FormValues::from_iter([
            ("companyName", FieldValue::from(self.company_name.as_str())),
            ("description", self.description.as_str().into()),
            ("sector", self.sector.as_str().into()),
            ("contactPerson", self.contact_person.as_str().into()),
            ("email", self.email.as_str().into()),
            ("phone", self.phone.as_str().into()),
            ("city", self.city.as_str().into()),
            ("website", self.website.clone().into()),
        ])
    }

    fn input_values(input: &SupplierInput) -> FormValues {
        FormValues::from_iter([
            ("companyName", FieldValue::from(input.company_name.clone())),
            ("description", input.description.clone().into()),
            ("sector", input.sector.clone().into()),
            ("contactPerson", input.contact_person.clone().into()),
            ("email", input.email.clone().into()),
            ("phone", input.phone.clone().into()),
            ("city", input.city.clone().into()),
            ("website", input.website.clone().into()),
        ])
    }

    fn build(id: RecordId, input: SupplierInput, now: DateTime<Utc>) -> Self {
        let verification_status = input.verification_status.unwrap_or_default();
        Self {
            id,
            company_name: input.company_name.unwrap_or_default(),
            description: input.description.unwrap_or_default(),
            tagline: input.tagline,
            sector: input.sector.unwrap_or_default(),
            sub_sectors: input.sub_sectors.unwrap_or_default(),
            contact_person: input.contact_person.unwrap_or_default(),
            email: input.email.unwrap_or_default(),
            phone: input.phone.unwrap_or_default(),
            address: input.address.unwrap_or_default(),
            city: input.city.unwrap_or_default(),
            website: input.website,
            logo: input.logo,
            images: input.images.unwrap_or_default(),
            services: input.services.unwrap_or_default(),
            certifications: input.certifications.unwrap_or_default(),
            years_of_experience: input.years_of_experience.unwrap_or_default(),
            is_verified: input
                .is_verified
                .unwrap_or(verification_status == VerificationStatus::Verified),
            is_featured: input.is_featured.unwrap_or_default(),
            rating: clamp_rating(input.rating.unwrap_or_default()),
            reviews_count: input.reviews_count.unwrap_or_default(),
            projects: input.projects.unwrap_or_default(),
            reviews: input.reviews.unwrap_or_default(),
            verification_status,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, input: SupplierInput) {
        let SupplierInput {
            company_name,
            description,
            tagline,
            sector,
            sub_sectors,
            contact_person,
            email,
            phone,
            address,
            city,
            website,
            logo,
            images,
            services,
            certifications,
            years_of_experience,
            is_verified,
            is_featured,
            rating,
            reviews_count,
            projects,
            reviews,
            verification_status,
        } = input;
        replace(&mut self.company_name, company_name);
        replace(&mut self.description, description);
        replace(&mut self.sector, sector);
        replace(&mut self.sub_sectors, sub_sectors);
        replace(&mut self.contact_person, contact_person);
        replace(&mut self.email, email);
        replace(&mut self.phone, phone);
        replace(&mut self.address, address);
        replace(&mut self.city, city);
        replace(&mut self.images, images);
        replace(&mut self.services, services);
        replace(&mut self.certifications, certifications);
        replace(&mut self.years_of_experience, years_of_experience);
        replace(&mut self.is_verified, is_verified);
        replace(&mut self.is_featured, is_featured);
        replace(&mut self.rating, rating.map(clamp_rating));
        replace(&mut self.reviews_count, reviews_count);
        replace(&mut self.projects, projects);
        replace(&mut self.reviews, reviews);
        replace(&mut self.verification_status, verification_status);
        for (slot, provided) in [
            (&mut self.tagline, tagline),
            (&mut self.website, website),
            (&mut self.logo, logo),
        ] {
            if provided.is_some() {
                *slot = provided;
            }
        }
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

impl Filterable for Supplier {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.company_name.as_str(),
            self.description.as_str(),
            self.sector.as_str(),
        ]
    }

    fn category(&self) -> Option<&str> {
        Some(self.sector.as_str())
    }

    fn location(&self) -> Option<&str> {
        Some(self.city.as_str())
    }

    fn status(&self) -> Option<&str> {
        Some(self.verification_status.as_str())
    }

    fn is_verified(&self) -> Option<bool> {
        Some(self.is_verified)
    }

    fn is_featured(&self) -> Option<bool> {
        Some(self.is_featured)
    }

    fn rating(&self) -> Option<f32> {
        Some(self.rating)
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
    use rstest::{fixture, rstest};

    #[fixture]
    fn input() -> SupplierInput {
        SupplierInput {
            company_name: Some("Tech Solutions CI".to_owned()),
            description: Some("Intégrateur de solutions informatiques".to_owned()),
            sector: Some("Informatique".to_owned()),
            contact_person: Some("Kouassi Jean".to_owned()),
            email: Some("contact@techsolutions.ci".to_owned()),
            phone: Some("+225 0102030405".to_owned()),
            city: Some("Abidjan".to_owned()),
            ..SupplierInput::default()
        }
    }

    #[rstest]
    fn draft_requires_contact_details(mut input: SupplierInput) {
        assert!(Supplier::check_draft(&input).is_ok());
        input.email = Some("contact".to_owned());
        input.city = None;
        let violations = Supplier::check_draft(&input).expect_err("invalid draft");
        assert_eq!(violations.fields().collect::<Vec<_>>(), vec!["city", "email"]);
    }

    #[rstest]
    fn website_must_be_http_when_present(mut input: SupplierInput) {
        input.website = Some("techsolutions.ci".to_owned());
        assert!(Supplier::check_draft(&input).is_err());
        input.website = Some("https://techsolutions.ci".to_owned());
        assert!(Supplier::check_draft(&input).is_ok());
    }

    #[rstest]
    #[case(7.5, MAX_RATING)]
    #[case(-1.0, 0.0)]
    #[case(4.2, 4.2)]
    fn rating_is_clamped(input: SupplierInput, #[case] rating: f32, #[case] expected: f32) {
        let supplier = Supplier::build(
            RecordId::random(),
            SupplierInput {
                rating: Some(rating),
                ..input
            },
            Utc::now(),
        );
        assert!((supplier.rating - expected).abs() < f32::EPSILON);
    }

    #[rstest]
    fn verified_status_implies_verified_flag(input: SupplierInput) {
        let supplier = Supplier::build(
            RecordId::random(),
            SupplierInput {
                verification_status: Some(VerificationStatus::Verified),
                ..input
            },
            Utc::now(),
        );
        assert!(supplier.is_verified);
        assert_eq!(Filterable::status(&supplier), Some("verified"));
    }
}
