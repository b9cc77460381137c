//! Calls for tenders.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::filter::Filterable;
use crate::domain::form::{FormSchema, FormValues, schemas};
use crate::domain::record::{Record, RecordId, RecordKind, labelled_enum, tender_reference};
use crate::domain::validation::FieldValue;

/// Currency applied when a tender does not name one.
pub const DEFAULT_CURRENCY: &str = "FCFA";

labelled_enum! {
    /// Who may answer the tender.
    pub enum TenderType {
        /// Open to every supplier.
        #[default]
        Public => "public",
        /// Invitation only.
        Private => "private",
    }
}

labelled_enum! {
    /// Publication lifecycle.
    pub enum TenderStatus {
        /// Not yet visible.
        #[default]
        Draft => "draft",
        /// Accepting bids.
        Published => "published",
        /// Deadline passed.
        Closed => "closed",
        /// Withdrawn by the organisation.
        Cancelled => "cancelled",
    }
}

/// Document attached to a tender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenderDocument {
    /// Document identifier.
    pub id: String,
    /// File name shown to bidders.
    pub name: String,
    /// Download location.
    pub url: String,
    /// Size in bytes.
    pub size: u64,
    /// MIME type or extension.
    #[serde(rename = "type")]
    pub kind: String,
    /// Upload date.
    pub upload_date: NaiveDate,
}

/// A call for tenders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tender {
    /// Record identifier.
    pub id: RecordId,
    /// Short headline.
    pub title: String,
    /// Full scope of the call.
    pub description: String,
    /// `AO-<year>-<suffix>` unless supplied.
    pub reference: String,
    /// Procurement procedure.
    #[serde(rename = "type")]
    pub kind: TenderType,
    /// Publication state.
    pub status: TenderStatus,
    /// Business sector, used as the category filter.
    pub sector: String,
    /// City or region, used as the location filter.
    pub location: String,
    /// Day the call was published.
    pub publish_date: NaiveDate,
    /// Last day for submissions.
    pub deadline: NaiveDate,
    /// Budget estimate in `currency` units.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_amount: Option<u64>,
    /// ISO code or `FCFA`.
    pub currency: String,
    /// Address receiving questions and bids.
    pub contact_email: String,
    /// Optional phone contact.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    /// Attached files.
    #[serde(default)]
    pub documents: Vec<TenderDocument>,
    /// Issuing organisation.
    pub organization_name: String,
    /// Eligibility requirements, in display order.
    #[serde(default)]
    pub requirements: Vec<String>,
    /// Account that published the call.
    pub created_by: String,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
    /// Last modification instant.
    pub updated_at: DateTime<Utc>,
}

/// Create/update payload for [`Tender`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TenderInput {
    /// Short headline.
    pub title: Option<String>,
    /// Full scope of the call.
    pub description: Option<String>,
    /// Reference; generated when absent on create.
    pub reference: Option<String>,
    /// Procurement procedure.
    #[serde(rename = "type")]
    pub kind: Option<TenderType>,
    /// Publication state.
    pub status: Option<TenderStatus>,
    /// Business sector, used as the category filter.
    pub sector: Option<String>,
    /// City or region, used as the location filter.
    pub location: Option<String>,
    /// Day the call was published.
    pub publish_date: Option<NaiveDate>,
    /// Last day for submissions.
    pub deadline: Option<NaiveDate>,
    /// Budget estimate in `currency` units.
    pub estimated_amount: Option<u64>,
    /// ISO code or `FCFA`.
    pub currency: Option<String>,
    /// Address receiving questions and bids.
    pub contact_email: Option<String>,
    /// Optional phone contact.
    pub contact_phone: Option<String>,
    /// Attached files.
    pub documents: Option<Vec<TenderDocument>>,
    /// Issuing organisation.
    pub organization_name: Option<String>,
    /// Eligibility requirements, in display order.
    pub requirements: Option<Vec<String>>,
    /// Account that published the call.
    pub created_by: Option<String>,
}

fn date_value(date: Option<NaiveDate>) -> FieldValue {
    FieldValue::from(date.map(|date| date.to_string()))
}

impl Record for Tender {
    type Input = TenderInput;

    const KIND: RecordKind = RecordKind::Tender;

    fn id(&self) -> RecordId {
        self.id
    }

    fn schema() -> &'static FormSchema {
        schemas::tender()
    }

    fn field_values(&self) -> FormValues {
        FormValues::from_iter([
            ("title", FieldValue::from(self.title.as_str())),
            ("description", self.description.as_str().into()),
            ("type", self.kind.into()),
            ("status", self.status.into()),
            ("sector", self.sector.as_str().into()),
            ("location", self.location.as_str().into()),
            (
                "estimatedAmount",
                self.estimated_amount.map(|amount| amount.to_string()).into(),
            ),
            ("currency", self.currency.as_str().into()),
            ("publishDate", date_value(Some(self.publish_date))),
            ("deadline", date_value(Some(self.deadline))),
            ("contactEmail", self.contact_email.as_str().into()),
            ("contactPhone", self.contact_phone.clone().into()),
            ("organizationName", self.organization_name.as_str().into()),
        ])
    }

    fn input_values(input: &TenderInput) -> FormValues {
        FormValues::from_iter([
            ("title", FieldValue::from(input.title.clone())),
            ("description", input.description.clone().into()),
            ("type", input.kind.into()),
            ("status", input.status.into()),
            ("sector", input.sector.clone().into()),
            ("location", input.location.clone().into()),
            (
                "estimatedAmount",
                input.estimated_amount.map(|amount| amount.to_string()).into(),
            ),
            ("currency", input.currency.clone().into()),
            ("publishDate", date_value(input.publish_date)),
            ("deadline", date_value(input.deadline)),
            ("contactEmail", input.contact_email.clone().into()),
            ("contactPhone", input.contact_phone.clone().into()),
            ("organizationName", input.organization_name.clone().into()),
        ])
    }

    fn build(id: RecordId, input: TenderInput, now: DateTime<Utc>) -> Self {
        let today = now.date_naive();
        let publish_date = input.publish_date.unwrap_or(today);
        Self {
            id,
            title: input.title.unwrap_or_default(),
            description: input.description.unwrap_or_default(),
            reference: input
                .reference
                .unwrap_or_else(|| tender_reference(id, publish_date.year())),
            kind: input.kind.unwrap_or_default(),
            status: input.status.unwrap_or_default(),
            sector: input.sector.unwrap_or_default(),
            location: input.location.unwrap_or_default(),
            publish_date,
            deadline: input.deadline.unwrap_or(today),
            estimated_amount: input.estimated_amount,
            currency: input
                .currency
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_owned()),
            contact_email: input.contact_email.unwrap_or_default(),
            contact_phone: input.contact_phone,
            documents: input.documents.unwrap_or_default(),
            organization_name: input.organization_name.unwrap_or_default(),
            requirements: input.requirements.unwrap_or_default(),
            created_by: input.created_by.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, input: TenderInput) {
        let TenderInput {
            title,
            description,
            reference,
            kind,
            status,
            sector,
            location,
            publish_date,
            deadline,
            estimated_amount,
            currency,
            contact_email,
            contact_phone,
            documents,
            organization_name,
            requirements,
            created_by,
        } = input;
        replace(&mut self.title, title);
        replace(&mut self.description, description);
        replace(&mut self.reference, reference);
        replace(&mut self.kind, kind);
        replace(&mut self.status, status);
        replace(&mut self.sector, sector);
        replace(&mut self.location, location);
        replace(&mut self.publish_date, publish_date);
        replace(&mut self.deadline, deadline);
        if estimated_amount.is_some() {
            self.estimated_amount = estimated_amount;
        }
        replace(&mut self.currency, currency);
        replace(&mut self.contact_email, contact_email);
        if contact_phone.is_some() {
            self.contact_phone = contact_phone;
        }
        replace(&mut self.documents, documents);
        replace(&mut self.organization_name, organization_name);
        replace(&mut self.requirements, requirements);
        replace(&mut self.created_by, created_by);
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

/// Overwrite `slot` when a value was provided.
pub(crate) fn replace<T>(slot: &mut T, provided: Option<T>) {
    if let Some(value) = provided {
        *slot = value;
    }
}

impl Filterable for Tender {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.description.as_str(), self.sector.as_str()]
    }

    fn category(&self) -> Option<&str> {
        Some(self.sector.as_str())
    }

    fn location(&self) -> Option<&str> {
        Some(self.location.as_str())
    }

    fn status(&self) -> Option<&str> {
        Some(self.status.as_str())
    }

    fn kind(&self) -> Option<&str> {
        Some(self.kind.as_str())
    }

    fn relevant_date(&self) -> Option<NaiveDate> {
        Some(self.publish_date)
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        Some(self.created_at)
    }
}
