//! Advertisement placements.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::filter::Filterable;
use crate::domain::form::{FormSchema, FormValues, schemas};
use crate::domain::record::{Record, RecordId, RecordKind, labelled_enum};
use crate::domain::tender::replace;
use crate::domain::validation::FieldValue;

labelled_enum! {
    /// Visual format.
    pub enum AdType {
        /// Full-width strip.
        #[default]
        Banner => "banner",
        /// Narrow column block.
        Sidebar => "sidebar",
        /// Block between list items.
        Inline => "inline",
    }
}

labelled_enum! {
    /// Slot on the page.
    pub enum AdPosition {
        #[default]
        Top => "top",
        Middle => "middle",
        Bottom => "bottom",
        Left => "left",
        Right => "right",
    }
}

impl AdPosition {
    /// Every slot, in page order.
    pub const ALL: [Self; 5] = [
        Self::Top,
        Self::Middle,
        Self::Bottom,
        Self::Left,
        Self::Right,
    ];

    /// Slot named `label`, if any.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|position| position.as_str() == label)
    }
}

/// A paid placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Advertisement {
    /// Record identifier.
    pub id: RecordId,
    /// Headline.
    pub title: String,
    /// Body text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Creative URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Click-through target.
    pub link_url: String,
    /// Creative format.
    #[serde(rename = "type")]
    pub kind: AdType,
    /// Slot the placement runs in.
    pub position: AdPosition,
    /// Whether the placement may run at all.
    pub is_active: bool,
    /// First day of the run.
    pub start_date: NaiveDate,
    /// Last day of the run, inclusive.
    pub end_date: NaiveDate,
    /// Recorded clicks.
    pub click_count: u64,
    /// Recorded impressions.
    pub impression_count: u64,
    /// Audience description, searched by keyword.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_audience: Option<String>,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
    /// Last modification instant.
    pub updated_at: DateTime<Utc>,
}

impl Advertisement {
    /// Whether the placement may be shown on `today`.
    #[must_use]
    pub fn is_running(&self, today: NaiveDate) -> bool {
        self.is_active && self.start_date <= today && today <= self.end_date
    }
}

/// Create/update payload for [`Advertisement`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdvertisementInput {
    /// Headline.
    pub title: Option<String>,
    /// Body text.
    pub description: Option<String>,
    /// Creative URL.
    pub image_url: Option<String>,
    /// Click-through target.
    pub link_url: Option<String>,
    /// Creative format.
    #[serde(rename = "type")]
    pub kind: Option<AdType>,
    /// Slot the placement runs in.
    pub position: Option<AdPosition>,
    /// Whether the placement may run at all.
    pub is_active: Option<bool>,
    /// First day of the run.
    pub start_date: Option<NaiveDate>,
    /// Last day of the run, inclusive.
    pub end_date: Option<NaiveDate>,
    /// Recorded clicks.
    pub click_count: Option<u64>,
    /// Recorded impressions.
    pub impression_count: Option<u64>,
    /// Audience description, searched by keyword.
    pub target_audience: Option<String>,
}

fn date_value(date: Option<NaiveDate>) -> FieldValue {
    FieldValue::from(date.map(|date| date.to_string()))
}

impl Record for Advertisement {
    type Input = AdvertisementInput;

    const KIND: RecordKind = RecordKind::Advertisement;

    fn id(&self) -> RecordId {
        self.id
    }

    fn schema() -> &'static FormSchema {
        schemas::advertisement()
    }

    fn field_values(&self) -> FormValues {
        FormValues::from_iter([
            ("title", FieldValue::from(self.title.as_str())),
            ("description", self.description.clone().into()),
            ("type", self.kind.into()),
            ("position", self.position.into()),
            ("linkUrl", self.link_url.as_str().into()),
            ("imageUrl", self.image_url.clone().into()),
            ("startDate", date_value(Some(self.start_date))),
            ("endDate", date_value(Some(self.end_date))),
            ("isActive", self.is_active.into()),
            ("targetAudience", self.target_audience.clone().into()),
        ])
    }

    fn input_values(input: &AdvertisementInput) -> FormValues {
        FormValues::from_iter([
            ("title", FieldValue::from(input.title.clone())),
            ("description", input.description.clone().into()),
            ("type", input.kind.into()),
            ("position", input.position.into()),
            ("linkUrl", input.link_url.clone().into()),
            ("imageUrl", input.image_url.clone().into()),
            ("startDate", date_value(input.start_date)),
            ("endDate", date_value(input.end_date)),
            ("isActive", input.is_active.into()),
            ("targetAudience", input.target_audience.clone().into()),
        ])
    }

    fn build(id: RecordId, input: AdvertisementInput, now: DateTime<Utc>) -> Self {
        let today = now.date_naive();
        Self {
            id,
            title: input.title.unwrap_or_default(),
            description: input.description,
            image_url: input.image_url,
            link_url: input.link_url.unwrap_or_default(),
            kind: input.kind.unwrap_or_default(),
            position: input.position.unwrap_or_default(),
            is_active: input.is_active.unwrap_or(true),
            start_date: input.start_date.unwrap_or(today),
            end_date: input.end_date.unwrap_or(today),
            click_count: input.click_count.unwrap_or_default(),
            impression_count: input.impression_count.unwrap_or_default(),
            target_audience: input.target_audience,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, input: AdvertisementInput) {
        let AdvertisementInput {
            title,
            description,
            image_url,
            link_url,
            kind,
            position,
            is_active,
            start_date,
            end_date,
            click_count,
            impression_count,
            target_audience,
        } = input;
        replace(&mut self.title, title);
        replace(&mut self.link_url, link_url);
        replace(&mut self.kind, kind);
        replace(&mut self.position, position);
        replace(&mut self.is_active, is_active);
        replace(&mut self.start_date, start_date);
        replace(&mut self.end_date, end_date);
        replace(&mut self.click_count, click_count);
        replace(&mut self.impression_count, impression_count);
        for (slot, provided) in [
            (&mut self.description, description),
            (&mut self.image_url, image_url),
            (&mut self.target_audience, target_audience),
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

impl Filterable for Advertisement {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.title.as_str()];
        fields.extend(self.description.as_deref());
        fields.extend(self.target_audience.as_deref());
        fields
    }

    fn category(&self) -> Option<&str> {
        Some(self.position.as_str())
    }

    fn status(&self) -> Option<&str> {
        Some(if self.is_active { "active" } else { "inactive" })
    }

    fn kind(&self) -> Option<&str> {
        Some(self.kind.as_str())
    }

    fn relevant_date(&self) -> Option<NaiveDate> {
        Some(self.start_date)
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        Some(self.created_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).expect("valid date")
    }

    #[fixture]
    fn input() -> AdvertisementInput {
        AdvertisementInput {
            title: Some("Salon du BTP 2024".to_owned()),
            link_url: Some("https://salon-btp.ci".to_owned()),
            start_date: Some(day(1)),
            end_date: Some(day(30)),
            ..AdvertisementInput::default()
        }
    }

    #[rstest]
    fn defaults_follow_the_create_screen(input: AdvertisementInput) {
        assert!(Advertisement::check_draft(&input).is_ok());
        let ad = Advertisement::build(RecordId::random(), input, Utc::now());
        assert_eq!(ad.kind, AdType::Banner);
        assert_eq!(ad.position, AdPosition::Top);
        assert!(ad.is_active);
    }

    #[rstest]
    fn link_must_be_http(mut input: AdvertisementInput) {
        input.link_url = Some("salon-btp.ci".to_owned());
        let violations = Advertisement::check_draft(&input).expect_err("invalid link");
        assert_eq!(violations.fields().collect::<Vec<_>>(), vec!["linkUrl"]);
    }

    #[rstest]
    #[case(day(1), true)]
    #[case(day(30), true)]
    #[case(NaiveDate::from_ymd_opt(2024, 7, 1).expect("valid date"), false)]
    fn running_window_is_inclusive(
        input: AdvertisementInput,
        #[case] today: NaiveDate,
        #[case] running: bool,
    ) {
        let ad = Advertisement::build(RecordId::random(), input, Utc::now());
        assert_eq!(ad.is_running(today), running);
    }

    #[rstest]
    fn inactive_ads_never_run(input: AdvertisementInput) {
        let mut ad = Advertisement::build(RecordId::random(), input, Utc::now());
        ad.is_active = false;
        assert!(!ad.is_running(day(10)));
    }

    #[rstest]
    fn positions_parse_from_labels() {
        assert_eq!(AdPosition::from_label("middle"), Some(AdPosition::Middle));
        assert_eq!(AdPosition::from_label("center"), None);
    }
}
