//! Advertisement rotation.
//!
//! A slot shows a random advertisement among those running for its position
//! today, or a house advertisement when none is running.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use chrono::NaiveDate;
use mockable::Clock;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::debug;

use crate::domain::ports::{AdPlacements, RecordRepository, RecordRepositoryError};
use crate::domain::{AdPosition, AdType, Advertisement, Error};

/// Title of the house advertisement.
pub const DEFAULT_TITLE: &str = "Promouvez votre entreprise";
/// Description of the house advertisement.
pub const DEFAULT_DESCRIPTION: &str = "Faites-vous connaître auprès de milliers de professionnels";
/// Link of the house advertisement.
pub const DEFAULT_LINK: &str = "/promote";

/// House advertisement shown when no placement is running.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DefaultPlacement {
    /// `default-<position>`.
    pub id: String,
    /// Headline.
    pub title: &'static str,
    /// Body text.
    pub description: &'static str,
    /// Click-through target.
    pub link_url: &'static str,
    /// Creative format.
    #[serde(rename = "type")]
    pub kind: AdType,
    /// Slot the house ad fills.
    pub position: AdPosition,
    /// Always `true`.
    pub is_active: bool,
}

impl DefaultPlacement {
    /// House advertisement for `position`.
    #[must_use]
    pub fn for_position(position: AdPosition) -> Self {
        Self {
            id: format!("default-{position}"),
            title: DEFAULT_TITLE,
            description: DEFAULT_DESCRIPTION,
            link_url: DEFAULT_LINK,
            kind: AdType::Banner,
            position,
            is_active: true,
        }
    }
}

/// Advertisement chosen for a slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Placement {
    /// A stored, running advertisement.
    Advertisement(Box<Advertisement>),
    /// The house advertisement.
    Default(DefaultPlacement),
}

impl Placement {
    /// Whether the house advertisement was chosen.
    #[must_use]
    pub const fn is_default(&self) -> bool {
        matches!(self, Self::Default(_))
    }
}

/// Advertisements running for `position` on `today`, in input order.
pub fn eligible<'a>(
    ads: impl IntoIterator<Item = &'a Advertisement>,
    position: AdPosition,
    today: NaiveDate,
) -> Vec<&'a Advertisement> {
    ads.into_iter()
        .filter(|ad| ad.position == position && ad.is_running(today))
        .collect()
}

/// Pick a running advertisement uniformly at random, falling back to the
/// house advertisement.
pub fn pick<R: Rng + ?Sized>(
    ads: &[Advertisement],
    position: AdPosition,
    today: NaiveDate,
    rng: &mut R,
) -> Placement {
    eligible(ads, position, today)
        .choose(rng)
        .map_or_else(
            || Placement::Default(DefaultPlacement::for_position(position)),
            |ad| Placement::Advertisement(Box::new((*ad).clone())),
        )
}

/// [`AdPlacements`] over the advertisement store.
pub struct AdRotationService<Repo: ?Sized> {
    repository: Arc<Repo>,
    clock: Arc<dyn Clock>,
    rng: Mutex<SmallRng>,
}

impl<Repo: ?Sized> AdRotationService<Repo> {
    /// Service drawing from an entropy-seeded generator.
    pub fn new(repository: Arc<Repo>, clock: Arc<dyn Clock>) -> Self {
        Self::with_rng(repository, clock, SmallRng::from_entropy())
    }

    /// Service drawing from `rng`; seed it for reproducible picks.
    pub fn with_rng(repository: Arc<Repo>, clock: Arc<dyn Clock>, rng: SmallRng) -> Self {
        Self {
            repository,
            clock,
            rng: Mutex::new(rng),
        }
    }
}

#[async_trait]
impl<Repo> AdPlacements for AdRotationService<Repo>
where
    Repo: RecordRepository<Advertisement> + ?Sized,
{
    async fn placement(&self, position: AdPosition) -> Result<Placement, Error> {
        let ads = self
            .repository
            .all()
            .await
            .map_err(|failure: RecordRepositoryError| {
                Error::server_error(format!("advertisement store error: {failure}"))
            })?;
        let today = self.clock.utc().date_naive();
        let placement = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            pick(&ads, position, today, &mut *rng)
        };
        debug!(%position, fallback = placement.is_default(), "advertisement placement picked");
        Ok(placement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockRecordRepository;
    use crate::domain::{Record, RecordId};
    use crate::test_support::{FixtureClock, advertisement_input};
    use rstest::{fixture, rstest};

    fn day(month: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, month, d).expect("valid date")
    }

    #[fixture]
    fn ads() -> Vec<Advertisement> {
        let clock = FixtureClock::default();
        let mut top = Advertisement::build(RecordId::random(), advertisement_input("Salon BTP"), clock.utc());
        top.position = AdPosition::Top;
        let mut inactive = top.clone();
        inactive.id = RecordId::random();
        inactive.is_active = false;
        let mut bottom = top.clone();
        bottom.id = RecordId::random();
        bottom.position = AdPosition::Bottom;
        vec![top, inactive, bottom]
    }

    #[rstest]
    fn eligible_requires_position_activity_and_window(ads: Vec<Advertisement>) {
        assert_eq!(eligible(&ads, AdPosition::Top, day(4, 1)).len(), 1);
        assert!(eligible(&ads, AdPosition::Top, day(7, 1)).is_empty());
        assert!(eligible(&ads, AdPosition::Left, day(4, 1)).is_empty());
    }

    #[rstest]
    fn pick_falls_back_to_house_advertisement(ads: Vec<Advertisement>) {
        let mut rng = SmallRng::seed_from_u64(7);
        let placement = pick(&ads, AdPosition::Middle, day(4, 1), &mut rng);
        assert_eq!(
            placement,
            Placement::Default(DefaultPlacement::for_position(AdPosition::Middle))
        );
        let json = serde_json::to_value(&placement).expect("serialise placement");
        assert_eq!(json["id"], "default-middle");
        assert_eq!(json["linkUrl"], DEFAULT_LINK);
    }

    #[rstest]
    fn pick_only_returns_eligible_ads(ads: Vec<Advertisement>) {
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..20 {
            match pick(&ads, AdPosition::Bottom, day(5, 15), &mut rng) {
                Placement::Advertisement(ad) => assert_eq!(ad.position, AdPosition::Bottom),
                Placement::Default(_) => panic!("a running advertisement exists"),
            }
        }
    }

    #[rstest]
    #[tokio::test]
    async fn service_uses_the_clock_date(ads: Vec<Advertisement>) {
        let mut repository = MockRecordRepository::new();
        repository.expect_all().returning(move || Ok(ads.clone()));
        let clock = FixtureClock::default();
        let service = AdRotationService::with_rng(
            Arc::new(repository),
            Arc::new(clock.clone()),
            SmallRng::seed_from_u64(1),
        );

        let placement = service.placement(AdPosition::Top).await.expect("placement");
        assert!(!placement.is_default());

        clock.advance(chrono::Duration::days(200));
        let placement = service.placement(AdPosition::Top).await.expect("placement");
        assert!(placement.is_default());
    }
}
