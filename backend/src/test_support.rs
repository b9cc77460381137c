//! Test utilities shared by unit tests (in `src/`) and integration tests
//! (in `tests/`).

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone, Utc};
use mockable::Clock;

use crate::domain::{AdvertisementInput, SupplierInput, TenderInput, TenderType};

/// Clock returning a settable instant.
///
/// # Examples
/// ```
/// use ci_tender::test_support::FixtureClock;
/// use mockable::Clock;
///
/// let clock = FixtureClock::default();
/// let before = clock.utc();
/// clock.advance(chrono::Duration::minutes(5));
/// assert!(clock.utc() > before);
/// ```
#[derive(Debug, Clone)]
pub struct FixtureClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl FixtureClock {
    /// Clock frozen at `now`.
    #[must_use]
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(now)),
        }
    }

    /// Move the clock forward by `step`.
    pub fn advance(&self, step: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += step;
    }
}

impl Default for FixtureClock {
    /// 10 March 2024, 09:00 UTC.
    fn default() -> Self {
        Self::at(
            Utc.with_ymd_and_hms(2024, 3, 10, 9, 0, 0)
                .single()
                .unwrap_or_default(),
        )
    }
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

const SECTORS: [&str; 3] = ["BTP", "Informatique", "Santé"];
const CITIES: [&str; 3] = ["Abidjan", "Yamoussoukro", "Bouaké"];

fn pick(values: [&str; 3], index: usize) -> String {
    values.get(index % values.len()).copied().unwrap_or_default().to_owned()
}

/// Valid tender payload; sector and location rotate with `index`.
#[must_use]
pub fn tender_input(index: usize) -> TenderInput {
    TenderInput {
        title: Some(format!("Appel d'offres numéro {index}")),
        description: Some(format!(
            "Fourniture et installation d'équipements pour le lot {index}, \
             conformément au cahier des charges."
        )),
        kind: Some(TenderType::Public),
        sector: Some(pick(SECTORS, index)),
        location: Some(pick(CITIES, index)),
        deadline: NaiveDate::from_ymd_opt(2024, 12, 31),
        contact_email: Some("marches@example.ci".to_owned()),
        organization_name: Some("Direction des Marchés Publics".to_owned()),
        ..TenderInput::default()
    }
}

/// Valid supplier payload; sector and city rotate with `index`.
#[must_use]
pub fn supplier_input(index: usize) -> SupplierInput {
    SupplierInput {
        company_name: Some(format!("Entreprise {index}")),
        description: Some("Prestataire agréé".to_owned()),
        sector: Some(pick(SECTORS, index)),
        contact_person: Some("Koffi Yao".to_owned()),
        email: Some(format!("contact{index}@example.ci")),
        phone: Some("+225 0102030405".to_owned()),
        city: Some(pick(CITIES, index)),
        ..SupplierInput::default()
    }
}

/// Valid advertisement payload running through June 2024.
#[must_use]
pub fn advertisement_input(title: &str) -> AdvertisementInput {
    AdvertisementInput {
        title: Some(title.to_owned()),
        link_url: Some("https://example.ci/promo".to_owned()),
        start_date: NaiveDate::from_ymd_opt(2024, 3, 1),
        end_date: NaiveDate::from_ymd_opt(2024, 6, 30),
        ..AdvertisementInput::default()
    }
}
