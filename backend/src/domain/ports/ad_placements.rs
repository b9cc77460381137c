//! Driving port for advertisement placement picks.

use async_trait::async_trait;

use crate::domain::ad_rotation::Placement;
use crate::domain::{AdPosition, Error};

/// Picks the advertisement shown in a page slot.
#[async_trait]
pub trait AdPlacements: Send + Sync {
    /// Advertisement for `position`, falling back to the default placement.
    async fn placement(&self, position: AdPosition) -> Result<Placement, Error>;
}
