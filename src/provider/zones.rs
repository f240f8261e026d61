//! Zone lookup
//!
//! Maps the configured zone name onto the provider's numeric zone id. The
//! listing is never paginated: anything other than exactly one page is
//! rejected rather than scanning a partial result.

use reqwest::Method;
use tracing::debug;

use super::client::DnsMadeEasyClient;
use super::types::{ZoneId, ZoneListing};
use crate::error::{DnsMadeEasyError, Result};

impl DnsMadeEasyClient {
    /// Resolve the id of the configured zone
    pub async fn resolve_zone_id(&self) -> Result<ZoneId> {
        let zone_name = &self.credentials().zone_name;
        debug!(zone = %zone_name, "Looking up zone ID");

        let body = self.call::<()>(Method::GET, &self.zones_url(), None).await?;
        let listing: ZoneListing = serde_json::from_slice(&body)
            .map_err(|source| DnsMadeEasyError::Decode { what: "zone listing", source })?;

        let zone_id = select_zone(&listing, zone_name)?;
        debug!(zone = %zone_name, zone_id = %zone_id, "Found zone ID");
        Ok(zone_id)
    }
}

/// Pick the zone named `zone_name` out of a single-page listing
pub fn select_zone(listing: &ZoneListing, zone_name: &str) -> Result<ZoneId> {
    if listing.total_pages != 1 {
        return Err(DnsMadeEasyError::ZonePageCount(listing.total_pages));
    }

    listing
        .data
        .iter()
        .find(|zone| zone.name == zone_name)
        .map(|zone| zone.id)
        .ok_or_else(|| DnsMadeEasyError::ZoneNotFound(zone_name.to_string()))
}
