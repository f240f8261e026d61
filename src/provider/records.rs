//! Record lookup
//!
//! Finds the TXT record carrying a given label inside a zone. Exactly one
//! match is required; zero and several matches are both reported as a count
//! mismatch.

use reqwest::Method;
use tracing::debug;

use super::client::DnsMadeEasyClient;
use super::types::{RecordId, RecordListing, RecordType, ZoneId};
use crate::error::{DnsMadeEasyError, Result};

impl DnsMadeEasyClient {
    /// Resolve the id of the TXT record named `record_name` in `zone_id`
    pub async fn resolve_record_id(&self, record_name: &str, zone_id: ZoneId) -> Result<RecordId> {
        let name = record_name.to_lowercase();
        let url = format!(
            "{}?recordName={}&type={}",
            self.records_url(zone_id),
            urlencoding::encode(&name),
            RecordType::TXT
        );

        debug!(record = %name, zone_id = %zone_id, "Looking up record ID");

        let body = self.call::<()>(Method::GET, &url, None).await?;
        let listing: RecordListing = serde_json::from_slice(&body)
            .map_err(|source| DnsMadeEasyError::Decode { what: "record listing", source })?;

        let record_id = select_record(&listing, record_name)?;
        debug!(record = %name, record_id = %record_id, "Found record ID");
        Ok(record_id)
    }
}

/// Pick the single record named `record_name` (case-insensitively)
pub fn select_record(listing: &RecordListing, record_name: &str) -> Result<RecordId> {
    if listing.total_records != 1 {
        return Err(DnsMadeEasyError::RecordCount(listing.total_records));
    }

    let wanted = record_name.to_lowercase();
    listing
        .data
        .iter()
        .find(|record| record.name.to_lowercase() == wanted)
        .map(|record| record.id)
        .ok_or_else(|| DnsMadeEasyError::RecordNotFound(record_name.to_string()))
}
