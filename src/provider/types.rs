//! DNS Made Easy API types
//!
//! Typed contracts for the handful of endpoints the solver touches. The
//! provider returns many more attributes per zone and record; only the fields
//! declared here are read and everything else is ignored.

use serde::{Deserialize, Serialize};

/// Fixed TTL (seconds) for challenge records
pub const CHALLENGE_TTL: u32 = 120;

/// Credentials and target for one Present/CleanUp call
#[derive(Clone)]
pub struct ProviderCredentials {
    pub api_key: String,
    pub secret_key: String,
    pub api_url: String,
    pub zone_name: String,
}

impl std::fmt::Debug for ProviderCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderCredentials")
            .field("api_key", &self.api_key)
            .field("secret_key", &"<REDACTED>")
            .field("api_url", &self.api_url)
            .field("zone_name", &self.zone_name)
            .finish()
    }
}

impl ProviderCredentials {
    /// Base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }
}

/// Provider-side numeric zone id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZoneId(pub u64);

impl std::fmt::Display for ZoneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Provider-side numeric record id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl RecordId {
    /// The provider never hands out id 0; it marks "no record"
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// `GET /dns/managed`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneListing {
    #[serde(default)]
    pub total_records: u64,
    #[serde(default)]
    pub total_pages: u64,
    #[serde(default)]
    pub data: Vec<ZoneSummary>,
    #[serde(default)]
    pub page: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ZoneSummary {
    pub name: String,
    pub id: ZoneId,
}

/// `GET /dns/managed/{zoneId}/records`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordListing {
    #[serde(default)]
    pub total_records: u64,
    #[serde(default)]
    pub total_pages: u64,
    #[serde(default)]
    pub data: Vec<RecordSummary>,
    #[serde(default)]
    pub page: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecordSummary {
    pub name: String,
    pub id: RecordId,
    #[serde(default)]
    pub failed: bool,
}

/// DNS record type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    #[allow(clippy::upper_case_acronyms)]
    TXT,
}

impl std::fmt::Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordType::TXT => write!(f, "TXT"),
        }
    }
}

/// `POST /dns/managed/{zoneId}/records`
#[derive(Debug, Clone, Serialize)]
pub struct CreateRecordRequest {
    pub value: String,
    pub ttl: u32,
    #[serde(rename = "type")]
    pub record_type: RecordType,
    pub name: String,
}

impl CreateRecordRequest {
    /// Challenge TXT record with the fixed challenge TTL
    pub fn txt(name: &str, value: &str) -> Self {
        Self {
            value: value.to_string(),
            ttl: CHALLENGE_TTL,
            record_type: RecordType::TXT,
            name: name.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_record_request_serialization() {
        let request = CreateRecordRequest::txt("_acme-challenge", "token");
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(
            json,
            r#"{"value":"token","ttl":120,"type":"TXT","name":"_acme-challenge"}"#
        );
    }

    #[test]
    fn test_zone_listing_ignores_extra_fields() {
        let raw = r#"{
            "totalRecords": 1,
            "totalPages": 1,
            "data": [{
                "processMulti": false,
                "activeThirdParties": [],
                "folderId": 1234,
                "gtdEnabled": false,
                "updated": 1589000000000,
                "created": 1588000000000,
                "name": "example.com",
                "id": 42
            }],
            "page": 0
        }"#;

        let listing: ZoneListing = serde_json::from_str(raw).unwrap();
        assert_eq!(listing.total_pages, 1);
        assert_eq!(listing.data[0].id, ZoneId(42));
    }

    #[test]
    fn test_credentials_debug_redacts_secret() {
        let creds = ProviderCredentials {
            api_key: "key".into(),
            secret_key: "super-secret".into(),
            api_url: "https://api.dnsmadeeasy.com/V2.0/".into(),
            zone_name: "example.com".into(),
        };
        let out = format!("{:?}", creds);
        assert!(!out.contains("super-secret"));
        assert_eq!(creds.base_url(), "https://api.dnsmadeeasy.com/V2.0");
    }
}
