//! Configuration
//!
//! `SolverConfig` is the per-issuer JSON document handed over with every
//! challenge. `AppConfig` is the process-level configuration built once in
//! `main` and passed down by reference.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// TTL applied when the solver config does not set one
pub const DEFAULT_TTL: u32 = 600;

/// Production API endpoint, used when `apiURL` is not configured
pub const DEFAULT_API_URL: &str = "https://api.dnsmadeeasy.com/V2.0";

/// Solver configuration decoded from the challenge's `config` field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SolverConfig {
    /// Name of the secret holding `api-key` and `secret-key`
    #[serde(rename = "secretName", default)]
    pub secret_ref: String,

    /// Base URL of the DNS Made Easy REST API
    #[serde(rename = "apiURL", default = "default_api_url")]
    pub api_url: String,

    /// Managed zone the challenge records live in
    #[serde(rename = "zoneName", default)]
    pub zone_name: String,

    /// Record TTL in seconds, `None` when not configured
    #[serde(default)]
    pub ttl: Option<u32>,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            secret_ref: String::new(),
            api_url: default_api_url(),
            zone_name: String::new(),
            ttl: None,
        }
    }
}

impl SolverConfig {
    /// Decode the solver config. A missing or `null` document yields the
    /// defaults.
    pub fn load(raw: Option<&serde_json::Value>) -> Result<Self> {
        match raw {
            None | Some(serde_json::Value::Null) => Ok(Self::default()),
            Some(value) => Ok(Self::deserialize(value)?),
        }
    }

    /// Effective TTL, falling back to [`DEFAULT_TTL`]
    pub fn ttl(&self) -> u32 {
        self.ttl.unwrap_or(DEFAULT_TTL)
    }
}

/// Process-level configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// API group the webhook is registered under
    pub group_name: String,
}

impl AppConfig {
    pub fn new(group_name: impl Into<String>) -> Result<Self> {
        let group_name = group_name.into();
        if group_name.trim().is_empty() {
            return Err(crate::DnsMadeEasyError::Configuration(
                "GROUP_NAME must be specified".to_string(),
            ));
        }
        Ok(Self { group_name })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_config_uses_defaults() {
        let cfg = SolverConfig::load(None).unwrap();
        assert_eq!(cfg.ttl(), DEFAULT_TTL);
        assert_eq!(cfg.ttl, None);
        assert_eq!(cfg.api_url, DEFAULT_API_URL);
        assert!(cfg.zone_name.is_empty());

        let cfg = SolverConfig::load(Some(&serde_json::Value::Null)).unwrap();
        assert_eq!(cfg, SolverConfig::default());
    }

    #[test]
    fn test_full_config() {
        let raw = json!({
            "secretName": "dnsmadeeasy-credentials",
            "apiURL": "https://api.sandbox.dnsmadeeasy.com/V2.0",
            "zoneName": "example.com",
            "ttl": 300
        });
        let cfg = SolverConfig::load(Some(&raw)).unwrap();
        assert_eq!(cfg.secret_ref, "dnsmadeeasy-credentials");
        assert_eq!(cfg.api_url, "https://api.sandbox.dnsmadeeasy.com/V2.0");
        assert_eq!(cfg.zone_name, "example.com");
        assert_eq!(cfg.ttl, Some(300));
        assert_eq!(cfg.ttl(), 300);
    }

    #[test]
    fn test_ttl_defaults_when_unset() {
        let raw = json!({ "secretName": "creds", "zoneName": "example.com" });
        let cfg = SolverConfig::load(Some(&raw)).unwrap();
        assert_eq!(cfg.ttl, None);
        assert_eq!(cfg.ttl(), 600);
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let raw = json!({ "secretName": "creds", "apiKey": "inline" });
        let err = SolverConfig::load(Some(&raw)).unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("error decoding solver config"));
    }

    #[test]
    fn test_malformed_config() {
        let raw = json!({ "ttl": "soon" });
        assert!(SolverConfig::load(Some(&raw)).is_err());
    }

    #[test]
    fn test_group_name_required() {
        assert!(AppConfig::new("").is_err());
        assert!(AppConfig::new("   ").is_err());
        assert_eq!(
            AppConfig::new("acme.example.com").unwrap().group_name,
            "acme.example.com"
        );
    }
}
