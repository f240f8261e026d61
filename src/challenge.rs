//! ACME challenge request
//!
//! The value object handed to the solver by the orchestrating webhook
//! framework. Field names follow its camelCase wire shape.

use serde::{Deserialize, Serialize};

/// Action the framework is asking for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChallengeAction {
    #[default]
    Present,
    CleanUp,
}

/// A DNS-01 challenge to present or clean up
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeRequest {
    #[serde(default)]
    pub uid: String,
    #[serde(default)]
    pub action: ChallengeAction,
    #[serde(rename = "type", default)]
    pub challenge_type: String,
    /// Domain being validated (without the `_acme-challenge` prefix)
    #[serde(default)]
    pub dns_name: String,
    /// TXT record value
    pub key: String,
    /// Namespace the credentials secret is looked up in
    #[serde(default)]
    pub resource_namespace: String,
    /// Fully qualified challenge record name, e.g. `_acme-challenge.example.com.`
    #[serde(rename = "resolvedFQDN")]
    pub resolved_fqdn: String,
    /// Zone the FQDN was resolved to, e.g. `example.com.`
    #[serde(default)]
    pub resolved_zone: String,
    /// Raw solver configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<serde_json::Value>,
}

/// Leftmost label of a fully qualified name.
///
/// `_acme-challenge.example.com.` -> `_acme-challenge`
pub fn record_label(fqdn: &str) -> &str {
    fqdn.split('.').next().unwrap_or(fqdn)
}
