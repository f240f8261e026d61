//! DNS Made Easy REST client
//!
//! Issues one signed request per call and classifies the outcome: 200 OK
//! hands back the raw body, anything else becomes an error. There is no
//! retry and no timeout beyond the HTTP client defaults.

use chrono::Utc;
use reqwest::{Client, Method};
use serde::Serialize;
use tracing::{debug, info};

use super::signer::auth_headers;
use super::types::{CreateRecordRequest, ProviderCredentials, RecordId, ZoneId};
use crate::error::{DnsMadeEasyError, Result};

/// Client bound to one set of credentials
pub struct DnsMadeEasyClient {
    http_client: Client,
    credentials: ProviderCredentials,
}

impl DnsMadeEasyClient {
    pub fn new(credentials: ProviderCredentials) -> Result<Self> {
        let http_client = Client::builder()
            .user_agent(concat!("dnsmadeeasy-webhook/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http_client,
            credentials,
        })
    }

    pub fn credentials(&self) -> &ProviderCredentials {
        &self.credentials
    }

    /// `{base}/dns/managed`
    pub fn zones_url(&self) -> String {
        format!("{}/dns/managed", self.credentials.base_url())
    }

    /// `{base}/dns/managed/{zoneId}/records`
    pub fn records_url(&self, zone_id: ZoneId) -> String {
        format!("{}/dns/managed/{}/records", self.credentials.base_url(), zone_id)
    }

    /// Execute a signed request and return the body of a 200 response
    pub async fn call<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: &str,
        body: Option<&B>,
    ) -> Result<Vec<u8>> {
        debug!(method = %method, url = %url, "Calling DNS Made Easy API");

        let mut request = self
            .http_client
            .request(method.clone(), url)
            .headers(auth_headers(&self.credentials, Utc::now())?);

        if let Some(body) = body {
            let payload = serde_json::to_vec(body).map_err(|e| {
                DnsMadeEasyError::Configuration(format!("unable to encode request body: {}", e))
            })?;
            request = request.body(payload);
        }

        let response = request.send().await?;
        let status = response.status();

        // Body is always read in full, whatever the status
        let body = response.bytes().await?;

        if status != reqwest::StatusCode::OK {
            return Err(DnsMadeEasyError::Api {
                status: status.to_string(),
                url: url.to_string(),
                method: method.to_string(),
            });
        }

        Ok(body.to_vec())
    }

    /// Create a TXT record in the zone
    pub async fn create_record(
        &self,
        zone_id: ZoneId,
        request: &CreateRecordRequest,
    ) -> Result<Vec<u8>> {
        let url = self.records_url(zone_id);
        let response = self.call(Method::POST, &url, Some(request)).await?;

        info!(
            zone_id = %zone_id,
            record = %request.name,
            ttl = request.ttl,
            "Added TXT record"
        );

        Ok(response)
    }

    /// Delete a record by id
    pub async fn delete_record(&self, zone_id: ZoneId, record_id: RecordId) -> Result<Vec<u8>> {
        let url = format!("{}/{}", self.records_url(zone_id), record_id);
        let response = self.call::<()>(Method::DELETE, &url, None).await?;

        info!(zone_id = %zone_id, record_id = %record_id, "TXT record has been removed");

        Ok(response)
    }
}
