//! Challenge reconciliation
//!
//! `present` makes sure a TXT record with the challenge key exists,
//! `clean_up` makes sure it is gone. Every call rebuilds credentials from the
//! secret store and re-resolves the zone and record ids; nothing is shared
//! between calls besides the secret store handle.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use crate::challenge::{record_label, ChallengeRequest};
use crate::config::SolverConfig;
use crate::error::{DnsMadeEasyError, Result};
use crate::provider::{
    CreateRecordRequest, DnsMadeEasyClient, ProviderCredentials, RecordId, ZoneId, CHALLENGE_TTL,
};
use crate::secrets::{string_from_secret_data, KubeSecretStore, SecretStore};

/// Identifier the solver registers under
pub const SOLVER_NAME: &str = "dnsmadeeasy";

const API_KEY: &str = "api-key";
const SECRET_KEY: &str = "secret-key";

/// Interface the webhook framework drives
#[async_trait]
pub trait ChallengeSolver: Send + Sync {
    /// Solver name used to route challenges
    fn name(&self) -> &'static str;

    /// Publish the challenge TXT record
    async fn present(&self, challenge: &ChallengeRequest) -> Result<()>;

    /// Remove the challenge TXT record; succeeds if it is already gone
    async fn clean_up(&self, challenge: &ChallengeRequest) -> Result<()>;
}

/// Outcome of looking up an existing challenge record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordLookup {
    Found(RecordId),
    Absent,
}

/// DNS Made Easy solver
#[derive(Default)]
pub struct DnsMadeEasySolver {
    secret_store: Option<Arc<dyn SecretStore>>,
}

impl DnsMadeEasySolver {
    /// Create an uninitialized solver; call [`initialize`](Self::initialize)
    /// before use.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a solver backed by the given secret store
    pub fn with_secret_store(store: Arc<dyn SecretStore>) -> Self {
        Self {
            secret_store: Some(store),
        }
    }

    /// Connect to the Kubernetes API used for credential secrets
    pub fn initialize(&mut self, client_config: kube::Config) -> Result<()> {
        let store = KubeSecretStore::from_config(client_config).map_err(|e| {
            error!(error = %e, "Failed to initialize new kubernetes client");
            e
        })?;
        self.secret_store = Some(Arc::new(store));
        Ok(())
    }

    /// Build provider credentials for a challenge from its config and secret
    pub async fn load_credentials(&self, challenge: &ChallengeRequest) -> Result<ProviderCredentials> {
        let store = self
            .secret_store
            .as_ref()
            .ok_or(DnsMadeEasyError::NotInitialized)?;

        let config = SolverConfig::load(challenge.config.as_ref())?;
        if let Some(ttl) = ignored_ttl(&config) {
            warn!(
                configured_ttl = ttl,
                applied_ttl = CHALLENGE_TTL,
                "Configured TTL is not applied to challenge records"
            );
        }

        let namespace = challenge.resource_namespace.as_str();
        let secret_name = config.secret_ref.as_str();
        let data = store.get(namespace, secret_name).await?;

        Ok(ProviderCredentials {
            api_key: string_from_secret_data(&data, API_KEY, namespace, secret_name)?,
            secret_key: string_from_secret_data(&data, SECRET_KEY, namespace, secret_name)?,
            api_url: config.api_url,
            zone_name: config.zone_name,
        })
    }

    async fn client_for(&self, challenge: &ChallengeRequest) -> Result<DnsMadeEasyClient> {
        let credentials = self.load_credentials(challenge).await.map_err(|e| {
            error!(
                namespace = %challenge.resource_namespace,
                error = %e,
                "Failed to load solver config"
            );
            e
        })?;
        DnsMadeEasyClient::new(credentials)
    }

    async fn resolve_zone(&self, client: &DnsMadeEasyClient) -> Result<ZoneId> {
        client.resolve_zone_id().await.map_err(|e| {
            error!(zone = %client.credentials().zone_name, error = %e, "Unable to resolve zone");
            e
        })
    }
}

/// Explicitly configured TTL that differs from the one challenge records get
fn ignored_ttl(config: &SolverConfig) -> Option<u32> {
    config.ttl.filter(|ttl| *ttl != CHALLENGE_TTL)
}

/// Look up the challenge record, folding "no unique record" and id 0 into
/// `Absent`. Transport, protocol and decode failures are returned as errors.
pub async fn lookup_record(
    client: &DnsMadeEasyClient,
    label: &str,
    zone_id: ZoneId,
) -> Result<RecordLookup> {
    match client.resolve_record_id(label, zone_id).await {
        Ok(id) if id.is_empty() => Ok(RecordLookup::Absent),
        Ok(id) => Ok(RecordLookup::Found(id)),
        Err(e) if e.is_absent_record() => {
            debug!(record = %label, reason = %e, "No unique challenge record");
            Ok(RecordLookup::Absent)
        }
        Err(e) => Err(e),
    }
}

#[async_trait]
impl ChallengeSolver for DnsMadeEasySolver {
    fn name(&self) -> &'static str {
        SOLVER_NAME
    }

    async fn present(&self, challenge: &ChallengeRequest) -> Result<()> {
        info!(
            namespace = %challenge.resource_namespace,
            zone = %challenge.resolved_zone,
            fqdn = %challenge.resolved_fqdn,
            "Presenting challenge"
        );

        let client = self.client_for(challenge).await?;
        let label = record_label(&challenge.resolved_fqdn);
        let zone_id = self.resolve_zone(&client).await?;

        match lookup_record(&client, label, zone_id).await {
            Ok(RecordLookup::Found(record_id)) => warn!(
                record = %label,
                record_id = %record_id,
                "Challenge record already exists, creating another one"
            ),
            Ok(RecordLookup::Absent) => debug!(record = %label, "No existing challenge record"),
            Err(e) => warn!(record = %label, error = %e, "Unable to check for existing record"),
        }

        let request = CreateRecordRequest::txt(label, &challenge.key);
        client.create_record(zone_id, &request).await.map_err(|e| {
            error!(record = %label, zone_id = %zone_id, error = %e, "Failed to add TXT record");
            e
        })?;

        Ok(())
    }

    async fn clean_up(&self, challenge: &ChallengeRequest) -> Result<()> {
        info!(
            namespace = %challenge.resource_namespace,
            zone = %challenge.resolved_zone,
            fqdn = %challenge.resolved_fqdn,
            "Cleaning up challenge"
        );

        let client = self.client_for(challenge).await?;
        let label = record_label(&challenge.resolved_fqdn);

        // A zone or record that cannot be resolved counts as already clean
        let zone_id = match self.resolve_zone(&client).await {
            Ok(zone_id) => zone_id,
            Err(_) => return Ok(()),
        };

        let lookup = lookup_record(&client, label, zone_id)
            .await
            .unwrap_or_else(|e| {
                error!(record = %label, error = %e, "Unable to fetch DNS record ID");
                RecordLookup::Absent
            });

        match lookup {
            RecordLookup::Absent => {
                info!(record = %label, zone_id = %zone_id, "No challenge record to remove");
                Ok(())
            }
            RecordLookup::Found(record_id) => {
                client.delete_record(zone_id, record_id).await.map_err(|e| {
                    error!(record_id = %record_id, error = %e, "Failed to remove TXT record");
                    e
                })?;
                Ok(())
            }
        }
    }
}
