//! Secret store integration
//!
//! Credentials live in a namespaced secret holding two keys, `api-key` and
//! `secret-key`. In a cluster they are read from Kubernetes `Secret`
//! resources through the service account the webhook runs as.

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;
use kube::{Api, Client};
use tracing::{debug, info};

use crate::error::{DnsMadeEasyError, Result};

/// Raw secret payload: key -> opaque bytes
pub type SecretData = BTreeMap<String, Vec<u8>>;

/// Lookup of secrets by namespace and name
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Fetch every key of the named secret
    async fn get(&self, namespace: &str, name: &str) -> Result<SecretData>;
}

/// Reads `Secret` resources from the Kubernetes API
pub struct KubeSecretStore {
    client: Client,
}

impl KubeSecretStore {
    /// Build a store from an explicit client configuration
    pub fn from_config(config: kube::Config) -> Result<Self> {
        debug!(cluster_url = %config.cluster_url, "Initializing Kubernetes secret store");

        let client = Client::try_from(config).map_err(|e| {
            DnsMadeEasyError::Configuration(format!("failed to initialize kubernetes client: {}", e))
        })?;

        Ok(Self { client })
    }
}

#[async_trait]
impl SecretStore for KubeSecretStore {
    async fn get(&self, namespace: &str, name: &str) -> Result<SecretData> {
        debug!(namespace = %namespace, secret = %name, "Fetching secret");

        let api: Api<Secret> = Api::namespaced(self.client.clone(), namespace);
        let secret = api
            .get(name)
            .await
            .map_err(|e| DnsMadeEasyError::SecretStore {
                namespace: namespace.to_string(),
                name: name.to_string(),
                message: e.to_string(),
            })?;

        let data: SecretData = secret
            .data
            .unwrap_or_default()
            .into_iter()
            .map(|(key, value)| (key, value.0))
            .collect();

        info!(
            namespace = %namespace,
            secret = %name,
            keys = data.len(),
            "Secret retrieved successfully"
        );

        Ok(data)
    }
}

/// In-memory secret store, for local runs and tests
#[derive(Default)]
pub struct StaticSecretStore {
    secrets: RwLock<HashMap<(String, String), SecretData>>,
}

impl StaticSecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a secret
    pub fn insert(&self, namespace: &str, name: &str, data: SecretData) {
        let mut secrets = self.secrets.write().unwrap_or_else(|e| e.into_inner());
        secrets.insert((namespace.to_string(), name.to_string()), data);
    }

    /// Builder-style variant of [`insert`](Self::insert) for string values
    pub fn with_secret(self, namespace: &str, name: &str, entries: &[(&str, &str)]) -> Self {
        let data = entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.as_bytes().to_vec()))
            .collect();
        self.insert(namespace, name, data);
        self
    }
}

#[async_trait]
impl SecretStore for StaticSecretStore {
    async fn get(&self, namespace: &str, name: &str) -> Result<SecretData> {
        let secrets = self.secrets.read().unwrap_or_else(|e| e.into_inner());

        secrets
            .get(&(namespace.to_string(), name.to_string()))
            .cloned()
            .ok_or_else(|| DnsMadeEasyError::SecretStore {
                namespace: namespace.to_string(),
                name: name.to_string(),
                message: "secret not found".to_string(),
            })
    }
}

/// Read a required key from secret data as UTF-8 text
pub fn string_from_secret_data(
    data: &SecretData,
    key: &str,
    namespace: &str,
    secret: &str,
) -> Result<String> {
    let bytes = data.get(key).ok_or_else(|| DnsMadeEasyError::MissingSecretKey {
        key: key.to_string(),
        namespace: namespace.to_string(),
        secret: secret.to_string(),
    })?;

    String::from_utf8(bytes.clone()).map_err(|_| {
        DnsMadeEasyError::Configuration(format!(
            "{} in secret `{}/{}` is not valid UTF-8",
            key, namespace, secret
        ))
    })
}
