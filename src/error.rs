//! Error types for the DNS Made Easy solver

use thiserror::Error;

/// Result alias used across the crate
pub type Result<T, E = DnsMadeEasyError> = std::result::Result<T, E>;

/// Errors that can occur while presenting or cleaning up a challenge
#[derive(Debug, Error)]
pub enum DnsMadeEasyError {
    /// Solver configuration could not be decoded
    #[error("error decoding solver config: {0}")]
    Config(#[from] serde_json::Error),

    /// A required key is missing from the credentials secret
    #[error("unable to get {key} from secret `{namespace}/{secret}`: key not found in secret data")]
    MissingSecretKey {
        key: String,
        namespace: String,
        secret: String,
    },

    /// Any other configuration problem (bad header value, non-UTF-8 secret, ...)
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// The secret store has not been initialized
    #[error("solver is not initialized: no secret store configured")]
    NotInitialized,

    /// Secret lookup failed
    #[error("unable to get secret `{namespace}/{name}`: {message}")]
    SecretStore {
        namespace: String,
        name: String,
        message: String,
    },

    /// Connection, TLS or request building failure
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider answered with something other than 200 OK
    #[error("error calling API status: {status} url: {url} method: {method}")]
    Api {
        status: String,
        url: String,
        method: String,
    },

    /// A response body did not match the expected contract
    #[error("unable to decode {what} response: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The zone listing spans more than one page (or none)
    #[error("wrong number of zone pages in response: {0}, must be exactly 1")]
    ZonePageCount(u64),

    /// The configured zone is not present in the listing
    #[error("DNS zone {0} not found")]
    ZoneNotFound(String),

    /// The record query matched zero or several records
    #[error("wrong number of records in response: {0}, must be exactly 1")]
    RecordCount(u64),

    /// The record query returned a single entry with a different name
    #[error("DNS record {0} not found")]
    RecordNotFound(String),
}

impl DnsMadeEasyError {
    /// Whether this error means the looked-up record does not exist (or is
    /// not uniquely identifiable), as opposed to a transport or protocol
    /// failure.
    pub fn is_absent_record(&self) -> bool {
        matches!(
            self,
            DnsMadeEasyError::RecordCount(_) | DnsMadeEasyError::RecordNotFound(_)
        )
    }

    /// Whether this error stems from configuration rather than the provider
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            DnsMadeEasyError::Config(_)
                | DnsMadeEasyError::MissingSecretKey { .. }
                | DnsMadeEasyError::Configuration(_)
                | DnsMadeEasyError::NotInitialized
        )
    }
}
