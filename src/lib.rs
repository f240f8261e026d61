//! DNS Made Easy ACME Webhook Library
//!
//! Solves ACME DNS-01 challenges by publishing and removing TXT records on
//! DNS Made Easy, with credentials read from Kubernetes secrets.

pub mod challenge;
pub mod config;
pub mod error;
pub mod provider;
pub mod secrets;
pub mod server;
pub mod solver;

pub use challenge::{record_label, ChallengeRequest};
pub use config::{AppConfig, SolverConfig};
pub use error::{DnsMadeEasyError, Result};
pub use provider::DnsMadeEasyClient;
pub use secrets::{KubeSecretStore, SecretStore, StaticSecretStore};
pub use solver::{ChallengeSolver, DnsMadeEasySolver, RecordLookup};
