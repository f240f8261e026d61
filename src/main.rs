//! DNS Made Easy ACME Webhook
//!
//! Serves the DNS-01 solver over HTTP, or runs a single present/cleanup
//! against the configured account.
//!
//! # Usage
//! ```bash
//! # Run the webhook
//! GROUP_NAME=acme.example.com dnsmadeeasy-webhook serve --listen 0.0.0.0:8443
//!
//! # Publish a challenge record by hand
//! dnsmadeeasy-webhook --group-name acme.example.com present \
//!     --fqdn _acme-challenge.example.com. --zone example.com. --key <token> \
//!     --namespace cert-manager \
//!     --config '{"secretName":"dnsmadeeasy-credentials","zoneName":"example.com"}'
//! ```

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use dnsmadeeasy_webhook::challenge::ChallengeAction;
use dnsmadeeasy_webhook::server::{self, AppState};
use dnsmadeeasy_webhook::{AppConfig, ChallengeRequest, ChallengeSolver, DnsMadeEasySolver};

// ============================================================
// CLI Definition
// ============================================================

#[derive(Parser)]
#[command(name = "dnsmadeeasy-webhook")]
#[command(about = "ACME DNS-01 solver for DNS Made Easy", long_about = None)]
#[command(version)]
struct Cli {
    /// API group the webhook is registered under
    #[arg(long, env = "GROUP_NAME")]
    group_name: String,

    /// Log output format
    #[arg(long, value_enum, default_value = "text", env = "LOG_FORMAT")]
    log_format: LogFormat,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the webhook endpoints
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "0.0.0.0:8443", env = "LISTEN_ADDR")]
        listen: String,
    },

    /// Create the challenge TXT record
    Present(ChallengeArgs),

    /// Remove the challenge TXT record
    Cleanup(ChallengeArgs),
}

#[derive(Args)]
struct ChallengeArgs {
    /// Fully qualified challenge name (e.g., _acme-challenge.example.com.)
    #[arg(long)]
    fqdn: String,

    /// Resolved zone (e.g., example.com.)
    #[arg(long)]
    zone: String,

    /// TXT record value
    #[arg(long)]
    key: String,

    /// Namespace holding the credentials secret
    #[arg(long, default_value = "default")]
    namespace: String,

    /// Solver config as JSON
    #[arg(long)]
    config: Option<String>,
}

impl ChallengeArgs {
    fn into_request(self, action: ChallengeAction) -> Result<ChallengeRequest> {
        let config: Option<serde_json::Value> = self
            .config
            .map(|raw| serde_json::from_str(&raw))
            .transpose()
            .context("--config is not valid JSON")?;

        Ok(ChallengeRequest {
            action,
            challenge_type: "dns-01".to_string(),
            key: self.key,
            resource_namespace: self.namespace,
            resolved_fqdn: self.fqdn,
            resolved_zone: self.zone,
            config,
            ..Default::default()
        })
    }
}

// ============================================================
// Main Entry Point
// ============================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.log_format, cli.verbose);

    let app_config = AppConfig::new(cli.group_name.as_str())?;
    info!(group_name = %app_config.group_name, "DNS Made Easy webhook starting");

    let kube_config = kube::Config::infer()
        .await
        .context("Failed to load kubernetes client configuration")?;

    let mut solver = DnsMadeEasySolver::new();
    solver
        .initialize(kube_config)
        .context("Failed to initialize solver")?;

    match cli.command {
        Commands::Serve { listen } => {
            let state = AppState {
                solver: std::sync::Arc::new(solver),
                group_name: app_config.group_name.clone(),
            };
            server::serve(state, &listen).await?;
        }

        Commands::Present(args) => {
            let challenge = args.into_request(ChallengeAction::Present)?;
            solver
                .present(&challenge)
                .await
                .context("Failed to present challenge")?;
            info!(fqdn = %challenge.resolved_fqdn, "Challenge record presented");
        }

        Commands::Cleanup(args) => {
            let challenge = args.into_request(ChallengeAction::CleanUp)?;
            solver
                .clean_up(&challenge)
                .await
                .context("Failed to clean up challenge")?;
            info!(fqdn = %challenge.resolved_fqdn, "Challenge record cleaned up");
        }
    }

    Ok(())
}

fn init_logging(format: LogFormat, verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}
