use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::info;
use zoneplan::{
    Planner,
    config::{ClientConfig, Scheme},
    powerdns::client::PowerDnsClient,
    zonefile,
};

#[derive(Parser, Debug)]
#[command(author, version, about, rename_all = "kebab-case")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply zone changes
    #[command(visible_alias = "a")]
    Apply(ApplyArgs),
}

#[derive(clap::Args, Debug)]
struct ApplyArgs {
    /// Zonefile to read the desired state from
    #[arg(value_name = "ZONEFILE", default_value = zonefile::DEFAULT_ZONEFILE)]
    zonefile: PathBuf,
    /// No actions, just print the plan
    #[arg(long)]
    dry_run: bool,
    /// PowerDNS API scheme
    #[arg(long, value_enum, default_value_t = Scheme::Http)]
    scheme: Scheme,
    /// PowerDNS API host
    #[arg(long, value_name = "HOST")]
    host: String,
    /// PowerDNS API port
    #[arg(long, value_name = "PORT")]
    port: Option<u16>,
    /// PowerDNS API key
    #[arg(long, env = "PDNS_API_KEY", hide_env_values = true, value_name = "KEY")]
    api_key: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    match cli.command {
        Command::Apply(args) => apply(args).await,
    }
}

async fn apply(args: ApplyArgs) -> Result<()> {
    let config = build_client_config(&args)?;
    let client = PowerDnsClient::from_config(&config);

    let desired = zonefile::load(&args.zonefile)
        .with_context(|| format!("failed to read {}", args.zonefile.display()))?;
    info!(
        zonefile = %args.zonefile.display(),
        zones = desired.zone_count(),
        api = %config.base_url(),
        "desired state loaded"
    );

    let changeset = Planner::new(&client)
        .plan(&desired)
        .await
        .context("failed to compute plan")?;

    if changeset.is_empty() {
        println!("No changes.");
        return Ok(());
    }

    for change in &changeset {
        println!("{change}");
    }

    if args.dry_run {
        info!(changes = changeset.len(), "dry run, nothing applied");
        return Ok(());
    }

    changeset
        .apply(&client)
        .await
        .context("apply aborted")?;
    info!(changes = changeset.len(), "all changes applied");
    Ok(())
}

fn build_client_config(args: &ApplyArgs) -> Result<ClientConfig> {
    let host = args.host.trim();
    if host.is_empty() {
        bail!("--host cannot be empty");
    }
    if args.api_key.is_empty() {
        bail!("PDNS_API_KEY cannot be empty");
    }

    Ok(ClientConfig {
        scheme: args.scheme,
        host: host.to_string(),
        port: args.port,
        api_key: args.api_key.clone(),
    })
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}
