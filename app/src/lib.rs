//! AnimeSwap command line client library

pub mod commands;

use std::path::PathBuf;

use animeswap_core::{AppConfig, Network, NetworkOptions, NodeConfig, RouterConfig};
use aptos_node_client::{MemoryFetcher, NodeClient, ResourceFetcher};
use clap::{Parser, Subcommand};
use serde::Serialize;

use commands::{LiquidityCommand, PairQuoteArgs, PayloadArgs, QuoteArgs, RoutesArgs};

#[derive(Debug, Parser)]
#[command(name = "animeswap", author, version, about, long_about = None)]
pub struct Cli {
    /// mainnet, devnet or testnet
    #[arg(long, global = true)]
    pub network: Option<Network>,

    /// Full node REST endpoint, overrides the network default
    #[arg(long, global = true)]
    pub node_url: Option<String>,

    /// JSON configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Serve resources from a JSON snapshot instead of a node
    #[arg(long, global = true)]
    pub snapshot: Option<PathBuf>,

    /// Read amounts as whole coins with this many decimals instead of raw units
    #[arg(long, global = true)]
    pub decimals: Option<u32>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List routes between two coins
    Routes(RoutesArgs),
    /// Rank trades between two coins
    Quote(QuoteArgs),
    /// Quote, then print the swap payload for the best trade
    Payload(PayloadArgs),
    /// Quote a swap through the direct pool only
    PairQuote(PairQuoteArgs),
    /// Liquidity quotes
    #[command(subcommand)]
    Liquidity(LiquidityCommand),
}

/// Resolved settings shared by every command
pub struct Context {
    pub fetcher: Box<dyn ResourceFetcher>,
    pub options: NetworkOptions,
    pub router: RouterConfig,
    pub decimals: Option<u32>,
}

impl Context {
    pub fn from_cli(cli: &Cli) -> anyhow::Result<Self> {
        let config = resolve_config(cli)?;

        let fetcher: Box<dyn ResourceFetcher> = match &cli.snapshot {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))?;
                let fetcher = MemoryFetcher::from_snapshot_json(&raw)?;
                tracing::info!(
                    "Loaded {} resources from {}",
                    fetcher.resource_count(),
                    path.display()
                );
                Box::new(fetcher)
            }
            None => {
                tracing::info!("Using node {} ({})", config.node.url, config.network);
                Box::new(NodeClient::new(config.node.clone())?)
            }
        };

        Ok(Self {
            fetcher,
            options: config.network_options(),
            router: config.router,
            decimals: cli.decimals,
        })
    }
}

/// File config first, then command line overrides
pub fn resolve_config(cli: &Cli) -> anyhow::Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::from_json_file(path)?,
        None => AppConfig::default(),
    };

    if let Some(network) = cli.network {
        if cli.config.is_none() || network != config.network {
            config.node = NodeConfig::for_network(network);
        }
        config.network = network;
    }
    if let Some(url) = &cli.node_url {
        config.node.url = url.clone();
    }
    Ok(config)
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let ctx = Context::from_cli(&cli)?;

    match &cli.command {
        Commands::Routes(args) => print_json(&commands::routes(&ctx, args).await?),
        Commands::Quote(args) => print_json(&commands::quote(&ctx, args).await?),
        Commands::Payload(args) => print_json(&commands::payload(&ctx, args).await?),
        Commands::PairQuote(args) => print_json(&commands::pair_quote(&ctx, args).await?),
        Commands::Liquidity(cmd) => commands::liquidity(&ctx, cmd).await,
    }
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_network_override() {
        let cli = Cli::try_parse_from([
            "animeswap",
            "--network",
            "testnet",
            "routes",
            "--from",
            "0x1::aptos_coin::AptosCoin",
            "--to",
            "0xa::coin_a::A",
        ])
        .unwrap();
        let config = resolve_config(&cli).unwrap();
        assert_eq!(config.network, Network::Testnet);
        assert_eq!(config.node.url, "https://fullnode.testnet.aptoslabs.com/v1");

        let cli = Cli::try_parse_from([
            "animeswap",
            "--node-url",
            "http://localhost:8080/v1",
            "routes",
            "--from",
            "a",
            "--to",
            "b",
        ])
        .unwrap();
        let config = resolve_config(&cli).unwrap();
        assert_eq!(config.network, Network::Mainnet);
        assert_eq!(config.node.url, "http://localhost:8080/v1");
    }

    #[test]
    fn test_decimals_flag_after_subcommand() {
        let cli = Cli::try_parse_from([
            "animeswap",
            "quote",
            "--from",
            "a",
            "--to",
            "b",
            "--amount",
            "1.5",
            "--decimals",
            "8",
        ])
        .unwrap();
        assert_eq!(cli.decimals, Some(8));
    }

    #[test]
    fn test_unknown_network_rejected() {
        let result = Cli::try_parse_from([
            "animeswap",
            "--network",
            "localnet",
            "routes",
            "--from",
            "a",
            "--to",
            "b",
        ]);
        assert!(result.is_err());
    }
}
