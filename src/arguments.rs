/// Command-line arguments for swaprelay
///
/// Commands are parsed with clap. Logging flags (`--debug-<tag>`,
/// `--verbose-<tag>`, `--verbose`, `--quiet`, `--no-log-file`) are read by the
/// logger straight from the raw arguments and stripped before clap sees them.
use crate::relay::RelayProvider;
use crate::venues::Venue;
use clap::{Args, Parser, Subcommand};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::env;
use std::path::PathBuf;

/// Raw command-line arguments
pub static CMD_ARGS: Lazy<Mutex<Vec<String>>> = Lazy::new(|| Mutex::new(env::args().collect()));

pub fn get_cmd_args() -> Vec<String> {
    CMD_ARGS.lock().clone()
}

/// Whether an argument is consumed by the logger rather than clap
pub fn is_logging_flag(arg: &str) -> bool {
    matches!(arg, "--verbose" | "--quiet" | "--no-log-file")
        || arg.starts_with("--debug-")
        || arg.starts_with("--verbose-")
}

#[derive(Parser, Debug)]
#[command(
    name = "swaprelay",
    version,
    about = "Compile Solana swap transactions against a venue pool and route them to a relay"
)]
pub struct Cli {
    /// Config file (defaults to <data dir>/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Spend SOL on a token
    Buy(SwapArgs),
    /// Sell a token for SOL
    Sell(SwapArgs),
    /// Listing cache maintenance
    Cache {
        #[command(subcommand)]
        action: CacheCommand,
    },
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheCommand {
    /// Remove every on-disk listing snapshot
    Clear,
}

#[derive(Args, Debug, Clone)]
pub struct SwapArgs {
    /// pumpswap | raydium-cpmm
    #[arg(long)]
    pub venue: Venue,

    /// Target token mint
    #[arg(long)]
    pub mint: String,

    /// SOL for buys, tokens for sells
    #[arg(long)]
    pub amount: f64,

    /// Fraction in [0, 1]; config default when omitted
    #[arg(long)]
    pub slippage: Option<f64>,

    /// Relay tip in SOL; config default when omitted
    #[arg(long)]
    pub tip: Option<f64>,

    /// Explicit relay provider
    #[arg(long = "relay", value_name = "PROVIDER")]
    pub provider: Option<RelayProvider>,

    #[arg(long)]
    pub region: Option<String>,

    /// Priority fee in SOL
    #[arg(long)]
    pub priority_fee: Option<f64>,

    #[arg(long)]
    pub anti_mev: bool,

    /// Owner address when compiling without a keypair
    #[arg(long, conflicts_with = "keypair")]
    pub owner: Option<String>,

    /// Keypair file used as owner and signer
    #[arg(long, value_name = "PATH")]
    pub keypair: Option<PathBuf>,

    /// Sign with --keypair and submit through the selected relay
    #[arg(long, requires = "keypair")]
    pub submit: bool,
}

/// Parse clap arguments from the stored command line, minus logging flags
pub fn parse_cli() -> Result<Cli, clap::Error> {
    parse_cli_from(get_cmd_args())
}

pub fn parse_cli_from(args: Vec<String>) -> Result<Cli, clap::Error> {
    Cli::try_parse_from(args.into_iter().filter(|arg| !is_logging_flag(arg)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_buy_with_relay_options() {
        let cli = parse_cli_from(argv(&[
            "swaprelay",
            "buy",
            "--venue",
            "pumpswap",
            "--mint",
            "Mint1111",
            "--amount",
            "1.5",
            "--tip",
            "0.002",
            "--relay",
            "nextblock",
            "--region",
            "tokyo",
            "--anti-mev",
            "--debug-relay",
        ]))
        .unwrap();

        match cli.command {
            Command::Buy(args) => {
                assert_eq!(args.venue, Venue::PumpSwap);
                assert_eq!(args.amount, 1.5);
                assert_eq!(args.tip, Some(0.002));
                assert_eq!(args.provider, Some(RelayProvider::NextBlock));
                assert_eq!(args.region.as_deref(), Some("tokyo"));
                assert!(args.anti_mev);
                assert!(!args.submit);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_cache_clear() {
        let cli = parse_cli_from(argv(&["swaprelay", "--quiet", "cache", "clear"])).unwrap();
        assert!(matches!(cli.command, Command::Cache { action: CacheCommand::Clear }));
    }

    #[test]
    fn test_submit_requires_keypair() {
        let result = parse_cli_from(argv(&[
            "swaprelay",
            "sell",
            "--venue",
            "raydium-cpmm",
            "--mint",
            "M",
            "--amount",
            "10",
            "--submit",
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_venue_rejected() {
        let result = parse_cli_from(argv(&[
            "swaprelay", "buy", "--venue", "orca", "--mint", "M", "--amount", "1",
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn test_logging_flags() {
        assert!(is_logging_flag("--debug-cache"));
        assert!(is_logging_flag("--verbose"));
        assert!(!is_logging_flag("--venue"));
    }
}
