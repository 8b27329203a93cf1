use anyhow::{anyhow, bail, Context};
use rand::rngs::StdRng;
use rand::SeedableRng;
use solana_sdk::signature::{read_keypair_file, Keypair};
use solana_sdk::signer::Signer;
use swaprelay::{
    arguments::{self, CacheCommand, Cli, Command, SwapArgs},
    config::{self, Config},
    listings::ListingCache,
    logger::{self, LogTag},
    relay::{RelayPreferences, SubmitOptions},
    swaps::{submit_compiled, SwapDirection},
    SwapEngine, SwapRequest,
};

/// Entry point for the swaprelay CLI
///
/// - `buy` / `sell`: resolve the pool, compile the swap, pick a relay and
///   print the result as JSON; `--submit` signs and sends it
/// - `cache clear`: drop on-disk listing snapshots
#[tokio::main]
async fn main() {
    // Logger needs the logs directory for its file sink
    if let Err(e) = swaprelay::paths::ensure_all_directories() {
        eprintln!("❌ Failed to create required directories: {}", e);
        std::process::exit(1);
    }

    logger::init();

    let cli = match arguments::parse_cli() {
        Ok(cli) => cli,
        Err(e) => e.exit(),
    };

    let code = match run(cli).await {
        Ok(()) => 0,
        Err(e) => {
            logger::error(LogTag::System, &format!("❌ {:#}", e));
            1
        }
    };

    logger::flush();
    std::process::exit(code);
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match &cli.config {
        Some(path) => config::load_config_from_path(path)?,
        None => config::load_config()?,
    }
    let config = config::get_config_clone();

    match cli.command {
        Command::Cache {
            action: CacheCommand::Clear,
        } => {
            let removed = ListingCache::from_config().clear();
            logger::info(
                LogTag::Cache,
                &format!("🧹 Removed {} cached listing file(s)", removed),
            );
            Ok(())
        }
        Command::Buy(args) => swap(SwapDirection::Buy, args, &config).await,
        Command::Sell(args) => swap(SwapDirection::Sell, args, &config).await,
    }
}

fn load_keypair(args: &SwapArgs) -> anyhow::Result<Option<Keypair>> {
    match &args.keypair {
        Some(path) => read_keypair_file(path)
            .map(Some)
            .map_err(|e| anyhow!("Failed to read keypair {}: {}", path.display(), e)),
        None => Ok(None),
    }
}

fn relay_preferences(args: &SwapArgs, config: &Config) -> RelayPreferences {
    let mut relay = RelayPreferences::from_config(&config.relay);
    if let Some(tip) = args.tip {
        relay.tip_sol = tip;
    }
    if args.provider.is_some() {
        relay.provider = args.provider;
    }
    if args.region.is_some() {
        relay.region = args.region.clone();
    }
    relay.anti_mev |= args.anti_mev;
    relay
}

async fn swap(direction: SwapDirection, args: SwapArgs, config: &Config) -> anyhow::Result<()> {
    let keypair = load_keypair(&args)?;
    let owner = match (&keypair, &args.owner) {
        (Some(keypair), _) => keypair.pubkey().to_string(),
        (None, Some(owner)) => owner.clone(),
        (None, None) => bail!("--owner or --keypair is required"),
    };

    let request = SwapRequest {
        venue: args.venue,
        direction,
        mint: args.mint.clone(),
        amount: args.amount,
        slippage: args.slippage.unwrap_or(config.swaps.default_slippage),
        owner,
        relay: relay_preferences(&args, config),
        priority_fee_sol: args.priority_fee,
    };

    let (engine, transport) = SwapEngine::from_config(config);
    let mut rng = StdRng::from_entropy();
    let compiled = engine.compile_and_route(&request, &mut rng).await?;

    println!("{}", serde_json::to_string_pretty(&compiled)?);

    if args.submit {
        let keypair = keypair.context("--submit needs --keypair")?;
        let options = SubmitOptions {
            max_retries: Some(0),
        };
        let signature = submit_compiled(
            &compiled,
            &keypair,
            transport.client(),
            engine.router(),
            &options,
        )
        .await?;
        logger::info(
            LogTag::Swap,
            &format!("✅ Submitted via {}: {}", compiled.selection.provider, signature),
        );
        println!("{}", signature);
    }

    Ok(())
}
