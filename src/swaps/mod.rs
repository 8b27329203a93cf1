//! Swap compilation and routing
//!
//! `SwapEngine::compile_and_route` is the single entry point: resolve the
//! pool, quote it, compile the venue instructions behind a compute-budget
//! block, then pick a relay and insert its tip. Signing and submission are
//! left to the caller (`submit_compiled`).

pub mod amounts;
pub mod compiler;
pub mod types;

pub use compiler::{compile, validate_slippage, CompileRequest, TransactionSkeleton};
pub use types::{QuoteBound, SwapDirection, SwapQuote, SwapRequest};

use crate::config::{Config, SwapsConfig};
use crate::constants::SOL_MINT;
use crate::errors::{SwapError, SwapResult, TransportError};
use crate::listings::ListingCache;
use crate::logger::{self, LogTag};
use crate::pools::{parse_pubkey, PoolLocator, ResolvedPool};
use crate::relay::{backend_for, RelayRouter, RelaySelection, SubmitOptions};
use crate::rpc::{LedgerTransport, RpcLedgerTransport};
use crate::venues::VenueRegistry;
use rand::Rng;
use serde::Serialize;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::signature::{Keypair, Signature};
use solana_sdk::signer::Signer;
use std::sync::Arc;

/// Result of one `compile_and_route` call
#[derive(Debug, Clone, Serialize)]
pub struct CompiledSwap {
    pub pool: ResolvedPool,
    pub quote: SwapQuote,
    pub skeleton: TransactionSkeleton,
    pub selection: RelaySelection,
    pub priority_fee_sol: f64,
}

pub struct SwapEngine {
    locator: PoolLocator,
    registry: Arc<VenueRegistry>,
    router: RelayRouter,
    swaps: SwapsConfig,
}

impl SwapEngine {
    pub fn new(
        locator: PoolLocator,
        registry: Arc<VenueRegistry>,
        router: RelayRouter,
        swaps: SwapsConfig,
    ) -> Self {
        Self {
            locator,
            registry,
            router,
            swaps,
        }
    }

    /// Engine wired to the RPC transport, venue HTTP listings and relay
    /// tables from `config`. Returns the transport so callers can reuse its
    /// RPC client for submission.
    pub fn from_config(config: &Config) -> (Self, Arc<RpcLedgerTransport>) {
        let rpc = Arc::new(RpcLedgerTransport::new(&config.rpc.url, &config.rpc.commitment));
        let transport: Arc<dyn LedgerTransport> = rpc.clone();

        let cache = Arc::new(ListingCache::from_config());
        let registry = Arc::new(VenueRegistry::with_defaults(transport.clone()));
        let locator = PoolLocator::new(cache, transport, registry.clone())
            .with_registry_scan(config.venues.enable_registry_scan);

        let engine = Self::new(
            locator,
            registry,
            RelayRouter::from_config(&config.relay),
            config.swaps.clone(),
        );
        (engine, rpc)
    }

    pub fn router(&self) -> &RelayRouter {
        &self.router
    }

    pub async fn compile_and_route<R: Rng + ?Sized>(
        &self,
        request: &SwapRequest,
        rng: &mut R,
    ) -> SwapResult<CompiledSwap> {
        validate_slippage(request.slippage)?;
        if !request.amount.is_finite() || request.amount <= 0.0 {
            return Err(SwapError::invalid(
                "amount",
                format!("{} must be a positive number", request.amount),
            ));
        }
        let priority_fee_sol = request.priority_fee_sol.unwrap_or(self.swaps.priority_fee_sol);
        if !priority_fee_sol.is_finite() || priority_fee_sol < 0.0 {
            return Err(SwapError::invalid(
                "priority_fee_sol",
                format!("{} must be zero or positive", priority_fee_sol),
            ));
        }
        let owner = parse_pubkey("owner", &request.owner)?;
        let adapter = self.registry.get(request.venue)?;

        logger::info(
            LogTag::Swap,
            &format!(
                "{} {} {} on {} (slippage {:.2}%)",
                request.direction,
                request.amount,
                request.mint,
                request.venue,
                amounts::slippage_to_percent(request.slippage)
            ),
        );

        let pool = self
            .locator
            .locate(request.venue, &request.mint, SOL_MINT)
            .await?;

        let quote = adapter
            .quote(&pool, request.direction, request.amount, request.slippage)
            .await?;
        logger::debug(
            LogTag::Swap,
            &format!(
                "Quote: in {} expected out {} bound {:?}",
                quote.amount_in, quote.expected_out, quote.bound
            ),
        );

        let venue_instructions = adapter
            .swap_instructions(&owner, &pool, request.direction, &quote)
            .await?;

        let mut skeleton = compile(CompileRequest {
            payer: owner,
            venue_instructions,
            slippage: request.slippage,
            priority_fee_sol,
            compute_unit_budget: self.swaps.compute_unit_budget,
            compute_unit_limit: self.swaps.compute_unit_limit,
            upfront_tip: None,
        })?;

        let selection = self.router.select(&request.relay, rng);
        self.router.attach_tip(&mut skeleton, &selection);

        Ok(CompiledSwap {
            pool,
            quote,
            skeleton,
            selection,
            priority_fee_sol,
        })
    }
}

/// Sign a compiled swap with `signer` and hand it to the selected backend
pub async fn submit_compiled(
    compiled: &CompiledSwap,
    signer: &Keypair,
    client: Arc<RpcClient>,
    router: &RelayRouter,
    options: &SubmitOptions,
) -> SwapResult<Signature> {
    if signer.pubkey() != compiled.skeleton.payer {
        return Err(SwapError::invalid(
            "keypair",
            format!(
                "signer {} does not match owner {}",
                signer.pubkey(),
                compiled.skeleton.payer
            ),
        ));
    }

    let blockhash = client
        .get_latest_blockhash()
        .await
        .map_err(|e| TransportError::Rpc(format!("Failed to get latest blockhash: {}", e)))?;
    let transaction = compiled.skeleton.to_unsigned_transaction(&blockhash);

    let backend = backend_for(&compiled.selection, client, router.tables());
    backend
        .submit(
            transaction,
            signer,
            compiled.priority_fee_sol,
            compiled.selection.tip_lamports,
            compiled.selection.skip_preflight,
            options,
            &compiled.selection,
        )
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::WSOL_MINT;
    use crate::listings::ListingSnapshot;
    use crate::pools::PoolOrigin;
    use crate::relay::{ProviderTable, RelayPreferences, RelayProvider, RelayTables, Region};
    use crate::testing::{record, MockFetcher, MockTransport};
    use crate::venues::pumpswap::tests::pump_fixture;
    use crate::venues::{is_compute_budget, Venue};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use solana_sdk::pubkey::Pubkey;
    use solana_sdk::system_instruction;
    use std::time::Duration;

    fn tables() -> RelayTables {
        let mut tables = RelayTables::new();
        for (provider, min_tip_lamports) in [
            (RelayProvider::Jito, 10_000),
            (RelayProvider::NextBlock, 1_000_000),
        ] {
            tables.insert(
                provider,
                ProviderTable {
                    tip_addresses: (0..3).map(|_| Pubkey::new_unique()).collect(),
                    endpoints: vec![(Region::Frankfurt, format!("http://{}.example", provider))],
                    min_tip_lamports,
                    auth_token: None,
                },
            );
        }
        tables
    }

    fn engine(fetcher: Arc<MockFetcher>, transport: Arc<MockTransport>) -> SwapEngine {
        let cache = Arc::new(ListingCache::new(fetcher, None, Duration::from_secs(300)));
        let registry = Arc::new(VenueRegistry::with_defaults(transport.clone()));
        let locator = PoolLocator::new(cache, transport, registry.clone());
        SwapEngine::new(
            locator,
            registry,
            RelayRouter::new(tables()),
            SwapsConfig::default(),
        )
    }

    fn buy_request(mint: &Pubkey, owner: &Pubkey, tip_sol: f64) -> SwapRequest {
        SwapRequest {
            venue: Venue::PumpSwap,
            direction: SwapDirection::Buy,
            mint: mint.to_string(),
            amount: 1.5,
            slippage: 0.01,
            owner: owner.to_string(),
            relay: RelayPreferences {
                tip_sol,
                ..RelayPreferences::default()
            },
            priority_fee_sol: None,
        }
    }

    struct Harness {
        engine: SwapEngine,
        fetcher: Arc<MockFetcher>,
        mint: Pubkey,
        pool: Pubkey,
    }

    fn listed_pump_pool() -> Harness {
        let mint = Pubkey::new_unique();
        let fixture = pump_fixture(mint);
        let pool = fixture.pool.pool_address;
        let fetcher = Arc::new(MockFetcher::returning(ListingSnapshot::new(vec![record(
            &pool.to_string(),
            &mint.to_string(),
            SOL_MINT,
            1_000_000_000.0,
            50.0,
            100.0,
        )])));
        Harness {
            engine: engine(fetcher.clone(), fixture.transport),
            fetcher,
            mint,
            pool,
        }
    }

    #[tokio::test]
    async fn test_buy_without_tip_uses_standard_route() {
        let harness = listed_pump_pool();
        let owner = Pubkey::new_unique();
        let mut rng = StdRng::seed_from_u64(11);

        let compiled = harness
            .engine
            .compile_and_route(&buy_request(&harness.mint, &owner, 0.0), &mut rng)
            .await
            .unwrap();

        let skeleton = &compiled.skeleton;
        assert_eq!(compiled.pool.pool_address, harness.pool);
        assert_eq!(compiled.pool.origin, PoolOrigin::Listing);
        assert_eq!(compiled.pool.quote_mint, WSOL_MINT);
        assert_eq!(skeleton.payer, owner);
        assert_eq!(skeleton.compute_budget_len, 1);
        assert!(is_compute_budget(&skeleton.instructions[0]));
        assert!(skeleton.tip_index.is_none());
        assert_eq!(
            skeleton
                .instructions
                .iter()
                .filter(|ix| is_compute_budget(ix))
                .count(),
            1
        );
        assert_eq!(skeleton.swap_instructions().len(), 6);
        assert!(compiled.selection.is_standard());
        assert_eq!(compiled.selection.tip_lamports, 0);
        assert_eq!(compiled.quote.amount_in, 1_500_000_000);
    }

    #[tokio::test]
    async fn test_buy_with_tip_routes_to_high_tip_relay() {
        let harness = listed_pump_pool();
        let owner = Pubkey::new_unique();
        let mut rng = StdRng::seed_from_u64(12);

        let compiled = harness
            .engine
            .compile_and_route(&buy_request(&harness.mint, &owner, 0.002), &mut rng)
            .await
            .unwrap();

        let selection = &compiled.selection;
        assert_eq!(selection.provider, RelayProvider::NextBlock);
        assert_eq!(selection.tip_lamports, 2_000_000);
        assert_eq!(selection.region, Some(Region::Frankfurt));

        let skeleton = &compiled.skeleton;
        assert_eq!(skeleton.tip_index, Some(1));
        assert_eq!(
            skeleton.instructions[1],
            system_instruction::transfer(&owner, &selection.tip_address.unwrap(), 2_000_000)
        );
        assert!(is_compute_budget(&skeleton.instructions[0]));
        assert_eq!(skeleton.swap_instructions().len(), 6);
        assert_eq!(skeleton.instructions.len(), 8);
    }

    #[tokio::test]
    async fn test_small_tip_routes_to_low_tip_relay() {
        let harness = listed_pump_pool();
        let owner = Pubkey::new_unique();
        let mut rng = StdRng::seed_from_u64(13);

        let compiled = harness
            .engine
            .compile_and_route(&buy_request(&harness.mint, &owner, 0.0002), &mut rng)
            .await
            .unwrap();
        assert_eq!(compiled.selection.provider, RelayProvider::Jito);
        assert_eq!(compiled.selection.tip_lamports, 200_000);
    }

    #[tokio::test]
    async fn test_zero_priority_fee_omits_compute_budget() {
        let harness = listed_pump_pool();
        let owner = Pubkey::new_unique();
        let mut request = buy_request(&harness.mint, &owner, 0.0);
        request.priority_fee_sol = Some(0.0);

        let compiled = harness
            .engine
            .compile_and_route(&request, &mut StdRng::seed_from_u64(14))
            .await
            .unwrap();
        assert_eq!(compiled.skeleton.compute_budget_len, 0);
        assert_eq!(compiled.skeleton.instructions.len(), 6);
    }

    #[tokio::test]
    async fn test_empty_listing_and_no_pool_is_not_found() {
        let fetcher = Arc::new(MockFetcher::returning(ListingSnapshot::default()));
        let engine = engine(fetcher, Arc::new(MockTransport::new()));
        let owner = Pubkey::new_unique();

        let err = engine
            .compile_and_route(
                &buy_request(&Pubkey::new_unique(), &owner, 0.0),
                &mut StdRng::seed_from_u64(15),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, SwapError::PoolNotFound { .. }));
    }

    #[tokio::test]
    async fn test_invalid_parameters_fail_before_discovery() {
        let harness = listed_pump_pool();
        let owner = Pubkey::new_unique();
        let mut rng = StdRng::seed_from_u64(16);

        let mut request = buy_request(&harness.mint, &owner, 0.0);
        request.slippage = 1.5;
        let err = harness.engine.compile_and_route(&request, &mut rng).await.unwrap_err();
        assert!(matches!(err, SwapError::InvalidParameter { field: "slippage", .. }));

        let mut request = buy_request(&harness.mint, &owner, 0.0);
        request.amount = 0.0;
        let err = harness.engine.compile_and_route(&request, &mut rng).await.unwrap_err();
        assert!(matches!(err, SwapError::InvalidParameter { field: "amount", .. }));

        let mut request = buy_request(&harness.mint, &owner, 0.0);
        request.owner = "not-a-key".to_string();
        let err = harness.engine.compile_and_route(&request, &mut rng).await.unwrap_err();
        assert!(matches!(err, SwapError::InvalidParameter { field: "owner", .. }));

        assert_eq!(harness.fetcher.calls(), 0);
    }

    #[tokio::test]
    async fn test_discovery_failure_surfaces() {
        let fetcher = Arc::new(MockFetcher::failing("503"));
        let engine = engine(fetcher, Arc::new(MockTransport::new()));
        let owner = Pubkey::new_unique();

        let err = engine
            .compile_and_route(
                &buy_request(&Pubkey::new_unique(), &owner, 0.0),
                &mut StdRng::seed_from_u64(17),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, SwapError::PoolDiscoveryUnavailable { .. }));
        assert!(err.is_recoverable());
    }

    #[tokio::test]
    async fn test_signer_must_match_owner() {
        let harness = listed_pump_pool();
        let owner = Pubkey::new_unique();
        let compiled = harness
            .engine
            .compile_and_route(
                &buy_request(&harness.mint, &owner, 0.0),
                &mut StdRng::seed_from_u64(18),
            )
            .await
            .unwrap();

        let client = Arc::new(RpcClient::new("http://127.0.0.1:1".to_string()));
        let err = submit_compiled(
            &compiled,
            &Keypair::new(),
            client,
            harness.engine.router(),
            &SubmitOptions::default(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, SwapError::InvalidParameter { field: "keypair", .. }));
    }
}
