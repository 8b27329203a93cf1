//! Pool resolution
//!
//! `PoolLocator::locate` finds the pool for a pair on one venue. Strategies
//! run strictly in order and the first match wins:
//! 1. listing snapshot from the `ListingCache`, ranked by `resolver::resolve`
//! 2. canonical pool address derivation, confirmed on chain
//! 3. registry scan over the venue program's accounts
//!
//! Resolution is repeated on every call; only raw listings are cached.

pub mod lookup;
pub mod resolver;

pub use resolver::{resolve, PoolCandidate, PoolScore};

use crate::errors::{SwapError, SwapResult};
use crate::listings::{ListingCache, ListingSnapshot, PairKey};
use crate::logger::{self, LogTag};
use crate::rpc::LedgerTransport;
use crate::swaps::types::SwapDirection;
use crate::venues::{Venue, VenueRegistry};
use serde::Serialize;
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;
use std::sync::Arc;

/// Which strategy produced a pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolOrigin {
    Listing,
    DerivedAddress,
    RegistryScan,
}

/// Pool chosen for one swap call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedPool {
    pub venue: Venue,
    #[serde(serialize_with = "serialize_pubkey")]
    pub pool_address: Pubkey,
    #[serde(serialize_with = "serialize_pubkey")]
    pub target_mint: Pubkey,
    #[serde(serialize_with = "serialize_pubkey")]
    pub quote_mint: Pubkey,
    pub origin: PoolOrigin,
}

fn serialize_pubkey<S: serde::Serializer>(key: &Pubkey, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&key.to_string())
}

impl ResolvedPool {
    pub fn mint_in(&self, direction: SwapDirection) -> Pubkey {
        match direction {
            SwapDirection::Buy => self.quote_mint,
            SwapDirection::Sell => self.target_mint,
        }
    }

    pub fn mint_out(&self, direction: SwapDirection) -> Pubkey {
        match direction {
            SwapDirection::Buy => self.target_mint,
            SwapDirection::Sell => self.quote_mint,
        }
    }
}

/// Listing records whose pool address parses
fn usable_records(venue: Venue, snapshot: &ListingSnapshot) -> ListingSnapshot {
    let (valid, malformed): (Vec<_>, Vec<_>) = snapshot
        .iter()
        .cloned()
        .partition(|record| Pubkey::from_str(record.pool_address.trim()).is_ok());
    for record in &malformed {
        logger::warning(
            LogTag::Pool,
            &format!(
                "Skipping {} listing with malformed pool address '{}'",
                venue, record.pool_address
            ),
        );
    }
    ListingSnapshot::new(valid)
}

pub fn parse_pubkey(field: &'static str, value: &str) -> SwapResult<Pubkey> {
    Pubkey::from_str(value.trim())
        .map_err(|e| SwapError::invalid(field, format!("'{}' is not a valid address: {}", value, e)))
}

pub struct PoolLocator {
    cache: Arc<ListingCache>,
    transport: Arc<dyn LedgerTransport>,
    registry: Arc<VenueRegistry>,
    registry_scan: bool,
}

impl PoolLocator {
    pub fn new(
        cache: Arc<ListingCache>,
        transport: Arc<dyn LedgerTransport>,
        registry: Arc<VenueRegistry>,
    ) -> Self {
        Self {
            cache,
            transport,
            registry,
            registry_scan: true,
        }
    }

    /// Enable or disable the registry scan strategy
    pub fn with_registry_scan(mut self, enabled: bool) -> Self {
        self.registry_scan = enabled;
        self
    }

    pub async fn locate(&self, venue: Venue, target: &str, quote: &str) -> SwapResult<ResolvedPool> {
        let target_key = parse_pubkey("mint", target)?;
        let quote_key = parse_pubkey("quote_mint", quote)?;
        let pair = PairKey::new(target, quote);

        let resolved = |pool_address: Pubkey, origin: PoolOrigin| ResolvedPool {
            venue,
            pool_address,
            target_mint: target_key,
            quote_mint: quote_key,
            origin,
        };

        let snapshot = self.cache.get_listings(venue, &pair).await?;
        let usable = usable_records(venue, &snapshot);
        if let Some(candidate) = resolve(&usable, target, quote) {
            let address = parse_pubkey("pool_address", &candidate.record.pool_address)?;
            logger::info(
                LogTag::Pool,
                &format!(
                    "Resolved {} pool {} from listing ({} candidates, score {:.4})",
                    venue,
                    address,
                    snapshot.len(),
                    candidate.score.value()
                ),
            );
            return Ok(resolved(address, PoolOrigin::Listing));
        }

        let adapter = self.registry.get(venue)?;

        logger::debug(
            LogTag::Pool,
            &format!("No {} listing for {}, deriving canonical address", venue, pair),
        );
        if let Some(address) =
            lookup::find_canonical_pool(adapter.as_ref(), self.transport.as_ref(), &target_key, &quote_key)
                .await?
        {
            logger::info(
                LogTag::Pool,
                &format!("Resolved {} pool {} by address derivation", venue, address),
            );
            return Ok(resolved(address, PoolOrigin::DerivedAddress));
        }

        if self.registry_scan {
            logger::debug(
                LogTag::Pool,
                &format!("Scanning {} program accounts for {}", venue, pair),
            );
            if let Some(address) =
                lookup::scan_registry(adapter.as_ref(), self.transport.as_ref(), &target_key, &quote_key)
                    .await?
            {
                logger::info(
                    LogTag::Pool,
                    &format!("Resolved {} pool {} by registry scan", venue, address),
                );
                return Ok(resolved(address, PoolOrigin::RegistryScan));
            }
        }

        Err(SwapError::PoolNotFound {
            venue: venue.to_string(),
            target: target.to_string(),
            quote: quote.to_string(),
        })
    }
}
