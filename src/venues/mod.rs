//! Venue adapters
//!
//! One `VenueAdapter` per venue. Each adapter quotes against live on-chain
//! pool state and emits that venue's instruction sequence. Adapters never
//! emit compute-budget instructions; the compiler owns those.

pub mod accounts;
pub mod pumpswap;
pub mod raydium_cpmm;

pub use pumpswap::PumpSwapAdapter;
pub use raydium_cpmm::RaydiumCpmmAdapter;

use crate::errors::{SwapError, SwapResult};
use crate::pools::lookup::PoolLookup;
use crate::pools::ResolvedPool;
use crate::rpc::LedgerTransport;
use crate::swaps::types::{SwapDirection, SwapQuote};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use solana_sdk::instruction::Instruction;
use solana_sdk::pubkey::Pubkey;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Venue {
    #[serde(rename = "pumpswap")]
    PumpSwap,
    #[serde(rename = "raydium-cpmm")]
    RaydiumCpmm,
}

impl Venue {
    pub const ALL: [Venue; 2] = [Venue::PumpSwap, Venue::RaydiumCpmm];

    pub fn as_str(&self) -> &'static str {
        match self {
            Venue::PumpSwap => "pumpswap",
            Venue::RaydiumCpmm => "raydium-cpmm",
        }
    }
}

impl fmt::Display for Venue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Venue {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pumpswap" | "pump-swap" | "pumpfun-amm" => Ok(Venue::PumpSwap),
            "raydium-cpmm" | "raydium_cpmm" | "cpmm" => Ok(Venue::RaydiumCpmm),
            other => Err(format!("Unknown venue '{}'", other)),
        }
    }
}

pub fn is_compute_budget(instruction: &Instruction) -> bool {
    instruction.program_id == solana_sdk::compute_budget::id()
}

/// Drop every compute-budget instruction, keeping the rest in order
pub fn strip_compute_budget(instructions: Vec<Instruction>) -> Vec<Instruction> {
    instructions
        .into_iter()
        .filter(|ix| !is_compute_budget(ix))
        .collect()
}

#[async_trait]
pub trait VenueAdapter: PoolLookup {
    fn venue(&self) -> Venue;

    /// Quote spending `amount_native_in` SOL on the pool's target token
    async fn quote_buy(
        &self,
        pool: &ResolvedPool,
        amount_native_in: f64,
        slippage: f64,
    ) -> SwapResult<SwapQuote>;

    /// Quote selling `amount_token_in` target tokens for SOL
    async fn quote_sell(
        &self,
        pool: &ResolvedPool,
        amount_token_in: f64,
        slippage: f64,
    ) -> SwapResult<SwapQuote>;

    /// Venue-native instruction sequence for a quote
    async fn build_swap_instructions(
        &self,
        owner: &Pubkey,
        pool: &ResolvedPool,
        direction: SwapDirection,
        quote: &SwapQuote,
    ) -> SwapResult<Vec<Instruction>>;

    async fn quote(
        &self,
        pool: &ResolvedPool,
        direction: SwapDirection,
        amount: f64,
        slippage: f64,
    ) -> SwapResult<SwapQuote> {
        match direction {
            SwapDirection::Buy => self.quote_buy(pool, amount, slippage).await,
            SwapDirection::Sell => self.quote_sell(pool, amount, slippage).await,
        }
    }

    /// `build_swap_instructions` with compute-budget instructions removed
    async fn swap_instructions(
        &self,
        owner: &Pubkey,
        pool: &ResolvedPool,
        direction: SwapDirection,
        quote: &SwapQuote,
    ) -> SwapResult<Vec<Instruction>> {
        let instructions = self
            .build_swap_instructions(owner, pool, direction, quote)
            .await?;
        Ok(strip_compute_budget(instructions))
    }
}

/// Venue identifier to adapter, built once at startup
#[derive(Default, Clone)]
pub struct VenueRegistry {
    adapters: HashMap<Venue, Arc<dyn VenueAdapter>>,
}

impl VenueRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every supported venue
    pub fn with_defaults(transport: Arc<dyn LedgerTransport>) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(PumpSwapAdapter::new(transport.clone())));
        registry.register(Arc::new(RaydiumCpmmAdapter::new(transport)));
        registry
    }

    pub fn register(&mut self, adapter: Arc<dyn VenueAdapter>) {
        self.adapters.insert(adapter.venue(), adapter);
    }

    pub fn get(&self, venue: Venue) -> SwapResult<Arc<dyn VenueAdapter>> {
        self.adapters
            .get(&venue)
            .cloned()
            .ok_or_else(|| SwapError::invalid("venue", format!("{} is not registered", venue)))
    }

    pub fn venues(&self) -> Vec<Venue> {
        let mut venues: Vec<Venue> = self.adapters.keys().copied().collect();
        venues.sort();
        venues
    }
}
