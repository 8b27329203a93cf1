/// Configuration schemas
///
/// Every section has defaults, so an empty or missing config file is valid.
use crate::config_struct;
use crate::constants::{
    DEFAULT_COMPUTE_UNIT_BUDGET, DEFAULT_HIGH_TIP_THRESHOLD_SOL, DEFAULT_LISTING_TTL_SECS,
    DEFAULT_PRIORITY_FEE_SOL, DEFAULT_RPC_URL, PUMPSWAP_API_BASE, RAYDIUM_API_BASE,
};
use std::collections::HashMap;
use std::time::Duration;

config_struct! {
    /// Ledger RPC connection
    pub struct RpcConfig {
        url: String = DEFAULT_RPC_URL.to_string(),
        /// processed | confirmed | finalized
        commitment: String = "confirmed".to_string(),
    }
}

config_struct! {
    /// Venue listing cache
    pub struct CacheConfig {
        /// TTL override in seconds; values <= 0 fall back to the default
        listing_ttl_secs: i64 = DEFAULT_LISTING_TTL_SECS as i64,
        /// Persist listings to disk so they survive restarts
        disk_enabled: bool = true,
        /// Override for the on-disk cache directory
        directory: Option<String> = None,
    }
}

impl CacheConfig {
    /// Effective listing TTL
    pub fn listing_ttl(&self) -> Duration {
        effective_ttl(self.listing_ttl_secs)
    }
}

/// Resolve a TTL override, falling back to the default for non-positive values
pub fn effective_ttl(override_secs: i64) -> Duration {
    if override_secs > 0 {
        Duration::from_secs(override_secs as u64)
    } else {
        Duration::from_secs(DEFAULT_LISTING_TTL_SECS)
    }
}

config_struct! {
    /// Transaction compilation
    pub struct SwapsConfig {
        /// Priority fee in SOL
        priority_fee_sol: f64 = DEFAULT_PRIORITY_FEE_SOL,
        /// Compute units the priority fee is spread over
        compute_unit_budget: u32 = DEFAULT_COMPUTE_UNIT_BUDGET,
        /// Explicit compute-unit limit instruction (omitted when unset)
        compute_unit_limit: Option<u32> = None,
        /// Slippage fraction used when the caller gives none
        default_slippage: f64 = 0.01,
    }
}

config_struct! {
    /// Relay selection and submission
    pub struct RelayConfig {
        /// Tip in SOL; zero routes through the standard RPC path
        tip_sol: f64 = 0.0,
        /// Explicit provider (jito, nextblock, zeroslot, temporal, standard)
        provider: Option<String> = None,
        /// Preferred region, matched case-insensitively
        region: Option<String> = None,
        /// Ask relays for front-running protection where supported
        anti_mev: bool = false,
        high_tip_threshold_sol: f64 = DEFAULT_HIGH_TIP_THRESHOLD_SOL,
        high_tip_provider: String = "nextblock".to_string(),
        low_tip_provider: String = "jito".to_string(),
        skip_preflight: bool = true,
        /// Per-provider tip address overrides
        tip_addresses: HashMap<String, Vec<String>> = HashMap::new(),
        /// Per-provider region -> endpoint overrides
        endpoints: HashMap<String, HashMap<String, String>> = HashMap::new(),
        /// Per-provider API keys / auth headers
        auth_tokens: HashMap<String, String> = HashMap::new(),
    }
}

config_struct! {
    /// Venue API endpoints and discovery strategies
    pub struct VenuesConfig {
        raydium_api_base: String = RAYDIUM_API_BASE.to_string(),
        pumpswap_api_base: String = PUMPSWAP_API_BASE.to_string(),
        /// Allow the getProgramAccounts scan as the last discovery fallback
        enable_registry_scan: bool = true,
    }
}

config_struct! {
    /// Root configuration
    pub struct Config {
        rpc: RpcConfig = RpcConfig::default(),
        cache: CacheConfig = CacheConfig::default(),
        swaps: SwapsConfig = SwapsConfig::default(),
        relay: RelayConfig = RelayConfig::default(),
        venues: VenuesConfig = VenuesConfig::default(),
    }
}
