//! Constants module
//!
//! Program ids, seeds, defaults and the built-in relay tables. Relay tables
//! can be overridden from the `[relay]` config section.

use crate::relay::{RelayProvider, Region};
use solana_sdk::pubkey;
use solana_sdk::pubkey::Pubkey;

// =============================================================================
// NATIVE CURRENCY
// =============================================================================

/// Wrapped SOL mint
pub const SOL_MINT: &str = "So11111111111111111111111111111111111111112";

/// Decimal count of the native currency
pub const SOL_DECIMALS: u8 = 9;

pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

// =============================================================================
// PROGRAM IDs
// =============================================================================

/// Raydium CPMM Program ID
pub const RAYDIUM_CPMM_PROGRAM_ID: &str = "CPMMoo8L3F4NbTegBCKVNunggL7H1ZpdTHKxQB5qKP1C";

pub const RAYDIUM_CPMM_PROGRAM: Pubkey = pubkey!("CPMMoo8L3F4NbTegBCKVNunggL7H1ZpdTHKxQB5qKP1C");
pub const PUMPSWAP_PROGRAM: Pubkey = pubkey!("pAMMBay6oceH9fJKBRHGP5D4bD4sWpmSwMn52FMfXEA");
/// Pump.fun bonding curve program; owns the canonical pool creator PDA
pub const PUMP_PROGRAM: Pubkey = pubkey!("6EF8rrecthR5Dkzon8Nwu78hRvfCKubJ14M5uBEwF6P");
pub const WSOL_MINT: Pubkey = pubkey!("So11111111111111111111111111111111111111112");

// =============================================================================
// PDA SEEDS
// =============================================================================

pub const RAYDIUM_CPMM_AUTH_SEED: &[u8] = b"vault_and_lp_mint_auth_seed";
pub const RAYDIUM_CPMM_POOL_SEED: &[u8] = b"pool";
pub const RAYDIUM_CPMM_AMM_CONFIG_SEED: &[u8] = b"amm_config";

/// AMM config indexes probed when deriving a CPMM pool address
pub const RAYDIUM_CPMM_CONFIG_INDEXES: &[u16] = &[0, 1, 2, 3];

pub const PUMPSWAP_POOL_SEED: &[u8] = b"pool";
pub const PUMPSWAP_GLOBAL_CONFIG_SEED: &[u8] = b"global_config";
pub const PUMPSWAP_EVENT_AUTHORITY_SEED: &[u8] = b"__event_authority";
pub const PUMPSWAP_CREATOR_VAULT_SEED: &[u8] = b"creator_vault";
pub const PUMPSWAP_GLOBAL_VOLUME_SEED: &[u8] = b"global_volume_accumulator";
pub const PUMPSWAP_USER_VOLUME_SEED: &[u8] = b"user_volume_accumulator";
pub const PUMP_POOL_AUTHORITY_SEED: &[u8] = b"pool-authority";

// =============================================================================
// DEFAULTS
// =============================================================================

/// Listing cache TTL when no valid override is configured
pub const DEFAULT_LISTING_TTL_SECS: u64 = 300;

/// Priority fee in SOL spread over the compute-unit budget
pub const DEFAULT_PRIORITY_FEE_SOL: f64 = 0.0001;

/// Compute units assumed when pricing the priority fee
pub const DEFAULT_COMPUTE_UNIT_BUDGET: u32 = 200_000;

/// Tips at or above this amount (SOL) route to the high-tip relay
pub const DEFAULT_HIGH_TIP_THRESHOLD_SOL: f64 = 0.001;

pub const DEFAULT_HIGH_TIP_PROVIDER: RelayProvider = RelayProvider::NextBlock;
pub const DEFAULT_LOW_TIP_PROVIDER: RelayProvider = RelayProvider::Jito;

pub const DEFAULT_RPC_URL: &str = "https://api.mainnet-beta.solana.com";

/// Raydium v3 REST API base
pub const RAYDIUM_API_BASE: &str = "https://api-v3.raydium.io";

/// PumpSwap REST API base
pub const PUMPSWAP_API_BASE: &str = "https://swap-api.pump.fun/v1";

/// Listing request timeout (seconds); callers own the overall deadline
pub const LISTING_HTTP_TIMEOUT_SECS: u64 = 30;

/// Relay submission request timeout (seconds)
pub const RELAY_HTTP_TIMEOUT_SECS: u64 = 10;

// =============================================================================
// RELAY TABLES
// =============================================================================

pub const JITO_TIP_ADDRESSES: &[&str] = &[
    "96gYZGLnJYVFmbjzopPSU6QiEV5fGqZNyN9nmNhvrZU5",
    "HFqU5x63VTqvQss8hp11i4wVV8bD44PvwucfZ2bU7gRe",
    "Cw8CFyM9FkoMi7K7Crf6HNQqf4uEMzpKw6QNghXLvLkY",
    "ADaUMid9yfUytqMBgopwjb2DTLSokTSzL1zt6iGPaS49",
    "DfXygSm4jCyNCybVYYK6DwvWqjKee8pbDmJGcLWNDXjh",
    "ADuUkR4vqLUMWXxW9gh6D6L8pMSawimctcNZ5pGwDcEt",
    "DttWaMuVvTiduZRnguLF7jNxTgiMBZ1hyAumKUiL2KRL",
    "3AVi9Tg9Uo68tJfuvoKvqKNWKkC5wPdSSdeBnizKZ6jT",
];

pub const NEXTBLOCK_TIP_ADDRESSES: &[&str] = &[
    "NextbLoCkVtMGcV47JzewQdvBpLqT9TxQFozQkN98pE",
    "NexTbLoCkWykbLuB1NkjXgFWkX9oAtcoagQegygXXA2",
    "NeXTBLoCKs9F1y5PJS9CKrFNNLU1keHW71rfh7KgA1X",
    "NexTBLockJYZ7QD7p2byrUa6df8ndV2WSd8GkbWqfbb",
    "neXtBLock1LeC67jYd1QdAa32kbVeubsfPNTJC1V5At",
    "nEXTBLockYgngeRmRrjDV31mGSekVPqZoMGhQEZtPVG",
    "NEXTbLoCkB51HpLBLojQfpyVAMorm3zzKg7w9NFdqid",
    "nextBLoCkPMgmG8ZgJtABeScP35qLa2AMCNKntAP7Xc",
];

pub const ZEROSLOT_TIP_ADDRESSES: &[&str] = &[
    "Eb2KpSC8uMt9GmzyAEm5Eb1AAAgTjRaXWFjKyFXHZxF3",
    "FCjUJZ1qozm1e8romw216qyfQMaaWKxWsuySnumVCCNe",
    "ENxTEjSQ1YabmUpXAdCgevnHQ9MHdLv8tzFiuiYJqa13",
    "6rYLG55Q9RpsPGvqdPNJs4z5WTxJVatMB8zV3WJhs5EK",
    "Cix2bHfqPcKcM233mzxbLk14kSggUUiz2A87fJtGivXr",
];

pub const TEMPORAL_TIP_ADDRESSES: &[&str] = &[
    "TEMPaMeCRFAS9EKF53Jd6KpHxgL47uWLcpFArU1Fanq",
    "noz3jAjPiHuBPqiSPkkugaJDkJscPuRhYnSpbi8UvC4",
    "noz3str9KXfpKknefHji8L1mPgimezaiUyCHYMDv1GE",
    "noz6uoYCDijhu1V7cutCpwxNiSovEwLdRHPwmgCGDNo",
    "noz9EPNcT7WH6Sou3sr3GGjHQYVkN3DNirpbvDkv9YJ",
    "nozc5yT15LazbLTFVZzoNZCwjh3yUtW86LoUyqsBu4L",
    "nozFrhfnNGoyqwVuwPAW4aaGqempx4PU6g6D9CJMv7Z",
    "nozievPk7HyK1Rqy1MPJwVQ7qQg2QoJGyP71oeDwbsu",
];

/// Minimum accepted tip per provider (SOL)
pub const JITO_MIN_TIP_SOL: f64 = 0.00001;
pub const NEXTBLOCK_MIN_TIP_SOL: f64 = 0.001;
pub const ZEROSLOT_MIN_TIP_SOL: f64 = 0.0001;
pub const TEMPORAL_MIN_TIP_SOL: f64 = 0.001;

pub const JITO_ENDPOINTS: &[(Region, &str)] = &[
    (Region::Amsterdam, "https://amsterdam.mainnet.block-engine.jito.wtf/api/v1/transactions"),
    (Region::Frankfurt, "https://frankfurt.mainnet.block-engine.jito.wtf/api/v1/transactions"),
    (Region::London, "https://london.mainnet.block-engine.jito.wtf/api/v1/transactions"),
    (Region::NewYork, "https://ny.mainnet.block-engine.jito.wtf/api/v1/transactions"),
    (Region::SaltLakeCity, "https://slc.mainnet.block-engine.jito.wtf/api/v1/transactions"),
    (Region::Singapore, "https://singapore.mainnet.block-engine.jito.wtf/api/v1/transactions"),
    (Region::Tokyo, "https://tokyo.mainnet.block-engine.jito.wtf/api/v1/transactions"),
];

pub const NEXTBLOCK_ENDPOINTS: &[(Region, &str)] = &[
    (Region::Frankfurt, "https://fra.nextblock.io/api/v2/submit"),
    (Region::NewYork, "https://ny.nextblock.io/api/v2/submit"),
    (Region::Amsterdam, "https://amsterdam.nextblock.io/api/v2/submit"),
    (Region::Tokyo, "https://tokyo.nextblock.io/api/v2/submit"),
];

pub const ZEROSLOT_ENDPOINTS: &[(Region, &str)] = &[
    (Region::NewYork, "https://ny.0slot.trade"),
    (Region::Frankfurt, "https://de.0slot.trade"),
    (Region::Amsterdam, "https://ams.0slot.trade"),
    (Region::Tokyo, "https://jp.0slot.trade"),
    (Region::LosAngeles, "https://la.0slot.trade"),
];

pub const TEMPORAL_ENDPOINTS: &[(Region, &str)] = &[
    (Region::NewYork, "http://ewr1.secure.nozomi.temporal.xyz"),
    (Region::Frankfurt, "http://fra2.secure.nozomi.temporal.xyz"),
    (Region::Amsterdam, "http://ams1.secure.nozomi.temporal.xyz"),
    (Region::Tokyo, "http://tyo1.secure.nozomi.temporal.xyz"),
];
