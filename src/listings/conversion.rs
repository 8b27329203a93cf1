/// Venue API payloads and their mapping into listing snapshots
use super::types::{ListingSnapshot, PoolRecord};
use crate::constants::RAYDIUM_CPMM_PROGRAM_ID;
use serde::{Deserialize, Deserializer};

/// Deserialize a number that venues send either as a JSON number or a string.
/// Missing, null or unparseable values become 0.0.
pub fn deserialize_lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    use std::fmt;

    struct LenientF64;

    impl<'de> Visitor<'de> for LenientF64 {
        type Value = f64;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a number, a numeric string or null")
        }

        fn visit_str<E>(self, value: &str) -> Result<f64, E>
        where
            E: de::Error,
        {
            Ok(value.trim().parse::<f64>().unwrap_or(0.0))
        }

        fn visit_i64<E>(self, value: i64) -> Result<f64, E>
        where
            E: de::Error,
        {
            Ok(value as f64)
        }

        fn visit_u64<E>(self, value: u64) -> Result<f64, E>
        where
            E: de::Error,
        {
            Ok(value as f64)
        }

        fn visit_f64<E>(self, value: f64) -> Result<f64, E>
        where
            E: de::Error,
        {
            Ok(value)
        }

        fn visit_unit<E>(self) -> Result<f64, E>
        where
            E: de::Error,
        {
            Ok(0.0)
        }

        fn visit_none<E>(self) -> Result<f64, E>
        where
            E: de::Error,
        {
            Ok(0.0)
        }
    }

    deserializer.deserialize_any(LenientF64)
}

// =============================================================================
// RAYDIUM v3
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct RaydiumPoolsResponse {
    #[serde(default)]
    pub success: bool,
    pub data: Option<RaydiumPoolPage>,
}

#[derive(Debug, Deserialize)]
pub struct RaydiumPoolPage {
    #[serde(default)]
    pub data: Vec<RaydiumPoolInfo>,
}

#[derive(Debug, Deserialize)]
pub struct RaydiumMintInfo {
    pub address: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaydiumPoolInfo {
    pub id: String,
    #[serde(default)]
    pub program_id: String,
    pub mint_a: RaydiumMintInfo,
    pub mint_b: RaydiumMintInfo,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub mint_amount_a: f64,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub mint_amount_b: f64,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub tvl: f64,
}

/// Map a Raydium `/pools/info/mint` response, keeping CPMM pools only
pub fn parse_raydium_listing(body: &str) -> Result<ListingSnapshot, String> {
    let response: RaydiumPoolsResponse =
        serde_json::from_str(body).map_err(|e| format!("Invalid Raydium response: {}", e))?;

    if !response.success {
        return Err("Raydium API reported success=false".to_string());
    }

    let records = response
        .data
        .map(|page| page.data)
        .unwrap_or_default()
        .into_iter()
        .filter(|pool| pool.program_id == RAYDIUM_CPMM_PROGRAM_ID)
        .filter(|pool| !pool.id.trim().is_empty())
        .map(|pool| PoolRecord {
            pool_address: pool.id,
            mint_a: pool.mint_a.address,
            mint_b: pool.mint_b.address,
            reserve_a: pool.mint_amount_a,
            reserve_b: pool.mint_amount_b,
            liquidity: pool.tvl,
        })
        .collect();

    Ok(ListingSnapshot::new(records))
}

// =============================================================================
// PUMPSWAP
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PumpSwapPoolInfo {
    pub address: String,
    pub base_mint: String,
    pub quote_mint: String,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub base_reserves: f64,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub quote_reserves: f64,
    #[serde(rename = "liquidityUSD", default, deserialize_with = "deserialize_lenient_f64")]
    pub liquidity_usd: f64,
}

/// Map a PumpSwap `/pools/pair` response (bare array)
pub fn parse_pumpswap_listing(body: &str) -> Result<ListingSnapshot, String> {
    let pools: Vec<PumpSwapPoolInfo> =
        serde_json::from_str(body).map_err(|e| format!("Invalid PumpSwap response: {}", e))?;

    let records = pools
        .into_iter()
        .filter(|pool| !pool.address.trim().is_empty())
        .map(|pool| PoolRecord {
            pool_address: pool.address,
            mint_a: pool.base_mint,
            mint_b: pool.quote_mint,
            reserve_a: pool.base_reserves,
            reserve_b: pool.quote_reserves,
            liquidity: pool.liquidity_usd,
        })
        .collect();

    Ok(ListingSnapshot::new(records))
}
