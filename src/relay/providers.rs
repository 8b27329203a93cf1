/// Relay providers, regions and their tip/endpoint tables
use crate::config::RelayConfig;
use crate::constants::{
    JITO_ENDPOINTS, JITO_MIN_TIP_SOL, JITO_TIP_ADDRESSES, NEXTBLOCK_ENDPOINTS,
    NEXTBLOCK_MIN_TIP_SOL, NEXTBLOCK_TIP_ADDRESSES, TEMPORAL_ENDPOINTS, TEMPORAL_MIN_TIP_SOL,
    TEMPORAL_TIP_ADDRESSES, ZEROSLOT_ENDPOINTS, ZEROSLOT_MIN_TIP_SOL, ZEROSLOT_TIP_ADDRESSES,
};
use crate::logger::{self, LogTag};
use crate::swaps::amounts::sol_to_lamports;
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelayProvider {
    /// Plain RPC `sendTransaction`, no tip
    Standard,
    Jito,
    NextBlock,
    ZeroSlot,
    Temporal,
}

impl RelayProvider {
    pub const ACCELERATED: [RelayProvider; 4] = [
        RelayProvider::Jito,
        RelayProvider::NextBlock,
        RelayProvider::ZeroSlot,
        RelayProvider::Temporal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RelayProvider::Standard => "standard",
            RelayProvider::Jito => "jito",
            RelayProvider::NextBlock => "nextblock",
            RelayProvider::ZeroSlot => "zeroslot",
            RelayProvider::Temporal => "temporal",
        }
    }
}

impl fmt::Display for RelayProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelayProvider {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "standard" | "rpc" | "default" => Ok(RelayProvider::Standard),
            "jito" => Ok(RelayProvider::Jito),
            "nextblock" | "next-block" => Ok(RelayProvider::NextBlock),
            "zeroslot" | "0slot" | "zero-slot" => Ok(RelayProvider::ZeroSlot),
            "temporal" | "nozomi" => Ok(RelayProvider::Temporal),
            other => Err(format!("Unknown relay provider '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Region {
    Frankfurt,
    Amsterdam,
    NewYork,
    SaltLakeCity,
    Tokyo,
    London,
    LosAngeles,
    Singapore,
}

impl Region {
    pub const ALL: [Region; 8] = [
        Region::Frankfurt,
        Region::Amsterdam,
        Region::NewYork,
        Region::SaltLakeCity,
        Region::Tokyo,
        Region::London,
        Region::LosAngeles,
        Region::Singapore,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Frankfurt => "Frankfurt",
            Region::Amsterdam => "Amsterdam",
            Region::NewYork => "NewYork",
            Region::SaltLakeCity => "SaltLakeCity",
            Region::Tokyo => "Tokyo",
            Region::London => "London",
            Region::LosAngeles => "LosAngeles",
            Region::Singapore => "Singapore",
        }
    }

    /// Case-insensitive match against region names
    pub fn parse(value: &str) -> Option<Region> {
        let value = value.trim();
        Region::ALL
            .iter()
            .copied()
            .find(|region| region.as_str().eq_ignore_ascii_case(value))
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything needed to tip and reach one provider
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderTable {
    pub tip_addresses: Vec<Pubkey>,
    pub endpoints: Vec<(Region, String)>,
    pub min_tip_lamports: u64,
    pub auth_token: Option<String>,
}

impl ProviderTable {
    pub fn endpoint(&self, region: Region) -> Option<&str> {
        self.endpoints
            .iter()
            .find(|(r, _)| *r == region)
            .map(|(_, url)| url.as_str())
    }
}

fn parse_addresses(provider: RelayProvider, addresses: &[&str]) -> Vec<Pubkey> {
    addresses
        .iter()
        .filter_map(|address| match Pubkey::from_str(address) {
            Ok(key) => Some(key),
            Err(e) => {
                logger::warning(
                    LogTag::Relay,
                    &format!("Skipping invalid {} tip address {}: {}", provider, address, e),
                );
                None
            }
        })
        .collect()
}

fn builtin_table(
    provider: RelayProvider,
    addresses: &[&str],
    endpoints: &[(Region, &str)],
    min_tip_sol: f64,
) -> ProviderTable {
    ProviderTable {
        tip_addresses: parse_addresses(provider, addresses),
        endpoints: endpoints
            .iter()
            .map(|(region, url)| (*region, url.to_string()))
            .collect(),
        min_tip_lamports: sol_to_lamports(min_tip_sol),
        auth_token: None,
    }
}

/// Provider tables keyed by provider
#[derive(Debug, Clone, Default)]
pub struct RelayTables {
    tables: HashMap<RelayProvider, ProviderTable>,
}

impl RelayTables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in addresses, endpoints and minimum tips
    pub fn builtin() -> Self {
        let mut tables = Self::new();
        tables.insert(
            RelayProvider::Jito,
            builtin_table(RelayProvider::Jito, JITO_TIP_ADDRESSES, JITO_ENDPOINTS, JITO_MIN_TIP_SOL),
        );
        tables.insert(
            RelayProvider::NextBlock,
            builtin_table(
                RelayProvider::NextBlock,
                NEXTBLOCK_TIP_ADDRESSES,
                NEXTBLOCK_ENDPOINTS,
                NEXTBLOCK_MIN_TIP_SOL,
            ),
        );
        tables.insert(
            RelayProvider::ZeroSlot,
            builtin_table(
                RelayProvider::ZeroSlot,
                ZEROSLOT_TIP_ADDRESSES,
                ZEROSLOT_ENDPOINTS,
                ZEROSLOT_MIN_TIP_SOL,
            ),
        );
        tables.insert(
            RelayProvider::Temporal,
            builtin_table(
                RelayProvider::Temporal,
                TEMPORAL_TIP_ADDRESSES,
                TEMPORAL_ENDPOINTS,
                TEMPORAL_MIN_TIP_SOL,
            ),
        );
        tables
    }

    /// Built-in tables with `[relay]` overrides applied
    pub fn from_config(config: &RelayConfig) -> Self {
        let mut tables = Self::builtin();

        for (name, addresses) in &config.tip_addresses {
            let Ok(provider) = name.parse::<RelayProvider>() else {
                logger::warning(LogTag::Config, &format!("Unknown relay provider '{}' in tip_addresses", name));
                continue;
            };
            let refs: Vec<&str> = addresses.iter().map(String::as_str).collect();
            tables.entry(provider).tip_addresses = parse_addresses(provider, &refs);
        }

        for (name, endpoints) in &config.endpoints {
            let Ok(provider) = name.parse::<RelayProvider>() else {
                logger::warning(LogTag::Config, &format!("Unknown relay provider '{}' in endpoints", name));
                continue;
            };
            let mut parsed: Vec<(Region, String)> = endpoints
                .iter()
                .filter_map(|(region, url)| match Region::parse(region) {
                    Some(region) => Some((region, url.clone())),
                    None => {
                        logger::warning(
                            LogTag::Config,
                            &format!("Unknown region '{}' for {}", region, provider),
                        );
                        None
                    }
                })
                .collect();
            parsed.sort();
            tables.entry(provider).endpoints = parsed;
        }

        for (name, token) in &config.auth_tokens {
            if let Ok(provider) = name.parse::<RelayProvider>() {
                tables.entry(provider).auth_token = Some(token.clone());
            }
        }

        tables
    }

    pub fn insert(&mut self, provider: RelayProvider, table: ProviderTable) {
        self.tables.insert(provider, table);
    }

    fn entry(&mut self, provider: RelayProvider) -> &mut ProviderTable {
        self.tables.entry(provider).or_default()
    }

    pub fn get(&self, provider: RelayProvider) -> Option<&ProviderTable> {
        self.tables.get(&provider)
    }
}
