//! Relay routing
//!
//! Picks the submission path for a compiled swap from the requested tip:
//! no tip goes through the standard RPC, an explicit provider is honoured,
//! otherwise the high-tip threshold decides between the high- and low-tip
//! providers. Region and tip address come from the provider tables.

mod backends;
mod providers;

pub use backends::{
    backend_for, build_relay_request, parse_relay_response, JsonRpcRelaySubmitter, RelayRequest,
    RpcSubmitter, SubmissionBackend, SubmitOptions,
};
pub use providers::{ProviderTable, RelayProvider, RelayTables, Region};

use crate::config::RelayConfig;
use crate::constants::{
    DEFAULT_HIGH_TIP_PROVIDER, DEFAULT_HIGH_TIP_THRESHOLD_SOL, DEFAULT_LOW_TIP_PROVIDER,
};
use crate::errors::SwapError;
use crate::logger::{self, LogTag};
use crate::swaps::amounts::sol_to_lamports;
use crate::swaps::compiler::TransactionSkeleton;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;

/// Caller-side relay options carried by a swap request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayPreferences {
    pub tip_sol: f64,
    pub provider: Option<RelayProvider>,
    pub region: Option<String>,
    pub anti_mev: bool,
    pub skip_preflight: bool,
}

impl Default for RelayPreferences {
    fn default() -> Self {
        Self {
            tip_sol: 0.0,
            provider: None,
            region: None,
            anti_mev: false,
            skip_preflight: true,
        }
    }
}

impl RelayPreferences {
    /// Preferences from the `[relay]` config section
    pub fn from_config(config: &RelayConfig) -> Self {
        let provider = config.provider.as_deref().and_then(|name| match name.parse() {
            Ok(provider) => Some(provider),
            Err(e) => {
                logger::warning(LogTag::Config, &format!("Ignoring relay.provider: {}", e));
                None
            }
        });
        Self {
            tip_sol: config.tip_sol,
            provider,
            region: config.region.clone(),
            anti_mev: config.anti_mev,
            skip_preflight: config.skip_preflight,
        }
    }
}

/// Outcome of relay selection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelaySelection {
    pub provider: RelayProvider,
    pub region: Option<Region>,
    pub endpoint: Option<String>,
    #[serde(serialize_with = "serialize_optional_pubkey")]
    pub tip_address: Option<Pubkey>,
    pub tip_lamports: u64,
    pub anti_mev: bool,
    pub skip_preflight: bool,
}

fn serialize_optional_pubkey<S: serde::Serializer>(
    key: &Option<Pubkey>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match key {
        Some(key) => serializer.serialize_some(&key.to_string()),
        None => serializer.serialize_none(),
    }
}

impl RelaySelection {
    pub fn standard(prefs: &RelayPreferences) -> Self {
        Self {
            provider: RelayProvider::Standard,
            region: None,
            endpoint: None,
            tip_address: None,
            tip_lamports: 0,
            anti_mev: prefs.anti_mev,
            skip_preflight: prefs.skip_preflight,
        }
    }

    pub fn is_standard(&self) -> bool {
        self.provider == RelayProvider::Standard
    }
}

#[derive(Debug, Clone)]
pub struct RelayRouter {
    tables: RelayTables,
    high_tip_threshold_sol: f64,
    high_tip_provider: RelayProvider,
    low_tip_provider: RelayProvider,
}

impl Default for RelayRouter {
    fn default() -> Self {
        Self::new(RelayTables::builtin())
    }
}

impl RelayRouter {
    pub fn new(tables: RelayTables) -> Self {
        Self {
            tables,
            high_tip_threshold_sol: DEFAULT_HIGH_TIP_THRESHOLD_SOL,
            high_tip_provider: DEFAULT_HIGH_TIP_PROVIDER,
            low_tip_provider: DEFAULT_LOW_TIP_PROVIDER,
        }
    }

    pub fn from_config(config: &RelayConfig) -> Self {
        let parse_or = |name: &str, fallback: RelayProvider| {
            name.parse::<RelayProvider>().unwrap_or_else(|e| {
                logger::warning(LogTag::Config, &format!("{}; using {}", e, fallback));
                fallback
            })
        };
        Self::new(RelayTables::from_config(config)).with_threshold(
            config.high_tip_threshold_sol,
            parse_or(&config.high_tip_provider, DEFAULT_HIGH_TIP_PROVIDER),
            parse_or(&config.low_tip_provider, DEFAULT_LOW_TIP_PROVIDER),
        )
    }

    pub fn with_threshold(
        mut self,
        threshold_sol: f64,
        high_tip_provider: RelayProvider,
        low_tip_provider: RelayProvider,
    ) -> Self {
        self.high_tip_threshold_sol = threshold_sol;
        self.high_tip_provider = high_tip_provider;
        self.low_tip_provider = low_tip_provider;
        self
    }

    pub fn tables(&self) -> &RelayTables {
        &self.tables
    }

    /// Provider chosen for a tip when the caller names none
    pub fn provider_for_tip(&self, tip_sol: f64) -> RelayProvider {
        if !tip_sol.is_finite() || tip_sol <= 0.0 {
            RelayProvider::Standard
        } else if tip_sol >= self.high_tip_threshold_sol {
            self.high_tip_provider
        } else {
            self.low_tip_provider
        }
    }

    pub fn select<R: Rng + ?Sized>(&self, prefs: &RelayPreferences, rng: &mut R) -> RelaySelection {
        if !prefs.tip_sol.is_finite() || prefs.tip_sol <= 0.0 {
            return RelaySelection::standard(prefs);
        }

        let provider = prefs
            .provider
            .unwrap_or_else(|| self.provider_for_tip(prefs.tip_sol));
        if provider == RelayProvider::Standard {
            return RelaySelection::standard(prefs);
        }

        let table = match self.tables.get(provider) {
            Some(table) if !table.tip_addresses.is_empty() && !table.endpoints.is_empty() => table,
            _ => {
                logger::warning(
                    LogTag::Relay,
                    &format!(
                        "{}; falling back to standard submission",
                        SwapError::RelayConfigurationMissing(provider)
                    ),
                );
                return RelaySelection::standard(prefs);
            }
        };

        let requested = prefs
            .region
            .as_deref()
            .and_then(|wanted| {
                table
                    .endpoints
                    .iter()
                    .find(|(region, _)| region.as_str().eq_ignore_ascii_case(wanted.trim()))
            });
        if requested.is_none() {
            if let Some(wanted) = prefs.region.as_deref() {
                logger::debug(
                    LogTag::Relay,
                    &format!("Region '{}' not served by {}, picking at random", wanted, provider),
                );
            }
        }
        let endpoint = requested.or_else(|| table.endpoints.choose(rng));

        let tip_address = table.tip_addresses.choose(rng).copied();
        let tip_lamports = sol_to_lamports(prefs.tip_sol).max(table.min_tip_lamports);

        let selection = RelaySelection {
            provider,
            region: endpoint.map(|(region, _)| *region),
            endpoint: endpoint.map(|(_, url)| url.clone()),
            tip_address,
            tip_lamports,
            anti_mev: prefs.anti_mev,
            skip_preflight: prefs.skip_preflight,
        };

        logger::info(
            LogTag::Relay,
            &format!(
                "Routing via {} ({}) with tip {} lamports",
                selection.provider,
                selection.region.map(|r| r.as_str()).unwrap_or("any"),
                selection.tip_lamports
            ),
        );
        selection
    }

    /// Insert the selected tip into the skeleton; standard selections are a no-op
    pub fn attach_tip(&self, skeleton: &mut TransactionSkeleton, selection: &RelaySelection) {
        if let Some(tip_address) = selection.tip_address {
            if selection.tip_lamports > 0 {
                skeleton.insert_tip(&tip_address, selection.tip_lamports);
            }
        }
    }
}
