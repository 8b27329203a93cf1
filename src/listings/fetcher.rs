/// Network source of venue listings
use super::conversion::{parse_pumpswap_listing, parse_raydium_listing};
use super::types::{ListingSnapshot, PairKey};
use crate::constants::LISTING_HTTP_TIMEOUT_SECS;
use crate::logger::{self, LogTag};
use crate::venues::Venue;
use async_trait::async_trait;
use std::time::Duration;

#[async_trait]
pub trait ListingFetcher: Send + Sync {
    /// Fetch every pool the venue reports for the pair. No retries.
    async fn fetch_pair(&self, venue: Venue, pair: &PairKey) -> Result<ListingSnapshot, String>;
}

/// Fetches listings from the venues' public REST APIs
pub struct HttpListingFetcher {
    client: reqwest::Client,
    raydium_api_base: String,
    pumpswap_api_base: String,
}

impl HttpListingFetcher {
    pub fn new(raydium_api_base: &str, pumpswap_api_base: &str) -> Self {
        // Connect timeout only; the request deadline belongs to the caller
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(LISTING_HTTP_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            raydium_api_base: raydium_api_base.trim_end_matches('/').to_string(),
            pumpswap_api_base: pumpswap_api_base.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config() -> Self {
        let venues = crate::config::with_config(|cfg| cfg.venues.clone());
        Self::new(&venues.raydium_api_base, &venues.pumpswap_api_base)
    }

    fn listing_url(&self, venue: Venue, pair: &PairKey) -> String {
        let (a, b) = pair.members();
        match venue {
            Venue::RaydiumCpmm => format!(
                "{}/pools/info/mint?mint1={}&mint2={}&poolType=standard&poolSortField=liquidity&sortType=desc&pageSize=100&page=1",
                self.raydium_api_base, a, b
            ),
            Venue::PumpSwap => format!(
                "{}/pools/pair?mintA={}&mintB={}",
                self.pumpswap_api_base, a, b
            ),
        }
    }

    async fn get_text(&self, url: &str) -> Result<String, String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| format!("Request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("HTTP {}", status));
        }

        response
            .text()
            .await
            .map_err(|e| format!("Failed to read body: {}", e))
    }
}

#[async_trait]
impl ListingFetcher for HttpListingFetcher {
    async fn fetch_pair(&self, venue: Venue, pair: &PairKey) -> Result<ListingSnapshot, String> {
        let url = self.listing_url(venue, pair);
        logger::debug(LogTag::Cache, &format!("Fetching {} listings: {}", venue, url));

        let body = self.get_text(&url).await?;
        match venue {
            Venue::RaydiumCpmm => parse_raydium_listing(&body),
            Venue::PumpSwap => parse_pumpswap_listing(&body),
        }
    }
}
