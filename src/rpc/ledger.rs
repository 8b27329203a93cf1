/// RPC-backed ledger transport
use super::{LedgerTransport, MemcmpFilter};
use crate::errors::TransportError;
use crate::logger::{self, LogTag};
use async_trait::async_trait;
use parking_lot::RwLock;
use solana_account_decoder::UiAccountEncoding;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_config::{RpcAccountInfoConfig, RpcProgramAccountsConfig};
use solana_client::rpc_filter::{Memcmp, RpcFilterType};
use solana_sdk::clock::Clock;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::sysvar;
use std::collections::HashMap;
use std::sync::Arc;

/// SPL mint layout: decimals byte follows mint_authority (36) and supply (8)
const MINT_DECIMALS_OFFSET: usize = 44;
const MINT_ACCOUNT_LEN: usize = 82;

pub struct RpcLedgerTransport {
    client: Arc<RpcClient>,
    commitment: CommitmentConfig,
    decimals_cache: RwLock<HashMap<Pubkey, u8>>,
}

impl RpcLedgerTransport {
    pub fn new(url: &str, commitment: &str) -> Self {
        let commitment = parse_commitment(commitment);
        Self {
            client: Arc::new(RpcClient::new_with_commitment(url.to_string(), commitment)),
            commitment,
            decimals_cache: RwLock::new(HashMap::new()),
        }
    }

    /// Shared client handle for submission backends
    pub fn client(&self) -> Arc<RpcClient> {
        self.client.clone()
    }
}

fn parse_commitment(value: &str) -> CommitmentConfig {
    match value.to_ascii_lowercase().as_str() {
        "processed" => CommitmentConfig::processed(),
        "finalized" => CommitmentConfig::finalized(),
        _ => CommitmentConfig::confirmed(),
    }
}

/// Decimals of an SPL Token / Token-2022 mint account
pub fn parse_mint_decimals(
    mint: &Pubkey,
    owner: &Pubkey,
    data: &[u8],
) -> Result<u8, TransportError> {
    if *owner != spl_token::id() && *owner != spl_token_2022::id() {
        return Err(TransportError::InvalidAccountData {
            address: *mint,
            reason: format!("owner {} is not a token program", owner),
        });
    }
    if data.len() < MINT_ACCOUNT_LEN {
        return Err(TransportError::InvalidAccountData {
            address: *mint,
            reason: format!("mint account too short ({} bytes)", data.len()),
        });
    }
    Ok(data[MINT_DECIMALS_OFFSET])
}

#[async_trait]
impl LedgerTransport for RpcLedgerTransport {
    async fn fetch_account_state(&self, address: &Pubkey) -> Result<Vec<u8>, TransportError> {
        let response = self
            .client
            .get_account_with_commitment(address, self.commitment)
            .await
            .map_err(|e| TransportError::Rpc(e.to_string()))?;

        response
            .value
            .map(|account| account.data)
            .ok_or(TransportError::AccountNotFound(*address))
    }

    async fn fetch_account_owner(&self, address: &Pubkey) -> Result<Pubkey, TransportError> {
        let response = self
            .client
            .get_account_with_commitment(address, self.commitment)
            .await
            .map_err(|e| TransportError::Rpc(e.to_string()))?;

        response
            .value
            .map(|account| account.owner)
            .ok_or(TransportError::AccountNotFound(*address))
    }

    async fn fetch_unix_timestamp(&self) -> Result<u64, TransportError> {
        let clock_id = sysvar::clock::id();
        let data = self.fetch_account_state(&clock_id).await?;
        let clock: Clock =
            bincode::deserialize(&data).map_err(|e| TransportError::InvalidAccountData {
                address: clock_id,
                reason: e.to_string(),
            })?;
        Ok(clock.unix_timestamp.max(0) as u64)
    }

    async fn fetch_mint_decimals(&self, mint: &Pubkey) -> Result<u8, TransportError> {
        if let Some(decimals) = self.decimals_cache.read().get(mint).copied() {
            return Ok(decimals);
        }

        let response = self
            .client
            .get_account_with_commitment(mint, self.commitment)
            .await
            .map_err(|e| TransportError::Rpc(e.to_string()))?;
        let account = response
            .value
            .ok_or(TransportError::AccountNotFound(*mint))?;

        let decimals = parse_mint_decimals(mint, &account.owner, &account.data)?;
        self.decimals_cache.write().insert(*mint, decimals);

        logger::debug(
            LogTag::Rpc,
            &format!("Fetched decimals for {}: {}", mint, decimals),
        );
        Ok(decimals)
    }

    async fn scan_program_accounts(
        &self,
        program_id: &Pubkey,
        filters: &[MemcmpFilter],
    ) -> Result<Vec<(Pubkey, Vec<u8>)>, TransportError> {
        let config = RpcProgramAccountsConfig {
            filters: Some(
                filters
                    .iter()
                    .map(|f| RpcFilterType::Memcmp(Memcmp::new_raw_bytes(f.offset, f.bytes.clone())))
                    .collect(),
            ),
            account_config: RpcAccountInfoConfig {
                encoding: Some(UiAccountEncoding::Base64),
                commitment: Some(self.commitment),
                ..Default::default()
            },
            ..Default::default()
        };

        logger::debug(
            LogTag::Rpc,
            &format!(
                "getProgramAccounts {} with {} filter(s)",
                program_id,
                filters.len()
            ),
        );

        let accounts = self
            .client
            .get_program_accounts_with_config(program_id, config)
            .await
            .map_err(|e| TransportError::Rpc(e.to_string()))?;

        Ok(accounts
            .into_iter()
            .map(|(address, account)| (address, account.data))
            .collect())
    }
}
