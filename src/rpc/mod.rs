//! Ledger transport
//!
//! Everything the resolver and venue adapters need from the chain goes
//! through `LedgerTransport`, so tests can run against an in-memory ledger.

mod ledger;

pub use ledger::{parse_mint_decimals, RpcLedgerTransport};

use crate::errors::TransportError;
use async_trait::async_trait;
use solana_sdk::pubkey::Pubkey;

/// Byte comparison filter for program account scans
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemcmpFilter {
    pub offset: usize,
    pub bytes: Vec<u8>,
}

impl MemcmpFilter {
    pub fn pubkey(offset: usize, key: &Pubkey) -> Self {
        Self {
            offset,
            bytes: key.to_bytes().to_vec(),
        }
    }

    pub fn matches(&self, data: &[u8]) -> bool {
        data.get(self.offset..self.offset + self.bytes.len())
            .map(|slice| slice == self.bytes.as_slice())
            .unwrap_or(false)
    }
}

#[async_trait]
pub trait LedgerTransport: Send + Sync {
    /// Raw account data; missing accounts are `TransportError::AccountNotFound`
    async fn fetch_account_state(&self, address: &Pubkey) -> Result<Vec<u8>, TransportError>;

    /// Owning program of an account
    async fn fetch_account_owner(&self, address: &Pubkey) -> Result<Pubkey, TransportError>;

    /// Cluster unix timestamp from the clock sysvar
    async fn fetch_unix_timestamp(&self) -> Result<u64, TransportError>;

    async fn fetch_mint_decimals(&self, mint: &Pubkey) -> Result<u8, TransportError>;

    /// Accounts owned by `program_id` matching every filter
    async fn scan_program_accounts(
        &self,
        program_id: &Pubkey,
        filters: &[MemcmpFilter],
    ) -> Result<Vec<(Pubkey, Vec<u8>)>, TransportError>;
}
