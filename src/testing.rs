//! Test doubles for the ledger transport and listing fetcher

use crate::errors::TransportError;
use crate::listings::{ListingFetcher, ListingSnapshot, PairKey, PoolRecord};
use crate::rpc::{parse_mint_decimals, LedgerTransport, MemcmpFilter};
use crate::venues::Venue;
use async_trait::async_trait;
use parking_lot::Mutex;
use solana_sdk::pubkey::Pubkey;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

pub fn record(
    address: &str,
    mint_a: &str,
    mint_b: &str,
    reserve_a: f64,
    reserve_b: f64,
    liquidity: f64,
) -> PoolRecord {
    PoolRecord {
        pool_address: address.to_string(),
        mint_a: mint_a.to_string(),
        mint_b: mint_b.to_string(),
        reserve_a,
        reserve_b,
        liquidity,
    }
}

/// SPL token account bytes holding `amount` of `mint`
pub fn token_account(mint: &Pubkey, amount: u64) -> Vec<u8> {
    let mut data = vec![0u8; 165];
    data[..32].copy_from_slice(mint.as_ref());
    data[64..72].copy_from_slice(&amount.to_le_bytes());
    data
}

/// SPL mint account bytes with `decimals`
pub fn mint_account(decimals: u8) -> Vec<u8> {
    let mut data = vec![0u8; 82];
    data[44] = decimals;
    data[45] = 1;
    data
}

/// In-memory ledger
pub struct MockTransport {
    accounts: Mutex<BTreeMap<Pubkey, (Pubkey, Vec<u8>)>>,
    timestamp: Mutex<u64>,
    failure: Mutex<Option<TransportError>>,
    scans: AtomicUsize,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            accounts: Mutex::new(BTreeMap::new()),
            timestamp: Mutex::new(0),
            failure: Mutex::new(None),
            scans: AtomicUsize::new(0),
        }
    }

    pub fn insert_account(&self, address: Pubkey, owner: Pubkey, data: Vec<u8>) {
        self.accounts.lock().insert(address, (owner, data));
    }

    pub fn set_timestamp(&self, timestamp: u64) {
        *self.timestamp.lock() = timestamp;
    }

    /// Every call fails with `error` from now on
    pub fn fail_with(&self, error: TransportError) {
        *self.failure.lock() = Some(error);
    }

    pub fn scan_calls(&self) -> usize {
        self.scans.load(Ordering::SeqCst)
    }

    fn check_failure(&self) -> Result<(), TransportError> {
        match self.failure.lock().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn account(&self, address: &Pubkey) -> Result<(Pubkey, Vec<u8>), TransportError> {
        self.check_failure()?;
        self.accounts
            .lock()
            .get(address)
            .cloned()
            .ok_or(TransportError::AccountNotFound(*address))
    }
}

#[async_trait]
impl LedgerTransport for MockTransport {
    async fn fetch_account_state(&self, address: &Pubkey) -> Result<Vec<u8>, TransportError> {
        self.account(address).map(|(_, data)| data)
    }

    async fn fetch_account_owner(&self, address: &Pubkey) -> Result<Pubkey, TransportError> {
        self.account(address).map(|(owner, _)| owner)
    }

    async fn fetch_unix_timestamp(&self) -> Result<u64, TransportError> {
        self.check_failure()?;
        Ok(*self.timestamp.lock())
    }

    async fn fetch_mint_decimals(&self, mint: &Pubkey) -> Result<u8, TransportError> {
        let (owner, data) = self.account(mint)?;
        parse_mint_decimals(mint, &owner, &data)
    }

    async fn scan_program_accounts(
        &self,
        program_id: &Pubkey,
        filters: &[MemcmpFilter],
    ) -> Result<Vec<(Pubkey, Vec<u8>)>, TransportError> {
        self.check_failure()?;
        self.scans.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .accounts
            .lock()
            .iter()
            .filter(|(_, (owner, data))| {
                owner == program_id && filters.iter().all(|f| f.matches(data))
            })
            .map(|(address, (_, data))| (*address, data.clone()))
            .collect())
    }
}

/// Listing fetcher with a fixed response and a call counter
pub struct MockFetcher {
    response: Mutex<Result<ListingSnapshot, String>>,
    calls: AtomicUsize,
}

impl MockFetcher {
    pub fn returning(snapshot: ListingSnapshot) -> Self {
        Self {
            response: Mutex::new(Ok(snapshot)),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            response: Mutex::new(Err(reason.to_string())),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ListingFetcher for MockFetcher {
    async fn fetch_pair(&self, _venue: Venue, _pair: &PairKey) -> Result<ListingSnapshot, String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response.lock().clone()
    }
}
