/// On-chain pool discovery used when the listing snapshot has no match
///
/// Strategies run in a fixed order: canonical address derivation, then a
/// registry scan over the venue program's accounts.
use crate::errors::{SwapResult, TransportError};
use crate::logger::{self, LogTag};
use crate::rpc::{LedgerTransport, MemcmpFilter};
use solana_sdk::pubkey::Pubkey;

/// Venue-specific pool account layout knowledge
pub trait PoolLookup: Send + Sync {
    fn program_id(&self) -> Pubkey;

    /// Addresses a pool for the pair would have if created canonically
    fn canonical_addresses(&self, target: &Pubkey, quote: &Pubkey) -> Vec<Pubkey>;

    /// Mint pair recorded in a pool account, `None` if not a pool account
    fn decode_mints(&self, data: &[u8]) -> Option<(Pubkey, Pubkey)>;

    /// Offsets of the two mint slots in a pool account
    fn mint_offsets(&self) -> (usize, usize);

    /// Relative size of a pool, used to rank scan results
    fn liquidity_hint(&self, data: &[u8]) -> u64;
}

fn holds_pair(mints: Option<(Pubkey, Pubkey)>, target: &Pubkey, quote: &Pubkey) -> bool {
    match mints {
        Some((a, b)) => (a == *target && b == *quote) || (a == *quote && b == *target),
        None => false,
    }
}

/// First canonical address that exists on chain and holds the pair
pub async fn find_canonical_pool<L: PoolLookup + ?Sized>(
    lookup: &L,
    transport: &dyn LedgerTransport,
    target: &Pubkey,
    quote: &Pubkey,
) -> SwapResult<Option<Pubkey>> {
    for address in lookup.canonical_addresses(target, quote) {
        let data = match transport.fetch_account_state(&address).await {
            Ok(data) => data,
            Err(TransportError::AccountNotFound(_)) => continue,
            Err(e) => return Err(e.into()),
        };

        if holds_pair(lookup.decode_mints(&data), target, quote) {
            return Ok(Some(address));
        }

        logger::debug(
            LogTag::Pool,
            &format!("Canonical address {} does not hold the pair", address),
        );
    }
    Ok(None)
}

/// Largest pool for the pair among the program's accounts, both mint orders
pub async fn scan_registry<L: PoolLookup + ?Sized>(
    lookup: &L,
    transport: &dyn LedgerTransport,
    target: &Pubkey,
    quote: &Pubkey,
) -> SwapResult<Option<Pubkey>> {
    let program_id = lookup.program_id();
    let (first_slot, second_slot) = lookup.mint_offsets();

    let mut best: Option<(Pubkey, u64)> = None;
    for (first, second) in [(target, quote), (quote, target)] {
        let filters = [
            MemcmpFilter::pubkey(first_slot, first),
            MemcmpFilter::pubkey(second_slot, second),
        ];
        let mut accounts = transport.scan_program_accounts(&program_id, &filters).await?;
        // RPC order is unspecified
        accounts.sort_by(|a, b| a.0.cmp(&b.0));

        for (address, data) in accounts {
            if !holds_pair(lookup.decode_mints(&data), target, quote) {
                continue;
            }
            let hint = lookup.liquidity_hint(&data);
            if best.map_or(true, |(_, current)| hint > current) {
                best = Some((address, hint));
            }
        }
    }

    Ok(best.map(|(address, _)| address))
}
