/// PumpSwap (pump.fun AMM) adapter
///
/// Pools pair a base token with WSOL as quote. Buys fix the base amount out
/// and cap the quote spent; sells fix the base amount in and floor the quote
/// received.
use super::accounts::{
    associated_account, create_ata_idempotent, mul_div_ceil, mul_div_floor, read_pubkey,
    read_token_amount, read_u64, unwrap_sol, wrap_sol,
};
use super::{Venue, VenueAdapter};
use crate::constants::{
    PUMPSWAP_CREATOR_VAULT_SEED, PUMPSWAP_EVENT_AUTHORITY_SEED, PUMPSWAP_GLOBAL_CONFIG_SEED,
    PUMPSWAP_GLOBAL_VOLUME_SEED, PUMPSWAP_POOL_SEED, PUMPSWAP_PROGRAM, PUMPSWAP_USER_VOLUME_SEED,
    PUMP_POOL_AUTHORITY_SEED, PUMP_PROGRAM, SOL_DECIMALS, WSOL_MINT,
};
use crate::errors::{SwapError, SwapResult, TransportError};
use crate::logger::{self, LogTag};
use crate::pools::lookup::PoolLookup;
use crate::pools::ResolvedPool;
use crate::rpc::LedgerTransport;
use crate::swaps::amounts::{clamp_slippage, slippage_to_percent, to_base_units};
use crate::swaps::types::{QuoteBound, SwapDirection, SwapQuote};
use async_trait::async_trait;
use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_sdk::pubkey::Pubkey;
use std::sync::Arc;

pub const BUY_DISCRIMINATOR: [u8; 8] = [102, 6, 61, 18, 1, 218, 235, 234];
pub const SELL_DISCRIMINATOR: [u8; 8] = [51, 230, 133, 164, 1, 127, 131, 173];

// Pool layout
pub const BASE_MINT_OFFSET: usize = 43;
pub const QUOTE_MINT_OFFSET: usize = 75;
const POOL_BASE_ACCOUNT_OFFSET: usize = 139;
const POOL_QUOTE_ACCOUNT_OFFSET: usize = 171;
const LP_SUPPLY_OFFSET: usize = 203;
const COIN_CREATOR_OFFSET: usize = 211;
/// Pools created before creator fees end at lp_supply
pub const POOL_MIN_LEN: usize = 211;

// GlobalConfig layout
const LP_FEE_BPS_OFFSET: usize = 40;
const PROTOCOL_FEE_BPS_OFFSET: usize = 48;
const PROTOCOL_FEE_RECIPIENTS_OFFSET: usize = 57;
const PROTOCOL_FEE_RECIPIENT_COUNT: usize = 8;
const COIN_CREATOR_FEE_BPS_OFFSET: usize = 313;

const BPS_DENOMINATOR: u64 = 10_000;

#[derive(Debug, Clone, PartialEq)]
pub struct PumpPoolState {
    pub base_mint: Pubkey,
    pub quote_mint: Pubkey,
    pub pool_base_account: Pubkey,
    pub pool_quote_account: Pubkey,
    pub lp_supply: u64,
    pub coin_creator: Pubkey,
}

impl PumpPoolState {
    pub fn decode(address: &Pubkey, data: &[u8]) -> Result<Self, TransportError> {
        if data.len() < POOL_MIN_LEN {
            return Err(TransportError::InvalidAccountData {
                address: *address,
                reason: format!("PumpSwap pool too short ({} bytes)", data.len()),
            });
        }

        Ok(Self {
            base_mint: read_pubkey(address, data, BASE_MINT_OFFSET)?,
            quote_mint: read_pubkey(address, data, QUOTE_MINT_OFFSET)?,
            pool_base_account: read_pubkey(address, data, POOL_BASE_ACCOUNT_OFFSET)?,
            pool_quote_account: read_pubkey(address, data, POOL_QUOTE_ACCOUNT_OFFSET)?,
            lp_supply: read_u64(address, data, LP_SUPPLY_OFFSET)?,
            coin_creator: read_pubkey(address, data, COIN_CREATOR_OFFSET).unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PumpGlobalConfig {
    pub lp_fee_bps: u64,
    pub protocol_fee_bps: u64,
    pub coin_creator_fee_bps: u64,
    pub protocol_fee_recipients: Vec<Pubkey>,
}

impl PumpGlobalConfig {
    pub fn decode(address: &Pubkey, data: &[u8]) -> Result<Self, TransportError> {
        let protocol_fee_recipients = (0..PROTOCOL_FEE_RECIPIENT_COUNT)
            .map(|i| read_pubkey(address, data, PROTOCOL_FEE_RECIPIENTS_OFFSET + i * 32))
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .filter(|key| *key != Pubkey::default())
            .collect();

        Ok(Self {
            lp_fee_bps: read_u64(address, data, LP_FEE_BPS_OFFSET)?,
            protocol_fee_bps: read_u64(address, data, PROTOCOL_FEE_BPS_OFFSET)?,
            coin_creator_fee_bps: read_u64(address, data, COIN_CREATOR_FEE_BPS_OFFSET).unwrap_or(0),
            protocol_fee_recipients,
        })
    }

    /// Fee basis points charged on a pool; creator fees apply only with a creator
    pub fn fee_bps(&self, pool: &PumpPoolState) -> (u64, u64, u64) {
        let creator = if pool.coin_creator == Pubkey::default() {
            0
        } else {
            self.coin_creator_fee_bps
        };
        (self.lp_fee_bps, self.protocol_fee_bps, creator)
    }
}

fn find_pda(seeds: &[&[u8]], program: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(seeds, program).0
}

pub fn global_config_address() -> Pubkey {
    find_pda(&[PUMPSWAP_GLOBAL_CONFIG_SEED], &PUMPSWAP_PROGRAM)
}

pub fn event_authority() -> Pubkey {
    find_pda(&[PUMPSWAP_EVENT_AUTHORITY_SEED], &PUMPSWAP_PROGRAM)
}

pub fn coin_creator_vault_authority(coin_creator: &Pubkey) -> Pubkey {
    find_pda(&[PUMPSWAP_CREATOR_VAULT_SEED, coin_creator.as_ref()], &PUMPSWAP_PROGRAM)
}

pub fn global_volume_accumulator() -> Pubkey {
    find_pda(&[PUMPSWAP_GLOBAL_VOLUME_SEED], &PUMPSWAP_PROGRAM)
}

pub fn user_volume_accumulator(user: &Pubkey) -> Pubkey {
    find_pda(&[PUMPSWAP_USER_VOLUME_SEED, user.as_ref()], &PUMPSWAP_PROGRAM)
}

/// Address of the pool a bonding curve migrates into
pub fn canonical_pool_address(base_mint: &Pubkey, quote_mint: &Pubkey) -> Pubkey {
    let creator = find_pda(&[PUMP_POOL_AUTHORITY_SEED, base_mint.as_ref()], &PUMP_PROGRAM);
    find_pda(
        &[
            PUMPSWAP_POOL_SEED,
            &0u16.to_le_bytes(),
            creator.as_ref(),
            base_mint.as_ref(),
            quote_mint.as_ref(),
        ],
        &PUMPSWAP_PROGRAM,
    )
}

/// Slippage percentage as hundredths of a percent (basis points)
fn percent_to_bps(percent: f64) -> u64 {
    (percent * 100.0).round().clamp(0.0, BPS_DENOMINATOR as f64) as u64
}

/// Base out for an exact quote input, and the capped quote spend
pub fn quote_buy_exact_quote_in(
    quote_in: u64,
    base_reserve: u64,
    quote_reserve: u64,
    total_fee_bps: u64,
    slippage_percent: f64,
) -> SwapResult<(u64, u64)> {
    if base_reserve == 0 || quote_reserve == 0 {
        return Err(SwapError::QuoteComputationFailed(
            "pool has zero reserves".to_string(),
        ));
    }

    let effective_in = mul_div_floor(quote_in, BPS_DENOMINATOR, BPS_DENOMINATOR + total_fee_bps);
    let base_out = (base_reserve as u128 * effective_in as u128
        / (quote_reserve as u128 + effective_in as u128)) as u64;
    if base_out == 0 {
        return Err(SwapError::QuoteComputationFailed(format!(
            "{} lamports buys zero tokens",
            quote_in
        )));
    }

    let max_quote_in = mul_div_ceil(
        quote_in,
        BPS_DENOMINATOR + percent_to_bps(slippage_percent),
        BPS_DENOMINATOR,
    );
    Ok((base_out, max_quote_in))
}

/// Quote out for an exact base input after fees, and its slippage floor
pub fn quote_sell_exact_base_in(
    base_in: u64,
    base_reserve: u64,
    quote_reserve: u64,
    fees_bps: (u64, u64, u64),
    slippage_percent: f64,
) -> SwapResult<(u64, u64)> {
    if base_reserve == 0 || quote_reserve == 0 {
        return Err(SwapError::QuoteComputationFailed(
            "pool has zero reserves".to_string(),
        ));
    }

    let raw_out = (quote_reserve as u128 * base_in as u128
        / (base_reserve as u128 + base_in as u128)) as u64;
    let (lp, protocol, creator) = fees_bps;
    let fees = mul_div_ceil(raw_out, lp, BPS_DENOMINATOR)
        .saturating_add(mul_div_ceil(raw_out, protocol, BPS_DENOMINATOR))
        .saturating_add(mul_div_ceil(raw_out, creator, BPS_DENOMINATOR));
    let quote_out = raw_out.saturating_sub(fees);
    if quote_out == 0 {
        return Err(SwapError::QuoteComputationFailed(format!(
            "{} tokens sell for zero lamports",
            base_in
        )));
    }

    let min_quote_out = mul_div_floor(
        quote_out,
        BPS_DENOMINATOR - percent_to_bps(slippage_percent),
        BPS_DENOMINATOR,
    );
    Ok((quote_out, min_quote_out))
}

struct PumpMarket {
    state: PumpPoolState,
    config: PumpGlobalConfig,
    base_reserve: u64,
    quote_reserve: u64,
}

pub struct PumpSwapAdapter {
    transport: Arc<dyn LedgerTransport>,
}

impl PumpSwapAdapter {
    pub fn new(transport: Arc<dyn LedgerTransport>) -> Self {
        Self { transport }
    }

    async fn load_state(&self, pool: &ResolvedPool) -> SwapResult<PumpPoolState> {
        let data = self.transport.fetch_account_state(&pool.pool_address).await?;
        let state = PumpPoolState::decode(&pool.pool_address, &data)?;

        if state.quote_mint != WSOL_MINT {
            return Err(SwapError::QuoteComputationFailed(format!(
                "PumpSwap pool {} quotes in {}, expected WSOL",
                pool.pool_address, state.quote_mint
            )));
        }
        if state.base_mint != pool.target_mint {
            return Err(TransportError::InvalidAccountData {
                address: pool.pool_address,
                reason: format!("base mint {} is not {}", state.base_mint, pool.target_mint),
            }
            .into());
        }
        Ok(state)
    }

    async fn load_config(&self) -> SwapResult<PumpGlobalConfig> {
        let address = global_config_address();
        let data = self.transport.fetch_account_state(&address).await?;
        Ok(PumpGlobalConfig::decode(&address, &data)?)
    }

    async fn load_market(&self, pool: &ResolvedPool) -> SwapResult<PumpMarket> {
        let state = self.load_state(pool).await?;
        let (config, base_data, quote_data) = futures::try_join!(
            self.load_config(),
            async {
                Ok::<_, SwapError>(
                    self.transport
                        .fetch_account_state(&state.pool_base_account)
                        .await?,
                )
            },
            async {
                Ok::<_, SwapError>(
                    self.transport
                        .fetch_account_state(&state.pool_quote_account)
                        .await?,
                )
            },
        )?;

        Ok(PumpMarket {
            base_reserve: read_token_amount(&state.pool_base_account, &base_data)?,
            quote_reserve: read_token_amount(&state.pool_quote_account, &quote_data)?,
            state,
            config,
        })
    }

    fn swap_accounts(
        &self,
        owner: &Pubkey,
        pool: &ResolvedPool,
        state: &PumpPoolState,
        config: &PumpGlobalConfig,
        base_program: &Pubkey,
    ) -> SwapResult<Vec<AccountMeta>> {
        let quote_program = spl_token::id();
        let fee_recipient = config.protocol_fee_recipients.first().copied().ok_or_else(|| {
            SwapError::QuoteComputationFailed("PumpSwap config has no fee recipient".to_string())
        })?;
        let creator_vault = coin_creator_vault_authority(&state.coin_creator);

        Ok(vec![
            AccountMeta::new_readonly(pool.pool_address, false),
            AccountMeta::new(*owner, true),
            AccountMeta::new_readonly(global_config_address(), false),
            AccountMeta::new_readonly(state.base_mint, false),
            AccountMeta::new_readonly(state.quote_mint, false),
            AccountMeta::new(associated_account(owner, &state.base_mint, base_program), false),
            AccountMeta::new(associated_account(owner, &state.quote_mint, &quote_program), false),
            AccountMeta::new(state.pool_base_account, false),
            AccountMeta::new(state.pool_quote_account, false),
            AccountMeta::new_readonly(fee_recipient, false),
            AccountMeta::new(
                associated_account(&fee_recipient, &state.quote_mint, &quote_program),
                false,
            ),
            AccountMeta::new_readonly(*base_program, false),
            AccountMeta::new_readonly(quote_program, false),
            AccountMeta::new_readonly(solana_sdk::system_program::id(), false),
            AccountMeta::new_readonly(spl_associated_token_account::id(), false),
            AccountMeta::new_readonly(event_authority(), false),
            AccountMeta::new_readonly(PUMPSWAP_PROGRAM, false),
            AccountMeta::new(
                associated_account(&creator_vault, &state.quote_mint, &quote_program),
                false,
            ),
            AccountMeta::new_readonly(creator_vault, false),
        ])
    }
}

impl PoolLookup for PumpSwapAdapter {
    fn program_id(&self) -> Pubkey {
        PUMPSWAP_PROGRAM
    }

    fn canonical_addresses(&self, target: &Pubkey, quote: &Pubkey) -> Vec<Pubkey> {
        vec![canonical_pool_address(target, quote)]
    }

    fn decode_mints(&self, data: &[u8]) -> Option<(Pubkey, Pubkey)> {
        let state = PumpPoolState::decode(&Pubkey::default(), data).ok()?;
        Some((state.base_mint, state.quote_mint))
    }

    fn mint_offsets(&self) -> (usize, usize) {
        (BASE_MINT_OFFSET, QUOTE_MINT_OFFSET)
    }

    fn liquidity_hint(&self, data: &[u8]) -> u64 {
        read_u64(&Pubkey::default(), data, LP_SUPPLY_OFFSET).unwrap_or(0)
    }
}

#[async_trait]
impl VenueAdapter for PumpSwapAdapter {
    fn venue(&self) -> Venue {
        Venue::PumpSwap
    }

    async fn quote_buy(
        &self,
        pool: &ResolvedPool,
        amount_native_in: f64,
        slippage: f64,
    ) -> SwapResult<SwapQuote> {
        let quote_in = to_base_units(amount_native_in, SOL_DECIMALS)?;
        let market = self.load_market(pool).await?;
        let (lp, protocol, creator) = market.config.fee_bps(&market.state);
        let percent = slippage_to_percent(slippage);

        let (base_out, max_quote_in) = quote_buy_exact_quote_in(
            quote_in,
            market.base_reserve,
            market.quote_reserve,
            lp + protocol + creator,
            percent,
        )?;

        logger::debug(
            LogTag::Venue,
            &format!(
                "PumpSwap buy quote: in={} base_out={} max_in={} slippage={}%",
                quote_in, base_out, max_quote_in, percent
            ),
        );

        Ok(SwapQuote {
            amount_in: quote_in,
            expected_out: base_out,
            bound: QuoteBound::MaximumIn(max_quote_in),
            slippage_applied: clamp_slippage(slippage),
        })
    }

    async fn quote_sell(
        &self,
        pool: &ResolvedPool,
        amount_token_in: f64,
        slippage: f64,
    ) -> SwapResult<SwapQuote> {
        let decimals = self.transport.fetch_mint_decimals(&pool.target_mint).await?;
        let base_in = to_base_units(amount_token_in, decimals)?;
        let market = self.load_market(pool).await?;
        let percent = slippage_to_percent(slippage);

        let (quote_out, min_quote_out) = quote_sell_exact_base_in(
            base_in,
            market.base_reserve,
            market.quote_reserve,
            market.config.fee_bps(&market.state),
            percent,
        )?;

        logger::debug(
            LogTag::Venue,
            &format!(
                "PumpSwap sell quote: in={} quote_out={} min_out={} slippage={}%",
                base_in, quote_out, min_quote_out, percent
            ),
        );

        Ok(SwapQuote {
            amount_in: base_in,
            expected_out: quote_out,
            bound: QuoteBound::MinimumOut(min_quote_out),
            slippage_applied: clamp_slippage(slippage),
        })
    }

    async fn build_swap_instructions(
        &self,
        owner: &Pubkey,
        pool: &ResolvedPool,
        direction: SwapDirection,
        quote: &SwapQuote,
    ) -> SwapResult<Vec<Instruction>> {
        let state = self.load_state(pool).await?;
        let (config, base_program) = futures::try_join!(self.load_config(), async {
            Ok::<_, SwapError>(self.transport.fetch_account_owner(&state.base_mint).await?)
        })?;
        let mut accounts = self.swap_accounts(owner, pool, &state, &config, &base_program)?;

        let mut instructions = Vec::new();
        let mut data = Vec::with_capacity(24);

        match (direction, quote.bound) {
            (SwapDirection::Buy, QuoteBound::MaximumIn(max_quote_in)) => {
                instructions.extend(wrap_sol(owner, max_quote_in)?);
                instructions.push(create_ata_idempotent(owner, &state.base_mint, &base_program));

                accounts.push(AccountMeta::new(global_volume_accumulator(), false));
                accounts.push(AccountMeta::new(user_volume_accumulator(owner), false));

                data.extend_from_slice(&BUY_DISCRIMINATOR);
                data.extend_from_slice(&quote.expected_out.to_le_bytes());
                data.extend_from_slice(&max_quote_in.to_le_bytes());
            }
            (SwapDirection::Sell, QuoteBound::MinimumOut(min_quote_out)) => {
                instructions.push(create_ata_idempotent(owner, &WSOL_MINT, &spl_token::id()));

                data.extend_from_slice(&SELL_DISCRIMINATOR);
                data.extend_from_slice(&quote.amount_in.to_le_bytes());
                data.extend_from_slice(&min_quote_out.to_le_bytes());
            }
            (direction, bound) => {
                return Err(SwapError::invalid(
                    "quote",
                    format!("{:?} bound does not fit a PumpSwap {}", bound, direction),
                ));
            }
        }

        instructions.push(Instruction {
            program_id: PUMPSWAP_PROGRAM,
            accounts,
            data,
        });
        instructions.push(unwrap_sol(owner)?);
        Ok(instructions)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::pools::PoolOrigin;
    use crate::testing::{mint_account, token_account, MockTransport};

    pub(crate) fn encode_pool(state: &PumpPoolState) -> Vec<u8> {
        let mut data = vec![0u8; 243];
        data[BASE_MINT_OFFSET..BASE_MINT_OFFSET + 32].copy_from_slice(state.base_mint.as_ref());
        data[QUOTE_MINT_OFFSET..QUOTE_MINT_OFFSET + 32].copy_from_slice(state.quote_mint.as_ref());
        data[POOL_BASE_ACCOUNT_OFFSET..POOL_BASE_ACCOUNT_OFFSET + 32]
            .copy_from_slice(state.pool_base_account.as_ref());
        data[POOL_QUOTE_ACCOUNT_OFFSET..POOL_QUOTE_ACCOUNT_OFFSET + 32]
            .copy_from_slice(state.pool_quote_account.as_ref());
        data[LP_SUPPLY_OFFSET..LP_SUPPLY_OFFSET + 8].copy_from_slice(&state.lp_supply.to_le_bytes());
        data[COIN_CREATOR_OFFSET..COIN_CREATOR_OFFSET + 32]
            .copy_from_slice(state.coin_creator.as_ref());
        data
    }

    fn encode_config(lp: u64, protocol: u64, creator: u64, recipient: &Pubkey) -> Vec<u8> {
        let mut data = vec![0u8; 321];
        data[LP_FEE_BPS_OFFSET..LP_FEE_BPS_OFFSET + 8].copy_from_slice(&lp.to_le_bytes());
        data[PROTOCOL_FEE_BPS_OFFSET..PROTOCOL_FEE_BPS_OFFSET + 8]
            .copy_from_slice(&protocol.to_le_bytes());
        data[PROTOCOL_FEE_RECIPIENTS_OFFSET..PROTOCOL_FEE_RECIPIENTS_OFFSET + 32]
            .copy_from_slice(recipient.as_ref());
        data[COIN_CREATOR_FEE_BPS_OFFSET..COIN_CREATOR_FEE_BPS_OFFSET + 8]
            .copy_from_slice(&creator.to_le_bytes());
        data
    }

    pub(crate) struct PumpFixture {
        pub transport: Arc<MockTransport>,
        pub pool: ResolvedPool,
        pub state: PumpPoolState,
    }

    /// 1_000_000_000 tokens (6 decimals) against 50 SOL; 20 + 5 + 5 bps fees
    pub(crate) fn pump_fixture(target: Pubkey) -> PumpFixture {
        let transport = Arc::new(MockTransport::new());
        let pool_address = canonical_pool_address(&target, &WSOL_MINT);
        let state = PumpPoolState {
            base_mint: target,
            quote_mint: WSOL_MINT,
            pool_base_account: Pubkey::new_unique(),
            pool_quote_account: Pubkey::new_unique(),
            lp_supply: 5_000,
            coin_creator: Pubkey::new_unique(),
        };

        transport.insert_account(pool_address, PUMPSWAP_PROGRAM, encode_pool(&state));
        transport.insert_account(
            global_config_address(),
            PUMPSWAP_PROGRAM,
            encode_config(20, 5, 5, &Pubkey::new_unique()),
        );
        transport.insert_account(
            state.pool_base_account,
            spl_token::id(),
            token_account(&target, 1_000_000_000_000_000),
        );
        transport.insert_account(
            state.pool_quote_account,
            spl_token::id(),
            token_account(&WSOL_MINT, 50_000_000_000),
        );
        transport.insert_account(target, spl_token::id(), mint_account(6));

        PumpFixture {
            transport,
            pool: ResolvedPool {
                venue: Venue::PumpSwap,
                pool_address,
                target_mint: target,
                quote_mint: WSOL_MINT,
                origin: PoolOrigin::Listing,
            },
            state,
        }
    }

    #[test]
    fn test_buy_math() {
        let (base_out, max_in) =
            quote_buy_exact_quote_in(1_000_000_000, 1_000_000_000_000_000, 50_000_000_000, 30, 1.0)
                .unwrap();
        // effective in = 1e9 * 10000 / 10030 = 997_008_973
        assert_eq!(base_out, 19_550_342_129_434);
        assert_eq!(max_in, 1_010_000_000);
    }

    #[test]
    fn test_max_spend_saturates_instead_of_wrapping() {
        let quote_in = u64::MAX / 2 + 1;
        let (base_out, max_in) =
            quote_buy_exact_quote_in(quote_in, 1_000_000_000_000_000, 50_000_000_000, 30, 100.0)
                .unwrap();
        assert!(base_out > 0);
        assert_eq!(max_in, u64::MAX);
    }

    #[test]
    fn test_sell_math() {
        let (out, min) =
            quote_sell_exact_base_in(1_000_000_000_000, 1_000_000_000_000_000, 50_000_000_000, (20, 5, 5), 0.5)
                .unwrap();
        // raw = 5e10 * 1e12 / (1e15 + 1e12) = 49_950_049
        assert_eq!(out, 49_950_049 - 99_901 - 24_976 - 24_976);
        assert_eq!(min, (out as u128 * 9_950 / 10_000) as u64);
    }

    #[test]
    fn test_zero_reserves_rejected() {
        assert!(matches!(
            quote_buy_exact_quote_in(1, 0, 10, 30, 1.0),
            Err(SwapError::QuoteComputationFailed(_))
        ));
        assert!(matches!(
            quote_sell_exact_base_in(1, 10, 0, (0, 0, 0), 1.0),
            Err(SwapError::QuoteComputationFailed(_))
        ));
    }

    #[test]
    fn test_discriminators_match_anchor_hash() {
        use sha2::{Digest, Sha256};
        assert_eq!(&Sha256::digest(b"global:buy")[..8], &BUY_DISCRIMINATOR);
        assert_eq!(&Sha256::digest(b"global:sell")[..8], &SELL_DISCRIMINATOR);
    }

    #[test]
    fn test_creator_fee_requires_creator() {
        let config = PumpGlobalConfig {
            lp_fee_bps: 20,
            protocol_fee_bps: 5,
            coin_creator_fee_bps: 5,
            protocol_fee_recipients: vec![],
        };
        let mut state = pump_fixture(Pubkey::new_unique()).state;
        assert_eq!(config.fee_bps(&state), (20, 5, 5));
        state.coin_creator = Pubkey::default();
        assert_eq!(config.fee_bps(&state), (20, 5, 0));
    }

    #[tokio::test]
    async fn test_quote_buy_uses_native_decimals() {
        let target = Pubkey::new_unique();
        let fixture = pump_fixture(target);
        let adapter = PumpSwapAdapter::new(fixture.transport.clone());

        let quote = adapter.quote_buy(&fixture.pool, 1.0, 0.01).await.unwrap();
        assert_eq!(quote.amount_in, 1_000_000_000);
        assert_eq!(quote.expected_out, 19_550_342_129_434);
        assert_eq!(quote.bound, QuoteBound::MaximumIn(1_010_000_000));
        assert_eq!(quote.slippage_applied, 0.01);
    }

    #[tokio::test]
    async fn test_quote_sell_uses_mint_decimals() {
        let target = Pubkey::new_unique();
        let fixture = pump_fixture(target);
        let adapter = PumpSwapAdapter::new(fixture.transport.clone());

        let quote = adapter.quote_sell(&fixture.pool, 1_000_000.0, 0.005).await.unwrap();
        assert_eq!(quote.amount_in, 1_000_000_000_000);
        assert!(matches!(quote.bound, QuoteBound::MinimumOut(_)));
    }

    #[tokio::test]
    async fn test_non_wsol_pool_rejected() {
        let target = Pubkey::new_unique();
        let mut fixture = pump_fixture(target);
        fixture.state.quote_mint = Pubkey::new_unique();
        fixture.transport.insert_account(
            fixture.pool.pool_address,
            PUMPSWAP_PROGRAM,
            encode_pool(&fixture.state),
        );

        let adapter = PumpSwapAdapter::new(fixture.transport.clone());
        assert!(matches!(
            adapter.quote_buy(&fixture.pool, 1.0, 0.01).await,
            Err(SwapError::QuoteComputationFailed(_))
        ));
    }

    #[tokio::test]
    async fn test_buy_instructions_wrap_max_spend() {
        let target = Pubkey::new_unique();
        let fixture = pump_fixture(target);
        let adapter = PumpSwapAdapter::new(fixture.transport.clone());
        let owner = Pubkey::new_unique();

        let quote = adapter.quote_buy(&fixture.pool, 1.0, 0.01).await.unwrap();
        let instructions = adapter
            .swap_instructions(&owner, &fixture.pool, SwapDirection::Buy, &quote)
            .await
            .unwrap();

        assert_eq!(instructions.len(), 6);
        assert_eq!(
            instructions[1],
            solana_sdk::system_instruction::transfer(
                &owner,
                &associated_account(&owner, &WSOL_MINT, &spl_token::id()),
                1_010_000_000
            )
        );
        let swap = &instructions[4];
        assert_eq!(swap.program_id, PUMPSWAP_PROGRAM);
        assert_eq!(swap.accounts.len(), 21);
        assert_eq!(&swap.data[..8], &BUY_DISCRIMINATOR);
        assert_eq!(&swap.data[8..16], &quote.expected_out.to_le_bytes());
    }

    #[tokio::test]
    async fn test_sell_instructions() {
        let target = Pubkey::new_unique();
        let fixture = pump_fixture(target);
        let adapter = PumpSwapAdapter::new(fixture.transport.clone());
        let owner = Pubkey::new_unique();

        let quote = adapter.quote_sell(&fixture.pool, 10.0, 0.01).await.unwrap();
        let instructions = adapter
            .swap_instructions(&owner, &fixture.pool, SwapDirection::Sell, &quote)
            .await
            .unwrap();

        assert_eq!(instructions.len(), 3);
        assert_eq!(instructions[1].accounts.len(), 19);
        assert_eq!(&instructions[1].data[..8], &SELL_DISCRIMINATOR);
        assert_eq!(&instructions[1].data[8..16], &10_000_000u64.to_le_bytes());
    }

    #[tokio::test]
    async fn test_mismatched_bound_rejected() {
        let target = Pubkey::new_unique();
        let fixture = pump_fixture(target);
        let adapter = PumpSwapAdapter::new(fixture.transport.clone());
        let quote = SwapQuote {
            amount_in: 1,
            expected_out: 1,
            bound: QuoteBound::MinimumOut(1),
            slippage_applied: 0.0,
        };
        assert!(matches!(
            adapter
                .build_swap_instructions(&Pubkey::new_unique(), &fixture.pool, SwapDirection::Buy, &quote)
                .await,
            Err(SwapError::InvalidParameter { .. })
        ));
    }
}
