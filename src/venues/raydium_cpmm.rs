/// Raydium CPMM (constant product) adapter
///
/// Quotes `swap_base_input` from the pool's vault balances net of accrued
/// protocol and fund fees, with the trade fee from the pool's AMM config.
use super::accounts::{
    associated_account, create_ata_idempotent, mul_div_ceil, mul_div_floor, read_pubkey,
    read_token_amount, read_u64, read_u8, unwrap_sol, wrap_sol,
};
use super::{Venue, VenueAdapter};
use crate::constants::{
    RAYDIUM_CPMM_AMM_CONFIG_SEED, RAYDIUM_CPMM_AUTH_SEED, RAYDIUM_CPMM_CONFIG_INDEXES,
    RAYDIUM_CPMM_POOL_SEED, RAYDIUM_CPMM_PROGRAM, SOL_DECIMALS, WSOL_MINT,
};
use crate::errors::{SwapError, SwapResult, TransportError};
use crate::logger::{self, LogTag};
use crate::pools::lookup::PoolLookup;
use crate::pools::ResolvedPool;
use crate::rpc::LedgerTransport;
use crate::swaps::amounts::{clamp_slippage, slippage_to_bps, to_base_units};
use crate::swaps::types::{QuoteBound, SwapDirection, SwapQuote};
use async_trait::async_trait;
use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_sdk::pubkey::Pubkey;
use std::sync::Arc;

/// sha256("global:swap_base_input")[..8]
pub const SWAP_BASE_INPUT_DISCRIMINATOR: [u8; 8] = [143, 190, 90, 218, 196, 30, 51, 222];

// PoolState layout (after the 8-byte account discriminator)
const AMM_CONFIG_OFFSET: usize = 8;
const TOKEN_0_VAULT_OFFSET: usize = 72;
const TOKEN_1_VAULT_OFFSET: usize = 104;
pub const TOKEN_0_MINT_OFFSET: usize = 168;
pub const TOKEN_1_MINT_OFFSET: usize = 200;
const TOKEN_0_PROGRAM_OFFSET: usize = 232;
const TOKEN_1_PROGRAM_OFFSET: usize = 264;
const OBSERVATION_KEY_OFFSET: usize = 296;
const STATUS_OFFSET: usize = 329;
const LP_SUPPLY_OFFSET: usize = 333;
const PROTOCOL_FEES_0_OFFSET: usize = 341;
const PROTOCOL_FEES_1_OFFSET: usize = 349;
const FUND_FEES_0_OFFSET: usize = 357;
const FUND_FEES_1_OFFSET: usize = 365;
const OPEN_TIME_OFFSET: usize = 373;
pub const POOL_STATE_MIN_LEN: usize = 381;

// AmmConfig layout
const TRADE_FEE_RATE_OFFSET: usize = 12;
pub const FEE_RATE_DENOMINATOR: u64 = 1_000_000;

/// Status bit 2 set means swaps are disabled
const SWAP_DISABLED_MASK: u8 = 1 << 2;

#[derive(Debug, Clone, PartialEq)]
pub struct CpmmPoolState {
    pub amm_config: Pubkey,
    pub token_0_vault: Pubkey,
    pub token_1_vault: Pubkey,
    pub token_0_mint: Pubkey,
    pub token_1_mint: Pubkey,
    pub token_0_program: Pubkey,
    pub token_1_program: Pubkey,
    pub observation_key: Pubkey,
    pub status: u8,
    pub lp_supply: u64,
    pub protocol_fees_token_0: u64,
    pub protocol_fees_token_1: u64,
    pub fund_fees_token_0: u64,
    pub fund_fees_token_1: u64,
    pub open_time: u64,
}

impl CpmmPoolState {
    pub fn decode(address: &Pubkey, data: &[u8]) -> Result<Self, TransportError> {
        if data.len() < POOL_STATE_MIN_LEN {
            return Err(TransportError::InvalidAccountData {
                address: *address,
                reason: format!("CPMM pool state too short ({} bytes)", data.len()),
            });
        }

        Ok(Self {
            amm_config: read_pubkey(address, data, AMM_CONFIG_OFFSET)?,
            token_0_vault: read_pubkey(address, data, TOKEN_0_VAULT_OFFSET)?,
            token_1_vault: read_pubkey(address, data, TOKEN_1_VAULT_OFFSET)?,
            token_0_mint: read_pubkey(address, data, TOKEN_0_MINT_OFFSET)?,
            token_1_mint: read_pubkey(address, data, TOKEN_1_MINT_OFFSET)?,
            token_0_program: read_pubkey(address, data, TOKEN_0_PROGRAM_OFFSET)?,
            token_1_program: read_pubkey(address, data, TOKEN_1_PROGRAM_OFFSET)?,
            observation_key: read_pubkey(address, data, OBSERVATION_KEY_OFFSET)?,
            status: read_u8(address, data, STATUS_OFFSET)?,
            lp_supply: read_u64(address, data, LP_SUPPLY_OFFSET)?,
            protocol_fees_token_0: read_u64(address, data, PROTOCOL_FEES_0_OFFSET)?,
            protocol_fees_token_1: read_u64(address, data, PROTOCOL_FEES_1_OFFSET)?,
            fund_fees_token_0: read_u64(address, data, FUND_FEES_0_OFFSET)?,
            fund_fees_token_1: read_u64(address, data, FUND_FEES_1_OFFSET)?,
            open_time: read_u64(address, data, OPEN_TIME_OFFSET)?,
        })
    }

    pub fn swap_enabled(&self) -> bool {
        self.status & SWAP_DISABLED_MASK == 0
    }

    /// (mint, vault, token program) for the side holding `mint`
    fn side(&self, mint: &Pubkey) -> Option<(Pubkey, Pubkey, Pubkey)> {
        if *mint == self.token_0_mint {
            Some((self.token_0_mint, self.token_0_vault, self.token_0_program))
        } else if *mint == self.token_1_mint {
            Some((self.token_1_mint, self.token_1_vault, self.token_1_program))
        } else {
            None
        }
    }
}

pub fn amm_config_address(index: u16) -> Pubkey {
    Pubkey::find_program_address(
        &[RAYDIUM_CPMM_AMM_CONFIG_SEED, &index.to_be_bytes()],
        &RAYDIUM_CPMM_PROGRAM,
    )
    .0
}

pub fn pool_authority() -> Pubkey {
    Pubkey::find_program_address(&[RAYDIUM_CPMM_AUTH_SEED], &RAYDIUM_CPMM_PROGRAM).0
}

/// Pool PDA; mints are ordered by their bytes as the program requires
pub fn pool_address(amm_config: &Pubkey, mint_a: &Pubkey, mint_b: &Pubkey) -> Pubkey {
    let (token_0, token_1) = if mint_a.to_bytes() <= mint_b.to_bytes() {
        (mint_a, mint_b)
    } else {
        (mint_b, mint_a)
    };
    Pubkey::find_program_address(
        &[
            RAYDIUM_CPMM_POOL_SEED,
            amm_config.as_ref(),
            token_0.as_ref(),
            token_1.as_ref(),
        ],
        &RAYDIUM_CPMM_PROGRAM,
    )
    .0
}

/// Output and slippage-protected minimum for an exact-input swap
pub fn quote_exact_input(
    amount_in: u64,
    reserve_in: u64,
    reserve_out: u64,
    trade_fee_rate: u64,
    slippage_bps: u64,
) -> SwapResult<(u64, u64)> {
    if reserve_in == 0 || reserve_out == 0 {
        return Err(SwapError::QuoteComputationFailed(
            "pool has zero reserves".to_string(),
        ));
    }

    let fee = mul_div_ceil(amount_in, trade_fee_rate, FEE_RATE_DENOMINATOR);
    let net_in = amount_in.saturating_sub(fee);
    let amount_out = (reserve_out as u128 * net_in as u128
        / (reserve_in as u128 + net_in as u128)) as u64;

    if amount_out == 0 {
        return Err(SwapError::QuoteComputationFailed(format!(
            "input {} yields zero output",
            amount_in
        )));
    }

    let minimum_out = mul_div_floor(amount_out, 10_000 - slippage_bps.min(10_000), 10_000);
    Ok((amount_out, minimum_out))
}

struct CpmmMarket {
    state: CpmmPoolState,
    trade_fee_rate: u64,
    reserve_0: u64,
    reserve_1: u64,
}

impl CpmmMarket {
    /// (reserve_in, reserve_out) for a swap spending `mint_in`
    fn reserves_for(&self, mint_in: &Pubkey) -> SwapResult<(u64, u64)> {
        if *mint_in == self.state.token_0_mint {
            Ok((self.reserve_0, self.reserve_1))
        } else if *mint_in == self.state.token_1_mint {
            Ok((self.reserve_1, self.reserve_0))
        } else {
            Err(SwapError::QuoteComputationFailed(format!(
                "mint {} is not in the pool",
                mint_in
            )))
        }
    }
}

pub struct RaydiumCpmmAdapter {
    transport: Arc<dyn LedgerTransport>,
}

impl RaydiumCpmmAdapter {
    pub fn new(transport: Arc<dyn LedgerTransport>) -> Self {
        Self { transport }
    }

    async fn load_state(&self, pool: &ResolvedPool) -> SwapResult<CpmmPoolState> {
        let data = self.transport.fetch_account_state(&pool.pool_address).await?;
        let state = CpmmPoolState::decode(&pool.pool_address, &data)?;

        if state.side(&pool.target_mint).is_none() || state.side(&pool.quote_mint).is_none() {
            return Err(TransportError::InvalidAccountData {
                address: pool.pool_address,
                reason: "pool mints do not match the requested pair".to_string(),
            }
            .into());
        }
        Ok(state)
    }

    async fn load_market(&self, pool: &ResolvedPool) -> SwapResult<CpmmMarket> {
        let state = self.load_state(pool).await?;

        let (config_data, vault_0, vault_1, now) = futures::try_join!(
            self.transport.fetch_account_state(&state.amm_config),
            self.transport.fetch_account_state(&state.token_0_vault),
            self.transport.fetch_account_state(&state.token_1_vault),
            self.transport.fetch_unix_timestamp(),
        )?;

        if !state.swap_enabled() {
            return Err(SwapError::QuoteComputationFailed(format!(
                "swaps are disabled on pool {}",
                pool.pool_address
            )));
        }
        if state.open_time > now {
            return Err(SwapError::QuoteComputationFailed(format!(
                "pool {} opens at {} (now {})",
                pool.pool_address, state.open_time, now
            )));
        }

        let trade_fee_rate = read_u64(&state.amm_config, &config_data, TRADE_FEE_RATE_OFFSET)?;
        let reserve_0 = read_token_amount(&state.token_0_vault, &vault_0)?
            .saturating_sub(state.protocol_fees_token_0)
            .saturating_sub(state.fund_fees_token_0);
        let reserve_1 = read_token_amount(&state.token_1_vault, &vault_1)?
            .saturating_sub(state.protocol_fees_token_1)
            .saturating_sub(state.fund_fees_token_1);

        Ok(CpmmMarket {
            state,
            trade_fee_rate,
            reserve_0,
            reserve_1,
        })
    }

    async fn quote_exact_in(
        &self,
        pool: &ResolvedPool,
        direction: SwapDirection,
        amount_in: u64,
        slippage: f64,
    ) -> SwapResult<SwapQuote> {
        let market = self.load_market(pool).await?;
        let (reserve_in, reserve_out) = market.reserves_for(&pool.mint_in(direction))?;
        let bps = slippage_to_bps(slippage);
        let (expected_out, minimum_out) =
            quote_exact_input(amount_in, reserve_in, reserve_out, market.trade_fee_rate, bps)?;

        logger::debug(
            LogTag::Venue,
            &format!(
                "CPMM {} quote: in={} out={} min_out={} fee_rate={} reserves={}/{}",
                direction, amount_in, expected_out, minimum_out, market.trade_fee_rate, reserve_in, reserve_out
            ),
        );

        Ok(SwapQuote {
            amount_in,
            expected_out,
            bound: QuoteBound::MinimumOut(minimum_out),
            slippage_applied: clamp_slippage(slippage),
        })
    }
}

impl PoolLookup for RaydiumCpmmAdapter {
    fn program_id(&self) -> Pubkey {
        RAYDIUM_CPMM_PROGRAM
    }

    fn canonical_addresses(&self, target: &Pubkey, quote: &Pubkey) -> Vec<Pubkey> {
        RAYDIUM_CPMM_CONFIG_INDEXES
            .iter()
            .map(|index| pool_address(&amm_config_address(*index), target, quote))
            .collect()
    }

    fn decode_mints(&self, data: &[u8]) -> Option<(Pubkey, Pubkey)> {
        if data.len() < POOL_STATE_MIN_LEN {
            return None;
        }
        let address = Pubkey::default();
        Some((
            read_pubkey(&address, data, TOKEN_0_MINT_OFFSET).ok()?,
            read_pubkey(&address, data, TOKEN_1_MINT_OFFSET).ok()?,
        ))
    }

    fn mint_offsets(&self) -> (usize, usize) {
        (TOKEN_0_MINT_OFFSET, TOKEN_1_MINT_OFFSET)
    }

    fn liquidity_hint(&self, data: &[u8]) -> u64 {
        read_u64(&Pubkey::default(), data, LP_SUPPLY_OFFSET).unwrap_or(0)
    }
}

#[async_trait]
impl VenueAdapter for RaydiumCpmmAdapter {
    fn venue(&self) -> Venue {
        Venue::RaydiumCpmm
    }

    async fn quote_buy(
        &self,
        pool: &ResolvedPool,
        amount_native_in: f64,
        slippage: f64,
    ) -> SwapResult<SwapQuote> {
        let amount_in = to_base_units(amount_native_in, SOL_DECIMALS)?;
        self.quote_exact_in(pool, SwapDirection::Buy, amount_in, slippage)
            .await
    }

    async fn quote_sell(
        &self,
        pool: &ResolvedPool,
        amount_token_in: f64,
        slippage: f64,
    ) -> SwapResult<SwapQuote> {
        let decimals = self.transport.fetch_mint_decimals(&pool.target_mint).await?;
        let amount_in = to_base_units(amount_token_in, decimals)?;
        self.quote_exact_in(pool, SwapDirection::Sell, amount_in, slippage)
            .await
    }

    async fn build_swap_instructions(
        &self,
        owner: &Pubkey,
        pool: &ResolvedPool,
        direction: SwapDirection,
        quote: &SwapQuote,
    ) -> SwapResult<Vec<Instruction>> {
        let state = self.load_state(pool).await?;
        let minimum_out = quote.minimum_out().ok_or_else(|| {
            SwapError::invalid("quote", "Raydium CPMM swaps need a minimum-out bound")
        })?;

        let mint_in = pool.mint_in(direction);
        let mint_out = pool.mint_out(direction);
        let missing = || SwapError::QuoteComputationFailed("mint is not in the pool".to_string());
        let (input_mint, input_vault, input_program) = state.side(&mint_in).ok_or_else(missing)?;
        let (output_mint, output_vault, output_program) =
            state.side(&mint_out).ok_or_else(missing)?;

        let input_account = associated_account(owner, &input_mint, &input_program);
        let output_account = associated_account(owner, &output_mint, &output_program);
        let handles_sol = input_mint == WSOL_MINT || output_mint == WSOL_MINT;

        let mut instructions = Vec::new();
        if input_mint == WSOL_MINT {
            instructions.extend(wrap_sol(owner, quote.amount_in)?);
        }
        instructions.push(create_ata_idempotent(owner, &output_mint, &output_program));

        let mut data = Vec::with_capacity(24);
        data.extend_from_slice(&SWAP_BASE_INPUT_DISCRIMINATOR);
        data.extend_from_slice(&quote.amount_in.to_le_bytes());
        data.extend_from_slice(&minimum_out.to_le_bytes());

        instructions.push(Instruction {
            program_id: RAYDIUM_CPMM_PROGRAM,
            accounts: vec![
                AccountMeta::new_readonly(*owner, true),
                AccountMeta::new_readonly(pool_authority(), false),
                AccountMeta::new_readonly(state.amm_config, false),
                AccountMeta::new(pool.pool_address, false),
                AccountMeta::new(input_account, false),
                AccountMeta::new(output_account, false),
                AccountMeta::new(input_vault, false),
                AccountMeta::new(output_vault, false),
                AccountMeta::new_readonly(input_program, false),
                AccountMeta::new_readonly(output_program, false),
                AccountMeta::new_readonly(input_mint, false),
                AccountMeta::new_readonly(output_mint, false),
                AccountMeta::new(state.observation_key, false),
            ],
            data,
        });

        if handles_sol {
            instructions.push(unwrap_sol(owner)?);
        }
        Ok(instructions)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::pools::PoolOrigin;
    use crate::testing::{mint_account, token_account, MockTransport};

    pub(crate) struct CpmmFixture {
        pub transport: Arc<MockTransport>,
        pub pool: ResolvedPool,
        pub state: CpmmPoolState,
    }

    pub(crate) fn encode_pool_state(state: &CpmmPoolState) -> Vec<u8> {
        let mut data = vec![0u8; 637];
        let mut put = |offset: usize, key: &Pubkey| {
            data[offset..offset + 32].copy_from_slice(key.as_ref());
        };
        put(AMM_CONFIG_OFFSET, &state.amm_config);
        put(TOKEN_0_VAULT_OFFSET, &state.token_0_vault);
        put(TOKEN_1_VAULT_OFFSET, &state.token_1_vault);
        put(TOKEN_0_MINT_OFFSET, &state.token_0_mint);
        put(TOKEN_1_MINT_OFFSET, &state.token_1_mint);
        put(TOKEN_0_PROGRAM_OFFSET, &state.token_0_program);
        put(TOKEN_1_PROGRAM_OFFSET, &state.token_1_program);
        put(OBSERVATION_KEY_OFFSET, &state.observation_key);
        data[STATUS_OFFSET] = state.status;
        for (offset, value) in [
            (LP_SUPPLY_OFFSET, state.lp_supply),
            (PROTOCOL_FEES_0_OFFSET, state.protocol_fees_token_0),
            (PROTOCOL_FEES_1_OFFSET, state.protocol_fees_token_1),
            (FUND_FEES_0_OFFSET, state.fund_fees_token_0),
            (FUND_FEES_1_OFFSET, state.fund_fees_token_1),
            (OPEN_TIME_OFFSET, state.open_time),
        ] {
            data[offset..offset + 8].copy_from_slice(&value.to_le_bytes());
        }
        data
    }

    /// WSOL / token pool with 100 SOL against 1_000_000 tokens (6 decimals), 0.25% fee
    pub(crate) fn cpmm_fixture(target: Pubkey) -> CpmmFixture {
        let transport = Arc::new(MockTransport::new());
        let amm_config = amm_config_address(0);
        let pool_address = pool_address(&amm_config, &target, &WSOL_MINT);

        let (token_0_mint, token_1_mint) = if WSOL_MINT.to_bytes() <= target.to_bytes() {
            (WSOL_MINT, target)
        } else {
            (target, WSOL_MINT)
        };
        let state = CpmmPoolState {
            amm_config,
            token_0_vault: Pubkey::new_unique(),
            token_1_vault: Pubkey::new_unique(),
            token_0_mint,
            token_1_mint,
            token_0_program: spl_token::id(),
            token_1_program: spl_token::id(),
            observation_key: Pubkey::new_unique(),
            status: 0,
            lp_supply: 1_000,
            protocol_fees_token_0: 0,
            protocol_fees_token_1: 0,
            fund_fees_token_0: 0,
            fund_fees_token_1: 0,
            open_time: 0,
        };

        let mut config = vec![0u8; 236];
        config[TRADE_FEE_RATE_OFFSET..TRADE_FEE_RATE_OFFSET + 8]
            .copy_from_slice(&2_500u64.to_le_bytes());

        let amount_of = |mint: &Pubkey| {
            if *mint == WSOL_MINT {
                100_000_000_000
            } else {
                1_000_000_000_000
            }
        };

        transport.insert_account(pool_address, RAYDIUM_CPMM_PROGRAM, encode_pool_state(&state));
        transport.insert_account(amm_config, RAYDIUM_CPMM_PROGRAM, config);
        transport.insert_account(
            state.token_0_vault,
            spl_token::id(),
            token_account(&token_0_mint, amount_of(&token_0_mint)),
        );
        transport.insert_account(
            state.token_1_vault,
            spl_token::id(),
            token_account(&token_1_mint, amount_of(&token_1_mint)),
        );
        transport.insert_account(target, spl_token::id(), mint_account(6));
        transport.set_timestamp(1_700_000_000);

        CpmmFixture {
            transport,
            pool: ResolvedPool {
                venue: Venue::RaydiumCpmm,
                pool_address,
                target_mint: target,
                quote_mint: WSOL_MINT,
                origin: PoolOrigin::Listing,
            },
            state,
        }
    }

    #[test]
    fn test_quote_exact_input_math() {
        // 1 SOL into 100 SOL / 1_000_000 token pool at 0.25%
        let (out, min) =
            quote_exact_input(1_000_000_000, 100_000_000_000, 1_000_000_000_000, 2_500, 100)
                .unwrap();
        // net in = 997_500_000; out = 1e12 * 997.5e6 / (100e9 + 997.5e6)
        assert_eq!(out, 9_876_482_091);
        assert_eq!(min, 9_777_717_270);
    }

    #[test]
    fn test_quote_rejects_empty_pool() {
        assert!(matches!(
            quote_exact_input(1_000, 0, 1_000, 2_500, 0),
            Err(SwapError::QuoteComputationFailed(_))
        ));
        assert!(matches!(
            quote_exact_input(1, 1_000_000_000, 10, 2_500, 0),
            Err(SwapError::QuoteComputationFailed(_))
        ));
    }

    #[test]
    fn test_decode_round_trip_and_short_data() {
        let fixture = cpmm_fixture(Pubkey::new_unique());
        let encoded = encode_pool_state(&fixture.state);
        let decoded = CpmmPoolState::decode(&fixture.pool.pool_address, &encoded).unwrap();
        assert_eq!(decoded, fixture.state);
        assert!(CpmmPoolState::decode(&fixture.pool.pool_address, &encoded[..300]).is_err());
    }

    #[test]
    fn test_pool_address_ignores_mint_order() {
        let config = amm_config_address(0);
        let a = Pubkey::new_unique();
        let b = Pubkey::new_unique();
        assert_eq!(pool_address(&config, &a, &b), pool_address(&config, &b, &a));
        assert_ne!(amm_config_address(0), amm_config_address(1));
    }

    #[test]
    fn test_discriminator_matches_anchor_hash() {
        use sha2::{Digest, Sha256};
        let hash = Sha256::digest(b"global:swap_base_input");
        assert_eq!(&hash[..8], &SWAP_BASE_INPUT_DISCRIMINATOR);
    }

    #[tokio::test]
    async fn test_quote_buy_and_sell() {
        let target = Pubkey::new_unique();
        let fixture = cpmm_fixture(target);
        let adapter = RaydiumCpmmAdapter::new(fixture.transport.clone());

        let buy = adapter.quote_buy(&fixture.pool, 1.0, 0.01).await.unwrap();
        assert_eq!(buy.amount_in, 1_000_000_000);
        assert_eq!(buy.expected_out, 9_876_482_091);
        assert_eq!(buy.bound, QuoteBound::MinimumOut(9_777_717_270));

        // Sells scale by the mint's 6 decimals
        let sell = adapter.quote_sell(&fixture.pool, 2.5, 0.0).await.unwrap();
        assert_eq!(sell.amount_in, 2_500_000);
        assert_eq!(sell.minimum_out(), Some(sell.expected_out));
    }

    #[tokio::test]
    async fn test_unopened_pool_fails_quote() {
        let target = Pubkey::new_unique();
        let mut fixture = cpmm_fixture(target);
        fixture.state.open_time = 1_800_000_000;
        fixture.transport.insert_account(
            fixture.pool.pool_address,
            RAYDIUM_CPMM_PROGRAM,
            encode_pool_state(&fixture.state),
        );

        let adapter = RaydiumCpmmAdapter::new(fixture.transport.clone());
        assert!(matches!(
            adapter.quote_buy(&fixture.pool, 1.0, 0.01).await,
            Err(SwapError::QuoteComputationFailed(_))
        ));
    }

    #[tokio::test]
    async fn test_disabled_swap_status_fails_quote() {
        let target = Pubkey::new_unique();
        let mut fixture = cpmm_fixture(target);
        fixture.state.status = SWAP_DISABLED_MASK;
        fixture.transport.insert_account(
            fixture.pool.pool_address,
            RAYDIUM_CPMM_PROGRAM,
            encode_pool_state(&fixture.state),
        );

        let adapter = RaydiumCpmmAdapter::new(fixture.transport.clone());
        assert!(matches!(
            adapter.quote_sell(&fixture.pool, 1.0, 0.01).await,
            Err(SwapError::QuoteComputationFailed(_))
        ));
    }

    #[tokio::test]
    async fn test_buy_instruction_sequence() {
        let target = Pubkey::new_unique();
        let fixture = cpmm_fixture(target);
        let adapter = RaydiumCpmmAdapter::new(fixture.transport.clone());
        let owner = Pubkey::new_unique();

        let quote = adapter.quote_buy(&fixture.pool, 1.5, 0.01).await.unwrap();
        let instructions = adapter
            .swap_instructions(&owner, &fixture.pool, SwapDirection::Buy, &quote)
            .await
            .unwrap();

        // wrap (3), create output ATA, swap, close WSOL
        assert_eq!(instructions.len(), 6);
        let swap = &instructions[4];
        assert_eq!(swap.program_id, RAYDIUM_CPMM_PROGRAM);
        assert_eq!(swap.accounts.len(), 13);
        assert_eq!(&swap.data[..8], &SWAP_BASE_INPUT_DISCRIMINATOR);
        assert_eq!(&swap.data[8..16], &1_500_000_000u64.to_le_bytes());
        assert_eq!(swap.accounts[10].pubkey, WSOL_MINT);
        assert_eq!(swap.accounts[11].pubkey, target);
        assert!(instructions
            .iter()
            .all(|ix| ix.program_id != solana_sdk::compute_budget::id()));
    }

    #[tokio::test]
    async fn test_sell_instruction_sequence() {
        let target = Pubkey::new_unique();
        let fixture = cpmm_fixture(target);
        let adapter = RaydiumCpmmAdapter::new(fixture.transport.clone());
        let owner = Pubkey::new_unique();

        let quote = adapter.quote_sell(&fixture.pool, 10.0, 0.05).await.unwrap();
        let instructions = adapter
            .swap_instructions(&owner, &fixture.pool, SwapDirection::Sell, &quote)
            .await
            .unwrap();

        // create WSOL ATA, swap, close WSOL
        assert_eq!(instructions.len(), 3);
        assert_eq!(instructions[1].program_id, RAYDIUM_CPMM_PROGRAM);
        assert_eq!(instructions[1].accounts[10].pubkey, target);
        assert_eq!(instructions[2].program_id, spl_token::id());
    }

    #[test]
    fn test_lookup_decodes_mints() {
        let target = Pubkey::new_unique();
        let fixture = cpmm_fixture(target);
        let adapter = RaydiumCpmmAdapter::new(fixture.transport.clone());
        let data = encode_pool_state(&fixture.state);

        let (a, b) = adapter.decode_mints(&data).unwrap();
        assert!(a == target || b == target);
        assert_eq!(adapter.liquidity_hint(&data), 1_000);
        assert!(adapter
            .canonical_addresses(&target, &WSOL_MINT)
            .contains(&fixture.pool.pool_address));
        assert!(adapter.decode_mints(&data[..100]).is_none());
    }
}
