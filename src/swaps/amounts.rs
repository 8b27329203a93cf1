/// Fixed-point conversions between human amounts and base units
use crate::errors::{SwapError, SwapResult};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

/// Largest decimal count whose scale factor fits in a u64
const MAX_DECIMALS: u8 = 19;

fn scale_factor(decimals: u8) -> SwapResult<Decimal> {
    if decimals > MAX_DECIMALS {
        return Err(SwapError::invalid(
            "decimals",
            format!("{} exceeds supported maximum {}", decimals, MAX_DECIMALS),
        ));
    }
    Ok(Decimal::from(10u64.pow(decimals as u32)))
}

/// Scale a human amount to base units, rounding to the nearest unit
pub fn to_base_units(amount: f64, decimals: u8) -> SwapResult<u64> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(SwapError::invalid(
            "amount",
            format!("must be a positive finite number, got {}", amount),
        ));
    }

    let value = Decimal::from_f64(amount)
        .ok_or_else(|| SwapError::invalid("amount", format!("{} is not representable", amount)))?;

    let units = value
        .checked_mul(scale_factor(decimals)?)
        .ok_or_else(|| SwapError::invalid("amount", format!("{} overflows", amount)))?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u64()
        .ok_or_else(|| SwapError::invalid("amount", format!("{} overflows u64 base units", amount)))?;

    if units == 0 {
        return Err(SwapError::invalid(
            "amount",
            format!("{} rounds to zero at {} decimals", amount, decimals),
        ));
    }
    Ok(units)
}

/// Base units back to a human amount (display only)
pub fn from_base_units(units: u64, decimals: u8) -> f64 {
    let factor = scale_factor(decimals).unwrap_or(Decimal::ONE);
    (Decimal::from(units) / factor).to_f64().unwrap_or(0.0)
}

/// Slippage fraction clamped to [0, 1]; NaN becomes 0
pub fn clamp_slippage(slippage: f64) -> f64 {
    if slippage.is_nan() {
        0.0
    } else {
        slippage.clamp(0.0, 1.0)
    }
}

/// Slippage fraction as basis points out of 10 000 (clamped)
pub fn slippage_to_bps(slippage: f64) -> u64 {
    let bps = Decimal::from_f64(clamp_slippage(slippage) * 10_000.0).unwrap_or(Decimal::ZERO);
    bps.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u64()
        .unwrap_or(0)
        .min(10_000)
}

/// Slippage fraction as a percentage out of 100, two decimal places (clamped)
pub fn slippage_to_percent(slippage: f64) -> f64 {
    Decimal::from_f64(clamp_slippage(slippage) * 100.0)
        .unwrap_or(Decimal::ZERO)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or(0.0)
        .min(100.0)
}

/// Priority fee in SOL to compute-unit price in micro-lamports
pub fn compute_unit_price(priority_fee_sol: f64, compute_unit_budget: u32) -> u64 {
    if !priority_fee_sol.is_finite() || priority_fee_sol <= 0.0 || compute_unit_budget == 0 {
        return 0;
    }
    let lamports = Decimal::from_f64(priority_fee_sol).unwrap_or(Decimal::ZERO)
        * Decimal::from(crate::constants::LAMPORTS_PER_SOL);
    (lamports * Decimal::from(1_000_000u64) / Decimal::from(compute_unit_budget))
        .round_dp_with_strategy(0, RoundingStrategy::ToZero)
        .to_u64()
        .unwrap_or(0)
}

/// SOL amount to lamports, zero for non-positive input
pub fn sol_to_lamports(sol: f64) -> u64 {
    if !sol.is_finite() || sol <= 0.0 {
        return 0;
    }
    to_base_units(sol, crate::constants::SOL_DECIMALS).unwrap_or(0)
}
