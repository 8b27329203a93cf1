/// Common swap structures shared by the venue adapters, compiler and engine
use crate::relay::RelayPreferences;
use crate::venues::Venue;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwapDirection {
    /// Spend native SOL, receive the target token
    Buy,
    /// Spend the target token, receive native SOL
    Sell,
}

impl SwapDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SwapDirection::Buy => "buy",
            SwapDirection::Sell => "sell",
        }
    }
}

impl fmt::Display for SwapDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SwapDirection {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "buy" => Ok(SwapDirection::Buy),
            "sell" => Ok(SwapDirection::Sell),
            other => Err(format!("Unknown swap direction '{}'", other)),
        }
    }
}

/// Slippage-protected bound carried into the venue instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "amount", rename_all = "snake_case")]
pub enum QuoteBound {
    MinimumOut(u64),
    MaximumIn(u64),
}

/// Quote in base units, produced fresh for every call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapQuote {
    pub amount_in: u64,
    pub expected_out: u64,
    pub bound: QuoteBound,
    /// Slippage fraction after clamping
    pub slippage_applied: f64,
}

impl SwapQuote {
    pub fn minimum_out(&self) -> Option<u64> {
        match self.bound {
            QuoteBound::MinimumOut(amount) => Some(amount),
            QuoteBound::MaximumIn(_) => None,
        }
    }

    pub fn maximum_in(&self) -> Option<u64> {
        match self.bound {
            QuoteBound::MaximumIn(amount) => Some(amount),
            QuoteBound::MinimumOut(_) => None,
        }
    }

    /// Lamports the payer may spend when the input side is SOL
    pub fn max_spend(&self) -> u64 {
        self.maximum_in().unwrap_or(self.amount_in)
    }
}

/// One `compile_and_route` call
#[derive(Debug, Clone)]
pub struct SwapRequest {
    pub venue: Venue,
    pub direction: SwapDirection,
    /// Target token mint (base58)
    pub mint: String,
    /// SOL for buys, tokens for sells
    pub amount: f64,
    /// Fraction in [0, 1]
    pub slippage: f64,
    /// Fee payer and swap owner (base58)
    pub owner: String,
    pub relay: RelayPreferences,
    /// Priority fee override in SOL
    pub priority_fee_sol: Option<f64>,
}
