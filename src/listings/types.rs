/// Listing snapshot data types
use serde::{Deserialize, Serialize};
use std::fmt;

/// One venue-reported pool record
///
/// Reserves and liquidity are UI-unit scoring hints; the adapters quote from
/// on-chain state, never from these numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolRecord {
    pub pool_address: String,
    pub mint_a: String,
    pub mint_b: String,
    #[serde(default)]
    pub reserve_a: f64,
    #[serde(default)]
    pub reserve_b: f64,
    #[serde(default)]
    pub liquidity: f64,
}

impl PoolRecord {
    /// Whether the record's unordered mint pair is exactly {x, y}
    pub fn has_pair(&self, x: &str, y: &str) -> bool {
        (self.mint_a == x && self.mint_b == y) || (self.mint_a == y && self.mint_b == x)
    }

    /// Reserve on the side holding `mint`
    pub fn reserve_of(&self, mint: &str) -> Option<f64> {
        if self.mint_a == mint {
            Some(self.reserve_a)
        } else if self.mint_b == mint {
            Some(self.reserve_b)
        } else {
            None
        }
    }
}

/// Ordered pool records for one pair on one venue, replaced wholesale on refresh
///
/// Serialized as a bare JSON array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListingSnapshot {
    pub records: Vec<PoolRecord>,
}

impl ListingSnapshot {
    pub fn new(records: Vec<PoolRecord>) -> Self {
        Self { records }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PoolRecord> {
        self.records.iter()
    }
}

/// Order-independent key for a mint pair
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PairKey {
    lo: String,
    hi: String,
}

impl PairKey {
    pub fn new(a: &str, b: &str) -> Self {
        let (a, b) = (a.trim(), b.trim());
        if a <= b {
            Self {
                lo: a.to_string(),
                hi: b.to_string(),
            }
        } else {
            Self {
                lo: b.to_string(),
                hi: a.to_string(),
            }
        }
    }

    pub fn members(&self) -> (&str, &str) {
        (&self.lo, &self.hi)
    }

    pub fn contains(&self, mint: &str) -> bool {
        self.lo == mint || self.hi == mint
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.lo, self.hi)
    }
}
