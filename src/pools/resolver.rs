/// Liquidity-ranked selection of a pool from a listing snapshot
use crate::listings::{ListingSnapshot, PoolRecord};
use std::cmp::Ordering;

/// Ranking of one record; reserve-backed scores outrank TVL-backed ones
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PoolScore {
    Liquidity(f64),
    TargetReserve(f64),
}

impl PoolScore {
    pub fn value(&self) -> f64 {
        match self {
            PoolScore::Liquidity(v) | PoolScore::TargetReserve(v) => *v,
        }
    }

    fn tier(&self) -> u8 {
        match self {
            PoolScore::Liquidity(_) => 0,
            PoolScore::TargetReserve(_) => 1,
        }
    }
}

impl PartialOrd for PoolScore {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match self.tier().cmp(&other.tier()) {
            Ordering::Equal => self.value().partial_cmp(&other.value()),
            ordering => Some(ordering),
        }
    }
}

/// Chosen listing record for a pair
#[derive(Debug, Clone, PartialEq)]
pub struct PoolCandidate {
    pub record: PoolRecord,
    pub score: PoolScore,
}

fn usable(value: f64) -> Option<f64> {
    if value.is_finite() && value > 0.0 {
        Some(value)
    } else {
        None
    }
}

/// Target-side reserve when positive, otherwise TVL
pub fn pool_score(record: &PoolRecord, target: &str) -> PoolScore {
    match record.reserve_of(target).and_then(usable) {
        Some(reserve) => PoolScore::TargetReserve(reserve),
        None => PoolScore::Liquidity(usable(record.liquidity).unwrap_or(0.0)),
    }
}

/// Best pool whose unordered mint pair is exactly {target, quote}.
/// Equal scores keep the earlier record.
pub fn resolve(snapshot: &ListingSnapshot, target: &str, quote: &str) -> Option<PoolCandidate> {
    let mut best: Option<PoolCandidate> = None;

    for record in snapshot.iter().filter(|r| r.has_pair(target, quote)) {
        let score = pool_score(record, target);
        let better = match &best {
            None => true,
            Some(current) => score.partial_cmp(&current.score) == Some(Ordering::Greater),
        };
        if better {
            best = Some(PoolCandidate {
                record: record.clone(),
                score,
            });
        }
    }

    best
}
