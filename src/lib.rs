pub mod appraisal;
pub mod domain;
pub mod history;
pub mod model;
pub mod pareto;
pub mod session;
pub mod strategy;

/// scalar preference for a bid, in [0, 1].
pub type Utility = f64;
/// probability mass and acceptance chances.
pub type Probability = f64;
/// fractional progress through the negotiation, in [0, 1].
pub type Time = f64;
/// turn counter.
pub type Turn = usize;

/// random instance generation for tests.
pub trait Arbitrary {
    fn random() -> Self;
}

// ============================================================================
// DOMAIN SIZE REGIMES
// Larger bid spaces get cheaper searches and earlier deadline ramps.
// ============================================================================
/// above this many bids, window scans early-terminate and the closing
/// ramp starts sooner.
pub const LARGE_DOMAIN: usize = 3_000;
/// above this many bids, belief updates only run in the first half of time.
pub const HUGE_DOMAIN: usize = 10_000;
/// above this many bids, the Pareto frontier is never computed at all.
pub const FRONTIER_CUTOFF: usize = 200_000;

// ============================================================================
// TIMING AND TOLERANCES
// ============================================================================
/// no optional recomputation (beliefs, Nash) after this fraction of time.
pub const FINAL_STRETCH: Time = 0.99;
/// slop tolerated above 1 when validating utilities in the acceptance
/// curve; anything inside it is clamped back to 1.
pub const UTILITY_SLOP: Utility = 1.05;
/// a counter-offer must clear the reservation value by this much,
/// otherwise walking away beats any reachable deal.
pub const WALKAWAY_MARGIN: Utility = 0.01;
