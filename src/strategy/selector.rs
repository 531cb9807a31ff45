use crate::domain::bid::Bid;
use crate::domain::preference::Preferences;
use crate::history::history::History;
use crate::model::frequency::Frequencies;
use crate::session::error::EngineError;
use crate::Utility;
use crate::LARGE_DOMAIN;
use rand::rngs::SmallRng;
use rand::Rng;

/// lower edge of the search window, as a fraction of the target.
const FLOOR: f64 = 0.98;
/// initial headroom above the target, widened by [STEP] per round.
const HEADROOM: f64 = 0.04;
const STEP: f64 = 0.01;
/// on large domains a window scan stops after this many hits.
const EARLY_STOP: usize = 2;

/// searches the domain for bids near a target utility and ranks them by
/// estimated opponent utility: every candidate already satisfies us, so
/// the tiebreak goes to whatever the opponent likes most. the final
/// pick is uniform among a bounded shortlist, which keeps the agent
/// opponent-favorable without becoming fully predictable.
#[derive(Debug, Clone)]
pub struct Selector {
    /// the whole domain, ascending by own utility.
    ranked: Vec<(Bid, Utility)>,
}

impl Selector {
    /// the span of achievable utilities, (min, max).
    pub fn bounds(&self) -> (Utility, Utility) {
        let lo = self.ranked.first().map(|(_, u)| *u).unwrap_or(0.);
        let hi = self.ranked.last().map(|(_, u)| *u).unwrap_or(0.);
        (lo, hi)
    }

    /// bids whose utility falls inside an expanding window around the
    /// target: [0.98 T, T + 0.04 + k 0.01] for growing k. stops at two
    /// hits, or one once the ceiling has reached 1; an exhausted
    /// expansion falls back to the single best achievable bid, so the
    /// loop always terminates with something unless the domain is empty.
    pub fn bids_of_utility(&self, target: Utility) -> Vec<(Bid, Utility)> {
        if self.ranked.is_empty() {
            return Vec::new();
        }
        let floor = FLOOR * target;
        let lo = self.ranked.partition_point(|(_, u)| *u < floor);
        for k in 0.. {
            let ceiling = target + HEADROOM + k as f64 * STEP;
            let hi = self.ranked.partition_point(|(_, u)| *u <= ceiling);
            let hits = self.ranked[lo..hi].iter().cloned();
            let candidates = match self.ranked.len() > LARGE_DOMAIN {
                true => hits.take(EARLY_STOP).collect::<Vec<_>>(),
                false => hits.collect::<Vec<_>>(),
            };
            if candidates.len() >= 2 {
                return candidates;
            }
            if ceiling >= 1. {
                return match candidates.is_empty() {
                    false => candidates,
                    true => vec![self.ranked.last().cloned().expect("non-empty domain")],
                };
            }
        }
        unreachable!("window expansion is bounded by the utility ceiling")
    }

    /// candidates ranked by estimated opponent utility, cut down to the
    /// top tenth (at least 3, at most 20).
    pub fn shortlist(&self, target: Utility, model: &Frequencies) -> Vec<(Bid, Utility)> {
        let mut scored = self
            .bids_of_utility(target)
            .into_iter()
            .map(|(bid, mine)| {
                let theirs = model.estimate(&bid);
                (bid, mine, theirs)
            })
            .collect::<Vec<_>>();
        scored.sort_by(|a, b| b.2.total_cmp(&a.2));
        let n = (scored.len() / 10).clamp(3, 20).min(scored.len());
        scored.truncate(n);
        scored.into_iter().map(|(bid, mine, _)| (bid, mine)).collect()
    }

    /// uniform seeded pick from the shortlist.
    pub fn select(
        &self,
        target: Utility,
        model: &Frequencies,
        rng: &mut SmallRng,
    ) -> Result<(Bid, Utility), EngineError> {
        let shortlist = self.shortlist(target, model);
        match shortlist.is_empty() {
            true => Err(EngineError::SearchExhausted),
            false => Ok(shortlist[rng.random_range(0..shortlist.len())].clone()),
        }
    }

    /// never propose something worse than what is already on the table:
    /// if the opponent's best historical offer matches or beats the
    /// planned bid, substitute that offer.
    pub fn appropriate(planned: (Bid, Utility), theirs: &History) -> (Bid, Utility) {
        match theirs.best() {
            Some(best) if best.mine() >= planned.1 => (best.bid().clone(), best.mine()),
            _ => planned,
        }
    }
}

impl<P: Preferences> From<&P> for Selector {
    fn from(preferences: &P) -> Self {
        let mut ranked = preferences
            .bids()
            .into_iter()
            .map(|bid| {
                let utility = preferences.utility(&bid);
                (bid, utility)
            })
            .collect::<Vec<_>>();
        ranked.sort_by(|a, b| a.1.total_cmp(&b.1));
        Self { ranked }
    }
}
