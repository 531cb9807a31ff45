use crate::domain::bid::Bid;
use crate::domain::issue::Issue;
use crate::domain::value::Value;
use crate::session::error::EngineError;
use crate::Utility;
use std::collections::BTreeMap;

/// weight bump applied to an issue when the opponent repeats its value
/// across consecutive offers. an opponent who never budges on an issue
/// presumably cares about it.
const STUBBORN_BONUS: f64 = 0.1;

/// fine-grained opponent belief learned from observed offers: per-issue
/// importance weights plus per-value frequency counts. the estimate for
/// any bid is the weight-normalized sum of relative value frequencies,
/// always within [0, 1].
///
/// [Self::observe] is cheap and safe to skip under time pressure; the
/// estimate just stays at its previous fidelity.
#[derive(Debug, Default, Clone)]
pub struct Frequencies {
    weights: BTreeMap<Issue, f64>,
    counts: BTreeMap<Issue, BTreeMap<Value, usize>>,
    previous: Option<Bid>,
    observations: usize,
}

impl Frequencies {
    pub fn observations(&self) -> usize {
        self.observations
    }

    /// fold one observed offer into the belief. the first offer seeds
    /// uniform issue weights; later offers bump the weight of issues
    /// whose value did not move since the previous offer.
    pub fn observe(&mut self, bid: &Bid) -> Result<(), EngineError> {
        if bid.is_empty() {
            return Err(EngineError::MalformedBid(bid.to_string()));
        }
        for issue in bid.issues() {
            self.weights.entry(issue.clone()).or_insert(1.);
        }
        for (issue, value) in bid.entries() {
            *self
                .counts
                .entry(issue.clone())
                .or_default()
                .entry(value.clone())
                .or_insert(0) += 1;
            if let Some(previous) = self.previous.as_ref() {
                if previous.value(issue) == Some(value) {
                    *self.weights.entry(issue.clone()).or_insert(1.) += STUBBORN_BONUS;
                }
            }
        }
        self.previous = Some(bid.clone());
        self.observations += 1;
        Ok(())
    }

    /// normalized estimate of the opponent's utility for a bid, in [0, 1].
    /// issues we have never seen contribute nothing.
    pub fn estimate(&self, bid: &Bid) -> Utility {
        let denom = self.weights.values().sum::<f64>();
        if denom <= 0. {
            return 0.;
        }
        let total = bid
            .entries()
            .map(|(issue, value)| {
                let weight = self.weights.get(issue).copied().unwrap_or(0.);
                let freq = self
                    .counts
                    .get(issue)
                    .and_then(|counts| counts.get(value))
                    .copied()
                    .unwrap_or(0) as f64;
                let peak = self
                    .counts
                    .get(issue)
                    .map(|counts| counts.values().copied().max().unwrap_or(0))
                    .unwrap_or(0) as f64;
                match peak > 0. {
                    true => weight * freq / peak,
                    false => 0.,
                }
            })
            .sum::<f64>();
        let estimate = total / denom;
        if estimate.is_nan() {
            0.
        } else {
            estimate.clamp(0., 1.)
        }
    }
}
