use super::frontier::Frontier;
use super::frontier::Outcome;
use crate::domain::preference::Preferences;
use crate::model::frequency::Frequencies;
use crate::Time;
use crate::Utility;
use crate::FINAL_STRETCH;
use crate::FRONTIER_CUTOFF;
use crate::HUGE_DOMAIN;

/// conservative own-utility stand-in when no frontier is available.
const DEFAULT: Utility = 0.7;
/// the reference never leaves this band.
const FLOOR: Utility = 0.5;
const CEILING: Utility = 1.0;

/// cached Nash bargaining reference. the frontier is expensive to
/// rebuild, so refreshes only happen when [can_update_beliefs] allows,
/// and oversize domains never build one at all: they live on the
/// gap-scaled constant fallback instead.
#[derive(Debug, Default, Clone)]
pub struct Nash {
    frontier: Frontier,
    cached: Option<Utility>,
}

impl Nash {
    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    /// own utility at the Nash point. `gap` is the distance between our
    /// aspiration and the opponent's best concession so far; it only
    /// matters when the fallback is in play.
    pub fn estimate(&self, gap: Utility) -> Utility {
        self.cached.unwrap_or_else(|| Self::fallback(gap))
    }

    /// constant default scaled by how far apart the two sides still are.
    pub fn fallback(gap: Utility) -> Utility {
        (DEFAULT * (1.4 - 0.6 * gap).max(0.)).clamp(FLOOR, CEILING)
    }

    /// rebuild the frontier over the joint utility cloud and re-extract
    /// the Nash point. a domain past the cutoff or an empty frontier
    /// leaves the cache unset, so [Self::estimate] degrades to the
    /// fallback rather than propagating the failure.
    pub fn refresh<P: Preferences>(&mut self, preferences: &P, model: &Frequencies) {
        if preferences.size() > FRONTIER_CUTOFF {
            log::warn!(
                "domain of {} bids exceeds frontier cutoff, keeping fallback",
                preferences.size()
            );
            return;
        }
        let cloud = preferences
            .bids()
            .into_iter()
            .map(|bid| {
                let mine = preferences.utility(&bid);
                let theirs = model.estimate(&bid);
                Outcome::from((bid, mine, theirs))
            })
            .collect::<Vec<_>>();
        self.frontier = Frontier::from(cloud);
        match self.frontier.nash() {
            Some(outcome) => {
                self.cached = Some(outcome.mine.clamp(FLOOR, CEILING));
                log::trace!("nash reference refreshed to {:.4}", outcome.mine);
            }
            None => {
                log::warn!("empty frontier, keeping fallback");
                self.cached = None;
            }
        }
    }
}

/// soft time budget gating optional recomputation: never inside the
/// final 1% of time, and only in the first half of time once the
/// domain is big enough that a refresh is no longer cheap.
pub fn can_update_beliefs(time: Time, size: usize) -> bool {
    if time > FINAL_STRETCH {
        return false;
    }
    if size > HUGE_DOMAIN && time > 0.5 {
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::preference::LinearPreferences;
    use crate::session::config::AgentLabel;

    #[test]
    fn fallback_stays_in_band() {
        for gap in [0., 0.25, 0.5, 0.75, 1., 3.] {
            let nash = Nash::fallback(gap);
            assert!(nash >= 0.5 && nash <= 1.0, "{}", nash);
        }
    }

    #[test]
    fn fallback_shrinks_with_gap() {
        assert!(Nash::fallback(0.) >= Nash::fallback(0.5));
        assert!(Nash::fallback(0.5) >= Nash::fallback(1.));
    }

    #[test]
    fn unrefreshed_estimate_is_the_fallback() {
        let nash = Nash::default();
        assert_eq!(nash.estimate(0.3), Nash::fallback(0.3));
        assert!(nash.frontier().is_empty());
    }

    #[test]
    fn refresh_caches_the_nash_point() {
        let preferences = LinearPreferences::scored(AgentLabel::A);
        let mut model = Frequencies::default();
        for bid in preferences.bids() {
            model.observe(&bid).unwrap();
        }
        let mut nash = Nash::default();
        nash.refresh(&preferences, &model);
        assert!(!nash.frontier().is_empty());
        let cached = nash.estimate(1.);
        assert!(cached >= 0.5 && cached <= 1.0, "{}", cached);
    }

    #[test]
    fn budget_gate_respects_the_final_stretch() {
        assert!(can_update_beliefs(0.0, 100));
        assert!(can_update_beliefs(0.98, 100));
        assert!(!can_update_beliefs(0.995, 100));
    }

    #[test]
    fn budget_gate_halves_time_on_huge_domains() {
        assert!(can_update_beliefs(0.4, 50_000));
        assert!(!can_update_beliefs(0.6, 50_000));
        assert!(can_update_beliefs(0.6, 5_000));
    }
}
