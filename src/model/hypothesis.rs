use crate::domain::bid::Bid;
use crate::domain::issue::Issue;
use crate::domain::value::Value;
use crate::session::error::EngineError;
use crate::Probability;

/// the six orderings of three tracked issues by opponent priority,
/// most important first. entries index into the tracked issue list.
const ORDERINGS: [[usize; 3]; 6] = [
    [0, 1, 2],
    [0, 2, 1],
    [1, 0, 2],
    [1, 2, 0],
    [2, 0, 1],
    [2, 1, 0],
];

/// tier factors applied to the hypotheses that rank the observed issue
/// first, middle, and last. STRONG for offers at the extremes of an
/// issue's range, WEAK for offers nearer the middle.
const STRONG: [f64; 3] = [3., 2., 1.];
const WEAK: [f64; 3] = [2., 1.5, 1.];

/// coarse opponent belief: a probability mass function over the six
/// priority orderings of three tracked issues. an opponent who keeps
/// most of an issue for themselves probably ranks it high, so each
/// observed offer multiplies the mass of favored hypotheses and divides
/// disfavored ones by a tiered factor, renormalizing after every issue.
///
/// the mass vector is snapshotted before each observation; the Euclidean
/// distance between snapshot and current mass is the belief drift that
/// feeds unexpectedness.
#[derive(Debug, Clone)]
pub struct Hypotheses {
    issues: Vec<(Issue, Vec<Value>)>,
    mass: [Probability; 6],
    prior: [Probability; 6],
}

impl Hypotheses {
    const UNIFORM: [Probability; 6] = [1. / 6.; 6];

    /// start from a favored ordering holding mass p, the rest sharing
    /// the remainder evenly.
    pub fn biased(favored: usize, p: Probability) -> Self {
        let favored = favored % ORDERINGS.len();
        let rest = (1. - p) / (ORDERINGS.len() - 1) as Probability;
        let mut mass = [rest; 6];
        mass[favored] = p;
        Self {
            issues: Vec::new(),
            mass,
            prior: mass,
        }
    }

    pub fn distribution(&self) -> &[Probability; 6] {
        &self.mass
    }

    /// index of the currently most probable ordering.
    pub fn leader(&self) -> usize {
        self.mass
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    /// fold one observed offer into the distribution. updates only fire
    /// when three issues are tracked; a malformed value restores the
    /// pre-observation mass and surfaces the error to the caller.
    pub fn observe(&mut self, bid: &Bid) -> Result<(), EngineError> {
        self.prior = self.mass;
        if self.issues.len() < 3 {
            return Ok(());
        }
        for position in 0..3 {
            if let Err(e) = self.update(bid, position) {
                self.mass = self.prior;
                return Err(e);
            }
            self.normalize();
        }
        Ok(())
    }

    /// Euclidean distance between the current distribution and the one
    /// before the last observation.
    pub fn drift(&self) -> f64 {
        self.mass
            .iter()
            .zip(self.prior.iter())
            .map(|(a, b)| (a - b) * (a - b))
            .sum::<f64>()
            .sqrt()
    }

    fn update(&mut self, bid: &Bid, position: usize) -> Result<(), EngineError> {
        let (issue, range) = &self.issues[position];
        let value = bid
            .value(issue)
            .ok_or_else(|| EngineError::MalformedBid(bid.to_string()))?;
        let index = range
            .iter()
            .position(|v| v == value)
            .ok_or_else(|| EngineError::MalformedBid(bid.to_string()))?;
        let fraction = match range.len() {
            0 | 1 => 0.,
            n => index as f64 / (n - 1) as f64,
        };
        // low fraction: the opponent kept most of this issue, evidence
        // that they rank it high. high fraction: evidence against.
        let favoring = fraction < 0.5;
        let tiers = match favoring {
            true if fraction <= 0.25 => STRONG,
            true => WEAK,
            false if fraction > 0.75 => STRONG,
            false => WEAK,
        };
        for (h, ordering) in ORDERINGS.iter().enumerate() {
            let rank = ordering
                .iter()
                .position(|&i| i == position)
                .expect("orderings are permutations");
            let factor = tiers[rank];
            self.mass[h] = match favoring {
                true => self.mass[h] * factor,
                false => self.mass[h] / factor,
            };
        }
        Ok(())
    }

    fn normalize(&mut self) {
        let sum = self.mass.iter().sum::<Probability>();
        if sum <= 0. || sum.is_nan() {
            self.mass = Self::UNIFORM;
        } else {
            for p in self.mass.iter_mut() {
                *p /= sum;
            }
        }
    }
}

impl From<Vec<(Issue, Vec<Value>)>> for Hypotheses {
    /// track the first three issues handed in, each with its full value
    /// range in ascending order.
    fn from(mut issues: Vec<(Issue, Vec<Value>)>) -> Self {
        issues.truncate(3);
        for (_, range) in issues.iter_mut() {
            range.sort();
            range.dedup();
        }
        Self {
            issues,
            mass: Self::UNIFORM,
            prior: Self::UNIFORM,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issues() -> Vec<(Issue, Vec<Value>)> {
        vec![
            (
                Issue::from("records"),
                (0..=3).map(Value::from).collect::<Vec<_>>(),
            ),
            (
                Issue::from("lamps"),
                (0..=2).map(Value::from).collect::<Vec<_>>(),
            ),
            (
                Issue::from("paintings"),
                (0..=1).map(Value::from).collect::<Vec<_>>(),
            ),
        ]
    }
    fn bid(records: i64, lamps: i64, paintings: i64) -> Bid {
        Bid::from_iter(vec![
            (Issue::from("records"), Value::from(records)),
            (Issue::from("lamps"), Value::from(lamps)),
            (Issue::from("paintings"), Value::from(paintings)),
        ])
    }

    #[test]
    fn mass_sums_to_one_after_any_updates() {
        let mut belief = Hypotheses::from(issues());
        for i in 0..50i64 {
            belief.observe(&bid(i % 4, i % 3, i % 2)).unwrap();
            let sum = belief.distribution().iter().sum::<Probability>();
            assert!((sum - 1.).abs() < 1e-9, "{}", sum);
        }
    }

    #[test]
    fn hoarding_an_issue_promotes_it() {
        let mut belief = Hypotheses::from(issues());
        for _ in 0..5 {
            belief.observe(&bid(0, 2, 1)).unwrap();
        }
        // records held back, everything else given away: the two
        // records-first orderings should dominate.
        let mass = belief.distribution();
        assert!(mass[0] + mass[1] > 0.8, "{:?}", mass);
    }

    #[test]
    fn drift_tracks_surprise() {
        // a saturated distribution barely moves, so prime with only a
        // couple of consistent offers before splitting the timelines.
        let mut belief = Hypotheses::from(issues());
        for _ in 0..2 {
            belief.observe(&bid(0, 2, 1)).unwrap();
        }
        let mut steady = belief.clone();
        steady.observe(&bid(0, 2, 1)).unwrap();
        belief.observe(&bid(3, 0, 0)).unwrap();
        assert!(belief.drift() > 0.05, "{}", belief.drift());
        assert!(belief.drift() > steady.drift());
    }

    #[test]
    fn malformed_value_leaves_belief_unchanged() {
        let mut belief = Hypotheses::from(issues());
        belief.observe(&bid(0, 2, 1)).unwrap();
        let before = *belief.distribution();
        let odd = Bid::from_iter(vec![(Issue::from("records"), Value::from(99))]);
        assert!(belief.observe(&odd).is_err());
        assert_eq!(&before, belief.distribution());
        assert_eq!(belief.drift(), 0.);
    }

    #[test]
    fn biased_start_is_normalized() {
        let belief = Hypotheses::biased(2, 0.5);
        let sum = belief.distribution().iter().sum::<Probability>();
        assert!((sum - 1.).abs() < 1e-9);
        assert_eq!(belief.leader(), 2);
    }
}
