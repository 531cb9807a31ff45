use crate::domain::bid::Bid;
use crate::Utility;

/// a joint utility outcome for one bid: our side and the modeled
/// opponent side.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub bid: Bid,
    pub mine: Utility,
    pub theirs: Utility,
}

impl From<(Bid, Utility, Utility)> for Outcome {
    fn from((bid, mine, theirs): (Bid, Utility, Utility)) -> Self {
        Self { bid, mine, theirs }
    }
}

/// approximate Pareto frontier over a joint utility cloud: the outcomes
/// where neither side can gain without the other losing. stored sorted
/// by own utility descending, so opponent utility ascends along it.
#[derive(Debug, Clone, Default)]
pub struct Frontier(Vec<Outcome>);

impl Frontier {
    pub fn points(&self) -> &[Outcome] {
        &self.0
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// own utility on the frontier given the opponent's utility level:
    /// the best we can do while giving them at least that much. when no
    /// frontier point reaches the level, the most generous point wins.
    pub fn mine_at(&self, theirs: Utility) -> Option<Utility> {
        self.0
            .iter()
            .find(|o| o.theirs >= theirs)
            .or(self.0.last())
            .map(|o| o.mine)
    }

    /// Nash bargaining point: maximal product of both utilities.
    pub fn nash(&self) -> Option<&Outcome> {
        self.0
            .iter()
            .max_by(|a, b| (a.mine * a.theirs).total_cmp(&(b.mine * b.theirs)))
    }

    /// Kalai-Smorodinsky point: the frontier outcome closest to equal
    /// proportional gains against each side's best case.
    pub fn kalai(&self) -> Option<&Outcome> {
        let mine = self.0.iter().map(|o| o.mine).fold(0., f64::max);
        let theirs = self.0.iter().map(|o| o.theirs).fold(0., f64::max);
        if mine <= 0. || theirs <= 0. {
            return self.0.first();
        }
        self.0
            .iter()
            .min_by(|a, b| {
                let da = (a.mine / mine - a.theirs / theirs).abs();
                let db = (b.mine / mine - b.theirs / theirs).abs();
                da.total_cmp(&db)
            })
    }
}

impl From<Vec<Outcome>> for Frontier {
    /// sweep out dominated outcomes: sort by own utility descending and
    /// keep each point that strictly improves the opponent's side.
    fn from(mut cloud: Vec<Outcome>) -> Self {
        cloud.retain(|o| !o.mine.is_nan() && !o.theirs.is_nan());
        cloud.sort_by(|a, b| b.mine.total_cmp(&a.mine).then(b.theirs.total_cmp(&a.theirs)));
        let mut frontier = Vec::<Outcome>::new();
        let mut ceiling = f64::NEG_INFINITY;
        for outcome in cloud {
            if outcome.theirs > ceiling {
                ceiling = outcome.theirs;
                frontier.push(outcome);
            }
        }
        Self(frontier)
    }
}
