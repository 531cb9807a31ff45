use super::regression::Regression;
use crate::history::history::History;
use crate::history::record::Record;
use crate::pareto::frontier::Frontier;
use crate::session::config::ControlPolicy;
use crate::session::config::DesirePolicy;
use crate::session::config::Fairness;
use crate::session::config::SurprisePolicy;
use crate::session::config::Thresholds;
use crate::Time;
use crate::Utility;

/// per-turn view over everything the appraisal variables read. built by
/// the session right after the opponent's offer lands; every signal is
/// a pure function of it.
pub struct Scene<'a> {
    /// opponent offers so far, scored by our own model.
    pub theirs: &'a History,
    pub frontier: &'a Frontier,
    pub reservation: Utility,
    /// the maximum utility achievable in the domain.
    pub aspiration: Utility,
    /// (min, max) own utility over the whole domain.
    pub bounds: (Utility, Utility),
    /// hypothesis-distribution movement caused by the last observation.
    pub drift: f64,
    pub time: Time,
}

impl Scene<'_> {
    fn current(&self) -> Utility {
        self.theirs.last().map(Record::mine).unwrap_or(0.)
    }
    /// what the standing offer is worth to us once projected onto the
    /// frontier at the opponent's estimated utility level; the raw bid
    /// utility when no frontier is available.
    fn obtained(&self) -> Utility {
        self.theirs
            .last()
            .and_then(|r| self.frontier.mine_at(r.theirs()))
            .unwrap_or_else(|| self.current())
    }
}

/// is the negotiation going somewhere we want it to go?
pub fn desirability(
    scene: &Scene,
    policy: DesirePolicy,
    fairness: Fairness,
    thresholds: &Thresholds,
) -> bool {
    let obtained = scene.obtained();
    match policy {
        DesirePolicy::Batna => obtained - scene.reservation > thresholds.desire,
        DesirePolicy::Max => scene.aspiration - obtained < thresholds.desire,
        DesirePolicy::Fair => {
            let fair = match fairness {
                Fairness::Nash => scene.frontier.nash().map(|o| o.mine),
                Fairness::Kalai => scene.frontier.kalai().map(|o| o.mine),
            }
            .unwrap_or(scene.reservation);
            obtained - fair > thresholds.desire
        }
    }
}

/// can we still steer the outcome toward our aspiration?
pub fn controllability(scene: &Scene, policy: ControlPolicy, thresholds: &Thresholds) -> bool {
    match policy {
        ControlPolicy::SingleShot => scene.aspiration - thresholds.distance < scene.current(),
        ControlPolicy::Decayed => decayed(scene, thresholds),
        ControlPolicy::Trend => trend(scene, thresholds),
    }
}

/// exponentially decayed satisfaction ratios per turn, discounted by
/// elapsed turns and offset by how far the standing offer still is
/// from the aspiration.
fn decayed(scene: &Scene, thresholds: &Thresholds) -> bool {
    let records = scene.theirs.records();
    let turns = records.len();
    if turns == 0 {
        return false;
    }
    let mut weights = 0.;
    let mut numerator = 0.;
    for (i, turn) in (0..turns).rev().enumerate() {
        let weight = 0.5f64.powi(i as i32);
        let satisfied = records[..=turn]
            .iter()
            .filter(|r| r.mine() >= scene.aspiration - thresholds.distance)
            .count() as f64;
        numerator += weight * satisfied / (turn + 1) as f64;
        weights += weight;
    }
    let ratio = numerator / weights;
    let discounted = ratio / (turns as f64).powf(thresholds.power);
    let gap = (scene.aspiration - scene.current()).max(0.);
    let score = discounted - thresholds.alpha * gap;
    let score = if score.is_nan() { 0. } else { score };
    score > thresholds.control
}

/// regression of opponent-offer utility (x) against turn index (y): if
/// the fit explains enough variance, project the utility the trend
/// reaches by the last expected turn and ask whether it lands within
/// reach of the aspiration. a weak fit falls back to [decayed].
fn trend(scene: &Scene, thresholds: &Thresholds) -> bool {
    let points = scene
        .theirs
        .records()
        .iter()
        .map(|r| (r.mine(), r.stamp().turn as f64))
        .collect::<Vec<_>>();
    let fit = Regression::from(points.as_slice());
    if fit.r_squared < thresholds.validity {
        return decayed(scene, thresholds);
    }
    let turns = points.len() as f64;
    let horizon = match scene.time > f64::EPSILON {
        true => turns / scene.time,
        false => turns + 1.,
    };
    let projected = fit.invert(horizon, scene.current());
    let (lo, hi) = scene.bounds;
    let normalized = match hi - lo > f64::EPSILON {
        true => ((projected - lo) / (hi - lo)).clamp(0., 1.),
        false => 0.,
    };
    let normalized = if normalized.is_nan() { 0. } else { normalized };
    (scene.aspiration - normalized).abs() <= thresholds.distance
}

/// did the last offer change our picture of the opponent?
pub fn unexpectedness(scene: &Scene, policy: SurprisePolicy, thresholds: &Thresholds) -> bool {
    match policy {
        SurprisePolicy::Drift => scene.drift > thresholds.surprise,
        SurprisePolicy::LogSurprise => {
            let best = scene.theirs.max().unwrap_or(0.);
            let slack = (best - scene.current()).max(0.);
            (1. + slack).ln() > thresholds.surprise
        }
    }
}
