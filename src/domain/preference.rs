use super::bid::Bid;
use super::issue::Issue;
use super::value::Value;
use crate::session::config::AgentLabel;
use crate::Arbitrary;
use crate::Utility;

/// the utility model seam. the engine never owns preference data;
/// it consumes this contract, typically backed by a parsed profile
/// in the harness. implementations must keep utilities in [0, 1]
/// and enumeration finite and restartable.
pub trait Preferences {
    /// scalar preference for a bid, in [0, 1].
    fn utility(&self, bid: &Bid) -> Utility;
    /// utility of walking away (BATNA), undiscounted.
    fn reservation(&self) -> Utility;
    /// discount factor in [0, 1]. 1 means delay is free.
    fn discount(&self) -> Utility;
    /// the aspiration bid: argmax of utility over the domain.
    fn best(&self) -> Bid;
    /// the whole bid space. may be in the hundreds of thousands.
    fn bids(&self) -> Vec<Bid>;
    /// number of enumerable bids.
    fn size(&self) -> usize {
        self.bids().len()
    }
}

/// one issue's contribution to a linear profile: candidate values with
/// raw scores, plus a relative weight against the other issues.
#[derive(Debug, Clone)]
pub struct Scale {
    issue: Issue,
    weight: f64,
    levels: Vec<(Value, f64)>,
}

impl Scale {
    fn top(&self) -> f64 {
        self.levels.iter().map(|(_, s)| *s).fold(0., f64::max)
    }
    fn score(&self, value: &Value) -> f64 {
        self.levels
            .iter()
            .find(|(v, _)| v == value)
            .map(|(_, s)| *s)
            .unwrap_or(0.)
    }
}

impl From<(Issue, f64, Vec<(Value, f64)>)> for Scale {
    fn from((issue, weight, levels): (Issue, f64, Vec<(Value, f64)>)) -> Self {
        Self {
            issue,
            weight,
            levels,
        }
    }
}

/// additive linear utility over discrete issues, normalized so the
/// aspiration bid scores exactly 1.
#[derive(Debug, Clone)]
pub struct LinearPreferences {
    scales: Vec<Scale>,
    reservation: Utility,
    discount: Utility,
}

impl LinearPreferences {
    /// the demo scoring tables. a bid counts how many of each item A
    /// keeps, so A scores amounts ascending and B descending; mirrored
    /// issue weights make the two sides want different things from the
    /// same pool.
    pub fn scored(label: AgentLabel) -> Self {
        let (records, lamps, paintings) = match label {
            AgentLabel::A => (20., 10., 5.),
            AgentLabel::B => (10., 30., 5.),
        };
        Self::from((
            vec![
                Scale::from((Issue::from("records"), records, Self::amounts(3, label))),
                Scale::from((Issue::from("lamps"), lamps, Self::amounts(2, label))),
                Scale::from((Issue::from("paintings"), paintings, Self::amounts(1, label))),
            ],
            0.,
            1.,
        ))
    }
    pub fn with_reservation(mut self, reservation: Utility) -> Self {
        self.reservation = reservation;
        self
    }
    pub fn with_discount(mut self, discount: Utility) -> Self {
        self.discount = discount;
        self
    }
    fn amounts(max: i64, label: AgentLabel) -> Vec<(Value, f64)> {
        (0..=max)
            .map(|n| {
                let score = match label {
                    AgentLabel::A => n,
                    AgentLabel::B => max - n,
                };
                (Value::from(n), score as f64)
            })
            .collect()
    }
}

impl From<(Vec<Scale>, Utility, Utility)> for LinearPreferences {
    fn from((scales, reservation, discount): (Vec<Scale>, Utility, Utility)) -> Self {
        Self {
            scales,
            reservation,
            discount,
        }
    }
}

impl Preferences for LinearPreferences {
    fn utility(&self, bid: &Bid) -> Utility {
        let denom = self.scales.iter().map(|s| s.weight).sum::<f64>();
        if denom <= 0. {
            return 0.;
        }
        let total = self
            .scales
            .iter()
            .map(|scale| {
                let top = scale.top();
                match bid.value(&scale.issue) {
                    Some(value) if top > 0. => scale.weight * scale.score(value) / top,
                    _ => 0.,
                }
            })
            .sum::<f64>();
        let utility = total / denom;
        if utility.is_nan() {
            0.
        } else {
            utility.clamp(0., 1.)
        }
    }
    fn reservation(&self) -> Utility {
        self.reservation
    }
    fn discount(&self) -> Utility {
        self.discount
    }
    fn best(&self) -> Bid {
        self.scales
            .iter()
            .map(|scale| {
                let value = scale
                    .levels
                    .iter()
                    .max_by(|(_, a), (_, b)| a.total_cmp(b))
                    .map(|(v, _)| v.clone())
                    .unwrap_or(Value::from(0));
                (scale.issue.clone(), value)
            })
            .collect()
    }
    fn bids(&self) -> Vec<Bid> {
        let mut partials = vec![Vec::<(Issue, Value)>::new()];
        for scale in self.scales.iter() {
            partials = partials
                .into_iter()
                .flat_map(|partial| {
                    scale.levels.iter().map(move |(value, _)| {
                        let mut next = partial.clone();
                        next.push((scale.issue.clone(), value.clone()));
                        next
                    })
                })
                .collect();
        }
        partials.into_iter().map(Bid::from_iter).collect()
    }
    fn size(&self) -> usize {
        self.scales.iter().map(|s| s.levels.len().max(1)).product()
    }
}

impl Arbitrary for LinearPreferences {
    fn random() -> Self {
        let scales = (0..3)
            .map(|_| {
                let n = 2 + (rand::random::<u8>() % 3) as i64;
                Scale::from((
                    Issue::random(),
                    0.1 + rand::random::<f64>(),
                    (0..=n)
                        .map(|k| (Value::from(k), rand::random::<f64>()))
                        .collect::<Vec<_>>(),
                ))
            })
            .collect::<Vec<_>>();
        Self::from((scales, 0., 1.))
    }
}
