use crate::history::history::History;
use crate::history::record::Record;
use crate::session::error::EngineError;
use crate::Probability;
use crate::Time;
use crate::Utility;
use crate::LARGE_DOMAIN;
use crate::UTILITY_SLOP;
use rand::rngs::SmallRng;
use rand::Rng;

/// past this fraction of time the expected-value rule starts weighing
/// the standing offer against the value of waiting.
const DEADLINE: Time = 0.98;
/// trailing time window the expected-value rule looks back over.
const LOOKBACK: Time = 0.1;
/// while more better offers than this are still expected, holding out
/// always wins. large domains keep searching longer.
const EXPECTED_CAP: f64 = 10.;
const EXPECTED_CAP_LARGE: f64 = 40.;

/// the standing offer as one acceptance rule sees it.
pub struct Standing<'a> {
    /// our own undiscounted utility of the opponent's last bid.
    pub offered: Utility,
    /// our utility of the counter-offer we would make instead.
    pub planned: Utility,
    pub time: Time,
    /// opponent offers so far, scored by our own model.
    pub theirs: &'a History,
    /// number of enumerable bids in the domain.
    pub size: usize,
}

/// accept-vs-counter decision. implementations are interchangeable and
/// selected by session configuration.
pub trait Acceptance: std::fmt::Debug {
    fn accept(&self, standing: &Standing, rng: &mut SmallRng) -> Result<bool, EngineError>;
}

/// probability of accepting utility `u` at raw time `t1`. time is cubed
/// to sharpen the curve near the deadline; the curve itself has a
/// removable singularity at t = 0.5 where it returns `u` directly.
/// pure and idempotent: identical inputs give identical outputs.
pub fn accept_probability(u: Utility, t1: Time) -> Result<Probability, EngineError> {
    if !(0. ..=UTILITY_SLOP).contains(&u) || u.is_nan() {
        return Err(EngineError::UtilityOutOfRange(u));
    }
    if !(0. ..=1.).contains(&t1) || t1.is_nan() {
        return Err(EngineError::TimeOutOfRange(t1));
    }
    Ok(curve(u.min(1.), t1 * t1 * t1))
}

fn curve(u: Utility, t: Time) -> Probability {
    if (t - 0.5).abs() < f64::EPSILON {
        return u;
    }
    let root = ((t - 1.) * (t - 1.) + u * (2. * t - 1.)).max(0.).sqrt();
    (u - 2. * u * t + 2. * (t - 1. + root)) / (2. * t - 1.)
}

/// curve-following acceptance: draw once against [accept_probability],
/// so repeated runs differ unless the session rng is seeded.
#[derive(Debug, Default, Clone, Copy)]
pub struct Probabilistic;

impl Acceptance for Probabilistic {
    fn accept(&self, standing: &Standing, rng: &mut SmallRng) -> Result<bool, EngineError> {
        let p = accept_probability(standing.offered, standing.time)?;
        Ok(rng.random::<f64>() < p)
    }
}

/// deadline-aware acceptance: take any offer at least as good as our
/// own planned counter, refuse everything else until the deadline, and
/// past it accept whenever the standing offer beats the expected value
/// of waiting for a better one.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExpectedValue;

impl Acceptance for ExpectedValue {
    fn accept(&self, standing: &Standing, _: &mut SmallRng) -> Result<bool, EngineError> {
        if standing.offered >= standing.planned {
            return Ok(true);
        }
        if standing.time < DEADLINE {
            return Ok(false);
        }
        let left = (1. - standing.time).max(0.);
        let better = standing
            .theirs
            .window(standing.time - LOOKBACK, standing.time)
            .map(Record::mine)
            .filter(|&u| u > standing.offered)
            .collect::<Vec<_>>();
        let n = better.len() as f64;
        let cap = match standing.size > LARGE_DOMAIN {
            true => EXPECTED_CAP_LARGE,
            false => EXPECTED_CAP,
        };
        if n * left / LOOKBACK > cap {
            return Ok(false);
        }
        let p = (left / LOOKBACK).min(1.);
        let chance = 1. - (1. - p).powf(n);
        let mean = match better.is_empty() {
            true => 0.,
            false => better.iter().sum::<f64>() / n,
        };
        Ok(standing.offered > chance * mean)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bid::Bid;
    use crate::domain::issue::Issue;
    use crate::domain::value::Value;
    use crate::history::record::Stamp;
    use rand::SeedableRng;

    fn history(offers: &[(Utility, Time)]) -> History {
        let mut history = History::default();
        for (turn, (u, t)) in offers.iter().enumerate() {
            let bid = Bid::from_iter(vec![(Issue::from("records"), Value::from(turn as i64))]);
            history.push(Record::from((bid, *u, 1. - *u, Stamp::from((*t, turn)))));
        }
        history
    }
    fn standing(offered: Utility, planned: Utility, time: Time, theirs: &History) -> Standing<'_> {
        Standing {
            offered,
            planned,
            time,
            theirs,
            size: 24,
        }
    }

    #[test]
    fn curve_is_finite_everywhere() {
        for i in 0..=20 {
            for j in 0..=20 {
                let u = i as f64 / 20.;
                let t = j as f64 / 20.;
                let p = accept_probability(u, t).unwrap();
                assert!(p.is_finite(), "u={} t={} p={}", u, t, p);
            }
        }
    }

    #[test]
    fn curve_returns_u_at_the_singularity() {
        for i in 0..=10 {
            let u = i as f64 / 10.;
            assert_eq!(curve(u, 0.5), u);
        }
    }

    #[test]
    fn out_of_range_arguments_are_rejected() {
        assert!(accept_probability(1.2, 0.5).is_err());
        assert!(accept_probability(0.5, 1.5).is_err());
        assert!(accept_probability(-0.1, 0.5).is_err());
        assert!(accept_probability(0.5, -0.1).is_err());
    }

    #[test]
    fn slop_above_one_is_clamped_not_rejected() {
        let a = accept_probability(1.04, 0.3).unwrap();
        let b = accept_probability(1.0, 0.3).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn identical_inputs_give_identical_outputs() {
        let a = accept_probability(0.62, 0.87).unwrap();
        let b = accept_probability(0.62, 0.87).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn probabilistic_draw_is_seeded() {
        let theirs = history(&[(0.5, 0.5)]);
        let standing = standing(0.5, 0.9, 0.5, &theirs);
        let a = {
            let mut rng = SmallRng::seed_from_u64(3);
            Probabilistic.accept(&standing, &mut rng).unwrap()
        };
        let b = {
            let mut rng = SmallRng::seed_from_u64(3);
            Probabilistic.accept(&standing, &mut rng).unwrap()
        };
        assert_eq!(a, b);
    }

    #[test]
    fn expected_value_takes_offers_beating_the_plan() {
        let theirs = history(&[(0.7, 0.2)]);
        let mut rng = SmallRng::seed_from_u64(0);
        let standing = standing(0.7, 0.65, 0.2, &theirs);
        assert!(ExpectedValue.accept(&standing, &mut rng).unwrap());
    }

    #[test]
    fn expected_value_holds_out_before_the_deadline() {
        let theirs = history(&[(0.4, 0.5)]);
        let mut rng = SmallRng::seed_from_u64(0);
        let standing = standing(0.4, 0.8, 0.5, &theirs);
        assert!(!ExpectedValue.accept(&standing, &mut rng).unwrap());
    }

    #[test]
    fn expected_value_settles_when_nothing_better_is_coming() {
        // no strictly better offer in the window: waiting is worth zero.
        let theirs = history(&[(0.3, 0.95), (0.35, 0.97), (0.4, 0.99)]);
        let mut rng = SmallRng::seed_from_u64(0);
        let standing = standing(0.4, 0.8, 0.99, &theirs);
        assert!(ExpectedValue.accept(&standing, &mut rng).unwrap());
    }

    #[test]
    fn expected_value_waits_while_better_offers_flow() {
        // plenty of strictly better offers just went by; expected value
        // of waiting dwarfs the standing one.
        let offers = (0..8)
            .map(|i| (0.8 + 0.01 * i as f64, 0.9 + 0.01 * i as f64))
            .collect::<Vec<_>>();
        let theirs = history(&offers);
        let mut rng = SmallRng::seed_from_u64(0);
        let standing = standing(0.1, 0.9, 0.985, &theirs);
        assert!(!ExpectedValue.accept(&standing, &mut rng).unwrap());
    }
}
