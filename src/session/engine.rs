use super::action::Action;
use super::clock::Clock;
use super::config::AcceptRule;
use super::config::AgentLabel;
use super::config::ConcessionRule;
use super::config::SessionConfig;
use crate::appraisal::emotion::Emotion;
use crate::appraisal::entropy;
use crate::appraisal::signal;
use crate::appraisal::signal::Scene;
use crate::domain::bid::Bid;
use crate::domain::issue::Issue;
use crate::domain::preference::Preferences;
use crate::domain::value::Value;
use crate::history::history::History;
use crate::history::record::Record;
use crate::model::frequency::Frequencies;
use crate::model::hypothesis::Hypotheses;
use crate::pareto::nash::can_update_beliefs;
use crate::pareto::nash::Nash;
use crate::strategy::acceptance::Acceptance;
use crate::strategy::acceptance::ExpectedValue;
use crate::strategy::acceptance::Probabilistic;
use crate::strategy::acceptance::Standing;
use crate::strategy::concession::Concession;
use crate::strategy::concession::Hardline;
use crate::strategy::concession::Outlook;
use crate::strategy::concession::TitForTat;
use crate::strategy::selector::Selector;
use crate::Utility;
use crate::WALKAWAY_MARGIN;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::collections::BTreeMap;

/// one side of a bilateral negotiation. owns every piece of mutable
/// state exclusively: histories, beliefs, the cached Nash reference,
/// the rng. no two sessions share anything, so a process can host a
/// whole tournament of them without locking.
///
/// the turn protocol: the transport advances the clock, hands over the
/// opponent's action, and gets exactly one action back. an opponent
/// Accept or EndNegotiation closes the session and yields None.
pub struct Session<P: Preferences> {
    preferences: P,
    config: SessionConfig,
    clock: Clock,
    /// our own offers, scored by our model and the opponent estimate.
    mine: History,
    /// opponent offers, scored the same way.
    theirs: History,
    frequencies: Frequencies,
    hypotheses: Hypotheses,
    nash: Nash,
    selector: Selector,
    acceptance: Box<dyn Acceptance>,
    concession: Box<dyn Concession>,
    rng: SmallRng,
    emotion: Option<Emotion>,
    entropies: Vec<f64>,
    /// (min, max) own utility over the whole domain.
    bounds: (Utility, Utility),
    done: bool,
}

impl<P: Preferences> Session<P> {
    pub fn new(preferences: P, config: SessionConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };
        let selector = Selector::from(&preferences);
        let bounds = selector.bounds();
        let hypotheses = Hypotheses::from(Self::ranges(&preferences));
        let acceptance: Box<dyn Acceptance> = match config.accept {
            AcceptRule::Probabilistic => Box::new(Probabilistic),
            AcceptRule::ExpectedValue => Box::new(ExpectedValue),
        };
        let concession: Box<dyn Concession> = match config.concession {
            ConcessionRule::TitForTat => Box::new(TitForTat),
            ConcessionRule::Hardline => Box::new(Hardline),
        };
        Self {
            preferences,
            config,
            clock: Clock::default(),
            mine: History::default(),
            theirs: History::default(),
            frequencies: Frequencies::default(),
            hypotheses,
            nash: Nash::default(),
            selector,
            acceptance,
            concession,
            rng,
            emotion: None,
            entropies: Vec::new(),
            bounds,
            done: false,
        }
    }

    pub fn label(&self) -> AgentLabel {
        self.config.label
    }
    pub fn preferences(&self) -> &P {
        &self.preferences
    }
    pub fn clock(&self) -> &Clock {
        &self.clock
    }
    pub fn done(&self) -> bool {
        self.done
    }
    /// the affective label computed on the last opponent offer. a side
    /// channel: nothing in the bidding loop reads it back.
    pub fn emotion(&self) -> Option<Emotion> {
        self.emotion
    }
    /// per-turn Shannon entropy of everything the opponent has offered.
    pub fn entropies(&self) -> &[f64] {
        &self.entropies
    }

    /// the transport owns real time; it reports elapsed fractions here
    /// before each of our turns.
    pub fn advance(&mut self, time: f64) {
        self.clock.advance(time);
    }

    /// our opening move, when we speak first: the aspiration bid.
    pub fn open(&mut self) -> Action {
        let bid = self.preferences.best();
        self.propose(bid)
    }

    /// one full turn. None once the table has closed.
    pub fn respond(&mut self, action: &Action) -> Option<Action> {
        if self.done {
            return None;
        }
        match action {
            Action::Accept | Action::EndNegotiation => {
                self.done = true;
                None
            }
            Action::Offer(bid) => Some(self.counter(bid)),
        }
    }

    fn counter(&mut self, bid: &Bid) -> Action {
        let time = self.clock.time();
        let size = self.preferences.size();
        let offered = self.preferences.utility(bid);
        let estimate = self.frequencies.estimate(bid);
        self.theirs
            .push(Record::from((bid.clone(), offered, estimate, self.clock.stamp())));
        if can_update_beliefs(time, size) {
            if let Err(e) = self.frequencies.observe(bid) {
                log::warn!("frequency update failed, keeping prior belief: {}", e);
            }
            if let Err(e) = self.hypotheses.observe(bid) {
                log::warn!("hypothesis update failed, keeping prior belief: {}", e);
            }
        }
        self.entropies.push(entropy::shannon(&self.theirs));
        self.appraise();
        if can_update_beliefs(time, size) {
            self.nash.refresh(&self.preferences, &self.frequencies);
        }
        let gap = (self.bounds.1 - self.theirs.max().unwrap_or(0.)).max(0.);
        let nash = self.nash.estimate(gap);
        let target = self.concession.target(&Outlook {
            theirs: &self.theirs,
            nash,
            aspiration: self.bounds.1,
            discount: self.preferences.discount(),
            time,
            size,
        });
        log::debug!(
            "{} t={:.3} offered={:.3} nash={:.3} target={:.3}",
            self.config.label,
            time,
            offered,
            nash,
            target
        );
        let planned = match self.selector.select(target, &self.frequencies, &mut self.rng) {
            Ok(planned) => planned,
            Err(e) => {
                log::warn!("{}, ending negotiation", e);
                self.done = true;
                return Action::EndNegotiation;
            }
        };
        let (planned, utility) = Selector::appropriate(planned, &self.theirs);
        if utility < self.preferences.reservation() + WALKAWAY_MARGIN {
            log::info!(
                "{} best reachable {:.3} under reservation {:.3}, walking away",
                self.config.label,
                utility,
                self.preferences.reservation()
            );
            self.done = true;
            return Action::EndNegotiation;
        }
        let standing = Standing {
            offered,
            planned: utility,
            time,
            theirs: &self.theirs,
            size,
        };
        match self.acceptance.accept(&standing, &mut self.rng) {
            Ok(true) => {
                self.done = true;
                Action::Accept
            }
            Ok(false) => self.propose(planned),
            Err(e) => {
                // a validation failure aborts this decision; repeating
                // our last own bid is always a safe fallback.
                log::warn!("acceptance aborted: {}", e);
                let repeat = self
                    .mine
                    .last()
                    .map(|r| r.bid().clone())
                    .unwrap_or_else(|| self.preferences.best());
                self.propose(repeat)
            }
        }
    }

    fn propose(&mut self, bid: Bid) -> Action {
        let mine = self.preferences.utility(&bid);
        let theirs = self.frequencies.estimate(&bid);
        self.mine
            .push(Record::from((bid.clone(), mine, theirs, self.clock.stamp())));
        Action::Offer(bid)
    }

    fn appraise(&mut self) {
        let (desirable, controllable, unexpected) = {
            let scene = Scene {
                theirs: &self.theirs,
                frontier: self.nash.frontier(),
                reservation: self.preferences.reservation(),
                aspiration: self.bounds.1,
                bounds: self.bounds,
                drift: self.hypotheses.drift(),
                time: self.clock.time(),
            };
            (
                signal::desirability(
                    &scene,
                    self.config.desire,
                    self.config.fairness,
                    &self.config.thresholds,
                ),
                signal::controllability(&scene, self.config.control, &self.config.thresholds),
                signal::unexpectedness(&scene, self.config.surprise, &self.config.thresholds),
            )
        };
        let emotion = Emotion::from((desirable, controllable, unexpected));
        log::trace!(
            "{} appraisal d={} c={} u={} -> {}",
            self.config.label,
            desirable,
            controllable,
            unexpected,
            emotion
        );
        self.emotion = Some(emotion);
    }

    /// every issue with its observed value range, for the hypothesis
    /// belief to track.
    fn ranges(preferences: &P) -> Vec<(Issue, Vec<Value>)> {
        let mut ranges = BTreeMap::<Issue, Vec<Value>>::new();
        for bid in preferences.bids() {
            for (issue, value) in bid.entries() {
                let range = ranges.entry(issue.clone()).or_default();
                if !range.contains(value) {
                    range.push(value.clone());
                }
            }
        }
        ranges.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::preference::LinearPreferences;

    fn session(label: AgentLabel, seed: u64) -> Session<LinearPreferences> {
        let config = SessionConfig::default().with_label(label).with_seed(seed);
        Session::new(LinearPreferences::scored(label), config)
    }

    /// run two sessions against each other to the deadline, collecting
    /// every action exchanged.
    fn run(seed: u64, turns: usize) -> Vec<Action> {
        let mut a = session(AgentLabel::A, seed);
        let mut b = session(AgentLabel::B, seed + 1);
        let mut trace = Vec::new();
        a.advance(0.);
        let mut action = a.open();
        trace.push(action.clone());
        for turn in 1..=turns {
            let time = turn as f64 / turns as f64;
            let (speaker, listener) = match turn % 2 {
                1 => (&mut b, &mut a),
                _ => (&mut a, &mut b),
            };
            speaker.advance(time);
            match speaker.respond(&action) {
                Some(next) => {
                    action = next;
                    trace.push(action.clone());
                }
                None => break,
            }
            if !matches!(action, Action::Offer(_)) {
                listener.advance(time);
                listener.respond(&action);
                break;
            }
        }
        trace
    }

    #[test]
    fn negotiation_reaches_agreement_before_the_deadline() {
        let trace = run(42, 200);
        assert!(
            matches!(trace.last(), Some(Action::Accept)),
            "{:?}",
            trace.last()
        );
        assert!(trace.len() <= 201);
    }

    #[test]
    fn seeded_negotiations_replay_bit_identically() {
        let a = run(7, 60);
        let b = run(7, 60);
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_may_diverge_without_crashing() {
        // not asserting inequality: both runs just have to terminate.
        let a = run(1, 60);
        let b = run(2, 60);
        assert!(!a.is_empty());
        assert!(!b.is_empty());
    }

    #[test]
    fn opponent_accept_closes_the_session() {
        let mut a = session(AgentLabel::A, 0);
        a.advance(0.);
        let _ = a.open();
        a.advance(0.1);
        assert_eq!(a.respond(&Action::Accept), None);
        assert!(a.done());
        assert_eq!(a.respond(&Action::Accept), None);
    }

    #[test]
    fn emotion_is_computed_but_never_strategic() {
        let mut a = session(AgentLabel::A, 3);
        assert!(a.emotion().is_none());
        a.advance(0.1);
        let offer = LinearPreferences::scored(AgentLabel::B).best();
        let _ = a.respond(&Action::Offer(offer));
        assert!(a.emotion().is_some());
        assert_eq!(a.entropies().len(), 1);
    }

    #[test]
    fn first_own_turn_proposes_the_aspiration() {
        let mut a = session(AgentLabel::A, 5);
        a.advance(0.);
        match a.open() {
            Action::Offer(bid) => {
                assert_eq!(a.preferences().utility(&bid), 1.0);
            }
            action => panic!("{:?}", action),
        }
    }

    #[test]
    fn unreachable_reservation_walks_away() {
        let preferences =
            LinearPreferences::scored(AgentLabel::A).with_reservation(2.0);
        let config = SessionConfig::default().with_seed(9);
        let mut a = Session::new(preferences, config);
        a.advance(0.1);
        let offer = LinearPreferences::scored(AgentLabel::B).best();
        assert_eq!(
            a.respond(&Action::Offer(offer)),
            Some(Action::EndNegotiation)
        );
        assert!(a.done());
    }
}
