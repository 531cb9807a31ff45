use serde::Deserialize;
use serde::Serialize;
use std::fmt::Display;
use std::fmt::Formatter;

/// which of a symmetric pair of agents this session is. assigned by the
/// external harness at session start; selects label-dependent scoring
/// tables and nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgentLabel {
    A,
    B,
}

impl Display for AgentLabel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            AgentLabel::A => write!(f, "A"),
            AgentLabel::B => write!(f, "B"),
        }
    }
}

/// accept-vs-counter rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AcceptRule {
    /// draw against the closed-form time/utility curve.
    Probabilistic,
    /// deadline-aware comparison against the expected value of waiting.
    ExpectedValue,
}

/// target-utility rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConcessionRule {
    /// reciprocate the opponent's movement toward the Nash reference.
    TitForTat,
    /// never move off the aspiration.
    Hardline,
}

/// how the desirability appraisal scores the standing offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DesirePolicy {
    /// against the reservation value.
    Batna,
    /// against the distance from the aspiration.
    Max,
    /// against a fair point on the frontier.
    Fair,
}

/// which frontier point counts as fair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Fairness {
    Nash,
    Kalai,
}

/// how the controllability appraisal reads the history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlPolicy {
    /// the opponent's last bid alone.
    SingleShot,
    /// exponentially decayed satisfaction ratios per turn.
    Decayed,
    /// regression over the full history, falling back to Decayed when
    /// the fit explains too little variance.
    Trend,
}

/// how the unexpectedness appraisal measures surprise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurprisePolicy {
    /// drift of the hypothesis distribution.
    Drift,
    /// log of the slack between the best and current offer.
    LogSurprise,
}

/// appraisal tuning. every knob is a plain threshold so a harness can
/// sweep them from configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Thresholds {
    /// margin the desirability comparison must clear.
    pub desire: f64,
    /// score the decayed controllability ratio must clear.
    pub control: f64,
    /// drift or log-surprise level that counts as unexpected.
    pub surprise: f64,
    /// minimum r-squared before the regression branch is trusted.
    pub validity: f64,
    /// acceptable utility gap to the aspiration.
    pub distance: f64,
    /// weight of the distance-to-aspiration offset in the decayed ratio.
    pub alpha: f64,
    /// exponent discounting the decayed ratio by elapsed turns.
    pub power: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            desire: 0.05,
            control: 0.05,
            surprise: 0.1,
            validity: 0.8,
            distance: 0.2,
            alpha: 0.25,
            power: 0.5,
        }
    }
}

/// everything a session needs decided before the first turn. the label
/// and seed come from the harness; the policy selections pick one
/// implementation per strategy seam.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SessionConfig {
    pub label: AgentLabel,
    /// fixed seed for bit-identical replays; fresh entropy otherwise.
    pub seed: Option<u64>,
    pub accept: AcceptRule,
    pub concession: ConcessionRule,
    pub desire: DesirePolicy,
    pub fairness: Fairness,
    pub control: ControlPolicy,
    pub surprise: SurprisePolicy,
    pub thresholds: Thresholds,
}

impl SessionConfig {
    pub fn with_label(mut self, label: AgentLabel) -> Self {
        self.label = label;
        self
    }
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            label: AgentLabel::A,
            seed: None,
            accept: AcceptRule::ExpectedValue,
            concession: ConcessionRule::TitForTat,
            desire: DesirePolicy::Batna,
            fairness: Fairness::Nash,
            control: ControlPolicy::Trend,
            surprise: SurprisePolicy::Drift,
            thresholds: Thresholds::default(),
        }
    }
}
