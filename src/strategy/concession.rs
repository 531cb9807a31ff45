use crate::history::history::History;
use crate::history::record::Record;
use crate::Time;
use crate::Utility;
use crate::LARGE_DOMAIN;

/// the opponent's earliest offers count as their starting point if they
/// land inside this opening slice of time.
const OPENING: Time = 0.01;

/// everything a concession rule may look at when picking the next
/// target utility.
pub struct Outlook<'a> {
    /// opponent offers so far, scored by our own model.
    pub theirs: &'a History,
    /// own utility at the Nash reference point.
    pub nash: Utility,
    /// the maximum utility achievable in the domain.
    pub aspiration: Utility,
    /// discount factor; 1 means delay is free.
    pub discount: Utility,
    pub time: Time,
    /// number of enumerable bids in the domain.
    pub size: usize,
}

/// converts elapsed time, discounting, and opponent behavior into a
/// target utility for the next offer. implementations are
/// interchangeable and selected by session configuration.
pub trait Concession: std::fmt::Debug {
    fn target(&self, outlook: &Outlook) -> Utility;
}

/// reciprocating rule: concede exactly as far toward the Nash reference
/// as the opponent has, plus a closing bonus that forces convergence
/// near the deadline or under heavy discounting. without the bonus the
/// agent can stall above the Nash point forever against a slow opponent.
#[derive(Debug, Default, Clone, Copy)]
pub struct TitForTat;

impl TitForTat {
    /// the minimum utility among the opponent's opening offers, or their
    /// very first offer when none fall inside the opening slice.
    fn baseline(theirs: &History) -> Utility {
        theirs
            .window(0., OPENING)
            .map(Record::mine)
            .min_by(f64::total_cmp)
            .or_else(|| theirs.first().map(Record::mine))
            .unwrap_or(0.)
    }
    /// how far the opponent has moved toward the Nash point: 0 not at
    /// all, 1 fully. a baseline already at or past the reference leaves
    /// no room to measure, which reads as no concession.
    fn factor(moved: Utility, room: Utility) -> Utility {
        match room > 0. {
            true => (moved / room).clamp(0., 1.),
            false => 0.,
        }
    }
    /// linear ramp from 0 to 1 across the closing stretch; large
    /// domains start ramping earlier since their searches take longer
    /// to converge.
    fn ramp(time: Time, size: usize) -> Utility {
        let (start, end) = match size > LARGE_DOMAIN {
            true => (0.85, 0.95),
            false => (0.91, 0.96),
        };
        ((time - start) / (end - start)).clamp(0., 1.)
    }
}

impl Concession for TitForTat {
    fn target(&self, outlook: &Outlook) -> Utility {
        let baseline = Self::baseline(outlook.theirs);
        let offered = outlook.theirs.max().unwrap_or(baseline);
        let moved = (offered - baseline).max(0.);
        let factor = Self::factor(moved, outlook.nash - baseline);
        let target = 1. - factor * (1. - outlook.nash);
        let gap = (target - outlook.nash).max(0.);
        let bonus = (0.5 - 0.4 * outlook.discount).max(Self::ramp(outlook.time, outlook.size));
        target - bonus * gap
    }
}

/// zero-intelligence base behavior: the aspiration, every turn.
#[derive(Debug, Default, Clone, Copy)]
pub struct Hardline;

impl Concession for Hardline {
    fn target(&self, outlook: &Outlook) -> Utility {
        outlook.aspiration
    }
}
