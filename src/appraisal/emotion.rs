use serde::Deserialize;
use serde::Serialize;
use std::fmt::Display;
use std::fmt::Formatter;

/// discrete affective label derived from the three appraisal booleans
/// (desirable, controllable, unexpected). purely observational: the
/// session exposes it as a side channel and no strategy reads it back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Emotion {
    Joy,
    Surprise,
    Hope,
    Relief,
    Boredom,
    Disappointment,
    Distress,
    Fear,
}

impl From<(bool, bool, bool)> for Emotion {
    fn from((desirable, controllable, unexpected): (bool, bool, bool)) -> Self {
        match (desirable, controllable, unexpected) {
            (true, true, false) => Emotion::Joy,
            (true, true, true) => Emotion::Surprise,
            (true, false, false) => Emotion::Hope,
            (true, false, true) => Emotion::Relief,
            (false, true, false) => Emotion::Boredom,
            (false, true, true) => Emotion::Disappointment,
            (false, false, false) => Emotion::Distress,
            (false, false, true) => Emotion::Fear,
        }
    }
}

impl Display for Emotion {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_appraisal_combination_has_a_label() {
        let mut seen = Vec::new();
        for d in [false, true] {
            for c in [false, true] {
                for u in [false, true] {
                    seen.push(Emotion::from((d, c, u)));
                }
            }
        }
        seen.dedup();
        assert_eq!(seen.len(), 8);
    }

    #[test]
    fn welcome_and_steerable_is_joy() {
        assert_eq!(Emotion::from((true, true, false)), Emotion::Joy);
        assert_eq!(Emotion::from((false, false, true)), Emotion::Fear);
    }
}
