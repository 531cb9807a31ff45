use crate::Arbitrary;
use serde::Deserialize;
use serde::Serialize;
use std::fmt::Display;
use std::fmt::Formatter;

/// a concrete assignment for a single issue. Amount covers integer
/// allocation issues (how many of something each side keeps), Discrete
/// covers everything else.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Value {
    Discrete(String),
    Amount(i64),
}

impl Value {
    /// integer magnitude, if this value has one.
    pub fn amount(&self) -> Option<i64> {
        match self {
            Self::Amount(n) => Some(*n),
            Self::Discrete(_) => None,
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Amount(n)
    }
}
impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Discrete(s.to_string())
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Discrete(s) => write!(f, "{}", s),
            Self::Amount(n) => write!(f, "{}", n),
        }
    }
}

impl Arbitrary for Value {
    fn random() -> Self {
        Self::Amount((rand::random::<u8>() % 4) as i64)
    }
}
