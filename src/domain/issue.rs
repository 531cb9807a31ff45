use crate::Arbitrary;
use serde::Deserialize;
use serde::Serialize;
use std::fmt::Display;
use std::fmt::Formatter;

/// a negotiable issue, identified by name.
/// ordering is lexicographic so issues can key a [std::collections::BTreeMap].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Issue(String);

impl Issue {
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Issue {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}
impl From<String> for Issue {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl Display for Issue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Arbitrary for Issue {
    fn random() -> Self {
        Self(format!("issue-{}", rand::random::<u16>()))
    }
}
