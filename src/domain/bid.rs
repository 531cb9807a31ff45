use super::issue::Issue;
use super::value::Value;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Display;
use std::fmt::Formatter;

/// a complete assignment of values to all negotiable issues.
/// equality is structural; ordering is lexicographic over the
/// underlying map so bids can key maps and be deduplicated.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Bid(BTreeMap<Issue, Value>);

impl Bid {
    pub fn value(&self, issue: &Issue) -> Option<&Value> {
        self.0.get(issue)
    }
    pub fn issues(&self) -> impl Iterator<Item = &Issue> {
        self.0.keys()
    }
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.0.values()
    }
    pub fn entries(&self) -> impl Iterator<Item = (&Issue, &Value)> {
        self.0.iter()
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<BTreeMap<Issue, Value>> for Bid {
    fn from(map: BTreeMap<Issue, Value>) -> Self {
        Self(map)
    }
}

impl FromIterator<(Issue, Value)> for Bid {
    fn from_iter<T: IntoIterator<Item = (Issue, Value)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Display for Bid {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (i, (issue, value)) in self.0.iter().enumerate() {
            match i {
                0 => write!(f, "{}: {}", issue, value)?,
                _ => write!(f, ", {}: {}", issue, value)?,
            }
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_is_structural() {
        let a = Bid::from_iter(vec![
            (Issue::from("records"), Value::from(2)),
            (Issue::from("lamps"), Value::from(1)),
        ]);
        let b = Bid::from_iter(vec![
            (Issue::from("lamps"), Value::from(1)),
            (Issue::from("records"), Value::from(2)),
        ]);
        assert!(a == b);
    }

    #[test]
    fn lookup_by_issue() {
        let bid = Bid::from_iter(vec![(Issue::from("records"), Value::from(3))]);
        assert!(bid.value(&Issue::from("records")) == Some(&Value::from(3)));
        assert!(bid.value(&Issue::from("lamps")).is_none());
    }
}
