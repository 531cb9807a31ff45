use super::record::Record;
use crate::Time;
use crate::Utility;
use rand::rngs::SmallRng;
use rand::Rng;

/// append-only, time-ordered record of bids. insertion order is
/// chronological and stamps are non-decreasing: a push that would
/// move time backwards is clamped to the previous stamp.
#[derive(Debug, Default, Clone)]
pub struct History(Vec<Record>);

impl History {
    pub fn push(&mut self, record: Record) {
        let record = match self.0.last() {
            Some(prev) if record.stamp().time < prev.stamp().time => {
                log::warn!(
                    "out of order stamp {:.4} < {:.4}, clamping",
                    record.stamp().time,
                    prev.stamp().time
                );
                let stamp = super::record::Stamp::from((prev.stamp().time, record.stamp().turn));
                Record::from((record.bid().clone(), record.mine(), record.theirs(), stamp))
            }
            _ => record,
        };
        self.0.push(record);
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn records(&self) -> &[Record] {
        &self.0
    }
    pub fn first(&self) -> Option<&Record> {
        self.0.first()
    }
    pub fn last(&self) -> Option<&Record> {
        self.0.last()
    }
    /// record with the highest own utility so far.
    pub fn best(&self) -> Option<&Record> {
        self.0.iter().max_by(|a, b| a.mine().total_cmp(&b.mine()))
    }
    pub fn min(&self) -> Option<Utility> {
        self.0.iter().map(Record::mine).min_by(f64::total_cmp)
    }
    pub fn max(&self) -> Option<Utility> {
        self.0.iter().map(Record::mine).max_by(f64::total_cmp)
    }
    pub fn mean(&self) -> Option<Utility> {
        match self.0.len() {
            0 => None,
            n => Some(self.0.iter().map(Record::mine).sum::<Utility>() / n as Utility),
        }
    }
    /// records whose stamps fall within [t0, t1].
    pub fn window(&self, t0: Time, t1: Time) -> impl Iterator<Item = &Record> {
        self.0
            .iter()
            .filter(move |r| r.stamp().time >= t0 && r.stamp().time <= t1)
    }
    /// records whose own utility falls within [lo, hi].
    pub fn within(&self, lo: Utility, hi: Utility) -> impl Iterator<Item = &Record> {
        self.0
            .iter()
            .filter(move |r| r.mine() >= lo && r.mine() <= hi)
    }
    /// seeded uniform draw from the top n records by own utility.
    pub fn sample_top(&self, n: usize, rng: &mut SmallRng) -> Option<&Record> {
        if self.0.is_empty() || n == 0 {
            return None;
        }
        let mut ranked = self.0.iter().collect::<Vec<_>>();
        ranked.sort_by(|a, b| b.mine().total_cmp(&a.mine()));
        ranked.truncate(n);
        let i = rng.random_range(0..ranked.len());
        Some(ranked[i])
    }
}
