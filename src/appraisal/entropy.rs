use crate::domain::issue::Issue;
use crate::domain::value::Value;
use crate::history::history::History;
use std::collections::BTreeMap;

/// Shannon entropy (nats) of the issue-value assignments the opponent
/// has offered so far. a narrowing distribution means the opponent is
/// circling a region of the domain; observational only.
pub fn shannon(history: &History) -> f64 {
    let mut counts = BTreeMap::<(&Issue, &Value), usize>::new();
    for record in history.records() {
        for entry in record.bid().entries() {
            *counts.entry(entry).or_insert(0) += 1;
        }
    }
    let total = counts.values().sum::<usize>() as f64;
    if total <= 0. {
        return 0.;
    }
    counts
        .values()
        .map(|&count| {
            let p = count as f64 / total;
            -p * p.ln()
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bid::Bid;
    use crate::history::record::Record;
    use crate::history::record::Stamp;

    fn bid(records: i64, lamps: i64) -> Bid {
        Bid::from_iter(vec![
            (Issue::from("records"), Value::from(records)),
            (Issue::from("lamps"), Value::from(lamps)),
        ])
    }
    fn history(bids: Vec<Bid>) -> History {
        let mut history = History::default();
        for (turn, bid) in bids.into_iter().enumerate() {
            let t = turn as f64 / 10.;
            history.push(Record::from((bid, 0.5, 0.5, Stamp::from((t, turn)))));
        }
        history
    }

    #[test]
    fn empty_history_has_zero_entropy() {
        assert_eq!(shannon(&History::default()), 0.);
    }

    #[test]
    fn repetition_has_zero_entropy_per_issue() {
        // one bid repeated: two equally likely (issue, value) pairs,
        // entropy ln 2.
        let history = history(vec![bid(1, 2), bid(1, 2), bid(1, 2)]);
        assert!((shannon(&history) - 2f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn variety_raises_entropy() {
        let steady = history(vec![bid(1, 2), bid(1, 2)]);
        let varied = history(vec![bid(1, 2), bid(3, 0)]);
        assert!(shannon(&varied) > shannon(&steady));
    }
}
