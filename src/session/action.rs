use crate::domain::bid::Bid;
use serde::Deserialize;
use serde::Serialize;
use std::fmt::Display;
use std::fmt::Formatter;

/// one negotiation move, exchanged once per turn in both directions.
/// Accept closes on the opponent's standing offer; EndNegotiation
/// walks away from the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Offer(Bid),
    Accept,
    EndNegotiation,
}

impl Display for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Offer(bid) => write!(f, "OFFER  {}", bid),
            Action::Accept => write!(f, "ACCEPT"),
            Action::EndNegotiation => write!(f, "END"),
        }
    }
}
