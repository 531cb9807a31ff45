use thiserror::Error;

/// failure taxonomy of the engine. out-of-range arguments abort the
/// current decision and surface to the session, which falls back to
/// repeating its last own bid. search exhaustion turns into an
/// EndNegotiation action. malformed bids are recovered locally by
/// keeping the prior belief state.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("utility {0} outside [0, 1.05]")]
    UtilityOutOfRange(f64),
    #[error("time {0} outside [0, 1]")]
    TimeOutOfRange(f64),
    #[error("no bid in any acceptable utility range")]
    SearchExhausted,
    #[error("malformed bid {0}")]
    MalformedBid(String),
}
