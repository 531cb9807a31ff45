pub mod emotion;
pub mod entropy;
pub mod regression;
pub mod signal;
