/// CSV export of per-string results.
pub mod export;
