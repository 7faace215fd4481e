use crate::models::LocationRange;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("location not found for the given IP")]
    NotFound,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Read side of a range dataset.
///
/// Implementations must be safe to query from many request tasks at once;
/// the lookup service holds one behind an `Arc` for the life of the process.
pub trait RangeStore: Send + Sync {
    /// Find the range whose inclusive bounds contain `ordinal`
    fn find_by_ordinal(&self, ordinal: u32) -> StoreResult<LocationRange>;
}
