//! Address lookup pipeline: text → ordinal → range

use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use crate::iputil::{ip_to_ordinal, AddressError};
use crate::models::LocationRange;
use crate::storage::{RangeStore, StoreError};

/// Pipeline step that produced a [`LocateError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ConvertAddress,
    FindRange,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::ConvertAddress => f.write_str("convert IP to ordinal"),
            Stage::FindRange => f.write_str("find location by ordinal"),
        }
    }
}

#[derive(Debug, Error)]
pub enum LocateErrorKind {
    #[error(transparent)]
    InvalidFormat(#[from] AddressError),
    #[error("location not found for the given IP")]
    NotFound,
    #[error(transparent)]
    Store(anyhow::Error),
}

#[derive(Debug, Error)]
#[error("{stage}: {kind}")]
pub struct LocateError {
    pub stage: Stage,
    pub kind: LocateErrorKind,
}

impl LocateError {
    pub fn is_invalid_format(&self) -> bool {
        matches!(self.kind, LocateErrorKind::InvalidFormat(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self.kind, LocateErrorKind::NotFound)
    }
}

impl From<AddressError> for LocateError {
    fn from(err: AddressError) -> Self {
        Self {
            stage: Stage::ConvertAddress,
            kind: LocateErrorKind::InvalidFormat(err),
        }
    }
}

impl From<StoreError> for LocateError {
    fn from(err: StoreError) -> Self {
        let kind = match err {
            StoreError::NotFound => LocateErrorKind::NotFound,
            StoreError::Other(e) => LocateErrorKind::Store(e),
        };
        Self {
            stage: Stage::FindRange,
            kind,
        }
    }
}

#[derive(Clone)]
pub struct LocationService {
    store: Arc<dyn RangeStore>,
}

impl LocationService {
    pub fn new(store: Arc<dyn RangeStore>) -> Self {
        Self { store }
    }

    /// Resolve an address string to the range that contains it
    pub fn locate(&self, address: &str) -> Result<LocationRange, LocateError> {
        let ordinal = ip_to_ordinal(address)?;
        let range = self.store.find_by_ordinal(ordinal)?;
        Ok(range)
    }
}
