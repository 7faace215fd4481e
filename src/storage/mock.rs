use crate::models::LocationRange;
use crate::storage::{RangeStore, StoreError, StoreResult};

type FindFn = dyn Fn(u32) -> StoreResult<LocationRange> + Send + Sync;

/// Range store driven by a caller-supplied closure.
///
/// Used to exercise the service and HTTP layers without a dataset on disk.
pub struct FnRangeStore {
    find: Box<FindFn>,
}

impl FnRangeStore {
    pub fn new<F>(find: F) -> Self
    where
        F: Fn(u32) -> StoreResult<LocationRange> + Send + Sync + 'static,
    {
        Self {
            find: Box::new(find),
        }
    }

    /// A store that has no range for any ordinal
    pub fn not_found() -> Self {
        Self::new(|_| Err(StoreError::NotFound))
    }
}

impl Default for FnRangeStore {
    fn default() -> Self {
        Self::not_found()
    }
}

impl RangeStore for FnRangeStore {
    fn find_by_ordinal(&self, ordinal: u32) -> StoreResult<LocationRange> {
        (self.find)(ordinal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_store_reports_not_found() {
        let store = FnRangeStore::default();
        assert!(matches!(
            store.find_by_ordinal(42),
            Err(StoreError::NotFound)
        ));
    }

    #[test]
    fn test_closure_receives_ordinal() {
        let store = FnRangeStore::new(|ordinal| {
            Ok(LocationRange {
                lower: ordinal,
                upper: ordinal,
                country: "Testland".to_string(),
                country_code: "TL".to_string(),
                region: "-".to_string(),
                city: "-".to_string(),
            })
        });

        let range = store.find_by_ordinal(7).unwrap();
        assert_eq!(range.lower, 7);
        assert_eq!(range.upper, 7);
    }
}
