pub mod memory;
pub mod mock;
pub mod trait_def;

pub use memory::{LoadError, RangeTable};
pub use mock::FnRangeStore;
pub use trait_def::{RangeStore, StoreError, StoreResult};
