pub mod location;

pub use location::{HealthResponse, LocationRange, LocationResponse};
