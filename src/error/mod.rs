//! Error module orchestrator; implementation details live in `types`.

mod types;

pub use types::{Result, TourError};
