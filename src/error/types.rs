use thiserror::Error;

/// Unified result type for the tourkit crate.
pub type Result<T> = std::result::Result<T, TourError>;

/// Errors surfaced by the tour engine.
///
/// Missing targets are deliberately absent here: a selector that matches
/// nothing propagates as `None` through the geometry utilities and renderers
/// skip the dependent update instead of failing.
#[derive(Debug, Error)]
pub enum TourError {
    #[error("unknown event `{event}` on `{owner}`")]
    UnknownEvent { owner: String, event: String },
    #[error("config parse error: {0}")]
    Config(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
