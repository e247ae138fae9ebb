mod cascade_error;
mod retrieval_error;

pub use cascade_error::CascadeError;
pub use retrieval_error::RetrievalError;

/// Aggregate error type for the workspace. Only configuration-fatal
/// conditions ever reach a caller as an `Err` — everything
/// recoverable is swallowed at the stage or retriever boundary and logged.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error(transparent)]
    Retrieval(#[from] RetrievalError),

    #[error(transparent)]
    Cascade(#[from] CascadeError),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
