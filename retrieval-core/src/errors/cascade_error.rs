/// Errors produced by the cascade inference engine and its levels.
///
/// `LevelFailed` at a non-final level is a control-flow signal: the
/// engine logs it and advances. It only ever surfaces to a caller via
/// `CoreError` when every level in an ensemble run failed, or the engine was
/// constructed with zero levels.
#[derive(Debug, thiserror::Error)]
pub enum CascadeError {
    #[error("cascade engine has no levels configured")]
    NoLevels,

    #[error("level '{level}' failed: {reason}")]
    LevelFailed { level: String, reason: String },

    #[error("all levels failed in ensemble mode")]
    AllLevelsFailed,

    #[error("forced level '{level}' is not registered")]
    ForcedLevelNotFound { level: String },
}
