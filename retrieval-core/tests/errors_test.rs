use retrieval_core::errors::{CascadeError, CoreError, RetrievalError};

#[test]
fn retrieval_error_converts_to_core_error() {
    let err: CoreError = RetrievalError::NoResults.into();
    assert!(matches!(err, CoreError::Retrieval(RetrievalError::NoResults)));
}

#[test]
fn cascade_error_converts_to_core_error() {
    let err: CoreError = CascadeError::NoLevels.into();
    assert!(matches!(err, CoreError::Cascade(CascadeError::NoLevels)));
}

#[test]
fn cascade_error_messages_name_the_level() {
    let err = CascadeError::LevelFailed {
        level: "llm".to_string(),
        reason: "timeout".to_string(),
    };
    assert!(err.to_string().contains("llm"));
    assert!(err.to_string().contains("timeout"));
}
