use thiserror::Error;

/// Errors a user can fix by changing their input. Everything else (I/O)
/// travels as a plain `anyhow::Error`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    #[error("task {0} not found")]
    NotFound(u32),

    #[error("title must not be empty")]
    EmptyTitle,

    #[error("invalid date '{0}': expected YYYY-MM-DD, e.g. 2026-01-15")]
    InvalidDate(String),

    #[error("unknown category '{0}'")]
    UnknownCategory(String),

    #[error("unknown priority '{0}'")]
    UnknownPriority(String),

    #[error("no task ids left; remove the task with id {} first", u32::MAX)]
    IdsExhausted,
}

/// Whether `err` is a [`TaskError`] that should be reported rather than
/// treated as fatal.
pub fn as_task_error(err: &anyhow::Error) -> Option<&TaskError> {
    err.downcast_ref::<TaskError>()
}
