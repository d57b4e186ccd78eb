use thiserror::Error;

pub type TimelineResult<T> = Result<T, TimelineError>;

#[derive(Debug, Error)]
pub enum TimelineError {
    #[error("could not find an importer for the provided trace payload")]
    NoImporterFound,

    #[error("cannot {operation} once the trace is imported")]
    AlreadyFrozen { operation: &'static str },

    #[error("number or order of timeline markers does not match provided labels")]
    MarkerMismatch,

    #[error("overlapping timeline markers found")]
    MarkerOverlap,

    #[error("no event of name `{name}` found")]
    EventNotFound { name: String },

    #[error("more than one event of name `{name}` found ({count} matches)")]
    AmbiguousEvent { name: String, count: usize },

    #[error("invalid data: {0}")]
    InvalidData(String),
}
