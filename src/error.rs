#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum SequenceError {
    #[error("Source exposes neither a cursor factory nor a cursor.")]
    UnsupportedSourceKind,

    #[error("Bound must be non-negative.")]
    InvalidBound,

    #[error("Sequence was re-entered while its cursor was advancing.")]
    Reentrant,

    #[error(transparent)]
    Producer(Box<dyn std::error::Error + Send + Sync>),
}

impl SequenceError {
    pub fn producer<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        SequenceError::Producer(Box::new(error))
    }

    pub fn is_producer(&self) -> bool {
        matches!(self, SequenceError::Producer(_))
    }
}

pub type Result<T> = std::result::Result<T, SequenceError>;
