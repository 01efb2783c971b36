use serde::Serialize;

/// Classification of expected domain failures. Transport adapters map these
/// onto status codes; the engine never panics for any of them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Duplicate,
    NotFound,
    Invalid,
    LimitReached,
}

/// Expected domain failures returned by engine operations.
///
/// `LimitReached` is declared for adapters but never emitted by the current
/// rules: users at the load cap are silently excluded from candidacy instead.
#[derive(Clone, Debug, thiserror::Error)]
pub enum EngineError {
    #[error("{0}")]
    Invalid(String),
    #[error("{0}")]
    Duplicate(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    LimitReached(String),
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Invalid(_) => ErrorKind::Invalid,
            Self::Duplicate(_) => ErrorKind::Duplicate,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::LimitReached(_) => ErrorKind::LimitReached,
        }
    }

    /// Short classification string for logging.
    pub fn kind_str(&self) -> &'static str {
        match self {
            Self::Invalid(_) => "invalid",
            Self::Duplicate(_) => "duplicate",
            Self::NotFound(_) => "not_found",
            Self::LimitReached(_) => "limit_reached",
        }
    }
}
