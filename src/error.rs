//! Error handling for the layout engine.
//!
//! Per the propagation policy: recoverable input errors and resource
//! absences degrade to neutral outcomes locally (see each module); this
//! error type exists only for the operations that do surface a `Result`
//! (cache/serialization paths with a genuinely recoverable failure mode).
//! Configuration errors — zero valid families, more than 254 families, a
//! family with no default-style font, a family index table that overflows
//! its `u16` budget, an unparseable font face — are fatal at construction
//! per §7 and abort via `panic!`/`assert!`/`expect` at their call sites
//! instead of living in this enum.
#[derive(Debug, thiserror::Error)]
pub enum TypesetError {
    #[error("hyphenation pattern data is malformed: {0}")]
    MalformedHyphenationData(String),

    #[error("serialized font collection stream is truncated or malformed: {0}")]
    MalformedStream(String),

    #[error("shaping backend failed: {0}")]
    ShapingFailed(String),

    #[error("lock poisoned")]
    LockPoisoned,
}

pub type Result<T> = std::result::Result<T, TypesetError>;
