//! Generator-error taxonomy.
//!
//! Most generator errors are a programmer-bug class and should never occur
//! in a release build; the one documented non-bug case is an unparseable
//! cron schedule, which generator code reports through this type and the
//! caller turns into a sentinel family omission rather than a process abort.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeneratorError {
    #[error("invalid cron schedule {schedule:?}: {reason}")]
    InvalidSchedule { schedule: String, reason: String },
    #[error("unknown time zone {0:?}")]
    UnknownTimeZone(String),
}
