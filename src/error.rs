//! Engine error type.

/// Errors reported by the engine and its configuration parsers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Channel id is zero or exceeds the configured universe size
    #[error("channel {channel} is outside the universe of {size} channels")]
    ChannelOutOfRange { channel: u16, size: u16 },
    /// Requested universe size does not fit the compile-time capacity
    #[error("universe size {size} exceeds capacity {capacity}")]
    UniverseTooLarge { size: u16, capacity: usize },
    /// Step string could not be parsed (index of the offending step)
    #[error("malformed chaser step {step}")]
    MalformedStepString { step: usize },
    /// Channel spec could not be parsed (index of the offending segment)
    #[error("malformed channel spec segment {segment}")]
    MalformedChannelSpec { segment: usize },
    /// Value list is empty, too long or contains a non-byte value
    #[error("malformed value list")]
    MalformedValueList,
    /// Negative fade or hold time other than the infinite sentinel
    #[error("invalid duration {millis} ms in step {step}")]
    InvalidDuration { step: usize, millis: i64 },
    /// Command has no meaning for the resolver variant
    #[error("{command} is not supported by the {resolver} resolver")]
    UnsupportedCommand {
        command: &'static str,
        resolver: &'static str,
    },
    /// Channel count does not split into whole fixture groups
    #[error("expected a non-zero multiple of {group} channels, got {actual}")]
    ChannelGrouping { group: usize, actual: usize },
    /// Repeating chaser whose steps never consume time
    #[error("chaser cycle has zero length")]
    ZeroLengthCycle,
    /// Command queue has no room for the whole batch
    #[error("command queue is full")]
    QueueFull,
}

pub type Result<T> = core::result::Result<T, Error>;
