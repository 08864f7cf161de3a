use core::str::FromStr;

use embassy_time::{Duration, Instant};
use heapless::Vec;

use crate::MAX_GROUP_CHANNELS;
use crate::address::ChannelId;
use crate::error::{Error, Result};
use crate::math8::lerp8;

/// Fade commands produced by one resolver call or chaser step
pub type FadeBatch = Vec<FadeCommand, MAX_GROUP_CHANNELS>;

/// Linear fade between two bytes
///
/// The value is a pure function of time, so it can be evaluated at any
/// instant without ticking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fade {
    /// Value at `start_time`
    start: u8,
    /// Value reached after `duration`
    target: u8,
    /// Time at which the fade started
    start_time: Instant,
    /// Total fade duration, zero snaps
    duration: Duration,
}

impl Fade {
    /// Steady value that never changes
    pub const fn steady(value: u8) -> Self {
        Self {
            start: value,
            target: value,
            start_time: Instant::from_ticks(0),
            duration: Duration::from_ticks(0),
        }
    }

    pub const fn new(start: u8, target: u8, start_time: Instant, duration: Duration) -> Self {
        Self {
            start,
            target,
            start_time,
            duration,
        }
    }

    pub const fn start(&self) -> u8 {
        self.start
    }

    pub const fn target(&self) -> u8 {
        self.target
    }

    pub const fn start_time(&self) -> Instant {
        self.start_time
    }

    pub const fn duration(&self) -> Duration {
        self.duration
    }

    /// Value of the fade at `now`
    ///
    /// Instants before the start read the start value, instants past the end
    /// read the target.
    pub fn value_at(&self, now: Instant) -> u8 {
        let total = self.duration.as_ticks();
        if total == 0 {
            return self.target;
        }
        let elapsed = now
            .checked_duration_since(self.start_time)
            .map_or(0, |elapsed| elapsed.as_ticks());

        lerp8(self.start, self.target, elapsed, total)
    }

    /// Check if the fade has not reached its end time at `now`
    pub fn is_fading(&self, now: Instant) -> bool {
        self.start != self.target && now < self.start_time + self.duration
    }

    /// Fade that continues from this one's value at `command.issued_at`
    pub fn supersede(&self, command: &FadeCommand) -> Self {
        Self {
            start: self.value_at(command.issued_at),
            target: command.target,
            start_time: command.issued_at,
            duration: command.duration,
        }
    }
}

/// Instruction to fade one channel to a target value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FadeCommand {
    pub channel: ChannelId,
    pub target: u8,
    pub duration: Duration,
    pub issued_at: Instant,
}

impl FadeCommand {
    pub const fn new(channel: ChannelId, target: u8, duration: Duration, issued_at: Instant) -> Self {
        Self {
            channel,
            target,
            duration,
            issued_at,
        }
    }

    /// Command that jumps to `target` immediately
    pub const fn snap(channel: ChannelId, target: u8, issued_at: Instant) -> Self {
        Self::new(channel, target, Duration::from_ticks(0), issued_at)
    }
}

/// Build one fade per channel, taking values from `values` cyclically
pub fn fade_all(
    channels: &[ChannelId],
    values: &ChannelValues,
    duration: Duration,
    now: Instant,
) -> FadeBatch {
    channels
        .iter()
        .enumerate()
        .map(|(i, &channel)| FadeCommand::new(channel, values.get(i), duration, now))
        .collect()
}

/// Per-channel byte values
///
/// A list shorter than the channel group repeats: channel `i` takes value
/// `i % len`. Parsed from `value (',' value)*`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelValues(Vec<u8, MAX_GROUP_CHANNELS>);

const _: () = assert!(MAX_GROUP_CHANNELS >= 1);

impl ChannelValues {
    /// Same value for every channel
    pub fn uniform(value: u8) -> Self {
        // Capacity is non-zero, asserted above
        let mut values = Vec::new();
        values.extend([value]);
        Self(values)
    }

    pub fn from_slice(values: &[u8]) -> Result<Self> {
        if values.is_empty() {
            return Err(Error::MalformedValueList);
        }
        Vec::from_slice(values)
            .map(Self)
            .map_err(|()| Error::MalformedValueList)
    }

    /// Value for the channel at `index` in its group
    pub fn get(&self, index: usize) -> u8 {
        if self.0.is_empty() {
            return 0;
        }
        self.0[index % self.0.len()]
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// Check if every value is zero
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&value| value == 0)
    }
}

impl FromStr for ChannelValues {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut values = Vec::new();
        for part in s.split(',') {
            let value = part
                .trim()
                .parse::<u8>()
                .map_err(|_| Error::MalformedValueList)?;
            values.push(value).map_err(|_| Error::MalformedValueList)?;
        }
        Ok(Self(values))
    }
}
