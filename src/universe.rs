use embassy_time::{Duration, Instant};
use heapless::Vec;

use crate::address::{ChannelId, UniverseId};
use crate::channel::Channel;
use crate::error::{Error, Result};
use crate::fade::FadeCommand;
use crate::{DMX_UNIVERSE_SIZE, DmxOutput, MAX_LISTENERS};

/// Default output refresh rate
pub const DEFAULT_REFRESH_RATE_HZ: u32 = 30;

/// Configuration for a universe
#[derive(Debug, Clone)]
pub struct UniverseConfig {
    pub id: UniverseId,
    /// Number of addressable channels
    pub size: u16,
    /// Rate at which frames are handed to the output
    pub refresh_rate_hz: u32,
}

impl Default for UniverseConfig {
    fn default() -> Self {
        Self {
            id: 0,
            size: DMX_UNIVERSE_SIZE,
            refresh_rate_hz: DEFAULT_REFRESH_RATE_HZ,
        }
    }
}

/// Observer notified when a rendered channel value changes
pub trait ChannelListener {
    fn channel_changed(&self, universe: UniverseId, channel: ChannelId, value: u8);
}

/// Rendered snapshot of a universe
///
/// Byte `i` is the value of channel `i + 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame<const N: usize> {
    values: Vec<u8, N>,
}

impl<const N: usize> Frame<N> {
    /// Value of a channel, `None` if outside the frame
    pub fn get(&self, channel: ChannelId) -> Option<u8> {
        self.values.get(channel.index()).copied()
    }

    /// Ordered `(channel, value)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (ChannelId, u8)> + '_ {
        self.values
            .iter()
            .zip(1u16..)
            .filter_map(|(&value, id)| ChannelId::new(id).map(|id| (id, value)))
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Fixed-size set of channels sharing one output buffer
///
/// `N` is the channel capacity; the configured size may be smaller.
pub struct Universe<'a, const N: usize> {
    id: UniverseId,
    refresh_rate_hz: u32,
    channels: Vec<Channel, N>,
    listeners: Vec<&'a dyn ChannelListener, MAX_LISTENERS>,
    last_frame: Option<Frame<N>>,
}

impl<'a, const N: usize> Universe<'a, N> {
    /// Create a universe with every channel resting at zero
    pub fn new(config: &UniverseConfig) -> Result<Self> {
        let too_large = Error::UniverseTooLarge {
            size: config.size,
            capacity: N,
        };
        if usize::from(config.size) > N || config.size > DMX_UNIVERSE_SIZE {
            return Err(too_large);
        }

        let mut channels = Vec::new();
        for id in (1..=config.size).filter_map(ChannelId::new) {
            channels.push(Channel::new(id)).map_err(|_| too_large)?;
        }

        Ok(Self {
            id: config.id,
            refresh_rate_hz: config.refresh_rate_hz,
            channels,
            listeners: Vec::new(),
            last_frame: None,
        })
    }

    pub const fn id(&self) -> UniverseId {
        self.id
    }

    /// Configured output refresh rate
    pub const fn refresh_rate_hz(&self) -> u32 {
        self.refresh_rate_hz
    }

    /// Number of addressable channels
    #[allow(clippy::cast_possible_truncation)]
    pub fn size(&self) -> u16 {
        self.channels.len() as u16
    }

    /// Look up a channel by raw id
    pub fn channel(&self, id: u16) -> Result<&Channel> {
        let out_of_range = Error::ChannelOutOfRange {
            channel: id,
            size: self.size(),
        };
        let id = ChannelId::new(id).ok_or(out_of_range)?;
        self.channels.get(id.index()).ok_or(out_of_range)
    }

    /// Fade a channel to `target` over `duration`, starting at `now`
    pub fn set_channel(
        &self,
        id: u16,
        target: u8,
        duration: Duration,
        now: Instant,
    ) -> Result<u32> {
        let channel = self.channel(id)?;
        self.apply(&FadeCommand::new(channel.id(), target, duration, now))
    }

    /// Apply a fade command, returning the channel's new revision
    pub fn apply(&self, command: &FadeCommand) -> Result<u32> {
        let channel = self.channel(command.channel.get())?;
        log::trace!(
            "universe {} channel {} -> {} over {} ms",
            self.id,
            command.channel,
            command.target,
            command.duration.as_millis()
        );
        Ok(channel.apply(command))
    }

    /// Apply every command of a batch
    ///
    /// All channels are checked before anything is applied, so a batch with
    /// an out-of-range channel leaves the universe untouched.
    pub fn apply_all(&self, commands: &[FadeCommand]) -> Result<()> {
        for command in commands {
            self.channel(command.channel.get())?;
        }
        for command in commands {
            self.apply(command)?;
        }
        Ok(())
    }

    /// Value of one channel at `now`
    pub fn value_at(&self, id: ChannelId, now: Instant) -> Result<u8> {
        Ok(self.channel(id.get())?.value_at(now))
    }

    /// Revision counter of one channel
    pub fn revision(&self, id: ChannelId) -> Result<u32> {
        Ok(self.channel(id.get())?.revision())
    }

    /// Evaluate every channel at `now`
    pub fn render(&self, now: Instant) -> Frame<N> {
        Frame {
            values: self.channels.iter().map(|channel| channel.value_at(now)).collect(),
        }
    }

    /// Register a change listener
    ///
    /// Returns the listener back if the list is full.
    pub fn subscribe(
        &mut self,
        listener: &'a dyn ChannelListener,
    ) -> core::result::Result<(), &'a dyn ChannelListener> {
        self.listeners.push(listener)
    }

    /// Render, notify listeners of changed channels and hand the frame to
    /// the output
    pub fn tick<O: DmxOutput>(&mut self, now: Instant, output: &mut O) -> &Frame<N> {
        let frame = self.render(now);

        if !self.listeners.is_empty() {
            for (channel, value) in frame.iter() {
                let previous = self.last_frame.as_ref().and_then(|last| last.get(channel));
                if previous == Some(value) {
                    continue;
                }
                for listener in &self.listeners {
                    listener.channel_changed(self.id, channel, value);
                }
            }
        }

        output.write(self.id, frame.as_slice());
        self.last_frame.insert(frame)
    }
}
