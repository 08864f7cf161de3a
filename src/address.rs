//! DMX addressing: channel ids and channel spec strings.

use core::fmt;
use core::str::FromStr;

use heapless::Vec;

use crate::error::{Error, Result};
use crate::{DMX_UNIVERSE_SIZE, MAX_GROUP_CHANNELS};

/// Universe identifier
pub type UniverseId = u16;

/// Ordered list of channels addressed by one fixture or chaser
pub type ChannelList = Vec<ChannelId, MAX_GROUP_CHANNELS>;

/// Channel address inside a universe, indexed from 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChannelId(u16);

impl ChannelId {
    /// Create a channel id, `None` for zero or anything above 512
    pub const fn new(id: u16) -> Option<Self> {
        if id == 0 || id > DMX_UNIVERSE_SIZE {
            return None;
        }
        Some(Self(id))
    }

    pub const fn get(self) -> u16 {
        self.0
    }

    /// Buffer index of this channel (indexed from 0)
    pub const fn index(self) -> usize {
        self.0 as usize - 1
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parsed channel spec
///
/// Grammar: `[universe ':'] base ['/' width] (',' base ['/' width])*`.
/// `"2:5/3,10"` addresses channels 5, 6, 7 and 10 of universe 2.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSpec {
    universe: Option<UniverseId>,
    channels: ChannelList,
}

impl ChannelSpec {
    /// Spec covering `width` consecutive channels starting at `base`
    pub fn range(base: ChannelId, width: u16) -> Result<Self> {
        let mut channels = ChannelList::new();
        push_range(&mut channels, base.get(), width, 0)?;
        Ok(Self {
            universe: None,
            channels,
        })
    }

    /// Universe prefix, if one was given
    pub const fn universe(&self) -> Option<UniverseId> {
        self.universe
    }

    pub fn channels(&self) -> &[ChannelId] {
        &self.channels
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

impl FromStr for ChannelSpec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (universe, list) = match s.split_once(':') {
            Some((universe, list)) => {
                let universe = universe
                    .trim()
                    .parse::<UniverseId>()
                    .map_err(|_| Error::MalformedChannelSpec { segment: 0 })?;
                (Some(universe), list)
            }
            None => (None, s),
        };

        let mut channels = ChannelList::new();
        for (segment, part) in list.split(',').enumerate() {
            let malformed = Error::MalformedChannelSpec { segment };
            let part = part.trim();
            let (base, width) = match part.split_once('/') {
                Some((base, width)) => (base, width.trim().parse::<u16>().map_err(|_| malformed)?),
                None => (part, 1),
            };
            let base = base.trim().parse::<u16>().map_err(|_| malformed)?;
            push_range(&mut channels, base, width, segment)?;
        }

        Ok(Self { universe, channels })
    }
}

fn push_range(channels: &mut ChannelList, base: u16, width: u16, segment: usize) -> Result<()> {
    let malformed = Error::MalformedChannelSpec { segment };
    if width == 0 {
        return Err(malformed);
    }
    for offset in 0..width {
        let id = base
            .checked_add(offset)
            .and_then(ChannelId::new)
            .ok_or(malformed)?;
        channels.push(id).map_err(|_| malformed)?;
    }
    Ok(())
}
