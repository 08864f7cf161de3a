use embassy_time::{Duration, Instant};

use super::{DimmerConfig, LightCommand, Resolve, unsupported};
use crate::address::{ChannelList, ChannelSpec};
use crate::error::Result;
use crate::fade::{ChannelValues, FadeBatch, fade_all};

/// On/off resolver with fixed on and off values
#[derive(Debug, Clone)]
pub struct SwitchResolver {
    channels: ChannelList,
    fade_time: Duration,
    turn_on_value: ChannelValues,
    turn_off_value: ChannelValues,
}

impl SwitchResolver {
    /// Create a switch over every channel of `spec`
    ///
    /// Only the fade time and the turn-on/turn-off values of `config` are
    /// used.
    pub fn new(spec: &ChannelSpec, config: &DimmerConfig) -> Result<Self> {
        super::check_grouping(1, spec.len())?;
        Ok(Self {
            channels: spec.channels().iter().copied().collect(),
            fade_time: config.fade_time,
            turn_on_value: config.turn_on_value.clone(),
            turn_off_value: config.turn_off_value.clone(),
        })
    }
}

impl Resolve for SwitchResolver {
    const NAME: &'static str = "switch";

    fn resolve(&mut self, command: LightCommand, now: Instant) -> Result<FadeBatch> {
        let values = match command {
            LightCommand::On => &self.turn_on_value,
            LightCommand::Off => &self.turn_off_value,
            _ => return Err(unsupported::<Self>(command)),
        };
        Ok(fade_all(&self.channels, values, self.fade_time, now))
    }
}
