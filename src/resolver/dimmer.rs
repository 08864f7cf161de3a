use embassy_time::{Duration, Instant};

use super::{LightCommand, Resolve, unsupported};
use crate::address::{ChannelList, ChannelSpec};
use crate::error::Result;
use crate::fade::{ChannelValues, FadeBatch, fade_all};
use crate::math8::{MAX_VALUE, percent_to_byte};

/// Configuration shared by dimmer and switch fixtures
#[derive(Debug, Clone)]
pub struct DimmerConfig {
    /// Fade time for on/off and percent commands
    pub fade_time: Duration,
    /// Time to dim over the full range on increase/decrease
    pub dim_time: Duration,
    /// Values applied on ON when nothing is remembered
    pub turn_on_value: ChannelValues,
    /// Values applied on OFF
    pub turn_off_value: ChannelValues,
    /// Remember the last non-zero level and restore it on ON
    pub dynamic_turn_on: bool,
}

impl Default for DimmerConfig {
    fn default() -> Self {
        Self {
            fade_time: Duration::from_millis(0),
            dim_time: Duration::from_millis(1000),
            turn_on_value: ChannelValues::uniform(MAX_VALUE),
            turn_off_value: ChannelValues::uniform(0),
            dynamic_turn_on: true,
        }
    }
}

/// Brightness resolver driving every channel with the same level
#[derive(Debug, Clone)]
pub struct DimmerResolver {
    channels: ChannelList,
    config: DimmerConfig,
    /// Last non-zero level, replayed on ON
    last_on: Option<ChannelValues>,
}

impl DimmerResolver {
    pub fn new(spec: &ChannelSpec, config: DimmerConfig) -> Result<Self> {
        super::check_grouping(1, spec.len())?;
        Ok(Self {
            channels: spec.channels().iter().copied().collect(),
            config,
            last_on: None,
        })
    }

    /// Values a plain ON restores
    pub fn turn_on_value(&self) -> &ChannelValues {
        match &self.last_on {
            Some(values) if self.config.dynamic_turn_on => values,
            _ => &self.config.turn_on_value,
        }
    }

    fn remember(&mut self, values: &ChannelValues) {
        if self.config.dynamic_turn_on && !values.is_zero() {
            self.last_on = Some(values.clone());
        }
    }
}

impl Resolve for DimmerResolver {
    const NAME: &'static str = "dimmer";

    fn resolve(&mut self, command: LightCommand, now: Instant) -> Result<FadeBatch> {
        let (values, duration) = match command {
            LightCommand::On => (self.turn_on_value().clone(), self.config.fade_time),
            LightCommand::Off => (self.config.turn_off_value.clone(), self.config.fade_time),
            LightCommand::Percent(percent) => {
                let values = ChannelValues::uniform(percent_to_byte(percent));
                self.remember(&values);
                (values, self.config.fade_time)
            }
            LightCommand::Increase => {
                let values = ChannelValues::uniform(MAX_VALUE);
                self.remember(&values);
                (values, self.config.dim_time)
            }
            LightCommand::Decrease => (ChannelValues::uniform(0), self.config.dim_time),
            LightCommand::Color(_) | LightCommand::ColorTemperature(_) => {
                return Err(unsupported::<Self>(command));
            }
        };

        log::debug!("dimmer {:?} -> {:?}", command, values.as_slice());
        Ok(fade_all(&self.channels, &values, duration, now))
    }
}
