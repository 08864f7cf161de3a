use embassy_time::{Duration, Instant};

use super::{LightCommand, Resolve, unsupported};
use crate::address::{ChannelList, ChannelSpec};
use crate::color::{WhiteMix, white_mix};
use crate::error::Result;
use crate::fade::{FadeBatch, FadeCommand};

/// Configuration for cold-white/warm-white fixtures
#[derive(Debug, Clone)]
pub struct TunableWhiteConfig {
    pub fade_time: Duration,
    pub dim_time: Duration,
    /// Brightness in percent applied on ON when nothing is remembered
    pub turn_on_brightness: f32,
    /// Initial color temperature in percent
    pub color_temperature: f32,
    pub dynamic_turn_on: bool,
}

impl Default for TunableWhiteConfig {
    fn default() -> Self {
        Self {
            fade_time: Duration::from_millis(0),
            dim_time: Duration::from_millis(1000),
            turn_on_brightness: 100.0,
            color_temperature: 50.0,
            dynamic_turn_on: true,
        }
    }
}

/// Brightness and color temperature resolver for cold/warm channel pairs
#[derive(Debug, Clone)]
pub struct TunableWhiteResolver {
    channels: ChannelList,
    config: TunableWhiteConfig,
    color_temperature: f32,
    /// Last commanded brightness, zero while off
    level: f32,
    last_on: Option<f32>,
}

impl TunableWhiteResolver {
    pub fn new(spec: &ChannelSpec, config: TunableWhiteConfig) -> Result<Self> {
        super::check_grouping(2, spec.len())?;
        Ok(Self {
            channels: spec.channels().iter().copied().collect(),
            color_temperature: config.color_temperature,
            config,
            level: 0.0,
            last_on: None,
        })
    }

    /// Brightness a plain ON restores
    pub fn turn_on_brightness(&self) -> f32 {
        match self.last_on {
            Some(brightness) if self.config.dynamic_turn_on => brightness,
            _ => self.config.turn_on_brightness,
        }
    }

    pub const fn color_temperature(&self) -> f32 {
        self.color_temperature
    }

    fn set_level(&mut self, brightness: f32) -> f32 {
        self.level = brightness.clamp(0.0, 100.0);
        if self.level > 0.0 {
            self.last_on = Some(self.level);
        }
        self.level
    }

    fn fade_to(&self, mix: WhiteMix, duration: Duration, now: Instant) -> FadeBatch {
        self.channels
            .chunks(2)
            .flat_map(|pair| pair.iter().zip([mix.cold, mix.warm]))
            .map(|(&channel, value)| FadeCommand::new(channel, value, duration, now))
            .collect()
    }
}

impl Resolve for TunableWhiteResolver {
    const NAME: &'static str = "tunable_white";

    fn resolve(&mut self, command: LightCommand, now: Instant) -> Result<FadeBatch> {
        let (brightness, duration) = match command {
            LightCommand::On => {
                let brightness = self.turn_on_brightness();
                (self.set_level(brightness), self.config.fade_time)
            }
            LightCommand::Off => {
                self.level = 0.0;
                (0.0, self.config.fade_time)
            }
            LightCommand::Percent(percent) => (self.set_level(percent), self.config.fade_time),
            LightCommand::Increase => (self.set_level(100.0), self.config.dim_time),
            LightCommand::Decrease => {
                self.level = 0.0;
                (0.0, self.config.dim_time)
            }
            LightCommand::ColorTemperature(temperature) => {
                self.color_temperature = temperature.clamp(0.0, 100.0);
                if self.level <= 0.0 {
                    // Applied with the next ON
                    return Ok(FadeBatch::new());
                }
                (self.level, self.config.fade_time)
            }
            LightCommand::Color(_) => return Err(unsupported::<Self>(command)),
        };

        let mix = white_mix(brightness, self.color_temperature);
        log::debug!("tunable white {:?} -> {:?}", command, mix);
        Ok(self.fade_to(mix, duration, now))
    }
}
