use embassy_time::{Duration, Instant};

use super::{LightCommand, Resolve, unsupported};
use crate::address::{ChannelList, ChannelSpec};
use crate::color::{Hsb, Rgb, hsb_to_rgb};
use crate::error::Result;
use crate::fade::{FadeBatch, FadeCommand};

/// Configuration for RGB fixtures
#[derive(Debug, Clone)]
pub struct ColorConfig {
    /// Fade time for on/off, percent and color commands
    pub fade_time: Duration,
    /// Time to dim over the full range on increase/decrease
    pub dim_time: Duration,
    /// Color applied on ON when nothing is remembered
    pub turn_on_value: Hsb,
    /// Remember the last non-zero color and restore it on ON
    pub dynamic_turn_on: bool,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            fade_time: Duration::from_millis(0),
            dim_time: Duration::from_millis(1000),
            turn_on_value: Hsb::WHITE,
            dynamic_turn_on: true,
        }
    }
}

/// HSB resolver for groups of red/green/blue channels
///
/// Every group of three channels receives the same color and all fades share
/// one duration, so the channels arrive together.
#[derive(Debug, Clone)]
pub struct ColorResolver {
    channels: ChannelList,
    config: ColorConfig,
    /// Last commanded color; percent and dimming keep its hue and saturation
    current: Hsb,
    /// Last color with non-zero brightness
    last_on: Option<Hsb>,
}

impl ColorResolver {
    pub fn new(spec: &ChannelSpec, config: ColorConfig) -> Result<Self> {
        super::check_grouping(3, spec.len())?;
        Ok(Self {
            channels: spec.channels().iter().copied().collect(),
            current: config.turn_on_value,
            config,
            last_on: None,
        })
    }

    /// Color a plain ON restores
    pub fn turn_on_value(&self) -> Hsb {
        match self.last_on {
            Some(color) if self.config.dynamic_turn_on => color,
            _ => self.config.turn_on_value,
        }
    }

    fn remember(&mut self, color: Hsb) {
        self.current = color;
        if !color.is_off() {
            self.last_on = Some(color);
        }
    }

    fn fade_to(&self, rgb: Rgb, duration: Duration, now: Instant) -> FadeBatch {
        self.channels
            .chunks(3)
            .flat_map(|group| group.iter().zip([rgb.r, rgb.g, rgb.b]))
            .map(|(&channel, value)| FadeCommand::new(channel, value, duration, now))
            .collect()
    }
}

impl Resolve for ColorResolver {
    const NAME: &'static str = "color";

    fn resolve(&mut self, command: LightCommand, now: Instant) -> Result<FadeBatch> {
        let (color, duration) = match command {
            LightCommand::On => {
                let color = self.turn_on_value();
                self.current = color;
                (color, self.config.fade_time)
            }
            LightCommand::Off => (Hsb::BLACK, self.config.fade_time),
            LightCommand::Percent(percent) => {
                let color = self.current.with_brightness(percent);
                self.remember(color);
                (color, self.config.fade_time)
            }
            LightCommand::Color(color) => {
                self.remember(color);
                (color, self.config.fade_time)
            }
            LightCommand::Increase => {
                let color = self.current.with_brightness(100.0);
                self.remember(color);
                (color, self.config.dim_time)
            }
            LightCommand::Decrease => {
                let color = self.current.with_brightness(0.0);
                self.current = color;
                (color, self.config.dim_time)
            }
            LightCommand::ColorTemperature(_) => return Err(unsupported::<Self>(command)),
        };

        let rgb = hsb_to_rgb(color);
        log::debug!("color {:?} -> {:?}", command, rgb);
        Ok(self.fade_to(rgb, duration, now))
    }
}
