//! Composite command resolvers
//!
//! A resolver turns one user-facing command into fade commands for the
//! channels of a fixture. Resolvers never touch a universe; the only state
//! they keep is the last non-zero value used to restore on a plain ON.
//!
//! All variants are stored in the [`Resolver`] enum and selected at
//! construction time.

mod color;
mod dimmer;
mod switch;
mod tunable_white;

use embassy_time::Instant;

pub use color::{ColorConfig, ColorResolver};
pub use dimmer::{DimmerConfig, DimmerResolver};
pub use switch::SwitchResolver;
pub use tunable_white::{TunableWhiteConfig, TunableWhiteResolver};

use crate::color::Hsb;
use crate::error::{Error, Result};
use crate::fade::FadeBatch;

const COMMAND_ON: &str = "on";
const COMMAND_OFF: &str = "off";
const COMMAND_PERCENT: &str = "percent";
const COMMAND_INCREASE: &str = "increase";
const COMMAND_DECREASE: &str = "decrease";
const COMMAND_COLOR: &str = "color";
const COMMAND_COLOR_TEMPERATURE: &str = "color_temperature";

/// Command addressed to a fixture
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightCommand {
    /// Turn on, restoring the remembered or configured value
    On,
    /// Turn off, keeping the remembered value
    Off,
    /// Set brightness in percent (0-100)
    Percent(f32),
    /// Dim up to full over the dim time
    Increase,
    /// Dim down to zero over the dim time
    Decrease,
    /// Set a color
    Color(Hsb),
    /// Set color temperature in percent (0 = cold, 100 = warm)
    ColorTemperature(f32),
}

impl LightCommand {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::On => COMMAND_ON,
            Self::Off => COMMAND_OFF,
            Self::Percent(_) => COMMAND_PERCENT,
            Self::Increase => COMMAND_INCREASE,
            Self::Decrease => COMMAND_DECREASE,
            Self::Color(_) => COMMAND_COLOR,
            Self::ColorTemperature(_) => COMMAND_COLOR_TEMPERATURE,
        }
    }
}

pub trait Resolve {
    /// Name used in errors and logs
    const NAME: &'static str;

    /// Translate a command into fades starting at `now`
    fn resolve(&mut self, command: LightCommand, now: Instant) -> Result<FadeBatch>;
}

pub(crate) fn unsupported<R: Resolve>(command: LightCommand) -> Error {
    Error::UnsupportedCommand {
        command: command.as_str(),
        resolver: R::NAME,
    }
}

/// Check that `actual` channels split into whole groups of `group`
pub(crate) fn check_grouping(group: usize, actual: usize) -> Result<()> {
    if actual == 0 || !actual.is_multiple_of(group) {
        return Err(Error::ChannelGrouping { group, actual });
    }
    Ok(())
}

/// Resolver slot - enum containing all resolver variants
#[derive(Debug, Clone)]
pub enum Resolver {
    Switch(SwitchResolver),
    Dimmer(DimmerResolver),
    Color(ColorResolver),
    TunableWhite(TunableWhiteResolver),
}

impl Resolver {
    /// Translate a command into fades starting at `now`
    pub fn resolve(&mut self, command: LightCommand, now: Instant) -> Result<FadeBatch> {
        match self {
            Self::Switch(resolver) => resolver.resolve(command, now),
            Self::Dimmer(resolver) => resolver.resolve(command, now),
            Self::Color(resolver) => resolver.resolve(command, now),
            Self::TunableWhite(resolver) => resolver.resolve(command, now),
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Switch(_) => SwitchResolver::NAME,
            Self::Dimmer(_) => DimmerResolver::NAME,
            Self::Color(_) => ColorResolver::NAME,
            Self::TunableWhite(_) => TunableWhiteResolver::NAME,
        }
    }
}

impl From<SwitchResolver> for Resolver {
    fn from(resolver: SwitchResolver) -> Self {
        Self::Switch(resolver)
    }
}

impl From<DimmerResolver> for Resolver {
    fn from(resolver: DimmerResolver) -> Self {
        Self::Dimmer(resolver)
    }
}

impl From<ColorResolver> for Resolver {
    fn from(resolver: ColorResolver) -> Self {
        Self::Color(resolver)
    }
}

impl From<TunableWhiteResolver> for Resolver {
    fn from(resolver: TunableWhiteResolver) -> Self {
        Self::TunableWhite(resolver)
    }
}
