#![no_std]

pub mod address;
pub mod channel;
pub mod chaser;
pub mod color;
pub mod error;
pub mod fade;
pub mod frame_scheduler;
pub mod math8;
pub mod queue;
pub mod resolver;
pub mod universe;

pub use address::{ChannelId, ChannelList, ChannelSpec, UniverseId};
pub use channel::Channel;
pub use chaser::{Chaser, ChaserConfig, Hold, Phase, Step, Steps};
pub use error::{Error, Result};
pub use fade::{ChannelValues, Fade, FadeBatch, FadeCommand};
pub use frame_scheduler::{FrameResult, FrameScheduler};
pub use queue::{CommandQueue, CommandReceiver, CommandSender};
pub use resolver::{
    ColorConfig, ColorResolver, DimmerConfig, DimmerResolver, LightCommand, Resolve, Resolver,
    SwitchResolver, TunableWhiteConfig, TunableWhiteResolver,
};
pub use universe::{ChannelListener, Frame, Universe, UniverseConfig};

pub use color::{Hsb, Rgb};
pub use embassy_time::{Duration, Instant};

/// Number of channels in a full DMX universe
pub const DMX_UNIVERSE_SIZE: u16 = 512;

/// Maximum number of channels addressed by one fixture or chaser
pub const MAX_GROUP_CHANNELS: usize = 32;

/// Maximum number of change listeners per universe
pub const MAX_LISTENERS: usize = 4;

/// Transport seam for rendered frames
///
/// Implement this trait to push frames to Art-Net, sACN, serial or any other
/// DMX output. `frame[i]` is the value of channel `i + 1`.
pub trait DmxOutput {
    /// Write one rendered universe
    fn write(&mut self, universe: UniverseId, frame: &[u8]);
}
