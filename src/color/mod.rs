mod hsb;
mod white;

use smart_leds::RGB8;

pub use hsb::{Hsb, hsb_to_rgb};
pub use white::{WhiteMix, white_mix};

pub type Rgb = RGB8;
