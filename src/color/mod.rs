mod brightness;
mod utils;

pub(crate) use brightness::fade_word;
pub use brightness::{BrightnessTable, PackedColor, pack_grb, unpack_grb};
use smart_leds::RGB8;
pub use utils::{heat_color, rgb_from_components, rgb_from_hex, wheel};

pub type Rgb = RGB8;

pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };
pub const WHITE: Rgb = Rgb {
    r: 255,
    g: 255,
    b: 255,
};
