//! Colour wheel helpers.
//!
//! The 0-255 hue wheel is split into three 85-wide sectors, each a linear
//! ramp between two of red, green and blue. Positions are reflected before
//! lookup, so position 0 is pure red and the wheel runs red, green, blue.
//!
//! All arithmetic is integer and mirrors the Arduino `map()` helper, so the
//! produced bytes are exact and reproducible on any target.

use palette::Srgb;

/// 8-bit sRGB pixel colour.
pub type Rgb8 = Srgb<u8>;

/// All channels off.
pub const OFF: Rgb8 = Rgb8::new(0, 0, 0);

/// Packs a colour as `0x00RRGGBB`, the layout NeoPixel drivers use.
#[inline]
pub fn pack_rgb(color: Rgb8) -> u32 {
    (u32::from(color.red) << 16) | (u32::from(color.green) << 8) | u32::from(color.blue)
}

/// Integer linear re-mapping, truncating toward zero.
///
/// Returns `out_min` when the input range is empty.
pub fn map_range(x: i32, in_min: i32, in_max: i32, out_min: i32, out_max: i32) -> i32 {
    let span = in_max - in_min;
    if span == 0 {
        return out_min;
    }
    (x - in_min) * (out_max - out_min) / span + out_min
}

/// Full-brightness wheel colour at `pos`.
pub fn color_wheel(pos: u8) -> Rgb8 {
    let (red, green, blue) = sector(pos);
    Rgb8::new(red, green, blue)
}

/// Wheel colour at `hue` with every channel scaled by `val / 255`.
pub fn scaled_wheel(hue: u8, val: u8) -> Rgb8 {
    let (red, green, blue) = sector(hue);
    Rgb8::new(scale(red, val), scale(green, val), scale(blue, val))
}

/// Wheel position of pixel `index` in an `count`-pixel static rainbow.
pub fn rainbow_position(index: usize, count: usize) -> u8 {
    let step = 255 / count.saturating_sub(1).max(1);
    (index * step).min(255) as u8
}

fn sector(pos: u8) -> (u8, u8, u8) {
    let pos = 255 - pos;
    if pos < 85 {
        (255 - pos * 3, 0, pos * 3)
    } else if pos < 170 {
        let pos = pos - 85;
        (0, pos * 3, 255 - pos * 3)
    } else {
        let pos = pos - 170;
        (pos * 3, 255 - pos * 3, 0)
    }
}

fn scale(channel: u8, val: u8) -> u8 {
    (u16::from(channel) * u16::from(val) / 255) as u8
}
