//! Addressable LED strip abstraction.
//!
//! Defines the [`PixelStrip`] trait the lighting code paints through, and
//! [`SmartLedStrip`], a frame-buffered adapter onto any `smart-leds` driver
//! (WS2812 over PIO, SPI, RMT, ...).

use crate::wheel::{OFF, Rgb8};
use smart_leds::{RGB8, SmartLedsWrite, brightness};

/// Trait for abstracting a strip of addressable pixels.
///
/// `set_pixel` only stages a colour; nothing reaches the LEDs until `show`.
/// Implementations handle transport errors internally since the control
/// loop has no failure path for lighting.
pub trait PixelStrip {
    /// Number of pixels on the strip.
    fn pixel_count(&self) -> usize;

    /// Stages `color` for pixel `index`. Out-of-range indices are ignored.
    fn set_pixel(&mut self, index: usize, color: Rgb8);

    /// Flushes the staged frame to the LEDs.
    fn show(&mut self);
}

impl<P: PixelStrip + ?Sized> PixelStrip for &mut P {
    fn pixel_count(&self) -> usize {
        (**self).pixel_count()
    }

    fn set_pixel(&mut self, index: usize, color: Rgb8) {
        (**self).set_pixel(index, color);
    }

    fn show(&mut self) {
        (**self).show();
    }
}

/// `N`-pixel frame buffer in front of a `smart-leds` writer.
///
/// The brightness limit is applied on every flush, so staged colours keep
/// their full range.
pub struct SmartLedStrip<W, const N: usize> {
    writer: W,
    frame: [Rgb8; N],
    brightness: u8,
}

impl<W, const N: usize> SmartLedStrip<W, N>
where
    W: SmartLedsWrite,
    W::Color: From<RGB8>,
{
    /// Wraps `writer` with an all-off frame at full brightness.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            frame: [OFF; N],
            brightness: u8::MAX,
        }
    }

    /// Sets the global brightness limit (0-255) used from the next `show`.
    pub fn set_brightness(&mut self, level: u8) {
        self.brightness = level;
    }

    /// Current brightness limit.
    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    /// The staged frame.
    pub fn frame(&self) -> &[Rgb8; N] {
        &self.frame
    }

    /// Releases the underlying writer.
    pub fn release(self) -> W {
        self.writer
    }
}

impl<W, const N: usize> PixelStrip for SmartLedStrip<W, N>
where
    W: SmartLedsWrite,
    W::Color: From<RGB8>,
{
    fn pixel_count(&self) -> usize {
        N
    }

    fn set_pixel(&mut self, index: usize, color: Rgb8) {
        if let Some(pixel) = self.frame.get_mut(index) {
            *pixel = color;
        }
    }

    fn show(&mut self) {
        let pixels = self
            .frame
            .iter()
            .map(|c| RGB8::new(c.red, c.green, c.blue));
        let _ = self.writer.write(brightness(pixels, self.brightness));
    }
}
