//! Piezo speaker abstraction.

use fugit::{HertzU32, MillisDurationU32};

/// Trait for abstracting a tone generator.
///
/// `tone` must return immediately and let the hardware stop the tone on its
/// own after `duration`; a new tone replaces any tone still sounding.
pub trait Speaker {
    /// Starts a square wave at `frequency` for `duration`.
    fn tone(&mut self, frequency: HertzU32, duration: MillisDurationU32);

    /// Silences the speaker now.
    fn no_tone(&mut self);
}

impl<K: Speaker + ?Sized> Speaker for &mut K {
    fn tone(&mut self, frequency: HertzU32, duration: MillisDurationU32) {
        (**self).tone(frequency, duration);
    }

    fn no_tone(&mut self) {
        (**self).no_tone();
    }
}
