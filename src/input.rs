//! Button polling with indicator and tone echo.
//!
//! Every poll reads all six active-low button lines in index order. A held
//! button lights its indicator and re-sounds its note; a released one goes
//! dark. That echo is unconditional and independent of the game.

use crate::config::{BUTTON_COUNT, PRESS_TONE_MS};
use crate::speaker::Speaker;
use crate::types::{ButtonEvent, Note};
use embedded_hal::digital::{InputPin, OutputPin};
use fugit::MillisDurationU32;
use heapless::Vec;

/// Events produced by one poll, in button index order.
pub type ButtonEvents = Vec<ButtonEvent, BUTTON_COUNT>;

/// When a held button produces an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TriggerMode {
    /// Every poll that sees the line low emits an event.
    #[default]
    Level,
    /// Only the first poll of each press emits an event.
    Edge,
}

/// An active-low push button with its indicator LED.
pub struct Button<I, O> {
    input: I,
    indicator: O,
}

impl<I: InputPin, O: OutputPin> Button<I, O> {
    /// Pairs a pulled-up input with its indicator output.
    pub fn new(input: I, indicator: O) -> Self {
        Self { input, indicator }
    }

    /// True while the line reads low. Read errors count as released.
    pub fn is_pressed(&mut self) -> bool {
        self.input.is_low().unwrap_or(false)
    }

    /// Drives the indicator.
    pub fn set_indicator(&mut self, on: bool) {
        let _ = if on {
            self.indicator.set_high()
        } else {
            self.indicator.set_low()
        };
    }

    /// Releases both pins.
    pub fn release(self) -> (I, O) {
        (self.input, self.indicator)
    }
}

/// The six illuminated buttons.
pub struct ButtonPanel<I, O> {
    buttons: [Button<I, O>; BUTTON_COUNT],
    held: [bool; BUTTON_COUNT],
    mode: TriggerMode,
}

impl<I: InputPin, O: OutputPin> ButtonPanel<I, O> {
    /// Builds the panel from `(button, indicator)` pin pairs in note order.
    pub fn new(pins: [(I, O); BUTTON_COUNT]) -> Self {
        Self {
            buttons: pins.map(|(input, indicator)| Button::new(input, indicator)),
            held: [false; BUTTON_COUNT],
            mode: TriggerMode::default(),
        }
    }

    /// Changes how held buttons produce events.
    pub fn set_trigger_mode(&mut self, mode: TriggerMode) {
        self.mode = mode;
    }

    pub fn trigger_mode(&self) -> TriggerMode {
        self.mode
    }

    /// Samples every button once.
    ///
    /// Mirrors each line onto its indicator, sounds a short tone for every
    /// held button and returns the press events in index order.
    pub fn poll<K: Speaker>(&mut self, speaker: &mut K) -> ButtonEvents {
        let mut events = ButtonEvents::new();

        for (index, (button, held)) in self.buttons.iter_mut().zip(self.held.iter_mut()).enumerate() {
            let pressed = button.is_pressed();
            button.set_indicator(pressed);

            if pressed {
                if let Some(note) = Note::for_button(index) {
                    speaker.tone(note.frequency(), MillisDurationU32::millis(PRESS_TONE_MS));
                }

                let fire = match self.mode {
                    TriggerMode::Level => true,
                    TriggerMode::Edge => !*held,
                };
                if fire {
                    // One slot per button, cannot overflow
                    let _ = events.push(ButtonEvent::pressed(index));
                }
            }
            *held = pressed;
        }

        events
    }

    /// Drives one indicator. Out-of-range indices are ignored.
    pub fn set_indicator(&mut self, index: usize, on: bool) {
        if let Some(button) = self.buttons.get_mut(index) {
            button.set_indicator(on);
        }
    }

    /// Drives every indicator.
    pub fn set_all_indicators(&mut self, on: bool) {
        for button in &mut self.buttons {
            button.set_indicator(on);
        }
    }
}
