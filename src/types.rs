//! Core value types shared between the subsystems.

use fugit::HertzU32;

/// A key of the six-button keyboard, numbered 1..=6 from low to high.
///
/// Button `i` (zero-based) is wired to note `i + 1`; melodies are written in
/// these one-based indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Note {
    C = 1,
    D = 2,
    E = 3,
    F = 4,
    G = 5,
    A = 6,
}

impl Note {
    /// All notes in button order.
    pub const ALL: [Note; 6] = [Note::C, Note::D, Note::E, Note::F, Note::G, Note::A];

    /// Looks up a note by its one-based index.
    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            1 => Some(Note::C),
            2 => Some(Note::D),
            3 => Some(Note::E),
            4 => Some(Note::F),
            5 => Some(Note::G),
            6 => Some(Note::A),
            _ => None,
        }
    }

    /// The note played by the zero-based button `button`.
    pub const fn for_button(button: usize) -> Option<Self> {
        if button < Self::ALL.len() {
            Some(Self::ALL[button])
        } else {
            None
        }
    }

    /// One-based index as used in melodies.
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Zero-based button (and indicator) carrying this note.
    pub const fn button(self) -> usize {
        self as usize - 1
    }

    /// Piano pitch of the note, rounded to whole hertz.
    pub const fn frequency(self) -> HertzU32 {
        let hz = match self {
            Note::C => 262,
            Note::D => 294,
            Note::E => 330,
            Note::F => 349,
            Note::G => 392,
            Note::A => 440,
        };
        HertzU32::from_raw(hz)
    }
}

/// Which ultrasonic sensor (and paired strip) a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorId {
    /// Single-pin sensor driving the breathing strip.
    A,
    /// Dual-pin sensor driving the rainbow strip.
    B,
}

impl core::fmt::Display for SensorId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SensorId::A => f.write_str("A"),
            SensorId::B => f.write_str("B"),
        }
    }
}

/// One distance measurement. `distance_cm` is `None` when no echo came back.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DistanceReading {
    pub sensor: SensorId,
    pub distance_cm: Option<f32>,
}

impl DistanceReading {
    /// Creates a reading.
    pub const fn new(sensor: SensorId, distance_cm: Option<f32>) -> Self {
        Self {
            sensor,
            distance_cm,
        }
    }

    /// A reading with no echo.
    pub const fn no_echo(sensor: SensorId) -> Self {
        Self::new(sensor, None)
    }

    /// True when an object was seen strictly beyond `threshold_cm`.
    pub fn is_present(&self, threshold_cm: f32) -> bool {
        self.distance_cm.is_some_and(|cm| cm > threshold_cm)
    }
}

/// A button observed pressed during a poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonEvent {
    /// Zero-based button index.
    pub index: usize,
}

impl ButtonEvent {
    /// Creates an event for button `index`.
    pub const fn pressed(index: usize) -> Self {
        Self { index }
    }

    /// The note wired to the pressed button.
    pub const fn note(&self) -> Option<Note> {
        Note::for_button(self.index)
    }
}
