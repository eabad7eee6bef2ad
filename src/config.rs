//! Compiled-in constants and tunable parameter groups.
//!
//! Pin assignments belong to the board crate. Everything else the controller
//! needs is fixed here; the structs exist so tests (and boards with different
//! hardware) can shorten or swap individual values.

use crate::input::TriggerMode;
use crate::types::Note;

/// Nominal idle time at the end of every tick.
pub const TICK_PERIOD_MS: u32 = 50;

/// Longest echo pulse waited for before a reading counts as "no echo".
pub const ECHO_TIMEOUT_US: u64 = 30_000;

/// Speed of sound in centimetres per microsecond.
pub const SOUND_CM_PER_US: f32 = 0.0343;

/// Readings below this are sensor self-noise and are clamped to zero.
pub const MIN_DISTANCE_CM: f32 = 0.5;

/// A strip lights up only for objects farther than this.
pub const PRESENCE_THRESHOLD_CM: f32 = 3.0;

/// Low settle time before the trigger pulse.
pub const TRIGGER_SETTLE_US: u32 = 2;

/// Width of the trigger pulse.
pub const TRIGGER_PULSE_US: u32 = 10;

/// Interval between diagnostic distance lines.
pub const REPORT_INTERVAL_MS: u64 = 2_000;

/// Pixels per strip.
pub const STRIP_LEN: usize = 5;

/// Global brightness applied by the strip driver (0-255).
pub const STRIP_BRIGHTNESS: u8 = 40;

/// Number of illuminated buttons.
pub const BUTTON_COUNT: usize = 6;

/// Tone length echoed for every tick a button is held.
pub const PRESS_TONE_MS: u32 = 200;

/// The melody the game is played on (1=C .. 6=A).
pub const REFERENCE_MELODY: [Note; 15] = [
    Note::E,
    Note::E,
    Note::F,
    Note::G,
    Note::G,
    Note::F,
    Note::E,
    Note::D,
    Note::C,
    Note::C,
    Note::D,
    Note::E,
    Note::E,
    Note::D,
    Note::D,
];

/// Victory fanfare as `(note, tone_ms, hold_ms)`.
pub const WIN_FANFARE: [(Note, u32, u32); 4] = [
    (Note::E, 400, 500),
    (Note::G, 400, 500),
    (Note::E, 400, 500),
    (Note::C, 600, 700),
];

/// Parameters of the breathing effect on strip A.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BreathConfig {
    /// Larger is faster. One full breath lasts `4000 / pulse_speed` ms.
    pub pulse_speed: f32,
    /// Hue at `value_min`.
    pub hue_start: u8,
    /// Hue at `value_max`.
    pub hue_end: u8,
    /// Saturation at `value_min`.
    pub sat_start: u8,
    /// Saturation at `value_max`.
    pub sat_end: u8,
    pub value_min: f32,
    pub value_max: f32,
    /// Minimum spacing between strip refreshes.
    pub interval_ms: u64,
}

impl BreathConfig {
    pub const DEFAULT: Self = Self {
        pulse_speed: 0.5,
        hue_start: 15,
        hue_end: 95,
        sat_start: 230,
        sat_end: 255,
        value_min: 120.0,
        value_max: 255.0,
        interval_ms: 30,
    };

    /// Length of one breath in milliseconds, or `None` for a frozen pulse.
    pub fn period_ms(&self) -> Option<u64> {
        if self.pulse_speed > 0.0 {
            let period = libm::roundf(4_000.0 / self.pulse_speed);
            (period >= 1.0).then_some(period as u64)
        } else {
            None
        }
    }
}

impl Default for BreathConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Durations of the game's blocking feedback and its playback cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GameTiming {
    /// Gap between consecutive playback notes, measured from the end of the previous one.
    pub step_delay_ms: u64,
    /// Tone and LED time of one playback note.
    pub note_ms: u32,
    /// Pause after a completed round.
    pub round_pause_ms: u32,
    /// Repetitions of the on/off fail flash.
    pub fail_flashes: u8,
    /// Length of each fail flash phase.
    pub fail_phase_ms: u32,
    /// Tone length inside each fail flash phase.
    pub fail_tone_ms: u32,
    /// Hold after the fail flashes.
    pub fail_hold_ms: u32,
    /// Hold after the win fanfare with all LEDs off.
    pub win_hold_ms: u32,
    /// Tone length of a startup melody note.
    pub intro_tone_ms: u32,
    /// LED time of a startup melody note.
    pub intro_note_ms: u32,
    /// Dark gap after each startup melody note.
    pub intro_gap_ms: u32,
    /// Pause after the startup melody.
    pub intro_tail_ms: u32,
}

impl GameTiming {
    pub const DEFAULT: Self = Self {
        step_delay_ms: 800,
        note_ms: 300,
        round_pause_ms: 1_000,
        fail_flashes: 3,
        fail_phase_ms: 400,
        fail_tone_ms: 300,
        fail_hold_ms: 1_000,
        win_hold_ms: 2_000,
        intro_tone_ms: 300,
        intro_note_ms: 350,
        intro_gap_ms: 50,
        intro_tail_ms: 500,
    };
}

impl Default for GameTiming {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Scheduler-level settings.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControllerConfig {
    pub tick_period_ms: u32,
    pub report_interval_ms: u64,
    pub presence_threshold_cm: f32,
    pub trigger_mode: TriggerMode,
}

impl ControllerConfig {
    pub const DEFAULT: Self = Self {
        tick_period_ms: TICK_PERIOD_MS,
        report_interval_ms: REPORT_INTERVAL_MS,
        presence_threshold_cm: PRESENCE_THRESHOLD_CM,
        trigger_mode: TriggerMode::Level,
    };
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
