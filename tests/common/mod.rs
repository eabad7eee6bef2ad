//! Shared test infrastructure for simon-lights integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use core::cell::Cell;
use core::convert::Infallible;
use core::fmt;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use fugit::{HertzU32, MillisDurationU32};
use simon_lights::{
    Board, ButtonPanel, Controller, ControllerConfig, DistanceReading, DistanceSensor,
    Duration, EchoInput, Game, GameIo, GameTiming, Instant, Melody, Note, OFF, PixelStrip,
    Rgb8, SensorId, SignalPin, Speaker, TimeSource, Zone,
};

// ============================================================================
// Mock Time
// ============================================================================

/// Clock that only moves when told to (or when a `MockDelay` waits on it)
pub struct MockClock {
    now_us: Cell<u64>,
}

impl MockClock {
    pub fn new() -> Self {
        Self { now_us: Cell::new(0) }
    }

    pub fn advance_us(&self, us: u64) {
        self.now_us.set(self.now_us.get() + us);
    }

    pub fn advance_ms(&self, ms: u64) {
        self.advance_us(ms * 1_000);
    }

    pub fn set_ms(&self, ms: u64) {
        self.now_us.set(ms * 1_000);
    }

    pub fn now_ms(&self) -> u64 {
        self.now_us.get() / 1_000
    }
}

impl TimeSource for MockClock {
    fn now(&self) -> Instant {
        Instant::from_ticks(self.now_us.get())
    }
}

/// Clock that moves forward by `step_us` every time it is read
pub struct TickingClock {
    now_us: Cell<u64>,
    step_us: u64,
}

impl TickingClock {
    pub fn new(step_us: u64) -> Self {
        Self {
            now_us: Cell::new(0),
            step_us,
        }
    }

    /// Current time without advancing
    pub fn peek(&self) -> u64 {
        self.now_us.get()
    }
}

impl TimeSource for TickingClock {
    fn now(&self) -> Instant {
        let now = self.now_us.get();
        self.now_us.set(now + self.step_us);
        Instant::from_ticks(now)
    }
}

/// One recorded blocking wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wait {
    Us(u32),
    Ms(u32),
}

/// Delay that advances a `MockClock` instead of sleeping
pub struct MockDelay<'a> {
    clock: &'a MockClock,
    pub waits: Vec<Wait>,
}

impl<'a> MockDelay<'a> {
    pub fn new(clock: &'a MockClock) -> Self {
        Self {
            clock,
            waits: Vec::new(),
        }
    }

    pub fn ms_waits(&self) -> Vec<u32> {
        self.waits
            .iter()
            .filter_map(|w| match w {
                Wait::Ms(ms) => Some(*ms),
                Wait::Us(_) => None,
            })
            .collect()
    }
}

impl DelayNs for MockDelay<'_> {
    fn delay_ns(&mut self, ns: u32) {
        self.clock.advance_us(u64::from(ns / 1_000));
    }

    fn delay_us(&mut self, us: u32) {
        self.waits.push(Wait::Us(us));
        self.clock.advance_us(u64::from(us));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.waits.push(Wait::Ms(ms));
        self.clock.advance_ms(u64::from(ms));
    }
}

// ============================================================================
// Mock Pins
// ============================================================================

/// Active-low button line backed by a shared flag (true = held down)
pub struct MockButton<'a> {
    held: &'a Cell<bool>,
}

impl<'a> MockButton<'a> {
    pub fn new(held: &'a Cell<bool>) -> Self {
        Self { held }
    }
}

impl ErrorType for MockButton<'_> {
    type Error = Infallible;
}

impl InputPin for MockButton<'_> {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.held.get())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(self.held.get())
    }
}

/// Output line mirrored into a shared flag
pub struct MockOutput<'a> {
    level: &'a Cell<bool>,
}

impl<'a> MockOutput<'a> {
    pub fn new(level: &'a Cell<bool>) -> Self {
        Self { level }
    }
}

impl ErrorType for MockOutput<'_> {
    type Error = Infallible;
}

impl OutputPin for MockOutput<'_> {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.level.set(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.level.set(true);
        Ok(())
    }
}

/// Everything done to a trigger or shared signal line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinOp {
    Output,
    Input,
    High,
    Low,
    Measure,
}

/// Shared trigger/echo line that returns a scripted pulse width
pub struct MockSignalPin {
    pub ops: Vec<PinOp>,
    pub width: Option<Duration>,
}

impl MockSignalPin {
    pub fn new(width: Option<Duration>) -> Self {
        Self {
            ops: Vec::new(),
            width,
        }
    }
}

impl ErrorType for MockSignalPin {
    type Error = Infallible;
}

impl OutputPin for MockSignalPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.ops.push(PinOp::Low);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.ops.push(PinOp::High);
        Ok(())
    }
}

impl EchoInput for MockSignalPin {
    fn measure_high_pulse(&mut self, _timeout: Duration) -> Option<Duration> {
        self.ops.push(PinOp::Measure);
        self.width
    }
}

impl SignalPin for MockSignalPin {
    fn set_output_mode(&mut self) {
        self.ops.push(PinOp::Output);
    }

    fn set_input_mode(&mut self) {
        self.ops.push(PinOp::Input);
    }
}

/// Trigger-only output that records its levels
pub struct MockTrigger {
    pub ops: Vec<PinOp>,
}

impl MockTrigger {
    pub fn new() -> Self {
        Self { ops: Vec::new() }
    }
}

impl ErrorType for MockTrigger {
    type Error = Infallible;
}

impl OutputPin for MockTrigger {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.ops.push(PinOp::Low);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.ops.push(PinOp::High);
        Ok(())
    }
}

/// Echo line with a scripted width
pub struct MockEcho {
    pub width: Option<Duration>,
    pub timeouts: Vec<Duration>,
}

impl MockEcho {
    pub fn new(width: Option<Duration>) -> Self {
        Self {
            width,
            timeouts: Vec::new(),
        }
    }
}

impl EchoInput for MockEcho {
    fn measure_high_pulse(&mut self, timeout: Duration) -> Option<Duration> {
        self.timeouts.push(timeout);
        self.width
    }
}

/// Digital input that is high during the given `[from, until)` windows of a `TickingClock`
pub struct ScriptedLine<'a> {
    clock: &'a TickingClock,
    pulses: Vec<(u64, u64)>,
}

impl<'a> ScriptedLine<'a> {
    pub fn new(clock: &'a TickingClock, pulses: &[(u64, u64)]) -> Self {
        Self {
            clock,
            pulses: pulses.to_vec(),
        }
    }
}

impl ErrorType for ScriptedLine<'_> {
    type Error = Infallible;
}

impl InputPin for ScriptedLine<'_> {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        let t = self.clock.peek();
        Ok(self.pulses.iter().any(|&(from, until)| t >= from && t < until))
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}

// ============================================================================
// Mock Sensor, Strip, Speaker
// ============================================================================

/// Distance sensor reading whatever the shared cell holds
pub struct ScriptedSensor<'a> {
    id: SensorId,
    distance: &'a Cell<Option<f32>>,
    pub samples: usize,
}

impl<'a> ScriptedSensor<'a> {
    pub fn new(id: SensorId, distance: &'a Cell<Option<f32>>) -> Self {
        Self {
            id,
            distance,
            samples: 0,
        }
    }
}

impl DistanceSensor for ScriptedSensor<'_> {
    fn id(&self) -> SensorId {
        self.id
    }

    fn sample<D: DelayNs>(&mut self, _delay: &mut D) -> DistanceReading {
        self.samples += 1;
        DistanceReading::new(self.id, self.distance.get())
    }
}

/// Strip that keeps staged pixels and counts flushes
pub struct MockStrip {
    pub pixels: Vec<Rgb8>,
    pub shown: Vec<Vec<Rgb8>>,
}

impl MockStrip {
    pub fn new(len: usize) -> Self {
        Self {
            pixels: vec![OFF; len],
            shown: Vec::new(),
        }
    }

    pub fn show_count(&self) -> usize {
        self.shown.len()
    }

    pub fn last_frame(&self) -> Option<&[Rgb8]> {
        self.shown.last().map(Vec::as_slice)
    }

    pub fn is_dark(&self) -> bool {
        self.last_frame()
            .is_some_and(|frame| frame.iter().all(|&p| p == OFF))
    }
}

impl PixelStrip for MockStrip {
    fn pixel_count(&self) -> usize {
        self.pixels.len()
    }

    fn set_pixel(&mut self, index: usize, color: Rgb8) {
        if let Some(pixel) = self.pixels.get_mut(index) {
            *pixel = color;
        }
    }

    fn show(&mut self) {
        self.shown.push(self.pixels.clone());
    }
}

/// Speaker that records every tone as `(hz, ms)`
pub struct MockSpeaker {
    pub tones: Vec<(u32, u32)>,
    pub silences: usize,
}

impl MockSpeaker {
    pub fn new() -> Self {
        Self {
            tones: Vec::new(),
            silences: 0,
        }
    }
}

impl Speaker for MockSpeaker {
    fn tone(&mut self, frequency: HertzU32, duration: MillisDurationU32) {
        self.tones.push((frequency.raw(), duration.ticks()));
    }

    fn no_tone(&mut self) {
        self.silences += 1;
    }
}

// ============================================================================
// Recording GameIo
// ============================================================================

/// Stand-alone `GameIo` with its own clock, for driving `Game` directly
pub struct RecordingIo {
    now_us: u64,
    pub indicators: [bool; 6],
    pub indicator_log: Vec<(usize, bool)>,
    pub all_log: Vec<bool>,
    pub tones: Vec<(Note, u32)>,
    pub pauses: Vec<u32>,
    pub silences: usize,
    pub lines: Vec<String>,
}

impl RecordingIo {
    pub fn new() -> Self {
        Self {
            now_us: 0,
            indicators: [false; 6],
            indicator_log: Vec::new(),
            all_log: Vec::new(),
            tones: Vec::new(),
            pauses: Vec::new(),
            silences: 0,
            lines: Vec::new(),
        }
    }

    pub fn advance_ms(&mut self, ms: u64) {
        self.now_us += ms * 1_000;
    }

    pub fn now_ms(&self) -> u64 {
        self.now_us / 1_000
    }

    pub fn clear(&mut self) {
        self.indicator_log.clear();
        self.all_log.clear();
        self.tones.clear();
        self.pauses.clear();
        self.silences = 0;
        self.lines.clear();
    }

    pub fn said(&self, line: &str) -> bool {
        self.lines.iter().any(|l| l == line)
    }
}

impl TimeSource for RecordingIo {
    fn now(&self) -> Instant {
        Instant::from_ticks(self.now_us)
    }
}

impl GameIo for RecordingIo {
    fn pause_ms(&mut self, ms: u32) {
        self.pauses.push(ms);
        self.now_us += u64::from(ms) * 1_000;
    }

    fn set_indicator(&mut self, index: usize, on: bool) {
        self.indicators[index] = on;
        self.indicator_log.push((index, on));
    }

    fn set_all_indicators(&mut self, on: bool) {
        self.indicators = [on; 6];
        self.all_log.push(on);
    }

    fn tone(&mut self, note: Note, duration_ms: u32) {
        self.tones.push((note, duration_ms));
    }

    fn silence(&mut self) {
        self.silences += 1;
    }

    fn report(&mut self, args: fmt::Arguments<'_>) {
        self.lines.push(args.to_string());
    }
}

// ============================================================================
// Full controller rig
// ============================================================================

pub type TestController<'a> = Controller<
    'a,
    'a,
    MockClock,
    MockDelay<'a>,
    MockButton<'a>,
    MockOutput<'a>,
    MockSpeaker,
    String,
    ScriptedSensor<'a>,
    MockStrip,
    ScriptedSensor<'a>,
    MockStrip,
>;

/// Shared state the controller's mock hardware points into
pub struct Rig {
    pub clock: MockClock,
    pub buttons: [Cell<bool>; 6],
    pub leds: [Cell<bool>; 6],
    pub distance_a: Cell<Option<f32>>,
    pub distance_b: Cell<Option<f32>>,
}

impl Rig {
    pub fn new() -> Self {
        Self {
            clock: MockClock::new(),
            buttons: Default::default(),
            leds: Default::default(),
            distance_a: Cell::new(None),
            distance_b: Cell::new(None),
        }
    }

    pub fn controller<'a>(
        &'a self,
        melody: Melody<'a>,
        config: ControllerConfig,
    ) -> TestController<'a> {
        let pins = core::array::from_fn(|i| {
            (MockButton::new(&self.buttons[i]), MockOutput::new(&self.leds[i]))
        });
        let board = Board::new(
            &self.clock,
            MockDelay::new(&self.clock),
            ButtonPanel::new(pins),
            MockSpeaker::new(),
            String::new(),
        );
        let zone_a = Zone::breathing(
            ScriptedSensor::new(SensorId::A, &self.distance_a),
            MockStrip::new(5),
            Default::default(),
        );
        let zone_b = Zone::rainbow(
            ScriptedSensor::new(SensorId::B, &self.distance_b),
            MockStrip::new(5),
        );
        let game = Game::new(melody, GameTiming::default());
        Controller::new(board, zone_a, zone_b, game, config)
    }

    pub fn press(&self, button: usize) {
        self.buttons[button].set(true);
    }

    pub fn release_all(&self) {
        for button in &self.buttons {
            button.set(false);
        }
    }

    pub fn lit(&self) -> [bool; 6] {
        core::array::from_fn(|i| self.leds[i].get())
    }
}

// ============================================================================
// Test Helper Functions
// ============================================================================

/// The three-note melody used by the round scenarios (E E F, i.e. 3 3 4)
pub const SHORT_MELODY: [Note; 3] = [Note::E, Note::E, Note::F];

/// Event slice for a single press of `note`
pub fn press(note: Note) -> [simon_lights::ButtonEvent; 1] {
    [simon_lights::ButtonEvent::pressed(note.button())]
}
