//! The cooperative scheduler.
//!
//! One [`Controller::tick`] services every subsystem in a fixed order:
//!
//! 1. sample sensor A, render strip A, sample sensor B, render strip B
//! 2. print the distance report if it is due
//! 3. poll the buttons (indicator and tone echo)
//! 4. feed the presses to the game and advance it
//! 5. idle for the tick period
//!
//! There are no interrupts or locks. The indicators and the speaker are
//! shared by the poller and the game purely through this ordering, and any
//! blocking feedback in step 4 stalls the whole loop until it finishes.

use crate::config::ControllerConfig;
use crate::game::{Game, GameIo, GameState, Verdict};
use crate::input::{ButtonEvents, ButtonPanel};
use crate::lighting::Zone;
use crate::sensor::DistanceSensor;
use crate::speaker::Speaker;
use crate::strip::PixelStrip;
use crate::time::{BOOT, Instant, TimeSource, interval_passed};
use crate::types::{DistanceReading, Note};
use core::fmt::{self, Write};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use fugit::MillisDurationU32;

/// The hardware shared between the input poller and the game.
pub struct Board<'t, T, D, I, O, K, W> {
    clock: &'t T,
    delay: D,
    panel: ButtonPanel<I, O>,
    speaker: K,
    console: W,
}

impl<'t, T, D, I, O, K, W> Board<'t, T, D, I, O, K, W>
where
    T: TimeSource,
    D: DelayNs,
    I: InputPin,
    O: OutputPin,
    K: Speaker,
    W: Write,
{
    pub fn new(clock: &'t T, delay: D, panel: ButtonPanel<I, O>, speaker: K, console: W) -> Self {
        Self {
            clock,
            delay,
            panel,
            speaker,
            console,
        }
    }

    pub fn panel(&self) -> &ButtonPanel<I, O> {
        &self.panel
    }

    pub fn panel_mut(&mut self) -> &mut ButtonPanel<I, O> {
        &mut self.panel
    }

    pub fn speaker(&self) -> &K {
        &self.speaker
    }

    pub fn console(&self) -> &W {
        &self.console
    }

    pub fn delay_mut(&mut self) -> &mut D {
        &mut self.delay
    }

    /// Samples the buttons, echoing them on the indicators and speaker.
    pub fn poll_buttons(&mut self) -> ButtonEvents {
        self.panel.poll(&mut self.speaker)
    }
}

impl<T: TimeSource, D, I, O, K, W> TimeSource for Board<'_, T, D, I, O, K, W> {
    fn now(&self) -> Instant {
        self.clock.now()
    }
}

impl<T, D, I, O, K, W> GameIo for Board<'_, T, D, I, O, K, W>
where
    T: TimeSource,
    D: DelayNs,
    I: InputPin,
    O: OutputPin,
    K: Speaker,
    W: Write,
{
    fn pause_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }

    fn set_indicator(&mut self, index: usize, on: bool) {
        self.panel.set_indicator(index, on);
    }

    fn set_all_indicators(&mut self, on: bool) {
        self.panel.set_all_indicators(on);
    }

    fn tone(&mut self, note: Note, duration_ms: u32) {
        self.speaker
            .tone(note.frequency(), MillisDurationU32::millis(duration_ms));
    }

    fn silence(&mut self) {
        self.speaker.no_tone();
    }

    fn report(&mut self, args: fmt::Arguments<'_>) {
        let _ = self.console.write_fmt(args);
        let _ = self.console.write_str("\n");
    }
}

/// What happened during one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickSummary {
    pub reading_a: DistanceReading,
    pub reading_b: DistanceReading,
    pub events: ButtonEvents,
    pub verdict: Option<Verdict>,
}

/// Owns all subsystems and runs them from one loop.
pub struct Controller<'t, 'm, T, D, I, O, K, W, SA, PA, SB, PB> {
    board: Board<'t, T, D, I, O, K, W>,
    zone_a: Zone<SA, PA>,
    zone_b: Zone<SB, PB>,
    game: Game<'m>,
    config: ControllerConfig,
    last_report: Instant,
}

impl<'t, 'm, T, D, I, O, K, W, SA, PA, SB, PB> Controller<'t, 'm, T, D, I, O, K, W, SA, PA, SB, PB>
where
    T: TimeSource,
    D: DelayNs,
    I: InputPin,
    O: OutputPin,
    K: Speaker,
    W: Write,
    SA: DistanceSensor,
    PA: PixelStrip,
    SB: DistanceSensor,
    PB: PixelStrip,
{
    /// Assembles the controller. Nothing is driven until [`start`](Self::start).
    pub fn new(
        mut board: Board<'t, T, D, I, O, K, W>,
        zone_a: Zone<SA, PA>,
        zone_b: Zone<SB, PB>,
        game: Game<'m>,
        config: ControllerConfig,
    ) -> Self {
        board.panel.set_trigger_mode(config.trigger_mode);
        Self {
            board,
            zone_a,
            zone_b,
            game,
            config,
            last_report: BOOT,
        }
    }

    /// Boot sequence: dark strips and indicators, the intro melody, a fresh game.
    pub fn start(&mut self) {
        info!("starting, melody of {} notes", self.game.melody().len());
        self.zone_a.blank();
        self.zone_b.blank();
        self.board.set_all_indicators(false);
        self.game.play_intro(&mut self.board);
        self.game.reset();
    }

    /// Runs one pass of the loop, including the trailing idle period.
    pub fn tick(&mut self) -> TickSummary {
        let threshold = self.config.presence_threshold_cm;

        let reading_a = self.zone_a.sample(&mut self.board.delay);
        self.zone_a
            .render(reading_a.is_present(threshold), self.board.clock.now());

        let reading_b = self.zone_b.sample(&mut self.board.delay);
        self.zone_b
            .render(reading_b.is_present(threshold), self.board.clock.now());

        self.report_distances(&reading_a, &reading_b);

        let events = self.board.poll_buttons();
        let verdict = self.game.step(&events, &mut self.board);

        self.board.delay.delay_ms(self.config.tick_period_ms);

        TickSummary {
            reading_a,
            reading_b,
            events,
            verdict,
        }
    }

    /// Ticks forever.
    pub fn run(&mut self) -> ! {
        loop {
            self.tick();
        }
    }

    fn report_distances(&mut self, a: &DistanceReading, b: &DistanceReading) {
        let now = self.board.clock.now();
        if !interval_passed(now, self.last_report, self.config.report_interval_ms) {
            return;
        }
        self.board.report(format_args!(
            "{}: {} | {}: {}",
            a.sensor,
            Distance(a.distance_cm),
            b.sensor,
            Distance(b.distance_cm)
        ));
        self.last_report = self.board.clock.now();
    }

    pub fn game_state(&self) -> GameState {
        self.game.state()
    }

    pub fn game(&self) -> &Game<'m> {
        &self.game
    }

    pub fn board(&self) -> &Board<'t, T, D, I, O, K, W> {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut Board<'t, T, D, I, O, K, W> {
        &mut self.board
    }

    pub fn zone_a(&self) -> &Zone<SA, PA> {
        &self.zone_a
    }

    pub fn zone_b(&self) -> &Zone<SB, PB> {
        &self.zone_b
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }
}

/// Distance for the console, with a dash for "no echo".
struct Distance(Option<f32>);

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(cm) => write!(f, "{:.2} cm", cm),
            None => f.write_str("—"),
        }
    }
}
