//! Melody memory game state machine.
//!
//! Round `turn` plays the first `turn + 1` notes of the melody and then waits
//! for the player to repeat them on the buttons:
//!
//! ```text
//!        ┌──────────────────── round complete ─────────────────────┐
//!        v                                                         │
//!      Idle ──> ShowingSequence ──> AwaitingInput ──> (correct) ───┘
//!        ^                              │
//!        │                              ├──> (wrong) ──> Resolving: fail flash ──┐
//!        │                              │                                        │
//!        └──────────────────────────────┴─── turn == len ──> Resolving: win ─────┘
//! ```
//!
//! Playback is paced by wall-clock time, not by tick count. Feedback
//! animations block the caller for their full length, so nothing else in
//! the loop runs while a note, the fail flash or the win fanfare plays.
//!
//! Only a playback note restarts the cadence timer. The pauses after a
//! round, a fail or a win already cover the step delay, so the next round
//! opens with a note on the following advance.

use crate::config::{GameTiming, WIN_FANFARE};
use crate::melody::Melody;
use crate::time::{BOOT, Instant, TimeSource, interval_passed};
use crate::types::{ButtonEvent, Note};
use core::fmt;

/// Game phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Between rounds. Left on the next advance.
    #[default]
    Idle,
    /// Playing back the current prefix.
    ShowingSequence,
    /// Collecting the player's answer.
    AwaitingInput,
    /// A fail or win animation is running.
    Resolving,
}

/// Progress through the melody.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GameState {
    /// Zero-based round; the round asks for `turn + 1` notes.
    pub turn: usize,
    /// Next note to play back or expect.
    pub current_step: usize,
    pub phase: Phase,
}

impl GameState {
    /// Start-of-game state.
    pub const INITIAL: Self = Self {
        turn: 0,
        current_step: 0,
        phase: Phase::Idle,
    };
}

/// Outcome of one consumed button press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Verdict {
    /// Matched, more notes to go this round.
    Correct,
    /// Matched the last note of the round.
    RoundComplete,
    /// Did not match; the game was reset.
    Wrong,
}

/// Everything the game drives or waits on.
///
/// The indicators and speaker are shared with the input poller; the game
/// only borrows them between polls.
pub trait GameIo: TimeSource {
    /// Blocks for `ms` milliseconds.
    fn pause_ms(&mut self, ms: u32);

    /// Drives the indicator of button `index`.
    fn set_indicator(&mut self, index: usize, on: bool);

    /// Drives every indicator.
    fn set_all_indicators(&mut self, on: bool);

    /// Starts `note` for `duration_ms` without blocking.
    fn tone(&mut self, note: Note, duration_ms: u32);

    /// Silences the speaker.
    fn silence(&mut self);

    /// Writes one line to the console.
    fn report(&mut self, args: fmt::Arguments<'_>);
}

/// The memory game.
#[derive(Debug, Clone)]
pub struct Game<'m> {
    melody: Melody<'m>,
    timing: GameTiming,
    state: GameState,
    last_action: Instant,
}

impl<'m> Game<'m> {
    /// A fresh game on `melody`.
    pub fn new(melody: Melody<'m>, timing: GameTiming) -> Self {
        Self {
            melody,
            timing,
            state: GameState::INITIAL,
            last_action: BOOT,
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn melody(&self) -> Melody<'m> {
        self.melody
    }

    pub fn timing(&self) -> &GameTiming {
        &self.timing
    }

    /// Plays the whole melody once as a power-on greeting.
    pub fn play_intro<IO: GameIo>(&self, io: &mut IO) {
        for note in self.melody.notes() {
            io.set_indicator(note.button(), true);
            io.tone(*note, self.timing.intro_tone_ms);
            io.pause_ms(self.timing.intro_note_ms);
            io.set_indicator(note.button(), false);
            io.pause_ms(self.timing.intro_gap_ms);
        }
        io.pause_ms(self.timing.intro_tail_ms);
    }

    /// Back to the first round.
    pub fn reset(&mut self) {
        self.state = GameState::INITIAL;
    }

    /// Checks this tick's presses against the melody.
    ///
    /// Only acts while awaiting input, and only on the lowest-indexed press;
    /// every other event is dropped.
    pub fn handle_input<IO: GameIo>(&mut self, events: &[ButtonEvent], io: &mut IO) -> Option<Verdict> {
        if self.state.phase != Phase::AwaitingInput {
            return None;
        }
        let event = events.iter().min_by_key(|event| event.index)?;
        let expected = self.melody.get(self.state.current_step)?;

        if event.note() == Some(expected) {
            io.report(format_args!("Correct!"));
            self.state.current_step += 1;

            if self.state.current_step > self.state.turn {
                self.state.turn += 1;
                self.state.current_step = 0;
                self.state.phase = Phase::Idle;
                debug!("round complete, turn now {}", self.state.turn);
                io.report(format_args!("Good! Next level..."));
                io.pause_ms(self.timing.round_pause_ms);
                return Some(Verdict::RoundComplete);
            }
            Some(Verdict::Correct)
        } else {
            debug!("button {} pressed, expected {}", event.index, expected);
            io.report(format_args!("Wrong! Try again."));
            self.fail(io);
            Some(Verdict::Wrong)
        }
    }

    /// Moves the state machine along by one tick.
    pub fn advance<IO: GameIo>(&mut self, io: &mut IO) {
        if self.state.turn >= self.melody.len() {
            self.win(io);
            return;
        }

        if self.state.phase == Phase::Idle {
            self.state.phase = Phase::ShowingSequence;
            self.state.current_step = 0;
            io.report(format_args!("Turn {}", self.state.turn + 1));
        }

        if self.state.phase != Phase::ShowingSequence
            || !interval_passed(io.now(), self.last_action, self.timing.step_delay_ms)
        {
            return;
        }

        if self.state.current_step <= self.state.turn {
            if let Some(note) = self.melody.get(self.state.current_step) {
                self.play_note(note, io);
            }
            self.state.current_step += 1;
            self.last_action = io.now();
        } else {
            self.state.phase = Phase::AwaitingInput;
            self.state.current_step = 0;
            trace!("awaiting {} notes", self.state.turn + 1);
            io.report(format_args!("Your turn!"));
        }
    }

    /// One full tick of game logic: input first, then progression.
    pub fn step<IO: GameIo>(&mut self, events: &[ButtonEvent], io: &mut IO) -> Option<Verdict> {
        let verdict = self.handle_input(events, io);
        self.advance(io);
        verdict
    }

    fn play_note<IO: GameIo>(&self, note: Note, io: &mut IO) {
        io.set_indicator(note.button(), true);
        io.tone(note, self.timing.note_ms);
        io.pause_ms(self.timing.note_ms);
        io.set_indicator(note.button(), false);
        io.silence();
    }

    fn fail<IO: GameIo>(&mut self, io: &mut IO) {
        self.state.phase = Phase::Resolving;
        info!("fail at turn {}", self.state.turn);
        io.report(format_args!("FAIL! Restarting..."));

        for _ in 0..self.timing.fail_flashes {
            io.set_all_indicators(true);
            io.tone(Note::C, self.timing.fail_tone_ms);
            io.pause_ms(self.timing.fail_phase_ms);
            io.set_all_indicators(false);
            io.tone(Note::G, self.timing.fail_tone_ms);
            io.pause_ms(self.timing.fail_phase_ms);
        }
        io.silence();

        self.reset();
        io.pause_ms(self.timing.fail_hold_ms);
    }

    fn win<IO: GameIo>(&mut self, io: &mut IO) {
        self.state.phase = Phase::Resolving;
        info!("melody complete after {} rounds", self.state.turn);
        io.report(format_args!("YOU WIN!"));

        io.set_all_indicators(true);
        for (note, tone_ms, hold_ms) in WIN_FANFARE {
            io.tone(note, tone_ms);
            io.pause_ms(hold_ms);
        }
        io.silence();
        io.set_all_indicators(false);
        io.pause_ms(self.timing.win_hold_ms);

        self.reset();
    }
}
