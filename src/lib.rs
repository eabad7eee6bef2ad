#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`Controller`**: Owns every subsystem and runs them from one polling loop
//! - **`Board`**: The clock, delay, button panel, speaker and console shared by input and game
//! - **`Zone`**: One ultrasonic sensor driving one LED strip effect
//! - **`ButtonPanel`**: Six active-low buttons with indicator LEDs and tone echo
//! - **`Game`**: The melody memory state machine
//! - **`Melody`**: The fixed note sequence the game is played on
//! - **`PixelStrip`**, **`Speaker`**, **`EchoInput`**, **`SignalPin`**, **`TimeSource`**:
//!   Traits to implement for your hardware, alongside the `embedded-hal` pin and delay traits
//!
//! Timing is wall-clock gated: every cadence compares the time since its last
//! action against a fixed interval, so a slow tick never changes the tempo of
//! the game or the lighting.

#[macro_use]
mod fmt;

pub mod config;
pub mod controller;
pub mod game;
pub mod input;
pub mod lighting;
pub mod melody;
pub mod sensor;
pub mod speaker;
pub mod strip;
pub mod time;
pub mod types;
pub mod wheel;

pub use config::{BreathConfig, ControllerConfig, GameTiming};
pub use controller::{Board, Controller, TickSummary};
pub use game::{Game, GameIo, GameState, Phase, Verdict};
pub use input::{Button, ButtonEvents, ButtonPanel, TriggerMode};
pub use lighting::{BreathState, Effect, Zone};
pub use melody::{Melody, MelodyError};
pub use sensor::{DistanceSensor, DualPinSensor, EchoInput, PolledEcho, SignalPin, SinglePinSensor};
pub use speaker::Speaker;
pub use strip::{PixelStrip, SmartLedStrip};
pub use time::{Duration, Instant, TimeSource};
pub use types::{ButtonEvent, DistanceReading, Note, SensorId};
pub use wheel::{OFF, Rgb8, pack_rgb};
