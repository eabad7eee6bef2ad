//! Presence-driven strip effects.
//!
//! Each [`Zone`] pairs one distance sensor with one strip. While something is
//! in front of the sensor the strip runs its effect; otherwise it is blanked
//! and flushed on every tick.
//!
//! # Breathing
//!
//! The value channel follows `e^sin(φ)`, which dwells longer near the dim
//! end than a plain sine:
//!
//! ```text
//! φ     = pulse_speed * t_ms / 2000 * π
//! delta = (value_max - value_min) / (e - 1/e)
//! val   = value_min + (e^sin(φ) - 1/e) * delta
//! ```
//!
//! Hue and saturation are mapped linearly from `val` onto their endpoint
//! pairs. The pixel colour is the three-sector wheel at `hue` with every
//! channel scaled by `val`. The state is a
//! pure function of `t_ms mod period`; only the time of the last refresh is
//! remembered, to limit strip writes to one per `interval_ms`.
//!
//! # Rainbow
//!
//! A fixed gradient across the wheel, repainted every tick.

use crate::config::BreathConfig;
use crate::sensor::DistanceSensor;
use crate::strip::PixelStrip;
use crate::time::{BOOT, Instant, interval_passed, millis};
use crate::types::{DistanceReading, SensorId};
use crate::wheel::{OFF, Rgb8, color_wheel, map_range, rainbow_position, scaled_wheel};
use core::f32::consts::{E, PI};
use embedded_hal::delay::DelayNs;

/// Sets every pixel to `color` and flushes.
pub fn fill<P: PixelStrip>(strip: &mut P, color: Rgb8) {
    for index in 0..strip.pixel_count() {
        strip.set_pixel(index, color);
    }
    strip.show();
}

/// Turns every pixel off and flushes.
pub fn blank<P: PixelStrip>(strip: &mut P) {
    fill(strip, OFF);
}

/// Paints the static rainbow gradient and flushes.
pub fn paint_rainbow<P: PixelStrip>(strip: &mut P) {
    let count = strip.pixel_count();
    for index in 0..count {
        strip.set_pixel(index, color_wheel(rainbow_position(index, count)));
    }
    strip.show();
}

/// Oscillator state of the breathing effect.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BreathState {
    pub hue: u8,
    pub sat: u8,
    /// Always within `[value_min, value_max]`.
    pub val: f32,
    last_update: Instant,
}

impl BreathState {
    /// State at the dim end of the pulse, never refreshed.
    pub fn new(config: &BreathConfig) -> Self {
        Self {
            hue: config.hue_start,
            sat: config.sat_start,
            val: config.value_min,
            last_update: BOOT,
        }
    }

    /// Evaluates the pulse at `t_ms` milliseconds since boot.
    pub fn at(config: &BreathConfig, t_ms: u64) -> Self {
        let t = match config.period_ms() {
            Some(period) => t_ms % period,
            None => t_ms,
        };
        let phase = config.pulse_speed * t as f32 / 2_000.0 * PI;
        let delta = (config.value_max - config.value_min) / (E - 1.0 / E);
        let val = config.value_min + (libm::expf(libm::sinf(phase)) - 1.0 / E) * delta;
        let val = val.max(config.value_min).min(config.value_max);

        let lo = config.value_min as i32;
        let hi = config.value_max as i32;
        let hue = map_range(val as i32, lo, hi, config.hue_start.into(), config.hue_end.into());
        let sat = map_range(val as i32, lo, hi, config.sat_start.into(), config.sat_end.into());

        Self {
            hue: hue.clamp(0, 255) as u8,
            sat: sat.clamp(0, 255) as u8,
            val,
            last_update: BOOT,
        }
    }

    /// RGB colour of this state: the wheel colour at `hue` scaled by `val`.
    ///
    /// `sat` follows the pulse but does not tint the output.
    pub fn color(&self) -> Rgb8 {
        scaled_wheel(self.hue, self.val as u8)
    }

    /// When the strip was last refreshed.
    pub fn last_update(&self) -> Instant {
        self.last_update
    }
}

/// What a zone shows while something is present.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect {
    Breathing {
        config: BreathConfig,
        state: BreathState,
    },
    Rainbow,
}

/// A distance sensor driving one strip.
pub struct Zone<S, P> {
    sensor: S,
    strip: P,
    effect: Effect,
}

impl<S: DistanceSensor, P: PixelStrip> Zone<S, P> {
    /// Zone running the breathing effect.
    pub fn breathing(sensor: S, strip: P, config: BreathConfig) -> Self {
        let state = BreathState::new(&config);
        Self {
            sensor,
            strip,
            effect: Effect::Breathing { config, state },
        }
    }

    /// Zone running the static rainbow.
    pub fn rainbow(sensor: S, strip: P) -> Self {
        Self {
            sensor,
            strip,
            effect: Effect::Rainbow,
        }
    }

    pub fn id(&self) -> SensorId {
        self.sensor.id()
    }

    /// Takes one distance reading.
    pub fn sample<D: DelayNs>(&mut self, delay: &mut D) -> DistanceReading {
        self.sensor.sample(delay)
    }

    /// Updates the strip for this tick.
    pub fn render(&mut self, presence: bool, now: Instant) {
        if !presence {
            blank(&mut self.strip);
            return;
        }

        match &mut self.effect {
            Effect::Breathing { config, state } => {
                if !interval_passed(now, state.last_update, config.interval_ms) {
                    return;
                }
                *state = BreathState::at(config, millis(now));
                state.last_update = now;
                fill(&mut self.strip, state.color());
            }
            Effect::Rainbow => paint_rainbow(&mut self.strip),
        }
    }

    /// Blanks the strip regardless of presence.
    pub fn blank(&mut self) {
        blank(&mut self.strip);
    }

    pub fn effect(&self) -> &Effect {
        &self.effect
    }

    pub fn strip(&self) -> &P {
        &self.strip
    }

    pub fn strip_mut(&mut self) -> &mut P {
        &mut self.strip
    }

    pub fn sensor_mut(&mut self) -> &mut S {
        &mut self.sensor
    }
}
