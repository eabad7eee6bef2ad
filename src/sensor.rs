//! Ultrasonic distance sampling.
//!
//! A sample fires a trigger pulse (low 2µs, high 10µs, low), then times the
//! high phase of the echo line. The echo width is the round trip of the
//! sound burst, so the distance is `width_us * 0.0343 / 2` centimetres.
//!
//! Two wirings are supported with identical results: [`SinglePinSensor`]
//! shares one line for trigger and echo and flips its direction in between,
//! [`DualPinSensor`] has separate trigger and echo lines. A missing echo is
//! an ordinary outcome and is reported as a reading without a distance.

use crate::config::{
    ECHO_TIMEOUT_US, MIN_DISTANCE_CM, SOUND_CM_PER_US, TRIGGER_PULSE_US, TRIGGER_SETTLE_US,
};
use crate::time::{Duration, Instant, TimeSource, elapsed};
use crate::types::{DistanceReading, SensorId};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

/// Longest echo waited for.
pub const ECHO_TIMEOUT: Duration = Duration::micros(ECHO_TIMEOUT_US);

/// Times the high phase of an echo line.
pub trait EchoInput {
    /// Width of the next high pulse, or `None` if none completed in `timeout`.
    fn measure_high_pulse(&mut self, timeout: Duration) -> Option<Duration>;
}

/// A single line that triggers as an output and listens as an input.
pub trait SignalPin: OutputPin + EchoInput {
    /// Switches the line to push-pull output.
    fn set_output_mode(&mut self);

    /// Switches the line to floating input.
    fn set_input_mode(&mut self);
}

/// Anything that can produce a distance reading.
pub trait DistanceSensor {
    /// Which sensor this is.
    fn id(&self) -> SensorId;

    /// Fires one measurement, blocking for at most the echo timeout.
    fn sample<D: DelayNs>(&mut self, delay: &mut D) -> DistanceReading;
}

/// Converts an echo width to centimetres.
///
/// A zero width means no echo. Results under half a centimetre are sensor
/// self-noise and are clamped to zero.
pub fn echo_to_distance_cm(width: Duration) -> Option<f32> {
    let micros = width.ticks();
    if micros == 0 {
        return None;
    }
    let cm = micros as f32 * SOUND_CM_PER_US / 2.0;
    Some(if cm < MIN_DISTANCE_CM { 0.0 } else { cm })
}

fn fire_trigger<P: OutputPin, D: DelayNs>(pin: &mut P, delay: &mut D) {
    let _ = pin.set_low();
    delay.delay_us(TRIGGER_SETTLE_US);
    let _ = pin.set_high();
    delay.delay_us(TRIGGER_PULSE_US);
    let _ = pin.set_low();
}

fn reading(id: SensorId, width: Option<Duration>) -> DistanceReading {
    let distance_cm = width.and_then(echo_to_distance_cm);
    if distance_cm.is_none() {
        trace!("sensor {}: no echo", id);
    }
    DistanceReading::new(id, distance_cm)
}

/// Sensor with one shared trigger/echo line.
pub struct SinglePinSensor<P> {
    id: SensorId,
    pin: P,
}

impl<P: SignalPin> SinglePinSensor<P> {
    /// Takes the line and parks it as a low output.
    pub fn new(id: SensorId, mut pin: P) -> Self {
        pin.set_output_mode();
        let _ = pin.set_low();
        Self { id, pin }
    }

    /// Releases the line.
    pub fn release(self) -> P {
        self.pin
    }
}

impl<P: SignalPin> DistanceSensor for SinglePinSensor<P> {
    fn id(&self) -> SensorId {
        self.id
    }

    fn sample<D: DelayNs>(&mut self, delay: &mut D) -> DistanceReading {
        self.pin.set_output_mode();
        fire_trigger(&mut self.pin, delay);
        self.pin.set_input_mode();
        let width = self.pin.measure_high_pulse(ECHO_TIMEOUT);
        reading(self.id, width)
    }
}

/// Sensor with separate trigger and echo lines.
pub struct DualPinSensor<T, E> {
    id: SensorId,
    trigger: T,
    echo: E,
}

impl<T: OutputPin, E: EchoInput> DualPinSensor<T, E> {
    /// Takes both lines and parks the trigger low.
    pub fn new(id: SensorId, mut trigger: T, echo: E) -> Self {
        let _ = trigger.set_low();
        Self { id, trigger, echo }
    }

    /// Releases both lines.
    pub fn release(self) -> (T, E) {
        (self.trigger, self.echo)
    }
}

impl<T: OutputPin, E: EchoInput> DistanceSensor for DualPinSensor<T, E> {
    fn id(&self) -> SensorId {
        self.id
    }

    fn sample<D: DelayNs>(&mut self, delay: &mut D) -> DistanceReading {
        fire_trigger(&mut self.trigger, delay);
        let width = self.echo.measure_high_pulse(ECHO_TIMEOUT);
        reading(self.id, width)
    }
}

/// [`EchoInput`] for a plain digital input, timed by busy-polling a clock.
///
/// Follows the usual `pulseIn` contract: a pulse already in progress is let
/// through first, then the next rising edge is awaited and the time to the
/// falling edge measured. The whole call is bounded by the timeout.
pub struct PolledEcho<'t, P, T> {
    pin: P,
    clock: &'t T,
}

impl<'t, P: InputPin, T: TimeSource> PolledEcho<'t, P, T> {
    /// Wraps `pin`, timing against `clock`.
    pub fn new(pin: P, clock: &'t T) -> Self {
        Self { pin, clock }
    }

    /// Releases the pin.
    pub fn release(self) -> P {
        self.pin
    }

    fn wait_while(&mut self, level: bool, start: Instant, timeout: Duration) -> bool {
        while self.pin.is_high().unwrap_or(false) == level {
            if elapsed(self.clock.now(), start) > timeout {
                return false;
            }
        }
        true
    }
}

impl<P: InputPin, T: TimeSource> EchoInput for PolledEcho<'_, P, T> {
    fn measure_high_pulse(&mut self, timeout: Duration) -> Option<Duration> {
        let start = self.clock.now();

        if !self.wait_while(true, start, timeout) || !self.wait_while(false, start, timeout) {
            return None;
        }
        let rise = self.clock.now();

        if !self.wait_while(true, start, timeout) {
            return None;
        }
        Some(elapsed(self.clock.now(), rise))
    }
}
