//! # Link Loop Module
//!
//! One iteration of the control loop, as plain testable state.
//!
//! Every iteration samples the controls first, then lets each cadence
//! scheduler decide independently whether its work runs. Transmission at
//! 20 ms always encodes the freshest sample; the display refresh at 100 ms
//! reads the battery, redraws the status screen and appends a telemetry
//! record. Sampling failures skip the iteration and keep the previous
//! sample on the air; transmit and display failures are logged and
//! absorbed, never retried.

use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::display::{self, DisplayPanel, StatusFrame};
use crate::input::battery::BatteryMonitor;
use crate::input::sampler::InputSampler;
use crate::input::source::{AnalogSource, ButtonSource};
use crate::packet::encoder::encode_control_packet;
use crate::packet::protocol::ControlSample;
use crate::radio::RadioLink;
use crate::telemetry::{TelemetryLogger, TelemetryRecord};

use super::arming::ArmedState;
use super::interval::IntervalScheduler;

/// Owned state of the cooperative control loop.
///
/// Generic over the four hardware seams so tests can drive it with mocks
/// and injected timestamps. One instance, one thread, no locks.
pub struct LinkLoop<A, B, R, P>
where
    A: AnalogSource,
    B: ButtonSource,
    R: RadioLink,
    P: DisplayPanel,
{
    sampler: InputSampler,
    battery: BatteryMonitor,
    analog: A,
    buttons: B,
    radio: R,
    panel: P,
    telemetry: Option<TelemetryLogger>,
    transmit_schedule: IntervalScheduler,
    display_schedule: IntervalScheduler,
    armed: ArmedState,
    sample: ControlSample,
    packets_sent: u64,
    battery_percent: u8,
}

impl<A, B, R, P> LinkLoop<A, B, R, P>
where
    A: AnalogSource,
    B: ButtonSource,
    R: RadioLink,
    P: DisplayPanel,
{
    /// Assemble the loop with both schedulers based at `now`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        sampler: InputSampler,
        battery: BatteryMonitor,
        analog: A,
        buttons: B,
        radio: R,
        panel: P,
        telemetry: Option<TelemetryLogger>,
        transmit_interval: Duration,
        display_interval: Duration,
        now: Instant,
    ) -> Self {
        Self {
            sampler,
            battery,
            analog,
            buttons,
            radio,
            panel,
            telemetry,
            transmit_schedule: IntervalScheduler::starting_at(transmit_interval, now),
            display_schedule: IntervalScheduler::starting_at(display_interval, now),
            armed: ArmedState::new(),
            sample: ControlSample::default(),
            packets_sent: 0,
            battery_percent: 0,
        }
    }

    /// Total packets handed to the radio so far.
    #[must_use]
    pub fn packets_sent(&self) -> u64 {
        self.packets_sent
    }

    /// Current advisory armed flag.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.armed.is_armed()
    }

    /// Most recent successful control sample.
    #[must_use]
    pub fn sample(&self) -> &ControlSample {
        &self.sample
    }

    /// Run one iteration at the given timestamp.
    ///
    /// Sampling comes first so every downstream consumer in this iteration
    /// sees the same fresh sample. A failed sample aborts the iteration
    /// without advancing either scheduler; whatever packet is on the air
    /// simply stays authoritative until the next good read.
    pub async fn run_iteration(&mut self, now: Instant) {
        match self.sampler.sample(&mut self.analog, &mut self.buttons) {
            Ok(sample) => self.sample = sample,
            Err(e) => {
                warn!("Input sampling failed, skipping iteration: {}", e);
                return;
            }
        }

        self.armed.update(self.sample.buttons);

        if self.transmit_schedule.should_fire(now) {
            self.transmit().await;
        }

        if self.display_schedule.should_fire(now) {
            self.refresh_display();
        }
    }

    /// Fire-and-forget transmission of the current sample.
    async fn transmit(&mut self) {
        let packet = encode_control_packet(&self.sample);
        match self.radio.send_packet(&packet).await {
            Ok(()) => self.packets_sent += 1,
            // The next packet supersedes this one in 20 ms anyway
            Err(e) => debug!("Failed to send packet: {}", e),
        }
    }

    /// Battery read, status redraw and telemetry append.
    ///
    /// All three are advisory: each failure is logged and the refresh
    /// carries on with what it has.
    fn refresh_display(&mut self) {
        match self.battery.read(&mut self.analog) {
            Ok(percent) => self.battery_percent = percent,
            Err(e) => warn!("Battery read failed, showing last value: {}", e),
        }

        let frame = StatusFrame::new(&self.sample, self.armed.is_armed(), self.battery_percent);
        if let Err(e) = display::render(&mut self.panel, &frame) {
            warn!("Display refresh failed: {}", e);
        }

        if let Some(logger) = self.telemetry.as_mut() {
            let record = TelemetryRecord::new(
                &self.sample,
                self.armed.is_armed(),
                self.battery_percent,
                self.packets_sent,
            );
            if let Err(e) = logger.log(&record) {
                warn!("Telemetry write failed: {}", e);
            }
        }
    }
}
