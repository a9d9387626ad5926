//! # Ground Link
//!
//! Handheld ground-station controller for a LoRa-linked vehicle.
//!
//! This application samples the handset's two sticks, two trim knobs and
//! four buttons, calibrates them into link units and streams fixed-layout
//! control packets to a serial LoRa modem at 50Hz, while an OLED status
//! screen refreshes at 10Hz.

use std::time::{Duration, Instant};

use anyhow::Result;
use tracing::{debug, error, info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use ground_link::config::Config;
use ground_link::display::{DisplayPanel, Ssd1306Panel};
use ground_link::input::battery::BatteryMonitor;
use ground_link::input::buttons::GpioButtons;
use ground_link::input::mcp3208::Mcp3208;
use ground_link::input::sampler::InputSampler;
use ground_link::radio::LoraRadio;
use ground_link::scheduler::LinkLoop;
use ground_link::telemetry::TelemetryLogger;

/// Default configuration file path
const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Number of packets between status log messages
const LOG_INTERVAL_PACKETS: u64 = 500;

/// Main entry point for the Ground Link application
///
/// # Control Flow
///
/// 1. **Initialization**
///    - Set up logging with tracing subscriber (optional daily log file)
///    - Load configuration (built-in defaults when the file is absent)
///    - Open the OLED panel and show a splash screen
///    - Open and configure the LoRa modem (fatal on failure, with the
///      failure shown on the panel)
///    - Open the ADC and button GPIOs
///    - Open the telemetry logger (non-fatal on failure)
///
/// 2. **Main Loop**
///    - Sample all controls every tick
///    - Transmit the freshest sample at the configured 20ms cadence
///    - Refresh the status screen at the configured 100ms cadence
///    - Handle Ctrl+C for graceful shutdown
///
/// 3. **Graceful Shutdown**
///    - Stop packet transmission
///    - Log total packet count
///    - Clean exit
///
/// # Errors
///
/// Returns error if:
/// - Configuration file exists but is invalid
/// - Display panel cannot be initialized
/// - LoRa modem cannot be opened or configured
/// - ADC or button GPIOs cannot be opened
#[tokio::main]
async fn main() -> Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = Config::load_or_default(&config_path)?;

    // Keeps the file writer flushing until main returns
    let _log_guard = init_logging(&config);

    info!("Ground Link v{} starting...", env!("CARGO_PKG_VERSION"));
    debug!("Configuration loaded from {}", config_path);

    let mut panel = Ssd1306Panel::open(&config.display)?;
    panel.clear();
    panel.draw_text(0, 0, "GROUND LINK");
    panel.draw_text(0, 2, "STARTING");
    if let Err(e) = panel.flush() {
        warn!("Splash screen failed: {}", e);
    }

    let radio = match LoraRadio::open(&config.link).await {
        Ok(radio) => radio,
        Err(e) => {
            error!("Radio bring-up failed: {}", e);
            if let Err(panel_err) = panel.show_error("NO RADIO") {
                warn!("Could not show error screen: {}", panel_err);
            }
            return Err(e.into());
        }
    };
    info!("LoRa modem opened at: {}", radio.device_path());

    let adc = Mcp3208::open(&config.input)?;
    let buttons = GpioButtons::open(&config.input)?;
    info!("Input hardware opened");

    let telemetry = match TelemetryLogger::from_config(&config.telemetry) {
        Ok(logger) => logger,
        Err(e) => {
            warn!("Telemetry disabled, could not open log: {}", e);
            None
        }
    };

    let mut link = LinkLoop::new(
        InputSampler::from_config(&config.input),
        BatteryMonitor::from_config(&config.battery),
        adc,
        buttons,
        radio,
        panel,
        telemetry,
        Duration::from_millis(config.timing.transmit_interval_ms),
        Duration::from_millis(config.timing.display_interval_ms),
        Instant::now(),
    );

    let mut tick = tokio::time::interval(Duration::from_millis(config.timing.loop_tick_ms));
    tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    info!(
        "Starting control loop: transmit every {}ms, display every {}ms",
        config.timing.transmit_interval_ms, config.timing.display_interval_ms
    );
    info!("Press Ctrl+C to exit");

    let mut last_log_count: u64 = 0;

    loop {
        tokio::select! {
            _ = tick.tick() => {
                link.run_iteration(Instant::now()).await;

                let sent = link.packets_sent();
                if sent - last_log_count >= LOG_INTERVAL_PACKETS {
                    info!(
                        "Sent {} packets (armed: {}, throttle: {})",
                        sent,
                        link.is_armed(),
                        link.sample().throttle
                    );
                    last_log_count = sent;
                }
            }

            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down...");
                info!("Total packets sent: {}", link.packets_sent());
                break;
            }
        }
    }

    Ok(())
}

/// Initialize the tracing subscriber, returning the file writer guard when
/// a log file is configured.
fn init_logging(config: &Config) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());

    let (file_layer, guard) = if config.log.file_enabled {
        let appender = tracing_appender::rolling::daily(&config.log.dir, "ground-link.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .with_ansi(false);
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(file_layer)
        .init();

    guard
}
