//! # Telemetry Module
//!
//! Session logging to JSONL files with rotation.
//!
//! This module handles:
//! - Formatting one record per display refresh as JSONL (JSON Lines)
//! - Writing to rotating log files (max N records per file)
//! - Retaining only the last M files
//!
//! Logging is strictly best-effort: every failure is reported to the caller
//! as an error the caller absorbs, and a disabled or broken logger never
//! touches the control cadence.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::TelemetryConfig;
use crate::error::Result;
use crate::packet::protocol::ControlSample;

/// Filename prefix for session files, followed by a UTC timestamp.
const FILE_PREFIX: &str = "session-";

/// One JSONL record: the sampled controls plus surrounding status.
#[derive(Debug, Clone, Serialize)]
pub struct TelemetryRecord {
    /// RFC 3339 UTC timestamp.
    pub timestamp: String,
    pub throttle: i16,
    pub roll: i16,
    pub pitch: i16,
    pub yaw: i16,
    pub knob_pitch: i16,
    pub knob_roll: i16,
    pub buttons: u8,
    pub armed: bool,
    pub battery_percent: u8,
    pub packets_sent: u64,
}

impl TelemetryRecord {
    /// Build a record stamped with the current UTC time.
    #[must_use]
    pub fn new(
        sample: &ControlSample,
        armed: bool,
        battery_percent: u8,
        packets_sent: u64,
    ) -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            throttle: sample.throttle,
            roll: sample.roll,
            pitch: sample.pitch,
            yaw: sample.yaw,
            knob_pitch: sample.knob_pitch,
            knob_roll: sample.knob_roll,
            buttons: sample.buttons,
            armed,
            battery_percent,
            packets_sent,
        }
    }
}

/// Rotating JSONL session logger
///
/// Opens a fresh timestamped file per session, rolls to a new file after
/// the configured record count and prunes the directory down to the
/// configured number of files.
pub struct TelemetryLogger {
    dir: PathBuf,
    max_records_per_file: usize,
    max_files_to_keep: usize,
    file: File,
    records_in_file: usize,
}

impl std::fmt::Debug for TelemetryLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelemetryLogger")
            .field("dir", &self.dir)
            .field("records_in_file", &self.records_in_file)
            .finish_non_exhaustive()
    }
}

impl TelemetryLogger {
    /// Create a logger from the telemetry configuration
    ///
    /// # Returns
    ///
    /// * `Ok(None)` when telemetry is disabled
    /// * `Ok(Some(logger))` with the first session file open
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or first file cannot be created.
    /// The caller treats this as non-fatal and flies without telemetry.
    pub fn from_config(config: &TelemetryConfig) -> Result<Option<Self>> {
        if !config.enabled {
            debug!("Telemetry logging disabled");
            return Ok(None);
        }

        let dir = PathBuf::from(&config.dir);
        fs::create_dir_all(&dir)?;

        let file = open_session_file(&dir)?;
        info!("Telemetry logging to {}", dir.display());

        Ok(Some(Self {
            dir,
            max_records_per_file: config.max_records_per_file.max(1),
            max_files_to_keep: config.max_files_to_keep.max(1),
            file,
            records_in_file: 0,
        }))
    }

    /// Append one record, rotating the file when full.
    ///
    /// # Errors
    ///
    /// Returns an error on serialization or write failure. The record is
    /// dropped; the logger stays usable for the next one.
    pub fn log(&mut self, record: &TelemetryRecord) -> Result<()> {
        if self.records_in_file >= self.max_records_per_file {
            self.rotate()?;
        }

        let mut line = serde_json::to_vec(record)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        line.push(b'\n');
        self.file.write_all(&line)?;
        self.records_in_file += 1;

        Ok(())
    }

    fn rotate(&mut self) -> Result<()> {
        self.file.flush()?;
        self.file = open_session_file(&self.dir)?;
        self.records_in_file = 0;
        debug!("Rotated telemetry file");

        if let Err(e) = prune_old_files(&self.dir, self.max_files_to_keep) {
            warn!("Failed to prune telemetry files: {}", e);
        }

        Ok(())
    }
}

fn open_session_file(dir: &Path) -> Result<File> {
    // Microsecond precision keeps same-second rotations from colliding
    let stamp = chrono::Utc::now().format("%Y%m%dT%H%M%S%.6f");
    let path = dir.join(format!("{}{}.jsonl", FILE_PREFIX, stamp));
    let file = OpenOptions::new().create_new(true).append(true).open(path)?;
    Ok(file)
}

fn prune_old_files(dir: &Path, max_files_to_keep: usize) -> std::io::Result<()> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with(FILE_PREFIX) && name.ends_with(".jsonl"))
        })
        .collect();

    // Timestamped names sort chronologically
    files.sort();

    let excess = files.len().saturating_sub(max_files_to_keep);
    for path in files.into_iter().take(excess) {
        fs::remove_file(&path)?;
        debug!("Pruned telemetry file {}", path.display());
    }

    Ok(())
}
