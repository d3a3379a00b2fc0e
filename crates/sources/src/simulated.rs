//! Simulated PMS5003 backend
//!
//! Produces plausible frames without hardware. The PM2.5 level follows a
//! configurable waveform; the other channels are derived from it with fixed
//! ratios so the values stay mutually consistent.

use std::time::{Duration, Instant};

use log::{debug, info};
use pms_sens_core::{
    BoxedDevice, DecodedFrame, DeviceError, DeviceFactory, DeviceParams, ParticulateDevice,
    BAUD_RATE,
};
use pms_sens_types::SizeSelector;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Waveform of the simulated PM2.5 level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SimulationMode {
    /// Constant level
    #[default]
    Manual,
    /// Sine wave oscillation
    SineWave,
    /// Sawtooth wave (linear ramp)
    Sawtooth,
    /// Triangle wave
    Triangle,
    /// Square wave
    Square,
}

fn default_manual_value() -> f64 {
    12.0
}

fn default_max_value() -> f64 {
    55.0
}

fn default_period() -> f64 {
    300.0
}

fn default_frame_delay_ms() -> u64 {
    200
}

/// Simulated backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    #[serde(default)]
    pub mode: SimulationMode,
    /// PM2.5 level used in Manual mode
    #[serde(default = "default_manual_value")]
    pub manual_value: f64,
    #[serde(default)]
    pub min_value: f64,
    #[serde(default = "default_max_value")]
    pub max_value: f64,
    /// Wave period in seconds (for oscillation modes)
    #[serde(default = "default_period")]
    pub period: f64,
    /// Probability (0.0 to 1.0) that a read fails with a read timeout
    #[serde(default)]
    pub timeout_rate: f64,
    /// Time a read blocks before the frame "arrives"
    #[serde(default = "default_frame_delay_ms")]
    pub frame_delay_ms: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            mode: SimulationMode::Manual,
            manual_value: default_manual_value(),
            min_value: 0.0,
            max_value: default_max_value(),
            period: default_period(),
            timeout_rate: 0.0,
            frame_delay_ms: default_frame_delay_ms(),
        }
    }
}

/// Rejected simulation settings
#[derive(Debug, Error, PartialEq)]
pub enum SimulationConfigError {
    #[error("simulation {0} must be a finite number")]
    NotFinite(&'static str),

    #[error("simulation timeout_rate {0} is outside 0.0..=1.0")]
    TimeoutRate(f64),

    #[error("simulation period must be positive, got {0}")]
    Period(f64),

    #[error("simulation min_value {min} exceeds max_value {max}")]
    Range { min: f64, max: f64 },
}

impl SimulationConfig {
    /// Check the settings before a device is built from them
    pub fn validate(&self) -> Result<(), SimulationConfigError> {
        let fields = [
            ("manual_value", self.manual_value),
            ("min_value", self.min_value),
            ("max_value", self.max_value),
            ("period", self.period),
            ("timeout_rate", self.timeout_rate),
        ];
        if let Some((name, _)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(SimulationConfigError::NotFinite(name));
        }
        if !(0.0..=1.0).contains(&self.timeout_rate) {
            return Err(SimulationConfigError::TimeoutRate(self.timeout_rate));
        }
        if self.period <= 0.0 {
            return Err(SimulationConfigError::Period(self.period));
        }
        if self.min_value > self.max_value {
            return Err(SimulationConfigError::Range {
                min: self.min_value,
                max: self.max_value,
            });
        }
        Ok(())
    }

    /// PM2.5 level `elapsed` seconds into the simulation
    fn level_at(&self, elapsed: f64) -> f64 {
        let range = self.max_value - self.min_value;

        match self.mode {
            SimulationMode::Manual => self.manual_value,
            SimulationMode::SineWave => {
                let phase = (elapsed / self.period) * std::f64::consts::TAU;
                let normalized = (phase.sin() + 1.0) / 2.0; // 0.0 to 1.0
                self.min_value + normalized * range
            }
            SimulationMode::Sawtooth => {
                let normalized = (elapsed / self.period).fract();
                self.min_value + normalized * range
            }
            SimulationMode::Triangle => {
                let phase = (elapsed / self.period).fract() * 2.0; // 0.0 to 2.0
                let normalized = if phase <= 1.0 { phase } else { 2.0 - phase };
                self.min_value + normalized * range
            }
            SimulationMode::Square => {
                if (elapsed / self.period).fract() < 0.5 {
                    self.min_value
                } else {
                    self.max_value
                }
            }
        }
    }
}

/// Count thresholds reported by the sensor, in micrometers
const COUNT_THRESHOLDS: [f64; 6] = [0.3, 0.5, 1.0, 2.5, 5.0, 10.0];

/// A decoded frame with explicit values
///
/// Lookup follows the sensor driver: standard concentrations are keyed by
/// 1.0, 2.5 and 10 µm, atmospheric ones by 1.0, 2.5 and the unbounded
/// selector. Anything else is unreported.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedFrame {
    /// PM1.0, PM2.5, PM10 (standard)
    pub standard: [f64; 3],
    /// PM1.0, PM2.5, PM10 (atmospheric)
    pub atmospheric: [f64; 3],
    /// Counts at 0.3, 0.5, 1.0, 2.5, 5.0 and 10 µm
    pub counts: [u64; 6],
}

impl SimulatedFrame {
    pub fn new(standard: [f64; 3], atmospheric: [f64; 3], counts: [u64; 6]) -> Self {
        Self {
            standard,
            atmospheric,
            counts,
        }
    }

    /// Frame whose channels all follow one PM2.5 level
    fn from_level(pm2_5: f64) -> Self {
        let pm2_5 = pm2_5.max(0.0);
        let standard = [pm2_5 * 0.65, pm2_5, pm2_5 * 1.35];
        let atmospheric = standard.map(|v| v * 0.9);
        let counts = [
            pm2_5 * 65.0,
            pm2_5 * 19.0,
            pm2_5 * 3.2,
            pm2_5 * 0.45,
            pm2_5 * 0.08,
            pm2_5 * 0.02,
        ]
        .map(|v| v.round() as u64);
        Self::new(
            standard.map(round_tenth),
            atmospheric.map(round_tenth),
            counts,
        )
    }
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Map a diameter to a table index, tolerating float noise
fn index_of(size: f64, table: &[f64]) -> Option<usize> {
    table.iter().position(|t| (t - size).abs() < 1e-6)
}

impl DecodedFrame for SimulatedFrame {
    fn pm_ug_per_m3(&self, size: SizeSelector, atmospheric: bool) -> Option<f64> {
        let index = match (size, atmospheric) {
            (SizeSelector::Microns(s), false) => index_of(s, &[1.0, 2.5, 10.0])?,
            (SizeSelector::Microns(s), true) => index_of(s, &[1.0, 2.5])?,
            (SizeSelector::Unbounded, true) => 2,
            (SizeSelector::Unbounded, false) => return None,
        };
        if atmospheric {
            Some(self.atmospheric[index])
        } else {
            Some(self.standard[index])
        }
    }

    fn pm_per_1l_air(&self, size: f64) -> Option<u64> {
        index_of(size, &COUNT_THRESHOLDS).map(|i| self.counts[i])
    }
}

/// Simulated device handle
pub struct SimulatedDevice {
    config: SimulationConfig,
    start_time: Instant,
    frames_read: u64,
}

impl SimulatedDevice {
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            config,
            start_time: Instant::now(),
            frames_read: 0,
        }
    }

    pub fn frames_read(&self) -> u64 {
        self.frames_read
    }
}

impl ParticulateDevice for SimulatedDevice {
    fn read(&mut self) -> Result<Box<dyn DecodedFrame>, DeviceError> {
        if self.config.frame_delay_ms > 0 {
            std::thread::sleep(Duration::from_millis(self.config.frame_delay_ms));
        }

        // gen_bool panics outside 0..=1, NaN included
        let rate = self.config.timeout_rate;
        if rate.is_finite() && rate > 0.0 && rand::thread_rng().gen_bool(rate.min(1.0)) {
            return Err(DeviceError::ReadTimeout(
                "PMS5003 read timeout: no start of frame".to_string(),
            ));
        }

        let level = self.config.level_at(self.start_time.elapsed().as_secs_f64());
        self.frames_read += 1;
        debug!("Simulated frame {} at PM2.5 {:.1}", self.frames_read, level);
        Ok(Box::new(SimulatedFrame::from_level(level)))
    }
}

/// Factory for [`SimulatedDevice`] handles
pub struct SimulatedFactory {
    config: SimulationConfig,
}

impl SimulatedFactory {
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }
}

impl DeviceFactory for SimulatedFactory {
    fn name(&self) -> &str {
        "simulated"
    }

    fn open(&self, params: &DeviceParams) -> Result<BoxedDevice, DeviceError> {
        if params.baud_rate != BAUD_RATE {
            return Err(DeviceError::Driver(format!(
                "Unsupported baud rate {} (sensor runs at {})",
                params.baud_rate, BAUD_RATE
            )));
        }
        info!(
            "Opened simulated PMS5003 on {} (enable {}, reset {})",
            params.serial_device, params.pin_enable, params.pin_reset
        );
        Ok(Box::new(SimulatedDevice::new(self.config.clone())))
    }
}
