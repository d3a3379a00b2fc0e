//! Scripted device backend for coordinator tests

use pms_sens_core::{
    BoxedDevice, DecodedFrame, DeviceError, DeviceFactory, DeviceParams, ParticulateDevice,
};
use pms_sens_sources::SimulatedFrame;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

pub type Script = VecDeque<Result<SimulatedFrame, DeviceError>>;

/// What the mock saw, shared between the test and the device
#[derive(Default)]
pub struct MockLog {
    pub opens: usize,
    pub params: Vec<DeviceParams>,
    /// (start, end) of every read
    pub reads: Vec<(Instant, Instant)>,
}

pub fn scenario_frame() -> SimulatedFrame {
    SimulatedFrame::new([5.0, 10.0, 15.0], [6.0, 11.0, 16.0], [100, 80, 50, 20, 5, 1])
}

/// Factory handing out one scripted device
///
/// Reads pop the script front; an empty script yields [`scenario_frame`].
pub struct MockFactory {
    script: Arc<Mutex<Script>>,
    log: Arc<Mutex<MockLog>>,
    read_delay: Duration,
    open_error: Mutex<Option<DeviceError>>,
}

impl MockFactory {
    pub fn new(script: Script) -> Self {
        Self {
            script: Arc::new(Mutex::new(script)),
            log: Arc::new(Mutex::new(MockLog::default())),
            read_delay: Duration::ZERO,
            open_error: Mutex::new(None),
        }
    }

    pub fn with_read_delay(mut self, delay: Duration) -> Self {
        self.read_delay = delay;
        self
    }

    /// Make the next `open` fail once
    pub fn fail_open(self, err: DeviceError) -> Self {
        *self.open_error.lock().unwrap() = Some(err);
        self
    }

    pub fn log(&self) -> Arc<Mutex<MockLog>> {
        Arc::clone(&self.log)
    }

    pub fn push(&self, response: Result<SimulatedFrame, DeviceError>) {
        self.script.lock().unwrap().push_back(response);
    }
}

impl DeviceFactory for MockFactory {
    fn name(&self) -> &str {
        "mock"
    }

    fn open(&self, params: &DeviceParams) -> Result<BoxedDevice, DeviceError> {
        let mut log = self.log.lock().unwrap();
        log.params.push(params.clone());
        if let Some(err) = self.open_error.lock().unwrap().take() {
            return Err(err);
        }
        log.opens += 1;
        Ok(Box::new(MockDevice {
            script: Arc::clone(&self.script),
            log: Arc::clone(&self.log),
            read_delay: self.read_delay,
        }))
    }
}

struct MockDevice {
    script: Arc<Mutex<Script>>,
    log: Arc<Mutex<MockLog>>,
    read_delay: Duration,
}

impl ParticulateDevice for MockDevice {
    fn read(&mut self) -> Result<Box<dyn DecodedFrame>, DeviceError> {
        let start = Instant::now();
        std::thread::sleep(self.read_delay);
        let next = self.script.lock().unwrap().pop_front();
        self.log.lock().unwrap().reads.push((start, Instant::now()));
        match next.unwrap_or_else(|| Ok(scenario_frame())) {
            Ok(frame) => Ok(Box::new(frame)),
            Err(err) => Err(err),
        }
    }
}
