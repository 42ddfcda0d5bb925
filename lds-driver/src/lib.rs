//! Driver for the Hitachi-LG LDS 360 degree laser distance sensor.
//!
//! The sensor streams one 2520 byte sweep per revolution over a 230400 baud
//! serial link. [`LdsDriver`] starts the sensor, decodes sweeps on a dedicated
//! capture thread and publishes each completed sweep to a
//! [`MeasurementStore`], from which any number of threads can read.
//!
//! ```no_run
//! use lds_driver::LdsDriver;
//!
//! let mut driver = LdsDriver::new("/dev/ttyUSB0");
//! driver.start()?;
//! while !driver.data_available() {
//!     std::thread::sleep(std::time::Duration::from_millis(50));
//! }
//! println!("{:?}", driver.reading_at(0));
//! driver.stop();
//! # Ok::<(), lds_driver::LdsError>(())
//! ```

mod config;
mod constants;
mod driver_threads;
mod error;
mod frame;
mod numeric;
mod packet;
mod serial;
mod store;
mod sweep;
mod time;

use crate::driver_threads::{CaptureContext, CaptureSession, CaptureThread};
use crate::serial::{open, start_scan, stop_scan, wait_for_data};
use arc_swap::ArcSwapOption;
use lds_data::{MeasurementTable, Reading};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

pub use crate::config::DriverConfig;
pub use crate::constants::{BAUD_RATE, FRAME_SIZE, NUM_PACKETS, PACKET_SIZE};
pub use crate::driver_threads::SweepCallback;
pub use crate::error::LdsError;
pub use crate::frame::{FrameReader, RawFrame};
pub use crate::store::MeasurementStore;
pub use crate::sweep::LdsSweep;

/// Lifecycle of an [`LdsDriver`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverState {
    Stopped,
    Starting,
    Running,
    Stopping,
}

/// Controls one sensor. While running, the port belongs to the capture
/// thread, which stops the motor and closes it when it exits.
pub struct LdsDriver {
    port_name: String,
    config: DriverConfig,
    state: DriverState,
    capture_thread: Option<CaptureThread>,
    running: Arc<AtomicBool>,
    store: Arc<MeasurementStore>,
    callback: Arc<ArcSwapOption<SweepCallback>>,
}

impl LdsDriver {
    /// Driver for the sensor on `port_name`, such as `/dev/ttyUSB0`, with the
    /// default configuration. Nothing is opened until [`LdsDriver::start`].
    pub fn new(port_name: &str) -> LdsDriver {
        LdsDriver::with_config(port_name, DriverConfig::default())
    }

    pub fn with_config(port_name: &str, config: DriverConfig) -> LdsDriver {
        LdsDriver {
            port_name: port_name.to_string(),
            config,
            state: DriverState::Stopped,
            capture_thread: None,
            running: Arc::new(AtomicBool::new(false)),
            store: Arc::new(MeasurementStore::new()),
            callback: Arc::new(ArcSwapOption::empty()),
        }
    }

    /// Opens the port, starts the motor and launches the capture thread.
    ///
    /// Does nothing if the driver is already running. A driver whose capture
    /// thread stopped on an error is cleaned up and started again.
    pub fn start(&mut self) -> Result<(), LdsError> {
        if self.is_running() {
            return Ok(());
        }
        self.stop();

        info!("Starting LDS on \"{}\"", self.port_name);
        self.state = DriverState::Starting;
        match self.launch() {
            Ok(()) => {
                self.state = DriverState::Running;
                Ok(())
            }
            Err(e) => {
                self.running.store(false, Ordering::Release);
                self.state = DriverState::Stopped;
                Err(e)
            }
        }
    }

    fn launch(&mut self) -> Result<(), LdsError> {
        let mut port = open(&self.port_name, self.config.read_timeout)?;
        start_scan(&mut port)?;

        if let Err(e) = wait_for_data(&mut port, self.config.start_timeout) {
            if let Err(stop_err) = stop_scan(&mut port) {
                warn!("Failed to send stop command: {}", stop_err);
            }
            return Err(e);
        }

        // one flag per run; a detached thread from an earlier run clears only its own
        self.running = Arc::new(AtomicBool::new(true));
        let session = CaptureSession::new(port, Arc::clone(&self.running));
        let ctx = CaptureContext {
            store: Arc::clone(&self.store),
            running: Arc::clone(&self.running),
            callback: Arc::clone(&self.callback),
            config: self.config.clone(),
        };
        self.capture_thread = Some(CaptureThread::spawn(session, ctx)?);
        Ok(())
    }

    /// Stops the motor, waits for the capture thread and closes the port.
    ///
    /// Safe to call in any state, any number of times. The last published
    /// sweep stays readable.
    pub fn stop(&mut self) {
        let thread = match self.capture_thread.take() {
            Some(thread) => thread,
            None => {
                self.state = DriverState::Stopped;
                return;
            }
        };
        info!("Stopping LDS on \"{}\"", self.port_name);
        self.state = DriverState::Stopping;
        self.running.store(false, Ordering::Release);

        // the thread sends the stop command and closes the port on its way out
        if !thread.join(self.config.shutdown_timeout) {
            warn!("Port \"{}\" is closed once the capture thread exits", self.port_name);
        }
        self.state = DriverState::Stopped;
    }

    /// Current state. A driver whose capture thread stopped on an error
    /// reports [`DriverState::Stopped`].
    pub fn state(&self) -> DriverState {
        match self.state {
            DriverState::Running if !self.running.load(Ordering::Acquire) => {
                DriverState::Stopped
            }
            state => state,
        }
    }

    pub fn is_running(&self) -> bool {
        self.state() == DriverState::Running
    }

    /// `true` once the first sweep has been published.
    pub fn data_available(&self) -> bool {
        self.store.data_available()
    }

    /// Reading at `angle` degrees from the latest sweep.
    pub fn reading_at(&self, angle: usize) -> Option<Reading> {
        self.store.reading_at(angle)
    }

    /// Consistent copy of the latest sweep.
    pub fn snapshot(&self) -> MeasurementTable {
        self.store.snapshot()
    }

    pub fn sweep_count(&self) -> u64 {
        self.store.sweep_count()
    }

    /// Store handle for readers on other threads.
    pub fn store(&self) -> Arc<MeasurementStore> {
        Arc::clone(&self.store)
    }

    /// Registers a function called on the capture thread after each published
    /// sweep, replacing any previous one. It must return quickly: capture
    /// waits for it.
    pub fn set_callback<F>(&self, callback: F)
    where
        F: Fn(&MeasurementTable) + Send + Sync + 'static,
    {
        let callback: SweepCallback = Box::new(callback);
        self.callback.store(Some(Arc::new(callback)));
    }

    pub fn clear_callback(&self) {
        self.callback.store(None);
    }
}

impl Drop for LdsDriver {
    fn drop(&mut self) {
        self.stop();
    }
}
