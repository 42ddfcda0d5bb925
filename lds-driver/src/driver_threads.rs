use crate::config::DriverConfig;
use crate::constants::NUM_PACKETS;
use crate::error::LdsError;
use crate::frame::FrameReader;
use crate::serial::stop_scan_and_flush;
use crate::store::MeasurementStore;
use crate::sweep::LdsSweep;
use arc_swap::ArcSwapOption;
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use lds_data::MeasurementTable;
use serialport::SerialPort;
use std::io::Read;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Called on the capture thread after every published sweep.
pub type SweepCallback = Box<dyn Fn(&MeasurementTable) + Send + Sync>;

/// What the capture thread shares with the driver.
pub(crate) struct CaptureContext {
    pub(crate) store: Arc<MeasurementStore>,
    pub(crate) running: Arc<AtomicBool>,
    pub(crate) callback: Arc<ArcSwapOption<SweepCallback>>,
    pub(crate) config: DriverConfig,
}

/// Handle to the capture thread.
pub(crate) struct CaptureThread {
    handle: JoinHandle<()>,
    // Disconnected once the thread has exited
    done_rx: Receiver<()>,
}

impl CaptureThread {
    /// Moves `session` onto a new thread. If the thread cannot be spawned the
    /// session is dropped here, which stops the motor.
    pub(crate) fn spawn(
        session: CaptureSession,
        ctx: CaptureContext,
    ) -> Result<CaptureThread, LdsError> {
        let (done_tx, done_rx) = bounded::<()>(1);
        let handle = std::thread::Builder::new()
            .name("lds-capture".to_string())
            .spawn(move || capture_loop(session, ctx, done_tx))?;
        Ok(CaptureThread { handle, done_rx })
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Waits up to `timeout` for the thread to exit. Returns `false` and
    /// leaves the thread detached if it did not.
    pub(crate) fn join(self, timeout: Duration) -> bool {
        match self.done_rx.recv_timeout(timeout) {
            Err(RecvTimeoutError::Timeout) => {
                warn!("Capture thread did not exit within {:?}", timeout);
                false
            }
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                if self.handle.join().is_err() {
                    error!("Capture thread panicked");
                }
                true
            }
        }
    }
}

/// One sweep: sync, read, decode into `table`. The table is only touched once
/// a complete frame has been read.
pub(crate) fn capture_sweep<R: Read>(
    reader: &mut FrameReader<'_, R>,
    table: &mut MeasurementTable,
    config: &DriverConfig,
) -> Result<(), LdsError> {
    let frame = reader.next_frame(config.sync_timeout, config.data_timeout)?;
    let n_decoded = table.decode_frame(&frame, config.verify_checksum);
    if n_decoded < NUM_PACKETS {
        debug!("{} of {} blocks skipped", NUM_PACKETS - n_decoded, NUM_PACKETS);
    }
    Ok(())
}

/// The capture thread's port. Dropping it, on return or on unwind, stops the
/// motor, closes the port and then clears the running flag.
pub(crate) struct CaptureSession {
    port: Option<Box<dyn SerialPort>>,
    running: Arc<AtomicBool>,
}

impl CaptureSession {
    pub(crate) fn new(port: Box<dyn SerialPort>, running: Arc<AtomicBool>) -> CaptureSession {
        CaptureSession {
            port: Some(port),
            running,
        }
    }
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        if let Some(mut port) = self.port.take() {
            if let Err(e) = stop_scan_and_flush(&mut port) {
                warn!("Failed to send stop command: {}", e);
            }
        }
        self.running.store(false, Ordering::Release);
    }
}

fn capture_loop(mut session: CaptureSession, ctx: CaptureContext, _done_tx: Sender<()>) {
    info!("Capture thread started");
    if let Some(port) = session.port.as_mut() {
        run_capture(port, &ctx);
    }
    drop(session);
    info!("Capture thread exit");
}

fn run_capture(port: &mut Box<dyn SerialPort>, ctx: &CaptureContext) {
    let mut table = ctx.store.snapshot();
    let mut reader = FrameReader::new(port, &ctx.running);
    while ctx.running.load(Ordering::Acquire) {
        match capture_sweep(&mut reader, &mut table, &ctx.config) {
            Ok(()) => {
                ctx.store.publish(table.clone());
                if let Some(callback) = ctx.callback.load_full() {
                    callback(&table);
                }
            }
            // stop() cleared the flag while we were reading
            Err(LdsError::NotStarted) => break,
            Err(e) => {
                error!("Capture failed, stopping: {}", e);
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packet::testing::encode_frame;
    use lds_data::Reading;
    use serialport::TTYPort;
    use std::io::Cursor;

    fn config() -> DriverConfig {
        DriverConfig::default()
            .with_sync_timeout(Duration::from_millis(50))
            .with_data_timeout(Duration::from_millis(50))
    }

    #[test]
    fn test_capture_sweep() {
        let running = AtomicBool::new(true);
        let mut expected = MeasurementTable::filled(1800, 40);
        expected.set(Reading::new(0, 1000, 50));
        let mut stream = vec![0xFA, 0x00, 0x01];
        stream.extend_from_slice(&encode_frame(&expected));
        let mut source = Cursor::new(stream);
        let mut reader = FrameReader::new(&mut source, &running);

        let mut table = MeasurementTable::new();
        capture_sweep(&mut reader, &mut table, &config()).unwrap();
        assert_eq!(table, expected);
    }

    #[test]
    fn test_capture_sweep_leaves_table_untouched_on_timeout() {
        let running = AtomicBool::new(true);
        let previous = MeasurementTable::filled(900, 1);

        let mut source = Cursor::new(vec![0x00, 0xFA, 0x11, 0x22]);
        let mut reader = FrameReader::new(&mut source, &running);
        let mut table = previous.clone();
        assert!(matches!(
            capture_sweep(&mut reader, &mut table, &config()),
            Err(LdsError::SyncTimeout(_))
        ));
        assert_eq!(table, previous);

        let truncated = encode_frame(&MeasurementTable::filled(2000, 2))[..1500].to_vec();
        let mut source = Cursor::new(truncated);
        let mut reader = FrameReader::new(&mut source, &running);
        assert!(matches!(
            capture_sweep(&mut reader, &mut table, &config()),
            Err(LdsError::DataTimeout(_))
        ));
        assert_eq!(table, previous);
    }

    #[test]
    fn test_join_returns_once_thread_exits() {
        let (done_tx, done_rx) = bounded::<()>(1);
        let handle = std::thread::spawn(move || drop(done_tx));
        let thread = CaptureThread { handle, done_rx };
        assert!(thread.join(Duration::from_secs(1)));
    }

    #[test]
    fn test_join_times_out() {
        let (done_tx, done_rx) = bounded::<()>(1);
        let (release_tx, release_rx) = bounded::<()>(1);
        let handle = std::thread::spawn(move || {
            let _done = done_tx;
            let _ = release_rx.recv();
        });
        let thread = CaptureThread { handle, done_rx };
        assert!(!thread.join(Duration::from_millis(20)));
        release_tx.send(()).unwrap();
    }

    #[test]
    fn test_session_drop_stops_motor_and_clears_running() {
        let (mut master, slave) = TTYPort::pair().expect("Unable to create ptty pair");
        let running = Arc::new(AtomicBool::new(true));

        let session = CaptureSession::new(Box::new(slave), Arc::clone(&running));
        drop(session);

        assert!(!running.load(Ordering::Acquire));
        let mut buf = [0u8; 1];
        master.read_exact(&mut buf).unwrap();
        assert_eq!(buf, [b'e']);
    }

    #[test]
    fn test_session_released_when_thread_panics() {
        let (mut master, slave) = TTYPort::pair().expect("Unable to create ptty pair");
        let running = Arc::new(AtomicBool::new(true));

        let session = CaptureSession::new(Box::new(slave), Arc::clone(&running));
        let handle = std::thread::spawn(move || {
            let _session = session;
            panic!("sweep consumer failed");
        });
        assert!(handle.join().is_err());

        assert!(!running.load(Ordering::Acquire));
        let mut buf = [0u8; 1];
        master.read_exact(&mut buf).unwrap();
        assert_eq!(buf, [b'e']);
    }
}
