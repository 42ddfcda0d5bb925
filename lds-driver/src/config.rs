use std::time::Duration;

/// Timeouts and options of an [`crate::LdsDriver`].
///
/// # Example
///
/// ```
/// use lds_driver::DriverConfig;
/// use std::time::Duration;
///
/// let config = DriverConfig::default()
///     .with_sync_timeout(Duration::from_secs(5))
///     .with_verify_checksum(true);
/// assert_eq!(config.data_timeout, Duration::from_secs(1));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DriverConfig {
    /// Longest wait for the `FA A0` marker of a new sweep.
    pub sync_timeout: Duration,
    /// Longest stall tolerated in the middle of a sweep.
    pub data_timeout: Duration,
    /// Longest wait for the first byte after the start command.
    pub start_timeout: Duration,
    /// Longest wait for the capture thread to exit on `stop()`.
    pub shutdown_timeout: Duration,
    /// Deadline of each individual serial read.
    pub read_timeout: Duration,
    /// Reject blocks whose checksum does not match.
    pub verify_checksum: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        DriverConfig {
            sync_timeout: Duration::from_secs(30),
            data_timeout: Duration::from_secs(1),
            start_timeout: Duration::from_secs(5),
            shutdown_timeout: Duration::from_secs(10),
            read_timeout: Duration::from_millis(10),
            verify_checksum: false,
        }
    }
}

impl DriverConfig {
    pub fn with_sync_timeout(mut self, timeout: Duration) -> Self {
        self.sync_timeout = timeout;
        self
    }

    pub fn with_data_timeout(mut self, timeout: Duration) -> Self {
        self.data_timeout = timeout;
        self
    }

    pub fn with_start_timeout(mut self, timeout: Duration) -> Self {
        self.start_timeout = timeout;
        self
    }

    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    pub fn with_verify_checksum(mut self, verify: bool) -> Self {
        self.verify_checksum = verify;
        self
    }
}
