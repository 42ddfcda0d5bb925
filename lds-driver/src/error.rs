use std::io;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LdsError {
    #[error("Failed to open \"{port}\". Error: {source}")]
    Connection {
        port: String,
        #[source]
        source: serialport::Error,
    },
    #[error("No sweep marker FA A0 observed within {0:?}")]
    SyncTimeout(Duration),
    #[error("Stream stalled for {0:?} in the middle of a sweep")]
    DataTimeout(Duration),
    #[error("Device sent no data within {0:?} of the start command")]
    StartTimeout(Duration),
    #[error("Serial read attempted while the driver is not running")]
    NotStarted,
    // Only produced inside the decoder, which skips the block.
    #[error("Block must start with FA followed by A0..DB. Observed = {0:02X} {1:02X}.")]
    InvalidBlock(u8, u8),
    #[error("Checksum mismatched. Calculated = {1:04X}, expected = {0:04X}.")]
    ChecksumMismatch(u16, u16),
    #[error(transparent)]
    SerialError(#[from] serialport::Error),
    #[error(transparent)]
    IoError(#[from] io::Error),
}
