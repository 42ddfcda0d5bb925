use crate::constants::{BLOCK_INDEX_BASE, BLOCK_SYNC_BYTE, FRAME_SIZE, PACKET_SIZE};
use crate::error::LdsError;
use std::io::{ErrorKind, Read};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tracing::trace;

/// The bytes of one full sweep, starting at the `FA A0` marker of block 0.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawFrame {
    bytes: Box<[u8; FRAME_SIZE]>,
}

impl RawFrame {
    /// Wraps exactly `FRAME_SIZE` bytes. Content is not validated; the decoder
    /// tolerates corrupted blocks.
    pub fn from_bytes(bytes: &[u8]) -> Option<RawFrame> {
        if bytes.len() != FRAME_SIZE {
            return None;
        }
        let mut frame = Box::new([0u8; FRAME_SIZE]);
        frame.copy_from_slice(bytes);
        Some(RawFrame { bytes: frame })
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.bytes.as_slice()
    }

    pub(crate) fn blocks(&self) -> impl Iterator<Item = &[u8; PACKET_SIZE]> {
        self.bytes
            .chunks_exact(PACKET_SIZE)
            .filter_map(|block| block.try_into().ok())
    }
}

/// Pulls sweeps out of an unstructured byte stream.
///
/// The underlying source is expected to block for a short per-read deadline
/// (the serial port timeout) and report it as `TimedOut`, `WouldBlock` or an
/// empty read. The sync and data timeouts are enforced on top of that. Every
/// read first checks `running` and fails with [`LdsError::NotStarted`] once it
/// is cleared.
pub struct FrameReader<'a, R: Read> {
    source: &'a mut R,
    running: &'a AtomicBool,
}

impl<'a, R: Read> FrameReader<'a, R> {
    pub fn new(source: &'a mut R, running: &'a AtomicBool) -> Self {
        FrameReader { source, running }
    }

    /// Returns once `FA A0` has been consumed, i.e. the stream is positioned
    /// right after the marker of block 0.
    pub fn synchronize(&mut self, sync_timeout: Duration) -> Result<(), LdsError> {
        let start = Instant::now();
        // 0xFA alone is too common in the payload, so the index byte must follow
        let mut after_sync_byte = false;
        let mut discarded = 0usize;
        loop {
            if start.elapsed() > sync_timeout {
                return Err(LdsError::SyncTimeout(sync_timeout));
            }
            let byte = match self.read_byte()? {
                Some(byte) => byte,
                None => continue,
            };
            if after_sync_byte && byte == BLOCK_INDEX_BASE {
                trace!("Synchronized after discarding {} bytes", discarded);
                return Ok(());
            }
            after_sync_byte = byte == BLOCK_SYNC_BYTE;
            discarded += 1;
        }
    }

    /// Reads the rest of a sweep whose marker has just been consumed by
    /// [`FrameReader::synchronize`].
    pub fn read_frame(&mut self, data_timeout: Duration) -> Result<RawFrame, LdsError> {
        let mut bytes = Box::new([0u8; FRAME_SIZE]);
        bytes[0] = BLOCK_SYNC_BYTE;
        bytes[1] = BLOCK_INDEX_BASE;
        let mut filled = 2;
        let mut last_progress = Instant::now();
        while filled < FRAME_SIZE {
            let n = self.read_some(&mut bytes[filled..])?;
            if n > 0 {
                filled += n;
                last_progress = Instant::now();
            } else if last_progress.elapsed() > data_timeout {
                return Err(LdsError::DataTimeout(data_timeout));
            }
        }
        Ok(RawFrame { bytes })
    }

    /// Synchronizes and reads one complete sweep.
    pub fn next_frame(
        &mut self,
        sync_timeout: Duration,
        data_timeout: Duration,
    ) -> Result<RawFrame, LdsError> {
        self.synchronize(sync_timeout)?;
        self.read_frame(data_timeout)
    }

    fn read_byte(&mut self) -> Result<Option<u8>, LdsError> {
        let mut buf = [0u8; 1];
        match self.read_some(&mut buf)? {
            0 => Ok(None),
            _ => Ok(Some(buf[0])),
        }
    }

    fn read_some(&mut self, buf: &mut [u8]) -> Result<usize, LdsError> {
        if !self.running.load(Ordering::Acquire) {
            return Err(LdsError::NotStarted);
        }
        match self.source.read(buf) {
            Ok(n) => Ok(n),
            Err(e)
                if matches!(
                    e.kind(),
                    ErrorKind::TimedOut | ErrorKind::WouldBlock | ErrorKind::Interrupted
                ) =>
            {
                Ok(0)
            }
            Err(e) => Err(LdsError::IoError(e)),
        }
    }
}
