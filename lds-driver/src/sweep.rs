use crate::constants::{ANGLES_PER_BLOCK, PACKET_SIZE};
use crate::error::LdsError;
use crate::frame::RawFrame;
use crate::numeric::to_string;
use crate::packet::{block_index, err_if_checksum_mismatched, motor_speed, sample};
use lds_data::{MeasurementTable, Reading};
use tracing::debug;

/// Decoding of wire sweeps into a [`MeasurementTable`].
///
/// Decoding never fails as a whole: a block with a bad marker, an out-of-range
/// index or (when verified) a bad checksum is skipped and its six angles keep
/// whatever the table held before.
pub trait LdsSweep {
    /// Decodes every block of `frame` into the table and returns how many
    /// blocks were accepted.
    fn decode_frame(&mut self, frame: &RawFrame, verify_checksum: bool) -> usize;
    /// Decodes one block. Returns the block index, or the reason it was
    /// rejected, in which case the table is untouched.
    fn decode_block(
        &mut self,
        block: &[u8; PACKET_SIZE],
        verify_checksum: bool,
    ) -> Result<usize, LdsError>;
}

impl LdsSweep for MeasurementTable {
    fn decode_frame(&mut self, frame: &RawFrame, verify_checksum: bool) -> usize {
        let mut n_decoded = 0;
        for block in frame.blocks() {
            match self.decode_block(block, verify_checksum) {
                Ok(_) => n_decoded += 1,
                Err(e) => debug!("Skipping block {}: {}", to_string(&block[0..2]), e),
            }
        }
        n_decoded
    }

    fn decode_block(
        &mut self,
        block: &[u8; PACKET_SIZE],
        verify_checksum: bool,
    ) -> Result<usize, LdsError> {
        let index = block_index(block)?;
        if verify_checksum {
            err_if_checksum_mismatched(block)?;
        }
        let base_angle = index * ANGLES_PER_BLOCK;
        for offset in 0..ANGLES_PER_BLOCK {
            let (intensity, distance) = sample(block, offset);
            self.set(Reading::new(
                (base_angle + offset) as u16,
                distance,
                intensity,
            ));
        }
        self.motor_speed = motor_speed(block);
        Ok(index)
    }
}
