use crate::constants::{
    BLOCK_INDEX_BASE, BLOCK_SYNC_BYTE, CHECKSUM_OFFSET, NUM_PACKETS, PACKET_SIZE, SAMPLE_OFFSET,
    SAMPLE_STRIDE,
};
use crate::error::LdsError;
use crate::numeric::to_u16;

/// Position of the block within the sweep, `0..60`.
pub(crate) fn block_index(block: &[u8; PACKET_SIZE]) -> Result<usize, LdsError> {
    if block[0] != BLOCK_SYNC_BYTE {
        return Err(LdsError::InvalidBlock(block[0], block[1]));
    }
    let index = block[1].wrapping_sub(BLOCK_INDEX_BASE) as usize;
    if index >= NUM_PACKETS {
        return Err(LdsError::InvalidBlock(block[0], block[1]));
    }
    Ok(index)
}

pub(crate) fn motor_speed(block: &[u8; PACKET_SIZE]) -> u16 {
    to_u16(block[2], block[3])
}

/// `(intensity, distance)` of the angle at `offset` degrees past the block's
/// base angle.
pub(crate) fn sample(block: &[u8; PACKET_SIZE], offset: usize) -> (u16, u16) {
    let i = SAMPLE_OFFSET + offset * SAMPLE_STRIDE;
    let intensity = to_u16(block[i], block[i + 1]);
    let distance = to_u16(block[i + 2], block[i + 3]);
    (intensity, distance)
}

fn calc_checksum(block: &[u8; PACKET_SIZE]) -> u16 {
    let sum = block[..CHECKSUM_OFFSET]
        .iter()
        .fold(0u16, |acc, &b| acc.wrapping_add(b as u16));
    !sum
}

pub(crate) fn err_if_checksum_mismatched(block: &[u8; PACKET_SIZE]) -> Result<(), LdsError> {
    let calculated = calc_checksum(block);
    let expected = to_u16(block[CHECKSUM_OFFSET], block[CHECKSUM_OFFSET + 1]);
    match calculated != expected {
        true => Err(LdsError::ChecksumMismatch(expected, calculated)),
        false => Ok(()),
    }
}


#[cfg(test)]
mod tests {
    use super::testing::encode_block;
    use super::*;
    use lds_data::{MeasurementTable, Reading};

    #[test]
    fn test_block_index() {
        let mut block = [0u8; PACKET_SIZE];
        block[0] = 0xFA;
        block[1] = 0xA0;
        assert_eq!(block_index(&block).unwrap(), 0);
        block[1] = 0xDB;
        assert_eq!(block_index(&block).unwrap(), 59);

        block[1] = 0xDC;
        assert!(matches!(
            block_index(&block),
            Err(LdsError::InvalidBlock(0xFA, 0xDC))
        ));
        block[1] = 0x10;
        assert!(matches!(
            block_index(&block),
            Err(LdsError::InvalidBlock(0xFA, 0x10))
        ));

        block[0] = 0xFB;
        block[1] = 0xA0;
        assert!(matches!(
            block_index(&block),
            Err(LdsError::InvalidBlock(0xFB, 0xA0))
        ));
    }

    #[test]
    fn test_sample_uses_per_angle_stride() {
        let mut table = MeasurementTable::new();
        for offset in 0..6u16 {
            table.set(Reading::new(12 + offset, 1000 + offset, 50 + offset));
        }
        let block = encode_block(&table, 2);
        for offset in 0..6 {
            assert_eq!(
                sample(&block, offset),
                (50 + offset as u16, 1000 + offset as u16)
            );
        }
    }

    #[test]
    fn test_motor_speed() {
        let mut table = MeasurementTable::new();
        table.motor_speed = 0x1234;
        let block = encode_block(&table, 0);
        assert_eq!(block[2..4], [0x34, 0x12]);
        assert_eq!(motor_speed(&block), 0x1234);
    }

    #[test]
    fn test_checksum() {
        let table = MeasurementTable::filled(2000, 300);
        let mut block = encode_block(&table, 5);
        assert!(err_if_checksum_mismatched(&block).is_ok());

        block[10] ^= 0x01;
        assert!(matches!(
            err_if_checksum_mismatched(&block),
            Err(LdsError::ChecksumMismatch(_, _))
        ));
    }

    #[test]
    fn test_calc_checksum() {
        let mut block = [0u8; PACKET_SIZE];
        block[0] = 0xFA;
        block[1] = 0xA0;
        // 0xFA + 0xA0 = 0x019A
        assert_eq!(calc_checksum(&block), !0x019Au16);
    }
}
