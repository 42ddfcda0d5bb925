/// Fixed by the device firmware.
pub const BAUD_RATE: u32 = 230400;
pub(crate) const LIDAR_CMD_START: u8 = b'b';
pub(crate) const LIDAR_CMD_STOP: u8 = b'e';
/// Size of one block on the wire.
pub const PACKET_SIZE: usize = 42;
/// Blocks per revolution, each covering six degrees.
pub const NUM_PACKETS: usize = 60;
/// Size of one full sweep on the wire.
pub const FRAME_SIZE: usize = PACKET_SIZE * NUM_PACKETS;
pub(crate) const BLOCK_SYNC_BYTE: u8 = 0xFA;
pub(crate) const BLOCK_INDEX_BASE: u8 = 0xA0;
pub(crate) const ANGLES_PER_BLOCK: usize = 6;
// Each angle is [intensity lo, hi, distance lo, hi, reserved, reserved]
pub(crate) const SAMPLE_OFFSET: usize = 4;
pub(crate) const SAMPLE_STRIDE: usize = 6;
pub(crate) const CHECKSUM_OFFSET: usize = 40;
