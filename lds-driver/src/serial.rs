use crate::constants::{BAUD_RATE, LIDAR_CMD_START, LIDAR_CMD_STOP};
use crate::error::LdsError;
use crate::time::sleep_ms;
use serialport::{ClearBuffer, SerialPort};
use std::io::Write;
use std::time::{Duration, Instant};

pub(crate) fn open(
    port_name: &str,
    read_timeout: Duration,
) -> Result<Box<dyn SerialPort>, LdsError> {
    serialport::new(port_name, BAUD_RATE)
        .timeout(read_timeout)
        .open()
        .map_err(|source| LdsError::Connection {
            port: port_name.to_string(),
            source,
        })
}

/// Powers the motor and starts streaming.
pub(crate) fn start_scan(port: &mut Box<dyn SerialPort>) -> Result<(), LdsError> {
    send_command(port, LIDAR_CMD_START)
}

/// Stops both the motor and the stream.
pub(crate) fn stop_scan(port: &mut Box<dyn SerialPort>) -> Result<(), LdsError> {
    send_command(port, LIDAR_CMD_STOP)
}

pub(crate) fn stop_scan_and_flush(port: &mut Box<dyn SerialPort>) -> Result<(), LdsError> {
    stop_scan(port)?;
    flush(port)?;
    Ok(())
}

pub(crate) fn send_command(port: &mut Box<dyn SerialPort>, command: u8) -> Result<(), LdsError> {
    port.write_all(&[command])?;
    Ok(())
}

pub(crate) fn get_n_read(port: &mut Box<dyn SerialPort>) -> Result<usize, LdsError> {
    let n_u32: u32 = port.bytes_to_read()?;
    Ok(n_u32.try_into().unwrap_or(0))
}

/// Discards everything received but not yet read.
pub(crate) fn flush(port: &mut Box<dyn SerialPort>) -> Result<(), LdsError> {
    port.clear(ClearBuffer::Input)?;
    Ok(())
}

/// Blocks until the device has sent at least one byte.
pub(crate) fn wait_for_data(
    port: &mut Box<dyn SerialPort>,
    timeout: Duration,
) -> Result<(), LdsError> {
    let start = Instant::now();
    loop {
        if get_n_read(port)? > 0 {
            return Ok(());
        }
        if start.elapsed() > timeout {
            return Err(LdsError::StartTimeout(timeout));
        }
        sleep_ms(10);
    }
}
