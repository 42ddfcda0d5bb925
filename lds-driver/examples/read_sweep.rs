use clap::Parser;
use lds_data::Point;
use lds_driver::{DriverConfig, LdsDriver};
use std::sync::mpsc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Reads sweeps from an LDS and prints the in-range points of each one as a
/// JSON line.
#[derive(Parser)]
#[command(about = "LiDAR data receiver.", disable_version_flag = true)]
struct Args {
    /// The device path to a serial port
    port: String,
    /// Number of sweeps to print before exiting
    #[arg(long, default_value_t = 10)]
    sweeps: usize,
    /// Drop blocks whose checksum does not match
    #[arg(long)]
    verify_checksum: bool,
    /// Seconds to wait for the start of a sweep
    #[arg(long, default_value_t = 30)]
    sync_timeout: u64,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    let args = Args::parse();

    let config = DriverConfig::default()
        .with_verify_checksum(args.verify_checksum)
        .with_sync_timeout(Duration::from_secs(args.sync_timeout));
    let mut driver = LdsDriver::with_config(&args.port, config);

    let (points_tx, points_rx) = mpsc::sync_channel::<Vec<Point>>(10);
    driver.set_callback(move |table| {
        // never block the capture thread
        let _ = points_tx.try_send(table.points());
    });

    if let Err(e) = driver.start() {
        eprintln!("{e}");
        std::process::exit(1);
    }

    for _ in 0..args.sweeps {
        let points = match points_rx.recv_timeout(Duration::from_secs(args.sync_timeout + 1)) {
            Ok(points) => points,
            Err(_) => break,
        };
        match serde_json::to_string(&points) {
            Ok(line) => println!("{line}"),
            Err(e) => eprintln!("{e}"),
        }
    }

    driver.stop();
}
