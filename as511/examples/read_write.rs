//! Write a few bytes and read them back

use std::time::Duration;

use as511::{MemoryAddress, Plc, SerialConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("as511=debug"))
        .init();

    let port = std::env::var("AS511_PORT").unwrap_or_else(|_| "/dev/ttyUSB0".to_string());

    let config = SerialConfig::default().with_read_timeout(Duration::from_secs(1));
    let mut plc = Plc::serial_with_config(port, config);
    plc.connect().await?;

    let start = MemoryAddress::new(0x0200);
    let payload = [0x10, 0x20, 0x30, 0x40];

    println!("Writing {:02X?} to {}...", payload, start);
    plc.write(start, &payload).await?;

    let end = start
        .checked_add(2)
        .ok_or_else(|| anyhow::anyhow!("address range overflows"))?;
    let data = plc.read(start, 2, end).await?;
    println!("Read back: {:02X?}", &data[..]);

    plc.disconnect().await?;

    Ok(())
}
