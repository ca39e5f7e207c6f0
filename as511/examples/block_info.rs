//! Query a block and dump its contents

use anyhow::Context;
use as511::{BlockType, Plc};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging, RUST_LOG=as511=trace shows every wire byte
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let port = std::env::var("AS511_PORT").unwrap_or_else(|_| "/dev/ttyUSB0".to_string());
    let number: u8 = std::env::var("AS511_DB")
        .unwrap_or_else(|_| "1".to_string())
        .parse()
        .context("AS511_DB must be a block number")?;

    println!("Opening {}...", port);

    let mut plc = Plc::serial(port);
    plc.connect().await?;

    let block = match plc.block_information(BlockType::Db, number).await {
        Ok(block) => block,
        Err(e) => {
            if e.requires_flush() {
                plc.flush()?;
            }
            return Err(e).context("block information failed");
        }
    };
    println!("✓ DB{}: {}", number, block);

    let data = plc.read_block(&block).await?;
    println!("✓ Read {} bytes: {:02X?}", data.len(), &data[..]);

    plc.disconnect().await?;
    println!("✓ Closed");

    Ok(())
}
