//! Integration tests for a single SX127x bridge.
//!
//! Run with the bridge connected; transmits at low power on the chosen
//! frequency.

mod device;

use clap::Parser;
use colored::Colorize;

use device::{open, resolve_port};
use tests::{print_results, run_all_tests};

#[derive(Parser)]
#[command(name = "integration-tests")]
#[command(about = "Integration tests for an SX127x bridge")]
struct Args {
    /// Serial port of the bridge (use "auto" to auto-detect)
    #[arg(short, long, default_value = "auto")]
    port: String,

    /// Carrier frequency in Hz
    #[arg(short, long, default_value_t = 433_000_000)]
    frequency: u32,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let port = resolve_port(&args.port).await?;

    println!("{}", "SX127x Bridge Integration Tests".bold());
    println!("Port: {}", port);
    println!("Frequency: {} Hz", args.frequency);
    println!();

    println!("Connecting to bridge...");
    let radio = open(&port, "bridge", args.frequency).await?;
    println!("{}", "Connected!".green());

    println!("\nRunning tests...\n");

    let results = run_all_tests(&radio).await;
    print_results(&results);
    radio.disconnect().await;

    // Exit with error code if any tests failed
    let failed = results.iter().filter(|r| !r.passed).count();
    if failed > 0 {
        std::process::exit(1);
    }

    Ok(())
}
