//! Bridge discovery and connection.

use std::sync::Arc;

use anyhow::Result;

use sx127x_bridge::fsk::FskConfig;
use sx127x_bridge::lora::LoRaConfig;
use sx127x_bridge::protocol::RegisterBus;
use sx127x_bridge::radio::Sx127xDriver;
use sx127x_bridge::transport::SerialTransport;
use sx127x_bridge::RadioController;

/// RegVersion of every SX1276/77/78/79
const SX127X_VERSION: u8 = 0x12;

pub type Radio = Arc<RadioController<SerialTransport>>;

/// Find bridges by probing USB serial ports for an SX127x version register.
pub async fn find_bridge_ports() -> Result<Vec<String>> {
    let mut bridges = Vec::new();

    for port_info in serialport::available_ports()? {
        // USB serial adapters and CDC-ACM boards only
        if !(port_info.port_name.contains("ttyUSB") || port_info.port_name.contains("ttyACM")) {
            continue;
        }

        let driver = Sx127xDriver::new(RegisterBus::new(SerialTransport::new()), true);
        if !driver.connect(&port_info.port_name).await {
            continue;
        }
        if let Ok(SX127X_VERSION) = driver.chip_version().await {
            bridges.push(port_info.port_name.clone());
        }
        driver.disconnect().await;
    }

    Ok(bridges)
}

/// Resolve a port argument, probing when it is "auto".
pub async fn resolve_port(port: &str) -> Result<String> {
    if port != "auto" {
        return Ok(port.to_string());
    }
    match find_bridge_ports().await?.into_iter().next() {
        Some(port) => Ok(port),
        None => anyhow::bail!("No bridge found - ensure it is connected"),
    }
}

/// Resolve two distinct ports for link tests.
pub async fn resolve_two_ports(port_a: &str, port_b: &str) -> Result<(String, String)> {
    if port_a != "auto" && port_b != "auto" {
        return Ok((port_a.to_string(), port_b.to_string()));
    }
    let ports = find_bridge_ports().await?;
    if ports.len() < 2 {
        anyhow::bail!(
            "Need at least 2 bridges connected, found {}. Ports: {:?}",
            ports.len(),
            ports
        );
    }
    let pick = |arg: &str, fallback: &String| {
        if arg == "auto" {
            fallback.clone()
        } else {
            arg.to_string()
        }
    };
    Ok((pick(port_a, &ports[0]), pick(port_b, &ports[1])))
}

/// Connect to a bridge and initialise it in LoRa mode.
pub async fn open(port: &str, label: &str, frequency: u32) -> Result<Radio> {
    let lora = LoRaConfig {
        label: label.to_string(),
        frequency,
        ..Default::default()
    };
    let fsk = FskConfig {
        label: label.to_string(),
        frequency,
        ..Default::default()
    };
    let driver = Sx127xDriver::new(RegisterBus::new(SerialTransport::new()), true);
    let radio = Arc::new(RadioController::new(driver, lora, fsk)?);
    if !radio.connect(port).await? {
        anyhow::bail!("Cannot connect to bridge on {}", port);
    }
    Ok(radio)
}
