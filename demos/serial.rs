use std::{env, str::FromStr};

use bk_precision_psu::{
    config::SerialConfig,
    psu::Bk168xB,
    serial::SerialTransport,
    telemetry::read_readings,
    types::Model,
};
use fugit::ExtU32;
use inquire::Select;
use log::{error, info};

// Configuration constants - adjust these for your setup
const PSU_NAME: &str = "Power Supply 1";
const OUTPUT_VOLTAGE: f32 = 5.0;
const CURRENT_LIMIT: f32 = 0.5;
const STABILIZATION_DELAY_MS: u64 = 1000;
const POLL_INTERVAL_MS: u64 = 1000;
const POLL_COUNT: usize = 10;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Get serial port from command line arg or interactive selection
    let port_name = env::args().nth(1).unwrap_or_else(|| {
        let ports = serialport::available_ports().expect("Failed to enumerate serial ports");

        if ports.is_empty() {
            eprintln!("No serial ports found!");
            std::process::exit(1);
        }

        let port_names: Vec<String> = ports.iter().map(|p| p.port_name.clone()).collect();

        Select::new("Select a serial port:", port_names)
            .prompt()
            .expect("Failed to select port")
    });

    // Model from the second arg, e.g. `1687B`
    let model = env::args()
        .nth(2)
        .map(|model| Model::from_str(&model).expect("Model must be one of 1685B, 1687B, 1688B"))
        .unwrap_or(Model::Bk1685B);

    info!("Using port {} for a {}", port_name, model);

    // The supply answers well within a second, no need to wait the default 5s on a dead link.
    let config = SerialConfig::default().with_timeout(2.secs());
    let port = SerialTransport::open(&port_name, &config).expect("Failed to open serial port");

    let mut psu: Bk168xB<SerialTransport> =
        Bk168xB::new(port, PSU_NAME, model).expect("Failed to create PSU");

    let settings = psu.get_settings().expect("Failed to read settings");
    info!(
        "Current settings: {:.1}V, {:.1}A",
        settings.voltage, settings.current
    );

    if !psu.set_voltage_level(OUTPUT_VOLTAGE).expect("Failed to set voltage") {
        error!("Supply declined voltage setting");
    }
    if !psu.set_current_level(CURRENT_LIMIT).expect("Failed to set current") {
        error!("Supply declined current setting");
    }

    psu.set_output_on().expect("Failed to enable output");
    info!("Output enabled");

    std::thread::sleep(std::time::Duration::from_millis(STABILIZATION_DELAY_MS));

    match psu.get_display() {
        Ok(display) => info!(
            "Measured {:.2}V, {:.2}A in {:?}",
            display.voltage, display.current, display.mode
        ),
        Err(err) => error!("Failed to read display: {}", err),
    }

    // A poll loop in the shape a telemetry publisher would run. Failed reads are simply missing this round.
    for _ in 0..POLL_COUNT {
        let readings = read_readings(&mut psu);
        info!("{}: {:?}", psu.name(), readings);
        std::thread::sleep(std::time::Duration::from_millis(POLL_INTERVAL_MS));
    }

    psu.set_output_off().expect("Failed to disable output");
    info!("Output disabled");

    psu.close().expect("Failed to close serial port");
}
