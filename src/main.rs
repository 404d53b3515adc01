//! eegstream CLI: decode a serial EEG board's stream to JSON lines on stdout.

use anyhow::Context;
use clap::Parser;
use log::{error, info};
use std::path::PathBuf;

use eegstream::{
    Acquisition, CommandWriter, Config, DeviceCommand, DeviceHandle, JsonLinesSink, SinkRunner,
};
use eegstream::transport::SerialPortTransport;

#[derive(Parser, Debug)]
#[command(name = "eegstream", version, about = "Stream decoded EEG samples from a serial acquisition board")]
struct Cli {
    /// Serial port of the board (e.g. /dev/ttyUSB0)
    #[arg(short, long)]
    port: Option<String>,

    /// Baud rate (default 115200)
    #[arg(short, long)]
    baud: Option<u32>,

    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// List visible serial ports and exit
    #[arg(long)]
    list_ports: bool,

    /// Do not send the start-stream command on startup
    #[arg(long)]
    no_start: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    if cli.list_ports {
        for port in SerialPortTransport::list_ports() {
            println!("{port}");
        }
        return Ok(());
    }

    let mut config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Config::default(),
    }
    .with_env_overrides();

    if let Some(port) = cli.port {
        config.device.port = Some(port);
    }
    if let Some(baud) = cli.baud {
        config.device.baud = baud;
    }
    config.validate()?;

    let port = config
        .device
        .port
        .clone()
        .context("no serial port given (use --port, EEGSTREAM_PORT, or a config file)")?;

    info!("opening {port} at {} baud", config.device.baud);
    let transport = SerialPortTransport::open(&port, config.device.baud)?;
    let device = DeviceHandle::new(transport);

    let (command_tx, command_thread) = CommandWriter::spawn(device.clone());
    let (sample_rx, acquisition) =
        Acquisition::with_config(device, config.acquisition_config()).start();
    let sink_thread = SinkRunner::spawn(sample_rx, Box::new(JsonLinesSink::stdout()));

    if !cli.no_start {
        command_tx.send(DeviceCommand::StartStream)?;
    }

    // Block until Ctrl-C, then unwind in order: stop the board's stream,
    // stop polling, let the sink drain.
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(tokio::signal::ctrl_c())?;
    info!("shutting down");

    if command_tx.send(DeviceCommand::StopStream).is_err() {
        error!("command writer gone before stop command");
    }
    drop(command_tx);
    acquisition.stop();

    if command_thread.join().is_err() {
        error!("command writer thread panicked");
    }
    if sink_thread.join().is_err() {
        error!("sink thread panicked");
    }

    Ok(())
}
