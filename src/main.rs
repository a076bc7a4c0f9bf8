//! serlog - Entry Point

use clap::Parser;
use serlog::config::{self, CliOverrides};
use serlog::export::HtmlExporter;
use serlog::model::AppError;
use serlog::session::Session;
use serlog::source::{self, EventHub, TransportSpec};
use serlog::view::{self, ColorConfig, ViewOptions};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

/// serlog - monitor a USB-serial device and export tagged reports
#[derive(Parser, Debug)]
#[command(name = "serlog")]
#[command(version)]
#[command(about = "Terminal monitor for USB-serial devices with tagged report export")]
pub struct Args {
    /// Serial port to open (e.g. /dev/ttyUSB0 or COM3)
    #[arg(short, long, conflicts_with = "file")]
    pub port: Option<String>,

    /// Replay a captured log file instead of opening a port
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Baud rate for the serial port
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    pub baud: Option<u32>,

    /// List available serial ports and exit
    #[arg(long)]
    pub list_ports: bool,

    /// Start with line timestamps disabled
    #[arg(long)]
    pub no_timestamps: bool,

    /// Directory exported reports are written to
    #[arg(long)]
    pub export_dir: Option<PathBuf>,

    /// Disable colors
    #[arg(long)]
    pub no_color: bool,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Args {
    fn cli_overrides(&self) -> CliOverrides {
        CliOverrides {
            port: self.port.clone(),
            baud_rate: self.baud,
            no_timestamps: self.no_timestamps,
            export_dir: self.export_dir.clone(),
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), AppError> {
    if args.list_ports {
        return print_ports();
    }

    // Defaults → Config File → Env Vars → CLI Args
    let config = config::resolve(args.config.clone(), args.cli_overrides())?;

    serlog::logging::init(&config.log_file_path)?;

    info!(config = ?config, "Configuration loaded and resolved");

    let spec = TransportSpec::select(args.file.clone(), config.port.clone(), config.baud_rate);

    // Subscribe before connecting so the Connected event is not missed
    let hub = EventHub::new();
    let subscription = hub.subscribe();
    let transport = source::connect(&spec, &hub)?;

    let session = Session::new(transport, subscription, config.timestamps);
    let sink = HtmlExporter::new(config.export_dir, config.share_command);
    let options = ViewOptions {
        quick_send: config.quick_send,
        append_newline: config.append_newline,
        colors: ColorConfig::from_env_and_args(args.no_color),
    };

    view::run_with_session(session, Box::new(sink), options)?;

    info!("serlog exiting");
    Ok(())
}

fn print_ports() -> Result<(), AppError> {
    let ports = source::list_ports()?;
    if ports.is_empty() {
        println!("No serial ports found.");
    }
    for device in ports {
        println!("{}", device);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_help_does_not_error() {
        let result = Args::try_parse_from(["serlog", "--help"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_version_does_not_error() {
        let result = Args::try_parse_from(["serlog", "--version"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_no_args_defaults() {
        let args = Args::parse_from(["serlog"]);
        assert_eq!(args.port, None);
        assert_eq!(args.file, None);
        assert_eq!(args.baud, None);
        assert!(!args.list_ports);
        assert!(!args.no_timestamps);
        assert_eq!(args.export_dir, None);
        assert!(!args.no_color);
        assert_eq!(args.config, None);
    }

    #[test]
    fn test_port_short_and_long() {
        let args = Args::parse_from(["serlog", "-p", "/dev/ttyUSB0"]);
        assert_eq!(args.port.as_deref(), Some("/dev/ttyUSB0"));

        let args = Args::parse_from(["serlog", "--port", "COM3"]);
        assert_eq!(args.port.as_deref(), Some("COM3"));
    }

    #[test]
    fn test_port_conflicts_with_file() {
        let result = Args::try_parse_from(["serlog", "--port", "COM3", "--file", "capture.log"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_baud_flag() {
        let args = Args::parse_from(["serlog", "-b", "115200"]);
        assert_eq!(args.baud, Some(115200));
    }

    #[test]
    fn test_baud_rejects_zero() {
        let result = Args::try_parse_from(["serlog", "--baud", "0"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_baud_rejects_text() {
        assert!(Args::try_parse_from(["serlog", "--baud", "fast"]).is_err());
    }

    #[test]
    fn test_cli_overrides_carry_flags() {
        let args = Args::parse_from([
            "serlog",
            "--port",
            "/dev/ttyACM0",
            "--baud",
            "4800",
            "--no-timestamps",
            "--export-dir",
            "/tmp/out",
        ]);
        assert_eq!(
            args.cli_overrides(),
            CliOverrides {
                port: Some("/dev/ttyACM0".to_string()),
                baud_rate: Some(4800),
                no_timestamps: true,
                export_dir: Some(PathBuf::from("/tmp/out")),
            }
        );
    }

    #[test]
    fn test_list_ports_flag() {
        let args = Args::parse_from(["serlog", "--list-ports"]);
        assert!(args.list_ports);
    }
}
