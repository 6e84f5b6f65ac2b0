use clap::{value_parser, Arg, ArgAction, Command as ClapCommand};
use std::process;
use log::error;

use imgprobe::commands::{CommandFactory, ProbeCommandFactory};

fn main() {
    let matches = ClapCommand::new("imgprobe")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Maurice Schilpp")
        .about("Inspect image headers and check file integrity")
        .arg(
            Arg::new("input")
                .help("Image files to inspect")
                .num_args(0..)
                .index(1),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("classify")
                .short('c')
                .long("classify")
                .help("Print only the sniffed format of each input")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .help("TOML configuration file")
                .value_name("FILE")
                .required(false),
        )
        .arg(
            Arg::new("backend")
                .long("backend")
                .help("Inspection backend (in_process, dynamic, mock)")
                .value_name("NAME")
                .required(false),
        )
        .arg(
            Arg::new("max-scan")
                .long("max-scan")
                .help("Maximum bytes read from each file")
                .value_name("BYTES")
                .value_parser(value_parser!(u64))
                .required(false),
        )
        .arg(
            Arg::new("resolve-artifact")
                .long("resolve-artifact")
                .help("Print the library artifact name and search candidates")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("platform")
                .long("platform")
                .help("Platform for --resolve-artifact (win, mac, linux)")
                .value_name("ID")
                .required(false),
        )
        .arg(
            Arg::new("arch")
                .long("arch")
                .help("Architecture for --resolve-artifact (x64, arm64, ia32, arm)")
                .value_name("ID")
                .required(false),
        )
        .get_matches();

    let default_level = if matches.get_flag("verbose") { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let factory = ProbeCommandFactory::new();

    let command_result = factory.create_command(&matches);
    match command_result {
        Ok(command) => {
            if let Err(e) = command.execute() {
                error!("Command execution error: {}", e);
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        },
        Err(e) => {
            error!("Failed to create command: {}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
}
