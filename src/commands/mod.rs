//! CLI command implementations
//!
//! This module contains implementations of the commands
//! supported by the CLI application using the Command pattern.

pub mod command_traits;
pub mod inspect_command;
pub mod classify_command;
pub mod resolve_command;

pub use command_traits::{Command, CommandError, CommandFactory, CommandResult};
pub use inspect_command::InspectCommand;
pub use classify_command::ClassifyCommand;
pub use resolve_command::ResolveCommand;

use clap::ArgMatches;
use log::debug;
use std::path::Path;

use crate::api::ImageProbe;
use crate::binding::backend::BackendKind;
use crate::config::InspectorConfig;

/// Factory for creating command instances based on CLI arguments
pub struct ProbeCommandFactory;

impl ProbeCommandFactory {
    /// Create a new factory instance
    pub fn new() -> Self {
        ProbeCommandFactory
    }

    /// Builds the configuration from `--config` (or the environment) and
    /// the command-line overrides
    pub fn load_config(args: &ArgMatches) -> CommandResult<InspectorConfig> {
        let mut config = match args.get_one::<String>("config") {
            Some(path) => InspectorConfig::load(Path::new(path))?,
            None => InspectorConfig::from_env()?,
        };

        if let Some(name) = args.get_one::<String>("backend") {
            config.backend = BackendKind::from_name(name)
                .ok_or_else(|| CommandError::Usage(format!("Unknown backend '{}'", name)))?;
        }
        if let Some(max_scan) = args.get_one::<u64>("max-scan") {
            if *max_scan == 0 {
                return Err(CommandError::Usage("--max-scan must be positive".to_string()));
            }
            config.limits.max_scan_bytes = *max_scan;
        }

        debug!("Effective configuration: {:?}", config);
        Ok(config)
    }
}

impl Default for ProbeCommandFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandFactory for ProbeCommandFactory {
    fn create_command(&self, args: &ArgMatches) -> CommandResult<Box<dyn Command>> {
        let config = Self::load_config(args)?;

        if args.get_flag("resolve-artifact") {
            Ok(Box::new(ResolveCommand::new(args, config)?))
        } else if args.get_flag("classify") {
            Ok(Box::new(ClassifyCommand::new(args, ImageProbe::new(config))?))
        } else {
            // Default to inspection
            Ok(Box::new(InspectCommand::new(args, ImageProbe::new(config))?))
        }
    }
}

/// Input files named on the command line
fn input_files(args: &ArgMatches) -> CommandResult<Vec<String>> {
    let inputs: Vec<String> = args
        .get_many::<String>("input")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    if inputs.is_empty() {
        return Err(CommandError::Usage("Missing input file".to_string()));
    }
    Ok(inputs)
}
