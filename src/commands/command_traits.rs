//! Command pattern interfaces
//!
//! This module defines the core Command pattern interfaces
//! for the CLI application.

use std::fmt;

use crate::config::ConfigError;
use crate::format::errors::InspectionError;

/// Errors surfaced by CLI commands
#[derive(Debug)]
pub enum CommandError {
    /// An inspection or artifact lookup failed
    Inspection(InspectionError),
    /// Configuration could not be loaded
    Config(ConfigError),
    /// Arguments were missing or invalid
    Usage(String),
    /// Some inputs could not be processed; each was already reported
    InputsFailed { failed: usize, total: usize },
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Inspection(e) => write!(f, "{}", e),
            CommandError::Config(e) => write!(f, "{}", e),
            CommandError::Usage(msg) => write!(f, "{}", msg),
            CommandError::InputsFailed { failed, total } => {
                write!(f, "{} of {} inputs could not be inspected", failed, total)
            }
        }
    }
}

impl std::error::Error for CommandError {}

impl From<InspectionError> for CommandError {
    fn from(error: InspectionError) -> Self {
        CommandError::Inspection(error)
    }
}

impl From<ConfigError> for CommandError {
    fn from(error: ConfigError) -> Self {
        CommandError::Config(error)
    }
}

/// Result type for CLI commands
pub type CommandResult<T> = Result<T, CommandError>;

/// Represents an executable command in the application
pub trait Command {
    /// Execute the command
    ///
    /// # Returns
    /// Result indicating success or an error
    fn execute(&self) -> CommandResult<()>;
}

/// Factory for creating commands from CLI arguments
pub trait CommandFactory {
    /// Create a new Command instance based on CLI arguments
    ///
    /// # Arguments
    /// * `args` - CLI argument matches from clap
    ///
    /// # Returns
    /// A command that implements the Command trait, or an error
    fn create_command(&self, args: &clap::ArgMatches) -> CommandResult<Box<dyn Command>>;
}
