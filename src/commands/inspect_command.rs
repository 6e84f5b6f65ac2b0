//! Image inspection command
//!
//! Prints the validated metadata of every input file.

use clap::ArgMatches;
use log::{debug, error};

use crate::api::ImageProbe;
use crate::commands::command_traits::{Command, CommandError, CommandResult};
use crate::format::errors::InspectionResult;
use crate::format::metadata::ImageMetadata;

/// Command for inspecting image files
pub struct InspectCommand {
    /// Files to inspect
    inputs: Vec<String>,
    /// Probe configured from the command line
    probe: ImageProbe,
}

impl InspectCommand {
    /// Create a new inspect command
    ///
    /// # Arguments
    /// * `args` - CLI argument matches from clap
    /// * `probe` - Probe to inspect with
    pub fn new(args: &ArgMatches, probe: ImageProbe) -> CommandResult<Self> {
        Ok(InspectCommand {
            inputs: super::input_files(args)?,
            probe,
        })
    }

    /// Renders one inspection outcome for display
    pub fn render(input: &str, result: &InspectionResult<ImageMetadata>) -> String {
        match result {
            Ok(metadata) => format!("{}:\n{}", input, metadata),
            Err(e) => format!("{}: error {} ({})", input, e.code(), e),
        }
    }
}

impl Command for InspectCommand {
    fn execute(&self) -> CommandResult<()> {
        debug!("Inspecting {} inputs with the {} backend", self.inputs.len(), self.probe.backend_kind());

        let mut failed = 0;
        for input in &self.inputs {
            let result = self.probe.inspect(input);
            if let Err(e) = &result {
                error!("Inspection of {} failed: {}", input, e);
                failed += 1;
            }
            println!("{}", Self::render(input, &result));
        }

        if failed > 0 {
            return Err(CommandError::InputsFailed {
                failed,
                total: self.inputs.len(),
            });
        }
        Ok(())
    }
}
