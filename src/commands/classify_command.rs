//! Format classification command
//!
//! Reads only the leading bytes of each input and prints the sniffed format.

use clap::ArgMatches;
use log::error;
use std::fs::File;
use std::io::Read;

use crate::api::ImageProbe;
use crate::commands::command_traits::{Command, CommandError, CommandResult};
use crate::format::constants::SNIFF_LEN;
use crate::format::errors::{InspectionError, InspectionResult};
use crate::format::signatures::FormatTag;

/// Command for classifying files by content
pub struct ClassifyCommand {
    inputs: Vec<String>,
    probe: ImageProbe,
}

impl ClassifyCommand {
    pub fn new(args: &ArgMatches, probe: ImageProbe) -> CommandResult<Self> {
        Ok(ClassifyCommand {
            inputs: super::input_files(args)?,
            probe,
        })
    }

    fn classify_file(&self, input: &str) -> InspectionResult<FormatTag> {
        let file = File::open(input).map_err(|e| InspectionError::from_io(&e, input))?;
        let mut prefix = Vec::with_capacity(SNIFF_LEN);
        file.take(SNIFF_LEN as u64)
            .read_to_end(&mut prefix)
            .map_err(|e| InspectionError::from_io(&e, input))?;
        self.probe.classify_bytes(&prefix)
    }
}

impl Command for ClassifyCommand {
    fn execute(&self) -> CommandResult<()> {
        let mut failed = 0;
        for input in &self.inputs {
            match self.classify_file(input) {
                Ok(format) => println!("{}: {}", input, format),
                Err(e) => {
                    error!("Classification of {} failed: {}", input, e);
                    println!("{}: error {} ({})", input, e.code(), e);
                    failed += 1;
                }
            }
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
