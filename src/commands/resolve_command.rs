//! Artifact resolution command
//!
//! Prints the library file name for a target and, for the host, the paths
//! the dynamic backend would search.

use clap::ArgMatches;
use log::info;
use std::path::PathBuf;

use crate::binding::artifact::{resolve_module_artifact, Arch, Platform};
use crate::binding::loader::library_candidates;
use crate::commands::command_traits::{Command, CommandResult};
use crate::config::{InspectorConfig, LIBRARY_ENV_VAR};

/// Command for resolving the dynamic library artifact
pub struct ResolveCommand {
    platform_id: String,
    arch_id: String,
    config: InspectorConfig,
}

impl ResolveCommand {
    /// Create a new resolve command
    ///
    /// Platform and architecture default to the host.
    pub fn new(args: &ArgMatches, config: InspectorConfig) -> CommandResult<Self> {
        let platform_id = match args.get_one::<String>("platform") {
            Some(id) => id.clone(),
            None => Platform::current()?.id().to_string(),
        };
        let arch_id = match args.get_one::<String>("arch") {
            Some(id) => id.clone(),
            None => Arch::current()?.id().to_string(),
        };
        Ok(ResolveCommand {
            platform_id,
            arch_id,
            config,
        })
    }

    /// Artifact file name for the configured module on the requested target
    pub fn artifact(&self) -> CommandResult<String> {
        let name = resolve_module_artifact(&self.config.library.module_name, &self.platform_id, &self.arch_id)?;
        Ok(name)
    }
}

impl Command for ResolveCommand {
    fn execute(&self) -> CommandResult<()> {
        let artifact = self.artifact()?;
        info!("Resolved artifact for {}/{}", self.platform_id, self.arch_id);
        println!("{}", artifact);

        let platform = Platform::from_id(&self.platform_id)?;
        let arch = Arch::from_id(&self.arch_id)?;
        let env_override = std::env::var_os(LIBRARY_ENV_VAR)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        for candidate in library_candidates(&self.config.library, env_override, platform, arch) {
            let marker = if candidate.is_file() { "found" } else { "missing" };
            println!("  {} [{}]", candidate.display(), marker);
        }
        Ok(())
    }
}
