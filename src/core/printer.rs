use crate::core::Configuration;
use crate::utils::error::Result;
use std::io::Write;

/// Writes a human-readable summary of the configuration. Touches nothing else.
pub fn print_config<W: Write>(config: &Configuration, out: &mut W) -> Result<()> {
    writeln!(out, "Settings in your config:")?;
    writeln!(out, "\tProject Root: {}", config.project_root().display())?;
    writeln!(out, "\tShell: {}", config.shell().display())?;
    writeln!(out, "\tTerminal: {}", config.terminal())?;
    writeln!(out, "\tCompile: {}", config.compile_command())?;

    writeln!(out, "\tModules:")?;
    for module in config.modules() {
        writeln!(
            out,
            "\t\t{} ({}): {:?}",
            module.name, module.version, module.ports
        )?;
    }

    writeln!(out, "\tCustom Commands:")?;
    for command in config.custom_commands() {
        writeln!(out, "\t\t{}: {}", command.name, command.command)?;
    }

    out.flush()?;
    Ok(())
}
