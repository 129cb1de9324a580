use crate::config::file_config::DEFAULT_CONFIG_PATH;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "modrun", version)]
#[command(
    about = "Deploy local modules with single commands or run your own predefined shell commands"
)]
pub struct CliConfig {
    /// run, multirun, deploy, compile, print, or the name of a custom command
    pub command: String,

    /// Module name from the config file. Required for run, multirun, deploy and compile
    pub module: Option<String>,

    /// Path to the JSON (or .toml) config file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit log lines as JSON
    #[arg(long)]
    pub json_logs: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command_and_module() {
        let cli = CliConfig::try_parse_from(["modrun", "deploy", "api"]).unwrap();
        assert_eq!(cli.command, "deploy");
        assert_eq!(cli.module.as_deref(), Some("api"));
        assert_eq!(cli.config, "config.json");
        assert!(!cli.verbose);
    }

    #[test]
    fn test_module_is_optional() {
        let cli = CliConfig::try_parse_from(["modrun", "es", "--config", "dev.toml", "-v"]).unwrap();
        assert_eq!(cli.command, "es");
        assert!(cli.module.is_none());
        assert_eq!(cli.config, "dev.toml");
        assert!(cli.verbose);
    }

    #[test]
    fn test_json_logs_flag() {
        let cli = CliConfig::try_parse_from(["modrun", "print", "--json-logs"]).unwrap();
        assert!(cli.json_logs);
        assert!(!CliConfig::try_parse_from(["modrun", "print"]).unwrap().json_logs);
    }

    #[test]
    fn test_command_is_required() {
        assert!(CliConfig::try_parse_from(["modrun"]).is_err());
    }
}
