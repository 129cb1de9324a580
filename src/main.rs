use clap::Parser;
use modrun::utils::logger;
use modrun::{CliConfig, ConfigFile, Dispatcher, ModrunError, ShellExecutor};

fn report(e: &ModrunError) {
    tracing::error!("❌ {} (Category: {:?})", e, e.category());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
}

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("CLI config: {:?}", cli);

    let config = match ConfigFile::from_file(&cli.config).and_then(ConfigFile::into_configuration) {
        Ok(config) => config,
        Err(e) => {
            report(&e);
            std::process::exit(e.exit_code());
        }
    };
    tracing::debug!("Loaded config from {}", cli.config);

    let executor = ShellExecutor::new(config.shell());
    let dispatcher = Dispatcher::new(config, executor);

    match dispatcher.dispatch(&cli.command, cli.module.as_deref()).await {
        Ok(code) => {
            tracing::debug!("'{}' finished with exit code {}", cli.command, code);
            std::process::exit(code);
        }
        Err(e) => {
            report(&e);
            std::process::exit(e.exit_code());
        }
    }
}
