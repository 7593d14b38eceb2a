use clap::Parser;
use oaslint::{
    Result,
    cli::{Cli, Commands},
    commands::{self, LintArgs},
    telemetry,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let guard = telemetry::init_telemetry()?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Lint {
            file,
            config,
            format,
            rule_set,
            jobs,
            timeout_ms,
        } => {
            let args = LintArgs {
                file,
                config,
                format,
                rule_sets: rule_set,
                jobs,
                timeout_ms,
            };
            let passed = tokio::task::spawn_blocking(move || commands::execute_lint(&args))
                .await
                .map_err(|e| oaslint::LintError::Configuration(format!("lint task failed: {}", e)))??;
            if !passed {
                drop(guard);
                std::process::exit(1);
            }
        }
        Commands::Rules { config } => {
            commands::execute_rules(config.as_deref())?;
        }
    }

    Ok(())
}
