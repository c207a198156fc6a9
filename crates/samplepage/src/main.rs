//! samplepage CLI - builds and previews the samples webpage.

use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::Result;
use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "samplepage")]
#[command(about = "Build and preview the samples webpage")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to samplepage.toml config file
    #[arg(short, long, default_value = "samplepage.toml", global = true)]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the web targets and assemble the webpage
    Build {
        /// Ignored
        #[arg(hide = true, trailing_var_arg = true, allow_hyphen_values = true)]
        _rest: Vec<String>,
    },

    /// Open the webpage in a browser, served from a local HTTP server
    Serve {
        /// Ignored
        #[arg(hide = true, trailing_var_arg = true, allow_hyphen_values = true)]
        _rest: Vec<String>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dispatch(std::env::args_os()).await
}

/// Parse `args` and run the selected command.
///
/// A missing or unknown command is logged as a usage error and nothing runs.
async fn dispatch<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.print()?;
            return Ok(());
        }
        Err(e) => {
            init_logging(false);
            tracing::error!("{}", usage_error(&e));
            return Ok(());
        }
    };

    init_logging(cli.verbose);

    let config = config::load_config(&cli.config)?.into_deploy_config();

    match cli.command {
        Commands::Build { .. } => {
            commands::build::run(config).await?;
        }
        Commands::Serve { .. } => {
            commands::serve::run(config.deploy_dir).await?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    // already set when dispatching more than once in a process
    let _ = fmt().with_env_filter(filter).with_target(false).try_init();
}

fn usage_error(e: &clap::Error) -> String {
    if let Some(ContextValue::String(param)) = e.get(ContextKind::InvalidSubcommand) {
        return format!("Invalid param '{}', expected 'build' or 'serve'", param);
    }

    match e.kind() {
        ErrorKind::MissingSubcommand | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
            "Param 'build' or 'serve' expected".to_string()
        }
        _ => {
            let rendered = e.to_string();
            let first = rendered
                .lines()
                .next()
                .unwrap_or_default()
                .trim_start_matches("error: ");
            format!("{}; expected 'build' or 'serve'", first)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn parses_both_commands() {
        let build = Cli::try_parse_from(["samplepage", "build"]).unwrap();
        assert!(matches!(build.command, Commands::Build { .. }));

        let serve = Cli::try_parse_from(["samplepage", "--verbose", "serve"]).unwrap();
        assert!(matches!(serve.command, Commands::Serve { .. }));
        assert!(serve.verbose);
    }

    #[test]
    fn extra_arguments_are_ignored() {
        let build = Cli::try_parse_from(["samplepage", "build", "extra"]).unwrap();
        assert!(matches!(build.command, Commands::Build { .. }));

        let serve = Cli::try_parse_from(["samplepage", "serve", "now", "--port", "9000"]).unwrap();
        assert!(matches!(serve.command, Commands::Serve { .. }));
    }

    #[test]
    fn missing_command_is_a_usage_error() {
        let Err(e) = Cli::try_parse_from(["samplepage"]) else {
            panic!("expected a usage error");
        };

        assert_eq!(usage_error(&e), "Param 'build' or 'serve' expected");
    }

    #[test]
    fn unknown_command_is_a_usage_error() {
        let Err(e) = Cli::try_parse_from(["samplepage", "deploy"]) else {
            panic!("expected a usage error");
        };

        let message = usage_error(&e);
        assert!(message.contains("'deploy'"));
        assert!(message.contains("expected 'build' or 'serve'"));
    }

    #[tokio::test]
    async fn usage_errors_leave_deploy_dir_untouched() {
        let temp = tempdir().unwrap();
        let deploy = temp.path().join("webpage");
        let config = temp.path().join("samplepage.toml");
        fs::write(&config, format!("[deploy]\ndir = {:?}\n", deploy.display().to_string())).unwrap();
        let config = config.display().to_string();

        dispatch(["samplepage"]).await.unwrap();
        dispatch(["samplepage", "--config", config.as_str(), "publish"])
            .await
            .unwrap();

        assert!(!deploy.exists());
    }
}
