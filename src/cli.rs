use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use log::info;
use std::path::PathBuf;

use crate::commit;
use crate::config::{Config, OutputFormat};
use crate::dispatch;
use crate::filter::{evaluate, Directive, FilterReport};
use crate::output;

#[derive(Parser)]
#[command(name = "cigate")]
#[command(author, version, about = "CI Build Gate", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    #[arg(short, long, global = true, default_value_t = false)]
    pretty: bool,
}

#[derive(Args)]
struct FilterArgs {
    /// Build type identifier for this CI job
    #[arg(short, long, env = "CI_BUILD_TYPE")]
    build_type: String,

    /// Commit message to filter on (defaults to the latest non-merge commit)
    #[arg(short, long)]
    message: Option<String>,

    /// Read the commit message from a file, '-' for stdin
    #[arg(short = 'f', long, conflicts_with = "message")]
    message_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Decide whether this build type should run, without dispatching
    Check {
        #[command(flatten)]
        args: FilterArgs,
    },

    /// Decide and, on a proceed decision, run the platform build script
    Run {
        #[command(flatten)]
        args: FilterArgs,
    },
}

impl Cli {
    fn evaluate_filter(&self, config: &Config, args: &FilterArgs) -> Result<FilterReport> {
        let message = commit::resolve(args.message.as_deref(), args.message_file.as_deref())?;

        let directive = Directive::parse(
            &message,
            &config.filter.marker,
            &config.filter.linux_aliases,
        )?;
        let report = evaluate(directive.as_ref(), &args.build_type)?;

        output::print_summary(&report);
        self.emit_report(config, &report)?;

        Ok(report)
    }

    fn emit_report(&self, config: &Config, report: &FilterReport) -> Result<()> {
        if self.output.is_none() && config.output.format != OutputFormat::Json {
            return Ok(());
        }

        let json_output = if self.pretty || config.output.pretty {
            serde_json::to_string_pretty(report)?
        } else {
            serde_json::to_string(report)?
        };

        if let Some(output_path) = &self.output {
            std::fs::write(output_path, json_output)?;
            info!("Filter report written to: {}", output_path.display());
        } else {
            println!("{}", json_output);
        }

        Ok(())
    }

    pub fn execute(&self) -> Result<()> {
        let config = Config::load(self.config.as_deref())?;

        match &self.command {
            Commands::Check { args } => {
                let report = self.evaluate_filter(&config, args)?;
                info!("Decision for {}: {}", args.build_type, report.decision);
                Ok(())
            }
            Commands::Run { args } => {
                let report = self.evaluate_filter(&config, args)?;
                if report.decision.is_proceed() {
                    let code = dispatch::dispatch(&config.dispatch, &args.build_type)?;
                    if code != 0 {
                        std::process::exit(code);
                    }
                } else {
                    info!("Build type {} filtered out, skipping build", args.build_type);
                }
                Ok(())
            }
        }
    }
}
