mod cli;
mod commands;

use std::process::ExitCode;
use std::sync::Arc;

use clap::{CommandFactory, Parser};
use cli::{Cli, Commands};

use dialogbridge::backend::DialogOptions;
use dialogbridge::dialog::Dialogs;
use dialogbridge::process::SystemRunner;
use dialogbridge::shared::config::load_config;
use dialogbridge::shared::env_var::EnvVars;
use dialogbridge::shared::logging::init_logging;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let env = EnvVars::load();
    init_logging(env.log_filter.as_deref(), cli.log_json);

    match run(cli, &env) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(2)
        }
    }
}

/// Exit code 1 means the user declined or cancelled.
fn run(cli: Cli, env: &EnvVars) -> anyhow::Result<ExitCode> {
    let Cli {
        backend,
        title,
        json,
        command,
        ..
    } = cli;

    let dialogs = || -> anyhow::Result<Dialogs> {
        let mut dialogs = Dialogs::detect(Arc::new(SystemRunner), env, load_config()?);
        if let Some(backend) = backend {
            dialogs.set_backend(backend);
        }
        Ok(dialogs)
    };

    match command {
        Commands::Dialog(dialog) => {
            let options = DialogOptions::new().set_opt("title", title);
            let Some(result) = dialog.run(&dialogs()?, &options)? else {
                return Ok(ExitCode::SUCCESS);
            };
            if let Some(output) = commands::render_result(&result, json)? {
                println!("{output}");
            }
            Ok(if result.is_negative() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            })
        }
        Commands::Backend => {
            let backend = dialogs()?.backend();
            if json {
                println!("{}", serde_json::to_string(&backend)?);
            } else {
                println!("{backend}");
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Config(config_cmd) => {
            config_cmd.run()?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Completions { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "dialogbridge",
                &mut std::io::stdout(),
            );
            Ok(ExitCode::SUCCESS)
        }
    }
}
