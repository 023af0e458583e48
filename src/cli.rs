use clap::{Parser, Subcommand};
use clap_complete::Shell;

use dialogbridge::backend::Backend;

use crate::commands::config::ConfigCommands;
use crate::commands::dialog::DialogCommand;

#[derive(Parser)]
#[command(
    name = "dialogbridge",
    version,
    about,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Dialog backend to use instead of detecting one (kdialog, zenity or none)
    #[arg(long, global = true)]
    pub backend: Option<Backend>,

    /// Window title
    #[arg(long, global = true)]
    pub title: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Write logs to stderr as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Clone, PartialEq, Eq)]
pub enum Commands {
    #[command(flatten)]
    Dialog(DialogCommand),

    /// Print the dialog backend that would be used
    Backend,

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}
