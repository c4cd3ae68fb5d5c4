// src/cli/args.rs
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
/// Drive editable tag sets from recorded interaction scripts
pub struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Turn debugging information on
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub debug: u8,

    /// Disable colored output
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Print the default configuration as TOML and exit
    #[arg(long = "generate-config")]
    pub generate_config: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay a JSON script of tag interactions and print the resulting tag sets
    Replay {
        /// JSON array of events (set_tags, add, edit, save, blur, delete, editable)
        script: PathBuf,

        #[arg(long = "json", help = "print resulting tag sets as json")]
        is_json: bool,

        #[arg(short = 'q', long = "quiet", help = "do not print rendered lists")]
        quiet: bool,
    },
    /// Generate shell completion script
    Completion {
        /// Shell to generate completion for (bash, zsh, fish)
        shell: String,
    },
}
