// src/cli/mod.rs
use crate::cli::args::{Cli, Commands};
use crate::cli::error::CliResult;
use crate::config::Settings;

pub mod args;
pub mod commands;
pub mod completion;
pub mod error;

pub fn execute_command(cli: Cli, settings: &Settings) -> CliResult<()> {
    if cli.generate_config {
        println!("{}", crate::config::generate_default_config());
        return Ok(());
    }
    let color = !cli.no_color;
    match cli.command {
        Some(Commands::Replay {
            script,
            is_json,
            quiet,
        }) => commands::replay(settings, &script, is_json, quiet, color),
        Some(Commands::Completion { shell }) => handle_completion(&shell),
        None => Ok(()),
    }
}

fn handle_completion(shell: &str) -> CliResult<()> {
    match shell.to_lowercase().as_str() {
        "bash" => eprintln!("# To use: eval \"$(tagedit completion bash)\""),
        "zsh" => eprintln!("# To use: tagedit completion zsh > ~/.zfunc/_tagedit"),
        "fish" => eprintln!(
            "# To use: tagedit completion fish > ~/.config/fish/completions/tagedit.fish"
        ),
        _ => {}
    }

    completion::generate_completion(shell, &mut std::io::stdout()).map_err(|e| {
        error::CliError::CommandFailed(format!("Failed to generate completion script: {}", e))
    })
}
