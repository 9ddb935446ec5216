use std::io::{self, Write};
use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;

use vault_tags::sync;

#[derive(Parser, Debug)]
#[command(name = "vault-tags")]
#[command(author, version, about = "Keep vault tags in sync with folder structure")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Tag every note with its full folder path (e.g. Projects/2024)
    Nest {
        /// Vault root to process
        #[arg(default_value = ".")]
        path: PathBuf,
    },
    /// Tag every note with its first two folder levels, rebuilding
    /// frontmatter from scratch (other frontmatter keys are discarded)
    Prefix {
        /// Vault root to process
        #[arg(default_value = ".")]
        path: PathBuf,
    },
    /// Remove tags that duplicate folder names (irreversible)
    Strip {
        /// Vault root to process
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Generate shell completions
    Completion {
        /// Shell to generate completions for
        shell: Shell,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Command::Nest { path } => {
            sync::run_nest(&path);
        }
        Command::Prefix { path } => {
            sync::run_prefix(&path);
        }
        Command::Strip { path, yes } => {
            if yes || confirm_strip() {
                sync::run_strip(&path);
            } else {
                println!("Operation cancelled.");
            }
        }
        Command::Completion { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, name, &mut io::stdout());
        }
    }
}

/// Ask before the one destructive operation. Only an explicit "yes"
/// (case-insensitive) proceeds.
fn confirm_strip() -> bool {
    println!(
        "{}",
        "This will remove tags that match folder names from your Markdown files.".yellow()
    );
    println!("{}", "This action cannot be undone.".yellow().bold());
    print!("Do you want to continue? (yes/no): ");
    io::stdout().flush().ok();

    let mut input = String::new();
    if io::stdin().read_line(&mut input).is_err() {
        return false;
    }
    input.trim().eq_ignore_ascii_case("yes")
}
