// src/cli.rs

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "cmdtree: resolves and dispatches tree-structured commands.", long_about = None)]
pub struct Cli {
    /// Command tree file (TOML). Defaults to the user config dir, then the bundled tree.
    #[arg(long, value_name = "FILE")]
    pub tree: Option<PathBuf>,

    /// Name of the console issuer.
    #[arg(long = "as", value_name = "NAME", default_value = "console")]
    pub name: String,

    /// Permission granted to the console issuer. Repeatable; accepts `*` and `prefix.*`.
    #[arg(long = "perm", short = 'p', value_name = "PERMISSION")]
    pub permissions: Vec<String>,

    /// Print the completions of the given input instead of running it.
    #[arg(long)]
    pub complete: bool,

    /// Print every registered command tree and exit.
    #[arg(long)]
    pub list: bool,

    /// Write the bundled command tree to the config directory and exit.
    #[arg(long)]
    pub init: bool,

    /// Command label. Without one an interactive prompt starts.
    pub label: Option<String>,

    /// Arguments for the command.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}
