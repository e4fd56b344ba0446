// src/bin/cmdtree.rs

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::sync::Arc;

use cmdtree::cli::Cli;
use cmdtree::config;
use cmdtree::core::declarative;
use cmdtree::core::registry::CommandRegistry;
use cmdtree::core::sender::Sender;
use cmdtree::core::tree_display;
use cmdtree::system::bank::Bank;
use cmdtree::system::console::ConsoleSender;
use cmdtree::system::io;

/// Los pagos de al menos esta cantidad esperan `econ confirm`.
const CONFIRM_OVER: i64 = 500;

/// El punto de entrada principal de la aplicación.
fn main() {
    // Inicializar el logger. Para ver los logs, ejecuta con `RUST_LOG=debug cmdtree ...`
    env_logger::init();

    let cli = Cli::parse();

    if let Err(e) = run_cli(cli) {
        eprintln!("\nError: {:?}", e);
        std::process::exit(1);
    }
}

fn run_cli(cli: Cli) -> Result<()> {
    log::debug!("CLI args parsed: {:?}", cli);

    if cli.init {
        let dir = config::get_config_dir()?;
        let path = config::write_default_tree(&dir)?;
        println!("Command tree written to {}", path.display());
        return Ok(());
    }

    // 1. Construir el registro con el árbol declarado más el `econ` incorporado.
    let tree = config::load_tree(cli.tree.as_deref()).context("Could not load the command tree")?;
    let mut registry = CommandRegistry::new();
    for root in declarative::build_tree(&tree)? {
        root.validate()
            .with_context(|| format!("Command '{}' is ambiguous", root.main_alias()))?;
        registry.register(root);
    }

    let bank = Arc::new(Bank::new([("bob", 100), ("alice", 250)], CONFIRM_OVER));
    bank.open_account(&cli.name, 1000);
    registry.register(bank.command()?);

    // 2. El emisor de la consola.
    let sender = ConsoleSender::new(cli.name, cli.permissions);

    if cli.list {
        for root in registry.roots() {
            println!("{}", root.usage(root.main_alias()));
            for line in tree_display::command_tree(&sender, root, root.main_alias()) {
                println!("{}", line.text);
            }
        }
        return Ok(());
    }

    // 3. Despacho único, completado o prompt interactivo.
    match cli.label {
        None => {
            io::run_repl(&registry, &sender)?;
            bank.disconnect(sender.id());
        }
        Some(label) if cli.complete => {
            let suggestions = if cli.args.is_empty() {
                registry.complete_line(&sender, &label)?
            } else {
                registry.on_tab_complete(&sender, &label, &cli.args)?
            };
            for suggestion in suggestions {
                println!("{}", suggestion);
            }
        }
        Some(label) => {
            if !registry.on_command(&sender, &label, &cli.args)? {
                bail!("Unknown command '{}'.", label);
            }
        }
    }

    Ok(())
}
