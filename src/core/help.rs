// src/core/help.rs

use crate::core::command::CommandDefinition;
use crate::core::context::{CommandContext, CommandError};
use crate::core::sender::{RichMessage, Sender};
use crate::core::tree_display;

/// Ayuda generada, enlazada con `CommandBuilder::default_help`.
///
/// Sin tema describe el comando invocado. Un tema que nombra uno de sus
/// subcomandos describe ese subcomando.
pub fn render_help(ctx: &CommandContext<'_>, topic: Option<&str>) -> Result<(), CommandError> {
    let node = ctx.command();
    let sender = ctx.sender();

    match topic.map(str::to_lowercase) {
        None => {
            send_help(sender, node, ctx.used_alias());
            Ok(())
        }
        Some(topic) => {
            let child = node
                .subcommands()
                .iter()
                .filter(|s| !s.is_overload() && s.has_permission(sender))
                .find(|s| s.is_alias(&topic))
                .ok_or_else(|| {
                    ctx.error(format!(
                        "No help topic '{}' for '{}'.",
                        topic,
                        ctx.used_alias()
                    ))
                })?;
            let label = format!("{} {}", ctx.used_alias(), child.main_alias());
            send_help(sender, child, &label);
            Ok(())
        }
    }
}

fn send_help(sender: &dyn Sender, node: &CommandDefinition, label: &str) {
    sender.send_message(&format!("--- Help: {} ---", label));
    if let Some(description) = node.description() {
        sender.send_message(description);
    }
    sender.send_message(&format!("Usage: {}", node.usage(label)));

    for slot in node.args() {
        let description = slot
            .get_description()
            .map(|d| format!(": {}", d))
            .unwrap_or_default();
        sender.send_formatted(format_args!(
            "  {} ({}){}",
            slot.usage(),
            slot.kind(),
            description
        ));
    }
    for flag in node.flags() {
        if let Some(description) = flag.get_description() {
            sender.send_formatted(format_args!("  -{}: {}", flag.name(), description));
        }
    }

    let tree = tree_display::command_tree(sender, node, label);
    if !tree.is_empty() {
        sender.send_message("Subcommands:");
        for line in tree {
            sender.send_rich(
                &RichMessage::new()
                    .text(line.text)
                    .hover(format!("Fill in: {}", line.command))
                    .click(line.command),
            );
        }
    }
}
