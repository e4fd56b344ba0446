// src/core/tree_display.rs

use crate::core::command::CommandDefinition;
use crate::core::sender::Sender;

/// Una línea del árbol de comandos y la línea de comando que representa.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeLine {
    pub text: String,
    pub command: String,
}

/// Construye el árbol de los subcomandos de `node` que el emisor puede usar.
pub fn command_tree(sender: &dyn Sender, node: &CommandDefinition, label: &str) -> Vec<TreeLine> {
    let mut lines = Vec::new();
    push_children(sender, node, label, "", &mut lines);
    lines
}

/// Paso recursivo: dibuja los hijos visibles de `node` y sus descendientes.
fn push_children(
    sender: &dyn Sender,
    node: &CommandDefinition,
    label: &str,
    prefix: &str,
    lines: &mut Vec<TreeLine>,
) {
    let visible: Vec<&CommandDefinition> = node
        .subcommands()
        .iter()
        .filter(|s| s.has_permission(sender))
        .collect();

    for (i, child) in visible.iter().enumerate() {
        let is_last = i == visible.len() - 1;
        let connector = if is_last { "└─ " } else { "├─ " };

        // Las sobrecargas se escriben con la etiqueta del padre.
        let child_label = if child.is_overload() {
            label.to_string()
        } else {
            format!("{} {}", label, child.main_alias())
        };
        let shown = child.usage(child.main_alias());
        let description = child
            .description()
            .map(|d| format!(" - {}", d))
            .unwrap_or_default();

        lines.push(TreeLine {
            text: format!("{}{}{}{}", prefix, connector, shown.trim_start(), description),
            command: child_label.clone(),
        });

        let child_prefix = format!("{}{}", prefix, if is_last { "   " } else { "│  " });
        push_children(sender, child, &child_label, &child_prefix, lines);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::command::{ArgSlot, CommandBuilder};
    use uuid::Uuid;

    struct Admin(bool);

    impl Sender for Admin {
        fn id(&self) -> Uuid {
            Uuid::nil()
        }
        fn name(&self) -> &str {
            "admin"
        }
        fn send_message(&self, _message: &str) {}
        fn has_permission(&self, _permission: &str) -> bool {
            self.0
        }
    }

    fn tree() -> CommandDefinition {
        CommandBuilder::new("econ")
            .subcommand(
                CommandBuilder::new("pay")
                    .permission("econ.pay")
                    .description("Send money")
                    .arg(ArgSlot::string("player"))
                    .arg(ArgSlot::int("amount")),
            )
            .subcommand(
                CommandBuilder::new("admin")
                    .subcommand(CommandBuilder::new("reset"))
                    .subcommand(CommandBuilder::overload().arg(ArgSlot::string("player"))),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn renders_nested_children_with_connectors() {
        let lines = command_tree(&Admin(true), &tree(), "econ");
        let texts: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(
            texts,
            vec![
                "├─ pay <player> <amount> - Send money",
                "└─ admin",
                "   ├─ reset",
                "   └─ <player>",
            ]
        );
        assert_eq!(lines[0].command, "econ pay");
        assert_eq!(lines[3].command, "econ admin");
    }

    #[test]
    fn hides_children_without_permission() {
        let lines = command_tree(&Admin(false), &tree(), "econ");
        assert_eq!(lines[0].text, "└─ admin");
    }
}
