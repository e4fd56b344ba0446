// src/system/io.rs

use crate::constants::ERROR_PREFIX;
use crate::core::command::AmbiguityError;
use crate::core::registry::{CommandRegistry, split_line};
use crate::core::sender::Sender;
use dialoguer::{Completion, Input, theme::ColorfulTheme};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReplError {
    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),
    #[error(transparent)]
    Ambiguity(#[from] AmbiguityError),
}

/// Completado con TAB del prompt, respaldado por el registro.
pub struct LineCompleter<'a> {
    registry: &'a CommandRegistry,
    sender: &'a dyn Sender,
}

impl<'a> LineCompleter<'a> {
    pub fn new(registry: &'a CommandRegistry, sender: &'a dyn Sender) -> Self {
        Self { registry, sender }
    }
}

impl Completion for LineCompleter<'_> {
    fn get(&self, input: &str) -> Option<String> {
        match self.registry.complete_line(self.sender, input) {
            Ok(suggestions) => apply_completion(input, &suggestions),
            Err(e) => {
                log::error!("{}", e);
                None
            }
        }
    }
}

/// Reemplaza la última palabra de `line`: con la única sugerencia más un
/// espacio, o con el prefijo más largo que comparten varias.
pub fn apply_completion(line: &str, suggestions: &[String]) -> Option<String> {
    let start = line
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_whitespace())
        .map_or(0, |(i, c)| i + c.len_utf8());
    let (head, partial) = line.split_at(start);

    match suggestions {
        [] => None,
        [only] => Some(format!("{}{} ", head, only)),
        many => {
            let common = common_prefix(many);
            (common.chars().count() > partial.chars().count())
                .then(|| format!("{}{}", head, common))
        }
    }
}

fn common_prefix(words: &[String]) -> &str {
    let Some(first) = words.first() else {
        return "";
    };
    let mut end = first.len();
    for word in &words[1..] {
        end = first
            .char_indices()
            .zip(word.chars())
            .take_while(|((_, a), b)| a == b)
            .last()
            .map_or(0, |((i, a), _)| i + a.len_utf8())
            .min(end);
    }
    &first[..end]
}

/// Prompt interactivo: lee líneas hasta `exit` o `quit`.
pub fn run_repl(registry: &CommandRegistry, sender: &dyn Sender) -> Result<(), ReplError> {
    let theme = ColorfulTheme::default();
    let completer = LineCompleter::new(registry, sender);
    println!("Type a command, TAB to complete, 'exit' to leave.");

    loop {
        let line = Input::<String>::with_theme(&theme)
            .with_prompt(sender.name())
            .allow_empty(true)
            .completion_with(&completer)
            .interact_text()?;

        let trimmed = line.trim();
        match trimmed {
            "" => continue,
            "exit" | "quit" => break,
            _ => {}
        }
        if !registry.dispatch_line(sender, trimmed)?
            && let Some((label, _)) = split_line(trimmed)
        {
            sender.send_message(&format!("{}Unknown command '{}'.", ERROR_PREFIX, label));
        }
    }
    Ok(())
}
