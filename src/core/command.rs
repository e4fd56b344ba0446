// src/core/command.rs

use crate::constants::HELP_FLAG;
use crate::core::completion::{BoolCompleter, Choices, Completer, NoCompletion, Suggestion};
use crate::core::context::{CommandContext, CommandError};
use crate::core::help;
use crate::core::parser::{self, ParseError};
use crate::core::sender::Sender;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Lógica de ejecución enlazada a un nodo.
pub type Handler = Arc<dyn Fn(&CommandContext<'_>) -> Result<(), CommandError> + Send + Sync>;

/// Lógica de ayuda de un nodo. Recibe el valor dado con `-h`, si lo hay.
pub type HelpHandler =
    Arc<dyn Fn(&CommandContext<'_>, Option<&str>) -> Result<(), CommandError> + Send + Sync>;

#[derive(Error, Debug)]
pub enum RegistrationError {
    #[error("Alias '{alias}' is not valid: aliases cannot be empty or contain whitespace.")]
    InvalidAlias { alias: String },
    #[error("Overload subcommands are selected by argument count and cannot have aliases (found '{alias}').")]
    OverloadWithAlias { alias: String },
    #[error("Command '{command}': argument '{slot}' is declared twice.")]
    DuplicateSlot { command: String, slot: String },
    #[error("Command '{command}': flag '{flag}' is declared twice.")]
    DuplicateFlag { command: String, flag: String },
    #[error("Command '{command}': the '-h' flag is reserved for help.")]
    ReservedFlag { command: String },
    #[error("Command '{command}': required argument '{slot}' follows an optional one.")]
    OptionalBeforeRequired { command: String, slot: String },
    #[error("Command '{command}': only the last argument can be variadic ('{slot}' is not last).")]
    VariadicNotLast { command: String, slot: String },
    #[error("Command '{command}': default value of '{slot}' is invalid: {source}")]
    InvalidDefault {
        command: String,
        slot: String,
        #[source]
        source: ParseError,
    },
}

/// Dos sobrecargas hermanas aceptan el mismo número de argumentos. Es un error
/// del registro, no del emisor.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invoke overload ambiguity under '{parent}': {arg_count} arguments fit {matches} overloads.")]
pub struct AmbiguityError {
    pub parent: String,
    pub arg_count: usize,
    pub matches: usize,
}

/// Tipo semántico de un slot o del valor de un flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgKind {
    String,
    Integer,
    Float,
    Boolean,
    /// Un literal de un conjunto fijo, sin distinguir mayúsculas.
    Choice(Vec<String>),
}

impl ArgKind {
    fn default_completer(&self) -> Arc<dyn Completer> {
        match self {
            ArgKind::Choice(options) => Arc::new(Choices::new(options.iter().cloned())),
            ArgKind::Boolean => Arc::new(BoolCompleter),
            _ => Arc::new(NoCompletion),
        }
    }
}

impl fmt::Display for ArgKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgKind::String => f.write_str("string"),
            ArgKind::Integer => f.write_str("integer"),
            ArgKind::Float => f.write_str("number"),
            ArgKind::Boolean => f.write_str("true/false"),
            ArgKind::Choice(options) => write!(f, "one of {}", options.join("|")),
        }
    }
}

/// Un argumento posicional declarado.
#[derive(Clone)]
pub struct ArgSlot {
    name: String,
    kind: ArgKind,
    description: Option<String>,
    default: Option<String>,
    variadic: bool,
    completer: Arc<dyn Completer>,
}

impl ArgSlot {
    pub fn new(name: impl Into<String>, kind: ArgKind) -> Self {
        let completer = kind.default_completer();
        Self {
            name: name.into(),
            kind,
            description: None,
            default: None,
            variadic: false,
            completer,
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, ArgKind::String)
    }

    pub fn int(name: impl Into<String>) -> Self {
        Self::new(name, ArgKind::Integer)
    }

    pub fn float(name: impl Into<String>) -> Self {
        Self::new(name, ArgKind::Float)
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, ArgKind::Boolean)
    }

    pub fn choice<I, S>(name: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            name,
            ArgKind::Choice(options.into_iter().map(Into::into).collect()),
        )
    }

    /// Hace opcional el slot; el valor por defecto se convierte como la entrada.
    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// El slot toma todos los tokens restantes, unidos por un espacio.
    pub fn variadic(mut self) -> Self {
        self.variadic = true;
        self
    }

    pub fn completer(mut self, completer: impl Completer + 'static) -> Self {
        self.completer = Arc::new(completer);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &ArgKind {
        &self.kind
    }

    pub fn default(&self) -> Option<&str> {
        self.default.as_deref()
    }

    pub fn is_optional(&self) -> bool {
        self.default.is_some()
    }

    pub fn is_variadic(&self) -> bool {
        self.variadic
    }

    pub fn get_description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn suggest(&self, sender: &dyn Sender, partial: &str) -> Vec<Suggestion> {
        self.completer.suggest(sender, partial)
    }

    /// `<name>`, `[name]` o `<name...>`.
    pub fn usage(&self) -> String {
        let dots = if self.variadic { "..." } else { "" };
        if self.is_optional() {
            format!("[{}{}]", self.name, dots)
        } else {
            format!("<{}{}>", self.name, dots)
        }
    }
}

impl fmt::Debug for ArgSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArgSlot")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("default", &self.default)
            .field("variadic", &self.variadic)
            .finish_non_exhaustive()
    }
}

/// Un flag declarado. Sin tipo de valor es un switch simple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagSpec {
    name: String,
    aliases: Vec<String>,
    kind: Option<ArgKind>,
    description: Option<String>,
}

impl FlagSpec {
    pub fn switch(name: impl Into<String>) -> Self {
        Self {
            name: name.into().to_lowercase(),
            aliases: Vec::new(),
            kind: None,
            description: None,
        }
    }

    pub fn valued(name: impl Into<String>, kind: ArgKind) -> Self {
        Self {
            kind: Some(kind),
            ..Self::switch(name)
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into().to_lowercase());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> Option<&ArgKind> {
        self.kind.as_ref()
    }

    pub fn get_description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn matches(&self, name: &str) -> bool {
        self.name == name || self.aliases.iter().any(|a| a == name)
    }

    fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }

    pub fn usage(&self) -> String {
        match &self.kind {
            Some(_) => format!("[-{}=<value>]", self.name),
            None => format!("[-{}]", self.name),
        }
    }
}

/// Un nodo del árbol de comandos. Inmutable una vez construido.
pub struct CommandDefinition {
    aliases: Vec<String>,
    description: Option<String>,
    permission: Option<String>,
    args: Vec<ArgSlot>,
    flags: Vec<FlagSpec>,
    subcommands: Vec<CommandDefinition>,
    overload: bool,
    handler: Option<Handler>,
    help: Option<HelpHandler>,
}

impl CommandDefinition {
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Alias canónico, vacío en las sobrecargas.
    pub fn main_alias(&self) -> &str {
        self.aliases.first().map(String::as_str).unwrap_or("")
    }

    /// `name` debe venir en minúsculas.
    pub fn is_alias(&self, name: &str) -> bool {
        self.aliases.iter().any(|a| a == name)
    }

    /// Primer alias (el canónico primero) que empieza por `prefix` en minúsculas.
    pub fn best_alias(&self, prefix: &str) -> Option<&str> {
        self.aliases
            .iter()
            .find(|a| a.starts_with(prefix))
            .map(String::as_str)
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn permission(&self) -> Option<&str> {
        self.permission.as_deref()
    }

    pub fn has_permission(&self, sender: &dyn Sender) -> bool {
        self.permission
            .as_deref()
            .is_none_or(|p| sender.has_permission(p))
    }

    pub fn args(&self) -> &[ArgSlot] {
        &self.args
    }

    pub fn flags(&self) -> &[FlagSpec] {
        &self.flags
    }

    /// Flag declarado por nombre o alias. `h` solo existe si hay ayuda enlazada.
    pub fn find_flag(&self, name: &str) -> Option<&FlagSpec> {
        self.flags.iter().find(|f| f.matches(name))
    }

    pub fn subcommands(&self) -> &[CommandDefinition] {
        &self.subcommands
    }

    pub fn is_overload(&self) -> bool {
        self.overload
    }

    pub fn handler(&self) -> Option<&Handler> {
        self.handler.as_ref()
    }

    pub fn help(&self) -> Option<&HelpHandler> {
        self.help.as_ref()
    }

    pub fn required_args(&self) -> usize {
        self.args.iter().filter(|a| !a.is_optional()).count()
    }

    /// `None` si el último slot es variádico.
    pub fn max_args(&self) -> Option<usize> {
        match self.args.last() {
            Some(last) if last.is_variadic() => None,
            _ => Some(self.args.len()),
        }
    }

    pub fn fits_arg_count(&self, count: usize) -> bool {
        count >= self.required_args() && self.max_args().is_none_or(|max| count <= max)
    }

    /// Uso en una línea para la etiqueta dada, p. ej. `econ pay <player> <amount> [-silent]`.
    pub fn usage(&self, label: &str) -> String {
        let mut parts = vec![label.to_string()];
        parts.extend(self.args.iter().map(ArgSlot::usage));
        parts.extend(self.flags.iter().map(FlagSpec::usage));
        parts.join(" ")
    }

    /// Busca en todo el árbol sobrecargas hermanas cuyas aridades se solapan.
    /// La resolución detecta el mismo fallo al despachar; esto lo encuentra antes.
    pub fn validate(&self) -> Result<(), AmbiguityError> {
        let overloads: Vec<&CommandDefinition> =
            self.subcommands.iter().filter(|s| s.overload).collect();
        for (i, a) in overloads.iter().enumerate() {
            for b in &overloads[i + 1..] {
                let low = a.required_args().max(b.required_args());
                let overlaps = match (a.max_args(), b.max_args()) {
                    (Some(x), Some(y)) => low <= x.min(y),
                    (Some(x), None) | (None, Some(x)) => low <= x,
                    (None, None) => true,
                };
                if overlaps {
                    return Err(AmbiguityError {
                        parent: self.main_alias().to_string(),
                        arg_count: low,
                        matches: 2,
                    });
                }
            }
        }
        self.subcommands.iter().try_for_each(CommandDefinition::validate)
    }
}

impl fmt::Debug for CommandDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDefinition")
            .field("aliases", &self.aliases)
            .field("permission", &self.permission)
            .field("args", &self.args)
            .field("flags", &self.flags)
            .field("overload", &self.overload)
            .field("subcommands", &self.subcommands)
            .finish_non_exhaustive()
    }
}

/// Registro fluido de un comando y sus subcomandos.
pub struct CommandBuilder {
    aliases: Vec<String>,
    description: Option<String>,
    permission: Option<String>,
    args: Vec<ArgSlot>,
    flags: Vec<FlagSpec>,
    subcommands: Vec<CommandBuilder>,
    overload: bool,
    handler: Option<Handler>,
    help: Option<HelpHandler>,
}

impl CommandBuilder {
    /// Un comando direccionado por `alias`.
    pub fn new(alias: impl Into<String>) -> Self {
        let mut builder = Self::empty(false);
        builder.aliases.push(alias.into());
        builder
    }

    /// Un subcomando elegido solo por el número de argumentos restantes.
    pub fn overload() -> Self {
        Self::empty(true)
    }

    fn empty(overload: bool) -> Self {
        Self {
            aliases: Vec::new(),
            description: None,
            permission: None,
            args: Vec::new(),
            flags: Vec::new(),
            subcommands: Vec::new(),
            overload,
            handler: None,
            help: None,
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn permission(mut self, permission: impl Into<String>) -> Self {
        self.permission = Some(permission.into());
        self
    }

    pub fn arg(mut self, slot: ArgSlot) -> Self {
        self.args.push(slot);
        self
    }

    pub fn flag(mut self, flag: FlagSpec) -> Self {
        self.flags.push(flag);
        self
    }

    pub fn subcommand(mut self, subcommand: CommandBuilder) -> Self {
        self.subcommands.push(subcommand);
        self
    }

    pub fn handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&CommandContext<'_>) -> Result<(), CommandError> + Send + Sync + 'static,
    {
        self.handler = Some(Arc::new(handler));
        self
    }

    pub fn help<F>(mut self, help: F) -> Self
    where
        F: Fn(&CommandContext<'_>, Option<&str>) -> Result<(), CommandError>
            + Send
            + Sync
            + 'static,
    {
        self.help = Some(Arc::new(help));
        self
    }

    /// Enlaza la ayuda generada (uso, descripción y árbol de subcomandos).
    pub fn default_help(self) -> Self {
        self.help(help::render_help)
    }

    pub fn build(self) -> Result<CommandDefinition, RegistrationError> {
        let aliases = self.checked_aliases()?;
        let label = aliases.first().cloned().unwrap_or_else(|| "<overload>".to_string());

        check_slots(&label, &self.args)?;

        let mut flags = self.flags;
        let mut seen = HashSet::new();
        for flag in &flags {
            for name in flag.names() {
                if name == HELP_FLAG {
                    return Err(RegistrationError::ReservedFlag { command: label });
                }
                if !seen.insert(name.to_string()) {
                    return Err(RegistrationError::DuplicateFlag {
                        command: label,
                        flag: name.to_string(),
                    });
                }
            }
        }
        if self.help.is_some() {
            flags.push(
                FlagSpec::valued(HELP_FLAG, ArgKind::String)
                    .description("Show help, optionally for a subcommand"),
            );
        }

        // Los subcomandos sin ayuda propia heredan la del padre.
        let inherited = self.help.clone();
        let subcommands = self
            .subcommands
            .into_iter()
            .map(|mut sub| {
                if sub.help.is_none() {
                    sub.help = inherited.clone();
                }
                sub.build()
            })
            .collect::<Result<Vec<_>, _>>()?;
        warn_alias_collisions(&label, &subcommands);

        log::debug!(
            "Registered command '{}' ({} args, {} subcommands)",
            label,
            self.args.len(),
            subcommands.len()
        );

        Ok(CommandDefinition {
            aliases,
            description: self.description,
            permission: self.permission,
            args: self.args,
            flags,
            subcommands,
            overload: self.overload,
            handler: self.handler,
            help: self.help,
        })
    }

    fn checked_aliases(&self) -> Result<Vec<String>, RegistrationError> {
        if self.overload {
            if let Some(alias) = self.aliases.first() {
                return Err(RegistrationError::OverloadWithAlias {
                    alias: alias.clone(),
                });
            }
            return Ok(Vec::new());
        }
        let mut aliases: Vec<String> = Vec::with_capacity(self.aliases.len());
        for alias in &self.aliases {
            if alias.is_empty() || alias.chars().any(char::is_whitespace) {
                return Err(RegistrationError::InvalidAlias {
                    alias: alias.clone(),
                });
            }
            let lower = alias.to_lowercase();
            if !aliases.contains(&lower) {
                aliases.push(lower);
            }
        }
        Ok(aliases)
    }
}

fn check_slots(label: &str, slots: &[ArgSlot]) -> Result<(), RegistrationError> {
    let mut seen = HashSet::new();
    let mut optional_seen = false;
    for (i, slot) in slots.iter().enumerate() {
        if !seen.insert(slot.name()) {
            return Err(RegistrationError::DuplicateSlot {
                command: label.to_string(),
                slot: slot.name().to_string(),
            });
        }
        if slot.is_variadic() && i + 1 != slots.len() {
            return Err(RegistrationError::VariadicNotLast {
                command: label.to_string(),
                slot: slot.name().to_string(),
            });
        }
        match slot.default() {
            Some(default) => {
                optional_seen = true;
                parser::convert(slot.name(), slot.kind(), default).map_err(|source| {
                    RegistrationError::InvalidDefault {
                        command: label.to_string(),
                        slot: slot.name().to_string(),
                        source,
                    }
                })?;
            }
            None if optional_seen => {
                return Err(RegistrationError::OptionalBeforeRequired {
                    command: label.to_string(),
                    slot: slot.name().to_string(),
                });
            }
            None => {}
        }
    }
    Ok(())
}

/// Los alias repetidos entre hermanos se toleran (la resolución desempata)
/// pero casi siempre son un error.
fn warn_alias_collisions(label: &str, subcommands: &[CommandDefinition]) {
    let mut seen = HashSet::new();
    for alias in subcommands.iter().flat_map(|s| s.aliases.iter()) {
        if !seen.insert(alias.as_str()) {
            log::warn!(
                "Command '{}' has more than one subcommand with alias '{}'",
                label,
                alias
            );
        }
    }
}
