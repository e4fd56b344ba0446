// src/core/context.rs

use crate::constants::ERROR_PREFIX;
use crate::core::command::CommandDefinition;
use crate::core::parser::{self, ParseError};
use crate::core::sender::{RichMessage, Sender};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Valor tipado de un argumento posicional o flag.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl ArgValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ArgValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            ArgValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Los enteros se amplían a float.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            ArgValue::Float(f) => Some(*f),
            ArgValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ArgValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgValue::Str(s) => f.write_str(s),
            ArgValue::Int(i) => write!(f, "{}", i),
            ArgValue::Float(x) => write!(f, "{}", x),
            ArgValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// Fallos al ejecutar un comando. Todos terminan en un único
/// mensaje de error al emisor.
#[derive(Error, Debug)]
pub enum CommandError {
    /// Lo lanzan los handlers con `error` / `validate`.
    #[error("{0}")]
    User(String),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("Argument '{name}' is not available as {expected}.")]
    MissingValue { name: String, expected: &'static str },
    #[error("An internal error occurred while running this command.")]
    Other(#[from] anyhow::Error),
    #[error("An internal error occurred while running this command.")]
    Panicked,
}

/// Una invocación de un comando resuelto: lo escrito, quién lo escribió y
/// los valores parseados. Vive solo durante un despacho.
pub struct CommandContext<'a> {
    command: &'a CommandDefinition,
    used_alias: String,
    sender: &'a dyn Sender,
    raw_args: Vec<String>,
    values: Vec<(String, ArgValue)>,
    flags: HashMap<String, Option<ArgValue>>,
}

impl<'a> CommandContext<'a> {
    pub fn new(command: &'a CommandDefinition, used_alias: String, sender: &'a dyn Sender) -> Self {
        Self {
            command,
            used_alias,
            sender,
            raw_args: Vec::new(),
            values: Vec::new(),
            flags: HashMap::new(),
        }
    }

    /// Parsea los tokens restantes contra los slots y flags del comando.
    /// Los flags se conservan aunque fallen los posicionales, así `-h` llega
    /// a la ayuda; valores y argumentos crudos solo se guardan si todo va bien.
    pub fn parse_all(&mut self, tokens: &[String]) -> Result<(), ParseError> {
        let (flags, positional) = parser::extract_flags(self.command, tokens)?;
        self.flags = flags;
        self.values = parser::bind_positionals(self.command, &positional)?;
        self.raw_args = tokens.to_vec();
        Ok(())
    }

    pub fn command(&self) -> &'a CommandDefinition {
        self.command
    }

    /// La etiqueta tal como se escribió, con los alias de subcomandos (`econ pay`).
    pub fn used_alias(&self) -> &str {
        &self.used_alias
    }

    pub fn sender(&self) -> &'a dyn Sender {
        self.sender
    }

    pub fn raw_args(&self) -> &[String] {
        &self.raw_args
    }

    /// Valores posicionales, en el orden de los slots.
    pub fn values(&self) -> impl Iterator<Item = (&str, &ArgValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn msg(&self, message: &str) {
        self.sender.send_message(message);
    }

    pub fn msg_fmt(&self, args: fmt::Arguments<'_>) {
        self.sender.send_formatted(args);
    }

    pub fn msg_rich(&self, message: &RichMessage) {
        self.sender.send_rich(message);
    }

    /// Construye el error que un handler devuelve para parar con un mensaje.
    pub fn error(&self, message: impl Into<String>) -> CommandError {
        CommandError::User(message.into())
    }

    pub fn validate(&self, condition: bool, message: impl Into<String>) -> Result<(), CommandError> {
        if condition {
            Ok(())
        } else {
            Err(self.error(message))
        }
    }

    /// Envía al emisor la versión visible de `err`.
    pub fn handle_error(&self, err: &CommandError) {
        self.sender
            .send_message(&format!("{}{}", ERROR_PREFIX, err));
    }

    pub fn has_flag(&self, name: &str) -> bool {
        self.flags.contains_key(&name.to_lowercase())
    }

    /// Valor dado con un flag; `None` si falta o es un switch sin valor.
    pub fn flag(&self, name: &str) -> Option<&ArgValue> {
        self.flags.get(&name.to_lowercase()).and_then(Option::as_ref)
    }

    pub fn flag_str(&self, name: &str) -> Option<&str> {
        self.flag(name).and_then(ArgValue::as_str)
    }

    pub fn arg(&self, name: &str) -> Option<&ArgValue> {
        self.values
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
    }

    pub fn string(&self, name: &str) -> Result<&str, CommandError> {
        self.arg(name)
            .and_then(ArgValue::as_str)
            .ok_or_else(|| missing(name, "a string"))
    }

    pub fn int(&self, name: &str) -> Result<i64, CommandError> {
        self.arg(name)
            .and_then(ArgValue::as_int)
            .ok_or_else(|| missing(name, "an integer"))
    }

    pub fn float(&self, name: &str) -> Result<f64, CommandError> {
        self.arg(name)
            .and_then(ArgValue::as_float)
            .ok_or_else(|| missing(name, "a number"))
    }

    pub fn boolean(&self, name: &str) -> Result<bool, CommandError> {
        self.arg(name)
            .and_then(ArgValue::as_bool)
            .ok_or_else(|| missing(name, "a boolean"))
    }
}

fn missing(name: &str, expected: &'static str) -> CommandError {
    CommandError::MissingValue {
        name: name.to_string(),
        expected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::command::{ArgSlot, CommandBuilder, FlagSpec};
    use std::cell::RefCell;
    use uuid::Uuid;

    #[derive(Default)]
    struct Recorder {
        out: RefCell<Vec<String>>,
    }

    impl Sender for Recorder {
        fn id(&self) -> Uuid {
            Uuid::nil()
        }
        fn name(&self) -> &str {
            "recorder"
        }
        fn send_message(&self, message: &str) {
            self.out.borrow_mut().push(message.to_string());
        }
        fn has_permission(&self, _permission: &str) -> bool {
            true
        }
    }

    #[test]
    fn typed_getters_read_parsed_values() {
        let cmd = CommandBuilder::new("pay")
            .arg(ArgSlot::string("player"))
            .arg(ArgSlot::int("amount"))
            .flag(FlagSpec::switch("Silent"))
            .build()
            .unwrap();
        let sender = Recorder::default();
        let mut ctx = CommandContext::new(&cmd, "econ pay".into(), &sender);
        let tokens: Vec<String> = ["Bob", "10", "-silent"].iter().map(|s| s.to_string()).collect();
        ctx.parse_all(&tokens).unwrap();

        assert_eq!(ctx.string("player").unwrap(), "Bob");
        assert_eq!(ctx.int("amount").unwrap(), 10);
        assert_eq!(ctx.float("amount").unwrap(), 10.0);
        assert!(ctx.has_flag("SILENT"));
        assert_eq!(ctx.flag("silent"), None);
        assert!(matches!(
            ctx.int("player"),
            Err(CommandError::MissingValue { .. })
        ));
        assert_eq!(ctx.raw_args().len(), 3);
        assert_eq!(ctx.used_alias(), "econ pay");
    }

    #[test]
    fn failed_parse_leaves_context_empty() {
        let cmd = CommandBuilder::new("pay")
            .arg(ArgSlot::int("amount"))
            .build()
            .unwrap();
        let sender = Recorder::default();
        let mut ctx = CommandContext::new(&cmd, "pay".into(), &sender);
        assert!(ctx.parse_all(&["x".to_string()]).is_err());
        assert_eq!(ctx.values().count(), 0);
        assert!(ctx.raw_args().is_empty());
    }

    #[test]
    fn help_flag_is_kept_when_slots_are_missing() {
        let cmd = CommandBuilder::new("pay")
            .arg(ArgSlot::string("player"))
            .default_help()
            .build()
            .unwrap();
        let sender = Recorder::default();
        let mut ctx = CommandContext::new(&cmd, "pay".into(), &sender);
        assert!(ctx.parse_all(&["-h".to_string()]).is_err());
        assert!(ctx.has_flag("h"));
        assert_eq!(ctx.values().count(), 0);
    }

    #[test]
    fn errors_carry_the_engine_prefix() {
        let cmd = CommandBuilder::new("c").build().unwrap();
        let sender = Recorder::default();
        let ctx = CommandContext::new(&cmd, "c".into(), &sender);
        let amount = -5;
        let err = ctx.validate(amount > 0, "Amount must be positive").unwrap_err();
        ctx.handle_error(&err);
        ctx.handle_error(&CommandError::Other(anyhow::anyhow!("db down")));
        assert_eq!(
            *sender.out.borrow(),
            vec![
                format!("{}Amount must be positive", ERROR_PREFIX),
                format!("{}An internal error occurred while running this command.", ERROR_PREFIX),
            ]
        );
    }
}
