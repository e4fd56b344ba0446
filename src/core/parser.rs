// src/core/parser.rs

use crate::constants::{END_OF_FLAGS, FLAG_MARKER, FLAG_VALUE_SEPARATOR, HELP_FLAG};
use crate::core::command::{ArgKind, CommandDefinition};
use crate::core::context::ArgValue;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Missing argument '{slot}'.")]
    MissingArgument { slot: String },
    #[error("Too many arguments: expected at most {expected}, but got '{extra}'.")]
    TooManyArguments { expected: usize, extra: String },
    #[error("Argument '{slot}' must be an integer, got '{input}'.")]
    InvalidInteger { slot: String, input: String },
    #[error("Argument '{slot}' must be a number, got '{input}'.")]
    InvalidFloat { slot: String, input: String },
    #[error("Argument '{slot}' must be true or false, got '{input}'.")]
    InvalidBoolean { slot: String, input: String },
    #[error("Argument '{slot}' must be one of {choices}, got '{input}'.")]
    InvalidChoice {
        slot: String,
        input: String,
        choices: String,
    },
    #[error("Unknown flag '-{flag}'.")]
    UnknownFlag { flag: String },
    #[error("Flag '-{flag}' requires a value (-{flag}=<value>).")]
    MissingFlagValue { flag: String },
}

/// Valores posicionales y flags de una invocación.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedArgs {
    /// En el orden de los slots.
    pub values: Vec<(String, ArgValue)>,
    /// Por nombre canónico del flag. Los switches no llevan valor.
    pub flags: HashMap<String, Option<ArgValue>>,
}

/// Un token de flag separado en nombre y valor.
struct RawFlag<'a> {
    name: String,
    value: Option<&'a str>,
}

/// `-name`, `--name`, `-name=value`. Un `-` suelto y los números negativos
/// son posicionales.
fn split_flag(token: &str) -> Option<RawFlag<'_>> {
    let body = token.strip_prefix(FLAG_MARKER)?;
    let body = body.strip_prefix(FLAG_MARKER).unwrap_or(body);
    let first = body.chars().next()?;
    if first.is_ascii_digit() || first == '.' {
        return None;
    }
    let (name, value) = match body.split_once(FLAG_VALUE_SEPARATOR) {
        Some((name, value)) => (name, Some(value)),
        None => (body, None),
    };
    if name.is_empty() {
        return None;
    }
    Some(RawFlag {
        name: name.to_lowercase(),
        value,
    })
}

/// Parsea los tokens que quedan para `command` tras recorrer el árbol.
pub fn parse(command: &CommandDefinition, tokens: &[String]) -> Result<ParsedArgs, ParseError> {
    let (flags, positional) = extract_flags(command, tokens)?;
    let values = bind_positionals(command, &positional)?;
    Ok(ParsedArgs { values, flags })
}

/// Extrae los flags estén donde estén y devuelve el resto de tokens, en orden.
pub fn extract_flags<'t>(
    command: &CommandDefinition,
    tokens: &'t [String],
) -> Result<(HashMap<String, Option<ArgValue>>, Vec<&'t str>), ParseError> {
    let mut flags = HashMap::new();
    let mut positional: Vec<&str> = Vec::with_capacity(tokens.len());
    let mut flags_ended = false;
    for token in tokens {
        if !flags_ended && token == END_OF_FLAGS {
            flags_ended = true;
            continue;
        }
        match (flags_ended, split_flag(token)) {
            (false, Some(raw)) => {
                let (name, value) = bind_flag(command, raw)?;
                flags.insert(name, value);
            }
            _ => positional.push(token),
        }
    }
    Ok((flags, positional))
}

/// Asigna los posicionales a los slots de izquierda a derecha.
pub fn bind_positionals(
    command: &CommandDefinition,
    positional: &[&str],
) -> Result<Vec<(String, ArgValue)>, ParseError> {
    let slots = command.args();
    if let Some(max) = command.max_args()
        && positional.len() > max
    {
        return Err(ParseError::TooManyArguments {
            expected: max,
            extra: positional[max].to_string(),
        });
    }

    let mut values = Vec::with_capacity(slots.len());
    for (i, slot) in slots.iter().enumerate() {
        let raw = if slot.is_variadic() && i < positional.len() {
            Some(positional[i..].join(" "))
        } else {
            positional.get(i).map(|t| t.to_string())
        };
        let value = match (raw, slot.default()) {
            (Some(raw), _) => convert(slot.name(), slot.kind(), &raw)?,
            (None, Some(default)) => convert(slot.name(), slot.kind(), default)?,
            (None, None) => {
                return Err(ParseError::MissingArgument {
                    slot: slot.name().to_string(),
                });
            }
        };
        values.push((slot.name().to_string(), value));
    }
    Ok(values)
}

/// Cuántos de `tokens` van a slots (no son flags), respetando `--`.
pub fn positional_count(tokens: &[String]) -> usize {
    let mut flags_ended = false;
    tokens
        .iter()
        .filter(|token| {
            if !flags_ended && token.as_str() == END_OF_FLAGS {
                flags_ended = true;
                return false;
            }
            flags_ended || split_flag(token).is_none()
        })
        .count()
}

fn bind_flag(
    command: &CommandDefinition,
    raw: RawFlag<'_>,
) -> Result<(String, Option<ArgValue>), ParseError> {
    let spec = command
        .find_flag(&raw.name)
        .ok_or_else(|| ParseError::UnknownFlag {
            flag: raw.name.clone(),
        })?;
    let name = spec.name().to_string();
    let value = match (spec.kind(), raw.value) {
        (Some(kind), Some(value)) => Some(convert(&format!("-{}", name), kind, value)?),
        // El tema de la ayuda es opcional.
        (Some(_), None) if name == HELP_FLAG => None,
        (Some(_), None) => return Err(ParseError::MissingFlagValue { flag: name }),
        (None, Some(value)) => Some(ArgValue::Str(value.to_string())),
        (None, None) => None,
    };
    Ok((name, value))
}

/// Convierte un token según `kind`. `slot` lo nombra en los errores.
pub fn convert(slot: &str, kind: &ArgKind, raw: &str) -> Result<ArgValue, ParseError> {
    match kind {
        ArgKind::String => Ok(ArgValue::Str(raw.to_string())),
        ArgKind::Integer => raw
            .parse::<i64>()
            .map(ArgValue::Int)
            .map_err(|_| ParseError::InvalidInteger {
                slot: slot.to_string(),
                input: raw.to_string(),
            }),
        ArgKind::Float => match raw.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(ArgValue::Float(value)),
            _ => Err(ParseError::InvalidFloat {
                slot: slot.to_string(),
                input: raw.to_string(),
            }),
        },
        ArgKind::Boolean => match raw.to_lowercase().as_str() {
            "true" | "yes" | "on" => Ok(ArgValue::Bool(true)),
            "false" | "no" | "off" => Ok(ArgValue::Bool(false)),
            _ => Err(ParseError::InvalidBoolean {
                slot: slot.to_string(),
                input: raw.to_string(),
            }),
        },
        ArgKind::Choice(options) => options
            .iter()
            .find(|o| o.eq_ignore_ascii_case(raw))
            .map(|o| ArgValue::Str(o.clone()))
            .ok_or_else(|| ParseError::InvalidChoice {
                slot: slot.to_string(),
                input: raw.to_string(),
                choices: options.join("|"),
            }),
    }
}
