// src/models.rs

use serde::{Deserialize, Serialize};

// --- MODELOS DE `commands.toml` (lo que se lee del archivo del árbol) ---

/// Respuesta de un comando declarado. `untagged` permite una línea o una lista.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum Reply {
    Lines(Vec<String>),
    Single(String),
}

impl Reply {
    pub fn lines(&self) -> Vec<&str> {
        match self {
            Reply::Lines(lines) => lines.iter().map(String::as_str).collect(),
            Reply::Single(line) => vec![line.as_str()],
        }
    }
}

/// Tipo del valor de un argumento o flag.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum KindDecl {
    #[default]
    String,
    #[serde(alias = "int")]
    Integer,
    #[serde(alias = "number")]
    Float,
    #[serde(alias = "bool")]
    Boolean,
    Choice,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ArgDecl {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: KindDecl,
    /// Literales permitidos de un argumento `choice`.
    #[serde(default)]
    pub choices: Vec<String>,
    pub default: Option<String>,
    #[serde(default)]
    pub variadic: bool,
    /// Literales de completado; reemplazan los que se derivan del tipo.
    #[serde(default)]
    pub suggest: Vec<String>,
    pub description: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct FlagDecl {
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Ausente en los switches simples.
    #[serde(rename = "type")]
    pub kind: Option<KindDecl>,
    #[serde(default)]
    pub choices: Vec<String>,
    pub description: Option<String>,
}

/// Tabla de un comando (o subcomando).
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandDecl {
    #[serde(default)]
    pub aliases: Vec<String>,
    pub description: Option<String>,
    pub permission: Option<String>,
    #[serde(default)]
    pub overload: bool,
    /// Enlaza la ayuda generada (la heredan los subcomandos).
    #[serde(default)]
    pub help: bool,
    pub reply: Option<Reply>,
    #[serde(default)]
    pub args: Vec<ArgDecl>,
    #[serde(default)]
    pub flags: Vec<FlagDecl>,
    #[serde(default)]
    pub subcommands: Vec<CommandDecl>,
}

/// Estructura deserializada de un archivo `commands.toml`.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeConfig {
    #[serde(default, rename = "command")]
    pub commands: Vec<CommandDecl>,
}
