// src/core/completion.rs

use crate::core::sender::Sender;
use std::fmt;

/// Un candidato de completado.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub literal: String,
}

impl Suggestion {
    pub fn new(literal: impl Into<String>) -> Self {
        Self {
            literal: literal.into(),
        }
    }
}

/// Estrategia de completado de un slot.
///
/// Las implementaciones no deben tener efectos secundarios y deben aceptar
/// cualquier token parcial, incluso vacío. El filtrado por prefijo lo hace el
/// ejecutor, así que una estrategia puede devolver todos sus candidatos.
pub trait Completer: Send + Sync {
    fn suggest(&self, sender: &dyn Sender, partial: &str) -> Vec<Suggestion>;
}

/// Slot sin sugerencias.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCompletion;

impl Completer for NoCompletion {
    fn suggest(&self, _sender: &dyn Sender, _partial: &str) -> Vec<Suggestion> {
        Vec::new()
    }
}

/// Lista fija de literales, en el orden declarado.
#[derive(Debug, Clone, Default)]
pub struct Choices {
    options: Vec<String>,
}

impl Choices {
    pub fn new<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            options: options.into_iter().map(Into::into).collect(),
        }
    }
}

impl Completer for Choices {
    fn suggest(&self, _sender: &dyn Sender, _partial: &str) -> Vec<Suggestion> {
        self.options.iter().map(Suggestion::new).collect()
    }
}

/// `true` / `false`.
#[derive(Debug, Default, Clone, Copy)]
pub struct BoolCompleter;

impl Completer for BoolCompleter {
    fn suggest(&self, _sender: &dyn Sender, _partial: &str) -> Vec<Suggestion> {
        vec![Suggestion::new("true"), Suggestion::new("false")]
    }
}

/// Consulta en vivo a algún colaborador (jugadores conectados, cuentas...).
pub struct FnCompleter<F>(pub F);

impl<F> Completer for FnCompleter<F>
where
    F: Fn(&dyn Sender, &str) -> Vec<String> + Send + Sync,
{
    fn suggest(&self, sender: &dyn Sender, partial: &str) -> Vec<Suggestion> {
        (self.0)(sender, partial)
            .into_iter()
            .map(Suggestion::new)
            .collect()
    }
}

impl<F> fmt::Debug for FnCompleter<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnCompleter")
    }
}

/// Conserva los candidatos que empiezan por el token parcial, sin distinguir
/// mayúsculas y en su orden.
pub fn filter_by_prefix<I>(candidates: I, partial: &str) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let prefix = partial.to_lowercase();
    candidates
        .into_iter()
        .filter(|c| c.to_lowercase().starts_with(&prefix))
        .collect()
}
