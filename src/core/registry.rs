// src/core/registry.rs

use crate::core::command::{AmbiguityError, CommandDefinition};
use crate::core::executor::Executor;
use crate::core::sender::Sender;
use std::sync::Arc;

/// Comandos raíz conocidos por un host, buscados por etiqueta o alias.
#[derive(Debug, Default, Clone)]
pub struct CommandRegistry {
    executors: Vec<Arc<Executor>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registra un comando raíz. Una raíz con alias ya ocupados se registra
    /// igual, pero los registros anteriores tienen prioridad.
    pub fn register(&mut self, root: CommandDefinition) -> Arc<Executor> {
        for alias in root.aliases() {
            if self.find(alias).is_some() {
                log::warn!("Root label '{}' is already registered; keeping the first one.", alias);
            }
        }
        log::info!("Registering root command '{}'", root.main_alias());
        let executor = Arc::new(Executor::new(root));
        self.executors.push(Arc::clone(&executor));
        executor
    }

    pub fn find(&self, label: &str) -> Option<&Arc<Executor>> {
        let label = label.to_lowercase();
        self.executors.iter().find(|e| e.root().is_alias(&label))
    }

    pub fn roots(&self) -> impl Iterator<Item = &CommandDefinition> {
        self.executors.iter().map(|e| e.root())
    }

    /// `Ok(false)` si ninguna raíz responde a `label`.
    pub fn on_command(
        &self,
        sender: &dyn Sender,
        label: &str,
        tokens: &[String],
    ) -> Result<bool, AmbiguityError> {
        match self.find(label) {
            Some(executor) => executor.on_command(sender, label, tokens),
            None => {
                log::debug!("No root command for label '{}'", label);
                Ok(false)
            }
        }
    }

    pub fn on_tab_complete(
        &self,
        sender: &dyn Sender,
        label: &str,
        tokens: &[String],
    ) -> Result<Vec<String>, AmbiguityError> {
        match self.find(label) {
            Some(executor) => executor.on_tab_complete(sender, label, tokens),
            None => Ok(Vec::new()),
        }
    }

    /// Ejecuta una línea completa como `econ pay Bob 10`.
    pub fn dispatch_line(&self, sender: &dyn Sender, line: &str) -> Result<bool, AmbiguityError> {
        match split_line(line) {
            Some((label, tokens)) => self.on_command(sender, &label, &tokens),
            None => Ok(false),
        }
    }

    /// Completa una línea a medio escribir. Mientras se escribe la etiqueta
    /// se sugieren las raíces permitidas.
    pub fn complete_line(
        &self,
        sender: &dyn Sender,
        line: &str,
    ) -> Result<Vec<String>, AmbiguityError> {
        let Some((label, tokens)) = split_line(line) else {
            return Ok(self.root_labels(sender, ""));
        };
        if tokens.is_empty() {
            return Ok(self.root_labels(sender, &label));
        }
        self.on_tab_complete(sender, &label, &tokens)
    }

    fn root_labels(&self, sender: &dyn Sender, prefix: &str) -> Vec<String> {
        let prefix = prefix.to_lowercase();
        self.roots()
            .filter(|r| r.has_permission(sender))
            .filter_map(|r| r.best_alias(&prefix))
            .map(str::to_string)
            .collect()
    }
}

/// Divide una línea en etiqueta y tokens. Un espacio final añade un token
/// vacío, que es como un host pide el completado del siguiente argumento.
pub fn split_line(line: &str) -> Option<(String, Vec<String>)> {
    let line = line.trim_start();
    let mut parts = line.split_whitespace().map(str::to_string);
    let label = parts.next()?;
    let mut tokens: Vec<String> = parts.collect();
    if line.ends_with(char::is_whitespace) {
        tokens.push(String::new());
    }
    Some((label, tokens))
}
