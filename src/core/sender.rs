// src/core/sender.rs

use std::fmt;
use uuid::Uuid;

/// Fragmento de un mensaje estructurado. Los emisores que no pueden mostrar
/// hover ni click solo muestran `text`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RichPart {
    pub text: String,
    pub hover: Option<String>,
    /// Línea de comando sugerida al emisor al hacer click en el fragmento.
    pub click: Option<String>,
}

/// Mensaje estructurado hecho de fragmentos ordenados.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RichMessage {
    pub parts: Vec<RichPart>,
}

impl RichMessage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Añade un fragmento simple.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.parts.push(RichPart {
            text: text.into(),
            ..Default::default()
        });
        self
    }

    /// Asigna un texto de hover al último fragmento.
    pub fn hover(mut self, hover: impl Into<String>) -> Self {
        if let Some(part) = self.parts.last_mut() {
            part.hover = Some(hover.into());
        }
        self
    }

    /// Asigna un comando sugerido al último fragmento.
    pub fn click(mut self, command: impl Into<String>) -> Self {
        if let Some(part) = self.parts.last_mut() {
            part.click = Some(command.into());
        }
        self
    }

    /// Versión en texto plano, para emisores sin salida enriquecida.
    pub fn to_plain(&self) -> String {
        self.parts.iter().map(|p| p.text.as_str()).collect()
    }
}

/// Quien emite un comando. El motor solo consume este contrato.
pub trait Sender {
    /// Identidad estable, usable como clave por los almacenes de sesión.
    fn id(&self) -> Uuid;

    fn name(&self) -> &str;

    fn send_message(&self, message: &str);

    /// Envía un mensaje construido con `format_args!`.
    fn send_formatted(&self, args: fmt::Arguments<'_>) {
        self.send_message(&args.to_string());
    }

    /// Envía un mensaje estructurado. Por defecto, su texto plano.
    fn send_rich(&self, message: &RichMessage) {
        self.send_message(&message.to_plain());
    }

    fn has_permission(&self, permission: &str) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct Plain {
        id: Uuid,
        out: RefCell<Vec<String>>,
    }

    impl Sender for Plain {
        fn id(&self) -> Uuid {
            self.id
        }
        fn name(&self) -> &str {
            "plain"
        }
        fn send_message(&self, message: &str) {
            self.out.borrow_mut().push(message.to_string());
        }
        fn has_permission(&self, _permission: &str) -> bool {
            false
        }
    }

    #[test]
    fn rich_and_formatted_fall_back_to_plain_text() {
        let sender = Plain {
            id: Uuid::new_v4(),
            out: RefCell::new(Vec::new()),
        };
        let rich = RichMessage::new()
            .text("Click ")
            .text("here")
            .hover("runs /econ balance")
            .click("/econ balance");
        sender.send_rich(&rich);
        sender.send_formatted(format_args!("{} has {} coins", "Bob", 10));

        assert_eq!(
            *sender.out.borrow(),
            vec!["Click here".to_string(), "Bob has 10 coins".to_string()]
        );
        assert_eq!(rich.parts[1].click.as_deref(), Some("/econ balance"));
        assert_eq!(rich.parts[0].hover, None);
    }
}
