// src/core/interpolator.rs

use crate::core::context::CommandContext;

/// Rellena las plantillas de respuesta de los comandos declarados.
///
/// Tokens: `{sender}`, `{label}`, `{args}` (argumentos crudos), `{<slot>}` y
/// `{flag:<name>}`. Los tokens desconocidos se dejan tal cual.
pub struct Interpolator<'c, 'a> {
    ctx: &'c CommandContext<'a>,
}

impl<'c, 'a> Interpolator<'c, 'a> {
    pub fn new(ctx: &'c CommandContext<'a>) -> Self {
        Self { ctx }
    }

    /// Sustituye cada token conocido una sola vez, de izquierda a derecha.
    /// El texto insertado nunca se vuelve a examinar.
    pub fn interpolate(&self, input: &str) -> String {
        let mut result = String::with_capacity(input.len());
        let mut rest = input;
        while let Some(open) = rest.find('{') {
            result.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let value = after
                .find('}')
                .map(|close| &after[..close])
                .filter(|token| !token.contains('{'))
                .and_then(|token| self.lookup(token).map(|v| (v, token.len())));
            match value {
                Some((value, len)) => {
                    result.push_str(&value);
                    rest = &after[len + 1..];
                }
                None => {
                    result.push('{');
                    rest = after;
                }
            }
        }
        result.push_str(rest);
        result
    }

    fn lookup(&self, token: &str) -> Option<String> {
        match token {
            "sender" => Some(self.ctx.sender().name().to_string()),
            "label" => Some(self.ctx.used_alias().to_string()),
            "args" => Some(self.ctx.raw_args().join(" ")),
            _ => match token.strip_prefix("flag:") {
                Some(name) => self.flag_value(name),
                None => self.ctx.arg(token).map(ToString::to_string),
            },
        }
    }

    /// Valor del flag, `true` si es un switch presente y vacío si no está.
    /// Los flags no declarados se dejan sin tocar.
    fn flag_value(&self, name: &str) -> Option<String> {
        let spec = self.ctx.command().find_flag(&name.to_lowercase())?;
        let value = match (self.ctx.has_flag(spec.name()), self.ctx.flag(spec.name())) {
            (_, Some(value)) => value.to_string(),
            (true, None) => "true".to_string(),
            (false, None) => String::new(),
        };
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::command::{ArgSlot, CommandBuilder, FlagSpec};
    use crate::core::sender::Sender;
    use uuid::Uuid;

    struct Steve;

    impl Sender for Steve {
        fn id(&self) -> Uuid {
            Uuid::nil()
        }
        fn name(&self) -> &str {
            "Steve"
        }
        fn send_message(&self, _message: &str) {}
        fn has_permission(&self, _permission: &str) -> bool {
            true
        }
    }

    #[test]
    fn fills_reserved_slot_and_flag_tokens() {
        let cmd = CommandBuilder::new("greet")
            .arg(ArgSlot::string("who"))
            .arg(ArgSlot::int("times").default_value("1"))
            .flag(FlagSpec::switch("loud"))
            .flag(FlagSpec::valued("style", crate::core::command::ArgKind::String))
            .build()
            .unwrap();
        let mut ctx = CommandContext::new(&cmd, "greet".into(), &Steve);
        ctx.parse_all(&["Alex".to_string(), "-loud".to_string()]).unwrap();

        let out = Interpolator::new(&ctx)
            .interpolate("{sender} greets {who} x{times} via {label} [{flag:loud}|{flag:style}] {unknown}");
        assert_eq!(out, "Steve greets Alex x1 via greet [true|] {unknown}");
    }

    #[test]
    fn typed_braces_are_not_expanded_again() {
        let cmd = CommandBuilder::new("echo")
            .arg(ArgSlot::string("a"))
            .arg(ArgSlot::string("b"))
            .build()
            .unwrap();
        let mut ctx = CommandContext::new(&cmd, "echo".into(), &Steve);
        ctx.parse_all(&["{b}".to_string(), "{sender}".to_string()]).unwrap();

        let interpolator = Interpolator::new(&ctx);
        assert_eq!(interpolator.interpolate("{a} / {b}"), "{b} / {sender}");
        assert_eq!(interpolator.interpolate("{args}"), "{b} {sender}");
        assert_eq!(interpolator.interpolate("{{a}} {b"), "{{b}} {b");
    }
}
