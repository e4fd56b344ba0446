// src/core/executor.rs

use crate::constants::{ERROR_PREFIX, FLAG_MARKER, HELP_FLAG, NO_PERMISSION_MESSAGE};
use crate::core::command::CommandDefinition;
use crate::core::completion::filter_by_prefix;
use crate::core::context::{CommandContext, CommandError};
use crate::core::parser;
use crate::core::sender::Sender;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

pub use crate::core::command::AmbiguityError;

/// Resultado de un paso del recorrido del árbol.
#[derive(Debug, Clone, Copy)]
pub enum SubcommandMatch<'a> {
    /// Elegido por número de argumentos; no consume token.
    Overload(&'a CommandDefinition),
    /// Elegido por el primer token, que se consume.
    Literal(&'a CommandDefinition),
    None,
}

/// Destino del recorrido del árbol para una entrada.
#[derive(Debug)]
pub struct Resolution<'a> {
    pub command: &'a CommandDefinition,
    /// Etiqueta más cada alias de subcomando consumido por el camino.
    pub label: String,
    pub args: &'a [String],
}

/// Lo que terminó haciendo un despacho. Todas las variantes salvo `Executed`
/// y `Help` ya enviaron exactamente un mensaje de error al emisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Executed,
    Help,
    PermissionDenied,
    ParseFailed,
    HandlerFailed,
    NoHandler,
}

/// Resuelve y ejecuta la entrada contra un comando raíz.
#[derive(Debug)]
pub struct Executor {
    root: CommandDefinition,
}

impl Executor {
    pub fn new(root: CommandDefinition) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &CommandDefinition {
        &self.root
    }

    /// Punto de entrada del host. Siempre informa el comando como atendido: los
    /// subcomandos desconocidos caen en el nodo más profundo que coincide.
    pub fn on_command(
        &self,
        sender: &dyn Sender,
        label: &str,
        tokens: &[String],
    ) -> Result<bool, AmbiguityError> {
        self.dispatch(sender, label, tokens)?;
        Ok(true)
    }

    /// Punto de entrada del host para el completado con TAB.
    pub fn on_tab_complete(
        &self,
        sender: &dyn Sender,
        label: &str,
        tokens: &[String],
    ) -> Result<Vec<String>, AmbiguityError> {
        self.complete(sender, label, tokens)
    }

    /// Recorre el árbol desde la raíz y devuelve el nodo que atiende `tokens`.
    pub fn resolve<'a>(
        &'a self,
        label: &str,
        tokens: &'a [String],
    ) -> Result<Resolution<'a>, AmbiguityError> {
        let mut command = &self.root;
        let mut label = label.to_string();
        let mut args = tokens;

        loop {
            let found = wants_subcommand(command, args)?;
            log::debug!("Catching alias '{}'. Subcommand found: {:?}", label, found_name(&found));
            if !args.is_empty() {
                log::debug!("These are its arguments: {}", args.join(", "));
            }
            match found {
                SubcommandMatch::Overload(sub) => command = sub,
                SubcommandMatch::Literal(sub) => {
                    label = format!("{} {}", label, args[0].to_lowercase());
                    args = &args[1..];
                    command = sub;
                }
                SubcommandMatch::None => {
                    return Ok(Resolution {
                        command,
                        label,
                        args,
                    });
                }
            }
        }
    }

    /// Resuelve, comprueba el permiso, parsea y ejecuta el handler o la ayuda.
    pub fn dispatch(
        &self,
        sender: &dyn Sender,
        label: &str,
        tokens: &[String],
    ) -> Result<DispatchOutcome, AmbiguityError> {
        let resolution = self.resolve(label, tokens).inspect_err(|e| {
            log::error!("{}", e);
        })?;
        Ok(run_command(sender, resolution))
    }

    /// Sugerencias para el último token (parcial). Nunca ejecuta un handler.
    pub fn complete(
        &self,
        sender: &dyn Sender,
        _label: &str,
        tokens: &[String],
    ) -> Result<Vec<String>, AmbiguityError> {
        completions(sender, &self.root, tokens).inspect_err(|e| {
            log::error!("{}", e);
        })
    }
}

fn found_name(found: &SubcommandMatch<'_>) -> Option<String> {
    match found {
        SubcommandMatch::Overload(sub) => Some(sub.usage("<overload>")),
        SubcommandMatch::Literal(sub) => Some(sub.main_alias().to_string()),
        SubcommandMatch::None => None,
    }
}

/// Elige el subcomando de `command` al que apunta `args`, si lo hay.
pub fn wants_subcommand<'a>(
    command: &'a CommandDefinition,
    args: &[String],
) -> Result<SubcommandMatch<'a>, AmbiguityError> {
    // 1. Gana una sobrecarga cuya aridad encaje, sin consumir token.
    let overloads: Vec<&CommandDefinition> = command
        .subcommands()
        .iter()
        .filter(|s| s.is_overload() && s.fits_arg_count(args.len()))
        .collect();
    match overloads.as_slice() {
        [] => {}
        [only] => return Ok(SubcommandMatch::Overload(*only)),
        many => {
            return Err(AmbiguityError {
                parent: command.main_alias().to_string(),
                arg_count: args.len(),
                matches: many.len(),
            });
        }
    }

    // 2. Si no, buscar un alias literal.
    let Some(first) = args.first() else {
        return Ok(SubcommandMatch::None);
    };
    let sub_arg = first.to_lowercase();
    let matches: Vec<&CommandDefinition> = command
        .subcommands()
        .iter()
        .filter(|s| !s.main_alias().is_empty())
        .filter(|s| s.is_alias(&sub_arg))
        .collect();

    match matches.as_slice() {
        [] => Ok(SubcommandMatch::None),
        [only] => Ok(SubcommandMatch::Literal(*only)),
        many => {
            // Alias repetidos: preferir el que acepta lo que queda. Si ninguno
            // lo acepta, quedarse en el nodo actual.
            let remaining = args.len() - 1;
            Ok(many
                .iter()
                .find(|m| m.fits_arg_count(remaining))
                .copied()
                .map_or(SubcommandMatch::None, SubcommandMatch::Literal))
        }
    }
}

fn run_command(sender: &dyn Sender, resolution: Resolution<'_>) -> DispatchOutcome {
    let Resolution {
        command,
        label,
        args,
    } = resolution;

    if !command.has_permission(sender) {
        sender.send_message(&format!("{}{}", ERROR_PREFIX, NO_PERMISSION_MESSAGE));
        return DispatchOutcome::PermissionDenied;
    }

    let mut ctx = CommandContext::new(command, label, sender);
    let parsed = ctx.parse_all(args);

    // `-h` no depende de que los posicionales estén completos.
    if let Some(help) = command.help()
        && ctx.has_flag(HELP_FLAG)
    {
        let topic = ctx.flag_str(HELP_FLAG).map(str::to_owned);
        return guarded(&ctx, || help(&ctx, topic.as_deref()), DispatchOutcome::Help);
    }

    if let Err(e) = parsed {
        log::debug!("Parse fault in '{}': {}", ctx.used_alias(), e);
        ctx.handle_error(&CommandError::from(e));
        return DispatchOutcome::ParseFailed;
    }

    match (command.handler(), command.help()) {
        (Some(handler), _) => guarded(&ctx, || handler(&ctx), DispatchOutcome::Executed),
        (None, Some(help)) => guarded(&ctx, || help(&ctx, None), DispatchOutcome::Help),
        (None, None) => {
            sender.send_message(&format!(
                "{}Usage: {}",
                ERROR_PREFIX,
                command.usage(ctx.used_alias())
            ));
            DispatchOutcome::NoHandler
        }
    }
}

/// Ejecuta código de handler sin dejar escapar sus errores ni sus panics.
fn guarded<F>(ctx: &CommandContext<'_>, run: F, success: DispatchOutcome) -> DispatchOutcome
where
    F: FnOnce() -> Result<(), CommandError>,
{
    match panic::catch_unwind(AssertUnwindSafe(run)) {
        Ok(Ok(())) => success,
        Ok(Err(e)) => {
            if let CommandError::Other(inner) = &e {
                log::warn!("Command '{}' failed: {:#}", ctx.used_alias(), inner);
            }
            ctx.handle_error(&e);
            DispatchOutcome::HandlerFailed
        }
        Err(payload) => {
            log::error!(
                "Command '{}' panicked: {}",
                ctx.used_alias(),
                panic_message(payload.as_ref())
            );
            ctx.handle_error(&CommandError::Panicked);
            DispatchOutcome::HandlerFailed
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("<non-string panic>")
}

/// Versión de solo lectura del recorrido. Solo entra en los subcomandos que
/// el emisor puede usar.
fn completions(
    sender: &dyn Sender,
    command: &CommandDefinition,
    args: &[String],
) -> Result<Vec<String>, AmbiguityError> {
    match wants_subcommand(command, args)? {
        SubcommandMatch::Overload(sub) if sub.has_permission(sender) => {
            completions(sender, sub, args)
        }
        SubcommandMatch::Literal(sub) if sub.has_permission(sender) => {
            completions(sender, sub, &args[1..])
        }
        _ => Ok(terminal_completions(sender, command, args)),
    }
}

fn terminal_completions(
    sender: &dyn Sender,
    command: &CommandDefinition,
    args: &[String],
) -> Vec<String> {
    let Some(partial) = args.last() else {
        return Vec::new();
    };
    // Los flags no ocupan slots.
    let index = parser::positional_count(&args[..args.len() - 1]);
    let last = partial.to_lowercase();

    let mut options: Vec<String> = Vec::new();
    if args.len() == 1 {
        options.extend(
            command
                .subcommands()
                .iter()
                .filter(|s| s.has_permission(sender))
                .filter_map(|s| s.best_alias(&last))
                .map(str::to_string),
        );
    }

    let slot = command
        .args()
        .get(index)
        .or_else(|| command.args().last().filter(|s| s.is_variadic()));
    if let Some(slot) = slot {
        match panic::catch_unwind(AssertUnwindSafe(|| slot.suggest(sender, partial))) {
            Ok(suggestions) => options.extend(suggestions.into_iter().map(|s| s.literal)),
            Err(payload) => log::warn!(
                "Completer of '{}' panicked: {}",
                slot.name(),
                panic_message(payload.as_ref())
            ),
        }
    }

    if partial.starts_with(FLAG_MARKER) {
        options.extend(command.flags().iter().map(|f| format!("-{}", f.name())));
    }

    let mut seen = std::collections::HashSet::new();
    filter_by_prefix(options, &last)
        .into_iter()
        .filter(|o| seen.insert(o.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::command::{ArgSlot, CommandBuilder, FlagSpec};
    use crate::core::completion::{Choices, FnCompleter};
    use std::cell::RefCell;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use uuid::Uuid;

    struct TestSender {
        allowed: bool,
        out: RefCell<Vec<String>>,
    }

    impl TestSender {
        fn new(allowed: bool) -> Self {
            Self {
                allowed,
                out: RefCell::new(Vec::new()),
            }
        }
    }

    impl Sender for TestSender {
        fn id(&self) -> Uuid {
            Uuid::nil()
        }
        fn name(&self) -> &str {
            "tester"
        }
        fn send_message(&self, message: &str) {
            self.out.borrow_mut().push(message.to_string());
        }
        fn has_permission(&self, _permission: &str) -> bool {
            self.allowed
        }
    }

    fn tokens(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    fn tp_tree() -> Executor {
        let root = CommandBuilder::new("tp")
            .arg(ArgSlot::string("a"))
            .arg(ArgSlot::string("b"))
            .arg(ArgSlot::string("c"))
            .subcommand(CommandBuilder::new("here").arg(ArgSlot::string("player")))
            .subcommand(CommandBuilder::overload().arg(ArgSlot::string("target")))
            .subcommand(
                CommandBuilder::overload()
                    .arg(ArgSlot::string("who"))
                    .arg(ArgSlot::string("target")),
            )
            .build()
            .unwrap();
        Executor::new(root)
    }

    #[test]
    fn overload_is_chosen_by_arity_regardless_of_literal() {
        let exec = tp_tree();
        // Un token, aunque sea igual a un alias literal, va a la sobrecarga de 1 argumento.
        let input = tokens(&["here"]);
        let res = exec.resolve("tp", &input).unwrap();
        assert!(res.command.is_overload());
        assert_eq!(res.command.args()[0].name(), "target");
        assert_eq!(res.args, &input[..]);
        assert_eq!(res.label, "tp");

        let input = tokens(&["Alex", "Steve"]);
        let res = exec.resolve("tp", &input).unwrap();
        assert_eq!(res.command.args()[0].name(), "who");
    }

    #[test]
    fn literal_match_consumes_token_and_is_case_insensitive() {
        let exec = tp_tree();
        let upper = tokens(&["HERE", "Alex", "x"]);
        let lower = tokens(&["here", "Alex", "x"]);
        let a = exec.resolve("tp", &upper).unwrap();
        let b = exec.resolve("tp", &lower).unwrap();
        assert_eq!(a.command.main_alias(), "here");
        assert!(std::ptr::eq(a.command, b.command));
        assert_eq!(a.label, "tp here");
        assert_eq!(a.args, &tokens(&["Alex", "x"])[..]);
    }

    #[test]
    fn unmatched_input_resolves_at_current_node() {
        let exec = tp_tree();
        let input = tokens(&["a", "b", "c"]);
        let res = exec.resolve("tp", &input).unwrap();
        assert_eq!(res.command.main_alias(), "tp");
        assert_eq!(res.args.len(), 3);
    }

    #[test]
    fn overlapping_overloads_are_an_ambiguity_fault() {
        let root = CommandBuilder::new("x")
            .subcommand(CommandBuilder::overload().arg(ArgSlot::string("a")))
            .subcommand(CommandBuilder::overload().arg(ArgSlot::int("b")))
            .build()
            .unwrap();
        let exec = Executor::new(root);
        let sender = TestSender::new(true);
        let err = exec.dispatch(&sender, "x", &tokens(&["1"])).unwrap_err();
        assert_eq!(err.arg_count, 1);
        assert_eq!(err.matches, 2);
        assert!(exec.complete(&sender, "x", &tokens(&["1"])).is_err());
        // Las demás aridades no cambian.
        assert!(exec.dispatch(&sender, "x", &[]).is_ok());
    }

    #[test]
    fn colliding_literals_prefer_the_one_that_fits() {
        let root = CommandBuilder::new("give")
            .subcommand(CommandBuilder::new("item").arg(ArgSlot::string("name")))
            .subcommand(
                CommandBuilder::new("item")
                    .arg(ArgSlot::string("name"))
                    .arg(ArgSlot::int("count")),
            )
            .build()
            .unwrap();
        let exec = Executor::new(root);
        let two = tokens(&["item", "stone", "3"]);
        assert_eq!(exec.resolve("give", &two).unwrap().command.args().len(), 2);
        let one = tokens(&["item", "stone"]);
        assert_eq!(exec.resolve("give", &one).unwrap().command.args().len(), 1);
        // Ninguno encaja: se vuelve al padre.
        let none = tokens(&["item"]);
        assert_eq!(exec.resolve("give", &none).unwrap().command.main_alias(), "give");
    }

    #[test]
    fn handler_errors_and_panics_become_messages() {
        let root = CommandBuilder::new("boom")
            .subcommand(CommandBuilder::new("err").handler(|ctx| Err(ctx.error("nope"))))
            .subcommand(CommandBuilder::new("panic").handler(|_| panic!("kaboom")))
            .build()
            .unwrap();
        let exec = Executor::new(root);
        let sender = TestSender::new(true);

        let outcome = exec.dispatch(&sender, "boom", &tokens(&["err"])).unwrap();
        assert_eq!(outcome, DispatchOutcome::HandlerFailed);
        let outcome = exec.dispatch(&sender, "boom", &tokens(&["panic"])).unwrap();
        assert_eq!(outcome, DispatchOutcome::HandlerFailed);

        let out = sender.out.borrow();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0], format!("{}nope", ERROR_PREFIX));
        assert!(out[1].starts_with(ERROR_PREFIX));
    }

    #[test]
    fn help_flag_runs_help_with_its_topic() {
        let topics = Arc::new(std::sync::Mutex::new(Vec::new()));
        let seen = Arc::clone(&topics);
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let root = CommandBuilder::new("econ")
            .help(move |_, topic| {
                seen.lock().unwrap().push(topic.map(str::to_string));
                Ok(())
            })
            .handler(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .build()
            .unwrap();
        let exec = Executor::new(root);
        let sender = TestSender::new(true);

        assert_eq!(
            exec.dispatch(&sender, "econ", &tokens(&["-h=pay"])).unwrap(),
            DispatchOutcome::Help
        );
        assert_eq!(
            exec.dispatch(&sender, "econ", &tokens(&["-h"])).unwrap(),
            DispatchOutcome::Help
        );
        assert_eq!(
            exec.dispatch(&sender, "econ", &[]).unwrap(),
            DispatchOutcome::Executed
        );
        assert_eq!(
            *topics.lock().unwrap(),
            vec![Some("pay".to_string()), None]
        );
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn node_without_handler_falls_back_to_help_or_usage() {
        let bare = Executor::new(
            CommandBuilder::new("bare")
                .arg(ArgSlot::string("x").default_value("y"))
                .build()
                .unwrap(),
        );
        let sender = TestSender::new(true);
        assert_eq!(
            bare.dispatch(&sender, "bare", &[]).unwrap(),
            DispatchOutcome::NoHandler
        );
        assert_eq!(
            sender.out.borrow()[0],
            format!("{}Usage: bare [x]", ERROR_PREFIX)
        );

        let helped = Executor::new(
            CommandBuilder::new("econ")
                .description("Money")
                .default_help()
                .subcommand(CommandBuilder::new("pay").arg(ArgSlot::string("player")))
                .build()
                .unwrap(),
        );
        let sender = TestSender::new(true);
        assert_eq!(
            helped.dispatch(&sender, "econ", &[]).unwrap(),
            DispatchOutcome::Help
        );
        let out = sender.out.borrow();
        assert_eq!(out[0], "--- Help: econ ---");
        assert_eq!(out[1], "Money");
        assert!(out.iter().any(|l| l == "└─ pay <player> [-h=<value>]"));
    }

    #[test]
    fn help_topic_names_a_subcommand() {
        let exec = Executor::new(
            CommandBuilder::new("econ")
                .default_help()
                .subcommand(
                    CommandBuilder::new("pay")
                        .description("Send money")
                        .arg(ArgSlot::string("player")),
                )
                .build()
                .unwrap(),
        );
        let sender = TestSender::new(true);
        exec.dispatch(&sender, "econ", &tokens(&["-h=PAY"])).unwrap();
        assert_eq!(sender.out.borrow()[0], "--- Help: econ pay ---");

        let sender = TestSender::new(true);
        let outcome = exec.dispatch(&sender, "econ", &tokens(&["-h=nothing"])).unwrap();
        assert_eq!(outcome, DispatchOutcome::HandlerFailed);
        assert!(sender.out.borrow()[0].contains("nothing"));
    }

    #[test]
    fn help_flag_answers_even_with_missing_slots() {
        let exec = Executor::new(
            CommandBuilder::new("econ")
                .default_help()
                .subcommand(
                    CommandBuilder::new("pay")
                        .arg(ArgSlot::string("player"))
                        .arg(ArgSlot::int("amount")),
                )
                .build()
                .unwrap(),
        );
        let sender = TestSender::new(true);
        assert_eq!(
            exec.dispatch(&sender, "econ", &tokens(&["pay", "-h"])).unwrap(),
            DispatchOutcome::Help
        );
        assert_eq!(sender.out.borrow()[0], "--- Help: econ pay ---");

        let sender = TestSender::new(true);
        assert_eq!(
            exec.dispatch(&sender, "econ", &tokens(&["pay", "Bob", "x", "-h"]))
                .unwrap(),
            DispatchOutcome::Help
        );

        let sender = TestSender::new(true);
        assert_eq!(
            exec.dispatch(&sender, "econ", &tokens(&["pay", "Bob"])).unwrap(),
            DispatchOutcome::ParseFailed
        );
    }

    fn give_tree() -> Executor {
        let root = CommandBuilder::new("cmd")
            .subcommand(
                CommandBuilder::new("give")
                    .arg(ArgSlot::string("player").completer(FnCompleter(
                        |_: &dyn Sender, _: &str| vec!["Bob".to_string(), "bella".to_string()],
                    )))
                    .arg(ArgSlot::choice("item", ["stone", "stick"])),
            )
            .subcommand(CommandBuilder::new("god"))
            .subcommand(CommandBuilder::new("gamemode").permission("cmd.gamemode"))
            .build()
            .unwrap();
        Executor::new(root)
    }

    #[test]
    fn completes_subcommands_in_declared_order() {
        let exec = give_tree();
        let admin = TestSender::new(true);
        assert_eq!(
            exec.complete(&admin, "cmd", &tokens(&["g"])).unwrap(),
            vec!["give", "god", "gamemode"]
        );
        assert_eq!(
            exec.complete(&admin, "cmd", &tokens(&["go"])).unwrap(),
            vec!["god"]
        );
        let guest = TestSender::new(false);
        assert_eq!(
            exec.complete(&guest, "cmd", &tokens(&["g"])).unwrap(),
            vec!["give", "god"]
        );
    }

    #[test]
    fn completes_slots_by_position() {
        let exec = give_tree();
        let sender = TestSender::new(true);
        assert_eq!(
            exec.complete(&sender, "cmd", &tokens(&["give", "b"])).unwrap(),
            vec!["Bob", "bella"]
        );
        assert_eq!(
            exec.complete(&sender, "cmd", &tokens(&["GIVE", "Bob", "st"])).unwrap(),
            vec!["stone", "stick"]
        );
        assert!(
            exec.complete(&sender, "cmd", &tokens(&["give", "Bob", "stone", ""]))
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn flags_do_not_shift_the_completed_slot() {
        let exec = Executor::new(
            CommandBuilder::new("econ")
                .subcommand(
                    CommandBuilder::new("pay")
                        .arg(ArgSlot::string("player").completer(Choices::new(["Bob", "bella"])))
                        .arg(ArgSlot::choice("amount", ["10", "100"]))
                        .flag(FlagSpec::switch("silent").alias("s")),
                )
                .build()
                .unwrap(),
        );
        let sender = TestSender::new(true);
        assert_eq!(
            exec.complete(&sender, "econ", &tokens(&["pay", "-s", "b"])).unwrap(),
            vec!["Bob", "bella"]
        );
        assert_eq!(
            exec.complete(&sender, "econ", &tokens(&["pay", "Bob", "-s", "1"]))
                .unwrap(),
            vec!["10", "100"]
        );
    }

    #[test]
    fn completion_degrades_to_empty() {
        let exec = give_tree();
        let sender = TestSender::new(true);
        assert!(exec.complete(&sender, "cmd", &[]).unwrap().is_empty());
        assert_eq!(
            exec.complete(&sender, "cmd", &[]).unwrap(),
            exec.complete(&sender, "cmd", &[]).unwrap()
        );

        let panicky = Executor::new(
            CommandBuilder::new("p")
                .arg(ArgSlot::string("x").completer(FnCompleter(
                    |_: &dyn Sender, _: &str| -> Vec<String> { panic!("lookup failed") },
                )))
                .build()
                .unwrap(),
        );
        assert!(panicky.complete(&sender, "p", &tokens(&["a"])).unwrap().is_empty());
    }

    #[test]
    fn completion_skips_forbidden_subcommands() {
        let exec = Executor::new(
            CommandBuilder::new("econ")
                .arg(ArgSlot::string("x").completer(Choices::new(["admin-a"])))
                .subcommand(
                    CommandBuilder::new("admin")
                        .permission("econ.admin")
                        .arg(ArgSlot::choice("op", ["reset"])),
                )
                .build()
                .unwrap(),
        );
        let guest = TestSender::new(false);
        // No entra: completa contra los slots de la raíz.
        assert!(
            exec.complete(&guest, "econ", &tokens(&["admin", "r"]))
                .unwrap()
                .is_empty()
        );
        let admin = TestSender::new(true);
        assert_eq!(
            exec.complete(&admin, "econ", &tokens(&["admin", "r"])).unwrap(),
            vec!["reset"]
        );
        assert_eq!(
            exec.complete(&admin, "econ", &tokens(&["ad"])).unwrap(),
            vec!["admin", "admin-a"]
        );
    }

    #[test]
    fn completes_flag_names() {
        let exec = Executor::new(CommandBuilder::new("econ").default_help().build().unwrap());
        let sender = TestSender::new(true);
        assert_eq!(
            exec.complete(&sender, "econ", &tokens(&["-"])).unwrap(),
            vec!["-h"]
        );
    }

    #[test]
    fn executor_is_shareable_between_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Executor>();
    }
}
