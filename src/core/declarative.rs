// src/core/declarative.rs

use crate::core::command::{ArgKind, ArgSlot, CommandBuilder, CommandDefinition, FlagSpec, RegistrationError};
use crate::core::completion::Choices;
use crate::core::context::{CommandContext, CommandError};
use crate::core::interpolator::Interpolator;
use crate::models::{ArgDecl, CommandDecl, FlagDecl, KindDecl, Reply, TreeConfig};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeclarationError {
    #[error("Registration error in '{command}': {source}")]
    Registration {
        command: String,
        #[source]
        source: RegistrationError,
    },
    #[error("'{name}' is declared as 'choice' but lists no choices.")]
    EmptyChoices { name: String },
}

type DeclarationResult<T> = Result<T, DeclarationError>;

/// Construye una definición raíz por cada tabla `[[command]]`.
pub fn build_tree(config: &TreeConfig) -> DeclarationResult<Vec<CommandDefinition>> {
    config.commands.iter().map(build_command).collect()
}

pub fn build_command(decl: &CommandDecl) -> DeclarationResult<CommandDefinition> {
    let name = decl
        .aliases
        .first()
        .cloned()
        .unwrap_or_else(|| "<overload>".to_string());
    into_builder(decl)?
        .build()
        .map_err(|source| DeclarationError::Registration {
            command: name,
            source,
        })
}

/// Convierte una declaración (recursivamente) en un builder.
fn into_builder(decl: &CommandDecl) -> DeclarationResult<CommandBuilder> {
    let mut builder = if decl.overload {
        CommandBuilder::overload().aliases(decl.aliases.iter().cloned())
    } else {
        // Un alias vacío lo reporta `build`.
        let mut aliases = decl.aliases.iter();
        match aliases.next() {
            Some(first) => CommandBuilder::new(first.clone()).aliases(aliases.cloned()),
            None => CommandBuilder::new(""),
        }
    };

    if let Some(description) = &decl.description {
        builder = builder.description(description.clone());
    }
    if let Some(permission) = &decl.permission {
        builder = builder.permission(permission.clone());
    }
    for arg in &decl.args {
        builder = builder.arg(arg_slot(arg)?);
    }
    for flag in &decl.flags {
        builder = builder.flag(flag_spec(flag)?);
    }
    for sub in &decl.subcommands {
        builder = builder.subcommand(into_builder(sub)?);
    }
    if decl.help {
        builder = builder.default_help();
    }
    if let Some(reply) = &decl.reply {
        builder = builder.handler(reply_handler(reply.clone()));
    }
    Ok(builder)
}

fn kind(kind: KindDecl, name: &str, choices: &[String]) -> DeclarationResult<ArgKind> {
    Ok(match kind {
        KindDecl::String => ArgKind::String,
        KindDecl::Integer => ArgKind::Integer,
        KindDecl::Float => ArgKind::Float,
        KindDecl::Boolean => ArgKind::Boolean,
        KindDecl::Choice if choices.is_empty() => {
            return Err(DeclarationError::EmptyChoices {
                name: name.to_string(),
            });
        }
        KindDecl::Choice => ArgKind::Choice(choices.to_vec()),
    })
}

fn arg_slot(decl: &ArgDecl) -> DeclarationResult<ArgSlot> {
    let mut slot = ArgSlot::new(decl.name.clone(), kind(decl.kind, &decl.name, &decl.choices)?);
    if let Some(default) = &decl.default {
        slot = slot.default_value(default.clone());
    }
    if decl.variadic {
        slot = slot.variadic();
    }
    if !decl.suggest.is_empty() {
        slot = slot.completer(Choices::new(decl.suggest.iter().cloned()));
    }
    if let Some(description) = &decl.description {
        slot = slot.description(description.clone());
    }
    Ok(slot)
}

fn flag_spec(decl: &FlagDecl) -> DeclarationResult<FlagSpec> {
    let mut flag = match decl.kind {
        Some(k) => FlagSpec::valued(decl.name.clone(), kind(k, &decl.name, &decl.choices)?),
        None => FlagSpec::switch(decl.name.clone()),
    };
    for alias in &decl.aliases {
        flag = flag.alias(alias.clone());
    }
    if let Some(description) = &decl.description {
        flag = flag.description(description.clone());
    }
    Ok(flag)
}

/// Handler de un comando declarado: envía cada línea de la respuesta, interpolada.
fn reply_handler(
    reply: Reply,
) -> impl Fn(&CommandContext<'_>) -> Result<(), CommandError> + Send + Sync + 'static {
    move |ctx: &CommandContext<'_>| {
        let interpolator = Interpolator::new(ctx);
        for line in reply.lines() {
            ctx.msg(&interpolator.interpolate(line));
        }
        Ok(())
    }
}
