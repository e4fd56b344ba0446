// src/lib.rs

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod models;
pub mod system;

pub use crate::core::command::{ArgKind, ArgSlot, CommandBuilder, CommandDefinition, FlagSpec};
pub use crate::core::context::{ArgValue, CommandContext, CommandError};
pub use crate::core::executor::{AmbiguityError, Executor};
pub use crate::core::sender::{RichMessage, Sender};
