// src/core/mod.rs

pub mod command;
pub mod completion;
pub mod context;
pub mod declarative;
pub mod executor;
pub mod help;
pub mod interpolator;
pub mod parser;
pub mod registry;
pub mod sender;
pub mod session;
pub mod tree_display;
