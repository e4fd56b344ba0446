// src/system/mod.rs

pub mod bank;
pub mod console;
pub mod io;
