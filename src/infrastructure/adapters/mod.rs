//! Session adapters

pub mod console;
