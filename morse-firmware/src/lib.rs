// Library-Root der Firmware: Hardware-Anbindung, Tasks und Web-Oberfläche
// Keine Standard-Bibliothek (Embedded System)
#![no_std]

// Heap (String-Antworten, Query-Parameter)
extern crate alloc;

pub mod config;
pub mod hal;
pub mod tasks;
pub mod web;

// Re-exports aus morse-core
pub use morse_core::{
    ConnectivityMachine, ConnectivityParts, ConnectivityState, SessionLog, SignalDriver,
};
