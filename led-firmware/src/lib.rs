// Library-Root: Hardware-Anbindung und Tasks
// Keine Standard-Bibliothek (Embedded System)
#![no_std]

// Module
pub mod config;
pub mod hal;
pub mod tasks;

// Re-exports von led-core
pub use led_core::{
    AggregateStatus, LedCommand, LedConfig, LedController, Pattern, QUEUE_SIZE, StatusAggregator,
};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use led_core::{LedChannel, LedHandle};

// ============================================================================
// Type-Aliase für Channel-Typen
// ============================================================================
//
// CriticalSectionRawMutex statt NoopRawMutex: der Button-Interrupt sendet
// in dieselben Channels wie die Tasks.

/// Command-Channel einer LED (statisch, einer pro LED-Task)
pub type LedSignalChannel = LedChannel<CriticalSectionRawMutex, QUEUE_SIZE>;

/// Sende-Handle für Tasks und Interrupt-Handler
pub type LedSignalHandle = LedHandle<'static, CriticalSectionRawMutex, QUEUE_SIZE>;

/// System-LED hinter dem Status-Aggregator
pub type SystemLed = StatusAggregator<LedSignalHandle>;
