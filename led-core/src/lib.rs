//! LED Core - Platform-agnostic Logic and Traits
//!
//! Diese Crate enthält KEINE Hardware-Dependencies.
//! Sie definiert den Controller (State-Machine), den Command-Channel mit
//! Treiber-Loop und die Status-Anzeige für eine System-LED.

#![cfg_attr(not(test), no_std)]

// Muss zuerst kommen: Makros für alle anderen Module
#[macro_use]
mod fmt;

pub mod channel;
pub mod config;
pub mod controller;
pub mod status;
pub mod traits;
pub mod types;

// Re-exports für einfachen Zugriff
pub use channel::{LedChannel, LedHandle, run_led_loop};
pub use config::{LedConfig, PriorityPolicy, QUEUE_SIZE, SendTimeout};
pub use controller::{LedController, LedState, PatternState};
pub use status::{AggregateStatus, CommandSink, StatusAggregator};
pub use traits::{CallbackSink, LedError, LevelSink, PinSink};
pub use types::{LedCommand, LedMessage, LedMode, ParseError, Pattern};
