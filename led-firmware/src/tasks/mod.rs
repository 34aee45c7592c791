// Task-Modul: Enthält alle Embassy Tasks
//
// Jede LED hat einen eigenen Task mit eigenem Command-Channel.
// Alle anderen Tasks (und der Button-Interrupt) senden nur über Handles.

pub mod led;
pub mod status_demo;

// Re-export Tasks für einfachen Import
pub use led::{led_task, spawn_led};
pub use status_demo::status_demo_task;
