//! Konfiguration eines LED-Controllers und Default-Werte

/// Kapazität des Command-Channels pro LED
pub const QUEUE_SIZE: usize = 8;

/// Default-Wartezeit des blockierenden Sendepfads bei vollem Channel
pub const SEND_TIMEOUT: SendTimeout = SendTimeout::Forever;

/// Regel, welches von Halten / Flash / Blink die LED bekommt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PriorityPolicy {
    /// Jedes On/Off verwirft Flash und Blink
    #[default]
    Simple,
    /// Flash und Blink bleiben unter einem Halten erhalten und laufen danach weiter
    Priority,
}

/// Unveränderliche Konfiguration eines Controllers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LedConfig {
    /// `true`: High-Pegel schaltet die LED ein
    pub active_high: bool,
    pub policy: PriorityPolicy,
}

impl LedConfig {
    pub const fn new(active_high: bool, blink_priority: bool) -> Self {
        Self {
            active_high,
            policy: if blink_priority {
                PriorityPolicy::Priority
            } else {
                PriorityPolicy::Simple
            },
        }
    }
}

impl Default for LedConfig {
    fn default() -> Self {
        Self::new(true, false)
    }
}

/// Wartezeit für den blockierenden Sendepfad
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SendTimeout {
    /// Warten bis Platz im Channel ist
    Forever,
    Millis(u32),
}
