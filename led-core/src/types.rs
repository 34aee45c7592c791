//! Core Types für LED-Steuerung
//!
//! Kommando-Vokabular ohne Hardware-Dependencies: typisierte Kommandos,
//! das feste Wire-Format (Modus + drei u16-Werte) und die Text-Form
//! (z.B. `"lmFlash 3 100 500"`).

use core::str::FromStr;

/// Parameter eines Flash- oder Blink-Musters
///
/// - `quantity`: Anzahl der Blitze pro Serie
/// - `duration_ms`: Leuchtdauer eines Blitzes (und Pause innerhalb der Serie)
/// - `interval_ms`: Pause nach einer Serie bzw. zwischen Flash-Blitzen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pattern {
    pub quantity: u16,
    pub duration_ms: u16,
    pub interval_ms: u16,
}

impl Pattern {
    pub const fn new(quantity: u16, duration_ms: u16, interval_ms: u16) -> Self {
        Self {
            quantity,
            duration_ms,
            interval_ms,
        }
    }
}

/// Modus-Tag des Wire-Formats
///
/// Die Nummerierung ist Teil des Protokolls und darf nicht geändert werden.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedMode {
    Enable = 0,
    Off = 1,
    On = 2,
    Flash = 3,
    BlinkOn = 4,
    BlinkOff = 5,
}

impl LedMode {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(Self::Enable),
            1 => Some(Self::Off),
            2 => Some(Self::On),
            3 => Some(Self::Flash),
            4 => Some(Self::BlinkOn),
            5 => Some(Self::BlinkOff),
            _ => None,
        }
    }

    /// Text-Schlüsselwort ohne `lm`-Präfix
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Enable => "Enable",
            Self::Off => "Off",
            Self::On => "On",
            Self::Flash => "Flash",
            Self::BlinkOn => "BlinkOn",
            Self::BlinkOff => "BlinkOff",
        }
    }

    fn from_keyword(word: &str) -> Option<Self> {
        let word = match word.get(..2) {
            Some(prefix) if prefix.eq_ignore_ascii_case("lm") => &word[2..],
            _ => word,
        };
        [
            Self::Enable,
            Self::Off,
            Self::On,
            Self::Flash,
            Self::BlinkOn,
            Self::BlinkOff,
        ]
        .into_iter()
        .find(|mode| mode.keyword().eq_ignore_ascii_case(word))
    }
}

/// LED Command für den Controller-Task
///
/// Wird über den Command-Channel an genau einen Controller gesendet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LedCommand {
    /// LED sperren/freigeben (z.B. nachts jede Aktivität unterdrücken)
    Enable(bool),
    /// LED aus; `fixed` gibt einen gezählten Halte-Request frei
    Off { fixed: bool },
    /// LED dauerhaft an; `fixed` zählt einen Halte-Request hoch
    On { fixed: bool },
    /// Einmalige Serie von Blitzen, danach wird das vorherige Muster fortgesetzt
    Flash(Pattern),
    /// Dauerhaftes Blinken in Serien
    BlinkOn(Pattern),
    /// Blinken beenden
    BlinkOff,
}

impl LedCommand {
    pub fn mode(&self) -> LedMode {
        match self {
            Self::Enable(_) => LedMode::Enable,
            Self::Off { .. } => LedMode::Off,
            Self::On { .. } => LedMode::On,
            Self::Flash(_) => LedMode::Flash,
            Self::BlinkOn(_) => LedMode::BlinkOn,
            Self::BlinkOff => LedMode::BlinkOff,
        }
    }

    pub const fn flash(quantity: u16, duration_ms: u16, interval_ms: u16) -> Self {
        Self::Flash(Pattern::new(quantity, duration_ms, interval_ms))
    }

    pub const fn blink(quantity: u16, duration_ms: u16, interval_ms: u16) -> Self {
        Self::BlinkOn(Pattern::new(quantity, duration_ms, interval_ms))
    }
}

/// Fehler beim Dekodieren eines Kommandos
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Modus-Byte außerhalb 0..=5
    UnknownMode(u8),
    /// Unbekanntes Schlüsselwort in der Text-Form
    UnknownKeyword,
    /// Leere Eingabe
    MissingMode,
    /// Wert ist keine Zahl im Bereich 0..=65535
    InvalidNumber,
    /// Mehr als drei Werte
    TooManyValues,
}

/// Rohes Wire-Format: Modus-Tag + bis zu drei u16-Parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LedMessage {
    pub mode: u8,
    pub value1: u16,
    pub value2: u16,
    pub value3: u16,
}

impl From<LedCommand> for LedMessage {
    fn from(cmd: LedCommand) -> Self {
        let mode = cmd.mode() as u8;
        let (value1, value2, value3) = match cmd {
            LedCommand::Enable(on) => (on as u16, 0, 0),
            LedCommand::Off { fixed } | LedCommand::On { fixed } => (fixed as u16, 0, 0),
            LedCommand::Flash(p) | LedCommand::BlinkOn(p) => {
                (p.quantity, p.duration_ms, p.interval_ms)
            }
            LedCommand::BlinkOff => (0, 0, 0),
        };
        Self {
            mode,
            value1,
            value2,
            value3,
        }
    }
}

impl TryFrom<LedMessage> for LedCommand {
    type Error = ParseError;

    fn try_from(msg: LedMessage) -> Result<Self, Self::Error> {
        let mode = LedMode::from_byte(msg.mode).ok_or(ParseError::UnknownMode(msg.mode))?;
        Ok(from_values(mode, [msg.value1, msg.value2, msg.value3]))
    }
}

// Boolesche Werte: alles ungleich 0 ist `true`
fn from_values(mode: LedMode, [v1, v2, v3]: [u16; 3]) -> LedCommand {
    match mode {
        LedMode::Enable => LedCommand::Enable(v1 != 0),
        LedMode::Off => LedCommand::Off { fixed: v1 != 0 },
        LedMode::On => LedCommand::On { fixed: v1 != 0 },
        LedMode::Flash => LedCommand::flash(v1, v2, v3),
        LedMode::BlinkOn => LedCommand::blink(v1, v2, v3),
        LedMode::BlinkOff => LedCommand::BlinkOff,
    }
}

/// Text-Form: `"<modus> [v1] [v2] [v3]"`
///
/// Der Modus wird mit oder ohne `lm`-Präfix akzeptiert, Groß-/Kleinschreibung
/// ist egal. Fehlende Werte sind 0.
///
/// ```
/// # use led_core::{LedCommand, Pattern};
/// let cmd: LedCommand = "lmFlash 3 100 500".parse().unwrap();
/// assert_eq!(cmd, LedCommand::Flash(Pattern::new(3, 100, 500)));
/// ```
impl FromStr for LedCommand {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_ascii_whitespace();
        let keyword = words.next().ok_or(ParseError::MissingMode)?;
        let mode = LedMode::from_keyword(keyword).ok_or(ParseError::UnknownKeyword)?;

        let mut values = [0u16; 3];
        for (index, word) in words.enumerate() {
            let slot = values.get_mut(index).ok_or(ParseError::TooManyValues)?;
            *slot = word.parse().map_err(|_| ParseError::InvalidNumber)?;
        }
        Ok(from_values(mode, values))
    }
}

impl TryFrom<&str> for LedCommand {
    type Error = ParseError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

// ============================================================================
// defmt::Format Implementations (optional feature)
// ============================================================================

#[cfg(feature = "defmt")]
impl defmt::Format for LedCommand {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            LedCommand::Enable(on) => defmt::write!(fmt, "Enable({})", on),
            LedCommand::Off { fixed } => defmt::write!(fmt, "Off {{ fixed: {} }}", fixed),
            LedCommand::On { fixed } => defmt::write!(fmt, "On {{ fixed: {} }}", fixed),
            LedCommand::Flash(p) => defmt::write!(
                fmt,
                "Flash({}, {}, {})",
                p.quantity,
                p.duration_ms,
                p.interval_ms
            ),
            LedCommand::BlinkOn(p) => defmt::write!(
                fmt,
                "BlinkOn({}, {}, {})",
                p.quantity,
                p.duration_ms,
                p.interval_ms
            ),
            LedCommand::BlinkOff => defmt::write!(fmt, "BlinkOff"),
        }
    }
}
