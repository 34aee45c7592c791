//! System-LED: Gerätestatus als Blinkmuster
//!
//! Mehrere unabhängige Status-Bits (Fehler, WLAN, MQTT, ...) werden nach
//! fester Priorität auf das Blinkmuster *einer* LED abgebildet.
//!
//! | Priorität | Zustand                        | Muster (Anzahl, Dauer, Pause) |
//! |-----------|--------------------------------|-------------------------------|
//! | 1         | OTA läuft                      | 1, 50, 50                     |
//! | 2         | ERROR                          | 1, 250, 250                   |
//! | 3         | WARNING                        | 2, 100, 1000                  |
//! | 4         | SENSOR_ERROR                   | 3, 100, 1000                  |
//! | 5         | WLAN getrennt / WIFI_ERROR     | 1, 500, 500                   |
//! | 6         | kein Internet                  | 2, 100, 3000                  |
//! | 7         | MQTT_ERROR                     | 3, 100, 3000                  |
//! | 8         | TELEGRAM_ERROR                 | 4, 100, 3000                  |
//! | 9         | OTHER_PUB_ERROR                | 5, 100, 3000                  |
//! | -         | alles ok, `auto_blink`         | 1, 100, 5000                  |

use embassy_sync::blocking_mutex::raw::RawMutex;

use crate::channel::LedHandle;
use crate::controller::LedController;
use crate::traits::LevelSink;
use crate::types::{LedCommand, Pattern};

/// Ziel für Kommandos: Channel-Handle oder direkt ein Controller
pub trait CommandSink {
    /// Gibt `false` zurück, wenn das Kommando nicht angenommen wurde
    fn submit(&mut self, cmd: LedCommand) -> bool;
}

/// Nicht-blockierend über [`LedHandle::send_from_isr`]
///
/// Bei vollem Channel wird das Kommando verworfen und `false` geliefert.
/// Der [`StatusAggregator`] sendet sein Muster beim nächsten Aufruf erneut,
/// manuelle Kommandos (`on`, `flash`, ...) muss der Aufrufer wiederholen.
impl<M: RawMutex, const N: usize> CommandSink for LedHandle<'_, M, N> {
    fn submit(&mut self, cmd: LedCommand) -> bool {
        self.send_from_isr(cmd)
    }
}

impl<S: LevelSink> CommandSink for LedController<S> {
    fn submit(&mut self, cmd: LedCommand) -> bool {
        self.apply(cmd);
        true
    }
}

impl<T: CommandSink + ?Sized> CommandSink for &mut T {
    fn submit(&mut self, cmd: LedCommand) -> bool {
        (**self).submit(cmd)
    }
}

/// Menge von Status-Bits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AggregateStatus(u16);

impl AggregateStatus {
    pub const ERROR: Self = Self(1 << 0);
    pub const WARNING: Self = Self(1 << 1);
    pub const WIFI_CONNECTED: Self = Self(1 << 2);
    pub const WIFI_INET_AVAILABLE: Self = Self(1 << 3);
    pub const WIFI_ERROR: Self = Self(1 << 4);
    pub const MQTT_ERROR: Self = Self(1 << 5);
    pub const TELEGRAM_ERROR: Self = Self(1 << 6);
    pub const OTHER_PUB_ERROR: Self = Self(1 << 7);
    pub const SENSOR_ERROR: Self = Self(1 << 8);
    pub const OTA: Self = Self(1 << 9);

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u16 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }

    /// Blinkmuster für diesen Status, `None` = LED aus
    pub fn pattern(self, auto_blink: bool) -> Option<Pattern> {
        let pattern = if self.contains(Self::OTA) {
            Pattern::new(1, 50, 50)
        } else if self.contains(Self::ERROR) {
            Pattern::new(1, 250, 250)
        } else if self.contains(Self::WARNING) {
            Pattern::new(2, 100, 1000)
        } else if self.contains(Self::SENSOR_ERROR) {
            Pattern::new(3, 100, 1000)
        } else if self.contains(Self::WIFI_ERROR) || !self.contains(Self::WIFI_CONNECTED) {
            Pattern::new(1, 500, 500)
        } else if !self.contains(Self::WIFI_INET_AVAILABLE) {
            Pattern::new(2, 100, 3000)
        } else if self.contains(Self::MQTT_ERROR) {
            Pattern::new(3, 100, 3000)
        } else if self.contains(Self::TELEGRAM_ERROR) {
            Pattern::new(4, 100, 3000)
        } else if self.contains(Self::OTHER_PUB_ERROR) {
            Pattern::new(5, 100, 3000)
        } else if auto_blink {
            Pattern::new(1, 100, 5000)
        } else {
            return None;
        };
        Some(pattern)
    }
}

impl core::ops::BitOr for AggregateStatus {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

/// Status-Anzeige über einer LED
///
/// Hält die Status-Bits und sendet nur dann ein neues Blinkmuster, wenn sich
/// das Ergebnis ändert (oder `forced`). Schlägt das Senden fehl, wird beim
/// nächsten Aufruf erneut gesendet. Über einen [`LedHandle`] blockiert
/// kein Aufruf, ein voller Channel zählt als Fehlschlag.
pub struct StatusAggregator<C> {
    sink: C,
    status: AggregateStatus,
    auto_blink: bool,
    current: Option<Pattern>,
    synced: bool,
}

impl<C: CommandSink> StatusAggregator<C> {
    pub fn new(sink: C, auto_blink: bool) -> Self {
        Self {
            sink,
            status: AggregateStatus::empty(),
            auto_blink,
            current: None,
            synced: false,
        }
    }

    /// Sendet das Muster für den aktuellen Status
    pub fn start(&mut self) -> bool {
        self.refresh(true)
    }

    pub fn status(&self) -> AggregateStatus {
        self.status
    }

    /// Zuletzt erfolgreich gesendetes Muster
    pub fn current_pattern(&self) -> Option<Pattern> {
        self.current
    }

    pub fn state_set(&mut self, bits: AggregateStatus, forced: bool) -> bool {
        self.status.insert(bits);
        self.refresh(forced)
    }

    pub fn state_clear(&mut self, bits: AggregateStatus, forced: bool) -> bool {
        self.status.remove(bits);
        self.refresh(forced)
    }

    fn refresh(&mut self, forced: bool) -> bool {
        let desired = self.status.pattern(self.auto_blink);
        if !forced && self.synced && self.current == desired {
            return true;
        }
        debug!("System LED status: {}", self.status.bits());
        let cmd = match desired {
            Some(pattern) => LedCommand::BlinkOn(pattern),
            None => LedCommand::BlinkOff,
        };
        let sent = self.sink.submit(cmd);
        if sent {
            self.current = desired;
            self.synced = true;
        } else {
            self.synced = false;
        }
        sent
    }

    pub fn on(&mut self, fixed: bool) -> bool {
        // Simple-Policy verwirft dabei das Blinkmuster
        self.synced = false;
        self.sink.submit(LedCommand::On { fixed })
    }

    /// LED aus, danach wird das Status-Muster wiederhergestellt
    pub fn off(&mut self, fixed: bool) -> bool {
        self.sink.submit(LedCommand::Off { fixed }) && self.refresh(true)
    }

    pub fn set(&mut self, on: bool) -> bool {
        if on { self.on(false) } else { self.off(false) }
    }

    pub fn set_enabled(&mut self, enabled: bool) -> bool {
        self.sink.submit(LedCommand::Enable(enabled))
    }

    /// Einmalige Blitze über dem Status-Muster
    ///
    /// Nach dem letzten Blitz läuft das Status-Muster weiter.
    pub fn flash(&mut self, quantity: u16, duration_ms: u16, interval_ms: u16) -> bool {
        self.sink
            .submit(LedCommand::flash(quantity, duration_ms, interval_ms))
    }

    /// Manuelles Blinkmuster bis zur nächsten Status-Änderung
    pub fn blink_on(&mut self, quantity: u16, duration_ms: u16, interval_ms: u16) -> bool {
        self.synced = false;
        self.sink
            .submit(LedCommand::blink(quantity, duration_ms, interval_ms))
    }

    pub fn blink_off(&mut self) -> bool {
        self.synced = false;
        self.sink.submit(LedCommand::BlinkOff)
    }

    pub fn sink(&self) -> &C {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut C {
        &mut self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::vec::Vec;

    #[derive(Default)]
    struct Recorder {
        sent: Vec<LedCommand>,
        reject: bool,
    }

    impl CommandSink for Recorder {
        fn submit(&mut self, cmd: LedCommand) -> bool {
            if self.reject {
                return false;
            }
            self.sent.push(cmd);
            true
        }
    }

    #[test]
    fn test_start_reports_disconnected() {
        let mut sys = StatusAggregator::new(Recorder::default(), true);
        assert!(sys.start());
        assert_eq!(sys.sink().sent, [LedCommand::blink(1, 500, 500)]);
    }

    #[test]
    fn test_error_beats_connectivity() {
        let status = AggregateStatus::ERROR | AggregateStatus::WIFI_ERROR;
        assert_eq!(status.pattern(false), Some(Pattern::new(1, 250, 250)));
        let status = AggregateStatus::WARNING | AggregateStatus::MQTT_ERROR;
        assert_eq!(status.pattern(false), Some(Pattern::new(2, 100, 1000)));
    }

    #[test]
    fn test_all_ok_depends_on_auto_blink() {
        let ok = AggregateStatus::WIFI_CONNECTED | AggregateStatus::WIFI_INET_AVAILABLE;
        assert_eq!(ok.pattern(true), Some(Pattern::new(1, 100, 5000)));
        assert_eq!(ok.pattern(false), None);
    }

    #[test]
    fn test_unchanged_pattern_not_resent() {
        let mut sys = StatusAggregator::new(Recorder::default(), false);
        sys.start();
        // MQTT-Fehler ändert nichts, solange WLAN fehlt
        sys.state_set(AggregateStatus::MQTT_ERROR, false);
        assert_eq!(sys.sink().sent.len(), 1);
        sys.state_set(AggregateStatus::MQTT_ERROR, true);
        assert_eq!(sys.sink().sent.len(), 2);
    }

    #[test]
    fn test_clear_to_all_ok_sends_blink_off() {
        let mut sys = StatusAggregator::new(Recorder::default(), false);
        sys.state_set(
            AggregateStatus::WIFI_CONNECTED | AggregateStatus::WIFI_INET_AVAILABLE,
            false,
        );
        sys.state_set(AggregateStatus::ERROR, false);
        sys.state_clear(AggregateStatus::ERROR, false);
        assert_eq!(
            sys.sink().sent,
            [LedCommand::BlinkOff, LedCommand::blink(1, 250, 250), LedCommand::BlinkOff]
        );
        assert_eq!(sys.current_pattern(), None);
    }

    #[test]
    fn test_rejected_submit_is_retried() {
        let mut sys = StatusAggregator::new(Recorder::default(), false);
        sys.sink_mut().reject = true;
        assert!(!sys.state_set(AggregateStatus::ERROR, false));
        sys.sink_mut().reject = false;
        assert!(sys.state_set(AggregateStatus::WARNING, false));
        assert_eq!(sys.sink().sent, [LedCommand::blink(1, 250, 250)]);
    }

    #[test]
    fn test_rejected_forced_refresh_is_retried() {
        let mut sys = StatusAggregator::new(Recorder::default(), false);
        sys.start();
        sys.sink_mut().reject = true;
        assert!(!sys.state_set(AggregateStatus::MQTT_ERROR, true));
        sys.sink_mut().reject = false;
        // Muster unverändert, trotzdem erneut senden
        assert!(sys.state_set(AggregateStatus::TELEGRAM_ERROR, false));
        assert_eq!(
            sys.sink().sent,
            [LedCommand::blink(1, 500, 500), LedCommand::blink(1, 500, 500)]
        );
    }

    #[test]
    fn test_off_restores_status_pattern() {
        let mut sys = StatusAggregator::new(Recorder::default(), false);
        sys.start();
        sys.on(true);
        sys.off(true);
        assert_eq!(
            sys.sink().sent,
            [
                LedCommand::blink(1, 500, 500),
                LedCommand::On { fixed: true },
                LedCommand::Off { fixed: true },
                LedCommand::blink(1, 500, 500),
            ]
        );
    }

    #[test]
    fn test_bit_ops() {
        let mut status = AggregateStatus::empty();
        status.insert(AggregateStatus::OTA | AggregateStatus::ERROR);
        assert!(status.contains(AggregateStatus::OTA));
        status.remove(AggregateStatus::OTA);
        assert!(!status.intersects(AggregateStatus::OTA));
        assert_eq!(status.bits(), 1);
    }
}
