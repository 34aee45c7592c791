//! LED Controller - zeitgesteuerte State-Machine für einen Ausgang
//!
//! Der Controller hat keinen eigenen Timer. Der Treiber-Loop fragt nach
//! jedem Schritt [`LedController::time_to_next_wake`] ab, wartet höchstens
//! so lange auf ein Kommando und ruft bei Ablauf [`LedController::on_timeout`].
//!
//! ```text
//! Flash 3 100 500:  ___|¯|___|¯|___|¯|________________
//! BlinkOn 3 100 X:  ___|¯|_|¯|_|¯|______X______|¯|_|¯|_|¯|___
//! ```

use crate::config::{LedConfig, PriorityPolicy};
use crate::traits::LevelSink;
use crate::types::{LedCommand, Pattern};

/// Abgeleiteter Zustand des Controllers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedState {
    Off,
    /// Dauerhaft an (Halte-Zähler > 0 oder nicht gezähltes On)
    SteadyOn,
    FlashBurst,
    BlinkSeries,
}

/// Aktives Muster mit Blitz-Zähler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PatternState {
    pub pattern: Pattern,
    pub count: u16,
}

impl PatternState {
    fn new(pattern: Pattern) -> Self {
        Self { pattern, count: 0 }
    }
}

pub struct LedController<S> {
    sink: S,
    config: LedConfig,
    enabled: bool,
    initialized: bool,
    state: bool,
    steady_on: bool,
    hold_count: u16,
    flash: Option<PatternState>,
    blink: Option<PatternState>,
    next_wake_ms: Option<u32>,
}

impl<S: LevelSink> LedController<S> {
    pub fn new(sink: S, config: LedConfig) -> Self {
        Self {
            sink,
            config,
            enabled: true,
            initialized: false,
            state: false,
            steady_on: false,
            hold_count: 0,
            flash: None,
            blink: None,
            next_wake_ms: None,
        }
    }

    /// Konfiguriert den Ausgang und schreibt den aktuellen Pegel
    pub fn init(&mut self) {
        self.init_sink();
        self.write_level(self.state && self.enabled);
    }

    fn init_sink(&mut self) {
        self.initialized = true;
        if self.sink.init().is_err() {
            warn!("LED output init failed");
        }
    }

    // Physikalisches Schreiben ohne Zustandsänderung
    fn write_level(&mut self, on: bool) {
        if !self.initialized {
            self.init_sink();
        }
        if self.sink.set_level(on == self.config.active_high).is_err() {
            warn!("LED output write failed");
        }
    }

    fn set_state(&mut self, on: bool) {
        if self.state != on {
            self.state = on;
            if self.enabled {
                self.write_level(on);
            }
        }
    }

    /// LED sperren oder freigeben
    ///
    /// Gesperrt bleibt die LED physikalisch aus, Zustand und Muster laufen
    /// unverändert weiter. Ein Umschalten während eines Musters startet die
    /// laufende Phase neu, weil der Treiber-Loop danach die volle
    /// Wartezeit erneut abwartet.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled != enabled {
            self.enabled = enabled;
            if enabled {
                trace!("LED enabled");
                self.write_level(self.state);
            } else {
                trace!("LED disabled");
                self.write_level(false);
            }
        }
    }

    pub fn turn_on(&mut self, fixed: bool) {
        if fixed {
            self.hold_count = self.hold_count.saturating_add(1);
        }
        trace!("LED on: {}", self.hold_count);
        self.steady_on = true;
        if self.config.policy == PriorityPolicy::Simple {
            self.flash = None;
            self.blink = None;
        }
        self.next_wake_ms = None;
        self.set_state(true);
    }

    /// LED aus oder zurück zum letzten Muster
    pub fn turn_off(&mut self, fixed: bool) {
        if fixed && self.hold_count > 0 {
            self.hold_count -= 1;
        }
        if self.hold_count > 0 {
            trace!("LED off blocked: {}", self.hold_count);
            return;
        }
        trace!("LED off: {}", self.hold_count);
        self.steady_on = false;
        match self.config.policy {
            PriorityPolicy::Priority => {
                self.next_wake_ms = if let Some(flash) = &self.flash {
                    Some(flash.pattern.interval_ms.into())
                } else if let Some(blink) = &mut self.blink {
                    blink.count = 0;
                    Some(blink.pattern.interval_ms.into())
                } else {
                    None
                };
            }
            PriorityPolicy::Simple => {
                self.flash = None;
                self.blink = None;
                self.next_wake_ms = None;
            }
        }
        self.set_state(false);
    }

    // Erste Phase eines übernehmenden Musters
    fn begin_pattern(&mut self, pattern: Pattern) {
        self.steady_on = false;
        match self.config.policy {
            PriorityPolicy::Priority => {
                self.next_wake_ms = Some(0);
                self.set_state(false);
            }
            PriorityPolicy::Simple => {
                self.next_wake_ms = Some(pattern.duration_ms.into());
                self.set_state(true);
            }
        }
    }

    pub fn start_flash(&mut self, pattern: Pattern) {
        trace!(
            "LED flash on: {}, {}, {}",
            pattern.quantity,
            pattern.duration_ms,
            pattern.interval_ms
        );
        self.flash = Some(PatternState::new(pattern));
        if self.hold_count == 0 {
            self.begin_pattern(pattern);
        }
    }

    pub fn stop_flash(&mut self) {
        if self.flash.take().is_none() {
            return;
        }
        trace!("LED flash off");
        if self.hold_count == 0 {
            self.steady_on = false;
            self.next_wake_ms = match &mut self.blink {
                Some(blink) => {
                    blink.count = 0;
                    Some(blink.pattern.interval_ms.into())
                }
                None => None,
            };
            self.set_state(false);
        }
    }

    pub fn start_blink(&mut self, pattern: Pattern) {
        trace!(
            "LED blink on: {}, {}, {}",
            pattern.quantity,
            pattern.duration_ms,
            pattern.interval_ms
        );
        self.blink = Some(PatternState::new(pattern));
        if self.hold_count == 0 && self.flash.is_none() {
            self.begin_pattern(pattern);
        }
    }

    /// Blinken beenden; bei `Priority` wird auch ein Flash verworfen
    pub fn stop_blink(&mut self) {
        if self.blink.take().is_none() {
            return;
        }
        trace!("LED blink off");
        if self.config.policy == PriorityPolicy::Priority {
            self.flash = None;
        }
        if self.hold_count == 0 && self.flash.is_none() {
            self.steady_on = false;
            self.next_wake_ms = None;
            self.set_state(false);
        }
    }

    /// Nächster Musterschritt nach Ablauf von [`Self::time_to_next_wake`]
    pub fn on_timeout(&mut self) {
        if self.next_wake_ms.is_none() {
            warn!("on_timeout() called while no pattern is running");
            return;
        }

        if let Some(mut flash) = self.flash {
            if self.state {
                flash.count = flash.count.saturating_add(1);
                if flash.count == flash.pattern.quantity {
                    self.stop_flash();
                    return;
                }
                self.flash = Some(flash);
                self.next_wake_ms = Some(flash.pattern.interval_ms.into());
                self.set_state(false);
            } else {
                self.next_wake_ms = Some(flash.pattern.duration_ms.into());
                self.set_state(true);
            }
        } else if let Some(mut blink) = self.blink {
            if self.state {
                blink.count = blink.count.saturating_add(1);
                self.next_wake_ms = if blink.count == blink.pattern.quantity {
                    blink.count = 0;
                    Some(blink.pattern.interval_ms.into())
                } else {
                    Some(blink.pattern.duration_ms.into())
                };
                self.blink = Some(blink);
                self.set_state(false);
            } else {
                self.next_wake_ms = Some(blink.pattern.duration_ms.into());
                self.set_state(true);
            }
        } else {
            warn!("on_timeout() called while no pattern is running");
        }
    }

    /// Wartezeit bis zum nächsten Musterschritt; `None` = unendlich
    pub fn time_to_next_wake(&self) -> Option<u32> {
        self.next_wake_ms
    }

    pub fn apply(&mut self, cmd: LedCommand) {
        match cmd {
            LedCommand::Enable(enabled) => self.set_enabled(enabled),
            LedCommand::Off { fixed } => self.turn_off(fixed),
            LedCommand::On { fixed } => self.turn_on(fixed),
            LedCommand::Flash(pattern) => self.start_flash(pattern),
            LedCommand::BlinkOn(pattern) => self.start_blink(pattern),
            LedCommand::BlinkOff => self.stop_blink(),
        }
    }

    pub fn state(&self) -> LedState {
        if self.hold_count > 0 || self.steady_on {
            LedState::SteadyOn
        } else if self.next_wake_ms.is_none() {
            LedState::Off
        } else if self.flash.is_some() {
            LedState::FlashBurst
        } else if self.blink.is_some() {
            LedState::BlinkSeries
        } else {
            LedState::Off
        }
    }

    /// Logischer Zustand (vor der Sperre)
    pub fn is_on(&self) -> bool {
        self.state
    }

    /// Physikalischer Pegel, den der Ausgang gerade haben soll
    pub fn physical_level(&self) -> bool {
        (self.state && self.enabled) == self.config.active_high
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn hold_count(&self) -> u16 {
        self.hold_count
    }

    pub fn flash(&self) -> Option<PatternState> {
        self.flash
    }

    pub fn blink(&self) -> Option<PatternState> {
        self.blink
    }

    pub fn config(&self) -> LedConfig {
        self.config
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::mock::MockLevelSink;

    fn controller(policy: PriorityPolicy) -> LedController<MockLevelSink> {
        let mut led = LedController::new(
            MockLevelSink::new(),
            LedConfig {
                active_high: true,
                policy,
            },
        );
        led.init();
        led
    }

    #[test]
    fn test_init_writes_off_level() {
        let led = controller(PriorityPolicy::Simple);
        assert_eq!(led.sink().init_count, 1);
        assert_eq!(led.sink().writes, [false]);
    }

    #[test]
    fn test_lazy_init_on_first_write() {
        let mut led = LedController::new(MockLevelSink::new(), LedConfig::default());
        led.turn_on(false);
        assert_eq!(led.sink().init_count, 1);
        assert_eq!(led.sink().writes, [true]);
    }

    #[test]
    fn test_active_low_inverts_physical_level() {
        let mut led = LedController::new(MockLevelSink::new(), LedConfig::new(false, false));
        led.init();
        led.turn_on(false);
        assert_eq!(led.sink().writes, [true, false]);
        assert!(!led.physical_level());
    }

    #[test]
    fn test_hold_blocks_off() {
        let mut led = controller(PriorityPolicy::Simple);
        led.turn_on(true);
        led.turn_on(true);
        led.turn_off(true);
        assert!(led.is_on());
        assert_eq!(led.hold_count(), 1);
        led.turn_off(true);
        assert!(!led.is_on());
        assert_eq!(led.state(), LedState::Off);
    }

    #[test]
    fn test_unfixed_off_does_not_touch_hold() {
        let mut led = controller(PriorityPolicy::Simple);
        led.turn_on(true);
        led.turn_off(false);
        assert!(led.is_on());
        assert_eq!(led.hold_count(), 1);
    }

    #[test]
    fn test_off_without_hold_does_not_underflow() {
        let mut led = controller(PriorityPolicy::Simple);
        led.turn_off(true);
        assert_eq!(led.hold_count(), 0);
        assert_eq!(led.sink().writes, [false]);
    }

    #[test]
    fn test_disable_forces_off_and_keeps_state() {
        let mut led = controller(PriorityPolicy::Simple);
        led.turn_on(true);
        led.set_enabled(false);
        assert_eq!(led.sink().last(), Some(false));
        assert!(led.is_on());
        assert_eq!(led.hold_count(), 1);

        led.set_enabled(true);
        assert_eq!(led.sink().last(), Some(true));
    }

    #[test]
    fn test_disabled_pattern_writes_nothing() {
        let mut led = controller(PriorityPolicy::Simple);
        led.set_enabled(false);
        let writes = led.sink().writes.len();
        led.start_blink(Pattern::new(1, 500, 500));
        led.on_timeout();
        led.on_timeout();
        assert_eq!(led.sink().writes.len(), writes);
        assert!(!led.physical_level());
    }

    #[test]
    fn test_simple_flash_turns_on_first() {
        let mut led = controller(PriorityPolicy::Simple);
        led.start_flash(Pattern::new(2, 100, 500));
        assert!(led.is_on());
        assert_eq!(led.time_to_next_wake(), Some(100));
        assert_eq!(led.state(), LedState::FlashBurst);
    }

    #[test]
    fn test_priority_flash_starts_with_zero_off_phase() {
        let mut led = controller(PriorityPolicy::Priority);
        led.start_flash(Pattern::new(2, 100, 500));
        assert!(!led.is_on());
        assert_eq!(led.time_to_next_wake(), Some(0));
        led.on_timeout();
        assert!(led.is_on());
        assert_eq!(led.time_to_next_wake(), Some(100));
    }

    #[test]
    fn test_flash_burst_completes_and_stops() {
        let mut led = controller(PriorityPolicy::Simple);
        led.start_flash(Pattern::new(2, 100, 500));
        led.on_timeout(); // off, 500
        assert_eq!(led.time_to_next_wake(), Some(500));
        led.on_timeout(); // on, 100
        assert_eq!(led.time_to_next_wake(), Some(100));
        led.on_timeout(); // fertig
        assert!(!led.is_on());
        assert_eq!(led.flash(), None);
        assert_eq!(led.time_to_next_wake(), None);
        assert_eq!(led.state(), LedState::Off);
    }

    #[test]
    fn test_flash_resumes_latent_blink() {
        let mut led = controller(PriorityPolicy::Simple);
        led.start_blink(Pattern::new(1, 500, 500));
        led.start_flash(Pattern::new(1, 100, 100));
        led.on_timeout();
        assert_eq!(led.flash(), None);
        assert_eq!(led.state(), LedState::BlinkSeries);
        assert_eq!(led.time_to_next_wake(), Some(500));
    }

    #[test]
    fn test_blink_series_pause() {
        let mut led = controller(PriorityPolicy::Simple);
        led.start_blink(Pattern::new(2, 100, 1000));
        led.on_timeout(); // off nach Blitz 1
        assert_eq!(led.time_to_next_wake(), Some(100));
        led.on_timeout(); // on
        led.on_timeout(); // off nach Blitz 2 -> Serienpause
        assert_eq!(led.time_to_next_wake(), Some(1000));
        assert_eq!(led.blink().map(|b| b.count), Some(0));
        led.on_timeout();
        assert!(led.is_on());
    }

    #[test]
    fn test_blink_does_not_preempt_flash() {
        let mut led = controller(PriorityPolicy::Simple);
        led.start_flash(Pattern::new(3, 100, 100));
        led.start_blink(Pattern::new(1, 700, 700));
        assert_eq!(led.state(), LedState::FlashBurst);
        assert_eq!(led.time_to_next_wake(), Some(100));
    }

    #[test]
    fn test_simple_on_cancels_patterns() {
        let mut led = controller(PriorityPolicy::Simple);
        led.start_blink(Pattern::new(1, 500, 500));
        led.start_flash(Pattern::new(1, 100, 100));
        led.turn_on(false);
        assert_eq!(led.flash(), None);
        assert_eq!(led.blink(), None);
        assert_eq!(led.time_to_next_wake(), None);
    }

    #[test]
    fn test_priority_on_keeps_patterns_latent() {
        let mut led = controller(PriorityPolicy::Priority);
        led.start_blink(Pattern::new(1, 500, 500));
        led.turn_on(true);
        assert!(led.blink().is_some());
        assert_eq!(led.time_to_next_wake(), None);
        led.turn_off(true);
        assert_eq!(led.state(), LedState::BlinkSeries);
        assert_eq!(led.time_to_next_wake(), Some(500));
    }

    #[test]
    fn test_priority_stop_blink_clears_flash() {
        let mut led = controller(PriorityPolicy::Priority);
        led.start_blink(Pattern::new(1, 500, 500));
        led.start_flash(Pattern::new(3, 100, 100));
        led.stop_blink();
        assert_eq!(led.flash(), None);
        assert_eq!(led.state(), LedState::Off);
    }

    #[test]
    fn test_simple_stop_blink_keeps_running_flash() {
        let mut led = controller(PriorityPolicy::Simple);
        led.start_blink(Pattern::new(1, 500, 500));
        led.start_flash(Pattern::new(3, 100, 100));
        led.stop_blink();
        assert!(led.flash().is_some());
        assert_eq!(led.time_to_next_wake(), Some(100));
        assert!(led.is_on());
    }

    #[test]
    fn test_stop_blink_without_blink_is_noop() {
        let mut led = controller(PriorityPolicy::Priority);
        led.start_flash(Pattern::new(3, 100, 100));
        let wake = led.time_to_next_wake();
        led.stop_blink();
        assert!(led.flash().is_some());
        assert_eq!(led.time_to_next_wake(), wake);
    }

    #[test]
    fn test_timeout_without_pattern_is_noop() {
        let mut led = controller(PriorityPolicy::Simple);
        led.on_timeout();
        assert!(!led.is_on());
        assert_eq!(led.sink().writes, [false]);
    }

    #[test]
    fn test_timeout_under_hold_is_noop() {
        let mut led = controller(PriorityPolicy::Priority);
        led.turn_on(true);
        led.start_flash(Pattern::new(1, 100, 100));
        led.on_timeout();
        assert!(led.is_on());
        assert_eq!(led.flash().map(|f| f.count), Some(0));
    }

    #[test]
    fn test_zero_quantity_never_completes() {
        let mut led = controller(PriorityPolicy::Simple);
        led.start_flash(Pattern::new(0, 10, 10));
        for _ in 0..20 {
            led.on_timeout();
        }
        assert!(led.flash().is_some());
        assert_eq!(led.state(), LedState::FlashBurst);
    }

    #[test]
    fn test_failed_write_keeps_logical_state() {
        let mut led = controller(PriorityPolicy::Simple);
        led.sink.fail_next_write = true;
        led.turn_on(false);
        assert!(led.is_on());
        assert_eq!(led.sink().writes, [false]);
    }

    #[test]
    fn test_apply_dispatches_commands() {
        let mut led = controller(PriorityPolicy::Simple);
        led.apply(LedCommand::On { fixed: true });
        assert_eq!(led.hold_count(), 1);
        led.apply(LedCommand::Enable(false));
        assert!(!led.is_enabled());
        led.apply(LedCommand::blink(1, 100, 100));
        assert!(led.blink().is_some());
        led.apply(LedCommand::BlinkOff);
        assert!(led.blink().is_none());
    }
}
