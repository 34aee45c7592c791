//! Gemeinsame Test-Hilfen: Mock-Ausgang und Phasen-Recorder

#![allow(dead_code)]

use led_core::{LedConfig, LedController, LedError, LevelSink, PriorityPolicy};

// ============================================================================
// Mock Level Sink
// ============================================================================

#[derive(Default)]
pub struct MockLevelSink {
    pub writes: Vec<bool>,
    pub init_count: usize,
    pub fail_next_write: bool,
}

impl MockLevelSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<bool> {
        self.writes.last().copied()
    }
}

impl LevelSink for MockLevelSink {
    fn init(&mut self) -> Result<(), LedError> {
        self.init_count += 1;
        Ok(())
    }

    fn set_level(&mut self, high: bool) -> Result<(), LedError> {
        if self.fail_next_write {
            self.fail_next_write = false;
            return Err(LedError::WriteFailed);
        }
        self.writes.push(high);
        Ok(())
    }
}

// ============================================================================
// Helpers
// ============================================================================

pub fn controller(policy: PriorityPolicy) -> LedController<MockLevelSink> {
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

/// Eine Phase: logischer Pegel und wie lange er anhält
pub type Phase = (bool, Option<u32>);

pub fn phase<S: LevelSink>(led: &LedController<S>) -> Phase {
    (led.is_on(), led.time_to_next_wake())
}

/// Aktuelle Phase plus `steps` weitere nach je einem Timeout
pub fn run_phases<S: LevelSink>(led: &mut LedController<S>, steps: usize) -> Vec<Phase> {
    let mut phases = vec![phase(led)];
    for _ in 0..steps {
        led.on_timeout();
        phases.push(phase(led));
    }
    phases
}
