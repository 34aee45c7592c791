// GPIO-Ausgang als LevelSink
//
// esp-hal `Output` implementiert `embedded_hal::digital::OutputPin`,
// daher reicht der generische `PinSink` aus led-core.

use esp_hal::gpio::{Level, Output, OutputConfig, OutputPin};
use led_core::PinSink;

/// LED an einem direkt angeschlossenen GPIO
pub type GpioSink = PinSink<Output<'static>>;

/// Konfiguriert den Pin als Ausgang, startet mit ausgeschalteter LED
///
/// # Parameter
/// - `pin`: GPIO Peripheral (z.B. `peripherals.GPIO15`)
/// - `active_high`: `true` wenn High-Pegel die LED einschaltet
pub fn led_output(pin: impl OutputPin + 'static, active_high: bool) -> GpioSink {
    let off = Level::from(!active_high);
    PinSink::new(Output::new(pin, off, OutputConfig::default()))
}
