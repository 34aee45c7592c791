// Hardware Abstraction Layer (HAL) Module
//
// Verbindet esp-hal Peripherals mit den Traits aus led-core.

pub mod button;
pub mod gpio_sink;

pub use button::install_button;
pub use gpio_sink::{GpioSink, led_output};
