// BOOT-Button mit GPIO-Interrupt
//
// Der Interrupt-Handler sendet über den nicht-blockierenden Pfad
// (`send_from_isr`). Ist der Channel voll, geht der Tastendruck verloren.

use core::cell::{Cell, RefCell};

use critical_section::Mutex;
use esp_hal::gpio::{Event, Input, InputConfig, InputPin, Io, Pull};
use esp_hal::handler;
use esp_hal::peripherals::IO_MUX;

use crate::LedSignalHandle;
use crate::config::BUTTON_FLASH;
use led_core::LedCommand;

// Zwischen Main und ISR geteilt
static BUTTON: Mutex<RefCell<Option<Input<'static>>>> = Mutex::new(RefCell::new(None));
static TARGET: Mutex<Cell<Option<LedSignalHandle>>> = Mutex::new(Cell::new(None));

/// Richtet den Button-Interrupt ein
///
/// # Parameter
/// - `io_mux`: IO_MUX Peripheral (für den GPIO-Interrupt-Handler)
/// - `pin`: Button-GPIO (Low-aktiv, interner Pull-Up)
/// - `target`: LED, die bei Tastendruck blitzt
pub fn install_button(
    io_mux: IO_MUX<'static>,
    pin: impl InputPin + 'static,
    target: LedSignalHandle,
) {
    let mut io = Io::new(io_mux);
    io.set_interrupt_handler(button_handler);

    let mut button = Input::new(pin, InputConfig::default().with_pull(Pull::Up));

    critical_section::with(|cs| {
        button.listen(Event::FallingEdge);
        BUTTON.borrow_ref_mut(cs).replace(button);
        TARGET.borrow(cs).set(Some(target));
    });
}

#[handler]
fn button_handler() {
    critical_section::with(|cs| {
        let mut button = BUTTON.borrow_ref_mut(cs);
        let Some(button) = button.as_mut() else {
            return;
        };
        if !button.is_interrupt_set() {
            return;
        }
        button.clear_interrupt();

        if let Some(target) = TARGET.borrow(cs).get() {
            if !target.send_from_isr(LedCommand::Flash(BUTTON_FLASH)) {
                defmt::warn!("Button flash dropped: LED queue full");
            }
        }
    });
}
