// LED Task - ein Controller pro GPIO, gesteuert über seinen Command-Channel
use defmt::info;
use embassy_executor::{SpawnError, Spawner};

use crate::config::LED_TASK_POOL_SIZE;
use crate::hal::GpioSink;
use crate::{LedConfig, LedController, LedSignalChannel, LedSignalHandle};

/// LED Task - Embassy Task für parallele Ausführung
///
/// Läuft, bis der Channel geschlossen wird. Der Controller (und damit der
/// Pin) wird danach freigegeben.
///
/// # Parameter
/// - `pin`: Anzeigenummer für das Log
/// - `controller`: Controller mit GPIO-Sink
/// - `channel`: statischer Command-Channel dieser LED
#[embassy_executor::task(pool_size = LED_TASK_POOL_SIZE)]
pub async fn led_task(
    pin: u8,
    controller: LedController<GpioSink>,
    channel: &'static LedSignalChannel,
) {
    info!("LED task started on GPIO{}", pin);
    let controller = led_core::run_led_loop(controller, channel).await;
    info!(
        "LED task on GPIO{} stopped (hold count {})",
        pin,
        controller.hold_count()
    );
}

/// Erstellt den Controller und startet seinen Task
///
/// Gibt das Sende-Handle erst zurück, wenn der Task läuft: schlägt das
/// Spawnen fehl, gibt es kein halb initialisiertes Objekt.
pub fn spawn_led(
    spawner: &Spawner,
    channel: &'static LedSignalChannel,
    pin: u8,
    sink: GpioSink,
    config: LedConfig,
) -> Result<LedSignalHandle, SpawnError> {
    let controller = LedController::new(sink, config);
    spawner.spawn(led_task(pin, controller, channel))?;
    info!("LED control task created for GPIO{}", pin);
    Ok(channel.handle())
}
