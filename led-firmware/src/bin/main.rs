// Keine Standard-Bibliothek verwenden (Embedded System)
#![no_std]
// Kein normaler main() Einstiegspunkt (wird von esp_rtos bereitgestellt)
#![no_main]
// Verbiete mem::forget - gefährlich bei ESP HAL Types
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]
// Verbiete große Stack-Frames (Stack ist auf Embedded Systemen begrenzt)
#![deny(clippy::large_stack_frames)]

// Embassy Async Runtime
use defmt::{error, info, warn};
use embassy_executor::Spawner;
use embassy_time::{Duration, Timer};

// ESP32-C6 HAL
use esp_hal::clock::CpuClock;
use esp_hal::interrupt::software::SoftwareInterruptControl;
use esp_hal::timer::timg::TimerGroup;
use static_cell::StaticCell;

// Backtrace bei Panic und println!() Support
use {esp_backtrace as _, esp_println as _};

// Projekt-Module und Konfiguration
use esp_led_signal::config::{
    BUTTON_GPIO_PIN, DEMO_LED_CONFIG, DEMO_LED_GPIO_PINS, DEMO_LED1_BLINK, DEMO_LED2_BLINK,
    DEMO_LED3_COMMAND, SYSTEM_LED_AUTO_BLINK, SYSTEM_LED_CONFIG, SYSTEM_LED_GPIO_PIN,
};
use esp_led_signal::hal::{install_button, led_output};
use esp_led_signal::tasks::{spawn_led, status_demo_task};
use esp_led_signal::{LedCommand, LedSignalChannel, LedSignalHandle, StatusAggregator};

// ESP-IDF App Descriptor - erforderlich für den Bootloader!
esp_bootloader_esp_idf::esp_app_desc!();

/// Main Entry Point
///
/// Initialisiert Hardware, startet einen Task pro LED und die Status-Demo.
/// Danach schläft main() - alle Arbeit läuft in Tasks.
#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    // ESP32-C6 Konfiguration: CPU auf maximale Taktfrequenz (160 MHz)
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    // Embassy Runtime initialisieren (Timer + Software Interrupt)
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    let sw_interrupt = SoftwareInterruptControl::new(peripherals.SW_INTERRUPT);
    esp_rtos::start(timg0.timer0, sw_interrupt.software_interrupt0);

    info!("LED signal demo starting");

    // System-LED: Status-Anzeige
    static SYSTEM_LED_CHANNEL: StaticCell<LedSignalChannel> = StaticCell::new();
    let system_channel = &*SYSTEM_LED_CHANNEL.init(LedSignalChannel::new());
    let system_led = spawn_led(
        &spawner,
        system_channel,
        SYSTEM_LED_GPIO_PIN,
        led_output(peripherals.GPIO15, SYSTEM_LED_CONFIG.active_high),
        SYSTEM_LED_CONFIG,
    )
    .expect("Failed to spawn system LED task");

    // Drei unabhängige Demo-LEDs
    static DEMO_LED_CHANNELS: StaticCell<[LedSignalChannel; 3]> = StaticCell::new();
    let demo_channels = &*DEMO_LED_CHANNELS.init(core::array::from_fn(|_| LedSignalChannel::new()));
    let demo_sinks = [
        led_output(peripherals.GPIO18, DEMO_LED_CONFIG.active_high),
        led_output(peripherals.GPIO19, DEMO_LED_CONFIG.active_high),
        led_output(peripherals.GPIO20, DEMO_LED_CONFIG.active_high),
    ];

    let mut demo_leds: [Option<LedSignalHandle>; 3] = [None; 3];
    for (i, sink) in demo_sinks.into_iter().enumerate() {
        let pin = DEMO_LED_GPIO_PINS[i];
        match spawn_led(&spawner, &demo_channels[i], pin, sink, DEMO_LED_CONFIG) {
            Ok(handle) => demo_leds[i] = Some(handle),
            Err(_) => error!("Failed to spawn LED task for GPIO{}", pin),
        }
    }

    // Blinkserien starten
    let demo_commands = [
        Ok(LedCommand::BlinkOn(DEMO_LED1_BLINK)),
        Ok(LedCommand::BlinkOn(DEMO_LED2_BLINK)),
        DEMO_LED3_COMMAND.parse::<LedCommand>(),
    ];
    for (led, cmd) in demo_leds.iter().zip(demo_commands) {
        let Some(led) = led else {
            continue;
        };
        match cmd {
            Ok(cmd) => {
                if !led.send(cmd).await {
                    warn!("LED command dropped: {}", cmd);
                }
            }
            Err(e) => error!("Invalid LED command: {}", e),
        }
    }

    // BOOT-Button: Flash auf der System-LED aus dem Interrupt
    install_button(peripherals.IO_MUX, peripherals.GPIO9, system_led);
    info!("Button on GPIO{} ready", BUTTON_GPIO_PIN);

    // Status-Demo übernimmt die System-LED
    let system_led = StatusAggregator::new(system_led, SYSTEM_LED_AUTO_BLINK);
    spawner
        .spawn(status_demo_task(system_led))
        .expect("Failed to spawn status demo task");

    // Main-Loop: schläft (alle Arbeit läuft in Tasks)
    loop {
        Timer::after(Duration::from_secs(3600)).await;
    }
}
