// Status-Demo Task - simuliert den Verbindungsaufbau eines Geräts
//
// Die System-LED zeigt zuerst "WLAN getrennt", nach dem Verbinden
// "kein Internet", danach Heartbeat. Zum Schluss ein Flash über dem
// laufenden Muster.
use defmt::{info, warn};
use embassy_time::{Duration, Timer};

use crate::config::{
    DEMO_FLASH_SECS, DEMO_INET_AVAILABLE_SECS, DEMO_STATUS_FLASH, DEMO_WIFI_CONNECT_SECS,
};
use crate::{AggregateStatus, SystemLed};

/// Status-Demo Logik
///
/// Jeder Sendeversuch darf fehlschlagen (voller Channel); der Aggregator
/// sendet das Muster dann beim nächsten Status-Wechsel erneut.
pub async fn status_demo_logic(mut system_led: SystemLed) {
    if !system_led.start() {
        warn!("System LED: initial pattern dropped");
    }

    Timer::after(Duration::from_secs(DEMO_WIFI_CONNECT_SECS)).await;
    info!("Simulate: WiFi connected");
    if !system_led.state_set(AggregateStatus::WIFI_CONNECTED, false) {
        warn!("System LED: status update dropped");
    }

    Timer::after(Duration::from_secs(DEMO_INET_AVAILABLE_SECS)).await;
    info!("Simulate: internet available");
    if !system_led.state_set(AggregateStatus::WIFI_INET_AVAILABLE, false) {
        warn!("System LED: status update dropped");
    }

    Timer::after(Duration::from_secs(DEMO_FLASH_SECS)).await;
    info!("Simulate: incoming message");
    let flash = DEMO_STATUS_FLASH;
    if !system_led.flash(flash.quantity, flash.duration_ms, flash.interval_ms) {
        warn!("System LED: flash dropped");
    }
}

/// Status-Demo Task - Embassy Task
#[embassy_executor::task]
pub async fn status_demo_task(system_led: SystemLed) {
    status_demo_logic(system_led).await;
    info!("Status demo finished");
}
