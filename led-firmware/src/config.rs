// Projekt-Konfiguration: Konstanten und Hardware-Zuordnungen
#![allow(dead_code)]

use led_core::{LedConfig, Pattern};

// ============================================================================
// LED Konfiguration
// ============================================================================

/// GPIO-Pin der System-LED (Status-Anzeige)
pub const SYSTEM_LED_GPIO_PIN: u8 = 15;

/// GPIO-Pins der drei Demo-LEDs
pub const DEMO_LED_GPIO_PINS: [u8; 3] = [18, 19, 20];

/// System-LED: High = an, Blinken hat Vorrang vor On/Off
pub const SYSTEM_LED_CONFIG: LedConfig = LedConfig::new(true, true);

/// Demo-LEDs: High = an, einfache Regel
pub const DEMO_LED_CONFIG: LedConfig = LedConfig::new(true, false);

/// Heartbeat-Blinken der System-LED, wenn kein Status-Bit stört
pub const SYSTEM_LED_AUTO_BLINK: bool = true;

/// Anzahl LED-Tasks (System-LED + 3 Demo-LEDs)
pub const LED_TASK_POOL_SIZE: usize = 4;

/// Blinkserien der Demo-LEDs
pub const DEMO_LED1_BLINK: Pattern = Pattern::new(1, 500, 500);
pub const DEMO_LED2_BLINK: Pattern = Pattern::new(3, 100, 2000);

/// Demo-LED 3 wird per Text-Kommando gestartet
pub const DEMO_LED3_COMMAND: &str = "lmBlinkOn 1 250 1000";

// ============================================================================
// Button Konfiguration
// ============================================================================

/// GPIO-Pin des BOOT-Buttons (Low-aktiv, interner Pull-Up)
pub const BUTTON_GPIO_PIN: u8 = 9;

/// Blitze auf der System-LED bei Tastendruck
pub const BUTTON_FLASH: Pattern = Pattern::new(2, 50, 100);

// ============================================================================
// Demo-Ablauf
// ============================================================================

/// Wartezeit bis "WLAN verbunden" gemeldet wird
pub const DEMO_WIFI_CONNECT_SECS: u64 = 10;

/// Danach bis "Internet verfügbar"
pub const DEMO_INET_AVAILABLE_SECS: u64 = 5;

/// Danach bis zum Flash über dem Status-Muster
pub const DEMO_FLASH_SECS: u64 = 20;

/// Flash über dem Status-Muster
pub const DEMO_STATUS_FLASH: Pattern = Pattern::new(5, 100, 250);
