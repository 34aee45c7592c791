//! Command-Channel und Treiber-Loop
//!
//! Ein [`LedChannel`] gehört zu genau einem Controller. Beliebig viele
//! Produzenten senden über [`LedHandle`], der Treiber-Loop
//! ([`run_led_loop`]) ist der einzige Konsument.
//!
//! Zwei Sendepfade:
//! - [`LedHandle::send`]: wartet bei vollem Channel (bis zum Timeout)
//! - [`LedHandle::send_from_isr`]: blockiert nie, verwirft bei vollem Channel
//!
//! Wird der Channel geschlossen, beendet sich der Loop nach dem laufenden
//! Schritt und gibt den Controller zurück.

use core::sync::atomic::{AtomicBool, Ordering};

use embassy_futures::select::{Either, select};
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, with_timeout};

use crate::config::SendTimeout;
use crate::controller::LedController;
use crate::traits::LevelSink;
use crate::types::LedCommand;

/// Ereignis, das den Treiber-Loop aufweckt
enum Wake {
    Command(LedCommand),
    Timeout,
    Closed,
}

/// Statische Ressourcen für eine LED: Command-Queue + Schließ-Signal
pub struct LedChannel<M: RawMutex, const N: usize> {
    commands: Channel<M, LedCommand, N>,
    closed: AtomicBool,
    close_signal: Signal<M, ()>,
}

impl<M: RawMutex, const N: usize> LedChannel<M, N> {
    pub const fn new() -> Self {
        Self {
            commands: Channel::new(),
            closed: AtomicBool::new(false),
            close_signal: Signal::new(),
        }
    }

    /// Handle mit Default-Timeout für den blockierenden Sendepfad
    pub fn handle(&self) -> LedHandle<'_, M, N> {
        LedHandle {
            channel: self,
            timeout: crate::config::SEND_TIMEOUT,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Schließt den Channel
    ///
    /// Gibt nur beim ersten Aufruf `true` zurück, der Loop wird genau
    /// einmal benachrichtigt.
    pub fn close(&self) -> bool {
        if self.closed.swap(true, Ordering::AcqRel) {
            return false;
        }
        debug!("Delete LED control queue");
        self.close_signal.signal(());
        true
    }

    /// Anzahl wartender Kommandos
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    // Kommandos haben Vorrang vor dem Schließ-Signal
    async fn next(&self) -> Wake {
        match select(self.commands.receive(), self.close_signal.wait()).await {
            Either::First(cmd) => Wake::Command(cmd),
            Either::Second(()) => Wake::Closed,
        }
    }
}

impl<M: RawMutex, const N: usize> Default for LedChannel<M, N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Sende-Handle für einen [`LedChannel`]
///
/// Copy-Typ: darf an beliebig viele Tasks und Interrupt-Handler verteilt werden.
pub struct LedHandle<'a, M: RawMutex, const N: usize> {
    channel: &'a LedChannel<M, N>,
    timeout: SendTimeout,
}

impl<M: RawMutex, const N: usize> Clone for LedHandle<'_, M, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M: RawMutex, const N: usize> Copy for LedHandle<'_, M, N> {}

impl<'a, M: RawMutex, const N: usize> LedHandle<'a, M, N> {
    pub fn with_timeout(self, timeout: SendTimeout) -> Self {
        Self { timeout, ..self }
    }

    /// Sendet ein Kommando, wartet bei vollem Channel bis zum Timeout
    ///
    /// Geschlossen wird nur vor dem Einreihen geprüft. Schließt ein anderer
    /// Task den Channel währenddessen, kann `true` zurückkommen, obwohl der
    /// Treiber-Loop schon beendet ist und das Kommando nie anwendet.
    pub async fn send(&self, cmd: LedCommand) -> bool {
        if self.channel.is_closed() {
            return false;
        }
        let sent = match self.timeout {
            SendTimeout::Forever => {
                self.channel.commands.send(cmd).await;
                true
            }
            SendTimeout::Millis(ms) => with_timeout(
                Duration::from_millis(ms.into()),
                self.channel.commands.send(cmd),
            )
            .await
            .is_ok(),
        };
        if sent {
            trace!("New command send for LED: {}", cmd.mode() as u8);
        }
        sent
    }

    /// Nicht-blockierender Sendepfad für Interrupt-Kontext
    ///
    /// Der wartende Treiber-Loop wird über seinen Waker geweckt und läuft
    /// beim nächsten Scheduler-Durchlauf; hier wird nie gewartet.
    pub fn send_from_isr(&self, cmd: LedCommand) -> bool {
        !self.channel.is_closed() && self.channel.commands.try_send(cmd).is_ok()
    }

    /// Schließt den Channel; der Treiber-Loop beendet sich danach
    pub fn close(self) -> bool {
        self.channel.close()
    }
}

/// Treiber-Loop eines Controllers
///
/// Wartet höchstens [`LedController::time_to_next_wake`] auf ein Kommando.
/// Kommt eines, wird es angewendet; läuft die Zeit ab, geht das Muster
/// einen Schritt weiter. Endet, sobald der Channel geschlossen ist, und
/// gibt den Controller zurück.
pub async fn run_led_loop<S, M, const N: usize>(
    mut controller: LedController<S>,
    channel: &LedChannel<M, N>,
) -> LedController<S>
where
    S: LevelSink,
    M: RawMutex,
{
    controller.init();

    loop {
        let wake = match controller.time_to_next_wake() {
            Some(ms) => with_timeout(Duration::from_millis(ms.into()), channel.next())
                .await
                .unwrap_or(Wake::Timeout),
            None => channel.next().await,
        };

        match wake {
            Wake::Command(cmd) => {
                trace!("New command received: {}", cmd.mode() as u8);
                controller.apply(cmd);
            }
            Wake::Timeout => controller.on_timeout(),
            Wake::Closed => break,
        }
    }

    debug!("Delete LED control instance");
    controller
}
