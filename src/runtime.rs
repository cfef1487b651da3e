use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, MouseEvent};

/// Events the demo loop consumes: input that can start or end a press, plus
/// the tick that advances the hold session between inputs.
#[derive(Clone, Debug)]
pub enum UiEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Tick,
}

/// Source of terminal input events.
pub trait UiEventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    /// Returns Ok(event) if one arrives before the timeout, or Err(Timeout).
    fn recv_timeout(&self, timeout: Duration) -> Result<UiEvent, RecvTimeoutError>;
}

/// Production event source using crossterm. Only keys and mouse buttons are
/// forwarded; everything else (resize, focus, paste) is absorbed, since the
/// demo redraws on every step anyway.
pub struct CrosstermEventSource {
    rx: Receiver<UiEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            match event::read() {
                Ok(CtEvent::Key(key)) => {
                    if tx.send(UiEvent::Key(key)).is_err() {
                        break;
                    }
                }
                Ok(CtEvent::Mouse(mouse)) => {
                    if tx.send(UiEvent::Mouse(mouse)).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(_) => break,
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl UiEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<UiEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Test event source fed from a plain channel.
pub struct TestEventSource {
    rx: Receiver<UiEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<UiEvent>) -> Self {
        Self { rx }
    }
}

impl UiEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<UiEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Paces the demo loop: blocks up to the tick interval waiting for input and
/// yields `Tick` when none arrives in time.
pub struct Runner<E: UiEventSource> {
    event_source: E,
    tick_interval: Duration,
}

impl<E: UiEventSource> Runner<E> {
    pub fn new(event_source: E, tick_interval: Duration) -> Self {
        Self {
            event_source,
            tick_interval,
        }
    }

    pub fn step(&self) -> UiEvent {
        match self.event_source.recv_timeout(self.tick_interval) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => UiEvent::Tick,
        }
    }
}
