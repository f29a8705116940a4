use crate::state::{Flow, Gesture, State};
use anyhow::Result;
use crossterm::{
    event,
    event::{Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind},
};
use log::*;
use std::{
    cell::Cell,
    sync::mpsc,
    thread,
    time::{Duration, Instant},
};

/// Specify different terminal event types.
///
#[derive(Debug)]
pub enum Event<I> {
    Input(I),
    Tick,
}

/// Specify struct for managing terminal events channel.
///
pub struct Handler {
    rx: mpsc::Receiver<Event<CrosstermEvent>>,
    _tx: mpsc::Sender<Event<CrosstermEvent>>,
    last_tick: Cell<Instant>,
}

impl Handler {
    /// Return new instance after spawning new input polling thread. A tick is
    /// sent after every poll, so animations advance at least once per
    /// `tick_rate`.
    ///
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::channel();
        let tx_clone = tx.clone();
        thread::spawn(move || loop {
            match event::poll(tick_rate) {
                Ok(true) => match event::read() {
                    Ok(input) => {
                        if tx_clone.send(Event::Input(input)).is_err() {
                            break;
                        }
                    }
                    Err(e) => warn!("Failed to read terminal event: {}", e),
                },
                Ok(false) => {}
                Err(e) => warn!("Failed to poll terminal events: {}", e),
            }
            if tx_clone.send(Event::Tick).is_err() {
                break;
            }
        });
        Handler {
            rx,
            _tx: tx,
            last_tick: Cell::new(Instant::now()),
        }
    }

    /// Receive next terminal event and handle it accordingly. Returns result
    /// with value true if should continue or false if exit was requested.
    ///
    pub fn handle_next(&self, state: &mut State) -> Result<bool> {
        match self.rx.recv()? {
            Event::Input(input) => {
                if let Some(gesture) = to_gesture(input) {
                    if is_interrupt(&gesture) {
                        return Ok(false);
                    }
                    if state.handle_gesture(gesture) == Flow::Exit {
                        return Ok(false);
                    }
                }
            }
            Event::Tick => {
                let now = Instant::now();
                let elapsed = now.duration_since(self.last_tick.replace(now));
                state.on_tick(elapsed);
            }
        }
        Ok(true)
    }
}

fn is_interrupt(gesture: &Gesture) -> bool {
    matches!(
        gesture,
        Gesture::Key(KeyEvent {
            code: KeyCode::Char('c'),
            modifiers: KeyModifiers::CONTROL,
            ..
        })
    )
}

/// Translate a raw terminal event into a gesture, dropping the ones the
/// application has no use for.
///
pub fn to_gesture(input: CrosstermEvent) -> Option<Gesture> {
    match input {
        CrosstermEvent::Key(key) if key.kind != KeyEventKind::Release => Some(Gesture::Key(key)),
        CrosstermEvent::Mouse(MouseEvent {
            kind, column: x, row: y, ..
        }) => match kind {
            MouseEventKind::Down(MouseButton::Left) => Some(Gesture::PrimaryDown { x, y }),
            MouseEventKind::Drag(MouseButton::Left) => Some(Gesture::PrimaryDrag { x, y }),
            MouseEventKind::Up(MouseButton::Left) => Some(Gesture::PrimaryUp { x, y }),
            MouseEventKind::Down(MouseButton::Right) => Some(Gesture::SecondaryClick { x, y }),
            MouseEventKind::Moved => Some(Gesture::PointerMove { x, y }),
            _ => None,
        },
        CrosstermEvent::Resize(width, height) => Some(Gesture::Resize { width, height }),
        _ => None,
    }
}
