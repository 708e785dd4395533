//! Interactive terminal session.
//!
//! Owns the terminal for the lifetime of the session and runs the event loop:
//!
//! ```text
//! input thread ──Key/Resize──┐
//! ticker thread ───Tick──────┼──► mpsc queue ──► keymap ──► handle_event ──► actions
//! worker threads ─Response───┘                                   │              │
//!                                                                 ▼              ▼
//!                                                              render       Dispatcher
//! ```
//!
//! The loop thread is the only owner of [`AppState`] and never blocks on the
//! registry or the installer; those run on dispatcher threads and come back as
//! queued responses, handled strictly in arrival order.

use crate::app::keymap::map_key;
use crate::app::{handle_event, startup_actions, Action, AppState, Event};
use crate::domain::error::{ModstashError, Result};
use crate::registry::Registry;
use crate::ui;
use crate::worker::{Dispatcher, WorkerResponse};
use crate::Config;
use crossterm::event::{self as term_event, KeyEvent};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue};
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// How long the input thread waits for a key before checking for shutdown.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Spinner frame rate.
const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Everything the session loop consumes, in one queue.
#[derive(Debug)]
pub enum Inbound {
    Key(KeyEvent),
    Resize { cols: u16, rows: u16 },
    Tick,
    Worker(WorkerResponse),
}

impl From<WorkerResponse> for Inbound {
    fn from(response: WorkerResponse) -> Self {
        Self::Worker(response)
    }
}

/// Raw mode plus alternate screen, restored on drop even when the loop
/// returns early with an error.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        terminal::enable_raw_mode()?;
        let guard = Self;
        execute!(io::stdout(), EnterAlternateScreen, cursor::Hide)?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), cursor::Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

/// Runs the interactive session until the user quits.
///
/// # Errors
///
/// Returns an error if the terminal cannot be put into raw mode, a background
/// thread cannot be started, or writing to the terminal fails. Registry
/// failures never end the session; they become status messages.
pub fn start_session(registry: Arc<Registry>, config: &Config) -> Result<()> {
    let _span = tracing::info_span!("session").entered();

    let mut state = crate::initialize(config);
    let (sender, receiver) = mpsc::channel::<Inbound>();
    let dispatcher = Dispatcher::new(registry, sender.clone());
    let running = Arc::new(AtomicBool::new(true));

    spawn_input_thread(sender.clone(), Arc::clone(&running))?;
    spawn_ticker(sender, Arc::clone(&running))?;

    let result = TerminalGuard::enter().and_then(|guard| {
        tracing::info!(theme = %state.theme.name, "session started");
        for action in startup_actions(&state) {
            execute_action(&mut state, &dispatcher, action);
        }
        let outcome = run_loop(&mut state, &receiver, &dispatcher);
        drop(guard);
        outcome
    });

    running.store(false, Ordering::Relaxed);
    match &result {
        Ok(()) => tracing::info!("session ended"),
        Err(e) => tracing::error!(error = %e, "session aborted"),
    }
    result
}

fn spawn_input_thread(sender: Sender<Inbound>, running: Arc<AtomicBool>) -> Result<()> {
    thread::Builder::new()
        .name("modstash-input".to_string())
        .spawn(move || {
            while running.load(Ordering::Relaxed) {
                let inbound = match term_event::poll(POLL_INTERVAL) {
                    Ok(false) => continue,
                    Ok(true) => match term_event::read() {
                        Ok(term_event::Event::Key(key)) => Inbound::Key(key),
                        Ok(term_event::Event::Resize(cols, rows)) => Inbound::Resize { cols, rows },
                        Ok(_) => continue,
                        Err(e) => {
                            tracing::error!(error = %e, "reading terminal input failed");
                            break;
                        }
                    },
                    Err(e) => {
                        tracing::error!(error = %e, "polling terminal input failed");
                        break;
                    }
                };
                if sender.send(inbound).is_err() {
                    break;
                }
            }
            tracing::debug!("input thread stopped");
        })
        .map(|_| ())
        .map_err(|e| ModstashError::Worker(format!("failed to start input thread: {e}")))
}

fn spawn_ticker(sender: Sender<Inbound>, running: Arc<AtomicBool>) -> Result<()> {
    thread::Builder::new()
        .name("modstash-ticker".to_string())
        .spawn(move || {
            while running.load(Ordering::Relaxed) {
                thread::sleep(TICK_INTERVAL);
                if sender.send(Inbound::Tick).is_err() {
                    break;
                }
            }
        })
        .map(|_| ())
        .map_err(|e| ModstashError::Worker(format!("failed to start ticker: {e}")))
}

/// Whether the loop keeps going after an action.
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

fn run_loop(state: &mut AppState, receiver: &Receiver<Inbound>, dispatcher: &Dispatcher<Inbound>) -> Result<()> {
    let (mut cols, mut rows) = terminal::size()?;
    draw(state, rows, cols)?;

    while let Ok(inbound) = receiver.recv() {
        let event = match inbound {
            Inbound::Key(key) => match map_key(state, key) {
                Some(event) => event,
                None => continue,
            },
            Inbound::Resize { cols: c, rows: r } => {
                tracing::debug!(cols = c, rows = r, "terminal resized");
                (cols, rows) = (c, r);
                draw(state, rows, cols)?;
                continue;
            }
            Inbound::Tick => Event::Tick,
            Inbound::Worker(response) => Event::Worker(response),
        };

        let (needs_render, actions) = handle_event(state, &event)?;
        for action in actions {
            if execute_action(state, dispatcher, action) == Flow::Quit {
                return Ok(());
            }
        }

        if needs_render {
            draw(state, rows, cols)?;
        }
    }

    tracing::warn!("event queue closed");
    Ok(())
}

/// Executes one action. A failed dispatch becomes a status message.
#[tracing::instrument(level = "debug", skip(state, dispatcher))]
fn execute_action(state: &mut AppState, dispatcher: &Dispatcher<Inbound>, action: Action) -> Flow {
    match action {
        Action::Quit => Flow::Quit,
        Action::PostToWorker(message) => {
            let operation = message.operation();
            if let Err(e) = dispatcher.dispatch(message) {
                tracing::error!(operation = operation.label(), error = %e, "dispatch failed");
                if operation.is_install() {
                    state.installing = false;
                }
                state.error(format!("Error: {e}"));
            }
            Flow::Continue
        }
    }
}

/// Renders a full frame into a buffer and writes it in one go.
fn draw(state: &AppState, rows: u16, cols: u16) -> Result<()> {
    let mut frame = Vec::with_capacity(usize::from(rows) * usize::from(cols) * 4);
    queue!(frame, Clear(ClearType::All))?;
    ui::render(&mut frame, state, usize::from(rows), usize::from(cols))?;

    let mut stdout = io::stdout().lock();
    stdout.write_all(&frame)?;
    stdout.flush()?;
    Ok(())
}
