//! Braille spinner drawn on stderr while a text waits for its first token.

use std::io::{self, IsTerminal, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;

const FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

const FRAME_INTERVAL: Duration = Duration::from_millis(80);

struct State {
    active: bool,
    message: String,
}

/// A spinner animated by a background tokio task.
///
/// Frames are drawn while holding the state lock, so once [`Spinner::stop`]
/// returns no further frame can appear. Dropping the spinner stops it too.
pub struct Spinner {
    state: Arc<Mutex<State>>,
    handle: JoinHandle<()>,
}

impl Spinner {
    /// Start a spinner, but only when stderr is a terminal.
    pub fn start_if_terminal(message: &str) -> Option<Self> {
        io::stderr().is_terminal().then(|| Self::start(message))
    }

    pub fn start(message: &str) -> Self {
        let state = Arc::new(Mutex::new(State {
            active: true,
            message: message.to_string(),
        }));

        let task_state = state.clone();
        let handle = tokio::spawn(async move {
            for frame in FRAMES.iter().cycle() {
                {
                    let state = lock(&task_state);
                    if !state.active {
                        break;
                    }
                    let mut err = io::stderr().lock();
                    let _ = write!(err, "\r  {frame} {}", state.message);
                    let _ = err.flush();
                }
                tokio::time::sleep(FRAME_INTERVAL).await;
            }
        });

        Self { state, handle }
    }

    pub fn set_message(&self, message: &str) {
        lock(&self.state).message = message.to_string();
    }

    /// Run `f` with the spinner line cleared. The next frame redraws it.
    pub fn suspend<T>(&self, f: impl FnOnce() -> T) -> T {
        let state = lock(&self.state);
        if state.active {
            clear_line();
        }
        f()
    }

    /// Stop animating and clear the line. Synchronous, so it can be called
    /// from inside an event callback.
    pub fn stop(self) {
        drop(self);
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        let mut state = lock(&self.state);
        if state.active {
            state.active = false;
            clear_line();
        }
        self.handle.abort();
    }
}

fn lock(state: &Mutex<State>) -> MutexGuard<'_, State> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

fn clear_line() {
    let mut err = io::stderr().lock();
    let _ = write!(err, "\r\x1b[2K");
    let _ = err.flush();
}
