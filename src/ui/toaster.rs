//! Status-message toaster.
//!
//! One toaster per context; messages queue FIFO and display one at a time,
//! the next appearing when the frontend reports the current one dismissed.

use crate::ui::frontend::UiFrontend;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

struct ToasterState {
    showing: bool,
    queue: VecDeque<String>,
}

pub struct Toaster {
    frontend: Arc<dyn UiFrontend>,
    state: Mutex<ToasterState>,
}

impl Toaster {
    pub fn new(frontend: Arc<dyn UiFrontend>) -> Self {
        Self {
            frontend,
            state: Mutex::new(ToasterState {
                showing: false,
                queue: VecDeque::new(),
            }),
        }
    }

    /// Post a message; it shows immediately when nothing is on screen,
    /// otherwise it waits its turn.
    pub fn show(&self, message: impl Into<String>) {
        let message = message.into();
        let display_now = {
            let mut state = self.state.lock().unwrap();
            if state.showing {
                state.queue.push_back(message.clone());
                false
            } else {
                state.showing = true;
                true
            }
        };
        if display_now {
            self.frontend.toast(&message);
        }
    }

    /// The current message left the screen; show the next queued one.
    pub fn dismissed(&self) {
        let next = {
            let mut state = self.state.lock().unwrap();
            match state.queue.pop_front() {
                Some(message) => Some(message),
                None => {
                    state.showing = false;
                    None
                }
            }
        };
        if let Some(message) = next {
            self.frontend.toast(&message);
        }
    }
}
