//! Binary-choice confirm dialog.
//!
//! One dialog instance serves a whole context. Show and hide transitions
//! are serialized: requests arriving while a transition is mid-flight wait
//! in an explicit FIFO and drain as transitions complete, so only one
//! fade is ever in flight. Content is reset when a request finishes, never
//! leaking into the next invocation.
//!
//! By default transitions complete instantly (a console frontend has no
//! fade). [`ConfirmDialog::animated`] leaves them open until the renderer
//! reports [`ConfirmDialog::transition_ended`].

use crate::ui::frontend::{ActionStyle, DialogChoice, UiFrontend};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

/// One of the two action slots.
#[derive(Debug, Clone)]
pub struct DialogAction {
    pub title: String,
    pub style: ActionStyle,
}

impl DialogAction {
    pub fn new(title: impl Into<String>, style: ActionStyle) -> Self {
        Self {
            title: title.into(),
            style,
        }
    }
}

/// Content of one dialog invocation.
#[derive(Debug, Clone)]
pub struct DialogSpec {
    pub title: Option<String>,
    pub message: String,
    /// The dismiss action, always present
    pub cancel: DialogAction,
    /// The affirmative action; omitted for single-action dialogs
    pub confirm: Option<DialogAction>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Hidden,
    FadingIn,
    Visible,
    FadingOut,
}

struct ActiveRequest {
    spec: DialogSpec,
    responder: oneshot::Sender<DialogChoice>,
}

enum PendingOp {
    Show(ActiveRequest),
    Hide(DialogChoice),
}

/// Deferred frontend calls, dispatched after the state lock is released so
/// a frontend may synchronously call back into the dialog.
enum Event {
    Opened(DialogSpec),
    Closed,
}

struct State {
    phase: Phase,
    active: Option<ActiveRequest>,
    queue: VecDeque<PendingOp>,
}

pub struct ConfirmDialog {
    frontend: Arc<dyn UiFrontend>,
    state: Mutex<State>,
    instant_transitions: bool,
}

impl ConfirmDialog {
    /// Dialog whose transitions complete as soon as they start.
    pub fn new(frontend: Arc<dyn UiFrontend>) -> Self {
        Self::build(frontend, true)
    }

    /// Dialog whose transitions stay open until the renderer calls
    /// [`ConfirmDialog::transition_ended`].
    pub fn animated(frontend: Arc<dyn UiFrontend>) -> Self {
        Self::build(frontend, false)
    }

    fn build(frontend: Arc<dyn UiFrontend>, instant_transitions: bool) -> Self {
        Self {
            frontend,
            state: Mutex::new(State {
                phase: Phase::Hidden,
                active: None,
                queue: VecDeque::new(),
            }),
            instant_transitions,
        }
    }

    /// Current phase is fully hidden with nothing pending.
    pub fn is_idle(&self) -> bool {
        let state = self.state.lock().unwrap();
        state.phase == Phase::Hidden && state.active.is_none() && state.queue.is_empty()
    }

    /// Whether a transition is currently in flight.
    pub fn is_transitioning(&self) -> bool {
        let state = self.state.lock().unwrap();
        matches!(state.phase, Phase::FadingIn | Phase::FadingOut)
    }

    /// Show the dialog and wait for the user's choice. Requests made while
    /// the dialog is busy queue up and run in order.
    pub async fn confirm(&self, spec: DialogSpec) -> DialogChoice {
        let (tx, rx) = oneshot::channel();
        let request = ActiveRequest {
            spec,
            responder: tx,
        };

        let events = {
            let mut state = self.state.lock().unwrap();
            if state.phase == Phase::Hidden && state.active.is_none() {
                Self::begin_show(&mut state, request)
            } else {
                state.queue.push_back(PendingOp::Show(request));
                Vec::new()
            }
        };
        self.dispatch(events);

        // A dropped responder can only mean the dialog was torn down;
        // treat it as a dismissal.
        rx.await.unwrap_or(DialogChoice::Cancel)
    }

    /// Deliver the user's choice for the visible dialog. Returns false when
    /// nothing was awaiting a choice. A choice made during the fade-in is
    /// queued and applied once the transition settles.
    pub fn choose(&self, choice: DialogChoice) -> bool {
        let events = {
            let mut state = self.state.lock().unwrap();
            if state.active.is_none() {
                return false;
            }
            match state.phase {
                Phase::Visible => Self::begin_hide(&mut state, choice),
                Phase::FadingIn => {
                    state.queue.push_front(PendingOp::Hide(choice));
                    Vec::new()
                }
                _ => return false,
            }
        };
        self.dispatch(events);
        true
    }

    /// The renderer finished the in-flight transition; settle the phase and
    /// drain the next queued operation.
    pub fn transition_ended(&self) {
        let events = {
            let mut state = self.state.lock().unwrap();
            match state.phase {
                Phase::FadingIn => {
                    state.phase = Phase::Visible;
                    match state.queue.pop_front() {
                        Some(PendingOp::Hide(choice)) => Self::begin_hide(&mut state, choice),
                        Some(op @ PendingOp::Show(_)) => {
                            state.queue.push_front(op);
                            Vec::new()
                        }
                        None => Vec::new(),
                    }
                }
                Phase::FadingOut => {
                    state.phase = Phase::Hidden;
                    match state.queue.pop_front() {
                        Some(PendingOp::Show(request)) => Self::begin_show(&mut state, request),
                        // A hide with nothing visible is stale; drop it.
                        Some(PendingOp::Hide(_)) | None => Vec::new(),
                    }
                }
                _ => Vec::new(),
            }
        };
        self.dispatch(events);
    }

    fn begin_show(state: &mut State, request: ActiveRequest) -> Vec<Event> {
        let spec = request.spec.clone();
        state.active = Some(request);
        state.phase = Phase::FadingIn;
        vec![Event::Opened(spec)]
    }

    fn begin_hide(state: &mut State, choice: DialogChoice) -> Vec<Event> {
        // Content reset happens here: the active request is consumed.
        if let Some(request) = state.active.take() {
            let _ = request.responder.send(choice);
        }
        state.phase = Phase::FadingOut;
        vec![Event::Closed]
    }

    fn dispatch(&self, events: Vec<Event>) {
        for event in events {
            match event {
                Event::Opened(spec) => {
                    let answer = self.frontend.dialog_opened(&spec);
                    if self.instant_transitions {
                        self.transition_ended();
                    }
                    if let Some(choice) = answer {
                        self.choose(choice);
                    }
                }
                Event::Closed => {
                    self.frontend.dialog_closed();
                    if self.instant_transitions {
                        self.transition_ended();
                    }
                }
            }
        }
    }
}
