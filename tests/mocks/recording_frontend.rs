use contacts_exchange::ui::{DialogChoice, DialogSpec, ProgressMode, UiFrontend};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Everything a frontend can be told, recorded for assertions.
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    DialogOpened {
        message: String,
        has_confirm: bool,
        confirm_title: Option<String>,
        cancel_title: String,
    },
    DialogClosed,
    OverlayOpened {
        title: String,
        determinate: bool,
    },
    OverlayProgress {
        current: usize,
        total: Option<usize>,
    },
    OverlayCancelEnabled,
    OverlayClosed,
    Toast(String),
}

/// Frontend that records every event and answers dialogs from a script.
///
/// Each queued [`DialogChoice`] answers one dialog synchronously; with the
/// script exhausted the default answer is Cancel, so an unexpected dialog
/// ends a run instead of hanging it.
#[allow(dead_code)]
#[derive(Default)]
pub struct RecordingFrontend {
    events: Mutex<Vec<UiEvent>>,
    answers: Mutex<VecDeque<DialogChoice>>,
}

#[allow(dead_code)]
impl RecordingFrontend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the answer for the next dialog.
    pub fn push_answer(&self, choice: DialogChoice) {
        self.answers.lock().unwrap().push_back(choice);
    }

    pub fn events(&self) -> Vec<UiEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn dialogs_opened(&self) -> Vec<UiEvent> {
        self.events()
            .into_iter()
            .filter(|e| matches!(e, UiEvent::DialogOpened { .. }))
            .collect()
    }

    pub fn toasts(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                UiEvent::Toast(message) => Some(message),
                _ => None,
            })
            .collect()
    }

    fn record(&self, event: UiEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl UiFrontend for RecordingFrontend {
    fn dialog_opened(&self, spec: &DialogSpec) -> Option<DialogChoice> {
        self.record(UiEvent::DialogOpened {
            message: spec.message.clone(),
            has_confirm: spec.confirm.is_some(),
            confirm_title: spec.confirm.as_ref().map(|a| a.title.clone()),
            cancel_title: spec.cancel.title.clone(),
        });
        let answer = self.answers.lock().unwrap().pop_front();
        Some(answer.unwrap_or(DialogChoice::Cancel))
    }

    fn dialog_closed(&self) {
        self.record(UiEvent::DialogClosed);
    }

    fn overlay_opened(&self, title: &str, mode: ProgressMode) {
        self.record(UiEvent::OverlayOpened {
            title: title.to_string(),
            determinate: mode == ProgressMode::Determinate,
        });
    }

    fn overlay_progress(&self, current: usize, total: Option<usize>) {
        self.record(UiEvent::OverlayProgress { current, total });
    }

    fn overlay_cancel_enabled(&self) {
        self.record(UiEvent::OverlayCancelEnabled);
    }

    fn overlay_closed(&self) {
        self.record(UiEvent::OverlayClosed);
    }

    fn toast(&self, message: &str) {
        self.record(UiEvent::Toast(message.to_string()));
    }
}
