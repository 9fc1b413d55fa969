//! Progress overlay.
//!
//! Shows either a determinate counter or an indeterminate spinner while an
//! export/import runs. Progress flows through an [`Observable`], so the
//! frontend only hears about effective changes; the cancel affordance
//! routes user intent back through the registered `on_cancel` hook.

use crate::observable::Observable;
use crate::ui::frontend::{ProgressMode, UiFrontend};
use std::sync::{Arc, Mutex};

/// Current progress value published to the frontend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProgressSnapshot {
    pub current: usize,
    pub total: Option<usize>,
}

type CancelHook = Box<dyn Fn() + Send + Sync>;

struct OverlayState {
    visible: bool,
    on_cancel: Option<CancelHook>,
}

pub struct ProgressOverlay {
    frontend: Arc<dyn UiFrontend>,
    state: Mutex<OverlayState>,
    progress: Arc<Observable<ProgressSnapshot>>,
}

impl ProgressOverlay {
    pub fn new(frontend: Arc<dyn UiFrontend>) -> Self {
        let progress = Arc::new(Observable::new(ProgressSnapshot::default()));

        let sink = frontend.clone();
        progress.subscribe(move |snapshot: &ProgressSnapshot| {
            sink.overlay_progress(snapshot.current, snapshot.total);
        });

        Self {
            frontend,
            state: Mutex::new(OverlayState {
                visible: false,
                on_cancel: None,
            }),
            progress,
        }
    }

    /// Display the overlay and hand back the progress handle. Progress is
    /// reset on every show.
    pub fn show(&self, title: &str, mode: ProgressMode) -> ProgressHandle {
        {
            let mut state = self.state.lock().unwrap();
            state.visible = true;
        }
        self.progress.set(ProgressSnapshot::default());
        self.frontend.overlay_opened(title, mode);
        ProgressHandle {
            progress: self.progress.clone(),
        }
    }

    /// Make the cancel affordance available to the user.
    pub fn show_cancel_menu(&self) {
        self.frontend.overlay_cancel_enabled();
    }

    /// Register the hook invoked when the user cancels.
    pub fn on_cancel(&self, hook: impl Fn() + Send + Sync + 'static) {
        self.state.lock().unwrap().on_cancel = Some(Box::new(hook));
    }

    /// Drop any registered cancel hook.
    pub fn clear_cancel(&self) {
        self.state.lock().unwrap().on_cancel = None;
    }

    /// User hit cancel; forward to the registered hook, if any.
    pub fn cancel_requested(&self) {
        // Take the hook out of the lock before invoking it.
        let hook = self.state.lock().unwrap().on_cancel.take();
        if let Some(hook) = hook {
            hook();
        }
    }

    pub fn hide(&self) {
        let was_visible = {
            let mut state = self.state.lock().unwrap();
            std::mem::replace(&mut state.visible, false)
        };
        if was_visible {
            self.frontend.overlay_closed();
        }
    }

    pub fn is_visible(&self) -> bool {
        self.state.lock().unwrap().visible
    }
}

/// Updates the progress value shown by the overlay.
#[derive(Clone)]
pub struct ProgressHandle {
    progress: Arc<Observable<ProgressSnapshot>>,
}

impl ProgressHandle {
    /// Set the denominator for determinate progress.
    pub fn set_total(&self, total: usize) {
        self.progress.update(|snapshot| snapshot.total = Some(total));
    }

    /// Advance the counter by one step.
    pub fn update(&self) {
        self.progress.update(|snapshot| snapshot.current += 1);
    }

    /// Current value, mainly for assertions.
    pub fn snapshot(&self) -> ProgressSnapshot {
        self.progress.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct RecordingFrontend {
        progress_events: AtomicUsize,
        closed: AtomicUsize,
    }

    impl UiFrontend for RecordingFrontend {
        fn overlay_progress(&self, _current: usize, _total: Option<usize>) {
            self.progress_events.fetch_add(1, Ordering::SeqCst);
        }

        fn overlay_closed(&self) {
            self.closed.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_progress_publishes_changes_only() {
        let frontend = Arc::new(RecordingFrontend::default());
        let overlay = ProgressOverlay::new(frontend.clone());

        let handle = overlay.show("Exporting", ProgressMode::Determinate);
        handle.set_total(3);
        handle.update();
        handle.update();
        // Setting the same total again must not notify
        handle.set_total(3);

        assert_eq!(frontend.progress_events.load(Ordering::SeqCst), 3);
        assert_eq!(
            handle.snapshot(),
            ProgressSnapshot {
                current: 2,
                total: Some(3)
            }
        );
    }

    #[test]
    fn test_hide_only_fires_when_visible() {
        let frontend = Arc::new(RecordingFrontend::default());
        let overlay = ProgressOverlay::new(frontend.clone());

        overlay.hide();
        assert_eq!(frontend.closed.load(Ordering::SeqCst), 0);

        overlay.show("Exporting", ProgressMode::Spinner);
        overlay.hide();
        overlay.hide();
        assert_eq!(frontend.closed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_cancel_hook_fires_once() {
        let overlay = ProgressOverlay::new(Arc::new(RecordingFrontend::default()));
        let fired = Arc::new(AtomicUsize::new(0));
        let fired2 = fired.clone();
        overlay.on_cancel(move || {
            fired2.fetch_add(1, Ordering::SeqCst);
        });

        overlay.cancel_requested();
        overlay.cancel_requested();
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }
}
