//! Console frontend.
//!
//! Renders the UI components as stderr lines (stdout stays clean for
//! export payloads piped onward) and answers dialogs from stdin.

use crate::ui::dialog::DialogSpec;
use crate::ui::frontend::{DialogChoice, ProgressMode, UiFrontend};
use std::io::{self, BufRead, Write};

#[derive(Default)]
pub struct ConsoleFrontend;

impl ConsoleFrontend {
    pub fn new() -> Self {
        Self
    }
}

impl UiFrontend for ConsoleFrontend {
    fn dialog_opened(&self, spec: &DialogSpec) -> Option<DialogChoice> {
        let mut err = io::stderr();
        if let Some(title) = &spec.title {
            let _ = writeln!(err, "{}", title);
        }
        let _ = writeln!(err, "{}", spec.message);

        match &spec.confirm {
            Some(confirm) => {
                let _ = write!(err, "[{}/{}]? ", confirm.title, spec.cancel.title);
                let _ = err.flush();

                let mut line = String::new();
                if io::stdin().lock().read_line(&mut line).is_err() {
                    return Some(DialogChoice::Cancel);
                }
                let answer = line.trim().to_lowercase();
                if !answer.is_empty()
                    && confirm.title.to_lowercase().starts_with(&answer)
                {
                    Some(DialogChoice::Confirm)
                } else {
                    Some(DialogChoice::Cancel)
                }
            }
            None => {
                let _ = writeln!(err, "[{}]", spec.cancel.title);
                Some(DialogChoice::Cancel)
            }
        }
    }

    fn overlay_opened(&self, title: &str, mode: ProgressMode) {
        match mode {
            ProgressMode::Determinate => eprintln!("{}", title),
            ProgressMode::Spinner => eprintln!("{} …", title),
        }
    }

    fn overlay_progress(&self, current: usize, total: Option<usize>) {
        match total {
            Some(total) => eprintln!("  {}/{}", current, total),
            None => eprintln!("  {}", current),
        }
    }

    fn toast(&self, message: &str) {
        eprintln!("{}", message);
    }
}
