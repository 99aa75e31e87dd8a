//! Shared fixtures for unit tests.

use parking_lot::Mutex;

use crate::mods::DiagnosticPresenter;

/// Records every dialog instead of showing it.
#[derive(Debug, Default)]
pub(crate) struct RecordingPresenter {
    pub(crate) shown: Mutex<Vec<(String, String)>>,
}

impl DiagnosticPresenter for RecordingPresenter {
    fn show_fatal(&self, title: &str, message: &str) {
        self.shown.lock().push((title.to_string(), message.to_string()));
    }
}
