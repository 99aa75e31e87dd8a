//! The single place load and route-test failures are reported.
//!
//! Reporting disables every mod: the enabled list is cleared and, in the
//! privileged process, a blocking dialog tells the user to check the logs.
//! Callers re-raise the error afterwards.

use std::sync::Arc;

use super::ModError;
use super::enabled::EnabledMods;

pub const FAILURE_TITLE: &str = "Mod load error";
pub const FAILURE_MESSAGE: &str = "Something went wrong while loading mods! \
All mods have been disabled for safety.\nCheck the console log for details";

/// Blocking modal display of a fatal message.
pub trait DiagnosticPresenter: Send + Sync {
    fn show_fatal(&self, title: &str, message: &str);
}

/// Presenter for headless hosts: writes the dialog text to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogPresenter;

impl DiagnosticPresenter for LogPresenter {
    fn show_fatal(&self, title: &str, message: &str) {
        tracing::error!(title, "{message}");
    }
}

/// Which side of the process boundary this engine runs on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProcessRole {
    /// Has filesystem access and owns the dialog layer.
    #[default]
    Privileged,
    /// Renders content; mod failures are not expected here.
    Display,
}

pub struct FailureReporter {
    enabled: EnabledMods,
    presenter: Arc<dyn DiagnosticPresenter>,
    role: ProcessRole,
}

impl FailureReporter {
    pub fn new(
        enabled: EnabledMods,
        presenter: Arc<dyn DiagnosticPresenter>,
        role: ProcessRole,
    ) -> Self {
        Self {
            enabled,
            presenter,
            role,
        }
    }

    pub fn role(&self) -> ProcessRole {
        self.role
    }

    /// Disables all mods after a failure involving `involved` (mod ids or URLs).
    pub fn report(&self, involved: &[String], error: &ModError) {
        match self.role {
            ProcessRole::Privileged => {
                tracing::info!(?involved, "Mod load failure");
                tracing::error!(error = %error, "Disabling all mods");
            }
            ProcessRole::Display => {
                tracing::info!(?involved, "Mod load failure in display process");
                tracing::debug!(error = %error, "Mod failure details");
            }
        }

        if let Err(e) = self.enabled.clear() {
            tracing::error!(error = %e, "Failed to clear enabled mod list");
        }

        match self.role {
            ProcessRole::Privileged => self.presenter.show_fatal(FAILURE_TITLE, FAILURE_MESSAGE),
            ProcessRole::Display => {
                tracing::error!("Did not expect a mod failure in the display process")
            }
        }
    }
}

impl std::fmt::Debug for FailureReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FailureReporter")
            .field("enabled", &self.enabled)
            .field("role", &self.role)
            .finish()
    }
}
