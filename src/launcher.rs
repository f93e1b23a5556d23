//! Dock catalog and activation: a dock entry either toggles one of the
//! desktop's windows or hands a link to the host system.

use thiserror::Error;

use crate::window::{WindowId, WindowRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppId {
    Messages,
    Instagram,
    Threads,
    Mail,
    OnText,
    FlowClip,
}

/// A destination outside the desktop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExternalTarget {
    Url(&'static str),
    Mail(&'static str),
}

impl ExternalTarget {
    pub fn uri(&self) -> String {
        match self {
            ExternalTarget::Url(url) => (*url).to_string(),
            ExternalTarget::Mail(address) => format!("mailto:{address}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchBehavior {
    InternalWindow(WindowId),
    ExternalAction(ExternalTarget),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DockEntry {
    pub app: AppId,
    pub label: &'static str,
    pub behavior: LaunchBehavior,
}

/// Dock entries, left to right.
pub const DOCK_CATALOG: [DockEntry; 6] = [
    DockEntry {
        app: AppId::Messages,
        label: "Messages",
        behavior: LaunchBehavior::InternalWindow(WindowId::Messages),
    },
    DockEntry {
        app: AppId::Instagram,
        label: "Instagram",
        behavior: LaunchBehavior::ExternalAction(ExternalTarget::Url("https://instagram.com")),
    },
    DockEntry {
        app: AppId::Threads,
        label: "Threads",
        behavior: LaunchBehavior::ExternalAction(ExternalTarget::Url(
            "https://www.threads.com/@yeop9690",
        )),
    },
    DockEntry {
        app: AppId::Mail,
        label: "Mail",
        behavior: LaunchBehavior::ExternalAction(ExternalTarget::Mail("freiheit517@icloud.com")),
    },
    DockEntry {
        app: AppId::OnText,
        label: "OnText",
        behavior: LaunchBehavior::InternalWindow(WindowId::OnText),
    },
    DockEntry {
        app: AppId::FlowClip,
        label: "FlowClip",
        behavior: LaunchBehavior::InternalWindow(WindowId::FlowClip),
    },
];

impl AppId {
    pub fn entry(self) -> &'static DockEntry {
        let index = match self {
            AppId::Messages => 0,
            AppId::Instagram => 1,
            AppId::Threads => 2,
            AppId::Mail => 3,
            AppId::OnText => 4,
            AppId::FlowClip => 5,
        };
        &DOCK_CATALOG[index]
    }
}

#[derive(Debug, Error)]
pub enum LauncherError {
    #[error("failed to open {uri}: {source}")]
    Open {
        uri: String,
        #[source]
        source: std::io::Error,
    },
}

/// Hands an external target to the host system.
pub trait ExternalOpener {
    fn open(&mut self, target: &ExternalTarget) -> Result<(), LauncherError>;
}

/// Opens targets with the system browser or mail client.
#[derive(Debug, Default)]
pub struct BrowserOpener;

impl ExternalOpener for BrowserOpener {
    fn open(&mut self, target: &ExternalTarget) -> Result<(), LauncherError> {
        let uri = target.uri();
        webbrowser::open(&uri).map_err(|source| LauncherError::Open { uri, source })
    }
}

/// Result of activating a dock entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchOutcome {
    Opened(WindowId),
    Closed(WindowId),
    External(AppId),
}

pub struct Launcher {
    opener: Box<dyn ExternalOpener>,
}

impl Launcher {
    pub fn new(opener: Box<dyn ExternalOpener>) -> Self {
        Self { opener }
    }

    /// Activates a dock entry. Internal entries toggle their window; external
    /// entries never touch the registry, and a failure to open them is only
    /// logged.
    pub fn activate(&mut self, app: AppId, registry: &mut WindowRegistry) -> LaunchOutcome {
        let entry = app.entry();
        tracing::info!(app = entry.label, "dock item activated");
        match entry.behavior {
            LaunchBehavior::InternalWindow(id) => {
                registry.toggle(id);
                if registry.is_open(id) {
                    LaunchOutcome::Opened(id)
                } else {
                    LaunchOutcome::Closed(id)
                }
            }
            LaunchBehavior::ExternalAction(target) => {
                if let Err(err) = self.opener.open(&target) {
                    tracing::warn!(error = %err, "external action failed");
                }
                LaunchOutcome::External(app)
            }
        }
    }
}

impl Default for Launcher {
    fn default() -> Self {
        Self::new(Box::new(BrowserOpener))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Recorder(Arc<Mutex<Vec<String>>>);

    impl ExternalOpener for Recorder {
        fn open(&mut self, target: &ExternalTarget) -> Result<(), LauncherError> {
            self.0.lock().unwrap().push(target.uri());
            Ok(())
        }
    }

    struct Failing;

    impl ExternalOpener for Failing {
        fn open(&mut self, target: &ExternalTarget) -> Result<(), LauncherError> {
            Err(LauncherError::Open {
                uri: target.uri(),
                source: std::io::Error::other("no browser"),
            })
        }
    }

    #[test]
    fn internal_entry_toggles_window() {
        let mut launcher = Launcher::new(Box::new(Recorder::default()));
        let mut registry = WindowRegistry::new();
        assert_eq!(
            launcher.activate(AppId::OnText, &mut registry),
            LaunchOutcome::Opened(WindowId::OnText)
        );
        assert_eq!(
            launcher.activate(AppId::OnText, &mut registry),
            LaunchOutcome::Closed(WindowId::OnText)
        );
        assert!(registry.stack_order().is_empty());
    }

    #[test]
    fn external_entries_leave_registry_alone() {
        let recorder = Recorder::default();
        let mut launcher = Launcher::new(Box::new(recorder.clone()));
        let mut registry = WindowRegistry::new();
        registry.open(WindowId::Messages);
        for app in [AppId::Instagram, AppId::Threads, AppId::Mail] {
            assert_eq!(
                launcher.activate(app, &mut registry),
                LaunchOutcome::External(app)
            );
        }
        assert_eq!(registry.stack_order(), &[WindowId::Messages]);
        assert_eq!(
            recorder.0.lock().unwrap().as_slice(),
            &[
                "https://instagram.com".to_string(),
                "https://www.threads.com/@yeop9690".to_string(),
                "mailto:freiheit517@icloud.com".to_string(),
            ]
        );
    }

    #[test]
    fn opener_failure_is_not_fatal() {
        let mut launcher = Launcher::new(Box::new(Failing));
        let mut registry = WindowRegistry::new();
        assert_eq!(
            launcher.activate(AppId::Mail, &mut registry),
            LaunchOutcome::External(AppId::Mail)
        );
        assert_eq!(registry.open_count(), 0);
    }

    #[test]
    fn entry_lookup_matches_catalog_order() {
        for entry in DOCK_CATALOG.iter() {
            assert_eq!(entry.app.entry(), entry);
        }
    }

    #[test]
    fn catalog_covers_every_window() {
        for id in WindowId::ALL {
            assert!(
                DOCK_CATALOG
                    .iter()
                    .any(|entry| entry.behavior == LaunchBehavior::InternalWindow(id))
            );
        }
    }
}
